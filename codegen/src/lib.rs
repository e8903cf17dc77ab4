// rcg — Reactor class generator
//
// Library root. Type inference and time lowering feed the target type
// tables; the instance tree and federate view drive class expansion, which
// hands each class to a target emitter.

pub mod diag;
pub mod emit;
pub mod error;
pub mod expand;
pub mod federate;
pub mod id;
pub mod infer;
pub mod instance;
pub mod lower;
pub mod model;
pub mod pipeline;
pub mod python;
pub mod target;
pub mod time;
