// federate.rs — Federation view consumed by the class expander
//
// The federation-assignment algorithm lives upstream. The expander only asks
// three questions of a federate: does it own this instance, does it own this
// reaction, and is this reaction one of its synthesized network reactions.
// `FederateInstance` answers them for the common layout where each federate
// is one instantiation (or bank member) directly below the federated main
// reactor.

use std::collections::HashSet;

use crate::id::{InstanceId, ReactionKey};
use crate::instance::InstanceTree;

pub trait Federate {
    fn name(&self) -> &str;

    fn contains_instance(&self, tree: &InstanceTree, instance: InstanceId) -> bool;

    fn contains_reaction(&self, reaction: ReactionKey) -> bool;

    fn is_network_reaction(&self, reaction: ReactionKey) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct FederateInstance {
    pub name: String,
    /// Top-level instantiation this federate runs. `None` for an unfederated
    /// program, where the single federate owns everything.
    pub instantiation: Option<String>,
    pub bank_index: Option<u32>,
    /// Reactions of the federated main reactor that belong to other federates.
    pub excluded_reactions: HashSet<ReactionKey>,
    /// Reactions synthesized to carry messages between federates.
    pub network_reactions: HashSet<ReactionKey>,
}

impl FederateInstance {
    /// The single federate of an unfederated program.
    pub fn unfederated() -> Self {
        Self {
            name: "main".to_string(),
            ..Self::default()
        }
    }

    pub fn for_instantiation(name: impl Into<String>, instantiation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instantiation: Some(instantiation.into()),
            ..Self::default()
        }
    }

    pub fn with_bank_index(mut self, bank_index: u32) -> Self {
        self.bank_index = Some(bank_index);
        self
    }

    pub fn exclude_reaction(mut self, reaction: ReactionKey) -> Self {
        self.excluded_reactions.insert(reaction);
        self
    }

    pub fn with_network_reaction(mut self, reaction: ReactionKey) -> Self {
        self.network_reactions.insert(reaction);
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.instantiation.is_none()
    }
}

impl Federate for FederateInstance {
    fn name(&self) -> &str {
        &self.name
    }

    /// The root itself is never owned by a real federate; every other
    /// instance is owned through its ancestor directly below the root.
    fn contains_instance(&self, tree: &InstanceTree, instance: InstanceId) -> bool {
        let Some(target) = &self.instantiation else {
            return true;
        };
        let Some(top) = tree.top_level_ancestor(instance) else {
            return false;
        };
        let top = tree.get(top);
        &top.name == target && (self.bank_index.is_none() || top.bank_index == self.bank_index)
    }

    fn contains_reaction(&self, reaction: ReactionKey) -> bool {
        !self.excluded_reactions.contains(&reaction)
    }

    fn is_network_reaction(&self, reaction: ReactionKey) -> bool {
        self.network_reactions.contains(&reaction)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
