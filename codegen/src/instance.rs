// instance.rs — Elaborated instance tree
//
// Expands the instantiation hierarchy below a top-level reactor into an
// arena of `ReactorInstance`s. Banks become one sibling instance per bank
// member. Children are stored in declaration order, bank members in index
// order, so every walk over the tree is deterministic.
//
// Preconditions: the program is validated; instantiation is not recursive.
// Postconditions: every instance's reactor exists in the program; the root
//   is the only instance without a parent.
// Failure modes: unknown reactor classes, unresolvable or overflowing bank
//   widths, and nesting beyond `MAX_DEPTH` produce `CodegenError`.
// Side effects: none.

use crate::error::CodegenError;
use crate::id::{InstanceId, ReactorId};
use crate::model::{Instantiation, Program, Reactor, Value, WidthSpec, WidthTerm};

/// Maximum instantiation depth below the root.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactorInstance {
    pub id: InstanceId,
    pub name: String,
    pub reactor: ReactorId,
    pub bank_index: Option<u32>,
    pub parent: Option<InstanceId>,
    pub children: Vec<InstanceId>,
}

#[derive(Debug, Clone)]
pub struct InstanceTree {
    instances: Vec<ReactorInstance>,
    root: InstanceId,
}

impl InstanceTree {
    /// Elaborate from the program's main reactor.
    pub fn elaborate(program: &Program) -> Result<Self, CodegenError> {
        let main = program.main_reactor().ok_or(CodegenError::NoMainReactor)?;
        Self::elaborate_from(program, main)
    }

    /// Elaborate with `top` as the root instance.
    pub fn elaborate_from(program: &Program, top: ReactorId) -> Result<Self, CodegenError> {
        let mut tree = InstanceTree {
            instances: Vec::new(),
            root: InstanceId(0),
        };
        let name = program.reactor(top).name.to_lowercase();
        let root = tree.push(name, top, None, None);
        tree.root = root;
        tree.elaborate_children(program, root, 0)?;
        tracing::debug!(
            root = %program.reactor(top).name,
            instances = tree.instances.len(),
            "elaborated instance tree"
        );
        Ok(tree)
    }

    fn push(
        &mut self,
        name: String,
        reactor: ReactorId,
        bank_index: Option<u32>,
        parent: Option<InstanceId>,
    ) -> InstanceId {
        let id = InstanceId(self.instances.len() as u32);
        self.instances.push(ReactorInstance {
            id,
            name,
            reactor,
            bank_index,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.instances[parent.index()].children.push(id);
        }
        id
    }

    fn elaborate_children(
        &mut self,
        program: &Program,
        parent: InstanceId,
        depth: usize,
    ) -> Result<(), CodegenError> {
        let reactor = program.reactor(self.get(parent).reactor);
        if depth >= MAX_DEPTH && !reactor.instantiations.is_empty() {
            return Err(CodegenError::InstantiationTooDeep {
                reactor: reactor.name.clone(),
                limit: MAX_DEPTH,
            });
        }
        for inst in &reactor.instantiations {
            let class = program
                .reactor_id(&inst.reactor_class)
                .ok_or_else(|| CodegenError::UnknownReactor(inst.reactor_class.clone()))?;
            match &inst.width {
                Some(width) => {
                    let n = resolve_width(width, inst, reactor)?;
                    for bank in 0..n {
                        let child = self.push(inst.name.clone(), class, Some(bank), Some(parent));
                        self.elaborate_children(program, child, depth + 1)?;
                    }
                }
                None => {
                    let child = self.push(inst.name.clone(), class, None, Some(parent));
                    self.elaborate_children(program, child, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> InstanceId {
        self.root
    }

    pub fn get(&self, id: InstanceId) -> &ReactorInstance {
        &self.instances[id.index()]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactorInstance> {
        self.instances.iter()
    }

    /// Ancestor of `id` that sits directly below the root. `None` for the
    /// root itself.
    pub fn top_level_ancestor(&self, id: InstanceId) -> Option<InstanceId> {
        let mut current = id;
        loop {
            let parent = self.get(current).parent?;
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
    }

    /// Dotted path from the root, with bank subscripts (`main.c[1].sink`).
    pub fn full_name(&self, id: InstanceId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let inst = self.get(cur);
            segments.push(match inst.bank_index {
                Some(bank) => format!("{}[{}]", inst.name, bank),
                None => inst.name.clone(),
            });
            current = inst.parent;
        }
        segments.reverse();
        segments.join(".")
    }
}

/// Sum of width terms. Parameter terms use the enclosing reactor's
/// parameter default, which must be a single non-negative integer literal.
fn resolve_width(
    width: &WidthSpec,
    inst: &Instantiation,
    enclosing: &Reactor,
) -> Result<u32, CodegenError> {
    let mut total = 0u32;
    for term in &width.terms {
        let n = match term {
            WidthTerm::Literal(n) => *n,
            WidthTerm::Parameter(name) => {
                let unresolved = || CodegenError::UnresolvedWidth {
                    instantiation: inst.name.clone(),
                    parameter: name.clone(),
                };
                match enclosing.parameter(name).map(|p| p.init.as_slice()) {
                    Some([Value::Literal(text)]) => {
                        text.trim().parse::<u32>().map_err(|_| unresolved())?
                    }
                    _ => return Err(unresolved()),
                }
            }
        };
        total = total
            .checked_add(n)
            .ok_or_else(|| CodegenError::WidthOverflow {
                instantiation: inst.name.clone(),
            })?;
    }
    Ok(total)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;

    fn instantiate(name: &str, class: &str, width: Option<WidthSpec>) -> Instantiation {
        Instantiation {
            name: name.to_string(),
            reactor_class: class.to_string(),
            width,
            parameters: Vec::new(),
        }
    }

    fn banked_program(width: WidthSpec) -> Program {
        let leaf = Reactor::new("Leaf");
        let mut mid = Reactor::new("Mid");
        mid.instantiations.push(instantiate("leaf", "Leaf", None));
        let mut main = Reactor::new("Main");
        main.is_main = true;
        main.parameters.push(Parameter {
            name: "n".to_string(),
            ty: None,
            init: vec![Value::literal("3")],
        });
        main.instantiations.push(instantiate("m", "Mid", Some(width)));
        Program::new(vec![leaf, mid, main])
    }

    #[test]
    fn banks_expand_to_indexed_siblings() {
        let program = banked_program(WidthSpec::literal(2));
        let tree = InstanceTree::elaborate(&program).unwrap();
        // main, m[0], m[0].leaf, m[1], m[1].leaf
        assert_eq!(tree.len(), 5);
        let root = tree.get(tree.root());
        assert_eq!(root.children.len(), 2);
        let banks: Vec<Option<u32>> = root
            .children
            .iter()
            .map(|&c| tree.get(c).bank_index)
            .collect();
        assert_eq!(banks, vec![Some(0), Some(1)]);
        let leaf = tree.get(root.children[1]).children[0];
        assert_eq!(tree.full_name(leaf), "main.m[1].leaf");
        assert_eq!(tree.top_level_ancestor(leaf), Some(root.children[1]));
        assert_eq!(tree.top_level_ancestor(tree.root()), None);
    }

    #[test]
    fn parameter_width_uses_default() {
        let program = banked_program(WidthSpec {
            terms: vec![WidthTerm::Parameter("n".to_string()), WidthTerm::Literal(1)],
        });
        let tree = InstanceTree::elaborate(&program).unwrap();
        assert_eq!(tree.get(tree.root()).children.len(), 4);
    }

    #[test]
    fn unknown_width_parameter_is_an_error() {
        let program = banked_program(WidthSpec::parameter("missing"));
        let err = InstanceTree::elaborate(&program).unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnresolvedWidth {
                instantiation: "m".to_string(),
                parameter: "missing".to_string(),
            }
        );
    }

    #[test]
    fn overflowing_width_is_an_error() {
        let program = banked_program(WidthSpec {
            terms: vec![WidthTerm::Literal(u32::MAX), WidthTerm::Parameter("n".to_string())],
        });
        let err = InstanceTree::elaborate(&program).unwrap_err();
        assert_eq!(
            err,
            CodegenError::WidthOverflow {
                instantiation: "m".to_string(),
            }
        );
        assert_eq!(err.code(), crate::diag::codes::E0108);
    }

    #[test]
    fn unknown_class_is_an_error() {
        let mut main = Reactor::new("Main");
        main.is_main = true;
        main.instantiations.push(instantiate("x", "Nowhere", None));
        let err = InstanceTree::elaborate(&Program::new(vec![main])).unwrap_err();
        assert_eq!(err, CodegenError::UnknownReactor("Nowhere".to_string()));
    }

    #[test]
    fn missing_main_is_an_error() {
        let err = InstanceTree::elaborate(&Program::new(vec![Reactor::new("A")])).unwrap_err();
        assert_eq!(err, CodegenError::NoMainReactor);
    }

    #[test]
    fn recursive_instantiation_stops_at_depth_limit() {
        let mut looped = Reactor::new("Loop");
        looped.is_main = true;
        looped.instantiations.push(instantiate("again", "Loop", None));
        let err = InstanceTree::elaborate(&Program::new(vec![looped])).unwrap_err();
        assert!(matches!(err, CodegenError::InstantiationTooDeep { .. }));
    }
}
