//! Lexical scopes and endpoint name resolution.
//!
//! Every region is a scope. A name is looked up first among the direct
//! bindings of the starting scope, then inside the scopes of anonymous
//! nodes below it, level by level. If nothing is found the same search is
//! repeated from each enclosing scope up to the root. Named nodes are a
//! barrier: their bindings are only reachable from inside them.

use indexmap::IndexMap;
use trellis_core::{ir::NodeId, span::Name};

use crate::classes::ClassId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScopeId(usize);

/// A node name bound in a scope.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Binding {
    pub node: NodeId,
    pub name: Name,
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    bindings: IndexMap<String, Binding>,
    anonymous_children: Vec<ScopeId>,
    classes: IndexMap<String, ClassId>,
}

/// Why a name could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResolveError {
    NotFound,
    /// Several anonymous nodes at the same depth bind the name.
    Ambiguous(Vec<Binding>),
}

/// Arena of all scopes of one evaluation.
#[derive(Debug)]
pub(crate) struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates a tree containing only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Adds the scope of a node's region below `parent`.
    pub fn add_child(&mut self, parent: ScopeId, anonymous: bool) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        if anonymous {
            self.scopes[parent.0].anonymous_children.push(id);
        }
        id
    }

    /// Binds a node name. Returns the existing binding if the name is taken.
    pub fn bind(&mut self, scope: ScopeId, name: &Name, node: NodeId) -> Result<(), Binding> {
        let bindings = &mut self.scopes[scope.0].bindings;
        if let Some(existing) = bindings.get(name.as_str()) {
            return Err(existing.clone());
        }
        bindings.insert(
            name.as_str().to_string(),
            Binding {
                node,
                name: name.clone(),
            },
        );
        Ok(())
    }

    /// Registers a class name. Returns the existing class if the name is taken.
    pub fn bind_class(&mut self, scope: ScopeId, name: &str, class: ClassId) -> Result<(), ClassId> {
        let classes = &mut self.scopes[scope.0].classes;
        if let Some(existing) = classes.get(name) {
            return Err(*existing);
        }
        classes.insert(name.to_string(), class);
        Ok(())
    }

    /// Finds the nearest class with this name, walking outward.
    pub fn lookup_class(&self, scope: ScopeId, name: &str) -> Option<ClassId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(class) = scope.classes.get(name) {
                return Some(*class);
            }
            current = scope.parent;
        }
        None
    }

    /// Resolves an endpoint name as seen from `scope`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<Binding, ResolveError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            match self.search_down(id, name) {
                Ok(binding) => return Ok(binding),
                Err(ResolveError::NotFound) => current = self.scopes[id.0].parent,
                Err(ambiguous) => return Err(ambiguous),
            }
        }
        Err(ResolveError::NotFound)
    }

    /// Searches `scope` and, breadth first, the scopes of anonymous nodes
    /// below it. The shallowest level with a match decides.
    fn search_down(&self, scope: ScopeId, name: &str) -> Result<Binding, ResolveError> {
        let mut level = vec![scope];
        while !level.is_empty() {
            let mut found: Vec<Binding> = level
                .iter()
                .filter_map(|id| self.scopes[id.0].bindings.get(name).cloned())
                .collect();
            match found.len() {
                0 => {}
                1 => return Ok(found.remove(0)),
                _ => return Err(ResolveError::Ambiguous(found)),
            }
            level = level
                .iter()
                .flat_map(|id| self.scopes[id.0].anonymous_children.iter().copied())
                .collect();
        }
        Err(ResolveError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::span::Span;

    use super::*;

    fn name(text: &str) -> Name {
        Name::new(text, Span::default())
    }

    #[test]
    fn test_direct_binding() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.bind(root, &name("a"), NodeId::new(1)).unwrap();
        assert_eq!(tree.resolve(root, "a").unwrap().node, NodeId::new(1));
        assert_eq!(tree.resolve(root, "b"), Err(ResolveError::NotFound));
    }

    #[test]
    fn test_duplicate_binding_is_rejected() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.bind(root, &name("a"), NodeId::new(1)).unwrap();
        let existing = tree.bind(root, &name("a"), NodeId::new(2)).unwrap_err();
        assert_eq!(existing.node, NodeId::new(1));
    }

    #[test]
    fn test_bubbling_through_anonymous_chain() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let anon1 = tree.add_child(root, true);
        let anon2 = tree.add_child(anon1, true);
        tree.bind(anon2, &name("deep"), NodeId::new(5)).unwrap();

        assert_eq!(tree.resolve(root, "deep").unwrap().node, NodeId::new(5));
    }

    #[test]
    fn test_named_node_hides_its_bindings() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let named = tree.add_child(root, false);
        tree.bind(named, &name("inner"), NodeId::new(3)).unwrap();

        assert_eq!(tree.resolve(root, "inner"), Err(ResolveError::NotFound));
        assert_eq!(tree.resolve(named, "inner").unwrap().node, NodeId::new(3));
    }

    #[test]
    fn test_outward_retry_and_shadowing() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        tree.bind(root, &name("foo"), NodeId::new(1)).unwrap();
        let named = tree.add_child(root, false);
        let nested = tree.add_child(named, false);
        tree.bind(named, &name("foo"), NodeId::new(2)).unwrap();

        assert_eq!(tree.resolve(nested, "foo").unwrap().node, NodeId::new(2));
        assert_eq!(tree.resolve(root, "foo").unwrap().node, NodeId::new(1));
    }

    #[test]
    fn test_direct_binding_wins_over_anonymous_descendant() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let anon = tree.add_child(root, true);
        tree.bind(anon, &name("x"), NodeId::new(2)).unwrap();
        tree.bind(root, &name("x"), NodeId::new(1)).unwrap();

        assert_eq!(tree.resolve(root, "x").unwrap().node, NodeId::new(1));
    }

    #[test]
    fn test_ambiguous_anonymous_siblings() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let left = tree.add_child(root, true);
        let right = tree.add_child(root, true);
        tree.bind(left, &name("x"), NodeId::new(1)).unwrap();
        tree.bind(right, &name("x"), NodeId::new(2)).unwrap();

        match tree.resolve(root, "x") {
            Err(ResolveError::Ambiguous(found)) => assert_eq!(found.len(), 2),
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_shallower_anonymous_match_wins() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let shallow = tree.add_child(root, true);
        let other = tree.add_child(root, true);
        let deep = tree.add_child(other, true);
        tree.bind(shallow, &name("x"), NodeId::new(1)).unwrap();
        tree.bind(deep, &name("x"), NodeId::new(2)).unwrap();

        assert_eq!(tree.resolve(root, "x").unwrap().node, NodeId::new(1));
    }

    #[test]
    fn test_class_lookup_walks_outward() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let child = tree.add_child(root, false);
        tree.bind_class(root, "box", ClassId::new(0)).unwrap();
        tree.bind_class(child, "box", ClassId::new(1)).unwrap();

        assert_eq!(tree.lookup_class(child, "box"), Some(ClassId::new(1)));
        assert_eq!(tree.lookup_class(root, "box"), Some(ClassId::new(0)));
        assert_eq!(tree.lookup_class(root, "none"), None);
        assert_eq!(tree.bind_class(root, "box", ClassId::new(2)), Err(ClassId::new(0)));
    }
}
