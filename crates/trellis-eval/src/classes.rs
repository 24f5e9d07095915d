//! Class registry, mixin linearization and hierarchy cycle detection.

use std::collections::HashMap;

use log::debug;
use petgraph::{algo::tarjan_scc, graph::DiGraph};
use trellis_core::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use crate::{
    attributes,
    decl::{Attribute, ClassDecl},
    scope::{ScopeId, ScopeTree},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ClassId(usize);

impl ClassId {
    #[cfg(test)]
    pub fn new(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug)]
struct ClassEntry<'a> {
    decl: &'a ClassDecl,
    parents: Vec<ClassId>,
    attributes: Vec<&'a Attribute>,
}

/// Every class definition seen during one evaluation.
#[derive(Debug, Default)]
pub(crate) struct ClassTable<'a> {
    entries: Vec<ClassEntry<'a>>,
}

impl<'a> ClassTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decl(&self, id: ClassId) -> &'a ClassDecl {
        self.entries[id.0].decl
    }

    /// The class's own attributes that passed validation.
    pub fn attributes(&self, id: ClassId) -> &[&'a Attribute] {
        &self.entries[id.0].attributes
    }

    /// Registers the classes declared directly in one scope.
    ///
    /// All classes of a scope are registered before any of their parents
    /// are resolved, so a class may name a parent declared later in the
    /// same body.
    pub fn register(
        &mut self,
        scopes: &mut ScopeTree,
        scope: ScopeId,
        decls: &[&'a ClassDecl],
        diagnostics: &mut DiagnosticCollector,
    ) {
        let mut registered = Vec::with_capacity(decls.len());
        for &decl in decls {
            let id = ClassId(self.entries.len());
            self.entries.push(ClassEntry {
                decl,
                parents: Vec::new(),
                attributes: attributes::validated(decl.attributes(), diagnostics),
            });
            match scopes.bind_class(scope, decl.name().as_str(), id) {
                Ok(()) => registered.push(id),
                Err(existing) => diagnostics.emit(
                    Diagnostic::error(format!(
                        "class `{}` is defined multiple times",
                        decl.name()
                    ))
                    .with_code(ErrorCode::E204)
                    .with_label(decl.name().span(), "duplicate definition")
                    .with_secondary_label(self.decl(existing).name().span(), "first defined here"),
                ),
            }
        }

        for &id in &registered {
            let decl = self.decl(id);
            let mut parents = Vec::with_capacity(decl.parents().len());
            for parent in decl.parents() {
                match scopes.lookup_class(scope, parent.as_str()) {
                    Some(parent_id) => parents.push(parent_id),
                    None => diagnostics.emit(
                        Diagnostic::error(format!("cannot find class `{parent}`"))
                            .with_code(ErrorCode::E101)
                            .with_label(parent.span(), "not found")
                            .with_secondary_label(decl.name().span(), "in parents of this class"),
                    ),
                }
            }
            self.entries[id.0].parents = parents;
        }

        self.break_cycles(&registered, diagnostics);
        debug!(classes = registered.len(); "Registered classes");
    }

    /// Depth-first mixin order of several classes in listed order: parents
    /// (recursively) come before the class itself.
    ///
    /// A class reachable along more than one path appears once, at its
    /// first position, so its default body is instantiated only once.
    pub fn linearize_all(&self, ids: &[ClassId]) -> Vec<ClassId> {
        let mut order = Vec::new();
        for &id in ids {
            self.linearize_into(id, &mut order);
        }
        order
    }

    fn linearize_into(&self, id: ClassId, order: &mut Vec<ClassId>) {
        for &parent in &self.entries[id.0].parents {
            self.linearize_into(parent, order);
        }
        if !order.contains(&id) {
            order.push(id);
        }
    }

    /// Reports every cycle among `ids` and drops the parent links that form
    /// it, so later linearization always terminates.
    ///
    /// Parents resolved from an enclosing scope cannot see the classes of
    /// this scope, so cycles never span scopes.
    fn break_cycles(&mut self, ids: &[ClassId], diagnostics: &mut DiagnosticCollector) {
        let mut graph = DiGraph::<ClassId, ()>::new();
        let indices: HashMap<ClassId, _> = ids.iter().map(|&id| (id, graph.add_node(id))).collect();
        for &id in ids {
            for parent in &self.entries[id.0].parents {
                if let Some(&target) = indices.get(parent) {
                    graph.add_edge(indices[&id], target, ());
                }
            }
        }

        for component in tarjan_scc(&graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| graph.contains_edge(n, n));
            if !is_cycle {
                continue;
            }

            let mut members: Vec<ClassId> = component.iter().map(|&n| graph[n]).collect();
            members.sort();
            let names: Vec<String> = members
                .iter()
                .map(|&id| format!("`{}`", self.decl(id).name()))
                .collect();

            let first = self.decl(members[0]);
            let mut diag = Diagnostic::error(format!(
                "cyclic class hierarchy: {}",
                names.join(" -> ")
            ))
            .with_code(ErrorCode::E200)
            .with_label(first.name().span(), "class inherits from itself")
            .with_help("remove one of the parent references to break the cycle");
            for &id in &members[1..] {
                diag = diag.with_secondary_label(self.decl(id).name().span(), "part of the cycle");
            }
            diagnostics.emit(diag);

            for &id in &members {
                self.entries[id.0]
                    .parents
                    .retain(|parent| !members.contains(parent));
            }
        }
    }
}
