//! First pass: class instantiation and name binding.
//!
//! Walks the declaration tree, merges attributes into [`Config`]s, gives
//! every object a [`NodeId`] and binds names into the scope tree. Lines are
//! only styled here; their endpoints are resolved once every name of the
//! document is bound.

use std::collections::HashSet;

use log::debug;
use trellis_core::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    ir::{Config, NodeId},
    span::{Name, Span},
};

use crate::{
    attributes::{AttributeMap, LineStyle, Target},
    classes::{ClassId, ClassTable},
    config::EvaluateConfig,
    decl::{ClassDecl, Declaration, Document, LineDecl, ObjectDecl},
    scope::{ScopeId, ScopeTree},
};

pub(crate) struct ExpandedRegion<'a> {
    pub scope: ScopeId,
    pub items: Vec<ExpandedItem<'a>>,
}

pub(crate) enum ExpandedItem<'a> {
    Node(ExpandedNode<'a>),
    Line(ExpandedLine<'a>),
}

pub(crate) struct ExpandedNode<'a> {
    pub id: NodeId,
    pub name: Option<Name>,
    pub span: Span,
    pub config: Config,
    pub region: ExpandedRegion<'a>,
}

pub(crate) struct ExpandedLine<'a> {
    pub decl: &'a LineDecl,
    pub style: LineStyle,
    pub from_class: bool,
}

/// Problems reported for class-provided declarations.
///
/// A class body is expanded once per instance, so the same problem at the
/// same location reaches the collector only the first time.
#[derive(Debug, Default)]
pub(crate) struct ClassReports {
    seen: HashSet<(Option<ErrorCode>, Option<Span>, String)>,
}

impl ClassReports {
    pub fn forward(&mut self, produced: DiagnosticCollector, into: &mut DiagnosticCollector) {
        for diagnostic in produced.into_diagnostics() {
            let key = (
                diagnostic.code(),
                diagnostic.primary_span(),
                diagnostic.message().to_string(),
            );
            if self.seen.insert(key) {
                into.emit(diagnostic);
            }
        }
    }
}

/// A declaration of a body, remembering whether a class supplied it.
#[derive(Clone, Copy)]
struct BodyItem<'a> {
    decl: &'a Declaration,
    from_class: bool,
}

pub(crate) struct Expander<'a, 'd> {
    config: &'a EvaluateConfig,
    scopes: ScopeTree,
    classes: ClassTable<'a>,
    next_node: u32,
    reports: ClassReports,
    diagnostics: &'d mut DiagnosticCollector,
}

impl<'a, 'd> Expander<'a, 'd> {
    pub fn new(config: &'a EvaluateConfig, diagnostics: &'d mut DiagnosticCollector) -> Self {
        Self {
            config,
            scopes: ScopeTree::new(),
            classes: ClassTable::new(),
            next_node: 0,
            reports: ClassReports::default(),
            diagnostics,
        }
    }

    /// Expands the document; returns the root configuration and region.
    pub fn expand_document(&mut self, document: &'a Document) -> (Config, ExpandedRegion<'a>) {
        let mut attributes = AttributeMap::new();
        attributes.apply_inline(document.attributes(), Target::Object, self.diagnostics);
        let root_config = attributes.node_config(self.config.root());

        let items: Vec<BodyItem<'a>> = document
            .declarations()
            .iter()
            .map(|decl| BodyItem {
                decl,
                from_class: false,
            })
            .collect();
        let root = self.scopes.root();
        let region = self.expand_body(&items, root, &mut Vec::new(), false);
        (root_config, region)
    }

    /// Consumes the expander, returning the scope tree for resolution and
    /// the class-body reports already forwarded.
    pub fn finish(self) -> (ScopeTree, ClassReports) {
        debug!(nodes = self.next_node; "Expansion finished");
        (self.scopes, self.reports)
    }

    /// Runs `expand` with diagnostics routed through [`ClassReports`].
    fn class_provided<T>(&mut self, expand: impl FnOnce(&mut Self) -> T) -> T {
        let outer = std::mem::take(&mut *self.diagnostics);
        let result = expand(self);
        let produced = std::mem::replace(&mut *self.diagnostics, outer);
        self.reports.forward(produced, self.diagnostics);
        result
    }

    /// Expands one body. Inside a class body (`in_class`) every declaration
    /// counts as class-provided, however deeply it is nested.
    fn expand_body(
        &mut self,
        items: &[BodyItem<'a>],
        scope: ScopeId,
        stack: &mut Vec<ClassId>,
        in_class: bool,
    ) -> ExpandedRegion<'a> {
        let class_decls: Vec<&'a ClassDecl> = items
            .iter()
            .filter_map(|item| match item.decl {
                Declaration::Class(class) => Some(class),
                _ => None,
            })
            .collect();
        if !class_decls.is_empty() {
            let provided = !in_class
                && items
                    .iter()
                    .any(|item| item.from_class && matches!(item.decl, Declaration::Class(_)));
            let register = |this: &mut Self| {
                this.classes
                    .register(&mut this.scopes, scope, &class_decls, this.diagnostics)
            };
            if provided {
                self.class_provided(register);
            } else {
                register(self);
            }
        }

        let mut region = ExpandedRegion {
            scope,
            items: Vec::with_capacity(items.len()),
        };
        for item in items {
            let from_class = in_class || item.from_class;
            let expanded = match item.decl {
                Declaration::Class(_) => None,
                Declaration::Object(object) => {
                    let mut expand =
                        |this: &mut Self| this.expand_object(object, from_class, scope, stack);
                    let node = if from_class && !in_class {
                        self.class_provided(expand)
                    } else {
                        expand(self)
                    };
                    node.map(ExpandedItem::Node)
                }
                Declaration::Line(line) => {
                    let expand = |this: &mut Self| this.expand_line(line, from_class, scope);
                    let line = if from_class && !in_class {
                        self.class_provided(expand)
                    } else {
                        expand(self)
                    };
                    Some(ExpandedItem::Line(line))
                }
            };
            region.items.extend(expanded);
        }
        region
    }

    fn expand_object(
        &mut self,
        object: &'a ObjectDecl,
        from_class: bool,
        scope: ScopeId,
        stack: &mut Vec<ClassId>,
    ) -> Option<ExpandedNode<'a>> {
        let direct = self.resolve_classes(object.classes(), scope);
        let linearized = self.classes.linearize_all(&direct);

        if from_class {
            if let Some(&recursive) = linearized.iter().find(|id| stack.contains(id)) {
                let class = self.classes.decl(recursive);
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "class `{}` instantiates itself through its default body",
                        class.name()
                    ))
                    .with_code(ErrorCode::E201)
                    .with_label(object.span(), "recursive instantiation")
                    .with_secondary_label(class.name().span(), "class defined here"),
                );
                return None;
            }
        }

        let mut attributes = AttributeMap::new();
        for &class in &linearized {
            attributes.apply_class(self.classes.decl(class).name(), self.classes.attributes(class));
        }
        attributes.apply_inline(object.attributes(), Target::Object, self.diagnostics);
        let config = attributes.node_config(self.config.node());

        let id = NodeId::new(self.next_node);
        self.next_node += 1;

        if let Some(name) = object.name() {
            if let Err(existing) = self.scopes.bind(scope, name, id) {
                self.diagnostics.emit(
                    Diagnostic::error(format!("`{name}` is defined multiple times in this scope"))
                        .with_code(ErrorCode::E203)
                        .with_label(name.span(), "duplicate definition")
                        .with_secondary_label(existing.name.span(), "first defined here")
                        .with_help("lines refer to the first definition"),
                );
            }
        }

        let body = self.instance_body(&linearized, object);
        let child_scope = self.scopes.add_child(scope, object.name().is_none());

        let depth = stack.len();
        stack.extend(linearized.iter().copied());
        let region = self.expand_body(&body, child_scope, stack, from_class);
        stack.truncate(depth);

        Some(ExpandedNode {
            id,
            name: object.name().cloned(),
            span: object.span(),
            config,
            region,
        })
    }

    /// Class default bodies in mixin order, then the instance's own body.
    ///
    /// An own object sharing its name with a class-provided object takes
    /// that object's place.
    fn instance_body(&self, classes: &[ClassId], object: &'a ObjectDecl) -> Vec<BodyItem<'a>> {
        let mut body: Vec<BodyItem<'a>> = classes
            .iter()
            .flat_map(|&class| self.classes.decl(class).body())
            .map(|decl| BodyItem {
                decl,
                from_class: true,
            })
            .collect();

        for decl in object.body() {
            let own = BodyItem {
                decl,
                from_class: false,
            };
            let replaced = object_name(decl).and_then(|name| {
                body.iter()
                    .position(|item| item.from_class && object_name(item.decl) == Some(name))
            });
            match replaced {
                Some(position) => body[position] = own,
                None => body.push(own),
            }
        }
        body
    }

    fn expand_line(
        &mut self,
        line: &'a LineDecl,
        from_class: bool,
        scope: ScopeId,
    ) -> ExpandedLine<'a> {
        let direct = self.resolve_classes(line.classes(), scope);
        let linearized = self.classes.linearize_all(&direct);

        let mut attributes = AttributeMap::new();
        for &class in &linearized {
            attributes.apply_class(self.classes.decl(class).name(), self.classes.attributes(class));
        }
        attributes.apply_inline(line.attributes(), Target::Line, self.diagnostics);

        ExpandedLine {
            decl: line,
            style: attributes.line_style(self.config.line()),
            from_class,
        }
    }

    fn resolve_classes(&mut self, names: &[Name], scope: ScopeId) -> Vec<ClassId> {
        names
            .iter()
            .filter_map(|name| {
                let found = self.scopes.lookup_class(scope, name.as_str());
                if found.is_none() {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("cannot find class `{name}`"))
                            .with_code(ErrorCode::E101)
                            .with_label(name.span(), "not found"),
                    );
                }
                found
            })
            .collect()
    }
}

fn object_name(decl: &Declaration) -> Option<&str> {
    match decl {
        Declaration::Object(object) => object.name().map(Name::as_str),
        _ => None,
    }
}
