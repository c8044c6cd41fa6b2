//! Scope-aware index of variable bindings.
//!
//! One traversal records every `Ident` binding together with the span of the
//! scope it belongs to and its initializer expression. Lookups then answer
//! "which declaration does this use of `name` see" without re-walking the
//! tree: the innermost enclosing scope whose binding textually precedes the
//! use wins.
//!
//! Names that are ever reassigned anywhere in the file are treated as
//! unresolvable. That is coarser than real data-flow, but a migration must
//! never rewrite a literal it is not certain about.

use std::collections::{HashMap, HashSet};

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignExpr, AssignTarget, BlockStmt, CatchClause, Expr, Function, Param, Pat,
    Program, SimpleAssignTarget, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    /// Start of the declarator, for textual-precedence checks.
    pub decl_pos: BytePos,
    /// Span of the enclosing scope.
    pub scope: Span,
    /// Initializer, when the binding has one and is a plain `Ident` pattern.
    pub init: Option<Expr>,
}

#[derive(Default)]
pub struct BindingIndex {
    bindings: HashMap<String, Vec<Binding>>,
    reassigned: HashSet<String>,
}

impl BindingIndex {
    pub fn collect(program: &Program) -> Self {
        let mut collector = Collector {
            index: BindingIndex::default(),
            scopes: vec![program.span()],
        };
        program.visit_with(&mut collector);
        collector.index
    }

    /// Resolves a use of `name` at `use_pos` to the binding it sees.
    ///
    /// Returns `None` for reassigned names and for forward references, so
    /// callers fall through to "unresolvable" instead of guessing.
    pub fn lookup(&self, name: &str, use_pos: BytePos) -> Option<&Binding> {
        if self.reassigned.contains(name) {
            return None;
        }
        self.bindings
            .get(name)?
            .iter()
            .filter(|b| b.scope.lo <= use_pos && use_pos <= b.scope.hi && b.decl_pos < use_pos)
            .max_by_key(|b| b.scope.lo)
    }
}

struct Collector {
    index: BindingIndex,
    scopes: Vec<Span>,
}

impl Collector {
    fn current_scope(&self) -> Span {
        *self.scopes.last().unwrap()
    }

    fn record(&mut self, name: &str, decl_pos: BytePos, init: Option<Expr>) {
        let scope = self.current_scope();
        self.index
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(Binding {
                name: name.to_string(),
                decl_pos,
                scope,
                init,
            });
    }

    /// Parameters and destructured names are recorded without initializers;
    /// they shadow outer bindings but never resolve to a literal.
    fn record_pat(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(ident) => self.record(ident.id.sym.as_str(), pat.span().lo, None),
            Pat::Array(arr) => {
                for elem in arr.elems.iter().flatten() {
                    self.record_pat(elem);
                }
            }
            Pat::Object(obj) => {
                for prop in &obj.props {
                    match prop {
                        swc_ecma_ast::ObjectPatProp::KeyValue(kv) => self.record_pat(&kv.value),
                        swc_ecma_ast::ObjectPatProp::Assign(a) => {
                            self.record(a.key.sym.as_str(), a.span.lo, None);
                        }
                        swc_ecma_ast::ObjectPatProp::Rest(r) => self.record_pat(&r.arg),
                    }
                }
            }
            Pat::Assign(a) => self.record_pat(&a.left),
            Pat::Rest(r) => self.record_pat(&r.arg),
            Pat::Invalid(_) | Pat::Expr(_) => {}
        }
    }
}

impl Visit for Collector {
    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Ident(ident) = &node.name {
            let init = node.init.as_deref().cloned();
            self.record(ident.id.sym.as_str(), node.span.lo, init);
        } else {
            self.record_pat(&node.name);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        self.scopes.push(node.span);
        for Param { pat, .. } in &node.params {
            self.record_pat(pat);
        }
        node.visit_children_with(self);
        self.scopes.pop();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.scopes.push(node.span);
        for pat in &node.params {
            self.record_pat(pat);
        }
        node.visit_children_with(self);
        self.scopes.pop();
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        self.scopes.push(node.span);
        node.visit_children_with(self);
        self.scopes.pop();
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        self.scopes.push(node.span());
        if let Some(param) = &node.param {
            self.record_pat(param);
        }
        node.visit_children_with(self);
        self.scopes.pop();
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        if let AssignTarget::Simple(SimpleAssignTarget::Ident(ident)) = &node.left {
            self.index.reassigned.insert(ident.id.sym.to_string());
        }
        node.visit_children_with(self);
    }
}
