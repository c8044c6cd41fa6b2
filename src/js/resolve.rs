//! Resolves an expression to the string literal it is guaranteed to hold.
//!
//! Follows `const` chains and single-level object-literal member access, each
//! hop revalidated against the binding index. Anything short of certainty
//! resolves to `None`; the caller flags the site for manual work instead of
//! rewriting it.

use std::collections::HashSet;

use swc_common::Span;
use swc_ecma_ast::{Expr, Lit, MemberProp, Prop, PropName, PropOrSpread};

use super::bindings::BindingIndex;

/// A string literal an expression resolved to. The span points at the literal
/// itself, which may live far from the expression that was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLiteral {
    pub span: Span,
    pub value: String,
}

const MAX_HOPS: usize = 8;

pub fn find_source_literal(expr: &Expr, bindings: &BindingIndex) -> Option<ResolvedLiteral> {
    resolve(expr, bindings, &mut HashSet::new(), 0)
}

fn resolve(
    expr: &Expr,
    bindings: &BindingIndex,
    visited: &mut HashSet<(String, u32)>,
    hops: usize,
) -> Option<ResolvedLiteral> {
    if hops > MAX_HOPS {
        return None;
    }
    match expr {
        Expr::Paren(paren) => resolve(&paren.expr, bindings, visited, hops),
        Expr::Lit(Lit::Str(s)) => Some(ResolvedLiteral {
            span: s.span,
            value: s.value.as_str()?.to_string(),
        }),
        Expr::Ident(ident) => {
            let binding = bindings.lookup(ident.sym.as_str(), ident.span.lo)?;
            if !visited.insert((binding.name.clone(), binding.decl_pos.0)) {
                return None;
            }
            resolve(binding.init.as_ref()?, bindings, visited, hops + 1)
        }
        Expr::Member(member) => {
            let Expr::Ident(obj) = &*member.obj else {
                return None;
            };
            let MemberProp::Ident(prop) = &member.prop else {
                return None;
            };
            let binding = bindings.lookup(obj.sym.as_str(), obj.span.lo)?;
            if !visited.insert((binding.name.clone(), binding.decl_pos.0)) {
                return None;
            }
            let Some(Expr::Object(object)) = binding.init.as_ref() else {
                return None;
            };
            object_member(object, prop.sym.as_str(), bindings, visited, hops)
        }
        _ => None,
    }
}

fn object_member(
    object: &swc_ecma_ast::ObjectLit,
    name: &str,
    bindings: &BindingIndex,
    visited: &mut HashSet<(String, u32)>,
    hops: usize,
) -> Option<ResolvedLiteral> {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            // A spread may overwrite anything; give up on the whole object.
            return None;
        };
        match &**prop {
            Prop::KeyValue(kv) => {
                let key = match &kv.key {
                    PropName::Ident(ident) => ident.sym.as_str(),
                    PropName::Str(s) => s.value.as_str()?,
                    _ => continue,
                };
                if key == name {
                    return resolve(&kv.value, bindings, visited, hops + 1);
                }
            }
            Prop::Shorthand(ident) if ident.sym.as_str() == name => {
                let binding = bindings.lookup(ident.sym.as_str(), ident.span.lo)?;
                if !visited.insert((binding.name.clone(), binding.decl_pos.0)) {
                    return None;
                }
                return resolve(binding.init.as_ref()?, bindings, visited, hops + 1);
            }
            _ => {}
        }
    }
    None
}
