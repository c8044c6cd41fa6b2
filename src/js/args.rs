//! Turns positional formatter argument arrays into named-argument objects.
//!
//! `formatStringFromName(key, [a, b])` carries its arguments by position;
//! Fluent wants `{ name: a, other: b }`. Names come from the migration's
//! variable list where a position is already known, and are inferred from the
//! argument expression past that. An array held in a variable is rewritten at
//! its initializer instead, once, no matter how many call sites share it.

use std::collections::HashMap;

use swc_common::Spanned;
use swc_ecma_ast::{Expr, ExprOrSpread, MemberProp, Prop, PropName, PropOrSpread};

use super::bindings::BindingIndex;
use super::edit::TextEdit;
use super::parser::ParsedJs;

/// Outcome of normalizing one argument expression.
pub enum FormatArgs {
    Named {
        /// Text for the argument position in the rewritten call.
        text: String,
        /// Variable name per original position.
        names: Vec<String>,
        /// Edit for an array initializer living outside the call.
        remote_edit: Option<TextEdit>,
    },
    Unresolved,
}

#[derive(Default)]
pub struct ArgNormalizer {
    /// Array literals already rewritten, by span, with the names they got.
    normalized: HashMap<(u32, u32), Vec<String>>,
}

impl ArgNormalizer {
    pub fn normalize(
        &mut self,
        arg: &Expr,
        src: &ParsedJs,
        bindings: &BindingIndex,
        known_names: &[String],
    ) -> FormatArgs {
        match unparen(arg) {
            Expr::Array(array) => {
                match self.normalize_array(array, src, known_names) {
                    Some((text, names)) => FormatArgs::Named {
                        text,
                        names,
                        remote_edit: None,
                    },
                    None => FormatArgs::Unresolved,
                }
            }
            Expr::Object(object) => match object_names(object) {
                Some(names) => FormatArgs::Named {
                    text: src.span_text(arg.span()).to_string(),
                    names,
                    remote_edit: None,
                },
                None => FormatArgs::Unresolved,
            },
            Expr::Ident(ident) => {
                let Some(binding) = bindings.lookup(ident.sym.as_str(), ident.span.lo) else {
                    return FormatArgs::Unresolved;
                };
                let Some(Expr::Array(array)) = binding.init.as_ref() else {
                    return FormatArgs::Unresolved;
                };
                let key = (array.span.lo.0, array.span.hi.0);
                if let Some(names) = self.normalized.get(&key) {
                    return FormatArgs::Named {
                        text: src.span_text(arg.span()).to_string(),
                        names: names.clone(),
                        remote_edit: None,
                    };
                }
                match self.normalize_array(array, src, known_names) {
                    Some((text, names)) => FormatArgs::Named {
                        text: src.span_text(arg.span()).to_string(),
                        names,
                        remote_edit: Some(TextEdit::replace(array.span, text)),
                    },
                    None => FormatArgs::Unresolved,
                }
            }
            _ => FormatArgs::Unresolved,
        }
    }

    /// Builds the object-literal text for an array literal. `None` when the
    /// array is empty or holds holes or spreads.
    fn normalize_array(
        &mut self,
        array: &swc_ecma_ast::ArrayLit,
        src: &ParsedJs,
        known_names: &[String],
    ) -> Option<(String, Vec<String>)> {
        if array.elems.is_empty() {
            return None;
        }

        let mut names: Vec<String> = Vec::with_capacity(array.elems.len());
        let mut fields: Vec<String> = Vec::with_capacity(array.elems.len());
        for (i, elem) in array.elems.iter().enumerate() {
            let Some(ExprOrSpread { spread: None, expr }) = elem else {
                return None;
            };
            let fallback = format!("var{}", i + 1);
            let name = match known_names.get(i) {
                Some(known) => known.clone(),
                None => infer_arg_name(unparen(expr))
                    .filter(|n| !names.contains(n))
                    .unwrap_or(fallback),
            };
            let text = src.span_text(expr.span());
            if name == text {
                fields.push(name.clone());
            } else {
                fields.push(format!("{name}: {text}"));
            }
            names.push(name);
        }

        let text = format!("{{ {} }}", fields.join(", "));
        self.normalized
            .insert((array.span.lo.0, array.span.hi.0), names.clone());
        Some((text, names))
    }
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        other => other,
    }
}

/// Names of an already-named argument object, when all its properties are
/// plain keyed or shorthand properties.
fn object_names(object: &swc_ecma_ast::ObjectLit) -> Option<Vec<String>> {
    let mut names = Vec::with_capacity(object.props.len());
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        match &**prop {
            Prop::Shorthand(ident) => names.push(ident.sym.to_string()),
            Prop::KeyValue(kv) => match &kv.key {
                PropName::Ident(ident) => names.push(ident.sym.to_string()),
                PropName::Str(s) => names.push(s.value.as_str()?.to_string()),
                _ => return None,
            },
            _ => return None,
        }
    }
    Some(names)
}

/// A Fluent variable name the argument expression suggests for itself.
fn infer_arg_name(expr: &Expr) -> Option<String> {
    let raw = match expr {
        Expr::Ident(ident) => ident.sym.to_string(),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(ident) => ident.sym.to_string(),
            _ => return None,
        },
        // String(count), formatNumber(total): name after the one argument.
        Expr::Call(call) if call.args.len() == 1 && call.args[0].spread.is_none() => {
            return infer_arg_name(unparen(&call.args[0].expr));
        }
        _ => return None,
    };
    let trimmed = raw.trim_end_matches(|c: char| c.is_ascii_digit());
    let name = if trimmed.is_empty() { &raw } else { trimmed };
    valid_var_name(name).then(|| name.to_string())
}

/// Fluent identifier: ASCII letter first, then letters, digits, `_` or `-`.
fn valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
