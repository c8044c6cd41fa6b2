//! Translates printf-style legacy message patterns into Fluent patterns.
//!
//! Legacy strings substitute positionally: `%S` takes the next sequential
//! position, `%1$S` names an explicit 1-based position. Each position becomes
//! a Fluent variable placeable; the text in between becomes literal elements.
//!
//! The translation is lossless over the source text: concatenating the
//! literal elements and the matched placeholder tokens in order reproduces
//! the input string exactly.

use std::sync::LazyLock;

use fluent_syntax::ast;
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%(\d+\$)?S").unwrap());

/// One placeholder occurrence in a legacy string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderUse {
    /// The token as matched, e.g. `%S`.
    pub token: String,
    /// The token in explicit-index form, e.g. `%1$S`.
    pub normalized: String,
    /// 1-based variable position.
    pub index: usize,
    /// Variable name bound to the position.
    pub name: String,
}

/// A translated pattern plus the placeholder substitutions that produced it.
#[derive(Debug)]
pub struct TranslatedPattern {
    pub pattern: ast::Pattern<String>,
    pub uses: Vec<PlaceholderUse>,
}

/// Translates one legacy pattern. `var_names[i]` names position `i + 1`;
/// positions past the end get the deterministic default `var{N}`.
pub fn translate_pattern(source: &str, var_names: &[String]) -> TranslatedPattern {
    let mut elements = Vec::new();
    let mut uses = Vec::new();
    let mut done = 0;
    let mut num = 0;

    for m in PLACEHOLDER.captures_iter(source) {
        let whole = m.get(0).unwrap();
        if whole.start() > done {
            elements.push(ast::PatternElement::TextElement {
                value: source[done..whole.start()].to_string(),
            });
        }
        num = explicit_index(m.get(1)).unwrap_or(num + 1);
        let name = var_names
            .get(num - 1)
            .cloned()
            .unwrap_or_else(|| format!("var{num}"));
        elements.push(ast::PatternElement::Placeable {
            expression: variable(&name),
        });
        uses.push(PlaceholderUse {
            token: whole.as_str().to_string(),
            normalized: format!("%{num}$S"),
            index: num,
            name,
        });
        done = whole.end();
    }
    if done < source.len() {
        elements.push(ast::PatternElement::TextElement {
            value: source[done..].to_string(),
        });
    }

    TranslatedPattern {
        pattern: ast::Pattern { elements },
        uses,
    }
}

/// Builds a two-variant select pattern from a plural string.
///
/// The string splits at the first unescaped `;` into the `one` and `other`
/// cases; the `other` case is the default variant. An empty first case is
/// omitted entirely. Returns the variants' placeholder uses in case order.
pub fn translate_plural(
    source: &str,
    selector: &str,
    var_names: &[String],
) -> (ast::Pattern<String>, Vec<PlaceholderUse>) {
    let (case_one, case_other) = split_plural_cases(source);

    let mut variants = Vec::new();
    let mut uses = Vec::new();

    if let Some(one) = case_one {
        let t = translate_pattern(&one, var_names);
        variants.push(ast::Variant {
            key: variant_key("one"),
            value: t.pattern,
            default: false,
        });
        uses.extend(t.uses);
    }

    let other = translate_pattern(&case_other, var_names);
    variants.push(ast::Variant {
        key: variant_key("other"),
        value: other.pattern,
        default: true,
    });
    uses.extend(other.uses);

    let select = ast::Expression::Select {
        selector: ast::InlineExpression::VariableReference {
            id: ast::Identifier {
                name: selector.to_string(),
            },
        },
        variants,
    };
    let pattern = ast::Pattern {
        elements: vec![ast::PatternElement::Placeable { expression: select }],
    };
    (pattern, uses)
}

/// Splits a plural string at the first unescaped `;`, unescaping `\;` in the
/// resulting cases. A missing or empty first case yields `None`.
fn split_plural_cases(source: &str) -> (Option<String>, String) {
    let mut prev_backslash = false;
    for (i, c) in source.char_indices() {
        match c {
            ';' if !prev_backslash => {
                let one = unescape_semis(&source[..i]);
                let other = unescape_semis(&source[i + 1..]);
                return ((!one.is_empty()).then_some(one), other);
            }
            '\\' => prev_backslash = !prev_backslash,
            _ => prev_backslash = false,
        }
    }
    (None, unescape_semis(source))
}

fn unescape_semis(s: &str) -> String {
    s.replace("\\;", ";")
}

/// Highest placeholder position used by a legacy string, counting all plural
/// cases independently.
pub fn count_placeholders(source: &str) -> usize {
    let mut max = 0;
    let mut num = 0;
    for m in PLACEHOLDER.captures_iter(source) {
        num = explicit_index(m.get(1)).unwrap_or(num + 1);
        max = max.max(num);
    }
    max
}

/// Position named by an explicit-index capture. `%0$S` is not a valid
/// position; it falls back to sequential numbering like a bare `%S`.
fn explicit_index(capture: Option<regex::Match<'_>>) -> Option<usize> {
    capture
        .and_then(|idx| idx.as_str().trim_end_matches('$').parse().ok())
        .filter(|n| *n >= 1)
}

fn variable(name: &str) -> ast::Expression<String> {
    ast::Expression::Inline(ast::InlineExpression::VariableReference {
        id: ast::Identifier {
            name: name.to_string(),
        },
    })
}

fn variant_key(name: &str) -> ast::VariantKey<String> {
    ast::VariantKey::Identifier {
        name: name.to_string(),
    }
}
