//! Fluent key derivation for legacy message keys.
//!
//! A legacy key migrates to `kebab-case(prefix-base)`. All entries sharing a
//! base key (the part before the first `.`) must land on one Fluent message,
//! so a previously resolved base is always reused verbatim. Fresh candidates
//! first try dropping a trailing numeral (usually a legacy naming artifact),
//! then take `-2`, `-3`, … suffixes until free.

/// Splits a legacy key into base and attribute at the first `.`.
pub fn split_attr(prop_key: &str) -> (&str, Option<&str>) {
    match prop_key.split_once('.') {
        Some((base, attr)) => (base, Some(attr)),
        None => (prop_key, None),
    }
}

/// Resolves the Fluent identifier for a base key.
///
/// `reuse` is the identifier previously chosen for the same base, if any;
/// `exists` reports collisions against both the target resource body and the
/// keys already resolved in this pass.
pub fn resolve_ftl_key<F>(base: &str, prefix: &str, reuse: Option<&str>, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    if let Some(prev) = reuse {
        return prev.to_string();
    }

    let joined = if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{prefix}-{base}")
    };
    let mut key = kebab_case(&joined);

    // Try to drop a numerical suffix.
    if let Some(pos) = numeral_suffix_start(&key) {
        let bare = &key[..pos];
        if !bare.is_empty() && !exists(bare) {
            key = bare.to_string();
        }
    }

    // If required, add a numerical suffix.
    let mut n = 1;
    while exists(&key) {
        n += 1;
        let stem = numeral_suffix_start(&key)
            .map(|pos| key[..pos].to_string())
            .unwrap_or_else(|| key.clone());
        key = format!("{stem}-{n}");
    }
    key
}

/// Byte offset where a trailing `-<digits>` suffix begins, if present.
fn numeral_suffix_start(key: &str) -> Option<usize> {
    let trimmed = key.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == key.len() || !trimmed.ends_with('-') {
        return None;
    }
    Some(trimmed.len() - 1)
}

/// Lodash-style kebab-casing: words split on case and digit boundaries,
/// joined by hyphens, lowercased.
pub fn kebab_case(s: &str) -> String {
    #[derive(PartialEq, Clone, Copy)]
    enum Kind {
        Upper,
        Lower,
        Digit,
        Other,
    }
    fn kind(c: char) -> Kind {
        if c.is_uppercase() {
            Kind::Upper
        } else if c.is_lowercase() {
            Kind::Lower
        } else if c.is_ascii_digit() {
            Kind::Digit
        } else {
            Kind::Other
        }
    }

    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut prev: Option<Kind> = None;

    for i in 0..chars.len() {
        let c = chars[i];
        let k = kind(c);
        if k == Kind::Other {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            prev = None;
            continue;
        }
        if let Some(prev) = prev
            && !word.is_empty()
        {
            let boundary = match (prev, k) {
                (Kind::Lower, Kind::Upper) => true,
                (Kind::Digit, Kind::Upper | Kind::Lower) => true,
                (Kind::Upper | Kind::Lower, Kind::Digit) => true,
                // End of an acronym: "FTLPath" -> "ftl", "path"
                (Kind::Upper, Kind::Upper)
                    if chars.get(i + 1).map(|n| kind(*n)) == Some(Kind::Lower) =>
                {
                    true
                }
                _ => false,
            };
            if boundary {
                words.push(std::mem::take(&mut word));
            }
        }
        word.extend(c.to_lowercase());
        prev = Some(k);
    }
    if !word.is_empty() {
        words.push(word);
    }
    words.join("-")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn kebab_cases_common_shapes() {
        assert_eq!(kebab_case("saveLink"), "save-link");
        assert_eq!(kebab_case("save_link_2"), "save-link-2");
        assert_eq!(kebab_case("FTLPath"), "ftl-path");
        assert_eq!(kebab_case("saveURL"), "save-url");
        assert_eq!(kebab_case("saveLink2"), "save-link-2");
        assert_eq!(kebab_case("app-greet"), "app-greet");
    }

    #[test]
    fn splits_attribute_at_first_dot() {
        assert_eq!(split_attr("greet"), ("greet", None));
        assert_eq!(split_attr("greet.tooltip"), ("greet", Some("tooltip")));
        assert_eq!(split_attr("a.b.c"), ("a", Some("b.c")));
    }

    #[test]
    fn reuse_wins_over_everything() {
        let key = resolve_ftl_key("greet", "app", Some("app-greet"), |_| true);
        assert_eq!(key, "app-greet");
    }

    #[test]
    fn resolver_is_idempotent_given_same_state() {
        let exists = |_: &str| false;
        assert_eq!(resolve_ftl_key("greet", "app", None, exists), "app-greet");
        assert_eq!(resolve_ftl_key("greet", "app", None, exists), "app-greet");
    }

    #[test]
    fn colliding_batch_gets_numeric_suffixes() {
        let mut taken: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        for _ in 0..3 {
            let key = resolve_ftl_key("a", "", None, |k| taken.contains(k));
            taken.insert(key.clone());
            out.push(key);
        }
        assert_eq!(out, vec!["a", "a-2", "a-3"]);
    }

    #[test]
    fn numeral_suffix_is_dropped_when_free() {
        let key = resolve_ftl_key("saveLink2", "", None, |_| false);
        assert_eq!(key, "save-link");
    }

    #[test]
    fn numeral_suffix_is_kept_when_bare_form_collides() {
        let key = resolve_ftl_key("saveLink2", "", None, |k| k == "save-link");
        assert_eq!(key, "save-link-2");
    }

    #[test]
    fn suffix_increments_replace_rather_than_stack() {
        let taken: HashSet<&str> = ["save-link", "save-link-2"].into_iter().collect();
        let key = resolve_ftl_key("saveLink", "", None, |k| taken.contains(k));
        assert_eq!(key, "save-link-3");
    }
}
