//! Builds Fluent messages from legacy entries, one value or attribute at a
//! time, migrating their documentation comments along.
//!
//! The first entry for a base key creates the message; later `base.attr`
//! entries append attributes to it. Placeholder substitutions mine the legacy
//! comment for variable descriptions: the text right after a placeholder
//! token becomes the description in a generated `Variables:` block, with
//! `FIXME` standing in where nothing usable is found.

use std::sync::LazyLock;

use fluent_syntax::ast;
use regex::Regex;

use super::pattern::{PlaceholderUse, translate_pattern, translate_plural};
use super::resource::message_index;
use crate::migrate::prop_data::MessageMigration;
use crate::migrate::transform::{
    AttrTransform, MessageTransform, PatternTransform, Replacement,
};

static DESC_LEAD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(is\s*)?").unwrap());
static DESC_TAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[;,.]?\s*$").unwrap());
static TRAILING_WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\n|\s*$").unwrap());

/// Adds one legacy entry to the target resource and transform list.
pub fn add_fluent_pattern(
    ftl: &mut ast::Resource<String>,
    transforms: &mut Vec<MessageTransform>,
    prop_key: &str,
    value: &str,
    comment: Option<String>,
    migration: &MessageMigration,
) {
    let (pattern, uses, transform) = translate_entry(prop_key, value, migration);
    let comment = migrate_comment(comment, &uses);

    let idx = message_index(ftl, &migration.ftl_key).unwrap_or_else(|| {
        ftl.body.push(ast::Entry::Message(ast::Message {
            id: ast::Identifier {
                name: migration.ftl_key.clone(),
            },
            value: None,
            attributes: Vec::new(),
            comment: None,
        }));
        ftl.body.len() - 1
    });
    let ast::Entry::Message(msg) = &mut ftl.body[idx] else {
        unreachable!("message_index only returns message entries");
    };

    let mt_idx = transforms
        .iter()
        .position(|mt| mt.id == migration.ftl_key)
        .unwrap_or_else(|| {
            transforms.push(MessageTransform {
                id: migration.ftl_key.clone(),
                value: None,
                attrs: Vec::new(),
            });
            transforms.len() - 1
        });
    let mt = &mut transforms[mt_idx];

    match &migration.attr {
        Some(attr) => {
            msg.attributes.push(ast::Attribute {
                id: ast::Identifier { name: attr.clone() },
                value: pattern,
            });
            if let Some(comment) = comment {
                let prefixed = format!(".{attr}: {comment}");
                append_comment(&mut msg.comment, &prefixed);
            }
            mt.attrs.push(AttrTransform {
                name: attr.clone(),
                transform,
            });
        }
        None => {
            msg.value = Some(pattern);
            if let Some(comment) = comment {
                msg.comment = Some(ast::Comment {
                    content: comment.lines().map(str::to_string).collect(),
                });
            }
            mt.value = Some(transform);
        }
    }
}

fn translate_entry(
    prop_key: &str,
    value: &str,
    migration: &MessageMigration,
) -> (ast::Pattern<String>, Vec<PlaceholderUse>, PatternTransform) {
    if let Some(selector) = migration.plural.name() {
        let (pattern, uses) = translate_plural(value, selector, &migration.var_names);
        let map = replacement_map(&uses);
        let transform = PatternTransform::Plurals {
            source: prop_key.to_string(),
            selector: selector.to_string(),
            map,
        };
        return (pattern, uses, transform);
    }

    let t = translate_pattern(&value.replace("\\;", ";"), &migration.var_names);
    let transform = if t.uses.is_empty() {
        PatternTransform::Copy {
            source: prop_key.to_string(),
        }
    } else {
        PatternTransform::Replace {
            source: prop_key.to_string(),
            map: replacement_map(&t.uses),
        }
    };
    (t.pattern, t.uses, transform)
}

fn replacement_map(uses: &[PlaceholderUse]) -> Vec<Replacement> {
    uses.iter()
        .map(|u| Replacement {
            from: u.normalized.clone(),
            to: u.name.clone(),
        })
        .collect()
}

/// Splices variable descriptions out of the legacy comment and into a
/// `Variables:` block. Without placeholders the comment passes through.
fn migrate_comment(comment: Option<String>, uses: &[PlaceholderUse]) -> Option<String> {
    if uses.is_empty() {
        return comment;
    }

    let mut cc = comment.unwrap_or_default();
    let mut vc = String::from("Variables:");
    for u in uses {
        let mut desc = String::from("FIXME");
        let re = Regex::new(&format!("{}([^%\n]+)", regex::escape(&u.token))).unwrap();
        if let Some(caps) = re.captures(&cc) {
            let found = caps.get(1).unwrap().as_str();
            let lead_trimmed = DESC_LEAD.replace(found, "");
            desc = DESC_TAIL.replace(&lead_trimmed, ".").into_owned();
            let whole = caps.get(0).unwrap();
            cc.replace_range(whole.start()..whole.end(), "");
        }
        vc.push_str(&format!("\n  ${} (String): {}", u.name, desc));
    }

    let body = TRAILING_WS.replace_all(&cc, "\n");
    Some(format!("{body}{vc}").trim().to_string())
}

fn append_comment(slot: &mut Option<ast::Comment<String>>, text: &str) {
    let lines = text.lines().map(str::to_string);
    match slot {
        Some(comment) => comment.content.extend(lines),
        None => {
            *slot = Some(ast::Comment {
                content: lines.collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::fluent::serialize_resource;
    use crate::migrate::prop_data::PluralSelector;

    fn migration(ftl_key: &str, attr: Option<&str>, vars: &[&str]) -> MessageMigration {
        MessageMigration {
            ftl_key: ftl_key.to_string(),
            attr: attr.map(str::to_string),
            plural: PluralSelector::NotPlural,
            var_names: vars.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn value_then_attribute_share_one_entry() {
        let mut ftl = ast::Resource { body: Vec::new() };
        let mut transforms = Vec::new();

        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet",
            "Hello %S",
            None,
            &migration("app-greet", None, &["var1"]),
        );
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet.tooltip",
            "Info",
            None,
            &migration("app-greet", Some("tooltip"), &[]),
        );

        assert_eq!(ftl.body.len(), 1);
        let ast::Entry::Message(msg) = &ftl.body[0] else {
            panic!("expected a message");
        };
        assert!(msg.value.is_some());
        assert_eq!(msg.attributes.len(), 1);
        assert_eq!(msg.attributes[0].id.name, "tooltip");

        assert_eq!(transforms.len(), 1);
        assert!(matches!(
            transforms[0].value,
            Some(PatternTransform::Replace { .. })
        ));
        assert!(matches!(
            transforms[0].attrs[0].transform,
            PatternTransform::Copy { .. }
        ));

        let out = serialize_resource(&ftl);
        assert_eq!(
            out,
            "# Variables:\n#   $var1 (String): FIXME\napp-greet = Hello { $var1 }\n    .tooltip = Info\n"
        );
    }

    #[test]
    fn comment_text_after_placeholder_becomes_description() {
        let mut ftl = ast::Resource { body: Vec::new() };
        let mut transforms = Vec::new();
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet",
            "Hello %S",
            Some("%S is the user's name".to_string()),
            &migration("app-greet", None, &["var1"]),
        );
        let ast::Entry::Message(msg) = &ftl.body[0] else {
            panic!("expected a message");
        };
        let comment = msg.comment.as_ref().unwrap();
        assert_eq!(
            comment.content,
            vec!["Variables:", "  $var1 (String): the user's name."]
        );
    }

    #[test]
    fn missing_description_defaults_to_fixme() {
        let mut ftl = ast::Resource { body: Vec::new() };
        let mut transforms = Vec::new();
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet",
            "Hello %S",
            None,
            &migration("app-greet", None, &["var1"]),
        );
        let ast::Entry::Message(msg) = &ftl.body[0] else {
            panic!("expected a message");
        };
        assert_eq!(
            msg.comment.as_ref().unwrap().content,
            vec!["Variables:", "  $var1 (String): FIXME"]
        );
    }

    #[test]
    fn attribute_comments_append_with_prefix() {
        let mut ftl = ast::Resource { body: Vec::new() };
        let mut transforms = Vec::new();
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet",
            "Hello",
            Some("Greeting shown at startup".to_string()),
            &migration("app-greet", None, &[]),
        );
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "greet.tooltip",
            "Info",
            Some("Hover text".to_string()),
            &migration("app-greet", Some("tooltip"), &[]),
        );
        let ast::Entry::Message(msg) = &ftl.body[0] else {
            panic!("expected a message");
        };
        assert_eq!(
            msg.comment.as_ref().unwrap().content,
            vec!["Greeting shown at startup", ".tooltip: Hover text"]
        );
    }

    #[test]
    fn plural_entry_serializes_as_select() {
        let mut ftl = ast::Resource { body: Vec::new() };
        let mut transforms = Vec::new();
        let mig = MessageMigration {
            ftl_key: "app-files".to_string(),
            attr: None,
            plural: PluralSelector::Named("count".to_string()),
            var_names: vec!["count".to_string()],
        };
        add_fluent_pattern(
            &mut ftl,
            &mut transforms,
            "files",
            "one file;%S files",
            None,
            &mig,
        );
        let out = serialize_resource(&ftl);
        assert!(out.contains("{ $count ->"));
        assert!(out.contains("[one] one file"));
        assert!(out.contains("*[other] { $count } files"));
        assert!(matches!(
            transforms[0].value,
            Some(PatternTransform::Plurals { .. })
        ));
    }
}
