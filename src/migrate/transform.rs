//! Transform descriptors and the generated Python migration script.
//!
//! Each migrated pattern is described independently of the produced FTL as a
//! COPY / REPLACE / PLURALS record, so an equivalent `fluent.migrate` recipe
//! can be regenerated for the localization pipeline. Output is ugly and is
//! expected to be prettified by an external formatter.

use std::path::Path;

/// One placeholder substitution: legacy token to Fluent variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// How a single legacy pattern became a Fluent pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTransform {
    Copy {
        source: String,
    },
    Replace {
        source: String,
        map: Vec<Replacement>,
    },
    Plurals {
        source: String,
        selector: String,
        map: Vec<Replacement>,
    },
}

#[derive(Debug, Clone)]
pub struct AttrTransform {
    pub name: String,
    pub transform: PatternTransform,
}

/// All transforms contributing to one Fluent message.
#[derive(Debug, Clone)]
pub struct MessageTransform {
    pub id: String,
    pub value: Option<PatternTransform>,
    pub attrs: Vec<AttrTransform>,
}

#[derive(Debug, Clone)]
pub struct ScriptMeta {
    pub bug: String,
    pub title: String,
}

#[derive(Default)]
struct Imports {
    helpers: Vec<&'static str>,
    transforms: Vec<&'static str>,
}

impl Imports {
    fn helper(&mut self, name: &'static str) {
        if !self.helpers.contains(&name) {
            self.helpers.push(name);
        }
    }
    fn transform(&mut self, name: &'static str) {
        if !self.transforms.contains(&name) {
            self.transforms.push(name);
        }
    }
}

/// Renders the migration script for one source/target file pair.
pub fn stringify_transforms(
    root: &Path,
    prop_path: &Path,
    ftl_target: &Path,
    transforms: &[MessageTransform],
    meta: &ScriptMeta,
) -> String {
    let source = l10n_path(root, prop_path);
    let target = l10n_path(root, ftl_target);

    let mut imports = Imports::default();
    let messages: Vec<String> = transforms
        .iter()
        .map(|mt| {
            let mut body = vec![format!("id=FTL.Identifier({})", py_str(&mt.id))];
            if let Some(value) = &mt.value {
                body.push(format!("value={}", compile_pattern(value, &mut imports)));
            }
            if !mt.attrs.is_empty() {
                let attrs: Vec<String> = mt
                    .attrs
                    .iter()
                    .map(|a| {
                        format!(
                            "FTL.Attribute(id=FTL.Identifier({}), value={})",
                            py_str(&a.name),
                            compile_pattern(&a.transform, &mut imports)
                        )
                    })
                    .collect();
                body.push(format!("attributes=[{}]", attrs.join(", ")));
            }
            format!("FTL.Message({})", body.join(", "))
        })
        .collect();

    let mut import_lines = vec!["import fluent.syntax.ast as FTL".to_string()];
    for (module, names) in [
        ("helpers", &imports.helpers),
        ("transforms", &imports.transforms),
    ] {
        if !names.is_empty() {
            let mut sorted = names.clone();
            sorted.sort_unstable();
            import_lines.push(format!(
                "from fluent.migrate.{module} import {}",
                sorted.join(", ")
            ));
        }
    }

    format!(
        "\
# Any copyright is dedicated to the Public Domain.
# http://creativecommons.org/publicdomain/zero/1.0/

{imports}

def migrate(ctx):
  \"\"\"Bug {bug} - {title}, part {{index}}.\"\"\"

  source = {source}
  target = {target}
  ctx.add_transforms(target, target, [{transforms}])
",
        imports = import_lines.join("\n"),
        bug = meta.bug,
        title = meta.title,
        source = py_str(&source),
        target = py_str(&target),
        transforms = messages.join(", "),
    )
}

fn compile_pattern(pt: &PatternTransform, imports: &mut Imports) -> String {
    match pt {
        PatternTransform::Copy { source } => {
            imports.transform("COPY");
            format!("COPY(source, {})", py_str(source))
        }
        PatternTransform::Replace { source, map } => {
            imports.transform("REPLACE");
            imports.helper("VARIABLE_REFERENCE");
            format!(
                "REPLACE(source, {}, {{ {} }})",
                py_str(source),
                compile_map(map)
            )
        }
        PatternTransform::Plurals {
            source,
            selector,
            map,
        } => {
            imports.transform("PLURALS");
            imports.helper("VARIABLE_REFERENCE");
            let mut args = vec![format!("VARIABLE_REFERENCE({})", py_str(selector))];
            if !map.is_empty() {
                imports.transform("REPLACE_IN_TEXT");
                args.push(format!(
                    "lambda text: REPLACE_IN_TEXT(text, {{ {} }})",
                    compile_map(map)
                ));
            }
            format!("PLURALS(source, {}, {})", py_str(source), args.join(", "))
        }
    }
}

fn compile_map(map: &[Replacement]) -> String {
    map.iter()
        .map(|r| format!("{}: VARIABLE_REFERENCE({})", py_str(&r.from), py_str(&r.to)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Path as the l10n pipeline sees it: root-relative, `/`-separated, with the
/// `locales/en-US` segment removed.
fn l10n_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    joined.replace("/locales/en-US", "")
}

fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
