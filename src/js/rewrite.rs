//! The call-site rewriter.
//!
//! One traversal over the program matches legacy string-bundle calls against
//! a fixed method table, resolves their key arguments, drives the key and
//! argument migration, and plans the replacement text. Sites that cannot be
//! migrated safely are flagged with an in-source marker and reported by line
//! instead of being guessed at.
//!
//! Sync or async rewriting follows the nearest enclosing function: an already
//! `async` context gets `formatValue`/`formatMessages`, everything else gets
//! the `Sync` forms. Functions are never forced asynchronous, since doing so
//! across unknown call graphs is unsafe.

use std::collections::{BTreeSet, HashMap, HashSet};

use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{ArrowExpr, CallExpr, Callee, Expr, Function, MemberExpr, MemberProp};
use swc_ecma_visit::{Visit, VisitWith};

use super::args::{ArgNormalizer, FormatArgs};
use super::bindings::BindingIndex;
use super::edit::TextEdit;
use super::parser::ParsedJs;
use super::resolve::find_source_literal;
use crate::migrate::prop_data::{PluralConfig, PropData};

pub const FIXME_MARKER: &str = "/* L10N-FIXME */";

/// What one rewriting pass over a program found.
#[derive(Debug, Default)]
pub struct PassReport {
    /// Bundle constructions rewritten to `new Localization(...)`.
    pub migrated_bundles: usize,
    /// Lines needing manual attention, sorted and deduplicated.
    pub fixme_lines: Vec<usize>,
}

/// Plans all call-site rewrites for one program against the given resources.
/// Key migrations and sync requirements accumulate on the `PropData`s.
pub fn rewrite_program(
    src: &ParsedJs,
    bindings: &BindingIndex,
    props: &mut [PropData],
    plural: &PluralConfig,
) -> (Vec<TextEdit>, PassReport) {
    let mut rewriter = CallSiteRewriter {
        src,
        bindings,
        props,
        plural,
        edits: Vec::new(),
        bundle_sites: Vec::new(),
        key_literals: HashMap::new(),
        rewritten_literals: HashSet::new(),
        marker_inserts: HashSet::new(),
        normalizer: ArgNormalizer::default(),
        async_stack: Vec::new(),
        fixme_lines: BTreeSet::new(),
    };
    src.program.visit_with(&mut rewriter);
    rewriter.finish()
}

/// A key literal already bound to a migration earlier in the pass.
#[derive(Clone)]
struct CallSiteBinding {
    prop_idx: usize,
    legacy_key: String,
}

/// A rewritten bundle construction; finalized after the pass, when it is
/// known whether the bundle needs synchronous formatting.
struct BundleSite {
    span: Span,
    prop_idx: usize,
    key_text: String,
}

struct CallSiteRewriter<'a> {
    src: &'a ParsedJs,
    bindings: &'a BindingIndex,
    props: &'a mut [PropData],
    plural: &'a PluralConfig,
    edits: Vec<TextEdit>,
    bundle_sites: Vec<BundleSite>,
    key_literals: HashMap<(u32, u32), CallSiteBinding>,
    rewritten_literals: HashSet<(u32, u32)>,
    marker_inserts: HashSet<u32>,
    normalizer: ArgNormalizer,
    async_stack: Vec<bool>,
    fixme_lines: BTreeSet<usize>,
}

impl CallSiteRewriter<'_> {
    fn finish(mut self) -> (Vec<TextEdit>, PassReport) {
        let migrated_bundles = self.bundle_sites.len();
        for site in self.bundle_sites {
            let text = if self.props[site.prop_idx].requires_sync {
                format!("new Localization([{}], true)", site.key_text)
            } else {
                format!("new Localization([{}])", site.key_text)
            };
            self.edits.push(TextEdit::replace(site.span, text));
        }
        let report = PassReport {
            migrated_bundles,
            fixme_lines: self.fixme_lines.into_iter().collect(),
        };
        (self.edits, report)
    }

    fn flag(&mut self, pos: BytePos) {
        self.fixme_lines.insert(self.src.line_of(pos));
    }

    /// Flags a site that is not being rewritten, marking it in place unless
    /// the line already carries a marker.
    fn flag_with_marker(&mut self, pos: BytePos) {
        self.flag(pos);
        if self.marker_inserts.insert(pos.0) && !self.src.line_text(pos).contains("L10N-FIXME") {
            self.edits.push(TextEdit::insert(pos, format!("{FIXME_MARKER} ")));
        }
    }

    /// Text of an argument whose inner literal is being rewritten. An inline
    /// literal is spliced into the returned text; a remote one gets its own
    /// edit, queued once no matter how many sites share it.
    fn arg_text_rewriting_literal(
        &mut self,
        arg_span: Span,
        lit_span: Span,
        new_text: &str,
    ) -> String {
        let arg_text = self.src.span_text(arg_span);
        if arg_span.lo <= lit_span.lo && lit_span.hi <= arg_span.hi {
            let lo = (lit_span.lo.0 - arg_span.lo.0) as usize;
            let hi = (lit_span.hi.0 - arg_span.lo.0) as usize;
            format!("{}{}{}", &arg_text[..lo], new_text, &arg_text[hi..])
        } else {
            if self.rewritten_literals.insert((lit_span.lo.0, lit_span.hi.0)) {
                self.edits.push(TextEdit::replace(lit_span, new_text));
            }
            arg_text.to_string()
        }
    }

    fn rewrite_create_bundle(&mut self, call: &CallExpr) {
        let key_arg = &call.args[0].expr;
        let Some(lit) = find_source_literal(key_arg, self.bindings) else {
            self.flag_with_marker(key_arg.span().lo);
            return;
        };
        let Some(prop_idx) = self
            .props
            .iter()
            .position(|p| p.uri.as_deref() == Some(lit.value.as_str()))
        else {
            return;
        };
        let Some(ftl_path) = self.props[prop_idx].meta.ftl_path.clone() else {
            return;
        };
        let key_text =
            self.arg_text_rewriting_literal(key_arg.span(), lit.span, &js_str(&ftl_path));
        self.bundle_sites.push(BundleSite {
            span: call.span,
            prop_idx,
            key_text,
        });
    }

    fn rewrite_format_call(&mut self, call: &CallExpr, member: &MemberExpr, expected_args: usize) {
        if call.args.len() != expected_args || call.args.iter().any(|a| a.spread.is_some()) {
            self.flag_with_marker(call.span.lo);
            return;
        }

        let key_arg = &call.args[0].expr;
        let mut flag_key = false;
        let mut site: Option<CallSiteBinding> = None;
        let mut key_text = self.src.span_text(key_arg.span()).to_string();

        match find_source_literal(key_arg, self.bindings) {
            None => flag_key = true,
            Some(lit) => {
                let lit_key = (lit.span.lo.0, lit.span.hi.0);
                if let Some(known) = self.key_literals.get(&lit_key) {
                    // Every site reached through a shared key variable needs
                    // the attribute check, not just the first one.
                    if let Some(m) = self.props[known.prop_idx].migration(&known.legacy_key)
                        && m.attr.is_some()
                        && !(key_arg.span().lo <= lit.span.lo
                            && lit.span.hi <= key_arg.span().hi)
                    {
                        flag_key = true;
                    }
                    site = Some(known.clone());
                } else {
                    let matches: Vec<usize> = self
                        .props
                        .iter()
                        .enumerate()
                        .filter(|(_, p)| p.msg_keys.iter().any(|k| *k == lit.value))
                        .map(|(i, _)| i)
                        .collect();
                    match matches.as_slice() {
                        [idx] if self.props[*idx].has_ftl() => {
                            let idx = *idx;
                            let migration =
                                self.props[idx].migrate_message(&lit.value, self.plural);
                            // A key variable shared with other code can only be
                            // rewritten to the bare message id; an attribute
                            // access grafted onto it needs human eyes.
                            if migration.attr.is_some()
                                && !(key_arg.span().lo <= lit.span.lo
                                    && lit.span.hi <= key_arg.span().hi)
                            {
                                flag_key = true;
                            }
                            key_text = self.arg_text_rewriting_literal(
                                key_arg.span(),
                                lit.span,
                                &js_str(&migration.ftl_key),
                            );
                            let binding = CallSiteBinding {
                                prop_idx: idx,
                                legacy_key: lit.value.clone(),
                            };
                            self.key_literals.insert(lit_key, binding.clone());
                            site = Some(binding);
                        }
                        // One match but its resource has no migration target.
                        [_] => return,
                        _ => flag_key = true,
                    }
                }
            }
        }

        let Some(binding) = site else {
            // Unresolvable or ambiguous key, nothing to rewrite against.
            self.flag_with_marker(key_arg.span().lo);
            return;
        };
        if flag_key {
            self.flag(key_arg.span().lo);
            key_text = format!("{FIXME_MARKER} {key_text}");
        }

        let migration = match self.props[binding.prop_idx].migration(&binding.legacy_key) {
            Some(m) => m.clone(),
            None => self.props[binding.prop_idx].migrate_message(&binding.legacy_key, self.plural),
        };

        let mut args_text: Option<String> = None;
        if let Some(value_arg) = call.args.get(1) {
            match self.normalizer.normalize(
                &value_arg.expr,
                self.src,
                self.bindings,
                &migration.var_names,
            ) {
                FormatArgs::Named {
                    text,
                    names,
                    remote_edit,
                } => {
                    if let Some(edit) = remote_edit {
                        self.edits.push(edit);
                    }
                    self.props[binding.prop_idx].extend_var_names(&binding.legacy_key, &names);
                    args_text = Some(text);
                }
                FormatArgs::Unresolved => {
                    self.flag(value_arg.span().lo);
                    let original = self.src.span_text(value_arg.span());
                    args_text = Some(format!("{FIXME_MARKER} {original}"));
                }
            }
        }

        let is_async = self.async_stack.last().copied().unwrap_or(false);
        let recv = self.src.span_text(member.obj.span());
        let replacement = match &migration.attr {
            None => {
                let args = args_text.map(|t| format!(", {t}")).unwrap_or_default();
                if is_async {
                    format!("await {recv}.formatValue({key_text}{args})")
                } else {
                    self.props[binding.prop_idx].requires_sync = true;
                    format!("{recv}.formatValueSync({key_text}{args})")
                }
            }
            Some(attr) => {
                let args = args_text.map(|t| format!(", args: {t}")).unwrap_or_default();
                let batch = format!("[{{ id: {key_text}{args} }}]");
                let access = attr_access(attr);
                if is_async {
                    format!("(await {recv}.formatMessages({batch}))[0].attributes{access}")
                } else {
                    self.props[binding.prop_idx].requires_sync = true;
                    format!("{recv}.formatMessagesSync({batch})[0].attributes{access}")
                }
            }
        };
        self.edits.push(TextEdit::replace(call.span, replacement));
    }
}

impl Visit for CallSiteRewriter<'_> {
    fn visit_function(&mut self, node: &Function) {
        self.async_stack.push(node.is_async);
        node.visit_children_with(self);
        self.async_stack.pop();
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.async_stack.push(node.is_async);
        node.visit_children_with(self);
        self.async_stack.pop();
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        node.visit_children_with(self);

        let Callee::Expr(callee) = &node.callee else {
            return;
        };
        let Expr::Member(member) = &**callee else {
            return;
        };
        let MemberProp::Ident(method) = &member.prop else {
            return;
        };
        match method.sym.as_str() {
            "createBundle" if node.args.len() == 1 && node.args[0].spread.is_none() => {
                self.rewrite_create_bundle(node);
            }
            "GetStringFromName" => self.rewrite_format_call(node, member, 1),
            "formatStringFromName" => self.rewrite_format_call(node, member, 2),
            _ => {}
        }
    }
}

fn js_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `.attr` when the name is a plain identifier, `["attr"]` otherwise
/// (kebab-cased attribute names usually are not).
fn attr_access(attr: &str) -> String {
    let mut chars = attr.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        format!(".{attr}")
    } else {
        format!("[{}]", js_str(attr))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::js::edit::apply_edits;
    use crate::js::parser::parse_js_source;
    use std::path::Path;

    fn prop_data(src: &str, uri: Option<&str>) -> PropData {
        let mut data = PropData::from_source(
            Path::new("app/locales/en-US/app.properties"),
            src,
            Some("app/locales/en-US/app.ftl"),
            Some("app"),
        )
        .unwrap();
        data.uri = uri.map(str::to_string);
        data
    }

    fn rewrite(js: &str, props: &mut [PropData]) -> (String, PassReport) {
        let parsed = parse_js_source(js.to_string(), "test.js").unwrap();
        let bindings = BindingIndex::collect(&parsed.program);
        let plural = PluralConfig::default();
        let (edits, report) = rewrite_program(&parsed, &bindings, props, &plural);
        let out = apply_edits(&parsed.source, parsed.start_pos, edits).unwrap();
        (out, report)
    }

    #[test]
    fn sync_value_call_rewrites_in_place() {
        let mut props = [prop_data("greet=Hello %S\n", None)];
        let js = "function f() {\n  return bundle.formatStringFromName(\"greet\", [name]);\n}\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "function f() {\n  return bundle.formatValueSync(\"app-greet\", { var1: name });\n}\n"
        );
        assert!(report.fixme_lines.is_empty());
        assert!(props[0].requires_sync);
        assert_eq!(
            props[0].migration("greet").unwrap().var_names,
            vec!["var1"]
        );
    }

    #[test]
    fn async_context_uses_await_and_async_api() {
        let mut props = [prop_data("greet=Hello\n", None)];
        let js = "async function f() {\n  return bundle.GetStringFromName(\"greet\");\n}\n";
        let (out, _) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "async function f() {\n  return await bundle.formatValue(\"app-greet\");\n}\n"
        );
        assert!(!props[0].requires_sync);
    }

    #[test]
    fn attribute_key_becomes_batched_message_access() {
        let mut props = [prop_data("greet=Hello\ngreet.accesskey=G\n", None)];
        let js = "let k = bundle.GetStringFromName(\"greet.accesskey\");\n";
        let (out, _) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "let k = bundle.formatMessagesSync([{ id: \"app-greet\" }])[0].attributes.accesskey;\n"
        );
    }

    #[test]
    fn unresolvable_key_is_flagged_not_rewritten() {
        let mut props = [prop_data("greet=Hello\n", None)];
        let js = "let k = bundle.GetStringFromName(dynamicKey());\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "let k = bundle.GetStringFromName(/* L10N-FIXME */ dynamicKey());\n"
        );
        assert_eq!(report.fixme_lines, vec![1]);
    }

    #[test]
    fn argument_count_mismatch_is_flagged() {
        let mut props = [prop_data("greet=Hello\n", None)];
        let js = "let k = bundle.formatStringFromName(\"greet\");\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "let k = /* L10N-FIXME */ bundle.formatStringFromName(\"greet\");\n"
        );
        assert_eq!(report.fixme_lines, vec![1]);
    }

    #[test]
    fn key_behind_const_rewrites_the_distant_literal() {
        let mut props = [prop_data("greet=Hello\n", None)];
        let js = "const KEY = \"greet\";\nlet a = bundle.GetStringFromName(KEY);\nlet b = bundle.GetStringFromName(KEY);\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "const KEY = \"app-greet\";\nlet a = bundle.formatValueSync(KEY);\nlet b = bundle.formatValueSync(KEY);\n"
        );
        assert!(report.fixme_lines.is_empty());
    }

    #[test]
    fn shared_attribute_key_flags_every_site() {
        let mut props = [prop_data("greet=Hello\ngreet.accesskey=G\n", None)];
        let js = "const KEY = \"greet.accesskey\";\nlet a = bundle.GetStringFromName(KEY);\nlet b = bundle.GetStringFromName(KEY);\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "const KEY = \"app-greet\";\nlet a = bundle.formatMessagesSync([{ id: /* L10N-FIXME */ KEY }])[0].attributes.accesskey;\nlet b = bundle.formatMessagesSync([{ id: /* L10N-FIXME */ KEY }])[0].attributes.accesskey;\n"
        );
        assert_eq!(report.fixme_lines, vec![2, 3]);
    }

    #[test]
    fn bundle_creation_becomes_localization() {
        let mut props = [prop_data(
            "greet=Hello\n",
            Some("chrome://app/locale/app.properties"),
        )];
        props[0].meta.ftl_path = Some("app/app.ftl".to_string());
        let js = "const bundle = Services.strings.createBundle(\"chrome://app/locale/app.properties\");\nlet k = bundle.GetStringFromName(\"greet\");\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "const bundle = new Localization([\"app/app.ftl\"], true);\nlet k = bundle.formatValueSync(\"app-greet\");\n"
        );
        assert_eq!(report.migrated_bundles, 1);
    }

    #[test]
    fn unknown_resource_is_left_untouched() {
        let mut props = [prop_data("greet=Hello\n", None)];
        let js = "let k = bundle.GetStringFromName(\"unrelated\");\n";
        let (out, report) = rewrite(js, &mut props);
        assert_eq!(
            out,
            "let k = bundle.GetStringFromName(/* L10N-FIXME */ \"unrelated\");\n"
        );
        assert_eq!(report.fixme_lines, vec![1]);
        assert!(props[0].migrations.is_empty());
    }
}
