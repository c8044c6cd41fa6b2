//! External resource references reachable from a JS source.
//!
//! A migration pass needs to know which `.properties` bundles a script can
//! touch. Two channels feed it: `chrome://` string literals in the script
//! itself, and `<stringbundle>` elements in any XHTML document the script
//! references.

pub mod chrome_uri;
pub mod xhtml;

pub use chrome_uri::resolve_chrome_uri;
pub use xhtml::{StringBundleRef, find_string_bundles, remove_bundle_tags};

use swc_ecma_ast::{Lit, Program, Str};
use swc_ecma_visit::{Visit, VisitWith};

/// `chrome://` URIs referenced by a program, in source order, deduplicated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ExternalRefs {
    pub properties: Vec<String>,
    pub xhtml: Vec<String>,
}

pub fn collect_chrome_refs(program: &Program) -> ExternalRefs {
    let mut collector = RefCollector::default();
    program.visit_with(&mut collector);
    collector.refs
}

#[derive(Default)]
struct RefCollector {
    refs: ExternalRefs,
}

impl Visit for RefCollector {
    fn visit_lit(&mut self, node: &Lit) {
        if let Lit::Str(Str { value, .. }) = node
            && let Some(value) = value.as_str()
            && value.starts_with("chrome://")
        {
            let bucket = if value.ends_with(".properties") {
                Some(&mut self.refs.properties)
            } else if value.ends_with(".xhtml") || value.ends_with(".xul") {
                Some(&mut self.refs.xhtml)
            } else {
                None
            };
            if let Some(bucket) = bucket
                && !bucket.iter().any(|v| v == value)
            {
                bucket.push(value.to_string());
            }
        }
    }
}
