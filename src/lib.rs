//! props2ftl - legacy string-bundle to Fluent migrator
//!
//! props2ftl migrates Firefox-style `.properties` string bundles, and the
//! JavaScript call sites that consume them, to Fluent (`.ftl`) localization.
//! Messages become Fluent messages with attributes, variables and plural
//! selects; `GetStringFromName`/`formatStringFromName` calls become
//! `Localization` API calls; and a `fluent.migrate` recipe is generated for
//! the localization pipeline. Whatever cannot be migrated safely is flagged
//! in place for a human.
//!
//! ## Module Structure
//!
//! - `cli`: command-line interface layer
//! - `commands`: the `migrate` and `list` command drivers
//! - `properties`: `.properties` parsing, serialization, FTL directives
//! - `fluent`: Fluent pattern translation and resource handling
//! - `migrate`: key resolution, per-resource pass state, orchestration
//! - `js`: JS parsing, scope analysis, call-site rewriting
//! - `refs`: chrome:// and XHTML `<stringbundle>` reference discovery
//! - `report`: human-facing output

pub mod cli;
pub mod commands;
pub mod fluent;
pub mod js;
pub mod migrate;
pub mod properties;
pub mod refs;
pub mod report;
