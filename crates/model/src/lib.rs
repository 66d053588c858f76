//! Narrow facade over the document-model editing engine.
//!
//! The extension core (`vellum-extension`) is typed against the value types
//! in this crate but never inspects them beyond their constructors and
//! accessors: [`Schema`] describes the document vocabulary, [`Plugin`] is an
//! opaque unit of engine behavior, [`InputRule`] maps typed text to an edit,
//! and [`EditorState`] is the minimal live state command predicates read.
//!
//! The real engine (transactions, views, DOM rendering) is an external
//! collaborator and is not reimplemented here.

mod error;
mod input_rule;
mod node_view;
mod plugin;
mod schema;
mod state;

pub use error::SchemaError;
pub use input_rule::{InputRule, RuleEdit};
pub use node_view::{NodeView, NodeViewFactory};
pub use plugin::Plugin;
pub use schema::{AttrSpec, AttrValue, MarkSpec, NodeSpec, Schema, SchemaSpec};
pub use state::EditorState;
