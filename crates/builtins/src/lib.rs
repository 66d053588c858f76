//! Built-in extensions.
//!
//! The base schema trio ([`doc`], [`text`], [`paragraph`]), the formatting
//! extensions ([`bold`], [`italic`], [`heading`]), and the two aggregation
//! consumers ([`input_rules`], [`node_views`]) that fold per-extension
//! contributions into single plugins during the manager's harvest loop.
//!
//! Every factory here is a plain function returning an
//! [`ExtensionFactory`](vellum_extension::ExtensionFactory); callers compose
//! the set they want and hand the created extensions to a
//! [`Manager`](vellum_extension::Manager).

mod bold;
mod doc;
mod heading;
mod input_rules;
mod italic;
mod node_views;
mod paragraph;
mod text;

pub use bold::bold;
pub use doc::doc;
pub use heading::heading;
pub use input_rules::{INPUT_RULES_PLUGIN, InputRulesState, input_rules};
pub use italic::italic;
pub use node_views::{NODE_VIEWS_PLUGIN, NodeViewsState, node_views};
pub use paragraph::paragraph;
pub use text::text;

use vellum_extension::Extension;

/// The base document vocabulary every configuration needs: top node, block
/// container, and inline text.
pub fn base_extensions() -> Vec<Extension> {
	vec![doc().create(), paragraph().create(), text().create()]
}
