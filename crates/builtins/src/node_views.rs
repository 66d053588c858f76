use std::sync::Arc;

use indexmap::IndexMap;
use vellum_extension::{
	Extension, ExtensionDescriptor, ExtensionFactory, InitContext, InitError, InitHandler,
	Priority,
};
use vellum_model::{NodeViewFactory, Plugin};

/// Key of the single plugin the aggregator registers.
pub const NODE_VIEWS_PLUGIN: &str = "node-views";

/// Frozen state of the aggregation plugin: node name → view factory, in
/// harvest order. The first factory registered for a node wins.
pub struct NodeViewsState {
	pub factories: IndexMap<Box<str>, NodeViewFactory>,
}

impl NodeViewsState {
	pub fn factory(&self, node: &str) -> Option<&NodeViewFactory> {
		self.factories.get(node)
	}
}

struct ViewHarvest {
	factories: IndexMap<Box<str>, NodeViewFactory>,
}

impl InitHandler for ViewHarvest {
	fn for_each_extension(
		&mut self,
		target: &Arc<Extension>,
		cx: &mut InitContext<'_>,
	) -> Result<(), InitError> {
		if let Some(factories) = cx.node_views_of(target)? {
			for (node, factory) in factories {
				self.factories.entry(node).or_insert(factory);
			}
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, cx: &mut InitContext<'_>) -> Result<(), InitError> {
		let factories = std::mem::take(&mut self.factories);
		cx.add_plugins([Plugin::new(NODE_VIEWS_PLUGIN, NodeViewsState { factories })]);
		Ok(())
	}
}

/// Aggregation consumer for node views: one combined plugin carrying every
/// extension's view factories, keyed by node name.
pub fn node_views() -> ExtensionFactory {
	ExtensionDescriptor::plain("node_views")
		.priority(Priority::Low)
		.on_initialize(|_, _| Ok(Some(Box::new(ViewHarvest {
			factories: IndexMap::new(),
		}))))
		.build()
		.expect("node_views descriptor is valid")
}
