use std::sync::Arc;

use vellum_extension::{Command, ExtensionDescriptor, ExtensionFactory, Priority};
use vellum_model::{NodeSpec, NodeView};

/// The default block node, with a command to convert the current block back
/// to a paragraph and a plain node view.
pub fn paragraph() -> ExtensionFactory {
	ExtensionDescriptor::node("paragraph")
		.priority(Priority::High)
		.node_spec(|_| {
			Ok((
				"paragraph".into(),
				NodeSpec {
					content: Some("inline*".into()),
					group: Some("block".into()),
					..NodeSpec::default()
				},
			))
		})
		.commands(|_| {
			Ok(vec![
				Command::new("set_paragraph", |state| {
					state.set_block("paragraph", Vec::new());
					Ok(())
				})
				.active(|state| state.block_type() == "paragraph")
				.enabled(|state| state.is_editable()),
			])
		})
		.node_views(|_| {
			Ok(vec![(
				"paragraph".into(),
				Arc::new(|_: &[_]| NodeView::new("p", true)) as _,
			)])
		})
		.build()
		.expect("paragraph descriptor is valid")
}
