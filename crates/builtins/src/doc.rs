use vellum_extension::{ExtensionDescriptor, ExtensionFactory, Priority};
use vellum_model::NodeSpec;

/// The document top node. Runs first so the schema always has a root before
/// other node extensions are assembled.
pub fn doc() -> ExtensionFactory {
	ExtensionDescriptor::node("doc")
		.priority(Priority::Highest)
		.node_spec(|_| {
			Ok((
				"doc".into(),
				NodeSpec {
					content: Some("block+".into()),
					top: true,
					..NodeSpec::default()
				},
			))
		})
		.build()
		.expect("doc descriptor is valid")
}
