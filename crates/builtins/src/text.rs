use vellum_extension::{ExtensionDescriptor, ExtensionFactory, Priority};
use vellum_model::NodeSpec;

/// Inline text content.
pub fn text() -> ExtensionFactory {
	ExtensionDescriptor::node("text")
		.priority(Priority::Highest)
		.node_spec(|_| {
			Ok((
				"text".into(),
				NodeSpec {
					inline: true,
					..NodeSpec::default()
				},
			))
		})
		.build()
		.expect("text descriptor is valid")
}
