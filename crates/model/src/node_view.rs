use std::sync::Arc;

use crate::schema::AttrValue;

/// Rendering description for one node instance, produced by a node-view factory.
///
/// The real rendering layer is an external collaborator; this carries only the
/// data it would consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
	/// Tag the rendering layer should emit for this node.
	pub tag: Box<str>,
	/// Whether the node's content remains editable inside the view.
	pub content_editable: bool,
}

impl NodeView {
	pub fn new(tag: impl Into<Box<str>>, content_editable: bool) -> Self {
		Self {
			tag: tag.into(),
			content_editable,
		}
	}
}

/// Constructs a [`NodeView`] for each rendered instance of a node, given the
/// instance's attribute values.
pub type NodeViewFactory =
	Arc<dyn Fn(&[(Box<str>, AttrValue)]) -> NodeView + Send + Sync>;
