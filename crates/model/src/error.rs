use thiserror::Error;

/// Errors raised while assembling or compiling a [`crate::Schema`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
	/// Two node specs were registered under the same name.
	#[error("duplicate node spec: {0}")]
	DuplicateNode(Box<str>),
	/// Two mark specs were registered under the same name.
	#[error("duplicate mark spec: {0}")]
	DuplicateMark(Box<str>),
	/// A node or mark spec was registered under an empty name.
	#[error("empty {0} name")]
	EmptyName(&'static str),
	/// Two node specs both claimed to be the document top node.
	#[error("conflicting top nodes: {existing} and {new}")]
	ConflictingTopNode { existing: Box<str>, new: Box<str> },
	/// No node spec claimed the top-node role.
	#[error("schema has no top node")]
	MissingTopNode,
}
