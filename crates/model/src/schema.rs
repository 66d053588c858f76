use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A typed attribute value carried by nodes (e.g. a heading level).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
	Bool(bool),
	Int(i64),
	Str(Box<str>),
}

/// Declares a named attribute on a node spec, with an optional default.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrSpec {
	pub name: Box<str>,
	pub default: Option<AttrValue>,
}

impl AttrSpec {
	pub fn new(name: impl Into<Box<str>>, default: Option<AttrValue>) -> Self {
		Self {
			name: name.into(),
			default,
		}
	}
}

/// Describes one node type in the document vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSpec {
	/// Content expression (e.g. `"block+"`, `"inline*"`), if the node has content.
	pub content: Option<Box<str>>,
	/// Group this node belongs to (e.g. `"block"`).
	pub group: Option<Box<str>>,
	/// Declared attributes.
	pub attrs: Vec<AttrSpec>,
	/// Whether this node lives in inline content.
	pub inline: bool,
	/// Whether this node is the document top node.
	pub top: bool,
}

/// Describes one mark type (inline formatting such as bold).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkSpec {
	/// Group this mark belongs to.
	pub group: Option<Box<str>>,
	/// Whether adjacent identical marks merge into one span.
	pub spanning: bool,
}

/// Mutable schema under assembly. Compiled into a frozen [`Schema`] exactly once.
#[derive(Debug, Default)]
pub struct SchemaSpec {
	nodes: IndexMap<Box<str>, NodeSpec>,
	marks: IndexMap<Box<str>, MarkSpec>,
	top_node: Option<Box<str>>,
}

impl SchemaSpec {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a node spec. Duplicate names and conflicting top-node claims are errors.
	pub fn add_node(
		&mut self,
		name: impl Into<Box<str>>,
		spec: NodeSpec,
	) -> Result<(), SchemaError> {
		let name = name.into();
		if name.is_empty() {
			return Err(SchemaError::EmptyName("node"));
		}
		if self.nodes.contains_key(&name) {
			return Err(SchemaError::DuplicateNode(name));
		}
		if spec.top {
			if let Some(existing) = &self.top_node {
				return Err(SchemaError::ConflictingTopNode {
					existing: existing.clone(),
					new: name,
				});
			}
			self.top_node = Some(name.clone());
		}
		self.nodes.insert(name, spec);
		Ok(())
	}

	/// Adds a mark spec. Duplicate names are errors.
	pub fn add_mark(
		&mut self,
		name: impl Into<Box<str>>,
		spec: MarkSpec,
	) -> Result<(), SchemaError> {
		let name = name.into();
		if name.is_empty() {
			return Err(SchemaError::EmptyName("mark"));
		}
		if self.marks.contains_key(&name) {
			return Err(SchemaError::DuplicateMark(name));
		}
		self.marks.insert(name, spec);
		Ok(())
	}

	/// Freezes the spec into a [`Schema`]. Requires a top node.
	pub fn compile(self) -> Result<Schema, SchemaError> {
		let top_node = self.top_node.ok_or(SchemaError::MissingTopNode)?;
		Ok(Schema {
			nodes: self.nodes,
			marks: self.marks,
			top_node,
		})
	}
}

/// Frozen document vocabulary. Insertion order of nodes and marks is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
	nodes: IndexMap<Box<str>, NodeSpec>,
	marks: IndexMap<Box<str>, MarkSpec>,
	top_node: Box<str>,
}

impl Schema {
	pub fn node(&self, name: &str) -> Option<&NodeSpec> {
		self.nodes.get(name)
	}

	pub fn mark(&self, name: &str) -> Option<&MarkSpec> {
		self.marks.get(name)
	}

	pub fn top_node(&self) -> &str {
		&self.top_node
	}

	pub fn node_names(&self) -> impl Iterator<Item = &str> {
		self.nodes.keys().map(AsRef::as_ref)
	}

	pub fn mark_names(&self) -> impl Iterator<Item = &str> {
		self.marks.keys().map(AsRef::as_ref)
	}
}
