use rustc_hash::FxHashSet;

use crate::schema::AttrValue;

/// Minimal live editor state that command predicates and helpers read.
///
/// The engine's real state object (document, selection, transactions) is an
/// external collaborator; this facade carries just the projection commands
/// operate on: the active mark set and the current block.
#[derive(Debug, Clone)]
pub struct EditorState {
	active_marks: FxHashSet<Box<str>>,
	block_type: Box<str>,
	block_attrs: Vec<(Box<str>, AttrValue)>,
	editable: bool,
}

impl Default for EditorState {
	fn default() -> Self {
		Self {
			active_marks: FxHashSet::default(),
			block_type: "paragraph".into(),
			block_attrs: Vec::new(),
			editable: true,
		}
	}
}

impl EditorState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Toggles a mark at the current selection. Returns the new active state.
	pub fn toggle_mark(&mut self, name: &str) -> bool {
		if self.active_marks.remove(name) {
			false
		} else {
			self.active_marks.insert(name.into());
			true
		}
	}

	pub fn mark_active(&self, name: &str) -> bool {
		self.active_marks.contains(name)
	}

	/// Replaces the current block's type and attributes.
	pub fn set_block(&mut self, name: impl Into<Box<str>>, attrs: Vec<(Box<str>, AttrValue)>) {
		self.block_type = name.into();
		self.block_attrs = attrs;
	}

	pub fn block_type(&self) -> &str {
		&self.block_type
	}

	pub fn block_attr(&self, name: &str) -> Option<&AttrValue> {
		self.block_attrs
			.iter()
			.find(|(key, _)| key.as_ref() == name)
			.map(|(_, value)| value)
	}

	pub fn is_editable(&self) -> bool {
		self.editable
	}

	pub fn set_editable(&mut self, editable: bool) {
		self.editable = editable;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toggle_mark_round_trips() {
		let mut state = EditorState::new();
		assert!(!state.mark_active("bold"));
		assert!(state.toggle_mark("bold"));
		assert!(state.mark_active("bold"));
		assert!(!state.toggle_mark("bold"));
		assert!(!state.mark_active("bold"));
	}

	#[test]
	fn set_block_replaces_attrs() {
		let mut state = EditorState::new();
		state.set_block("heading", vec![("level".into(), AttrValue::Int(2))]);
		assert_eq!(state.block_type(), "heading");
		assert_eq!(state.block_attr("level"), Some(&AttrValue::Int(2)));
		state.set_block("paragraph", Vec::new());
		assert_eq!(state.block_attr("level"), None);
	}
}
