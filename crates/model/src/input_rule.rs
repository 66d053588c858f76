use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};

use crate::schema::AttrValue;

/// The edit an input rule performs when its pattern matches typed text.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEdit {
	/// Replace the matched text with literal text.
	ReplaceWith(Box<str>),
	/// Wrap the current block in the named node with the given attributes.
	WrapInNode {
		name: Box<str>,
		attrs: Vec<(Box<str>, AttrValue)>,
	},
	/// Toggle the named mark across the matched range.
	ToggleMark(Box<str>),
}

type RuleHandler = Arc<dyn Fn(&Captures<'_>) -> Option<RuleEdit> + Send + Sync>;

/// Maps a regex over trailing typed text to an edit description.
///
/// Rules are matched against the text before the cursor; the first rule whose
/// pattern matches wins, so aggregation order is precedence order.
#[derive(Clone)]
pub struct InputRule {
	pattern: Regex,
	handler: RuleHandler,
}

impl InputRule {
	pub fn new(
		pattern: &str,
		handler: impl Fn(&Captures<'_>) -> Option<RuleEdit> + Send + Sync + 'static,
	) -> Result<Self, regex::Error> {
		Ok(Self {
			pattern: Regex::new(pattern)?,
			handler: Arc::new(handler),
		})
	}

	pub fn pattern(&self) -> &str {
		self.pattern.as_str()
	}

	/// Runs the rule against the text before the cursor.
	pub fn apply(&self, text: &str) -> Option<RuleEdit> {
		let caps = self.pattern.captures(text)?;
		(self.handler)(&caps)
	}
}

impl fmt::Debug for InputRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InputRule")
			.field("pattern", &self.pattern.as_str())
			.finish_non_exhaustive()
	}
}
