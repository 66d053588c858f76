use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use vellum_model::EditorState;

use crate::settings::SettingValue;

/// Errors returned by command invocations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
	/// General command failure with message.
	#[error("{0}")]
	Failed(Box<str>),
	/// The command's `is_enabled` predicate rejected the current state.
	#[error("command not enabled: {0}")]
	Disabled(Box<str>),
	/// Operation not supported in the current context.
	#[error("unsupported operation: {0}")]
	Unsupported(&'static str),
}

type InvokeFn = Arc<dyn Fn(&mut EditorState) -> Result<(), CommandError> + Send + Sync>;
type PredicateFn = Arc<dyn Fn(&EditorState) -> bool + Send + Sync>;

/// A named command with its capability triple.
///
/// The rendering layer reads [`is_active`](Self::is_active) and
/// [`is_enabled`](Self::is_enabled) to reflect live editor state without
/// re-deriving it; dispatchers call [`invoke`](Self::invoke). The triple is
/// built once during the manager's `Ready` transition; there is no runtime
/// reflection over extension objects.
#[derive(Clone)]
pub struct Command {
	name: Box<str>,
	invoke: InvokeFn,
	is_active: PredicateFn,
	is_enabled: PredicateFn,
}

impl Command {
	pub fn new(
		name: impl Into<Box<str>>,
		invoke: impl Fn(&mut EditorState) -> Result<(), CommandError> + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.into(),
			invoke: Arc::new(invoke),
			is_active: Arc::new(|_| false),
			is_enabled: Arc::new(|_| true),
		}
	}

	/// Sets the predicate reporting whether the command's effect is currently
	/// applied (e.g. the cursor sits in bold text).
	pub fn active(mut self, predicate: impl Fn(&EditorState) -> bool + Send + Sync + 'static) -> Self {
		self.is_active = Arc::new(predicate);
		self
	}

	/// Sets the predicate reporting whether the command may run at all.
	pub fn enabled(
		mut self,
		predicate: impl Fn(&EditorState) -> bool + Send + Sync + 'static,
	) -> Self {
		self.is_enabled = Arc::new(predicate);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Runs the command. Fails with [`CommandError::Disabled`] if the enabled
	/// predicate rejects the state.
	pub fn invoke(&self, state: &mut EditorState) -> Result<(), CommandError> {
		if !(self.is_enabled)(state) {
			return Err(CommandError::Disabled(self.name.clone()));
		}
		(self.invoke)(state)
	}

	pub fn is_active(&self, state: &EditorState) -> bool {
		(self.is_active)(state)
	}

	pub fn is_enabled(&self, state: &EditorState) -> bool {
		(self.is_enabled)(state)
	}
}

impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Command").field("name", &self.name).finish_non_exhaustive()
	}
}

type HelperFn = Arc<dyn Fn(&EditorState) -> SettingValue + Send + Sync>;

/// A named read-only derivation over editor state.
#[derive(Clone)]
pub struct Helper {
	name: Box<str>,
	call: HelperFn,
}

impl Helper {
	pub fn new(
		name: impl Into<Box<str>>,
		call: impl Fn(&EditorState) -> SettingValue + Send + Sync + 'static,
	) -> Self {
		Self {
			name: name.into(),
			call: Arc::new(call),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn call(&self, state: &EditorState) -> SettingValue {
		(self.call)(state)
	}
}

impl fmt::Debug for Helper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Helper").field("name", &self.name).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invoke_respects_enabled_predicate() {
		let command = Command::new("toggle_bold", |state| {
			state.toggle_mark("bold");
			Ok(())
		})
		.active(|state| state.mark_active("bold"))
		.enabled(EditorState::is_editable);

		let mut state = EditorState::new();
		assert!(!command.is_active(&state));
		command.invoke(&mut state).unwrap();
		assert!(command.is_active(&state));

		state.set_editable(false);
		assert!(!command.is_enabled(&state));
		assert_eq!(
			command.invoke(&mut state),
			Err(CommandError::Disabled("toggle_bold".into())),
		);
	}
}
