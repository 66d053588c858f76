use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque unit of engine behavior contributed by an extension.
///
/// The extension core passes plugins through without inspecting them; the
/// engine (or a test) recovers the typed state via [`Plugin::state`].
#[derive(Clone)]
pub struct Plugin {
	key: Box<str>,
	state: Arc<dyn Any + Send + Sync>,
}

impl Plugin {
	pub fn new(key: impl Into<Box<str>>, state: impl Any + Send + Sync) -> Self {
		Self {
			key: key.into(),
			state: Arc::new(state),
		}
	}

	/// Stable identifier for this plugin within one editor configuration.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Downcasts the plugin state to its concrete type.
	pub fn state<T: 'static>(&self) -> Option<&T> {
		self.state.downcast_ref()
	}
}

impl fmt::Debug for Plugin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Plugin").field("key", &self.key).finish_non_exhaustive()
	}
}
