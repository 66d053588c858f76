use thiserror::Error;

use crate::kind::{ExtensionKind, HookKind};
use crate::manager::ManagerState;

/// A bad extension descriptor or registration, detected before any hook runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	/// An extension name must be a non-empty string.
	#[error("extension name must not be empty")]
	EmptyName,
	/// Two extensions were registered under the same name.
	#[error("duplicate extension name: {0}")]
	DuplicateName(Box<str>),
	/// A descriptor declared a hook its kind does not support.
	#[error("extension {name}: hook {hook} is not legal for {kind} extensions")]
	UnsupportedHook {
		name: Box<str>,
		kind: ExtensionKind,
		hook: HookKind,
	},
}

/// Failure inside a hook body, surfaced by the hook itself.
///
/// The manager wraps this into an [`InitError`] carrying the extension and
/// hook that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub Box<str>);

impl From<&str> for HookError {
	fn from(message: &str) -> Self {
		Self(message.into())
	}
}

impl From<String> for HookError {
	fn from(message: String) -> Self {
		Self(message.into())
	}
}

/// A hook failed during the `Initializing` state.
///
/// Fatal for the manager instance: no partial `Ready` state is ever exposed,
/// and there is no automatic retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("extension {extension}: hook {hook} failed: {source}")]
pub struct InitError {
	/// Name of the extension whose hook failed.
	pub extension: Box<str>,
	/// The failing hook.
	pub hook: HookKind,
	#[source]
	pub source: HookError,
}

/// A manager method was invoked in a state that does not permit it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} is not legal while the manager is {state}")]
pub struct LifecycleError {
	/// The operation that was attempted.
	pub operation: &'static str,
	/// The state the manager was in.
	pub state: ManagerState,
}

/// Umbrella error for manager construction and initialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	Init(#[from] InitError),
	#[error(transparent)]
	Lifecycle(#[from] LifecycleError),
	/// Schema compilation failed in a way not attributable to one extension.
	#[error("schema error: {0}")]
	Schema(#[from] vellum_model::SchemaError),
}
