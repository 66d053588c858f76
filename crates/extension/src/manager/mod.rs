//! Extension manager: ordering, initialization protocol, frozen aggregation.
//!
//! A manager owns an ordered collection of extensions, resolves execution
//! order by `(priority, registration index)`, drives the initialization
//! protocol, and freezes every contribution into one [`EditorConfig`].
//!
//! State machine: `Uninitialized → Initializing → Ready → Destroyed`. A hook
//! failure during `Initializing` aborts the whole pass; no partial `Ready`
//! state is ever exposed.

mod context;
mod init;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use vellum_model::{Plugin, Schema};

use crate::command::{Command, Helper};
use crate::contribution::ContributionFlags;
use crate::error::{ConfigError, LifecycleError, ManagerError};
use crate::extension::Extension;

pub use context::{InitContext, InitHandler};

/// Manager-wide configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettings {
	/// Contribution categories suppressed across all extensions.
	pub exclude: ContributionFlags,
}

/// The manager lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerState {
	Uninitialized,
	Initializing,
	Ready,
	Destroyed,
}

impl std::fmt::Display for ManagerState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Uninitialized => "uninitialized",
			Self::Initializing => "initializing",
			Self::Ready => "ready",
			Self::Destroyed => "destroyed",
		};
		f.write_str(name)
	}
}

/// The frozen output of one initialization pass.
///
/// Safe to share with any number of concurrent readers: nothing writes to it
/// after the `Ready` transition.
pub struct EditorConfig {
	schema: Arc<Schema>,
	plugins: Vec<Plugin>,
	commands: IndexMap<Box<str>, Command>,
	keymap: IndexMap<Box<str>, Box<str>>,
	helpers: IndexMap<Box<str>, Helper>,
}

impl EditorConfig {
	pub fn schema(&self) -> &Arc<Schema> {
		&self.schema
	}

	/// Plugins in contribution order.
	pub fn plugins(&self) -> &[Plugin] {
		&self.plugins
	}

	pub fn plugin(&self, key: &str) -> Option<&Plugin> {
		self.plugins.iter().find(|plugin| plugin.key() == key)
	}

	/// Command map in merge order.
	pub fn commands(&self) -> &IndexMap<Box<str>, Command> {
		&self.commands
	}

	pub fn command(&self, name: &str) -> Option<&Command> {
		self.commands.get(name)
	}

	/// Keybinding → command name, in merge order.
	pub fn keymap(&self) -> &IndexMap<Box<str>, Box<str>> {
		&self.keymap
	}

	/// Helper map in merge order.
	pub fn helpers(&self) -> &IndexMap<Box<str>, Helper> {
		&self.helpers
	}
}

/// Orchestrates extension initialization and owns the frozen configuration.
pub struct Manager {
	extensions: Vec<Arc<Extension>>,
	settings: ManagerSettings,
	state: ManagerState,
	config: Option<EditorConfig>,
}

impl std::fmt::Debug for Manager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Manager")
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl Manager {
	/// Registers the given extensions, validating name uniqueness and
	/// computing the stable execution order. No hook runs here.
	pub fn new(
		extensions: Vec<Extension>,
		settings: ManagerSettings,
	) -> Result<Self, ConfigError> {
		let mut seen = FxHashSet::default();
		for extension in &extensions {
			if !seen.insert(extension.name()) {
				return Err(ConfigError::DuplicateName(extension.name().into()));
			}
		}

		let mut extensions: Vec<Arc<Extension>> =
			extensions.into_iter().map(Arc::new).collect();
		// Stable sort keeps registration order within a priority band.
		extensions.sort_by_key(|extension| extension.priority());

		Ok(Self {
			extensions,
			settings,
			state: ManagerState::Uninitialized,
			config: None,
		})
	}

	/// Registers and initializes in one step.
	pub fn initialized(
		extensions: Vec<Extension>,
		settings: ManagerSettings,
	) -> Result<Self, ManagerError> {
		let mut manager = Self::new(extensions, settings)?;
		manager.initialize()?;
		Ok(manager)
	}

	/// Runs the initialization pass and freezes the configuration.
	///
	/// All-or-nothing: on failure the manager returns to `Uninitialized` and
	/// `Ready`-only accessors keep failing with a [`LifecycleError`].
	pub fn initialize(&mut self) -> Result<(), ManagerError> {
		if self.state != ManagerState::Uninitialized {
			return Err(LifecycleError {
				operation: "initialize",
				state: self.state,
			}
			.into());
		}

		self.state = ManagerState::Initializing;
		match init::build_config(&self.extensions, &self.settings) {
			Ok(config) => {
				self.config = Some(config);
				self.state = ManagerState::Ready;
				tracing::debug!(
					extensions = self.extensions.len(),
					commands = self.config.as_ref().map_or(0, |c| c.commands.len()),
					plugins = self.config.as_ref().map_or(0, |c| c.plugins.len()),
					"manager ready"
				);
				Ok(())
			}
			Err(error) => {
				self.state = ManagerState::Uninitialized;
				Err(error)
			}
		}
	}

	pub fn state(&self) -> ManagerState {
		self.state
	}

	pub fn settings(&self) -> Result<&ManagerSettings, LifecycleError> {
		self.not_destroyed("settings")?;
		Ok(&self.settings)
	}

	/// Extensions in execution order.
	pub fn extensions(&self) -> Result<&[Arc<Extension>], LifecycleError> {
		self.not_destroyed("extensions")?;
		Ok(&self.extensions)
	}

	pub fn extension(&self, name: &str) -> Result<Option<&Arc<Extension>>, LifecycleError> {
		self.not_destroyed("extension")?;
		Ok(self.extensions.iter().find(|extension| extension.name() == name))
	}

	/// The frozen configuration. `Ready` only.
	pub fn config(&self) -> Result<&EditorConfig, LifecycleError> {
		self.ready("config")
	}

	pub fn schema(&self) -> Result<&Arc<Schema>, LifecycleError> {
		self.ready("schema").map(EditorConfig::schema)
	}

	pub fn plugins(&self) -> Result<&[Plugin], LifecycleError> {
		self.ready("plugins").map(EditorConfig::plugins)
	}

	pub fn commands(&self) -> Result<&IndexMap<Box<str>, Command>, LifecycleError> {
		self.ready("commands").map(EditorConfig::commands)
	}

	pub fn keymap(&self) -> Result<&IndexMap<Box<str>, Box<str>>, LifecycleError> {
		self.ready("keymap").map(EditorConfig::keymap)
	}

	pub fn helpers(&self) -> Result<&IndexMap<Box<str>, Helper>, LifecycleError> {
		self.ready("helpers").map(EditorConfig::helpers)
	}

	/// Tears the manager down. No further hook calls or accessor reads are
	/// legal afterwards.
	pub fn destroy(&mut self) -> Result<(), LifecycleError> {
		self.not_destroyed("destroy")?;
		self.state = ManagerState::Destroyed;
		self.config = None;
		Ok(())
	}

	fn ready(&self, operation: &'static str) -> Result<&EditorConfig, LifecycleError> {
		match (&self.config, self.state) {
			(Some(config), ManagerState::Ready) => Ok(config),
			_ => Err(LifecycleError {
				operation,
				state: self.state,
			}),
		}
	}

	fn not_destroyed(&self, operation: &'static str) -> Result<(), LifecycleError> {
		if self.state == ManagerState::Destroyed {
			return Err(LifecycleError {
				operation,
				state: self.state,
			});
		}
		Ok(())
	}
}
