//! Extension composition core.
//!
//! Independently authored extensions each contribute schema pieces, commands,
//! keybindings, input rules, node views, and plugins; the [`Manager`] resolves
//! their execution order by priority, drives the initialization protocol, and
//! freezes the aggregate into one read-only [`EditorConfig`].
//!
//! # Composition model
//!
//! - [`ExtensionDescriptor`] declares a named unit of behavior and builds an
//!   [`ExtensionFactory`] bound to that name.
//! - A factory produces [`Extension`] values, merging caller overrides over
//!   declared defaults.
//! - [`Manager::initialize`] runs every extension's hooks in
//!   `(priority, registration order)` sequence, lets `on_initialize` handlers
//!   harvest other extensions' contributions, and freezes the result.
//!
//! Once `Ready`, the accumulators never change; reconfiguring means building
//! a new manager.

mod command;
mod contribution;
mod error;
mod extension;
mod factory;
mod kind;
mod manager;
mod priority;
mod settings;

pub use command::{Command, CommandError, Helper};
pub use contribution::{ContributionFlags, ContributionKind, ExcludePatch};
pub use error::{ConfigError, HookError, InitError, LifecycleError, ManagerError};
pub use extension::Extension;
pub use factory::{ExtensionDescriptor, ExtensionFactory, ExtensionOptions};
pub use kind::{ExtensionKind, HookKind};
pub use manager::{
	EditorConfig, InitContext, InitHandler, Manager, ManagerSettings, ManagerState,
};
pub use priority::Priority;
pub use settings::{SettingValue, Settings};
