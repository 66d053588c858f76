use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::contribution::ContributionKind;
use crate::factory::Hooks;
use crate::kind::ExtensionKind;
use crate::priority::Priority;
use crate::settings::{SettingValue, Settings};

/// A named, configurable unit of editor behavior.
///
/// Extensions are immutable after construction except for
/// [`properties`](Self::set_property), which are runtime-adjustable without
/// re-initialization. A manager shares extensions behind `Arc` once `Ready`;
/// the property lock is the only writer-side state.
pub struct Extension {
	name: &'static str,
	kind: ExtensionKind,
	priority: Priority,
	settings: Settings,
	properties: RwLock<FxHashMap<Box<str>, SettingValue>>,
	hooks: Arc<Hooks>,
}

impl Extension {
	pub(crate) fn new(
		name: &'static str,
		kind: ExtensionKind,
		priority: Priority,
		settings: Settings,
		properties: FxHashMap<Box<str>, SettingValue>,
		hooks: Arc<Hooks>,
	) -> Self {
		Self {
			name,
			kind,
			priority,
			settings,
			properties: RwLock::new(properties),
			hooks,
		}
	}

	/// Unique name within a manager instance.
	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn kind(&self) -> ExtensionKind {
		self.kind
	}

	pub fn priority(&self) -> Priority {
		self.priority
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Reads a runtime property.
	pub fn property(&self, key: &str) -> Option<SettingValue> {
		self.properties.read().get(key).cloned()
	}

	/// Sets a runtime property. Takes effect immediately, no re-init needed.
	pub fn set_property(&self, key: impl Into<Box<str>>, value: impl Into<SettingValue>) {
		self.properties.write().insert(key.into(), value.into());
	}

	/// Returns true if this extension declares the hook backing the given
	/// contribution category.
	pub fn implements(&self, kind: ContributionKind) -> bool {
		self.hooks.implements(kind)
	}

	pub(crate) fn hooks(&self) -> &Hooks {
		&self.hooks
	}
}

impl fmt::Debug for Extension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Extension")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("priority", &self.priority)
			.finish_non_exhaustive()
	}
}
