use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::contribution::{ContributionFlags, ContributionKind, ExcludePatch};

/// A typed setting or property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(Box<str>),
}

impl SettingValue {
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(value) => Some(*value),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(value) => Some(value),
			_ => None,
		}
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for SettingValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}

/// Immutable per-extension configuration, fixed at construction.
///
/// Built by the factory: caller overrides shallow-merge over descriptor
/// defaults, and the exclude set is merged key-wise via [`ExcludePatch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
	values: FxHashMap<Box<str>, SettingValue>,
	exclude: ContributionFlags,
}

impl Settings {
	pub(crate) fn merged(
		defaults: &[(&'static str, SettingValue)],
		default_exclude: ContributionFlags,
		overrides: &FxHashMap<Box<str>, SettingValue>,
		exclude_patch: ExcludePatch,
	) -> Self {
		let mut values: FxHashMap<Box<str>, SettingValue> = defaults
			.iter()
			.map(|(key, value)| (Box::from(*key), value.clone()))
			.collect();
		for (key, value) in overrides {
			values.insert(key.clone(), value.clone());
		}
		Self {
			values,
			exclude: exclude_patch.apply(default_exclude),
		}
	}

	pub fn get(&self, key: &str) -> Option<&SettingValue> {
		self.values.get(key)
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get(key).and_then(SettingValue::as_bool)
	}

	pub fn get_int(&self, key: &str) -> Option<i64> {
		self.get(key).and_then(SettingValue::as_int)
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key).and_then(SettingValue::as_str)
	}

	/// The merged exclude set for this extension.
	pub fn exclude(&self) -> ContributionFlags {
		self.exclude
	}

	/// Returns true if this extension opted out of the given category.
	pub fn excludes(&self, kind: ContributionKind) -> bool {
		self.exclude.contains(kind.as_flags())
	}
}
