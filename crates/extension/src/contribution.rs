use serde::{Deserialize, Serialize};

/// One category of contribution an extension can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
	/// Node and mark specs feeding the schema.
	Schema,
	/// Named commands with their capability triples.
	Commands,
	/// Keybinding → command-name entries.
	Keymap,
	/// Input rules, harvested by an aggregation extension.
	InputRules,
	/// Node-view factories, harvested by an aggregation extension.
	NodeViews,
	/// Engine plugins contributed directly.
	Plugins,
	/// Named read-only derivations over editor state.
	Helpers,
}

impl ContributionKind {
	/// Returns the flag bit for this category.
	pub const fn as_flags(self) -> ContributionFlags {
		match self {
			Self::Schema => ContributionFlags::SCHEMA,
			Self::Commands => ContributionFlags::COMMANDS,
			Self::Keymap => ContributionFlags::KEYMAP,
			Self::InputRules => ContributionFlags::INPUT_RULES,
			Self::NodeViews => ContributionFlags::NODE_VIEWS,
			Self::Plugins => ContributionFlags::PLUGINS,
			Self::Helpers => ContributionFlags::HELPERS,
		}
	}
}

impl std::fmt::Display for ContributionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Schema => "schema",
			Self::Commands => "commands",
			Self::Keymap => "keymap",
			Self::InputRules => "input_rules",
			Self::NodeViews => "node_views",
			Self::Plugins => "plugins",
			Self::Helpers => "helpers",
		};
		f.write_str(name)
	}
}

bitflags::bitflags! {
	/// A set of contribution categories, used for exclude maps.
	///
	/// Serde impls come from the `bitflags` serde feature.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
	#[serde(transparent)]
	pub struct ContributionFlags: u8 {
		/// Node and mark specs feeding the schema.
		const SCHEMA = 1 << 0;
		/// Named commands.
		const COMMANDS = 1 << 1;
		/// Keybinding entries.
		const KEYMAP = 1 << 2;
		/// Input rules.
		const INPUT_RULES = 1 << 3;
		/// Node-view factories.
		const NODE_VIEWS = 1 << 4;
		/// Engine plugins.
		const PLUGINS = 1 << 5;
		/// Helper derivations.
		const HELPERS = 1 << 6;
	}
}

impl From<ContributionKind> for ContributionFlags {
	fn from(kind: ContributionKind) -> Self {
		kind.as_flags()
	}
}

impl FromIterator<ContributionKind> for ContributionFlags {
	fn from_iter<I: IntoIterator<Item = ContributionKind>>(iter: I) -> Self {
		let mut set = ContributionFlags::empty();
		for kind in iter {
			set |= kind.as_flags();
		}
		set
	}
}

/// Key-wise override of a default exclude set.
///
/// A caller can disable a subset of categories without disabling all, or
/// re-enable categories the descriptor excludes by default. Keys absent from
/// both masks keep their default. `disable` wins when a key appears in both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludePatch {
	/// Categories to exclude in addition to the defaults.
	pub disable: ContributionFlags,
	/// Default-excluded categories to re-enable.
	pub enable: ContributionFlags,
}

impl ExcludePatch {
	pub fn disable(flags: ContributionFlags) -> Self {
		Self {
			disable: flags,
			enable: ContributionFlags::empty(),
		}
	}

	pub fn enable(flags: ContributionFlags) -> Self {
		Self {
			disable: ContributionFlags::empty(),
			enable: flags,
		}
	}

	/// Applies the patch on top of a default exclude set.
	pub fn apply(self, defaults: ContributionFlags) -> ContributionFlags {
		(defaults & !self.enable) | self.disable
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn patch_merges_key_wise() {
		let defaults = ContributionFlags::INPUT_RULES | ContributionFlags::KEYMAP;
		let patch = ExcludePatch {
			disable: ContributionFlags::NODE_VIEWS,
			enable: ContributionFlags::KEYMAP,
		};
		let merged = patch.apply(defaults);
		assert!(merged.contains(ContributionFlags::INPUT_RULES));
		assert!(merged.contains(ContributionFlags::NODE_VIEWS));
		assert!(!merged.contains(ContributionFlags::KEYMAP));
	}

	#[test]
	fn disable_wins_over_enable() {
		let patch = ExcludePatch {
			disable: ContributionFlags::COMMANDS,
			enable: ContributionFlags::COMMANDS,
		};
		assert!(patch.apply(ContributionFlags::empty()).contains(ContributionFlags::COMMANDS));
	}
}
