use serde::{Deserialize, Serialize};

/// Initialization order among extensions.
///
/// Lower priorities run first; the derived `Ord` follows declaration order,
/// so sorting a list of extensions ascending by priority yields execution
/// order. Ties are broken by registration order (the sort is stable).
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
	/// Runs before everything else (e.g. schema-critical extensions).
	Highest,
	High,
	#[default]
	Default,
	/// Runs after the default band; aggregation extensions that must see
	/// every other extension's contributions live here.
	Low,
	Lowest,
}

impl Priority {
	/// Numeric rank, for logging and diagnostics.
	pub const fn rank(self) -> i16 {
		match self {
			Self::Highest => 0,
			Self::High => 1,
			Self::Default => 2,
			Self::Low => 3,
			Self::Lowest => 4,
		}
	}
}

impl std::fmt::Display for Priority {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Highest => "highest",
			Self::High => "high",
			Self::Default => "default",
			Self::Low => "low",
			Self::Lowest => "lowest",
		};
		f.write_str(name)
	}
}
