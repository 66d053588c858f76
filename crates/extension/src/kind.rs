/// The closed set of extension kinds.
///
/// Each kind restricts which hooks are legal: only a [`Node`](Self::Node)
/// extension may declare a node-spec hook, only a [`Mark`](Self::Mark)
/// extension a mark-spec hook. Legality is checked when the factory is built,
/// never probed at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionKind {
	/// Contributes behavior only (commands, rules, plugins).
	Plain,
	/// Contributes a node type to the schema.
	Node,
	/// Contributes a mark type to the schema.
	Mark,
}

impl ExtensionKind {
	/// Returns true if this kind may declare the given hook.
	pub const fn supports(self, hook: HookKind) -> bool {
		match hook {
			HookKind::CreateNodeSpec => matches!(self, Self::Node),
			HookKind::CreateMarkSpec => matches!(self, Self::Mark),
			_ => true,
		}
	}
}

impl std::fmt::Display for ExtensionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Plain => "plain",
			Self::Node => "node",
			Self::Mark => "mark",
		};
		f.write_str(name)
	}
}

/// Identifies a lifecycle or contribution hook, for legality checks and
/// error attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
	OnInitialize,
	CreateNodeSpec,
	CreateMarkSpec,
	CreateCommands,
	CreateKeymap,
	CreateInputRules,
	CreateNodeViews,
	CreateHelpers,
	CreatePlugins,
}

impl HookKind {
	/// Stable hook name used in logs and error messages.
	pub const fn name(self) -> &'static str {
		match self {
			Self::OnInitialize => "on_initialize",
			Self::CreateNodeSpec => "create_node_spec",
			Self::CreateMarkSpec => "create_mark_spec",
			Self::CreateCommands => "create_commands",
			Self::CreateKeymap => "create_keymap",
			Self::CreateInputRules => "create_input_rules",
			Self::CreateNodeViews => "create_node_views",
			Self::CreateHelpers => "create_helpers",
			Self::CreatePlugins => "create_plugins",
		}
	}
}

impl std::fmt::Display for HookKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_hooks_are_kind_restricted() {
		assert!(ExtensionKind::Node.supports(HookKind::CreateNodeSpec));
		assert!(!ExtensionKind::Mark.supports(HookKind::CreateNodeSpec));
		assert!(!ExtensionKind::Plain.supports(HookKind::CreateNodeSpec));
		assert!(ExtensionKind::Mark.supports(HookKind::CreateMarkSpec));
		assert!(!ExtensionKind::Node.supports(HookKind::CreateMarkSpec));
	}

	#[test]
	fn behavior_hooks_are_universal() {
		for kind in [ExtensionKind::Plain, ExtensionKind::Node, ExtensionKind::Mark] {
			assert!(kind.supports(HookKind::OnInitialize));
			assert!(kind.supports(HookKind::CreateCommands));
			assert!(kind.supports(HookKind::CreateInputRules));
		}
	}
}
