use std::sync::Arc;

use rustc_hash::FxHashMap;
use vellum_model::{InputRule, MarkSpec, NodeSpec, NodeViewFactory, Plugin};

use crate::command::{Command, Helper};
use crate::contribution::{ContributionFlags, ContributionKind, ExcludePatch};
use crate::error::{ConfigError, HookError};
use crate::extension::Extension;
use crate::kind::{ExtensionKind, HookKind};
use crate::manager::{InitContext, InitHandler};
use crate::priority::Priority;
use crate::settings::{SettingValue, Settings};

pub type NodeSpecHook =
	Arc<dyn Fn(&Extension) -> Result<(Box<str>, NodeSpec), HookError> + Send + Sync>;
pub type MarkSpecHook =
	Arc<dyn Fn(&Extension) -> Result<(Box<str>, MarkSpec), HookError> + Send + Sync>;
pub type CommandsHook = Arc<dyn Fn(&Extension) -> Result<Vec<Command>, HookError> + Send + Sync>;
pub type KeymapHook =
	Arc<dyn Fn(&Extension) -> Result<Vec<(Box<str>, Box<str>)>, HookError> + Send + Sync>;
pub type InputRulesHook =
	Arc<dyn Fn(&Extension) -> Result<Vec<InputRule>, HookError> + Send + Sync>;
pub type NodeViewsHook = Arc<
	dyn Fn(&Extension) -> Result<Vec<(Box<str>, NodeViewFactory)>, HookError> + Send + Sync,
>;
pub type HelpersHook = Arc<dyn Fn(&Extension) -> Result<Vec<Helper>, HookError> + Send + Sync>;
pub type PluginsHook = Arc<dyn Fn(&Extension) -> Result<Vec<Plugin>, HookError> + Send + Sync>;
pub type InitHook = Arc<
	dyn Fn(&Extension, &mut InitContext<'_>) -> Result<Option<Box<dyn InitHandler>>, HookError>
		+ Send
		+ Sync,
>;

/// The optional lifecycle and contribution hooks an extension declares.
#[derive(Default, Clone)]
pub struct Hooks {
	pub(crate) on_initialize: Option<InitHook>,
	pub(crate) create_node_spec: Option<NodeSpecHook>,
	pub(crate) create_mark_spec: Option<MarkSpecHook>,
	pub(crate) create_commands: Option<CommandsHook>,
	pub(crate) create_keymap: Option<KeymapHook>,
	pub(crate) create_input_rules: Option<InputRulesHook>,
	pub(crate) create_node_views: Option<NodeViewsHook>,
	pub(crate) create_helpers: Option<HelpersHook>,
	pub(crate) create_plugins: Option<PluginsHook>,
}

impl Hooks {
	/// The hooks this set declares, for kind-legality validation.
	fn declared(&self) -> impl Iterator<Item = HookKind> + '_ {
		[
			(self.on_initialize.is_some(), HookKind::OnInitialize),
			(self.create_node_spec.is_some(), HookKind::CreateNodeSpec),
			(self.create_mark_spec.is_some(), HookKind::CreateMarkSpec),
			(self.create_commands.is_some(), HookKind::CreateCommands),
			(self.create_keymap.is_some(), HookKind::CreateKeymap),
			(self.create_input_rules.is_some(), HookKind::CreateInputRules),
			(self.create_node_views.is_some(), HookKind::CreateNodeViews),
			(self.create_helpers.is_some(), HookKind::CreateHelpers),
			(self.create_plugins.is_some(), HookKind::CreatePlugins),
		]
		.into_iter()
		.filter_map(|(declared, hook)| declared.then_some(hook))
	}

	/// Returns true if the hook backing the given category is declared.
	pub(crate) fn implements(&self, kind: ContributionKind) -> bool {
		match kind {
			ContributionKind::Schema => {
				self.create_node_spec.is_some() || self.create_mark_spec.is_some()
			}
			ContributionKind::Commands => self.create_commands.is_some(),
			ContributionKind::Keymap => self.create_keymap.is_some(),
			ContributionKind::InputRules => self.create_input_rules.is_some(),
			ContributionKind::NodeViews => self.create_node_views.is_some(),
			ContributionKind::Plugins => self.create_plugins.is_some(),
			ContributionKind::Helpers => self.create_helpers.is_some(),
		}
	}
}

/// Declarative description of one extension: name, kind, defaults, hooks.
///
/// A descriptor is bound to one fixed name. Building it yields an
/// [`ExtensionFactory`] after validating that every declared hook is legal
/// for the descriptor's kind.
pub struct ExtensionDescriptor {
	name: &'static str,
	kind: ExtensionKind,
	default_priority: Priority,
	default_settings: Vec<(&'static str, SettingValue)>,
	default_exclude: ContributionFlags,
	default_properties: Vec<(&'static str, SettingValue)>,
	hooks: Hooks,
}

impl ExtensionDescriptor {
	fn new(name: &'static str, kind: ExtensionKind) -> Self {
		Self {
			name,
			kind,
			default_priority: Priority::Default,
			default_settings: Vec::new(),
			default_exclude: ContributionFlags::empty(),
			default_properties: Vec::new(),
			hooks: Hooks::default(),
		}
	}

	/// A behavior-only extension.
	pub fn plain(name: &'static str) -> Self {
		Self::new(name, ExtensionKind::Plain)
	}

	/// An extension contributing a node type.
	pub fn node(name: &'static str) -> Self {
		Self::new(name, ExtensionKind::Node)
	}

	/// An extension contributing a mark type.
	pub fn mark(name: &'static str) -> Self {
		Self::new(name, ExtensionKind::Mark)
	}

	pub fn priority(mut self, priority: Priority) -> Self {
		self.default_priority = priority;
		self
	}

	/// Declares a default setting value.
	pub fn setting(mut self, key: &'static str, value: impl Into<SettingValue>) -> Self {
		self.default_settings.push((key, value.into()));
		self
	}

	/// Declares categories this extension excludes by default.
	pub fn exclude(mut self, flags: ContributionFlags) -> Self {
		self.default_exclude |= flags;
		self
	}

	/// Declares a default runtime property.
	pub fn property(mut self, key: &'static str, value: impl Into<SettingValue>) -> Self {
		self.default_properties.push((key, value.into()));
		self
	}

	pub fn on_initialize(
		mut self,
		hook: impl Fn(&Extension, &mut InitContext<'_>) -> Result<Option<Box<dyn InitHandler>>, HookError>
			+ Send
			+ Sync
			+ 'static,
	) -> Self {
		self.hooks.on_initialize = Some(Arc::new(hook));
		self
	}

	pub fn node_spec(
		mut self,
		hook: impl Fn(&Extension) -> Result<(Box<str>, NodeSpec), HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_node_spec = Some(Arc::new(hook));
		self
	}

	pub fn mark_spec(
		mut self,
		hook: impl Fn(&Extension) -> Result<(Box<str>, MarkSpec), HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_mark_spec = Some(Arc::new(hook));
		self
	}

	pub fn commands(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<Command>, HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_commands = Some(Arc::new(hook));
		self
	}

	pub fn keymap(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<(Box<str>, Box<str>)>, HookError>
			+ Send
			+ Sync
			+ 'static,
	) -> Self {
		self.hooks.create_keymap = Some(Arc::new(hook));
		self
	}

	pub fn input_rules(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<InputRule>, HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_input_rules = Some(Arc::new(hook));
		self
	}

	pub fn node_views(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<(Box<str>, NodeViewFactory)>, HookError>
			+ Send
			+ Sync
			+ 'static,
	) -> Self {
		self.hooks.create_node_views = Some(Arc::new(hook));
		self
	}

	pub fn helpers(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<Helper>, HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_helpers = Some(Arc::new(hook));
		self
	}

	pub fn plugins(
		mut self,
		hook: impl Fn(&Extension) -> Result<Vec<Plugin>, HookError> + Send + Sync + 'static,
	) -> Self {
		self.hooks.create_plugins = Some(Arc::new(hook));
		self
	}

	/// Validates the descriptor and builds the factory.
	///
	/// Fails if the name is empty or a declared hook is illegal for the
	/// descriptor's kind.
	pub fn build(self) -> Result<ExtensionFactory, ConfigError> {
		if self.name.is_empty() {
			return Err(ConfigError::EmptyName);
		}
		if let Some(hook) = self.hooks.declared().find(|hook| !self.kind.supports(*hook)) {
			return Err(ConfigError::UnsupportedHook {
				name: self.name.into(),
				kind: self.kind,
				hook,
			});
		}
		Ok(ExtensionFactory {
			inner: Arc::new(FactoryInner {
				name: self.name,
				kind: self.kind,
				default_priority: self.default_priority,
				default_settings: self.default_settings,
				default_exclude: self.default_exclude,
				default_properties: self.default_properties,
				hooks: Arc::new(self.hooks),
			}),
		})
	}
}

struct FactoryInner {
	name: &'static str,
	kind: ExtensionKind,
	default_priority: Priority,
	default_settings: Vec<(&'static str, SettingValue)>,
	default_exclude: ContributionFlags,
	default_properties: Vec<(&'static str, SettingValue)>,
	hooks: Arc<Hooks>,
}

/// Caller-supplied overrides applied when a factory creates an extension.
#[derive(Default)]
pub struct ExtensionOptions {
	/// Setting overrides, shallow-merged over the descriptor defaults.
	pub settings: FxHashMap<Box<str>, SettingValue>,
	/// Key-wise exclude overrides.
	pub exclude: ExcludePatch,
	/// Priority override.
	pub priority: Option<Priority>,
}

impl ExtensionOptions {
	pub fn setting(mut self, key: impl Into<Box<str>>, value: impl Into<SettingValue>) -> Self {
		self.settings.insert(key.into(), value.into());
		self
	}

	pub fn exclude(mut self, patch: ExcludePatch) -> Self {
		self.exclude = patch;
		self
	}

	pub fn priority(mut self, priority: Priority) -> Self {
		self.priority = Some(priority);
		self
	}
}

/// Produces [`Extension`] values for one validated descriptor.
///
/// Cheap to clone; every produced extension shares the descriptor's hooks.
#[derive(Clone)]
pub struct ExtensionFactory {
	inner: Arc<FactoryInner>,
}

impl std::fmt::Debug for ExtensionFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExtensionFactory")
			.field("name", &self.inner.name)
			.field("kind", &self.inner.kind)
			.finish_non_exhaustive()
	}
}

impl ExtensionFactory {
	/// The fixed name every extension from this factory carries.
	pub fn name(&self) -> &'static str {
		self.inner.name
	}

	pub fn kind(&self) -> ExtensionKind {
		self.inner.kind
	}

	/// Creates an extension with the descriptor defaults.
	pub fn create(&self) -> Extension {
		self.create_with(ExtensionOptions::default())
	}

	/// Creates an extension with caller overrides merged over the defaults.
	pub fn create_with(&self, options: ExtensionOptions) -> Extension {
		let inner = &self.inner;
		let settings = Settings::merged(
			&inner.default_settings,
			inner.default_exclude,
			&options.settings,
			options.exclude,
		);
		let properties = inner
			.default_properties
			.iter()
			.map(|(key, value)| (Box::from(*key), value.clone()))
			.collect();
		Extension::new(
			inner.name,
			inner.kind,
			options.priority.unwrap_or(inner.default_priority),
			settings,
			properties,
			Arc::clone(&inner.hooks),
		)
	}
}
