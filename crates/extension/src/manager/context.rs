use std::sync::Arc;

use vellum_model::{InputRule, NodeViewFactory, Plugin, Schema};

use crate::contribution::ContributionKind;
use crate::error::{HookError, InitError};
use crate::extension::Extension;
use crate::kind::HookKind;
use crate::manager::ManagerSettings;

/// Returned by an `on_initialize` hook to take part in the harvesting loop.
///
/// The manager invokes [`for_each_extension`](Self::for_each_extension) once
/// per registered extension (the requester included) in execution order, then
/// [`after_extension_loop`](Self::after_extension_loop) once. The usual
/// shape accumulates a sequence across the loop and flushes it into a single
/// plugin at the end.
pub trait InitHandler {
	fn for_each_extension(
		&mut self,
		target: &Arc<Extension>,
		cx: &mut InitContext<'_>,
	) -> Result<(), InitError>;

	fn after_extension_loop(&mut self, _cx: &mut InitContext<'_>) -> Result<(), InitError> {
		Ok(())
	}
}

/// Per-extension parameter object supplied to `on_initialize` and its
/// harvesting callbacks.
///
/// Exposes the assembled schema, the manager-wide settings, the shared plugin
/// list, and the harvest accessors that apply the skip rule.
pub struct InitContext<'a> {
	requester: &'static str,
	schema: &'a Arc<Schema>,
	settings: &'a ManagerSettings,
	plugins: &'a mut Vec<Plugin>,
}

impl<'a> InitContext<'a> {
	pub(super) fn new(
		requester: &'static str,
		schema: &'a Arc<Schema>,
		settings: &'a ManagerSettings,
		plugins: &'a mut Vec<Plugin>,
	) -> Self {
		Self {
			requester,
			schema,
			settings,
			plugins,
		}
	}

	/// Name of the extension this context was built for.
	pub fn requester(&self) -> &'static str {
		self.requester
	}

	pub fn schema(&self) -> &Schema {
		self.schema
	}

	pub fn settings(&self) -> &ManagerSettings {
		self.settings
	}

	/// Appends plugins to the shared ordered plugin list.
	pub fn add_plugins(&mut self, plugins: impl IntoIterator<Item = Plugin>) {
		self.plugins.extend(plugins);
	}

	/// The skip rule: a target's contribution is harvested only if the
	/// manager-wide exclude map allows the category, the target itself does
	/// not exclude it, and the target declares the corresponding hook.
	/// Evaluated per visited extension, never cached across runs.
	pub fn allows(&self, target: &Extension, kind: ContributionKind) -> bool {
		!self.settings.exclude.contains(kind.as_flags())
			&& !target.settings().excludes(kind)
			&& target.implements(kind)
	}

	/// Harvests the target's input rules, or `None` if the skip rule applies.
	pub fn input_rules_of(
		&self,
		target: &Extension,
	) -> Result<Option<Vec<InputRule>>, InitError> {
		if !self.allows(target, ContributionKind::InputRules) {
			return Ok(None);
		}
		let Some(hook) = &target.hooks().create_input_rules else {
			return Ok(None);
		};
		hook(target)
			.map(Some)
			.map_err(|source| hook_failed(target, HookKind::CreateInputRules, source))
	}

	/// Harvests the target's node-view factories, or `None` if the skip rule
	/// applies.
	pub fn node_views_of(
		&self,
		target: &Extension,
	) -> Result<Option<Vec<(Box<str>, NodeViewFactory)>>, InitError> {
		if !self.allows(target, ContributionKind::NodeViews) {
			return Ok(None);
		}
		let Some(hook) = &target.hooks().create_node_views else {
			return Ok(None);
		};
		hook(target)
			.map(Some)
			.map_err(|source| hook_failed(target, HookKind::CreateNodeViews, source))
	}

	/// Builds an [`InitError`] attributed to the requester's `on_initialize`
	/// hook, for handler-side failures.
	pub fn error(&self, message: impl Into<HookError>) -> InitError {
		InitError {
			extension: self.requester.into(),
			hook: HookKind::OnInitialize,
			source: message.into(),
		}
	}
}

pub(super) fn hook_failed(target: &Extension, hook: HookKind, source: HookError) -> InitError {
	InitError {
		extension: target.name().into(),
		hook,
		source,
	}
}
