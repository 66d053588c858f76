//! The `Initializing` pass: schema assembly, direct contributions, harvest loop.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use vellum_model::{Plugin, SchemaSpec};

use crate::command::{Command, Helper};
use crate::contribution::ContributionKind;
use crate::error::ManagerError;
use crate::extension::Extension;
use crate::kind::HookKind;
use crate::manager::context::{InitContext, hook_failed};
use crate::manager::{EditorConfig, ManagerSettings};

/// Runs the whole pass over extensions already in execution order.
///
/// Deterministic: the same ordered extension list and settings always produce
/// the same frozen configuration, merge order included.
pub(super) fn build_config(
	order: &[Arc<Extension>],
	settings: &ManagerSettings,
) -> Result<EditorConfig, ManagerError> {
	let schema = assemble_schema(order, settings)?;

	let mut commands: IndexMap<Box<str>, Command> = IndexMap::new();
	let mut keymap: IndexMap<Box<str>, Box<str>> = IndexMap::new();
	let mut helpers: IndexMap<Box<str>, Helper> = IndexMap::new();
	let mut plugins: Vec<Plugin> = Vec::new();
	let mut command_owners: FxHashMap<Box<str>, &'static str> = FxHashMap::default();
	let mut binding_owners: FxHashMap<Box<str>, &'static str> = FxHashMap::default();

	for extension in order {
		collect_commands(extension, settings, &mut commands, &mut command_owners)?;
		collect_keymap(extension, settings, &mut keymap, &mut binding_owners)?;
		collect_helpers(extension, settings, &mut helpers)?;
		collect_plugins(extension, settings, &mut plugins)?;
	}

	run_init_hooks(order, settings, &schema, &mut plugins)?;

	Ok(EditorConfig {
		schema,
		plugins,
		commands,
		keymap,
		helpers,
	})
}

fn allows(settings: &ManagerSettings, extension: &Extension, kind: ContributionKind) -> bool {
	!settings.exclude.contains(kind.as_flags())
		&& !extension.settings().excludes(kind)
		&& extension.implements(kind)
}

fn assemble_schema(
	order: &[Arc<Extension>],
	settings: &ManagerSettings,
) -> Result<Arc<vellum_model::Schema>, ManagerError> {
	let mut spec = SchemaSpec::new();
	for extension in order {
		if !allows(settings, extension, ContributionKind::Schema) {
			continue;
		}
		if let Some(hook) = &extension.hooks().create_node_spec {
			let (name, node) = hook(extension)
				.map_err(|e| hook_failed(extension, HookKind::CreateNodeSpec, e))?;
			spec.add_node(name, node).map_err(|e| {
				hook_failed(extension, HookKind::CreateNodeSpec, e.to_string().into())
			})?;
		}
		if let Some(hook) = &extension.hooks().create_mark_spec {
			let (name, mark) = hook(extension)
				.map_err(|e| hook_failed(extension, HookKind::CreateMarkSpec, e))?;
			spec.add_mark(name, mark).map_err(|e| {
				hook_failed(extension, HookKind::CreateMarkSpec, e.to_string().into())
			})?;
		}
	}
	Ok(Arc::new(spec.compile()?))
}

fn collect_commands(
	extension: &Arc<Extension>,
	settings: &ManagerSettings,
	commands: &mut IndexMap<Box<str>, Command>,
	owners: &mut FxHashMap<Box<str>, &'static str>,
) -> Result<(), ManagerError> {
	if !allows(settings, extension, ContributionKind::Commands) {
		return Ok(());
	}
	let Some(hook) = &extension.hooks().create_commands else {
		return Ok(());
	};
	let contributed =
		hook(extension).map_err(|e| hook_failed(extension, HookKind::CreateCommands, e))?;
	for command in contributed {
		let name: Box<str> = command.name().into();
		if let Some(winner) = owners.get(&name) {
			// Earlier extension in execution order keeps the name.
			tracing::warn!(
				command = %name,
				winner = %winner,
				loser = %extension.name(),
				"duplicate command name; keeping earlier contribution"
			);
			continue;
		}
		owners.insert(name.clone(), extension.name());
		commands.insert(name, command);
	}
	Ok(())
}

fn collect_keymap(
	extension: &Arc<Extension>,
	settings: &ManagerSettings,
	keymap: &mut IndexMap<Box<str>, Box<str>>,
	owners: &mut FxHashMap<Box<str>, &'static str>,
) -> Result<(), ManagerError> {
	if !allows(settings, extension, ContributionKind::Keymap) {
		return Ok(());
	}
	let Some(hook) = &extension.hooks().create_keymap else {
		return Ok(());
	};
	let contributed =
		hook(extension).map_err(|e| hook_failed(extension, HookKind::CreateKeymap, e))?;
	for (binding, command) in contributed {
		if let Some(winner) = owners.get(&binding) {
			tracing::warn!(
				binding = %binding,
				winner = %winner,
				loser = %extension.name(),
				"contested keybinding; keeping earlier contribution"
			);
			continue;
		}
		owners.insert(binding.clone(), extension.name());
		keymap.insert(binding, command);
	}
	Ok(())
}

fn collect_helpers(
	extension: &Arc<Extension>,
	settings: &ManagerSettings,
	helpers: &mut IndexMap<Box<str>, Helper>,
) -> Result<(), ManagerError> {
	if !allows(settings, extension, ContributionKind::Helpers) {
		return Ok(());
	}
	let Some(hook) = &extension.hooks().create_helpers else {
		return Ok(());
	};
	let contributed =
		hook(extension).map_err(|e| hook_failed(extension, HookKind::CreateHelpers, e))?;
	for helper in contributed {
		let name: Box<str> = helper.name().into();
		if helpers.contains_key(&name) {
			tracing::warn!(
				helper = %name,
				loser = %extension.name(),
				"duplicate helper name; keeping earlier contribution"
			);
			continue;
		}
		helpers.insert(name, helper);
	}
	Ok(())
}

fn collect_plugins(
	extension: &Arc<Extension>,
	settings: &ManagerSettings,
	plugins: &mut Vec<Plugin>,
) -> Result<(), ManagerError> {
	if !allows(settings, extension, ContributionKind::Plugins) {
		return Ok(());
	}
	let Some(hook) = &extension.hooks().create_plugins else {
		return Ok(());
	};
	let contributed =
		hook(extension).map_err(|e| hook_failed(extension, HookKind::CreatePlugins, e))?;
	plugins.extend(contributed);
	Ok(())
}

/// Runs every `on_initialize` hook in execution order, driving the nested
/// harvest loop for each returned handler.
fn run_init_hooks(
	order: &[Arc<Extension>],
	settings: &ManagerSettings,
	schema: &Arc<vellum_model::Schema>,
	plugins: &mut Vec<Plugin>,
) -> Result<(), ManagerError> {
	for extension in order {
		let Some(hook) = &extension.hooks().on_initialize else {
			continue;
		};
		tracing::trace!(extension = %extension.name(), "on_initialize");
		let mut cx = InitContext::new(extension.name(), schema, settings, plugins);
		let handler =
			hook(extension, &mut cx).map_err(|e| hook_failed(extension, HookKind::OnInitialize, e))?;
		let Some(mut handler) = handler else {
			continue;
		};
		// The requester is visited through the same path as everyone else.
		for target in order {
			handler.for_each_extension(target, &mut cx)?;
		}
		handler.after_extension_loop(&mut cx)?;
	}
	Ok(())
}
