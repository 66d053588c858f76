use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use vellum_model::{InputRule, MarkSpec, NodeSpec, Plugin, RuleEdit};

use crate::command::{Command, Helper};
use crate::contribution::{ContributionFlags, ExcludePatch};
use crate::error::{ConfigError, HookError, InitError, ManagerError};
use crate::extension::Extension;
use crate::factory::{ExtensionDescriptor, ExtensionOptions};
use crate::kind::HookKind;
use crate::manager::{InitContext, InitHandler, Manager, ManagerSettings, ManagerState};
use crate::priority::Priority;
use crate::settings::SettingValue;

/// A node extension claiming the top-node role, so schemas compile.
fn doc_ext() -> Extension {
	ExtensionDescriptor::node("doc")
		.priority(Priority::Highest)
		.node_spec(|_| {
			Ok((
				"doc".into(),
				NodeSpec {
					content: Some("block+".into()),
					top: true,
					..NodeSpec::default()
				},
			))
		})
		.build()
		.unwrap()
		.create()
}

fn noop_rule(pattern: &str) -> Result<InputRule, HookError> {
	InputRule::new(pattern, |_| Some(RuleEdit::ReplaceWith("".into())))
		.map_err(|e| HookError::from(e.to_string()))
}

/// A plain extension contributing one command and one input rule, with the
/// rule pattern derived from the extension name.
fn feature_ext(name: &'static str, priority: Priority) -> Extension {
	ExtensionDescriptor::plain(name)
		.priority(priority)
		.commands(move |_| Ok(vec![Command::new(format!("run_{name}"), |_| Ok(()))]))
		.input_rules(move |_| Ok(vec![noop_rule(&format!("{name}$"))?]))
		.build()
		.unwrap()
		.create()
}

#[derive(Debug, PartialEq)]
struct RulesState {
	patterns: Vec<String>,
}

struct RuleCollector {
	rules: Vec<InputRule>,
}

impl InitHandler for RuleCollector {
	fn for_each_extension(
		&mut self,
		target: &Arc<Extension>,
		cx: &mut InitContext<'_>,
	) -> Result<(), InitError> {
		if let Some(rules) = cx.input_rules_of(target)? {
			self.rules.extend(rules);
		}
		Ok(())
	}

	fn after_extension_loop(&mut self, cx: &mut InitContext<'_>) -> Result<(), InitError> {
		let patterns = self.rules.iter().map(|rule| rule.pattern().to_owned()).collect();
		cx.add_plugins([Plugin::new("input-rules", RulesState { patterns })]);
		Ok(())
	}
}

/// The reference aggregation consumer: harvests every extension's input rules
/// into a single plugin.
fn aggregator_ext() -> Extension {
	ExtensionDescriptor::plain("input_rules")
		.priority(Priority::Low)
		.on_initialize(|_, _| Ok(Some(Box::new(RuleCollector { rules: Vec::new() }))))
		.build()
		.unwrap()
		.create()
}

fn rules_plugin_patterns(manager: &Manager) -> Vec<String> {
	manager
		.config()
		.unwrap()
		.plugin("input-rules")
		.expect("aggregation plugin registered")
		.state::<RulesState>()
		.expect("typed plugin state")
		.patterns
		.clone()
}

#[test]
fn harvest_order_is_priority_then_registration_for_every_requester() {
	let log: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));

	struct Recorder {
		requester: &'static str,
		log: Arc<Mutex<Vec<(String, String)>>>,
	}

	impl InitHandler for Recorder {
		fn for_each_extension(
			&mut self,
			target: &Arc<Extension>,
			_cx: &mut InitContext<'_>,
		) -> Result<(), InitError> {
			self.log.lock().push((self.requester.to_owned(), target.name().to_owned()));
			Ok(())
		}
	}

	let recorder = |name: &'static str, priority: Priority| {
		let log = Arc::clone(&log);
		ExtensionDescriptor::plain(name)
			.priority(priority)
			.on_initialize(move |ext, _| {
				Ok(Some(Box::new(Recorder {
					requester: ext.name(),
					log: Arc::clone(&log),
				})))
			})
			.build()
			.unwrap()
			.create()
	};

	// Registration order deliberately disagrees with priority order; beta and
	// gamma tie on priority so registration order breaks the tie.
	let manager = Manager::initialized(
		vec![
			recorder("beta", Priority::Default),
			recorder("alpha", Priority::High),
			recorder("gamma", Priority::Default),
			doc_ext(),
		],
		ManagerSettings::default(),
	)
	.unwrap();
	assert_eq!(manager.state(), ManagerState::Ready);

	let expected_order = ["doc", "alpha", "beta", "gamma"];
	let log = log.lock();
	for requester in ["alpha", "beta", "gamma"] {
		let visits: Vec<&str> = log
			.iter()
			.filter(|(from, _)| from == requester)
			.map(|(_, to)| to.as_str())
			.collect();
		assert_eq!(visits, expected_order, "requester {requester}");
	}
}

#[test]
fn duplicate_name_fails_before_any_hook_runs() {
	static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

	let counting = || {
		ExtensionDescriptor::plain("twin")
			.commands(|_| {
				HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
				Ok(Vec::new())
			})
			.build()
			.unwrap()
			.create()
	};

	let err = Manager::new(vec![counting(), counting()], ManagerSettings::default()).unwrap_err();
	assert_eq!(err, ConfigError::DuplicateName("twin".into()));
	assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 0);
}

#[test]
fn aggregator_collects_rules_in_execution_order() {
	let manager = Manager::initialized(
		vec![
			feature_ext("bold", Priority::Default),
			feature_ext("heading", Priority::Default),
			aggregator_ext(),
			doc_ext(),
		],
		ManagerSettings::default(),
	)
	.unwrap();

	assert_eq!(rules_plugin_patterns(&manager), ["bold$", "heading$"]);
}

#[test]
fn manager_wide_exclude_suppresses_harvesting() {
	let manager = Manager::initialized(
		vec![
			feature_ext("bold", Priority::Default),
			feature_ext("heading", Priority::Default),
			aggregator_ext(),
			doc_ext(),
		],
		ManagerSettings {
			exclude: ContributionFlags::INPUT_RULES,
		},
	)
	.unwrap();

	// The aggregation plugin is still registered, with zero rules.
	assert_eq!(rules_plugin_patterns(&manager), Vec::<String>::new());
	// Other categories are untouched.
	assert!(manager.commands().unwrap().contains_key("run_bold"));
}

#[test]
fn per_extension_exclude_skips_only_that_category() {
	let bold = ExtensionDescriptor::plain("bold")
		.commands(|_| Ok(vec![Command::new("run_bold", |_| Ok(()))]))
		.input_rules(|_| Ok(vec![noop_rule("bold$")?]))
		.build()
		.unwrap()
		.create_with(
			ExtensionOptions::default()
				.exclude(ExcludePatch::disable(ContributionFlags::INPUT_RULES)),
		);

	let manager = Manager::initialized(
		vec![
			bold,
			feature_ext("heading", Priority::Default),
			aggregator_ext(),
			doc_ext(),
		],
		ManagerSettings::default(),
	)
	.unwrap();

	// bold's rules are skipped, its commands are not.
	assert_eq!(rules_plugin_patterns(&manager), ["heading$"]);
	assert!(manager.commands().unwrap().contains_key("run_bold"));
}

#[test]
fn failing_hook_aborts_and_names_extension_and_hook() {
	let broken = ExtensionDescriptor::plain("broken")
		.commands(|_| Err(HookError::from("deliberate failure")))
		.build()
		.unwrap()
		.create();

	let mut manager =
		Manager::new(vec![doc_ext(), broken], ManagerSettings::default()).unwrap();
	let err = manager.initialize().unwrap_err();
	assert_eq!(
		err,
		ManagerError::Init(InitError {
			extension: "broken".into(),
			hook: HookKind::CreateCommands,
			source: HookError::from("deliberate failure"),
		}),
	);

	// No partial Ready state: accessors keep failing.
	assert_eq!(manager.state(), ManagerState::Uninitialized);
	let lifecycle = manager.commands().unwrap_err();
	assert_eq!(lifecycle.operation, "commands");
	assert_eq!(lifecycle.state, ManagerState::Uninitialized);
}

#[test]
fn harvested_hook_failure_names_the_originating_extension() {
	let broken = ExtensionDescriptor::plain("broken")
		.input_rules(|_| Err(HookError::from("bad pattern")))
		.build()
		.unwrap()
		.create();

	let err = Manager::initialized(
		vec![doc_ext(), broken, aggregator_ext()],
		ManagerSettings::default(),
	)
	.unwrap_err();
	assert_eq!(
		err,
		ManagerError::Init(InitError {
			extension: "broken".into(),
			hook: HookKind::CreateInputRules,
			source: HookError::from("bad pattern"),
		}),
	);
}

#[test]
fn self_inclusion_lets_an_aggregator_harvest_itself() {
	let self_contributing = ExtensionDescriptor::plain("smart_quotes")
		.priority(Priority::Low)
		.input_rules(|_| Ok(vec![noop_rule("\"$")?]))
		.on_initialize(|_, _| Ok(Some(Box::new(RuleCollector { rules: Vec::new() }))))
		.build()
		.unwrap()
		.create();

	let manager = Manager::initialized(
		vec![feature_ext("bold", Priority::Default), self_contributing, doc_ext()],
		ManagerSettings::default(),
	)
	.unwrap();

	assert_eq!(rules_plugin_patterns(&manager), ["bold$", "\"$"]);
}

#[test]
fn lifecycle_accessors_follow_the_state_machine() {
	let mut manager = Manager::new(vec![doc_ext()], ManagerSettings::default()).unwrap();
	assert_eq!(manager.state(), ManagerState::Uninitialized);
	assert!(manager.schema().is_err());

	manager.initialize().unwrap();
	assert_eq!(manager.state(), ManagerState::Ready);
	assert_eq!(manager.schema().unwrap().top_node(), "doc");

	// A second initialization is a lifecycle error.
	assert!(matches!(
		manager.initialize().unwrap_err(),
		ManagerError::Lifecycle(_),
	));

	assert!(manager.settings().is_ok());
	manager.destroy().unwrap();
	assert_eq!(manager.state(), ManagerState::Destroyed);
	assert!(manager.schema().is_err());
	assert!(manager.extensions().is_err());
	assert!(manager.settings().is_err());
	assert!(manager.destroy().is_err());
}

#[test]
fn command_collisions_resolve_to_the_earlier_extension() {
	let first = ExtensionDescriptor::plain("first")
		.priority(Priority::High)
		.commands(|_| {
			Ok(vec![Command::new("shared", |state| {
				state.toggle_mark("first");
				Ok(())
			})])
		})
		.build()
		.unwrap()
		.create();
	let second = ExtensionDescriptor::plain("second")
		.commands(|_| {
			Ok(vec![Command::new("shared", |state| {
				state.toggle_mark("second");
				Ok(())
			})])
		})
		.build()
		.unwrap()
		.create();

	let manager =
		Manager::initialized(vec![second, first, doc_ext()], ManagerSettings::default()).unwrap();

	let mut state = vellum_model::EditorState::new();
	manager.commands().unwrap()["shared"].invoke(&mut state).unwrap();
	assert!(state.mark_active("first"));
	assert!(!state.mark_active("second"));
}

#[test]
fn identical_descriptor_lists_freeze_identically() {
	let build = || {
		Manager::initialized(
			vec![
				feature_ext("bold", Priority::Default),
				feature_ext("heading", Priority::Default),
				aggregator_ext(),
				doc_ext(),
			],
			ManagerSettings::default(),
		)
		.unwrap()
	};

	let a = build();
	let b = build();

	let names = |manager: &Manager| -> Vec<Box<str>> {
		manager.commands().unwrap().keys().cloned().collect()
	};
	let keys = |manager: &Manager| -> Vec<String> {
		manager.plugins().unwrap().iter().map(|p| p.key().to_owned()).collect()
	};
	assert_eq!(names(&a), names(&b));
	assert_eq!(keys(&a), keys(&b));
	assert_eq!(rules_plugin_patterns(&a), rules_plugin_patterns(&b));
	assert_eq!(a.keymap().unwrap(), b.keymap().unwrap());
	assert_eq!(
		a.schema().unwrap().node_names().collect::<Vec<_>>(),
		b.schema().unwrap().node_names().collect::<Vec<_>>(),
	);
}

#[test]
fn keybinding_collisions_resolve_to_the_earlier_extension() {
	let first = ExtensionDescriptor::plain("first")
		.priority(Priority::High)
		.commands(|_| Ok(vec![Command::new("run_first", |_| Ok(()))]))
		.keymap(|_| Ok(vec![("Mod-b".into(), "run_first".into())]))
		.build()
		.unwrap()
		.create();
	let second = ExtensionDescriptor::plain("second")
		.commands(|_| Ok(vec![Command::new("run_second", |_| Ok(()))]))
		.keymap(|_| Ok(vec![("Mod-b".into(), "run_second".into())]))
		.build()
		.unwrap()
		.create();

	let manager =
		Manager::initialized(vec![second, first, doc_ext()], ManagerSettings::default()).unwrap();

	let keymap = manager.keymap().unwrap();
	assert_eq!(keymap.get("Mod-b").map(AsRef::as_ref), Some("run_first"));
	// Losing the binding does not cost the extension its other contributions.
	assert!(manager.commands().unwrap().contains_key("run_second"));
}

#[test]
fn helper_collisions_resolve_to_the_earlier_extension() {
	let first = ExtensionDescriptor::plain("first")
		.priority(Priority::High)
		.helpers(|_| Ok(vec![Helper::new("shared", |_| SettingValue::Int(1))]))
		.build()
		.unwrap()
		.create();
	let second = ExtensionDescriptor::plain("second")
		.helpers(|_| Ok(vec![Helper::new("shared", |_| SettingValue::Int(2))]))
		.build()
		.unwrap()
		.create();

	let manager =
		Manager::initialized(vec![second, first, doc_ext()], ManagerSettings::default()).unwrap();

	let state = vellum_model::EditorState::new();
	assert_eq!(
		manager.helpers().unwrap()["shared"].call(&state),
		SettingValue::Int(1),
	);
}

#[test]
fn direct_plugins_and_helpers_are_collected() {
	let status = ExtensionDescriptor::plain("status")
		.helpers(|_| {
			Ok(vec![Helper::new("bold_active", |state| {
				SettingValue::Bool(state.mark_active("bold"))
			})])
		})
		.plugins(|_| Ok(vec![Plugin::new("status-bar", ())]))
		.build()
		.unwrap()
		.create();

	let manager =
		Manager::initialized(vec![status, doc_ext()], ManagerSettings::default()).unwrap();

	assert!(manager.config().unwrap().plugin("status-bar").is_some());
	let helpers = manager.helpers().unwrap();
	let mut state = vellum_model::EditorState::new();
	assert_eq!(helpers["bold_active"].call(&state), SettingValue::Bool(false));
	state.toggle_mark("bold");
	assert_eq!(helpers["bold_active"].call(&state), SettingValue::Bool(true));
}

#[test]
fn schema_conflicts_are_attributed_to_the_offending_extension() {
	let clash = |name: &'static str| {
		ExtensionDescriptor::mark(name)
			.mark_spec(|_| Ok(("emphasis".into(), MarkSpec::default())))
			.build()
			.unwrap()
			.create()
	};

	let err = Manager::initialized(
		vec![doc_ext(), clash("italic"), clash("oblique")],
		ManagerSettings::default(),
	)
	.unwrap_err();
	assert_eq!(
		err,
		ManagerError::Init(InitError {
			extension: "oblique".into(),
			hook: HookKind::CreateMarkSpec,
			source: HookError::from("duplicate mark spec: emphasis"),
		}),
	);
}
