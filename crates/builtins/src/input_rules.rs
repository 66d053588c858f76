use std::sync::Arc;

use vellum_extension::{
	Extension, ExtensionDescriptor, ExtensionFactory, InitContext, InitError, InitHandler,
	Priority,
};
use vellum_model::{InputRule, Plugin};

/// Key of the single plugin the aggregator registers.
pub const INPUT_RULES_PLUGIN: &str = "input-rules";

/// Frozen state of the aggregation plugin: every harvested rule, in
/// execution order. Rule precedence when two patterns could match the same
/// text is exactly this order.
pub struct InputRulesState {
	pub rules: Vec<InputRule>,
}

impl InputRulesState {
	/// Runs the rules against the text before the cursor; first match wins.
	pub fn apply(&self, text: &str) -> Option<vellum_model::RuleEdit> {
		self.rules.iter().find_map(|rule| rule.apply(text))
	}
}

struct RuleHarvest {
	rules: Vec<InputRule>,
}

impl InitHandler for RuleHarvest {
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
		// One combined plugin rather than one per contributor keeps match
		// precedence centralized. Registered even when empty so the plugin
		// set is shape-stable under excludes.
		let rules = std::mem::take(&mut self.rules);
		cx.add_plugins([Plugin::new(INPUT_RULES_PLUGIN, InputRulesState { rules })]);
		Ok(())
	}
}

/// Aggregation consumer for input rules: harvests every extension's
/// `create_input_rules` contribution and registers the combined plugin.
/// Runs at [`Priority::Low`] so the default band is fully registered first.
pub fn input_rules() -> ExtensionFactory {
	ExtensionDescriptor::plain("input_rules")
		.priority(Priority::Low)
		.on_initialize(|_, _| Ok(Some(Box::new(RuleHarvest { rules: Vec::new() }))))
		.build()
		.expect("input_rules descriptor is valid")
}
