use vellum_extension::{Command, ExtensionDescriptor, ExtensionFactory, HookError};
use vellum_model::{InputRule, MarkSpec, RuleEdit};

/// Strong emphasis. Contributes the `bold` mark, a toggle command with its
/// capability triple, the `Mod-b` binding, and a `**text**` input rule.
pub fn bold() -> ExtensionFactory {
	ExtensionDescriptor::mark("bold")
		.mark_spec(|_| {
			Ok((
				"bold".into(),
				MarkSpec {
					group: Some("formatting".into()),
					spanning: true,
				},
			))
		})
		.commands(|_| {
			Ok(vec![
				Command::new("toggle_bold", |state| {
					state.toggle_mark("bold");
					Ok(())
				})
				.active(|state| state.mark_active("bold"))
				.enabled(|state| state.is_editable()),
			])
		})
		.keymap(|_| Ok(vec![("Mod-b".into(), "toggle_bold".into())]))
		.input_rules(|_| {
			let rule = InputRule::new(r"\*\*([^*]+)\*\*$", |_| {
				Some(RuleEdit::ToggleMark("bold".into()))
			})
			.map_err(|e| HookError::from(e.to_string()))?;
			Ok(vec![rule])
		})
		.build()
		.expect("bold descriptor is valid")
}
