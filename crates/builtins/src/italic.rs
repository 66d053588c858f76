use vellum_extension::{Command, ExtensionDescriptor, ExtensionFactory, HookError};
use vellum_model::{InputRule, MarkSpec, RuleEdit};

/// Emphasis. Same shape as [`crate::bold`], with the `_text_` input rule.
pub fn italic() -> ExtensionFactory {
	ExtensionDescriptor::mark("italic")
		.mark_spec(|_| {
			Ok((
				"italic".into(),
				MarkSpec {
					group: Some("formatting".into()),
					spanning: true,
				},
			))
		})
		.commands(|_| {
			Ok(vec![
				Command::new("toggle_italic", |state| {
					state.toggle_mark("italic");
					Ok(())
				})
				.active(|state| state.mark_active("italic"))
				.enabled(|state| state.is_editable()),
			])
		})
		.keymap(|_| Ok(vec![("Mod-i".into(), "toggle_italic".into())]))
		.input_rules(|_| {
			let rule = InputRule::new(r"(?:^|[^_])_([^_]+)_$", |_| {
				Some(RuleEdit::ToggleMark("italic".into()))
			})
			.map_err(|e| HookError::from(e.to_string()))?;
			Ok(vec![rule])
		})
		.build()
		.expect("italic descriptor is valid")
}
