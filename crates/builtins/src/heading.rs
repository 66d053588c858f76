use std::sync::Arc;

use vellum_extension::{Command, ExtensionDescriptor, ExtensionFactory, HookError};
use vellum_model::{AttrSpec, AttrValue, InputRule, NodeSpec, NodeView, RuleEdit};

/// Maximum level the `levels` setting may request.
const MAX_LEVEL: i64 = 6;

fn configured_levels(ext: &vellum_extension::Extension) -> i64 {
	ext.settings().get_int("levels").unwrap_or(MAX_LEVEL).clamp(1, MAX_LEVEL)
}

/// Section headings. The `levels` setting caps how many heading levels the
/// extension exposes; it drives the command set, the keybindings, and the
/// markdown-style `#` input rule alike.
pub fn heading() -> ExtensionFactory {
	ExtensionDescriptor::node("heading")
		.setting("levels", MAX_LEVEL)
		.node_spec(|_| {
			Ok((
				"heading".into(),
				NodeSpec {
					content: Some("inline*".into()),
					group: Some("block".into()),
					attrs: vec![AttrSpec::new("level", Some(AttrValue::Int(1)))],
					..NodeSpec::default()
				},
			))
		})
		.commands(|ext| {
			let commands = (1..=configured_levels(ext))
				.map(|level| {
					Command::new(format!("toggle_heading_{level}"), move |state| {
						if state.block_type() == "heading"
							&& state.block_attr("level") == Some(&AttrValue::Int(level))
						{
							state.set_block("paragraph", Vec::new());
						} else {
							state.set_block(
								"heading",
								vec![("level".into(), AttrValue::Int(level))],
							);
						}
						Ok(())
					})
					.active(move |state| {
						state.block_type() == "heading"
							&& state.block_attr("level") == Some(&AttrValue::Int(level))
					})
					.enabled(|state| state.is_editable())
				})
				.collect();
			Ok(commands)
		})
		.keymap(|ext| {
			Ok((1..=configured_levels(ext))
				.map(|level| {
					(
						format!("Mod-Alt-{level}").into(),
						format!("toggle_heading_{level}").into(),
					)
				})
				.collect())
		})
		.input_rules(|ext| {
			let levels = configured_levels(ext);
			let rule = InputRule::new(&format!(r"^(#{{1,{levels}}})\s$"), |caps| {
				let level = caps.get(1)?.as_str().len() as i64;
				Some(RuleEdit::WrapInNode {
					name: "heading".into(),
					attrs: vec![("level".into(), AttrValue::Int(level))],
				})
			})
			.map_err(|e| HookError::from(e.to_string()))?;
			Ok(vec![rule])
		})
		.node_views(|_| {
			Ok(vec![(
				"heading".into(),
				Arc::new(|attrs: &[(Box<str>, AttrValue)]| {
					let level = attrs
						.iter()
						.find_map(|(key, value)| match (key.as_ref(), value) {
							("level", AttrValue::Int(level)) => Some(*level),
							_ => None,
						})
						.unwrap_or(1);
					NodeView::new(format!("h{level}"), true)
				}) as _,
			)])
		})
		.build()
		.expect("heading descriptor is valid")
}
