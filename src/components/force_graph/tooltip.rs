use leptos::prelude::*;

use super::model::Node;

/// What the floating tooltip shows, and where.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
	pub visible: bool,
	/// Client (viewport) coordinates.
	pub x: f64,
	pub y: f64,
	pub fields: Vec<(&'static str, String)>,
}

impl TooltipState {
	pub fn hidden() -> Self {
		Self::default()
	}

	pub fn for_node(node: &Node, x: f64, y: f64) -> Self {
		fn shown<T: ToString>(value: Option<&T>) -> String {
			value.map_or_else(|| "undefined".to_string(), ToString::to_string)
		}
		Self {
			visible: true,
			x,
			y,
			fields: vec![
				("ID", shown(node.id.as_ref())),
				("Community", shown(node.community.as_ref())),
				("Location", shown(node.location.as_ref())),
				("Influence", shown(node.is_influencer.as_ref())),
			],
		}
	}

	/// Inline style positioning the tooltip box.
	pub fn style(&self) -> String {
		if self.visible {
			format!("position: fixed; left: {}px; top: {}px; display: block;", self.x, self.y)
		} else {
			"display: none;".to_string()
		}
	}
}

/// Renders a [`TooltipState`].
#[component]
pub fn Tooltip(#[prop(into)] state: Signal<TooltipState>) -> impl IntoView {
	view! {
		<div id="tooltip" class="tooltip" style=move || state.with(TooltipState::style)>
			{move || {
				state
					.with(|s| s.fields.clone())
					.into_iter()
					.map(|(label, value)| {
						view! {
							<div class="tooltip-row">
								<strong>{label}":"</strong>
								" "
								{value}
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}
