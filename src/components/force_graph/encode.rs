use super::model::{GraphModel, Link, Node};
use super::options::{ForceGraphOptions, NodeStyle};
use super::scale::ColorScale;
use super::types::{GroupKey, GroupingMode};

pub const INFLUENCER_RADIUS: f64 = 15.0;
pub const FOLLOWER_RADIUS: f64 = 5.0;
/// Opacity of nodes whose location is the literal `"None"`.
pub const UNLOCATED_OPACITY: f64 = 0.2;

/// Maps node and link records to drawable attributes for one grouping mode.
#[derive(Clone, Debug)]
pub struct VisualEncoder {
	mode: GroupingMode,
	colors: Option<ColorScale>,
	node: NodeStyle,
}

impl VisualEncoder {
	pub fn new(mode: GroupingMode, colors: Option<ColorScale>, node: NodeStyle) -> Self {
		Self { mode, colors, node }
	}

	/// Build an encoder whose color scale covers the model's groups, or the
	/// explicit `options.groups` domain when one is given.
	pub fn for_model(model: &GraphModel, mode: GroupingMode, options: &ForceGraphOptions) -> Self {
		let colors = model.has_groups().then(|| {
			let domain = options.groups.clone().unwrap_or_else(|| model.group_domain());
			ColorScale::new(domain, &options.colors)
		});
		Self::new(mode, colors, options.node.clone())
	}

	pub fn color_scale(&self) -> Option<&ColorScale> {
		self.colors.as_ref()
	}

	pub fn radius(&self, node: &Node) -> f64 {
		match self.mode {
			GroupingMode::Influence => {
				if node.is_influencer == Some(true) {
					INFLUENCER_RADIUS
				} else {
					FOLLOWER_RADIUS
				}
			}
			GroupingMode::Location => self.node.radius,
			GroupingMode::Community | GroupingMode::None => node.radius.unwrap_or(self.node.radius),
		}
	}

	pub fn opacity(&self, node: &Node) -> f64 {
		match self.mode {
			GroupingMode::Location if node.group == Some(GroupKey::text("None")) => {
				UNLOCATED_OPACITY
			}
			_ => 1.0,
		}
	}

	/// Group color, falling back to the static node fill.
	pub fn fill(&self, node: &Node) -> &str {
		// Unlike an implicit ordinal domain, a missing group value never
		// claims a palette entry; it keeps the plain fill.
		self.colors
			.as_ref()
			.zip(node.group.as_ref())
			.and_then(|(scale, group)| scale.color(group))
			.unwrap_or(self.node.fill.as_str())
	}

	/// Per-link stroke width if one was derived and is drawable.
	pub fn link_width(&self, link: &Link) -> Option<f64> {
		link.stroke_width.filter(|w| w.is_finite())
	}

	pub fn link_stroke<'a>(&self, link: &'a Link) -> Option<&'a str> {
		link.stroke.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::model::Accessors;
	use crate::components::force_graph::types::GraphData;

	fn encoder(mode: GroupingMode) -> VisualEncoder {
		VisualEncoder::new(mode, None, NodeStyle::default())
	}

	fn grouped(json: &str, mode: GroupingMode, options: &ForceGraphOptions) -> (GraphModel, VisualEncoder) {
		let data = GraphData::from_json(json).unwrap();
		let model = GraphModel::new(&data, &Accessors::for_grouping(mode));
		let e = VisualEncoder::for_model(&model, mode, options);
		(model, e)
	}

	fn node(is_influencer: Option<bool>, group: Option<GroupKey>) -> Node {
		Node {
			is_influencer,
			group,
			..Node::default()
		}
	}

	#[test]
	fn influence_mode_sizes_influencers() {
		let e = encoder(GroupingMode::Influence);
		assert_eq!(e.radius(&node(Some(true), None)), 15.0);
		assert_eq!(e.radius(&node(Some(false), None)), 5.0);
		assert_eq!(e.radius(&node(None, None)), 5.0);
		assert_eq!(e.opacity(&node(Some(true), None)), 1.0);
	}

	#[test]
	fn influence_mode_ignores_radius_override() {
		let e = encoder(GroupingMode::Influence);
		let mut n = node(Some(true), None);
		n.radius = Some(40.0);
		assert_eq!(e.radius(&n), 15.0);
		assert_eq!(encoder(GroupingMode::Community).radius(&n), 40.0);
		assert_eq!(encoder(GroupingMode::Location).radius(&n), 5.0);
	}

	#[test]
	fn location_mode_fades_unlocated_nodes() {
		let e = encoder(GroupingMode::Location);
		assert_eq!(e.opacity(&node(None, Some("None".into()))), 0.2);
		assert_eq!(e.opacity(&node(None, Some("Mumbai".into()))), 1.0);
		assert_eq!(e.opacity(&node(None, None)), 1.0);
		assert_eq!(encoder(GroupingMode::Community).opacity(&node(None, Some("None".into()))), 1.0);
	}

	#[test]
	fn fill_follows_group_color_or_falls_back() {
		let (model, e) = grouped(
			r#"{"nodes":[{"id":"a","group":"y"},{"id":"b","group":"x"},{"id":"c"}]}"#,
			GroupingMode::Community,
			&ForceGraphOptions::default(),
		);
		assert_eq!(e.fill(&model.nodes[1]), "#4e79a7");
		assert_eq!(e.fill(&model.nodes[0]), "#f28e2c");
		assert_eq!(e.fill(&model.nodes[2]), "currentColor");
	}

	#[test]
	fn no_group_accessor_means_no_scale() {
		let (model, e) = grouped(
			r#"{"nodes":[{"id":"a","group":"y"}]}"#,
			GroupingMode::None,
			&ForceGraphOptions::default(),
		);
		assert!(e.color_scale().is_none());
		assert_eq!(e.fill(&model.nodes[0]), "currentColor");
	}

	#[test]
	fn non_finite_link_widths_are_dropped() {
		let e = encoder(GroupingMode::None);
		let link = |w| Link {
			source: None,
			target: None,
			stroke_width: w,
			stroke: None,
		};
		assert_eq!(e.link_width(&link(Some(2.0))), Some(2.0));
		assert_eq!(e.link_width(&link(Some(f64::NAN))), None);
		assert_eq!(e.link_width(&link(None)), None);
	}

	#[test]
	fn explicit_groups_replace_observed_domain() {
		let options = ForceGraphOptions {
			groups: Some(vec![GroupKey::text("z"), GroupKey::text("y"), GroupKey::text("x")]),
			..ForceGraphOptions::default()
		};
		let (model, e) = grouped(
			r#"{"nodes":[{"id":"a","group":"x"},{"id":"b","group":"z"},{"id":"c","group":"w"}]}"#,
			GroupingMode::Community,
			&options,
		);
		assert_eq!(e.fill(&model.nodes[1]), "#4e79a7");
		assert_eq!(e.fill(&model.nodes[0]), "#e15759");
		// Outside the explicit domain.
		assert_eq!(e.fill(&model.nodes[2]), "currentColor");
	}

	#[test]
	fn link_stroke_outlives_the_encoder() {
		let link = Link {
			source: None,
			target: None,
			stroke_width: None,
			stroke: Some("#123456".into()),
		};
		let stroke = {
			let e = encoder(GroupingMode::None);
			e.link_stroke(&link)
		};
		assert_eq!(stroke, Some("#123456"));
	}
}
