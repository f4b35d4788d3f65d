use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use serde_json::Value;

use super::types::{GraphData, GroupKey, GroupingMode, RawLink, RawNode};

pub type NodeKeyFn = Rc<dyn Fn(&RawNode) -> Option<GroupKey>>;
pub type NodeFlagFn = Rc<dyn Fn(&RawNode) -> Option<bool>>;
pub type NodeTextFn = Rc<dyn Fn(&RawNode) -> Option<String>>;
pub type NodeNumberFn = Rc<dyn Fn(&RawNode) -> Option<f64>>;
pub type LinkKeyFn = Rc<dyn Fn(&RawLink) -> Option<GroupKey>>;
pub type LinkNumberFn = Rc<dyn Fn(&RawLink) -> Option<f64>>;
pub type LinkTextFn = Rc<dyn Fn(&RawLink) -> Option<String>>;

/// How node titles (hover text) are produced.
#[derive(Clone, Default)]
pub enum NodeTitle {
	/// The node identifier.
	#[default]
	Id,
	/// No title element.
	Disabled,
	Custom(NodeTextFn),
}

/// Field extractors applied to raw dataset objects.
#[derive(Clone)]
pub struct Accessors {
	pub node_id: NodeKeyFn,
	pub node_group: Option<NodeKeyFn>,
	pub node_geolocation: Option<NodeTextFn>,
	pub node_community: Option<NodeKeyFn>,
	pub node_influence: Option<NodeFlagFn>,
	pub node_title: NodeTitle,
	pub node_radius: Option<NodeNumberFn>,
	pub link_source: LinkKeyFn,
	pub link_target: LinkKeyFn,
	pub link_stroke_width: Option<LinkNumberFn>,
	pub link_stroke: Option<LinkTextFn>,
}

impl Default for Accessors {
	fn default() -> Self {
		Self {
			node_id: node_key("id"),
			node_group: None,
			node_geolocation: None,
			node_community: None,
			node_influence: None,
			node_title: NodeTitle::Id,
			node_radius: None,
			link_source: link_key("source"),
			link_target: link_key("target"),
			link_stroke_width: None,
			link_stroke: None,
		}
	}
}

impl Accessors {
	/// Extractors used by the explorer page for a grouping mode.
	pub fn for_grouping(mode: GroupingMode) -> Self {
		let node_group = match mode {
			GroupingMode::Community => Some(node_key("group")),
			GroupingMode::Location => Some(node_key("location")),
			GroupingMode::Influence => Some(node_key("is_influencer")),
			GroupingMode::None => None,
		};
		Self {
			node_group,
			node_geolocation: Some(node_text("location")),
			node_community: Some(node_key("group")),
			node_influence: Some(Rc::new(|n: &RawNode| {
				n.field("is_influencer").and_then(Value::as_bool)
			})),
			node_title: NodeTitle::Custom(Rc::new(|n: &RawNode| {
				Some(format!("{}\n{}", display_field(n.field("id")), display_field(n.field("group"))))
			})),
			link_stroke_width: Some(Rc::new(|l: &RawLink| {
				l.field("weight").and_then(Value::as_f64).map(link_width_from_weight)
			})),
			..Self::default()
		}
	}
}

/// Stroke width for a weighted link, scaled so area tracks weight.
///
/// Negative weights yield NaN.
pub fn link_width_from_weight(weight: f64) -> f64 {
	weight.sqrt()
}

/// Extract and intern a named field.
pub fn node_key(field: &'static str) -> NodeKeyFn {
	Rc::new(move |n: &RawNode| n.field(field).map(GroupKey::intern))
}

fn node_text(field: &'static str) -> NodeTextFn {
	Rc::new(move |n: &RawNode| n.field(field).map(|v| GroupKey::intern(v).to_string()))
}

fn link_key(field: &'static str) -> LinkKeyFn {
	Rc::new(move |l: &RawLink| l.field(field).map(GroupKey::intern))
}

fn display_field(value: Option<&Value>) -> String {
	value.map_or_else(|| "undefined".to_string(), |v| GroupKey::intern(v).to_string())
}

/// A node record owned by one visualization instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
	pub id: Option<GroupKey>,
	pub group: Option<GroupKey>,
	pub location: Option<String>,
	pub is_influencer: Option<bool>,
	pub community: Option<GroupKey>,
	pub title: Option<String>,
	pub radius: Option<f64>,
	pub x: f64,
	pub y: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	pub source: Option<GroupKey>,
	pub target: Option<GroupKey>,
	pub stroke_width: Option<f64>,
	pub stroke: Option<String>,
}

/// A link whose endpoints were found in the node set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLink {
	/// Position of the link in [`GraphModel::links`].
	pub link: usize,
	pub source: usize,
	pub target: usize,
}

/// Normalized node and link records for one dataset load.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
	has_groups: bool,
}

impl GraphModel {
	pub fn new(data: &GraphData, accessors: &Accessors) -> Self {
		let nodes = data
			.nodes
			.iter()
			.map(|raw| {
				let id = (accessors.node_id)(raw);
				let title = match &accessors.node_title {
					NodeTitle::Id => id.as_ref().map(ToString::to_string),
					NodeTitle::Disabled => None,
					NodeTitle::Custom(f) => f(raw),
				};
				Node {
					group: accessors.node_group.as_ref().and_then(|f| f(raw)),
					location: accessors.node_geolocation.as_ref().and_then(|f| f(raw)),
					is_influencer: accessors.node_influence.as_ref().and_then(|f| f(raw)),
					community: accessors.node_community.as_ref().and_then(|f| f(raw)),
					radius: accessors.node_radius.as_ref().and_then(|f| f(raw)),
					id,
					title,
					..Node::default()
				}
			})
			.collect();

		let links = data
			.links
			.iter()
			.map(|raw| Link {
				source: (accessors.link_source)(raw),
				target: (accessors.link_target)(raw),
				stroke_width: accessors.link_stroke_width.as_ref().and_then(|f| f(raw)),
				stroke: accessors.link_stroke.as_ref().and_then(|f| f(raw)),
			})
			.collect();

		Self {
			nodes,
			links,
			has_groups: accessors.node_group.is_some(),
		}
	}

	/// Whether a group extractor was configured for this load.
	pub fn has_groups(&self) -> bool {
		self.has_groups
	}

	/// Sorted, deduplicated group values observed in the node set.
	pub fn group_domain(&self) -> Vec<GroupKey> {
		self.nodes
			.iter()
			.filter_map(|n| n.group.clone())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	/// Map link endpoints onto node positions.
	///
	/// Returns the resolved links and how many were dropped. A duplicated
	/// node id resolves to the last node carrying it.
	pub fn resolve_links(&self) -> (Vec<ResolvedLink>, usize) {
		let index: HashMap<&GroupKey, usize> = self
			.nodes
			.iter()
			.enumerate()
			.filter_map(|(i, n)| n.id.as_ref().map(|id| (id, i)))
			.collect();

		let mut resolved = Vec::with_capacity(self.links.len());
		let mut dropped = 0;
		for (i, link) in self.links.iter().enumerate() {
			let endpoint = |key: &Option<GroupKey>| key.as_ref().and_then(|k| index.get(k).copied());
			match (endpoint(&link.source), endpoint(&link.target)) {
				(Some(source), Some(target)) => resolved.push(ResolvedLink {
					link: i,
					source,
					target,
				}),
				_ => dropped += 1,
			}
		}
		(resolved, dropped)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn data(json: &str) -> GraphData {
		GraphData::from_json(json).unwrap()
	}

	#[test]
	fn explorer_accessors_pick_fields_by_grouping() {
		let d = data(
			r#"{"nodes":[{"id":"a","group":2,"location":"Delhi","is_influencer":true}],"links":[]}"#,
		);
		let community = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::Community));
		assert_eq!(community.nodes[0].group, Some(GroupKey::Number(2.0)));
		assert_eq!(community.nodes[0].community, Some(GroupKey::Number(2.0)));
		assert_eq!(community.nodes[0].location.as_deref(), Some("Delhi"));
		assert_eq!(community.nodes[0].is_influencer, Some(true));
		assert_eq!(community.nodes[0].title.as_deref(), Some("a\n2"));

		let location = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::Location));
		assert_eq!(location.nodes[0].group, Some(GroupKey::text("Delhi")));

		let influence = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::Influence));
		assert_eq!(influence.nodes[0].group, Some(GroupKey::Bool(true)));

		let none = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::None));
		assert_eq!(none.nodes[0].group, None);
		assert!(!none.has_groups());
	}

	#[test]
	fn missing_fields_propagate_as_none() {
		let d = data(r#"{"nodes":[{"id":"a"}],"links":[{"source":"a"}]}"#);
		let model = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::Community));
		let node = &model.nodes[0];
		assert_eq!(node.group, None);
		assert_eq!(node.location, None);
		assert_eq!(node.is_influencer, None);
		assert_eq!(node.title.as_deref(), Some("a\nundefined"));
		assert_eq!(model.links[0].target, None);
		assert_eq!(model.links[0].stroke_width, None);
	}

	#[test]
	fn default_title_is_the_identifier() {
		let d = data(r#"{"nodes":[{"id":7}]}"#);
		let model = GraphModel::new(&d, &Accessors::default());
		assert_eq!(model.nodes[0].title.as_deref(), Some("7"));

		let disabled = Accessors {
			node_title: NodeTitle::Disabled,
			..Accessors::default()
		};
		assert_eq!(GraphModel::new(&d, &disabled).nodes[0].title, None);
	}

	#[test]
	fn group_domain_is_sorted_and_deduplicated() {
		let d = data(
			r#"{"nodes":[{"id":"a","group":"z"},{"id":"b","group":"m"},{"id":"c","group":"z"},{"id":"d"}]}"#,
		);
		let model = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::Community));
		assert_eq!(model.group_domain(), vec![GroupKey::text("m"), GroupKey::text("z")]);
	}

	#[test]
	fn unresolved_links_are_dropped() {
		let d = data(
			r#"{"nodes":[{"id":"a"},{"id":"b"}],
			"links":[{"source":"a","target":"b"},{"source":"z","target":"a"},{"source":"b"}]}"#,
		);
		let model = GraphModel::new(&d, &Accessors::default());
		let (resolved, dropped) = model.resolve_links();
		assert_eq!(resolved, vec![ResolvedLink { link: 0, source: 0, target: 1 }]);
		assert_eq!(dropped, 2);
	}

	#[test]
	fn numeric_and_text_ids_do_not_collide() {
		let d = data(
			r#"{"nodes":[{"id":1},{"id":"1"}],"links":[{"source":"1","target":1}]}"#,
		);
		let model = GraphModel::new(&d, &Accessors::default());
		let (resolved, _) = model.resolve_links();
		assert_eq!(resolved[0].source, 1);
		assert_eq!(resolved[0].target, 0);
	}

	#[test]
	fn link_width_is_square_root_of_weight() {
		assert_eq!(link_width_from_weight(4.0), 2.0);
		assert_eq!(link_width_from_weight(0.0), 0.0);
		assert!(link_width_from_weight(-1.0).is_nan());

		let d = data(r#"{"nodes":[],"links":[{"source":"a","target":"b","weight":9}]}"#);
		let model = GraphModel::new(&d, &Accessors::for_grouping(GroupingMode::None));
		assert_eq!(model.links[0].stroke_width, Some(3.0));
	}
}
