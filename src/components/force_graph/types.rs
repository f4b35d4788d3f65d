use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node object exactly as it appears in the dataset file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNode(pub Map<String, Value>);

/// A link object exactly as it appears in the dataset file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLink(pub Map<String, Value>);

impl RawNode {
	/// Look up a field of the raw object.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}
}

impl RawLink {
	/// Look up a field of the raw object.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}
}

/// `{ "nodes": [...], "links": [...] }` as fetched from a dataset file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub links: Vec<RawLink>,
}

impl GraphData {
	/// Parse a dataset document.
	pub fn from_json(text: &str) -> serde_json::Result<Self> {
		serde_json::from_str(text)
	}
}

/// Interned identifier or group value.
///
/// Objects and arrays collapse to their JSON text so that equality and
/// ordering stay well defined when a sub-object is used as a key.
#[derive(Clone, Debug)]
pub enum GroupKey {
	Null,
	Bool(bool),
	Number(f64),
	Text(String),
}

impl GroupKey {
	/// Intern a JSON value.
	pub fn intern(value: &Value) -> Self {
		match value {
			Value::Null => GroupKey::Null,
			Value::Bool(b) => GroupKey::Bool(*b),
			Value::Number(n) => n.as_f64().map_or(GroupKey::Null, GroupKey::Number),
			Value::String(s) => GroupKey::Text(s.clone()),
			composite => GroupKey::Text(composite.to_string()),
		}
	}

	pub fn text(s: impl Into<String>) -> Self {
		GroupKey::Text(s.into())
	}

	fn rank(&self) -> u8 {
		match self {
			GroupKey::Null => 0,
			GroupKey::Bool(_) => 1,
			GroupKey::Number(_) => 2,
			GroupKey::Text(_) => 3,
		}
	}
}

impl From<&str> for GroupKey {
	fn from(s: &str) -> Self {
		GroupKey::Text(s.to_string())
	}
}

impl PartialEq for GroupKey {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for GroupKey {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(GroupKey::Bool(a), GroupKey::Bool(b)) => a.cmp(b),
			(GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
			(GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}
}

impl std::hash::Hash for GroupKey {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.rank().hash(state);
		match self {
			GroupKey::Null => {}
			GroupKey::Bool(b) => b.hash(state),
			GroupKey::Number(n) => n.to_bits().hash(state),
			GroupKey::Text(s) => s.hash(state),
		}
	}
}

impl fmt::Display for GroupKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GroupKey::Null => f.write_str("null"),
			GroupKey::Bool(b) => write!(f, "{b}"),
			GroupKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
			GroupKey::Number(n) => write!(f, "{n}"),
			GroupKey::Text(s) => f.write_str(s),
		}
	}
}

/// Which node field drives color, size and opacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
	#[default]
	Community,
	Location,
	Influence,
	None,
}

impl GroupingMode {
	/// Modes offered by the grouping selector.
	pub const SELECTABLE: [GroupingMode; 3] = [
		GroupingMode::Community,
		GroupingMode::Location,
		GroupingMode::Influence,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			GroupingMode::Community => "community",
			GroupingMode::Location => "location",
			GroupingMode::Influence => "influence",
			GroupingMode::None => "none",
		}
	}
}

impl fmt::Display for GroupingMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for GroupingMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"community" => Ok(GroupingMode::Community),
			"location" => Ok(GroupingMode::Location),
			"influence" => Ok(GroupingMode::Influence),
			"none" | "" => Ok(GroupingMode::None),
			other => Err(format!("unknown grouping mode `{other}`")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn interning_collapses_composites_to_text() {
		let a = GroupKey::intern(&json!({"region": "north"}));
		let b = GroupKey::intern(&json!({"region": "north"}));
		assert_eq!(a, b);
		assert_eq!(a, GroupKey::text(r#"{"region":"north"}"#));
	}

	#[test]
	fn keys_order_by_kind_then_value() {
		let mut keys = vec![
			GroupKey::text("b"),
			GroupKey::Number(3.0),
			GroupKey::Bool(true),
			GroupKey::Null,
			GroupKey::text("a"),
			GroupKey::Bool(false),
			GroupKey::Number(-1.0),
		];
		keys.sort();
		assert_eq!(
			keys,
			vec![
				GroupKey::Null,
				GroupKey::Bool(false),
				GroupKey::Bool(true),
				GroupKey::Number(-1.0),
				GroupKey::Number(3.0),
				GroupKey::text("a"),
				GroupKey::text("b"),
			]
		);
	}

	#[test]
	fn numbers_display_like_integers_when_whole() {
		assert_eq!(GroupKey::Number(4.0).to_string(), "4");
		assert_eq!(GroupKey::Number(2.5).to_string(), "2.5");
		assert_eq!(GroupKey::Bool(true).to_string(), "true");
	}

	#[test]
	fn dataset_without_links_parses() {
		let data = GraphData::from_json(r#"{"nodes":[{"id":"a","extra":1}]}"#).unwrap();
		assert_eq!(data.nodes.len(), 1);
		assert!(data.links.is_empty());
		assert_eq!(data.nodes[0].field("extra"), Some(&json!(1)));
	}

	#[test]
	fn grouping_modes_parse_from_selector_values() {
		for mode in GroupingMode::SELECTABLE {
			assert_eq!(mode.as_str().parse::<GroupingMode>(), Ok(mode));
		}
		assert!("size".parse::<GroupingMode>().is_err());
	}
}
