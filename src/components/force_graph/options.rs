use super::scale::default_palette;
use super::types::GroupKey;

/// Static node styling applied to the node group.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Fill used when no group color applies.
	pub fill: String,
	pub stroke: String,
	pub stroke_width: f64,
	pub stroke_opacity: f64,
	pub radius: f64,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			fill: "currentColor".into(),
			stroke: "#fff".into(),
			stroke_width: 1.5,
			stroke_opacity: 1.0,
			radius: 5.0,
		}
	}
}

/// Static link styling applied to the link group.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkStyle {
	pub stroke: String,
	pub stroke_opacity: f64,
	pub stroke_width: f64,
	pub linecap: String,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			stroke: "#999".into(),
			stroke_opacity: 0.6,
			stroke_width: 1.5,
			linecap: "round".into(),
		}
	}
}

/// Everything configurable about one graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceGraphOptions {
	pub node: NodeStyle,
	pub link: LinkStyle,
	/// Repulsion between nodes; the layout default when unset.
	pub node_strength: Option<f32>,
	/// Spring strength of links; the layout default when unset.
	pub link_strength: Option<f32>,
	pub colors: Vec<String>,
	/// Explicit color domain. Colors follow this order instead of the
	/// sorted groups observed in the data.
	pub groups: Option<Vec<GroupKey>>,
	pub width: f64,
	pub height: f64,
}

impl Default for ForceGraphOptions {
	fn default() -> Self {
		Self {
			node: NodeStyle::default(),
			link: LinkStyle::default(),
			node_strength: None,
			link_strength: None,
			colors: default_palette(),
			groups: None,
			width: 1600.0,
			height: 1000.0,
		}
	}
}

impl ForceGraphOptions {
	/// The SVG `viewBox`, centred on the origin.
	pub fn view_box(&self) -> String {
		format!(
			"{} {} {} {}",
			-self.width / 2.0,
			-self.height / 2.0,
			self.width,
			self.height
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn view_box_is_centred() {
		let options = ForceGraphOptions {
			width: 800.0,
			height: 600.0,
			..Default::default()
		};
		assert_eq!(options.view_box(), "-400 -300 800 600");
	}
}
