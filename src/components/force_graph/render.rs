use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::encode::VisualEncoder;
use super::interaction::ViewTransform;
use super::options::ForceGraphOptions;
use super::simulation::Simulation;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Clone, Debug, PartialEq)]
pub struct CircleShape {
	pub node: usize,
	pub r: f64,
	pub fill: String,
	pub opacity: f64,
	pub title: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineShape {
	pub source: usize,
	pub target: usize,
	/// Overrides the link group's stroke when set.
	pub stroke: Option<String>,
	/// Overrides the link group's stroke width when set.
	pub stroke_width: Option<f64>,
}

/// Static description of every shape in a graph view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	pub circles: Vec<CircleShape>,
	pub lines: Vec<LineShape>,
}

impl Scene {
	/// One circle per node, one line per link the simulation resolved.
	pub fn build(sim: &Simulation, encoder: &VisualEncoder) -> Self {
		let circles = sim
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| CircleShape {
				node: i,
				r: encoder.radius(node),
				fill: encoder.fill(node).to_string(),
				opacity: encoder.opacity(node),
				title: node.title.clone(),
			})
			.collect();

		let lines = sim
			.links()
			.iter()
			.map(|resolved| {
				let link = sim.link_record(resolved.link);
				LineShape {
					source: resolved.source,
					target: resolved.target,
					stroke: link.and_then(|l| encoder.link_stroke(l)).map(str::to_string),
					stroke_width: link.and_then(|l| encoder.link_width(l)),
				}
			})
			.collect();

		Self { circles, lines }
	}

	/// Radii indexed by node, for hit testing.
	pub fn radii(&self) -> Vec<f64> {
		self.circles.iter().map(|c| c.r).collect()
	}
}

/// A [`Scene`] mounted as SVG elements.
pub struct SvgScene {
	svg: Element,
	root: Element,
	circles: Vec<Element>,
	lines: Vec<(Element, usize, usize)>,
}

fn create(document: &Document, tag: &str) -> Result<Element, JsValue> {
	document.create_element_ns(Some(SVG_NS), tag)
}

fn set_attrs(el: &Element, attrs: &[(&str, String)]) -> Result<(), JsValue> {
	for (name, value) in attrs {
		el.set_attribute(name, value)?;
	}
	Ok(())
}

impl SvgScene {
	/// Build the SVG tree for `scene` and append it to `host`.
	pub fn mount(
		document: &Document,
		host: &Element,
		scene: &Scene,
		options: &ForceGraphOptions,
	) -> Result<Self, JsValue> {
		let svg = create(document, "svg")?;
		set_attrs(
			&svg,
			&[
				("width", options.width.to_string()),
				("height", options.height.to_string()),
				("viewBox", options.view_box()),
				("style", "max-width: 100%; height: auto; height: intrinsic;".into()),
			],
		)?;

		let root = create(document, "g")?;
		svg.append_child(&root)?;

		let link_group = create(document, "g")?;
		let link = &options.link;
		set_attrs(
			&link_group,
			&[
				("stroke", link.stroke.clone()),
				("stroke-opacity", link.stroke_opacity.to_string()),
				("stroke-width", link.stroke_width.to_string()),
				("stroke-linecap", link.linecap.clone()),
			],
		)?;
		root.append_child(&link_group)?;

		let mut lines = Vec::with_capacity(scene.lines.len());
		for shape in &scene.lines {
			let line = create(document, "line")?;
			if let Some(stroke) = &shape.stroke {
				line.set_attribute("stroke", stroke)?;
			}
			if let Some(width) = shape.stroke_width {
				line.set_attribute("stroke-width", &width.to_string())?;
			}
			link_group.append_child(&line)?;
			lines.push((line, shape.source, shape.target));
		}

		let node_group = create(document, "g")?;
		let node = &options.node;
		set_attrs(
			&node_group,
			&[
				("fill", node.fill.clone()),
				("stroke", node.stroke.clone()),
				("stroke-opacity", node.stroke_opacity.to_string()),
				("stroke-width", node.stroke_width.to_string()),
			],
		)?;
		root.append_child(&node_group)?;

		let mut circles = Vec::with_capacity(scene.circles.len());
		for shape in &scene.circles {
			let circle = create(document, "circle")?;
			set_attrs(
				&circle,
				&[
					("r", shape.r.to_string()),
					("fill", shape.fill.clone()),
					("opacity", shape.opacity.to_string()),
				],
			)?;
			if let Some(text) = &shape.title {
				let title = create(document, "title")?;
				title.set_text_content(Some(text));
				circle.append_child(&title)?;
			}
			node_group.append_child(&circle)?;
			circles.push(circle);
		}

		host.append_child(&svg)?;
		Ok(Self {
			svg,
			root,
			circles,
			lines,
		})
	}

	pub fn svg(&self) -> &Element {
		&self.svg
	}

	/// Move every shape to its node's current position.
	pub fn update_positions(&self, sim: &Simulation) -> Result<(), JsValue> {
		let nodes = sim.nodes();
		for (line, source, target) in &self.lines {
			let (s, t) = (&nodes[*source], &nodes[*target]);
			set_attrs(
				line,
				&[
					("x1", s.x.to_string()),
					("y1", s.y.to_string()),
					("x2", t.x.to_string()),
					("y2", t.y.to_string()),
				],
			)?;
		}
		for (circle, node) in self.circles.iter().zip(nodes) {
			set_attrs(circle, &[("cx", node.x.to_string()), ("cy", node.y.to_string())])?;
		}
		Ok(())
	}

	pub fn set_transform(&self, transform: &ViewTransform) -> Result<(), JsValue> {
		self.root.set_attribute("transform", &transform.to_svg())
	}

	/// Detach the SVG from the page.
	pub fn remove(&self) {
		self.svg.remove();
	}
}
