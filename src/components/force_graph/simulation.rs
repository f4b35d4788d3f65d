use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::model::{GraphModel, Link, Node, ResolvedLink};
use super::options::ForceGraphOptions;

const ALPHA_MIN: f64 = 0.001;
const INITIAL_RADIUS: f64 = 10.0;
/// Alpha target while a node is being dragged.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

type TickCallback = Box<dyn FnMut(u64)>;

/// Force layout over one dataset load.
///
/// Integration is delegated to [`ForceGraph`]; this type adds a cooling
/// schedule, pins, centring and explicit shutdown.
pub struct Simulation {
	graph: ForceGraph<usize, ()>,
	handles: Vec<DefaultNodeIdx>,
	nodes: Vec<Node>,
	links: Vec<ResolvedLink>,
	link_records: Vec<Link>,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	running: bool,
	stopped: bool,
	ticks: u64,
	listeners: Vec<TickCallback>,
}

impl Simulation {
	pub fn new(model: GraphModel, links: Vec<ResolvedLink>, options: &ForceGraphOptions) -> Self {
		let defaults = SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		};
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: options.node_strength.unwrap_or(defaults.force_charge),
			force_spring: options.link_strength.unwrap_or(defaults.force_spring),
			..defaults
		});

		let link_records = model.links;
		let mut nodes = model.nodes;
		let golden_angle = PI * (3.0 - 5f64.sqrt());
		let handles = nodes
			.iter_mut()
			.enumerate()
			.map(|(i, node)| {
				// Phyllotaxis seeding around the origin.
				let (r, angle) = (INITIAL_RADIUS * (0.5 + i as f64).sqrt(), i as f64 * golden_angle);
				node.x = r * angle.cos();
				node.y = r * angle.sin();
				graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: 10.0,
					is_anchor: false,
					user_data: i,
				})
			})
			.collect::<Vec<_>>();

		for link in &links {
			graph.add_edge(handles[link.source], handles[link.target], EdgeData::default());
		}

		Self {
			graph,
			handles,
			nodes,
			links,
			link_records,
			alpha: 1.0,
			alpha_target: 0.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			running: true,
			stopped: false,
			ticks: 0,
			listeners: Vec::new(),
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn links(&self) -> &[ResolvedLink] {
		&self.links
	}

	/// The normalized link a resolved link came from.
	pub fn link_record(&self, index: usize) -> Option<&Link> {
		self.link_records.get(index)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_running(&self) -> bool {
		self.running && !self.stopped
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	/// Register a callback invoked after every tick with the tick count.
	pub fn on_tick(&mut self, callback: impl FnMut(u64) + 'static) {
		self.listeners.push(Box::new(callback));
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Resume ticking after the layout cooled down. No effect once stopped.
	pub fn restart(&mut self) {
		if !self.stopped {
			self.running = true;
		}
	}

	/// Halt for good; later ticks are ignored and no callbacks fire.
	pub fn stop(&mut self) {
		self.stopped = true;
		self.running = false;
		self.listeners.clear();
	}

	/// Fix a node at `(x, y)` against the layout forces.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		let Some(node) = self.nodes.get_mut(index) else {
			return;
		};
		node.fx = Some(x);
		node.fy = Some(y);
		node.x = x;
		node.y = y;
		self.apply_pins();
	}

	/// Release a pinned node.
	pub fn unpin(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Advance one step. Returns whether a step was taken.
	pub fn tick(&mut self, dt: f32) -> bool {
		if !self.is_running() {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_pins();
		self.graph.update(dt);
		// force_graph keeps acceleration on anchored nodes, so pins are
		// enforced by overriding positions instead of anchoring.
		self.apply_pins();
		self.center();
		self.sync_positions();

		self.ticks += 1;
		let ticks = self.ticks;
		for listener in &mut self.listeners {
			listener(ticks);
		}

		if self.alpha < ALPHA_MIN {
			self.running = false;
		}
		true
	}

	/// Topmost node whose disc of `radius(i)` contains `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64, radius: impl Fn(usize) -> f64) -> Option<usize> {
		self.nodes
			.iter()
			.enumerate()
			.rev()
			.find(|(i, n)| {
				let (dx, dy) = (n.x - x, n.y - y);
				(dx * dx + dy * dy).sqrt() < radius(*i)
			})
			.map(|(i, _)| i)
	}

	fn apply_pins(&mut self) {
		let nodes = &self.nodes;
		self.graph.visit_nodes_mut(|node| {
			let record = &nodes[node.data.user_data];
			if let (Some(fx), Some(fy)) = (record.fx, record.fy) {
				node.data.x = fx as f32;
				node.data.y = fy as f32;
			}
		});
	}

	fn center(&mut self) {
		let n = self.handles.len();
		if n == 0 {
			return;
		}
		let (mut sx, mut sy) = (0.0f64, 0.0f64);
		self.graph.visit_nodes(|node| {
			sx += node.x() as f64;
			sy += node.y() as f64;
		});
		let (mx, my) = ((sx / n as f64) as f32, (sy / n as f64) as f32);
		let nodes = &self.nodes;
		self.graph.visit_nodes_mut(|node| {
			if nodes[node.data.user_data].fx.is_none() {
				node.data.x -= mx;
				node.data.y -= my;
			}
		});
	}

	fn sync_positions(&mut self) {
		let graph = self.graph.get_graph();
		for (node, &handle) in self.nodes.iter_mut().zip(&self.handles) {
			node.x = graph[handle].x() as f64;
			node.y = graph[handle].y() as f64;
		}
	}
}
