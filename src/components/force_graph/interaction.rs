use super::simulation::{DRAG_ALPHA_TARGET, Simulation};
use super::tooltip::TooltipState;

/// Smallest hit radius, so tiny nodes stay grabbable.
pub const MIN_HIT_RADIUS: f64 = 5.0;
/// Pointer travel (scene units) below which a press counts as a click.
const CLICK_SLOP: f64 = 3.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

/// Pan/zoom applied to the root group: `translate(x, y) scale(k)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Scene coordinates to graph coordinates.
	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn to_svg(&self) -> String {
		format!("translate({},{}) scale({})", self.x, self.y, self.k)
	}
}

/// A pointer sample in scene (viewBox) and client coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
	pub client_x: f64,
	pub client_y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Dragging {
		node: usize,
		start_x: f64,
		start_y: f64,
		moved: bool,
	},
	Panning {
		start_x: f64,
		start_y: f64,
		transform_start_x: f64,
		transform_start_y: f64,
		moved: bool,
	},
}

/// Pointer state machine for one rendered graph.
///
/// Hovering a node shows its tooltip; leaving hides it unless a click has
/// pinned one. Pressing a node drags it, pressing the background pans.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	transform: ViewTransform,
	gesture: Gesture,
	hovered: Option<usize>,
	pinned: Option<TooltipState>,
	tooltip: TooltipState,
}

impl InteractionController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	pub fn tooltip(&self) -> &TooltipState {
		&self.tooltip
	}

	pub fn has_pinned_tooltip(&self) -> bool {
		self.pinned.is_some()
	}

	fn hit(&self, sim: &Simulation, radii: &[f64], p: Pointer) -> Option<usize> {
		let (gx, gy) = self.transform.invert(p.x, p.y);
		sim.node_at(gx, gy, |i| {
			radii.get(i).copied().unwrap_or(MIN_HIT_RADIUS).max(MIN_HIT_RADIUS)
		})
	}

	pub fn pointer_down(&mut self, sim: &mut Simulation, radii: &[f64], p: Pointer) {
		match self.hit(sim, radii, p) {
			Some(node) => {
				let (x, y) = sim.nodes().get(node).map(|n| (n.x, n.y)).unwrap_or_default();
				sim.set_alpha_target(DRAG_ALPHA_TARGET);
				sim.restart();
				sim.pin(node, x, y);
				self.gesture = Gesture::Dragging {
					node,
					start_x: p.x,
					start_y: p.y,
					moved: false,
				};
			}
			None => {
				self.gesture = Gesture::Panning {
					start_x: p.x,
					start_y: p.y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
					moved: false,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, sim: &mut Simulation, radii: &[f64], p: Pointer) {
		if self.gesture == Gesture::Idle {
			let hovered = self.hit(sim, radii, p);
			if hovered != self.hovered {
				self.hovered = hovered;
				self.tooltip = match hovered.and_then(|i| sim.nodes().get(i)) {
					Some(node) => TooltipState::for_node(node, p.client_x, p.client_y),
					None => self.pinned.clone().unwrap_or_default(),
				};
			}
			return;
		}

		match &mut self.gesture {
			Gesture::Dragging {
				node,
				start_x,
				start_y,
				moved,
			} => {
				*moved |= travelled(*start_x, *start_y, p) > CLICK_SLOP;
				let (gx, gy) = self.transform.invert(p.x, p.y);
				sim.pin(*node, gx, gy);
			}
			Gesture::Panning {
				start_x,
				start_y,
				transform_start_x,
				transform_start_y,
				moved,
			} => {
				*moved |= travelled(*start_x, *start_y, p) > CLICK_SLOP;
				self.transform.x = *transform_start_x + (p.x - *start_x);
				self.transform.y = *transform_start_y + (p.y - *start_y);
			}
			Gesture::Idle => {}
		}
	}

	pub fn pointer_up(&mut self, sim: &mut Simulation, p: Pointer) {
		match std::mem::take(&mut self.gesture) {
			Gesture::Dragging { node, moved, .. } => {
				end_drag(sim, node);
				if !moved {
					if let Some(record) = sim.nodes().get(node) {
						let pinned = TooltipState::for_node(record, p.client_x, p.client_y);
						self.tooltip = pinned.clone();
						self.pinned = Some(pinned);
					}
				}
			}
			Gesture::Panning { moved: false, .. } => {
				self.pinned = None;
				if self.hovered.is_none() {
					self.tooltip = TooltipState::hidden();
				}
			}
			Gesture::Panning { .. } | Gesture::Idle => {}
		}
	}

	/// The pointer left the drawing: end any gesture and drop hover.
	pub fn pointer_leave(&mut self, sim: &mut Simulation) {
		if let Gesture::Dragging { node, .. } = std::mem::take(&mut self.gesture) {
			end_drag(sim, node);
		}
		self.hovered = None;
		self.tooltip = self.pinned.clone().unwrap_or_default();
	}

	/// Zoom one wheel notch about the pointer.
	pub fn wheel(&mut self, p: Pointer, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = p.x - (p.x - self.transform.x) * ratio;
		self.transform.y = p.y - (p.y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}
}

fn end_drag(sim: &mut Simulation, node: usize) {
	sim.set_alpha_target(0.0);
	sim.unpin(node);
}

fn travelled(start_x: f64, start_y: f64, p: Pointer) -> f64 {
	let (dx, dy) = (p.x - start_x, p.y - start_y);
	(dx * dx + dy * dy).sqrt()
}
