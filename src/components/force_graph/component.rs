use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent, WheelEvent};

use super::encode::VisualEncoder;
use super::interaction::{InteractionController, Pointer};
use super::model::{Accessors, GraphModel};
use super::options::ForceGraphOptions;
use super::render::{Scene, SvgScene};
use super::scale::ColorScale;
use super::simulation::Simulation;
use super::tooltip::{Tooltip, TooltipState};
use super::types::{GraphData, GroupingMode};

/// A fetched dataset together with the grouping it should be drawn with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedGraph {
	pub data: GraphData,
	pub grouping: GroupingMode,
}

/// Everything owned by one rendered dataset.
struct GraphView {
	sim: Simulation,
	svg: SvgScene,
	interaction: InteractionController,
	radii: Vec<f64>,
	color_scale: Option<ColorScale>,
	ticked: Rc<Cell<bool>>,
}

impl GraphView {
	fn build(host: &Element, loaded: &LoadedGraph, options: &ForceGraphOptions) -> Result<Self, JsValue> {
		let model = GraphModel::new(&loaded.data, &Accessors::for_grouping(loaded.grouping));
		let encoder = VisualEncoder::for_model(&model, loaded.grouping, options);
		let (links, dropped) = model.resolve_links();
		if dropped > 0 {
			debug!("skipped {} links with unknown endpoints", dropped);
		}

		let mut sim = Simulation::new(model, links, options);
		let ticked = Rc::new(Cell::new(true));
		let flag = ticked.clone();
		sim.on_tick(move |_| flag.set(true));

		let scene = Scene::build(&sim, &encoder);
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| JsValue::from_str("no document"))?;
		let svg = SvgScene::mount(&document, host, &scene, options)?;
		info!(
			"rendered {} nodes and {} links grouped by {}",
			scene.circles.len(),
			scene.lines.len(),
			loaded.grouping
		);

		Ok(Self {
			sim,
			svg,
			interaction: InteractionController::new(),
			radii: scene.radii(),
			color_scale: encoder.color_scale().cloned(),
			ticked,
		})
	}

	fn pointer(&self, ev: &MouseEvent, options: &ForceGraphOptions) -> Pointer {
		let rect = self.svg.svg().get_bounding_client_rect();
		let (cx, cy) = (ev.client_x() as f64, ev.client_y() as f64);
		let scale = |extent: f64, shown: f64| if shown > 0.0 { extent / shown } else { 1.0 };
		Pointer {
			x: (cx - rect.left()) * scale(options.width, rect.width()) - options.width / 2.0,
			y: (cy - rect.top()) * scale(options.height, rect.height()) - options.height / 2.0,
			client_x: cx,
			client_y: cy,
		}
	}

	/// Move every shape to its simulated position.
	fn draw_positions(&self) {
		if let Err(e) = self.svg.update_positions(&self.sim) {
			error!("failed to update graph scene: {:?}", e);
		}
	}

	/// Push the view transform and tooltip; shapes are left alone.
	fn draw_overlay(&self, tooltip: RwSignal<TooltipState>) {
		if let Err(e) = self.svg.set_transform(&self.interaction.transform()) {
			error!("failed to update graph transform: {:?}", e);
		}
		let next = self.interaction.tooltip();
		if tooltip.with_untracked(|current| current != next) {
			tooltip.set(next.clone());
		}
	}

	fn teardown(mut self) {
		self.sim.stop();
		self.svg.remove();
	}
}

/// Force-directed SVG graph with drag, pan/zoom and node tooltips.
#[component]
pub fn ForceGraphSvg(
	#[prop(into)] graph: Signal<Option<LoadedGraph>>,
	#[prop(optional)] options: Option<ForceGraphOptions>,
	/// Receives the color scale of each rendered dataset.
	#[prop(optional)]
	color_scale: Option<WriteSignal<Option<ColorScale>>>,
	/// Stops the layout once it turns `true`.
	#[prop(optional, into)]
	invalidation: Option<Signal<bool>>,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let options = Rc::new(options.unwrap_or_default());
	let view: Rc<RefCell<Option<GraphView>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltip = RwSignal::new(TooltipState::hidden());

	let (view_init, animate_init, options_init) = (view.clone(), animate.clone(), options.clone());
	Effect::new(move |_| {
		let loaded = graph.get();
		let Some(host) = host_ref.get() else {
			return;
		};
		let host: Element = host.into();

		// The previous scene goes only once its replacement has arrived.
		if let Some(old) = view_init.borrow_mut().take() {
			old.teardown();
		}
		tooltip.set(TooltipState::hidden());
		let Some(loaded) = loaded else {
			return;
		};

		match GraphView::build(&host, &loaded, &options_init) {
			Ok(mut built) => {
				if invalidation.is_some_and(|s| s.get_untracked()) {
					built.sim.stop();
					debug!("graph layout invalidated before it started");
				}
				if let Some(out) = color_scale {
					out.set(built.color_scale.clone());
				}
				*view_init.borrow_mut() = Some(built);
			}
			Err(e) => error!("failed to build graph scene: {:?}", e),
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let (view_anim, animate_inner) = (view_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !host.is_connected() {
				if let Some(old) = view_anim.borrow_mut().take() {
					old.teardown();
				}
				debug!("graph host detached, animation loop ended");
				return;
			}
			if let Some(ref mut v) = *view_anim.borrow_mut() {
				v.sim.tick(0.016);
				if v.ticked.replace(false) {
					v.draw_positions();
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(window) = web_sys::window() {
					let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	if let Some(invalidation) = invalidation {
		let view_stop = view.clone();
		Effect::new(move |_| {
			if invalidation.get() {
				if let Some(ref mut v) = *view_stop.borrow_mut() {
					v.sim.stop();
					info!("graph layout stopped");
				}
			}
		});
	}

	let (view_md, options_md) = (view.clone(), options.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if let Some(ref mut v) = *view_md.borrow_mut() {
			let p = v.pointer(&ev, &options_md);
			v.interaction.pointer_down(&mut v.sim, &v.radii, p);
			v.draw_overlay(tooltip);
		}
	};

	let (view_mm, options_mm) = (view.clone(), options.clone());
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(ref mut v) = *view_mm.borrow_mut() {
			let p = v.pointer(&ev, &options_mm);
			v.interaction.pointer_move(&mut v.sim, &v.radii, p);
			v.draw_overlay(tooltip);
		}
	};

	let (view_mu, options_mu) = (view.clone(), options.clone());
	let on_mouseup = move |ev: MouseEvent| {
		if let Some(ref mut v) = *view_mu.borrow_mut() {
			let p = v.pointer(&ev, &options_mu);
			v.interaction.pointer_up(&mut v.sim, p);
			v.draw_overlay(tooltip);
		}
	};

	let view_ml = view.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut v) = *view_ml.borrow_mut() {
			v.interaction.pointer_leave(&mut v.sim);
			v.draw_overlay(tooltip);
		}
	};

	let (view_wh, options_wh) = (view.clone(), options.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut v) = *view_wh.borrow_mut() {
			let p = v.pointer(&ev, &options_wh);
			v.interaction.wheel(p, ev.delta_y());
			v.draw_overlay(tooltip);
		}
	};

	view! {
		<div
			node_ref=host_ref
			class="force-graph"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="cursor: grab;"
		/>
		<Tooltip state=tooltip />
	}
}
