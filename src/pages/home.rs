use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};

use crate::components::dataset::{DatasetController, Selection, fetch_graph, load_dataset_names};
use crate::components::force_graph::{ForceGraphSvg, GroupingMode, LoadedGraph};

/// Explorer page: dataset and grouping selectors above the graph.
#[component]
pub fn Home() -> impl IntoView {
	let datasets = load_dataset_names();
	let dataset = RwSignal::new(datasets.first().cloned().unwrap_or_default());
	let grouping = RwSignal::new(GroupingMode::Community);
	let graph = RwSignal::new(None::<LoadedGraph>);
	let status = RwSignal::new(String::new());

	let controller = Rc::new(DatasetController::default());
	controller.on_selection_changed(move |ticket| {
		status.set(format!(
			"Loading {} ({})…",
			ticket.selection.dataset, ticket.selection.grouping
		));
	});

	let load = move || {
		let controller = controller.clone();
		let ticket = controller.select(Selection {
			dataset: dataset.get_untracked(),
			grouping: grouping.get_untracked(),
		});
		spawn_local(async move {
			let result = fetch_graph(&ticket.url).await;
			if !controller.accept(&ticket) {
				debug!("dropping stale response for request #{}", ticket.seq);
				return;
			}
			match result {
				Ok(data) => {
					info!(
						"fetched {}: {} nodes, {} links",
						ticket.url,
						data.nodes.len(),
						data.links.len()
					);
					status.set(String::new());
					graph.set(Some(LoadedGraph {
						data,
						grouping: ticket.selection.grouping,
					}));
				}
				Err(e) => {
					error!("error fetching {}: {}", ticket.url, e);
					status.set(format!("Could not load {}: {}", ticket.selection.dataset, e));
				}
			}
		});
	};

	let load_dataset = load.clone();
	let on_dataset = move |ev: leptos::ev::Event| {
		dataset.set(event_target_value(&ev));
		load_dataset();
	};
	let load_grouping = load.clone();
	let on_grouping = move |ev: leptos::ev::Event| {
		match event_target_value(&ev).parse::<GroupingMode>() {
			Ok(mode) => grouping.set(mode),
			Err(e) => {
				error!("{}", e);
				return;
			}
		}
		load_grouping();
	};

	load();

	view! {
		<div class="explorer">
			<div class="graph-controls">
				<select id="dropdown" on:change=on_dataset>
					{datasets
						.into_iter()
						.map(|name| {
							let selected = name == dataset.get_untracked();
							view! {
								<option value=name.clone() selected=selected>
									{name.clone()}
								</option>
							}
						})
						.collect_view()}
				</select>
				<select id="dropdown_graph" on:change=on_grouping>
					{GroupingMode::SELECTABLE
						.into_iter()
						.map(|mode| {
							let selected = mode == grouping.get_untracked();
							view! {
								<option value=mode.as_str() selected=selected>
									{mode.as_str()}
								</option>
							}
						})
						.collect_view()}
				</select>
				<span class="status">{move || status.get()}</span>
			</div>
			<div id="chart">
				<ForceGraphSvg graph=graph />
			</div>
		</div>
	}
}
