//! Browser graph explorer. The root route shows a dataset picker, a grouping
//! picker and the force layout of the chosen dataset; any other path gets a
//! not-found page.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

pub mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

pub use components::force_graph::{ForceGraphOptions, ForceGraphSvg, GraphData, GroupingMode};

/// Route `log` output to the browser console and report panics there too.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Document head plus the two routes: `/` for the explorer, everything
/// else for the not-found page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Graph Explorer" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
