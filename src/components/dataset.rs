//! Dataset selection and loading.

use std::cell::{Cell, RefCell};

use log::{debug, warn};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlScriptElement, Response};

use super::force_graph::{GraphData, GroupingMode};

/// Where dataset files live, relative to the page.
pub const DEFAULT_BASE_PATH: &str = "./Graphs";

/// Offered when the page does not list its datasets.
pub const DEFAULT_DATASETS: &[&str] = &["2024electionindia"];

/// Errors raised while fetching a dataset.
#[derive(Debug, Error)]
pub enum FetchError {
	#[error("no browser window available")]
	NoWindow,
	#[error("request failed: {0}")]
	Request(String),
	#[error("server answered with status {0}")]
	Status(u16),
	#[error("could not read response body: {0}")]
	Body(String),
	#[error("invalid dataset JSON: {0}")]
	Decode(#[from] serde_json::Error),
}

fn js_message(value: JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// The two dropdown values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
	pub dataset: String,
	pub grouping: GroupingMode,
}

/// A load request issued by [`DatasetController::select`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
	pub seq: u64,
	pub selection: Selection,
	pub url: String,
}

type SelectionListener = Box<dyn Fn(&Ticket)>;

/// Issues load tickets and tracks which one is the newest.
///
/// Responses can arrive out of order; only the ticket from the latest
/// [`select`](Self::select) call is accepted.
pub struct DatasetController {
	base_path: String,
	seq: Cell<u64>,
	listeners: RefCell<Vec<SelectionListener>>,
}

impl Default for DatasetController {
	fn default() -> Self {
		Self::new(DEFAULT_BASE_PATH)
	}
}

impl DatasetController {
	pub fn new(base_path: impl Into<String>) -> Self {
		Self {
			base_path: base_path.into(),
			seq: Cell::new(0),
			listeners: RefCell::new(Vec::new()),
		}
	}

	/// Register a callback run for every new selection.
	pub fn on_selection_changed(&self, listener: impl Fn(&Ticket) + 'static) {
		self.listeners.borrow_mut().push(Box::new(listener));
	}

	pub fn url_for(&self, dataset: &str) -> String {
		format!("{}/{}.json", self.base_path.trim_end_matches('/'), dataset)
	}

	/// Record a selection change and issue a ticket for loading it.
	pub fn select(&self, selection: Selection) -> Ticket {
		let seq = self.seq.get() + 1;
		self.seq.set(seq);

		let ticket = Ticket {
			seq,
			url: self.url_for(&selection.dataset),
			selection,
		};
		debug!("selection #{} -> {}", seq, ticket.url);
		for listener in self.listeners.borrow().iter() {
			listener(&ticket);
		}
		ticket
	}

	/// Whether a response for `ticket` should still be drawn.
	pub fn accept(&self, ticket: &Ticket) -> bool {
		ticket.seq == self.seq.get()
	}
}

/// GET and decode a dataset file.
pub async fn fetch_graph(url: &str) -> Result<GraphData, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| FetchError::Request(js_message(e)))?
		.dyn_into()
		.map_err(|e| FetchError::Request(js_message(e)))?;
	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	let body = response.text().map_err(|e| FetchError::Body(js_message(e)))?;
	let text: js_sys::JsString = JsFuture::from(body)
		.await
		.map_err(|e| FetchError::Body(js_message(e)))?
		.dyn_into()
		.map_err(|e| FetchError::Body(js_message(e)))?;
	Ok(GraphData::from_json(&String::from(text))?)
}

/// Parse the dataset list published by the page.
pub fn parse_dataset_names(json: &str) -> Result<Vec<String>, serde_json::Error> {
	serde_json::from_str(json)
}

/// Dataset names from `<script id="datasets">`, else the built-in list.
pub fn load_dataset_names() -> Vec<String> {
	let script_text = || -> Option<String> {
		let document = web_sys::window()?.document()?;
		let script: HtmlScriptElement = document.get_element_by_id("datasets")?.dyn_into().ok()?;
		script.text().ok()
	};
	let defaults = || -> Vec<String> { DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect() };

	match script_text().map(|text| parse_dataset_names(&text)) {
		Some(Ok(names)) if !names.is_empty() => names,
		Some(Err(e)) => {
			warn!("ignoring malformed dataset list: {}", e);
			defaults()
		}
		_ => defaults(),
	}
}

#[cfg(test)]
mod tests {
	use std::rc::Rc;

	use super::*;

	fn selection(dataset: &str, grouping: GroupingMode) -> Selection {
		Selection {
			dataset: dataset.into(),
			grouping,
		}
	}

	#[test]
	fn urls_follow_graphs_directory() {
		let c = DatasetController::default();
		assert_eq!(c.url_for("2024electionindia"), "./Graphs/2024electionindia.json");
		assert_eq!(DatasetController::new("/data/").url_for("x"), "/data/x.json");
	}

	#[test]
	fn only_newest_ticket_is_accepted() {
		let c = DatasetController::default();
		let first = c.select(selection("a", GroupingMode::Community));
		assert!(c.accept(&first));
		let second = c.select(selection("b", GroupingMode::Location));
		assert!(!c.accept(&first));
		assert!(c.accept(&second));
		assert!(second.seq > first.seq);
		assert_eq!(second.selection, selection("b", GroupingMode::Location));
	}

	#[test]
	fn reselecting_same_values_still_supersedes() {
		let c = DatasetController::default();
		let first = c.select(selection("a", GroupingMode::Influence));
		let again = c.select(selection("a", GroupingMode::Influence));
		assert!(!c.accept(&first));
		assert!(c.accept(&again));
	}

	#[test]
	fn listeners_see_every_selection() {
		let c = DatasetController::default();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let log = seen.clone();
		c.on_selection_changed(move |t| log.borrow_mut().push((t.seq, t.selection.grouping)));
		c.select(selection("a", GroupingMode::Community));
		c.select(selection("a", GroupingMode::Influence));
		assert_eq!(
			*seen.borrow(),
			vec![(1, GroupingMode::Community), (2, GroupingMode::Influence)]
		);
	}

	#[test]
	fn dataset_list_parses_json_array() {
		assert_eq!(parse_dataset_names(r#"["a","b"]"#).unwrap(), vec!["a", "b"]);
		assert!(parse_dataset_names("{").is_err());
	}

	#[test]
	fn decode_errors_describe_the_problem() {
		let err: FetchError = GraphData::from_json("{").unwrap_err().into();
		assert!(err.to_string().starts_with("invalid dataset JSON"));
		assert_eq!(FetchError::Status(404).to_string(), "server answered with status 404");
	}
}
