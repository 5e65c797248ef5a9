//! Dashboard settings, overridable from `<meta>` tags in the host page.

use std::str::FromStr;

use log::Level;

use crate::data::DataSource;

const DATA_ROOT_META: &str = "validator-lens:data-root";
const LOG_LEVEL_META: &str = "validator-lens:log-level";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
	/// Base URL every dataset is fetched from.
	pub data_root: String,
	pub log_level: Level,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			data_root: "/data".to_owned(),
			log_level: if cfg!(debug_assertions) {
				Level::Debug
			} else {
				Level::Info
			},
		}
	}
}

impl DashboardConfig {
	/// Defaults, overridden by the host page's meta tags when present.
	pub fn from_document() -> Self {
		Self::default().with_overrides(meta_content(DATA_ROOT_META), meta_content(LOG_LEVEL_META))
	}

	/// Applies raw overrides. Blank values and unknown log levels are ignored.
	pub fn with_overrides(mut self, data_root: Option<String>, log_level: Option<String>) -> Self {
		if let Some(root) = data_root.filter(|r| !r.trim().is_empty()) {
			self.data_root = root.trim().to_owned();
		}
		if let Some(level) = log_level.and_then(|l| Level::from_str(l.trim()).ok()) {
			self.log_level = level;
		}
		self
	}

	pub fn data_source(&self) -> DataSource {
		DataSource::new(self.data_root.clone())
	}
}

fn meta_content(name: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let selector = format!("meta[name=\"{name}\"]");
	document
		.query_selector(&selector)
		.ok()
		.flatten()?
		.get_attribute("content")
}
