use std::sync::Arc;

use gloo_net::http::Request;
use log::info;

use super::DataError;
use super::records::{
	ClusterRelationMap, parse_chains, parse_cluster_relations, parse_links, parse_validator_results,
};
use crate::selection::{ChainId, ChainResults, LinkIndex, MetadataIndex};

/// Indices built from the datasets loaded at startup.
#[derive(Clone, Debug)]
pub struct StaticData {
	pub metadata: Arc<MetadataIndex>,
	pub links: Arc<LinkIndex>,
}

/// Resolves dataset URLs under a common root and fetches them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataSource {
	root: String,
}

impl DataSource {
	pub fn new(root: impl Into<String>) -> Self {
		let root: String = root.into();
		Self {
			root: root.trim_end_matches('/').to_owned(),
		}
	}

	pub fn chains_url(&self) -> String {
		format!("{}/chain_data.json", self.root)
	}

	pub fn links_url(&self) -> String {
		format!("{}/chain_links.json", self.root)
	}

	pub fn cluster_relations_url(&self) -> String {
		format!("{}/cluster_relationships.json", self.root)
	}

	pub fn results_url(&self, chain: &ChainId) -> String {
		format!("{}/validator_result/validator_result_{chain}.json", self.root)
	}

	/// Loads chain metadata and links and indexes them.
	pub async fn load_static(&self) -> Result<StaticData, DataError> {
		let chains_url = self.chains_url();
		let links_url = self.links_url();
		info!("Loading {chains_url} and {links_url}");

		let chains = parse_chains(&chains_url, &fetch_text(&chains_url).await?)?;
		let links = parse_links(&links_url, &fetch_text(&links_url).await?)?;
		info!("Loaded {} chains and {} links", chains.len(), links.len());

		Ok(StaticData {
			metadata: Arc::new(MetadataIndex::new(chains)),
			links: Arc::new(LinkIndex::new(links)),
		})
	}

	pub async fn load_results(&self, chain: &ChainId) -> Result<ChainResults, DataError> {
		let url = self.results_url(chain);
		parse_validator_results(chain, &url, &fetch_text(&url).await?)
	}

	pub async fn load_cluster_relations(&self) -> Result<ClusterRelationMap, DataError> {
		let url = self.cluster_relations_url();
		parse_cluster_relations(&url, &fetch_text(&url).await?)
	}
}

async fn fetch_text(url: &str) -> Result<String, DataError> {
	let request_error = |err: gloo_net::Error| DataError::Request {
		url: url.to_owned(),
		message: err.to_string(),
	};
	let response = Request::get(url).send().await.map_err(request_error)?;
	if !response.ok() {
		return Err(DataError::Status {
			url: url.to_owned(),
			status: response.status(),
		});
	}
	response.text().await.map_err(request_error)
}
