//! Static datasets: JSON shapes, parsing and loading over HTTP.

mod loader;
mod records;

use thiserror::Error;

pub use loader::{DataSource, StaticData};
pub use records::{
	ClusterRelation, ClusterRelationMap, parse_chains, parse_cluster_relations, parse_links,
	parse_validator_results,
};

/// Failure to obtain or decode a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DataError {
	#[error("request to {url} failed: {message}")]
	Request { url: String, message: String },
	#[error("{url} answered with status {status}")]
	Status { url: String, status: u16 },
	#[error("could not decode {url}: {message}")]
	Decode { url: String, message: String },
}
