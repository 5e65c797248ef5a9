//! Cross-filter selection coordinator.
//!
//! Every view reads the same [`SelectionState`] through a [`SelectionStore`] and
//! asks it for derived values (opacity, highlighted chains, match table) instead of
//! computing them locally.

mod links;
mod match_table;
mod metadata;
mod opacity;
mod results;
mod state;
mod store;
mod types;

pub use links::{DEGENERATE_NORMALIZED_WEIGHT, LinkIndex};
pub use match_table::{
	MISSING_CLUSTER, MatchRow, SortColumn, SortDirection, TableSort, build_match_table,
	cluster_name, cluster_sort_key,
};
pub use metadata::MetadataIndex;
pub use opacity::opacity;
pub use results::{ChainResults, ValidatorResult};
pub use state::SelectionState;
pub use store::{FetchTicket, SelectionStore, SubscriptionId};
pub use types::{Chain, ChainId, Link, ProposalKey, ValidatorId, VoteValue};
