mod chain_summary;
mod cluster_panel;
mod coordinator;
mod match_table;
mod network_map;
mod validator_picker;

pub use chain_summary::ChainSummary;
pub use cluster_panel::ClusterPanel;
pub use coordinator::Coordinator;
pub use match_table::MatchTableView;
pub use network_map::NetworkMap;
pub use validator_picker::ValidatorPicker;
