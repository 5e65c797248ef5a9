use std::cmp::Ordering;

use super::results::{ChainResults, ValidatorResult};
use super::state::SelectionState;
use super::types::ValidatorId;

/// Cluster label shown for validators the results dataset does not cover.
pub const MISSING_CLUSTER: &str = "N/A";

const CLUSTER_NAMES: [&str; 8] = [
	"Cautious",
	"Positive",
	"Cautiously Positive",
	"Proactive",
	"Balanced Neutral",
	"Prudent",
	"Conservative",
	"Critically Positive",
];

/// Display name of a behavioural cluster, if it has one.
pub fn cluster_name(label: i64) -> Option<&'static str> {
	usize::try_from(label)
		.ok()
		.and_then(|i| CLUSTER_NAMES.get(i))
		.copied()
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchRow {
	pub validator: ValidatorId,
	/// Agreement with the base validator; `1` on the base row.
	pub match_rate: f64,
	pub cluster: String,
	pub overall_match_rate: f64,
	pub cluster_match_rate: f64,
	pub participation_rate: f64,
}

impl MatchRow {
	fn new(validator: &ValidatorId, match_rate: f64, record: Option<&ValidatorResult>) -> Self {
		let cluster = record
			.and_then(|r| r.cluster_label)
			.map_or_else(|| MISSING_CLUSTER.to_owned(), |c| c.to_string());
		Self {
			validator: validator.clone(),
			match_rate,
			cluster,
			overall_match_rate: record.map_or(0.0, |r| r.overall_match_rate),
			cluster_match_rate: record.map_or(0.0, |r| r.cluster_match_rate),
			participation_rate: record.map_or(0.0, |r| r.participation_rate),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortColumn {
	Validator,
	MatchRate,
	Cluster,
	OverallMatchRate,
	ClusterMatchRate,
	ParticipationRate,
}

impl SortColumn {
	pub const ALL: [SortColumn; 6] = [
		SortColumn::Validator,
		SortColumn::MatchRate,
		SortColumn::Cluster,
		SortColumn::OverallMatchRate,
		SortColumn::ClusterMatchRate,
		SortColumn::ParticipationRate,
	];

	pub fn title(self) -> &'static str {
		match self {
			SortColumn::Validator => "Validator",
			SortColumn::MatchRate => "Match rate (%)",
			SortColumn::Cluster => "Cluster",
			SortColumn::OverallMatchRate => "Overall match (%)",
			SortColumn::ClusterMatchRate => "Cluster match (%)",
			SortColumn::ParticipationRate => "Participation (%)",
		}
	}

	fn compare(self, a: &MatchRow, b: &MatchRow) -> Ordering {
		match self {
			SortColumn::Validator => a
				.validator
				.as_str()
				.to_lowercase()
				.cmp(&b.validator.as_str().to_lowercase()),
			SortColumn::MatchRate => a.match_rate.total_cmp(&b.match_rate),
			SortColumn::Cluster => cluster_sort_key(&a.cluster).cmp(&cluster_sort_key(&b.cluster)),
			SortColumn::OverallMatchRate => a.overall_match_rate.total_cmp(&b.overall_match_rate),
			SortColumn::ClusterMatchRate => a.cluster_match_rate.total_cmp(&b.cluster_match_rate),
			SortColumn::ParticipationRate => {
				a.participation_rate.total_cmp(&b.participation_rate)
			}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Ascending,
	Descending,
}

/// Column-click sort order of the match table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSort {
	pub column: SortColumn,
	pub direction: SortDirection,
}

impl TableSort {
	/// Sort after a click on `column`: the same column flips, a new one starts descending.
	pub fn clicked(previous: Option<TableSort>, column: SortColumn) -> Self {
		let direction = match previous {
			Some(prev) if prev.column == column => match prev.direction {
				SortDirection::Ascending => SortDirection::Descending,
				SortDirection::Descending => SortDirection::Ascending,
			},
			_ => SortDirection::Descending,
		};
		Self { column, direction }
	}
}

/// Integer of a cluster label; `-1` for labels without digits.
///
/// A label that starts with a number, sign included, is read as that number.
/// Otherwise the first run of digits counts, so `cluster_3` reads as `3`.
pub fn cluster_sort_key(label: &str) -> i64 {
	let label = label.trim();
	let (negative, rest) = match label.strip_prefix('-') {
		Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => (true, rest),
		_ => (false, label),
	};
	let digits: String = rest
		.chars()
		.skip_while(|c| !c.is_ascii_digit())
		.take_while(char::is_ascii_digit)
		.collect();
	match digits.parse::<i64>() {
		Ok(value) if negative => -value,
		Ok(value) => value,
		Err(_) => -1,
	}
}

/// Builds the comparison table for the current selection.
///
/// The base row comes first with a match rate of `1` and is never moved by
/// sorting. The remaining rows follow selection order unless `sort` is given.
pub fn build_match_table(
	results: &ChainResults,
	state: &SelectionState,
	sort: Option<TableSort>,
) -> Vec<MatchRow> {
	let selected = state.selected_validators();
	let Some(first) = selected.first() else {
		return Vec::new();
	};
	let base = state.base_validator().unwrap_or(first);
	let base_record = results.get(base);

	let mut rows = vec![MatchRow::new(base, 1.0, base_record)];
	let mut others: Vec<MatchRow> = selected
		.iter()
		.filter(|v| *v != base)
		.map(|v| {
			let rate = base_record.map_or(0.0, |b| b.match_rate_with(v));
			MatchRow::new(v, rate, results.get(v))
		})
		.collect();

	if let Some(sort) = sort {
		others.sort_by(|a, b| {
			let ordering = sort.column.compare(a, b);
			match sort.direction {
				SortDirection::Ascending => ordering,
				SortDirection::Descending => ordering.reverse(),
			}
		});
	}

	rows.extend(others);
	rows
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::selection::metadata::MetadataIndex;
	use crate::selection::types::Chain;

	fn record(voter: &str, cluster: Option<i64>, pairwise: &[(&str, f64)]) -> ValidatorResult {
		ValidatorResult {
			voter: voter.into(),
			cluster_label: cluster,
			overall_match_rate: 0.5,
			cluster_match_rate: 0.6,
			participation_rate: 0.9,
			pairwise: pairwise
				.iter()
				.map(|(v, r)| (ValidatorId::from(*v), *r))
				.collect::<HashMap<_, _>>(),
			..ValidatorResult::default()
		}
	}

	fn fixtures() -> (MetadataIndex, ChainResults) {
		let index = MetadataIndex::new([Chain::with_validators(
			"akash",
			["v1", "v2", "v3", "v4", "Alpha", "beta"],
		)]);
		let results = ChainResults::new(
			"akash".into(),
			[
				record("v1", Some(2), &[("v2", 0.42), ("v3", 0.9), ("v4", 0.1)]),
				record("v2", Some(10), &[("v1", 0.42)]),
				record("v3", None, &[]),
			],
		);
		(index, results)
	}

	fn order(rows: &[MatchRow]) -> Vec<&str> {
		rows.iter().map(|r| r.validator.as_str()).collect()
	}

	#[test]
	fn empty_selection_gives_empty_table() {
		let (_, results) = fixtures();
		assert!(build_match_table(&results, &SelectionState::default(), None).is_empty());
	}

	#[test]
	fn single_selection_is_its_own_base() {
		let (index, results) = fixtures();
		let state = SelectionState::default().toggle_validator(&index, &"v2".into());
		let rows = build_match_table(&results, &state, None);
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].match_rate, 1.0);
		assert_eq!(rows[0].cluster, "10");
		assert_eq!(rows[0].participation_rate, 0.9);
	}

	#[test]
	fn rates_come_from_base_record() {
		let (index, results) = fixtures();
		let state = SelectionState::default()
			.select_validators(&index, &["v1".into(), "v3".into(), "v4".into(), "v2".into()]);
		let rows = build_match_table(&results, &state, None);
		assert_eq!(order(&rows), ["v1", "v3", "v4", "v2"]);
		assert_eq!(rows[1].match_rate, 0.9);
		assert_eq!(rows[1].cluster, MISSING_CLUSTER.to_owned());
		assert_eq!(rows[3].match_rate, 0.42);

		let pivoted = state.set_base_validator(&"v2".into());
		let rows = build_match_table(&results, &pivoted, None);
		assert_eq!(order(&rows), ["v2", "v1", "v3", "v4"]);
		assert_eq!(rows[1].match_rate, 0.42);
		assert_eq!(rows[2].match_rate, 0.0);
	}

	#[test]
	fn validators_missing_from_results_get_empty_rows() {
		let (index, results) = fixtures();
		let state =
			SelectionState::default().select_validators(&index, &["v4".into(), "v1".into()]);
		let rows = build_match_table(&results, &state, None);
		assert_eq!(rows[0].cluster, MISSING_CLUSTER);
		assert_eq!(rows[0].overall_match_rate, 0.0);
		assert_eq!(rows[1].match_rate, 0.0);
	}

	#[test]
	fn sorting_never_moves_the_base_row() {
		let (index, results) = fixtures();
		let state = SelectionState::default()
			.select_validators(&index, &["v1".into(), "v4".into(), "v3".into(), "v2".into()]);

		let ascending = TableSort {
			column: SortColumn::MatchRate,
			direction: SortDirection::Ascending,
		};
		let rows = build_match_table(&results, &state, Some(ascending));
		assert_eq!(order(&rows), ["v1", "v4", "v2", "v3"]);

		let descending = TableSort::clicked(Some(ascending), SortColumn::MatchRate);
		let rows = build_match_table(&results, &state, Some(descending));
		assert_eq!(order(&rows), ["v1", "v3", "v2", "v4"]);
	}

	#[test]
	fn cluster_column_sorts_numerically_with_missing_first() {
		let (index, results) = fixtures();
		let state = SelectionState::default()
			.select_validators(&index, &["v4".into(), "v2".into(), "v1".into()]);
		let sort = TableSort {
			column: SortColumn::Cluster,
			direction: SortDirection::Ascending,
		};
		let rows = build_match_table(&results, &state, Some(sort));
		// base v4 has no record; v1 is cluster 2, v2 is cluster 10
		assert_eq!(order(&rows), ["v4", "v1", "v2"]);

		let state = state.set_base_validator(&"v2".into());
		let rows = build_match_table(&results, &state, Some(sort));
		assert_eq!(order(&rows), ["v2", "v4", "v1"]);
	}

	#[test]
	fn negative_cluster_labels_sort_before_zero() {
		let results = ChainResults::new(
			"akash".into(),
			[
				record("a", Some(0), &[]),
				record("b", Some(0), &[]),
				record("c", Some(-1), &[]),
				record("d", Some(2), &[]),
			],
		);
		let index = MetadataIndex::new([Chain::with_validators("akash", ["a", "b", "c", "d"])]);
		let state = SelectionState::default()
			.select_validators(&index, &["a".into(), "b".into(), "c".into(), "d".into()]);
		let sort = TableSort {
			column: SortColumn::Cluster,
			direction: SortDirection::Ascending,
		};
		let rows = build_match_table(&results, &state, Some(sort));
		assert_eq!(order(&rows), ["a", "c", "b", "d"]);
	}

	#[test]
	fn name_column_ignores_case() {
		let (index, results) = fixtures();
		let state = SelectionState::default()
			.select_validators(&index, &["v1".into(), "beta".into(), "Alpha".into()]);
		let sort = TableSort {
			column: SortColumn::Validator,
			direction: SortDirection::Ascending,
		};
		let rows = build_match_table(&results, &state, Some(sort));
		assert_eq!(order(&rows), ["v1", "Alpha", "beta"]);
	}

	#[test]
	fn new_column_starts_descending_and_same_column_flips() {
		let first = TableSort::clicked(None, SortColumn::Cluster);
		assert_eq!(first.direction, SortDirection::Descending);
		let second = TableSort::clicked(Some(first), SortColumn::Cluster);
		assert_eq!(second.direction, SortDirection::Ascending);
		let other = TableSort::clicked(Some(second), SortColumn::Validator);
		assert_eq!(other.direction, SortDirection::Descending);
	}

	#[test]
	fn cluster_keys_read_leading_number() {
		assert_eq!(cluster_sort_key("3"), 3);
		assert_eq!(cluster_sort_key("Cluster 12"), 12);
		assert_eq!(cluster_sort_key("N/A"), -1);
		assert_eq!(cluster_sort_key("-1"), -1);
		assert_eq!(cluster_sort_key("-2"), -2);
		assert_eq!(cluster_sort_key("cluster_3"), 3);
		assert_eq!(cluster_name(4), Some("Balanced Neutral"));
		assert_eq!(cluster_name(8), None);
		assert_eq!(cluster_name(-1), None);
	}
}
