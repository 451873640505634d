//! Historical affinity: how often past collaborations that look like the proposed pairing
//! ended in success.
//!
//! Every history record is pooled into one tag set (both sides of the collaboration). A record
//! is relevant when it shares at least one tag with the pooled query and candidate tags, and its
//! weight is the number of shared tags. The score is the success share of the total weight.
//! Records missing either tag field are malformed and never relevant.

use crate::{HistoryRecord, Outcome, TagSet};

/// Score reported when there is no relevant evidence either way.
pub const NEUTRAL_PRIOR: f64 = 0.5;

/// Overlap-weighted counts collected for one query and candidate pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
	pub relevant_records: usize,
	pub total_weight: u64,
	pub success_weight: u64,
}
impl Tally {
	pub fn success_rate(&self, neutral_prior: f64) -> f64 {
		if self.total_weight == 0 {
			return neutral_prior;
		}

		self.success_weight as f64 / self.total_weight as f64
	}
}

/// History records with their pooled tag sets parsed once, so a request can score many
/// candidates without re-parsing every record per candidate.
#[derive(Debug, Clone, Default)]
pub struct HistoricalEvidence {
	records: Vec<(TagSet, Outcome)>,
}
impl HistoricalEvidence {
	pub fn new(history: &[HistoryRecord]) -> Self {
		let records = history
			.iter()
			.map(|record| {
				// A row missing either side is malformed and carries no weight.
				let pooled = match (&record.artist1_tags, &record.artist2_tags) {
					(Some(left), Some(right)) => pooled_tags(left, right),
					_ => TagSet::default(),
				};

				(pooled, record.outcome)
			})
			.collect();

		Self { records }
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn tally(&self, pooled: &TagSet) -> Tally {
		let mut tally = Tally::default();

		for (record_tags, outcome) in &self.records {
			let overlap = pooled.overlap(record_tags) as u64;

			if overlap == 0 {
				continue;
			}

			tally.relevant_records += 1;
			tally.total_weight += overlap;

			if *outcome == Outcome::Success {
				tally.success_weight += overlap;
			}
		}

		tally
	}

	pub fn score(&self, query: &TagSet, candidate: &TagSet, neutral_prior: f64) -> f64 {
		if self.records.is_empty() {
			return neutral_prior;
		}

		self.tally(&query.union(candidate)).success_rate(neutral_prior)
	}
}

/// Success probability for pairing `query_tags` with `candidate_tags`, using the default
/// neutral prior.
pub fn historical_score(query_tags: &str, candidate_tags: &str, history: &[HistoryRecord]) -> f64 {
	HistoricalEvidence::new(history).score(
		&TagSet::parse(query_tags),
		&TagSet::parse(candidate_tags),
		NEUTRAL_PRIOR,
	)
}

fn pooled_tags(left: &str, right: &str) -> TagSet {
	TagSet::parse(left).union(&TagSet::parse(right))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tally_weights_by_overlap() {
		let history = vec![
			HistoryRecord::new("pop, dance", "house", Outcome::Success),
			HistoryRecord::new("pop", "rock", Outcome::Failure),
			HistoryRecord::new("metal", "doom", Outcome::Success),
		];
		let evidence = HistoricalEvidence::new(&history);
		let tally = evidence.tally(&TagSet::parse("pop, dance, rock"));

		assert_eq!(tally.relevant_records, 2);
		assert_eq!(tally.total_weight, 4);
		assert_eq!(tally.success_weight, 2);
		assert_eq!(tally.success_rate(NEUTRAL_PRIOR), 0.5);
	}

	#[test]
	fn half_missing_record_has_no_weight() {
		let history = vec![HistoryRecord {
			artist1_tags: Some("pop".to_string()),
			artist2_tags: None,
			outcome: Outcome::Failure,
		}];
		let tally = HistoricalEvidence::new(&history).tally(&TagSet::parse("pop, dance"));

		assert_eq!(tally, Tally::default());
	}

	#[test]
	fn empty_tally_falls_back_to_prior() {
		assert_eq!(Tally::default().success_rate(0.25), 0.25);
	}
}
