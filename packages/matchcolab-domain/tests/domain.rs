use matchcolab_domain::{
	Artist, HistoricalEvidence, HistoryRecord, NEUTRAL_PRIOR, Outcome, RankError, RankPolicy,
	Ranker, Recommendation, TagSet, historical_score, rank,
};

const EPS: f64 = 1e-9;

fn unit(angle_cos: f32) -> Vec<f32> {
	vec![angle_cos, (1.0 - angle_cos * angle_cos).sqrt()]
}

fn artist(name: &str, tags: &str, embedding: Vec<f32>) -> Artist {
	Artist::new(name, tags).with_embedding(embedding)
}

#[test]
fn tag_sets_ignore_case_and_round_trip() {
	let raw = "Pop, dance-pop, R&B, contemporary r&b";
	let parsed = TagSet::parse(raw);

	assert_eq!(parsed, TagSet::parse(&raw.to_uppercase()));
	assert_eq!(parsed, TagSet::parse(&parsed.to_tag_string()));
	assert_eq!(parsed.to_tag_string(), "contemporary r&b, dance-pop, pop, r&b");
}

#[test]
fn empty_history_yields_neutral_prior() {
	assert_eq!(historical_score("pop", "dance", &[]), NEUTRAL_PRIOR);
}

#[test]
fn unrelated_history_yields_neutral_prior() {
	let history = vec![
		HistoryRecord::new("death metal", "grindcore", Outcome::Success),
		HistoryRecord::new("black metal", "doom", Outcome::Failure),
	];

	assert_eq!(historical_score("pop", "dance", &history), NEUTRAL_PRIOR);
}

#[test]
fn fully_matching_success_scores_one() {
	let history = vec![HistoryRecord::new("pop, dance", "pop, dance", Outcome::Success)];

	assert_eq!(historical_score("pop", "dance", &history), 1.0);
}

#[test]
fn records_weigh_by_overlap() {
	let history = vec![
		HistoryRecord::new("pop, dance", "house", Outcome::Success),
		HistoryRecord::new("pop", "folk", Outcome::Failure),
	];

	// The success shares three tags, the failure shares one.
	let score = historical_score("pop, dance", "house", &history);

	assert!((score - 3.0 / 4.0).abs() < EPS, "score = {score}");
}

#[test]
fn record_order_does_not_matter() {
	let mut history = vec![
		HistoryRecord::new("pop, dance", "house", Outcome::Success),
		HistoryRecord::new("pop", "folk", Outcome::Failure),
		HistoryRecord::new("dance", "techno", Outcome::Failure),
		HistoryRecord::new("house, pop", "disco", Outcome::Success),
	];
	let forward = historical_score("pop, dance", "house", &history);

	history.reverse();

	assert_eq!(forward, historical_score("pop, dance", "house", &history));
}

#[test]
fn adding_success_never_decreases_and_failure_never_increases() {
	let mut history = vec![
		HistoryRecord::new("pop, dance", "house", Outcome::Success),
		HistoryRecord::new("pop", "folk", Outcome::Failure),
	];
	let base = historical_score("pop", "house", &history);

	history.push(HistoryRecord::new("pop", "trap", Outcome::Success));

	let with_success = historical_score("pop", "house", &history);

	assert!(with_success >= base);

	history.push(HistoryRecord::new("house", "pop, edm", Outcome::Failure));

	let with_failure = historical_score("pop", "house", &history);

	assert!(with_failure <= with_success);
}

#[test]
fn malformed_rows_count_as_irrelevant() {
	let history = vec![
		HistoryRecord { artist1_tags: None, artist2_tags: None, outcome: Outcome::Success },
		HistoryRecord {
			artist1_tags: Some("pop".to_string()),
			artist2_tags: None,
			outcome: Outcome::Failure,
		},
	];

	assert_eq!(historical_score("pop", "", &history), NEUTRAL_PRIOR);
	assert_eq!(historical_score("pop", "dance", &history), NEUTRAL_PRIOR);
	assert_eq!(historical_score("jazz", "", &history), NEUTRAL_PRIOR);
}

#[test]
fn malformed_rows_do_not_dilute_real_evidence() {
	let history = vec![
		HistoryRecord::new("pop", "dance", Outcome::Success),
		HistoryRecord {
			artist1_tags: None,
			artist2_tags: Some("pop, dance".to_string()),
			outcome: Outcome::Failure,
		},
	];

	assert_eq!(historical_score("pop", "dance", &history), 1.0);
}

#[test]
fn unknown_outcome_labels_never_count_as_success() {
	let history =
		vec![HistoryRecord::new("pop", "dance", Outcome::from_label("SUCCESS (pending)"))];

	assert_eq!(historical_score("pop", "dance", &history), 0.0);
}

#[test]
fn evidence_honours_custom_prior() {
	let evidence = HistoricalEvidence::new(&[]);

	assert_eq!(evidence.score(&TagSet::parse("pop"), &TagSet::parse("rock"), 0.3), 0.3);
}

#[test]
fn blend_is_sixty_forty_before_rounding() {
	let combined = RankPolicy::default().blend(0.80, 0.50);

	assert!((combined - 0.68).abs() < EPS, "combined = {combined}");
}

#[test]
fn end_to_end_semantic_only_ranking() {
	let query = unit(1.0);
	let candidates = vec![
		artist("B", "death metal", unit(0.1)),
		artist("A", "pop, dance-pop", unit(1.0)),
	];
	let ranking = rank("pop, dance-pop", &query, &candidates, &[], 10).expect("ranking failed");

	assert_eq!(ranking.total_considered, 2);
	assert_eq!(ranking.results.len(), 2);

	let first = &ranking.results[0];
	let second = &ranking.results[1];

	assert_eq!(first.artist_name, "A");
	assert_eq!(first.semantic_similarity, 1.0);
	assert_eq!(first.historical_success_rate, 0.5);
	assert_eq!(first.combined_score, 0.8);
	assert_eq!(first.recommendation, Recommendation::HighlyRecommended);
	assert_eq!(second.artist_name, "B");
	assert_eq!(second.semantic_similarity, 0.1);
	assert_eq!(second.combined_score, 0.26);
	assert_eq!(second.recommendation, Recommendation::Risky);
}

#[test]
fn results_are_sorted_descending_and_truncated() {
	let query = unit(1.0);
	let candidates = (0..8)
		.map(|idx| {
			let cos = 0.2 + 0.1 * ((idx * 3) % 8) as f32;

			artist(&format!("artist-{idx}"), "pop", unit(cos))
		})
		.collect::<Vec<_>>();
	let ranking = rank("pop", &query, &candidates, &[], 5).expect("ranking failed");

	assert_eq!(ranking.total_considered, 8);
	assert_eq!(ranking.results.len(), 5);

	for pair in ranking.results.windows(2) {
		assert!(pair[0].combined_score >= pair[1].combined_score);
	}
}

#[test]
fn ties_keep_fetch_order() {
	let query = unit(1.0);
	let candidates = vec![
		artist("first", "pop", unit(0.5)),
		artist("second", "pop", unit(0.5)),
		artist("third", "pop", unit(0.5)),
	];
	let ranking = rank("pop", &query, &candidates, &[], 10).expect("ranking failed");
	let names = ranking.results.iter().map(|r| r.artist_name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, vec!["first", "second", "third"]);
}

#[test]
fn unindexed_artists_are_not_considered() {
	let query = unit(1.0);
	let candidates = vec![
		Artist::new("pending", "pop"),
		artist("empty", "pop", Vec::new()),
		artist("ready", "pop", unit(0.9)),
	];
	let ranking = rank("pop", &query, &candidates, &[], 10).expect("ranking failed");

	assert_eq!(ranking.total_considered, 1);
	assert_eq!(ranking.results.len(), 1);
	assert_eq!(ranking.results[0].artist_name, "ready");
}

#[test]
fn empty_pool_is_a_distinguished_error() {
	let query = unit(1.0);
	let candidates = vec![Artist::new("pending", "pop")];

	let err = rank("pop", &query, &candidates, &[], 10).expect_err("expected error");

	assert_eq!(err, RankError::NoEligibleCandidates);
	assert!(!err.is_validation());
	assert_eq!(rank("pop", &query, &[], &[], 10), Err(RankError::NoEligibleCandidates));
}

#[test]
fn structural_problems_fail_fast() {
	let query = unit(1.0);
	let candidates = vec![artist("A", "pop", unit(1.0))];

	assert_eq!(rank("pop", &query, &candidates, &[], 0), Err(RankError::InvalidTopN));
	assert_eq!(rank("pop", &[], &candidates, &[], 1), Err(RankError::EmptyQueryEmbedding));
	assert_eq!(
		rank("pop", &[f32::NAN, 1.0], &candidates, &[], 1),
		Err(RankError::NonFiniteQueryEmbedding)
	);
	assert_eq!(rank("pop", &[0.0, 0.0], &candidates, &[], 1), Err(RankError::ZeroQueryEmbedding));

	let mismatched = vec![artist("wide", "pop", vec![1.0, 0.0, 0.0])];
	let err = rank("pop", &query, &mismatched, &[], 1).expect_err("expected error");

	assert_eq!(
		err,
		RankError::DimensionMismatch { artist: "wide".to_string(), expected: 2, actual: 3 }
	);
	assert!(err.is_validation());

	let zero = vec![artist("flat", "pop", vec![0.0, 0.0])];

	assert_eq!(
		rank("pop", &query, &zero, &[], 1),
		Err(RankError::ZeroEmbedding { artist: "flat".to_string() })
	);
}

#[test]
fn history_shifts_the_ranking() {
	let query = unit(1.0);
	let history = vec![
		HistoryRecord::new("trap", "hip hop", Outcome::Success),
		HistoryRecord::new("country", "folk", Outcome::Failure),
	];
	let candidates = vec![
		artist("Country Act", "country", unit(0.8)),
		artist("Trap Act", "trap, hip hop", unit(0.75)),
	];
	let ranking = rank("hip hop", &query, &candidates, &history, 10).expect("ranking failed");

	// 0.6 * 0.75 + 0.4 * 1.0 beats 0.6 * 0.8 + 0.4 * 0.5.
	assert_eq!(ranking.results[0].artist_name, "Trap Act");
	assert_eq!(ranking.results[0].historical_success_rate, 1.0);
	assert_eq!(ranking.results[0].combined_score, 0.85);
	assert_eq!(ranking.results[1].historical_success_rate, 0.5);
	assert_eq!(ranking.results[1].combined_score, 0.68);
}

#[test]
fn policy_overrides_change_blend_and_labels() {
	let policy = RankPolicy {
		semantic_weight: 1.0,
		historical_weight: 0.0,
		neutral_prior: 0.0,
		highly_recommended_threshold: 0.95,
		good_match_threshold: 0.2,
	};
	let query = unit(1.0);
	let candidates = vec![artist("A", "pop", unit(0.9))];
	let ranking =
		Ranker::new(policy).rank("pop", &query, &candidates, &[], 1).expect("ranking failed");

	assert_eq!(ranking.results[0].historical_success_rate, 0.0);
	assert_eq!(ranking.results[0].combined_score, 0.9);
	assert_eq!(ranking.results[0].recommendation, Recommendation::GoodMatch);
}

#[test]
fn negative_similarity_is_clamped_to_zero() {
	let query = vec![1.0, 0.0];
	let candidates = vec![artist("opposite", "pop", vec![-1.0, 0.0])];
	let ranking = rank("pop", &query, &candidates, &[], 1).expect("ranking failed");

	assert_eq!(ranking.results[0].semantic_similarity, 0.0);
	assert_eq!(ranking.results[0].combined_score, 0.2);
}
