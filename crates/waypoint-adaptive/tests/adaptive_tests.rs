use std::sync::Arc;

use waypoint_adaptive::{
    AdaptiveSelector, AdaptiveState, Area, InsightGenerator, PerformanceBand, PerformanceLedger, StudySession,
    Transition,
};
use waypoint_core::config::{AdaptiveSettings, InsightSettings};
use waypoint_core::types::{Catalog, CatalogItem, Difficulty, Query};
use waypoint_core::Error;
use waypoint_rank::KnowledgeScorer;

fn question(id: &str, difficulty: Difficulty, category: &str) -> CatalogItem {
    CatalogItem::new(id, format!("Question {id}")).with_difficulty(difficulty).with_category(category)
}

fn html_bank() -> Catalog {
    Catalog::new(
        "html",
        vec![
            question("b1", Difficulty::Beginner, "elements"),
            question("b2", Difficulty::Beginner, "elements"),
            question("i1", Difficulty::Intermediate, "forms"),
            question("i2", Difficulty::Intermediate, "forms"),
            question("a1", Difficulty::Advanced, "accessibility"),
        ],
    )
}

#[test]
fn two_correct_from_beginner_promotes_to_intermediate() {
    let mut state = AdaptiveState::new(Difficulty::Beginner);
    assert_eq!(state.record(true), Transition::Unchanged);
    assert_eq!(
        state.record(true),
        Transition::Promoted { from: Difficulty::Beginner, to: Difficulty::Intermediate }
    );
    assert_eq!(state.current(), Difficulty::Intermediate);
    assert_eq!(state.consecutive_correct(), 0);
}

#[test]
fn single_incorrect_from_advanced_demotes_immediately() {
    let mut state = AdaptiveState::new(Difficulty::Advanced);
    assert_eq!(
        state.record(false),
        Transition::Demoted { from: Difficulty::Advanced, to: Difficulty::Intermediate }
    );
    assert_eq!(state.current(), Difficulty::Intermediate);
    assert_eq!(state.consecutive_incorrect(), 1);
}

#[test]
fn incorrect_resets_correct_streak() {
    let mut state = AdaptiveState::new(Difficulty::Intermediate);
    state.record(true);
    state.record(false);
    assert_eq!(state.current(), Difficulty::Beginner);
    assert_eq!(state.record(true), Transition::Unchanged, "streak restarted after the miss");
    assert!(matches!(state.record(true), Transition::Promoted { .. }));
}

#[test]
fn ladder_is_clamped_at_both_ends() {
    let mut bottom = AdaptiveState::new(Difficulty::Beginner);
    assert_eq!(bottom.record(false), Transition::Unchanged);
    assert_eq!(bottom.current(), Difficulty::Beginner);

    let mut top = AdaptiveState::new(Difficulty::Advanced);
    for _ in 0..5 {
        assert_eq!(top.record(true), Transition::Unchanged);
    }
    assert_eq!(top.current(), Difficulty::Advanced);

    let mut expert = AdaptiveState::new(Difficulty::Advanced).with_top(Difficulty::Expert);
    expert.record(true);
    assert!(matches!(expert.record(true), Transition::Promoted { to: Difficulty::Expert, .. }));
}

#[test]
fn promotion_threshold_is_configurable() {
    let settings = AdaptiveSettings { promote_after: 3, ..AdaptiveSettings::default() };
    let mut state = AdaptiveState::from_settings(Difficulty::Beginner, &settings);
    state.record(true);
    state.record(true);
    assert_eq!(state.current(), Difficulty::Beginner);
    state.record(true);
    assert_eq!(state.current(), Difficulty::Intermediate);
}

#[test]
fn ledger_covering_catalog_is_complete() {
    let catalog = Catalog::new(
        "mini",
        vec![CatalogItem::new("q1", "One"), CatalogItem::new("q2", "Two"), CatalogItem::new("q3", "Three")],
    );
    let ledger = PerformanceLedger::from_outcomes([("q1", vec![true]), ("q2", vec![true]), ("q3", vec![true])]);
    assert!(ledger.is_complete(&catalog));

    let partial = PerformanceLedger::from_outcomes([("q1", vec![true]), ("q2", vec![false, false])]);
    assert!(!partial.is_complete(&catalog));
}

#[test]
fn mastery_is_sticky_and_ledger_appends() {
    let mut ledger = PerformanceLedger::new();
    ledger.record("q1", true);
    ledger.record("q1", false);
    assert!(ledger.is_mastered("q1"));
    assert_eq!(ledger.outcomes("q1"), &[true, false]);
    assert_eq!(ledger.attempts(), 2);
    assert_eq!(ledger.accuracy(), 0.5);
    assert_eq!(PerformanceLedger::new().accuracy(), 0.0);
}

#[test]
fn selector_prefers_target_level_and_skips_mastered() {
    let catalog = html_bank();
    let ledger = PerformanceLedger::from_outcomes([("i1", vec![true])]);
    let picked = AdaptiveSelector::new().select(&catalog, &ledger, Difficulty::Intermediate, 5);
    let ids: Vec<&str> = picked.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["i2"]);
}

#[test]
fn selector_widens_when_level_exhausted() {
    let catalog = html_bank();
    let ledger = PerformanceLedger::from_outcomes([("a1", vec![true])]);
    let picked = AdaptiveSelector::new().select(&catalog, &ledger, Difficulty::Advanced, 3);
    let ids: Vec<&str> = picked.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2", "i1"]);

    let done = PerformanceLedger::from_outcomes(catalog.items().iter().map(|i| (i.id.clone(), vec![true])));
    assert!(AdaptiveSelector::new().select(&catalog, &done, Difficulty::Beginner, 3).is_empty());
}

#[test]
fn seeded_shuffle_is_reproducible() {
    let catalog = Catalog::new(
        "big",
        (0..20).map(|i| question(&format!("q{i}"), Difficulty::Beginner, "misc")).collect(),
    );
    let ledger = PerformanceLedger::new();
    let a = AdaptiveSelector::new().with_shuffle_seed(7).select(&catalog, &ledger, Difficulty::Beginner, 20);
    let b = AdaptiveSelector::new().with_shuffle_seed(7).select(&catalog, &ledger, Difficulty::Beginner, 20);
    assert_eq!(a, b);
    assert_eq!(a.len(), 20);
}

#[test]
fn topic_query_puts_matching_candidates_first() {
    let catalog = Catalog::new(
        "web",
        vec![
            question("q1", Difficulty::Beginner, "misc").with_keywords(["css"]),
            question("q2", Difficulty::Beginner, "misc").with_keywords(["html", "forms"]),
            question("q3", Difficulty::Beginner, "misc").with_keywords(["css"]),
        ],
    );
    let picked = AdaptiveSelector::new().select_for_topic(
        &catalog,
        &PerformanceLedger::new(),
        Difficulty::Beginner,
        2,
        &KnowledgeScorer::default(),
        &Query::new("html forms"),
    );
    let ids: Vec<&str> = picked.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["q2", "q1"]);
}

#[test]
fn session_tracks_progress_until_complete() {
    let catalog = Arc::new(Catalog::new(
        "mini",
        vec![question("b1", Difficulty::Beginner, "x"), question("i1", Difficulty::Intermediate, "x")],
    ));
    let mut session = StudySession::new(catalog, Difficulty::Beginner, &AdaptiveSettings::default());
    assert_eq!(session.next_items(5)[0].id, "b1");

    session.submit("b1", false).unwrap();
    assert!(!session.is_complete());
    session.submit("b1", true).unwrap();
    assert_eq!(session.progress().mastered, 1);
    assert_eq!(session.next_items(5)[0].id, "i1", "widened to the remaining item");

    session.submit("i1", true).unwrap();
    assert!(session.is_complete());
    assert_eq!(session.progress().fraction(), 1.0);
    assert!(session.next_items(5).is_empty());
}

#[test]
fn session_rejects_unknown_items() {
    let catalog = Arc::new(html_bank());
    let mut session = StudySession::new(catalog, Difficulty::Beginner, &AdaptiveSettings::default());
    assert!(matches!(session.submit("nope", true), Err(Error::NotFound(_))));
    assert!(session.ledger().is_empty());
}

#[test]
fn high_accuracy_report_is_strong_without_weak_areas() {
    let catalog = Catalog::new(
        "html",
        (0..20).map(|i| question(&format!("q{i}"), Difficulty::Beginner, "elements")).collect(),
    );
    // 19 of 20 answers correct: 95%
    let ledger = PerformanceLedger::from_outcomes((0..20).map(|i| (format!("q{i}"), vec![i != 0])));
    let report = InsightGenerator::default().report(&catalog, &ledger);

    assert!((report.overall_accuracy() - 0.95).abs() < 1e-9);
    assert_eq!(report.band, Some(PerformanceBand::Excellent));
    assert!(report.recommendations[0].to_lowercase().contains("strong performance"));
    assert!(report.weak_areas.is_empty());
    assert!(report.strong_areas.contains(&Area::Level(Difficulty::Beginner)));
    assert!(report.strong_areas.contains(&Area::Topic("elements".to_string())));
    assert!(report.recommendations.len() > 1, "html subject tips are appended");
}

#[test]
fn weak_buckets_are_reported_per_level_and_topic() {
    let catalog = html_bank();
    let ledger = PerformanceLedger::from_outcomes([
        ("b1", vec![true]),
        ("b2", vec![true]),
        ("i1", vec![false, true]),
        ("a1", vec![false, false]),
    ]);
    let report = InsightGenerator::new(InsightSettings::default()).report(&catalog, &ledger);

    assert_eq!(report.accuracy_by_difficulty[&Difficulty::Beginner].accuracy(), 1.0);
    assert_eq!(report.accuracy_by_difficulty[&Difficulty::Intermediate].accuracy(), 0.5);
    assert!(!report.accuracy_by_difficulty.contains_key(&Difficulty::Expert));
    assert!(report.weak_areas.contains(&Area::Level(Difficulty::Advanced)));
    assert!(report.weak_areas.contains(&Area::Topic("accessibility".to_string())));
    assert_eq!(report.band, Some(PerformanceBand::Fair));
    assert!(report.recommendations.iter().any(|r| r.starts_with("Review advanced questions")));
}

#[test]
fn empty_ledger_gets_safe_default() {
    let report = InsightGenerator::default().report(&html_bank(), &PerformanceLedger::new());
    assert_eq!(report.overall_accuracy(), 0.0);
    assert_eq!(report.band, None);
    assert_eq!(report.recommendations, vec![waypoint_adaptive::insights::EMPTY_LEDGER_ADVICE.to_string()]);
    assert!(report.strong_areas.is_empty() && report.weak_areas.is_empty());
}
