use proptest::prelude::*;

use waypoint_core::config::{RankSettings, ScoringSettings};
use waypoint_core::traits::Scorer;
use waypoint_core::types::{Catalog, CatalogItem, Difficulty, Query};
use waypoint_rank::{rank, rank_with, KnowledgeBase, KnowledgeScorer, DEFAULT_LIMIT};

fn knowledge_catalog() -> Catalog {
    Catalog::new(
        "knowledge",
        vec![
            CatalogItem::new("py", "Data Analysis with Pandas")
                .with_category("programming")
                .with_keywords(["python", "pandas"])
                .with_content("Load a CSV into a DataFrame and summarize columns."),
            CatalogItem::new("html", "HTML Structure and Semantics")
                .with_category("web")
                .with_keywords(["html", "markup", "tags"])
                .with_content("Elements such as header, nav and article describe page structure."),
            CatalogItem::new("css", "CSS Layout Basics")
                .with_category("web")
                .with_keywords(["css", "layout", "flexbox"])
                .with_content("Flexbox aligns items along one axis; grid works in two."),
            CatalogItem::new("resume", "Writing a Strong Resume")
                .with_category("career")
                .with_keywords(["resume", "cv", "career"])
                .with_content("Lead with impact and quantify results."),
        ],
    )
}

fn knowledge_base() -> KnowledgeBase {
    KnowledgeBase::new(knowledge_catalog(), ScoringSettings::default(), &RankSettings::default())
}

#[test]
fn what_is_html_ranks_markup_entry_above_unrelated() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    let query = Query::new("what is html");
    let html = scorer.score(&query, catalog.get("html").unwrap());
    let python = scorer.score(&query, catalog.get("py").unwrap());
    assert!(html > python, "html={html} python={python}");

    let results = knowledge_base().search(&query);
    assert_eq!(results.hits[0].item.id, "html");
    assert!(!results.ids().contains(&"py"), "zero-score entries are excluded");
}

#[test]
fn breakdown_reports_each_factor() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    let b = scorer.breakdown(&Query::new("what is html"), catalog.get("html").unwrap());
    assert_eq!(b.keywords, 80.0, "only 'html' appears in the query");
    assert_eq!(b.tokens, 40.0, "'html' token hits the title");
    assert_eq!(b.patterns, 50.0);
    assert_eq!(b.title, 0.0);
    assert_eq!(b.matched_keywords, vec!["html"]);
    assert_eq!(b.total(), 170.0);
}

#[test]
fn uppercase_keywords_score_like_lowercase_outside_a_catalog() {
    let scorer = KnowledgeScorer::default();
    let query = Query::new("what is html");
    let shouting = CatalogItem::new("h", "Page Structure").with_keywords(["HTML", "Markup", "html"]);
    let quiet = CatalogItem::new("h", "Page Structure").with_keywords(["html", "markup"]);

    let b = scorer.breakdown(&query, &shouting);
    assert_eq!(b.matched_keywords, vec!["html"]);
    assert_eq!(b.keywords, 80.0, "repeated keyword counts once");
    assert_eq!(b.patterns, 50.0);
    assert_eq!(scorer.score(&query, &shouting), scorer.score(&query, &quiet));

    let ranked = rank_with(&scorer, &query, &[shouting], DEFAULT_LIMIT);
    assert_eq!(ranked.len(), 1);
}

#[test]
fn title_substring_match_earns_title_bonus() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    let b = scorer.breakdown(&Query::new("CSS layout"), catalog.get("css").unwrap());
    assert_eq!(b.title, 100.0);
}

#[test]
fn partial_keyword_match_uses_smaller_bonus() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    // "flex" is contained in the keyword "flexbox" but the query does not contain "flexbox"
    let b = scorer.breakdown(&Query::new("flex"), catalog.get("css").unwrap());
    assert_eq!(b.keywords, 60.0);
}

#[test]
fn category_filter_is_a_hard_gate() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    let gated = Query::new("what is html").with_category("career");
    assert_eq!(scorer.score(&gated, catalog.get("html").unwrap()), 0.0);

    let results = knowledge_base().search(&Query::new("resume layout").with_category("career"));
    assert_eq!(results.ids(), vec!["resume"]);
}

#[test]
fn empty_query_and_empty_catalog_yield_nothing() {
    assert!(knowledge_base().search(&Query::new("   ")).is_empty());
    let empty = KnowledgeBase::new(Catalog::new("none", vec![]), ScoringSettings::default(), &RankSettings::default());
    assert!(empty.search(&Query::new("html")).is_empty());
}

#[test]
fn details_side_table_covers_exactly_the_hits() {
    let results = knowledge_base().search(&Query::new("layout and resume"));
    assert!(!results.is_empty());
    assert_eq!(results.details.len(), results.len());
    for hit in &results.hits {
        let detail = results.details.get(&hit.item.id).expect("detail for hit");
        assert_eq!(detail.total(), hit.score);
    }
}

#[test]
fn scoring_is_deterministic() {
    let scorer = KnowledgeScorer::default();
    let catalog = knowledge_catalog();
    let q = Query::new("python pandas dataframe");
    let item = catalog.get("py").unwrap();
    assert_eq!(scorer.score(&q, item), scorer.score(&q, item));
}

#[test]
fn custom_weights_change_magnitudes() {
    let weights = ScoringSettings { keyword_in_query: 1.0, token_in_title: 0.0, pattern_boosts: vec![], ..ScoringSettings::default() };
    let scorer = KnowledgeScorer::new(weights);
    let catalog = knowledge_catalog();
    assert_eq!(scorer.score(&Query::new("what is html"), catalog.get("html").unwrap()), 1.0);
}

#[test]
fn ties_keep_insertion_order_and_limit_truncates() {
    let items = vec!["a", "b", "c", "d", "e", "f", "g"];
    let scores = vec![1.0, 3.0, 1.0, 3.0, 0.0, 2.0, 1.0];
    let ranked = rank(&items, &scores, DEFAULT_LIMIT);
    let order: Vec<&str> = ranked.iter().map(|s| s.item).collect();
    assert_eq!(order, vec!["b", "d", "f", "a", "c"]);
}

#[test]
fn rank_with_empty_input_is_empty() {
    let scorer = KnowledgeScorer::default();
    let ranked = rank_with(&scorer, &Query::new("html"), &Vec::<CatalogItem>::new(), 5);
    assert!(ranked.is_empty());
}

#[test]
fn related_entries_share_keywords() {
    let catalog = Catalog::new(
        "kb",
        vec![
            CatalogItem::new("a", "A").with_keywords(["html", "css"]),
            CatalogItem::new("b", "B").with_keywords(["css"]),
            CatalogItem::new("c", "C").with_keywords(["html", "css", "js"]).with_difficulty(Difficulty::Advanced),
            CatalogItem::new("d", "D").with_keywords(["python"]),
        ],
    );
    let kb = KnowledgeBase::new(catalog, ScoringSettings::default(), &RankSettings::default());
    let related: Vec<String> = kb.related("a", 5).into_iter().map(|s| s.item.id).collect();
    assert_eq!(related, vec!["c", "b"]);
    assert!(kb.related("missing", 5).is_empty());
}

proptest! {
    #[test]
    fn ranked_output_is_sorted_and_positive(
        scores in proptest::collection::vec(-5.0f64..50.0, 0..40),
        limit in 0usize..12,
    ) {
        let items: Vec<usize> = (0..scores.len()).collect();
        let ranked = rank(&items, &scores, limit);
        prop_assert!(ranked.len() <= limit);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].item < pair[1].item, "ties keep insertion order");
            }
        }
        for s in &ranked {
            prop_assert!(s.score > 0.0);
        }
    }
}
