use std::fs;
use tempfile::TempDir;

use waypoint_core::catalog_loader::CatalogLoader;
use waypoint_core::config::Config;
use waypoint_core::types::{Catalog, CatalogItem, Difficulty, FilterSet, OpportunityKind, Profile};
use waypoint_core::Error;

#[test]
fn load_catalog_bare_array_uses_fallback_subject() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("html.json");
    fs::write(
        &path,
        r#"[{"id":"q1","title":"Tags","keywords":["HTML","html","markup"],"difficulty":"beginner"}]"#,
    )
    .unwrap();

    let catalog = CatalogLoader::new().load_catalog(&path, "html").expect("load");

    assert_eq!(catalog.subject(), "html");
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.items()[0].keywords, vec!["html", "markup"], "keywords lowercased and unique");
}

#[test]
fn load_catalog_tolerates_missing_optional_fields() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("kb.json");
    fs::write(&path, r#"{"subject":"knowledge","items":[{"id":"k1"}]}"#).unwrap();

    let catalog = CatalogLoader::new().load_catalog(&path, "ignored").expect("load");

    assert_eq!(catalog.subject(), "knowledge");
    let item = catalog.get("k1").expect("item");
    assert!(item.title.is_empty());
    assert!(item.keywords.is_empty());
    assert_eq!(item.difficulty, Difficulty::Beginner);
}

#[test]
fn load_subjects_dir_one_catalog_per_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("css.json"), r#"[{"id":"c1"},{"id":"c2"}]"#).unwrap();
    fs::write(dir.join("python.json"), r#"[{"id":"p1"}]"#).unwrap();
    fs::write(dir.join("notes.txt"), "not a catalog").unwrap();

    let catalogs = CatalogLoader::new().load_subjects_dir(dir).expect("load dir");

    let subjects: Vec<&str> = catalogs.iter().map(|c| c.subject()).collect();
    assert_eq!(subjects, vec!["css", "python"]);
    assert_eq!(catalogs[0].len(), 2);
}

#[test]
fn missing_catalog_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = CatalogLoader::new()
        .load_catalog(&tmp.path().join("absent.json"), "absent")
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn catalog_drops_duplicate_ids_keeping_first() {
    let catalog = Catalog::new(
        "s",
        vec![CatalogItem::new("a", "first"), CatalogItem::new("a", "second"), CatalogItem::new("b", "third")],
    );
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get("a").unwrap().title, "first");
}

#[test]
fn difficulty_ladder_ordering_and_steps() {
    assert!(Difficulty::Beginner < Difficulty::Intermediate);
    assert!(Difficulty::Advanced < Difficulty::Expert);
    assert_eq!(Difficulty::Beginner.easier(), None);
    assert_eq!(Difficulty::Expert.harder(), None);
    assert_eq!(Difficulty::Advanced.easier(), Some(Difficulty::Intermediate));
    assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
    assert!("impossible".parse::<Difficulty>().is_err());
}

#[test]
fn filter_canonical_ignores_order_and_case() {
    let a = FilterSet {
        skills: vec!["Rust".into(), "sql".into()],
        kinds: vec![OpportunityKind::Internship, OpportunityKind::Job],
        location: Some(" Berlin ".into()),
        ..FilterSet::default()
    };
    let b = FilterSet {
        skills: vec!["SQL".into(), "rust".into()],
        kinds: vec![OpportunityKind::Job, OpportunityKind::Internship],
        location: Some("berlin".into()),
        ..FilterSet::default()
    };
    assert_eq!(a.canonical(), b.canonical());
    assert_ne!(a.canonical(), FilterSet::default().canonical());
}

#[test]
fn profile_canonical_distinguishes_subjects() {
    let a = Profile { id: "u1".into(), skills: vec!["Rust".into()], ..Profile::default() };
    let b = Profile { id: "u2".into(), skills: vec!["rust".into()], ..Profile::default() };
    assert_ne!(a.canonical(), b.canonical());
}

#[test]
fn config_defaults_and_overrides() {
    let config = Config::from_toml_str("[rank]\ndefault_limit = 3\n[insights]\nweak_threshold = 0.5\n").expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.rank.default_limit, 3);
    assert_eq!(settings.insights.weak_threshold, 0.5);
    assert_eq!(settings.insights.strong_threshold, 0.8);
    assert_eq!(settings.scoring.title_match, 100.0);
    assert_eq!(settings.cache.opportunity_ttl_secs, 1800);
    assert_eq!(config.get::<u32>("adaptive.promote_after").unwrap(), 2);
}

#[test]
fn config_rejects_inverted_thresholds() {
    let result = Config::from_toml_str("[insights]\nweak_threshold = 0.9\nstrong_threshold = 0.7\n");
    assert!(result.is_err());
}

#[test]
fn config_rejects_non_finite_jitter() {
    assert!(Config::from_toml_str("[matching]\njitter = inf\n").is_err());
    assert!(Config::from_toml_str("[matching]\njitter = nan\n").is_err());
    assert!(Config::from_toml_str("[matching]\njitter = -1.0\n").is_err());
    assert!(Config::from_toml_str("[matching]\njitter = 2.5\n").is_ok());
}
