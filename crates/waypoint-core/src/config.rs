use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::types::Difficulty;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("waypoint.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("waypoint.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("waypoint.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("waypoint.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("WAYPOINT_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document; used by tests and
    /// embedders that carry their own configuration.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::string(toml));
        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    fn validate(&self) -> anyhow::Result<()> {
        let s = self.settings()?;
        if s.rank.default_limit == 0 {
            anyhow::bail!("rank.default_limit must be at least 1");
        }
        if s.adaptive.promote_after == 0 {
            anyhow::bail!("adaptive.promote_after must be at least 1");
        }
        let (weak, strong) = (s.insights.weak_threshold, s.insights.strong_threshold);
        if !(0.0..=1.0).contains(&weak) || !(0.0..=1.0).contains(&strong) || weak > strong {
            anyhow::bail!("insight thresholds must satisfy 0 <= weak ({weak}) <= strong ({strong}) <= 1");
        }
        if !s.matching.jitter.is_finite() || s.matching.jitter < 0.0 {
            anyhow::bail!("matching.jitter must be a finite, non-negative number");
        }
        Ok(())
    }
}

/// Every tunable the engine reads. Defaults reproduce the hand-tuned values
/// the guidance site shipped with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub scoring: ScoringSettings,
    pub rank: RankSettings,
    pub adaptive: AdaptiveSettings,
    pub insights: InsightSettings,
    pub matching: MatchSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub knowledge_path: String,
    pub subjects_dir: String,
    pub opportunities_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            knowledge_path: "data/knowledge.json".to_string(),
            subjects_dir: "data/subjects".to_string(),
            opportunities_path: "data/opportunities.json".to_string(),
        }
    }
}

/// Bonus magnitudes for the additive knowledge scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub title_match: f64,
    pub keyword_in_query: f64,
    pub keyword_partial: f64,
    pub token_in_title: f64,
    pub token_in_content: f64,
    /// Query tokens shorter than this are ignored by the per-token factors.
    pub min_token_len: usize,
    pub pattern_boosts: Vec<PatternBoost>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            title_match: 100.0,
            keyword_in_query: 80.0,
            keyword_partial: 60.0,
            token_in_title: 40.0,
            token_in_content: 15.0,
            min_token_len: 3,
            pattern_boosts: default_pattern_boosts(),
        }
    }
}

/// Curated intent bridge: a query containing any trigger phrase boosts items
/// tagged with any target keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBoost {
    pub triggers: Vec<String>,
    pub targets: Vec<String>,
    pub bonus: f64,
}

impl PatternBoost {
    pub fn new(triggers: &[&str], targets: &[&str], bonus: f64) -> Self {
        Self {
            triggers: triggers.iter().map(|s| s.to_string()).collect(),
            targets: targets.iter().map(|s| s.to_string()).collect(),
            bonus,
        }
    }
}

fn default_pattern_boosts() -> Vec<PatternBoost> {
    vec![
        PatternBoost::new(&["what is html", "html basics", "learn html"], &["html", "markup"], 50.0),
        PatternBoost::new(&["what is css", "styling", "make it look"], &["css", "styling", "layout"], 50.0),
        PatternBoost::new(&["what is javascript", "what is js", "javascript basics"], &["javascript", "js"], 50.0),
        PatternBoost::new(&["what is python", "python basics"], &["python"], 50.0),
        PatternBoost::new(&["resume", "cv"], &["resume", "cv"], 40.0),
        PatternBoost::new(&["interview", "hiring process"], &["interview"], 40.0),
        PatternBoost::new(&["career change", "switch careers", "new career"], &["career", "transition"], 40.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    pub default_limit: usize,
}

impl Default for RankSettings {
    fn default() -> Self { Self { default_limit: 5 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveSettings {
    /// Consecutive correct answers needed to move up one level.
    pub promote_after: u32,
    /// Highest level a subject ladder reaches.
    pub top: Difficulty,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self { promote_after: 2, top: Difficulty::Advanced, shuffle: false, seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    pub strong_threshold: f64,
    pub weak_threshold: f64,
    /// Extra recommendation lines keyed by subject id.
    pub subject_tips: BTreeMap<String, Vec<String>>,
}

impl Default for InsightSettings {
    fn default() -> Self {
        let mut subject_tips = BTreeMap::new();
        subject_tips.insert(
            "html".to_string(),
            vec![
                "Rebuild a page you use daily with semantic elements only.".to_string(),
                "Validate your markup and fix every accessibility warning.".to_string(),
            ],
        );
        subject_tips.insert(
            "css".to_string(),
            vec![
                "Recreate a layout with both flexbox and grid to compare them.".to_string(),
                "Practice specificity by debugging conflicting rules in devtools.".to_string(),
            ],
        );
        subject_tips.insert(
            "javascript".to_string(),
            vec![
                "Write small DOM exercises without a framework.".to_string(),
                "Trace async code by hand until promises feel predictable.".to_string(),
            ],
        );
        subject_tips.insert(
            "python".to_string(),
            vec![
                "Solve one data-wrangling task a day with pandas.".to_string(),
                "Read the standard library docs for collections and itertools.".to_string(),
            ],
        );
        Self { strong_threshold: 0.8, weak_threshold: 0.6, subject_tips }
    }
}

/// Weights for profile-to-opportunity scoring plus the opt-in randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub skill_match: f64,
    pub level_exact: f64,
    pub level_adjacent: f64,
    pub location_match: f64,
    pub remote_match: f64,
    pub interest_match: f64,
    /// Upper bound of the uniform jitter added to each score; 0 disables.
    pub jitter: f64,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub limit: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            skill_match: 25.0,
            level_exact: 20.0,
            level_adjacent: 10.0,
            location_match: 15.0,
            remote_match: 10.0,
            interest_match: 10.0,
            jitter: 0.0,
            shuffle: false,
            seed: None,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub opportunity_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self { Self { opportunity_ttl_secs: 30 * 60 } }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative catalog path against `base` after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
