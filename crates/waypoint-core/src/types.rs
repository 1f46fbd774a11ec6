//! Domain types shared by the scoring, adaptive and matching engines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type ItemId = String;

/// Ordered difficulty ladder shared by knowledge entries, questions and
/// opportunities: `Beginner < Intermediate < Advanced < Expert`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    #[serde(alias = "easy")]
    Beginner,
    #[serde(alias = "medium")]
    Intermediate,
    #[serde(alias = "hard")]
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    /// One level up, or `None` at the top of the ladder.
    pub fn harder(self) -> Option<Difficulty> {
        match self {
            Difficulty::Beginner => Some(Difficulty::Intermediate),
            Difficulty::Intermediate => Some(Difficulty::Advanced),
            Difficulty::Advanced => Some(Difficulty::Expert),
            Difficulty::Expert => None,
        }
    }

    /// One level down, or `None` at the bottom of the ladder.
    pub fn easier(self) -> Option<Difficulty> {
        match self {
            Difficulty::Beginner => None,
            Difficulty::Intermediate => Some(Difficulty::Beginner),
            Difficulty::Advanced => Some(Difficulty::Intermediate),
            Difficulty::Expert => Some(Difficulty::Advanced),
        }
    }

    /// Number of ladder steps between two levels.
    pub fn distance(self, other: Difficulty) -> u8 {
        (self as u8).abs_diff(other as u8)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(Error::InvalidConfig(format!("unknown difficulty '{other}'"))),
        }
    }
}

/// A tagged catalog entry: a knowledge-base article or a study question.
///
/// - `id`: unique within its catalog
/// - `title`: the primary label matched against whole queries
/// - `category`: single label used by the category gate
/// - `keywords`: lowercased, unique tags
/// - `content`: free text searched token by token
///
/// Every field except `id` may be absent in the source data; absent fields
/// load as empty values and `difficulty` defaults to beginner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub content: String,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: String::new(),
            keywords: Vec::new(),
            difficulty: Difficulty::default(),
            content: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// An immutable, insertion-ordered collection of items for one subject.
///
/// Keywords are lowercased and deduplicated on construction. Items whose id
/// repeats an earlier item are dropped.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    subject: String,
    items: Vec<CatalogItem>,
    by_id: HashMap<ItemId, usize>,
}

impl Catalog {
    pub fn new(subject: impl Into<String>, items: Vec<CatalogItem>) -> Self {
        let subject = subject.into();
        let mut kept = Vec::with_capacity(items.len());
        let mut by_id = HashMap::with_capacity(items.len());
        for mut item in items {
            if by_id.contains_key(&item.id) {
                tracing::warn!(subject = %subject, id = %item.id, "duplicate catalog id dropped");
                continue;
            }
            item.keywords = normalize_keywords(&item.keywords);
            by_id.insert(item.id.clone(), kept.len());
            kept.push(item);
        }
        Self { subject, items: kept, by_id }
    }

    pub fn subject(&self) -> &str { &self.subject }

    pub fn items(&self) -> &[CatalogItem] { &self.items }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.by_id.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool { self.by_id.contains_key(id) }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        let k = k.trim().to_lowercase();
        if !k.is_empty() && !out.contains(&k) {
            out.push(k);
        }
    }
    out
}

/// Free-text query with an optional category gate and structured filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub filters: FilterSet,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }
}

/// Kinds of opportunity a matching source can list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityKind {
    #[default]
    Job,
    Internship,
    Course,
    Mentorship,
    Event,
}

impl OpportunityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityKind::Job => "job",
            OpportunityKind::Internship => "internship",
            OpportunityKind::Course => "course",
            OpportunityKind::Mentorship => "mentorship",
            OpportunityKind::Event => "event",
        }
    }
}

/// Structured hard filters. Every populated field must hold for an item to
/// be considered; empty fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub level: Option<Difficulty>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remote_only: bool,
    #[serde(default)]
    pub kinds: Vec<OpportunityKind>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
            && self.level.is_none()
            && self.location.is_none()
            && !self.remote_only
            && self.kinds.is_empty()
    }

    /// Order- and case-insensitive rendering; equal filter sets render equal.
    pub fn canonical(&self) -> String {
        let mut skills: Vec<String> = self.skills.iter().map(|s| s.trim().to_lowercase()).collect();
        skills.sort();
        skills.dedup();
        let mut kinds: Vec<&str> = self.kinds.iter().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        format!(
            "skills={};level={};location={};remote={};kinds={}",
            skills.join(","),
            self.level.map(Difficulty::as_str).unwrap_or(""),
            self.location.as_deref().map(|l| l.trim().to_lowercase()).unwrap_or_default(),
            self.remote_only,
            kinds.join(","),
        )
    }
}

/// An item paired with its relevance score. Higher is better; scores are
/// only comparable within one ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<T> {
    pub item: T,
    pub score: f64,
}

/// A listing from one opportunity source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub kind: OpportunityKind,
    #[serde(default)]
    pub level: Difficulty,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Opportunity {
    pub fn new(id: impl Into<String>, title: impl Into<String>, organization: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            organization: organization.into(),
            source: String::new(),
            location: String::new(),
            remote: false,
            kind: OpportunityKind::default(),
            level: Difficulty::default(),
            skills: Vec::new(),
            description: String::new(),
        }
    }
}

/// The user side of opportunity matching. `id` identifies the subject for
/// cache keys; the remaining fields feed the profile scorer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub level: Difficulty,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub remote_preferred: bool,
}

impl Profile {
    /// Order- and case-insensitive rendering of everything that influences
    /// scoring, so two identical profiles share cache entries.
    pub fn canonical(&self) -> String {
        let sorted = |v: &[String]| {
            let mut v: Vec<String> = v.iter().map(|s| s.trim().to_lowercase()).collect();
            v.sort();
            v.dedup();
            v.join(",")
        };
        format!(
            "id={};skills={};level={};location={};interests={};remote={}",
            self.id,
            sorted(&self.skills),
            self.level,
            self.location.as_deref().map(|l| l.trim().to_lowercase()).unwrap_or_default(),
            sorted(&self.interests),
            self.remote_preferred,
        )
    }
}
