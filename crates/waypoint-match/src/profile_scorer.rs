use serde::Serialize;

use waypoint_core::config::MatchSettings;
use waypoint_core::traits::Scorer;
use waypoint_core::types::{FilterSet, Opportunity, Profile};
use waypoint_rank::tokenize::significant_tokens;

/// Why an opportunity scored what it did for a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchBreakdown {
    pub skills: f64,
    pub level: f64,
    pub location: f64,
    pub remote: f64,
    pub interests: f64,
    pub jitter: f64,
    pub matched_skills: Vec<String>,
}

impl MatchBreakdown {
    pub fn total(&self) -> f64 {
        self.skills + self.level + self.location + self.remote + self.interests + self.jitter
    }
}

/// Profile-to-opportunity scorer: skill overlap, level fit, location,
/// remote preference and interest keywords. Deterministic; jitter is added by
/// the matcher, never here.
#[derive(Debug, Clone, Default)]
pub struct ProfileScorer {
    weights: MatchSettings,
}

impl ProfileScorer {
    pub fn new(weights: MatchSettings) -> Self { Self { weights } }

    pub fn breakdown(&self, profile: &Profile, opp: &Opportunity) -> MatchBreakdown {
        let mut out = MatchBreakdown::default();
        let opp_skills: Vec<String> = opp.skills.iter().map(|s| s.trim().to_lowercase()).collect();
        for skill in &profile.skills {
            let skill = skill.trim().to_lowercase();
            if !skill.is_empty() && opp_skills.contains(&skill) && !out.matched_skills.contains(&skill) {
                out.skills += self.weights.skill_match;
                out.matched_skills.push(skill);
            }
        }

        out.level = match profile.level.distance(opp.level) {
            0 => self.weights.level_exact,
            1 => self.weights.level_adjacent,
            _ => 0.0,
        };

        if let Some(loc) = profile.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            if opp.location.to_lowercase().contains(&loc.to_lowercase()) {
                out.location = self.weights.location_match;
            }
        }

        if profile.remote_preferred && opp.remote {
            out.remote = self.weights.remote_match;
        }

        let haystack = format!("{} {}", opp.title, opp.description).to_lowercase();
        for interest in &profile.interests {
            let hit = significant_tokens(interest, 3).iter().any(|t| haystack.contains(t.as_str()));
            if hit {
                out.interests += self.weights.interest_match;
            }
        }
        out
    }
}

impl Scorer<Profile, Opportunity> for ProfileScorer {
    fn score(&self, profile: &Profile, opp: &Opportunity) -> f64 {
        self.breakdown(profile, opp).total().max(0.0)
    }
}

/// Hard filter gate. Empty filter fields do not restrict; a skills filter
/// passes when the listing asks for at least one of the skills.
pub fn passes_filters(filters: &FilterSet, opp: &Opportunity) -> bool {
    if !filters.skills.is_empty() {
        let wanted = filters
            .skills
            .iter()
            .any(|f| opp.skills.iter().any(|s| s.trim().eq_ignore_ascii_case(f.trim())));
        if !wanted {
            return false;
        }
    }
    if filters.level.is_some_and(|level| level != opp.level) {
        return false;
    }
    if let Some(loc) = filters.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        if !opp.location.to_lowercase().contains(&loc.to_lowercase()) {
            return false;
        }
    }
    if filters.remote_only && !opp.remote {
        return false;
    }
    filters.kinds.is_empty() || filters.kinds.contains(&opp.kind)
}
