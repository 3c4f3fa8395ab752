//! Interest Classifier — maps trait scores onto Holland occupational-interest codes.
//!
//! A coarse multi-label tagger: every rule that matches contributes its category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assessment::trait_scorer::TraitScores;

pub const HIGH_THRESHOLD: f64 = 0.6;
pub const LOW_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestCategory {
    Realistic,
    Investigative,
    Artistic,
    Social,
    Enterprising,
    Conventional,
}

/// Substituted when no rule matches.
pub const DEFAULT_CATEGORIES: [InterestCategory; 2] =
    [InterestCategory::Social, InterestCategory::Investigative];

impl InterestCategory {
    pub const ALL: [InterestCategory; 6] = [
        InterestCategory::Realistic,
        InterestCategory::Investigative,
        InterestCategory::Artistic,
        InterestCategory::Social,
        InterestCategory::Enterprising,
        InterestCategory::Conventional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterestCategory::Realistic => "Realistic",
            InterestCategory::Investigative => "Investigative",
            InterestCategory::Artistic => "Artistic",
            InterestCategory::Social => "Social",
            InterestCategory::Enterprising => "Enterprising",
            InterestCategory::Conventional => "Conventional",
        }
    }
}

impl fmt::Display for InterestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterestCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown interest category '{s}'"))
    }
}

/// Returns the matched categories in rule order, without duplicates. Never empty.
pub fn classify(scores: &TraitScores) -> Vec<InterestCategory> {
    let high = |v: f64| v >= HIGH_THRESHOLD;
    let low = |v: f64| v <= LOW_THRESHOLD;

    let rules = [
        (
            InterestCategory::Social,
            high(scores.extraversion) && high(scores.agreeableness),
        ),
        (
            InterestCategory::Enterprising,
            high(scores.extraversion) && high(scores.conscientiousness),
        ),
        (
            InterestCategory::Investigative,
            high(scores.openness) && high(scores.conscientiousness),
        ),
        (
            InterestCategory::Artistic,
            high(scores.openness) && high(scores.agreeableness),
        ),
        (
            InterestCategory::Conventional,
            high(scores.conscientiousness) && low(scores.neuroticism),
        ),
        (
            InterestCategory::Realistic,
            high(scores.neuroticism)
                || (high(scores.conscientiousness) && low(scores.extraversion)),
        ),
    ];

    let mut categories = Vec::with_capacity(rules.len());
    for (category, matched) in rules {
        if matched && !categories.contains(&category) {
            categories.push(category);
        }
    }

    if categories.is_empty() {
        return DEFAULT_CATEGORIES.to_vec();
    }
    categories
}
