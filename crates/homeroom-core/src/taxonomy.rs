//! Fixed trait taxonomy
//!
//! Categories of descriptive keywords a teacher can pick from. Built once per
//! process and never mutated; every keyword stored in a session is a member.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

const PERSONALITY: &[&str] = &[
    "responsibility",
    "sincerity",
    "self-direction",
    "patience",
    "perseverance",
    "courage",
    "humility",
    "self-restraint",
    "candor",
    "honesty",
    "consistency",
    "composure",
    "passion",
    "attentiveness",
    "prudence",
    "flexibility",
    "spirit of challenge",
    "self-control",
    "drive",
    "concentration",
    "positive thinking",
    "optimism",
    "tolerance",
    "boldness",
    "conviction",
    "autonomy",
    "independence",
    "decisiveness",
    "rationality",
    "self-reflection",
];

const CHARACTER: &[&str] = &[
    "consideration",
    "empathy",
    "cooperation",
    "respectful attitude",
    "politeness",
    "gratitude",
    "sharing",
    "friendliness with peers",
    "conflict mediation",
    "harmonious relationships",
    "community spirit",
    "responsible behavior",
    "leadership",
    "spirit of service",
    "positive mindset",
    "emotional stability",
    "respect for others",
    "rule-following",
    "role performance",
    "communication skills",
    "generosity",
    "compassion",
    "inclusiveness",
    "trustworthiness",
    "friendship",
    "loyalty",
    "devotion",
    "harmony",
    "mutual respect",
    "sense of justice",
];

const LEARNING: &[&str] = &[
    "learning focus",
    "inquisitive questioning",
    "thinking skills",
    "creativity",
    "spirit of inquiry",
    "learning persistence",
    "self-monitoring",
    "reflective thinking",
    "achievement motivation",
    "goal setting",
    "problem solving",
    "logical reasoning",
    "tidy habits",
    "presentation skills",
    "resource use",
    "goal orientation",
    "time management",
    "class participation",
    "reading habit",
    "follow-through",
    "intellectual curiosity",
    "critical thinking",
    "application",
    "analytical skills",
    "integrative thinking",
    "information processing",
    "self-efficacy",
    "task commitment",
    "learning strategies",
    "metacognition",
];

const SCHOOL_LIFE: &[&str] = &[
    "good attendance",
    "stable routines",
    "school rule compliance",
    "self-management",
    "sense of order",
    "cleanliness",
    "safety awareness",
    "environmental care",
    "healthy lifestyle",
    "regular daily rhythm",
    "punctuality",
    "managing supplies",
    "thrift",
    "public order awareness",
    "considerate habits",
    "everyday tidiness",
    "regular sleep",
    "balanced diet",
    "regular exercise",
    "hygiene awareness",
];

const EMOTION: &[&str] = &[
    "emotional expression",
    "emotional self-regulation",
    "positive self-image",
    "self-esteem",
    "understanding others' feelings",
    "sharing feelings",
    "emotional vocabulary",
    "emotional sensitivity",
    "capacity to be moved",
    "expressiveness",
    "emotional awareness",
    "emotional acceptance",
    "emotion regulation strategies",
    "stress management",
    "resilience",
    "empathic listening",
    "reading nonverbal cues",
    "artistic sensibility",
    "rich vocabulary",
    "emotional empathy",
];

const SOCIABILITY: &[&str] = &[
    "group activity participation",
    "collaboration skills",
    "discussion and debate manners",
    "getting along with diverse peers",
    "willingness to yield",
    "sharing roles well",
    "joint task execution",
    "accepting differences",
    "listening to others' opinions",
    "valuing teamwork",
    "coordinating opinions",
    "pursuing shared goals",
    "mutual support",
    "constructive feedback",
    "respect for diversity",
    "conflict prevention",
    "efficient division of roles",
    "responsible participation",
    "contribution to community",
    "online collaboration",
];

const OTHER_POSITIVE: &[&str] = &[
    "self-confidence",
    "openness to change",
    "open-mindedness",
    "genuineness",
    "accepting positive feedback",
    "reflective attitude",
    "passion for goals",
    "cultural sensitivity",
    "volunteering",
    "interest in sustainable living",
    "sense of humor",
    "wit",
    "creative ideas",
    "artistic talent",
    "leadership potential",
    "crisis management",
    "effort in problem solving",
    "openness to new experiences",
    "understanding other cultures",
    "global mindset",
];

static TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    Taxonomy::from_categories([
        ("Personality & Attitude", PERSONALITY),
        ("Character & Relationships", CHARACTER),
        ("Learning Attitude & Competence", LEARNING),
        ("School Life & Habits", SCHOOL_LIFE),
        ("Emotion & Expression", EMOTION),
        ("Sociability & Collaboration", SOCIABILITY),
        ("Other Positive Traits", OTHER_POSITIVE),
    ])
});

/// Ordered mapping from category name to its keywords
#[derive(Debug)]
pub struct Taxonomy {
    categories: IndexMap<&'static str, &'static [&'static str]>,
    /// keyword -> owning category (first category wins)
    index: HashMap<&'static str, &'static str>,
}

impl Taxonomy {
    /// The process-wide taxonomy
    #[inline]
    #[must_use]
    pub fn global() -> &'static Taxonomy {
        &TAXONOMY
    }

    fn from_categories<const N: usize>(
        categories: [(&'static str, &'static [&'static str]); N],
    ) -> Self {
        let categories: IndexMap<_, _> = categories.into_iter().collect();
        let mut index = HashMap::new();
        for (&category, keywords) in &categories {
            for &keyword in keywords.iter() {
                index.entry(keyword).or_insert(category);
            }
        }
        Self { categories, index }
    }

    /// Categories with their keywords, in display order
    pub fn categories(&self) -> impl Iterator<Item = (&'static str, &'static [&'static str])> + '_ {
        self.categories.iter().map(|(name, keywords)| (*name, *keywords))
    }

    /// Keywords of one category
    #[must_use]
    pub fn keywords(&self, category: &str) -> Option<&'static [&'static str]> {
        self.categories.get(category).copied()
    }

    /// Check if keyword belongs to any category
    #[inline]
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    /// Category a keyword is listed under
    #[must_use]
    pub fn category_of(&self, keyword: &str) -> Option<&'static str> {
        self.index.get(keyword).copied()
    }

    /// Number of distinct keywords across all categories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always false for the built-in taxonomy
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Split input into known keywords (deduplicated, sorted) and rejects
    pub fn partition<I, S>(&self, keywords: I) -> (BTreeSet<String>, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = BTreeSet::new();
        let mut rejected = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if self.contains(keyword) {
                known.insert(keyword.to_string());
            } else {
                rejected.push(keyword.to_string());
            }
        }
        (known, rejected)
    }
}
