//! Title classification for vehicle procurement notices.
//!
//! Matching is plain substring containment on the lowercased title. There
//! is no tokenization, so "van" also rejects "advance" and "caravan".

/// Strict tier: a title needs one of these...
pub const REQUIRED_KEYWORDS: &[&str] = &["left-hand drive"];

/// ...together with one of these.
pub const STRICT_INCLUDE_KEYWORDS: &[&str] = &["sedan", "suv", "pickup", "mid-size truck"];

/// Broad tier: any one of these is enough.
pub const BROAD_INCLUDE_KEYWORDS: &[&str] = &[
    "passenger vehicle",
    "sedan",
    "suv",
    "pickup truck",
    "mid-size truck",
    "left-hand drive",
];

/// Any of these rejects the title outright.
pub const EXCLUDE_KEYWORDS: &[&str] = &[
    "passenger van", "van", "minivan", "shuttle", "bus", "forklift", "pallet jack", "trailer",
    "atv", "utv", "heavy equipment", "excavator", "backhoe", "tractor", "sweeper", "loader",
    "golf", "ambulance", "fire", "ladder", "armored vehicle", "boat", "motorcycle", "dump",
    "crane", "tank", "right-hand drive",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excluded(&'static str),
    Strict,
    Broad,
    NoMatch,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        matches!(self, Verdict::Strict | Verdict::Broad)
    }
}

fn first_hit(title: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|kw| title.contains(kw))
}

fn contains_any(title: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| title.contains(kw))
}

pub fn evaluate(title: &str) -> Verdict {
    let title = title.to_lowercase();

    if let Some(keyword) = first_hit(&title, EXCLUDE_KEYWORDS) {
        return Verdict::Excluded(keyword);
    }

    if contains_any(&title, REQUIRED_KEYWORDS) && contains_any(&title, STRICT_INCLUDE_KEYWORDS) {
        return Verdict::Strict;
    }

    if contains_any(&title, BROAD_INCLUDE_KEYWORDS) {
        return Verdict::Broad;
    }

    Verdict::NoMatch
}

pub fn classify(title: &str) -> bool {
    evaluate(title).is_match()
}
