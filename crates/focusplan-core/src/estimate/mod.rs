//! Duration estimation from a task title.
//!
//! Resolution order:
//! 1. An explicit time expression ("25 min", "1.5h", "2 Stunden") is taken
//!    literally, with 20% headroom on the upper bound.
//! 2. A keyword from [`KEYWORD_RULES`], optionally tightened or stretched by a
//!    qualifier from [`QUALIFIER_RULES`].
//! 3. The fallback `{30, 60, 0.5}`.

mod confidence;

pub use confidence::{confidence_badge, requires_question, ConfidenceBadge, QUESTION_THRESHOLD};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::task::{EnergyType, EstimationSource, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

static TIME_EXPRESSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d+(?:[.,]\d+)?)\s*(minuten|minutes|minute|mins|min|m|stunden|stunde|std|hours|hour|hrs|hr|h)\b",
    )
    .expect("valid time expression regex")
});

/// Keyword heuristic: a title word equal to `keyword`, or `keyword` plus one
/// of [`KEYWORD_SUFFIXES`], implies these bounds.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keyword: &'static str,
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub confidence: f64,
    pub energy_type: EnergyType,
}

/// Qualifier that narrows or stretches a keyword match.
#[derive(Debug, Clone, Copy)]
pub struct QualifierRule {
    pub word: &'static str,
    pub min_minutes: u32,
    pub max_minutes: u32,
}

const fn rule(
    keyword: &'static str,
    min_minutes: u32,
    max_minutes: u32,
    confidence: f64,
    energy_type: EnergyType,
) -> KeywordRule {
    KeywordRule {
        keyword,
        min_minutes,
        max_minutes,
        confidence,
        energy_type,
    }
}

/// Keyword table, matched in order; the first hit wins.
pub static KEYWORD_RULES: &[KeywordRule] = &[
    rule("meeting", 30, 60, 0.8, EnergyType::Admin),
    rule("besprechung", 30, 60, 0.8, EnergyType::Admin),
    rule("call", 15, 30, 0.8, EnergyType::Admin),
    rule("anruf", 15, 30, 0.8, EnergyType::Admin),
    rule("email", 5, 15, 0.8, EnergyType::Admin),
    rule("mail", 5, 15, 0.75, EnergyType::Admin),
    rule("invoice", 10, 20, 0.75, EnergyType::Admin),
    rule("rechnung", 10, 20, 0.75, EnergyType::Admin),
    rule("plan", 15, 30, 0.7, EnergyType::Admin),
    rule("review", 30, 60, 0.7, EnergyType::DeepWork),
    rule("bug", 30, 120, 0.4, EnergyType::DeepWork),
    rule("fix", 30, 90, 0.5, EnergyType::DeepWork),
    rule("refactor", 60, 120, 0.6, EnergyType::DeepWork),
    rule("research", 60, 120, 0.45, EnergyType::DeepWork),
    rule("report", 60, 120, 0.55, EnergyType::DeepWork),
    rule("write", 45, 90, 0.6, EnergyType::Creative),
    rule("draft", 30, 60, 0.6, EnergyType::Creative),
    rule("design", 60, 120, 0.55, EnergyType::Creative),
    rule("brainstorm", 20, 45, 0.6, EnergyType::Creative),
];

/// Qualifier table, matched in order; the first hit wins.
pub static QUALIFIER_RULES: &[QualifierRule] = &[
    QualifierRule { word: "quick", min_minutes: 5, max_minutes: 15 },
    QualifierRule { word: "short", min_minutes: 5, max_minutes: 15 },
    QualifierRule { word: "kurz", min_minutes: 5, max_minutes: 15 },
    QualifierRule { word: "schnell", min_minutes: 5, max_minutes: 15 },
    QualifierRule { word: "thorough", min_minutes: 45, max_minutes: 180 },
    QualifierRule { word: "detailed", min_minutes: 45, max_minutes: 180 },
    QualifierRule { word: "gründlich", min_minutes: 45, max_minutes: 180 },
    QualifierRule { word: "ausführlich", min_minutes: 45, max_minutes: 180 },
];

/// Endings accepted after a keyword ("emails", "fixed", "besprechungen").
pub const KEYWORD_SUFFIXES: &[&str] = &["", "s", "es", "ed", "ing", "en"];
/// Endings accepted after a qualifier ("quickly", "kurze").
pub const QUALIFIER_SUFFIXES: &[&str] = &["", "ly", "er", "e", "en"];

/// Fallback bounds when nothing in the title is recognised.
pub const FALLBACK_ESTIMATE: DurationEstimate = DurationEstimate {
    min_minutes: 30,
    max_minutes: 60,
    confidence: 0.5,
    source: EstimationSource::Default,
    energy_type: None,
};

/// Estimated duration bounds for a title.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DurationEstimate {
    pub min_minutes: u32,
    pub max_minutes: u32,
    /// 0.0-1.0
    pub confidence: f64,
    pub source: EstimationSource,
    /// Energy hint from a keyword match, if any
    pub energy_type: Option<EnergyType>,
}

impl DurationEstimate {
    pub fn badge(&self) -> ConfidenceBadge {
        confidence_badge(self.confidence)
    }

    pub fn requires_question(&self) -> bool {
        requires_question(self.confidence)
    }
}

/// Estimate duration bounds from a task title. Never fails.
pub fn estimate_duration(title: &str) -> DurationEstimate {
    let words = tokenize(title);
    let keyword = match_keyword(&words);

    if let Some(minutes) = parse_time_expression(title) {
        let max = minutes.saturating_mul(12).div_ceil(10);
        // Both bounds must stay inside the task duration range of 5-480.
        return DurationEstimate {
            min_minutes: clamp_minutes(minutes),
            max_minutes: clamp_minutes(max),
            confidence: 1.0,
            source: EstimationSource::Parsed,
            energy_type: keyword.map(|k| k.energy_type),
        };
    }

    let Some(keyword) = keyword else {
        return FALLBACK_ESTIMATE;
    };

    let (min_minutes, max_minutes) = match match_qualifier(&words) {
        Some(q) => combine_bounds(keyword, q),
        None => (keyword.min_minutes, keyword.max_minutes),
    };

    DurationEstimate {
        min_minutes,
        max_minutes,
        confidence: keyword.confidence,
        source: EstimationSource::Default,
        energy_type: Some(keyword.energy_type),
    }
}

/// Minutes named by the first explicit time expression in `title`.
pub fn parse_time_expression(title: &str) -> Option<u32> {
    let caps = TIME_EXPRESSION_RE.captures(title)?;
    let amount: f64 = caps[1].replace(',', ".").parse().ok()?;
    let unit = caps[2].to_lowercase();
    let factor = match unit.as_str() {
        "h" | "hr" | "hrs" | "hour" | "hours" | "std" | "stunde" | "stunden" => 60.0,
        _ => 1.0,
    };
    let minutes = (amount * factor).round();
    if minutes <= 0.0 {
        return None;
    }
    Some(minutes.min(u32::MAX as f64) as u32)
}

fn tokenize(title: &str) -> Vec<String> {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn match_keyword(words: &[String]) -> Option<&'static KeywordRule> {
    KEYWORD_RULES
        .iter()
        .find(|rule| words.iter().any(|w| is_inflection(w, rule.keyword, KEYWORD_SUFFIXES)))
}

fn match_qualifier(words: &[String]) -> Option<&'static QualifierRule> {
    QUALIFIER_RULES
        .iter()
        .find(|rule| words.iter().any(|w| is_inflection(w, rule.word, QUALIFIER_SUFFIXES)))
}

/// `word` is `stem` followed by one of `suffixes`. A trailing "e" on the stem
/// may be dropped before a suffix ("write" matches "writing").
fn is_inflection(word: &str, stem: &str, suffixes: &[&str]) -> bool {
    let ends_in = |rest: &str| suffixes.contains(&rest);
    if word.strip_prefix(stem).is_some_and(ends_in) {
        return true;
    }
    stem.strip_suffix('e')
        .and_then(|short| word.strip_prefix(short))
        .is_some_and(|rest| !rest.is_empty() && ends_in(rest))
}

/// Tighter bound wins on each side; disjoint ranges defer to the qualifier.
fn combine_bounds(keyword: &KeywordRule, qualifier: &QualifierRule) -> (u32, u32) {
    let lo = keyword.min_minutes.max(qualifier.min_minutes);
    let hi = keyword.max_minutes.min(qualifier.max_minutes);
    if lo > hi {
        (qualifier.min_minutes, qualifier.max_minutes)
    } else {
        (lo, hi)
    }
}

fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes() {
        let est = estimate_duration("Stretch 25 min");
        assert_eq!(est.min_minutes, 25);
        assert_eq!(est.max_minutes, 30);
        assert_eq!(est.confidence, 1.0);
        assert_eq!(est.source, EstimationSource::Parsed);
    }

    #[test]
    fn parses_fractional_hours() {
        let est = estimate_duration("Deep dive 1.5h");
        assert_eq!(est.min_minutes, 90);
        assert_eq!(est.max_minutes, 108);

        let est = estimate_duration("Steuer 2 Stunden");
        assert_eq!(est.min_minutes, 120);
        assert_eq!(est.max_minutes, 144);
    }

    #[test]
    fn parsed_bounds_never_drop_below_five() {
        let est = estimate_duration("Water plants 2 minutes");
        assert_eq!(est.min_minutes, 5);
        assert_eq!(est.max_minutes, 5);
    }

    /// Capped to the task duration range rather than the raw `max(5, ..)`.
    #[test]
    fn parsed_bounds_capped_at_day_length() {
        let est = estimate_duration("Offsite 10 hours");
        assert_eq!(est.min_minutes, MAX_DURATION_MINUTES);
        assert_eq!(est.max_minutes, MAX_DURATION_MINUTES);
    }

    #[test]
    fn parsed_expression_keeps_keyword_energy() {
        let est = estimate_duration("meeting 45 minutes");
        assert_eq!(est.min_minutes, 45);
        assert_eq!(est.max_minutes, 54);
        assert_eq!(est.energy_type, Some(EnergyType::Admin));
    }

    #[test]
    fn digits_inside_words_are_not_durations() {
        assert_eq!(parse_time_expression("Review PR 1234"), None);
        assert_eq!(parse_time_expression("v2 migration"), None);
    }

    #[test]
    fn keyword_lookup() {
        let est = estimate_duration("Team meeting about Q3");
        assert_eq!((est.min_minutes, est.max_minutes), (30, 60));
        assert_eq!(est.confidence, 0.8);
        assert_eq!(est.energy_type, Some(EnergyType::Admin));
        assert_eq!(est.source, EstimationSource::Default);
    }

    #[test]
    fn keyword_matches_inflections_case_insensitively() {
        let est = estimate_duration("Answer EMAILS");
        assert_eq!((est.min_minutes, est.max_minutes), (5, 15));
        assert_eq!(estimate_duration("Two meetings").min_minutes, 30);
        assert_eq!(estimate_duration("Writing session").energy_type, Some(EnergyType::Creative));
        assert_eq!(estimate_duration("Besprechungen vorbereiten").confidence, 0.8);
    }

    #[test]
    fn keywords_inside_longer_words_do_not_match() {
        for title in [
            "Water plants",
            "Visit the planetarium",
            "Callback from plumber",
            "Buy fixtures",
            "Afternoon planner",
        ] {
            let est = estimate_duration(title);
            assert_ne!(est.energy_type, Some(EnergyType::Admin), "{title}");
            assert_ne!(est.energy_type, Some(EnergyType::DeepWork), "{title}");
        }
        assert_eq!(estimate_duration("Buy fixtures"), FALLBACK_ESTIMATE);
        assert_eq!(estimate_duration("Water plants"), FALLBACK_ESTIMATE);
    }

    #[test]
    fn qualifier_inflections() {
        let est = estimate_duration("call quickly");
        assert_eq!((est.min_minutes, est.max_minutes), (15, 15));
        assert!(is_inflection("kurze", "kurz", QUALIFIER_SUFFIXES));
        assert!(!is_inflection("shortbread", "short", QUALIFIER_SUFFIXES));
    }

    #[test]
    fn table_order_breaks_keyword_ties() {
        // "bug" precedes "fix" in the table
        let est = estimate_duration("fix login bug");
        assert_eq!((est.min_minutes, est.max_minutes), (30, 120));
        assert_eq!(est.confidence, 0.4);
    }

    #[test]
    fn qualifier_narrows_keyword() {
        let est = estimate_duration("quick call with Anna");
        assert_eq!((est.min_minutes, est.max_minutes), (15, 15));
    }

    #[test]
    fn qualifier_stretches_keyword() {
        let est = estimate_duration("thorough review of contract");
        assert_eq!((est.min_minutes, est.max_minutes), (45, 60));
    }

    #[test]
    fn disjoint_qualifier_wins() {
        let est = estimate_duration("quick research on tents");
        assert_eq!((est.min_minutes, est.max_minutes), (5, 15));
    }

    #[test]
    fn qualifier_alone_is_ignored() {
        assert_eq!(estimate_duration("something quick"), FALLBACK_ESTIMATE);
    }

    #[test]
    fn fallback_for_unknown_titles() {
        let est = estimate_duration("Buy flowers");
        assert_eq!(est, FALLBACK_ESTIMATE);
        assert!(!est.requires_question());
        assert_eq!(est.badge(), ConfidenceBadge::Medium);
    }

    #[test]
    fn low_confidence_keyword_requires_question() {
        assert!(estimate_duration("Research standing desks").requires_question());
        assert!(!estimate_duration("Call the bank").requires_question());
    }

    #[test]
    fn every_table_entry_is_a_valid_range() {
        for rule in KEYWORD_RULES {
            assert!(rule.min_minutes >= MIN_DURATION_MINUTES, "{}", rule.keyword);
            assert!(rule.min_minutes <= rule.max_minutes, "{}", rule.keyword);
            assert!((0.0..=1.0).contains(&rule.confidence), "{}", rule.keyword);
        }
        for rule in QUALIFIER_RULES {
            assert!(rule.min_minutes <= rule.max_minutes, "{}", rule.word);
        }
    }
}
