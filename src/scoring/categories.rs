// src/scoring/categories.rs
// Compile-time-frozen keyword pattern tables and emote-name sets, one per category.
//
// Patterns and emote lists are illustrative, not exhaustive (spec §4.3):
// real deployments would tune these against observed chat corpora.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::model::Category;

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid category pattern {pattern:?}: {e}"))
}

/// Exact substring match for a ban event, case-insensitive.
pub static BAN_PHRASE: LazyLock<Regex> = LazyLock::new(|| ci("has been banned"));

/// Captures the gifted-sub count from `"is gifting N"`.
pub static GIFTING_PHRASE: LazyLock<Regex> = LazyLock::new(|| ci(r"is gifting (\d+)"));

pub static FUN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        ci(r"\bmdr\b"),
        ci(r"\bptdr\b"),
        ci(r"\blmao\b"),
        ci(r"\brofl\b"),
        ci(r"haha(ha)+"),
        ci(r"xdd+"),
    ]
});

pub static HYPE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        ci(r"pog(gers)?"),
        ci(r"let'?s go+"),
        ci(r"\binsane\b"),
        ci(r"\bomg\b"),
        ci(r"\bwtf\b"),
        ci(r"holy shit"),
    ]
});

pub static BAN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| vec![ci("has been banned")]);

pub static SUB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| vec![ci("is gifting")]);

pub static DONATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        ci(r"cheer\d+"),
        ci(r"\bbits\b"),
        ci(r"\bdon(o|at(e|ion|ed))\b"),
        ci(r"\$\d+(\.\d+)?"),
        ci(r"\d+\s?(usd|eur|dollars)\b"),
    ]
});

/// The ordered keyword pattern list for a category.
pub fn patterns_for(category: Category) -> &'static [Regex] {
    match category {
        Category::Fun => &FUN_PATTERNS,
        Category::Hype => &HYPE_PATTERNS,
        Category::Ban => &BAN_PATTERNS,
        Category::Sub => &SUB_PATTERNS,
        Category::Donation => &DONATION_PATTERNS,
    }
}

pub static FUN_EMOTES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["LUL", "OMEGALUL", "ResidentSleeper", "KEKW"]));

pub static HYPE_EMOTES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["PogChamp", "Pog", "PogU", "EZ", "Hype"]));

pub static BAN_EMOTES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["BibleThump", "Madge"]));

pub static SUB_EMOTES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["PartyHat", "SubTrain"]));

pub static DONATION_EMOTES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["cheer1", "cheer100", "cheer1000"]));

/// The emote-name set for a category, in fixed scan-priority order.
pub fn emotes_for(category: Category) -> &'static HashSet<&'static str> {
    match category {
        Category::Fun => &FUN_EMOTES,
        Category::Hype => &HYPE_EMOTES,
        Category::Ban => &BAN_EMOTES,
        Category::Sub => &SUB_EMOTES,
        Category::Donation => &DONATION_EMOTES,
    }
}
