// src/scoring/scorer.rs
// Pure per-message scoring: no I/O, no shared mutable state.

use crate::model::{Category, ChatFragment, ChatMessage, MessageScore};

use super::categories::{BAN_PHRASE, GIFTING_PHRASE, emotes_for, patterns_for};

const BAN_BONUS: f64 = 15.0;
const GIFTING_THRESHOLD: u64 = 15;
const GIFTING_RATIO: f64 = 0.6;
const GIFTING_CAP: f64 = 20.0;
const EMOTE_BONUS: f64 = 2.0;
const KEYWORD_BONUS: f64 = 1.0;
const ALL_CAPS_BONUS: f64 = 0.5;
const ALL_CAPS_MIN_LEN: usize = 5;

/// Scores a single chat message. Deterministic and idempotent: calling this
/// twice on the same message yields identical output.
pub fn score_message(msg: &ChatMessage) -> MessageScore {
    let mut score = MessageScore::default();

    let gifting_registered = apply_privileged_events(msg, &mut score);
    apply_emote_scoring(msg, &mut score);
    apply_keyword_scoring(msg, &mut score, gifting_registered);
    apply_all_caps_bonus(msg, &mut score);

    score
}

/// Step 1: privileged high-value events. Returns whether a full-credit
/// gifting event was registered (gates the sub keyword scan in step 3).
fn apply_privileged_events(msg: &ChatMessage, score: &mut MessageScore) -> bool {
    if BAN_PHRASE.is_match(&msg.text) {
        score.reaction_score += BAN_BONUS;
        score.categories.add(Category::Ban, BAN_BONUS);
    }

    if let Some(caps) = GIFTING_PHRASE.captures(&msg.text) {
        let count: u64 = caps[1].parse().unwrap_or(0);
        if count >= GIFTING_THRESHOLD {
            let bonus = ((count as f64) * GIFTING_RATIO).round().min(GIFTING_CAP);
            score.reaction_score += bonus;
            score.categories.add(Category::Sub, bonus);
            return true;
        }
    }
    false
}

/// Step 2: emote scoring, first-match-wins per fragment.
fn apply_emote_scoring(msg: &ChatMessage, score: &mut MessageScore) {
    for fragment in &msg.fragments {
        let ChatFragment::Emote { name, .. } = fragment else {
            continue;
        };
        for category in Category::ALL {
            if emotes_for(category).contains(name.as_str()) {
                score.reaction_score += EMOTE_BONUS;
                score.emote_count += 1;
                score.categories.add(category, EMOTE_BONUS);
                break;
            }
        }
    }
}

/// Step 3: keyword scoring, at most one match counted per category.
/// The sub category is skipped unless step 1 registered a full-credit
/// gifting event.
fn apply_keyword_scoring(msg: &ChatMessage, score: &mut MessageScore, gifting_registered: bool) {
    for category in Category::ALL {
        if category == Category::Sub && !gifting_registered {
            continue;
        }
        let matched = patterns_for(category).iter().any(|p| p.is_match(&msg.text));
        if matched {
            score.reaction_score += KEYWORD_BONUS;
            score.categories.add(category, KEYWORD_BONUS);
        }
    }
}

/// Step 4: reward sustained ALL-CAPS shouting as mild hype.
fn apply_all_caps_bonus(msg: &ChatMessage, score: &mut MessageScore) {
    let text = &msg.text;
    if text.len() >= ALL_CAPS_MIN_LEN && text.chars().any(|c| c.is_ascii_alphabetic()) && text == &text.to_uppercase() {
        score.reaction_score += ALL_CAPS_BONUS;
        score.categories.add(Category::Hype, ALL_CAPS_BONUS);
    }
}
