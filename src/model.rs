// src/model.rs
// Core data model shared across ingest, scoring, accumulate, peaks and orchestrator

use serde::{Deserialize, Serialize};

/// Closed set of reaction categories. Fixed priority order for tie-breaking,
/// lowest index wins: Fun, Hype, Ban, Sub, Donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fun,
    Hype,
    Ban,
    Sub,
    Donation,
}

impl Category {
    /// All categories, in fixed tie-break priority order.
    pub const ALL: [Category; 5] = [
        Category::Fun,
        Category::Hype,
        Category::Ban,
        Category::Sub,
        Category::Donation,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fun => "fun",
            Self::Hype => "hype",
            Self::Ban => "ban",
            Self::Sub => "sub",
            Self::Donation => "donation",
        };
        f.write_str(s)
    }
}

/// A mapping from category to non-negative real score. All five categories
/// are always present (zero when unused). Additive only — never decremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub fun: f64,
    pub hype: f64,
    pub ban: f64,
    pub sub: f64,
    pub donation: f64,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Fun => self.fun,
            Category::Hype => self.hype,
            Category::Ban => self.ban,
            Category::Sub => self.sub,
            Category::Donation => self.donation,
        }
    }

    pub fn add(&mut self, category: Category, amount: f64) {
        let slot = match category {
            Category::Fun => &mut self.fun,
            Category::Hype => &mut self.hype,
            Category::Ban => &mut self.ban,
            Category::Sub => &mut self.sub,
            Category::Donation => &mut self.donation,
        };
        *slot += amount;
    }

    pub fn merge(&mut self, other: &CategoryScores) {
        self.fun += other.fun;
        self.hype += other.hype;
        self.ban += other.ban;
        self.sub += other.sub;
        self.donation += other.donation;
    }

    /// Argmax under the fixed priority tie-break `[fun, hype, ban, sub, donation]`.
    /// Defaults to `hype` when every category is zero.
    pub fn dominant(&self) -> Category {
        let mut best = Category::Hype;
        let mut best_score = 0.0f64;
        for category in Category::ALL {
            let score = self.get(category);
            if score > best_score {
                best_score = score;
                best = category;
            }
        }
        best
    }
}

/// A text span and an optional recognized emote.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatFragment {
    Text(String),
    Emote { name: String, id: Option<String> },
}

impl ChatFragment {
    /// The text contributed by this fragment to the message's concatenated text.
    pub fn text(&self) -> &str {
        match self {
            ChatFragment::Text(s) => s,
            ChatFragment::Emote { name, .. } => name,
        }
    }
}

/// A single chat message from the replay feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Offset in whole seconds from video start. Monotonically non-decreasing
    /// across pages, but not strictly increasing within a page.
    pub offset_sec: u64,
    /// Commenter display name; may be empty.
    pub author: String,
    pub fragments: Vec<ChatFragment>,
    /// Concatenated text, derived by joining fragment texts.
    pub text: String,
}

impl ChatMessage {
    pub fn new(offset_sec: u64, author: impl Into<String>, fragments: Vec<ChatFragment>) -> Self {
        let text = fragments.iter().map(ChatFragment::text).collect::<String>();
        Self {
            offset_sec,
            author: author.into(),
            fragments,
            text,
        }
    }
}

/// Output of the message scorer: a pure function of one chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MessageScore {
    pub reaction_score: f64,
    pub emote_count: u32,
    pub categories: CategoryScores,
}

/// A fixed-width time bucket accumulating all messages whose offset falls
/// inside it. Identified by `start_sec = floor(offset / window_sec) * window_sec`.
#[derive(Debug, Clone, Default)]
pub struct ChatBucket {
    pub start_sec: u64,
    pub message_count: u32,
    pub reaction_score: f64,
    pub emote_count: u32,
    pub category_scores: CategoryScores,
    pub message_timestamps: Vec<u64>,
    pub sample_messages: Vec<String>,
}

impl ChatBucket {
    pub fn new(start_sec: u64) -> Self {
        Self {
            start_sec,
            ..Default::default()
        }
    }
}

/// A selected, clip-worthy time range surfaced to the viewer.
#[derive(Debug, Clone, Serialize)]
pub struct Moment {
    pub start_sec: u64,
    pub end_sec: u64,
    pub score: f64,
    pub messages_per_sec: f64,
    pub message_count: u32,
    pub tag: Category,
    pub category_scores: CategoryScores,
    pub burst_score: f64,
    pub sample_messages: Vec<String>,
}

/// One point of the plotted message-density timeline.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimelinePoint {
    pub sec: u64,
    pub count: u32,
}

/// The final response shape handed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub video_id: String,
    pub total_messages: u64,
    pub buckets_analyzed: usize,
    pub moments: Vec<Moment>,
    pub timeline: Vec<TimelinePoint>,
}
