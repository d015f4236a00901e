//! Core types used throughout the campaign engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character limit enforced on every outgoing reply.
pub const REPLY_CHAR_LIMIT: usize = 280;

/// How much of the original text is kept on a stored record.
pub const STORED_TEXT_LIMIT: usize = 200;

/// Reply persona used for generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStyle {
    /// Controlled controversy, challenge the main point
    Provocative,
    /// Contrarian but defensible opinion
    HotTake,
    /// Witty, playful criticism
    WittyRoast,
    /// Counterpoint to the premise
    DevilsAdvocate,
    /// Thought-provoking question
    ProbingQuestion,
}

impl fmt::Display for EngagementStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngagementStyle::Provocative => write!(f, "provocative"),
            EngagementStyle::HotTake => write!(f, "hot_take"),
            EngagementStyle::WittyRoast => write!(f, "witty_roast"),
            EngagementStyle::DevilsAdvocate => write!(f, "devils_advocate"),
            EngagementStyle::ProbingQuestion => write!(f, "probing_question"),
        }
    }
}

impl std::str::FromStr for EngagementStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "provocative" | "rage_bait" => Ok(EngagementStyle::Provocative),
            "hot_take" => Ok(EngagementStyle::HotTake),
            "witty_roast" | "playful_criticism" => Ok(EngagementStyle::WittyRoast),
            "devils_advocate" | "devil_advocate" => Ok(EngagementStyle::DevilsAdvocate),
            "probing_question" | "strategic_question" => Ok(EngagementStyle::ProbingQuestion),
            _ => Err(format!("Unknown engagement style: {s}")),
        }
    }
}

impl Default for EngagementStyle {
    fn default() -> Self {
        EngagementStyle::Provocative
    }
}

/// What the generator does when the remote completion call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Fill a style template on remote failure
    Templates,
    /// Like `Templates`, but the default-language branch may also pick the
    /// template path up-front with probability 0.5
    Blend,
    /// Report generation failure so the candidate is skipped
    Disabled,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::Templates
    }
}

/// Campaign traversal mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignMode {
    /// Reply to candidates in discovery order until the quota is met
    ListSweep,
    /// Score the candidate pool and only act on the best of it
    ViralHunting {
        #[serde(default = "default_min_score")]
        min_score: u8,
        #[serde(default = "default_top_k")]
        top_k: usize,
    },
}

fn default_min_score() -> u8 {
    70
}

fn default_top_k() -> usize {
    5
}

impl Default for CampaignMode {
    fn default() -> Self {
        CampaignMode::ListSweep
    }
}

/// A content source scanned for candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Short label carried onto records (e.g. "list_1")
    pub tag: String,
    pub url: String,
}

impl Source {
    pub fn new(tag: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            url: url.into(),
        }
    }
}

/// Daily quotas and pacing knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    /// Daily cap on successful commits
    #[serde(default = "default_replies_per_day")]
    pub replies_per_day: u32,

    /// Rest between successful actions, in seconds
    #[serde(default = "default_rest_secs")]
    pub rest_secs: u64,

    /// Longer cooldown after this many successful actions in one session
    #[serde(default = "default_session_break_every")]
    pub session_break_every: u32,

    #[serde(default = "default_session_break_secs")]
    pub session_break_secs: u64,

    /// Pause between full round-robin passes when the quota is not yet met
    #[serde(default = "default_cycle_break_secs")]
    pub cycle_break_secs: u64,

    /// Daily cap on verified-author follows in hunting mode (0 disables)
    #[serde(default)]
    pub follows_per_day: u32,
}

fn default_replies_per_day() -> u32 {
    1000
}

fn default_rest_secs() -> u64 {
    3
}

fn default_session_break_every() -> u32 {
    50
}

fn default_session_break_secs() -> u64 {
    30
}

fn default_cycle_break_secs() -> u64 {
    60
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            replies_per_day: default_replies_per_day(),
            rest_secs: default_rest_secs(),
            session_break_every: default_session_break_every(),
            session_break_secs: default_session_break_secs(),
            cycle_break_secs: default_cycle_break_secs(),
            follows_per_day: 0,
        }
    }
}

/// Immutable per-run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default = "default_sources")]
    pub sources: Vec<Source>,

    #[serde(default)]
    pub targets: Targets,

    #[serde(default)]
    pub style: EngagementStyle,

    #[serde(default)]
    pub mode: CampaignMode,

    #[serde(default)]
    pub fallback_policy: FallbackPolicy,

    /// How long to wait for an authenticated surface session before aborting
    #[serde(default = "default_auth_timeout_secs")]
    pub auth_timeout_secs: u64,
}

fn default_auth_timeout_secs() -> u64 {
    120
}

fn default_sources() -> Vec<Source> {
    vec![
        Source::new("list_1", "https://x.com/i/lists/1995877357249270077"),
        Source::new("list_2", "https://x.com/i/lists/1904483699346784446"),
        Source::new("list_3", "https://x.com/i/lists/1911725019513684062"),
    ]
}

/// Bound used for unattended runs where nobody is watching the login flow.
pub const UNATTENDED_AUTH_TIMEOUT_SECS: u64 = 300;

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            targets: Targets::default(),
            style: EngagementStyle::default(),
            mode: CampaignMode::default(),
            fallback_policy: FallbackPolicy::default(),
            auth_timeout_secs: default_auth_timeout_secs(),
        }
    }
}

/// Coarse age bucket of a discovered item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recency {
    Minutes,
    Hours,
    Older,
    Unknown,
}

impl Default for Recency {
    fn default() -> Self {
        Recency::Unknown
    }
}

/// Observable signals used only by the scorer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignals {
    /// Visible numeric engagement counters
    pub has_engagement_counts: bool,
    pub verified_author: bool,
    pub has_media: bool,
    #[serde(default)]
    pub recency: Recency,
}

/// A discovered unit of content, alive for one discovery pass only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Opaque stable identity
    pub id: String,
    pub author: String,
    pub text: String,
    pub source_tag: String,
    pub signals: Option<CandidateSignals>,
}

impl CandidateItem {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        text: impl Into<String>,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            text: text.into(),
            source_tag: source_tag.into(),
            signals: None,
        }
    }

    pub fn with_signals(mut self, signals: CandidateSignals) -> Self {
        self.signals = Some(signals);
        self
    }
}

/// Durable proof that an action was taken on a candidate.
///
/// At most one record may ever exist per id; created once, after the action
/// surface confirms submission, and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementRecord {
    pub id: String,
    pub source_tag: String,
    pub author: String,
    /// Original text, truncated for storage
    pub original_text: String,
    pub reply_text: String,
    pub timestamp: DateTime<Utc>,
    /// UTC calendar day, used for quota accounting
    pub date_key: String,
}

impl EngagementRecord {
    /// Build a record stamped with the current UTC time.
    pub fn new(item: &CandidateItem, reply_text: impl Into<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: item.id.clone(),
            source_tag: item.source_tag.clone(),
            author: item.author.clone(),
            original_text: truncate_chars(&item.text, STORED_TEXT_LIMIT),
            reply_text: reply_text.into(),
            timestamp,
            date_key: date_key(timestamp),
        }
    }
}

/// UTC calendar day for a timestamp, formatted `YYYY-MM-DD`.
pub fn date_key(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Today's UTC date key.
pub fn today_key() -> String {
    date_key(Utc::now())
}

/// Truncate to at most `limit` characters without splitting a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Derived counters, recomputed on demand from the stored records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub replies_today: u64,
    pub distinct_authors_today: u64,
    pub total_all_time: u64,
}

/// Coarse status reported on the notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Running,
    Stopped,
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CampaignStatus::Running => write!(f, "running"),
            CampaignStatus::Stopped => write!(f, "stopped"),
        }
    }
}

/// Orchestrator run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Init,
    AuthWait,
    Cycling,
    PausedBetweenLists,
    PausedBetweenCycles,
    PausedSessionBreak,
    Done,
    Aborted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Init => write!(f, "init"),
            RunPhase::AuthWait => write!(f, "auth_wait"),
            RunPhase::Cycling => write!(f, "cycling"),
            RunPhase::PausedBetweenLists => write!(f, "paused_between_lists"),
            RunPhase::PausedBetweenCycles => write!(f, "paused_between_cycles"),
            RunPhase::PausedSessionBreak => write!(f, "paused_session_break"),
            RunPhase::Done => write!(f, "done"),
            RunPhase::Aborted => write!(f, "aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_style_round_trip() {
        for style in [
            EngagementStyle::Provocative,
            EngagementStyle::HotTake,
            EngagementStyle::WittyRoast,
            EngagementStyle::DevilsAdvocate,
            EngagementStyle::ProbingQuestion,
        ] {
            let parsed: EngagementStyle = style.to_string().parse().unwrap();
            assert_eq!(parsed, style);
        }
    }

    #[test]
    fn test_legacy_style_names_parse() {
        assert_eq!(
            "rage_bait".parse::<EngagementStyle>().unwrap(),
            EngagementStyle::Provocative
        );
        assert_eq!(
            "playful_criticism".parse::<EngagementStyle>().unwrap(),
            EngagementStyle::WittyRoast
        );
        assert!("sarcastic".parse::<EngagementStyle>().is_err());
    }

    #[test]
    fn test_date_key_format() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(date_key(ts), "2024-03-07");
    }

    #[test]
    fn test_record_truncates_original_text() {
        let long_text = "x".repeat(500);
        let item = CandidateItem::new("1", "someone", long_text, "list_1");
        let record = EngagementRecord::new(&item, "reply");
        assert_eq!(record.original_text.chars().count(), STORED_TEXT_LIMIT);
        assert_eq!(record.date_key, today_key());
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 280), "short");
    }

    #[test]
    fn test_config_defaults() {
        let config: CampaignConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.targets.replies_per_day, 1000);
        assert_eq!(config.targets.rest_secs, 3);
        assert_eq!(config.targets.session_break_every, 50);
        assert_eq!(config.targets.cycle_break_secs, 60);
        assert_eq!(config.fallback_policy, FallbackPolicy::Templates);
        assert_eq!(config.mode, CampaignMode::ListSweep);
    }

    #[test]
    fn test_hunting_mode_defaults() {
        let mode: CampaignMode = serde_json::from_str(r#"{"viral_hunting":{}}"#).unwrap();
        assert_eq!(
            mode,
            CampaignMode::ViralHunting {
                min_score: 70,
                top_k: 5
            }
        );
    }
}
