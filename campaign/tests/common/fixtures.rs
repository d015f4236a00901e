//! Test fixtures: configs, candidates and recording collaborators

use std::sync::{Arc, Mutex};

use campaign::traits::{MockCompletionClient, Notifier};
use shared::{
    CampaignConfig, CampaignStatus, CandidateItem, CandidateSignals, Recency, Source, Targets,
};

/// Single-source config with all pacing zeroed so tests run on jitter-free
/// delays; quota is the only stop condition unless a test stops the run.
pub fn fast_config(quota: u32) -> CampaignConfig {
    CampaignConfig {
        sources: vec![Source::new("list_1", "https://example.com/list/1")],
        targets: Targets {
            replies_per_day: quota,
            rest_secs: 0,
            session_break_every: 50,
            session_break_secs: 0,
            cycle_break_secs: 0,
            follows_per_day: 0,
        },
        ..CampaignConfig::default()
    }
}

pub fn candidate(id: &str, author: &str, text: &str) -> CandidateItem {
    CandidateItem::new(id, author, text, "list_1")
}

/// Signals that score well above the default hunting threshold
pub fn hot_signals() -> CandidateSignals {
    CandidateSignals {
        has_engagement_counts: true,
        verified_author: true,
        has_media: true,
        recency: Recency::Minutes,
    }
}

/// Signals that score far below the default hunting threshold
pub fn cold_signals() -> CandidateSignals {
    CandidateSignals {
        has_engagement_counts: false,
        verified_author: false,
        has_media: false,
        recency: Recency::Older,
    }
}

/// Completion client that always answers with a fixed reply
pub fn ok_client() -> MockCompletionClient {
    let mut client = MockCompletionClient::new();
    client
        .expect_complete()
        .returning(|_, _, _, _| Ok("A perfectly serviceable counterpoint".to_string()));
    client
}

/// Completion client that always fails
pub fn failing_client() -> MockCompletionClient {
    let mut client = MockCompletionClient::new();
    client
        .expect_complete()
        .returning(|_, _, _, _| Err(shared::CompletionFailure::ServiceUnavailable));
    client
}

/// Notifier that records everything it is handed
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub lines: Arc<Mutex<Vec<String>>>,
    pub statuses: Arc<Mutex<Vec<CampaignStatus>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines lock").clone()
    }

    pub fn statuses(&self) -> Vec<CampaignStatus> {
        self.statuses.lock().expect("statuses lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn log_line(&self, message: &str) {
        self.lines.lock().expect("lines lock").push(message.to_string());
    }

    fn status(&self, status: CampaignStatus) {
        self.statuses.lock().expect("statuses lock").push(status);
    }
}
