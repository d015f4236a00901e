//! Best-effort notification channel to an external observer
//!
//! Events are queued onto an unbounded channel and shipped by a background
//! task in small batches. The campaign loop never waits on the channel and
//! never sees a delivery failure.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::traits::Notifier;
use shared::CampaignStatus;

const BATCH_SIZE: usize = 5;
const FLUSH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Log,
    Status,
}

/// One observer-facing event
#[derive(Serialize, Debug, Clone)]
pub struct CampaignEvent {
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub kind: EventKind,
    pub message: String,
}

/// Ships events to a dashboard endpoint over HTTP
pub struct HttpNotifier {
    session_id: Uuid,
    sender: mpsc::UnboundedSender<CampaignEvent>,
}

impl HttpNotifier {
    pub fn new(endpoint_url: impl Into<String>, session_id: Uuid) -> Self {
        let endpoint_url = endpoint_url.into();
        let (sender, mut rx) = mpsc::unbounded_channel::<CampaignEvent>();

        tokio::spawn(async move {
            let client = reqwest::Client::new();
            let mut buffer: Vec<CampaignEvent> = Vec::with_capacity(BATCH_SIZE);
            let mut flush_timer = tokio::time::interval(FLUSH_INTERVAL);

            loop {
                tokio::select! {
                    event = rx.recv() => {
                        match event {
                            Some(event) => {
                                buffer.push(event);
                                if buffer.len() >= BATCH_SIZE {
                                    Self::send_batch(&client, &endpoint_url, &mut buffer).await;
                                }
                            }
                            None => {
                                // Sender dropped; flush what's left and exit
                                if !buffer.is_empty() {
                                    Self::send_batch(&client, &endpoint_url, &mut buffer).await;
                                }
                                break;
                            }
                        }
                    }

                    _ = flush_timer.tick() => {
                        if !buffer.is_empty() {
                            Self::send_batch(&client, &endpoint_url, &mut buffer).await;
                        }
                    }
                }
            }
        });

        Self { session_id, sender }
    }

    async fn send_batch(
        client: &reqwest::Client,
        endpoint_url: &str,
        buffer: &mut Vec<CampaignEvent>,
    ) {
        let batch = std::mem::take(buffer);
        match client.post(endpoint_url).json(&batch).send().await {
            Ok(response) if !response.status().is_success() => {
                tracing::debug!("📡 Notification batch rejected: HTTP {}", response.status());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("📡 Notification batch failed: {}", e);
            }
        }
    }

    fn push(&self, kind: EventKind, message: String) {
        // Receiver gone means the observer is gone; that is not our problem
        let _ = self.sender.send(CampaignEvent {
            timestamp: Utc::now(),
            session_id: self.session_id,
            kind,
            message,
        });
    }
}

impl Notifier for HttpNotifier {
    fn log_line(&self, message: &str) {
        self.push(EventKind::Log, message.to_string());
    }

    fn status(&self, status: CampaignStatus) {
        self.push(EventKind::Status, status.to_string());
    }
}

/// No-op notifier for runs without an observer
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn log_line(&self, _message: &str) {}

    fn status(&self, _status: CampaignStatus) {}
}
