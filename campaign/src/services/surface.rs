//! Action surface implementations
//!
//! `RemoteSurface` talks to an external driver process that owns the actual
//! session mechanics; the engine only exercises the capability contract.
//! `ScriptedSurface` is the test-mode stand-in: deterministic scripted
//! feeds, or an endless synthetic feed for dry runs, with optional
//! humanized pacing so the jitter model is exercised end to end.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::jitter;
use crate::error::{CampaignError, CampaignResult};
use crate::traits::ActionSurface;
use shared::{CandidateItem, CandidateSignals, Recency, Source};

/// How often the remote driver is polled while waiting for login
const AUTH_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Bound on any single driver call
const DRIVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Scroll passes performed before a scripted candidate fetch
const SCROLL_PASSES: u32 = 3;

// ---------------------------------------------------------------------------
// Scripted / synthetic surface
// ---------------------------------------------------------------------------

pub struct ScriptedSurface {
    feeds: Mutex<HashMap<String, VecDeque<Vec<CandidateItem>>>>,
    submissions: Mutex<Vec<(String, String)>>,
    follows: Mutex<Vec<String>>,
    visited_urls: Mutex<Vec<String>>,
    authenticated: AtomicBool,
    counter: AtomicU64,
    synthetic_per_pass: Option<usize>,
    humanized: bool,
}

impl ScriptedSurface {
    /// Authenticated surface with empty feeds; script passes with
    /// [`push_pass`](Self::push_pass).
    pub fn new() -> Self {
        Self {
            feeds: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            follows: Mutex::new(Vec::new()),
            visited_urls: Mutex::new(Vec::new()),
            authenticated: AtomicBool::new(true),
            counter: AtomicU64::new(0),
            synthetic_per_pass: None,
            humanized: false,
        }
    }

    /// Surface that fabricates `per_pass` fresh candidates whenever the
    /// scripted feed for a source is exhausted. Supply never dries up.
    pub fn synthetic(per_pass: usize) -> Self {
        Self {
            synthetic_per_pass: Some(per_pass),
            ..Self::new()
        }
    }

    /// Apply typing and scroll pacing from the jitter model.
    pub fn with_humanized_pacing(mut self, humanized: bool) -> Self {
        self.humanized = humanized;
        self
    }

    pub fn with_authenticated(self, authenticated: bool) -> Self {
        self.authenticated.store(authenticated, Ordering::SeqCst);
        self
    }

    /// Queue one discovery pass for a source tag.
    pub fn push_pass(&self, tag: &str, items: Vec<CandidateItem>) {
        let mut feeds = self.feeds.lock().expect("feeds lock");
        feeds.entry(tag.to_string()).or_default().push_back(items);
    }

    pub fn submissions(&self) -> Vec<(String, String)> {
        self.submissions.lock().expect("submissions lock").clone()
    }

    pub fn follows(&self) -> Vec<String> {
        self.follows.lock().expect("follows lock").clone()
    }

    pub fn visited_urls(&self) -> Vec<String> {
        self.visited_urls.lock().expect("urls lock").clone()
    }

    fn fabricate(&self, count: usize, tag: &str) -> Vec<CandidateItem> {
        const TEXTS: [&str; 5] = [
            "Unpopular opinion: most startup advice is survivorship bias dressed up as wisdom",
            "AI will replace every junior role within five years and nobody is ready",
            "The market rewards distribution, not product quality. Always has.",
            "Hot take: remote work killed mentorship and we are pretending it didn't",
            "Crypto solved nothing that a database with permissions couldn't",
        ];

        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let n = self.counter.fetch_add(1, Ordering::SeqCst);
                let recency = *[
                    Recency::Minutes,
                    Recency::Hours,
                    Recency::Older,
                    Recency::Unknown,
                ]
                .choose(&mut rng)
                .unwrap_or(&Recency::Unknown);

                CandidateItem::new(
                    format!("sim_{n}"),
                    format!("account_{}", n % 7),
                    TEXTS[(n as usize) % TEXTS.len()],
                    tag,
                )
                .with_signals(CandidateSignals {
                    has_engagement_counts: rng.gen_bool(0.7),
                    verified_author: rng.gen_bool(0.3),
                    has_media: rng.gen_bool(0.4),
                    recency,
                })
            })
            .collect()
    }
}

impl Default for ScriptedSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ActionSurface for ScriptedSurface {
    async fn navigate_to(&self, url: &str) -> CampaignResult<()> {
        self.visited_urls
            .lock()
            .expect("urls lock")
            .push(url.to_string());
        Ok(())
    }

    async fn find_candidates(&self, source: &Source) -> CampaignResult<Vec<CandidateItem>> {
        if self.humanized {
            for _ in 0..SCROLL_PASSES {
                let _px = jitter::scroll_step();
                tokio::time::sleep(jitter::scroll_pause()).await;
            }
        }

        let scripted = {
            let mut feeds = self.feeds.lock().expect("feeds lock");
            feeds.get_mut(&source.tag).and_then(VecDeque::pop_front)
        };

        match scripted {
            Some(items) => Ok(items),
            None => match self.synthetic_per_pass {
                Some(per_pass) => Ok(self.fabricate(per_pass, &source.tag)),
                None => Ok(Vec::new()),
            },
        }
    }

    async fn submit_reply(&self, item_id: &str, text: &str) -> CampaignResult<()> {
        if self.humanized {
            for delay in jitter::typing_delays(text) {
                tokio::time::sleep(delay).await;
            }
        }
        self.submissions
            .lock()
            .expect("submissions lock")
            .push((item_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn dismiss_composer(&self) -> CampaignResult<()> {
        Ok(())
    }

    async fn follow_author(&self, author: &str) -> CampaignResult<()> {
        self.follows
            .lock()
            .expect("follows lock")
            .push(author.to_string());
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    async fn await_authentication(&self, timeout: Duration) -> CampaignResult<()> {
        if self.authenticated.load(Ordering::SeqCst) {
            return Ok(());
        }
        tokio::time::sleep(timeout).await;
        Err(CampaignError::AuthenticationTimeout {
            seconds: timeout.as_secs(),
        })
    }
}

// ---------------------------------------------------------------------------
// Remote driver surface
// ---------------------------------------------------------------------------

/// Client for an external session driver exposing the surface operations
/// over HTTP. The driver owns element location, typing and login; the
/// engine only sees the contract.
pub struct RemoteSurface {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSurface {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DRIVER_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, operation: &str, body: serde_json::Value) -> CampaignResult<reqwest::Response> {
        let url = format!("{}/{operation}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CampaignError::SurfaceUnavailable {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CampaignError::SurfaceError {
                operation: format!("{operation}: HTTP {}", response.status()),
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ActionSurface for RemoteSurface {
    async fn navigate_to(&self, url: &str) -> CampaignResult<()> {
        self.post("navigate", serde_json::json!({ "url": url })).await?;
        Ok(())
    }

    async fn find_candidates(&self, source: &Source) -> CampaignResult<Vec<CandidateItem>> {
        let response = self
            .post(
                "candidates",
                serde_json::json!({ "tag": source.tag, "url": source.url }),
            )
            .await?;
        response
            .json::<Vec<CandidateItem>>()
            .await
            .map_err(|e| CampaignError::SurfaceError {
                operation: format!("candidates: {e}"),
            })
    }

    async fn submit_reply(&self, item_id: &str, text: &str) -> CampaignResult<()> {
        self.post(
            "reply",
            serde_json::json!({ "item_id": item_id, "text": text }),
        )
        .await?;
        Ok(())
    }

    async fn dismiss_composer(&self) -> CampaignResult<()> {
        self.post("dismiss", serde_json::json!({})).await?;
        Ok(())
    }

    async fn follow_author(&self, author: &str) -> CampaignResult<()> {
        self.post("follow", serde_json::json!({ "author": author })).await?;
        Ok(())
    }

    async fn is_authenticated(&self) -> bool {
        let url = format!("{}/session", self.base_url);
        let Ok(response) = self.client.get(&url).send().await else {
            return false;
        };
        let Ok(body) = response.json::<serde_json::Value>().await else {
            return false;
        };
        body.get("authenticated")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    async fn await_authentication(&self, timeout: Duration) -> CampaignResult<()> {
        let started = tokio::time::Instant::now();
        loop {
            if self.is_authenticated().await {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(CampaignError::AuthenticationTimeout {
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(AUTH_POLL_INTERVAL).await;
        }
    }
}
