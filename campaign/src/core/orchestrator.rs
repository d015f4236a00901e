//! Campaign orchestrator
//!
//! The scheduling loop: pulls sources round-robin, filters candidates
//! through the engagement store, generates replies, drives the action
//! surface and records every confirmed action. One candidate at a time;
//! the surface is a single stateful session and is never driven
//! concurrently.

use std::time::Duration;

use crate::core::jitter;
use crate::core::reply::ReplyEngine;
use crate::core::scorer;
use crate::core::state::{SessionState, StopFlag};
use crate::error::StoreError;
use crate::traits::{ActionSurface, CompletionClient, EngagementStore, Notifier};
use shared::{
    truncate_chars, CampaignConfig, CampaignMode, CampaignStatus, CandidateItem, EngagementRecord,
    RunPhase, SessionStats, Source,
};

/// Short pause between sources, in seconds
const BETWEEN_SOURCES_PAUSE: (f64, f64) = (3.0, 5.0);

/// Inter-action rest is jittered up to this factor over the configured base
const REST_JITTER_FACTOR: f64 = 1.5;

/// Items with less text than this are noise (link-only posts, stubs)
const MIN_TEXT_CHARS: usize = 10;

/// How the run ended, plus the final numbers.
///
/// Produced on every exit path; a run never terminates without one.
#[derive(Debug, Clone)]
pub struct CampaignSummary {
    pub phase: RunPhase,
    pub stats: SessionStats,
    pub errors: u64,
    pub cycles: u32,
    pub abort_reason: Option<String>,
}

/// Main orchestrator, parametrized over its injected collaborators
pub struct CampaignOrchestrator<S, D, C, N>
where
    S: ActionSurface,
    D: EngagementStore,
    C: CompletionClient,
    N: Notifier,
{
    config: CampaignConfig,
    surface: S,
    store: D,
    reply: ReplyEngine<C>,
    notifier: N,
    state: SessionState,
    stop: StopFlag,
}

impl<S, D, C, N> CampaignOrchestrator<S, D, C, N>
where
    S: ActionSurface,
    D: EngagementStore,
    C: CompletionClient,
    N: Notifier,
{
    pub fn new(config: CampaignConfig, surface: S, store: D, client: C, notifier: N) -> Self {
        let reply = ReplyEngine::new(client, config.fallback_policy);
        Self {
            config,
            surface,
            store,
            reply,
            notifier,
            state: SessionState::new(),
            stop: StopFlag::new(),
        }
    }

    /// Handle for requesting a cooperative stop from outside the loop.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Drive the campaign to completion.
    ///
    /// Always returns a summary; fatal conditions surface as
    /// `RunPhase::Aborted` with a reason rather than as an error.
    pub async fn run(&mut self) -> CampaignSummary {
        self.notifier.status(CampaignStatus::Running);

        match self.initialize().await {
            Ok(()) => {
                self.cycle_loop().await;
                self.finalize(RunPhase::Done, None).await
            }
            Err(reason) => self.finalize(RunPhase::Aborted, Some(reason)).await,
        }
    }

    /// INIT and AUTH_WAIT. The only hard external precondition lives here.
    async fn initialize(&mut self) -> Result<(), String> {
        self.state.set_phase(RunPhase::Init);

        // Resume today's quota from the store so restarts never double-count
        let already_done = match self.store.count_today().await {
            Ok(count) => count,
            Err(e) => {
                self.state.degraded_store_events += 1;
                tracing::warn!("⚠️ Store unreachable during init, assuming 0 done today: {}", e);
                0
            }
        };
        self.state.replies_today = already_done;

        if !self.store.health_check().await {
            self.state.degraded_store_events += 1;
            tracing::warn!("⚠️ Engagement store failed its health check; dedup may be degraded");
        }

        let targets = &self.config.targets;
        tracing::info!("🎯 TARGET: {} replies today", targets.replies_per_day);
        tracing::info!("📊 Already done today: {}", already_done);
        tracing::info!("⏱️ Rest duration: {}s between replies", targets.rest_secs);
        tracing::info!("📋 Working with {} sources", self.config.sources.len());
        self.notifier.log_line(&format!(
            "Target {} replies today ({} already done)",
            targets.replies_per_day, already_done
        ));

        self.state.set_phase(RunPhase::AuthWait);
        if !self.surface.is_authenticated().await {
            let timeout = Duration::from_secs(self.config.auth_timeout_secs);
            tracing::info!(
                "🔐 Waiting up to {}s for an authenticated session...",
                timeout.as_secs()
            );
            if let Err(e) = self.surface.await_authentication(timeout).await {
                return Err(format!("authentication wait failed: {e}"));
            }
        }
        tracing::info!("✅ Authenticated session ready");

        Ok(())
    }

    /// CYCLING: round-robin over the source list, always restarting from
    /// source 1, until quota, stop signal or abort.
    async fn cycle_loop(&mut self) {
        while !self.quota_met() && !self.stop.is_stopped() {
            self.state.cycles += 1;
            self.state.set_phase(RunPhase::Cycling);
            tracing::info!(
                "🔄 CYCLE {} - Progress: {}/{}",
                self.state.cycles,
                self.state.replies_today,
                self.config.targets.replies_per_day
            );

            let sources = self.config.sources.clone();
            for (index, source) in sources.iter().enumerate() {
                if self.quota_met() || self.stop.is_stopped() {
                    break;
                }

                self.process_source(source).await;

                let is_last = index + 1 == sources.len();
                if !is_last && !self.quota_met() && !self.stop.is_stopped() {
                    self.state.set_phase(RunPhase::PausedBetweenLists);
                    tokio::time::sleep(jitter::delay_between(
                        BETWEEN_SOURCES_PAUSE.0,
                        BETWEEN_SOURCES_PAUSE.1,
                    ))
                    .await;
                    self.state.set_phase(RunPhase::Cycling);
                }
            }

            if !self.quota_met() && !self.stop.is_stopped() {
                let pause = self.config.targets.cycle_break_secs;
                tracing::info!("⏸️ {}s break before next cycle...", pause);
                self.state.set_phase(RunPhase::PausedBetweenCycles);
                tokio::time::sleep(Duration::from_secs(pause)).await;
            }
        }
    }

    /// Fetch one source's visible candidates and run the pipeline on each.
    async fn process_source(&mut self, source: &Source) {
        tracing::info!("📋 Loading: {}", source.tag);

        if let Err(e) = self.surface.navigate_to(&source.url).await {
            tracing::warn!("❌ Error loading {}: {}", source.tag, e);
            return;
        }

        let found = match self.surface.find_candidates(source).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("❌ Error scanning {}: {}", source.tag, e);
                return;
            }
        };
        tracing::info!("📊 Found {} candidates in {}", found.len(), source.tag);

        let candidates: Vec<CandidateItem> = found
            .into_iter()
            .filter(|item| !item.id.is_empty() && item.text.chars().count() >= MIN_TEXT_CHARS)
            .collect();

        let pool: Vec<CandidateItem> = match self.config.mode {
            CampaignMode::ListSweep => candidates,
            CampaignMode::ViralHunting { min_score, top_k } => {
                let ranked = scorer::rank_candidates(candidates, min_score, top_k);
                for (item, item_score) in &ranked {
                    tracing::debug!("🔥 {} scored {}/100", item.id, item_score);
                }
                ranked.into_iter().map(|(item, _)| item).collect()
            }
        };

        let mut replied = 0u32;
        for item in &pool {
            if self.quota_met() || self.stop.is_stopped() {
                break;
            }

            if self.process_candidate(item).await {
                replied += 1;

                let rest = self.config.targets.rest_secs as f64;
                tokio::time::sleep(jitter::delay_between(rest, rest * REST_JITTER_FACTOR)).await;

                self.maybe_session_break().await;
            }
        }

        tracing::info!("✓ Processed {}: {} replies", source.tag, replied);
    }

    /// The four-stage pipeline: skip checks, generate, act, commit.
    /// Returns true only when a record was committed.
    async fn process_candidate(&mut self, item: &CandidateItem) -> bool {
        // Stage 1: skip checks. Session-local first, then the store.
        if self.state.is_visited(&item.id) {
            tracing::debug!("⏭️ Already handled this session: {}", item.id);
            return false;
        }
        match self.store.has_acted(&item.id).await {
            Ok(true) => {
                tracing::debug!("⏭️ Already acted on {}", item.id);
                return false;
            }
            Ok(false) => {}
            Err(e) => {
                // Fail-open: liveness over strict dedup during an outage,
                // but every degraded period is flagged.
                self.state.degraded_store_events += 1;
                tracing::warn!("⚠️ Dedup check unavailable, proceeding fail-open: {}", e);
            }
        }

        // Stage 2: generate. No inline retry, no posting empty content.
        let Some(reply) = self
            .reply
            .generate(&item.text, &item.author, self.config.style)
            .await
        else {
            self.state.errors += 1;
            tracing::warn!("⚠️ No reply generated for {}, skipping", item.id);
            return false;
        };

        // Stage 3: act. Any failure is a skip, never fatal.
        if let Err(e) = self.surface.submit_reply(&item.id, &reply).await {
            self.state.errors += 1;
            tracing::warn!("⚠️ Reply failed for {}: {}", item.id, e);
            if let Err(cleanup) = self.surface.dismiss_composer().await {
                tracing::debug!("⚠️ Composer cleanup failed: {}", cleanup);
            }
            return false;
        }

        // Stage 4: commit. The record, not the submission, is authoritative
        // for counting.
        let record = EngagementRecord::new(item, reply.clone());
        match self.store.record(record).await {
            Ok(()) => {}
            Err(StoreError::DuplicateId { id }) => {
                tracing::warn!("⚠️ Discarded duplicate action for {}", id);
                self.state.mark_visited(&item.id);
                return false;
            }
            Err(e @ StoreError::Unavailable { .. }) => {
                self.state.degraded_store_events += 1;
                tracing::warn!("⚠️ Could not record engagement for {}: {}", item.id, e);
                return false;
            }
        }

        self.state.mark_visited(&item.id);
        self.state.record_success();

        let line = format!(
            "✅ [{}/{}] @{}: {}...",
            self.state.replies_today,
            self.config.targets.replies_per_day,
            item.author,
            truncate_chars(&reply, 60)
        );
        tracing::info!("{}", line);
        self.notifier.log_line(&line);

        self.maybe_follow(item).await;

        true
    }

    /// Hunting-mode follow-up: follow a verified author, bounded by the
    /// daily cap. Best effort; failures are ordinary skips.
    async fn maybe_follow(&mut self, item: &CandidateItem) {
        if !matches!(self.config.mode, CampaignMode::ViralHunting { .. }) {
            return;
        }
        let cap = self.config.targets.follows_per_day;
        if cap == 0 || self.state.follows_today >= cap {
            return;
        }
        let verified = item.signals.map(|s| s.verified_author).unwrap_or(false);
        if !verified {
            return;
        }

        match self.surface.follow_author(&item.author).await {
            Ok(()) => {
                self.state.follows_today += 1;
                tracing::info!(
                    "👥 Followed @{} ({}/{})",
                    item.author,
                    self.state.follows_today,
                    cap
                );
            }
            Err(e) => tracing::warn!("⚠️ Failed to follow @{}: {}", item.author, e),
        }
    }

    /// Longer cooldown every K successful actions.
    async fn maybe_session_break(&mut self) {
        let every = self.config.targets.session_break_every;
        if every == 0 || self.state.session_count == 0 || self.state.session_count % every != 0 {
            return;
        }
        let pause = self.config.targets.session_break_secs;
        tracing::info!(
            "⏸️ Quick {}s break at {} replies...",
            pause,
            self.state.session_count
        );
        self.state.set_phase(RunPhase::PausedSessionBreak);
        tokio::time::sleep(Duration::from_secs(pause)).await;
        self.state.set_phase(RunPhase::Cycling);
    }

    fn quota_met(&self) -> bool {
        self.state.replies_today >= self.config.targets.replies_per_day as u64
    }

    /// Final stats log, emitted on every termination path.
    async fn finalize(&mut self, phase: RunPhase, abort_reason: Option<String>) -> CampaignSummary {
        self.state.set_phase(phase);

        let stats = match self.store.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("⚠️ Could not read final stats: {}", e);
                SessionStats {
                    replies_today: self.state.replies_today,
                    distinct_authors_today: 0,
                    total_all_time: self.state.replies_today,
                }
            }
        };

        let quota = self.config.targets.replies_per_day;
        tracing::info!("🏁 SESSION COMPLETE!");
        tracing::info!("📊 Today: {}/{} replies", stats.replies_today, quota);
        tracing::info!("👥 Engaged with {} unique authors", stats.distinct_authors_today);
        tracing::info!("💯 All-time total: {} replies", stats.total_all_time);
        if self.state.degraded_store_events > 0 {
            tracing::warn!(
                "⚠️ Store degraded {} time(s) this run; duplicate replies possible",
                self.state.degraded_store_events
            );
        }
        if let Some(reason) = &abort_reason {
            tracing::error!("❌ Run aborted: {}", reason);
        } else if stats.replies_today >= quota as u64 {
            tracing::info!("🎉 TARGET REACHED! {} replies completed!", quota);
        }

        self.notifier.log_line(&format!(
            "Session complete: {}/{} today, {} authors, {} all-time",
            stats.replies_today, quota, stats.distinct_authors_today, stats.total_all_time
        ));
        self.notifier.status(CampaignStatus::Stopped);

        CampaignSummary {
            phase,
            stats,
            errors: self.state.errors,
            cycles: self.state.cycles,
            abort_reason,
        }
    }
}
