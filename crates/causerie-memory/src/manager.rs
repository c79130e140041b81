// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The hybrid memory manager.
//!
//! [`HybridMemory`] owns the append-only message log of one conversation and
//! its long-term memory. At most one summarization cycle runs at a time: the
//! in-flight flag is taken synchronously before any work and released when
//! the cycle's guard is dropped, whatever the outcome. State changes are
//! published on a `watch` channel (and on the event bus when attached) so
//! callers never have to await a cycle to observe `running -> ready/error`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use causerie_bus::{BusEvent, EventBus};
use causerie_config::model::MemoryConfig;
use causerie_core::traits::ProviderAdapter;
use causerie_core::{CauserieError, ChatMessage, ConversationId, MemoryStatus};
use strum::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::classifier::{Classifier, FactKind, FactPatterns};
use crate::fallback::FallbackSummarizer;
use crate::policy::{self, Mode, Plan, PolicyInput, SkipReason};
use crate::render::render_long_term_context;
use crate::state::{MemoryState, MemoryView, SummarizeResult};
use crate::summarizer::{Summarizer, SummaryInput};
use crate::text::{dedup_facts, union_facts};
use crate::window::{split, text_turns};

/// Where a committed result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SummarySource {
    Remote,
    Fallback,
}

/// Result of one call into the summarization cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarizeOutcome {
    /// The policy or the in-flight guard declined to start a cycle.
    Skipped(SkipReason),
    /// A result was merged into the memory.
    Committed {
        mode: Mode,
        source: SummarySource,
        summarized_until: usize,
    },
    /// The result was dropped because the memory was edited meanwhile.
    Superseded,
    /// The memory is now in the error state with this message.
    Failed(String),
}

impl SummarizeOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SummarizeOutcome::Committed { .. })
    }
}

struct Inner {
    conversation_id: ConversationId,
    config: MemoryConfig,
    summarizer: Option<Summarizer>,
    fallback: FallbackSummarizer,
    log: RwLock<Vec<ChatMessage>>,
    state: watch::Sender<MemoryState>,
    in_flight: AtomicBool,
    /// Bumped by manual edits of the long-term memory.
    generation: AtomicU64,
    offline: AtomicBool,
    bus: Option<Arc<EventBus>>,
}

impl Inner {
    fn read_log(&self) -> RwLockReadGuard<'_, Vec<ChatMessage>> {
        self.log.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_log(&self) -> RwLockWriteGuard<'_, Vec<ChatMessage>> {
        self.log.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_status(&self) {
        let Some(bus) = &self.bus else {
            return;
        };
        let (status, error) = {
            let state = self.state.borrow();
            (state.status, state.error.clone())
        };
        bus.publish(BusEvent::MemoryStatusChanged {
            conversation_id: self.conversation_id.clone(),
            status,
            error,
        });
    }

    /// Remote call first, offline summarizer when that is impossible or fails.
    async fn produce(&self, job: &Job) -> Result<(SummarizeResult, SummarySource), CauserieError> {
        let offline = self.offline.load(Ordering::Acquire);
        let remote_error = match &self.summarizer {
            Some(summarizer) if !offline => {
                let input = SummaryInput {
                    turns: &job.turns,
                    previous_summary: job.previous_summary.as_deref(),
                    previous_facts: &job.previous_facts,
                };
                match summarizer.summarize(&input).await {
                    Ok(result) if !result.is_empty() => {
                        return Ok((result, SummarySource::Remote));
                    }
                    Ok(_) => CauserieError::Summarization(
                        "provider reply contained neither summary nor facts".into(),
                    ),
                    Err(e) => e,
                }
            }
            Some(_) => CauserieError::provider("offline"),
            None => CauserieError::provider("no summarization provider configured"),
        };

        if !self.config.fallback_enabled {
            return Err(remote_error);
        }

        if offline {
            debug!(conversation_id = %self.conversation_id, "offline, using local summarizer");
        } else {
            warn!(
                conversation_id = %self.conversation_id,
                error = %remote_error,
                "remote summarization failed, using local summarizer"
            );
        }

        let result = self.fallback.summarize(&job.turns);
        // An empty incremental result still advances the mark.
        if result.is_empty() && job.plan.mode == Mode::Force {
            return Err(CauserieError::Summarization(
                "conversation has no text to summarize".into(),
            ));
        }
        Ok((result, SummarySource::Fallback))
    }

    fn commit(
        &self,
        job: Job,
        produced: Result<(SummarizeResult, SummarySource), CauserieError>,
    ) -> SummarizeOutcome {
        let Job {
            plan,
            previous_status,
            generation,
            in_flight,
            ..
        } = job;

        let (result, source) = match produced {
            Ok(produced) => produced,
            Err(e) => {
                let message = e.to_string();
                warn!(
                    conversation_id = %self.conversation_id,
                    mode = %plan.mode,
                    error = %message,
                    "summarization failed"
                );
                let error = message.clone();
                self.finish(in_flight, |state| {
                    state.status = MemoryStatus::Error;
                    state.error = Some(error);
                });
                return SummarizeOutcome::Failed(message);
            }
        };

        if self.config.discard_superseded && self.generation.load(Ordering::Acquire) != generation {
            info!(
                conversation_id = %self.conversation_id,
                mode = %plan.mode,
                "memory edited during summarization, discarding result"
            );
            self.finish(in_flight, |state| {
                state.status = if state.has_long_term() {
                    MemoryStatus::Ready
                } else {
                    previous_status
                };
            });
            return SummarizeOutcome::Superseded;
        }

        let mut committed_until = plan.target_until;
        self.finish(in_flight, |state| {
            match plan.mode {
                Mode::Incremental => {
                    let summary = result.summary.trim();
                    if !summary.is_empty() {
                        state.summary = summary.to_string();
                    }
                    state.facts = union_facts(&state.facts, &result.facts);
                    committed_until = state
                        .summarized_until
                        .map_or(plan.target_until, |until| until.max(plan.target_until));
                }
                Mode::Force => {
                    state.summary = result.summary.trim().to_string();
                    state.facts = dedup_facts(&result.facts, usize::MAX);
                }
            }
            state.summarized_until = Some(committed_until);
            state.status = MemoryStatus::Ready;
            state.error = None;
        });

        info!(
            conversation_id = %self.conversation_id,
            mode = %plan.mode,
            source = %source,
            summarized_until = committed_until,
            turns = plan.range.len(),
            "long-term memory updated"
        );

        SummarizeOutcome::Committed {
            mode: plan.mode,
            source,
            summarized_until: committed_until,
        }
    }

    /// Applies the final state change and releases the in-flight flag inside
    /// the same watch update, so an observer of the new status can start the
    /// next cycle right away.
    fn finish(&self, mut in_flight: InFlight, update: impl FnOnce(&mut MemoryState)) {
        in_flight.restore = None;
        self.state.send_modify(|state| {
            update(state);
            drop(in_flight);
        });
        self.publish_status();
    }
}

/// Clears the in-flight flag when dropped.
///
/// `restore` is set once the cycle has entered `running`. A guard dropped
/// with it still set belongs to a cancelled cycle and puts back the status
/// and error seen before the cycle started.
struct InFlight {
    inner: Arc<Inner>,
    restore: Option<(MemoryStatus, Option<String>)>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let Some((status, error)) = self.restore.take() else {
            self.inner.in_flight.store(false, Ordering::Release);
            return;
        };
        warn!(conversation_id = %self.inner.conversation_id, "summarization cancelled");
        self.inner.state.send_modify(|state| {
            if state.status == MemoryStatus::Running {
                state.status = status;
                state.error = error;
            }
            self.inner.in_flight.store(false, Ordering::Release);
        });
        self.inner.publish_status();
    }
}

/// Everything one cycle needs, captured when it starts.
struct Job {
    plan: Plan,
    turns: Vec<ChatMessage>,
    previous_summary: Option<String>,
    previous_facts: Vec<String>,
    previous_status: MemoryStatus,
    generation: u64,
    in_flight: InFlight,
}

async fn run(inner: Arc<Inner>, job: Job) -> SummarizeOutcome {
    let produced = inner.produce(&job).await;
    inner.commit(job, produced)
}

/// Builder for [`HybridMemory`].
pub struct HybridMemoryBuilder {
    config: MemoryConfig,
    conversation_id: Option<ConversationId>,
    provider: Option<(Arc<dyn ProviderAdapter>, String)>,
    classifier: Option<Arc<dyn Classifier<Label = FactKind>>>,
    bus: Option<Arc<EventBus>>,
    messages: Vec<ChatMessage>,
}

impl HybridMemoryBuilder {
    pub fn conversation_id(mut self, id: ConversationId) -> Self {
        self.conversation_id = Some(id);
        self
    }

    /// Remote summarizer. Without one, every cycle uses the local summarizer.
    pub fn provider(mut self, provider: Arc<dyn ProviderAdapter>, model: impl Into<String>) -> Self {
        self.provider = Some((provider, model.into()));
        self
    }

    /// Replaces the fact classifier used by the local summarizer.
    pub fn classifier(mut self, classifier: Arc<dyn Classifier<Label = FactKind>>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Publishes status changes on `bus`.
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Seeds the log with existing messages. No cycle is started.
    pub fn messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn build(self) -> Result<HybridMemory, CauserieError> {
        let config = self.config;
        let classifier = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(FactPatterns::with_extra(&config.extra_fact_patterns)?),
        };
        let summarizer = self.provider.map(|(provider, model)| {
            Summarizer::new(provider, model)
                .with_generation(config.generation())
                .with_timeout(Duration::from_secs(config.request_timeout_secs))
        });
        let (state, _) = watch::channel(MemoryState::default());

        Ok(HybridMemory {
            inner: Arc::new(Inner {
                conversation_id: self
                    .conversation_id
                    .unwrap_or_else(ConversationId::generate),
                fallback: FallbackSummarizer::new(classifier, config.fallback_turns),
                config,
                summarizer,
                log: RwLock::new(self.messages),
                state,
                in_flight: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                offline: AtomicBool::new(false),
                bus: self.bus,
            }),
        })
    }
}

/// Short-term window plus summarized long-term memory for one conversation.
///
/// Cloning is cheap; clones share the same log and state.
#[derive(Clone)]
pub struct HybridMemory {
    inner: Arc<Inner>,
}

impl HybridMemory {
    pub fn builder(config: &MemoryConfig) -> HybridMemoryBuilder {
        HybridMemoryBuilder {
            config: config.clone(),
            conversation_id: None,
            provider: None,
            classifier: None,
            bus: None,
            messages: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &ConversationId {
        &self.inner.conversation_id
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.inner.config
    }

    // --- Log ---

    /// Appends a message. With `auto_summarize` on and a tokio runtime
    /// available, re-evaluates the policy and returns the spawned cycle.
    /// Dropping the handle detaches the cycle; it still commits.
    pub fn push(&self, message: ChatMessage) -> Option<JoinHandle<SummarizeOutcome>> {
        self.inner.write_log().push(message);
        self.after_append()
    }

    /// Appends several messages, then evaluates the policy once.
    pub fn extend<I>(&self, messages: I) -> Option<JoinHandle<SummarizeOutcome>>
    where
        I: IntoIterator<Item = ChatMessage>,
    {
        self.inner.write_log().extend(messages);
        self.after_append()
    }

    fn after_append(&self) -> Option<JoinHandle<SummarizeOutcome>> {
        if self.inner.config.auto_summarize {
            self.request_summarization_if_needed()
        } else {
            None
        }
    }

    /// Copy of the raw log, rich messages included.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.read_log().clone()
    }

    /// Number of text turns.
    pub fn total_count(&self) -> usize {
        self.inner
            .read_log()
            .iter()
            .filter(|m| m.as_text().is_some())
            .count()
    }

    // --- Summarization ---

    /// Runs an incremental cycle if the policy allows it, and waits for it.
    pub async fn summarize_if_needed(&self) -> SummarizeOutcome {
        self.run_cycle(Mode::Incremental).await
    }

    /// Spawns an incremental cycle if the policy allows it. Returns `None`
    /// when skipped (already running, conditions unmet, no runtime).
    pub fn request_summarization_if_needed(&self) -> Option<JoinHandle<SummarizeOutcome>> {
        self.spawn_cycle(Mode::Incremental)
    }

    /// Re-summarizes the whole conversation, ignoring the threshold, and
    /// waits for it. Still refused while another cycle is in flight.
    pub async fn force_summarize(&self) -> SummarizeOutcome {
        self.run_cycle(Mode::Force).await
    }

    /// Spawning variant of [`HybridMemory::force_summarize`].
    pub fn force_summarize_now(&self) -> Option<JoinHandle<SummarizeOutcome>> {
        self.spawn_cycle(Mode::Force)
    }

    async fn run_cycle(&self, mode: Mode) -> SummarizeOutcome {
        match self.begin(mode) {
            Ok(job) => run(Arc::clone(&self.inner), job).await,
            Err(reason) => SummarizeOutcome::Skipped(reason),
        }
    }

    fn spawn_cycle(&self, mode: Mode) -> Option<JoinHandle<SummarizeOutcome>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(
                conversation_id = %self.inner.conversation_id,
                %mode,
                "no tokio runtime, summarization not scheduled"
            );
            return None;
        };
        let job = self.begin(mode).ok()?;
        Some(runtime.spawn(run(Arc::clone(&self.inner), job)))
    }

    /// Takes the in-flight flag, plans the cycle and enters `running`.
    fn begin(&self, mode: Mode) -> Result<Job, SkipReason> {
        let inner = &self.inner;
        if inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(conversation_id = %inner.conversation_id, %mode, "summarization already in flight");
            return Err(SkipReason::AlreadyRunning);
        }
        let in_flight = InFlight {
            inner: Arc::clone(inner),
            restore: None,
        };

        let turns = text_turns(&inner.read_log());
        let snapshot = inner.state.borrow().clone();
        let plan = policy::plan(
            PolicyInput {
                total: turns.len(),
                short_window_size: inner.config.short_window_size,
                summarize_threshold: inner.config.summarize_threshold,
                summarized_until: snapshot.summarized_until,
            },
            mode,
        )
        .inspect_err(|reason| {
            debug!(conversation_id = %inner.conversation_id, %mode, %reason, "summarization skipped");
        })?;

        let (previous_summary, previous_facts) = if plan.with_previous {
            (
                Some(snapshot.summary.clone()).filter(|s| !s.trim().is_empty()),
                snapshot.facts.clone(),
            )
        } else {
            (None, Vec::new())
        };

        let mut job = Job {
            turns: turns[plan.range.clone()].to_vec(),
            plan,
            previous_summary,
            previous_facts,
            previous_status: snapshot.status,
            generation: inner.generation.load(Ordering::Acquire),
            in_flight,
        };

        inner.state.send_modify(|state| {
            state.status = MemoryStatus::Running;
            state.error = None;
        });
        job.in_flight.restore = Some((snapshot.status, snapshot.error));
        inner.publish_status();
        debug!(
            conversation_id = %inner.conversation_id,
            %mode,
            from = job.plan.range.start,
            to = job.plan.range.end,
            "summarization started"
        );
        Ok(job)
    }

    /// True while a cycle holds the in-flight flag.
    pub fn is_running(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    // --- Manual edits ---

    /// Replaces the summary.
    pub fn set_summary(&self, summary: impl Into<String>) {
        let summary = summary.into();
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.state.send_modify(|state| state.summary = summary);
    }

    /// Replaces the facts (deduplicated, order kept).
    pub fn set_facts<I, S>(&self, facts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let facts = dedup_facts(facts, usize::MAX);
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.state.send_modify(|state| state.facts = facts);
    }

    // --- Connectivity ---

    /// Marks the memory offline (local summarizer only) or back online.
    /// Returns the previous value.
    pub fn set_offline(&self, offline: bool) -> bool {
        let previous = self.inner.offline.swap(offline, Ordering::AcqRel);
        if previous != offline {
            info!(conversation_id = %self.inner.conversation_id, offline, "connectivity changed");
        }
        previous
    }

    pub fn is_offline(&self) -> bool {
        self.inner.offline.load(Ordering::Acquire)
    }

    // --- Observation ---

    pub fn state(&self) -> MemoryState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<MemoryState> {
        self.inner.state.subscribe()
    }

    /// Rendered long-term context, empty when there is none.
    pub fn long_term_context(&self) -> String {
        let state = self.inner.state.borrow();
        render_long_term_context(&state.summary, &state.facts)
    }

    /// Consistent snapshot for a chat view or a prompt builder.
    pub fn view(&self) -> MemoryView {
        let turns = text_turns(&self.inner.read_log());
        let state = self.state();
        let window = split(&turns, self.inner.config.short_window_size);
        let total_count = turns.len();

        MemoryView {
            long_term_context_text: render_long_term_context(&state.summary, &state.facts),
            optimized: total_count > self.inner.config.summarize_threshold
                && state.has_long_term(),
            short_term_messages: window.short_term.to_vec(),
            short_count: window.short_term.len(),
            total_count,
            status: state.status,
            error: state.error,
            summary: state.summary,
            facts: state.facts,
            summarized_until: state.summarized_until,
        }
    }
}

impl std::fmt::Debug for HybridMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HybridMemory")
            .field("conversation_id", &self.inner.conversation_id)
            .field("status", &self.inner.state.borrow().status)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causerie_test_utils::MockProvider;

    fn config() -> MemoryConfig {
        MemoryConfig {
            auto_summarize: false,
            ..MemoryConfig::default()
        }
    }

    fn numbered(count: usize) -> Vec<ChatMessage> {
        (0..count)
            .map(|i| ChatMessage::user(format!("message {i}.")))
            .collect()
    }

    #[tokio::test]
    async fn below_threshold_is_skipped_without_state_change() {
        let memory = HybridMemory::builder(&config())
            .messages(numbered(5))
            .build()
            .unwrap();
        assert_eq!(
            memory.summarize_if_needed().await,
            SummarizeOutcome::Skipped(SkipReason::BelowThreshold)
        );
        assert_eq!(memory.state().status, MemoryStatus::Idle);
        assert!(!memory.is_running());
    }

    #[tokio::test]
    async fn guard_is_released_after_failure() {
        let mut config = config();
        config.fallback_enabled = false;
        let memory = HybridMemory::builder(&config)
            .provider(Arc::new(MockProvider::failing("down")), "m")
            .messages(numbered(3))
            .build()
            .unwrap();

        let outcome = memory.force_summarize().await;
        assert!(matches!(outcome, SummarizeOutcome::Failed(ref m) if m.contains("down")));
        assert!(!memory.is_running());
        assert_eq!(memory.state().status, MemoryStatus::Error);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn remote_failure_is_logged_before_falling_back() {
        let memory = HybridMemory::builder(&config())
            .provider(Arc::new(MockProvider::failing("quota exceeded")), "m")
            .messages(numbered(3))
            .build()
            .unwrap();

        assert!(memory.force_summarize().await.is_committed());
        assert!(logs_contain("remote summarization failed, using local summarizer"));
        assert!(logs_contain("quota exceeded"));
    }

    #[tokio::test]
    async fn no_provider_uses_local_summarizer() {
        let memory = HybridMemory::builder(&config())
            .messages(numbered(3))
            .build()
            .unwrap();
        let outcome = memory.force_summarize().await;
        assert_eq!(
            outcome,
            SummarizeOutcome::Committed {
                mode: Mode::Force,
                source: SummarySource::Fallback,
                summarized_until: 2,
            }
        );
    }

    #[tokio::test]
    async fn cancelled_cycle_restores_previous_status() {
        let provider = Arc::new(MockProvider::new().gated());
        let memory = HybridMemory::builder(&config())
            .provider(provider.clone(), "m")
            .messages(numbered(20))
            .build()
            .unwrap();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), memory.summarize_if_needed()).await;
        assert!(cancelled.is_err());
        assert!(!memory.is_running());
        assert_eq!(memory.state().status, MemoryStatus::Idle);
        assert_eq!(memory.state().summarized_until, None);

        provider.release(1);
        assert!(memory.summarize_if_needed().await.is_committed());
        assert_eq!(memory.state().status, MemoryStatus::Ready);
    }

    #[tokio::test]
    async fn whitespace_turns_still_advance_the_mark() {
        let memory = HybridMemory::builder(&config())
            .messages((0..20).map(|_| ChatMessage::user("   ")).collect())
            .build()
            .unwrap();

        assert_eq!(
            memory.summarize_if_needed().await,
            SummarizeOutcome::Committed {
                mode: Mode::Incremental,
                source: SummarySource::Fallback,
                summarized_until: 9,
            }
        );
        let state = memory.state();
        assert_eq!(state.status, MemoryStatus::Ready);
        assert!(state.summary.is_empty());
        assert!(state.facts.is_empty());
        assert_eq!(memory.long_term_context(), "");
    }

    #[tokio::test]
    async fn forced_run_over_blank_turns_fails() {
        let memory = HybridMemory::builder(&config())
            .messages(vec![ChatMessage::user("  ")])
            .build()
            .unwrap();
        assert!(matches!(
            memory.force_summarize().await,
            SummarizeOutcome::Failed(_)
        ));
        assert_eq!(memory.state().status, MemoryStatus::Error);
    }

    #[test]
    fn spawning_without_runtime_is_a_no_op() {
        let mut config = config();
        config.auto_summarize = true;
        config.summarize_threshold = 0;
        config.short_window_size = 1;
        let memory = HybridMemory::builder(&config).build().unwrap();
        assert!(memory.push(ChatMessage::user("a.")).is_none());
        assert!(memory.push(ChatMessage::user("b.")).is_none());
        assert!(!memory.is_running());
        assert_eq!(memory.state().status, MemoryStatus::Idle);
    }

    #[test]
    fn set_facts_deduplicates() {
        let memory = HybridMemory::builder(&config()).build().unwrap();
        memory.set_facts(["a", "b", "a"]);
        assert_eq!(memory.state().facts, vec!["a", "b"]);
    }

    #[test]
    fn set_offline_reports_previous_value() {
        let memory = HybridMemory::builder(&config()).build().unwrap();
        assert!(!memory.set_offline(true));
        assert!(memory.is_offline());
        assert!(memory.set_offline(false));
    }

    #[test]
    fn invalid_extra_pattern_fails_build() {
        let mut config = config();
        config.extra_fact_patterns = vec!["[".into()];
        assert!(HybridMemory::builder(&config).build().is_err());
    }

    #[tokio::test]
    async fn view_counts_only_text_turns() {
        let mut messages = numbered(3);
        messages.push(ChatMessage::rich(serde_json::json!({"card": 1}), false));
        let memory = HybridMemory::builder(&config())
            .messages(messages)
            .build()
            .unwrap();
        let view = memory.view();
        assert_eq!(view.total_count, 3);
        assert_eq!(view.short_count, 3);
        assert!(!view.optimized);
        assert_eq!(view.long_term_context_text, "");
        assert_eq!(memory.messages().len(), 4);
    }
}
