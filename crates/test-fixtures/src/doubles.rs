//! Provider doubles.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fathom_core::errors::ProviderError;
use fathom_core::models::{SearchHit, SearchMode, Stage};
use fathom_core::traits::{IIndexProvider, IReasoningModel};

type Responder = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
enum Scripted {
    Reply(String),
    Computed(Responder),
    Fail(ProviderError),
    Stall,
}

impl std::fmt::Debug for Scripted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reply(text) => f.debug_tuple("Reply").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed"),
            Self::Fail(e) => f.debug_tuple("Fail").field(e).finish(),
            Self::Stall => f.write_str("Stall"),
        }
    }
}

/// Reasoning model that answers from per-stage scripts.
///
/// Each prompt is routed by its stage marker. Queued responses are consumed
/// in order; once a stage's queue is empty its `always` response (if any)
/// repeats. Unscripted calls fail as unavailable.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    queued: Mutex<HashMap<Stage, VecDeque<Scripted>>>,
    fallback: Mutex<HashMap<Stage, Scripted>>,
    prompts: Mutex<Vec<(Stage, String)>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one reply for `stage`.
    pub fn reply(self, stage: Stage, text: impl Into<String>) -> Self {
        self.push(stage, Scripted::Reply(text.into()))
    }

    /// Queue one JSON reply for `stage`.
    pub fn reply_json(self, stage: Stage, value: serde_json::Value) -> Self {
        self.reply(stage, value.to_string())
    }

    /// Queue one failure for `stage`.
    pub fn fail(self, stage: Stage, error: ProviderError) -> Self {
        self.push(stage, Scripted::Fail(error))
    }

    /// Queue a call for `stage` that never completes.
    pub fn stall(self, stage: Stage) -> Self {
        self.push(stage, Scripted::Stall)
    }

    /// Reply used whenever `stage` has nothing queued.
    pub fn always(self, stage: Stage, text: impl Into<String>) -> Self {
        self.fallback
            .lock()
            .expect("script lock")
            .insert(stage, Scripted::Reply(text.into()));
        self
    }

    pub fn always_json(self, stage: Stage, value: serde_json::Value) -> Self {
        self.always(stage, value.to_string())
    }

    /// Answer every unqueued `stage` call by computing a reply from the prompt.
    pub fn respond_with<F>(self, stage: Stage, responder: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.fallback
            .lock()
            .expect("script lock")
            .insert(stage, Scripted::Computed(Arc::new(responder)));
        self
    }

    fn push(self, stage: Stage, scripted: Scripted) -> Self {
        self.queued
            .lock()
            .expect("script lock")
            .entry(stage)
            .or_default()
            .push_back(scripted);
        self
    }

    /// Number of calls received for `stage`.
    pub fn calls(&self, stage: Stage) -> usize {
        self.prompts
            .lock()
            .expect("prompt lock")
            .iter()
            .filter(|(s, _)| *s == stage)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.prompts.lock().expect("prompt lock").len()
    }

    /// Prompts received for `stage`, oldest first.
    pub fn prompts(&self, stage: Stage) -> Vec<String> {
        self.prompts
            .lock()
            .expect("prompt lock")
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn next(&self, stage: Stage) -> Option<Scripted> {
        let queued = self
            .queued
            .lock()
            .expect("script lock")
            .get_mut(&stage)
            .and_then(|q| q.pop_front());
        queued.or_else(|| self.fallback.lock().expect("script lock").get(&stage).cloned())
    }
}

#[async_trait]
impl IReasoningModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _temperature: f64) -> Result<String, ProviderError> {
        let stage = Stage::from_prompt(prompt).ok_or_else(|| ProviderError::Unavailable {
            provider: "scripted".into(),
            reason: "prompt carries no stage marker".into(),
        })?;
        self.prompts
            .lock()
            .expect("prompt lock")
            .push((stage, prompt.to_string()));

        match self.next(stage) {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Computed(responder)) => Ok(responder(prompt)),
            Some(Scripted::Fail(e)) => Err(e),
            Some(Scripted::Stall) => std::future::pending().await,
            None => Err(ProviderError::Unavailable {
                provider: "scripted".into(),
                reason: format!("no scripted response for {stage}"),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Index returning fixed hits per mode regardless of the query.
#[derive(Debug, Default)]
pub struct StaticIndex {
    semantic: Vec<SearchHit>,
    keyword: Vec<SearchHit>,
    calls: AtomicU32,
}

impl StaticIndex {
    pub fn new(semantic: Vec<SearchHit>, keyword: Vec<SearchHit>) -> Self {
        Self {
            semantic,
            keyword,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IIndexProvider for StaticIndex {
    async fn search(
        &self,
        _query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hits = match mode {
            SearchMode::Semantic => &self.semantic,
            SearchMode::Keyword => &self.keyword,
        };
        Ok(hits.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Index whose calls never complete.
#[derive(Debug, Default)]
pub struct StalledIndex {
    calls: AtomicU32,
}

impl StalledIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IIndexProvider for StalledIndex {
    async fn search(
        &self,
        _query: &str,
        _mode: SearchMode,
        _limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "stalled"
    }
}

/// Index that always fails as unavailable.
#[derive(Debug, Default)]
pub struct FailingIndex {
    calls: AtomicU32,
}

impl FailingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IIndexProvider for FailingIndex {
    async fn search(
        &self,
        _query: &str,
        _mode: SearchMode,
        _limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Unavailable {
            provider: "failing".into(),
            reason: "index offline".into(),
        })
    }

    fn name(&self) -> &str {
        "failing"
    }
}
