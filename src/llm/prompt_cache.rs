//! TTL cache for hosted system prompts.
//!
//! Shared through `Arc` in the router state.  The map lock is only held for
//! lookups and inserts, never across the fetch `.await`, so two concurrent
//! misses for the same id may both fetch; the later insert wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::llm::gemini::{LlmError, PromptSource};

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Time source, injectable so expiry can be tested without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock [`Clock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// ---------------------------------------------------------------------------
// PromptCache
// ---------------------------------------------------------------------------

struct CachedPrompt {
    text: String,
    fetched_at: Instant,
}

/// Hosted prompts keyed by prompt id, each fresh for `ttl`.
pub struct PromptCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CachedPrompt>>,
}

impl PromptCache {
    /// Cache driven by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedPrompt>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached text for `prompt_id`, if present and younger than the TTL.
    pub fn get(&self, prompt_id: &str) -> Option<String> {
        let now = self.clock.now();
        let entries = self.entries();
        let cached = entries.get(prompt_id)?;
        let age = now.saturating_duration_since(cached.fetched_at);
        if age < self.ttl {
            log::debug!("Using cached prompt {prompt_id} (age {}s)", age.as_secs());
            Some(cached.text.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, prompt_id: &str, text: String) {
        let fetched_at = self.clock.now();
        self.entries()
            .insert(prompt_id.to_string(), CachedPrompt { text, fetched_at });
    }

    /// Return the cached prompt or fetch, cache and return a fresh one.
    /// Fetch failures are not cached.
    pub async fn get_or_fetch<S>(&self, prompt_id: &str, source: &S) -> Result<String, LlmError>
    where
        S: PromptSource + ?Sized,
    {
        if let Some(text) = self.get(prompt_id) {
            return Ok(text);
        }
        log::info!("Prompt cache miss or expired for {prompt_id}; fetching");
        let text = source.fetch_prompt(prompt_id).await?;
        self.insert(prompt_id, text.clone());
        Ok(text)
    }

    pub fn invalidate(&self, prompt_id: &str) {
        self.entries().remove(prompt_id);
        log::info!("Cleared prompt cache for {prompt_id}");
    }

    pub fn clear(&self) {
        self.entries().clear();
        log::info!("Cleared all cached prompts");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Clock advanced by hand.
    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    /// Counts fetches and answers with a numbered prompt.
    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl PromptSource for CountingSource {
        async fn fetch_prompt(&self, prompt_id: &str) -> Result<String, LlmError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("{prompt_id} v{n}"))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PromptSource for FailingSource {
        async fn fetch_prompt(&self, _prompt_id: &str) -> Result<String, LlmError> {
            Err(LlmError::Upstream {
                status: 404,
                body: "not found".into(),
            })
        }
    }

    fn cache_with_clock() -> (PromptCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = PromptCache::with_clock(Duration::from_secs(300), clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_cached() {
        let (cache, clock) = cache_with_clock();
        let source = CountingSource(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch("prompts/a", &source).await.unwrap(), "prompts/a v1");
        clock.advance(Duration::from_secs(299));
        assert_eq!(cache.get_or_fetch("prompts/a", &source).await.unwrap(), "prompts/a v1");
        assert_eq!(source.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let (cache, clock) = cache_with_clock();
        let source = CountingSource(AtomicUsize::new(0));

        cache.get_or_fetch("p", &source).await.unwrap();
        clock.advance(Duration::from_secs(300));
        assert_eq!(cache.get("p"), None);
        assert_eq!(cache.get_or_fetch("p", &source).await.unwrap(), "p v2");
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (cache, _clock) = cache_with_clock();
        assert!(cache.get_or_fetch("p", &FailingSource).await.is_err());
        assert_eq!(cache.get("p"), None);
    }

    #[test]
    fn invalidate_and_clear() {
        let (cache, _clock) = cache_with_clock();
        cache.insert("a", "A".into());
        cache.insert("b", "B".into());
        cache.invalidate("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("B"));
        cache.clear();
        assert_eq!(cache.get("b"), None);
    }
}
