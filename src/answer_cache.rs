//! Answer caching for the "show answer" inline button
//!
//! When a question is delivered, its answer payload is stored under a
//! generated key with a bounded lifetime. A later button press consumes the
//! entry exactly once; a second retrieval (or an expired entry) reads as
//! absent, never as an error.
//!
//! The [`AnswerCache`] trait keeps the store behind a small `get/set/del`
//! interface so an external key-value store can back multi-instance
//! deployments while [`MemoryAnswerCache`] remains valid for single-process
//! use and tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::errors::AppResult;

/// Pending answer payload for an outstanding "show answer" button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAnswer {
    /// MarkdownV2-ready answer text
    pub answer: String,
    /// Images accompanying the answer, in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answer_preview: Vec<String>,
    /// Message id of the delivered question, for button removal
    pub question_message_id: i32,
}

/// Build the cache key for a chat's pending answer.
///
/// The source question id is preferred (deterministic per question,
/// traceable in logs); delivery timestamp is the fallback when the source
/// assigns no id. Serving the same question twice to one chat within the TTL
/// window overwrites the first entry, which is benign: both writes carry
/// equivalent payloads and a stale button simply reads as "not found".
pub fn answer_key(chat_id: i64, question_id: Option<i64>) -> String {
    match question_id {
        Some(id) => format!("answer:{}:q{}", chat_id, id),
        None => format!("answer:{}:t{}", chat_id, Utc::now().timestamp()),
    }
}

/// Extract the source question id back out of an id-based key, for the
/// expired-answer deep link
pub fn question_id_from_key(key: &str) -> Option<i64> {
    let (_, disambiguator) = key.rsplit_once(':')?;
    disambiguator.strip_prefix('q')?.parse().ok()
}

/// Key-value answer store with per-entry TTL
#[async_trait]
pub trait AnswerCache: Send + Sync {
    /// Store an entry under `key` for `ttl`
    async fn set(&self, key: &str, entry: PendingAnswer, ttl: Duration) -> AppResult<()>;

    /// Read an entry; expired or missing entries are `None`
    async fn get(&self, key: &str) -> AppResult<Option<PendingAnswer>>;

    /// Delete an entry; deleting a missing key is a no-op
    async fn del(&self, key: &str) -> AppResult<()>;

    /// Consume an entry exactly once: read it and delete it. A second call
    /// for the same key returns `None`.
    async fn take(&self, key: &str) -> AppResult<Option<PendingAnswer>> {
        let entry = self.get(key).await?;
        if entry.is_some() {
            self.del(key).await?;
        }
        Ok(entry)
    }
}

/// Cache entry with expiration time
#[derive(Debug, Clone)]
struct CacheEntry {
    value: PendingAnswer,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: PendingAnswer, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe in-memory answer cache implementation
pub struct MemoryAnswerCache {
    data: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryAnswerCache {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Drop all expired entries
    pub fn cleanup(&self) {
        let mut data = self.data.write();
        let initial_len = data.len();

        data.retain(|_, entry| !entry.is_expired());

        let removed = initial_len - data.len();
        if removed > 0 {
            tracing::debug!("Answer cache cleanup removed {} expired entries", removed);
        }
    }
}

impl Default for MemoryAnswerCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerCache for MemoryAnswerCache {
    async fn set(&self, key: &str, entry: PendingAnswer, ttl: Duration) -> AppResult<()> {
        self.data
            .write()
            .insert(key.to_string(), CacheEntry::new(entry, ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<PendingAnswer>> {
        let data = self.data.read();
        Ok(data
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn del(&self, key: &str) -> AppResult<()> {
        self.data.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(answer: &str) -> PendingAnswer {
        PendingAnswer {
            answer: answer.to_string(),
            answer_preview: Vec::new(),
            question_message_id: 10,
        }
    }

    #[test]
    fn test_answer_key_prefers_question_id() {
        assert_eq!(answer_key(42, Some(777)), "answer:42:q777");
    }

    #[test]
    fn test_answer_key_timestamp_fallback() {
        let key = answer_key(42, None);
        assert!(key.starts_with("answer:42:t"));
    }

    #[test]
    fn test_question_id_round_trips_through_key() {
        assert_eq!(question_id_from_key("answer:42:q777"), Some(777));
        assert_eq!(question_id_from_key("answer:42:t1700000000"), None);
        assert_eq!(question_id_from_key("garbage"), None);
    }

    #[tokio::test]
    async fn test_take_consumes_entry_exactly_once() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("answer:1:q2", entry("a"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.take("answer:1:q2").await.unwrap(), Some(entry("a")));
        assert_eq!(cache.take("answer:1:q2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("k", entry("a"), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_entries() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("short", entry("a"), Duration::from_millis(10))
            .await
            .unwrap();
        cache
            .set("long", entry("b"), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        cache.cleanup();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long").await.unwrap(), Some(entry("b")));
    }

    #[tokio::test]
    async fn test_overwrite_same_key_is_last_write_wins() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("k", entry("first"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("k", entry("second"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.take("k").await.unwrap(), Some(entry("second")));
    }
}
