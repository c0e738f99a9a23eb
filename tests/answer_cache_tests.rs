#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use trivia_owl::answer_cache::{
        answer_key, question_id_from_key, AnswerCache, MemoryAnswerCache, PendingAnswer,
    };

    fn pending(answer: &str) -> PendingAnswer {
        PendingAnswer {
            answer: answer.to_string(),
            answer_preview: vec!["https://example.org/a.jpg".to_string()],
            question_message_id: 77,
        }
    }

    #[test]
    fn test_key_embeds_chat_and_question_id() {
        let key = answer_key(-10012345, Some(4242));
        assert_eq!(key, "answer:-10012345:q4242");
        assert_eq!(question_id_from_key(&key), Some(4242));
    }

    #[test]
    fn test_timestamp_key_has_no_question_id() {
        let key = answer_key(555, None);
        assert!(key.starts_with("answer:555:t"));
        assert_eq!(question_id_from_key(&key), None);
    }

    #[tokio::test]
    async fn test_get_after_delete_is_absent() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("k", pending("a"), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.get("k").await.unwrap().is_some());
        cache.del("k").await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_take_is_at_most_once_through_trait_object() {
        let cache: Arc<dyn AnswerCache> = Arc::new(MemoryAnswerCache::new());
        let key = answer_key(1, Some(2));
        cache
            .set(&key, pending("the answer"), Duration::from_secs(60))
            .await
            .unwrap();

        let first = cache.take(&key).await.unwrap();
        assert_eq!(first.map(|e| e.answer), Some("the answer".to_string()));

        // Consumed entries read as expired afterwards, never as an error.
        assert!(cache.take(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = MemoryAnswerCache::new();
        cache
            .set("k", pending("a"), Duration::from_millis(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(cache.take("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_chats_use_independent_keys() {
        let cache = MemoryAnswerCache::new();
        let key_a = answer_key(100, Some(1));
        let key_b = answer_key(200, Some(1));
        assert_ne!(key_a, key_b);

        cache
            .set(&key_a, pending("for chat a"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set(&key_b, pending("for chat b"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.take(&key_a).await.unwrap().map(|e| e.answer),
            Some("for chat a".to_string())
        );
        assert_eq!(
            cache.take(&key_b).await.unwrap().map(|e| e.answer),
            Some("for chat b".to_string())
        );
    }

    #[test]
    fn test_pending_answer_round_trips_through_json() {
        let entry = pending("serialized");
        let json = serde_json::to_string(&entry).unwrap();
        let back: PendingAnswer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
