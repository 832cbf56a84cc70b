//! Gateway integration tests
//!
//! End-to-end behavior of a generation call: caching, admission, retries,
//! the concurrency ceiling and abandoned callers.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{KNIGHT_PROMPT, png_payload, style_reference, test_config};
    use crate::common::{CharacterFactory, GatewayFixture, ScriptedRemote};
    use crate::{assert_err, assert_ok};
    use std::sync::Arc;
    use std::time::Duration;
    use storyweaver_gateway::GatewayError;
    use storyweaver_gateway::core::providers::{RemoteFailure, RemotePart};
    use tokio::sync::Semaphore;

    async fn wait_until(what: &str, condition: impl Fn() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("timed out waiting for {}", what);
    }

    // ==================== Cache Tests ====================

    #[tokio::test]
    async fn test_identical_request_served_from_cache_without_usage_change() {
        let remote = ScriptedRemote::always(png_payload());
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let first = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 1);

        let second = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert!(second.from_cache);
        assert_eq!(second.bytes, first.bytes);
        assert_eq!(second.mime_type, "image/png");
        assert_eq!(gateway.get_usage_snapshot(), usage);
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_text_served_from_cache() {
        let remote = ScriptedRemote::always(
            storyweaver_gateway::core::providers::RemotePayload::text("The sword hummed."),
        );
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let first = assert_ok!(gateway.generate_text("Continue the story").await);
        let second = assert_ok!(gateway.generate_text("Continue the story").await);
        assert_eq!(first, second);
        assert_eq!(remote.calls(), 1);
        assert_eq!(gateway.get_usage_snapshot().requests_today(), 1);
    }

    // ==================== Quota Tests ====================

    #[tokio::test]
    async fn test_twenty_first_image_in_minute_rejected() {
        let remote = ScriptedRemote::always(png_payload());
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        for i in 0..20 {
            assert_ok!(
                gateway
                    .generate_image(format!("Page {} of the story", i), vec![], vec![])
                    .await
            );
        }

        let err = assert_err!(
            gateway
                .generate_image("Page 20 of the story", vec![], vec![])
                .await
        );
        let snapshot = *err.snapshot().expect("quota errors carry a snapshot");
        assert_eq!(snapshot.images_this_minute(), 20);
        assert!(snapshot.minute_reset_in_seconds() > 0);
        assert_eq!(remote.calls(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_admission_never_exceeds_limit() {
        let remote = ScriptedRemote::always(png_payload());
        let mut config = test_config();
        config.concurrency.max_in_flight = 4;
        let gateway = GatewayFixture::new(remote.clone())
            .config(config)
            .build()
            .await;

        let handles: Vec<_> = (0..25)
            .map(|i| {
                let gateway = gateway.clone();
                tokio::spawn(async move {
                    gateway
                        .generate_image(format!("Illustration number {}", i), vec![], vec![])
                        .await
                })
            })
            .collect();

        let mut admitted = 0;
        let mut rejected = 0;
        for result in futures::future::join_all(handles).await {
            match result.unwrap() {
                Ok(_) => admitted += 1,
                Err(GatewayError::QuotaExceeded { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(admitted, 20);
        assert_eq!(rejected, 5);
        assert_eq!(remote.calls(), 20);
        assert_eq!(gateway.get_usage_snapshot().images_this_minute(), 20);
    }

    // ==================== Resilience Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_two_503s_then_success_waits_two_backoffs() {
        let remote = ScriptedRemote::scripted(
            vec![
                Err(RemoteFailure::status(503, "Service unavailable")),
                Err(RemoteFailure::status(503, "Service unavailable")),
            ],
            png_payload(),
        );
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let started = tokio::time::Instant::now();
        let artifact = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        let elapsed = started.elapsed();

        assert!(!artifact.from_cache);
        assert_eq!(remote.calls(), 3);
        // 750ms + 1500ms with jitter disabled
        assert!(elapsed >= Duration::from_millis(2250), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(2750), "elapsed {:?}", elapsed);

        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 1);
        assert_eq!(usage.requests_today(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_remote_times_out_each_attempt() {
        let remote = ScriptedRemote::always(png_payload()).with_delay(Duration::from_secs(60));
        let mut config = test_config();
        config.retry.timeout_ms = 1_000;
        let gateway = GatewayFixture::new(remote.clone())
            .config(config)
            .build()
            .await;

        let err = assert_err!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert!(matches!(err, GatewayError::Timeout { attempts: 3, .. }));
        assert!(err.is_retryable());
        assert_eq!(remote.calls(), 3);
        assert_eq!(remote.completed(), 0);
        assert_eq!(remote.in_flight(), 0);
        assert_eq!(gateway.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_protocol_error_is_not_retried() {
        let remote = ScriptedRemote::failing(RemoteFailure::protocol("no image in response"));
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let err = assert_err!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert!(matches!(err, GatewayError::RemoteProtocolError(_)));
        assert!(!err.is_retryable());
        assert_eq!(remote.calls(), 1);
        // Attempted work is still charged
        assert_eq!(gateway.get_usage_snapshot().images_this_minute(), 1);
    }

    #[tokio::test]
    async fn test_failed_generation_is_not_cached() {
        let remote = ScriptedRemote::scripted(
            vec![Err(RemoteFailure::status(400, "Invalid argument"))],
            png_payload(),
        );
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        assert_err!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        let artifact = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert!(!artifact.from_cache);
        assert_eq!(remote.calls(), 2);
    }

    // ==================== Concurrency Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_ceiling_of_two_with_five_slow_callers() {
        let remote = ScriptedRemote::always(png_payload()).with_delay(Duration::from_secs(5));
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let gateway = gateway.clone();
                tokio::spawn(async move {
                    gateway
                        .generate_image(format!("Chapter {} cover", i), vec![], vec![])
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            assert_ok!(result.unwrap());
        }

        assert_eq!(remote.completed(), 5);
        assert_eq!(remote.peak_in_flight(), 2);
        assert_eq!(gateway.peak_in_flight(), 2);
        assert_eq!(gateway.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_call_completes_and_warms_cache() {
        let hold = Arc::new(Semaphore::new(0));
        let remote = ScriptedRemote::always(png_payload()).held_by(hold.clone());
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        let caller = {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                gateway
                    .generate_image(KNIGHT_PROMPT, vec![CharacterFactory::knight()], vec![])
                    .await
            })
        };
        wait_until("remote call to start", || remote.calls() == 1).await;

        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        hold.add_permits(1);
        wait_until("abandoned call to be cached", || {
            gateway.cache_stats().writes == 1
        })
        .await;
        assert_eq!(gateway.in_flight(), 0);

        let artifact = assert_ok!(
            gateway
                .generate_image(KNIGHT_PROMPT, vec![CharacterFactory::knight()], vec![])
                .await
        );
        assert!(artifact.from_cache);
        assert_eq!(remote.calls(), 1);
    }

    // ==================== Remote Call Shape Tests ====================

    #[tokio::test]
    async fn test_remote_receives_references_and_blueprints() {
        let remote = ScriptedRemote::always(png_payload());
        let gateway = GatewayFixture::new(remote.clone()).build().await;

        assert_ok!(
            gateway
                .generate_image(
                    KNIGHT_PROMPT,
                    vec![CharacterFactory::knight(), CharacterFactory::dragon()],
                    vec![style_reference(1), style_reference(2)],
                )
                .await
        );

        let seen = remote.seen();
        assert_eq!(seen.len(), 1);
        let call = &seen[0];
        assert_eq!(call.inline_parts(), 2);
        assert!(matches!(call.parts[0], RemotePart::InlineData { .. }));
        let texts: Vec<&str> = call.text_parts().collect();
        assert_eq!(texts[0], KNIGHT_PROMPT);
        assert!(texts.iter().any(|t| t.starts_with("Character Aldric:")));
        assert!(texts.iter().any(|t| t.starts_with("Character Ember:")));
    }

    #[tokio::test]
    async fn test_usage_snapshot_is_read_only() {
        let remote = ScriptedRemote::always(png_payload());
        let gateway = GatewayFixture::new(remote).build().await;

        let before = gateway.get_usage_snapshot();
        for _ in 0..10 {
            assert_eq!(gateway.get_usage_snapshot(), before);
        }
        assert_eq!(gateway.stats().requests, 0);
    }
}
