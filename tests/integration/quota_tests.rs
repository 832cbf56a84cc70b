//! Quota integration tests
//!
//! Window roll-over, per-kind accounting and usage persistence, driven
//! through the gateway with a manual clock.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{T0, png_payload, test_config};
    use crate::common::{GatewayFixture, ScriptedRemote};
    use crate::{assert_err, assert_ok};
    use std::sync::Arc;
    use std::time::Duration;
    use storyweaver_gateway::GatewayError;
    use storyweaver_gateway::core::providers::{RemoteFailure, RemotePayload};
    use storyweaver_gateway::core::quota::ManualClock;
    use storyweaver_gateway::storage::UsageStateFile;

    #[tokio::test]
    async fn test_unit_window_rolls_over_after_a_minute() {
        let clock = Arc::new(ManualClock::new(T0));
        let mut config = test_config();
        config.quota.image_units_per_minute = 2;
        let remote = ScriptedRemote::always(png_payload());
        let gateway = GatewayFixture::new(remote.clone())
            .config(config)
            .clock(clock.clone())
            .build()
            .await;

        assert_ok!(gateway.generate_image("The castle gate", vec![], vec![]).await);
        assert_ok!(gateway.generate_image("The castle moat", vec![], vec![]).await);
        assert_err!(gateway.generate_image("The castle tower", vec![], vec![]).await);

        clock.advance(Duration::from_millis(60_001));
        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 0);
        assert_eq!(usage.minute_reset_in_seconds(), 60);

        assert_ok!(gateway.generate_image("The castle tower", vec![], vec![]).await);
        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 1);
        assert_eq!(usage.requests_today(), 3);
        assert_eq!(remote.calls(), 3);
    }

    #[tokio::test]
    async fn test_reset_countdown_follows_clock() {
        let clock = Arc::new(ManualClock::new(T0));
        let gateway = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .clock(clock.clone())
            .build()
            .await;

        assert_ok!(gateway.generate_image("A quiet harbor", vec![], vec![]).await);
        assert_eq!(gateway.get_usage_snapshot().minute_reset_in_seconds(), 60);

        clock.advance(Duration::from_millis(20_500));
        assert_eq!(gateway.get_usage_snapshot().minute_reset_in_seconds(), 40);

        clock.advance(Duration::from_millis(39_000));
        assert_eq!(gateway.get_usage_snapshot().minute_reset_in_seconds(), 1);
    }

    #[tokio::test]
    async fn test_text_requests_draw_only_from_daily_window() {
        let mut config = test_config();
        config.quota.requests_per_day = 3;
        config.quota.image_units_per_minute = 1;
        let remote = ScriptedRemote::always(RemotePayload::text("and then..."));
        let gateway = GatewayFixture::new(remote.clone())
            .config(config)
            .build()
            .await;

        for i in 0..3 {
            assert_ok!(gateway.generate_text(format!("Next line {}", i)).await);
        }
        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 0);
        assert_eq!(usage.requests_today(), 3);
        assert_eq!(usage.requests_remaining(), 0);

        let err = assert_err!(gateway.generate_text("Next line 3").await);
        match err {
            GatewayError::QuotaExceeded {
                message, snapshot, ..
            } => {
                assert!(message.contains("Daily request limit of 3"));
                assert_eq!(snapshot.requests_today(), 3);
            }
            other => panic!("expected quota rejection, got {:?}", other),
        }
        assert_eq!(remote.calls(), 3);
    }

    #[tokio::test]
    async fn test_image_unit_cost_draws_multiple_units() {
        let mut config = test_config();
        config.quota.image_unit_cost = 5;
        let gateway = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .config(config)
            .build()
            .await;

        for i in 0..4 {
            assert_ok!(gateway.generate_image(format!("Panel {}", i), vec![], vec![]).await);
        }
        assert_eq!(gateway.get_usage_snapshot().units_used_in_window, 20);

        let err = assert_err!(gateway.generate_image("Panel 4", vec![], vec![]).await);
        assert!(matches!(err, GatewayError::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn test_refund_on_fatal_failure_is_opt_in() {
        let mut config = test_config();
        config.quota.refund_on_fatal_failure = true;
        let remote = ScriptedRemote::failing(RemoteFailure::status(400, "Content policy"));
        let gateway = GatewayFixture::new(remote)
            .config(config)
            .build()
            .await;

        assert_err!(gateway.generate_image("A forbidden scene", vec![], vec![]).await);
        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 0);
        assert_eq!(usage.requests_today(), 0);
        assert_eq!(gateway.stats().refunds, 1);
    }

    // ==================== Persistence Tests ====================

    #[tokio::test]
    async fn test_usage_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("usage.json");
        let clock = Arc::new(ManualClock::new(T0));

        let mut config = test_config();
        config.quota.state_path = Some(state_path.to_string_lossy().into_owned());

        let gateway = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .config(config.clone())
            .clock(clock.clone())
            .build()
            .await;
        assert_ok!(gateway.generate_image("A map of the realm", vec![], vec![]).await);
        assert_ok!(gateway.generate_image("A map of the sea", vec![], vec![]).await);
        drop(gateway);

        let persisted = UsageStateFile::new(&state_path).load().await.unwrap();
        assert!(persisted.is_some());

        let restarted = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .config(config.clone())
            .clock(clock.clone())
            .build()
            .await;
        let usage = restarted.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 2);
        assert_eq!(usage.requests_today(), 2);

        clock.advance(Duration::from_secs(61));
        let later = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .config(config)
            .clock(clock)
            .build()
            .await;
        let usage = later.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 0);
        assert_eq!(usage.requests_today(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_usage_state_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("usage.json");
        std::fs::write(&state_path, b"{ not json").unwrap();

        let mut config = test_config();
        config.quota.state_path = Some(state_path.to_string_lossy().into_owned());

        let gateway = GatewayFixture::new(ScriptedRemote::always(png_payload()))
            .config(config)
            .build()
            .await;
        assert_eq!(gateway.get_usage_snapshot().images_this_minute(), 0);
        assert_ok!(gateway.generate_image("A fresh start", vec![], vec![]).await);
    }
}
