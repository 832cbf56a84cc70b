//! Gemini provider integration tests
//!
//! The full gateway in front of a mock Gemini endpoint.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{KNIGHT_PROMPT, T0, test_config};
    use crate::{assert_err, assert_ok};
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde_json::json;
    use std::sync::Arc;
    use storyweaver_gateway::config::GatewayConfig;
    use storyweaver_gateway::core::quota::ManualClock;
    use storyweaver_gateway::{ErrorKind, GenerationGateway};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";
    const TEXT_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn config_for(server: &MockServer) -> GatewayConfig {
        let mut config = test_config();
        config.provider.api_key = "test-key".to_string();
        config.provider.base_url = format!("{}/v1beta", server.uri());
        config.retry.base_delay_ms = 10;
        config.retry.max_delay_ms = 100;
        config
    }

    async fn gateway_for(server: &MockServer) -> GenerationGateway {
        GenerationGateway::builder(config_for(server))
            .with_clock(Arc::new(ManualClock::new(T0)))
            .build()
            .await
            .unwrap()
    }

    fn image_body(bytes: &[u8]) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"parts": [
                    {"inlineData": {"mimeType": "image/png", "data": BASE64.encode(bytes)}}
                ]},
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn test_image_generated_and_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_body(b"KNIGHT-PNG")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let first = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert_eq!(&first.bytes[..], b"KNIGHT-PNG");
        assert_eq!(first.mime_type, "image/png");

        let second = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert!(second.from_cache);
        assert_eq!(gateway.get_usage_snapshot().images_this_minute(), 1);
    }

    #[tokio::test]
    async fn test_503_twice_then_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": {"code": 503, "message": "The model is overloaded", "status": "UNAVAILABLE"}
            })))
            .up_to_n_times(2)
            .with_priority(1)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(image_body(b"AFTER-RETRY")))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let artifact = assert_ok!(gateway.generate_image(KNIGHT_PROMPT, vec![], vec![]).await);
        assert_eq!(&artifact.bytes[..], b"AFTER-RETRY");

        let usage = gateway.get_usage_snapshot();
        assert_eq!(usage.images_this_minute(), 1);
        assert_eq!(usage.requests_today(), 1);
        assert_eq!(gateway.stats().remote_attempts, 3);
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(IMAGE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = assert_err!(gateway.generate_image("A grim battlefield", vec![], vec![]).await);
        assert_eq!(err.kind(), ErrorKind::RemoteClientError);
    }

    #[tokio::test]
    async fn test_text_generation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEXT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "The dragon slept."}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let text = assert_ok!(gateway.generate_text("What happened next?").await);
        assert_eq!(text, "The dragon slept.");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_to_build() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        config.provider.api_key.clear();

        let result = GenerationGateway::builder(config).build().await;
        assert!(result.is_err());
    }
}
