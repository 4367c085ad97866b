#[cfg(test)]
mod tests {
    use super::super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use async_trait::async_trait;
    use brief_core::{BriefError, QuoteSummaryProvider, TickerSymbol};
    use brief_orchestrator::testing::{company, history, FakeFilings, FakeQuotes};
    use serde_json::{json, Map, Value};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing::instrument::WithSubscriber;

    fn amzn_quotes() -> FakeQuotes {
        FakeQuotes::new(
            json!({
                "summaryDetail": {"marketCap": {"raw": 1876543210000u64}, "trailingPE": {"raw": 52.31}},
                "financialData": {"totalRevenue": {"raw": 574785000000u64}}
            }),
            json!({"assetProfile": {"sector": "Consumer Cyclical", "industry": "Internet Retail"}}),
        )
    }

    fn amzn_filings() -> FakeFilings {
        FakeFilings::new(
            vec![company("AMZN", 1018724)],
            history(&[("10-K", "2024-02-02"), ("10-Q", "2023-11-01")]),
        )
    }

    fn orchestrator(quotes: FakeQuotes, filings: FakeFilings) -> BriefOrchestrator {
        BriefOrchestrator::new(Arc::new(quotes), Arc::new(filings))
    }

    fn body_json(response: &GatewayResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_ticker_is_rejected_without_provider_calls() {
        let quotes = Arc::new(FakeQuotes::empty());
        let filings = Arc::new(FakeFilings::empty());
        let orchestrator = BriefOrchestrator::new(quotes.clone(), filings.clone());

        let events = [
            GatewayEvent::default(),
            GatewayEvent {
                query_string_parameters: Some(Default::default()),
            },
            GatewayEvent::with_ticker(""),
            GatewayEvent::with_ticker("   "),
        ];

        for event in &events {
            let response = dispatch(&orchestrator, event).await;
            assert_eq!(response.status_code, 400);
            assert_eq!(body_json(&response), json!({"error": "ticker parameter required"}));
            assert_eq!(
                response.headers.get("Content-Type").map(String::as_str),
                Some("application/json")
            );
        }

        assert!(quotes.calls().is_empty());
        assert!(filings.history_calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_dispatch_shape() {
        let orchestrator = orchestrator(amzn_quotes(), amzn_filings());

        let response = dispatch(&orchestrator, &GatewayEvent::with_ticker(" amzn")).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert_eq!(body["ticker"], "AMZN");
        assert_eq!(
            body["financials"],
            json!({
                "market_cap": "1876543210000",
                "pe_ratio": "52.31",
                "revenue": "574785000000",
                "profit_margin": "N/A",
                "debt_to_equity": "N/A"
            })
        );
        assert_eq!(body["competitive_analysis"]["market_position"], "Company operates in Internet Retail sector");
        assert_eq!(
            body["sec_summary"],
            json!({
                "latest_10k_date": "2024-02-02",
                "summary": "Latest 10-K filing dated 2024-02-02",
                "note": "Full text analysis requires additional processing"
            })
        );
    }

    #[tokio::test]
    async fn test_sections_present_when_every_provider_fails() {
        let quotes = FakeQuotes::empty()
            .failing_summary(BriefError::Http("request timeout: slow".to_string()))
            .failing_profile(BriefError::Http("request timeout: slow".to_string()));
        let filings = FakeFilings::empty().failing_registry(BriefError::Http("HTTP 403 Forbidden: ".to_string()));
        let orchestrator = orchestrator(quotes, filings);

        let response = dispatch(&orchestrator, &GatewayEvent::with_ticker("AMZN")).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ["ticker", "financials", "competitive_analysis", "sec_summary"] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        assert_eq!(body["financials"]["error"], "Failed to fetch financials: request timeout: slow");
        assert_eq!(
            body["competitive_analysis"]["error"],
            "Failed to fetch competitive analysis: request timeout: slow"
        );
        assert_eq!(body["sec_summary"]["error"], "Failed to fetch SEC summary: HTTP 403 Forbidden: ");
    }

    #[tokio::test]
    async fn test_unknown_ticker_degrades_sec_section_only() {
        let orchestrator = orchestrator(amzn_quotes(), amzn_filings());

        let response = dispatch(&orchestrator, &GatewayEvent::with_ticker("ZZZZ")).await;
        let body = body_json(&response);

        assert_eq!(response.status_code, 200);
        assert_eq!(body["sec_summary"], json!({"error": "Company not found in SEC database"}));
        assert!(body["financials"].get("error").is_none());
    }

    #[test]
    fn test_event_ignores_unrelated_fields() {
        let event: GatewayEvent = serde_json::from_value(json!({
            "resource": "/brief",
            "httpMethod": "GET",
            "queryStringParameters": {"ticker": "msft", "verbose": "1"}
        }))
        .unwrap();
        assert_eq!(event.ticker_param(), Some("msft"));

        let event: GatewayEvent =
            serde_json::from_value(json!({"queryStringParameters": null})).unwrap();
        assert_eq!(event.ticker_param(), None);
    }

    #[test]
    fn test_envelope_field_names() {
        let response = GatewayResponse::error(500, "boom");
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["statusCode"], 500);
        assert_eq!(value["headers"]["Content-Type"], "application/json");
        assert_eq!(value["body"], r#"{"error":"boom"}"#);
    }

    #[tokio::test]
    async fn test_get_brief_route_uses_envelope_status() {
        let app = router(AppState::new(orchestrator(amzn_quotes(), amzn_filings())));

        let response = app
            .oneshot(Request::builder().uri("/api/brief").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(response.headers().contains_key("x-request-id"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "ticker parameter required"}));
    }

    #[tokio::test]
    async fn test_get_brief_route_success() {
        let app = router(AppState::new(orchestrator(amzn_quotes(), amzn_filings())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/brief?ticker=amzn")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-request-id"], "req-42");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["sec_summary"]["latest_10k_date"], "2024-02-02");
    }

    #[tokio::test]
    async fn test_invoke_route_returns_envelope() {
        let app = router(AppState::new(orchestrator(amzn_quotes(), amzn_filings())));

        let event = json!({"queryStringParameters": {"ticker": "AMZN"}});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/invoke")
                    .header("content-type", "application/json")
                    .body(Body::from(event.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let envelope: GatewayResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope.status_code, 200);

        let body: Value = serde_json::from_str(&envelope.body).unwrap();
        assert_eq!(body["ticker"], "AMZN");
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(AppState::new(orchestrator(FakeQuotes::empty(), FakeFilings::empty())));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_repeated_dispatch_is_idempotent() {
        let orchestrator = orchestrator(amzn_quotes(), amzn_filings());
        let event = GatewayEvent::with_ticker("AMZN");

        let first = dispatch(&orchestrator, &event).await;
        let second = dispatch(&orchestrator, &event).await;

        assert_eq!(first, second);
    }

    struct PanickingQuotes;

    #[async_trait]
    impl QuoteSummaryProvider for PanickingQuotes {
        async fn quote_summary(
            &self,
            _ticker: &TickerSymbol,
            _modules: &[&str],
        ) -> Result<Map<String, Value>, BriefError> {
            panic!("quote feed exploded")
        }
    }

    #[tokio::test]
    async fn test_crashed_brief_fails_whole_request() {
        let orchestrator = BriefOrchestrator::new(Arc::new(PanickingQuotes), Arc::new(amzn_filings()));

        let response = dispatch(&orchestrator, &GatewayEvent::with_ticker("AMZN")).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );

        let body = body_json(&response);
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["error"]);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to build brief"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_section_warnings_carry_request_id() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let app = router(AppState::new(orchestrator(amzn_quotes(), amzn_filings())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/brief?ticker=zzzz")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .with_subscriber(subscriber)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let text = logs.text();
        let warning = text
            .lines()
            .find(|line| line.contains("not found in SEC registry"))
            .unwrap_or_else(|| panic!("no registry warning in:\n{}", text));
        assert!(warning.contains("brief{request_id=req-7"), "{}", warning);
    }
}
