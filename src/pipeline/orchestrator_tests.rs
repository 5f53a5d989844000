//! Tests for `Pipeline` sequencing and outcome classification.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{Completion, Pipeline, PipelineObserver, PipelineResult, PipelineSettings, Stage};
use crate::event::{PropertyNames, WebhookEvent};
use crate::shortener::YourlsSettings;
use crate::store::{MatchMode, NotionSettings};
use crate::test_fixtures::{MockClient, refused, respond};

const SHORTENED: &str = r#"{"status":"success","shorturl":"https://s.ex/ORD100"}"#;
const PAGE: &str = r#"{"object":"page","id":"rec_1"}"#;
const EMPTY: &str = r#"{"object":"list","results":[]}"#;

fn settings() -> PipelineSettings {
    PipelineSettings {
        yourls: YourlsSettings {
            api: url::Url::parse("https://s.ex/yourls-api.php").unwrap(),
            signature: "sig".to_string(),
            title_prefix: "短網址：".to_string(),
        },
        notion: NotionSettings::new(
            url::Url::parse("https://api.notion.com/v1/").unwrap(),
            "secret",
            "2022-06-28",
            "db1",
        )
        .unwrap(),
        properties: PropertyNames::default(),
    }
}

fn pipeline(client: &Arc<MockClient>) -> Pipeline<Arc<MockClient>, Recorder> {
    Pipeline::new(client.clone(), settings()).with_observer(Recorder::default())
}

fn payload(with_id: bool) -> Vec<u8> {
    let mut value = json!({
        "data": {
            "id": "rec_1",
            "properties": {
                "付款網址": { "url": "https://pay.example/?key=abc" },
                "訂單編號": { "rich_text": [{ "text": { "content": "ORD100" } }] }
            }
        }
    });
    if !with_id {
        value["data"].as_object_mut().unwrap().remove("id");
    }
    value.to_string().into_bytes()
}

/// Observer that records every hook call as a string.
#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PipelineObserver for Recorder {
    fn stage_entered(&self, stage: Stage) {
        self.calls.lock().unwrap().push(format!("enter:{stage}"));
    }

    fn stage_failed(&self, stage: Stage, _result: &PipelineResult) {
        self.calls.lock().unwrap().push(format!("fail:{stage}"));
    }

    async fn pipeline_succeeded(&self, completion: &Completion<'_>) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("success:{}", completion.short_url));
    }
}

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn direct_record_id_end_to_end() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, PAGE),
        ]));

        let result = pipeline(&client).process_payload(&payload(true)).await;

        assert_eq!(
            result,
            PipelineResult::Success {
                short_url: "https://s.ex/ORD100".to_string(),
                record_id: "rec_1".to_string(),
                mode: MatchMode::Direct,
            }
        );
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn fallback_via_title_search_end_to_end() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, EMPTY),
            respond(200, r#"{"results":[{"id":"rec_9"}]}"#),
            respond(200, r#"{"object":"page","id":"rec_9"}"#),
        ]));

        let result = pipeline(&client).process_payload(&payload(false)).await;

        assert_eq!(
            result,
            PipelineResult::Success {
                short_url: "https://s.ex/ORD100".to_string(),
                record_id: "rec_9".to_string(),
                mode: MatchMode::Fallback,
            }
        );
        let requests = client.captured_requests();
        assert_eq!(requests[3].url.as_str(), "https://api.notion.com/v1/pages/rec_9");
    }

    #[tokio::test]
    async fn shortener_transport_failure_skips_document_store() {
        let client = Arc::new(MockClient::new(vec![refused()]));

        let result = pipeline(&client).process_payload(&payload(true)).await;

        assert_eq!(
            result,
            PipelineResult::ShortenFailed {
                http_status: None,
                raw_body: String::new(),
            }
        );
        assert_eq!(client.calls(), 1);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn malformed_json_makes_no_calls() {
        let client = Arc::new(MockClient::unused());

        let result = pipeline(&client).process_payload(b"{not json").await;

        assert!(matches!(result, PipelineResult::ValidationFailed { .. }));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn missing_properties_makes_no_calls() {
        let client = Arc::new(MockClient::unused());

        let result = pipeline(&client)
            .process_payload(br#"{"data":{"id":"rec_1"}}"#)
            .await;

        assert!(matches!(result, PipelineResult::ValidationFailed { .. }));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn empty_order_id_makes_no_calls() {
        let client = Arc::new(MockClient::unused());
        let event = WebhookEvent::new("https://pay.example/", "").with_record_id("rec_1");

        let result = pipeline(&client).run(&event).await;

        match result {
            PipelineResult::ValidationFailed { reason } => assert!(reason.contains("訂單編號")),
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn blank_payment_url_makes_no_calls() {
        let client = Arc::new(MockClient::unused());
        let event = WebhookEvent::new("  ", "ORD100");

        let result = pipeline(&client).run(&event).await;

        assert!(matches!(result, PipelineResult::ValidationFailed { .. }));
        assert_eq!(client.calls(), 0);
    }
}

mod padded_event {
    use super::*;

    #[tokio::test]
    async fn padded_values_are_trimmed_before_any_call() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, PAGE),
        ]));
        let event = WebhookEvent {
            record_id: Some(" rec_1 ".to_string()),
            payment_url: " https://pay.example/?key=abc\n".to_string(),
            order_id: "  ORD100 ".to_string(),
            existing_short_url: None,
        };

        let result = pipeline(&client).run(&event).await;

        assert!(result.is_success());
        let form = client.form_body(0);
        assert!(form.contains(&("keyword".to_string(), "ORD100".to_string())));
        assert!(form.contains(&("url".to_string(), "https://pay.example/?key=abc".to_string())));
        let requests = client.captured_requests();
        assert_eq!(requests[1].url.as_str(), "https://api.notion.com/v1/pages/rec_1");
    }

    #[tokio::test]
    async fn whitespace_order_id_set_directly_makes_no_calls() {
        let client = Arc::new(MockClient::unused());
        let event = WebhookEvent {
            record_id: None,
            payment_url: "https://pay.example/".to_string(),
            order_id: " \t ".to_string(),
            existing_short_url: None,
        };

        let result = pipeline(&client).run(&event).await;

        assert!(matches!(result, PipelineResult::ValidationFailed { .. }));
        assert_eq!(client.calls(), 0);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn shortener_error_body_is_preserved() {
        let client = Arc::new(MockClient::new(vec![respond(403, r#"{"message":"Please log in"}"#)]));

        let result = pipeline(&client).process_payload(&payload(true)).await;

        assert_eq!(
            result,
            PipelineResult::ShortenFailed {
                http_status: Some(403),
                raw_body: r#"{"message":"Please log in"}"#.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn no_matching_page_is_record_not_found() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, EMPTY),
            respond(200, EMPTY),
            respond(200, EMPTY),
        ]));

        let result = pipeline(&client).process_payload(&payload(false)).await;

        assert_eq!(
            result,
            PipelineResult::RecordNotFound {
                order_id: "ORD100".to_string(),
            }
        );
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test]
    async fn rejected_patch_is_patch_failed() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(404, r#"{"object":"error","status":404}"#),
        ]));

        let result = pipeline(&client).process_payload(&payload(true)).await;

        assert_eq!(
            result,
            PipelineResult::PatchFailed {
                http_status: Some(404),
                raw_body: r#"{"object":"error","status":404}"#.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn existing_short_link_does_not_short_circuit() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, PAGE),
        ]));
        let event = WebhookEvent::new("https://pay.example/?key=abc", "ORD100")
            .with_record_id("rec_1")
            .with_existing_short_url("https://s.ex/old");

        let result = pipeline(&client).run(&event).await;

        assert!(result.is_success());
        assert_eq!(client.calls(), 2);
    }
}

mod observer_hooks {
    use super::*;

    #[tokio::test]
    async fn success_visits_every_stage_then_succeeds() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, PAGE),
        ]));
        let pipeline = pipeline(&client);

        pipeline.process_payload(&payload(true)).await;

        assert_eq!(
            pipeline.observer().calls(),
            vec![
                "enter:validating",
                "enter:shortening",
                "enter:locating",
                "enter:patching",
                "success:https://s.ex/ORD100",
            ]
        );
    }

    #[tokio::test]
    async fn failure_reports_failing_stage_only_once() {
        let client = Arc::new(MockClient::new(vec![refused()]));
        let pipeline = pipeline(&client);

        pipeline.process_payload(&payload(true)).await;

        assert_eq!(
            pipeline.observer().calls(),
            vec!["enter:validating", "enter:shortening", "fail:shortening"]
        );
    }

    #[tokio::test]
    async fn validation_failure_never_enters_later_stages() {
        let client = Arc::new(MockClient::unused());
        let pipeline = pipeline(&client);

        pipeline.process_payload(b"[]").await;

        assert_eq!(
            pipeline.observer().calls(),
            vec!["enter:validating", "fail:validating"]
        );
    }

    #[tokio::test]
    async fn composed_observers_both_run() {
        let client = Arc::new(MockClient::new(vec![refused()]));
        let pipeline = Pipeline::new(client.clone(), settings())
            .with_observer((Recorder::default(), Some(Recorder::default())));

        pipeline.process_payload(&payload(true)).await;

        let (first, second) = pipeline.observer();
        assert_eq!(first.calls(), second.as_ref().unwrap().calls());
        assert_eq!(first.calls().last().map(String::as_str), Some("fail:shortening"));
    }

    #[tokio::test]
    async fn absent_observer_is_skipped() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, SHORTENED),
            respond(200, PAGE),
        ]));
        let pipeline =
            Pipeline::new(client.clone(), settings()).with_observer(None::<Recorder>);

        let result = pipeline.process_payload(&payload(true)).await;

        assert!(result.is_success());
        assert!(pipeline.observer().is_none());
    }
}
