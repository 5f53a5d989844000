//! Tests for `RecordLocator` and `SearchStrategy`.

use std::sync::Arc;

use serde_json::json;

use super::{MatchMode, NotionSettings, RecordLocator, RecordMatch, SearchStrategy};
use crate::event::WebhookEvent;
use crate::test_fixtures::{MockClient, refused, respond};

const EMPTY: &str = r#"{"object":"list","results":[]}"#;

fn notion() -> NotionSettings {
    NotionSettings::new(
        url::Url::parse("https://api.notion.com/v1/").unwrap(),
        "secret",
        "2022-06-28",
        "db1",
    )
    .unwrap()
}

fn locator(client: &Arc<MockClient>) -> RecordLocator<Arc<MockClient>> {
    RecordLocator::new(client.clone(), notion(), "訂單編號")
}

fn event() -> WebhookEvent {
    WebhookEvent::new("https://pay.example/?key=abc", "ORD100")
}

fn results(ids: &[&str]) -> String {
    let pages: Vec<_> = ids.iter().map(|id| json!({ "object": "page", "id": id })).collect();
    json!({ "object": "list", "results": pages }).to_string()
}

mod strategy {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        assert_eq!(
            SearchStrategy::PRIORITY,
            [
                SearchStrategy::RichTextEquals,
                SearchStrategy::TitleEquals,
                SearchStrategy::RichTextContains,
            ]
        );
    }

    #[test]
    fn filters_target_order_property() {
        assert_eq!(
            SearchStrategy::RichTextEquals.filter("訂單編號", "ORD1"),
            json!({ "property": "訂單編號", "rich_text": { "equals": "ORD1" } })
        );
        assert_eq!(
            SearchStrategy::TitleEquals.filter("訂單編號", "ORD1"),
            json!({ "property": "訂單編號", "title": { "equals": "ORD1" } })
        );
        assert_eq!(
            SearchStrategy::RichTextContains.filter("訂單編號", "ORD1"),
            json!({ "property": "訂單編號", "rich_text": { "contains": "ORD1" } })
        );
    }

    #[test]
    fn display_names_filter_shape() {
        assert_eq!(SearchStrategy::TitleEquals.to_string(), "title.equals");
        assert_eq!(MatchMode::Fallback.to_string(), "fallback");
    }
}

mod direct {
    use super::*;

    #[tokio::test]
    async fn direct_id_is_returned_without_network_call() {
        let client = Arc::new(MockClient::unused());

        let found = locator(&client)
            .locate(&event().with_record_id("rec_1"))
            .await;

        assert_eq!(
            found,
            Some(RecordMatch {
                record_id: "rec_1".to_string(),
                mode: MatchMode::Direct,
                strategy: None,
            })
        );
        assert_eq!(client.calls(), 0);
    }
}

mod fallback {
    use super::*;

    #[tokio::test]
    async fn first_strategy_wins_and_stops_search() {
        // Strategy 3 would also match, but is never asked.
        let client = Arc::new(MockClient::new(vec![respond(200, &results(&["rec_exact"]))]));

        let found = locator(&client).locate(&event()).await.unwrap();

        assert_eq!(found.record_id, "rec_exact");
        assert_eq!(found.mode, MatchMode::Fallback);
        assert_eq!(found.strategy, Some(SearchStrategy::RichTextEquals));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn title_strategy_used_when_rich_text_is_empty() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, EMPTY),
            respond(200, &results(&["rec_9"])),
        ]));

        let found = locator(&client).locate(&event()).await.unwrap();

        assert_eq!(found.record_id, "rec_9");
        assert_eq!(found.strategy, Some(SearchStrategy::TitleEquals));
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn contains_strategy_is_last_resort() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, EMPTY),
            respond(200, EMPTY),
            respond(200, &results(&["rec_partial"])),
        ]));

        let found = locator(&client).locate(&event()).await.unwrap();

        assert_eq!(found.strategy, Some(SearchStrategy::RichTextContains));
        assert_eq!(found.record_id, "rec_partial");
    }

    #[tokio::test]
    async fn first_result_is_selected_among_ties() {
        let client = Arc::new(MockClient::new(vec![respond(
            200,
            &results(&["rec_a", "rec_b"]),
        )]));

        let found = locator(&client).locate(&event()).await.unwrap();

        assert_eq!(found.record_id, "rec_a");
    }

    #[tokio::test]
    async fn all_strategies_empty_is_not_found() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, EMPTY),
            respond(200, EMPTY),
            respond(200, EMPTY),
        ]));

        assert_eq!(locator(&client).locate(&event()).await, None);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn failing_queries_count_as_empty() {
        // Notion rejects a title filter on a rich_text column with 400.
        let client = Arc::new(MockClient::new(vec![
            respond(200, EMPTY),
            respond(400, r#"{"object":"error","code":"validation_error"}"#),
            refused(),
        ]));

        assert_eq!(locator(&client).locate(&event()).await, None);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn unreadable_body_counts_as_empty() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, "not json"),
            respond(200, r#"{"results":[{"id":"rec_2"}]}"#),
        ]));

        let found = locator(&client).locate(&event()).await.unwrap();

        assert_eq!(found.record_id, "rec_2");
    }

    #[tokio::test]
    async fn queries_post_filters_in_priority_order() {
        let client = Arc::new(MockClient::new(vec![
            respond(200, EMPTY),
            respond(200, EMPTY),
            respond(200, EMPTY),
        ]));

        locator(&client).locate(&event()).await;

        let requests = client.captured_requests();
        assert!(requests.iter().all(|r| r.method == http::Method::POST));
        assert_eq!(
            requests[0].url.as_str(),
            "https://api.notion.com/v1/databases/db1/query"
        );
        assert_eq!(
            client.json_body(0)["filter"],
            json!({ "property": "訂單編號", "rich_text": { "equals": "ORD100" } })
        );
        assert_eq!(
            client.json_body(1)["filter"],
            json!({ "property": "訂單編號", "title": { "equals": "ORD100" } })
        );
        assert_eq!(
            client.json_body(2)["filter"],
            json!({ "property": "訂單編號", "rich_text": { "contains": "ORD100" } })
        );
    }
}
