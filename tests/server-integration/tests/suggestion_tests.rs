use grocery_server_integration::{MockReply, TestServer, TEST_API_KEY};
use serde_json::{json, Value};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn item_suggestion_is_trimmed_and_prompt_lists_items() {
    let server = TestServer::with_suggestions().await;
    server
        .mock()
        .reply_with(MockReply::Content("  Butter\n".into()));

    let resp = server
        .post_json("/api/suggestions/item", &json!({"items": ["Milk", "Bread"]}))
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"suggestion": "Butter"}));

    let upstream = server.mock().last_request();
    assert_eq!(upstream.path, "/chat/completions");
    assert_eq!(
        upstream.authorization.as_deref(),
        Some(format!("Bearer {TEST_API_KEY}").as_str())
    );
    assert_eq!(upstream.body["model"], "gpt-4o-mini");
    assert_eq!(upstream.body["messages"][0]["role"], "system");
    assert_eq!(
        upstream.body["messages"][1]["content"],
        "Based on the current grocery list: Milk, Bread, suggest a recommended item."
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dish_suggestion() {
    let server = TestServer::with_suggestions().await;
    server
        .mock()
        .reply_with(MockReply::Content("Pancakes".into()));

    let body: Value = server
        .post_json("/api/suggestions/dish", &json!({"items": ["Flour", "Eggs"]}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["suggestion"], "Pancakes");

    let prompt = server.mock().last_request().body["messages"][1]["content"].clone();
    assert!(prompt
        .as_str()
        .unwrap()
        .contains("Flour, Eggs, suggest a dish"));
}

/// Comma-separated reply becomes trimmed names; blank tokens disappear.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ingredients_are_split_and_trimmed() {
    let server = TestServer::with_suggestions().await;
    server
        .mock()
        .reply_with(MockReply::Content("flour, sugar , ,butter,".into()));

    let body: Value = server
        .post_json(
            "/api/suggestions/ingredients",
            &json!({"dish": "Shortbread", "items": ["Milk"]}),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"ingredients": ["flour", "sugar", "butter"]}));

    let prompt = server.mock().last_request().body["messages"][1]["content"].clone();
    assert_eq!(
        prompt,
        "Provide a list of ingredients for Shortbread. Only include ingredients that are not already in this list: Milk."
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn image_returns_first_url() {
    let server = TestServer::with_suggestions().await;
    server
        .mock()
        .reply_with(MockReply::Content("https://img.test/butter.png".into()));

    let body: Value = server
        .post_json("/api/suggestions/image", &json!({"item": "Butter"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"url": "https://img.test/butter.png"}));

    let upstream = server.mock().last_request();
    assert_eq!(upstream.path, "/images/generations");
    assert_eq!(upstream.body["model"], "dall-e-2");
    assert_eq!(upstream.body["n"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upstream_failure_becomes_generic_502() {
    let server = TestServer::with_suggestions().await;

    for reply in [
        MockReply::Status(500),
        MockReply::Status(401),
        MockReply::Garbage,
        MockReply::Content("   ".into()),
    ] {
        server.mock().reply_with(reply.clone());
        let resp = server
            .post_json("/api/suggestions/item", &json!({"items": []}))
            .await;
        assert_eq!(resp.status(), 502, "{reply:?}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(
            body,
            json!({"error": "Failed to fetch recommended item. Please try again."})
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_reports_suggestions_enabled() {
    let server = TestServer::with_suggestions().await;
    let health: Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(health["suggestions_enabled"], true);
}
