use grocery_common::item::GroceryItem;
use grocery_server_integration::{TestServer, INDEX_HTML};
use serde_json::json;

/// The posted body lands on disk verbatim, pretty-printed, keys in posted order.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn save_endpoint_writes_posted_json() {
    let server = TestServer::start().await;
    let body = json!([
        {"name": "Milk", "id": 1722000000000u64, "completed": false},
        {"name": "Eggs", "id": 1722000000001u64, "completed": true, "quantity": 12}
    ]);

    let resp = server.post_json("/api/saveGroceryList", &body).await;
    assert_eq!(resp.status(), 200);
    let reply: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(reply, json!({"message": "Grocery list saved successfully"}));

    let written = std::fs::read_to_string(server.save_path()).unwrap();
    assert_eq!(written, serde_json::to_string_pretty(&body).unwrap());
    assert!(written.starts_with("[\n  {\n    \"name\": \"Milk\""));
}

/// Each save replaces the previous file wholesale.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn later_save_overwrites_earlier_one() {
    let server = TestServer::start().await;
    server
        .post_json("/api/saveGroceryList", &json!([{"name": "Milk"}]))
        .await;
    server
        .post_json("/api/saveGroceryList", &json!({"empty": true}))
        .await;

    let written = std::fs::read_to_string(server.save_path()).unwrap();
    assert_eq!(written, "{\n  \"empty\": true\n}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn items_survive_restart() {
    let server = TestServer::start().await;
    let resp = server
        .post_json("/api/items", &json!({"name": "Coffee", "quantity": 2}))
        .await;
    assert_eq!(resp.status(), 201);
    let coffee: GroceryItem = resp.json().await.unwrap();

    let restarted = server.restart().await;
    let items: Vec<GroceryItem> = restarted.get("/api/items").await.json().await.unwrap();
    assert_eq!(items, vec![coffee]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_routes_fall_back_to_index() {
    let server = TestServer::start().await;
    for path in ["/", "/supermarkets", "/compare"] {
        let resp = server.get(path).await;
        assert_eq!(resp.status(), 200, "GET {path}");
        assert_eq!(resp.text().await.unwrap(), INDEX_HTML);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_reports_suggestions_disabled_without_key() {
    let server = TestServer::start().await;
    let health: serde_json::Value = server.get("/health").await.json().await.unwrap();
    assert_eq!(health, json!({"status": "ok", "suggestions_enabled": false}));

    let resp = server
        .post_json("/api/suggestions/dish", &json!({"items": ["Rice"]}))
        .await;
    assert_eq!(resp.status(), 503);
}
