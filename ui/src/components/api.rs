//! WASM HTTP client for the grocery server.
//!
//! Suggestions always go through the server (it holds the API key). The item
//! collection is only used when the `use-server` feature is on. Server URL
//! comes from `GROCERY_SERVER_URL` at compile time; empty means same origin.

use grocery_common::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use grocery_common::store::{ItemStore, StoreError};
use serde::{Deserialize, Serialize};

fn server_url() -> String {
    option_env!("GROCERY_SERVER_URL")
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string()
}

// ─── Request/Response types ──────────────────────────────────────────────────

#[derive(Serialize)]
struct ListContext<'a> {
    items: &'a [String],
}

#[derive(Serialize)]
struct IngredientsRequest<'a> {
    dish: &'a str,
    items: &'a [String],
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    item: &'a str,
}

#[derive(Deserialize)]
struct SuggestionResponse {
    suggestion: String,
}

#[derive(Deserialize)]
struct IngredientsResponse {
    ingredients: Vec<String>,
}

#[derive(Deserialize)]
struct ImageResponse {
    url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Raw reply: status code and body text.
struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    fn into_result(self) -> Result<String, String> {
        if self.status < 400 {
            return Ok(self.body);
        }
        match serde_json::from_str::<ErrorResponse>(&self.body) {
            Ok(e) => Err(e.error),
            Err(_) => Err(format!("HTTP {}", self.status)),
        }
    }
}

async fn post<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Reply, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    fetch(&format!("{}{}", server_url(), path), "POST", Some(body)).await
}

async fn post_for<B, T>(path: &str, body: &B) -> Result<T, String>
where
    B: Serialize + ?Sized,
    T: serde::de::DeserializeOwned,
{
    let text = post(path, body).await?.into_result()?;
    serde_json::from_str(&text).map_err(|e| format!("Parse {path} response: {e}"))
}

// ─── Suggestions ─────────────────────────────────────────────────────────────

pub async fn suggest_item(names: &[String]) -> Result<String, String> {
    let resp: SuggestionResponse =
        post_for("/api/suggestions/item", &ListContext { items: names }).await?;
    Ok(resp.suggestion)
}

pub async fn suggest_dish(names: &[String]) -> Result<String, String> {
    let resp: SuggestionResponse =
        post_for("/api/suggestions/dish", &ListContext { items: names }).await?;
    Ok(resp.suggestion)
}

pub async fn dish_ingredients(dish: &str, names: &[String]) -> Result<Vec<String>, String> {
    let resp: IngredientsResponse = post_for(
        "/api/suggestions/ingredients",
        &IngredientsRequest { dish, items: names },
    )
    .await?;
    Ok(resp.ingredients)
}

pub async fn item_image(item: &str) -> Result<String, String> {
    let resp: ImageResponse = post_for("/api/suggestions/image", &ImageRequest { item }).await?;
    Ok(resp.url)
}

/// Hand the whole list to the server's save endpoint.
pub async fn save_snapshot(items: &[GroceryItem]) -> Result<(), String> {
    post("/api/saveGroceryList", items).await?.into_result()?;
    Ok(())
}

// ─── Item collection ─────────────────────────────────────────────────────────

/// Item store backed by the server's `/api/items` collection.
#[cfg_attr(not(feature = "use-server"), allow(dead_code))]
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoteStore;

fn remote(e: String) -> StoreError {
    StoreError::Remote(e)
}

fn parse<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, StoreError> {
    serde_json::from_str(text).map_err(|e| StoreError::Remote(format!("Parse response: {e}")))
}

async fn item_call(
    method: &str,
    path: &str,
    body: Option<String>,
) -> Result<Option<GroceryItem>, StoreError> {
    let reply = fetch(&format!("{}{}", server_url(), path), method, body)
        .await
        .map_err(remote)?;
    if reply.status == 404 {
        return Ok(None);
    }
    let text = reply.into_result().map_err(remote)?;
    parse(&text).map(Some)
}

impl ItemStore for RemoteStore {
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError> {
        let url = format!("{}/api/items", server_url());
        let text = fetch(&url, "GET", None)
            .await
            .and_then(Reply::into_result)
            .map_err(remote)?;
        parse(&text)
    }

    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError> {
        let text = post("/api/items", &item)
            .await
            .and_then(Reply::into_result)
            .map_err(remote)?;
        parse(&text)
    }

    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let url = format!("{}/api/items/{id}", server_url());
        let reply = fetch(&url, "DELETE", None).await.map_err(remote)?;
        if reply.status == 404 {
            return Ok(false);
        }
        reply.into_result().map_err(remote)?;
        Ok(true)
    }

    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError> {
        let body = serde_json::to_string(&patch).map_err(|e| StoreError::Remote(e.to_string()))?;
        item_call("PATCH", &format!("/api/items/{id}"), Some(body)).await
    }

    async fn toggle(&self, id: &ItemId) -> Result<Option<GroceryItem>, StoreError> {
        item_call("POST", &format!("/api/items/{id}/toggle"), None).await
    }
}

// ─── Transport ───────────────────────────────────────────────────────────────

#[cfg(target_family = "wasm")]
async fn fetch(url: &str, method: &str, body: Option<String>) -> Result<Reply, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let opts = web_sys::RequestInit::new();
    opts.set_method(method);
    opts.set_mode(web_sys::RequestMode::Cors);

    let has_body = body.is_some();
    if let Some(b) = body {
        opts.set_body(&wasm_bindgen::JsValue::from_str(&b));
    }

    let request = web_sys::Request::new_with_str_and_init(url, &opts)
        .map_err(|e| format!("Failed to create request: {:?}", e))?;

    if has_body {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| format!("Failed to set header: {:?}", e))?;
    }

    let window = web_sys::window().ok_or("No window")?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("Fetch failed: {:?}", e))?;

    let resp: web_sys::Response = resp_value
        .dyn_into()
        .map_err(|_| "Response is not a Response object".to_string())?;

    let text = JsFuture::from(
        resp.text()
            .map_err(|e| format!("Failed to get text: {:?}", e))?,
    )
    .await
    .map_err(|e| format!("Failed to read body: {:?}", e))?;

    Ok(Reply {
        status: resp.status(),
        body: text.as_string().unwrap_or_default(),
    })
}

#[cfg(not(target_family = "wasm"))]
async fn fetch(_url: &str, _method: &str, _body: Option<String>) -> Result<Reply, String> {
    Err("Server client only available in WASM".to_string())
}
