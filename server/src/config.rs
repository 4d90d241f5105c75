use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::suggest::SuggestConfig;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "grocery-server",
    about = "Serves the grocery list UI, persists the list and proxies suggestions"
)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "GROCERY_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory holding the built UI (index.html and assets).
    #[arg(long, env = "GROCERY_DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// File the save endpoint overwrites with the posted list.
    #[arg(long, env = "GROCERY_SAVE_PATH", default_value = "groceryList.json")]
    pub save_path: PathBuf,

    /// File backing the /api/items collection.
    #[arg(long, env = "GROCERY_ITEMS_PATH", default_value = "grocery-items.json")]
    pub items_path: PathBuf,

    /// Bearer token for the chat-completion API. Suggestions are disabled without it.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    #[arg(long, env = "GROCERY_CHAT_MODEL", default_value = "gpt-4o-mini")]
    pub chat_model: String,

    #[arg(long, env = "GROCERY_IMAGE_MODEL", default_value = "dall-e-2")]
    pub image_model: String,

    /// Timeout for each suggestion API call, in seconds.
    #[arg(long, env = "GROCERY_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Cli {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Suggestion client settings, or `None` when no usable API key is set.
    pub fn suggest_config(&self) -> Option<SuggestConfig> {
        let api_key = self.openai_api_key.as_deref().map(str::trim)?;
        if api_key.is_empty() {
            return None;
        }
        Some(SuggestConfig {
            api_key: api_key.to_string(),
            base_url: self.openai_base_url.trim_end_matches('/').to_string(),
            chat_model: self.chat_model.clone(),
            image_model: self.image_model.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}
