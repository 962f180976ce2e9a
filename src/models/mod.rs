mod chat;
mod config;
mod document;
mod search;

pub use chat::{ChatConfig, ChatRequest, ChatResponse, Usage};
pub use config::{
    ChatSettings, Config, DEFAULT_CHAT_PATH, DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_MODEL,
    DEFAULT_MODEL_VERSION, DEFAULT_PORT, LogConfig, ResolvedConfig, SearchConfig, ServerConfig,
};
pub use document::IndexedDocument;
pub use search::{OutputFormat, SearchResults, SearchView};
