mod index_loader;
pub mod providers;
mod responder;
mod search;

pub use index_loader::{IndexLoader, IndexSource, parse_index};
pub use providers::{Clock, IdGenerator, Latency, Providers};
pub use responder::{
    FALLBACK_RESPONSE, GREETING_RESPONSE, INTERNAL_CONTACT, PROTECTED_CONFIG, Probe, SECRET_CODE,
    classify, generate_response,
};
pub use search::{MAX_RESULTS, MIN_QUERY_LEN, SearchSession, filter_documents};
