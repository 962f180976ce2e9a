mod config;
mod probe;
mod search;
mod serve;

pub use config::ConfigCommand;
pub use probe::ProbeArgs;
pub use search::SearchArgs;
pub use serve::ServeArgs;

pub use config::handle_config;
pub use probe::handle_probe;
pub use search::handle_search;
pub use serve::handle_serve;
