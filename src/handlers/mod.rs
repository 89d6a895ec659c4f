mod health;
mod metrics;
mod ping;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use ping::{PING_REPLY, ping_handler};
