pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod registry;
pub mod state;
pub mod sweeper;

pub use app::create_router;
pub use config::{Args, LimitScope, LimiterConfig};
pub use registry::ClientRegistry;
pub use state::AppState;
