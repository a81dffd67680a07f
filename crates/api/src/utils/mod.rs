pub mod health;
pub mod logging;

pub use health::HealthStatus;
pub use logging::{init_tracing, LogFormat};
