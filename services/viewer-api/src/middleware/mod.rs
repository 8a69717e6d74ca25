// Request logging middleware
pub mod logging;

pub use logging::{request_logging_middleware, RequestLoggingConfig, X_RESPONSE_TIME_MS};
