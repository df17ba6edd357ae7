mod no_store;
mod requests_logging;

pub use no_store::no_store;
pub use requests_logging::{log_requests, token_preview, RequestsLoggingLevel};
