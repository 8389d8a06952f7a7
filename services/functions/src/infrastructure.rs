// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod payload_observer;

// Re-exports
pub use config::HandlerConfig;
pub use logging::init_logging;
pub use payload_observer::{PayloadObserver, TracingPayloadObserver};
