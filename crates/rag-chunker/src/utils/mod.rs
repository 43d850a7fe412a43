pub mod error;
pub mod logger;
pub mod metrics;

pub use error::ChunkerError;
pub use logger::init_logger;
pub use metrics::{Metrics, Timer};
