/// Middleware module
///
/// Request logging and the file server visit counter.

mod metrics;
mod request_logger;

pub use metrics::{FileserverHits, HitCounter};
pub use request_logger::RequestLogger;
