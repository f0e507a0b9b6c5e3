//! Chat-client boundary: inbound updates, outbound port, and decorators.

pub mod port;
pub mod throttled;
pub mod types;
