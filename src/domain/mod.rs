pub mod entities;
pub mod metrics;
