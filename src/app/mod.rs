//! Application layer: environment resolution and connection orchestration.

pub mod resolver;
pub mod service;

pub use service::ProbeService;
