//! Read path: ranked alumni lookup by skill and the skill catalog

pub mod query;
pub mod service;
pub mod types;

pub use service::LookupService;
pub use types::*;
