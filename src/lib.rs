pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod parser;
pub mod schema;
pub mod server;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use lookup::{AlumniMatch, LookupService, ProficiencyRank, ReadOutcome};
