pub mod error;
pub mod extract;
pub mod insert;
pub mod metrics;
pub mod migrator;
pub mod progress;
pub mod run;
pub mod schema;
