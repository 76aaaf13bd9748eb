pub mod destination;
pub mod encoder;
pub mod error;
pub mod query;
pub mod source;
