pub mod create;
pub mod introspect;
