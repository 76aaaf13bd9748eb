pub mod row;
pub mod window;
