pub mod core;
pub mod v1;
