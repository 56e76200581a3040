pub mod aggregate;
pub mod lifecycle;
