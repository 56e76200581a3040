pub mod dispatch;
pub mod repository;
pub mod service;
