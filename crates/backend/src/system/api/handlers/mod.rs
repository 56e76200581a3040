// Authentication handlers
pub mod auth;

// Sidebar of the signed-in user
pub mod navigation;

// User management handlers
pub mod users;
