pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh_token;
