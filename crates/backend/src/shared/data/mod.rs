pub mod db;
pub mod json_column;
pub mod page;
