pub mod pagination;

use serde::{Deserialize, Serialize};

/// Body of every error response: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
