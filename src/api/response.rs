use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Request bodies
// ============================================================================

/// Body of the create call. The URL always comes from the uploader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub title: String,
    pub description: String,
    pub url: String,
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordResponse {
    pub success: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CreateRecordResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            extra: HashMap::new(),
        }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            extra: HashMap::new(),
        }
    }
}

/// One item of the records list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Creation timestamp as reported by the API, opaque to the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// Cursor-paginated slice of the records list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub data: Vec<Record>,
    #[serde(default)]
    pub after: Option<String>,
}
