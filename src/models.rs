use serde::{Deserialize, Serialize};

// JSON body for ping replies and rejections
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub status: String, // "successful" or "failed"
    pub body: String,
}

impl Message {
    pub fn successful(body: impl Into<String>) -> Self {
        Self {
            status: "successful".to_string(),
            body: body.into(),
        }
    }

    pub fn failed(body: impl Into<String>) -> Self {
        Self {
            status: "failed".to_string(),
            body: body.into(),
        }
    }
}
