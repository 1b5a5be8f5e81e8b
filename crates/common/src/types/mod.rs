use serde::{Deserialize, Serialize};

/// Plain-text body served at `/` for liveness probes.
pub const LIVENESS_MESSAGE: &str = "car doctor server is running";

/// `{"message": ...}` body used by fixed auth rejections and API errors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
