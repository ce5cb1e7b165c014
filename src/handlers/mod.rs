pub mod portfolio;
pub mod sentiment;
pub mod system;

use serde::Serialize;

/// `{"status": "success", ...body, "timestamp": ...}`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub status: &'static str,
    #[serde(flatten)]
    pub body: T,
    pub timestamp: String,
}

impl<T> Success<T> {
    pub fn new(body: T, timestamp: String) -> Self {
        Self {
            status: "success",
            body,
            timestamp,
        }
    }
}
