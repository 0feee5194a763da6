use serde::de::DeserializeOwned;

use crate::Result;
use crate::http::types::Status;

pub struct Response {
    pub status: Status,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: String) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON. An empty body parses as `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }
}
