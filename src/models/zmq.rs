use serde::{Deserialize, Serialize};

/// Message handed to the emailer service over ZeroMQ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ZmqEmailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
}
