use serde::Deserialize;

/// `GET /client/time`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientTimeResponse {
    pub time: serde_json::Value,
}

/// `GET /node/timestamp`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NodeTimestampResponse {
    pub timestamp: f64,
}

/// `GET /device/{id}/controls/{module}/{action}`
#[derive(Debug, Clone, Deserialize)]
pub struct ControlResponse {
    pub status: String,
}

impl ClientTimeResponse {
    /// Strings are shown verbatim; numbers are epoch milliseconds.
    pub fn display(&self) -> String {
        match &self.time {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Number(millis) => millis
                .as_f64()
                .map(|millis| crate::dashboard_client::helpers::format_utc(millis / 1000.0))
                .unwrap_or_else(|| millis.to_string()),
            other => other.to_string(),
        }
    }
}
