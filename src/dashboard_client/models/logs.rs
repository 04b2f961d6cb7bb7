use serde::{Deserialize, Serialize};

/// Complete current log tail of one device. Each fetch replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogBuffer {
    #[serde(default)]
    pub logs: Vec<String>,
}

impl LogBuffer {
    pub fn lines(&self) -> &[String] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}
