use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field `{0}` is required")]
    Required(&'static str),
}

/// Comment input bound to the single-post page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageForm {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub like: i32,
    // Carried with the form, never read on submission.
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
}

impl MessageForm {
    pub fn new(msg: impl Into<String>) -> Self {
        MessageForm {
            msg: msg.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.msg.is_empty() {
            return Err(FormError::Required("msg"));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl Default for MessageForm {
    fn default() -> Self {
        MessageForm {
            msg: String::new(),
            like: 0,
            date: Utc::now(),
        }
    }
}
