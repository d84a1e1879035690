//! Wire shapes shared by the handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::validation::{FieldErrors, Input};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Body of a 500: what failed, and the chained cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureBody {
    pub message: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationBody {
    pub errors: FieldErrors,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookListQuery {
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl BookListQuery {
    pub fn into_input(self) -> Input {
        let mut input = Input::new();
        if let Some(per_page) = self.per_page {
            input.insert("per_page".to_string(), Value::String(per_page));
        }
        if let Some(page) = self.page {
            input.insert("page".to_string(), Value::String(page));
        }
        input
    }
}
