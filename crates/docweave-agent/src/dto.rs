//! Request-surface payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Incoming command request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Outcome of one command.
///
/// Three wire shapes: an executed plan (`message` + `result`), an advisory
/// answer with no plan executed (`message` only), or a failure (`error`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandResponse {
    /// Plan executed to completion; carries the last step's result.
    Completed { message: String, result: Value },
    /// Advisory message; no plan was executed.
    Advisory { message: String },
    /// Validation, planning, or tool failure.
    Error { error: String },
}

impl CommandResponse {
    pub fn completed(result: Value) -> Self {
        Self::Completed {
            message: "Execution complete".to_string(),
            result,
        }
    }

    pub fn advisory(message: impl Into<String>) -> Self {
        Self::Advisory {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_response_wire_shape() {
        let response = CommandResponse::completed(json!({"output_file_path": "output/merged.docx"}));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "message": "Execution complete",
                "result": {"output_file_path": "output/merged.docx"}
            })
        );
    }

    #[test]
    fn test_untagged_variants_deserialize_distinctly() {
        let completed: CommandResponse =
            serde_json::from_value(json!({"message": "Execution complete", "result": null}))
                .unwrap();
        assert!(matches!(completed, CommandResponse::Completed { .. }));

        let advisory: CommandResponse =
            serde_json::from_value(json!({"message": "I can merge documents."})).unwrap();
        assert_eq!(advisory, CommandResponse::advisory("I can merge documents."));

        let error: CommandResponse =
            serde_json::from_value(json!({"error": "No command provided."})).unwrap();
        assert!(error.is_error());
    }
}
