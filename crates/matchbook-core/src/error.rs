use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::records::SourceIssue;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CoreError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl CoreError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `matchbook {cmd} --help` for usage."),
            None => "Run `matchbook --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn po_source_not_found(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "po_source_not_found",
            &format!("Purchase order database was not found at `{location}`."),
            vec![
                "Check the path passed via `--po-db`.".to_string(),
                "Export the purchase order database from your procurement system first."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn po_source_unreadable(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "po_source_unreadable",
            &format!("Purchase order database at `{location}` could not be read: {detail}"),
            vec![format!("Grant read access to `{location}` and retry.")],
        )
    }

    pub fn po_source_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "po_source_invalid",
            &format!("Purchase order database at `{location}` is not valid: {detail}"),
            vec![
                "Provide a JSON object with a top-level `purchase_orders` array.".to_string(),
                "Run `matchbook po list --help` to review the expected shape.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn po_not_found(po_number: &str) -> Self {
        Self::new(
            "po_not_found",
            &format!("Purchase order `{po_number}` was not found in the database."),
            vec![
                "Run `matchbook po list` to see the loaded purchase orders.".to_string(),
                "Retry with `matchbook po show <po-number>`.".to_string(),
            ],
        )
        .with_data(json!({
            "po_number": po_number,
        }))
    }

    pub fn invoice_source_not_found(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "invoice_source_not_found",
            &format!("Invoice record was not found at `{location}`."),
            vec![
                "Check the invoice path passed to `matchbook reconcile`.".to_string(),
                "Run your extraction step first and point at its JSON output.".to_string(),
            ],
        )
    }

    pub fn invoice_source_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "invoice_source_invalid",
            &format!("Invoice record at `{location}` is not valid: {detail}"),
            vec![
                "Provide one JSON object with the extracted invoice fields.".to_string(),
                "Run `matchbook reconcile --help` to review the expected fields.".to_string(),
            ],
        )
    }

    pub fn po_source_rejected(path: &Path, issues: Vec<SourceIssue>) -> Self {
        let location = path.display().to_string();
        let issue_count = issues.len();
        Self::new(
            "po_source_rejected",
            &format!(
                "Purchase order database at `{location}` has no usable entries: {issue_count} entries failed validation."
            ),
            vec![
                "Fix the listed entries in the database file.".to_string(),
                "Rerun the command once at least one entry validates.".to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
            "issues": issues,
        }))
    }

    pub fn export_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "export_write_failed",
            &format!("Findings export to `{location}` failed: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or choose a different `--export` path."
            )],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
