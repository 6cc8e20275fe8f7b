mod validate;

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::records::{PurchaseOrder, SourceIssue};
use crate::{CoreError, CoreResult};

/// In-memory index over one purchase order database file.
///
/// Loaded once per run, validated at the boundary, read-only afterwards.
/// Collections are small, so exact lookup is a linear scan over load order.
#[derive(Debug, Clone)]
pub struct PoStore {
    orders: Vec<PurchaseOrder>,
    issues: Vec<SourceIssue>,
}

impl PoStore {
    pub fn load(path: &Path) -> CoreResult<Self> {
        let raw = fs::read_to_string(path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => CoreError::po_source_not_found(path),
            _ => CoreError::po_source_unreadable(path, &error.to_string()),
        })?;

        let document = serde_json::from_str::<Value>(&raw)
            .map_err(|error| CoreError::po_source_invalid(path, &error.to_string()))?;
        let Some(entries) = document.get("purchase_orders").and_then(Value::as_array) else {
            return Err(CoreError::po_source_invalid(
                path,
                "expected a top-level `purchase_orders` array",
            ));
        };

        let validated = validate::validate_entries(entries);
        if validated.orders.is_empty() && !validated.issues.is_empty() {
            return Err(CoreError::po_source_rejected(path, validated.issues));
        }

        Ok(Self {
            orders: validated.orders,
            issues: validated.issues,
        })
    }

    /// Wraps an already-validated collection; `load` is the validating path.
    pub fn from_orders(orders: Vec<PurchaseOrder>) -> Self {
        Self {
            orders,
            issues: Vec::new(),
        }
    }

    /// First exact match on `po_number`, in load order.
    pub fn get_by_number(&self, po_number: &str) -> Option<&PurchaseOrder> {
        self.orders
            .iter()
            .find(|order| order.po_number == po_number)
    }

    /// All validated orders in stable load order.
    pub fn orders(&self) -> &[PurchaseOrder] {
        &self.orders
    }

    /// Entries quarantined during load-time validation.
    pub fn issues(&self) -> &[SourceIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
