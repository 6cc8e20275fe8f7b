use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use matchbook_core::commands::reconcile::{self, ReconcileOptions};
use matchbook_core::{CoreResult, SuccessEnvelope};
use serde_json::{Value, json};
use tempfile::{Builder, TempDir};

pub fn temp_workspace(prefix: &str) -> io::Result<TempDir> {
    Builder::new().prefix(prefix).tempdir()
}

/// The three-entry purchase order database the flow tests run against.
pub fn standard_po_database() -> Value {
    json!({
        "purchase_orders": [
            {
                "po_number": "PO-2024-001",
                "supplier": "Northern Steel Supplies Ltd",
                "order_date": "2024-01-12",
                "currency": "GBP",
                "line_items": [
                    {"item_code": "NSS-40", "description": "Galvanized steel brackets 40mm",
                     "quantity": 100.0, "unit": "each", "unit_price": 2.5, "line_total": 250.0},
                    {"item_code": "NSS-M8", "description": "Stainless hex bolts M8",
                     "quantity": 500.0, "unit": "each", "unit_price": 0.12, "line_total": 60.0}
                ],
                "total": 310.0
            },
            {
                "po_number": "PO-2024-002",
                "supplier": "Office Interiors Plc",
                "order_date": "2024-02-03",
                "currency": "GBP",
                "line_items": [
                    {"item_code": "OI-CH1", "description": "Premium office chair, adjustable",
                     "quantity": 10.0, "unit": "each", "unit_price": 85.0, "line_total": 850.0},
                    {"item_code": "OI-DF2", "description": "Standing desk frame",
                     "quantity": 5.0, "unit": "each", "unit_price": 140.0, "line_total": 700.0}
                ],
                "total": 1550.0
            },
            {
                "po_number": "PO-2024-005",
                "supplier": "Thames Valley Catering Ltd",
                "order_date": "2024-03-18",
                "currency": "GBP",
                "line_items": [
                    {"item_code": "TVC-EM", "description": "Commercial espresso machine",
                     "quantity": 1.0, "unit": "each", "unit_price": 950.0, "line_total": 950.0},
                    {"item_code": "TVC-MJ", "description": "Barista milk jugs 1L",
                     "quantity": 6.0, "unit": "each", "unit_price": 8.5, "line_total": 51.0}
                ],
                "total": 1001.0
            }
        ]
    })
}

pub fn write_po_database(dir: &Path, database: &Value) -> PathBuf {
    let path = dir.join("purchase_orders.json");
    let written = fs::write(&path, database.to_string());
    assert!(written.is_ok());
    path
}

pub fn write_invoice(dir: &Path, invoice: &Value) -> PathBuf {
    let path = dir.join("invoice.json");
    let written = fs::write(&path, invoice.to_string());
    assert!(written.is_ok());
    path
}

pub fn run_reconcile(invoice_path: &Path, po_source: &Path) -> CoreResult<SuccessEnvelope> {
    run_reconcile_with(invoice_path, po_source, ReconcileOptions::default())
}

pub fn run_reconcile_with(
    invoice_path: &Path,
    po_source: &Path,
    overrides: ReconcileOptions,
) -> CoreResult<SuccessEnvelope> {
    reconcile::run(ReconcileOptions {
        invoice_path: invoice_path.display().to_string(),
        po_source: po_source.display().to_string(),
        ..overrides
    })
}

pub fn findings_of_kind<'a>(data: &'a Value, kind: &str) -> Vec<&'a Value> {
    data.get("discrepancies")
        .and_then(Value::as_array)
        .map(|findings| {
            findings
                .iter()
                .filter(|finding| finding["type"] == json!(kind))
                .collect()
        })
        .unwrap_or_default()
}
