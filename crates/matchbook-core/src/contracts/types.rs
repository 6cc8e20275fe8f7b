use serde::Serialize;

use crate::records::{Discrepancy, MatchResult, PurchaseOrder};

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSummary {
    pub invoice_number: Option<String>,
    pub supplier_name: Option<String>,
    pub po_reference: Option<String>,
    pub currency: String,
    pub line_item_count: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub source: String,
    pub orders_loaded: i64,
    pub entries_quarantined: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileData {
    pub run_id: String,
    pub reconciled_at: String,
    pub invoice_path: String,
    pub extraction_confidence: f64,
    pub match_policy_version: String,
    pub tolerance_policy_version: String,
    pub invoice: InvoiceSummary,
    pub store: StoreSummary,
    pub match_result: MatchResult,
    pub discrepancies: Vec<Discrepancy>,
    pub escalation_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoListRow {
    pub po_number: String,
    pub supplier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub line_item_count: i64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoListData {
    pub store: StoreSummary,
    pub rows: Vec<PoListRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoShowData {
    pub store: StoreSummary,
    pub po: PurchaseOrder,
}
