use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    pub item_code: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    pub line_total: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            item_code: None,
            description: String::new(),
            quantity: 0.0,
            unit: String::new(),
            unit_price: 0.0,
            line_total: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_address: Option<String>,
    pub supplier_vat: Option<String>,
    pub po_reference: Option<String>,
    pub payment_terms: Option<String>,
    pub currency: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub vat_amount: f64,
    pub vat_rate: f64,
    pub total: f64,
}

impl Default for InvoiceRecord {
    fn default() -> Self {
        Self {
            invoice_number: None,
            invoice_date: None,
            supplier_name: None,
            supplier_address: None,
            supplier_vat: None,
            po_reference: None,
            payment_terms: None,
            currency: "GBP".to_string(),
            line_items: Vec::new(),
            subtotal: 0.0,
            vat_amount: 0.0,
            vat_rate: 0.0,
            total: 0.0,
        }
    }
}

impl InvoiceRecord {
    /// A PO reference counts only when it has visible content.
    pub fn trimmed_po_reference(&self) -> Option<&str> {
        self.po_reference
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_number: String,
    pub supplier: String,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    ExactPoReference,
    FuzzyMatching,
    NoMatch,
    Error,
}

impl MatchMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactPoReference => "exact_po_reference",
            Self::FuzzyMatching => "fuzzy_matching",
            Self::NoMatch => "no_match",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub po_match_confidence: f64,
    pub matched_po: Option<String>,
    pub match_method: MatchMethod,
    pub supplier_match: bool,
    pub line_items_matched: i64,
    pub line_items_total: i64,
    pub match_rate: f64,
}

impl MatchResult {
    pub fn unmatched() -> Self {
        Self {
            po_match_confidence: 0.0,
            matched_po: None,
            match_method: MatchMethod::NoMatch,
            supplier_match: false,
            line_items_matched: 0,
            line_items_total: 0,
            match_rate: 0.0,
        }
    }

    pub fn errored() -> Self {
        Self {
            match_method: MatchMethod::Error,
            ..Self::unmatched()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    FlagForReview,
    EscalateToHuman,
}

impl RecommendedAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlagForReview => "flag_for_review",
            Self::EscalateToHuman => "escalate_to_human",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    PriceMismatch,
    QuantityMismatch,
    TotalVariance,
    MissingPoReference,
}

impl DiscrepancyKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceMismatch => "price_mismatch",
            Self::QuantityMismatch => "quantity_mismatch",
            Self::TotalVariance => "total_variance",
            Self::MissingPoReference => "missing_po_reference",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Discrepancy {
    #[serde(rename = "type")]
    pub kind: DiscrepancyKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_item_index: Option<i64>,
    pub field: String,
    pub invoice_value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance_percentage: Option<f64>,
    pub details: String,
    pub recommended_action: RecommendedAction,
    pub confidence: f64,
}

/// One quarantined entry from PO database validation.
#[derive(Debug, Clone, Serialize)]
pub struct SourceIssue {
    pub index: i64,
    pub field: String,
    pub code: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::{InvoiceRecord, MatchMethod, PurchaseOrder};

    #[test]
    fn invoice_record_fills_defaults_for_absent_fields() {
        let parsed: Result<InvoiceRecord, _> = serde_json::from_str("{}");
        assert!(parsed.is_ok());
        if let Ok(invoice) = parsed {
            assert_eq!(invoice.currency, "GBP");
            assert_eq!(invoice.total, 0.0);
            assert!(invoice.line_items.is_empty());
            assert!(invoice.po_reference.is_none());
        }
    }

    #[test]
    fn blank_po_reference_counts_as_absent() {
        let invoice = InvoiceRecord {
            po_reference: Some("   ".to_string()),
            ..InvoiceRecord::default()
        };
        assert!(invoice.trimmed_po_reference().is_none());

        let referenced = InvoiceRecord {
            po_reference: Some(" PO-2024-001 ".to_string()),
            ..InvoiceRecord::default()
        };
        assert_eq!(referenced.trimmed_po_reference(), Some("PO-2024-001"));
    }

    #[test]
    fn match_method_serializes_to_wire_names() {
        let serialized = serde_json::to_string(&MatchMethod::ExactPoReference);
        assert!(serialized.is_ok());
        if let Ok(text) = serialized {
            assert_eq!(text, "\"exact_po_reference\"");
        }
        assert_eq!(MatchMethod::FuzzyMatching.as_str(), "fuzzy_matching");
    }

    #[test]
    fn purchase_order_tolerates_missing_optional_fields() {
        let parsed: Result<PurchaseOrder, _> =
            serde_json::from_str(r#"{"po_number": "PO-1", "supplier": "Acme"}"#);
        assert!(parsed.is_ok());
        if let Ok(order) = parsed {
            assert_eq!(order.total, 0.0);
            assert!(order.order_date.is_none());
            assert!(order.line_items.is_empty());
        }
    }
}
