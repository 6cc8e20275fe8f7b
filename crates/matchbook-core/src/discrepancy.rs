use serde_json::{Value, json};

use crate::matching::policy::{MatchPolicy, TolerancePolicy};
use crate::matching::similarity::FuzzyMatcher;
use crate::records::{
    Discrepancy, DiscrepancyKind, InvoiceRecord, LineItem, MatchResult, PurchaseOrder,
    RecommendedAction, Severity,
};

/// Tolerance-banded comparison of an invoice against its matched order.
///
/// Every check is an independent pure function over the inputs; one check
/// cannot stop another from running.
#[derive(Debug, Clone, Copy)]
pub struct DiscrepancyEngine {
    tolerance: TolerancePolicy,
    fuzzy: FuzzyMatcher,
}

impl DiscrepancyEngine {
    pub fn new(tolerance: TolerancePolicy, match_policy: MatchPolicy) -> Self {
        Self {
            tolerance,
            fuzzy: FuzzyMatcher::new(
                match_policy.fuzzy_threshold,
                match_policy.item_code_threshold,
            ),
        }
    }

    pub fn tolerance(&self) -> TolerancePolicy {
        self.tolerance
    }

    /// With no matched order there is nothing to compare against; the empty
    /// list tells the caller to proceed straight to resolution.
    pub fn detect(
        &self,
        invoice: &InvoiceRecord,
        matched_order: Option<&PurchaseOrder>,
        match_result: &MatchResult,
    ) -> Vec<Discrepancy> {
        let Some(order) = matched_order else {
            return Vec::new();
        };

        let mut findings = Vec::new();
        findings.extend(self.check_price_variances(invoice, order));
        findings.extend(self.check_quantity_variances(invoice, order));
        findings.extend(self.check_total_variance(invoice, order));
        findings.extend(self.check_missing_po_reference(invoice, order, match_result));
        findings
    }

    fn check_price_variances(
        &self,
        invoice: &InvoiceRecord,
        order: &PurchaseOrder,
    ) -> Vec<Discrepancy> {
        let mut findings = Vec::new();

        for (index, item) in invoice.line_items.iter().enumerate() {
            let Some(po_item) = self.find_matching_po_item(item, order) else {
                continue;
            };

            let invoice_price = item.unit_price;
            let po_price = po_item.unit_price;
            let variance_pct = if po_price > 0.0 {
                (invoice_price - po_price).abs() / po_price
            } else {
                0.0
            };
            if variance_pct <= self.tolerance.price_tolerance {
                continue;
            }

            let severity = if variance_pct > self.tolerance.price_escalation {
                Severity::High
            } else {
                Severity::Medium
            };
            findings.push(Discrepancy {
                kind: DiscrepancyKind::PriceMismatch,
                severity,
                line_item_index: Some(index as i64),
                field: "unit_price".to_string(),
                invoice_value: json!(invoice_price),
                po_value: Some(json!(po_price)),
                variance_percentage: Some(variance_pct * 100.0),
                details: format!(
                    "{}: invoice {:.2} {} vs PO {:.2} {} ({:.1}% difference)",
                    item.description,
                    invoice_price,
                    invoice.currency,
                    po_price,
                    invoice.currency,
                    variance_pct * 100.0
                ),
                recommended_action: action_for(severity),
                confidence: 0.99,
            });
        }

        findings
    }

    fn check_quantity_variances(
        &self,
        invoice: &InvoiceRecord,
        order: &PurchaseOrder,
    ) -> Vec<Discrepancy> {
        let mut findings = Vec::new();

        for (index, item) in invoice.line_items.iter().enumerate() {
            let Some(po_item) = self.find_matching_po_item(item, order) else {
                continue;
            };

            // quantities are discrete, so any inequality flags
            if item.quantity == po_item.quantity {
                continue;
            }
            findings.push(Discrepancy {
                kind: DiscrepancyKind::QuantityMismatch,
                severity: Severity::Medium,
                line_item_index: Some(index as i64),
                field: "quantity".to_string(),
                invoice_value: json!(item.quantity),
                po_value: Some(json!(po_item.quantity)),
                variance_percentage: None,
                details: format!(
                    "{}: invoice qty {} vs PO qty {}",
                    item.description, item.quantity, po_item.quantity
                ),
                recommended_action: RecommendedAction::FlagForReview,
                confidence: 0.95,
            });
        }

        findings
    }

    fn check_total_variance(
        &self,
        invoice: &InvoiceRecord,
        order: &PurchaseOrder,
    ) -> Option<Discrepancy> {
        let invoice_total = invoice.total;
        let po_total = order.total;

        let variance_abs = (invoice_total - po_total).abs();
        let variance_pct = if po_total > 0.0 {
            variance_abs / po_total
        } else {
            0.0
        };
        if variance_abs <= self.tolerance.total_tolerance(po_total) {
            return None;
        }

        let severity = if variance_pct > self.tolerance.total_escalation {
            Severity::High
        } else {
            Severity::Medium
        };
        Some(Discrepancy {
            kind: DiscrepancyKind::TotalVariance,
            severity,
            line_item_index: None,
            field: "total".to_string(),
            invoice_value: json!(invoice_total),
            po_value: Some(json!(po_total)),
            variance_percentage: Some(variance_pct * 100.0),
            details: format!(
                "Total variance: invoice {:.2} {} vs PO {:.2} {} ({:.2} difference)",
                invoice_total, invoice.currency, po_total, invoice.currency, variance_abs
            ),
            recommended_action: action_for(severity),
            confidence: 0.99,
        })
    }

    fn check_missing_po_reference(
        &self,
        invoice: &InvoiceRecord,
        order: &PurchaseOrder,
        match_result: &MatchResult,
    ) -> Option<Discrepancy> {
        if invoice.trimmed_po_reference().is_some() {
            return None;
        }

        // With no reference on the invoice, a matched order can only have
        // come from fuzzy scoring; the matcher's own confidence is the
        // relevant signal here.
        Some(Discrepancy {
            kind: DiscrepancyKind::MissingPoReference,
            severity: Severity::Medium,
            line_item_index: None,
            field: "po_reference".to_string(),
            invoice_value: Value::Null,
            po_value: None,
            variance_percentage: None,
            details: format!(
                "Invoice missing PO reference. Matched to {} via fuzzy matching.",
                order.po_number
            ),
            recommended_action: RecommendedAction::FlagForReview,
            confidence: match_result.po_match_confidence,
        })
    }

    /// First order line clearing the product-description threshold, in
    /// order-line order. Invoice lines with no counterpart are skipped by
    /// the per-line checks.
    fn find_matching_po_item<'a>(
        &self,
        item: &LineItem,
        order: &'a PurchaseOrder,
    ) -> Option<&'a LineItem> {
        order.line_items.iter().find(|po_item| {
            self.fuzzy
                .match_product_description(&item.description, &po_item.description)
                .0
        })
    }
}

fn action_for(severity: Severity) -> RecommendedAction {
    if severity == Severity::High {
        RecommendedAction::EscalateToHuman
    } else {
        RecommendedAction::FlagForReview
    }
}
