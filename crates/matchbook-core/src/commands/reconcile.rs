use std::fs;
use std::io;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use ulid::Ulid;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{InvoiceSummary, ReconcileData, StoreSummary};
use crate::discrepancy::DiscrepancyEngine;
use crate::matching::matcher::{MatchOutcome, PoMatcher};
use crate::matching::policy::{
    MATCH_POLICY_V1, MATCH_POLICY_VERSION, MatchPolicy, TOLERANCE_POLICY_V1,
    TOLERANCE_POLICY_VERSION,
};
use crate::records::{Discrepancy, InvoiceRecord, MatchMethod, RecommendedAction};
use crate::report::write_findings_csv;
use crate::store::PoStore;
use crate::{CoreError, CoreResult};

/// Extraction confidence below this always routes to a human, regardless of
/// how well the invoice matched.
pub const EXTRACTION_CONFIDENCE_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub invoice_path: String,
    pub po_source: String,
    pub threshold: Option<f64>,
    pub extraction_confidence: Option<f64>,
    pub export_path: Option<String>,
}

pub fn run(options: ReconcileOptions) -> CoreResult<SuccessEnvelope> {
    let extraction_confidence = resolve_extraction_confidence(options.extraction_confidence)?;
    let match_policy = resolve_match_policy(options.threshold)?;

    let invoice = load_invoice(Path::new(&options.invoice_path))?;
    let store = PoStore::load(Path::new(&options.po_source))?;

    let matcher = PoMatcher::new(match_policy);
    let outcome = matcher.match_invoice(&invoice, &store);
    let engine = DiscrepancyEngine::new(TOLERANCE_POLICY_V1, match_policy);
    let discrepancies = engine.detect(&invoice, outcome.matched_order.as_ref(), &outcome.result);

    let run_id = format!("run_{}", Ulid::new());
    if let Some(export_path) = options.export_path.as_deref() {
        write_findings_csv(
            Path::new(export_path),
            &run_id,
            &outcome.result,
            &discrepancies,
        )?;
    }

    let escalation_required =
        requires_escalation(&outcome, &discrepancies, extraction_confidence);
    let data = ReconcileData {
        run_id,
        reconciled_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        invoice_path: options.invoice_path.clone(),
        extraction_confidence,
        match_policy_version: MATCH_POLICY_VERSION.to_string(),
        tolerance_policy_version: TOLERANCE_POLICY_VERSION.to_string(),
        invoice: invoice_summary(&invoice),
        store: store_summary(&options.po_source, &store),
        match_result: outcome.result,
        discrepancies,
        escalation_required,
        export_path: options.export_path,
    };

    success("reconcile", data)
}

/// Never auto-approve on ambiguous or failed internal state: an unmatched or
/// errored match, weak extraction, or any escalation-grade finding routes to
/// a human.
fn requires_escalation(
    outcome: &MatchOutcome,
    discrepancies: &[Discrepancy],
    extraction_confidence: f64,
) -> bool {
    if matches!(
        outcome.result.match_method,
        MatchMethod::NoMatch | MatchMethod::Error
    ) {
        return true;
    }
    if extraction_confidence < EXTRACTION_CONFIDENCE_FLOOR {
        return true;
    }
    discrepancies
        .iter()
        .any(|finding| finding.recommended_action == RecommendedAction::EscalateToHuman)
}

fn resolve_extraction_confidence(value: Option<f64>) -> CoreResult<f64> {
    let Some(confidence) = value else {
        return Ok(1.0);
    };
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(CoreError::invalid_argument_for_command(
            "`--extraction-confidence` must be a number between 0 and 1.",
            Some("reconcile"),
        ));
    }
    Ok(confidence)
}

fn resolve_match_policy(threshold: Option<f64>) -> CoreResult<MatchPolicy> {
    let Some(threshold) = threshold else {
        return Ok(MATCH_POLICY_V1);
    };
    if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
        return Err(CoreError::invalid_argument_for_command(
            "`--threshold` must be a number between 0 and 100.",
            Some("reconcile"),
        ));
    }
    Ok(MATCH_POLICY_V1.with_threshold(threshold))
}

fn load_invoice(path: &Path) -> CoreResult<InvoiceRecord> {
    let raw = fs::read_to_string(path).map_err(|error| match error.kind() {
        io::ErrorKind::NotFound => CoreError::invoice_source_not_found(path),
        _ => CoreError::invoice_source_invalid(path, &error.to_string()),
    })?;
    serde_json::from_str::<InvoiceRecord>(&raw)
        .map_err(|error| CoreError::invoice_source_invalid(path, &error.to_string()))
}

fn invoice_summary(invoice: &InvoiceRecord) -> InvoiceSummary {
    InvoiceSummary {
        invoice_number: invoice.invoice_number.clone(),
        supplier_name: invoice.supplier_name.clone(),
        po_reference: invoice.po_reference.clone(),
        currency: invoice.currency.clone(),
        line_item_count: invoice.line_items.len() as i64,
        total: invoice.total,
    }
}

pub(crate) fn store_summary(source: &str, store: &PoStore) -> StoreSummary {
    StoreSummary {
        source: source.to_string(),
        orders_loaded: store.len() as i64,
        entries_quarantined: store.issues().len() as i64,
    }
}
