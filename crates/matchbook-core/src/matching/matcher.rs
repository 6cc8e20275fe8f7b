use crate::matching::policy::MatchPolicy;
use crate::matching::similarity::FuzzyMatcher;
use crate::records::{InvoiceRecord, MatchMethod, MatchResult, PurchaseOrder};
use crate::store::PoStore;

/// One surviving fuzzy candidate, with the evidence behind its score.
#[derive(Debug, Clone)]
pub struct PoCandidate {
    pub po_number: String,
    pub confidence: f64,
    pub reason: String,
}

/// The matcher's terminal answer for one invoice: the wire-level result plus
/// a copy of the matched order for downstream discrepancy checks.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub result: MatchResult,
    pub matched_order: Option<PurchaseOrder>,
}

impl MatchOutcome {
    fn unmatched() -> Self {
        Self {
            result: MatchResult::unmatched(),
            matched_order: None,
        }
    }

    fn errored() -> Self {
        Self {
            result: MatchResult::errored(),
            matched_order: None,
        }
    }
}

/// Explicit fault from the fallible matching stage.
///
/// Surfaced as a variant rather than swallowed, so callers that want the
/// raw failure can use `try_match_invoice` while `match_invoice` degrades
/// it to a safe `error` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFault {
    NonFiniteConfidence { po_number: String },
}

/// Two-stage matcher over one invoice: exact PO reference first, fuzzy
/// scoring across the whole store as the fallback.
#[derive(Debug, Clone, Copy)]
pub struct PoMatcher {
    policy: MatchPolicy,
    fuzzy: FuzzyMatcher,
}

impl PoMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            fuzzy: FuzzyMatcher::new(policy.fuzzy_threshold, policy.item_code_threshold),
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Total entry point: a stage fault degrades to `match_method = error`
    /// with zero confidence so downstream escalation still runs.
    pub fn match_invoice(&self, invoice: &InvoiceRecord, store: &PoStore) -> MatchOutcome {
        match self.try_match_invoice(invoice, store) {
            Ok(outcome) => outcome,
            Err(_) => MatchOutcome::errored(),
        }
    }

    pub fn try_match_invoice(
        &self,
        invoice: &InvoiceRecord,
        store: &PoStore,
    ) -> Result<MatchOutcome, MatchFault> {
        let mut matched: Option<(PurchaseOrder, f64, MatchMethod)> = None;

        // Stage one: the supplier-attached reference is authoritative when
        // it resolves.
        if let Some(reference) = invoice.trimmed_po_reference()
            && let Some(order) = store.get_by_number(reference)
        {
            matched = Some((
                order.clone(),
                self.policy.exact_reference_confidence,
                MatchMethod::ExactPoReference,
            ));
        }

        // Stage two: fuzzy scoring across the whole store, unless stage one
        // already cleared the bypass confidence.
        let stage_one_confidence = matched
            .as_ref()
            .map(|(_, confidence, _)| *confidence)
            .unwrap_or(0.0);
        if stage_one_confidence < self.policy.fuzzy_bypass_confidence {
            let candidates = self.rank_candidates(invoice, store)?;
            if let Some(best) = candidates.first()
                && best.confidence > stage_one_confidence
                && let Some(order) = store.get_by_number(&best.po_number)
            {
                matched = Some((order.clone(), best.confidence, MatchMethod::FuzzyMatching));
            }
        }

        match matched {
            Some((order, confidence, method)) => {
                let result = self.match_metrics(invoice, &order, method, confidence);
                Ok(MatchOutcome {
                    result,
                    matched_order: Some(order),
                })
            }
            None => Ok(MatchOutcome::unmatched()),
        }
    }

    /// Scores every stored order against the invoice and returns the
    /// candidates clearing the admission floor, best first. Ties break on
    /// `po_number` so ordering stays deterministic.
    pub fn rank_candidates(
        &self,
        invoice: &InvoiceRecord,
        store: &PoStore,
    ) -> Result<Vec<PoCandidate>, MatchFault> {
        let invoice_supplier = invoice.supplier_name.as_deref().unwrap_or("");
        let mut candidates: Vec<PoCandidate> = Vec::new();

        for order in store.orders() {
            let (supplier_match, supplier_conf) =
                self.fuzzy.match_supplier(invoice_supplier, &order.supplier);

            let mut item_matches = 0_usize;
            let mut total_item_conf = 0.0_f64;
            for item in &invoice.line_items {
                let mut best_item_conf = 0.0_f64;
                for po_item in &order.line_items {
                    let (_, conf) = self
                        .fuzzy
                        .match_product_description(&item.description, &po_item.description);
                    if conf > best_item_conf {
                        best_item_conf = conf;
                    }
                }
                if best_item_conf >= self.policy.candidate_floor() {
                    item_matches += 1;
                }
                total_item_conf += best_item_conf;
            }

            let item_total = invoice.line_items.len();
            let avg_item_conf = if item_total == 0 {
                0.0
            } else {
                total_item_conf / item_total as f64
            };

            let overall = self.policy.overall_confidence(supplier_conf, avg_item_conf);
            if !overall.is_finite() {
                return Err(MatchFault::NonFiniteConfidence {
                    po_number: order.po_number.clone(),
                });
            }
            if overall >= self.policy.candidate_floor() {
                candidates.push(PoCandidate {
                    po_number: order.po_number.clone(),
                    confidence: overall,
                    reason: candidate_reason(supplier_match, supplier_conf, item_matches, item_total),
                });
            }
        }

        candidates.sort_by(|left, right| {
            right
                .confidence
                .total_cmp(&left.confidence)
                .then_with(|| left.po_number.cmp(&right.po_number))
        });
        Ok(candidates)
    }

    fn match_metrics(
        &self,
        invoice: &InvoiceRecord,
        order: &PurchaseOrder,
        method: MatchMethod,
        confidence: f64,
    ) -> MatchResult {
        let invoice_supplier = invoice.supplier_name.as_deref().unwrap_or("");
        let (supplier_match, _) = self.fuzzy.match_supplier(invoice_supplier, &order.supplier);

        let mut matched_count = 0_usize;
        for item in &invoice.line_items {
            let has_counterpart = order.line_items.iter().any(|po_item| {
                self.fuzzy
                    .match_product_description(&item.description, &po_item.description)
                    .0
            });
            if has_counterpart {
                matched_count += 1;
            }
        }

        let item_total = invoice.line_items.len();
        let match_rate = if item_total == 0 {
            0.0
        } else {
            matched_count as f64 / item_total as f64
        };

        MatchResult {
            po_match_confidence: confidence,
            matched_po: Some(order.po_number.clone()),
            match_method: method,
            supplier_match,
            line_items_matched: matched_count as i64,
            line_items_total: item_total as i64,
            match_rate,
        }
    }
}

fn candidate_reason(
    supplier_match: bool,
    supplier_conf: f64,
    item_matches: usize,
    item_total: usize,
) -> String {
    let mut reasons: Vec<String> = Vec::new();
    if supplier_match {
        reasons.push(format!(
            "supplier match ({:.0}%)",
            supplier_conf * 100.0
        ));
    }
    if item_matches > 0 {
        reasons.push(format!("{item_matches}/{item_total} items matched"));
    }
    if reasons.is_empty() {
        return "weak match".to_string();
    }
    reasons.join(", ")
}
