/// Deterministic matching-policy identifier.
///
/// Emitted with reconcile results so future threshold changes remain
/// auditable and easy to reason about in diffs.
pub const MATCH_POLICY_VERSION: &str = "match/v1";

/// v1 PO matching policy.
///
/// Notes:
/// - `supplier_weight` and `item_weight` must sum to 1.0; line-item content
///   is weighted higher because it is a stronger fingerprint than a
///   possibly-generic supplier name.
/// - `exact_reference_confidence` is fixed above `fuzzy_bypass_confidence`,
///   so a resolved reference is never displaced by fuzzy scoring.
#[derive(Debug, Clone, Copy)]
pub struct MatchPolicy {
    /// Minimum similarity (0-100) for supplier/product matches.
    pub fuzzy_threshold: f64,
    pub supplier_weight: f64,
    pub item_weight: f64,
    pub exact_reference_confidence: f64,
    /// Fuzzy scoring is skipped once stage-one confidence reaches this.
    pub fuzzy_bypass_confidence: f64,
    /// Minimum similarity (0-100) for non-exact item-code matches.
    pub item_code_threshold: f64,
}

impl MatchPolicy {
    pub fn with_threshold(mut self, fuzzy_threshold: f64) -> Self {
        self.fuzzy_threshold = fuzzy_threshold;
        self
    }

    pub fn overall_confidence(self, supplier_conf: f64, avg_item_conf: f64) -> f64 {
        (self.supplier_weight * supplier_conf) + (self.item_weight * avg_item_conf)
    }

    /// Candidate admission floor on the 0-1 scale.
    pub fn candidate_floor(self) -> f64 {
        self.fuzzy_threshold / 100.0
    }
}

pub const MATCH_POLICY_V1: MatchPolicy = MatchPolicy {
    fuzzy_threshold: 70.0,
    supplier_weight: 0.4,
    item_weight: 0.6,
    exact_reference_confidence: 0.99,
    fuzzy_bypass_confidence: 0.95,
    item_code_threshold: 90.0,
};

/// Deterministic tolerance-policy identifier.
pub const TOLERANCE_POLICY_VERSION: &str = "tolerance/v1";

/// v1 discrepancy tolerance bands.
///
/// Quantity has no band: quantities are discrete and any inequality flags.
#[derive(Debug, Clone, Copy)]
pub struct TolerancePolicy {
    /// Per-line price variance allowed before flagging (fraction of PO price).
    pub price_tolerance: f64,
    /// Price variance above this escalates to a human.
    pub price_escalation: f64,
    /// Relative cap on total variance (fraction of PO total).
    pub total_tolerance_ratio: f64,
    /// Absolute floor on total variance, in invoice currency units.
    pub total_tolerance_floor: f64,
    /// Total variance above this escalates to a human.
    pub total_escalation: f64,
}

impl TolerancePolicy {
    /// The tighter of the fixed floor and the relative cap, protecting both
    /// low-value and high-value POs from an inappropriate band.
    pub fn total_tolerance(self, po_total: f64) -> f64 {
        self.total_tolerance_floor
            .min(po_total * self.total_tolerance_ratio)
    }
}

pub const TOLERANCE_POLICY_V1: TolerancePolicy = TolerancePolicy {
    price_tolerance: 0.02,
    price_escalation: 0.15,
    total_tolerance_ratio: 0.01,
    total_tolerance_floor: 5.0,
    total_escalation: 0.10,
};

#[cfg(test)]
mod tests {
    use super::{MATCH_POLICY_V1, TOLERANCE_POLICY_V1};

    #[test]
    fn match_weights_sum_to_one() {
        let sum = MATCH_POLICY_V1.supplier_weight + MATCH_POLICY_V1.item_weight;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_reference_always_clears_the_fuzzy_bypass() {
        assert!(
            MATCH_POLICY_V1.exact_reference_confidence > MATCH_POLICY_V1.fuzzy_bypass_confidence
        );
    }

    #[test]
    fn threshold_override_keeps_other_fields() {
        let policy = MATCH_POLICY_V1.with_threshold(85.0);
        assert_eq!(policy.fuzzy_threshold, 85.0);
        assert_eq!(policy.candidate_floor(), 0.85);
        assert_eq!(
            policy.item_code_threshold,
            MATCH_POLICY_V1.item_code_threshold
        );
    }

    #[test]
    fn total_tolerance_takes_the_tighter_bound() {
        // absolute floor wins on high-value orders
        assert_eq!(TOLERANCE_POLICY_V1.total_tolerance(1000.0), 5.0);
        // relative cap wins on low-value orders
        assert_eq!(TOLERANCE_POLICY_V1.total_tolerance(100.0), 1.0);
    }
}
