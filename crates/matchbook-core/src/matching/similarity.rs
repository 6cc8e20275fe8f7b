use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

use crate::matching::normalize::normalize_comparison_text;

/// One string-similarity scoring strategy on the 0-100 scale.
///
/// Different corruption modes (reordering, truncation, boilerplate) are each
/// best caught by a different strategy, so callers request a set and take
/// the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Ratio,
    PartialRatio,
    TokenSortRatio,
    TokenSetRatio,
}

pub const SUPPLIER_STRATEGIES: [Strategy; 4] = [
    Strategy::Ratio,
    Strategy::PartialRatio,
    Strategy::TokenSortRatio,
    Strategy::TokenSetRatio,
];

pub const PRODUCT_STRATEGIES: [Strategy; 3] = [
    Strategy::TokenSetRatio,
    Strategy::PartialRatio,
    Strategy::TokenSortRatio,
];

/// Best score across the requested strategies, 0-100.
///
/// Blank input on either side scores 0 without invoking a strategy.
pub fn score(a: &str, b: &str, strategies: &[Strategy]) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    strategies
        .iter()
        .map(|strategy| match strategy {
            Strategy::Ratio => ratio(a, b),
            Strategy::PartialRatio => partial_ratio(a, b),
            Strategy::TokenSortRatio => token_sort_ratio(a, b),
            Strategy::TokenSetRatio => token_set_ratio(a, b),
        })
        .fold(0.0, f64::max)
}

pub fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Best full-ratio over every window of the longer string at the shorter
/// string's length. A clean substring scores 100.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a_chars = a.chars().collect::<Vec<char>>();
    let b_chars = b.chars().collect::<Vec<char>>();
    let (shorter, longer) = if a_chars.len() <= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if shorter.is_empty() {
        return 0.0;
    }
    if shorter.len() == longer.len() {
        let shorter_text = shorter.iter().collect::<String>();
        let longer_text = longer.iter().collect::<String>();
        return ratio(&shorter_text, &longer_text);
    }

    let shorter_text = shorter.iter().collect::<String>();
    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let window_text = window.iter().collect::<String>();
        best = best.max(ratio(&shorter_text, &window_text));
    }
    best
}

/// Full ratio after sorting whitespace tokens, so word order stops mattering.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

/// Token-set construction: compare the shared-token core against each side's
/// remainder and the remainders against each other, keeping the best.
///
/// Duplicate tokens and one-sided boilerplate stop mattering.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a_tokens = a.split_whitespace().collect::<BTreeSet<&str>>();
    let b_tokens = b.split_whitespace().collect::<BTreeSet<&str>>();

    let shared = a_tokens
        .intersection(&b_tokens)
        .copied()
        .collect::<Vec<&str>>()
        .join(" ");
    let a_only = a_tokens
        .difference(&b_tokens)
        .copied()
        .collect::<Vec<&str>>()
        .join(" ");
    let b_only = b_tokens
        .difference(&a_tokens)
        .copied()
        .collect::<Vec<&str>>()
        .join(" ");

    let shared_plus_a = join_nonempty(&shared, &a_only);
    let shared_plus_b = join_nonempty(&shared, &b_only);

    ratio(&shared, &shared_plus_a)
        .max(ratio(&shared, &shared_plus_b))
        .max(ratio(&shared_plus_a, &shared_plus_b))
}

fn sorted_tokens(value: &str) -> Vec<&str> {
    let mut tokens = value.split_whitespace().collect::<Vec<&str>>();
    tokens.sort_unstable();
    tokens
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        (false, false) => format!("{left} {right}"),
    }
}

/// Input-specific comparison wrappers over the strategy engine.
///
/// Thresholds sit on the 0-100 scale and are injected at construction.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
    item_code_threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64, item_code_threshold: f64) -> Self {
        Self {
            threshold,
            item_code_threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Supplier names: all four strategies, since full-string weighting
    /// still matters for short organizational names.
    pub fn match_supplier(&self, invoice_supplier: &str, po_supplier: &str) -> (bool, f64) {
        self.match_normalized(invoice_supplier, po_supplier, &SUPPLIER_STRATEGIES)
    }

    /// Product descriptions: token and window strategies only; order and
    /// boilerplate variance dominate raw character similarity here.
    pub fn match_product_description(&self, invoice_desc: &str, po_desc: &str) -> (bool, f64) {
        self.match_normalized(invoice_desc, po_desc, &PRODUCT_STRATEGIES)
    }

    /// Item codes are near-opaque identifiers: exact match short-circuits,
    /// otherwise only near-exact full-string similarity counts.
    pub fn match_item_code(&self, invoice_code: &str, po_code: &str) -> (bool, f64) {
        let norm_invoice = invoice_code.trim().to_uppercase();
        let norm_po = po_code.trim().to_uppercase();
        if norm_invoice.is_empty() || norm_po.is_empty() {
            return (false, 0.0);
        }
        if norm_invoice == norm_po {
            return (true, 1.0);
        }

        let best = ratio(&norm_invoice, &norm_po);
        (best >= self.item_code_threshold, best / 100.0)
    }

    fn match_normalized(&self, a: &str, b: &str, strategies: &[Strategy]) -> (bool, f64) {
        if a.trim().is_empty() || b.trim().is_empty() {
            return (false, 0.0);
        }

        let norm_a = normalize_comparison_text(a);
        let norm_b = normalize_comparison_text(b);
        let best = score(&norm_a, &norm_b, strategies);
        (best >= self.threshold, best / 100.0)
    }
}
