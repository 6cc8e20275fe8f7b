/// Legal-entity markers stripped from the end of supplier and product text.
///
/// Each entry keeps its leading space so only whole trailing words strip.
/// Checked sequentially in this order, so stacked suffixes ("co. ltd")
/// strip fully in one pass.
const LEGAL_SUFFIXES: [&str; 9] = [
    " ltd", " limited", " inc", " plc", " corp", " co.", " llc", " gmbh", " ab",
];

/// Canonicalizes free text for comparison: lowercase, collapsed whitespace,
/// trailing legal-entity markers removed.
///
/// Empty input normalizes to the empty string. Idempotent.
pub fn normalize_comparison_text(text: &str) -> String {
    let mut normalized = collapse_whitespace(&text.to_lowercase());

    for suffix in LEGAL_SUFFIXES {
        if let Some(stripped) = normalized.strip_suffix(suffix) {
            normalized = stripped.to_string();
        }
    }

    normalized.trim().to_string()
}

fn collapse_whitespace(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut previous_space = false;
    for character in value.trim().chars() {
        if character.is_whitespace() {
            if !previous_space {
                output.push(' ');
            }
            previous_space = true;
        } else {
            output.push(character);
            previous_space = false;
        }
    }
    output
}
