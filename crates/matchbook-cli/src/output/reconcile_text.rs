use std::io;

use serde_json::Value;

use super::format::key_value_rows;

pub fn render_reconcile(data: &Value) -> io::Result<String> {
    let match_result = data
        .get("match_result")
        .ok_or_else(|| io::Error::other("reconcile output requires match_result"))?;

    let invoice_label = data
        .get("invoice")
        .and_then(|invoice| invoice.get("invoice_number"))
        .and_then(Value::as_str)
        .unwrap_or("invoice")
        .to_string();

    let mut lines = vec![heading(match_result, &invoice_label), String::new()];
    lines.extend(key_value_rows(&summary_entries(data, match_result), 2));

    let findings = data
        .get("discrepancies")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if findings.is_empty() {
        lines.push(String::new());
        lines.push("No discrepancies found.".to_string());
    } else {
        lines.push(String::new());
        lines.push(format!("Findings: {}", findings.len()));
        for (index, finding) in findings.iter().enumerate() {
            lines.extend(finding_block(index, finding));
        }
    }

    if let Some(export_path) = data.get("export_path").and_then(Value::as_str) {
        lines.push(String::new());
        lines.push(format!("Findings exported to {export_path}."));
    }

    Ok(lines.join("\n"))
}

fn heading(match_result: &Value, invoice_label: &str) -> String {
    let method = value_string(match_result, "match_method");
    match method.as_str() {
        "no_match" => format!("No purchase order matched {invoice_label}."),
        "error" => format!("Matching failed internally for {invoice_label}."),
        _ => {
            let matched_po = value_string(match_result, "matched_po");
            format!("Reconciled {invoice_label} against {matched_po}.")
        }
    }
}

fn summary_entries(data: &Value, match_result: &Value) -> Vec<(&'static str, String)> {
    let confidence = match_result
        .get("po_match_confidence")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    let supplier_matched = match_result
        .get("supplier_match")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let escalation = data
        .get("escalation_required")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    let quarantined = data
        .get("store")
        .and_then(|store| store.get("entries_quarantined"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let mut entries = vec![
        (
            "Match method:",
            format!(
                "{} ({:.0}% confidence)",
                value_string(match_result, "match_method"),
                confidence * 100.0
            ),
        ),
        (
            "Supplier:",
            if supplier_matched {
                "matched".to_string()
            } else {
                "not matched".to_string()
            },
        ),
        (
            "Line items:",
            format!(
                "{}/{} matched",
                value_string(match_result, "line_items_matched"),
                value_string(match_result, "line_items_total")
            ),
        ),
        (
            "Escalation:",
            if escalation {
                "required".to_string()
            } else {
                "not required".to_string()
            },
        ),
    ];
    if quarantined > 0 {
        entries.push(("Quarantined:", format!("{quarantined} database entries")));
    }
    entries
}

fn finding_block(index: usize, finding: &Value) -> Vec<String> {
    let mut block = vec![format!(
        "  Finding {}: [{}] {}",
        index + 1,
        value_string(finding, "severity"),
        value_string(finding, "type"),
    )];
    let details = value_string(finding, "details");
    if !details.is_empty() {
        block.push(format!("    {details}"));
    }
    block.push(format!(
        "    Action: {} (confidence {:.2})",
        value_string(finding, "recommended_action"),
        finding
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    ));
    block
}

fn value_string(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
