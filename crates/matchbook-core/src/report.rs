use std::path::Path;

use crate::records::{Discrepancy, MatchResult};
use crate::{CoreError, CoreResult};

const FINDINGS_HEADERS: [&str; 11] = [
    "run_id",
    "matched_po",
    "type",
    "severity",
    "line_item_index",
    "field",
    "invoice_value",
    "po_value",
    "variance_percentage",
    "recommended_action",
    "confidence",
];

/// Writes one audit row per discrepancy, plus the match context, so the
/// findings can travel without the JSON envelope.
pub fn write_findings_csv(
    path: &Path,
    run_id: &str,
    match_result: &MatchResult,
    discrepancies: &[Discrepancy],
) -> CoreResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|error| CoreError::export_write_failed(path, &error.to_string()))?;

    writer
        .write_record(FINDINGS_HEADERS)
        .map_err(|error| CoreError::export_write_failed(path, &error.to_string()))?;

    let matched_po = match_result.matched_po.as_deref().unwrap_or("");
    for finding in discrepancies {
        let record = [
            run_id.to_string(),
            matched_po.to_string(),
            finding.kind.as_str().to_string(),
            finding.severity.as_str().to_string(),
            finding
                .line_item_index
                .map(|index| index.to_string())
                .unwrap_or_default(),
            finding.field.clone(),
            scalar_text(&finding.invoice_value),
            finding
                .po_value
                .as_ref()
                .map(scalar_text)
                .unwrap_or_default(),
            finding
                .variance_percentage
                .map(|value| format!("{value:.4}"))
                .unwrap_or_default(),
            finding.recommended_action.as_str().to_string(),
            format!("{:.4}", finding.confidence),
        ];
        writer
            .write_record(&record)
            .map_err(|error| CoreError::export_write_failed(path, &error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| CoreError::export_write_failed(path, &error.to_string()))
}

fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use serde_json::{Value, json};
    use tempfile::tempdir;

    use crate::records::{
        Discrepancy, DiscrepancyKind, MatchMethod, MatchResult, RecommendedAction, Severity,
    };

    use super::write_findings_csv;

    fn sample_result() -> MatchResult {
        MatchResult {
            po_match_confidence: 0.99,
            matched_po: Some("PO-2024-001".to_string()),
            match_method: MatchMethod::ExactPoReference,
            supplier_match: true,
            line_items_matched: 2,
            line_items_total: 2,
            match_rate: 1.0,
        }
    }

    fn sample_finding() -> Discrepancy {
        Discrepancy {
            kind: DiscrepancyKind::PriceMismatch,
            severity: Severity::Medium,
            line_item_index: Some(0),
            field: "unit_price".to_string(),
            invoice_value: json!(110.0),
            po_value: Some(json!(100.0)),
            variance_percentage: Some(10.0),
            details: "Premium office chair: invoice 110.00 GBP vs PO 100.00 GBP".to_string(),
            recommended_action: RecommendedAction::FlagForReview,
            confidence: 0.99,
        }
    }

    #[test]
    fn writes_header_and_one_row_per_finding() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("findings.csv");

        let written = write_findings_csv(
            &path,
            "run_01ARZ3",
            &sample_result(),
            &[sample_finding(), sample_finding()],
        );
        assert!(written.is_ok());

        let body = std::fs::read_to_string(&path)?;
        let lines = body.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("run_id,matched_po,type,severity"));
        assert!(lines[1].contains("price_mismatch"));
        assert!(lines[1].contains("flag_for_review"));
        assert!(lines[1].contains("run_01ARZ3"));
        Ok(())
    }

    #[test]
    fn null_values_render_as_empty_cells() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("findings.csv");

        let finding = Discrepancy {
            kind: DiscrepancyKind::MissingPoReference,
            line_item_index: None,
            invoice_value: Value::Null,
            po_value: None,
            variance_percentage: None,
            ..sample_finding()
        };
        let written = write_findings_csv(&path, "run_01ARZ3", &sample_result(), &[finding]);
        assert!(written.is_ok());

        let body = std::fs::read_to_string(&path)?;
        assert!(body.contains("missing_po_reference"));
        Ok(())
    }

    #[test]
    fn unwritable_path_fails_with_export_code() {
        let result = write_findings_csv(
            std::path::Path::new("/nonexistent-dir/findings.csv"),
            "run_01ARZ3",
            &sample_result(),
            &[],
        );
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "export_write_failed");
        }
    }
}
