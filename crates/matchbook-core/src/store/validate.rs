use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::records::{PurchaseOrder, SourceIssue};

#[derive(Debug, Clone)]
pub(crate) struct ValidatedOrders {
    pub(crate) orders: Vec<PurchaseOrder>,
    pub(crate) issues: Vec<SourceIssue>,
}

pub(crate) fn validate_entries(entries: &[Value]) -> ValidatedOrders {
    let mut orders: Vec<PurchaseOrder> = Vec::new();
    let mut issues: Vec<SourceIssue> = Vec::new();
    let mut seen_numbers: HashSet<String> = HashSet::new();

    for (position, entry) in entries.iter().enumerate() {
        let index = position as i64;
        let parsed = match serde_json::from_value::<PurchaseOrder>(entry.clone()) {
            Ok(order) => order,
            Err(error) => {
                issues.push(SourceIssue {
                    index,
                    field: "entry".to_string(),
                    code: "invalid_entry".to_string(),
                    description: format!("entry does not match the purchase order shape: {error}"),
                });
                continue;
            }
        };

        let mut entry_issues = Vec::new();
        let order = normalize_order(parsed);

        if order.po_number.is_empty() {
            entry_issues.push(SourceIssue {
                index,
                field: "po_number".to_string(),
                code: "missing_required_field".to_string(),
                description: "po_number must be present and non-empty.".to_string(),
            });
        }
        if order.supplier.is_empty() {
            entry_issues.push(SourceIssue {
                index,
                field: "supplier".to_string(),
                code: "missing_required_field".to_string(),
                description: "supplier must be present and non-empty.".to_string(),
            });
        }
        if !order.total.is_finite() || order.total < 0.0 {
            entry_issues.push(SourceIssue {
                index,
                field: "total".to_string(),
                code: "invalid_amount".to_string(),
                description: format!("total must be a non-negative number; got {}", order.total),
            });
        }
        if let Some(order_date) = order.order_date.as_deref()
            && NaiveDate::parse_from_str(order_date, "%Y-%m-%d").is_err()
        {
            entry_issues.push(SourceIssue {
                index,
                field: "order_date".to_string(),
                code: "invalid_date".to_string(),
                description: format!("order_date must be YYYY-MM-DD; got \"{order_date}\""),
            });
        }
        validate_line_items(&order, index, &mut entry_issues);

        if entry_issues.is_empty() && !seen_numbers.insert(order.po_number.clone()) {
            entry_issues.push(SourceIssue {
                index,
                field: "po_number".to_string(),
                code: "duplicate_po_number".to_string(),
                description: format!(
                    "po_number `{}` appears more than once; later entry quarantined.",
                    order.po_number
                ),
            });
        }

        if entry_issues.is_empty() {
            orders.push(order);
        } else {
            issues.extend(entry_issues);
        }
    }

    ValidatedOrders { orders, issues }
}

fn validate_line_items(order: &PurchaseOrder, index: i64, issues: &mut Vec<SourceIssue>) {
    for (item_position, item) in order.line_items.iter().enumerate() {
        if item.description.trim().is_empty() {
            issues.push(SourceIssue {
                index,
                field: format!("line_items[{item_position}].description"),
                code: "missing_required_field".to_string(),
                description: "line item description must be present and non-empty.".to_string(),
            });
        }
        for (field, value) in [
            ("quantity", item.quantity),
            ("unit_price", item.unit_price),
            ("line_total", item.line_total),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(SourceIssue {
                    index,
                    field: format!("line_items[{item_position}].{field}"),
                    code: "invalid_amount".to_string(),
                    description: format!("{field} must be a non-negative number; got {value}"),
                });
            }
        }
    }
}

fn normalize_order(order: PurchaseOrder) -> PurchaseOrder {
    PurchaseOrder {
        po_number: order.po_number.trim().to_string(),
        supplier: order.supplier.trim().to_string(),
        order_date: normalize_optional(order.order_date),
        currency: normalize_optional(order.currency).map(|value| value.to_uppercase()),
        status: normalize_optional(order.status),
        line_items: order.line_items,
        total: order.total,
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    let raw = value?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::validate_entries;

    #[test]
    fn valid_entry_is_normalized_and_kept() {
        let entries = vec![json!({
            "po_number": " PO-2024-001 ",
            "supplier": " Acme Ltd ",
            "currency": "gbp",
            "status": "  ",
            "total": 250.0
        })];

        let validated = validate_entries(&entries);
        assert_eq!(validated.orders.len(), 1);
        assert!(validated.issues.is_empty());
        assert_eq!(validated.orders[0].po_number, "PO-2024-001");
        assert_eq!(validated.orders[0].supplier, "Acme Ltd");
        assert_eq!(validated.orders[0].currency.as_deref(), Some("GBP"));
        assert!(validated.orders[0].status.is_none());
    }

    #[test]
    fn bad_order_date_quarantines_the_entry() {
        let entries = vec![json!({
            "po_number": "PO-2024-001",
            "supplier": "Acme Ltd",
            "order_date": "12/01/2024",
            "total": 250.0
        })];

        let validated = validate_entries(&entries);
        assert!(validated.orders.is_empty());
        assert_eq!(validated.issues.len(), 1);
        assert_eq!(validated.issues[0].code, "invalid_date");
    }

    #[test]
    fn negative_amounts_quarantine_the_entry() {
        let entries = vec![json!({
            "po_number": "PO-2024-001",
            "supplier": "Acme Ltd",
            "total": 250.0,
            "line_items": [
                {"description": "Widget", "quantity": -1.0, "unit": "each",
                 "unit_price": 2.5, "line_total": 250.0}
            ]
        })];

        let validated = validate_entries(&entries);
        assert!(validated.orders.is_empty());
        assert_eq!(validated.issues.len(), 1);
        assert_eq!(validated.issues[0].code, "invalid_amount");
        assert_eq!(validated.issues[0].field, "line_items[0].quantity");
    }

    #[test]
    fn blank_line_item_description_quarantines_the_entry() {
        let entries = vec![json!({
            "po_number": "PO-2024-001",
            "supplier": "Acme Ltd",
            "total": 250.0,
            "line_items": [
                {"description": "   ", "quantity": 1.0, "unit": "each",
                 "unit_price": 2.5, "line_total": 2.5}
            ]
        })];

        let validated = validate_entries(&entries);
        assert!(validated.orders.is_empty());
        assert_eq!(validated.issues[0].code, "missing_required_field");
    }

    #[test]
    fn first_entry_wins_on_duplicate_po_numbers() {
        let entries = vec![
            json!({"po_number": "PO-1", "supplier": "First Ltd", "total": 1.0}),
            json!({"po_number": "PO-1", "supplier": "Second Ltd", "total": 2.0}),
        ];

        let validated = validate_entries(&entries);
        assert_eq!(validated.orders.len(), 1);
        assert_eq!(validated.orders[0].supplier, "First Ltd");
        assert_eq!(validated.issues.len(), 1);
        assert_eq!(validated.issues[0].code, "duplicate_po_number");
    }
}
