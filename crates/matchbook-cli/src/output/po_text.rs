use std::io;

use serde_json::Value;

use super::format::{Align, Column, key_value_rows, render_table};

pub fn render_po_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("po list output requires rows"))?;

    let source = store_field(data, "source");
    if rows.is_empty() {
        return Ok(format!(
            "No purchase orders loaded from {source}.\n\nCheck the database file has a `purchase_orders` array with valid entries."
        ));
    }

    let quarantined = data
        .get("store")
        .and_then(|store| store.get("entries_quarantined"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let mut lines = vec![
        format!("{} purchase orders loaded from {source}.", rows.len()),
        String::new(),
    ];

    let columns = [
        Column {
            name: "PO Number",
            align: Align::Left,
        },
        Column {
            name: "Supplier",
            align: Align::Left,
        },
        Column {
            name: "Items",
            align: Align::Right,
        },
        Column {
            name: "Total",
            align: Align::Right,
        },
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                value_string(row, "po_number"),
                value_string(row, "supplier"),
                value_string(row, "line_item_count"),
                format_total(row),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table(&columns, &table_rows));

    if quarantined > 0 {
        lines.push(String::new());
        lines.push(format!(
            "{quarantined} entries were quarantined during validation."
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_po_show(data: &Value) -> io::Result<String> {
    let order = data
        .get("po")
        .ok_or_else(|| io::Error::other("po show output requires po"))?;

    let mut lines = vec![
        format!("Purchase order {}.", value_string(order, "po_number")),
        String::new(),
    ];

    let mut entries = vec![("Supplier:", value_string(order, "supplier"))];
    for (label, key) in [
        ("Order date:", "order_date"),
        ("Currency:", "currency"),
        ("Status:", "status"),
    ] {
        let value = value_string(order, key);
        if !value.is_empty() {
            entries.push((label, value));
        }
    }
    entries.push(("Total:", format_total(order)));
    lines.extend(key_value_rows(&entries, 2));

    let items = order
        .get("line_items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !items.is_empty() {
        lines.push(String::new());
        lines.push("Line items:".to_string());
        let columns = [
            Column {
                name: "Code",
                align: Align::Left,
            },
            Column {
                name: "Description",
                align: Align::Left,
            },
            Column {
                name: "Qty",
                align: Align::Right,
            },
            Column {
                name: "Unit Price",
                align: Align::Right,
            },
        ];
        let table_rows = items
            .iter()
            .map(|item| {
                vec![
                    value_string(item, "item_code"),
                    value_string(item, "description"),
                    value_string(item, "quantity"),
                    format_number(item, "unit_price"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(&columns, &table_rows));
    }

    Ok(lines.join("\n"))
}

fn store_field(data: &Value, key: &str) -> String {
    data.get("store")
        .map(|store| value_string(store, key))
        .unwrap_or_default()
}

fn format_total(row: &Value) -> String {
    format_number(row, "total")
}

fn format_number(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_f64)
        .map(|value| format!("{value:.2}"))
        .unwrap_or_default()
}

fn value_string(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_po_list, render_po_show};

    #[test]
    fn list_renders_heading_table_and_quarantine_note() {
        let data = json!({
            "store": {"source": "pos.json", "orders_loaded": 2, "entries_quarantined": 1},
            "rows": [
                {"po_number": "PO-2024-001", "supplier": "Acme Ltd",
                 "line_item_count": 2, "total": 310.0},
                {"po_number": "PO-2024-002", "supplier": "Office Interiors Plc",
                 "line_item_count": 2, "total": 1550.0}
            ]
        });

        let rendered = render_po_list(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("2 purchase orders loaded from pos.json."));
            assert!(text.contains("PO Number"));
            assert!(text.contains("PO-2024-002"));
            assert!(text.contains("1550.00"));
            assert!(text.contains("1 entries were quarantined during validation."));
        }
    }

    #[test]
    fn empty_list_explains_what_to_check() {
        let data = json!({
            "store": {"source": "pos.json", "orders_loaded": 0, "entries_quarantined": 0},
            "rows": []
        });

        let rendered = render_po_list(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No purchase orders loaded from pos.json."));
        }
    }

    #[test]
    fn show_renders_order_fields_and_line_items() {
        let data = json!({
            "store": {"source": "pos.json", "orders_loaded": 1, "entries_quarantined": 0},
            "po": {
                "po_number": "PO-2024-001",
                "supplier": "Acme Ltd",
                "order_date": "2024-01-12",
                "currency": "GBP",
                "line_items": [
                    {"item_code": "NSS-40", "description": "Galvanized steel brackets 40mm",
                     "quantity": 100.0, "unit": "each", "unit_price": 2.5, "line_total": 250.0}
                ],
                "total": 250.0
            }
        });

        let rendered = render_po_show(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Purchase order PO-2024-001."));
            assert!(text.contains("Supplier:"));
            assert!(text.contains("Galvanized steel brackets 40mm"));
            assert!(text.contains("2.50"));
        }
    }
}
