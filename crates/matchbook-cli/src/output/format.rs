use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    if entries.is_empty() {
        return Vec::new();
    }

    let label_width = entries
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{label:<label_width$}  {value}"))
        .collect()
}

/// Simple fixed-layout table at natural column widths. Values render in
/// full; callers keep cells short.
pub fn render_table(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let mut widths = columns
        .iter()
        .map(|column| column.name.len())
        .collect::<Vec<usize>>();
    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.chars().count());
            }
        }
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    for row in rows {
        output.push(format_row(columns, row, &widths));
    }
    output
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let mut pieces = Vec::with_capacity(columns.len());
    for (index, column) in columns.iter().enumerate() {
        let width = *widths.get(index).unwrap_or(&0);
        let value = cells.get(index).cloned().unwrap_or_default();
        let piece = match column.align {
            Align::Left => format!("{value:<width$}"),
            Align::Right => format!("{value:>width$}"),
        };
        pieces.push(piece);
    }

    format!("{}{}", " ".repeat(INDENT), pieces.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::{Align, Column, key_value_rows, render_table};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Matched:", "PO-2024-002".to_string()),
                ("Findings:", "2".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Matched:   PO-2024-002");
        assert_eq!(rows[1], "  Findings:  2");
    }

    #[test]
    fn table_pads_to_the_widest_cell() {
        let columns = [
            Column {
                name: "PO Number",
                align: Align::Left,
            },
            Column {
                name: "Total",
                align: Align::Right,
            },
        ];
        let rows = vec![
            vec!["PO-2024-001".to_string(), "310.00".to_string()],
            vec!["PO-2024-002".to_string(), "1550.00".to_string()],
        ];

        let rendered = render_table(&columns, &rows);
        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("PO Number"));
        assert!(rendered[1].starts_with("  PO-2024-001"));
        assert!(rendered[2].ends_with("1550.00"));
    }
}
