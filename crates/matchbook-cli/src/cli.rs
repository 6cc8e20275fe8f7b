use clap::{Parser, Subcommand};

pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| "threshold must be a number between 0 and 100".to_string())?;
    if !parsed.is_finite() || !(0.0..=100.0).contains(&parsed) {
        return Err("threshold must be a number between 0 and 100".to_string());
    }
    Ok(parsed)
}

pub fn parse_confidence(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| "confidence must be a number between 0 and 1".to_string())?;
    if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
        return Err("confidence must be a number between 0 and 1".to_string());
    }
    Ok(parsed)
}

/// Extended help shown after `matchbook reconcile --help`.
/// Contains workflow guidance, input schemas, and next-step instructions.
pub const RECONCILE_AFTER_HELP: &str = "\
How reconcile works:
  Matchbook does not parse PDFs or run OCR. Your extraction step produces
  one normalized invoice JSON object; matchbook matches it against a
  purchase order database and reports discrepancies.

What to do next:
  1. Export your purchase order database to JSON (one top-level
     `purchase_orders` array).
  2. Run your extraction step and save its output as one invoice JSON object.
  3. Run `matchbook reconcile <invoice.json> --po-db <pos.json>`.
  4. Feed the JSON output (`--json`) or CSV export (`--export`) to your
     review or recommendation step.

Invoice schema (one JSON object; absent fields are tolerated):
  {
    \"invoice_number\": \"INV-1001\",
    \"invoice_date\": \"2024-03-02\",
    \"supplier_name\": \"Office Interiors Plc\",
    \"po_reference\": \"PO-2024-002\",
    \"currency\": \"GBP\",
    \"line_items\": [
      {
        \"item_code\": \"OI-CH1\",
        \"description\": \"Premium office chair, adjustable\",
        \"quantity\": 10,
        \"unit\": \"each\",
        \"unit_price\": 85.0,
        \"line_total\": 850.0
      }
    ],
    \"subtotal\": 850.0,
    \"vat_amount\": 170.0,
    \"vat_rate\": 20.0,
    \"total\": 1020.0
  }

Purchase order database schema:
  {
    \"purchase_orders\": [
      {
        \"po_number\": \"PO-2024-002\",
        \"supplier\": \"Office Interiors Plc\",
        \"order_date\": \"2024-02-03\",
        \"currency\": \"GBP\",
        \"line_items\": [ ...same line item shape... ],
        \"total\": 1550.0
      }
    ]
  }

Matching rules (important):
  A resolvable `po_reference` always wins with 0.99 confidence.
  Otherwise every purchase order is scored: 40% supplier similarity,
  60% average line-item similarity, admitted at `--threshold` (default 70).
  Entries failing validation are quarantined and reported, not fatal.

Tolerance bands:
  unit price   flag above 2% variance, escalate above 15%
  quantity     any inequality flags (quantities are discrete)
  total        flag above min(5.00 absolute, 1% of PO total), escalate above 10%
";

#[derive(Debug, Parser)]
#[command(
    name = "matchbook",
    version,
    about = "supplier invoice reconciliation layer",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match one extracted invoice against a purchase order database
    #[command(after_long_help = RECONCILE_AFTER_HELP)]
    Reconcile {
        /// Path to one extracted invoice JSON object
        invoice: String,
        /// Path to the purchase order database JSON file
        #[arg(long = "po-db")]
        po_db: String,
        /// Fuzzy match admission threshold, 0-100 (default 70)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,
        /// Extraction quality score for this invoice, 0-1 (default 1)
        #[arg(long = "extraction-confidence", value_parser = parse_confidence)]
        extraction_confidence: Option<f64>,
        /// Also write findings to this CSV path
        #[arg(long)]
        export: Option<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Inspect the purchase order database
    #[command(arg_required_else_help = true)]
    Po {
        #[command(subcommand)]
        command: PoCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PoCommand {
    /// List validated purchase orders and quarantine counts
    List {
        /// Path to the purchase order database JSON file
        #[arg(long = "po-db")]
        po_db: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show one purchase order in full
    Show {
        /// The purchase order number to inspect (e.g. PO-2024-002)
        po_number: String,
        /// Path to the purchase order database JSON file
        #[arg(long = "po-db")]
        po_db: String,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
