use matchbook_core::commands::reconcile::ReconcileOptions;
use matchbook_core::commands::{po, reconcile};
use matchbook_core::{CoreResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, PoCommand};

pub fn dispatch(cli: &Cli) -> CoreResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Reconcile {
            invoice,
            po_db,
            threshold,
            extraction_confidence,
            export,
            json: _,
        } => reconcile::run(ReconcileOptions {
            invoice_path: invoice.clone(),
            po_source: po_db.clone(),
            threshold: *threshold,
            extraction_confidence: *extraction_confidence,
            export_path: export.clone(),
        }),
        Commands::Po { command } => match command {
            PoCommand::List { po_db, .. } => po::list(po_db),
            PoCommand::Show {
                po_number, po_db, ..
            } => po::show(po_db, po_number),
        },
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn missing_po_database_maps_to_failure_not_panic() {
        let parsed = parse_from([
            "matchbook",
            "po",
            "list",
            "--po-db",
            "/nonexistent/purchase_orders.json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_err());
            if let Err(error) = response {
                assert_eq!(error.code, "po_source_not_found");
            }
        }
    }

    #[test]
    fn missing_invoice_maps_to_failure_not_panic() {
        let parsed = parse_from([
            "matchbook",
            "reconcile",
            "/nonexistent/invoice.json",
            "--po-db",
            "/nonexistent/purchase_orders.json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_err());
        }
    }
}
