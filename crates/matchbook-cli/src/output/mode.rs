use crate::cli::{Commands, PoCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Reconcile { json, .. } => *json,
        Commands::Po { command } => match command {
            PoCommand::List { json, .. } | PoCommand::Show { json, .. } => *json,
        },
    };
    if json { OutputMode::Json } else { OutputMode::Text }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn mode_uses_json_when_the_flag_is_present() {
        let cases: [Vec<&str>; 3] = [
            vec![
                "matchbook",
                "reconcile",
                "invoice.json",
                "--po-db",
                "pos.json",
                "--json",
            ],
            vec!["matchbook", "po", "list", "--po-db", "pos.json", "--json"],
            vec![
                "matchbook",
                "po",
                "show",
                "PO-1",
                "--po-db",
                "pos.json",
                "--json",
            ],
        ];
        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn mode_defaults_to_text() {
        let parsed = parse_from([
            "matchbook",
            "reconcile",
            "invoice.json",
            "--po-db",
            "pos.json",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
