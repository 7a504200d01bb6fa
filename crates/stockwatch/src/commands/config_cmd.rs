//! Config subcommand handlers.

use std::io::BufRead;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(stockwatch_config::config_path);
            println!("{}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let config = super::load(global)?;
            print!("{}", config.redacted().to_toml()?);
            Ok(())
        }

        ConfigCommand::SetToken => {
            eprintln!("Paste the bot token and press Enter:");
            let mut token = String::new();
            std::io::stdin().lock().read_line(&mut token)?;
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "token cannot be empty".into(),
                });
            }
            stockwatch_config::store_token(token)?;
            eprintln!("Token stored in the system keyring.");
            Ok(())
        }
    }
}
