use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;

use super::OutputFormat;
use crate::config::Config;
use crate::db::resolve_store;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("store_path: {}", config.store_path.value.display());
                        println!("  source: {}", config.store_path.source);
                        println!();

                        let (_, backend) =
                            resolve_store(&config.store_path.value, config.backend.value);
                        match config.backend.value {
                            Some(_) => println!("backend: {}", backend),
                            None => println!("backend: {} (from store path)", backend),
                        }
                        println!("  source: {}", config.backend.source);
                        println!();

                        println!("grocery_file: {}", config.grocery_file.value.display());
                        println!("  source: {}", config.grocery_file.source);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                // Check if config already exists
                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'recipe-drawer config show' to view current configuration.");
                    return Ok(());
                }

                // Create parent directory
                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(default_config_contents().as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn default_config_contents() -> String {
    format!(
        r#"# recipe-drawer configuration

# Recipe store location (default: {store})
# Relative paths are resolved against this file's directory.
# store_path: recipes.jsonl

# Store backend: jsonl or sqlite. When unset it follows the store_path
# extension (.db, .sqlite and .sqlite3 mean sqlite).
# backend: jsonl

# File written by the grocery command
grocery_file: grocery.txt
"#,
        store = Config::default_data_dir().join("recipes.jsonl").display()
    )
}
