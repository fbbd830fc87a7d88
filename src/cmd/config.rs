//! Configuration view and validation commands: `gitsense config`.

use anyhow::{Result, anyhow};
use std::path::Path;

use gitsense::config::{Config, GitsenseToml, default_config_path};

use super::super::ConfigCommands;

/// `load` is only called by the commands that read the current configuration,
/// so `init` still works when the existing file or environment is broken.
pub fn cmd_config<F>(path: Option<&Path>, command: Option<ConfigCommands>, load: F) -> Result<()>
where
    F: FnOnce() -> Result<Config>,
{
    match command {
        None | Some(ConfigCommands::Show) => {
            let config = load()?;
            println!();
            println!("Gitsense Configuration");
            println!("======================");
            println!();

            match (&config.path, config.file_found) {
                (Some(path), true) => println!("Config file: {}", path.display()),
                (Some(path), false) => println!("No gitsense.toml found at {}", path.display()),
                (None, _) => println!("No config directory available on this platform"),
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("[backend]");
            println!("  base_url = \"{}\"", config.settings.backend.base_url);
            println!(
                "  poll_interval_ms = {}",
                config.settings.backend.poll_interval_ms
            );
            println!(
                "  request_timeout_ms = {}",
                config.settings.backend.request_timeout_ms
            );
            match config.settings.backend.max_polls {
                Some(max) => println!("  max_polls = {}", max),
                None => println!("  max_polls = (unlimited)"),
            }
            println!();
            println!("[display]");
            println!("  default_view = \"{}\"", config.settings.display.default_view);
            println!();

            if !config.file_found {
                println!("Run 'gitsense config init' to create a gitsense.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            let config = load()?;
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init { force }) => {
            let path = path
                .map(Path::to_path_buf)
                .or_else(default_config_path)
                .ok_or_else(|| anyhow!("No config directory available; pass --config <PATH>"))?;

            if path.exists() && !force {
                println!("gitsense.toml already exists at {}", path.display());
                println!("Pass --force to overwrite it.");
                return Ok(());
            }

            GitsenseToml::default().save(&path)?;

            println!("Created gitsense.toml at {}", path.display());
            println!();
            println!("You can now customize:");
            println!("  - [backend] base_url, poll_interval_ms, max_polls");
            println!("  - [display] default_view");
            println!();
        }
    }

    Ok(())
}
