//! `buildtree config`: inspect the resolved settings.

use crate::{
    cli::ConfigCommands,
    config::Settings,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, settings: Settings, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&render(&settings)?)?;
        }

        ConfigCommands::Path => {
            output.print(&Settings::config_path().display().to_string())?;
        }
    }

    Ok(())
}

fn render(settings: &Settings) -> CliResult<String> {
    toml::to_string_pretty(settings).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise settings: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_lists_every_setting() {
        let rendered = render(&Settings::default()).unwrap();
        for key in ["build_dir", "template_dir", "cache_dir", "no_input", "installer"] {
            assert!(rendered.contains(key), "missing {key} in:\n{rendered}");
        }
    }
}
