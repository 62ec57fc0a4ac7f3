//! Implementation of the `buildtree list` command.

use serde::Serialize;

use buildtree_core::domain::AppConfig;

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    error::CliResult,
    output::OutputManager,
};

/// JSON view of one app.
#[derive(Debug, Serialize)]
struct AppView<'a> {
    name: &'a str,
    formal_name: &'a str,
    bundle_identifier: String,
    version: &'a str,
    description: &'a str,
}

impl<'a> From<&'a AppConfig> for AppView<'a> {
    fn from(app: &'a AppConfig) -> Self {
        Self {
            name: app.app_name(),
            formal_name: app.formal_name(),
            bundle_identifier: app.bundle_identifier(),
            version: app.version(),
            description: app.description(),
        }
    }
}

pub fn execute(args: ListArgs, global: &GlobalArgs, output: OutputManager) -> CliResult<()> {
    let project = super::load_project(&global.project)?;
    let apps = project.apps();

    match args.format {
        ListFormat::Table => {
            let title = match project.name() {
                Some(name) => format!("Apps in {name}:"),
                None => "Apps:".to_string(),
            };
            output.header(&title)?;
            for app in apps {
                output.print(&format!(
                    "  {} @ {} ({}) - {}",
                    app.app_name(),
                    app.version(),
                    app.bundle_identifier(),
                    app.formal_name()
                ))?;
            }
        }

        ListFormat::List => {
            for app in apps {
                output.print(app.app_name())?;
            }
        }

        // JSON goes out even in quiet mode so it stays parseable in pipes.
        ListFormat::Json => {
            let views: Vec<AppView<'_>> = apps.iter().map(AppView::from).collect();
            output.json(&views)?;
        }
    }

    Ok(())
}
