//! Implementation of the `buildtree create` command.
//!
//! Responsibility: turn CLI arguments and settings into a wired
//! `CreateService`, run it for the selected apps, and display results.
//! No business logic lives here.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, instrument};

use buildtree_adapters::{
    AssetCache, DirectoryRenderer, HostToolchain, LocalFilesystem, TomlPathIndexStore,
};
use buildtree_core::prelude::*;

use crate::{
    cli::{CreateArgs, GlobalArgs, OutputFormat},
    config::Settings,
    error::CliResult,
    output::OutputManager,
    terminal::TerminalConsole,
};

/// Execute the `buildtree create` command.
///
/// Dispatch sequence:
/// 1. Load `buildtree.toml` and select the apps
/// 2. Wire the adapters into a `CreateService`
/// 3. Create each app in turn, stopping at the first failure
/// 4. Report what was created and what was kept
#[instrument(skip_all, fields(platform = %args.platform, format = %args.format))]
pub fn execute(
    args: CreateArgs,
    global: &GlobalArgs,
    settings: Settings,
    output: OutputManager,
) -> CliResult<()> {
    let target = BuildTarget::new(&args.platform, &args.format)?;
    let project = super::load_project(&global.project)?;
    let apps = project.select(args.app.as_deref())?;

    let service = build_service(global, &settings, &target)?;
    debug!(
        apps = apps.len(),
        build_dir = %settings.build_dir.display(),
        "Create service ready"
    );

    let reports = service.create_apps(apps, &target)?;
    print_reports(&reports, service.layout(), &output)
}

fn build_service(
    global: &GlobalArgs,
    settings: &Settings,
    target: &BuildTarget,
) -> CliResult<CreateService> {
    let root = global.project.clone();
    let layout = ProjectLayout::new(&root).with_build_dir(&settings.build_dir);
    let default_template = settings
        .template_dir_in(&root)
        .join(format!("{}-{}", target.platform(), target.output_format()));

    let toolchain = HostToolchain::new()
        .with_required_tools(settings.tools.clone())
        .with_installer(settings.installer.clone());

    let service = CreateService::builder(layout)
        .default_template(default_template)
        .console(Box::new(TerminalConsole::new(
            global.no_input || settings.no_input,
        )))
        .filesystem(Box::new(LocalFilesystem::new()))
        .renderer(Box::new(DirectoryRenderer::new()))
        .path_index(Box::new(TomlPathIndexStore::new()))
        .assets(Box::new(AssetCache::new(settings.cache_dir_in(&root))))
        .toolchain(Box::new(toolchain))
        .build()?;
    Ok(service)
}

/// JSON view of one [`CreateReport`].
#[derive(Debug, Serialize)]
struct ReportView<'a> {
    app: &'a str,
    bundle_path: PathBuf,
    decision: &'static str,
    steps: &'a [StepRecord],
}

fn print_reports(
    reports: &[CreateReport],
    layout: &ProjectLayout,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let views: Vec<_> = reports
            .iter()
            .map(|report| ReportView {
                app: &report.app,
                bundle_path: report.bundle_path.clone(),
                decision: report.decision.as_str(),
                steps: report.actions(),
            })
            .collect();
        output.json(&views)?;
        return Ok(());
    }

    for report in reports {
        let shown = layout.display_path(&report.bundle_path).display();
        if report.created() {
            output.success(&format!("Created {shown}"))?;
            for record in report.actions() {
                debug!(%record, "Step completed");
            }
        } else {
            output.info(&format!("Kept existing {shown}"))?;
        }
    }
    Ok(())
}
