//! Create Service - main application orchestrator.
//!
//! This service coordinates the entire create workflow for one app:
//! 1. Check the app is supported on the target
//! 2. Confirm overwriting an existing bundle
//! 3. Generate the bundle from its template
//! 4. Run the remaining steps of the plan, in order
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{AssetProvider, Console, Filesystem, PathIndexStore, TemplateRenderer, Toolchain},
        services::confirmation,
    },
    domain::{
        AppConfig, BuildTarget, OverwriteDecision, PathIndex, ProjectLayout, Step, StepPlan,
        StepRecord,
    },
    error::{BuildtreeError, BuildtreeResult},
};

/// What a `create_app` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReport {
    pub app: String,
    pub bundle_path: PathBuf,
    pub decision: OverwriteDecision,
    pub steps: Vec<StepRecord>,
}

impl CreateReport {
    fn new(app: &AppConfig, bundle_path: PathBuf, decision: OverwriteDecision) -> Self {
        Self {
            app: app.app_name().to_string(),
            bundle_path,
            decision,
            steps: Vec::new(),
        }
    }

    /// `false` when an existing bundle was kept.
    pub fn created(&self) -> bool {
        self.decision.proceeds()
    }

    /// The ordered action log.
    pub fn actions(&self) -> &[StepRecord] {
        &self.steps
    }

    fn record(&mut self, step: Step) {
        self.steps.push(StepRecord::new(step, self.app.clone()));
    }
}

/// Everything a step needs to know about the current run.
pub(crate) struct Run<'a> {
    pub app: &'a AppConfig,
    pub target: &'a BuildTarget,
    pub bundle_path: PathBuf,
    pub index: PathIndex,
}

/// Main create service.
///
/// Holds the project layout and one adapter per port. Build it with
/// [`CreateService::builder`].
pub struct CreateService {
    pub(crate) layout: ProjectLayout,
    pub(crate) default_template: Option<PathBuf>,
    pub(crate) console: Box<dyn Console>,
    pub(crate) filesystem: Box<dyn Filesystem>,
    pub(crate) renderer: Box<dyn TemplateRenderer>,
    pub(crate) path_index: Box<dyn PathIndexStore>,
    pub(crate) assets: Box<dyn AssetProvider>,
    pub(crate) toolchain: Box<dyn Toolchain>,
}

impl CreateService {
    /// Start configuring a service for the project at `layout`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = CreateService::builder(ProjectLayout::new("."))
    ///     .default_template("templates/linux-system")
    ///     .console(Box::new(console))
    ///     .filesystem(Box::new(LocalFilesystem::new()))
    ///     .renderer(Box::new(DirectoryRenderer::new()))
    ///     .path_index(Box::new(TomlPathIndexStore::new()))
    ///     .assets(Box::new(AssetCache::new(cache_dir)))
    ///     .toolchain(Box::new(HostToolchain::default()))
    ///     .build()?;
    /// ```
    pub fn builder(layout: ProjectLayout) -> CreateServiceBuilder {
        CreateServiceBuilder::new(layout)
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Create (or recreate) the bundle for one app.
    ///
    /// Declining to overwrite an existing bundle is not an error: the report
    /// comes back with [`OverwriteDecision::Keep`] and no steps.
    #[instrument(
        skip_all,
        fields(app = %app.app_name(), target = %target)
    )]
    pub fn create_app(
        &self,
        app: &AppConfig,
        target: &BuildTarget,
    ) -> BuildtreeResult<CreateReport> {
        let app = app.for_target(target);

        if !app.supported() {
            return Err(ApplicationError::UnsupportedPlatform {
                app: app.app_name().to_string(),
                platform: target.platform().to_string(),
                format: target.output_format().to_string(),
            }
            .into());
        }

        let template = self.template_for(&app)?;
        let bundle_path = self.layout.bundle_path(&app, target);
        let display_path = self.layout.display_path(&bundle_path).to_path_buf();

        let decision = confirmation::confirm_overwrite(
            self.filesystem.as_ref(),
            self.console.as_ref(),
            &bundle_path,
            &display_path,
        )?;

        let mut report = CreateReport::new(&app, bundle_path.clone(), decision);
        match decision {
            OverwriteDecision::Keep => {
                info!(
                    "Aborting creation of app {}; existing application will not be overwritten.",
                    app.app_name()
                );
                return Ok(report);
            }
            OverwriteDecision::Overwrite => {
                info!(path = %display_path.display(), "Overwriting existing bundle");
            }
            OverwriteDecision::Absent => {}
        }

        let index = self.generate_app_template(&app, target, &template, &bundle_path)?;
        report.record(Step::Generate);

        let run = Run {
            app: &app,
            target,
            bundle_path,
            index,
        };
        let plan = StepPlan::after_generate(run.index.requires_stub(), false);
        for step in &plan {
            self.run_step(*step, &run).map_err(|e| {
                BuildtreeError::from(ApplicationError::step_failed(app.app_name(), step.name(), e))
            })?;
            report.record(*step);
        }

        info!(
            "Created {} for {} in {}",
            app.app_name(),
            target,
            display_path.display()
        );
        Ok(report)
    }

    /// Create several apps one after the other, stopping at the first error.
    pub fn create_apps<'a, I>(
        &self,
        apps: I,
        target: &BuildTarget,
    ) -> BuildtreeResult<Vec<CreateReport>>
    where
        I: IntoIterator<Item = &'a AppConfig>,
    {
        apps.into_iter()
            .map(|app| self.create_app(app, target))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_step(&self, step: Step, run: &Run<'_>) -> BuildtreeResult<()> {
        match step {
            Step::Generate => Err(BuildtreeError::Internal {
                message: "generate is not part of the post-generate plan".into(),
            }),
            Step::Support => self.install_app_support_package(run),
            Step::Stub => self.install_stub_binary(run),
            Step::VerifyAppTemplate => self.verify_app_template(run),
            Step::VerifyAppTools => self.toolchain.verify_app_tools(run.app, run.target),
            Step::Code { test_mode } => self.install_app_code(run, test_mode),
            Step::Requirements { test_mode } => self.install_app_requirements(run, test_mode),
            Step::Resources => self.install_app_resources(run),
            Step::Cleanup => self.cleanup_app_content(run),
        }
    }

    /// The app's own template, else the service default.
    fn template_for(&self, app: &AppConfig) -> BuildtreeResult<PathBuf> {
        app.template()
            .or(self.default_template.as_deref())
            .map(|template| self.layout.resolve(template))
            .ok_or_else(|| BuildtreeError::Configuration {
                message: format!("no template configured for {}", app.app_name()),
            })
    }

    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        self.layout.resolve(path)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`CreateService`]; every port must be supplied.
pub struct CreateServiceBuilder {
    layout: ProjectLayout,
    default_template: Option<PathBuf>,
    console: Option<Box<dyn Console>>,
    filesystem: Option<Box<dyn Filesystem>>,
    renderer: Option<Box<dyn TemplateRenderer>>,
    path_index: Option<Box<dyn PathIndexStore>>,
    assets: Option<Box<dyn AssetProvider>>,
    toolchain: Option<Box<dyn Toolchain>>,
}

impl CreateServiceBuilder {
    fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            default_template: None,
            console: None,
            filesystem: None,
            renderer: None,
            path_index: None,
            assets: None,
            toolchain: None,
        }
    }

    /// Template used by apps that do not name their own.
    pub fn default_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.default_template = Some(template.into());
        self
    }

    pub fn console(mut self, console: Box<dyn Console>) -> Self {
        self.console = Some(console);
        self
    }

    pub fn filesystem(mut self, filesystem: Box<dyn Filesystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    pub fn renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn path_index(mut self, path_index: Box<dyn PathIndexStore>) -> Self {
        self.path_index = Some(path_index);
        self
    }

    pub fn assets(mut self, assets: Box<dyn AssetProvider>) -> Self {
        self.assets = Some(assets);
        self
    }

    pub fn toolchain(mut self, toolchain: Box<dyn Toolchain>) -> Self {
        self.toolchain = Some(toolchain);
        self
    }

    pub fn build(self) -> BuildtreeResult<CreateService> {
        fn required<T>(port: Option<T>, name: &'static str) -> BuildtreeResult<T> {
            port.ok_or_else(|| ApplicationError::AdapterNotConfigured { name }.into())
        }

        Ok(CreateService {
            layout: self.layout,
            default_template: self.default_template,
            console: required(self.console, "console")?,
            filesystem: required(self.filesystem, "filesystem")?,
            renderer: required(self.renderer, "renderer")?,
            path_index: required(self.path_index, "path index")?,
            assets: required(self.assets, "assets")?,
            toolchain: required(self.toolchain, "toolchain")?,
        })
    }
}
