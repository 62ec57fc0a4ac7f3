//! The `generate` step: turn a template into a fresh bundle directory.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, services::CreateService},
    domain::{AppConfig, BuildTarget, DomainValidator, PathIndex, RenderContext, Step},
    error::{BuildtreeError, BuildtreeResult},
};

impl CreateService {
    /// Render `template` into an empty `bundle_path` and read back the
    /// template's path index.
    ///
    /// Anything previously at `bundle_path` is removed first. A template that
    /// ships no index gets the default one, which is then persisted.
    #[instrument(skip_all, fields(app = %app.app_name(), template = %template.display()))]
    pub(crate) fn generate_app_template(
        &self,
        app: &AppConfig,
        target: &BuildTarget,
        template: &Path,
        bundle_path: &Path,
    ) -> BuildtreeResult<PathIndex> {
        info!("Generating application template...");

        if self.filesystem.exists(bundle_path) {
            debug!(path = %bundle_path.display(), "Removing old bundle");
            self.filesystem.remove_path(bundle_path)?;
        }
        self.filesystem.create_dir_all(bundle_path)?;

        let context = RenderContext::for_app(app, target);
        self.renderer
            .render(template, bundle_path, &context)
            .map_err(|e| template_error(app, e))?;

        self.read_path_index(app, bundle_path).map_err(|e| {
            ApplicationError::step_failed(app.app_name(), Step::Generate.name(), e).into()
        })
    }

    fn read_path_index(&self, app: &AppConfig, bundle_path: &Path) -> BuildtreeResult<PathIndex> {
        let index = match self.path_index.load(app, bundle_path)? {
            Some(index) => index,
            None => {
                debug!("Template ships no path index; recording defaults");
                let index = PathIndex::default();
                self.path_index.save(app, bundle_path, &index)?;
                index
            }
        };
        DomainValidator::validate_path_index(&index)?;
        Ok(index)
    }
}

fn template_error(app: &AppConfig, error: BuildtreeError) -> BuildtreeError {
    match error {
        already @ BuildtreeError::Application(ApplicationError::TemplateRender { .. }) => already,
        other => ApplicationError::TemplateRender {
            app: app.app_name().to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}
