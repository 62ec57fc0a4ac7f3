//! Renders a template directory into a bundle directory.
//!
//! Every file and directory below the template root is reproduced under the
//! destination. `{{ name }}` placeholders are substituted in path components
//! and in the contents of UTF-8 files; anything else is copied byte for byte.
//!
//! ```text
//! templates/tester-dummy/           build/first/tester/dummy/
//! ├── bundle.toml              ──►  ├── bundle.toml
//! ├── {{ app_name }}.desktop   ──►  ├── first.desktop
//! └── src/                     ──►  └── src/
//!     └── logo.png                      └── logo.png
//! ```

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use buildtree_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::{BuildtreeError, BuildtreeResult},
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Directory names never copied from a template checkout.
const IGNORED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Renders templates stored as plain directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryRenderer;

impl DirectoryRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for DirectoryRenderer {
    #[instrument(skip_all, fields(template = %template.display()))]
    fn render(
        &self,
        template: &Path,
        destination: &Path,
        context: &RenderContext,
    ) -> BuildtreeResult<()> {
        if !template.is_dir() {
            return Err(render_error(
                context,
                format!("template directory {} not found", template.display()),
            ));
        }

        let walker = WalkDir::new(template)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir()
                    && IGNORED_DIRS
                        .iter()
                        .any(|ignored| entry.file_name() == *ignored))
            });

        let mut rendered = 0usize;
        for entry in walker {
            let entry = entry.map_err(|e| render_error(context, e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(template)
                .map_err(|e| render_error(context, e.to_string()))?;
            let target = destination.join(render_path(relative, context)?);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target).map_err(|e| io_error(&target, e))?;
                continue;
            }

            let raw = fs::read(entry.path()).map_err(|e| io_error(entry.path(), e))?;
            let content = match String::from_utf8(raw) {
                Ok(text) => context.render(&text).into_bytes(),
                Err(binary) => binary.into_bytes(),
            };
            fs::write(&target, content).map_err(|e| io_error(&target, e))?;
            copy_permissions(entry.path(), &target)?;
            rendered += 1;
        }

        debug!(files = rendered, "Template rendered");
        Ok(())
    }
}

/// Render every component of a template-relative path.
///
/// A component that renders to something other than a plain name (empty,
/// `..`, or containing a separator) is rejected so a template cannot write
/// outside the bundle.
fn render_path(relative: &Path, context: &RenderContext) -> BuildtreeResult<PathBuf> {
    let mut rendered = PathBuf::new();
    for component in relative.components() {
        let raw = component.as_os_str().to_string_lossy();
        let name = context.render(&raw);
        let mut parts = Path::new(&name).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(part)), None) => rendered.push(part),
            _ => {
                return Err(render_error(
                    context,
                    format!("path component '{raw}' renders to invalid name '{name}'"),
                ));
            }
        }
    }
    Ok(rendered)
}

#[cfg(unix)]
fn copy_permissions(from: &Path, to: &Path) -> BuildtreeResult<()> {
    let perms = fs::metadata(from)
        .map_err(|e| io_error(from, e))?
        .permissions();
    fs::set_permissions(to, perms).map_err(|e| io_error(to, e))
}

#[cfg(not(unix))]
fn copy_permissions(_from: &Path, _to: &Path) -> BuildtreeResult<()> {
    Ok(())
}

fn render_error(context: &RenderContext, reason: String) -> BuildtreeError {
    ApplicationError::TemplateRender {
        app: context.get("app_name").unwrap_or_default().to_string(),
        reason,
    }
    .into()
}

fn io_error(path: &Path, e: std::io::Error) -> BuildtreeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        RenderContext::empty()
            .with_variable("app_name", "first")
            .with_variable("formal_name", "First App")
    }

    #[test]
    fn renders_names_and_contents() {
        let template = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(template.path().join("{{ app_name }}")).unwrap();
        fs::write(
            template.path().join("{{ app_name }}/{{app_name}}.desktop"),
            "Name={{ formal_name }}\nExec={{ unknown }}\n",
        )
        .unwrap();

        DirectoryRenderer::new()
            .render(template.path(), out.path(), &context())
            .unwrap();

        let desktop = fs::read_to_string(out.path().join("first/first.desktop")).unwrap();
        assert_eq!(desktop, "Name=First App\nExec={{ unknown }}\n");
    }

    #[test]
    fn binary_files_are_copied_verbatim() {
        let template = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let bytes = [0xff, 0xfe, b'{', b'{', 0x00];
        fs::write(template.path().join("icon.png"), bytes).unwrap();

        DirectoryRenderer::new()
            .render(template.path(), out.path(), &context())
            .unwrap();

        assert_eq!(fs::read(out.path().join("icon.png")).unwrap(), bytes);
    }

    #[test]
    fn vcs_directories_are_skipped() {
        let template = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(template.path().join(".git")).unwrap();
        fs::write(template.path().join(".git/HEAD"), "ref").unwrap();
        fs::write(template.path().join("new"), "new").unwrap();

        DirectoryRenderer::new()
            .render(template.path(), out.path(), &context())
            .unwrap();

        assert!(out.path().join("new").exists());
        assert!(!out.path().join(".git").exists());
    }

    #[test]
    fn missing_template_is_a_render_error() {
        let out = tempfile::tempdir().unwrap();
        let err = DirectoryRenderer::new()
            .render(&out.path().join("nope"), out.path(), &context())
            .unwrap_err();
        assert!(matches!(
            err,
            BuildtreeError::Application(ApplicationError::TemplateRender { .. })
        ));
    }

    #[test]
    fn escaping_path_components_are_rejected() {
        let ctx = RenderContext::empty().with_variable("app_name", "..");
        assert!(render_path(Path::new("{{ app_name }}/x"), &ctx).is_err());
        assert_eq!(
            render_path(Path::new("{{ app_name }}/x"), &context()).unwrap(),
            PathBuf::from("first/x")
        );
    }
}
