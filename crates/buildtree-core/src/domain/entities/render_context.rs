use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::entities::{app::AppConfig, target::BuildTarget};

/// Context for template rendering.
///
/// A **Value Object** containing all data needed to render a template.
/// Immutable after creation; transformations create new instances (see
/// `with_variable`).
///
/// ## Built-in Variables
///
/// | Variable            | Example               |
/// |---------------------|-----------------------|
/// | `app_name`          | `hello-world`         |
/// | `formal_name`       | `Hello World`         |
/// | `module_name`       | `hello_world`         |
/// | `bundle`            | `com.example`         |
/// | `bundle_identifier` | `com.example.hello-world` |
/// | `version`           | `0.0.1`               |
/// | `description`       | free text             |
/// | `author`            | free text, may be empty |
/// | `platform`          | `linux`               |
/// | `output_format`     | `system`              |
/// | `year`              | current year          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Context with the built-in variables for one app on one target.
    pub fn for_app(app: &AppConfig, target: &BuildTarget) -> Self {
        Self::empty()
            .with_variable("app_name", app.app_name())
            .with_variable("formal_name", app.formal_name())
            .with_variable("module_name", app.module_name())
            .with_variable("bundle", app.bundle())
            .with_variable("bundle_identifier", app.bundle_identifier())
            .with_variable("version", app.version())
            .with_variable("description", app.description())
            .with_variable("author", app.author().unwrap_or_default())
            .with_variable("platform", target.platform())
            .with_variable("output_format", target.output_format())
            .with_variable("year", chrono::Local::now().year().to_string())
    }

    pub fn empty() -> Self {
        Self {
            variables: BTreeMap::new(),
        }
    }

    /// Add a variable, consuming self and returning a new context.
    ///
    /// Later values override earlier ones.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace `{{ key }}` placeholders (inner whitespace optional).
    ///
    /// - `{{ unknown }}` remains as literal text
    /// - an unterminated `{{` is copied through unchanged
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];

            let Some(end) = after_open.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = after_open[..end].trim();
            match self.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after_open[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RenderContext {
        let app = AppConfig::builder("hello-world", "com.example")
            .formal_name("Hello World")
            .version("1.2.3")
            .source("src/hello_world")
            .build()
            .unwrap();
        RenderContext::for_app(&app, &BuildTarget::new("linux", "system").unwrap())
    }

    #[test]
    fn builtin_variables() {
        let ctx = context();
        assert_eq!(ctx.get("app_name"), Some("hello-world"));
        assert_eq!(ctx.get("module_name"), Some("hello_world"));
        assert_eq!(ctx.get("bundle_identifier"), Some("com.example.hello-world"));
        assert_eq!(ctx.get("platform"), Some("linux"));
        assert_eq!(ctx.get("author"), Some(""));
        assert!(ctx.get("year").is_some());
    }

    #[test]
    fn renders_with_and_without_spaces() {
        let ctx = context();
        assert_eq!(
            ctx.render("{{formal_name}} v{{ version }} on {{  output_format }}"),
            "Hello World v1.2.3 on system"
        );
    }

    #[test]
    fn unknown_and_unterminated_placeholders_stay_literal() {
        let ctx = context();
        assert_eq!(ctx.render("{{ nope }}-{{app_name}}"), "{{ nope }}-hello-world");
        assert_eq!(ctx.render("x {{ app_name"), "x {{ app_name");
    }

    #[test]
    fn custom_variables_override() {
        let ctx = context().with_variable("version", "9");
        assert_eq!(ctx.render("{{version}}"), "9");
    }
}
