//! Theme engine wrapping Tera.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tera::Tera;
use tracing::debug;

/// Templates compiled into the binary.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("news/home.html", include_str!("../../templates/news/home.html")),
    ("news/detail.html", include_str!("../../templates/news/detail.html")),
    ("news/edit.html", include_str!("../../templates/news/edit.html")),
    ("news/delete.html", include_str!("../../templates/news/delete.html")),
    ("users/login.html", include_str!("../../templates/users/login.html")),
    ("users/logout.html", include_str!("../../templates/users/logout.html")),
    ("users/signup.html", include_str!("../../templates/users/signup.html")),
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Create a theme engine from the templates compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.iter().copied())
            .context("failed to load built-in templates")?;

        Self::register_filters(&mut tera);
        debug!(count = BUILTIN_TEMPLATES.len(), "loaded built-in templates");

        Ok(Self { tera })
    }

    /// Create a theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), dir = %template_dir.display(), "loaded templates");

        Ok(Self { tera })
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // RFC 3339 timestamps as "31.12.2025 18:05"
        tera.register_filter(
            "format_date",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let raw = tera::try_get_value!("format_date", "value", String, value);

                let formatted = chrono::DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
                    .unwrap_or_else(|_| "Unknown date".to_string());

                Ok(tera::Value::String(formatted))
            },
        );
    }

    /// Get the underlying Tera instance.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Render a template with the given context.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render template {template}"))
    }
}
