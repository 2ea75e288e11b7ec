//! HTML template system for page generation.
//!
//! Templates use `{{ variable }}` interpolation; `{{ variable? }}` renders an
//! empty string when the variable is missing. Built-in templates can be
//! overridden by `page.html`, `index.html` and `redirect.html` files in a
//! template directory.

use std::{collections::HashMap, fs, path::Path};

use thiserror::Error;
use tracing::{debug, info};

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable `{variable}` in template {template}")]
    MissingVariable { template: String, variable: String },

    /// Template not found.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Invalid template syntax.
    #[error("invalid template syntax in {template}: {message}")]
    InvalidSyntax { template: String, message: String },

    /// Template file could not be read.
    #[error("failed to read template {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Names of the templates the generator renders.
pub const TEMPLATE_NAMES: [&str; 3] = ["page", "index", "redirect"];

/// Template context with variables for interpolation.
///
/// Values added with [`insert`](Self::insert) are HTML-escaped; values added
/// with [`insert_html`](Self::insert_html) are emitted verbatim.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a text variable, escaping HTML special characters.
    pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        self.variables
            .insert(key.into(), escape_html(value.as_ref()));
    }

    /// Insert pre-rendered markup without escaping.
    pub fn insert_html(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl AsRef<str>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form of [`insert_html`](Self::insert_html).
    #[must_use]
    pub fn with_html(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_html(key, value);
        self
    }

    /// Get a variable value as it will be rendered.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A simple template that supports variable interpolation.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Render the template with the given context.
    ///
    /// Replaces all `{{ variable }}` placeholders with values from context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| self.syntax_error("unclosed {{ delimiter"))?;

            let var_name = after[..end].trim();
            let (var_name, optional) = match var_name.strip_suffix('?') {
                Some(stripped) => (stripped.trim_end(), true),
                None => (var_name, false),
            };
            if var_name.is_empty() {
                return Err(self.syntax_error("empty {{ }} placeholder"));
            }

            match context.get(var_name) {
                Some(value) => out.push_str(value),
                None if optional => {}
                None => {
                    return Err(TemplateError::MissingVariable {
                        template: self.name.clone(),
                        variable: var_name.to_string(),
                    });
                }
            }

            rest = &after[end + 2..];
        }

        out.push_str(rest);
        Ok(out)
    }

    /// Check placeholder syntax without rendering.
    pub fn validate(&self) -> Result<()> {
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| self.syntax_error("unclosed {{ delimiter"))?;
            if after[..end].trim().trim_end_matches('?').trim().is_empty() {
                return Err(self.syntax_error("empty {{ }} placeholder"));
            }
            rest = &after[end + 2..];
        }
        Ok(())
    }

    fn syntax_error(&self, message: &str) -> TemplateError {
        TemplateError::InvalidSyntax {
            template: self.name.clone(),
            message: message.to_string(),
        }
    }
}

/// Registry of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new registry with default templates.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    /// Create a registry with defaults overridden by files in `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Register default built-in templates.
    fn register_defaults(&mut self) {
        self.register(Template::new("page", DEFAULT_PAGE_TEMPLATE));
        self.register(Template::new("index", DEFAULT_INDEX_TEMPLATE));
        self.register(Template::new("redirect", DEFAULT_REDIRECT_TEMPLATE));
    }

    /// Override templates with `{name}.html` files found in `dir`.
    ///
    /// Returns the number of templates loaded. A missing directory loads nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no template directory, using built-in templates");
            return Ok(0);
        }

        let mut loaded = 0;
        for name in TEMPLATE_NAMES {
            let path = dir.join(format!("{name}.html"));
            if !path.exists() {
                continue;
            }

            let content = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let template = Template::new(name, content);
            template.validate()?;
            self.register(template);
            loaded += 1;
            info!(path = %path.display(), "loaded template override");
        }

        Ok(loaded)
    }

    /// Register a template.
    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.name.clone(), template);
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Render a named template with the given context.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let template = self
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        template.render(context)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Default detail page template.
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<!doctype html>
<html lang="{{ lang }}">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{{ title }}</title>
<meta name="description" content="{{ description }}"/>
<link rel="canonical" href="{{ canonical }}"/>
<script type="application/ld+json">
{{ schema_json }}
</script>
</head>
<body>
<header>
  <a href="./index.html">{{ site_title }}</a>
</header>
<main>
  <article>
    <h1>{{ h1 }}</h1>
    <p class="subtitle">{{ subtitle }}</p>
    <p>{{ body_paragraph }}</p>
    <table class="spec">
      <tr><th>keyword</th><td>{{ item.keyword }}</td></tr>
      <tr><th>entity</th><td>{{ item.entity }}</td></tr>
      <tr><th>attribute</th><td>{{ item.attribute }}</td></tr>
      <tr><th>modifier</th><td>{{ item.modifier }}</td></tr>
    </table>
    {{ affiliate_html? }}
    <section class="faq">
      <h2>FAQ</h2>
      <h3>{{ faq_q1 }}</h3>
      <p>{{ faq_a1 }}</p>
      <h3>{{ faq_q2 }}</h3>
      <p>{{ faq_a2 }}</p>
    </section>
    <p class="updated">Updated {{ updated }}</p>
  </article>
</main>
<footer>&copy; {{ year }} {{ site_title }}</footer>
</body>
</html>
"#;

/// Default index template.
pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="{{ lang }}">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{{ title }}</title>
<meta name="description" content="{{ description }}"/>
<link rel="canonical" href="{{ canonical }}"/>
<script type="application/ld+json">
{{ schema_json }}
</script>
</head>
<body>
<main>
  <h1>{{ title }}</h1>
  <p>{{ description }}</p>
  <ul class="pages">
{{ pages }}
  </ul>
</main>
<footer>&copy; {{ year }} {{ title }}</footer>
</body>
</html>
"#;

/// Default redirect template for renamed slugs.
pub const DEFAULT_REDIRECT_TEMPLATE: &str = r#"<!doctype html>
<html lang="{{ lang }}"><head>
<meta charset="utf-8"/>
<meta http-equiv="refresh" content="0;url={{ redirect_url }}"/>
<link rel="canonical" href="{{ redirect_url }}"/>
<title>Redirecting…</title>
</head><body>
<p>이 페이지는 <a href="{{ redirect_url }}">여기로 이동</a>했어.</p>
</body></html>
"#;

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_render_simple() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let ctx = TemplateContext::new().with_var("name", "World");

        assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_render_dotted_names() {
        let template = Template::new("test", "{{item.entity}}/{{ item.attribute }}");
        let ctx = TemplateContext::new()
            .with_var("item.entity", "SSD")
            .with_var("item.attribute", "NVMe");

        assert_eq!(template.render(&ctx).unwrap(), "SSD/NVMe");
    }

    #[test]
    fn test_render_missing_variable() {
        let template = Template::new("test", "Hello, {{ name }}!");
        let err = template.render(&TemplateContext::new()).unwrap_err();

        assert!(matches!(err, TemplateError::MissingVariable { .. }));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_render_optional_variable() {
        let template = Template::new("test", "a{{ maybe? }}b");

        assert_eq!(template.render(&TemplateContext::new()).unwrap(), "ab");
    }

    #[test]
    fn test_render_escapes_text_but_not_html() {
        let template = Template::new("test", "{{ text }}|{{ markup }}");
        let ctx = TemplateContext::new()
            .with_var("text", "<b>\"A&B\"</b>")
            .with_html("markup", "<li>ok</li>");

        assert_eq!(
            template.render(&ctx).unwrap(),
            "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;|<li>ok</li>"
        );
    }

    #[test]
    fn test_values_are_not_reinterpolated() {
        let template = Template::new("test", "{{ a }}{{ b }}");
        let ctx = TemplateContext::new()
            .with_html("a", "{{ b }}")
            .with_var("b", "x");

        assert_eq!(template.render(&ctx).unwrap(), "{{ b }}x");
    }

    #[test]
    fn test_unclosed_delimiter() {
        let template = Template::new("broken", "Hello, {{ name");

        assert!(matches!(
            template.render(&TemplateContext::new()),
            Err(TemplateError::InvalidSyntax { .. })
        ));
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_defaults() {
        for (name, content) in [
            ("page", DEFAULT_PAGE_TEMPLATE),
            ("index", DEFAULT_INDEX_TEMPLATE),
            ("redirect", DEFAULT_REDIRECT_TEMPLATE),
        ] {
            Template::new(name, content).validate().unwrap();
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = TemplateRegistry::new();

        for name in TEMPLATE_NAMES {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert!(matches!(
            registry.render("nope", &TemplateContext::new()),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_registry_load_dir_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "custom {{ title }}").unwrap();
        fs::write(dir.path().join("unrelated.html"), "ignored").unwrap();

        let mut registry = TemplateRegistry::new();
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        let ctx = TemplateContext::new().with_var("title", "T");
        assert_eq!(registry.render("index", &ctx).unwrap(), "custom T");
        assert!(registry.get("unrelated").is_none());
    }

    #[test]
    fn test_registry_rejects_malformed_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.html"), "{{ title").unwrap();

        assert!(TemplateRegistry::from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_registry_missing_dir() {
        let mut registry = TemplateRegistry::new();
        assert_eq!(registry.load_dir(Path::new("/nonexistent/templates")).unwrap(), 0);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }
}
