//! Template rendering on top of MiniJinja.
//!
//! Both file contents and file paths are treated as templates, so a template
//! tree may use `{{ name }}` segments in directory and file names.

use minijinja::{AutoEscape, Environment};
use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::Result;
use crate::ioutils::write_file;

/// MiniJinja-based template rendering engine.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        // Generated sources are not HTML; escaping would corrupt them.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        // MiniJinja strips the template's final newline by default; generated
        // files must keep theirs.
        env.set_keep_trailing_newline(true);
        Self { env }
    }

    /// Renders a template string against `context`.
    pub fn render_str(&self, template: &str, context: &Value, name: Option<&str>) -> Result<String> {
        let mut env = self.env.clone();
        let name = name.unwrap_or("temp").to_string();
        env.add_template_owned(name.clone(), template.to_string())?;
        let tmpl = env.get_template(&name)?;
        Ok(tmpl.render(context)?)
    }

    /// Renders a single template into `target_path`.
    ///
    /// An existing file at the target is overwritten; last writer wins, with a
    /// warning so colliding plugins are at least visible in the logs.
    pub fn render_file(&self, template: &str, context: &Value, target_path: &Path) -> Result<()> {
        if target_path.exists() {
            log::warn!("Overwriting existing file: {}", target_path.display());
        }
        let rendered = self.render_str(template, context, target_path.to_str())?;
        write_file(&rendered, target_path)
    }

    /// Renders every file under `template_dir` into `target_dir`, preserving
    /// the relative layout. Paths are rendered before contents.
    pub fn render_directory(
        &self,
        template_dir: &Path,
        target_dir: &Path,
        context: &Value,
    ) -> Result<()> {
        for entry in WalkDir::new(template_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(template_dir)
                .expect("walkdir yields paths under its root");
            let relative_str = relative.to_string_lossy().replace('\\', "/");
            let rendered_relative = self.render_str(&relative_str, context, Some(&relative_str))?;

            let template = std::fs::read_to_string(entry.path())?;
            let target_path = target_dir.join(rendered_relative);
            log::debug!(
                "Rendering template {} -> {}",
                entry.path().display(),
                target_path.display()
            );
            self.render_file(&template, context, &target_path)?;
        }
        Ok(())
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_placeholders() {
        let engine = TemplateEngine::new();
        let rendered = engine
            .render_str("Hello, {{ name }}!", &json!({ "name": "armature" }), None)
            .unwrap();
        assert_eq!(rendered, "Hello, armature!");
    }

    #[test]
    fn keeps_trailing_newline() {
        let engine = TemplateEngine::new();
        let rendered = engine
            .render_str("const a = {{ value }};\n", &json!({ "value": 1 }), None)
            .unwrap();
        assert_eq!(rendered, "const a = 1;\n");
    }

    #[test]
    fn does_not_escape_html() {
        let engine = TemplateEngine::new();
        let rendered = engine
            .render_str("<div>{{ tag }}</div>", &json!({ "tag": "<span>" }), None)
            .unwrap();
        assert_eq!(rendered, "<div><span></div>");
    }

    #[test]
    fn renders_directory_with_templated_paths() {
        let engine = TemplateEngine::new();
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();

        std::fs::create_dir_all(source.path().join("src")).unwrap();
        std::fs::write(
            source.path().join("src/{{ entry }}.js"),
            "console.log('{{ project }}');\n",
        )
        .unwrap();

        engine
            .render_directory(
                source.path(),
                target.path(),
                &json!({ "entry": "index", "project": "demo" }),
            )
            .unwrap();

        let written =
            std::fs::read_to_string(target.path().join("src/index.js")).unwrap();
        assert_eq!(written, "console.log('demo');\n");
    }

    #[test]
    fn render_file_overwrites_existing_target() {
        let engine = TemplateEngine::new();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("file.txt");
        std::fs::write(&target, "old").unwrap();
        engine.render_file("new", &json!({}), &target).unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
