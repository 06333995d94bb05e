//! Page template precompilation.
//!
//! The page template is read and compiled once, when the plugin is constructed.
//! The compiled form is published on the host under [`SOCKETS_TEMPLATE`] so the
//! route handler renders it without touching the filesystem again.

use std::path::{Path, PathBuf};

use coleman_shared::SettingKey;
use tera::{Context, Tera};

/// Host settings slot holding the compiled page template.
pub const SOCKETS_TEMPLATE: SettingKey<CompiledTemplate> = SettingKey::new("sockets-tmpl");

const FALLBACK_NAME: &str = "page.html";

/// A page template compiled once and rendered many times.
#[derive(Debug)]
pub struct CompiledTemplate {
    tera: Tera,
    name: String,
}

impl CompiledTemplate {
    /// Compile template `source`, registered under `name`.
    ///
    /// Names ending in `.html` are autoescaped.
    pub fn compile(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, source)
            .map_err(|e| TemplateError::Compile {
                template: name.to_string(),
                source: e,
            })?;

        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, context: &Context) -> Result<String, TemplateError> {
        self.tera
            .render(&self.name, context)
            .map_err(|e| TemplateError::Render {
                template: self.name.clone(),
                source: e,
            })
    }

    /// Render without any data.
    pub fn render_empty(&self) -> Result<String, TemplateError> {
        self.render(&Context::new())
    }
}

/// Read the UTF-8 template at `path` and compile it.
///
/// The template is named after the file with any `.tera` suffix removed, so
/// `index.html.tera` compiles as `index.html`.
pub fn load_and_compile(path: &Path) -> Result<CompiledTemplate, TemplateError> {
    let source = std::fs::read_to_string(path).map_err(|e| TemplateError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let name = template_name(path);
    let compiled = CompiledTemplate::compile(&name, &source)?;
    tracing::debug!(?path, template = %name, "Compiled page template");
    Ok(compiled)
}

fn template_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    match file_name.strip_suffix(".tera") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile '{template}': {source}")]
    Compile {
        template: String,
        source: tera::Error,
    },
    #[error("failed to render '{template}': {source}")]
    Render {
        template: String,
        source: tera::Error,
    },
}
