use crate::app::models::DataSource;
use crate::app::resolver::append_suffix;
use minijinja::{Environment, UndefinedBehavior};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Per-file failure taxonomy. Fatal in single-file mode, isolated and
/// reported per template in batch mode.
#[derive(Debug, Error)]
pub enum RenderFailure {
    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile template {}: {source}", path.display())]
    TemplateLoad {
        path: PathBuf,
        source: minijinja::Error,
    },
    #[error("no data document for {} (tried .json and .sh)", stem.display())]
    DataMissing { stem: PathBuf },
    #[error("failed to load data from {}: {message}", path.display())]
    DataLoad { path: PathBuf, message: String },
    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        source: minijinja::Error,
    },
    #[error("failed to write rendered output: {0}")]
    Sink(std::io::Error),
}

/// Renders the template at `template_path` against the data document
/// resolved from `data_stem`, streaming the result into `sink`. The
/// sink is flushed before returning; success means it received a
/// complete rendering.
pub fn render(
    template_path: &Path,
    data_stem: &Path,
    sink: &mut dyn Write,
) -> Result<(), RenderFailure> {
    let raw = fs::read_to_string(template_path).map_err(|source| RenderFailure::TemplateRead {
        path: template_path.to_path_buf(),
        source,
    })?;
    let name = template_path.display().to_string();

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.add_template(&name, &raw)
        .map_err(|source| RenderFailure::TemplateLoad {
            path: template_path.to_path_buf(),
            source,
        })?;
    let template = env
        .get_template(&name)
        .map_err(|source| RenderFailure::TemplateLoad {
            path: template_path.to_path_buf(),
            source,
        })?;

    let data = load_data(&resolve_source(data_stem)?)?;

    let rendered = template
        .render(&data)
        .map_err(|source| RenderFailure::Render {
            path: template_path.to_path_buf(),
            source,
        })?;

    sink.write_all(rendered.as_bytes())
        .map_err(RenderFailure::Sink)?;
    sink.flush().map_err(RenderFailure::Sink)?;
    Ok(())
}

/// Extension resolution for a data stem: an exact existing file is
/// taken as-is, otherwise `<stem>.json` is probed before `<stem>.sh`.
fn resolve_source(stem: &Path) -> Result<DataSource, RenderFailure> {
    if stem.is_file() {
        return Ok(DataSource::for_file(stem));
    }
    let document = append_suffix(stem, ".json");
    if document.is_file() {
        return Ok(DataSource::Static(document));
    }
    let script = append_suffix(stem, ".sh");
    if script.is_file() {
        return Ok(DataSource::Computed(script));
    }
    Err(RenderFailure::DataMissing {
        stem: stem.to_path_buf(),
    })
}

fn load_data(source: &DataSource) -> Result<Value, RenderFailure> {
    match source {
        DataSource::Static(path) => {
            let text = fs::read_to_string(path).map_err(|e| data_load(path, e.to_string()))?;
            serde_json::from_str(&text).map_err(|e| data_load(path, e.to_string()))
        }
        DataSource::Computed(path) => {
            // Relative script paths need resolving before exec.
            let program = path
                .canonicalize()
                .map_err(|e| data_load(path, e.to_string()))?;
            let output = Command::new(&program)
                .output()
                .map_err(|e| data_load(path, e.to_string()))?;
            if !output.status.success() {
                return Err(data_load(
                    path,
                    format!(
                        "data command exited with {}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                ));
            }
            serde_json::from_slice(&output.stdout).map_err(|e| data_load(path, e.to_string()))
        }
    }
}

fn data_load(path: &Path, message: String) -> RenderFailure {
    RenderFailure::DataLoad {
        path: path.to_path_buf(),
        message,
    }
}
