use crate::app::models::OutputTarget;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Computes the directory part of `template` relative to `base`.
/// Empty in single-file mode (no base). `base` must be an ancestor of
/// `template`.
fn relative_dir(template: &Path, base: Option<&Path>) -> Result<PathBuf> {
    let Some(base) = base else {
        return Ok(PathBuf::new());
    };
    let relative = template.strip_prefix(base).with_context(|| {
        format!(
            "template {} is not under base directory {}",
            template.display(),
            base.display()
        )
    })?;
    Ok(relative.parent().map(Path::to_path_buf).unwrap_or_default())
}

/// Appends a literal suffix to a path without touching existing
/// extensions ("out/x.tar" + ".html" -> "out/x.tar.html").
pub(crate) fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Derives the extensionless data stem for a template. When the data
/// location is a single file, every template shares it as-is; the
/// extension probing for directory layouts belongs to the renderer.
pub fn resolve_data_stem(
    template: &Path,
    base: Option<&Path>,
    data_location: &Path,
    data_is_file: bool,
) -> Result<PathBuf> {
    if data_is_file {
        return Ok(data_location.to_path_buf());
    }
    let dir = relative_dir(template, base)?;
    let stem = template
        .file_stem()
        .with_context(|| format!("template path {} has no file name", template.display()))?;
    Ok(data_location.join(dir).join(stem))
}

/// Derives the output path for a template. `None` means render to
/// standard output. Directory targets mirror the template tree.
pub fn resolve_output_path(
    template: &Path,
    base: Option<&Path>,
    target: &OutputTarget,
) -> Result<Option<PathBuf>> {
    match target {
        OutputTarget::Stdout => Ok(None),
        OutputTarget::File(path) => Ok(Some(path.clone())),
        OutputTarget::Directory(dir) => {
            let relative = relative_dir(template, base)?;
            let stem = template.file_stem().with_context(|| {
                format!("template path {} has no file name", template.display())
            })?;
            Ok(Some(append_suffix(&dir.join(relative).join(stem), ".html")))
        }
    }
}
