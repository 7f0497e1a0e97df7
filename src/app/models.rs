use std::fs;
use std::path::{Path, PathBuf};

/// The final configuration after merging the defaults file and CLI
/// arguments. Built once, immutable for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mode: Mode,
    pub template_path: PathBuf,
    pub data_location: PathBuf,
    /// True when `data_location` is a single file shared by every
    /// template, false when it is a mirrored directory tree.
    pub data_is_file: bool,
    pub target: OutputTarget,
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Single,
    Batch,
}

/// Where rendered bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
    Directory(PathBuf),
}

/// Snapshot of filesystem metadata for a path at check time.
#[derive(Debug, Clone)]
pub struct PathInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub is_file: bool,
    pub is_dir: bool,
}

impl PathInfo {
    pub fn stat(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                path: path.to_path_buf(),
                exists: true,
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
            },
            Err(_) => Self {
                path: path.to_path_buf(),
                exists: false,
                is_file: false,
                is_dir: false,
            },
        }
    }
}

/// A resolved data document: either a static JSON file, or a program
/// whose stdout yields the JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Static(PathBuf),
    Computed(PathBuf),
}

impl DataSource {
    /// Picks the variant for an exact data file by extension. `.sh` is
    /// computed, everything else is parsed as a static document.
    pub fn for_file(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("sh") => DataSource::Computed(path.to_path_buf()),
            _ => DataSource::Static(path.to_path_buf()),
        }
    }
}

/// Outcome of one batch render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    /// Template path relative to the batch root.
    pub template: PathBuf,
    pub status: RenderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    Done,
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_variant_follows_extension() {
        assert_eq!(
            DataSource::for_file(Path::new("data/page.json")),
            DataSource::Static(PathBuf::from("data/page.json"))
        );
        assert_eq!(
            DataSource::for_file(Path::new("data/page.sh")),
            DataSource::Computed(PathBuf::from("data/page.sh"))
        );
    }

    #[test]
    fn path_info_reflects_missing_path() {
        let info = PathInfo::stat(Path::new("definitely/not/here"));
        assert!(!info.exists);
        assert!(!info.is_file);
        assert!(!info.is_dir);
    }
}
