use crate::app::cli::Cli;
use crate::app::models::{Mode, OutputTarget, PathInfo, RunConfig};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;

/// Optional defaults read from `~/.config/stencil/defaults.toml`.
#[derive(Deserialize, Debug, Default)]
struct DefaultsFile {
    ignore: Option<Vec<String>>,
}

fn load_defaults() -> Result<DefaultsFile> {
    let Some(home) = dirs::home_dir() else {
        return Ok(DefaultsFile::default());
    };
    let config_path = home.join(".config").join("stencil").join("defaults.toml");

    if !config_path.exists() {
        return Ok(DefaultsFile::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config at {}", config_path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))
}

/// File-provided patterns come first, CLI patterns append, duplicates
/// dropped while keeping order.
fn merge_patterns(file_patterns: Option<Vec<String>>, cli_patterns: Vec<String>) -> Vec<String> {
    let mut combined = file_patterns.unwrap_or_default();
    combined.extend(cli_patterns);
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// Validates the parsed arguments and produces the immutable run
/// configuration. Every failure here is fatal and happens before any
/// output file is touched.
pub fn resolve_config(cli: Cli) -> Result<RunConfig> {
    let defaults = load_defaults()?;
    let ignore = merge_patterns(defaults.ignore, cli.ignore);

    let target = match (cli.outfile, cli.outdir) {
        (Some(_), Some(_)) => bail!("--outfile and --outdir cannot be combined"),
        (Some(file), None) => OutputTarget::File(file),
        (None, Some(dir)) => {
            let info = PathInfo::stat(&dir);
            if !info.is_dir {
                bail!(
                    "output directory {} does not exist or is not a directory",
                    dir.display()
                );
            }
            OutputTarget::Directory(dir)
        }
        (None, None) => OutputTarget::Stdout,
    };

    let template = PathInfo::stat(&cli.template);
    let mode = if template.is_file {
        Mode::Single
    } else if template.is_dir {
        Mode::Batch
    } else {
        bail!(
            "template path {} does not exist or is not a file or directory",
            cli.template.display()
        );
    };

    if mode == Mode::Batch && !matches!(target, OutputTarget::Directory(_)) {
        bail!("batch mode requires --outdir");
    }

    let data = PathInfo::stat(&cli.data);
    if !data.is_file && !data.is_dir {
        bail!(
            "data path {} does not exist or is not a file or directory",
            cli.data.display()
        );
    }

    Ok(RunConfig {
        mode,
        template_path: cli.template,
        data_location: cli.data,
        data_is_file: data.is_file,
        target,
        ignore,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::path::PathBuf;

    fn cli(template: PathBuf, data: PathBuf) -> Cli {
        Cli {
            template,
            data,
            outfile: None,
            outdir: None,
            ignore: Vec::new(),
        }
    }

    #[test]
    fn merge_keeps_order_and_dedupes() {
        let merged = merge_patterns(
            Some(vec!["drafts/**".into(), "*.bak".into()]),
            vec!["*.bak".into(), "tmp/**".into()],
        );
        assert_eq!(merged, vec!["drafts/**", "*.bak", "tmp/**"]);
    }

    #[test]
    fn conflicting_targets_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("page.j2");
        File::create(&template).unwrap();

        let mut args = cli(template, dir.path().to_path_buf());
        args.outfile = Some(dir.path().join("out.html"));
        args.outdir = Some(dir.path().to_path_buf());

        let err = resolve_config(args).unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn batch_mode_requires_outdir() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(dir.path().to_path_buf(), dir.path().to_path_buf());

        let err = resolve_config(args).unwrap_err();
        assert!(err.to_string().contains("batch mode requires --outdir"));
    }

    #[test]
    fn missing_template_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = cli(dir.path().join("nope.j2"), dir.path().to_path_buf());

        let err = resolve_config(args).unwrap_err();
        assert!(err.to_string().contains("template path"));
    }

    #[test]
    fn single_file_without_target_defaults_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("page.j2");
        File::create(&template).unwrap();
        let data = dir.path().join("page.json");
        File::create(&data).unwrap();

        let config = resolve_config(cli(template, data)).unwrap();
        assert_eq!(config.mode, Mode::Single);
        assert_eq!(config.target, OutputTarget::Stdout);
        assert!(config.data_is_file);
    }
}
