use crate::app::models::{RenderReport, RenderStatus, RunConfig};
use crate::app::{renderer, resolver};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

const TEMPLATE_EXTENSION: &str = "j2";

/// Renders every template under the configured directory, one fully
/// independent attempt per file, and emits one status line per
/// template. Returns the reports in lexicographic path order.
pub fn process_directory(config: &RunConfig) -> Result<Vec<RenderReport>> {
    let root = config.template_path.canonicalize().with_context(|| {
        format!(
            "failed to resolve template directory {}",
            config.template_path.display()
        )
    })?;
    let ignore_set = build_globset(&config.ignore)?;

    let mut templates = collect_templates(&root, &ignore_set);
    // Walk order is filesystem-dependent; sort for reproducible reports.
    templates.sort();

    let mut reports = Vec::with_capacity(templates.len());
    for template in &templates {
        let relative = diff_paths(template, &root).unwrap_or_else(|| template.clone());
        let status = match render_one(template, &root, config) {
            Ok(()) => {
                log::info!("{}: Done", relative.display());
                RenderStatus::Done
            }
            Err(err) => {
                log::error!("{}: {:#}", relative.display(), err);
                RenderStatus::Failed(format!("{err:#}"))
            }
        };
        reports.push(RenderReport {
            template: relative,
            status,
        });
    }

    Ok(reports)
}

/// Enumerates template files below `root`, skipping anything whose
/// root-relative path matches an ignore glob.
fn collect_templates(root: &Path, ignore_set: &GlobSet) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .build();

    let mut templates = Vec::new();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("error walking entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().map_or(false, |t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
            continue;
        }
        let Some(relative) = diff_paths(path, root) else {
            continue;
        };
        if ignore_set.is_match(&relative) {
            continue;
        }
        templates.push(path.to_path_buf());
    }
    templates
}

/// One isolated render attempt. Any error is caught at this boundary
/// by the caller and turned into a status line.
fn render_one(template: &Path, root: &Path, config: &RunConfig) -> Result<()> {
    let data_stem = resolver::resolve_data_stem(
        template,
        Some(root),
        &config.data_location,
        config.data_is_file,
    )?;
    let output = resolver::resolve_output_path(template, Some(root), &config.target)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let mut sink = File::create(&path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            renderer::render(template, &data_stem, &mut sink)?;
        }
        None => {
            let stdout = io::stdout();
            renderer::render(template, &data_stem, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(
            Glob::new(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))?,
        );
    }
    Ok(builder.build()?)
}
