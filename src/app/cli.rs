use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render templates against structured data into HTML"
)]
pub struct Cli {
    /// Template file, or a directory of templates for batch mode
    pub template: PathBuf,

    /// Data file, or a directory mirroring the template tree
    pub data: PathBuf,

    /// Write rendered output to this file
    #[arg(long, conflicts_with = "outdir")]
    pub outfile: Option<PathBuf>,

    /// Write rendered output under this directory, mirroring the
    /// template tree (mandatory in batch mode)
    #[arg(long)]
    pub outdir: Option<PathBuf>,

    /// Glob patterns for templates to skip in batch mode (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,
}
