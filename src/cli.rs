//! Command-line interface for codefacts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::project;
use crate::report;
use crate::scan::{self, ScanOptions};
use crate::{analyze, AnalyzeOptions};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Structural fact extraction for codebases.
///
/// Codefacts scans a project tree and reduces it to structured facts:
/// per-file imports, exports, functions, and classes, plus project-level
/// statistics, dependencies, entry points, and tech stack. Output is
/// deterministic JSON or a colored terminal report.
#[derive(Parser)]
#[command(name = "codefacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structural facts from a project
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),
    /// List and categorize files without extracting
    Scan(ScanArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Project root directory
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Maximum directory depth below the root (0 = immediate children)
    #[arg(long, default_value_t = 10)]
    pub max_depth: i32,

    /// Extra ignore patterns (glob), repeatable
    #[arg(short, long)]
    pub ignore: Vec<String>,

    /// Write JSON output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Project root directory
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Maximum directory depth below the root (0 = immediate children)
    #[arg(long, default_value_t = 10)]
    pub max_depth: i32,

    /// Extra ignore patterns (glob), repeatable
    #[arg(short, long)]
    pub ignore: Vec<String>,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let options = AnalyzeOptions {
        max_depth: args.max_depth,
        ignore: args.ignore.clone(),
        include_tree: false,
    };
    let analysis = match analyze(&args.path, &options) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if let Some(output) = &args.output {
        let json = report::render_json(&analysis)?;
        std::fs::write(output, json)?;
        println!("Wrote {}", output.display());
        return Ok(EXIT_SUCCESS);
    }

    match args.format.as_str() {
        "json" => println!("{}", report::render_json(&analysis)?),
        _ => report::write_pretty(&analysis),
    }

    Ok(EXIT_SUCCESS)
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let root = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let options = ScanOptions {
        max_depth: args.max_depth,
        ignore: args.ignore.clone(),
    };
    let files = match scan::scan(&root, &options) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let project = project::aggregate(&root, &files);
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&project)?),
        _ => report::write_scan(&project),
    }

    Ok(EXIT_SUCCESS)
}
