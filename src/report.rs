//! Output formatting for analysis results.
//!
//! Two formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;

use crate::project::ProjectFacts;
use crate::Analysis;

/// Serialize a full analysis as pretty-printed JSON.
pub fn render_json(analysis: &Analysis) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// Write an analysis in pretty (human-readable) format.
pub fn write_pretty(analysis: &Analysis) {
    let project = &analysis.project;

    // Header
    println!();
    print!("  ");
    print!("{}", "codefacts".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Project: ".dimmed());
    println!("{}", project.name.bold());
    print!("  {}", "Root:    ".dimmed());
    println!("{}", project.root);
    println!();

    // Stats
    println!("  {}", "Statistics".bold());
    println!("    files: {}", project.stats.file_count);
    println!("    size:  {}", format_size(project.stats.total_size));
    let mut extensions: Vec<(&String, &usize)> = project.stats.by_extension.iter().collect();
    extensions.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (extension, count) in extensions.iter().take(5) {
        println!("    .{:<8} {}", extension, count);
    }
    println!();

    // Tech stack
    if !project.tech_stack.is_empty() {
        println!("  {}", "Tech stack".bold());
        println!("    {}", project.tech_stack.join(", ").green());
        println!();
    }

    // Entry points
    if !project.entry_points.is_empty() {
        println!("  {}", "Entry points".bold());
        for entry in &project.entry_points {
            println!("    {}", entry);
        }
        println!();
    }

    // Dependencies
    if let Some(manager) = &project.dependencies.manager {
        println!("  {}", "Dependencies".bold());
        println!(
            "    {} ({} prod, {} dev)",
            manager.cyan(),
            project.dependencies.dependencies.len(),
            project.dependencies.dev_dependencies.len()
        );
        println!();
    }

    // Categories
    println!("  {}", "Categories".bold());
    write_category_line("code", project.categories.code.len());
    write_category_line("config", project.categories.config.len());
    write_category_line("tests", project.categories.tests.len());
    write_category_line("docs", project.categories.docs.len());
    write_category_line("assets", project.categories.assets.len());
    write_category_line("other", project.categories.other.len());
    println!();

    // Extraction outcome
    let errors: Vec<&crate::FileRecord> = analysis
        .records
        .iter()
        .filter(|r| r.parse_error.is_some())
        .collect();
    println!(
        "  {} {} files extracted",
        "OK".green().bold(),
        analysis.records.len() - errors.len()
    );
    if !errors.is_empty() {
        println!(
            "  {} {} files with parse errors",
            "!!".yellow().bold(),
            errors.len()
        );
        for record in errors.iter().take(10) {
            let detail = record.parse_error.as_deref().unwrap_or("unknown error");
            println!("     {} {}", record.path.yellow(), detail.dimmed());
        }
    }
    println!();
}

/// Write a scan-only listing: categorized paths, no extraction.
pub fn write_scan(project: &ProjectFacts) {
    println!();
    print!("  ");
    print!("{}", "codefacts".cyan().bold());
    println!(" scan: {} ({} files)", project.name.bold(), project.stats.file_count);
    println!();

    let groups = [
        ("code", &project.categories.code),
        ("config", &project.categories.config),
        ("tests", &project.categories.tests),
        ("docs", &project.categories.docs),
        ("assets", &project.categories.assets),
        ("other", &project.categories.other),
    ];
    for (label, paths) in groups {
        if paths.is_empty() {
            continue;
        }
        println!("  {} ({})", label.bold(), paths.len());
        for path in paths {
            println!("    {}", path);
        }
        println!();
    }
}

fn write_category_line(label: &str, count: usize) {
    if count > 0 {
        println!("    {:<8} {}", label, count);
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
