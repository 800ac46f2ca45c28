use std::path::Path;

use crate::inspector::RegionReport;

/// Load a report from a JSON file. Returns None if the file is missing or unreadable.
pub fn load_report(path: &Path) -> Option<RegionReport> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a report to a JSON file.
pub fn save_report(path: &Path, report: &RegionReport) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Format a report as a markdown summary table.
pub fn format_markdown(report: &RegionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Universe {} (tables v{}), chunks [{}, {}] to [{}, {}]: {} chunks, {} background stars\n\n",
        report.seed,
        report.table_version,
        report.min[0],
        report.min[1],
        report.max[0],
        report.max[1],
        report.chunk_count,
        report.background_stars,
    ));
    out.push_str("| Category | Count | Per chunk | Variants |\n");
    out.push_str("|----------|-------|-----------|----------|\n");

    let chunks = report.chunk_count.max(1) as f64;
    for c in &report.categories {
        let variants = c
            .variants
            .iter()
            .map(|(name, n)| format!("{name} {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            c.category,
            c.total,
            c.total as f64 / chunks,
            variants,
        ));
    }

    out.push_str(&format!(
        "\nWormholes: {} endpoints, {} complete pairs. Density: {:.2} objects per chunk.\n",
        report.wormhole_endpoints, report.wormhole_pairs, report.density,
    ));
    out
}
