//! Orchestration: resolve candidate files, run the per-file extraction
//! pass on each, and aggregate the results fork-join style.
//!
//! Each file's parse-and-extract is pure and touches no shared state;
//! aggregation happens only after a file's pass completes, so results are
//! published exactly once.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::fs_utils::resolve_targets;
use crate::types::{AnalyzeOptions, ExtractOptions, FormatOptions, OutputFormat, ResolveOptions};

use super::ast_jsx::analyze_component_file;
use super::output::{
    to_file_grouped, to_prop_grouped, AnalysisReport, DeclarationsReport, FullReport,
};

/// Resolve `root` and fold every file's extraction into one full report.
///
/// Unreadable or unparsable files are skipped with a warning and counted
/// in the summary; they never fail the batch. An invalid root, by
/// contrast, fails the whole invocation.
pub(crate) fn collect_components(
    root: &Path,
    resolve: &ResolveOptions,
    extract: &ExtractOptions,
) -> Result<FullReport> {
    if !root.exists() {
        bail!("root path does not exist: {}", root.display());
    }

    let files = resolve_targets(root, resolve);
    let mut report = FullReport::default();
    report.summary.files = files.len();

    for path in &files {
        let Ok(content) = fs::read_to_string(path) else {
            eprintln!(
                "[propscope][warn] skipping unreadable file: {}",
                path.display()
            );
            report.summary.skipped_files += 1;
            continue;
        };
        let relative = relative_display(path, root);
        match analyze_component_file(&content, path, &relative, extract) {
            Some(components) => {
                report.declarations.extend(components.declarations);
                report.usages.extend(components.usages);
            }
            None => {
                eprintln!(
                    "[propscope][warn] skipping unparsable file: {}",
                    path.display()
                );
                report.summary.skipped_files += 1;
            }
        }
    }

    report.summary.declarations = report.declarations.len();
    report.summary.usages = report.usages.len();
    Ok(report)
}

fn relative_display(path: &Path, root: &Path) -> String {
    let rel = if root.is_dir() {
        path.strip_prefix(root).unwrap_or(path)
    } else {
        path
    };
    rel.to_string_lossy().replace('\\', "/")
}

/// Analyze a file or directory tree and return the requested report shape.
pub fn analyze(root: &Path, options: &AnalyzeOptions) -> Result<AnalysisReport> {
    let extract = ExtractOptions {
        component_filter: options.component_filter.clone(),
        prop_filter: options.prop_filter.clone(),
        include_type_info: options.include_type_info,
    };
    let full = collect_components(root, &options.resolve, &extract)?;
    Ok(shape(full, options.format, &options.format_options))
}

/// Find every usage of one prop, optionally restricted to one component.
pub fn find_usages(
    prop: &str,
    root: &Path,
    component_filter: Option<&str>,
    options: &AnalyzeOptions,
) -> Result<AnalysisReport> {
    if prop.trim().is_empty() {
        bail!("find_usages rejected: prop name must not be empty");
    }
    let extract = ExtractOptions {
        component_filter: component_filter.map(str::to_string),
        prop_filter: Some(prop.to_string()),
        include_type_info: options.include_type_info,
    };
    let full = collect_components(root, &options.resolve, &extract)?;
    Ok(shape(full, options.format, &options.format_options))
}

/// Return the declarations of one component, without usage sites.
pub fn get_declarations(
    component: &str,
    root: &Path,
    resolve: &ResolveOptions,
) -> Result<DeclarationsReport> {
    if component.trim().is_empty() {
        bail!("get_declarations rejected: component name must not be empty");
    }
    let extract = ExtractOptions {
        component_filter: Some(component.to_string()),
        prop_filter: None,
        include_type_info: true,
    };
    let mut full = collect_components(root, resolve, &extract)?;
    full.summary.usages = 0;
    Ok(DeclarationsReport {
        component: component.to_string(),
        declarations: full.declarations,
        summary: full.summary,
    })
}

fn shape(full: FullReport, format: OutputFormat, options: &FormatOptions) -> AnalysisReport {
    match format {
        OutputFormat::Full => AnalysisReport::Full(full),
        OutputFormat::ByFile => AnalysisReport::ByFile(to_file_grouped(&full, options)),
        OutputFormat::ByProp => AnalysisReport::ByProp(to_prop_grouped(&full, options)),
    }
}
