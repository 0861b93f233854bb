//! Result shaping: full, file-grouped, and prop-grouped report forms.
//!
//! The full report is canonical; the grouped forms are pure reductions of
//! it for callers that want smaller payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ComponentDecl, FormatOptions, UsageSite};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub files: usize,
    pub declarations: usize,
    pub usages: usize,
    #[serde(default)]
    pub skipped_files: usize,
}

/// Canonical analysis result: every declaration and usage site found.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FullReport {
    pub declarations: Vec<ComponentDecl>,
    pub usages: Vec<UsageSite>,
    pub summary: Summary,
}

/// Declarations-only result for `get_declarations`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclarationsReport {
    pub component: String,
    pub declarations: Vec<ComponentDecl>,
    pub summary: Summary,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclSummary {
    pub name: String,
    pub props: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props_interface: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UsageSummary {
    pub component: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub props: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileGroup {
    pub file: String,
    pub declarations: Vec<DeclSummary>,
    pub usages: Vec<UsageSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileGroupedReport {
    pub files: Vec<FileGroup>,
    pub summary: Summary,
}

/// Smallest representation: one entry per supplied prop, grouped by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropGroupEntry {
    pub component: String,
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropGroupedReport {
    pub props: BTreeMap<String, Vec<PropGroupEntry>>,
    pub summary: Summary,
}

/// The result-shape family returned by `analyze` and `find_usages`.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Full(FullReport),
    ByFile(FileGroupedReport),
    ByProp(PropGroupedReport),
}

impl AnalysisReport {
    pub fn summary(&self) -> &Summary {
        match self {
            AnalysisReport::Full(report) => &report.summary,
            AnalysisReport::ByFile(report) => &report.summary,
            AnalysisReport::ByProp(report) => &report.summary,
        }
    }
}

/// `path[:line[:column]]`, forward-slash-normalized regardless of host
/// path conventions.
pub fn pretty_location(file: &str, line: Option<usize>, column: Option<usize>) -> String {
    let mut out = file.replace('\\', "/");
    if let Some(line) = line {
        out.push(':');
        out.push_str(&line.to_string());
        if let Some(column) = column {
            out.push(':');
            out.push_str(&column.to_string());
        }
    }
    out
}

pub fn to_file_grouped(full: &FullReport, options: &FormatOptions) -> FileGroupedReport {
    let mut groups: BTreeMap<&str, FileGroup> = BTreeMap::new();

    for decl in &full.declarations {
        groups
            .entry(decl.file.as_str())
            .or_insert_with(|| empty_group(&decl.file))
            .declarations
            .push(DeclSummary {
                name: decl.name.clone(),
                props: decl.props.iter().map(|p| p.name.clone()).collect(),
                props_interface: decl.props_interface.clone(),
            });
    }

    for site in &full.usages {
        groups
            .entry(site.file.as_str())
            .or_insert_with(|| empty_group(&site.file))
            .usages
            .push(UsageSummary {
                component: site.component.clone(),
                line: site.line,
                column: options.include_columns.then_some(site.column),
                props: site.props.iter().map(|p| p.name.clone()).collect(),
                location: options
                    .include_pretty_location
                    .then(|| pretty_location(&site.file, Some(site.line), Some(site.column))),
            });
    }

    FileGroupedReport {
        files: groups.into_values().collect(),
        summary: full.summary.clone(),
    }
}

fn empty_group(file: &str) -> FileGroup {
    FileGroup {
        file: file.replace('\\', "/"),
        declarations: Vec::new(),
        usages: Vec::new(),
    }
}

pub fn to_prop_grouped(full: &FullReport, options: &FormatOptions) -> PropGroupedReport {
    let mut props: BTreeMap<String, Vec<PropGroupEntry>> = BTreeMap::new();

    for site in &full.usages {
        for prop in &site.props {
            props.entry(prop.name.clone()).or_default().push(PropGroupEntry {
                component: site.component.clone(),
                file: site.file.replace('\\', "/"),
                line: site.line,
                location: options
                    .include_pretty_location
                    .then(|| pretty_location(&site.file, Some(site.line), Some(site.column))),
            });
        }
    }

    PropGroupedReport {
        props,
        summary: full.summary.clone(),
    }
}
