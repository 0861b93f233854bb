use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Sentinel prop name recorded for spread attributes and rest parameters.
/// Spread entries never participate in equality-based predicate matching.
pub const SPREAD_PROP: &str = "...spread";

/// Suffix that associates an interface or type alias with a component
/// by naming convention (`ButtonProps` -> `Button`).
pub const PROPS_SUFFIX: &str = "Props";

/// Extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["tsx", "jsx", "ts", "js"];

/// Directory names never descended into.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "dist",
    "build",
    ".git",
    "coverage",
    ".next",
    "out",
];

/// Marker files that establish a project boundary when walking upward
/// from the search root.
pub const BOUNDARY_MARKERS: &[&str] = &["package.json", "tsconfig.json", ".git"];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Full,
    ByFile,
    ByProp,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "full" => Some(OutputFormat::Full),
            "by-file" => Some(OutputFormat::ByFile),
            "by-prop" => Some(OutputFormat::ByProp),
            _ => None,
        }
    }
}

/// One concrete occurrence of a named prop: either a declared parameter or
/// destructured field of a component, or a supplied attribute at a JSX
/// usage site. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropUsage {
    pub name: String,
    /// Owning component. For dotted JSX names this is the full dotted form.
    pub component: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Best-effort textual rendering of the supplied value. Unset when the
    /// expression has no obvious textual form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub is_spread: bool,
    /// Type recorded from the associated `*Props` interface, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
}

/// A function or arrow recognized as a component definition, with its
/// declared props in source order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name: String,
    pub file: String,
    pub props: Vec<PropUsage>,
    /// Interface or type alias associated by the `<Name>Props` naming
    /// convention, scoped to the same file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props_interface: Option<String>,
}

/// One JSX invocation of a component with its supplied attributes. All
/// attribute entries share the element's `(file, line)` identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsageSite {
    pub component: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub props: Vec<PropUsage>,
}

impl UsageSite {
    pub fn has_spread(&self) -> bool {
        self.props.iter().any(|p| p.is_spread)
    }

    pub fn has_prop(&self, name: &str) -> bool {
        self.props.iter().any(|p| !p.is_spread && p.name == name)
    }
}

/// Everything extracted from a single file's parse-and-extract pass.
#[derive(Clone, Debug, Default)]
pub struct FileComponents {
    pub declarations: Vec<ComponentDecl>,
    pub usages: Vec<UsageSite>,
}

/// File Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolveOptions {
    pub extensions: HashSet<String>,
    /// User-supplied glob patterns excluded on top of [`EXCLUDED_DIRS`].
    pub exclude_globs: Vec<String>,
    /// When set, files outside the nearest project boundary are dropped.
    pub respect_boundaries: bool,
    pub max_depth: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude_globs: Vec::new(),
            respect_boundaries: true,
            max_depth: None,
        }
    }
}

/// Extractor configuration for one analysis pass.
#[derive(Clone, Debug)]
pub struct ExtractOptions {
    /// Exact-match component filter. Dotted JSX names match by either their
    /// full or local (last-segment) form.
    pub component_filter: Option<String>,
    /// When set, attribute entries with other names are dropped from the
    /// result; the usage site itself is still recorded.
    pub prop_filter: Option<String>,
    pub include_type_info: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            component_filter: None,
            prop_filter: None,
            include_type_info: true,
        }
    }
}

/// Output shaping options shared by the reduced report forms.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormatOptions {
    pub include_columns: bool,
    pub include_pretty_location: bool,
}

/// Options for the top-level `analyze` operation.
#[derive(Clone, Debug, Default)]
pub struct AnalyzeOptions {
    pub component_filter: Option<String>,
    pub prop_filter: Option<String>,
    pub include_type_info: bool,
    pub format: OutputFormat,
    pub format_options: FormatOptions,
    pub resolve: ResolveOptions,
}

impl AnalyzeOptions {
    pub fn new() -> Self {
        Self {
            include_type_info: true,
            ..Default::default()
        }
    }
}

/// Match a component name against a filter: the full dotted form or its
/// local (last-segment) form both count; a bare namespace never does.
pub fn component_name_matches(full: &str, filter: &str) -> bool {
    if full == filter {
        return true;
    }
    full.rsplit('.').next() == Some(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_names_match_full_and_local_forms() {
        assert!(component_name_matches("UI.Select", "UI.Select"));
        assert!(component_name_matches("UI.Select", "Select"));
        assert!(!component_name_matches("UI.Select", "UI"));
        assert!(component_name_matches("Select", "Select"));
        assert!(!component_name_matches("Select", "Sel"));
    }

    #[test]
    fn nested_dotted_names_resolve_last_segment() {
        assert!(component_name_matches("App.UI.Select", "Select"));
        assert!(!component_name_matches("App.UI.Select", "UI.Select"));
    }
}
