//! Missing required prop detection.
//!
//! Scans every usage site of a component and flags instances that supply
//! neither the required prop nor a spread attribute. Spread contents are
//! opaque to static analysis, so by default a spread conservatively counts
//! as satisfying the requirement.

use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::types::{ExtractOptions, ResolveOptions, SPREAD_PROP};

use super::runner::collect_components;

#[derive(Clone, Debug)]
pub struct MissingOptions {
    /// Treat an instance with a spread attribute as satisfied. Disabling
    /// this trades false positives for completeness.
    pub assume_spread_satisfies: bool,
    pub resolve: ResolveOptions,
}

impl Default for MissingOptions {
    fn default() -> Self {
        Self {
            assume_spread_satisfies: true,
            resolve: ResolveOptions::default(),
        }
    }
}

/// One instance lacking the required prop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingPropInstance {
    pub component: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    /// Attribute names present at the site; a spread is recorded as the
    /// sentinel marker.
    pub present_props: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingPropReport {
    pub component: String,
    pub required_prop: String,
    pub missing: Vec<MissingPropInstance>,
    pub total_instances: usize,
    pub missing_count: usize,
    /// Share of all instances that lack the prop. Defined as `0.0` when no
    /// instances exist; the denominator is the full instance count, never
    /// the missing set itself.
    pub missing_percentage: f64,
}

pub fn find_missing_prop(
    root: &Path,
    component: &str,
    required_prop: &str,
    options: &MissingOptions,
) -> Result<MissingPropReport> {
    if component.trim().is_empty() {
        bail!("find_missing_prop rejected: component name must not be empty");
    }
    if required_prop.trim().is_empty() {
        bail!("find_missing_prop rejected: required prop name must not be empty");
    }
    if required_prop == SPREAD_PROP {
        bail!(
            "find_missing_prop rejected: '{}' is the spread sentinel, not a prop name",
            SPREAD_PROP
        );
    }

    let extract = ExtractOptions {
        component_filter: Some(component.to_string()),
        prop_filter: None,
        include_type_info: false,
    };
    let collected = collect_components(root, &options.resolve, &extract)?;

    let mut missing = Vec::new();
    let total_instances = collected.usages.len();
    for site in &collected.usages {
        if site.has_prop(required_prop) {
            continue;
        }
        if site.has_spread() && options.assume_spread_satisfies {
            continue;
        }
        missing.push(MissingPropInstance {
            component: site.component.clone(),
            file: site.file.clone(),
            line: site.line,
            column: site.column,
            present_props: site.props.iter().map(|p| p.name.clone()).collect(),
        });
    }

    let missing_count = missing.len();
    let missing_percentage = if total_instances == 0 {
        0.0
    } else {
        missing_count as f64 / total_instances as f64 * 100.0
    };

    Ok(MissingPropReport {
        component: component.to_string(),
        required_prop: required_prop.to_string(),
        missing,
        total_instances,
        missing_count,
        missing_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_fixture(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write fixture");
    }

    #[test]
    fn flags_instances_without_the_required_prop() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        write_fixture(
            tmp.path(),
            "app.tsx",
            r#"
                export const App = () => (
                    <div>
                        <Select width="200px" label="a" />
                        <Select label="b" />
                        <Select label="c" height={2} />
                    </div>
                );
            "#,
        );

        let report =
            find_missing_prop(tmp.path(), "Select", "width", &MissingOptions::default())
                .expect("report");
        assert_eq!(report.total_instances, 3);
        assert_eq!(report.missing_count, 2);
        assert!((report.missing_percentage - 66.666).abs() < 0.01);
        assert_eq!(report.missing[0].present_props, vec!["label".to_string()]);
    }

    #[test]
    fn spread_conservatively_satisfies_by_default() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        write_fixture(
            tmp.path(),
            "app.tsx",
            r#"
                export const App = () => <Select {...cfg} />;
            "#,
        );

        let report =
            find_missing_prop(tmp.path(), "Select", "width", &MissingOptions::default())
                .expect("report");
        assert_eq!(report.total_instances, 1);
        assert_eq!(report.missing_count, 0);

        let strict = MissingOptions {
            assume_spread_satisfies: false,
            ..Default::default()
        };
        let report = find_missing_prop(tmp.path(), "Select", "width", &strict).expect("report");
        assert_eq!(report.missing_count, 1);
        assert_eq!(
            report.missing[0].present_props,
            vec![SPREAD_PROP.to_string()]
        );
    }

    #[test]
    fn zero_instances_yields_zero_percentage() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        write_fixture(tmp.path(), "app.tsx", "export const x = 1;");

        let report =
            find_missing_prop(tmp.path(), "Select", "width", &MissingOptions::default())
                .expect("report");
        assert_eq!(report.total_instances, 0);
        assert_eq!(report.missing_count, 0);
        assert_eq!(report.missing_percentage, 0.0);
        assert!(report.missing_percentage.is_finite());
    }

    #[test]
    fn percentage_stays_within_bounds() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        write_fixture(
            tmp.path(),
            "app.tsx",
            r#"
                export const App = () => (
                    <div>
                        <Select label="a" />
                        <Select label="b" />
                    </div>
                );
            "#,
        );

        let report =
            find_missing_prop(tmp.path(), "Select", "width", &MissingOptions::default())
                .expect("report");
        // All instances missing: exactly 100, computed against the full
        // instance count rather than the missing set.
        assert_eq!(report.missing_percentage, 100.0);
        assert!(report.missing_percentage >= 0.0 && report.missing_percentage <= 100.0);
    }

    #[test]
    fn empty_component_name_is_rejected_before_io() {
        let err = find_missing_prop(
            Path::new("/nonexistent/never-read"),
            "",
            "width",
            &MissingOptions::default(),
        )
        .expect_err("must reject");
        assert!(err.to_string().contains("component name"));
    }

    #[test]
    fn dotted_usage_counts_for_local_filter() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        write_fixture(
            tmp.path(),
            "app.tsx",
            r#"
                export const App = () => <UI.Select label="a" />;
            "#,
        );

        let report =
            find_missing_prop(tmp.path(), "Select", "width", &MissingOptions::default())
                .expect("report");
        assert_eq!(report.total_instances, 1);
        assert_eq!(report.missing_count, 1);
        assert_eq!(report.missing[0].component, "UI.Select");
    }
}
