//! Criteria queries over component instances.
//!
//! A query names a component and a list of prop predicates combined with
//! AND or OR. Declaration data and usage-site data are merged per
//! `(file, line)` key into logical instances before evaluation, so the same
//! extraction pass is never reported as two separate instances.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::types::{ExtractOptions, FormatOptions, ResolveOptions};

use super::output::pretty_location;
use super::runner::collect_components;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparator {
    #[default]
    Equals,
    Contains,
}

impl Comparator {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "equals" => Some(Comparator::Equals),
            "contains" => Some(Comparator::Contains),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryLogic {
    #[default]
    And,
    Or,
}

impl QueryLogic {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "and" => Some(QueryLogic::And),
            "or" => Some(QueryLogic::Or),
            _ => None,
        }
    }
}

/// One testable condition over a prop's presence or value.
///
/// When `exists` is set it decides the predicate alone; otherwise a set
/// `value` is compared with the chosen comparator, and with neither set the
/// predicate degenerates to a plain existence check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropPredicate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub comparator: Comparator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

impl PropPredicate {
    pub fn exists(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            comparator: Comparator::Equals,
            exists: Some(true),
        }
    }

    pub fn absent(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
            comparator: Comparator::Equals,
            exists: Some(false),
        }
    }

    pub fn value(name: &str, value: &str, comparator: Comparator) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
            comparator,
            exists: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct QueryOptions {
    pub logic: QueryLogic,
    pub resolve: ResolveOptions,
    pub format: FormatOptions,
}

/// A prop that satisfied a predicate, with its recorded value and location.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchedProp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryMatch {
    pub component: String,
    pub file: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub matching_props: BTreeMap<String, MatchedProp>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_props: Vec<String>,
    pub all_props: BTreeMap<String, Option<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryReport {
    pub component: String,
    pub total_instances: usize,
    pub matches: Vec<QueryMatch>,
}

/// Reject malformed queries before any file I/O happens.
pub fn validate_query(component: &str, predicates: &[PropPredicate]) -> Result<()> {
    if component.trim().is_empty() {
        bail!("query rejected: component name must not be empty");
    }
    for (i, predicate) in predicates.iter().enumerate() {
        if predicate.name.trim().is_empty() {
            bail!("query rejected: predicate #{} has an empty prop name", i + 1);
        }
    }
    Ok(())
}

pub fn query_props(
    root: &Path,
    component: &str,
    predicates: &[PropPredicate],
    options: &QueryOptions,
) -> Result<QueryReport> {
    validate_query(component, predicates)?;

    let extract = ExtractOptions {
        component_filter: Some(component.to_string()),
        prop_filter: None,
        include_type_info: false,
    };
    let collected = collect_components(root, &options.resolve, &extract)?;

    // Declaration props indexed by (file, line) so an instance sharing a
    // declaration's key absorbs its entries instead of double-reporting.
    let mut decl_props: BTreeMap<(&str, usize), Vec<(&str, Option<&str>)>> = BTreeMap::new();
    for decl in &collected.declarations {
        for prop in &decl.props {
            if prop.is_spread {
                continue;
            }
            decl_props
                .entry((prop.file.as_str(), prop.line))
                .or_default()
                .push((prop.name.as_str(), prop.value.as_deref()));
        }
    }

    let mut matches = Vec::new();
    for site in &collected.usages {
        // Build the instance's name -> (value, line, column) map. Last
        // write wins per name, so supplied attributes override declaration
        // entries that landed on the same key.
        let mut props: BTreeMap<String, MatchedProp> = BTreeMap::new();
        if let Some(entries) = decl_props.get(&(site.file.as_str(), site.line)) {
            for (name, value) in entries {
                props.insert(
                    name.to_string(),
                    MatchedProp {
                        value: value.map(str::to_string),
                        line: site.line,
                        column: None,
                    },
                );
            }
        }
        for prop in &site.props {
            if prop.is_spread {
                continue;
            }
            props.insert(
                prop.name.clone(),
                MatchedProp {
                    value: prop.value.clone(),
                    line: prop.line,
                    column: options.format.include_columns.then_some(prop.column),
                },
            );
        }

        let mut matching = BTreeMap::new();
        let mut missing = Vec::new();
        let mut verdicts = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            verdicts.push(evaluate_predicate(
                predicate,
                &props,
                &mut matching,
                &mut missing,
            ));
        }

        let passed = if predicates.is_empty() {
            // An empty predicate list matches every instance.
            true
        } else {
            match options.logic {
                QueryLogic::And => verdicts.iter().all(|v| *v),
                QueryLogic::Or => verdicts.iter().any(|v| *v),
            }
        };
        if !passed {
            continue;
        }

        let all_props = props
            .iter()
            .map(|(name, matched)| (name.clone(), matched.value.clone()))
            .collect();
        matches.push(QueryMatch {
            component: site.component.clone(),
            file: site.file.clone(),
            line: site.line,
            column: options.format.include_columns.then_some(site.column),
            location: options
                .format
                .include_pretty_location
                .then(|| pretty_location(&site.file, Some(site.line), Some(site.column))),
            matching_props: matching,
            missing_props: missing,
            all_props,
        });
    }

    matches.sort_by(|a, b| (a.file.as_str(), a.line).cmp(&(b.file.as_str(), b.line)));

    Ok(QueryReport {
        component: component.to_string(),
        total_instances: collected.usages.len(),
        matches,
    })
}

fn evaluate_predicate(
    predicate: &PropPredicate,
    props: &BTreeMap<String, MatchedProp>,
    matching: &mut BTreeMap<String, MatchedProp>,
    missing: &mut Vec<String>,
) -> bool {
    let entry = props.get(&predicate.name);

    if let Some(required) = predicate.exists {
        return match (required, entry) {
            (true, Some(found)) => {
                matching.insert(predicate.name.clone(), found.clone());
                true
            }
            (true, None) => {
                missing.push(predicate.name.clone());
                false
            }
            (false, None) => true,
            (false, Some(_)) => false,
        };
    }

    let Some(expected) = &predicate.value else {
        // Neither side set: plain existence check.
        return match entry {
            Some(found) => {
                matching.insert(predicate.name.clone(), found.clone());
                true
            }
            None => {
                missing.push(predicate.name.clone());
                false
            }
        };
    };

    match entry {
        Some(found) => {
            let actual = found.value.clone().unwrap_or_default();
            let ok = match predicate.comparator {
                Comparator::Equals => actual == *expected,
                Comparator::Contains => actual.contains(expected.as_str()),
            };
            if ok {
                matching.insert(predicate.name.clone(), found.clone());
            }
            // A value mismatch is not a missing prop: the prop exists, it
            // just has the wrong value.
            ok
        }
        None => {
            missing.push(predicate.name.clone());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().expect("tmp dir");
        fs::write(
            tmp.path().join("grid.tsx"),
            r#"
                export const Grid = () => (
                    <div>
                        <Select width="200px" label="first" />
                        <Select width="90px" />
                        <Select label="third" open={true} />
                    </div>
                );
            "#,
        )
        .expect("write fixture");
        tmp
    }

    fn run(predicates: &[PropPredicate], logic: QueryLogic) -> QueryReport {
        let tmp = fixture_dir();
        let options = QueryOptions {
            logic,
            ..Default::default()
        };
        query_props(tmp.path(), "Select", predicates, &options).expect("query")
    }

    #[test]
    fn empty_predicates_match_every_instance() {
        let report = run(&[], QueryLogic::And);
        assert_eq!(report.total_instances, 3);
        assert_eq!(report.matches.len(), 3);
    }

    #[test]
    fn contains_matches_where_equals_does_not() {
        let contains = run(
            &[PropPredicate::value("width", "200", Comparator::Contains)],
            QueryLogic::And,
        );
        assert_eq!(contains.matches.len(), 1);
        assert_eq!(
            contains.matches[0].matching_props["width"].value.as_deref(),
            Some("200px")
        );

        let equals = run(
            &[PropPredicate::value("width", "200", Comparator::Equals)],
            QueryLogic::And,
        );
        assert!(equals.matches.is_empty());

        let exact = run(
            &[PropPredicate::value("width", "200px", Comparator::Equals)],
            QueryLogic::And,
        );
        assert_eq!(exact.matches.len(), 1);
    }

    #[test]
    fn and_logic_is_monotonically_narrowing() {
        let one = run(&[PropPredicate::exists("width")], QueryLogic::And);
        let two = run(
            &[
                PropPredicate::exists("width"),
                PropPredicate::exists("label"),
            ],
            QueryLogic::And,
        );
        assert_eq!(one.matches.len(), 2);
        assert_eq!(two.matches.len(), 1);
        assert!(two.matches.len() <= one.matches.len());
    }

    #[test]
    fn or_logic_is_monotonically_widening() {
        let one = run(&[PropPredicate::exists("open")], QueryLogic::Or);
        let two = run(
            &[
                PropPredicate::exists("open"),
                PropPredicate::exists("width"),
            ],
            QueryLogic::Or,
        );
        assert_eq!(one.matches.len(), 1);
        assert_eq!(two.matches.len(), 3);
        assert!(two.matches.len() >= one.matches.len());
    }

    #[test]
    fn absent_predicate_matches_instances_without_the_prop() {
        let report = run(&[PropPredicate::absent("width")], QueryLogic::And);
        assert_eq!(report.matches.len(), 1);
        assert!(report.matches[0].all_props.contains_key("label"));
    }

    #[test]
    fn absent_prop_with_expected_value_is_recorded_as_missing() {
        let report = run(
            &[PropPredicate::value("height", "4", Comparator::Equals)],
            QueryLogic::Or,
        );
        assert!(report.matches.is_empty());

        // Under OR with a passing predicate the instance surfaces, carrying
        // the failed predicate's prop in missing_props.
        let report = run(
            &[
                PropPredicate::exists("width"),
                PropPredicate::value("height", "4", Comparator::Equals),
            ],
            QueryLogic::Or,
        );
        assert_eq!(report.matches.len(), 2);
        assert!(report.matches[0]
            .missing_props
            .contains(&"height".to_string()));
    }

    #[test]
    fn value_mismatch_is_not_a_missing_prop() {
        let report = run(
            &[
                PropPredicate::exists("label"),
                PropPredicate::value("width", "999", Comparator::Equals),
            ],
            QueryLogic::Or,
        );
        let with_width = report
            .matches
            .iter()
            .find(|m| m.all_props.contains_key("width"))
            .expect("match with width");
        assert!(!with_width.missing_props.contains(&"width".to_string()));
    }

    #[test]
    fn matches_are_sorted_by_file_then_line() {
        let report = run(&[], QueryLogic::And);
        let keys: Vec<_> = report
            .matches
            .iter()
            .map(|m| (m.file.clone(), m.line))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn malformed_queries_are_rejected_before_io() {
        let err = query_props(
            Path::new("/nonexistent/never-read"),
            "",
            &[],
            &QueryOptions::default(),
        )
        .expect_err("empty component must be rejected");
        assert!(err.to_string().contains("component name"));

        let err = query_props(
            Path::new("/nonexistent/never-read"),
            "Select",
            &[PropPredicate::exists("")],
            &QueryOptions::default(),
        )
        .expect_err("empty predicate name must be rejected");
        assert!(err.to_string().contains("predicate #1"));
    }

    #[test]
    fn spread_props_never_match_value_predicates() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        fs::write(
            tmp.path().join("app.tsx"),
            r#"export const App = () => <Select {...cfg} />;"#,
        )
        .expect("write fixture");

        let report = query_props(
            tmp.path(),
            "Select",
            &[PropPredicate::value("cfg", "cfg", Comparator::Equals)],
            &QueryOptions::default(),
        )
        .expect("query");
        assert_eq!(report.total_instances, 1);
        assert!(report.matches.is_empty());
    }
}
