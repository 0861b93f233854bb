//! Command-line adapter.
//!
//! Thin wiring over the library operations: hand-rolled argument parsing,
//! human or JSON rendering, exit codes. No domain logic lives here.

use std::path::PathBuf;

use console::style;

use crate::analyzer::output::AnalysisReport;
use crate::analyzer::query::{Comparator, PropPredicate, QueryLogic, QueryOptions};
use crate::analyzer::{find_missing_prop, query_props, MissingOptions};
use crate::analyzer::{analyze, find_usages, get_declarations};
use crate::types::{AnalyzeOptions, FormatOptions, OutputFormat, ResolveOptions};

const USAGE: &str = "\
propscope - structural prop intelligence for React component trees

USAGE:
    propscope <COMMAND> [ARGS] [FLAGS]

COMMANDS:
    analyze <path>                      Extract all declarations and usages
    decls <component> <path>            One component's declarations
    usages <prop> <path>                Everywhere one prop is supplied
    missing <component> <prop> <path>   Instances lacking a required prop
    query <component> <path>            Criteria query over instances

FLAGS:
    --format <full|by-file|by-prop>     Result shape (default: full)
    --json                              JSON output instead of human text
    --component <name>                  Component filter (analyze, usages)
    --columns                           Include column numbers
    --locations                         Include pretty path:line:col strings
    --depth <n>                         Max directory depth
    --exclude <glob>                    Exclude pattern (repeatable)
    --no-boundary                       Skip project-boundary filtering
    --no-types                          Skip *Props interface associations
    --spread-unsafe                     Spread attributes do not satisfy
                                        required props (missing)
    --logic <and|or>                    Predicate combination (query)
    --where <name[=value]>              Predicate: exists / equals value;
                                        use name~=value for contains,
                                        !name for absence (repeatable)
    -h, --help                          Show this help
    -V, --version                       Show version
";

enum Command {
    Analyze { root: PathBuf },
    Decls { component: String, root: PathBuf },
    Usages { prop: String, root: PathBuf },
    Missing { component: String, prop: String, root: PathBuf },
    Query { component: String, root: PathBuf },
}

struct Cli {
    command: Command,
    json: bool,
    format: OutputFormat,
    format_options: FormatOptions,
    resolve: ResolveOptions,
    component_filter: Option<String>,
    include_type_info: bool,
    spread_unsafe: bool,
    logic: QueryLogic,
    predicates: Vec<PropPredicate>,
}

/// Entry point for the binary. Returns the process exit code: 0 success,
/// 1 invocation failure, 2 usage error.
pub fn run(args: &[String]) -> u8 {
    if args.iter().any(|a| a == "-h" || a == "--help") || args.is_empty() {
        print!("{}", USAGE);
        return 0;
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        println!("propscope {}", env!("CARGO_PKG_VERSION"));
        return 0;
    }

    let cli = match parse_args(args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("[propscope][error] {}", message);
            eprintln!("Run 'propscope --help' for usage.");
            return 2;
        }
    };

    match dispatch(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("[propscope][error] {}", err);
            1
        }
    }
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut positionals: Vec<String> = Vec::new();
    let mut json = false;
    let mut format = OutputFormat::Full;
    let mut format_options = FormatOptions::default();
    let mut resolve = ResolveOptions::default();
    let mut component_filter = None;
    let mut include_type_info = true;
    let mut spread_unsafe = false;
    let mut logic = QueryLogic::And;
    let mut predicates = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--columns" => format_options.include_columns = true,
            "--locations" => format_options.include_pretty_location = true,
            "--no-boundary" => resolve.respect_boundaries = false,
            "--no-types" => include_type_info = false,
            "--spread-unsafe" => spread_unsafe = true,
            "--format" => {
                let raw = expect_value(&mut iter, "--format")?;
                format = OutputFormat::parse(&raw)
                    .ok_or_else(|| format!("unknown format '{}' (full|by-file|by-prop)", raw))?;
            }
            "--logic" => {
                let raw = expect_value(&mut iter, "--logic")?;
                logic = QueryLogic::parse(&raw)
                    .ok_or_else(|| format!("unknown logic '{}' (and|or)", raw))?;
            }
            "--depth" => {
                let raw = expect_value(&mut iter, "--depth")?;
                let depth = raw
                    .parse::<usize>()
                    .map_err(|_| format!("--depth expects a number, got '{}'", raw))?;
                resolve.max_depth = Some(depth);
            }
            "--exclude" => {
                resolve.exclude_globs.push(expect_value(&mut iter, "--exclude")?);
            }
            "--component" => {
                component_filter = Some(expect_value(&mut iter, "--component")?);
            }
            "--where" => {
                predicates.push(parse_predicate(&expect_value(&mut iter, "--where")?)?);
            }
            "--exists" => {
                predicates.push(PropPredicate::exists(&expect_value(&mut iter, "--exists")?));
            }
            "--absent" => {
                predicates.push(PropPredicate::absent(&expect_value(&mut iter, "--absent")?));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown flag '{}'", other));
            }
            _ => positionals.push(arg.clone()),
        }
    }

    let command = parse_command(&positionals)?;
    Ok(Cli {
        command,
        json,
        format,
        format_options,
        resolve,
        component_filter,
        include_type_info,
        spread_unsafe,
        logic,
        predicates,
    })
}

fn expect_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{} expects a value", flag))
}

/// `name` -> exists, `!name` -> absent, `name=value` -> equals,
/// `name~=value` -> contains.
fn parse_predicate(raw: &str) -> Result<PropPredicate, String> {
    if raw.is_empty() {
        return Err("--where expects a non-empty predicate".to_string());
    }
    if let Some(name) = raw.strip_prefix('!') {
        if name.is_empty() {
            return Err("--where '!' expects a prop name".to_string());
        }
        return Ok(PropPredicate::absent(name));
    }
    if let Some((name, value)) = raw.split_once("~=") {
        if name.is_empty() {
            return Err(format!("--where '{}' is missing a prop name", raw));
        }
        return Ok(PropPredicate::value(name, value, Comparator::Contains));
    }
    if let Some((name, value)) = raw.split_once('=') {
        if name.is_empty() {
            return Err(format!("--where '{}' is missing a prop name", raw));
        }
        return Ok(PropPredicate::value(name, value, Comparator::Equals));
    }
    Ok(PropPredicate::exists(raw))
}

fn parse_command(positionals: &[String]) -> Result<Command, String> {
    let mut parts = positionals.iter();
    let name = parts
        .next()
        .ok_or_else(|| "no command given".to_string())?;
    let rest: Vec<&String> = parts.collect();

    match name.as_str() {
        "analyze" => match rest.as_slice() {
            [root] => Ok(Command::Analyze { root: PathBuf::from(root) }),
            _ => Err("analyze expects exactly one path".to_string()),
        },
        "decls" => match rest.as_slice() {
            [component, root] => Ok(Command::Decls {
                component: component.to_string(),
                root: PathBuf::from(root),
            }),
            _ => Err("decls expects <component> <path>".to_string()),
        },
        "usages" => match rest.as_slice() {
            [prop, root] => Ok(Command::Usages {
                prop: prop.to_string(),
                root: PathBuf::from(root),
            }),
            _ => Err("usages expects <prop> <path>".to_string()),
        },
        "missing" => match rest.as_slice() {
            [component, prop, root] => Ok(Command::Missing {
                component: component.to_string(),
                prop: prop.to_string(),
                root: PathBuf::from(root),
            }),
            _ => Err("missing expects <component> <prop> <path>".to_string()),
        },
        "query" => match rest.as_slice() {
            [component, root] => Ok(Command::Query {
                component: component.to_string(),
                root: PathBuf::from(root),
            }),
            _ => Err("query expects <component> <path>".to_string()),
        },
        other => Err(format!("unknown command '{}'", other)),
    }
}

fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    let analyze_options = AnalyzeOptions {
        component_filter: cli.component_filter.clone(),
        prop_filter: None,
        include_type_info: cli.include_type_info,
        format: cli.format,
        format_options: cli.format_options,
        resolve: cli.resolve.clone(),
    };

    match &cli.command {
        Command::Analyze { root } => {
            let report = analyze(root, &analyze_options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_analysis(&report);
            }
        }
        Command::Usages { prop, root } => {
            let report = find_usages(prop, root, cli.component_filter.as_deref(), &analyze_options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_analysis(&report);
            }
        }
        Command::Decls { component, root } => {
            let report = get_declarations(component, root, &cli.resolve)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} declaration(s) of '{}':",
                    report.declarations.len(),
                    style(component).bold()
                );
                for decl in &report.declarations {
                    let props: Vec<&str> = decl.props.iter().map(|p| p.name.as_str()).collect();
                    let interface = decl
                        .props_interface
                        .as_deref()
                        .map(|name| format!(" ({})", name))
                        .unwrap_or_default();
                    println!("  {}{} [{}]", decl.file, interface, props.join(", "));
                }
            }
        }
        Command::Missing { component, prop, root } => {
            let options = MissingOptions {
                assume_spread_satisfies: !cli.spread_unsafe,
                resolve: cli.resolve.clone(),
            };
            let report = find_missing_prop(root, component, prop, &options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}/{} instance(s) of '{}' missing '{}' ({:.1}%)",
                    report.missing_count,
                    report.total_instances,
                    style(component).bold(),
                    style(prop).bold(),
                    report.missing_percentage
                );
                for instance in &report.missing {
                    println!(
                        "  {}:{}:{} has [{}]",
                        instance.file,
                        instance.line,
                        instance.column,
                        instance.present_props.join(", ")
                    );
                }
            }
        }
        Command::Query { component, root } => {
            let options = QueryOptions {
                logic: cli.logic,
                resolve: cli.resolve.clone(),
                format: cli.format_options,
            };
            let report = query_props(root, component, &cli.predicates, &options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}/{} instance(s) of '{}' match:",
                    report.matches.len(),
                    report.total_instances,
                    style(component).bold()
                );
                for matched in &report.matches {
                    let props: Vec<String> = matched
                        .all_props
                        .iter()
                        .map(|(name, value)| match value {
                            Some(value) => format!("{}={}", name, value),
                            None => name.clone(),
                        })
                        .collect();
                    println!("  {}:{} [{}]", matched.file, matched.line, props.join(", "));
                }
            }
        }
    }
    Ok(())
}

fn print_analysis(report: &AnalysisReport) {
    let summary = report.summary();
    println!(
        "{} file(s), {} declaration(s), {} usage site(s), {} skipped",
        summary.files, summary.declarations, summary.usages, summary.skipped_files
    );
    match report {
        AnalysisReport::Full(full) => {
            for decl in &full.declarations {
                let props: Vec<&str> = decl.props.iter().map(|p| p.name.as_str()).collect();
                println!(
                    "  {} {} [{}]",
                    style("decl").green(),
                    style(format!("{} ({})", decl.name, decl.file)).bold(),
                    props.join(", ")
                );
            }
            for site in &full.usages {
                let props: Vec<&str> = site.props.iter().map(|p| p.name.as_str()).collect();
                println!(
                    "  {} {} {}:{} [{}]",
                    style("use").cyan(),
                    style(&site.component).bold(),
                    site.file,
                    site.line,
                    props.join(", ")
                );
            }
        }
        AnalysisReport::ByFile(grouped) => {
            for group in &grouped.files {
                println!("  {}", style(&group.file).bold());
                for decl in &group.declarations {
                    println!("    decl {} [{}]", decl.name, decl.props.join(", "));
                }
                for site in &group.usages {
                    println!("    use {}:{} [{}]", site.component, site.line, site.props.join(", "));
                }
            }
        }
        AnalysisReport::ByProp(grouped) => {
            for (prop, entries) in &grouped.props {
                println!("  {} ({})", style(prop).bold(), entries.len());
                for entry in entries {
                    println!("    {} {}:{}", entry.component, entry.file, entry.line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_syntax_covers_all_forms() {
        let exists = parse_predicate("width").expect("exists");
        assert_eq!(exists.exists, Some(true));

        let absent = parse_predicate("!width").expect("absent");
        assert_eq!(absent.exists, Some(false));

        let equals = parse_predicate("width=200px").expect("equals");
        assert_eq!(equals.value.as_deref(), Some("200px"));
        assert_eq!(equals.comparator, Comparator::Equals);

        let contains = parse_predicate("width~=200").expect("contains");
        assert_eq!(contains.value.as_deref(), Some("200"));
        assert_eq!(contains.comparator, Comparator::Contains);
    }

    #[test]
    fn malformed_predicates_are_rejected() {
        assert!(parse_predicate("").is_err());
        assert!(parse_predicate("!").is_err());
        assert!(parse_predicate("=value").is_err());
        assert!(parse_predicate("~=value").is_err());
    }

    #[test]
    fn unknown_flags_and_commands_are_usage_errors() {
        let args = vec!["analyze".to_string(), ".".to_string(), "--bogus".to_string()];
        assert!(parse_args(&args).is_err());

        let args = vec!["frobnicate".to_string(), ".".to_string()];
        assert!(parse_args(&args).is_err());
    }

    #[test]
    fn query_flags_accumulate_predicates() {
        let args: Vec<String> = [
            "query", "Select", ".", "--where", "width~=200", "--exists", "label", "--absent",
            "disabled", "--logic", "or",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cli = parse_args(&args).expect("parse");
        assert_eq!(cli.predicates.len(), 3);
        assert_eq!(cli.logic, QueryLogic::Or);
    }
}
