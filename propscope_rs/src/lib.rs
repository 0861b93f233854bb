//! # propscope
//!
//! **Structural prop intelligence for React component trees.**
//!
//! propscope statically analyzes `.tsx`/`.jsx`/`.ts`/`.js` sources and
//! answers structural questions about components and their props without
//! executing any code:
//!
//! - **Declarations** - which component declares which props, in source
//!   order, with `*Props` interface associations
//! - **Usages** - where a given prop is supplied, across a whole tree
//! - **Missing props** - which instances of a component lack a required
//!   prop, with a conservative policy for spread attributes
//! - **Criteria queries** - which instances match an AND/OR combination of
//!   prop predicates (equals, contains, existence)
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use propscope::{analyze, AnalyzeOptions};
//! use std::path::Path;
//!
//! let report = analyze(Path::new("src"), &AnalyzeOptions::new()).unwrap();
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```
//!
//! ## Finding missing props
//!
//! ```rust,no_run
//! use propscope::{find_missing_prop, MissingOptions};
//! use std::path::Path;
//!
//! let report = find_missing_prop(
//!     Path::new("src"),
//!     "Select",
//!     "width",
//!     &MissingOptions::default(),
//! )
//! .unwrap();
//! println!("{} of {} instances missing", report.missing_count, report.total_instances);
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! propscope analyze src                    # Full analysis
//! propscope decls Button src               # One component's declarations
//! propscope usages onClick src             # Everywhere one prop is supplied
//! propscope missing Select width src       # Instances lacking a prop
//! propscope query Select src --where width~=200   # Criteria query
//! ```
//!
//! Files that fail to parse are skipped and counted, never fatal: analysis
//! of a tree always yields a well-formed report.

/// Component analysis pipeline: extraction, detection, queries, shaping.
pub mod analyzer;

/// Command-line adapter. Thin wiring over the library operations.
pub mod cli;

/// Filesystem resolution for component source files.
pub mod fs_utils;

/// Common types used throughout the crate.
pub mod types;

// Re-exports for convenience

/// Analyze a file or directory tree.
pub use analyzer::runner::analyze;

/// Find every usage of one prop.
pub use analyzer::runner::find_usages;

/// Return one component's declarations.
pub use analyzer::runner::get_declarations;

/// Detect instances missing a required prop.
pub use analyzer::missing::find_missing_prop;

/// Evaluate prop predicates over component instances.
pub use analyzer::query::query_props;

pub use analyzer::missing::{MissingOptions, MissingPropInstance, MissingPropReport};
pub use analyzer::output::{
    AnalysisReport, DeclarationsReport, FileGroupedReport, FullReport, PropGroupedReport, Summary,
};
pub use analyzer::query::{
    Comparator, PropPredicate, QueryLogic, QueryMatch, QueryOptions, QueryReport,
};
pub use types::{
    AnalyzeOptions, ComponentDecl, ExtractOptions, FormatOptions, OutputFormat, PropUsage,
    ResolveOptions, UsageSite, SPREAD_PROP,
};
