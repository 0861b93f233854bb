//! JSX/TSX component extraction using the OXC parser.
//!
//! One call per file: parse the source, walk the AST once, and produce the
//! file's component declarations and JSX usage sites. Parse failures are
//! file-local; the caller records a skipped file and continues the batch.
//!
//! # Module Structure
//!
//! - `visitor`: per-file visitor state and shared helpers
//! - `declarations`: function/arrow component declarations and `*Props`
//!   interface associations
//! - `usages`: JSX usage-site extraction

mod declarations;
mod usages;
mod visitor;

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::types::{ExtractOptions, FileComponents};

use visitor::JsxVisitor;

/// Parse one file's text and extract component declarations and usage
/// sites. Returns `None` when the parser gives up on the input entirely;
/// recoverable syntax errors still contribute whatever the walk finds.
pub(crate) fn analyze_component_file(
    content: &str,
    path: &Path,
    relative: &str,
    opts: &ExtractOptions,
) -> Option<FileComponents> {
    let allocator = Allocator::default();

    // Only enable JSX for .tsx/.jsx files to avoid conflicts with
    // TypeScript generics (`const fn = <T>(...) =>` would otherwise parse
    // as a JSX tag).
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let is_jsx_file = ext == "tsx" || ext == "jsx";
    let source_type = SourceType::from_path(path)
        .unwrap_or_default()
        .with_typescript(true)
        .with_jsx(is_jsx_file);

    let ret = Parser::new(&allocator, content, source_type).parse();

    if !ret.errors.is_empty() && std::env::var("PROPSCOPE_VERBOSE").is_ok() {
        eprintln!(
            "[propscope][debug] parser errors in {}: {} errors",
            path.display(),
            ret.errors.len()
        );
        for (i, err) in ret.errors.iter().take(5).enumerate() {
            let line_info = err
                .labels
                .as_ref()
                .and_then(|labels| labels.first())
                .map(|label| {
                    let offset = label.offset();
                    let line = content[..offset].bytes().filter(|b| *b == b'\n').count() + 1;
                    format!(" (line {})", line)
                })
                .unwrap_or_default();
            eprintln!("  [{}]{} {}", i + 1, line_info, err);
        }
    }

    if ret.panicked {
        return None;
    }

    let mut visitor = JsxVisitor::new(relative, content, opts);
    visitor.visit_program(&ret.program);
    Some(visitor.finish())
}

/// Visit wiring: each relevant node kind delegates to its submodule
/// handler, then resumes the default walk so nested declarations, JSX
/// children, and fragment contents are all reached. Node kinds with no
/// handler fall through the default walk untouched.
impl<'a> Visit<'a> for JsxVisitor<'a> {
    fn visit_declaration(&mut self, decl: &Declaration<'a>) {
        self.handle_declaration(decl);
        walk::walk_declaration(self, decl);
    }

    fn visit_export_default_declaration(&mut self, decl: &ExportDefaultDeclaration<'a>) {
        self.handle_export_default_declaration(decl);
        walk::walk_export_default_declaration(self, decl);
    }

    fn visit_variable_declarator(&mut self, decl: &VariableDeclarator<'a>) {
        self.handle_variable_declarator(decl);
        walk::walk_variable_declarator(self, decl);
    }

    fn visit_jsx_element(&mut self, elem: &JSXElement<'a>) {
        self.handle_jsx_element(elem);
        walk::walk_jsx_element(self, elem);
    }
}
