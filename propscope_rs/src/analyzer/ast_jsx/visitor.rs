//! JsxVisitor struct and shared helpers for AST traversal.
//!
//! Holds the per-file extraction state, including the `*Props` interface
//! association table, which is scoped to a single file's pass and never
//! crosses file boundaries.

use std::collections::HashMap;

use oxc_ast::ast::*;
use oxc_span::Span;

use crate::types::{ExtractOptions, FileComponents};

/// Members of a `*Props` interface or type literal: `(name, rendered type)`.
pub(super) type InterfaceMembers = Vec<(String, Option<String>)>;

/// Visitor for traversing a component file's AST and collecting
/// declarations and JSX usage sites.
pub(super) struct JsxVisitor<'a> {
    pub components: FileComponents,
    pub relative: &'a str,
    pub source_text: &'a str,
    pub opts: &'a ExtractOptions,
    /// Per-file naming-convention table: component name -> (interface name,
    /// property signatures).
    pub props_interfaces: HashMap<String, (String, InterfaceMembers)>,
}

impl<'a> JsxVisitor<'a> {
    pub(super) fn new(relative: &'a str, source_text: &'a str, opts: &'a ExtractOptions) -> Self {
        Self {
            components: FileComponents::default(),
            relative,
            source_text,
            opts,
            props_interfaces: HashMap::new(),
        }
    }

    /// 1-based `(line, column)` for a span start.
    pub(super) fn line_col(&self, span: Span) -> (usize, usize) {
        let start = std::cmp::min(span.start as usize, self.source_text.len());
        let before = &self.source_text[..start];
        let line = before.bytes().filter(|b| *b == b'\n').count() + 1;
        let column = start - before.rfind('\n').map_or(0, |i| i + 1) + 1;
        (line, column)
    }

    pub(super) fn span_text(&self, span: Span) -> &str {
        let start = std::cmp::min(span.start as usize, self.source_text.len());
        let end = std::cmp::min(span.end as usize, self.source_text.len());
        &self.source_text[start..end]
    }

    /// Attach interface associations recorded during the walk. Runs after
    /// the traversal so the result does not depend on whether the interface
    /// was declared before or after the component.
    pub(super) fn finish(mut self) -> FileComponents {
        for decl in &mut self.components.declarations {
            let Some((interface, members)) = self.props_interfaces.get(&decl.name) else {
                continue;
            };
            decl.props_interface = Some(interface.clone());
            if self.opts.include_type_info {
                for prop in &mut decl.props {
                    if prop.declared_type.is_none() {
                        prop.declared_type = members
                            .iter()
                            .find(|(name, _)| name == &prop.name)
                            .and_then(|(_, ty)| ty.clone());
                    }
                }
            }
        }
        self.components
    }
}

/// Extract a static name from a property key.
pub(super) fn property_key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(id) => Some(id.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}

/// Render an expression as text when it has an obvious textual form.
///
/// Total over the expression union: unsupported shapes yield `None`, which
/// callers treat as "value unknown" rather than an error.
pub(super) fn stringify_expression(expr: &Expression<'_>) -> Option<String> {
    match expr {
        Expression::StringLiteral(lit) => Some(lit.value.to_string()),
        Expression::NumericLiteral(lit) => Some(lit.value.to_string()),
        Expression::BooleanLiteral(lit) => Some(lit.value.to_string()),
        Expression::NullLiteral(_) => Some("null".to_string()),
        Expression::Identifier(id) => Some(id.name.to_string()),
        Expression::StaticMemberExpression(member) => {
            let object = stringify_expression(&member.object)?;
            Some(format!("{}.{}", object, member.property.name))
        }
        Expression::CallExpression(call) => {
            stringify_expression(&call.callee).map(|callee| format!("{}(...)", callee))
        }
        Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
            Some("() => {...}".to_string())
        }
        Expression::TemplateLiteral(tpl) => stringify_template(tpl),
        Expression::ObjectExpression(_) => Some("{...}".to_string()),
        Expression::ArrayExpression(_) => Some("[...]".to_string()),
        Expression::TSAsExpression(cast) => stringify_expression(&cast.expression),
        Expression::TSNonNullExpression(inner) => stringify_expression(&inner.expression),
        Expression::ParenthesizedExpression(inner) => stringify_expression(&inner.expression),
        _ => None,
    }
}

/// Fold a template literal into plain text. Interpolations are rendered
/// through [`stringify_expression`]; one unrenderable interpolation makes
/// the whole template unknown.
fn stringify_template(tpl: &TemplateLiteral<'_>) -> Option<String> {
    let mut out = String::new();
    for (i, quasi) in tpl.quasis.iter().enumerate() {
        match &quasi.value.cooked {
            Some(cooked) => out.push_str(cooked),
            None => out.push_str(&quasi.value.raw),
        }
        if let Some(expr) = tpl.expressions.get(i) {
            out.push_str(&stringify_expression(expr)?);
        }
    }
    Some(out)
}

/// Short rendering for a type annotation: reference names and the common
/// keywords; anything else falls back to the annotation's source text,
/// capped so inline unions don't bloat payloads.
pub(super) fn ts_type_text(ty: &TSType<'_>, source: &str) -> Option<String> {
    use oxc_span::GetSpan;

    const MAX_TYPE_TEXT: usize = 80;

    match ty {
        TSType::TSTypeReference(reference) => Some(type_name_text(&reference.type_name)),
        TSType::TSStringKeyword(_) => Some("string".to_string()),
        TSType::TSNumberKeyword(_) => Some("number".to_string()),
        TSType::TSBooleanKeyword(_) => Some("boolean".to_string()),
        other => {
            let span = other.span();
            let start = std::cmp::min(span.start as usize, source.len());
            let end = std::cmp::min(span.end as usize, source.len());
            let text = source[start..end].trim();
            if text.is_empty() || text.len() > MAX_TYPE_TEXT {
                None
            } else {
                Some(text.to_string())
            }
        }
    }
}

fn type_name_text(name: &TSTypeName<'_>) -> String {
    match name {
        TSTypeName::IdentifierReference(id) => id.name.to_string(),
        TSTypeName::QualifiedName(qualified) => {
            format!(
                "{}.{}",
                type_name_text(&qualified.left),
                qualified.right.name
            )
        }
        TSTypeName::ThisExpression(_) => "this".to_string(),
    }
}
