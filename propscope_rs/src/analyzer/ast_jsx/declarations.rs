//! Component declaration extraction.
//!
//! Recognizes named functions and variables bound to closures as component
//! definitions, reads their props from the first parameter (destructuring
//! pattern or identifier-plus-member-access), and records `*Props`
//! interface/type-alias associations for the per-file table.

use std::collections::HashSet;

use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};

use crate::types::{ComponentDecl, PropUsage, PROPS_SUFFIX, SPREAD_PROP};

use super::visitor::{property_key_name, ts_type_text, InterfaceMembers, JsxVisitor};

impl<'a> JsxVisitor<'a> {
    pub(super) fn handle_declaration(&mut self, decl: &Declaration<'a>) {
        match decl {
            Declaration::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    self.record_function_component(
                        id.name.as_str(),
                        &func.params,
                        func.body.as_deref(),
                    );
                }
            }
            Declaration::TSInterfaceDeclaration(interface) => {
                let members = self.signature_members(&interface.body.body);
                self.record_props_interface(interface.id.name.as_str(), members);
            }
            Declaration::TSTypeAliasDeclaration(alias) => {
                if let TSType::TSTypeLiteral(literal) = &alias.type_annotation {
                    let members = self.signature_members(&literal.members);
                    self.record_props_interface(alias.id.name.as_str(), members);
                }
            }
            _ => {}
        }
    }

    pub(super) fn handle_export_default_declaration(
        &mut self,
        decl: &ExportDefaultDeclaration<'a>,
    ) {
        if let ExportDefaultDeclarationKind::FunctionDeclaration(func) = &decl.declaration
            && let Some(id) = &func.id
        {
            self.record_function_component(id.name.as_str(), &func.params, func.body.as_deref());
        }
    }

    pub(super) fn handle_variable_declarator(&mut self, decl: &VariableDeclarator<'a>) {
        let BindingPatternKind::BindingIdentifier(id) = &decl.id.kind else {
            return;
        };
        match &decl.init {
            Some(Expression::ArrowFunctionExpression(arrow)) => {
                self.record_function_component(id.name.as_str(), &arrow.params, Some(&arrow.body));
            }
            Some(Expression::FunctionExpression(func)) => {
                self.record_function_component(id.name.as_str(), &func.params, func.body.as_deref());
            }
            _ => {}
        }
    }

    /// Record one `*Props` association in the per-file table.
    fn record_props_interface(&mut self, interface_name: &str, members: InterfaceMembers) {
        if !self.opts.include_type_info {
            return;
        }
        let Some(component) = interface_name.strip_suffix(PROPS_SUFFIX) else {
            return;
        };
        if component.is_empty() {
            return;
        }
        self.props_interfaces
            .insert(component.to_string(), (interface_name.to_string(), members));
    }

    fn signature_members(&self, signatures: &[TSSignature<'a>]) -> InterfaceMembers {
        let mut members = Vec::new();
        for signature in signatures {
            let TSSignature::TSPropertySignature(prop) = signature else {
                continue;
            };
            let Some(name) = property_key_name(&prop.key) else {
                continue;
            };
            let ty = prop
                .type_annotation
                .as_ref()
                .and_then(|ann| ts_type_text(&ann.type_annotation, self.source_text));
            members.push((name, ty));
        }
        members
    }

    fn record_function_component(
        &mut self,
        name: &str,
        params: &FormalParameters<'a>,
        body: Option<&FunctionBody<'a>>,
    ) {
        match &self.opts.component_filter {
            // With a filter, declaration names must match exactly.
            Some(filter) if filter != name => return,
            // Without one, the capitalized naming convention decides.
            None if !name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) => return,
            _ => {}
        }

        let mut props = Vec::new();
        if let Some(param) = params.items.first() {
            props = self.props_from_pattern(name, &param.pattern.kind, body);
        }

        self.components.declarations.push(ComponentDecl {
            name: name.to_string(),
            file: self.relative.to_string(),
            props,
            props_interface: None,
        });
    }

    fn props_from_pattern(
        &self,
        component: &str,
        kind: &BindingPatternKind<'a>,
        body: Option<&FunctionBody<'a>>,
    ) -> Vec<PropUsage> {
        match kind {
            BindingPatternKind::ObjectPattern(pattern) => {
                self.object_pattern_props(component, pattern)
            }
            // A single identifier parameter receives the whole prop bag;
            // member accesses on it inside the body name the actual props.
            BindingPatternKind::BindingIdentifier(id) => {
                self.member_access_props(component, id.name.as_str(), body)
            }
            BindingPatternKind::AssignmentPattern(assign) => {
                self.props_from_pattern(component, &assign.left.kind, body)
            }
            BindingPatternKind::ArrayPattern(_) => Vec::new(),
        }
    }

    fn object_pattern_props(&self, component: &str, pattern: &ObjectPattern<'a>) -> Vec<PropUsage> {
        let mut props = Vec::new();
        for prop in &pattern.properties {
            let Some(name) = property_key_name(&prop.key) else {
                continue;
            };
            let (line, column) = self.line_col(prop.key.span());
            props.push(self.declared_prop(component, name, line, column, false));
        }
        if let Some(rest) = &pattern.rest {
            let (line, column) = self.line_col(rest.span);
            props.push(self.declared_prop(component, SPREAD_PROP.to_string(), line, column, true));
        }
        props
    }

    fn member_access_props(
        &self,
        component: &str,
        param_name: &str,
        body: Option<&FunctionBody<'a>>,
    ) -> Vec<PropUsage> {
        let Some(body) = body else {
            return Vec::new();
        };
        let mut collector = MemberAccessCollector {
            param_name,
            seen: HashSet::new(),
            accesses: Vec::new(),
        };
        collector.visit_function_body(body);
        collector
            .accesses
            .into_iter()
            .map(|(name, span)| {
                let (line, column) = self.line_col(span);
                self.declared_prop(component, name, line, column, false)
            })
            .collect()
    }

    fn declared_prop(
        &self,
        component: &str,
        name: String,
        line: usize,
        column: usize,
        is_spread: bool,
    ) -> PropUsage {
        PropUsage {
            name,
            component: component.to_string(),
            file: self.relative.to_string(),
            line,
            column,
            value: None,
            is_spread,
            declared_type: None,
        }
    }
}

/// Collects distinct `param.member` accesses inside one function body.
struct MemberAccessCollector<'b> {
    param_name: &'b str,
    seen: HashSet<String>,
    accesses: Vec<(String, Span)>,
}

impl<'a> Visit<'a> for MemberAccessCollector<'_> {
    fn visit_member_expression(&mut self, member: &MemberExpression<'a>) {
        if let MemberExpression::StaticMemberExpression(static_member) = member
            && let Expression::Identifier(object) = &static_member.object
            && object.name.as_str() == self.param_name
            && self.seen.insert(static_member.property.name.to_string())
        {
            self.accesses.push((
                static_member.property.name.to_string(),
                static_member.property.span,
            ));
        }
        walk::walk_member_expression(self, member);
    }
}
