//! JSX usage-site extraction.
//!
//! Every JSX element naming a component (capitalized identifier or dotted
//! member name) becomes a usage site whose attributes share the element's
//! `(file, line)` identity. Lowercase intrinsic elements are not usage
//! sites.

use oxc_ast::ast::*;
use oxc_span::GetSpan;

use crate::types::{component_name_matches, PropUsage, UsageSite, SPREAD_PROP};

use super::visitor::{stringify_expression, JsxVisitor};

impl<'a> JsxVisitor<'a> {
    pub(super) fn handle_jsx_element(&mut self, elem: &JSXElement<'a>) {
        let opening = &elem.opening_element;
        let Some(component) = component_name(&opening.name) else {
            return;
        };
        if let Some(filter) = &self.opts.component_filter
            && !component_name_matches(&component, filter)
        {
            return;
        }

        let (line, column) = self.line_col(opening.name.span());
        let mut props = Vec::new();
        for item in &opening.attributes {
            match item {
                JSXAttributeItem::Attribute(attr) => {
                    let name = self.attribute_name(&attr.name);
                    if self.prop_filtered(&name) {
                        continue;
                    }
                    let value = attr.value.as_ref().and_then(attribute_value_text);
                    props.push(self.supplied_prop(&component, name, line, column, value, false));
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    let name = SPREAD_PROP.to_string();
                    if self.prop_filtered(&name) {
                        continue;
                    }
                    let value = stringify_expression(&spread.argument);
                    props.push(self.supplied_prop(&component, name, line, column, value, true));
                }
            }
        }

        self.components.usages.push(UsageSite {
            component,
            file: self.relative.to_string(),
            line,
            column,
            props,
        });
    }

    fn prop_filtered(&self, name: &str) -> bool {
        self.opts
            .prop_filter
            .as_ref()
            .is_some_and(|filter| filter != name)
    }

    fn attribute_name(&self, name: &JSXAttributeName<'a>) -> String {
        match name {
            JSXAttributeName::Identifier(ident) => ident.name.to_string(),
            // Namespaced attribute names (`xlink:href`) keep their source
            // spelling.
            JSXAttributeName::NamespacedName(ns) => self.span_text(ns.span).to_string(),
        }
    }

    fn supplied_prop(
        &self,
        component: &str,
        name: String,
        line: usize,
        column: usize,
        value: Option<String>,
        is_spread: bool,
    ) -> PropUsage {
        PropUsage {
            name,
            component: component.to_string(),
            file: self.relative.to_string(),
            line,
            column,
            value,
            is_spread,
            declared_type: None,
        }
    }
}

/// Resolve a JSX opening name to a component name. Dotted names render as
/// their full dotted form; lowercase intrinsics and namespaced (`svg:use`)
/// elements resolve to `None`.
fn component_name(name: &JSXElementName<'_>) -> Option<String> {
    match name {
        JSXElementName::Identifier(ident) => capitalized(ident.name.as_str()),
        JSXElementName::IdentifierReference(ident) => capitalized(ident.name.as_str()),
        JSXElementName::MemberExpression(member) => Some(member_name(member)),
        JSXElementName::NamespacedName(_) | JSXElementName::ThisExpression(_) => None,
    }
}

fn capitalized(name: &str) -> Option<String> {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_uppercase())
        .then(|| name.to_string())
}

fn member_name(member: &JSXMemberExpression<'_>) -> String {
    let object = match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => id.name.to_string(),
        JSXMemberExpressionObject::MemberExpression(inner) => member_name(inner),
        JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
    };
    format!("{}.{}", object, member.property.name)
}

fn attribute_value_text(value: &JSXAttributeValue<'_>) -> Option<String> {
    match value {
        JSXAttributeValue::StringLiteral(lit) => Some(lit.value.to_string()),
        JSXAttributeValue::ExpressionContainer(container) => container
            .expression
            .as_expression()
            .and_then(stringify_expression),
        // Element- and fragment-valued attributes have no useful textual
        // form; leaving the value unset is the expected outcome.
        JSXAttributeValue::Element(_) | JSXAttributeValue::Fragment(_) => None,
    }
}
