//! Deterministic mapping from flag descriptors to configuration fragments.
//!
//! Each [`FlagDescriptor`] selects a fixed linter-rule template family:
//!
//! - `selector` → `no-restricted-syntax`, selector used verbatim
//! - `literal` → `no-restricted-syntax` with a `Literal[value=…]` selector
//! - `operator` → `no-restricted-syntax` with an operator selector
//! - `keyword` with a dotted value → `no-restricted-properties`
//! - `keyword` otherwise → `no-restricted-globals`
//!
//! This step performs no external calls.

use crate::types::{
    ConfigFragment, FlagDescriptor, FlagKind, FragmentId, RuleId, TemplateArgs,
};

/// Builds the configuration fragment for one extracted flag.
///
/// `rule_text` is the refined statement the flag was extracted from; it feeds
/// the synthesized message and documentation when the capability did not
/// supply its own.
#[must_use]
pub fn build_fragment(
    id: FragmentId,
    source_rule: RuleId,
    rule_text: &str,
    descriptor: &FlagDescriptor,
) -> ConfigFragment {
    let value = descriptor.value.trim();
    let message = descriptor
        .docs
        .as_ref()
        .map(|d| d.expected_error.clone())
        .unwrap_or_else(|| default_message(descriptor.kind, value, rule_text));

    let args = match descriptor.kind {
        FlagKind::Selector => TemplateArgs::Syntax {
            selector: value.to_string(),
            message: message.clone(),
        },
        FlagKind::Literal => TemplateArgs::Syntax {
            selector: format!("Literal[value='{}']", escape_selector_term(value)),
            message: message.clone(),
        },
        FlagKind::Operator => TemplateArgs::Syntax {
            selector: format!(
                ":matches(BinaryExpression, LogicalExpression)[operator='{}']",
                escape_selector_term(value)
            ),
            message: message.clone(),
        },
        FlagKind::Keyword => match value.split_once('.') {
            Some((object, property)) if !object.is_empty() && !property.is_empty() => {
                TemplateArgs::Property {
                    object: object.to_string(),
                    property: property.to_string(),
                    message: message.clone(),
                }
            }
            _ => TemplateArgs::Global {
                name: value.to_string(),
                message: message.clone(),
            },
        },
    };

    let violation_example = descriptor
        .docs
        .as_ref()
        .map(|d| d.violation_example.clone())
        .unwrap_or_else(|| synth_violation_example(&args));
    let explanation = descriptor
        .docs
        .as_ref()
        .map(|d| d.explanation.clone())
        .unwrap_or_else(|| format!("The rule \"{rule_text}\" restricts use of `{value}`."));

    ConfigFragment {
        id,
        source_rule,
        family: args.family(),
        args,
        severity: descriptor.severity,
        violation_example,
        expected_error: message,
        explanation,
    }
}

/// Escapes a term for single-quoted AST-selector position. Message text
/// needs no escaping here: the emitter serializes it as JSON.
fn escape_selector_term(term: &str) -> String {
    term.replace('\'', "\\'")
}

fn default_message(kind: FlagKind, value: &str, rule_text: &str) -> String {
    match kind {
        FlagKind::Selector => {
            format!("Syntax matching '{value}' is restricted by rule: {rule_text}")
        }
        FlagKind::Literal => {
            format!("Usage of literal '{value}' is restricted by rule: {rule_text}")
        }
        FlagKind::Operator => {
            format!("Usage of operator '{value}' is restricted by rule: {rule_text}")
        }
        FlagKind::Keyword => {
            format!("Usage of '{value}' is restricted by rule: {rule_text}")
        }
    }
}

fn synth_violation_example(args: &TemplateArgs) -> String {
    match args {
        TemplateArgs::Syntax { selector, .. } => format!("// code matching `{selector}`"),
        TemplateArgs::Global { name, .. } => format!("{name};"),
        TemplateArgs::Property {
            object, property, ..
        } => format!("{object}.{property};"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocExample, Severity, TemplateFamily};

    fn descriptor(kind: FlagKind, value: &str) -> FlagDescriptor {
        FlagDescriptor {
            kind,
            value: value.to_string(),
            context: String::new(),
            severity: Severity::Warn,
            docs: None,
        }
    }

    #[test]
    fn selector_kind_maps_to_restricted_syntax_verbatim() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "No default parameters in functions",
            &descriptor(FlagKind::Selector, "AssignmentPattern"),
        );
        assert_eq!(frag.family, TemplateFamily::RestrictedSyntax);
        assert_eq!(frag.args.target(), "AssignmentPattern");
    }

    #[test]
    fn literal_kind_builds_literal_selector() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "Latest model is gpt-4o",
            &descriptor(FlagKind::Literal, "gpt-3.5-turbo"),
        );
        assert_eq!(frag.args.target(), "Literal[value='gpt-3.5-turbo']");
    }

    #[test]
    fn operator_kind_builds_matches_selector() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "Use === instead of ==",
            &descriptor(FlagKind::Operator, "=="),
        );
        assert_eq!(
            frag.args.target(),
            ":matches(BinaryExpression, LogicalExpression)[operator='==']"
        );
        assert!(frag.expected_error.contains("Usage of operator '=='"));
    }

    #[test]
    fn dotted_keyword_maps_to_restricted_properties() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "Avoid Math.random()",
            &descriptor(FlagKind::Keyword, "Math.random"),
        );
        assert_eq!(frag.family, TemplateFamily::RestrictedProperties);
        assert_eq!(frag.args.target(), "Math.random");
    }

    #[test]
    fn plain_keyword_maps_to_restricted_globals() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "No fallbacks",
            &descriptor(FlagKind::Keyword, "fallback"),
        );
        assert_eq!(frag.family, TemplateFamily::RestrictedGlobals);
        assert_eq!(frag.args.target(), "fallback");
        assert_eq!(frag.violation_example, "fallback;");
    }

    #[test]
    fn selector_terms_escape_single_quotes() {
        let frag = build_fragment(
            FragmentId(0),
            RuleId(0),
            "No it's literals",
            &descriptor(FlagKind::Literal, "it's"),
        );
        assert_eq!(frag.args.target(), "Literal[value='it\\'s']");
    }

    #[test]
    fn capability_docs_win_over_synthesis() {
        let mut desc = descriptor(FlagKind::Selector, "AssignmentPattern");
        desc.severity = Severity::Error;
        desc.docs = Some(DocExample {
            violation_example: "function foo(x = 0) {}".into(),
            expected_error: "No default parameters allowed!".into(),
            explanation: "Default parameters hide required arguments.".into(),
        });

        let frag = build_fragment(FragmentId(3), RuleId(1), "No default parameters", &desc);
        assert_eq!(frag.expected_error, "No default parameters allowed!");
        assert_eq!(frag.violation_example, "function foo(x = 0) {}");
        assert_eq!(frag.args.message(), "No default parameters allowed!");
        assert_eq!(frag.severity, Severity::Error);
    }

    #[test]
    fn builder_is_deterministic() {
        let desc = descriptor(FlagKind::Operator, "||");
        let a = build_fragment(FragmentId(1), RuleId(2), "No fallbacks", &desc);
        let b = build_fragment(FragmentId(1), RuleId(2), "No fallbacks", &desc);
        assert_eq!(a, b);
    }
}
