//! Rendering the aggregated configuration as an ESLint flat-config module.
//!
//! The module body is a pretty-printed JSON value spliced into an
//! `export default …;` statement; JSON is valid JavaScript expression
//! syntax, so no separate JS printer is needed. Rendering is
//! byte-deterministic given its input.

use crate::aggregate::AggregatedConfig;

/// Renders the configuration document as `eslint.config.mjs` text.
#[must_use]
pub fn render(config: &AggregatedConfig) -> String {
    let mut rules = serde_json::Map::new();
    if let Some(severity) = config.overall_severity {
        for entry in &config.entries {
            let mut options = vec![serde_json::Value::String(severity.to_string())];
            options.extend(entry.members.iter().map(|m| m.args.to_option_value()));
            rules.insert(
                entry.family.rule_name().to_string(),
                serde_json::Value::Array(options),
            );
        }
    }

    let document = serde_json::json!([{ "rules": rules }]);
    let body = serde_json::to_string_pretty(&document)
        .unwrap_or_else(|_| String::from("[]"));

    use std::fmt::Write;

    let mut out = String::new();
    out.push_str("// Generated by lintgen. Do not edit by hand.\n");
    match config.overall_severity {
        Some(severity) => {
            let _ = writeln!(
                out,
                "// {} flagged pattern(s) in {} rule entr{}; overall severity: {}.",
                config.member_count(),
                config.entries.len(),
                if config.entries.len() == 1 { "y" } else { "ies" },
                severity
            );
        }
        None => out.push_str("// No enforced rules.\n"),
    }
    out.push_str("export default ");
    out.push_str(&body);
    out.push_str(";\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::builder::build_fragment;
    use crate::types::{FlagDescriptor, FlagKind, FragmentId, RuleId, Severity};

    fn config_with(kind: FlagKind, value: &str, sev: Severity) -> AggregatedConfig {
        let descriptor = FlagDescriptor {
            kind,
            value: value.to_string(),
            context: String::new(),
            severity: sev,
            docs: None,
        };
        let frag = build_fragment(FragmentId(0), RuleId(0), "some rule", &descriptor);
        aggregate(vec![frag]).unwrap()
    }

    #[test]
    fn empty_config_renders_valid_minimal_document() {
        let out = render(&AggregatedConfig::default());
        assert!(out.contains("// No enforced rules."));
        assert!(out.contains("export default"));
        assert!(out.contains("\"rules\": {}"));
        assert!(out.ends_with(";\n"));
    }

    #[test]
    fn entry_carries_overall_severity_and_options() {
        let out = render(&config_with(FlagKind::Operator, "==", Severity::Error));
        assert!(out.contains("\"no-restricted-syntax\": ["));
        assert!(out.contains("\"error\","));
        assert!(out.contains("[operator='==']"));
        assert!(out.contains("overall severity: error"));
    }

    #[test]
    fn messages_are_json_escaped() {
        let out = render(&config_with(
            FlagKind::Literal,
            "say \"hi\"",
            Severity::Warn,
        ));
        // The quote inside the term must arrive escaped in the message string.
        assert!(out.contains("say \\\"hi\\\""));
    }

    #[test]
    fn rendering_is_byte_deterministic() {
        let config = config_with(FlagKind::Keyword, "fallback", Severity::Warn);
        assert_eq!(render(&config), render(&config));
    }
}
