//! Rule-file parsing.
//!
//! Splits raw `.cursorrules` text into an ordered sequence of candidate
//! rules. Blank lines, `#` comments (which also covers markdown headings),
//! `//` comments, and separator lines are discarded; list bullets are
//! stripped from the candidate text.

use crate::types::{Rule, RuleId};

/// Parses raw rule-file content into candidate rules in file order.
///
/// Empty input yields an empty vector, not an error. Lines that are
/// malformed (nothing left after stripping markers) are skipped with a log.
#[must_use]
pub fn parse_rules(input: &str) -> Vec<Rule> {
    let mut rules = Vec::new();

    for (line_no, raw_line) in input.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        // `#` covers both comments and markdown headings.
        if line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let candidate = strip_bullet(line);
        if candidate.is_empty() || !candidate.chars().any(char::is_alphanumeric) {
            tracing::debug!(line = line_no + 1, text = line, "skipping malformed line");
            continue;
        }

        rules.push(Rule::new(RuleId(rules.len()), candidate));
    }

    rules
}

/// Strips a single leading list marker (`- `, `* `, or a bare `-`/`*`).
fn strip_bullet(line: &str) -> &str {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .unwrap_or(line)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_rules() {
        assert!(parse_rules("").is_empty());
        assert!(parse_rules("   \n\n  \t\n").is_empty());
    }

    #[test]
    fn skips_comments_and_headings() {
        let input = "# Style rules\n\
                     ## Equality\n\
                     // legacy note\n\
                     Use === instead of ==\n";
        let rules = parse_rules(input);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].raw_text, "Use === instead of ==");
    }

    #[test]
    fn strips_list_bullets() {
        let rules = parse_rules("- Do NOT hardcode anything\n* No fallbacks\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].raw_text, "Do NOT hardcode anything");
        assert_eq!(rules[1].raw_text, "No fallbacks");
    }

    #[test]
    fn skips_separator_lines() {
        let rules = parse_rules("---\n***\nNo console.log statements allowed\n===\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].raw_text, "No console.log statements allowed");
    }

    #[test]
    fn ids_follow_parse_order() {
        let input = "No var declarations\n\n# section\nAvoid Math.random()\nNo == comparisons\n";
        let rules = parse_rules(input);
        let ids: Vec<usize> = rules.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(rules[1].raw_text, "Avoid Math.random()");
    }
}
