//! Prompt pairs for the three capability-backed stages.
//!
//! The response format is appended by the client from the stage's JSON
//! Schema; these prompts carry only the task instructions and worked
//! examples.

/// System prompt for the filter stage.
#[must_use]
pub fn classify_system() -> &'static str {
    "You are reviewing one line from a rule configuration file for a JavaScript \
project. Decide whether the line expresses a preference, constraint, naming \
convention, or prohibition that a linter could enforce by flagging specific \
keywords, string literals, operators, or syntax patterns.\n\n\
Bias towards lintable unless the line is clearly not a rule. Treat as lintable:\n\
- Direct style rules naming operators or keywords (\"Use === instead of ==\")\n\
- Prohibitions on specific functions, patterns, or practices (\"No fallbacks\", \
\"Avoid Math.random()\", \"Do NOT hardcode anything\")\n\
- Lines stating specific values or facts (\"Latest model is gpt-4o\") that imply \
flagging other values\n\n\
Treat as NOT lintable:\n\
- Vague, subjective advice that cannot be reduced to concrete terms (\"write \
good code\", \"be careful\", \"be nice to your coworkers\")\n\
- Instructions aimed at humans or AI assistants rather than code (\"always \
validate with the user\")\n\n\
Set \"lintable\" accordingly and put a one-sentence justification in \
\"reasoning\"."
}

/// User message for the filter stage.
#[must_use]
pub fn classify_user(rule_text: &str) -> String {
    format!("Rule line:\n---\n{rule_text}\n---")
}

/// System prompt for the refiner stage.
#[must_use]
pub fn refine_system() -> &'static str {
    "You simplify coding rules into atomic, directly checkable statements.\n\n\
Decide whether the input rule is:\n\
a) Simple: it already names one specific keyword, function, literal, or \
operator (\"No console.log\", \"Use === instead of ==\"). Set outcome \
\"passed_through\" and return the rule unchanged in \"refined_rules\".\n\
b) Complex or abstract: it states a broader principle (\"Do NOT hardcode \
anything\", \"WE DONT USE FALLBACKS. EVER.\"). Set outcome \"translated\" and \
break it into one or more simpler statements, each focused on a single \
concrete term to flag. Example: \"WE DONT USE FALLBACKS. EVER.\" becomes \
[\"Disallow the '||' operator\", \"Disallow the '??' operator\", \"Disallow \
identifiers named 'fallback'\"].\n\
c) Untranslatable: no concrete terms can be derived (\"Tests should be easy to \
understand\"). Set outcome \"untranslatable\" with an empty \"refined_rules\".\n\n\
Do NOT invent restrictions the rule does not imply, and do NOT emit more than \
five refined statements for one rule."
}

/// User message for the refiner stage.
#[must_use]
pub fn refine_user(rule_text: &str) -> String {
    format!("Input rule:\n---\n{rule_text}\n---")
}

/// System prompt for the flag-extraction stage.
#[must_use]
pub fn extract_system() -> &'static str {
    "You turn one atomic coding rule into a single structured flag descriptor \
for ESLint enforcement.\n\n\
Identify the one concrete term the rule targets and classify it:\n\
- \"keyword\": an identifier, global, or dotted member access (\"fallback\", \
\"Math.random\")\n\
- \"literal\": a specific string or number value (\"gpt-3.5-turbo\", \"500\")\n\
- \"operator\": a comparison or logical operator (\"==\", \"||\", \"??\")\n\
- \"selector\": an ESLint AST selector when the rule targets a syntax shape \
rather than a term (\"AssignmentPattern\" for default parameters)\n\n\
Set \"severity\" to \"error\" when the rule uses strong prohibition words \
(MUST NOT, NEVER, DON'T, DISALLOW, NO) and \"warn\" for softer phrasing \
(AVOID, PREFER NOT, SHOULD NOT). Default to \"warn\" when unclear.\n\n\
When you can, also provide \"violation_example\" (a minimal offending \
snippet), \"expected_error\" (the message the linter should print), and \
\"explanation\" (one plain sentence on why). Example: for \"No default \
parameters in functions\" return kind \"selector\", value \
\"AssignmentPattern\", severity \"error\", violation_example \
\"function foo(x = 0) {}\", expected_error \"No default parameters \
allowed!\".\n\n\
Extract the term exactly as it should be matched ('==' not '===' when the \
rule bans '==')."
}

/// User message for the flag-extraction stage.
#[must_use]
pub fn extract_user(rule_text: &str) -> String {
    format!("Atomic rule:\n---\n{rule_text}\n---")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_embed_the_rule_text() {
        for message in [
            classify_user("No console.log"),
            refine_user("No console.log"),
            extract_user("No console.log"),
        ] {
            assert!(message.contains("No console.log"));
        }
    }

    #[test]
    fn extract_prompt_names_all_kinds() {
        let prompt = extract_system();
        for kind in ["keyword", "literal", "operator", "selector"] {
            assert!(prompt.contains(kind), "missing kind {kind}");
        }
    }
}
