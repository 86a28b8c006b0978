//! Template variable substitution engine
//!
//! Provides {{variable}} style template substitution for outreach content.
//! Substitution is a pure function of the template and an explicit context:
//! no globals, no environment access, no I/O. Unknown variables are kept
//! as-is so a half-filled context never silently drops copy.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Regex for matching {{variable}} patterns
static TEMPLATE_VAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap());

/// Named values available to a template
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, replacing any previous binding of the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute template variables in a string
///
/// Replaces {{variable}} with values from the context. Missing variables are
/// kept as-is and logged at debug level.
pub fn render(template: &str, context: &TemplateContext) -> String {
    TEMPLATE_VAR_REGEX
        .replace_all(template, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match context.get(var_name) {
                Some(value) => value.to_string(),
                None => {
                    tracing::debug!(
                        "Template variable not found, keeping as-is: {{{{{}}}}}",
                        var_name
                    );
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> TemplateContext {
        TemplateContext::new()
            .with("firstName", "Dana")
            .with("companyName", "Acme Health")
            .with("industry", "healthcare")
    }

    #[test]
    fn test_render_simple_variable() {
        let ctx = test_context();
        assert_eq!(render("Hi {{firstName}},", &ctx), "Hi Dana,");
    }

    #[test]
    fn test_render_multiple_variables() {
        let ctx = test_context();
        assert_eq!(
            render("{{firstName}} at {{companyName}} ({{industry}})", &ctx),
            "Dana at Acme Health (healthcare)"
        );
    }

    #[test]
    fn test_render_repeated_variable() {
        let ctx = test_context();
        assert_eq!(
            render("{{firstName}} {{firstName}}", &ctx),
            "Dana Dana"
        );
    }

    #[test]
    fn test_render_unknown_variable_kept() {
        let ctx = test_context();
        assert_eq!(render("link: {{toolLink}}", &ctx), "link: {{toolLink}}");
    }

    #[test]
    fn test_render_empty_template() {
        assert_eq!(render("", &test_context()), "");
    }

    #[test]
    fn test_render_no_variables() {
        assert_eq!(render("Plain text", &test_context()), "Plain text");
    }

    #[test]
    fn test_render_malformed_braces_untouched() {
        let ctx = test_context();
        assert_eq!(render("{firstName} {{first name}}", &ctx), "{firstName} {{first name}}");
    }

    #[test]
    fn test_with_overwrites_previous_binding() {
        let ctx = TemplateContext::new()
            .with("senderName", "Your Name")
            .with("senderName", "Jordan");
        assert_eq!(render("Best,\n{{senderName}}", &ctx), "Best,\nJordan");
    }
}
