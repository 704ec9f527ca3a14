//! HTML page template with four placeholders.
//!
//! `{{icon}}`, `{{script}}`, `{{stylesheet}}` and `{{body}}` are replaced
//! in a single pass, so inserted text is never scanned again.

use std::sync::OnceLock;

use regex::{Captures, Regex};

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{{icon}}
<style>
{{stylesheet}}
</style>
</head>
<body>
{{body}}
<script>
{{script}}
</script>
</body>
</html>
"#;

pub const DEFAULT_STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; }
.card { border: 1px solid #ccc; border-radius: 4px; margin: 1rem 0; padding: 1rem; }
.header, .relations { display: flex; gap: 1rem; }
.column { flex: 1; }
.space { float: right; width: 2rem; }
.space.empty { background: #eee; }
.tier-must { border-left: 4px solid #c0392b; }
.tier-should { border-left: 4px solid #e67e22; }
.tier-may { border-left: 4px solid #f1c40f; }
.tier-wont { border-left: 4px solid #7f8c8d; }
.tier-none { border-left: 4px solid #27ae60; }
.label { font-weight: bold; margin-right: 0.5rem; }
";

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{(icon|script|stylesheet|body)\}\}").expect("Invalid placeholder regex")
    })
}

/// Page pieces besides the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParts {
    /// Markup for the page icon, e.g. a `<link rel="icon">` element.
    pub icon: String,
    pub script: String,
    pub stylesheet: String,
}

impl TemplateParts {
    /// The built-in stylesheet and nothing else.
    pub fn builtin() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn render(&self, parts: &TemplateParts, body: &str) -> String {
        placeholder_regex()
            .replace_all(&self.text, |captures: &Captures<'_>| match &captures[1] {
                "icon" => parts.icon.clone(),
                "script" => parts.script.clone(),
                "stylesheet" => parts.stylesheet.clone(),
                _ => body.to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_every_placeholder_once() {
        let template = Template::new("{{icon}}|{{script}}|{{stylesheet}}|{{body}}|{{body}}|{{other}}");
        let parts = TemplateParts {
            icon: "I".into(),
            script: "{{body}}".into(),
            stylesheet: "S".into(),
        };
        assert_eq!(
            template.render(&parts, "B"),
            "I|{{body}}|S|B|B|{{other}}"
        );
    }

    #[test]
    fn default_template_wraps_body() {
        let page = Template::default().render(&TemplateParts::builtin(), "<p>hi</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<body>\n<p>hi</p>\n<script>"));
        assert!(page.contains(".tier-must"));
        assert!(!page.contains("{{"));
    }
}
