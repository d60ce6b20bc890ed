//! Handlebars shells around generated C# members.

use crate::error::Result;
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;

/// C# documents rendered from a shell template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTemplate {
    /// Partial class behind a markup document, with its constructor.
    CodeBehind,
    /// Namespace wrapping prerendered class members.
    Source,
}

impl DocumentTemplate {
    pub const ALL: [DocumentTemplate; 2] = [DocumentTemplate::CodeBehind, DocumentTemplate::Source];

    fn name(self) -> &'static str {
        match self {
            DocumentTemplate::CodeBehind => "code_behind",
            DocumentTemplate::Source => "source",
        }
    }

    fn shell(self) -> &'static str {
        match self {
            DocumentTemplate::CodeBehind => {
                r#"{{usings}}

namespace {{namespace}}
{
    public partial class {{class_name}} : {{base_class}}
    {
        public {{class_name}}()
        {
{{indent body 12}}
        }
    }
}
"#
            }
            DocumentTemplate::Source => {
                r#"{{usings}}

namespace {{namespace}}
{
{{indent members 4}}
}
"#
            }
        }
    }
}

handlebars_helper!(indent: |text: str, width: u64| indent_lines(text, width as usize));

/// Indent every non-blank line; blank lines stay empty.
fn indent_lines(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the document shells. Output is C#, so nothing is escaped, and
/// a shell referencing a missing field fails instead of rendering blank.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl TemplateEngine<'_> {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_helper("indent", Box::new(indent));
        for template in DocumentTemplate::ALL {
            handlebars.register_template_string(template.name(), template.shell())?;
        }
        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, template: DocumentTemplate, data: &T) -> Result<String> {
        Ok(self.handlebars.render(template.name(), data)?)
    }
}

/// `using` lines, sorted and deduplicated.
pub fn using_block<'u>(namespaces: impl IntoIterator<Item = &'u str>) -> String {
    let mut namespaces: Vec<&str> = namespaces.into_iter().filter(|ns| !ns.is_empty()).collect();
    namespaces.sort_unstable();
    namespaces.dedup();
    namespaces
        .iter()
        .map(|ns| format!("using {};", ns))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodegenError;
    use serde_json::json;

    #[test]
    fn test_code_behind_shell() {
        let engine = TemplateEngine::new().unwrap();
        let text = engine
            .render(
                DocumentTemplate::CodeBehind,
                &json!({
                    "usings": "using System.Windows;",
                    "namespace": "Shop.Views",
                    "class_name": "ProductView",
                    "base_class": "Window",
                    "body": "InitializeComponent();\n\nDataContext = new ProductViewModel();",
                }),
            )
            .unwrap();
        assert!(text.starts_with("using System.Windows;\n\nnamespace Shop.Views\n{\n"));
        assert!(text.contains("    public partial class ProductView : Window\n"));
        assert!(text.contains("\n            InitializeComponent();\n\n"));
        assert!(text.contains("\n            DataContext = new ProductViewModel();\n"));
        assert!(text.ends_with("        }\n    }\n}\n"));
    }

    #[test]
    fn test_source_shell_keeps_generics() {
        let engine = TemplateEngine::new().unwrap();
        let text = engine
            .render(
                DocumentTemplate::Source,
                &json!({
                    "usings": "using System.Collections.ObjectModel;",
                    "namespace": "Shop.ViewModels",
                    "members": "public class A\n{\n    private ObservableCollection<Product> items = new();\n}",
                }),
            )
            .unwrap();
        assert!(text.contains("\n        private ObservableCollection<Product> items = new();\n"));
        assert!(text.ends_with("    }\n}\n"));
    }

    #[test]
    fn test_missing_field_fails() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine
            .render(DocumentTemplate::Source, &json!({ "usings": "", "namespace": "Shop" }))
            .unwrap_err();
        assert!(matches!(err, CodegenError::TemplateError(_)));
    }

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\n\n  b", 4), "    a\n\n      b");
    }

    #[test]
    fn test_using_block() {
        assert_eq!(
            using_block(["System.Linq", "System", "System.Linq", ""]),
            "using System;\nusing System.Linq;"
        );
    }
}
