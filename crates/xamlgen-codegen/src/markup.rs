//! XAML element tree.
//!
//! Views are built as element trees and rendered to a [`Fragment`], so
//! every emitted document is well-formed regardless of which controls
//! the profile and config select.

use crate::fragment::{Fragment, FragmentKind};

/// A XAML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn attr_opt(self, attribute: Option<(&str, &str)>) -> Self {
        match attribute {
            Some((name, value)) => self.attr(name, value),
            None => self,
        }
    }

    pub fn attrs(mut self, attributes: &[(&str, &str)]) -> Self {
        for (name, value) in attributes {
            self.attributes.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }

    /// Render the element tree; childless elements self-close.
    pub fn render(&self) -> Fragment {
        let mut fragment = Fragment::new(FragmentKind::Markup);
        self.render_into(&mut fragment, 0);
        fragment
    }

    fn render_into(&self, out: &mut Fragment, depth: usize) {
        let indent = "    ".repeat(depth);
        let attrs: String = self
            .attributes
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attribute(value)))
            .collect();

        if self.children.is_empty() {
            out.push(format!("{}<{}{} />", indent, self.name, attrs));
            return;
        }

        out.push(format!("{}<{}{}>", indent, self.name, attrs));
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
        out.push(format!("{}</{}>", indent, self.name));
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}
