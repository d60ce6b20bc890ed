//! Composable units of generated text.
//!
//! Every renderer returns a [`Fragment`]: a kind tag plus a list of lines
//! with indentation relative to the fragment itself. Assemblers place
//! fragments into documents with [`Fragment::append_indented`], so no
//! renderer needs to know how deeply it will end up nested.

const INDENT: &str = "    ";

/// What a fragment contributes to its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Markup elements.
    Markup,
    /// `using` directives.
    Using,
    /// Field declarations.
    Field,
    /// Property declarations.
    Property,
    /// Command declarations or initializers.
    Command,
    /// Constructor.
    Constructor,
    /// Method declaration.
    Method,
    /// Statements inside a method body.
    Body,
    /// A whole document.
    Document,
}

/// A unit of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: FragmentKind,
    lines: Vec<String>,
}

impl Fragment {
    pub fn new(kind: FragmentKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    /// Body fragment made of the given statements.
    pub fn body<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fragment = Self::new(FragmentKind::Body);
        for statement in statements {
            fragment.push(statement);
        }
        fragment
    }

    /// Builder form of [`push`](Self::push).
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.push(text);
        self
    }

    /// Append a line. Embedded newlines split into separate lines.
    pub fn push(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.contains('\n') {
            self.lines.extend(text.lines().map(str::to_string));
        } else {
            self.lines.push(text);
        }
    }

    pub fn push_blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append another fragment's lines at the same depth.
    pub fn append(&mut self, other: &Fragment) {
        self.lines.extend(other.lines.iter().cloned());
    }

    /// Append another fragment's lines, `depth` levels deeper.
    pub fn append_indented(&mut self, other: &Fragment, depth: usize) {
        let prefix = INDENT.repeat(depth);
        for line in &other.lines {
            if line.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("{}{}", prefix, line));
            }
        }
    }

    /// Append a `{ ... }` block whose contents are one level deeper.
    pub fn append_block(&mut self, header: impl Into<String>, contents: &Fragment) {
        self.push(header);
        self.push("{");
        self.append_indented(contents, 1);
        self.push("}");
    }

    /// Append fragments separated by single blank lines, skipping empty ones.
    pub fn append_separated<'f>(&mut self, fragments: impl IntoIterator<Item = &'f Fragment>, depth: usize) {
        let mut first = self.lines.is_empty();
        for fragment in fragments {
            if fragment.is_empty() {
                continue;
            }
            if !first {
                self.push_blank();
            }
            self.append_indented(fragment, depth);
            first = false;
        }
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joined text, newline-terminated.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
