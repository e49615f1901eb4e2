//! Line sequences used to assemble generated source

/// An ordered run of source lines with relative indentation.
///
/// Generators return blocks instead of raw strings so that callers and tests can
/// inspect individual lines; indentation and joining happen once in [`Block::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append an empty line
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append a `/// <summary>` doc comment
    pub fn summary<S: AsRef<str>>(&mut self, text: &[S]) {
        self.push("/// <summary>");
        for line in text {
            self.push(format!("/// {}", line.as_ref()));
        }
        self.push("/// </summary>");
    }

    /// Append every line of another block, indented by `indent` spaces
    pub fn append_indented(&mut self, other: &Block, indent: usize) {
        let pad = " ".repeat(indent);
        for line in &other.lines {
            if line.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("{}{}", pad, line));
            }
        }
    }

    /// Append every line of another block unchanged
    pub fn append(&mut self, other: Block) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Check if any line, ignoring leading whitespace, equals `line`
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l.trim_start() == line)
    }

    /// Join lines with `\n`, each non-empty line prefixed by `indent` spaces
    pub fn render(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = String::new();
        for line in &self.lines {
            if !line.is_empty() {
                out.push_str(&pad);
                out.push_str(line);
            }
            out.push('\n');
        }
        out
    }
}

impl<S: Into<String>> FromIterator<S> for Block {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}
