//! Indented text builder for nested markup.
//!
//! The builder keeps an explicit tree of lines and scopes plus a stack of
//! the scopes that are still open. Every call operates on the deepest open
//! scope, so callers never track indentation themselves.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Line(String),
    Scope(Vec<Node>),
}

#[derive(Debug)]
pub struct MarkupBuilder {
    indent: usize,
    /// `stack[0]` is the root; the last entry has focus.
    stack: Vec<Vec<Node>>,
}

impl MarkupBuilder {
    /// A builder indenting each nesting level by `indent` spaces.
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            stack: vec![Vec::new()],
        }
    }

    /// Number of scopes open below the root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn focus(&mut self) -> &mut Vec<Node> {
        // The root is never popped
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Add a full line at the current depth.
    pub fn add(&mut self, line: impl Into<String>) -> &mut Self {
        self.focus().push(Node::Line(line.into()));
        self
    }

    /// Extend the most recent line of the focused scope, looking into
    /// trailing closed scopes. Starts a new line when there is none.
    pub fn append(&mut self, text: &str) -> &mut Self {
        match last_line(self.focus()) {
            Some(line) => line.push_str(text),
            None => {
                self.add(text);
            }
        }
        self
    }

    /// Open a child scope one level deeper and focus it.
    pub fn open(&mut self) -> &mut Self {
        self.stack.push(Vec::new());
        self
    }

    /// Close the deepest open scope. Closing at the root does nothing.
    pub fn close(&mut self) -> &mut Self {
        if self.stack.len() > 1
            && let Some(children) = self.stack.pop()
        {
            self.focus().push(Node::Scope(children));
        }
        self
    }

    fn close_to(&mut self, depth: usize) {
        while self.depth() > depth {
            self.close();
        }
    }

    /// `prefix`, then `body` one level deeper, then `suffix`.
    ///
    /// Scopes `body` leaves open are closed before `suffix` is written.
    pub fn group(
        &mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.add(prefix);
        let depth = self.depth();
        self.open();
        body(self);
        self.close_to(depth);
        self.add(suffix)
    }

    /// [`group`](Self::group) for bodies that can fail. Nesting is restored
    /// before the error is returned.
    pub fn try_group<E>(
        &mut self,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        body: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E> {
        self.add(prefix);
        let depth = self.depth();
        self.open();
        let result = body(self);
        self.close_to(depth);
        result?;
        self.add(suffix);
        Ok(())
    }

    /// Close everything and render depth-first, one line per `\n`.
    pub fn finish(mut self) -> String {
        self.close_to(0);
        let mut out = String::new();
        let root = self.stack.pop().unwrap_or_default();
        write_nodes(&mut out, &root, 0, self.indent);
        out
    }
}

fn last_line(nodes: &mut [Node]) -> Option<&mut String> {
    match nodes.last_mut()? {
        Node::Line(line) => Some(line),
        Node::Scope(children) => last_line(children),
    }
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize, indent: usize) {
    for node in nodes {
        match node {
            Node::Line(line) => {
                out.extend(std::iter::repeat_n(' ', depth * indent));
                out.push_str(line);
                out.push('\n');
            }
            Node::Scope(children) => write_nodes(out, children, depth + 1, indent),
        }
    }
}
