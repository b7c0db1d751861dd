use super::Indent;

/// Line-oriented writer that tracks the indentation level.
///
/// The `push_*` methods take `&mut self` so a builder can be threaded
/// through helper functions; the consuming methods chain.
///
/// ```
/// use pgdata_codegen::builder::CodeBuilder;
///
/// let code = CodeBuilder::rust()
///     .block_with_close("fn main() {", "}", |b| b.line("run();"))
///     .build();
///
/// assert_eq!(code, "fn main() {\n    run();\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// A builder with 4-space indentation.
    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    /// Add a line at the current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a `///` doc comment line.
    pub fn push_rust_doc(&mut self, text: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str("/// ");
        self.buffer.push_str(text);
        self.buffer.push('\n');
        self
    }

    /// Open a block with `header`, run `f` one level deeper, then close it.
    pub fn push_block<F>(&mut self, header: &str, close: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.push_line(header).push_indent();
        f(self);
        self.push_dedent().push_line(close)
    }

    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    pub fn blank(mut self) -> Self {
        self.push_blank();
        self
    }

    pub fn rust_doc(mut self, text: &str) -> Self {
        self.push_rust_doc(text);
        self
    }

    /// Add a block with a closing line.
    pub fn block_with_close<F>(mut self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_line(header).push_indent();
        let mut builder = f(self);
        builder.push_dedent().push_line(close);
        builder
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::rust()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_with_close() {
        let code = CodeBuilder::rust()
            .block_with_close("impl Foo {", "}", |b| b.line("fn bar(&self) {}"))
            .build();

        assert_eq!(code, "impl Foo {\n    fn bar(&self) {}\n}\n");
    }

    #[test]
    fn test_doc_and_blank() {
        let code = CodeBuilder::rust()
            .rust_doc("Row count")
            .line("const N: usize = 1;")
            .blank()
            .build();

        assert_eq!(code, "/// Row count\nconst N: usize = 1;\n\n");
    }

    #[test]
    fn test_each() {
        let code = CodeBuilder::rust()
            .block_with_close("pub enum Status {", "}", |b| {
                b.each(["Undefined", "Null", "Present"], |b, v| {
                    b.line(&format!("{},", v))
                })
            })
            .build();

        assert_eq!(
            code,
            "pub enum Status {\n    Undefined,\n    Null,\n    Present,\n}\n"
        );
    }

    #[test]
    fn test_push_block_nested() {
        let mut builder = CodeBuilder::rust();
        builder.push_block("fn f() {", "}", |b| {
            b.push_block("if x {", "}", |b| {
                b.push_line("y();");
            });
        });

        assert_eq!(builder.build(), "fn f() {\n    if x {\n        y();\n    }\n}\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut builder = CodeBuilder::rust();
        builder.push_dedent().push_line("x");
        assert_eq!(builder.as_str(), "x\n");
    }
}
