// The output line buffer.
//
// Every other part of the printer writes through this type rather than
// building a `String` directly, so that indentation, inline-mode flattening,
// and speculative rendering (via `capture`) are all centralized here.

pub struct LineBuffer {
    lines: Vec<String>,
    pub string_line_count: usize,
    pub inline_mode: bool,
    pub indent_level: usize,
    indent_width: usize,
}

/// State saved and restored around a scoped operation (`capture`).
struct Snapshot {
    lines: Vec<String>,
    string_line_count: usize,
    inline_mode: bool,
}

impl LineBuffer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            string_line_count: 0,
            inline_mode: false,
            indent_level: 0,
            indent_width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line_len(&self) -> usize {
        self.lines.last().map_or(0, |l| l.chars().count())
    }

    /// Concatenates `text` onto the last buffer line, starting the first
    /// line if the buffer is empty. Never implies a newline.
    pub fn append_to_last(&mut self, text: &str) {
        if let Some(last) = self.lines.last_mut() {
            last.push_str(text);
        } else {
            self.lines.push(text.to_string());
        }
    }

    /// Appends `line` as a new buffer entry, unindented.
    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.string_line_count += line.matches('\n').count();
        self.lines.push(line);
    }

    /// Appends `line` as a new buffer entry, prefixed with the current
    /// indentation — unless `line` is blank, in which case it is pushed
    /// unindented (no trailing whitespace on blank lines).
    pub fn push_with_indent(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.push(line.to_string());
        } else {
            self.push(format!("{}{}", self.indent(), line));
        }
    }

    pub fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.indent_width)
    }

    /// Runs `f` against a fresh, empty buffer and returns what it produced,
    /// restoring this buffer's `lines`, `string_line_count`, and
    /// `inline_mode` unconditionally on return. `indent_level` is left alone
    /// — captured content is rendered at whatever indent the caller set up
    /// beforehand, since capture is about swapping the destination, not the
    /// depth.
    pub fn capture(&mut self, f: impl FnOnce(&mut Self)) -> Vec<String> {
        let saved = Snapshot {
            lines: std::mem::take(&mut self.lines),
            string_line_count: self.string_line_count,
            inline_mode: self.inline_mode,
        };
        self.string_line_count = 0;
        f(self);
        let captured = std::mem::replace(&mut self.lines, saved.lines);
        self.string_line_count = saved.string_line_count;
        self.inline_mode = saved.inline_mode;
        captured
    }

    pub fn with_indent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent_level += 1;
        let result = f(self);
        self.indent_level -= 1;
        result
    }

    pub fn with_inline_mode<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.inline_mode;
        self.inline_mode = true;
        let result = f(self);
        self.inline_mode = previous;
        result
    }

    /// Runs `f` and reports whether it produced more than one output line —
    /// either by pushing more than one buffer entry, or by pushing a single
    /// entry that itself contains an embedded newline (a verbatim multi-line
    /// blob). Looks only at entries added during `f`, so it's unaffected by
    /// however much content already sits in the buffer from earlier siblings.
    pub fn track_boundary(&mut self, f: impl FnOnce(&mut Self)) -> bool {
        let before = self.lines.len();
        f(self);
        let added = &self.lines[before..];
        added.len() > 1 || added.iter().any(|l| l.contains('\n'))
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Swaps out the current line vector for an empty one, returning what
    /// was there. Paired with [`Self::restore_lines`] to implement `capture`
    /// at the `Printer` level, where the captured block needs `&mut Printer`
    /// (not just `&mut LineBuffer`) to recurse through the visitor.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Restores a previously-taken line vector, returning whatever had
    /// accumulated in its place.
    pub fn restore_lines(&mut self, previous: Vec<String>) -> Vec<String> {
        std::mem::replace(&mut self.lines, previous)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn join(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_to_last_starts_first_line_when_empty() {
        let mut buf = LineBuffer::new(2);
        buf.append_to_last("hello");
        assert_eq!(buf.join(), "hello");
    }

    #[test]
    fn append_to_last_concatenates_onto_existing_line() {
        let mut buf = LineBuffer::new(2);
        buf.push("hello".to_string());
        buf.append_to_last(", world");
        assert_eq!(buf.join(), "hello, world");
    }

    #[test]
    fn push_with_indent_indents_non_blank_lines() {
        let mut buf = LineBuffer::new(2);
        buf.with_indent(|b| b.push_with_indent("child"));
        assert_eq!(buf.join(), "  child");
    }

    #[test]
    fn push_with_indent_leaves_blank_lines_unindented() {
        let mut buf = LineBuffer::new(2);
        buf.with_indent(|b| b.push_with_indent(""));
        assert_eq!(buf.join(), "");
    }

    #[test]
    fn capture_restores_outer_buffer() {
        let mut buf = LineBuffer::new(2);
        buf.push("outer".to_string());
        let captured = buf.capture(|b| {
            b.push("inner".to_string());
        });
        assert_eq!(captured, vec!["inner".to_string()]);
        assert_eq!(buf.join(), "outer");
    }

    #[test]
    fn nested_capture_is_supported() {
        let mut buf = LineBuffer::new(2);
        let outer_captured = buf.capture(|b| {
            b.push("a".to_string());
            let inner_captured = b.capture(|b2| {
                b2.push("b".to_string());
            });
            assert_eq!(inner_captured, vec!["b".to_string()]);
            b.push("c".to_string());
        });
        assert_eq!(outer_captured, vec!["a".to_string(), "c".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn with_indent_restores_on_exit() {
        let mut buf = LineBuffer::new(2);
        buf.with_indent(|b| {
            assert_eq!(b.indent_level, 1);
        });
        assert_eq!(buf.indent_level, 0);
    }

    #[test]
    fn with_inline_mode_restores_previous_value() {
        let mut buf = LineBuffer::new(2);
        buf.inline_mode = false;
        buf.with_inline_mode(|b| {
            assert!(b.inline_mode);
        });
        assert!(!buf.inline_mode);
    }

    #[test]
    fn track_boundary_detects_multiple_pushes() {
        let mut buf = LineBuffer::new(2);
        buf.push("sibling".to_string());
        let multiline = buf.track_boundary(|b| {
            b.push("a".to_string());
            b.push("b".to_string());
        });
        assert!(multiline);
    }

    #[test]
    fn track_boundary_false_for_single_push() {
        let mut buf = LineBuffer::new(2);
        buf.push("sibling".to_string());
        let multiline = buf.track_boundary(|b| {
            b.push("only-one".to_string());
        });
        assert!(!multiline);
    }

    #[test]
    fn track_boundary_true_for_embedded_newline() {
        let mut buf = LineBuffer::new(2);
        let multiline = buf.track_boundary(|b| {
            b.push("line one\nline two".to_string());
        });
        assert!(multiline);
    }
}
