//! Indented text output.

use alloc::string::String;

/// Append-only output buffer.
///
/// Fragments land in the buffer in emission order. A fragment emitted at
/// nesting depth `d` is indented by `d` units of `indent_width` spaces.
#[derive(Clone, Debug)]
pub(crate) struct Emitter {
    output: String,
    indent_width: usize,
}

impl Emitter {
    pub(crate) fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent_width,
        }
    }

    /// Append `fragment` as a full line at `depth`.
    pub(crate) fn emit(&mut self, fragment: &str, depth: usize) {
        for _ in 0..depth * self.indent_width {
            self.output.push(' ');
        }
        self.output.push_str(fragment);
        self.output.push('\n');
    }

    /// Append `fragment` with no indentation and no newline.
    pub(crate) fn emit_raw(&mut self, fragment: &str) {
        self.output.push_str(fragment);
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_maps_to_indentation() {
        let mut emitter = Emitter::new(4);
        emitter.emit_raw("(module\n");
        emitter.emit("(func $f", 1);
        emitter.emit("(nop)", 2);
        emitter.emit(")", 1);
        emitter.emit_raw(")");

        assert_eq!(
            emitter.finish(),
            "(module\n    (func $f\n        (nop)\n    )\n)"
        );
    }

    #[test]
    fn test_custom_width() {
        let mut emitter = Emitter::new(2);
        emitter.emit("x", 3);
        assert_eq!(emitter.finish(), "      x\n");
    }
}
