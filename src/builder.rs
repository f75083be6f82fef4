use std::cell::RefCell;
use std::rc::Rc;
use crate::program::Op;

/// A child builder embedded at its creation point but populated later.
///
/// The compiler reserves one before the template body and fills it with
/// variable-binding ops only after the whole body has been scanned.
pub(crate) type Section = Rc<RefCell<CodeBuilder>>;

/// Ordered accumulator of generated ops.
///
/// Tracks a nesting depth alongside the ops: block-opening ops raise it,
/// `End` lowers it, and finalization requires it back at the base level.
/// The depth does not change op meaning; it guards against a compiler bug
/// emitting an unbalanced program.
#[derive(Default)]
pub(crate) struct CodeBuilder {
    chunks: Vec<Chunk>,
    depth: usize,
}

enum Chunk {
    Op(Op),
    Section(Section),
}

impl CodeBuilder {
    pub(crate) fn new() -> Self {
        CodeBuilder::default()
    }

    pub(crate) fn add(&mut self, op: Op) {
        self.chunks.push(Chunk::Op(op));
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        debug_assert!(self.depth > 0, "dedent below base level");
        self.depth -= 1;
    }

    /// Reserve a forward-reference insertion point at the current position.
    pub(crate) fn add_section(&mut self) -> Section {
        let section = Rc::new(RefCell::new(CodeBuilder::new()));
        self.chunks.push(Chunk::Section(Rc::clone(&section)));
        section
    }

    /// Concatenate all ops depth-first, section content at its insertion
    /// point, into the final flat sequence.
    pub(crate) fn finish(self) -> Vec<Op> {
        debug_assert_eq!(self.depth, 0, "finish above base level");
        let mut ops = Vec::new();
        collect(self.chunks, &mut ops);
        ops
    }
}

fn collect(chunks: Vec<Chunk>, into: &mut Vec<Op>) {
    for chunk in chunks {
        match chunk {
            Chunk::Op(op) => into.push(op),
            Chunk::Section(section) => {
                let inner = section.replace(CodeBuilder::new());
                collect(inner.chunks, into);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Output;

    #[test]
    fn ops_keep_insertion_order() {
        let mut code = CodeBuilder::new();
        code.add(Op::Emit(Output::Text("a".to_owned())));
        code.add(Op::Emit(Output::Text("b".to_owned())));
        let ops = code.finish();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], Op::Emit(Output::Text(t)) if t == "a"));
    }

    #[test]
    fn section_content_appears_at_creation_point() {
        let mut code = CodeBuilder::new();
        let section = code.add_section();
        code.add(Op::Emit(Output::Text("body".to_owned())));
        // populated after the body was appended
        section.borrow_mut().add(Op::Bind("x".to_owned()));
        let ops = code.finish();
        assert!(matches!(&ops[0], Op::Bind(name) if name == "x"));
        assert!(matches!(&ops[1], Op::Emit(Output::Text(t)) if t == "body"));
    }

    #[test]
    fn empty_section_adds_nothing() {
        let mut code = CodeBuilder::new();
        let _section = code.add_section();
        code.add(Op::End);
        assert_eq!(code.finish().len(), 1);
    }
}
