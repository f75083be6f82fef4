use std::collections::HashMap;
use crate::context::{resolve_dot, Context, Value};
use crate::error::RenderError;
use crate::expr::Expr;

/// One buffered output item: literal text or a compiled expression whose
/// value is coerced to text when emitted.
#[derive(Clone, Debug)]
pub(crate) enum Output {
    Text(String),
    Expr(Expr),
}

/// One instruction of a compiled render routine.
///
/// `If` and `For` open a block closed by the matching `End`; `Bind` fetches
/// a context variable into the local frame and belongs to the prologue
/// section emitted ahead of the body.
#[derive(Clone, Debug)]
pub(crate) enum Op {
    Emit(Output),
    EmitMany(Vec<Output>),
    Bind(String),
    If(Expr),
    For(String, Expr),
    End,
}

/// The compiled render routine: a flat op sequence walked recursively
/// against a per-call frame. Built once per template, immutable afterwards.
pub(crate) struct Program {
    ops: Vec<Op>,
}

impl Program {
    pub(crate) fn new(ops: Vec<Op>) -> Self {
        Program { ops }
    }

    pub(crate) fn run(&self, context: &Context) -> Result<String, RenderError> {
        let mut frame = Frame::new(context);
        let mut out = String::new();
        self.run_block(0, &mut frame, &mut out)?;
        Ok(out)
    }

    /// Execute ops from `pc` until the matching `End` (or end of program for
    /// the top level), returning the position after the block.
    fn run_block(
        &self, mut pc: usize, frame: &mut Frame, out: &mut String
    ) -> Result<usize, RenderError> {
        while pc < self.ops.len() {
            match &self.ops[pc] {
                Op::End => return Ok(pc + 1),
                Op::Emit(item) => {
                    out.push_str(&frame.output(item)?);
                    pc += 1;
                },
                Op::EmitMany(items) => {
                    for item in items {
                        out.push_str(&frame.output(item)?);
                    }
                    pc += 1;
                },
                Op::Bind(name) => {
                    frame.bind(name)?;
                    pc += 1;
                },
                Op::If(condition) => {
                    pc = if frame.eval(condition)?.is_truthy() {
                        self.run_block(pc + 1, frame, out)?
                    } else {
                        self.skip_block(pc + 1)
                    };
                },
                Op::For(var, iterable) => {
                    let items = frame.eval(iterable)?
                        .items()
                        .ok_or_else(|| RenderError::NotIterable {
                            name: var.clone()
                        })?;
                    let body = pc + 1;
                    pc = self.skip_block(body);
                    for item in items {
                        frame.set(var, item);
                        self.run_block(body, frame, out)?;
                    }
                },
            }
        }
        Ok(pc)
    }

    /// Position after the block opened just before `pc`.
    fn skip_block(&self, mut pc: usize) -> usize {
        let mut depth = 0;
        loop {
            match &self.ops[pc] {
                Op::If(_) | Op::For(..) => depth += 1,
                Op::End if depth == 0 => return pc + 1,
                Op::End => depth -= 1,
                _ => {}
            }
            pc += 1;
        }
    }
}


/// Per-render local state: the merged context plus the variables bound so
/// far (prologue binds and loop variables).
struct Frame<'a> {
    context: &'a Context,
    locals: HashMap<String, Value>,
}

impl<'a> Frame<'a> {
    fn new(context: &'a Context) -> Self {
        Frame {
            context,
            locals: HashMap::new(),
        }
    }

    /// Prologue binding: fetch one variable from the context. Fails up
    /// front if the context lacks it, even when the body branch using it
    /// is never taken.
    fn bind(&mut self, name: &str) -> Result<(), RenderError> {
        let value = self.context
            .get(name)
            .ok_or_else(|| RenderError::MissingVariable {
                name: name.to_owned()
            })?
            .clone();
        self.locals.insert(name.to_owned(), value);
        Ok(())
    }

    fn set(&mut self, name: &str, value: Value) {
        self.locals.insert(name.to_owned(), value);
    }

    fn eval(&self, expr: &Expr) -> Result<Value, RenderError> {
        match expr {
            Expr::Var(name) => self.locals
                .get(name)
                .cloned()
                .ok_or_else(|| RenderError::Unbound { name: name.clone() }),
            Expr::Dot(base, accessor) => {
                let value = self.eval(base)?;
                resolve_dot(&value, accessor)
            },
            Expr::Filter(name, arg) => {
                let target = self.locals
                    .get(name)
                    .ok_or_else(|| RenderError::Unbound { name: name.clone() })?;
                let arg = self.eval(arg)?;
                match target {
                    Value::Filter(fun) => Ok(fun(&arg)),
                    _ => Err(RenderError::NotAFilter { name: name.clone() }),
                }
            },
        }
    }

    fn output(&self, item: &Output) -> Result<String, RenderError> {
        match item {
            Output::Text(text) => Ok(text.clone()),
            Output::Expr(expr) => Ok(self.eval(expr)?.to_text()),
        }
    }
}
