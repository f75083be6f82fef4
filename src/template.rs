use std::collections::BTreeSet;
use crate::builder::CodeBuilder;
use crate::context::Context;
use crate::error::{RenderError, SyntaxError};
use crate::expr;
use crate::program::{Op, Output, Program};
use crate::reader::{Reader, Token};

/// A compiled template.
///
/// Compilation happens once, in [`Template::from`] or
/// [`Template::with_context`]; the resulting render routine and base
/// context are immutable and every render call gets a fresh frame, so one
/// instance can render any number of times.
pub struct Template {
    program: Program,
    base: Context,
}

impl Template {
    pub fn from(text: &str) -> Result<Self, SyntaxError> {
        Template::with_context(text, &[])
    }

    /// Compile `text` with initial contexts merged left-to-right into the
    /// stored base context (later contexts override earlier ones).
    pub fn with_context(
        text: &str, contexts: &[Context]
    ) -> Result<Self, SyntaxError> {
        let mut base = Context::new();
        for context in contexts {
            base.merge(context);
        }
        let program = compile(text)?;
        Ok(Template { program, base })
    }

    /// Render against the base context alone.
    pub fn render(&self) -> Result<String, RenderError> {
        self.program.run(&self.base)
    }

    /// Render with `overrides` merged over the base context for this call.
    pub fn render_with(&self, overrides: &Context) -> Result<String, RenderError> {
        let mut merged = self.base.clone();
        merged.merge(overrides);
        self.program.run(&merged)
    }
}


#[derive(Clone, Copy, PartialEq, Debug)]
enum BlockKind {
    If,
    For,
}

impl BlockKind {
    fn name(&self) -> &'static str {
        match self {
            BlockKind::If => "if",
            BlockKind::For => "for",
        }
    }
}

/// Drive the reader over `text` and generate the render routine.
///
/// Output-producing items are buffered and flushed as one emit op before
/// every statement tag and at end of input. A section reserved ahead of the
/// body receives the binding prologue once the full scan has discovered
/// which variables the template references.
fn compile(text: &str) -> Result<Program, SyntaxError> {
    let mut code = CodeBuilder::new();
    let vars_section = code.add_section();

    let mut all_vars = BTreeSet::new();
    let mut loop_vars = BTreeSet::new();
    let mut ops_stack: Vec<BlockKind> = Vec::new();
    let mut buffered: Vec<Output> = Vec::new();

    let mut reader = Reader::new(text);
    while let Some(token) = reader.pop_front() {
        match token {
            Token::Comment(_) => {},
            Token::Expression(inner) => {
                buffered.push(Output::Expr(expr::compile(inner, &mut all_vars)?));
            },
            Token::Statement(inner) => {
                flush_output(&mut buffered, &mut code);
                statement(
                    inner, &mut code, &mut ops_stack,
                    &mut all_vars, &mut loop_vars,
                )?;
            },
            Token::Text(text) => {
                if !text.is_empty() {
                    buffered.push(Output::Text(text.to_owned()));
                }
            },
        }
    }

    if let Some(kind) = ops_stack.last() {
        return Err(SyntaxError::UnclosedBlock { kind: kind.name().to_owned() });
    }
    flush_output(&mut buffered, &mut code);

    for name in all_vars.difference(&loop_vars) {
        vars_section.borrow_mut().add(Op::Bind(name.clone()));
    }

    Ok(Program::new(code.finish()))
}

/// Interpret one statement tag's inner text.
fn statement(
    inner: &str,
    code: &mut CodeBuilder,
    ops_stack: &mut Vec<BlockKind>,
    all_vars: &mut BTreeSet<String>,
    loop_vars: &mut BTreeSet<String>,
) -> Result<(), SyntaxError> {
    let words = inner.split_whitespace().collect::<Vec<_>>();
    match words.first().copied() {
        Some("if") => {
            if words.len() != 2 {
                return Err(SyntaxError::BadIf { tag: inner.to_owned() });
            }
            ops_stack.push(BlockKind::If);
            code.add(Op::If(expr::compile(words[1], all_vars)?));
            code.indent();
        },
        Some("for") => {
            if words.len() != 4 || words[2] != "in" {
                return Err(SyntaxError::BadFor { tag: inner.to_owned() });
            }
            ops_stack.push(BlockKind::For);
            expr::variable(words[1], loop_vars)?;
            code.add(Op::For(
                words[1].to_owned(),
                expr::compile(words[3], all_vars)?,
            ));
            code.indent();
        },
        Some(word) if word.starts_with("end") => {
            if words.len() != 1 {
                return Err(SyntaxError::BadEnd { tag: inner.to_owned() });
            }
            let end_what = &word[3..];
            let start_what = match ops_stack.pop() {
                Some(kind) => kind,
                None => return Err(SyntaxError::StrayEnd {
                    tag: inner.to_owned()
                }),
            };
            if start_what.name() != end_what {
                return Err(SyntaxError::MismatchedEnd {
                    expected: start_what.name().to_owned(),
                    found: end_what.to_owned(),
                });
            }
            code.add(Op::End);
            code.dedent();
        },
        _ => {
            return Err(SyntaxError::UnknownTag { tag: inner.to_owned() });
        },
    }
    Ok(())
}

/// Coalesce the buffered items into one emit op: a single item emits alone,
/// several emit as one combined op. Purely a render-call-count optimization,
/// not observable in the output.
fn flush_output(buffered: &mut Vec<Output>, code: &mut CodeBuilder) {
    match buffered.len() {
        0 => {},
        1 => {
            let item = buffered.remove(0);
            code.add(Op::Emit(item));
        },
        _ => {
            code.add(Op::EmitMany(std::mem::take(buffered)));
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Value;

    fn render(text: &str, context: Context) -> String {
        Template::from(text)
            .unwrap()
            .render_with(&context)
            .unwrap()
    }

    #[test]
    fn plain_text_passes_through() {
        let text = "no tags at all\nsecond line";
        assert_eq!(render(text, Context::new()), text);
    }

    #[test]
    fn substitutes_value() {
        let mut context = Context::new();
        context.set("x", Value::text("v"));
        assert_eq!(render("pre {{x}} post", context), "pre v post");
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut context = Context::new();
        context.set("x", Value::int(7));
        let template = Template::with_context("{{x}}!", &[context]).unwrap();
        assert_eq!(template.render().unwrap(), "7!");
        assert_eq!(template.render().unwrap(), "7!");
    }

    #[test]
    fn comments_leave_no_trace() {
        assert_eq!(render("a{# ignored #}b", Context::new()), "ab");
    }

    #[test]
    fn if_block_follows_truthiness() {
        let mut context = Context::new();
        context.set("ok", Value::bool(true));
        assert_eq!(render("{% if ok %}yes{% endif %}", context), "yes");

        let mut context = Context::new();
        context.set("ok", Value::text(""));
        assert_eq!(render("{% if ok %}yes{% endif %}", context), "");
    }

    #[test]
    fn for_block_preserves_surrounding_text() {
        let mut context = Context::new();
        context.set("topics", Value::sequence(vec![
            Value::text("A"),
            Value::text("B"),
        ]));
        assert_eq!(
            render("{% for t in topics %}<p>{{ t }}</p>{% endfor %}", context),
            "<p>A</p><p>B</p>"
        );
    }

    #[test]
    fn loop_variable_is_not_fetched_from_context() {
        // "t" is loop-bound, so its absence from the context is fine
        let mut context = Context::new();
        context.set("topics", Value::sequence(vec![Value::text("A")]));
        assert_eq!(render("{% for t in topics %}{{ t }}{% endfor %}", context), "A");
    }

    #[test]
    fn mismatched_end_tag() {
        assert_eq!(
            Template::from("{% if x %}...{% endfor %}").err(),
            Some(SyntaxError::MismatchedEnd {
                expected: "if".to_owned(),
                found: "for".to_owned(),
            })
        );
    }

    #[test]
    fn unclosed_block() {
        assert_eq!(
            Template::from("{% if x %}...").err(),
            Some(SyntaxError::UnclosedBlock { kind: "if".to_owned() })
        );
    }

    #[test]
    fn invalid_identifier_fails_at_construction() {
        assert_eq!(
            Template::from("{{ 1bad }}").err(),
            Some(SyntaxError::InvalidName { name: "1bad".to_owned() })
        );
    }

    #[test]
    fn render_overrides_base_context() {
        let mut base = Context::new();
        base.set("x", Value::int(1));
        let template = Template::with_context("{{x}}", &[base]).unwrap();
        let mut overrides = Context::new();
        overrides.set("x", Value::int(2));
        assert_eq!(template.render_with(&overrides).unwrap(), "2");
        // the base itself is untouched
        assert_eq!(template.render().unwrap(), "1");
    }
}
