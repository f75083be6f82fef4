use std::collections::BTreeSet;
use crate::error::SyntaxError;

/// A compiled tag expression.
///
/// `a.b.c` nests one [`Expr::Dot`] per accessor, left to right, so the
/// runtime resolver only ever sees a single step. `x | f | g` nests
/// [`Expr::Filter`] applications outwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Expr {
    Var(String),
    Dot(Box<Expr>, String),
    Filter(String, Box<Expr>),
}

/// Compile one expression, recording every referenced context variable and
/// filter name into `all_vars`.
///
/// Pipes split before dots: only the first pipe stage is compiled
/// recursively, later stages must be bare filter identifiers. Dotted
/// accessor names after the first segment are not identifier-checked; they
/// become runtime lookup keys as written.
pub(crate) fn compile(
    expr: &str, all_vars: &mut BTreeSet<String>
) -> Result<Expr, SyntaxError> {
    if expr.contains('|') {
        let mut stages = expr.split('|').map(str::trim);
        let mut code = compile(stages.next().unwrap_or(""), all_vars)?;
        for name in stages {
            variable(name, all_vars)?;
            code = Expr::Filter(name.to_owned(), Box::new(code));
        }
        Ok(code)
    } else if expr.contains('.') {
        let mut segments = expr.split('.');
        let mut code = compile(segments.next().unwrap_or(""), all_vars)?;
        for accessor in segments {
            code = Expr::Dot(Box::new(code), accessor.to_owned());
        }
        Ok(code)
    } else {
        variable(expr, all_vars)?;
        Ok(Expr::Var(expr.to_owned()))
    }
}

/// Check `name` against `[A-Za-z_][A-Za-z0-9_]*` and record it.
pub(crate) fn variable(
    name: &str, var_set: &mut BTreeSet<String>
) -> Result<(), SyntaxError> {
    let mut chars = name.chars();
    let valid = matches!(
        chars.next(),
        Some(c) if c.is_ascii_alphabetic() || c == '_'
    ) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(SyntaxError::InvalidName { name: name.to_owned() });
    }
    var_set.insert(name.to_owned());
    Ok(())
}
