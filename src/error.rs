use thiserror::Error;

/// Errors detected while compiling a template.
///
/// Construction either fully succeeds or fails with one of these; a failed
/// construction leaves no partially usable template behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// An `if` tag that is not exactly `if <expr>`.
    #[error("wrong format of if tag: {tag:?}")]
    BadIf { tag: String },

    /// A `for` tag that is not exactly `for <var> in <expr>`.
    #[error("wrong format of for tag: {tag:?}")]
    BadFor { tag: String },

    /// An `end` tag carrying extra words.
    #[error("wrong format of end tag: {tag:?}")]
    BadEnd { tag: String },

    /// An `end` tag with no open block to close.
    #[error("end tag does not match any open block: {tag:?}")]
    StrayEnd { tag: String },

    /// An `end` tag closing a different kind of block than the open one.
    #[error("mismatched end tag: got end{found}, expected end{expected}")]
    MismatchedEnd { expected: String, found: String },

    /// A statement tag with an unrecognized leading keyword.
    #[error("unknown tag: {tag:?}")]
    UnknownTag { tag: String },

    /// A variable, loop variable or filter name that is not an identifier.
    #[error("not a valid name: {name:?}")]
    InvalidName { name: String },

    /// Input ended while an `if` or `for` block was still open.
    #[error("unclosed {kind} block")]
    UnclosedBlock { kind: String },
}

/// Errors surfaced by `render`.
///
/// These are lookup failures against the supplied context, never retried or
/// recovered; a failed render produces no partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// A template variable missing from the merged context.
    #[error("variable not found in context: {name:?}")]
    MissingVariable { name: String },

    /// A loop variable referenced outside the loop that binds it.
    #[error("variable used before binding: {name:?}")]
    Unbound { name: String },

    /// Dot resolution failed on both lookup strategies.
    #[error("cannot resolve {name:?} on this value")]
    Lookup { name: String },

    /// A pipe target whose context value is not a filter.
    #[error("{name:?} is not a filter")]
    NotAFilter { name: String },

    /// A `for` loop over a value with no elements to iterate.
    #[error("value iterated for {name:?} is not iterable")]
    NotIterable { name: String },
}
