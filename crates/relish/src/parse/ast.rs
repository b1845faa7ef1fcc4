use relish_core::stmt::BinaryOp;

/// Private abstract syntax tree of the restricted expression grammar. Only
/// boolean combinations of comparisons exist; anything else is rejected
/// before a tree is built.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Node {
    /// `path op operand`
    Compare {
        path: String,
        op: BinaryOp,
        rhs: Operand,
    },

    /// `a and b`, `a or b`, arbitrarily nested
    Bool { op: BoolOp, operands: Vec<Node> },

    /// A function call standing alone as a term. Parsed, then silently
    /// ignored: it contributes no condition.
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BoolOp {
    And,
    Or,
}

/// The right-hand side of a comparison before literal evaluation.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Operand {
    /// A bare or dotted name. Names evaluate as strings, except
    /// `None`/`null`, which evaluate as the null value.
    Name(String),

    Int(i64),

    Float(f64),

    /// A quoted string, probed for dates before falling back to text
    Str(String),
}
