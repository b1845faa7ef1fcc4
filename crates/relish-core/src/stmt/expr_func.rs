use super::Expr;

/// A function applied to expressions. The sort resolver uses this to wrap a
/// sort key in a zero-argument transformation (e.g. a case-insensitive
/// collation) before ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    /// Function name, passed through to the backend
    pub name: String,

    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args,
        }
        .into()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
