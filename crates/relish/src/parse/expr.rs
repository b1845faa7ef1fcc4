use super::ast::{BoolOp, Node, Operand};
use super::lexer::{tokenize, Token};
use crate::path;
use relish_core::schema::{FieldTy, Model};
use relish_core::stmt::{BinaryOp, Expr, Value};
use relish_core::{Error, Result, Schema};

/// Given a python-like conditional statement, returns the equivalent list
/// of query conditions. Comparison operators (`==`, `!=`, `<`, `<=`, `>`,
/// `>=`) and boolean operators (`and`, `or`) are supported, arbitrarily
/// nested and parenthesized.
///
/// Joins required to reach dotted attribute paths are appended to the
/// top-level condition list in traversal order.
pub fn parse(expression: &str, model: &Model, schema: &Schema) -> Result<Vec<Expr>> {
    let nodes = Parser::new(tokenize(expression)?).parse_module()?;

    let mut visitor = Visitor {
        schema,
        model,
        query: Vec::new(),
        ops: Vec::new(),
    };

    for node in &nodes {
        visitor.visit(node)?;
    }

    // If we didn't obtain a query, it is likely that an unsupported
    // expression has been passed.
    if visitor.query.is_empty() {
        return Err(Error::parse(
            "only conditional statements with boolean (and, or) and comparison \
             operators are supported",
        ));
    }

    Ok(visitor.query)
}

/// Recursive-descent parser over the token stream.
///
/// ```text
/// module     ::= or_expr
/// or_expr    ::= and_expr ("or" and_expr)*
/// and_expr   ::= term ("and" term)*
/// term       ::= "(" or_expr ")" | call | comparison
/// comparison ::= path cmp operand
/// ```
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse_module(&mut self) -> Result<Vec<Node>> {
        if self.tokens.is_empty() {
            return Err(Error::parse("empty expression"));
        }

        let node = self.parse_or()?;

        if self.pos != self.tokens.len() {
            return Err(Error::parse("trailing input after expression"));
        }

        Ok(vec![node])
    }

    fn parse_or(&mut self) -> Result<Node> {
        let mut operands = vec![self.parse_and()?];

        while self.eat_keyword("or") {
            operands.push(self.parse_and()?);
        }

        Ok(if operands.len() == 1 {
            operands.pop().unwrap()
        } else {
            Node::Bool {
                op: BoolOp::Or,
                operands,
            }
        })
    }

    fn parse_and(&mut self) -> Result<Node> {
        let mut operands = vec![self.parse_term()?];

        while self.eat_keyword("and") {
            operands.push(self.parse_term()?);
        }

        Ok(if operands.len() == 1 {
            operands.pop().unwrap()
        } else {
            Node::Bool {
                op: BoolOp::And,
                operands,
            }
        })
    }

    fn parse_term(&mut self) -> Result<Node> {
        if self.eat(&Token::LParen) {
            let node = self.parse_or()?;
            if !self.eat(&Token::RParen) {
                return Err(Error::parse("expected closing parenthesis"));
            }
            return Ok(node);
        }

        let lhs = self.parse_operand()?;

        // A bare call is tolerated and ignored.
        if matches!(lhs, Operand::Name(_)) && self.check(&Token::LParen) {
            self.skip_call_args()?;
            return Ok(Node::Call);
        }

        let op = match self.next() {
            Some(Token::Compare(token)) => BinaryOp::from_token(token)
                .ok_or_else(|| Error::parse(format!("unsupported operator `{token}`")))?,
            _ => return Err(Error::parse("will only parse conditional statements")),
        };

        let path = match lhs {
            Operand::Name(path) => path,
            _ => {
                return Err(Error::parse(
                    "left-hand side of a comparison must be an attribute",
                ))
            }
        };

        let rhs = self.parse_operand()?;
        if matches!(rhs, Operand::Name(_)) && self.check(&Token::LParen) {
            return Err(Error::parse(
                "function calls are not allowed as comparison operands",
            ));
        }

        Ok(Node::Compare { path, op, rhs })
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        match self.next() {
            Some(Token::Ident(first)) => {
                let mut name = first;
                while self.eat(&Token::Dot) {
                    match self.next() {
                        Some(Token::Ident(part)) => {
                            name.push('.');
                            name.push_str(&part);
                        }
                        _ => return Err(Error::parse("expected attribute name after `.`")),
                    }
                }
                Ok(Operand::Name(name))
            }
            Some(Token::Int(v)) => Ok(Operand::Int(v)),
            Some(Token::Float(v)) => Ok(Operand::Float(v)),
            Some(Token::Str(v)) => Ok(Operand::Str(v)),
            _ => Err(Error::parse("will only parse conditional statements")),
        }
    }

    /// Consumes a call's argument list, parens balanced. The arguments have
    /// no effect.
    fn skip_call_args(&mut self) -> Result<()> {
        debug_assert!(self.check(&Token::LParen));
        let mut depth = 0usize;

        while let Some(token) = self.next() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(Error::parse("unterminated function call"))
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        self.tokens.get(self.pos) == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.tokens.get(self.pos) {
            Some(Token::Ident(ident)) if ident == keyword => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}

struct Frame {
    op: BoolOp,
    args: Vec<Expr>,
}

/// Walks the tree, maintaining a stack of in-progress boolean-operator
/// frames. Leaf comparisons land in the innermost open frame, or directly
/// in the top-level query when no frame is active. Joins always land in the
/// top-level query.
struct Visitor<'a> {
    schema: &'a Schema,
    model: &'a Model,
    query: Vec<Expr>,
    ops: Vec<Frame>,
}

impl Visitor<'_> {
    fn visit(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Call => Ok(()),
            Node::Compare { path, op, rhs } => self.visit_compare(path, *op, rhs),
            Node::Bool { op, operands } => self.visit_bool(*op, operands),
        }
    }

    fn visit_compare(&mut self, path: &str, op: BinaryOp, rhs: &Operand) -> Result<()> {
        let (field, joins) = path::resolve(self.schema, self.model, path)?;
        self.query.extend(joins);

        let left = match &field.ty {
            FieldTy::Scalar(_) => Expr::field(field.id),
            // Comparing a relation compares against the remote primary key;
            // the relation's joins must come along.
            FieldTy::BelongsTo(rel) => {
                let owner = self.schema.model(field.id.model);
                self.query.extend(rel.join_exprs(self.schema, owner));
                Expr::field(rel.remote_column(self.schema))
            }
            FieldTy::HasMany(rel) => {
                let owner = self.schema.model(field.id.model);
                self.query.extend(rel.join_exprs(self.schema, owner));
                Expr::field(rel.remote_column(self.schema))
            }
            FieldTy::AssociationProxy(proxy) => {
                let owner = self.schema.model(field.id.model);
                let has_many = proxy.has_many(self.schema);
                self.query.extend(has_many.join_exprs(self.schema, owner));
                Expr::field(proxy.target_field(self.schema)?.id)
            }
        };

        let value = self.literal(rhs);
        let condition = Expr::binary_op(left, op, value);

        match self.ops.last_mut() {
            Some(frame) => frame.args.push(condition),
            None => self.query.push(condition),
        }

        Ok(())
    }

    fn visit_bool(&mut self, op: BoolOp, operands: &[Node]) -> Result<()> {
        self.ops.push(Frame {
            op,
            args: Vec::new(),
        });

        for operand in operands {
            self.visit(operand)?;
        }

        let frame = self.ops.pop().expect("frame stack underflow");
        let combined = match frame.op {
            BoolOp::And => Expr::and_from_vec(frame.args),
            BoolOp::Or => Expr::or_from_vec(frame.args),
        };

        match self.ops.last_mut() {
            Some(outer) => outer.args.push(combined),
            None => self.query.push(combined),
        }

        Ok(())
    }

    /// Evaluates a right-hand operand to a literal. Bare names are string
    /// values (`None`/`null` excepted); quoted strings are probed as dates
    /// using the schema's date format before falling back to plain text.
    fn literal(&self, operand: &Operand) -> Value {
        match operand {
            Operand::Name(name) => {
                if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("null") {
                    Value::Null
                } else {
                    Value::String(name.clone())
                }
            }
            Operand::Int(v) => Value::I64(*v),
            Operand::Float(v) => Value::F64(*v),
            Operand::Str(v) => self
                .schema
                .str_to_date(v)
                .unwrap_or_else(|| Value::String(v.clone())),
        }
    }
}
