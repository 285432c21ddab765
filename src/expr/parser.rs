use super::ExprError;
use super::lexer::{Token, tokenize};
use super::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Bare identifier: a state root such as `party` or `switches`.
    Name(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Member {
        target: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        key: Box<Expr>,
    },
}

/// Deepest bracket / prefix-operator nesting accepted.
pub const MAX_DEPTH: usize = 64;
/// Longest condition accepted, in tokens. Bounds the depth of operator
/// chains, which parse iteratively but nest in the tree.
pub const MAX_TOKENS: usize = 1024;

/// Parse a full condition.
pub fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    if tokens.len() > MAX_TOKENS {
        return Err(ExprError::TooLong(MAX_TOKENS));
    }
    let mut parser = Parser { tokens, pos: 0, depth: 0 };
    let expr = parser.or_expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(ExprError::UnexpectedToken {
            expected: "end of expression",
            found: tok.describe(),
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(s)) if s == word) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ExprError> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(ExprError::UnexpectedToken { expected: what, found: tok.describe() }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    /// Run a recursive rule one nesting level down.
    fn nested(&mut self, rule: fn(&mut Self) -> Result<Expr, ExprError>) -> Result<Expr, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let expr = rule(self);
        self.depth -= 1;
        expr
    }

    fn or_expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::OrOr) || self.eat_keyword("or") {
            let rhs = self.and_expr()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.not_expr()?;
        while self.eat(&Token::AndAnd) || self.eat_keyword("and") {
            let rhs = self.not_expr()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ExprError> {
        if self.eat_keyword("not") {
            let inner = self.nested(Self::not_expr)?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ExprError> {
        let lhs = self.additive()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.additive()?;
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn additive(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn multiplicative(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&Token::Bang) {
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.nested(Self::unary)?)));
        }
        if self.eat(&Token::Minus) {
            return Ok(Expr::Unary(UnaryOp::Neg, Box::new(self.nested(Self::unary)?)));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat(&Token::Dot) {
                let name = match self.advance() {
                    Some(Token::Ident(name)) => name,
                    Some(tok) => {
                        return Err(ExprError::UnexpectedToken { expected: "member name", found: tok.describe() });
                    }
                    None => return Err(ExprError::UnexpectedEnd),
                };
                let args = if self.eat(&Token::LParen) { self.arguments()? } else { Vec::new() };
                expr = Expr::Member { target: Box::new(expr), name, args };
            } else if self.eat(&Token::LBracket) {
                let key = self.nested(Self::or_expr)?;
                self.expect(Token::RBracket, "]")?;
                expr = Expr::Index { target: Box::new(expr), key: Box::new(key) };
            } else {
                return Ok(expr);
            }
        }
    }

    fn arguments(&mut self) -> Result<Vec<Expr>, ExprError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.nested(Self::or_expr)?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen, ")")?;
            return Ok(args);
        }
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::Ident(name)) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "nil" => Expr::Literal(Value::Nil),
                _ => Expr::Name(name),
            }),
            Some(Token::LParen) => {
                let inner = self.nested(Self::or_expr)?;
                self.expect(Token::RParen, ")")?;
                Ok(inner)
            }
            Some(tok) => Err(ExprError::UnexpectedToken { expected: "a value", found: tok.describe() }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Box<Expr> {
        Box::new(Expr::Name(s.into()))
    }

    #[test]
    fn precedence_mul_over_add_over_cmp_over_and() {
        let e = parse("a + 2 * 3 > 4 && b").unwrap();
        let Expr::Binary(BinaryOp::And, lhs, rhs) = e else { panic!("expected and") };
        assert_eq!(rhs, name("b"));
        let Expr::Binary(BinaryOp::Gt, sum, _) = *lhs else { panic!("expected >") };
        let Expr::Binary(BinaryOp::Add, _, product) = *sum else { panic!("expected +") };
        assert!(matches!(*product, Expr::Binary(BinaryOp::Mul, _, _)));
    }

    #[test]
    fn member_calls_and_indexing_chain() {
        let e = parse("actors[1].skills.include?(3)").unwrap();
        let Expr::Member { target, name: method, args } = e else { panic!("expected call") };
        assert_eq!(method, "include?");
        assert_eq!(args, vec![Expr::Literal(Value::Int(3))]);
        let Expr::Member { target: inner, name: field, args } = *target else { panic!("expected member") };
        assert_eq!(field, "skills");
        assert!(args.is_empty());
        assert!(matches!(*inner, Expr::Index { .. }));
    }

    #[test]
    fn keywords_and_literals() {
        assert_eq!(
            parse("not true or nil").unwrap(),
            Expr::Binary(
                BinaryOp::Or,
                Box::new(Expr::Unary(UnaryOp::Not, Box::new(Expr::Literal(Value::Bool(true))))),
                Box::new(Expr::Literal(Value::Nil)),
            )
        );
    }

    #[test]
    fn errors_are_reported() {
        assert!(matches!(parse("1 +"), Err(ExprError::UnexpectedEnd)));
        assert!(matches!(parse("(1"), Err(ExprError::UnexpectedEnd)));
        assert!(matches!(parse("1 2"), Err(ExprError::UnexpectedToken { .. })));
        assert!(matches!(parse("a.5"), Err(ExprError::UnexpectedToken { expected: "member name", .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&ok).is_ok());

        let deep = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(parse(&deep), Err(ExprError::TooLong(_))));
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&deep), Err(ExprError::TooDeep(MAX_DEPTH))));
        assert!(matches!(parse(&format!("{}true", "!".repeat(200))), Err(ExprError::TooDeep(_))));
        assert!(matches!(parse(&format!("{}true", "not ".repeat(200))), Err(ExprError::TooDeep(_))));
        let chain = vec!["1"; 2000].join(" + ");
        assert!(matches!(parse(&chain), Err(ExprError::TooLong(MAX_TOKENS))));
    }
}
