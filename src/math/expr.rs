use thiserror::Error;

/// Maximum nesting depth accepted by the parser.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("function '{0}' needs a parenthesised argument")]
    MissingArgument(String),
    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unbound variable '{0}'")]
    Unbound(String),
    #[error("expression does not evaluate to a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Exp,
    Ln,
    Log,
    Abs,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "asin" => Some(Func::Asin),
            "acos" => Some(Func::Acos),
            "atan" => Some(Func::Atan),
            "sqrt" => Some(Func::Sqrt),
            "exp" => Some(Func::Exp),
            "ln" => Some(Func::Ln),
            "log" => Some(Func::Log),
            "abs" => Some(Func::Abs),
            _ => None,
        }
    }

    fn apply(self, arg: f64) -> f64 {
        match self {
            Func::Sin => arg.sin(),
            Func::Cos => arg.cos(),
            Func::Tan => arg.tan(),
            Func::Asin => arg.asin(),
            Func::Acos => arg.acos(),
            Func::Atan => arg.atan(),
            Func::Sqrt => arg.sqrt(),
            Func::Exp => arg.exp(),
            // log is the natural logarithm, as in most CAS conventions
            Func::Ln | Func::Log => arg.ln(),
            Func::Abs => arg.abs(),
        }
    }
}

fn constant(name: &str) -> Option<f64> {
    match name {
        "pi" | "π" => Some(std::f64::consts::PI),
        "E" => Some(std::f64::consts::E),
        _ => None,
    }
}

/// True for names the parser treats as functions or constants rather than
/// free variables.
pub fn is_reserved(name: &str) -> bool {
    Func::from_name(name).is_some() || constant(name).is_some()
}

/// Parsed algebraic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Func,
        arg: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate with no free variables bound.
    pub fn eval_constant(&self) -> Result<f64, EvalError> {
        self.eval(None)
    }

    /// Evaluate with `var` bound to `value`; any other free variable is an error.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, EvalError> {
        self.eval(Some((var, value)))
    }

    fn eval(&self, binding: Option<(&str, f64)>) -> Result<f64, EvalError> {
        let value = match self {
            Expr::Num(n) => *n,
            Expr::Var(name) => match binding {
                Some((var, value)) if var == name => value,
                _ => return Err(EvalError::Unbound(name.clone())),
            },
            Expr::Neg(inner) => -inner.eval(binding)?,
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(binding)?;
                let r = rhs.eval(binding)?;
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Expr::Call { func, arg } => func.apply(arg.eval(binding)?),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Sup(f64),
    Lt,
    Gt,
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    /// Whitespace preceded this token. Implicit multiplication is only
    /// recognised between adjacent tokens.
    spaced: bool,
}

fn superscript_digit(c: char) -> Option<u32> {
    match c {
        '⁰' => Some(0),
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        _ => None,
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut spaced = false;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            spaced = true;
            chars.next();
            continue;
        }

        let tok = if c.is_ascii_digit() || c == '.' {
            let mut text = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    text.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(text.clone()))?;
            Tok::Num(value)
        } else if c.is_alphabetic() {
            let mut name = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_alphabetic() || d.is_ascii_digit() || d == '_' {
                    name.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            Tok::Ident(name)
        } else if c == '⁻' || superscript_digit(c).is_some() {
            let negative = c == '⁻';
            if negative {
                chars.next();
            }
            let mut exponent: Option<f64> = None;
            while let Some(digit) = chars.peek().and_then(|&d| superscript_digit(d)) {
                exponent = Some(exponent.unwrap_or(0.0) * 10.0 + f64::from(digit));
                chars.next();
            }
            match exponent {
                Some(n) if negative => Tok::Sup(-n),
                Some(n) => Tok::Sup(n),
                None => return Err(ExprError::UnexpectedChar('⁻')),
            }
        } else {
            chars.next();
            match c {
                '+' => Tok::Plus,
                '-' | '−' => Tok::Minus,
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    Tok::Caret
                }
                '*' | '×' | '·' => Tok::Star,
                '/' | '÷' => Tok::Slash,
                '^' => Tok::Caret,
                '(' => Tok::LParen,
                ')' => Tok::RParen,
                '<' => Tok::Lt,
                '>' => Tok::Gt,
                other => return Err(ExprError::UnexpectedChar(other)),
            }
        };

        tokens.push(Token { tok, spaced });
        spaced = false;
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_tok(&self) -> Option<&Tok> {
        self.peek().map(|t| &t.tok)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|t| t.tok.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Tok) -> Result<(), ExprError> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            Some(_) => Err(ExprError::UnexpectedToken(self.pos - 1)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn finish(&self) -> Result<(), ExprError> {
        match self.peek_tok() {
            Some(_) => Err(ExprError::UnexpectedToken(self.pos)),
            None => Ok(()),
        }
    }

    // expr := term (("+" | "-") term)*
    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek_tok() {
                Some(Tok::Plus) => BinOp::Add,
                Some(Tok::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // term := unary (("*" | "/") unary | <adjacent> power)*
    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let implicit = matches!(
                self.peek(),
                Some(Token {
                    tok: Tok::Num(_) | Tok::Ident(_) | Tok::LParen,
                    spaced: false,
                })
            );
            if implicit {
                let rhs = self.power()?;
                lhs = Expr::binary(BinOp::Mul, lhs, rhs);
                continue;
            }
            let op = match self.peek_tok() {
                Some(Tok::Star) => BinOp::Mul,
                Some(Tok::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    // unary := ("-" | "+") unary | power
    fn unary(&mut self) -> Result<Expr, ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        let result = match self.peek_tok() {
            Some(Tok::Minus) => {
                self.pos += 1;
                self.unary().map(|e| Expr::Neg(Box::new(e)))
            }
            Some(Tok::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        };
        self.depth -= 1;
        result
    }

    // power := postfix ("^" unary)?
    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.postfix()?;
        if matches!(self.peek_tok(), Some(Tok::Caret)) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    // postfix := primary superscript*
    fn postfix(&mut self) -> Result<Expr, ExprError> {
        let mut expr = self.primary()?;
        while let Some(Tok::Sup(n)) = self.peek_tok() {
            let n = *n;
            self.pos += 1;
            expr = Expr::binary(BinOp::Pow, expr, Expr::Num(n));
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance() {
            Some(Tok::Num(n)) => Ok(Expr::Num(n)),
            Some(Tok::Ident(name)) => {
                if let Some(value) = constant(&name) {
                    return Ok(Expr::Num(value));
                }
                if let Some(func) = Func::from_name(&name) {
                    if !matches!(self.peek_tok(), Some(Tok::LParen)) {
                        return Err(ExprError::MissingArgument(name));
                    }
                    self.pos += 1;
                    let arg = self.expr()?;
                    self.expect(Tok::RParen)?;
                    return Ok(Expr::Call {
                        func,
                        arg: Box::new(arg),
                    });
                }
                Ok(Expr::Var(name))
            }
            Some(Tok::LParen) => {
                let inner = self.expr()?;
                self.expect(Tok::RParen)?;
                Ok(inner)
            }
            Some(_) => Err(ExprError::UnexpectedToken(self.pos - 1)),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

fn parser_for(input: &str) -> Result<Parser, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    Ok(Parser::new(tokens))
}

/// Parse a single algebraic expression.
///
/// Accepts numbers, identifiers, `+ - * / ^ **`, parentheses, implicit
/// multiplication between adjacent tokens (`2x`, `3(x+1)`), superscript
/// exponents (`x²`), the constants `pi`/`π`/`E` and the common elementary
/// functions.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let mut parser = parser_for(input)?;
    let expr = parser.expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Check that `input` is an expression, optionally compared with a second
/// one by a single `<` or `>`.
pub fn check_statement(input: &str) -> Result<(), ExprError> {
    let mut parser = parser_for(input)?;
    parser.expr()?;
    if matches!(parser.peek_tok(), Some(Tok::Lt | Tok::Gt)) {
        parser.pos += 1;
        parser.expr()?;
    }
    parser.finish()
}
