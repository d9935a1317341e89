use crate::lexer::token::TokenKind;
use std::fmt::{self, Display};

pub type Block = Vec<Statement>;
pub type Ident = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    Let(Ident, Expr),
    Return(Expr),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Ident(Ident),
    Literal(Literal),
    Prefix(Prefix, Box<Expr>),
    Infix(Infix, Box<Expr>, Box<Expr>),
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    Function {
        params: Vec<Ident>,
        body: Block,
    },
    Call {
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Prefix {
    Minus,
    Bang,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Infix {
    Plus,
    Minus,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
}

#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    /// Binding power of `kind` when it appears after a complete left operand.
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

impl TryFrom<TokenKind> for Prefix {
    type Error = TokenKind;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::Bang => Ok(Prefix::Bang),
            TokenKind::Minus => Ok(Prefix::Minus),
            other => Err(other),
        }
    }
}

impl TryFrom<TokenKind> for Infix {
    type Error = TokenKind;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::Plus => Ok(Infix::Plus),
            TokenKind::Minus => Ok(Infix::Minus),
            TokenKind::Asterisk => Ok(Infix::Multiply),
            TokenKind::Slash => Ok(Infix::Divide),
            TokenKind::Eq => Ok(Infix::Equal),
            TokenKind::NotEq => Ok(Infix::NotEqual),
            TokenKind::Gt => Ok(Infix::GreaterThan),
            TokenKind::Lt => Ok(Infix::LessThan),
            other => Err(other),
        }
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Minus => write!(f, "-"),
            Prefix::Bang => write!(f, "!"),
        }
    }
}

impl Display for Infix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infix::Plus => write!(f, "+"),
            Infix::Minus => write!(f, "-"),
            Infix::Multiply => write!(f, "*"),
            Infix::Divide => write!(f, "/"),
            Infix::Equal => write!(f, "=="),
            Infix::NotEqual => write!(f, "!="),
            Infix::GreaterThan => write!(f, ">"),
            Infix::LessThan => write!(f, "<"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, &self.statements)
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(name, value) => write!(f, "let {} = {};", name, value),
            Statement::Return(value) => write!(f, "return {};", value),
            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(int) => write!(f, "{}", int),
            Literal::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(ident) => write!(f, "{}", ident),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Prefix(operator, right) => write!(f, "({}{})", operator, right),
            Expr::Infix(operator, left, right) => write!(f, "({} {} {})", left, operator, right),
            Expr::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} ", condition)?;
                write_block(f, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, "else ")?;
                    write_block(f, alternative)?;
                }
                Ok(())
            }
            Expr::Function { params, body } => {
                write!(f, "fn({}) ", params.join(", "))?;
                write_block(f, body)
            }
            Expr::Call {
                function,
                arguments,
            } => write!(
                f,
                "{}({})",
                function,
                arguments
                    .iter()
                    .map(|arg| arg.to_string())
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &[Statement]) -> fmt::Result {
    block
        .iter()
        .try_for_each(|statement| write!(f, "{}", statement))
}
