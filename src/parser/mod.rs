pub mod ast;
pub mod error;

use crate::{
    config::DEFAULT_MAX_DEPTH,
    lexer::token::{Token, TokenKind},
    parser::{
        ast::{Block, Expr, Ident, Infix, Literal, Precedence, Prefix, Program, Statement},
        error::ParseError,
    },
};
use std::{collections::HashMap, mem, vec};

type PrefixParseFn = fn(&mut Parser) -> Option<Expr>;
type InfixParseFn = fn(&mut Parser, Expr) -> Option<Expr>;

/// Pratt parser over a token stream.
///
/// Every parse function starts with `cur_token` on the first token it owns and
/// leaves `cur_token` on the last token it consumed. A function returning `None`
/// has already recorded why.
pub struct Parser {
    tokens: vec::IntoIter<Token>,

    cur_token: Token,
    peek_token: Token,

    errors: Vec<ParseError>,

    prefix_parse_fns: HashMap<TokenKind, PrefixParseFn>,
    infix_parse_fns: HashMap<TokenKind, InfixParseFn>,

    depth: usize,
    max_depth: usize,
    aborted: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_depth(tokens, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(tokens: Vec<Token>, max_depth: usize) -> Self {
        let mut parser = Self {
            tokens: tokens.into_iter(),
            cur_token: Token::eof(),
            peek_token: Token::eof(),
            errors: vec![],
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
            depth: 0,
            max_depth,
            aborted: false,
        };

        parser.register_prefix(TokenKind::Ident, Self::parse_identifier);
        parser.register_prefix(TokenKind::Int, Self::parse_integer_literal);
        parser.register_prefix(TokenKind::True, Self::parse_boolean);
        parser.register_prefix(TokenKind::False, Self::parse_boolean);
        parser.register_prefix(TokenKind::Bang, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::Minus, Self::parse_prefix_expression);
        parser.register_prefix(TokenKind::LParen, Self::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Self::parse_if_expression);
        parser.register_prefix(TokenKind::Function, Self::parse_function_literal);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
        ] {
            parser.register_infix(kind, Self::parse_infix_expression);
        }
        parser.register_infix(TokenKind::LParen, Self::parse_call_expression);

        parser.next_token();
        parser.next_token();

        parser
    }

    /// Parses a whole token stream, returning the best-effort tree together with
    /// every error in detection order. A non-empty error list means the tree must
    /// not be evaluated.
    pub fn parse(tokens: Vec<Token>) -> (Program, Vec<ParseError>) {
        let mut parser = Self::new(tokens);
        let program = parser.parse_program();

        (program, parser.errors)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while !self.cur_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Program { statements }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn register_prefix(&mut self, kind: TokenKind, prefix: PrefixParseFn) {
        self.prefix_parse_fns.insert(kind, prefix);
    }

    fn register_infix(&mut self, kind: TokenKind, infix: InfixParseFn) {
        self.infix_parse_fns.insert(kind, infix);
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.cur_token.text.clone();
        self.expect_peek(TokenKind::Assign)?;

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Let(name, value))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Return(value))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();

        Some(Statement::Expression(expr))
    }

    fn parse_block_statement(&mut self) -> Option<Block> {
        let mut statements = vec![];
        self.next_token();

        while !self.cur_token_is(TokenKind::RBrace) {
            if self.cur_token_is(TokenKind::Eof) {
                self.record(ParseError::UnexpectedToken {
                    expected: TokenKind::RBrace,
                    found: TokenKind::Eof,
                });
                return None;
            }

            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Some(statements)
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let depth = self.depth;
        let expr = self
            .descend()
            .and_then(|()| self.parse_expression_at(precedence));
        self.depth = depth;

        expr
    }

    fn parse_expression_at(&mut self, precedence: Precedence) -> Option<Expr> {
        let prefix = match self.prefix_parse_fns.get(&self.cur_token.kind) {
            Some(prefix) => *prefix,
            None => {
                self.record(ParseError::NoPrefixParseFn(self.cur_token.kind));
                return None;
            }
        };

        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek_token.kind) {
                Some(infix) => *infix,
                None => return Some(left),
            };

            // Each application wraps `left` in one more node.
            self.descend()?;
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Ident(self.cur_token.text.clone()))
    }

    fn parse_integer_literal(&mut self) -> Option<Expr> {
        match self.cur_token.text.parse::<i64>() {
            Ok(int) => Some(Expr::Literal(Literal::Int(int))),
            Err(_) => {
                self.record(ParseError::InvalidInteger(self.cur_token.text.clone()));
                None
            }
        }
    }

    fn parse_boolean(&mut self) -> Option<Expr> {
        Some(Expr::Literal(Literal::Bool(self.cur_token_is(TokenKind::True))))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let operator = Prefix::try_from(self.cur_token.kind).ok()?;

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expr::Prefix(operator, Box::new(right)))
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let operator = Infix::try_from(self.cur_token.kind).ok()?;
        let precedence = self.cur_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix(operator, Box::new(left), Box::new(right)))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expr::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_list(Self::parse_function_param)?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement()?;

        Some(Expr::Function { params, body })
    }

    fn parse_function_param(&mut self) -> Option<Ident> {
        self.expect_peek(TokenKind::Ident)?;

        Some(self.cur_token.text.clone())
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let arguments = self.parse_list(Self::parse_call_arg)?;

        Some(Expr::Call {
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_call_arg(&mut self) -> Option<Expr> {
        self.next_token();

        self.parse_expression(Precedence::Lowest)
    }

    /// Parses `item, item, ... )` with `cur_token` on the opening paren. Zero items
    /// are allowed, a trailing comma is not.
    fn parse_list<T>(&mut self, parse_item: fn(&mut Self) -> Option<T>) -> Option<Vec<T>> {
        let mut items = vec![];

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(items);
        }

        items.push(parse_item(self)?);
        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            items.push(parse_item(self)?);
        }

        self.expect_peek(TokenKind::RParen)?;

        Some(items)
    }
}

/// Token cursor helpers
impl Parser {
    fn next_token(&mut self) {
        let next = self.tokens.next().unwrap_or_else(Token::eof);
        self.cur_token = mem::replace(&mut self.peek_token, next);
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advances when the peek token is `kind`, otherwise records the mismatch.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            Some(())
        } else {
            self.record(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek_token.kind,
            });
            None
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.cur_token.kind)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.kind)
    }

    fn descend(&mut self) -> Option<()> {
        if self.depth >= self.max_depth {
            self.record(ParseError::TooDeeplyNested {
                limit: self.max_depth,
            });
            self.skip_to_end();
            return None;
        }

        self.depth += 1;
        Some(())
    }

    fn record(&mut self, error: ParseError) {
        if !self.aborted {
            self.errors.push(error);
        }
    }

    // Nesting overflow is fatal: drop the remaining input so every loop sees Eof.
    fn skip_to_end(&mut self) {
        self.aborted = true;
        self.tokens = Vec::new().into_iter();
        self.cur_token = Token::eof();
        self.peek_token = Token::eof();
    }
}
