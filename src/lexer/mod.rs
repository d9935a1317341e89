pub mod token;

use nom::{
    branch::alt,
    bytes::complete::{tag, take, take_while, take_while1},
    character::complete::{alpha1, digit1},
    combinator::{map, peek},
    error::{convert_error, ParseError, VerboseError},
    multi::many0,
    sequence::preceded,
    Err, IResult,
};
use token::{Token, TokenKind};

pub struct Lexer;

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self
    }

    /// Scans `i` into tokens. The returned sequence always ends with `TokenKind::Eof`.
    ///
    /// Characters that start no known token become single `Illegal` tokens, so the
    /// parser is the one that reports them.
    pub fn lex_input(&self, i: &str) -> Result<Vec<Token>, String> {
        let symbol_parsers = alt((
            Self::static_token_lexer_generator::<VerboseError<&str>>("==", TokenKind::Eq),
            Self::static_token_lexer_generator::<VerboseError<&str>>("=", TokenKind::Assign),
            Self::static_token_lexer_generator::<VerboseError<&str>>("+", TokenKind::Plus),
            Self::static_token_lexer_generator::<VerboseError<&str>>("-", TokenKind::Minus),
            Self::static_token_lexer_generator::<VerboseError<&str>>("!=", TokenKind::NotEq),
            Self::static_token_lexer_generator::<VerboseError<&str>>("!", TokenKind::Bang),
            Self::static_token_lexer_generator::<VerboseError<&str>>("*", TokenKind::Asterisk),
            Self::static_token_lexer_generator::<VerboseError<&str>>("/", TokenKind::Slash),
            Self::static_token_lexer_generator::<VerboseError<&str>>("<", TokenKind::Lt),
            Self::static_token_lexer_generator::<VerboseError<&str>>(">", TokenKind::Gt),
            Self::static_token_lexer_generator::<VerboseError<&str>>("(", TokenKind::LParen),
            Self::static_token_lexer_generator::<VerboseError<&str>>(")", TokenKind::RParen),
            Self::static_token_lexer_generator::<VerboseError<&str>>("{", TokenKind::LBrace),
            Self::static_token_lexer_generator::<VerboseError<&str>>("}", TokenKind::RBrace),
            Self::static_token_lexer_generator::<VerboseError<&str>>(",", TokenKind::Comma),
            Self::static_token_lexer_generator::<VerboseError<&str>>(";", TokenKind::Semicolon),
        ));

        let dynamic_parsers = alt((
            Self::number_lexer::<VerboseError<&str>>(),
            Self::ident_lexer::<VerboseError<&str>>(),
            Self::illegal_lexer::<VerboseError<&str>>(),
        ));

        let parser_result = many0(alt((symbol_parsers, dynamic_parsers)))(i);

        let mut tokens = match parser_result {
            Ok((_, tokens)) => tokens,
            Err(Err::Error(e)) | Err(Err::Failure(e)) => return Err(convert_error(i, e)),
            Err(Err::Incomplete(needed)) => {
                return Err(format!("incomplete input: {:?}", needed));
            }
        };

        tokens.push(Token::eof());

        Ok(tokens)
    }

    fn static_token_lexer_generator<'a, E>(
        symbol: &'a str,
        kind: TokenKind,
    ) -> impl FnMut(&'a str) -> IResult<&'a str, Token, E>
    where
        E: ParseError<&'a str>,
    {
        let token = move |text: &'a str| Token::new(kind, text);

        map(preceded(Self::whitespace, tag(symbol)), token)
    }

    fn ident_lexer<'a, E>() -> impl FnMut(&'a str) -> IResult<&'a str, Token, E>
    where
        E: ParseError<&'a str>,
    {
        map(
            preceded(
                Self::whitespace,
                preceded(
                    peek(alt((alpha1, tag("_")))),
                    take_while1(|c: char| c.is_alphanumeric() || c == '_'),
                ),
            ),
            |word: &str| Token::new(TokenKind::lookup_ident(word), word),
        )
    }

    // Digits stay as text; converting them to an integer is the parser's job.
    fn number_lexer<'a, E>() -> impl FnMut(&'a str) -> IResult<&'a str, Token, E>
    where
        E: ParseError<&'a str>,
    {
        map(preceded(Self::whitespace, digit1), |digits: &str| {
            Token::new(TokenKind::Int, digits)
        })
    }

    fn illegal_lexer<'a, E>() -> impl FnMut(&'a str) -> IResult<&'a str, Token, E>
    where
        E: ParseError<&'a str>,
    {
        map(preceded(Self::whitespace, take(1usize)), |c: &str| {
            Token::new(TokenKind::Illegal, c)
        })
    }

    fn whitespace<'a, E>(i: &'a str) -> IResult<&'a str, &'a str, E>
    where
        E: ParseError<&'a str>,
    {
        let whitespace_chars = " \t\r\n";

        take_while(move |c| whitespace_chars.contains(c))(i)
    }
}
