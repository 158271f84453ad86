//! Token source for planning-domain sources.

use std::fmt::Display;

use logos::Logos;

use crate::ast::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    /* Punctuation */
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,

    /* Logical operators */
    #[token("~")]
    Not,
    #[token("&")]
    And,
    #[token("|")]
    Or,

    /* Relational operators */
    #[token("==")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,

    /* Arithmetic operators */
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Multiply,
    #[token("/")]
    Divide,

    /* Keywords */
    #[token("fact")]
    Fact,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+")]
    IntLiteral,
    #[regex(r"[0-9]+\.[0-9]*")]
    FloatLiteral,
    #[regex(r#""[^"\n]*""#)]
    StrLiteral,

    /// A character that does not start any token
    Unknown,
    /// End of input, repeated once the source is exhausted
    Eof,
}

impl TokenKind {
    /// A human readable description used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Not => "'~'",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Equal => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Multiply => "'*'",
            TokenKind::Divide => "'/'",
            TokenKind::Fact => "keyword 'fact'",
            TokenKind::Identifier => "identifier",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StrLiteral => "string literal",
            TokenKind::Unknown => "unknown character",
            TokenKind::Eof => "end of input",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Splits a source into tokens, one at a time.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
        }
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the next token. Once the input is exhausted, keeps returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(Ok(kind)) => Token {
                kind,
                span: self.inner.span().into(),
            },
            Some(Err(())) => Token {
                kind: TokenKind::Unknown,
                span: self.inner.span().into(),
            },
            None => {
                let end = self.source.len();
                Token {
                    kind: TokenKind::Eof,
                    span: Span::new(end, end),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut kinds = vec![];
        loop {
            let token = lexer.next_token();
            if token.is(TokenKind::Eof) {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn precondition_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("( ~(a & b) | c )"),
            vec![LParen, Not, LParen, Identifier, And, Identifier, RParen, Or, Identifier, RParen]
        );
    }

    #[test]
    fn two_char_operators_win() {
        use TokenKind::*;
        assert_eq!(
            kinds("<= < >= > == !="),
            vec![LessEqual, Less, GreaterEqual, Greater, Equal, NotEqual]
        );
    }

    #[test]
    fn literals() {
        use TokenKind::*;
        assert_eq!(
            kinds("10 10.0 10. \"str\""),
            vec![IntLiteral, FloatLiteral, FloatLiteral, StrLiteral]
        );
    }

    #[test]
    fn keyword_and_identifiers() {
        use TokenKind::*;
        assert_eq!(kinds("fact facts _fact"), vec![Fact, Identifier, Identifier]);
    }

    #[test]
    fn comments_and_unknown_characters() {
        use TokenKind::*;
        assert_eq!(kinds("a // comment ~ &\n $ b"), vec![Identifier, Unknown, Identifier]);
    }

    #[test]
    fn spans_and_eof() {
        let mut lexer = Lexer::new("f(x1)");
        let f = lexer.next_token();
        assert_eq!(f.span, Span::new(0, 1));
        lexer.next_token();
        let x = lexer.next_token();
        assert_eq!(&lexer.source()[x.span.start..x.span.end], "x1");
        lexer.next_token();
        let eof = lexer.next_token();
        assert!(eof.is(TokenKind::Eof));
        assert_eq!(eof.span, Span::new(5, 5));
        assert!(lexer.next_token().is(TokenKind::Eof));
    }
}
