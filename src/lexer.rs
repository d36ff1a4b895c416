use std::fmt;

/// Words that lex as [`TokenKind::Keyword`] instead of identifiers.
pub const KEYWORDS: [&str; 5] = ["if", "else", "endif", "foreach", "endforeach"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    LBrace2, // {{
    RBrace2, // }}
    Dot,     // .
    Colon,   // :
    Identifier,
    Keyword,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Text => "TEXT",
            TokenKind::LBrace2 => "LBRACE2",
            TokenKind::RBrace2 => "RBRACE2",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
        }
    }

    pub fn text(lexeme: impl Into<String>) -> Self {
        Self::new(lexeme, TokenKind::Text)
    }

    pub fn ident(lexeme: impl Into<String>) -> Self {
        Self::new(lexeme, TokenKind::Identifier)
    }

    pub fn keyword(lexeme: impl Into<String>) -> Self {
        Self::new(lexeme, TokenKind::Keyword)
    }

    pub fn lbrace2() -> Self {
        Self::new("{{", TokenKind::LBrace2)
    }

    pub fn rbrace2() -> Self {
        Self::new("}}", TokenKind::RBrace2)
    }

    pub fn dot() -> Self {
        Self::new(".", TokenKind::Dot)
    }

    pub fn colon() -> Self {
        Self::new(":", TokenKind::Colon)
    }

    /// True if this is the keyword `word`.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.kind, self.lexeme)
    }
}

/// Character-at-a-time scanner over template source.
///
/// Text outside `{{ ... }}` is collected verbatim. Inside an expression only
/// identifiers, keywords, `.` and `:` survive; anything else (whitespace
/// included) is accumulated and then dropped when the next identifier or
/// the closing `}}` is reached.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    cursor: usize,
    in_expr: bool,
    pending: String,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            in_expr: false,
            pending: String::new(),
            tokens: Vec::new(),
        }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.cursor..]
    }

    fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    fn flush_pending(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.tokens.push(Token::text(text));
        }
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        while let Some(first) = self.remaining().chars().next() {
            let rest = self.remaining();

            if rest.starts_with("{{") {
                self.flush_pending();
                self.tokens.push(Token::lbrace2());
                self.in_expr = true;
                self.advance(2);
            } else if rest.starts_with("}}") {
                self.pending.clear();
                self.tokens.push(Token::rbrace2());
                self.in_expr = false;
                self.advance(2);
            } else if self.in_expr && is_word_char(first) {
                self.pending.clear();
                let len: usize = rest
                    .chars()
                    .take_while(|c| is_word_char(*c) || *c == '_')
                    .map(char::len_utf8)
                    .sum();
                let word = &rest[..len];
                self.advance(len);

                let token = if KEYWORDS.contains(&word) {
                    Token::keyword(word)
                } else {
                    Token::ident(word)
                };
                self.tokens.push(token);
            } else if self.in_expr && first == '.' {
                self.tokens.push(Token::dot());
                self.advance(1);
            } else if self.in_expr && first == ':' {
                self.tokens.push(Token::colon());
                self.advance(1);
            } else {
                self.pending.push(first);
                self.advance(first.len_utf8());
            }
        }

        self.flush_pending();
        self.tokens
    }
}

/// Letters and decimal digits. Letter-numbers (`Ⅻ`) and other numerics
/// (`²`, `½`) are not word characters; non-ASCII decimal digits aren't either.
fn is_word_char(c: char) -> bool {
    (c.is_alphabetic() && !c.is_numeric()) || c.is_ascii_digit()
}

/// Split template source into tokens. Never fails.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new(source).tokenize()
}

/// One token per line, with spaces and newlines stripped from lexemes.
pub fn tokens_to_string(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let line = token.to_string().replace([' ', '\n'], "");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
