use std::fmt;

/// Represents the different kinds of tokens that the lexer can produce.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input.
    Eof,
    /// A run of one or more whitespace characters, newlines included.
    Whitespace,
    /// A character that cannot start any token.
    Unknown(char),
    /// A string literal whose closing quote never arrives.
    UnterminatedString,

    // == Literals ==
    /// A name made of lowercase ASCII letters and underscores.
    Identifier(String),
    /// The contents of a single-quoted string, quotes stripped.
    String(String),
    /// The raw text of a numeric literal, sign included.
    Number(String),

    // == Keywords ==
    /// `is`, separating a constant name from its value.
    Is,
    /// `struct`, opening a structure literal.
    Struct,

    // == Punctuation ==
    /// Left Brace: `{`
    LBrace,
    /// Right Brace: `}`
    RBrace,
    /// Comma: `,`
    Comma,
    /// Equals: `=`
    Equals,
    /// Semicolon: `;`
    Semicolon,
    /// Constant reference opener: `#(`
    HashParen,
    /// Right Parenthesis: `)`
    RParen,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Eof => write!(f, "end of input"),
            TokenType::Whitespace => write!(f, "whitespace"),
            TokenType::Unknown(c) => write!(f, "character `{c}`"),
            TokenType::UnterminatedString => write!(f, "unterminated string"),
            TokenType::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenType::String(s) => write!(f, "string '{s}'"),
            TokenType::Number(n) => write!(f, "number `{n}`"),
            TokenType::Is => write!(f, "`is`"),
            TokenType::Struct => write!(f, "`struct`"),
            TokenType::LBrace => write!(f, "`{{`"),
            TokenType::RBrace => write!(f, "`}}`"),
            TokenType::Comma => write!(f, "`,`"),
            TokenType::Equals => write!(f, "`=`"),
            TokenType::Semicolon => write!(f, "`;`"),
            TokenType::HashParen => write!(f, "`#(`"),
            TokenType::RParen => write!(f, "`)`"),
        }
    }
}

/// A token with its type and byte position
#[derive(Debug, Clone)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Lexes the whole input. The returned vector always ends with an `Eof` token.
    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.ttype == TokenType::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        let ttype = if let Some(char) = self.advance() {
            match char {
                '{' => TokenType::LBrace,
                '}' => TokenType::RBrace,
                ',' => TokenType::Comma,
                '=' => TokenType::Equals,
                ';' => TokenType::Semicolon,
                ')' => TokenType::RParen,
                '#' => {
                    if self.peek() == Some(&'(') {
                        self.advance();
                        TokenType::HashParen
                    } else {
                        TokenType::Unknown('#')
                    }
                }
                '\'' => self.read_string(),
                c if is_whitespace(c) => self.read_whitespace(),
                c if c.is_ascii_lowercase() || c == '_' => self.read_identifier(c),
                c if c.is_ascii_digit() => self.read_number(c),
                c if (c == '-' || c == '+' || c == '.') && self.starts_number(c) => {
                    self.read_number(c)
                }
                c => TokenType::Unknown(c),
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let char = self.chars.next();
        if let Some(c) = char {
            self.position += c.len_utf8();
        }
        char
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Whether a sign or leading dot is the start of a numeric literal.
    fn starts_number(&mut self, first_char: char) -> bool {
        match self.peek().copied() {
            Some(c) if c.is_ascii_digit() => true,
            // `-.5` and `+.5`
            Some('.') if first_char != '.' => {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                lookahead.next().is_some_and(|c| c.is_ascii_digit())
            }
            _ => false,
        }
    }

    fn read_whitespace(&mut self) -> TokenType {
        while let Some(&c) = self.peek() {
            if is_whitespace(c) {
                self.advance();
            } else {
                break;
            }
        }
        TokenType::Whitespace
    }

    fn read_string(&mut self) -> TokenType {
        let mut value = String::new();
        while let Some(c) = self.advance() {
            if c == '\'' {
                return TokenType::String(value);
            }
            value.push(c);
        }
        TokenType::UnterminatedString
    }

    fn read_identifier(&mut self, first_char: char) -> TokenType {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(&c) = self.peek() {
            if c.is_ascii_lowercase() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "is" => TokenType::Is,
            "struct" => TokenType::Struct,
            _ => TokenType::Identifier(ident),
        }
    }

    fn read_number(&mut self, first_char: char) -> TokenType {
        let mut number_str = String::new();
        number_str.push(first_char);
        let mut has_dot = first_char == '.';

        while let Some(&c) = self.peek() {
            if c.is_ascii_digit() {
                number_str.push(c);
                self.advance();
            } else if c == '.' && !has_dot {
                has_dot = true;
                number_str.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.starts_exponent() {
            if let Some(e) = self.advance() {
                number_str.push(e);
            }
            if let Some(&sign @ ('+' | '-')) = self.peek() {
                number_str.push(sign);
                self.advance();
            }
            while let Some(&c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                number_str.push(c);
                self.advance();
            }
        }

        TokenType::Number(number_str)
    }

    /// Whether the next characters are `e` or `E`, an optional sign, and a digit.
    /// A bare `e` is left alone so it lexes as an identifier.
    fn starts_exponent(&self) -> bool {
        let mut lookahead = self.chars.clone();
        if !matches!(lookahead.next(), Some('e' | 'E')) {
            return false;
        }
        match lookahead.next() {
            Some('+' | '-') => lookahead.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }
}

/// Only space, tab, form feed, carriage return and newline separate tokens.
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c' | '\r' | '\n')
}
