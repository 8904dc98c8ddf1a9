use crate::dot::DotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Equals,
    Semicolon,
    Comma,
    Colon,
    /// `->`
    DirectedEdge,
    /// `--`
    UndirectedEdge,
    /// An identifier, numeral, quoted string or HTML string. Keywords are unquoted IDs.
    Id { text: String, quoted: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Token {
    /// Whether this token is the unquoted keyword `keyword`, compared case-insensitively.
    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(
            &self.kind,
            TokenKind::Id { text, quoted: false } if text.eq_ignore_ascii_case(keyword)
        )
    }
}

pub(crate) struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub(crate) fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn tokenize(mut self) -> Result<Vec<Token>, DotError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> DotError {
        DotError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    /// Skips whitespace, comments and `#` preprocessor lines.
    fn skip_trivia(&mut self) -> Result<(), DotError> {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('#'), _) if self.column == 1 => self.skip_line(),
                (Some('/'), Some('/')) => self.skip_line(),
                (Some('/'), Some('*')) => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek_at(1)) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(self.error(line, column, "unterminated comment"));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, DotError> {
        self.skip_trivia()?;

        let (line, column) = (self.line, self.column);
        let Some(c) = self.peek() else {
            return Ok(None);
        };

        let kind = match c {
            '{' | '}' | '[' | ']' | '=' | ';' | ',' | ':' => {
                self.bump();
                match c {
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '=' => TokenKind::Equals,
                    ';' => TokenKind::Semicolon,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Colon,
                }
            }
            '-' if self.peek_at(1) == Some('>') => {
                self.bump();
                self.bump();
                TokenKind::DirectedEdge
            }
            '-' if self.peek_at(1) == Some('-') => {
                self.bump();
                self.bump();
                TokenKind::UndirectedEdge
            }
            '"' => TokenKind::Id {
                text: self.quoted_string(line, column)?,
                quoted: true,
            },
            '<' => TokenKind::Id {
                text: self.html_string(line, column)?,
                quoted: true,
            },
            c if c == '-' || c == '.' || c.is_ascii_digit() => TokenKind::Id {
                text: self.numeral(line, column)?,
                quoted: false,
            },
            c if c == '_' || c.is_alphabetic() || !c.is_ascii() => TokenKind::Id {
                text: self.identifier(),
                quoted: false,
            },
            c => return Err(self.error(line, column, format!("unexpected character '{c}'"))),
        };

        Ok(Some(Token { kind, line, column }))
    }

    fn identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() || !c.is_ascii() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        text
    }

    fn numeral(&mut self, line: usize, column: usize) -> Result<String, DotError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }

        let mut digits = 0;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits += 1;
            } else if c == '.' && !seen_dot {
                seen_dot = true;
            } else {
                break;
            }
            text.push(c);
            self.bump();
        }

        if digits == 0 {
            return Err(self.error(line, column, format!("invalid numeral '{text}'")));
        }

        Ok(text)
    }

    /// Reads one or more double-quoted strings joined by `+`.
    fn quoted_string(&mut self, line: usize, column: usize) -> Result<String, DotError> {
        let mut text = self.single_quoted_string(line, column)?;

        loop {
            let checkpoint = (self.pos, self.line, self.column);
            self.skip_trivia()?;

            if self.peek() != Some('+') {
                (self.pos, self.line, self.column) = checkpoint;
                return Ok(text);
            }
            self.bump();
            self.skip_trivia()?;

            if self.peek() != Some('"') {
                return Err(self.error(self.line, self.column, "expected a string after '+'"));
            }
            let (line, column) = (self.line, self.column);
            text.push_str(&self.single_quoted_string(line, column)?);
        }
    }

    fn single_quoted_string(&mut self, line: usize, column: usize) -> Result<String, DotError> {
        self.bump();

        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('"') => text.push('"'),
                    // Line continuation
                    Some('\n') => {}
                    Some('\r') if self.peek() == Some('\n') => {
                        self.bump();
                    }
                    Some(c) => {
                        text.push('\\');
                        text.push(c);
                    }
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }

        Err(self.error(line, column, "unterminated string"))
    }

    fn html_string(&mut self, line: usize, column: usize) -> Result<String, DotError> {
        self.bump();

        let mut text = String::new();
        let mut depth = 1;
        while let Some(c) = self.bump() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(text);
                    }
                }
                _ => {}
            }
            text.push(c);
        }

        Err(self.error(line, column, "unterminated HTML string"))
    }
}
