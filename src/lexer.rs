use crate::error::ConvertError;

/// Token types for the staff-group hint grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,   // (
    RightParen,  // )
    Number(u32), // staff count or repeat count
    Repeat,      // x
    Whitespace,
}

/// A token with its position in the source
#[derive(Debug, Clone)]
pub struct LocatedToken {
    pub token: Token,
    pub column: usize,
}

/// Lexer for tokenizing one top-level hint token such as `(2 (1 1))x2`
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.column += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn error(&self, column: usize, message: String) -> ConvertError {
        ConvertError::Grammar {
            token: self.input.to_string(),
            column,
            message,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<LocatedToken>, ConvertError> {
        let mut tokens = Vec::new();

        while let Some(&c) = self.peek() {
            let column = self.column;

            let token = match c {
                '(' => {
                    self.advance();
                    Token::LeftParen
                }
                ')' => {
                    self.advance();
                    Token::RightParen
                }
                'x' | 'X' => {
                    self.advance();
                    Token::Repeat
                }
                c if c.is_whitespace() => {
                    // Collapse runs of whitespace into one separator
                    while let Some(&w) = self.peek() {
                        if !w.is_whitespace() {
                            break;
                        }
                        self.advance();
                    }
                    Token::Whitespace
                }
                c if c.is_ascii_digit() => self.read_number(column)?,
                other => {
                    return Err(self.error(column, format!("Unexpected character '{}'", other)));
                }
            };

            tokens.push(LocatedToken { token, column });
        }

        Ok(tokens)
    }

    fn read_number(&mut self, column: usize) -> Result<Token, ConvertError> {
        let mut digits = String::new();
        while let Some(&d) = self.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            self.advance();
        }

        // A number glued to letters ("2a") is not a count
        if let Some(&next) = self.peek() {
            if next.is_alphanumeric() && next != 'x' && next != 'X' {
                return Err(self.error(
                    self.column,
                    format!("Unexpected character '{}' after number {}", next, digits),
                ));
            }
        }

        digits
            .parse::<u32>()
            .map(Token::Number)
            .map_err(|_| self.error(column, format!("Number {} is too large", digits)))
    }
}
