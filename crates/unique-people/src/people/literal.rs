//! Parser for list cells such as `['Jean Dupont', "A. O'Neil"]`.
//!
//! Only a bracketed, comma-separated sequence of single- or double-quoted
//! strings is accepted. Adjacent literals inside one element are joined, so
//! `['Jean ' 'Dupont']` holds a single name. Nothing in a cell is ever
//! evaluated.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListLiteralError {
    #[error("expected '[' at offset {offset}")]
    MissingOpenBracket { offset: usize },
    #[error("expected a quoted string at offset {offset}")]
    ExpectedString { offset: usize },
    #[error("expected ',' or ']' at offset {offset}")]
    ExpectedSeparator { offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput { offset: usize },
}

pub fn parse_string_list(input: &str) -> Result<Vec<String>, ListLiteralError> {
    let mut cursor = Cursor {
        chars: input.char_indices().peekable(),
        len: input.len(),
    };

    cursor.skip_whitespace();
    if !cursor.eat('[') {
        return Err(ListLiteralError::MissingOpenBracket {
            offset: cursor.offset(),
        });
    }

    let mut values = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.eat(']') {
            break;
        }

        values.push(cursor.joined_strings()?);

        cursor.skip_whitespace();
        if cursor.eat(']') {
            break;
        }
        if !cursor.eat(',') {
            return Err(ListLiteralError::ExpectedSeparator {
                offset: cursor.offset(),
            });
        }
    }

    cursor.skip_whitespace();
    if cursor.peek().is_some() {
        return Err(ListLiteralError::TrailingInput {
            offset: cursor.offset(),
        });
    }

    Ok(values)
}

struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map(|&(offset, _)| offset).unwrap_or(self.len)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
    }

    /// One list element: a quoted string plus any literals directly following it.
    fn joined_strings(&mut self) -> Result<String, ListLiteralError> {
        let mut value = self.quoted_string()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('\'' | '"') => value.push_str(&self.quoted_string()?),
                _ => return Ok(value),
            }
        }
    }

    fn quoted_string(&mut self) -> Result<String, ListLiteralError> {
        let start = self.offset();
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Err(ListLiteralError::ExpectedString { offset: start }),
        };
        self.chars.next();

        // Triple-quoted literals are outside the accepted grammar.
        if self.peek() == Some(quote) {
            self.chars.next();
            if self.peek() == Some(quote) {
                return Err(ListLiteralError::ExpectedString { offset: start });
            }
            return Ok(String::new());
        }

        let mut value = String::new();
        loop {
            let Some((offset, c)) = self.chars.next() else {
                return Err(ListLiteralError::UnterminatedString { offset: start });
            };
            match c {
                c if c == quote => return Ok(value),
                '\n' | '\r' => return Err(ListLiteralError::UnterminatedString { offset: start }),
                '\\' => self.escape(offset, &mut value)?,
                c => value.push(c),
            }
        }
    }

    fn escape(&mut self, offset: usize, value: &mut String) -> Result<(), ListLiteralError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(ListLiteralError::UnterminatedString { offset });
        };
        match c {
            '\\' => value.push('\\'),
            '\'' => value.push('\''),
            '"' => value.push('"'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'a' => value.push('\u{07}'),
            'b' => value.push('\u{08}'),
            'f' => value.push('\u{0c}'),
            'v' => value.push('\u{0b}'),
            '0'..='7' => value.push(self.octal_char(c, offset)?),
            '\n' => {}
            'x' => value.push(self.hex_char(2, offset)?),
            'u' => value.push(self.hex_char(4, offset)?),
            'U' => value.push(self.hex_char(8, offset)?),
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Ok(())
    }

    /// Up to three octal digits, the first already consumed.
    fn octal_char(&mut self, first: char, offset: usize) -> Result<char, ListLiteralError> {
        let mut code = first.to_digit(8).ok_or(ListLiteralError::InvalidEscape { offset })?;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) => {
                    self.chars.next();
                    code = code * 8 + digit;
                }
                None => break,
            }
        }
        char::from_u32(code).ok_or(ListLiteralError::InvalidEscape { offset })
    }

    fn hex_char(&mut self, digits: usize, offset: usize) -> Result<char, ListLiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .next()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or(ListLiteralError::InvalidEscape { offset })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(ListLiteralError::InvalidEscape { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_quoted_list() {
        let names = parse_string_list("['Jean Dupont', 'A. Martin']").expect("valid list");
        assert_eq!(names, vec!["Jean Dupont", "A. Martin"]);
    }

    #[test]
    fn parses_mixed_quotes_and_escapes() {
        let names = parse_string_list(r#"["A. O'Neil", 'Ren\u00e9e \'Rae\' Smith', 'Jos\xe9']"#)
            .expect("valid list");
        assert_eq!(names, vec!["A. O'Neil", "Renée 'Rae' Smith", "José"]);
    }

    #[test]
    fn accepts_empty_list_and_trailing_comma() {
        assert!(parse_string_list(" [ ] ").expect("empty list").is_empty());
        assert_eq!(
            parse_string_list("['Solo',]").expect("trailing comma"),
            vec!["Solo"]
        );
        assert_eq!(parse_string_list("['']").expect("empty string"), vec![""]);
    }

    #[test]
    fn keeps_unknown_escapes_verbatim() {
        assert_eq!(
            parse_string_list(r"['C:\d']").expect("unknown escape"),
            vec![r"C:\d"]
        );
    }

    #[test]
    fn decodes_octal_escapes() {
        assert_eq!(
            parse_string_list(r"['a\012b', 'Ren\351e', '\0', '\18']").expect("octal escapes"),
            vec!["a\nb", "Renée", "\0", "\u{1}8"]
        );
    }

    #[test]
    fn joins_adjacent_literals() {
        assert_eq!(
            parse_string_list("['Jean ' \"Dupont\", 'A.'\n 'Martin']").expect("adjacent literals"),
            vec!["Jean Dupont", "A.Martin"]
        );
        assert_eq!(
            parse_string_list("['' 'Solo' '']").expect("empty pieces"),
            vec!["Solo"]
        );
    }

    #[test]
    fn rejects_expressions() {
        assert!(matches!(
            parse_string_list("__import__('os').system('ls')"),
            Err(ListLiteralError::MissingOpenBracket { offset: 0 })
        ));
        assert!(matches!(
            parse_string_list("['a', None]"),
            Err(ListLiteralError::ExpectedString { offset: 6 })
        ));
        assert!(matches!(
            parse_string_list("[['nested']]"),
            Err(ListLiteralError::ExpectedString { offset: 1 })
        ));
        assert!(matches!(
            parse_string_list("['''triple''']"),
            Err(ListLiteralError::ExpectedString { offset: 1 })
        ));
    }

    #[test]
    fn rejects_broken_syntax() {
        assert!(matches!(
            parse_string_list("['a' None]"),
            Err(ListLiteralError::ExpectedSeparator { offset: 5 })
        ));
        assert!(matches!(
            parse_string_list("['unterminated]"),
            Err(ListLiteralError::UnterminatedString { offset: 1 })
        ));
        assert!(matches!(
            parse_string_list("['a'] extra"),
            Err(ListLiteralError::TrailingInput { offset: 6 })
        ));
        assert!(matches!(
            parse_string_list(r"['\x4']"),
            Err(ListLiteralError::InvalidEscape { offset: 2 })
        ));
    }
}
