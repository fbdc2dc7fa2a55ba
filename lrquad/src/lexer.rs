use logos::Logos;

use crate::error::LexError;
use crate::token::{Position, Token, TokenKind};

const RESERVED_WORDS: &[&str] = &["if", "else", "while", "do", "break", "true", "false"];
const BASIC_TYPES: &[&str] = &["int", "double", "boolean"];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum Lexeme {
    #[regex("[A-Za-z][A-Za-z0-9]*")]
    Word,
    #[regex("[0-9]+")]
    Integer,
    #[regex(r"[0-9]+\.[0-9]*")]
    Decimal,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,
    #[token("+")]
    #[token("++")]
    #[token("+=")]
    #[token("-")]
    #[token("--")]
    #[token("-=")]
    #[token("*")]
    #[token("*=")]
    #[token("/")]
    #[token("/=")]
    #[token("%")]
    #[token("%=")]
    #[token("^")]
    #[token("^=")]
    #[token("!")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("=")]
    #[token("==")]
    #[token("&")]
    #[token("&&")]
    #[token("&=")]
    #[token("|")]
    #[token("||")]
    #[token("|=")]
    Operator,
    #[token(";")]
    #[token(",")]
    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    Separator,
}

/// Byte offsets of line starts, used to turn spans into line/column positions.
struct LineIndex<'source> {
    source: &'source str,
    starts: Vec<usize>,
}

impl<'source> LineIndex<'source> {
    fn new(source: &'source str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        LineIndex { source, starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = self.source[self.starts[line]..offset].chars().count() + 1;
        Position::new(line + 1, column)
    }
}

/// Token stream over a source text
///
/// Yields every token of the input followed by a single end-of-input token. Whitespace and
/// `//` line comments are skipped.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Lexeme>,
    lines: LineIndex<'source>,
    finished: bool,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Lexer {
            inner: Lexeme::lexer(source),
            lines: LineIndex::new(source),
            finished: false,
        }
    }

    fn classify(lexeme: Lexeme, text: &str) -> TokenKind {
        match lexeme {
            Lexeme::Word if RESERVED_WORDS.contains(&text) => TokenKind::ReservedWord,
            Lexeme::Word if BASIC_TYPES.contains(&text) => TokenKind::BasicType,
            Lexeme::Word => TokenKind::Identifier,
            Lexeme::Integer => TokenKind::Integer,
            Lexeme::Decimal => TokenKind::Decimal,
            Lexeme::Str => TokenKind::StringLiteral,
            Lexeme::Operator => TokenKind::Operator,
            Lexeme::Separator => TokenKind::Separator,
        }
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(lexeme)) => {
                let text = self.inner.slice();
                let position = self.lines.position(self.inner.span().start);
                Some(Ok(Token::new(Self::classify(lexeme, text), text, position)))
            }
            Some(Err(())) => {
                self.finished = true;
                let position = self.lines.position(self.inner.span().start);
                let character = self.inner.slice().chars().next().unwrap_or('\0');
                Some(Err(LexError::UnexpectedCharacter {
                    character,
                    line: position.line,
                    column: position.column,
                }))
            }
            None => {
                self.finished = true;
                let position = self.lines.position(self.lines.source.len());
                Some(Ok(Token::new(TokenKind::Eof, "", position)))
            }
        }
    }
}

/// Split `source` into tokens, ending with the end-of-input token.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    fn test_word_classification() {
        assert_eq!(
            kinds("while int x2 breaks"),
            vec![
                (TokenKind::ReservedWord, "while".to_owned()),
                (TokenKind::BasicType, "int".to_owned()),
                (TokenKind::Identifier, "x2".to_owned()),
                (TokenKind::Identifier, "breaks".to_owned()),
                (TokenKind::Eof, "".to_owned()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 3.25 7."),
            vec![
                (TokenKind::Integer, "42".to_owned()),
                (TokenKind::Decimal, "3.25".to_owned()),
                (TokenKind::Decimal, "7.".to_owned()),
                (TokenKind::Eof, "".to_owned()),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let texts: Vec<String> = kinds("a<=b&&!c==d||e!=f")
            .into_iter()
            .filter(|(kind, _)| *kind == TokenKind::Operator)
            .map(|(_, text)| text)
            .collect();
        assert_eq!(texts, vec!["<=", "&&", "!", "==", "||", "!="]);
    }

    #[test]
    fn test_comments_and_strings() {
        assert_eq!(
            kinds("x // ignored ; \n \"a \\\" b\";"),
            vec![
                (TokenKind::Identifier, "x".to_owned()),
                (TokenKind::StringLiteral, "\"a \\\" b\"".to_owned()),
                (TokenKind::Separator, ";".to_owned()),
                (TokenKind::Eof, "".to_owned()),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("{\n  int x;\n}").unwrap();
        let positions: Vec<Position> = tokens.iter().map(|token| token.position).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(1, 1),
                Position::new(2, 3),
                Position::new(2, 7),
                Position::new(2, 8),
                Position::new(3, 1),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("{\n x = 1 # 2; }").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '#',
                line: 2,
                column: 8,
            }
        );
    }

    #[test]
    fn test_empty_input_yields_only_eof() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].position, Position::new(1, 1));
    }
}
