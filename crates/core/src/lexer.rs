use crate::error::RegionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare word or quoted string (quotes stripped, escapes resolved)
    Word(String),
    Colon,
    Semi,
    /// Kept as a token: parameter groups carry their line breaks through
    Newline,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Eof,
}

impl Token {
    /// Text form used inside parameter groups.
    pub fn as_param_text(&self) -> Option<String> {
        match self {
            Token::Word(w) => Some(w.clone()),
            Token::Colon => Some(":".to_owned()),
            Token::Semi => Some(";".to_owned()),
            Token::Newline => Some("\n".to_owned()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, ':' | ';' | '(' | ')' | '[' | ']' | '{' | '}' | '"')
}

pub fn lex(src: &str, filename: &str) -> Result<Vec<Spanned>, RegionError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    while pos < chars.len() {
        let c = chars[pos];

        // Line comment
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            continue;
        }

        // Block comment
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '*' {
            let start_line = line;
            pos += 2;
            loop {
                if pos >= chars.len() {
                    return Err(RegionError::syntax(
                        filename,
                        start_line,
                        "unterminated block comment",
                    ));
                }
                if chars[pos] == '\n' {
                    line += 1;
                }
                if chars[pos] == '*' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            continue;
        }

        if c == '\n' {
            tokens.push(Spanned {
                token: Token::Newline,
                line,
            });
            line += 1;
            pos += 1;
            continue;
        }

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let tok_line = line;

        // Quoted string. The result is an ordinary word: inside a parameter
        // group a quoted ":" or ";" still acts as separator or terminator.
        if c == '"' {
            pos += 1;
            let mut s = String::new();
            loop {
                if pos >= chars.len() || chars[pos] == '\n' {
                    return Err(RegionError::syntax(
                        filename,
                        tok_line,
                        "unterminated string literal",
                    ));
                }
                let sc = chars[pos];
                if sc == '"' {
                    pos += 1;
                    break;
                }
                if sc == '\\' {
                    pos += 1;
                    if pos >= chars.len() {
                        return Err(RegionError::syntax(
                            filename,
                            tok_line,
                            "unterminated escape in string",
                        ));
                    }
                    match chars[pos] {
                        '"' => s.push('"'),
                        '\\' => s.push('\\'),
                        'n' => s.push('\n'),
                        't' => s.push('\t'),
                        other => {
                            s.push('\\');
                            s.push(other);
                        }
                    }
                    pos += 1;
                    continue;
                }
                s.push(sc);
                pos += 1;
            }
            tokens.push(Spanned {
                token: Token::Word(s),
                line: tok_line,
            });
            continue;
        }

        let punct = match c {
            ':' => Some(Token::Colon),
            ';' => Some(Token::Semi),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            _ => None,
        };
        if let Some(token) = punct {
            tokens.push(Spanned {
                token,
                line: tok_line,
            });
            pos += 1;
            continue;
        }

        // Bare word: everything up to whitespace, a delimiter, or a comment
        let start = pos;
        while pos < chars.len() {
            let wc = chars[pos];
            if wc.is_whitespace() || is_delimiter(wc) {
                break;
            }
            if wc == '/' && pos + 1 < chars.len() && matches!(chars[pos + 1], '/' | '*') {
                break;
            }
            pos += 1;
        }
        let word: String = chars[start..pos].iter().collect();
        tokens.push(Spanned {
            token: Token::Word(word),
            line: tok_line,
        });
    }

    tokens.push(Spanned {
        token: Token::Eof,
        line,
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src, "test.rdl")
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    fn word(w: &str) -> Token {
        Token::Word(w.to_owned())
    }

    #[test]
    fn dotted_and_dashed_values_are_single_words() {
        assert_eq!(
            kinds("north: town-hall.rdl;"),
            vec![
                word("north"),
                Token::Colon,
                word("town-hall.rdl"),
                Token::Semi,
                Token::Eof
            ]
        );
    }

    #[test]
    fn newlines_are_tokens_and_advance_line() {
        let toks = lex("a\n\nb", "t.rdl").unwrap();
        assert_eq!(toks[1].token, Token::Newline);
        assert_eq!(toks[3].token, word("b"));
        assert_eq!(toks[3].line, 3);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("x // trailing\n/* block\n */ y"),
            vec![word("x"), Token::Newline, word("y"), Token::Eof]
        );
    }

    #[test]
    fn quoted_string_resolves_escapes() {
        assert_eq!(
            kinds(r#""hello \"there\"""#),
            vec![word("hello \"there\""), Token::Eof]
        );
    }

    #[test]
    fn unterminated_string_reports_line() {
        let err = lex("a\n\"open", "s.rdl").unwrap_err();
        match err {
            RegionError::Syntax { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("unterminated"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn quoted_punctuation_lexes_as_plain_word() {
        let toks = lex(r#"y: ";" 10;"#, "q.rdl").unwrap();
        assert_eq!(toks[2].token, word(";"));
        let params: Vec<String> = toks.iter().filter_map(|s| s.token.as_param_text()).collect();
        assert_eq!(params, vec!["y", ":", ";", "10", ";"]);
    }

    #[test]
    fn unterminated_block_comment_is_error() {
        assert!(lex("/* never closed", "c.rdl").is_err());
    }

    #[test]
    fn brackets_split_words() {
        assert_eq!(
            kinds("chair(x:1;)[8:2;]"),
            vec![
                word("chair"),
                Token::LParen,
                word("x"),
                Token::Colon,
                word("1"),
                Token::Semi,
                Token::RParen,
                Token::LBracket,
                word("8"),
                Token::Colon,
                word("2"),
                Token::Semi,
                Token::RBracket,
                Token::Eof
            ]
        );
    }
}
