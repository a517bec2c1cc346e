//! Tokenizer for derived-field expressions

use super::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,
    Coalesce,
    EqEq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Number(n) => return write!(f, "number {}", n),
            TokenKind::Str(s) => return write!(f, "string '{}'", s),
            TokenKind::Ident(s) => return write!(f, "'{}'", s),
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Question => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Bang => "'!'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Coalesce => "'??'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::StrictEq => "'==='",
            TokenKind::StrictNotEq => "'!=='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Eof => "end of expression",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the token start
    pub position: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        let kind = if c.is_ascii_digit() || (c == '.' && peek_digit(&chars, i + 1)) {
            let (n, next) = lex_number(&chars, i)?;
            i = next;
            TokenKind::Number(n)
        } else if c == '\'' || c == '"' {
            let (s, next) = lex_string(&chars, i)?;
            i = next;
            TokenKind::Str(s)
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            let mut end = i;
            while end < chars.len()
                && (chars[end].is_alphanumeric() || chars[end] == '_' || chars[end] == '$')
            {
                end += 1;
            }
            let ident: String = chars[i..end].iter().collect();
            i = end;
            TokenKind::Ident(ident)
        } else {
            let (kind, width) = lex_operator(&chars, i).ok_or_else(|| {
                ParseError::new(format!("unexpected character '{}'", c), start)
            })?;
            i += width;
            kind
        };

        tokens.push(Token {
            kind,
            position: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: chars.len(),
    });
    Ok(tokens)
}

fn peek_digit(chars: &[char], i: usize) -> bool {
    chars.get(i).is_some_and(|c| c.is_ascii_digit())
}

fn lex_number(chars: &[char], start: usize) -> Result<(f64, usize), ParseError> {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end < chars.len() && chars[end] == '.' {
        end += 1;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
        let mut exp_end = end + 1;
        if exp_end < chars.len() && (chars[exp_end] == '+' || chars[exp_end] == '-') {
            exp_end += 1;
        }
        if peek_digit(chars, exp_end) {
            end = exp_end;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        }
    }

    let text: String = chars[start..end].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, end))
        .map_err(|_| ParseError::new(format!("invalid number '{}'", text), start))
}

fn lex_string(chars: &[char], start: usize) -> Result<(String, usize), ParseError> {
    let quote = chars[start];
    let mut out = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            return Ok((out, i + 1));
        }
        if c == '\\' {
            let escaped = chars
                .get(i + 1)
                .ok_or_else(|| ParseError::new("unterminated string", start))?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => *other,
            });
            i += 2;
            continue;
        }
        out.push(c);
        i += 1;
    }

    Err(ParseError::new("unterminated string", start))
}

fn lex_operator(chars: &[char], i: usize) -> Option<(TokenKind, usize)> {
    let at = |offset: usize| chars.get(i + offset).copied();
    let kind = match (chars[i], at(1), at(2)) {
        ('=', Some('='), Some('=')) => return Some((TokenKind::StrictEq, 3)),
        ('!', Some('='), Some('=')) => return Some((TokenKind::StrictNotEq, 3)),
        ('=', Some('='), _) => return Some((TokenKind::EqEq, 2)),
        ('!', Some('='), _) => return Some((TokenKind::NotEq, 2)),
        ('<', Some('='), _) => return Some((TokenKind::Le, 2)),
        ('>', Some('='), _) => return Some((TokenKind::Ge, 2)),
        ('&', Some('&'), _) => return Some((TokenKind::AndAnd, 2)),
        ('|', Some('|'), _) => return Some((TokenKind::OrOr, 2)),
        ('?', Some('?'), _) => return Some((TokenKind::Coalesce, 2)),
        ('(', _, _) => TokenKind::LParen,
        (')', _, _) => TokenKind::RParen,
        ('[', _, _) => TokenKind::LBracket,
        (']', _, _) => TokenKind::RBracket,
        ('.', _, _) => TokenKind::Dot,
        (',', _, _) => TokenKind::Comma,
        ('?', _, _) => TokenKind::Question,
        (':', _, _) => TokenKind::Colon,
        ('+', _, _) => TokenKind::Plus,
        ('-', _, _) => TokenKind::Minus,
        ('*', _, _) => TokenKind::Star,
        ('/', _, _) => TokenKind::Slash,
        ('%', _, _) => TokenKind::Percent,
        ('!', _, _) => TokenKind::Bang,
        ('<', _, _) => TokenKind::Lt,
        ('>', _, _) => TokenKind::Gt,
        _ => return None,
    };
    Some((kind, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn field_access_tokens() {
        assert_eq!(
            kinds("fields['A'] * 2"),
            vec![
                TokenKind::Ident("fields".into()),
                TokenKind::LBracket,
                TokenKind::Str("A".into()),
                TokenKind::RBracket,
                TokenKind::Star,
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn multi_char_operators_take_longest_match() {
        assert_eq!(
            kinds("a !== b ?? c <= d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::StrictNotEq,
                TokenKind::Ident("b".into()),
                TokenKind::Coalesce,
                TokenKind::Ident("c".into()),
                TokenKind::Le,
                TokenKind::Ident("d".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_with_fraction_and_exponent() {
        assert_eq!(kinds("1.5e2")[0], TokenKind::Number(150.0));
        assert_eq!(kinds(".25")[0], TokenKind::Number(0.25));
    }

    #[test]
    fn string_escapes() {
        assert_eq!(kinds(r#""a\"b""#)[0], TokenKind::Str("a\"b".into()));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("'abc").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("unterminated"));
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("a = b").unwrap_err();
        assert!(err.message.contains("'='"));
        assert_eq!(err.position, 2);
    }
}
