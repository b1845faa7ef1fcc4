use relish_core::{Error, Result};

/// Tokens of the restricted boolean-expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Token {
    /// Identifier or keyword-candidate name
    Ident(String),

    /// Integer literal
    Int(i64),

    /// Float literal
    Float(f64),

    /// Quoted string literal
    Str(String),

    /// Comparison operator token (`==`, `!=`, `<`, `<=`, `>`, `>=`)
    Compare(&'static str),

    Dot,
    Comma,
    LParen,
    RParen,
}

/// Scans a one-line filter expression into tokens. Anything outside the
/// grammar's alphabet is a parse error.
pub(super) fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' | '!' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token::Compare(if ch == '=' { "==" } else { "!=" }));
                    }
                    _ => {
                        return Err(Error::parse(format!(
                            "unexpected character `{ch}` at offset {pos}"
                        )))
                    }
                }
            }
            '<' | '>' => {
                chars.next();
                let wide = matches!(chars.peek(), Some(&(_, '=')));
                if wide {
                    chars.next();
                }
                tokens.push(Token::Compare(match (ch, wide) {
                    ('<', true) => "<=",
                    ('<', false) => "<",
                    ('>', true) => ">=",
                    (_, _) => ">",
                }));
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(scan_string(&mut chars, ch, pos)?));
            }
            '-' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, c)) if c.is_ascii_digit() => {
                        tokens.push(scan_number(&mut chars, true)?);
                    }
                    _ => {
                        return Err(Error::parse(format!(
                            "unexpected character `-` at offset {pos}"
                        )))
                    }
                }
            }
            c if c.is_ascii_digit() => {
                tokens.push(scan_number(&mut chars, false)?);
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => {
                return Err(Error::parse(format!(
                    "unexpected character `{ch}` at offset {pos}"
                )))
            }
        }
    }

    Ok(tokens)
}

fn scan_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String> {
    let mut out = String::new();

    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(out),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            c => out.push(c),
        }
    }

    Err(Error::parse(format!(
        "unterminated string literal starting at offset {start}"
    )))
}

fn scan_number(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    negative: bool,
) -> Result<Token> {
    let mut digits = String::new();
    if negative {
        digits.push('-');
    }
    let mut is_float = false;

    while let Some(&(_, c)) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else if c == '.' && !is_float {
            // Only a decimal point followed by a digit belongs to the
            // number; `a.b` attribute dots never reach here.
            let mut ahead = chars.clone();
            ahead.next();
            match ahead.peek() {
                Some(&(_, d)) if d.is_ascii_digit() => {
                    is_float = true;
                    digits.push('.');
                    chars.next();
                }
                _ => break,
            }
        } else {
            break;
        }
    }

    if is_float {
        digits
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| Error::parse(format!("invalid number literal `{digits}`")))
    } else {
        digits
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| Error::parse(format!("invalid number literal `{digits}`")))
    }
}
