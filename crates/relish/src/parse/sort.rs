use relish_core::{Error, Result};

/// Parses a client sort clause into `(field, direction)` pairs, direction
/// being `1` (ascending) or `-1` (descending).
///
/// The structured literal-list syntax is tried first:
///
/// ```text
/// [("name", 1), ("age", -1)]
/// [["name", 1]]
/// ```
///
/// and on failure the clause falls back to comma-separated `field` /
/// `-field` tokens (`-age, name`). Any other shape is a client error.
pub fn parse_sort_clause(raw: &str) -> Result<Vec<(String, i64)>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::parse("empty `sort` clause"));
    }

    if trimmed.starts_with('[') {
        return parse_literal_list(trimmed);
    }

    let mut sort = Vec::new();
    for token in trimmed.split(',') {
        let token = token.trim();
        if token.is_empty() || !is_sort_token(token) {
            return Err(Error::parse("unable to parse `sort` clause"));
        }
        match token.strip_prefix('-') {
            Some(field) => sort.push((field.to_string(), -1)),
            None => sort.push((token.to_string(), 1)),
        }
    }

    Ok(sort)
}

fn is_sort_token(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '-')
}

/// Hand parser for the structured list form. Entries are one- or
/// two-element tuples (or brackets): a quoted field name with an optional
/// integer direction.
fn parse_literal_list(src: &str) -> Result<Vec<(String, i64)>> {
    let mut scanner = Scanner {
        chars: src.chars().peekable(),
    };
    let mut sort = Vec::new();

    scanner.expect('[')?;
    scanner.skip_ws();

    if scanner.eat(']') {
        return Ok(sort);
    }

    loop {
        sort.push(scanner.entry()?);
        scanner.skip_ws();
        if scanner.eat(',') {
            scanner.skip_ws();
            // tolerate a trailing comma before the closing bracket
            if scanner.eat(']') {
                break;
            }
            continue;
        }
        scanner.expect(']')?;
        break;
    }

    scanner.skip_ws();
    if scanner.chars.next().is_some() {
        return Err(Error::parse("unable to parse `sort` clause"));
    }

    Ok(sort)
}

struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl Scanner<'_> {
    fn entry(&mut self) -> Result<(String, i64)> {
        self.skip_ws();
        let close = if self.eat('(') {
            ')'
        } else if self.eat('[') {
            ']'
        } else {
            return Err(Error::parse("unable to parse `sort` clause"));
        };

        self.skip_ws();
        let field = self.quoted_string()?;
        self.skip_ws();

        let mut direction = 1;
        if self.eat(',') {
            self.skip_ws();
            direction = self.integer()?;
            self.skip_ws();
        }

        if !self.eat(close) {
            return Err(Error::parse("unable to parse `sort` clause"));
        }

        Ok((field, direction))
    }

    fn quoted_string(&mut self) -> Result<String> {
        let quote = match self.chars.next() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(Error::parse("unable to parse `sort` clause")),
        };

        let mut out = String::new();
        for c in self.chars.by_ref() {
            if c == quote {
                return Ok(out);
            }
            out.push(c);
        }

        Err(Error::parse("unable to parse `sort` clause"))
    }

    fn integer(&mut self) -> Result<i64> {
        let mut digits = String::new();
        if self.eat('-') {
            digits.push('-');
        }
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        digits
            .parse()
            .map_err(|_| Error::parse("unable to parse `sort` clause"))
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(Error::parse("unable to parse `sort` clause"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_form() {
        assert_eq!(
            parse_sort_clause("-age, name").unwrap(),
            vec![("age".to_string(), -1), ("name".to_string(), 1)]
        );
    }

    #[test]
    fn literal_list_form() {
        assert_eq!(
            parse_sort_clause("[(\"name\", 1), (\"age\", -1)]").unwrap(),
            vec![("name".to_string(), 1), ("age".to_string(), -1)]
        );
    }

    #[test]
    fn literal_list_json_brackets() {
        assert_eq!(
            parse_sort_clause("[[\"name\", 1]]").unwrap(),
            vec![("name".to_string(), 1)]
        );
    }

    #[test]
    fn literal_list_defaults_ascending() {
        assert_eq!(
            parse_sort_clause("[(\"name\")]").unwrap(),
            vec![("name".to_string(), 1)]
        );
    }

    #[test]
    fn dotted_token() {
        assert_eq!(
            parse_sort_clause("owner.city").unwrap(),
            vec![("owner.city".to_string(), 1)]
        );
    }

    #[test]
    fn malformed_clause_is_an_error() {
        assert!(parse_sort_clause("[(name, 1)]").is_err());
        assert!(parse_sort_clause("age; name").is_err());
        assert!(parse_sort_clause("").is_err());
    }
}
