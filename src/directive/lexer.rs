//! Line-aware tokenizer for directive text.

/// A token and the 1-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

/// Split directive text into tokens.
///
/// - Tokens are separated by whitespace; line numbers are kept per token
/// - `"double quoted"` tokens may contain whitespace and `\"`
/// - A token beginning with `#` starts a comment running to end of line
/// - A bare `{}` is an empty block and splits into `{` and `}`; quote it to
///   use it as an operand
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;

    while let Some(&c) = chars.peek() {
        if c == '\n' {
            line += 1;
            chars.next();
            continue;
        }
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' {
            while chars.next_if(|&c| c != '\n').is_some() {}
            continue;
        }

        let start = line;
        let mut text = String::new();
        if c == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' if chars.peek() == Some(&'"') => {
                        text.push('"');
                        chars.next();
                    }
                    '\n' => {
                        line += 1;
                        text.push(c);
                    }
                    _ => text.push(c),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                text.push(c);
            }
            if text == "{}" {
                tokens.push(Token { text: "{".to_string(), line: start });
                text = "}".to_string();
            }
        }
        tokens.push(Token { text, line: start });
    }

    tokens
}
