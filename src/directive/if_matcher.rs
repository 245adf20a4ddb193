//! `if` / `if_op` directive handling.
//!
//! ```text
//! rewrite {
//!     if {path} match ^/old/
//!     if {>Referer} not_has example.com
//!     if_op or
//! }
//! ```

use crate::condition::{Combinator, Condition, ConditionSet};
use crate::directive::{ConfigError, Dispenser};

const IF: &str = "if";
const IF_OP: &str = "if_op";

/// Returns true for the keywords this parser consumes: `if` and `if_op`.
pub fn owns_keyword(token: &str) -> bool {
    token == IF || token == IF_OP
}

/// Parse a full `name { ... }` directive into a condition set.
pub fn parse_directive(input: &str) -> Result<ConditionSet, ConfigError> {
    let mut d = Dispenser::new(input);
    if !d.next() {
        return Err(ConfigError::MissingDirective);
    }
    let set = parse_block(&mut d)?;
    if d.next() {
        return Err(ConfigError::UnexpectedToken {
            line: d.line(),
            token: d.val().to_string(),
        });
    }
    Ok(set)
}

/// Parse the body of a block (the lines between the braces).
pub fn parse_lines(input: &str) -> Result<ConditionSet, ConfigError> {
    let mut d = Dispenser::new(input);
    let mut set = ConditionSet::default();
    while d.next() {
        parse_line(&mut d, &mut set)?;
    }
    Ok(set)
}

/// Parse the block following the directive name under the cursor.
///
/// Lines starting with keywords other than `if` and `if_op` are skipped so a
/// surrounding directive can interleave its own settings.
pub fn parse_block(d: &mut Dispenser) -> Result<ConditionSet, ConfigError> {
    let mut set = ConditionSet::default();
    while d.next_block() {
        parse_line(d, &mut set)?;
    }
    if d.in_block() {
        return Err(ConfigError::UnclosedBlock {
            line: d.block_line(),
        });
    }
    Ok(set)
}

/// Handle one line whose first token is under the cursor.
fn parse_line(d: &mut Dispenser, set: &mut ConditionSet) -> Result<(), ConfigError> {
    let line = d.line();
    match d.val() {
        "{" | "}" => {
            return Err(ConfigError::UnexpectedToken {
                line,
                token: d.val().to_string(),
            })
        }
        IF => {
            let args = d.remaining_args();
            let [left, op, right] = args.as_slice() else {
                return Err(ConfigError::ArgCount {
                    line,
                    keyword: IF,
                    expected: 3,
                    found: args.len(),
                });
            };
            let condition = Condition::new(left.as_str(), op, right.as_str())
                .map_err(|source| ConfigError::Condition { line, source })?;
            set.push(condition);
        }
        IF_OP => {
            let args = d.remaining_args();
            let [value] = args.as_slice() else {
                return Err(ConfigError::ArgCount {
                    line,
                    keyword: IF_OP,
                    expected: 1,
                    found: args.len(),
                });
            };
            let combinator =
                Combinator::parse(value).ok_or_else(|| ConfigError::InvalidCombinator {
                    line,
                    value: value.clone(),
                })?;
            set.set_combinator(combinator);
        }
        _ => d.skip_line(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Operator, ParseError};

    fn cond(a: &str, op: &str, b: &str) -> Condition {
        Condition::new(a, op, b).unwrap()
    }

    #[test]
    fn test_single_condition() {
        let set = parse_directive("test {\n\tif\ta match b\n }").unwrap();
        assert_eq!(set, ConditionSet::new(vec![cond("a", "match", "b")], Combinator::And));

        let c = &set.conditions()[0];
        assert_eq!((c.left(), c.operator(), c.right()), ("a", Operator::Match, "b"));
        assert!(!c.is_negated());
    }

    #[test]
    fn test_if_op_or() {
        let set = parse_directive("test {\n if a match b\n if_op or\n }").unwrap();
        assert_eq!(set.combinator(), Combinator::Or);
        assert_eq!(set.conditions().len(), 1);
    }

    #[test]
    fn test_if_op_before_conditions_and_last_write_wins() {
        let set = parse_directive("test {\n if_op or\n if a is a\n if_op and\n if_op or\n}").unwrap();
        assert_eq!(set.combinator(), Combinator::Or);
        assert_eq!(set.conditions(), [cond("a", "is", "a")]);
    }

    #[test]
    fn test_negated_conditions_in_order() {
        let set =
            parse_directive("test {\n if goal has go\n if cook not_has go\n if_op and\n }").unwrap();
        assert_eq!(
            set,
            ConditionSet::new(
                vec![cond("goal", "has", "go"), cond("cook", "not_has", "go")],
                Combinator::And
            )
        );
        assert!(set.conditions()[1].is_negated());
        assert_eq!(set.conditions()[1].operator(), Operator::Has);
    }

    #[test]
    fn test_wrong_argument_count() {
        assert_eq!(
            parse_directive("test {\n if a match\n }"),
            Err(ConfigError::ArgCount { line: 2, keyword: "if", expected: 3, found: 2 })
        );
        assert_eq!(
            parse_directive("test {\n if a match b c\n }"),
            Err(ConfigError::ArgCount { line: 2, keyword: "if", expected: 3, found: 4 })
        );
        assert_eq!(
            parse_directive("test {\n if_op\n }"),
            Err(ConfigError::ArgCount { line: 2, keyword: "if_op", expected: 1, found: 0 })
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = parse_directive("test {\n if a isn't b\n }").unwrap_err();
        assert_eq!(
            err,
            ConfigError::Condition {
                line: 2,
                source: ParseError::UnknownOperator("isn't".to_string())
            }
        );
        assert_eq!(err.to_string(), "line 2: invalid operator 'isn't'");
    }

    #[test]
    fn test_invalid_if_op() {
        let input = "test {\n if goal has go\n if cook not_has go\n if_op not\n }";
        assert_eq!(
            parse_directive(input),
            Err(ConfigError::InvalidCombinator { line: 4, value: "not".to_string() })
        );
    }

    #[test]
    fn test_foreign_keywords_skipped() {
        let input = "rewrite {\n to /index.html\n if {path} not_has .\n headers {\n if x is y\n }\n}";
        let set = parse_directive(input).unwrap();
        assert_eq!(set.conditions(), [cond("{path}", "not_has", ".")]);
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(parse_directive("test"), Ok(ConditionSet::default()));
        assert_eq!(parse_directive("test {\n}"), Ok(ConditionSet::default()));
        assert_eq!(parse_directive("test {}"), Ok(ConditionSet::default()));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(parse_directive(""), Err(ConfigError::MissingDirective));
        assert_eq!(
            parse_directive("test {\n if a is a\n"),
            Err(ConfigError::UnclosedBlock { line: 1 })
        );
        assert_eq!(
            parse_directive("test {\n}\nextra"),
            Err(ConfigError::UnexpectedToken { line: 3, token: "extra".to_string() })
        );
    }

    #[test]
    fn test_brace_line_in_block_is_rejected() {
        let mut d = Dispenser::new("test {\n if a is a\n {\n x\n }\n if b is b\n}");
        assert!(d.next());
        assert_eq!(
            parse_block(&mut d),
            Err(ConfigError::UnexpectedToken { line: 3, token: "{".to_string() })
        );

        assert_eq!(
            parse_directive("test {\n if a is a\n {\n }\n}"),
            Err(ConfigError::UnexpectedToken { line: 3, token: "{".to_string() })
        );
        assert_eq!(
            parse_lines("if a is a\n{\nif b is b\n}"),
            Err(ConfigError::UnexpectedToken { line: 2, token: "{".to_string() })
        );
    }

    #[test]
    fn test_parse_lines() {
        let set = parse_lines("if {uri} starts_with /api\n\n# admin only\nif {>X-Role} is admin\nif_op or").unwrap();
        assert_eq!(set.conditions().len(), 2);
        assert_eq!(set.combinator(), Combinator::Or);

        assert_eq!(parse_lines(""), Ok(ConditionSet::default()));
        assert_eq!(
            parse_lines("if a is a\n}"),
            Err(ConfigError::UnexpectedToken { line: 2, token: "}".to_string() })
        );
    }

    #[test]
    fn test_quoted_operands() {
        let set = parse_lines(r#"if {>User-Agent} has "Mozilla/5.0 (X11""#).unwrap();
        assert_eq!(set.conditions()[0].right(), "Mozilla/5.0 (X11");
    }

    #[test]
    fn test_owns_keyword() {
        for (keyword, expected) in [
            ("if", true),
            ("ifs", false),
            ("tls", false),
            ("http", false),
            ("if_op", true),
            ("if_type", false),
            ("if_cond", false),
        ] {
            assert_eq!(owns_keyword(keyword), expected, "{keyword}");
        }
    }
}
