/*!
Parsers for the two DIMACS text formats the checker consumes:
CNF instances and solver verdicts.
*/

use crate::formula::{Literal, LiteralParseError};
use crate::prelude::*;

pub mod instance;
pub mod verdict;

pub use instance::parse_instance;
pub use verdict::parse_verdict;

#[derive(Debug, Snafu)]
pub enum FormatError {
    #[snafu(display("Line {} is not terminated by 0: '{}'", line, content))]
    MissingTerminator { line: usize, content: String },
    #[snafu(display("Line {} has 0 before its last token: '{}'", line, content))]
    MisplacedTerminator { line: usize, content: String },
    #[snafu(display("Line {} contains an empty clause", line))]
    EmptyClause { line: usize },
    #[snafu(display("Invalid literal '{}' on line {}", token, line))]
    MalformedLiteral {
        line: usize,
        token: String,
        source: LiteralParseError,
    },
    #[snafu(display("Verdict is empty"))]
    MissingStatusLine,
    #[snafu(display("Satisfiable verdict has no assignment line"))]
    MissingAssignmentLine,
    #[snafu(display("Assignment line must start with 'v ': '{}'", content))]
    MalformedAssignmentLine { content: String },
}

fn is_terminator(token: &str) -> bool {
    matches!(token.parse::<i64>(), Ok(0))
}

/// Parses a whitespace-separated, 0-terminated literal list.
///
/// `line` and `content` only feed the error messages; `body` is what gets
/// tokenized.
fn parse_terminated(line: usize, content: &str, body: &str) -> Result<Vec<Literal>, FormatError> {
    let tokens = body.split_whitespace().collect::<Vec<_>>();

    let (last, literals) = tokens.split_last().context(MissingTerminator {
        line,
        content: content.to_owned(),
    })?;
    ensure!(
        is_terminator(last),
        MissingTerminator {
            line,
            content: content.to_owned(),
        }
    );

    let mut parsed = Vec::with_capacity(literals.len());
    for token in literals {
        ensure!(
            !is_terminator(token),
            MisplacedTerminator {
                line,
                content: content.to_owned(),
            }
        );
        parsed.push(token.parse::<Literal>().context(MalformedLiteral {
            line,
            token: (*token).to_owned(),
        })?);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimacs(literals: &[Literal]) -> Vec<i64> {
        literals.iter().map(Literal::to_dimacs).collect()
    }

    #[test]
    fn terminated_list() {
        let literals = parse_terminated(1, "", "3  -1\t2 0").unwrap();
        assert_eq!(dimacs(&literals), vec![3, -1, 2]);

        assert!(parse_terminated(1, "", "0").unwrap().is_empty());
    }

    #[test]
    fn terminator_errors() {
        assert!(matches!(
            parse_terminated(4, "1 2", "1 2"),
            Err(FormatError::MissingTerminator { line: 4, .. })
        ));
        assert!(matches!(
            parse_terminated(1, "", ""),
            Err(FormatError::MissingTerminator { .. })
        ));
        assert!(matches!(
            parse_terminated(2, "1 0 2 0", "1 0 2 0"),
            Err(FormatError::MisplacedTerminator { line: 2, .. })
        ));
    }

    #[test]
    fn bad_literal() {
        match parse_terminated(7, "1 a 0", "1 a 0") {
            Err(FormatError::MalformedLiteral { line, token, .. }) => {
                assert_eq!(line, 7);
                assert_eq!(token, "a");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
