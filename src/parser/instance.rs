use super::{parse_terminated, EmptyClause, FormatError};
use crate::formula::{Clause, Cnf, Header};
use crate::prelude::*;

/// Parses `p cnf <num_variables> <num_clauses>`.
fn parse_header(line: &str) -> Option<Header> {
    let splitted = line.split_whitespace().collect::<Vec<_>>();

    // We only support CNF DIMACS format
    if splitted.len() != 4 || splitted[0] != "p" || splitted[1] != "cnf" {
        return None;
    }

    match (splitted[2].parse::<usize>(), splitted[3].parse::<usize>()) {
        (Ok(num_variables), Ok(num_clauses)) => Some(Header {
            num_variables,
            num_clauses,
        }),
        _ => None,
    }
}

/// Parses a CNF formula from DIMACS text.
///
/// Problem lines, comment lines and blank lines are skipped. Every other line
/// holds exactly one 0-terminated clause. The problem line is kept as advisory
/// metadata only; disagreement with the actual clauses is logged, not rejected.
pub fn parse_instance(text: &str) -> Result<Cnf, FormatError> {
    let mut header = None;
    let mut clauses = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            // empty line, comment
            continue;
        }

        if trimmed.starts_with('p') {
            match parse_header(trimmed) {
                Some(parsed) if header.is_none() => header = Some(parsed),
                Some(_) => warn!("Ignoring repeated problem line {}", line_number),
                None => warn!("Ignoring malformed problem line '{}'", trimmed),
            }
            continue;
        }

        let literals = parse_terminated(line_number, trimmed, trimmed)?;
        let clause = Clause::new(literals).context(EmptyClause { line: line_number })?;
        clauses.push(clause);
    }

    let mut cnf = Cnf::new(header);
    for clause in clauses {
        cnf.add_clause(clause);
    }

    if let Some(header) = header {
        if header.num_clauses != cnf.clauses().len() {
            warn!(
                "Problem line declares {} clauses but {} were found",
                header.num_clauses,
                cnf.clauses().len()
            );
        }
        if header.num_variables < cnf.max_variable() {
            warn!(
                "Problem line declares {} variables but x{} is used",
                header.num_variables,
                cnf.max_variable()
            );
        }
    }

    debug!(
        "Parsed {} clauses over {} variables",
        cnf.clauses().len(),
        cnf.num_variables()
    );

    Ok(cnf)
}
