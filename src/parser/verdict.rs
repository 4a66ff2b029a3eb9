use super::{
    parse_terminated, FormatError, MalformedAssignmentLine, MissingAssignmentLine,
    MissingStatusLine,
};
use crate::formula::{Assignment, Verdict};
use crate::prelude::*;

const UNSAT_MARKER: &str = "UNSAT";
const VALUE_PREFIX: &str = "v ";

/// Parses a solver verdict.
///
/// The first line decides the branch: anything containing `UNSAT` is an
/// unsatisfiable verdict and the rest of the text is ignored. Otherwise the
/// second line must be a `v `-prefixed, 0-terminated list of true literals.
pub fn parse_verdict(text: &str) -> Result<Verdict, FormatError> {
    let mut lines = text.lines();

    let status = lines.next().context(MissingStatusLine)?;
    if status.contains(UNSAT_MARKER) {
        debug!("Solver reported UNSAT");
        return Ok(Verdict::Unsatisfiable);
    }

    let values = lines.next().context(MissingAssignmentLine)?;
    let body = values
        .strip_prefix(VALUE_PREFIX)
        .context(MalformedAssignmentLine {
            content: values.to_owned(),
        })?;

    let assignment = parse_terminated(2, values, body)?
        .into_iter()
        .collect::<Assignment>();

    debug!("Solver reported SAT with {} literals", assignment.len());

    Ok(Verdict::Satisfiable(assignment))
}
