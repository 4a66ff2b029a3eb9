/*!
File-level checks used by the command line: one instance against one verdict
file, or every instance of a directory against its sibling `.sat` file.
*/

use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use crate::formula::Clause;
use crate::normalize::normalize_instance;
use crate::parser::{parse_instance, parse_verdict, FormatError};
use crate::prelude::*;
use crate::verifier::{verify, verify_consistent, InconsistentAssignment, VerificationOutcome};

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse '{}'", path.display()))]
    ParserError { path: PathBuf, source: FormatError },
    #[snafu(display("Invalid assignment in '{}'", path.display()))]
    AssignmentError {
        path: PathBuf,
        source: InconsistentAssignment,
    },
    #[snafu(display("Solver answer in '{}' is incorrect", path.display()))]
    IncorrectAnswer { path: PathBuf },
    #[snafu(display("{} of {} instances failed the check", failed, total))]
    BatchFailed { failed: usize, total: usize },
}

/// Outcome of one check, with the violated clause when there is one.
#[derive(Debug)]
pub struct Checked {
    pub outcome: VerificationOutcome,
    pub violated: Option<Clause>,
}

impl Display for Checked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.outcome)?;
        if let Some(clause) = &self.violated {
            write!(f, ": {}", clause)?;
        }
        Ok(())
    }
}

fn read_text(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })
}

/// Verdict file written next to an instance: `foo.cnf` -> `foo.sat`.
pub fn verdict_path_for(instance_path: &Path) -> PathBuf {
    instance_path.with_extension("sat")
}

/// Checks one instance file against one verdict file.
///
/// With `strict`, assignments holding both polarities of a variable are
/// rejected instead of evaluated.
pub fn check_pair(instance_path: &Path, verdict_path: &Path, strict: bool) -> Result<Checked, Error> {
    let instance_text = read_text(instance_path)?;
    let formula = parse_instance(&normalize_instance(&instance_text)).context(ParserError {
        path: instance_path.to_owned(),
    })?;

    let verdict = parse_verdict(&read_text(verdict_path)?).context(ParserError {
        path: verdict_path.to_owned(),
    })?;

    let outcome = if strict {
        verify_consistent(&formula, &verdict).context(AssignmentError {
            path: verdict_path.to_owned(),
        })?
    } else {
        verify(&formula, &verdict)
    };

    let violated = match outcome {
        VerificationOutcome::Incorrect(index) => Some(formula.clauses()[index].clone()),
        _ => None,
    };

    Ok(Checked { outcome, violated })
}

/// Fails with `IncorrectAnswer` when `checked` found a violated clause.
pub fn ensure_correct(verdict_path: &Path, checked: &Checked) -> Result<(), Error> {
    ensure!(
        !matches!(checked.outcome, VerificationOutcome::Incorrect(_)),
        IncorrectAnswer {
            path: verdict_path.to_owned(),
        }
    );
    Ok(())
}

/// `.cnf` files directly inside `dir`, sorted by path.
pub fn find_instances(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut instances = Vec::new();
    for entry in fs::read_dir(dir).context(IoError { path: dir.to_owned() })? {
        let path = entry.context(IoError { path: dir.to_owned() })?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "cnf") {
            instances.push(path);
        }
    }
    instances.sort();
    Ok(instances)
}

#[derive(Debug)]
pub struct BatchEntry {
    pub instance: PathBuf,
    pub result: Result<Checked, Error>,
}

impl BatchEntry {
    /// Incorrect answers and unreadable or malformed files both count.
    pub fn failed(&self) -> bool {
        match &self.result {
            Ok(checked) => matches!(checked.outcome, VerificationOutcome::Incorrect(_)),
            Err(_) => true,
        }
    }
}

/// Checks every instance in `dir` against its sibling verdict file.
///
/// A failing pair does not stop the batch; only listing the directory can.
pub fn check_directory(dir: &Path, strict: bool) -> Result<Vec<BatchEntry>, Error> {
    let instances = find_instances(dir)?;
    info!("Found {} instances in '{}'", instances.len(), dir.display());

    Ok(instances
        .into_iter()
        .map(|instance| {
            let result = check_pair(&instance, &verdict_path_for(&instance), strict);
            BatchEntry { instance, result }
        })
        .collect())
}

/// Fails with `BatchFailed` if any entry failed.
pub fn batch_status(entries: &[BatchEntry]) -> Result<(), Error> {
    let failed: usize = entries.iter().filter(|entry| entry.failed()).count();
    ensure!(
        failed == 0,
        BatchFailed {
            failed,
            total: entries.len(),
        }
    );
    Ok(())
}
