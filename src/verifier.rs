/*!
Checks a solver verdict against a formula.

Only satisfiable verdicts are checked. Confirming an UNSAT claim needs a
refutation proof, which the verdict format does not carry, so those are
passed through as [`VerificationOutcome::ReportedUnsat`].
*/

use std::fmt::Display;

use crate::formula::{Assignment, Clause, ClauseIdx, Cnf, Variable, Verdict};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The solver claimed UNSAT; nothing was checked.
    ReportedUnsat,
    /// Every clause has a literal in the assignment.
    Correct,
    /// First clause with no literal in the assignment.
    Incorrect(ClauseIdx),
}

impl Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationOutcome::ReportedUnsat => write!(f, "UNSAT"),
            VerificationOutcome::Correct => write!(f, "Correct answer"),
            VerificationOutcome::Incorrect(index) => {
                write!(f, "Incorrect answer (clause {} violated)", index)
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum InconsistentAssignment {
    #[snafu(display(
        "Assignment sets variables both true and false: {}",
        join_variables(conflicts)
    ))]
    ConflictingPolarity { conflicts: Vec<Variable> },
}

fn join_variables(variables: &[Variable]) -> String {
    variables
        .iter()
        .map(|variable| variable.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn satisfies(assignment: &Assignment, clause: &Clause) -> bool {
    clause.iter().any(|literal| assignment.contains(literal))
}

/// Evaluates `verdict` against every clause of `formula`, in order.
///
/// A clause literal is satisfied only by the identical literal in the
/// assignment. Assignments holding both polarities of a variable are used
/// as-is; see [`verify_consistent`] to reject them.
pub fn verify(formula: &Cnf, verdict: &Verdict) -> VerificationOutcome {
    let assignment = match verdict {
        Verdict::Unsatisfiable => return VerificationOutcome::ReportedUnsat,
        Verdict::Satisfiable(assignment) => assignment,
    };

    for (index, clause) in formula.clauses().iter_enumerated() {
        if !satisfies(assignment, clause) {
            debug!("Clause {} {} is violated", index, clause);
            return VerificationOutcome::Incorrect(index);
        }
        trace!("Clause {} satisfied", index);
    }

    VerificationOutcome::Correct
}

/// Same as [`verify`], but first rejects assignments that contain both `v`
/// and `-v` for some variable.
pub fn verify_consistent(
    formula: &Cnf,
    verdict: &Verdict,
) -> Result<VerificationOutcome, InconsistentAssignment> {
    if let Verdict::Satisfiable(assignment) = verdict {
        let conflicts = assignment.conflicts();
        if !conflicts.is_empty() {
            warn!("{} conflicting variables in assignment", conflicts.len());
            return ConflictingPolarity { conflicts }.fail();
        }
    }

    Ok(verify(formula, verdict))
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::formula::Literal;

    fn lit(num: i64) -> Literal {
        Literal::from_dimacs(num).unwrap()
    }

    fn cnf_of(clauses: &[&[i64]]) -> Cnf {
        let mut cnf = Cnf::new(None);
        for values in clauses {
            cnf.add_clause(Clause::new(values.iter().map(|&value| lit(value)).collect()).unwrap());
        }
        cnf
    }

    fn sat(values: &[i64]) -> Verdict {
        Verdict::Satisfiable(values.iter().map(|&value| lit(value)).collect())
    }

    #[test]
    fn single_unit_clause() {
        let cnf = cnf_of(&[&[5]]);
        assert_eq!(verify(&cnf, &sat(&[5])), VerificationOutcome::Correct);
        assert_eq!(
            verify(&cnf, &sat(&[-5])),
            VerificationOutcome::Incorrect(ClauseIdx::from(0))
        );
    }

    #[test]
    fn reports_first_violated_clause() {
        let cnf = cnf_of(&[&[1, 2], &[-1, 3], &[-2], &[-3]]);
        assert_eq!(
            verify(&cnf, &sat(&[1, -2, -3])),
            VerificationOutcome::Incorrect(ClauseIdx::from(1))
        );
        assert_eq!(
            verify(&cnf, &sat(&[-1, -2, -3])),
            VerificationOutcome::Incorrect(ClauseIdx::from(0))
        );
    }

    #[test]
    fn unassigned_variable_does_not_satisfy() {
        // -2 is satisfied only by the literal -2, not by 2 being absent
        let cnf = cnf_of(&[&[-2]]);
        assert_eq!(
            verify(&cnf, &sat(&[1])),
            VerificationOutcome::Incorrect(ClauseIdx::from(0))
        );
    }

    #[test]
    fn unsat_is_never_checked() {
        let empty = Cnf::new(None);
        assert_eq!(
            verify(&empty, &Verdict::Unsatisfiable),
            VerificationOutcome::ReportedUnsat
        );

        let cnf = cnf_of(&[&[1], &[-1]]);
        assert_eq!(
            verify(&cnf, &Verdict::Unsatisfiable),
            VerificationOutcome::ReportedUnsat
        );
    }

    #[test]
    fn empty_formula_is_satisfied() {
        assert_eq!(
            verify(&Cnf::new(None), &sat(&[])),
            VerificationOutcome::Correct
        );
    }

    #[test]
    fn conflicting_assignment_is_used_as_is() {
        let cnf = cnf_of(&[&[1], &[-1]]);
        let verdict = sat(&[1, -1]);
        assert_eq!(verify(&cnf, &verdict), VerificationOutcome::Correct);

        match verify_consistent(&cnf, &verdict) {
            Err(InconsistentAssignment::ConflictingPolarity { conflicts }) => {
                assert_eq!(conflicts, vec![lit(1).variable()]);
            }
            other => panic!("unexpected result {:?}", other),
        }

        assert_eq!(
            verify_consistent(&cnf, &sat(&[1])).unwrap(),
            VerificationOutcome::Incorrect(ClauseIdx::from(1))
        );
        assert_eq!(
            verify_consistent(&cnf, &Verdict::Unsatisfiable).unwrap(),
            VerificationOutcome::ReportedUnsat
        );
    }

    #[test]
    fn conflict_display() {
        let error = ConflictingPolarity {
            conflicts: vec![lit(2).variable(), lit(-7).variable()],
        }
        .build();
        assert_eq!(
            error.to_string(),
            "Assignment sets variables both true and false: x2, x7"
        );

        let empty = ConflictingPolarity {
            conflicts: Vec::<Variable>::new(),
        }
        .build();
        assert_eq!(
            empty.to_string(),
            "Assignment sets variables both true and false: "
        );
    }

    #[test]
    fn outcome_display() {
        assert_eq!(VerificationOutcome::Correct.to_string(), "Correct answer");
        assert_eq!(VerificationOutcome::ReportedUnsat.to_string(), "UNSAT");
        assert_eq!(
            VerificationOutcome::Incorrect(ClauseIdx::from(3)).to_string(),
            "Incorrect answer (clause #3 violated)"
        );
    }

    /// Evaluates the formula clause by clause with plain integers.
    fn oracle(clauses: &[Vec<i64>], assignment: &[i64]) -> VerificationOutcome {
        for (index, clause) in clauses.iter().enumerate() {
            if !clause.iter().any(|value| assignment.contains(value)) {
                return VerificationOutcome::Incorrect(ClauseIdx::from(index));
            }
        }
        VerificationOutcome::Correct
    }

    #[test]
    fn random_formulas_match_oracle() {
        let mut rng = StdRng::seed_from_u64(0x5a7);

        for _ in 0..500 {
            let num_variables = rng.gen_range(1..=6i64);
            let clauses = (0..rng.gen_range(0..8))
                .map(|_| {
                    (0..rng.gen_range(1..=3))
                        .map(|_| {
                            let variable = rng.gen_range(1..=num_variables);
                            if rng.gen() {
                                variable
                            } else {
                                -variable
                            }
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();
            // some variables may stay unassigned
            let assignment = (1..=num_variables)
                .filter_map(|variable| match rng.gen_range(0..3) {
                    0 => Some(variable),
                    1 => Some(-variable),
                    _ => None,
                })
                .collect::<Vec<_>>();

            let mut cnf = Cnf::new(None);
            for clause in &clauses {
                cnf.add_clause(Clause::new(clause.iter().map(|&value| lit(value)).collect()).unwrap());
            }

            assert_eq!(
                verify(&cnf, &sat(&assignment)),
                oracle(&clauses, &assignment),
                "clauses {:?}, assignment {:?}",
                clauses,
                assignment
            );
        }
    }
}
