/*!
Data model shared by the parsers and the verifier: literals, clauses,
formulas in conjunctive normal form, assignments and solver verdicts.
*/

use std::{
    collections::HashSet,
    convert::TryFrom,
    fmt::Display,
    iter::FromIterator,
    num::NonZeroU32,
    str::FromStr,
};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum LiteralParseError {
    #[snafu(display("Failed to parse literal as an integer"))]
    ParseIntError { source: std::num::ParseIntError },
    #[snafu(display("Literal 0 is reserved for the clause terminator"))]
    ZeroLiteral,
    #[snafu(display(
        "Variable ID {} is out of range (must be within 1 to {})",
        num,
        Variable::MAX_VARIABLE_ID
    ))]
    RangeError { num: u64 },
}

/// Newtype wrapper for variable ID.
/// Invariant: 0 < ID <= MAX_VARIABLE_ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroU32);

impl Variable {
    pub const MAX_VARIABLE_ID: u64 = std::u32::MAX as u64;

    /// Creates a variable from its DIMACS ID.
    /// Returns `None` if the ID is out of range.
    pub fn new(id: u64) -> Option<Self> {
        let id = u32::try_from(id).ok()?;
        NonZeroU32::new(id).map(Variable)
    }

    pub fn id(&self) -> u32 {
        self.0.get()
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    id: Variable,
    positive: bool,
}

impl Literal {
    /// Converts a nonzero DIMACS integer to a literal.
    pub fn from_dimacs(num: i64) -> Result<Self, LiteralParseError> {
        ensure!(num != 0, ZeroLiteral);

        let magnitude = num.unsigned_abs();
        let id = Variable::new(magnitude).context(RangeError { num: magnitude })?;

        Ok(Literal {
            id,
            positive: num > 0,
        })
    }

    /// Signed integer form used by the DIMACS formats.
    pub fn to_dimacs(&self) -> i64 {
        let id = i64::from(self.id.id());
        if self.positive {
            id
        } else {
            -id
        }
    }

    pub fn variable(&self) -> Variable {
        self.id
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl FromStr for Literal {
    type Err = LiteralParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let num = s.parse::<i64>().context(ParseIntError)?;
        Literal::from_dimacs(num)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.positive { "" } else { "¬" }, self.id)
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            id: self.id,
            positive: !self.positive,
        }
    }
}

/// Disjunction of literals.
/// Invariant: at least one literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    /// Returns `None` for an empty literal list.
    pub fn new(literals: Vec<Literal>) -> Option<Self> {
        if literals.is_empty() {
            None
        } else {
            Some(Self { literals })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Literal> + '_ {
        self.literals.iter().copied()
    }

    pub fn to_dimacs(&self) -> String {
        let mut tokens = self
            .iter()
            .map(|literal| literal.to_dimacs().to_string())
            .collect::<Vec<_>>();
        tokens.push("0".to_owned());
        tokens.join(" ")
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Position of a clause in its formula, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseIdx(usize);

impl From<usize> for ClauseIdx {
    fn from(index: usize) -> Self {
        ClauseIdx(index)
    }
}

impl From<ClauseIdx> for usize {
    fn from(index: ClauseIdx) -> Self {
        index.0
    }
}

impl Display for ClauseIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Counts declared by a `p cnf <num_variables> <num_clauses>` line.
/// These are advisory and never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub num_variables: usize,
    pub num_clauses: usize,
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone, Default)]
pub struct Cnf {
    header: Option<Header>,
    clauses: TiVec<ClauseIdx, Clause>,
}

impl Cnf {
    pub fn new(header: Option<Header>) -> Self {
        Cnf {
            header,
            clauses: TiVec::new(),
        }
    }

    pub fn header(&self) -> Option<Header> {
        self.header
    }

    pub fn clauses(&self) -> &TiVec<ClauseIdx, Clause> {
        &self.clauses
    }

    pub fn add_clause(&mut self, clause: Clause) -> ClauseIdx {
        let index = ClauseIdx::from(self.clauses.len());
        self.clauses.push(clause);
        index
    }

    /// Largest variable ID mentioned by any clause, 0 for an empty formula.
    pub fn max_variable(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(|clause| clause.iter())
            .map(|literal| literal.variable().id() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Declared variable count, or the largest variable ID if there is no header.
    pub fn num_variables(&self) -> usize {
        match self.header {
            Some(header) => header.num_variables,
            None => self.max_variable(),
        }
    }

    /// Serializes the formula as DIMACS CNF text.
    pub fn to_dimacs(&self) -> String {
        let mut text = format!("p cnf {} {}\n", self.num_variables(), self.clauses.len());
        for clause in self.clauses.iter() {
            text.push_str(&clause.to_dimacs());
            text.push('\n');
        }
        text
    }
}

impl Display for Cnf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CNF with {} variables (", self.num_variables())?;

        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Set of literals a solver declared true.
///
/// Nothing prevents both polarities of a variable from being present;
/// use [`Assignment::conflicts`] to find them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    literals: HashSet<Literal>,
}

impl Assignment {
    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Variables assigned both true and false, in ascending order.
    pub fn conflicts(&self) -> Vec<Variable> {
        let mut conflicts = self
            .literals
            .iter()
            .filter(|literal| literal.positive() && self.contains(!**literal))
            .map(|literal| literal.variable())
            .collect::<Vec<_>>();
        conflicts.sort();
        conflicts
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<T: IntoIterator<Item = Literal>>(iter: T) -> Self {
        Assignment {
            literals: iter.into_iter().collect(),
        }
    }
}

/// Result claimed by a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Unsatisfiable,
    Satisfiable(Assignment),
}
