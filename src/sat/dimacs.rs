//! Writing formulas in the DIMACS CNF text format.
//!
//! The format is the lingua franca of SAT tooling: a `p cnf <vars>
//! <clauses>` problem line followed by one line per clause, literals as
//! signed integers, each clause terminated by `0`. Exporting the planner's
//! current encoding lets any off-the-shelf solver or proof checker look at
//! the same formula the built-in engine sees.

use crate::sat::solver::Clause;
use itertools::Itertools;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// Renders clauses as DIMACS CNF text.
#[must_use]
pub fn to_dimacs<'a>(clauses: impl IntoIterator<Item = &'a Clause>, max_var: i32) -> String {
    let clauses: Vec<&Clause> = clauses.into_iter().collect();
    let mut out = String::new();
    let _ = writeln!(out, "p cnf {} {}", max_var, clauses.len());
    for clause in clauses {
        let _ = writeln!(out, "{} 0", clause.iter().join(" "));
    }
    out
}

/// Writes clauses to a DIMACS CNF file.
///
/// # Errors
///
/// Returns an [`io::Error`] if the file cannot be written.
pub fn write_file<'a>(
    path: impl AsRef<Path>,
    clauses: impl IntoIterator<Item = &'a Clause>,
    max_var: i32,
) -> io::Result<()> {
    std::fs::write(path, to_dimacs(clauses, max_var))
}
