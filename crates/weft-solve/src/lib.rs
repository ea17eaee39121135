#![forbid(
    trivial_casts,
    unconditional_recursion,
    unsafe_code,
    unused_must_use,
    clippy::as_conversions,
    clippy::cast_ptr_alignment
)]
#![deny(unused_variables)]

//! Type solver of the weft IR.
//!
//! The checking pass walks expressions and posts [`TypeConstraint`]s:
//! plain equalities, and *relations* carrying an operator's typing rule.
//! [`TypeSolver`] interns every type it sees into a union-find graph of
//! nodes, unifies equal classes (instantiating polymorphic functions on
//! the way), and re-runs relations whose operands gained information
//! until a fixed point, after which [`TypeSolver::resolve`] rewrites any
//! type to its best known form.
//!
//! [`TypeConstraint`]: weft_ir::TypeConstraint

mod propagate;
mod report;
mod resolve;
mod solver;
mod unify;


pub use report::Reporter;
pub use solver::{SolveError, TypeSolver};
