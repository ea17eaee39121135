use weft_ir::{IndexExpr, Type, TypeError, TypeReporter};

use crate::solver::TypeSolver;

/// borrowed handle relation functions talk back through; lives only for
/// the duration of one relation invocation
pub struct Reporter<'a> {
    solver: &'a mut TypeSolver,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(solver: &'a mut TypeSolver) -> Self {
        Self { solver }
    }
}

impl TypeReporter for Reporter<'_> {
    fn assign(&mut self, dst: &Type, src: &Type) -> Result<(), TypeError> {
        self.solver.unify(dst, src)?;
        Ok(())
    }

    fn assert(&mut self, cond: &IndexExpr) -> bool {
        match cond.as_const() {
            Some(v) => v != 0,
            // not an arithmetic prover: symbolic conditions are trusted
            None => true,
        }
    }

    fn assert_eq(&mut self, lhs: &IndexExpr, rhs: &IndexExpr) -> bool {
        if lhs == rhs {
            return true;
        }
        match (lhs.clone() - rhs.clone()).as_const() {
            Some(diff) => diff == 0,
            None => true,
        }
    }
}
