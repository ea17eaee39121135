use core::fmt;
use core::ops;
use serde::{Deserialize, Serialize};

/// symbolic shape/value expression
///
/// relations reason about these only as far as constant folding carries;
/// anything still symbolic after folding is trusted by the solver
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum IndexExpr {
    Const(i64),
    Var(String),
    Add(Box<IndexExpr>, Box<IndexExpr>),
    Sub(Box<IndexExpr>, Box<IndexExpr>),
    Mul(Box<IndexExpr>, Box<IndexExpr>),
}

impl IndexExpr {
    /// fold to a constant if no symbolic dimension is involved
    pub fn as_const(&self) -> Option<i64> {
        Some(match self {
            Self::Const(v) => *v,
            Self::Var(_) => return None,
            Self::Add(a, b) => a.as_const()?.checked_add(b.as_const()?)?,
            Self::Sub(a, b) => a.as_const()?.checked_sub(b.as_const()?)?,
            Self::Mul(a, b) => a.as_const()?.checked_mul(b.as_const()?)?,
        })
    }
}

impl From<i64> for IndexExpr {
    #[inline]
    fn from(v: i64) -> Self {
        Self::Const(v)
    }
}

impl ops::Add for IndexExpr {
    type Output = IndexExpr;
    fn add(self, rhs: Self) -> IndexExpr {
        IndexExpr::Add(Box::new(self), Box::new(rhs))
    }
}

impl ops::Sub for IndexExpr {
    type Output = IndexExpr;
    fn sub(self, rhs: Self) -> IndexExpr {
        IndexExpr::Sub(Box::new(self), Box::new(rhs))
    }
}

impl ops::Mul for IndexExpr {
    type Output = IndexExpr;
    fn mul(self, rhs: Self) -> IndexExpr {
        IndexExpr::Mul(Box::new(self), Box::new(rhs))
    }
}

impl fmt::Display for IndexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(v) => write!(f, "{}", v),
            Self::Var(name) => f.write_str(name),
            Self::Add(a, b) => write!(f, "({} + {})", a, b),
            Self::Sub(a, b) => write!(f, "({} - {})", a, b),
            Self::Mul(a, b) => write!(f, "({} * {})", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_const() {
        let e = (IndexExpr::from(2) + 3.into()) * 4.into();
        assert_eq!(e.as_const(), Some(20));
        assert_eq!(e.to_string(), "((2 + 3) * 4)");
    }

    #[test]
    fn fold_symbolic() {
        let n = IndexExpr::Var("n".to_string());
        let e = n.clone() - n;
        // no arithmetic simplifier here, symbolic stays symbolic
        assert_eq!(e.as_const(), None);
    }

    #[test]
    fn fold_sub() {
        let e = IndexExpr::from(7) - 7.into();
        assert_eq!(e.as_const(), Some(0));
    }
}
