use crate::ty::Type;

/// errors the type language and its solver report; every one of them is
/// fatal to the current inference run, source attribution happens in the
/// enclosing pass
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("unable to unify `{lhs}` and `{rhs}`")]
    Mismatch { lhs: Type, rhs: Type },

    #[error("incomplete type `{var}` occurs in `{ty}`, cannot unify")]
    Occurs { var: Type, ty: Type },

    #[error("type relation `{rel}`: {msg}")]
    Relation { rel: String, msg: String },

    #[error("`{ty}` is not well-kinded: {msg}")]
    Kind { ty: Type, msg: String },
}
