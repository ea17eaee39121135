#![forbid(
    trivial_casts,
    unconditional_recursion,
    unsafe_code,
    unused_must_use,
    clippy::as_conversions,
    clippy::cast_ptr_alignment
)]
#![deny(unused_variables)]

//! Type language of the weft IR.
//!
//! Expressions of the IR are typed with the [`Type`] variants defined here:
//! tensors with symbolic shapes, tuples, functions with prenex polymorphism,
//! ADT heads, and *type relations*: user-supplied predicates which express
//! operator typing rules (shape of a convolution, dtype of a cast, ...).
//!
//! This crate only knows the data and its pure operations (alpha-equality,
//! kind checking, substitution); solving happens in `weft-solve`.

mod alpha;
mod error;
mod kindck;
mod rel;
mod shape;
mod ty;

pub use alpha::alpha_eq;
pub use error::TypeError;
pub use kindck::kind_of;
pub use rel::{AttrValue, Attrs, RelFn, RelationFn, TypeConstraint, TypeRelation, TypeReporter};
pub use shape::IndexExpr;
pub use ty::{
    DType, FuncType, GlobalTypeVar, IncompleteType, Kind, MetaId, RefType, TensorType, TupleType,
    Type, TypeCall, TypeVar,
};
