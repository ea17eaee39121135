use core::fmt;
use core::hash::{Hash, Hasher};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::TypeError;
use crate::shape::IndexExpr;
use crate::ty::Type;

/// opaque operator attributes carried alongside a relation (conv strides,
/// axis numbers, ...); the solver never interprets them
pub type Attrs = BTreeMap<String, AttrValue>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Shape(Vec<IndexExpr>),
}

/// callback surface the solver hands to relation functions
///
/// `assign` feeds derived equalities back into the unifier; the assert
/// family gives early warning on constant contradictions and trusts
/// anything still symbolic
pub trait TypeReporter {
    /// declare two operand types equal
    fn assign(&mut self, dst: &Type, src: &Type) -> Result<(), TypeError>;

    /// advisory predicate over a shape expression; `false` only for a
    /// constant zero
    fn assert(&mut self, cond: &IndexExpr) -> bool;

    /// advisory equality of two shape expressions; `false` only for a
    /// constant non-zero difference
    fn assert_eq(&mut self, lhs: &IndexExpr, rhs: &IndexExpr) -> bool;
}

/// an operator-specific typing rule
///
/// `args` holds the operand types, the first `num_inputs` of them inputs;
/// return `true` once every output is pinned down, `false` to be retried
/// when more is known about the operands
pub trait RelationFn {
    fn call(
        &self,
        args: &[Type],
        num_inputs: usize,
        attrs: &Attrs,
        reporter: &mut dyn TypeReporter,
    ) -> Result<bool, TypeError>;
}

impl<F> RelationFn for F
where
    F: Fn(&[Type], usize, &Attrs, &mut dyn TypeReporter) -> Result<bool, TypeError>,
{
    fn call(
        &self,
        args: &[Type],
        num_inputs: usize,
        attrs: &Attrs,
        reporter: &mut dyn TypeReporter,
    ) -> Result<bool, TypeError> {
        self(args, num_inputs, attrs, reporter)
    }
}

/// shared handle to a relation function
#[derive(Clone)]
pub struct RelFn(Rc<dyn RelationFn>);

impl RelFn {
    pub fn new(f: impl RelationFn + 'static) -> Self {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn call(
        &self,
        args: &[Type],
        num_inputs: usize,
        attrs: &Attrs,
        reporter: &mut dyn TypeReporter,
    ) -> Result<bool, TypeError> {
        self.0.call(args, num_inputs, attrs, reporter)
    }
}

impl fmt::Debug for RelFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<relation fn>")
    }
}

/// an invocation of a typing rule over `args`
#[derive(Clone, Debug)]
pub struct TypeRelation {
    pub name: String,
    pub func: RelFn,
    pub args: Vec<Type>,
    pub num_inputs: usize,
    pub attrs: Attrs,
}

impl TypeRelation {
    pub fn new(name: impl Into<String>, func: RelFn, args: Vec<Type>, num_inputs: usize) -> Self {
        Self {
            name: name.into(),
            func,
            args,
            num_inputs,
            attrs: Attrs::new(),
        }
    }

    /// copy of this relation with `f` applied to each operand
    pub fn map_args(&self, mut f: impl FnMut(&Type) -> Type) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
            args: self.args.iter().map(|t| f(t)).collect(),
            num_inputs: self.num_inputs,
            attrs: self.attrs.clone(),
        }
    }
}

// the function value is opaque; a relation's identity is its name,
// operands and attributes
impl PartialEq for TypeRelation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.num_inputs == other.num_inputs
            && self.args == other.args
            && self.attrs == other.attrs
    }
}

impl Eq for TypeRelation {}

impl Hash for TypeRelation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.num_inputs.hash(state);
        self.args.hash(state);
        self.attrs.hash(state);
    }
}

impl Serialize for TypeRelation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("TypeRelation", 4)?;
        st.serialize_field("name", &self.name)?;
        st.serialize_field("args", &self.args)?;
        st.serialize_field("num_inputs", &self.num_inputs)?;
        st.serialize_field("attrs", &self.attrs)?;
        st.end()
    }
}

/// constraints the checking pass feeds into the solver
#[derive(Clone, Debug, PartialEq)]
pub enum TypeConstraint {
    /// two types are the same
    Equal(Type, Type),
    /// a typing rule relates several types
    Relation(TypeRelation),
}
