use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::rel::TypeRelation;
use crate::shape::IndexExpr;

/// kinds classify types; the solver only ever compares them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Kind {
    Type,
    BaseType,
    Shape,
    ShapeVar,
    Constraint,
    AdtHead,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "type",
            Self::BaseType => "basetype",
            Self::Shape => "shape",
            Self::ShapeVar => "shapevar",
            Self::Constraint => "constraint",
            Self::AdtHead => "adthead",
        })
    }
}

/// tensor element types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    Float16,
    Float32,
    Float64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::Float16 => "float16",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        })
    }
}

/// identity of a meta-variable; distinct ids are distinct unknowns
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct MetaId(pub usize);

impl fmt::Debug for MetaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl fmt::Display for MetaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// a placeholder the solver will fill in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct IncompleteType {
    pub id: MetaId,
    pub kind: Kind,
}

/// a universally quantified type parameter of a polymorphic function
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TypeVar {
    pub name: String,
    pub kind: Kind,
}

/// head of an algebraic data type
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct GlobalTypeVar {
    pub name: String,
    pub kind: Kind,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct TensorType {
    pub shape: Vec<IndexExpr>,
    pub dtype: DType,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TupleType {
    pub fields: Vec<Type>,
}

/// function type; `type_params` is non-empty only before the solver has
/// dissolved the polymorphism into its graph
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FuncType {
    pub arg_types: Vec<Type>,
    pub ret_type: Box<Type>,
    pub type_params: Vec<TypeVar>,
    pub type_constraints: Vec<TypeRelation>,
}

/// mutable reference cell type
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RefType {
    pub value: Box<Type>,
}

/// application of an ADT head to type arguments
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeCall {
    pub func: Box<Type>,
    pub args: Vec<Type>,
}

/// a type of the IR
///
/// values are structurally immutable; the solver tracks knowledge about
/// them in its own node graph, keyed by structural identity (with
/// meta-variables distinguished by [`MetaId`])
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Incomplete(IncompleteType),
    Var(TypeVar),
    Global(GlobalTypeVar),
    Tensor(TensorType),
    Tuple(TupleType),
    Func(FuncType),
    Ref(RefType),
    Call(TypeCall),
    Relation(TypeRelation),
}

impl Type {
    pub fn incomplete(id: MetaId, kind: Kind) -> Self {
        Self::Incomplete(IncompleteType { id, kind })
    }

    pub fn var(name: impl Into<String>, kind: Kind) -> Self {
        Self::Var(TypeVar {
            name: name.into(),
            kind,
        })
    }

    pub fn tensor(shape: Vec<IndexExpr>, dtype: DType) -> Self {
        Self::Tensor(TensorType { shape, dtype })
    }

    pub fn tuple(fields: Vec<Type>) -> Self {
        Self::Tuple(TupleType { fields })
    }

    pub fn func(arg_types: Vec<Type>, ret_type: Type, type_params: Vec<TypeVar>) -> Self {
        Self::Func(FuncType {
            arg_types,
            ret_type: Box::new(ret_type),
            type_params,
            type_constraints: Vec::new(),
        })
    }

    /// invoke `f` on every direct child type
    pub fn for_each_child<'a>(&'a self, f: &mut impl FnMut(&'a Type)) {
        match self {
            Type::Incomplete(_) | Type::Var(_) | Type::Global(_) | Type::Tensor(_) => {}
            Type::Tuple(tt) => {
                for fld in &tt.fields {
                    f(fld);
                }
            }
            Type::Func(ft) => {
                for arg in &ft.arg_types {
                    f(arg);
                }
                f(&ft.ret_type);
                for c in &ft.type_constraints {
                    for arg in &c.args {
                        f(arg);
                    }
                }
            }
            Type::Ref(rt) => f(&rt.value),
            Type::Call(tc) => {
                f(&tc.func);
                for arg in &tc.args {
                    f(arg);
                }
            }
            Type::Relation(tr) => {
                for arg in &tr.args {
                    f(arg);
                }
            }
        }
    }

    /// free rigid type variables, respecting `type_params` binders
    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut accu = BTreeSet::new();
        self.fv(&mut accu, &mut Vec::new());
        accu
    }

    fn fv(&self, accu: &mut BTreeSet<String>, bound: &mut Vec<String>) {
        match self {
            Type::Incomplete(_) | Type::Global(_) | Type::Tensor(_) => {}
            Type::Var(tv) => {
                if !bound.iter().any(|b| b == &tv.name) {
                    accu.insert(tv.name.clone());
                }
            }
            Type::Func(ft) => {
                let depth = bound.len();
                bound.extend(ft.type_params.iter().map(|p| p.name.clone()));
                for arg in &ft.arg_types {
                    arg.fv(accu, bound);
                }
                ft.ret_type.fv(accu, bound);
                for c in &ft.type_constraints {
                    for arg in &c.args {
                        arg.fv(accu, bound);
                    }
                }
                bound.truncate(depth);
            }
            _ => self.for_each_child(&mut |c| c.fv(accu, bound)),
        }
    }

    /// substitute free type variables by name; nested binders shadow
    pub fn bind(&self, m: &HashMap<String, Type>) -> Type {
        match self {
            Type::Incomplete(_) | Type::Global(_) | Type::Tensor(_) => self.clone(),
            Type::Var(tv) => m.get(&tv.name).cloned().unwrap_or_else(|| self.clone()),
            Type::Tuple(tt) => Type::Tuple(TupleType {
                fields: tt.fields.iter().map(|t| t.bind(m)).collect(),
            }),
            Type::Func(ft) => {
                let inner: HashMap<String, Type> = m
                    .iter()
                    .filter(|(name, _)| !ft.type_params.iter().any(|p| &p.name == *name))
                    .map(|(name, t)| (name.clone(), t.clone()))
                    .collect();
                Type::Func(FuncType {
                    arg_types: ft.arg_types.iter().map(|t| t.bind(&inner)).collect(),
                    ret_type: Box::new(ft.ret_type.bind(&inner)),
                    type_params: ft.type_params.clone(),
                    type_constraints: ft
                        .type_constraints
                        .iter()
                        .map(|c| c.map_args(|t| t.bind(&inner)))
                        .collect(),
                })
            }
            Type::Ref(rt) => Type::Ref(RefType {
                value: Box::new(rt.value.bind(m)),
            }),
            Type::Call(tc) => Type::Call(TypeCall {
                func: Box::new(tc.func.bind(m)),
                args: tc.args.iter().map(|t| t.bind(m)).collect(),
            }),
            Type::Relation(tr) => Type::Relation(tr.map_args(|t| t.bind(m))),
        }
    }
}

fn fmt_list(f: &mut fmt::Formatter<'_>, xs: &[impl fmt::Display]) -> fmt::Result {
    for (n, x) in xs.iter().enumerate() {
        if n > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", x)?;
    }
    Ok(())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Incomplete(it) => write!(f, "{}", it.id),
            Type::Var(tv) => f.write_str(&tv.name),
            Type::Global(gv) => f.write_str(&gv.name),
            Type::Tensor(tt) => {
                f.write_str("Tensor[(")?;
                fmt_list(f, &tt.shape)?;
                write!(f, "), {}]", tt.dtype)
            }
            Type::Tuple(tt) => {
                f.write_str("(")?;
                fmt_list(f, &tt.fields)?;
                f.write_str(")")
            }
            Type::Func(ft) => {
                f.write_str("fn ")?;
                if !ft.type_params.is_empty() {
                    f.write_str("<")?;
                    for (n, p) in ft.type_params.iter().enumerate() {
                        if n > 0 {
                            f.write_str(", ")?;
                        }
                        f.write_str(&p.name)?;
                    }
                    f.write_str(">")?;
                }
                f.write_str("(")?;
                fmt_list(f, &ft.arg_types)?;
                write!(f, ") -> {}", ft.ret_type)?;
                for (n, c) in ft.type_constraints.iter().enumerate() {
                    f.write_str(if n == 0 { " where " } else { ", " })?;
                    write!(f, "{}", Type::Relation(c.clone()))?;
                }
                Ok(())
            }
            Type::Ref(rt) => write!(f, "ref({})", rt.value),
            Type::Call(tc) => {
                write!(f, "{}(", tc.func)?;
                fmt_list(f, &tc.args)?;
                f.write_str(")")
            }
            Type::Relation(tr) => {
                write!(f, "{}(", tr.name)?;
                fmt_list(f, &tr.args)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty{{{}}}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t_i32() -> Type {
        Type::tensor(vec![], DType::Int32)
    }

    #[test]
    fn display() {
        let t = Type::tensor(vec![3.into(), 4.into()], DType::Float32);
        assert_eq!(t.to_string(), "Tensor[(3, 4), float32]");
        let tup = Type::tuple(vec![t, Type::incomplete(MetaId(0), Kind::Type)]);
        assert_eq!(tup.to_string(), "(Tensor[(3, 4), float32], ?0)");
        let ft = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![TypeVar {
                name: "a".to_string(),
                kind: Kind::Type,
            }],
        );
        assert_eq!(ft.to_string(), "fn <a>(a) -> a");
    }

    #[test]
    fn free_vars_shadowing() {
        let inner = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("b", Kind::Type),
            vec![TypeVar {
                name: "a".to_string(),
                kind: Kind::Type,
            }],
        );
        let outer = Type::tuple(vec![inner, Type::var("a", Kind::Type)]);
        let fv = outer.free_vars();
        assert!(fv.contains("a"));
        assert!(fv.contains("b"));
        // the bound occurrence alone must not contribute
        let only_bound = Type::func(
            vec![Type::var("a", Kind::Type)],
            t_i32(),
            vec![TypeVar {
                name: "a".to_string(),
                kind: Kind::Type,
            }],
        );
        assert!(only_bound.free_vars().is_empty());
    }

    #[test]
    fn bind_shadowing() {
        let m: HashMap<String, Type> = [("a".to_string(), t_i32())].into_iter().collect();
        let free = Type::tuple(vec![Type::var("a", Kind::Type)]);
        assert_eq!(free.bind(&m), Type::tuple(vec![t_i32()]));
        let shadowed = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![TypeVar {
                name: "a".to_string(),
                kind: Kind::Type,
            }],
        );
        // the binder protects its own occurrences
        assert_eq!(shadowed.bind(&m), shadowed);
    }
}
