use std::collections::BTreeMap;

use crate::rel::TypeRelation;
use crate::ty::Type;

/// structural equality up to consistent renaming of bound type variables
pub fn alpha_eq(a: &Type, b: &Type) -> bool {
    AlphaEq::default().types(a, b)
}

/// bound variables are tracked per side as binder-order indices, so two
/// functions agree iff their parameters are used in the same positions
#[derive(Default)]
struct AlphaEq {
    lhs: BTreeMap<String, usize>,
    rhs: BTreeMap<String, usize>,
    depth: usize,
}

impl AlphaEq {
    fn types(&mut self, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::Incomplete(x), Type::Incomplete(y)) => x.id == y.id,
            (Type::Var(x), Type::Var(y)) => {
                x.kind == y.kind
                    && match (self.lhs.get(&x.name), self.rhs.get(&y.name)) {
                        (Some(i), Some(j)) => i == j,
                        // both free: rigid variables stand for themselves
                        (None, None) => x.name == y.name,
                        _ => false,
                    }
            }
            (Type::Global(x), Type::Global(y)) => x == y,
            (Type::Tensor(x), Type::Tensor(y)) => x == y,
            (Type::Tuple(x), Type::Tuple(y)) => {
                x.fields.len() == y.fields.len()
                    && x.fields
                        .iter()
                        .zip(&y.fields)
                        .all(|(s, t)| self.types(s, t))
            }
            (Type::Func(x), Type::Func(y)) => {
                if x.arg_types.len() != y.arg_types.len()
                    || x.type_params.len() != y.type_params.len()
                    || x.type_constraints.len() != y.type_constraints.len()
                    || x.type_params
                        .iter()
                        .zip(&y.type_params)
                        .any(|(p, q)| p.kind != q.kind)
                {
                    return false;
                }
                let saved = (self.lhs.clone(), self.rhs.clone());
                for (p, q) in x.type_params.iter().zip(&y.type_params) {
                    self.lhs.insert(p.name.clone(), self.depth);
                    self.rhs.insert(q.name.clone(), self.depth);
                    self.depth += 1;
                }
                let ok = x
                    .arg_types
                    .iter()
                    .zip(&y.arg_types)
                    .all(|(s, t)| self.types(s, t))
                    && self.types(&x.ret_type, &y.ret_type)
                    && x.type_constraints
                        .iter()
                        .zip(&y.type_constraints)
                        .all(|(s, t)| self.relations(s, t));
                (self.lhs, self.rhs) = saved;
                ok
            }
            (Type::Ref(x), Type::Ref(y)) => self.types(&x.value, &y.value),
            (Type::Call(x), Type::Call(y)) => {
                x.args.len() == y.args.len()
                    && self.types(&x.func, &y.func)
                    && x.args.iter().zip(&y.args).all(|(s, t)| self.types(s, t))
            }
            (Type::Relation(x), Type::Relation(y)) => self.relations(x, y),
            _ => false,
        }
    }

    fn relations(&mut self, x: &TypeRelation, y: &TypeRelation) -> bool {
        x.name == y.name
            && x.num_inputs == y.num_inputs
            && x.attrs == y.attrs
            && x.args.len() == y.args.len()
            && x.args.iter().zip(&y.args).all(|(s, t)| self.types(s, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{DType, Kind, MetaId, TypeVar};

    fn tv(name: &str) -> TypeVar {
        TypeVar {
            name: name.to_string(),
            kind: Kind::Type,
        }
    }

    #[test]
    fn tensor() {
        let a = Type::tensor(vec![3.into(), 4.into()], DType::Float32);
        let b = Type::tensor(vec![3.into(), 4.into()], DType::Float32);
        let c = Type::tensor(vec![3.into(), 5.into()], DType::Float32);
        assert!(alpha_eq(&a, &b));
        assert!(!alpha_eq(&a, &c));
    }

    #[test]
    fn renamed_params() {
        let f = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![tv("a")],
        );
        let g = Type::func(
            vec![Type::var("b", Kind::Type)],
            Type::var("b", Kind::Type),
            vec![tv("b")],
        );
        assert!(alpha_eq(&f, &g));
    }

    #[test]
    fn param_positions_matter() {
        let f = Type::func(
            vec![Type::var("a", Kind::Type), Type::var("b", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![tv("a"), tv("b")],
        );
        let g = Type::func(
            vec![Type::var("x", Kind::Type), Type::var("y", Kind::Type)],
            Type::var("y", Kind::Type),
            vec![tv("x"), tv("y")],
        );
        assert!(!alpha_eq(&f, &g));
    }

    #[test]
    fn free_vars_by_name() {
        let a = Type::var("a", Kind::Type);
        let b = Type::var("b", Kind::Type);
        assert!(alpha_eq(&a, &a.clone()));
        assert!(!alpha_eq(&a, &b));
    }

    #[test]
    fn incomplete_by_identity() {
        let x = Type::incomplete(MetaId(0), Kind::Type);
        let y = Type::incomplete(MetaId(1), Kind::Type);
        assert!(alpha_eq(&x, &x.clone()));
        assert!(!alpha_eq(&x, &y));
    }

    #[test]
    fn bound_vs_free() {
        // `a` bound on one side, free on the other
        let f = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![tv("a")],
        );
        let g = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![],
        );
        assert!(!alpha_eq(&f, &g));
    }
}
