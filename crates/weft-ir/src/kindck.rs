use crate::error::TypeError;
use crate::ty::{Kind, Type};

/// compute the kind of `t`, rejecting ill-formed types
///
/// tuple fields, function arguments and results, and reference payloads
/// must all be proper types; a type call must apply an ADT head
pub fn kind_of(t: &Type) -> Result<Kind, TypeError> {
    match t {
        Type::Incomplete(it) => Ok(it.kind),
        Type::Var(tv) => Ok(tv.kind),
        Type::Global(gv) => Ok(gv.kind),
        Type::Tensor(_) => Ok(Kind::Type),
        Type::Tuple(tt) => {
            for fld in &tt.fields {
                expect(fld, Kind::Type)?;
            }
            Ok(Kind::Type)
        }
        Type::Func(ft) => {
            for arg in &ft.arg_types {
                expect(arg, Kind::Type)?;
            }
            expect(&ft.ret_type, Kind::Type)?;
            for c in &ft.type_constraints {
                for arg in &c.args {
                    kind_of(arg)?;
                }
            }
            Ok(Kind::Type)
        }
        Type::Ref(rt) => {
            expect(&rt.value, Kind::Type)?;
            Ok(Kind::Type)
        }
        Type::Call(tc) => {
            expect(&tc.func, Kind::AdtHead)?;
            for arg in &tc.args {
                expect(arg, Kind::Type)?;
            }
            Ok(Kind::Type)
        }
        Type::Relation(tr) => {
            for arg in &tr.args {
                kind_of(arg)?;
            }
            Ok(Kind::Constraint)
        }
    }
}

fn expect(t: &Type, want: Kind) -> Result<(), TypeError> {
    let got = kind_of(t)?;
    if got == want {
        Ok(())
    } else {
        Err(TypeError::Kind {
            ty: t.clone(),
            msg: format!("expected kind {}, found {}", want, got),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{DType, GlobalTypeVar, MetaId, TypeCall};

    #[test]
    fn tensor_and_tuple() {
        let t = Type::tensor(vec![3.into()], DType::Float32);
        assert_eq!(kind_of(&t), Ok(Kind::Type));
        let tup = Type::tuple(vec![t, Type::incomplete(MetaId(0), Kind::Type)]);
        assert_eq!(kind_of(&tup), Ok(Kind::Type));
    }

    #[test]
    fn shape_var_in_tuple_rejected() {
        let tup = Type::tuple(vec![Type::var("n", Kind::ShapeVar)]);
        assert!(matches!(kind_of(&tup), Err(TypeError::Kind { .. })));
    }

    #[test]
    fn adt_application() {
        let head = Type::Global(GlobalTypeVar {
            name: "List".to_string(),
            kind: Kind::AdtHead,
        });
        let good = Type::Call(TypeCall {
            func: Box::new(head),
            args: vec![Type::tensor(vec![], DType::Int32)],
        });
        assert_eq!(kind_of(&good), Ok(Kind::Type));

        let bad = Type::Call(TypeCall {
            func: Box::new(Type::tensor(vec![], DType::Int32)),
            args: vec![],
        });
        assert!(matches!(kind_of(&bad), Err(TypeError::Kind { .. })));
    }

    #[test]
    fn func() {
        let f = Type::func(
            vec![Type::var("a", Kind::Type)],
            Type::var("a", Kind::Type),
            vec![],
        );
        assert_eq!(kind_of(&f), Ok(Kind::Type));
    }
}
