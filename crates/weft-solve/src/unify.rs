use std::collections::HashMap;

use weft_ir::{alpha_eq, FuncType, TupleType, Type, TypeError, TypeVar};

use crate::solver::{NodeId, TypeSolver};

/// rigid variables already instantiated within one unification run
type TvMap = HashMap<TypeVar, Type>;

impl TypeSolver {
    /// unify two types, returning the combined knowledge
    ///
    /// symmetric in outcome: callers must not rely on which argument
    /// ends up naming the class
    pub fn unify(&mut self, dst: &Type, src: &Type) -> Result<Type, TypeError> {
        let mut tv_map = TvMap::new();
        self.unify_with(dst, src, &mut tv_map)
    }

    pub(crate) fn unify_with(
        &mut self,
        dst: &Type,
        src: &Type,
        tv_map: &mut TvMap,
    ) -> Result<Type, TypeError> {
        let dst = self.instantiate(dst, tv_map);
        let src = self.instantiate(src, tv_map);
        let lhs = self.get_type_node(&dst);
        let rhs = self.get_type_node(&src);
        let lhs = self.find_root(lhs);
        let rhs = self.find_root(rhs);
        if lhs == rhs {
            return Ok(self.nodes[lhs.0].resolved_type.clone());
        }
        let lty = self.nodes[lhs.0].resolved_type.clone();
        let rty = self.nodes[rhs.0].resolved_type.clone();
        tracing::debug!("unify {} = {}", lty, rty);
        if matches!(lty, Type::Incomplete(_)) {
            if self.occurs(lhs, &rty) {
                return Err(TypeError::Occurs { var: lty, ty: rty });
            }
            self.merge_from_to(lhs, rhs);
            return Ok(rty);
        }
        if matches!(rty, Type::Incomplete(_)) {
            if self.occurs(rhs, &lty) {
                return Err(TypeError::Occurs { var: rty, ty: lty });
            }
            self.merge_from_to(rhs, lhs);
            return Ok(lty);
        }
        let resolved = self.unify_pair(&lty, &rty, tv_map)?;
        let top = self.get_type_node(&resolved);
        let top = self.find_root(top);
        self.merge_from_to(lhs, top);
        self.merge_from_to(rhs, top);
        Ok(resolved)
    }

    /// structural cases; everything else must already be alpha-equal
    fn unify_pair(
        &mut self,
        lhs: &Type,
        rhs: &Type,
        tv_map: &mut TvMap,
    ) -> Result<Type, TypeError> {
        let mismatch = || TypeError::Mismatch {
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        };
        match (lhs, rhs) {
            (Type::Tuple(a), Type::Tuple(b)) => {
                if a.fields.len() != b.fields.len() {
                    return Err(mismatch());
                }
                let mut fields = Vec::with_capacity(a.fields.len());
                for (x, y) in a.fields.iter().zip(&b.fields) {
                    fields.push(self.unify_with(x, y, tv_map)?);
                }
                Ok(Type::Tuple(TupleType { fields }))
            }
            (Type::Func(a), Type::Func(b)) => {
                if a.arg_types.len() != b.arg_types.len()
                    || a.type_constraints.len() != b.type_constraints.len()
                {
                    return Err(mismatch());
                }
                let a = self.instantiate_func(a, tv_map);
                let b = self.instantiate_func(b, tv_map);
                let ret_type = self.unify_with(&a.ret_type, &b.ret_type, tv_map)?;
                let mut arg_types = Vec::with_capacity(a.arg_types.len());
                for (x, y) in a.arg_types.iter().zip(&b.arg_types) {
                    arg_types.push(self.unify_with(x, y, tv_map)?);
                }
                let mut type_constraints = Vec::with_capacity(a.type_constraints.len());
                for (x, y) in a.type_constraints.iter().zip(&b.type_constraints) {
                    let u = self.unify_with(
                        &Type::Relation(x.clone()),
                        &Type::Relation(y.clone()),
                        tv_map,
                    )?;
                    match u {
                        Type::Relation(r) => type_constraints.push(r),
                        // two constraints unified into a non-constraint
                        _ => return Err(mismatch()),
                    }
                }
                Ok(Type::Func(FuncType {
                    arg_types,
                    ret_type: Box::new(ret_type),
                    type_params: Vec::new(),
                    type_constraints,
                }))
            }
            _ => {
                if alpha_eq(lhs, rhs) {
                    Ok(lhs.clone())
                } else {
                    Err(mismatch())
                }
            }
        }
    }

    /// replace a rigid variable at the head by a meta-variable,
    /// consistently within one unification run
    fn instantiate(&mut self, t: &Type, tv_map: &mut TvMap) -> Type {
        match t {
            Type::Var(tv) => {
                if let Some(hole) = tv_map.get(tv) {
                    return hole.clone();
                }
                let hole = self.fresh_incomplete(tv.kind);
                tv_map.insert(tv.clone(), hole.clone());
                hole
            }
            _ => t.clone(),
        }
    }

    /// dissolve a function's prenex polymorphism into fresh
    /// meta-variables; the result carries no `type_params`
    fn instantiate_func(&mut self, ft: &FuncType, tv_map: &mut TvMap) -> FuncType {
        for p in &ft.type_params {
            if !tv_map.contains_key(p) {
                let hole = self.fresh_incomplete(p.kind);
                tv_map.insert(p.clone(), hole);
            }
        }
        let m: HashMap<String, Type> = ft
            .type_params
            .iter()
            .map(|p| (p.name.clone(), tv_map[p].clone()))
            .collect();
        FuncType {
            arg_types: ft.arg_types.iter().map(|t| t.bind(&m)).collect(),
            ret_type: Box::new(ft.ret_type.bind(&m)),
            type_params: Vec::new(),
            type_constraints: ft
                .type_constraints
                .iter()
                .map(|c| c.map_args(|t| t.bind(&m)))
                .collect(),
        }
    }

    /// does `var`'s class occur anywhere inside `t`, following roots?
    ///
    /// tautologies are screened by the caller, so a hit always means a
    /// recursive equality
    fn occurs(&mut self, var: NodeId, t: &Type) -> bool {
        match t {
            Type::Incomplete(_) => {
                let node = self.get_type_node(t);
                let root = self.find_root(node);
                if root == var {
                    return true;
                }
                let seen = self.nodes[root.0].resolved_type.clone();
                if matches!(seen, Type::Incomplete(_)) {
                    false
                } else {
                    self.occurs(var, &seen)
                }
            }
            _ => {
                let mut found = false;
                t.for_each_child(&mut |c| {
                    if !found {
                        found = self.occurs(var, c);
                    }
                });
                found
            }
        }
    }
}
