use weft_ir::{FuncType, RefType, TupleType, Type, TypeCall};

use crate::solver::TypeSolver;

impl TypeSolver {
    /// best known form of `t`: every meta-variable is replaced by its
    /// root's canonical type, recursively
    ///
    /// idempotent; types the solver has never seen pass through with
    /// only their meta-variables rewritten
    pub fn resolve(&mut self, t: &Type) -> Type {
        let known = match self.tmap.get(t).copied() {
            Some(id) => {
                let root = self.find_root(id);
                self.nodes[root.0].resolved_type.clone()
            }
            None => t.clone(),
        };
        self.rewrite(&known)
    }

    fn rewrite(&mut self, t: &Type) -> Type {
        match t {
            Type::Incomplete(_) => {
                let node = self.get_type_node(t);
                let root = self.find_root(node);
                let known = self.nodes[root.0].resolved_type.clone();
                if matches!(known, Type::Incomplete(_)) {
                    // still unknown, the root meta is the canonical name
                    known
                } else {
                    self.rewrite(&known)
                }
            }
            Type::Var(_) | Type::Global(_) | Type::Tensor(_) => t.clone(),
            Type::Tuple(tt) => Type::Tuple(TupleType {
                fields: tt.fields.iter().map(|x| self.rewrite(x)).collect(),
            }),
            Type::Func(ft) => Type::Func(FuncType {
                arg_types: ft.arg_types.iter().map(|x| self.rewrite(x)).collect(),
                ret_type: Box::new(self.rewrite(&ft.ret_type)),
                type_params: ft.type_params.clone(),
                type_constraints: ft
                    .type_constraints
                    .iter()
                    .map(|c| c.map_args(|x| self.rewrite(x)))
                    .collect(),
            }),
            Type::Ref(rt) => Type::Ref(RefType {
                value: Box::new(self.rewrite(&rt.value)),
            }),
            Type::Call(tc) => Type::Call(TypeCall {
                func: Box::new(self.rewrite(&tc.func)),
                args: tc.args.iter().map(|x| self.rewrite(x)).collect(),
            }),
            Type::Relation(tr) => Type::Relation(tr.map_args(|x| self.rewrite(x))),
        }
    }
}
