use weft_ir::Type;

use crate::solver::{RelId, TypeSolver};

impl TypeSolver {
    /// link `rid` to the node of `t` and of every nested type whose
    /// refinement could make the relation computable
    ///
    /// tuples and functions are transparent; every other variant
    /// attaches as a leaf
    pub(crate) fn propagate(&mut self, rid: RelId, t: &Type) {
        self.attach(rid, t);
        match t {
            Type::Tuple(tt) => {
                for fld in &tt.fields {
                    self.propagate(rid, fld);
                }
            }
            Type::Func(ft) => {
                self.propagate(rid, &ft.ret_type);
                for arg in &ft.arg_types {
                    self.propagate(rid, arg);
                }
                for p in &ft.type_params {
                    self.propagate(rid, &Type::Var(p.clone()));
                }
                for c in &ft.type_constraints {
                    self.propagate(rid, &Type::Relation(c.clone()));
                }
            }
            _ => {}
        }
    }

    fn attach(&mut self, rid: RelId, t: &Type) {
        let node = self.get_type_node(t);
        self.nodes[node.0].rel_list.push(rid);
    }
}
