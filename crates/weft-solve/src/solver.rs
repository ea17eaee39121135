use core::fmt;
use std::collections::{HashMap, VecDeque};

use weft_ir::{IncompleteType, Kind, MetaId, Type, TypeConstraint, TypeError, TypeRelation};

use crate::report::Reporter;

/// handle of an interned type node
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(pub(crate) usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$t{}", self.0)
    }
}

/// handle of a scheduled relation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RelId(pub(crate) usize);

impl fmt::Debug for RelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$r{}", self.0)
    }
}

/// union-find node owning the current best knowledge of one type;
/// only the root of a class speaks for it
pub(crate) struct TypeNode {
    pub(crate) resolved_type: Type,
    pub(crate) parent: NodeId,
    /// relations to wake when this class gains information
    pub(crate) rel_list: Vec<RelId>,
}

/// one scheduled invocation of a typing rule
pub(crate) struct RelationNode {
    pub(crate) rel: TypeRelation,
    pub(crate) type_list: Vec<NodeId>,
    pub(crate) inqueue: bool,
    pub(crate) resolved: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("no fixed point after {limit} relation updates")]
    NoConvergence { limit: usize },
}

/// unification and relation-propagation engine
///
/// nodes and relations are allocated monotonically and torn down
/// together with the solver; single-threaded and batch-oriented
pub struct TypeSolver {
    pub(crate) nodes: Vec<TypeNode>,
    pub(crate) rels: Vec<RelationNode>,
    /// interner: every externally seen type value owns exactly one node
    pub(crate) tmap: HashMap<Type, NodeId>,
    queue: VecDeque<RelId>,
    num_resolved: usize,
    fresh_metas: core::ops::RangeFrom<usize>,
    step_limit: usize,
}

impl Default for TypeSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeSolver {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rels: Vec::new(),
            tmap: HashMap::new(),
            queue: VecDeque::new(),
            num_resolved: 0,
            fresh_metas: 0..,
            step_limit: 4096,
        }
    }

    /// cap on relation invocations per [`solve`](Self::solve) run
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// mint a meta-variable no other party has seen yet
    pub fn fresh_incomplete(&mut self, kind: Kind) -> Type {
        let id = self.fresh_metas.next().unwrap();
        Type::Incomplete(IncompleteType {
            id: MetaId(id),
            kind,
        })
    }

    /// look up or intern the node owning `t`
    pub(crate) fn get_type_node(&mut self, t: &Type) -> NodeId {
        if let Some(&id) = self.tmap.get(t) {
            return id;
        }
        if let Type::Incomplete(it) = t {
            // keep fresh ids ahead of every meta the caller minted itself
            if it.id.0 >= self.fresh_metas.start {
                self.fresh_metas = (it.id.0 + 1)..;
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(TypeNode {
            resolved_type: t.clone(),
            parent: id,
            rel_list: Vec::new(),
        });
        self.tmap.insert(t.clone(), id);
        id
    }

    /// canonical representative of `id`'s class, with path compression
    pub(crate) fn find_root(&mut self, id: NodeId) -> NodeId {
        let mut root = id;
        while self.nodes[root.0].parent != root {
            root = self.nodes[root.0].parent;
        }
        let mut cur = id;
        while cur != root {
            cur = core::mem::replace(&mut self.nodes[cur.0].parent, root);
        }
        root
    }

    /// merge `src`'s class into `dst`'s; relations observing `src` move
    /// over, unresolved ones are rescheduled
    pub(crate) fn merge_from_to(&mut self, src: NodeId, dst: NodeId) {
        let src = self.find_root(src);
        let dst = self.find_root(dst);
        if src == dst {
            return;
        }
        tracing::trace!("merge {:?} -> {:?}", src, dst);
        self.nodes[src.0].parent = dst;
        let moved = core::mem::take(&mut self.nodes[src.0].rel_list);
        for rid in moved {
            if self.rels[rid.0].resolved {
                continue;
            }
            self.add_to_queue(rid);
            self.nodes[dst.0].rel_list.push(rid);
        }
    }

    pub(crate) fn add_to_queue(&mut self, rid: RelId) {
        let rnode = &mut self.rels[rid.0];
        if rnode.inqueue || rnode.resolved {
            return;
        }
        rnode.inqueue = true;
        self.queue.push_back(rid);
    }

    /// register a constraint from the checking pass: equalities unify
    /// immediately, relations go onto the worklist
    pub fn add_constraint(&mut self, c: TypeConstraint) -> Result<(), SolveError> {
        match c {
            TypeConstraint::Equal(lhs, rhs) => {
                self.unify(&lhs, &rhs)?;
                Ok(())
            }
            TypeConstraint::Relation(rel) => {
                let rid = RelId(self.rels.len());
                let mut type_list = Vec::with_capacity(rel.args.len());
                for arg in &rel.args {
                    let tnode = self.get_type_node(arg);
                    type_list.push(tnode);
                    let seen = self.nodes[tnode.0].resolved_type.clone();
                    self.propagate(rid, &seen);
                }
                self.rels.push(RelationNode {
                    rel,
                    type_list,
                    inqueue: false,
                    resolved: false,
                });
                self.add_to_queue(rid);
                Ok(())
            }
        }
    }

    /// run relations to a fixed point
    ///
    /// `Ok(true)` iff every relation reported itself resolved; `Ok(false)`
    /// means some relation never saw enough evidence, which the caller
    /// reports against the originating expression
    pub fn solve(&mut self) -> Result<bool, SolveError> {
        let mut steps = 0_usize;
        while let Some(rid) = self.queue.pop_front() {
            steps += 1;
            if steps > self.step_limit {
                return Err(SolveError::NoConvergence {
                    limit: self.step_limit,
                });
            }
            debug_assert!(!self.rels[rid.0].resolved);
            // present the best known form of every operand
            let type_list = self.rels[rid.0].type_list.clone();
            let mut args = Vec::with_capacity(type_list.len());
            for tid in type_list {
                let root = self.find_root(tid);
                let known = self.nodes[root.0].resolved_type.clone();
                args.push(self.resolve(&known));
            }
            let rel = self.rels[rid.0].rel.clone();
            tracing::debug!("update {:?} {}", rid, rel.name);
            let done = {
                let mut reporter = Reporter::new(self);
                rel.func
                    .call(&args, rel.num_inputs, &rel.attrs, &mut reporter)?
            };
            // clear inqueue only now, so the relation cannot requeue
            // itself from inside its own invocation
            let rnode = &mut self.rels[rid.0];
            rnode.inqueue = false;
            if done {
                rnode.resolved = true;
                self.num_resolved += 1;
            }
        }
        Ok(self.num_resolved == self.rels.len())
    }
}
