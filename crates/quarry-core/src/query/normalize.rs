//! Collection-any desugaring.
//!
//! Every path that passes through `collection.any()` is re-rooted on a
//! synthetic element variable, and one inner join per distinct any-node
//! binds that variable to the collection.

use crate::{
    expr::{Expr, Path, PathKind},
    query::{JoinExpression, JoinType},
};

///
/// AnyJoins
///
/// State for one normalization call. `counter` is owned by the builder so
/// synthetic names stay unique across calls on the same query.
///

pub(crate) struct AnyJoins<'a> {
    counter: &'a mut usize,
    seen: Vec<(Path, Path)>,
    joins: Vec<JoinExpression>,
}

impl<'a> AnyJoins<'a> {
    pub(crate) const fn new(counter: &'a mut usize) -> Self {
        Self {
            counter,
            seen: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Joins introduced so far, in discovery order.
    pub(crate) fn into_joins(self) -> Vec<JoinExpression> {
        self.joins
    }

    /// Rewrite `expr`, returning it unchanged when it holds no any-paths.
    pub(crate) fn rewrite(&mut self, expr: &Expr) -> Expr {
        match expr {
            Expr::Path(path) if path.contains_any() => Expr::Path(self.rewrite_path(path)),
            Expr::Operation(op) => {
                let args = op.args().iter().map(|arg| self.rewrite(arg)).collect();
                Expr::Operation(op.with_args(args))
            }
            Expr::Custom(custom) => {
                let args = custom.args().iter().map(|arg| self.rewrite(arg)).collect();
                Expr::Custom(custom.with_args(args))
            }
            // sub-queries are normalized by their own builder
            Expr::Path(_) | Expr::Constant(_) | Expr::Param(_) | Expr::SubQuery(_) => expr.clone(),
        }
    }

    fn rewrite_path(&mut self, path: &Path) -> Path {
        if path.kind() == PathKind::CollectionAny {
            return self.element_variable(path);
        }

        match path.parent() {
            Some(parent) if parent.contains_any() => path.with_parent(self.rewrite_path(parent)),
            _ => path.clone(),
        }
    }

    fn element_variable(&mut self, any: &Path) -> Path {
        if let Some((_, variable)) = self.seen.iter().find(|(node, _)| node == any) {
            return variable.clone();
        }

        // `any` always has the collection as its parent
        let collection = match any.parent() {
            Some(parent) if parent.contains_any() => self.rewrite_path(parent),
            Some(parent) => parent.clone(),
            None => return any.clone(),
        };

        let name = format!("{}_{}", collection.dotted().replace('.', "_"), self.counter);
        *self.counter += 1;

        let variable = Path::variable(name, any.value_type().clone());
        self.joins.push(JoinExpression::new(
            JoinType::InnerJoin,
            Expr::alias(collection, variable.clone()),
        ));
        self.seen.push((any.clone(), variable.clone()));

        variable
    }
}
