use crate::{
    expr::{Expr, Operator, Param, Path},
    query::{OrderSpecifier, QueryMetadata},
    schema::EntityName,
    value::{Value, ValueType},
};

/// `exists (subquery)`
#[must_use]
pub fn exists(sub_query: QueryMetadata) -> Expr {
    Expr::unary(Operator::Exists, Expr::sub_query(sub_query))
}

// Shared builder surface for every node that can stand as an operand.
macro_rules! impl_expr_dsl {
    ($ty:ty) => {
        #[allow(clippy::should_implement_trait)]
        impl $ty {
            fn operand(&self) -> Expr {
                Expr::from(self)
            }

            // ----------------------------------------------------------
            // Logical
            // ----------------------------------------------------------

            #[must_use]
            pub fn and(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::And, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn or(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Or, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn not(&self) -> Expr {
                Expr::unary(Operator::Not, self.operand())
            }

            // ----------------------------------------------------------
            // Comparison
            // ----------------------------------------------------------

            #[must_use]
            pub fn eq(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Eq, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn ne(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Ne, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Lt, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Gt, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn loe(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Loe, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn goe(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Goe, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn between(&self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
                Expr::ternary(Operator::Between, self.operand(), low.into(), high.into())
            }

            #[must_use]
            pub fn like(&self, pattern: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Like, self.operand(), pattern.into())
            }

            /// Membership in a constant list.
            #[must_use]
            pub fn in_list<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Expr {
                let list: Value = values.into_iter().collect();

                Expr::binary(Operator::In, self.operand(), Expr::Constant(list))
            }

            /// Membership in a sub-query, collection path or list parameter.
            #[must_use]
            pub fn in_expr(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::In, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn not_in_list<V: Into<Value>>(
                &self,
                values: impl IntoIterator<Item = V>,
            ) -> Expr {
                let list: Value = values.into_iter().collect();

                Expr::binary(Operator::NotIn, self.operand(), Expr::Constant(list))
            }

            #[must_use]
            pub fn not_in_expr(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::NotIn, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn is_null(&self) -> Expr {
                Expr::unary(Operator::IsNull, self.operand())
            }

            #[must_use]
            pub fn is_not_null(&self) -> Expr {
                Expr::unary(Operator::IsNotNull, self.operand())
            }

            // ----------------------------------------------------------
            // String
            // ----------------------------------------------------------

            #[must_use]
            pub fn starts_with(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::StartsWith, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn ends_with(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::EndsWith, self.operand(), rhs.into())
            }

            /// Substring test on text operands, element membership on
            /// collection operands.
            #[must_use]
            pub fn contains(&self, rhs: impl Into<Expr>) -> Expr {
                let lhs = self.operand();
                if lhs.value_type().is_collection() {
                    Expr::binary(Operator::In, rhs.into(), lhs)
                } else {
                    Expr::binary(Operator::StringContains, lhs, rhs.into())
                }
            }

            #[must_use]
            pub fn concat(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Concat, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn lower(&self) -> Expr {
                Expr::unary(Operator::Lower, self.operand())
            }

            #[must_use]
            pub fn upper(&self) -> Expr {
                Expr::unary(Operator::Upper, self.operand())
            }

            #[must_use]
            pub fn trim(&self) -> Expr {
                Expr::unary(Operator::Trim, self.operand())
            }

            #[must_use]
            pub fn length(&self) -> Expr {
                Expr::unary(Operator::Length, self.operand())
            }

            /// Zero-based substring from `start` to the end.
            #[must_use]
            pub fn substring(&self, start: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Substr1, self.operand(), start.into())
            }

            /// Zero-based substring over `[start, end)`.
            #[must_use]
            pub fn substring_range(&self, start: impl Into<Expr>, end: impl Into<Expr>) -> Expr {
                Expr::ternary(Operator::Substr2, self.operand(), start.into(), end.into())
            }

            /// Zero-based position of `needle`, `-1` when absent.
            #[must_use]
            pub fn index_of(&self, needle: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::IndexOf, self.operand(), needle.into())
            }

            // ----------------------------------------------------------
            // Arithmetic
            // ----------------------------------------------------------

            #[must_use]
            pub fn add(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Add, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn sub(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Sub, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn mul(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Mul, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn div(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Div, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn rem(&self, rhs: impl Into<Expr>) -> Expr {
                Expr::binary(Operator::Mod, self.operand(), rhs.into())
            }

            #[must_use]
            pub fn neg(&self) -> Expr {
                Expr::unary(Operator::Negate, self.operand())
            }

            #[must_use]
            pub fn abs(&self) -> Expr {
                Expr::unary(Operator::Abs, self.operand())
            }

            #[must_use]
            pub fn sqrt(&self) -> Expr {
                Expr::unary(Operator::Sqrt, self.operand())
            }

            // ----------------------------------------------------------
            // Aggregate
            // ----------------------------------------------------------

            #[must_use]
            pub fn count(&self) -> Expr {
                Expr::unary(Operator::Count, self.operand())
            }

            #[must_use]
            pub fn count_distinct(&self) -> Expr {
                Expr::unary(Operator::CountDistinct, self.operand())
            }

            #[must_use]
            pub fn sum(&self) -> Expr {
                Expr::unary(Operator::Sum, self.operand())
            }

            #[must_use]
            pub fn avg(&self) -> Expr {
                Expr::unary(Operator::Avg, self.operand())
            }

            #[must_use]
            pub fn min(&self) -> Expr {
                Expr::unary(Operator::Min, self.operand())
            }

            #[must_use]
            pub fn max(&self) -> Expr {
                Expr::unary(Operator::Max, self.operand())
            }

            // ----------------------------------------------------------
            // Collection
            // ----------------------------------------------------------

            #[must_use]
            pub fn is_empty(&self) -> Expr {
                Expr::unary(Operator::IsEmpty, self.operand())
            }

            #[must_use]
            pub fn is_not_empty(&self) -> Expr {
                Expr::unary(Operator::IsNotEmpty, self.operand())
            }

            #[must_use]
            pub fn size(&self) -> Expr {
                Expr::unary(Operator::Size, self.operand())
            }

            /// Runtime type test against an entity type. Object query
            /// dialects only.
            #[must_use]
            pub fn instance_of(&self, entity: &EntityName) -> Expr {
                let ty = Path::variable(
                    entity.simple_name(),
                    ValueType::Entity(entity.clone()),
                );

                Expr::binary(Operator::InstanceOf, self.operand(), Expr::Path(ty))
            }

            // ----------------------------------------------------------
            // Ordering and projection
            // ----------------------------------------------------------

            #[must_use]
            pub fn asc(&self) -> OrderSpecifier {
                OrderSpecifier::asc(self.operand())
            }

            #[must_use]
            pub fn desc(&self) -> OrderSpecifier {
                OrderSpecifier::desc(self.operand())
            }

            /// `self AS alias`
            #[must_use]
            pub fn as_alias(&self, alias: Path) -> Expr {
                Expr::alias(self.operand(), alias)
            }
        }
    };
}

impl_expr_dsl!(Expr);
impl_expr_dsl!(Path);
impl_expr_dsl!(Param);
