//! Filter expression tree, its builders and the `$filter` serializer.
//!
//! Builders do no semantic checking: `apply_and` happily joins two constants.
//! Whether a predicate makes sense is decided by the service. The serializer
//! parenthesizes every binary node, so the tree alone defines precedence.
//!
//! ```rust,ignore
//! use modkit_table::filter::*;
//!
//! let f = apply_and(
//!     apply_eq(apply_property_name("T"), apply_constant("x")),
//!     apply_eq(apply_property_name("T"), apply_constant("y")),
//! );
//! assert_eq!(serialize(&f), "((T eq 'x') and (T eq 'y'))");
//! ```

use std::fmt;

use crate::{EdmType, Result, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Or,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::And => write!(f, "and"),
            BinaryOperator::Or => write!(f, "or"),
            BinaryOperator::Eq => write!(f, "eq"),
            BinaryOperator::Ne => write!(f, "ne"),
            BinaryOperator::Gt => write!(f, "gt"),
            BinaryOperator::Ge => write!(f, "ge"),
            BinaryOperator::Lt => write!(f, "lt"),
            BinaryOperator::Le => write!(f, "le"),
        }
    }
}

/// Immutable predicate tree. Every node owns its children.
///
/// Rendering, cloning and comparing recurse once per level, so very deep
/// trees should be checked with [`Filter::depth`] first
/// ([`crate::Query::to_params`] does this against [`crate::TableLimits`]).
/// Dropping does not recurse.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Constant {
        edm_type: EdmType,
        value: Value,
    },
    PropertyName(String),
    Unary {
        op: UnaryOperator,
        operand: Box<Filter>,
    },
    Binary {
        op: BinaryOperator,
        left: Box<Filter>,
        right: Box<Filter>,
    },
}

impl Filter {
    /// Number of nodes on the longest root-to-leaf path. A leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1_usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            match node {
                Filter::Constant { .. } | Filter::PropertyName(_) => {}
                Filter::Unary { operand, .. } => stack.push((operand, depth + 1)),
                Filter::Binary { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }

    /// Combine two filters with AND: `(self and other)`
    #[must_use]
    pub fn and(self, other: Filter) -> Filter {
        apply_and(self, other)
    }

    /// Combine two filters with OR: `(self or other)`
    #[must_use]
    pub fn or(self, other: Filter) -> Filter {
        apply_or(self, other)
    }
}

impl Drop for Filter {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut node) = pending.pop() {
            detach_children(&mut node, &mut pending);
        }
    }
}

// leaves a childless placeholder behind, so the node's own drop is shallow
fn detach_children(node: &mut Filter, pending: &mut Vec<Filter>) {
    let mut take = |child: &mut Box<Filter>| {
        pending.push(std::mem::replace(&mut **child, Filter::PropertyName(String::new())));
    };
    match node {
        Filter::Constant { .. } | Filter::PropertyName(_) => {}
        Filter::Unary { operand, .. } => take(operand),
        Filter::Binary { left, right, .. } => {
            take(left);
            take(right);
        }
    }
}

impl std::ops::Not for Filter {
    type Output = Filter;

    fn not(self) -> Self::Output {
        apply_not(self)
    }
}

/// Literal whose EDM type is inferred from the value.
#[must_use]
pub fn apply_constant(value: impl Into<Value>) -> Filter {
    let value = value.into();
    Filter::Constant {
        edm_type: EdmType::infer(&value),
        value,
    }
}

/// Literal of an explicit EDM type, e.g. a `Guid` or `Int64` given as text.
///
/// # Errors
/// Returns `Error::Validation` if the value does not fit `edm_type`.
pub fn apply_typed_constant(value: impl Into<Value>, edm_type: EdmType) -> Result<Filter> {
    let value = value.into();
    edm_type.validate(&value)?;
    Ok(Filter::Constant { edm_type, value })
}

#[must_use]
pub fn apply_property_name(name: impl Into<String>) -> Filter {
    Filter::PropertyName(name.into())
}

#[must_use]
pub fn apply_not(operand: Filter) -> Filter {
    Filter::Unary {
        op: UnaryOperator::Not,
        operand: Box::new(operand),
    }
}

#[must_use]
pub fn apply_binary(op: BinaryOperator, left: Filter, right: Filter) -> Filter {
    Filter::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[must_use]
pub fn apply_and(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::And, left, right)
}

#[must_use]
pub fn apply_or(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Or, left, right)
}

#[must_use]
pub fn apply_eq(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Eq, left, right)
}

#[must_use]
pub fn apply_ne(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Ne, left, right)
}

#[must_use]
pub fn apply_gt(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Gt, left, right)
}

#[must_use]
pub fn apply_ge(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Ge, left, right)
}

#[must_use]
pub fn apply_lt(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Lt, left, right)
}

#[must_use]
pub fn apply_le(left: Filter, right: Filter) -> Filter {
    apply_binary(BinaryOperator::Le, left, right)
}

/// Render a filter as a `$filter` predicate string.
#[must_use]
pub fn serialize(filter: &Filter) -> String {
    filter.to_string()
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Constant { edm_type, value } => f.write_str(&edm_type.literal(value)),
            Filter::PropertyName(name) => f.write_str(name),
            Filter::Unary { op, operand } => write!(f, "{op} ({operand})"),
            Filter::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::Error;

    fn t_eq(v: &str) -> Filter {
        apply_eq(apply_property_name("T"), apply_constant(v))
    }

    #[test]
    fn test_and_is_not_simplified() {
        let f = apply_and(t_eq("x"), t_eq("y"));
        assert_eq!(serialize(&f), "((T eq 'x') and (T eq 'y'))");

        let same = apply_and(t_eq("x"), t_eq("x"));
        assert_eq!(serialize(&same), "((T eq 'x') and (T eq 'x'))");
    }

    #[test]
    fn test_every_binary_operator() {
        let cases: [(fn(Filter, Filter) -> Filter, &str); 8] = [
            (apply_eq, "eq"),
            (apply_ne, "ne"),
            (apply_gt, "gt"),
            (apply_ge, "ge"),
            (apply_lt, "lt"),
            (apply_le, "le"),
            (apply_and, "and"),
            (apply_or, "or"),
        ];
        for (build, op) in cases {
            let f = build(apply_property_name("n"), apply_constant(23));
            assert_eq!(f.to_string(), format!("(n {op} 23)"));
        }
    }

    #[test]
    fn test_not_wraps_operand() {
        let f = apply_not(apply_property_name("flag"));
        assert_eq!(serialize(&f), "not (flag)");

        let nested = apply_not(t_eq("x"));
        assert_eq!(serialize(&nested), "not ((T eq 'x'))");
        assert_eq!(serialize(&!t_eq("x")), serialize(&nested));
    }

    #[test]
    fn test_constant_on_left_is_kept() {
        let f = apply_eq(apply_constant("tbl"), apply_property_name("TableName"));
        assert_eq!(f.to_string(), "('tbl' eq TableName)");
    }

    #[test]
    fn test_composition_is_unrestricted() {
        let f = apply_and(apply_constant(1), apply_constant(true));
        assert_eq!(f.to_string(), "(1 and true)");
    }

    #[test]
    fn test_method_sugar_matches_builders() {
        let a = t_eq("a").or(t_eq("b")).and(!t_eq("c"));
        let b = apply_and(apply_or(t_eq("a"), t_eq("b")), apply_not(t_eq("c")));
        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "(((T eq 'a') or (T eq 'b')) and not ((T eq 'c')))"
        );
    }

    #[test]
    fn test_typed_constants() {
        let g = apply_typed_constant("90ab64d6-d3f8-49ec-b837-b8b5b6367b74", EdmType::Guid).unwrap();
        assert_eq!(g.to_string(), "guid'90ab64d6-d3f8-49ec-b837-b8b5b6367b74'");

        let l = apply_typed_constant("12345678901", EdmType::Int64).unwrap();
        assert_eq!(apply_gt(apply_property_name("L"), l).to_string(), "(L gt 12345678901)");

        assert!(matches!(
            apply_typed_constant("", EdmType::Guid),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_depth() {
        assert_eq!(apply_property_name("A").depth(), 1);
        assert_eq!(t_eq("x").depth(), 2);
        assert_eq!(apply_and(apply_property_name("A"), apply_not(t_eq("x"))).depth(), 4);
    }

    #[test]
    fn test_very_deep_tree_drops() {
        let mut f = apply_property_name("flag");
        for _ in 0..200_000 {
            f = apply_not(f);
        }
        assert_eq!(f.depth(), 200_001);
        drop(f);

        let mut g = t_eq("x");
        for i in 0..200_000 {
            g = apply_or(apply_constant(i), g);
        }
        assert_eq!(g.depth(), 200_002);
    }

    #[test]
    fn test_shared_subtree_reuse() {
        let shared = t_eq("x");
        let a = apply_or(shared.clone(), apply_property_name("A"));
        let b = apply_and(shared.clone(), apply_property_name("B"));
        assert_eq!(a.to_string(), "((T eq 'x') or A)");
        assert_eq!(b.to_string(), "((T eq 'x') and B)");
        assert_eq!(shared.to_string(), "(T eq 'x')");
    }
}
