//! Operator tables and the `fix_operation_tree` rebalancing transform.
//!
//! The precedence/associativity table is plain data (`PRECEDENCE_TABLE`), not
//! logic embedded in the parser, so the rebalancing pass can stay a pure
//! function of (operator spelling, tree shape).

use bumpalo::Bump;

use super::expr::{Expr, OperationExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assoc {
    Left,
    Right,
}

/// Two-operand operators recognized by the parser. Anything else reaching
/// `fix_operation_tree` is an internal error.
pub const TWO_OPERAND_OPERATORS: &[&str] = &[
    "+", "+=", "-", "-=", "*", "*=", "/", "/=", "&", "&=", "|", "|=", "&&", "||", "::", "<", "<=",
    ">", ">=", "==", ">>", ">>>", "<<", "??", "?.", "?", ":", ".", "^",
];

pub const LEFT_UNARY_OPERATORS: &[&str] = &["!", "++", "--", "-"];
pub const RIGHT_UNARY_OPERATORS: &[&str] = &["++", "--"];

/// Precedence and associativity, higher binds tighter. Operators absent from
/// this table default to `(0, Left)`.
const PRECEDENCE_TABLE: &[(&str, u8, Assoc)] = &[
    ("+", 1, Assoc::Left),
    ("-", 1, Assoc::Left),
    ("*", 2, Assoc::Left),
    ("/", 2, Assoc::Left),
    ("^", 3, Assoc::Right),
    (".", 4, Assoc::Left),
];

pub fn is_two_operand(op: &str) -> bool {
    TWO_OPERAND_OPERATORS.contains(&op)
}

pub fn precedence(op: &str) -> (u8, Assoc) {
    PRECEDENCE_TABLE
        .iter()
        .find(|(spelling, _, _)| *spelling == op)
        .map(|(_, prec, assoc)| (*prec, *assoc))
        .unwrap_or((0, Assoc::Left))
}

/// Rebalance a freshly right-recursive-descent-parsed operator tree so that
/// precedence and associativity hold at every node (`TESTABLE PROPERTIES`).
///
/// Recurses into children first, then at this node:
/// - if this operator's precedence is strictly greater than the right
///   child's, right-rotate (the right child's left subtree becomes this
///   node's new right child, and this node becomes the right child's left).
/// - else if this operator's precedence is >= the left child's and this
///   operator is left-associative, left-rotate symmetrically.
/// - otherwise leave the node as parsed.
pub fn fix_operation_tree<'ast>(arena: &'ast Bump, expr: Expr<'ast>) -> Expr<'ast> {
    let Expr::Operation(op) = expr else {
        return expr;
    };

    let left = fix_operation_tree(arena, op.left);
    let right = fix_operation_tree(arena, op.right);
    let node = OperationExpr {
        op: op.op,
        left,
        right,
        span: op.span,
    };

    let (node_prec, node_assoc) = precedence(node.op);

    // Right-heavy chains of equal precedence must fold left when the
    // operator is left-associative (`a-b-c` == `(a-b)-c`) but stay nested
    // when right-associative (`a^b^c` == `a^(b^c)`); that's the only
    // difference between the two branches below.
    if let Expr::Operation(right_op) = node.right {
        let (right_prec, _) = precedence(right_op.op);
        let rotate = match node_assoc {
            Assoc::Left => node_prec >= right_prec,
            Assoc::Right => node_prec > right_prec,
        };
        if rotate {
            let rotated = Expr::Operation(arena.alloc(OperationExpr {
                op: node.op,
                left: node.left,
                right: right_op.left,
                span: node.span,
            }));
            let new_root = OperationExpr {
                op: right_op.op,
                left: rotated,
                right: right_op.right,
                span: right_op.span,
            };
            return fix_operation_tree(arena, Expr::Operation(arena.alloc(new_root)));
        }
    }

    if let Expr::Operation(left_op) = node.left {
        let (left_prec, _) = precedence(left_op.op);
        if node_assoc == Assoc::Left && node_prec >= left_prec {
            let rotated = Expr::Operation(arena.alloc(OperationExpr {
                op: node.op,
                left: left_op.right,
                right: node.right,
                span: node.span,
            }));
            let new_root = OperationExpr {
                op: left_op.op,
                left: left_op.left,
                right: rotated,
                span: left_op.span,
            };
            return fix_operation_tree(arena, Expr::Operation(arena.alloc(new_root)));
        }
    }

    Expr::Operation(arena.alloc(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expr::{LiteralExpr, LiteralKind};
    use glyph_core::Span;

    fn value(arena: &Bump, n: i64) -> Expr<'_> {
        Expr::Literal(LiteralExpr {
            kind: LiteralKind::Int(n),
            span: Span::point(1, 1),
        })
    }

    fn op<'a>(arena: &'a Bump, spelling: &'a str, l: Expr<'a>, r: Expr<'a>) -> Expr<'a> {
        Expr::Operation(arena.alloc(OperationExpr {
            op: spelling,
            left: l,
            right: r,
            span: Span::point(1, 1),
        }))
    }

    #[test]
    fn left_associative_subtraction() {
        // Parsed right-recursively as a - (b - c); must become (a - b) - c.
        let arena = Bump::new();
        let a = value(&arena, 1);
        let b = value(&arena, 2);
        let c = value(&arena, 3);
        let inner = op(&arena, "-", b, c);
        let raw = op(&arena, "-", a, inner);

        let fixed = fix_operation_tree(&arena, raw);
        let Expr::Operation(root) = fixed else { panic!() };
        assert_eq!(root.op, "-");
        let Expr::Operation(left) = root.left else { panic!("expected nested -") };
        assert_eq!(left.op, "-");
    }

    #[test]
    fn mixed_precedence_scenario() {
        // "1 + 2 * 3 - 4", naively right-nested as 1 + (2 * (3 - 4)),
        // must become root '-', left '+'(1, *(2,3)), right 4.
        let arena = Bump::new();
        let one = value(&arena, 1);
        let two = value(&arena, 2);
        let three = value(&arena, 3);
        let four = value(&arena, 4);
        let inner = op(&arena, "-", three, four);
        let middle = op(&arena, "*", two, inner);
        let raw = op(&arena, "+", one, middle);

        let fixed = fix_operation_tree(&arena, raw);
        let Expr::Operation(root) = fixed else { panic!() };
        assert_eq!(root.op, "-");
        let Expr::Operation(root_left) = root.left else { panic!("expected + on the left") };
        assert_eq!(root_left.op, "+");
        let Expr::Operation(mul) = root_left.right else { panic!("expected * nested under +") };
        assert_eq!(mul.op, "*");
    }

    #[test]
    fn right_associative_power() {
        // a ^ (b ^ c) parses naturally right-recursive and must stay that way.
        let arena = Bump::new();
        let a = value(&arena, 2);
        let b = value(&arena, 3);
        let c = value(&arena, 2);
        let inner = op(&arena, "^", b, c);
        let raw = op(&arena, "^", a, inner);

        let fixed = fix_operation_tree(&arena, raw);
        let Expr::Operation(root) = fixed else { panic!() };
        assert_eq!(root.op, "^");
        let Expr::Operation(right) = root.right else { panic!("expected nested ^") };
        assert_eq!(right.op, "^");
    }

    #[test]
    fn precedence_defaults_to_zero_left() {
        assert_eq!(precedence("??"), (0, Assoc::Left));
        assert_eq!(precedence("*"), (2, Assoc::Left));
    }
}
