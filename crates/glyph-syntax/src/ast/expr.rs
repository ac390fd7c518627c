//! Expression-level AST nodes.
//!
//! `Expr` is a tagged sum type (per the design notes, not a class hierarchy);
//! each non-trivial variant boxes its payload in the arena so the enum itself
//! stays small.

use glyph_core::Span;

use super::decl::{GenericArgs, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Literal(LiteralExpr),
    Ident(IdentExpr<'ast>),
    Operation(&'ast OperationExpr<'ast>),
    SideOperation(&'ast SideOperationExpr<'ast>),
    JoinOperation(&'ast JoinOperationExpr<'ast>),
    MethodCall(&'ast MethodCallExpr<'ast>),
    IndexFetch(&'ast IndexFetchExpr<'ast>),
    IndexAssign(&'ast IndexAssignExpr<'ast>),
    Group(&'ast GroupExpr<'ast>),
    Tuple(&'ast TupleExpr<'ast>),
    Template(&'ast TemplateExpr<'ast>),
    Lambda(&'ast LambdaExpr<'ast>),
    New(&'ast NewExpr<'ast>),
    Initializator(&'ast InitializatorExpr<'ast>),
}

impl Expr<'_> {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::Operation(e) => e.span,
            Expr::SideOperation(e) => e.span,
            Expr::JoinOperation(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::IndexFetch(e) => e.span,
            Expr::IndexAssign(e) => e.span,
            Expr::Group(e) => e.span,
            Expr::Tuple(e) => e.span,
            Expr::Template(e) => e.span,
            Expr::Lambda(e) => e.span,
            Expr::New(e) => e.span,
            Expr::Initializator(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Byte(i64),
    Short(i64),
    Int(i64),
    Long(i64),
    Hex(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    String(String),
    Char(char),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

/// A two-operand operator node, pre- and post-`fix_operation_tree`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationExpr<'ast> {
    pub op: &'ast str,
    pub left: Expr<'ast>,
    pub right: Expr<'ast>,
    pub span: Span,
}

/// A left-unary operator applied to a single operand (`!x`, `-x`, `++x`),
/// or a right-unary postfix form (`x++`); `prefix` distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideOperationExpr<'ast> {
    pub op: &'ast str,
    pub operand: Expr<'ast>,
    pub prefix: bool,
    pub span: Span,
}

/// A left-to-right chain `a.b.c(...)`: a target followed by a children
/// sequence, each child reparsed with the "ignore join" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOperationExpr<'ast> {
    pub target: Expr<'ast>,
    pub children: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr<'ast> {
    pub name: &'ast str,
    pub arguments: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexFetchExpr<'ast> {
    pub name: &'ast str,
    pub index: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexAssignExpr<'ast> {
    pub name: &'ast str,
    pub index: Expr<'ast>,
    pub value: Expr<'ast>,
    pub span: Span,
}

/// `(expr)`. Promoted to [`TupleExpr`] when a comma follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupExpr<'ast> {
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpr<'ast> {
    pub members: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `$"...text... {expr} ..."`; `operator` is the optional trailing binary
/// operator that re-enters precedence parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExpr<'ast> {
    pub raw: &'ast str,
    pub operator: Option<&'ast str>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam<'ast> {
    pub ty: Option<TypeRef<'ast>>,
    pub name: &'ast str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LambdaBody<'ast> {
    Expr(Expr<'ast>),
    Block(&'ast [super::stmt::Stmt<'ast>]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr<'ast> {
    pub params: &'ast [LambdaParam<'ast>],
    pub body: LambdaBody<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr<'ast> {
    pub type_name: &'ast str,
    pub generics: GenericArgs<'ast>,
    pub arguments: Option<&'ast [Expr<'ast>]>,
    pub initializator: Option<&'ast InitializatorExpr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializatorMember<'ast> {
    pub name: &'ast str,
    pub value: Expr<'ast>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitializatorExpr<'ast> {
    pub members: &'ast [InitializatorMember<'ast>],
    pub span: Span,
}
