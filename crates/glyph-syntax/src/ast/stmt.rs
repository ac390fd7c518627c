//! Statement-level AST nodes: locals, control flow, and the expression
//! wrapper that lets a bare expression stand alone as a statement.

use glyph_core::Span;

use super::decl::{GenericArgs, TypeRef};
use super::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalDeclare<'ast> {
    pub ty: TypeRef<'ast>,
    pub generics: GenericArgs<'ast>,
    pub name: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclareAssign<'ast> {
    pub ty: TypeRef<'ast>,
    pub generics: GenericArgs<'ast>,
    pub name: &'ast str,
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLocalDeclare<'ast> {
    pub ty: TypeRef<'ast>,
    pub generics: GenericArgs<'ast>,
    pub locals: &'ast [(&'ast str, Option<Expr<'ast>>)],
    pub span: Span,
}

/// `let (a, b) = foo();`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclareDestructure<'ast> {
    pub members: &'ast [&'ast str],
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalAssign<'ast> {
    pub name: &'ast str,
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return<'ast> {
    pub value: Option<Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Defer<'ast> {
    pub instruction: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf<'ast> {
    pub condition: Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
}

#[derive(Debug, Clone, PartialEq)]
pub struct If<'ast> {
    pub condition: Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub else_ifs: &'ast [ElseIf<'ast>],
    pub else_body: Option<&'ast [Stmt<'ast>]>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While<'ast> {
    pub condition: Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhile<'ast> {
    pub body: &'ast [Stmt<'ast>],
    pub condition: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For<'ast> {
    pub init: Option<&'ast Stmt<'ast>>,
    pub condition: Option<Expr<'ast>>,
    pub step: Option<Expr<'ast>>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEach<'ast> {
    pub binding: &'ast str,
    pub iterable: Expr<'ast>,
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'ast> {
    LocalDeclare(LocalDeclare<'ast>),
    LocalDeclareAssign(&'ast LocalDeclareAssign<'ast>),
    MultiLocalDeclare(&'ast MultiLocalDeclare<'ast>),
    LocalDeclareDestructure(&'ast LocalDeclareDestructure<'ast>),
    LocalAssign(&'ast LocalAssign<'ast>),
    Return(Return<'ast>),
    Defer(&'ast Defer<'ast>),
    If(&'ast If<'ast>),
    While(&'ast While<'ast>),
    DoWhile(&'ast DoWhile<'ast>),
    For(&'ast For<'ast>),
    ForEach(&'ast ForEach<'ast>),
    Expr(Expr<'ast>),
}

impl Stmt<'_> {
    pub fn span(&self) -> Span {
        match self {
            Stmt::LocalDeclare(s) => s.span,
            Stmt::LocalDeclareAssign(s) => s.span,
            Stmt::MultiLocalDeclare(s) => s.span,
            Stmt::LocalDeclareDestructure(s) => s.span,
            Stmt::LocalAssign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::Expr(e) => e.span(),
        }
    }
}
