//! Type references and top-level/type-level declaration nodes.

use glyph_core::Span;

use super::stmt::Stmt;

/// `<A, B, C>` after a type or method name.
pub type GenericArgs<'ast> = &'ast [&'ast str];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeRef<'ast> {
    pub name: &'ast str,
    pub generics: GenericArgs<'ast>,
    /// Number of trailing `[]` array dimensions.
    pub dimensions: u32,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter<'ast> {
    pub ty: TypeRef<'ast>,
    pub varargs: bool,
    pub name: &'ast str,
}

/// One entry of a multi-return method's parenthesized return-type list:
/// `Type [Generics] [Dims] [Name]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnSlot<'ast> {
    pub ty: TypeRef<'ast>,
    pub name: Option<&'ast str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifierListItem<'ast> {
    pub modifiers: &'ast [&'ast str],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifierBlockItem<'ast> {
    pub modifiers: &'ast [&'ast str],
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodItem<'ast> {
    pub name: &'ast str,
    pub generics: GenericArgs<'ast>,
    pub return_types: &'ast [ReturnSlot<'ast>],
    pub parameters: &'ast [Parameter<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub modifiers: Vec<&'ast str>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldItem<'ast> {
    pub ty: TypeRef<'ast>,
    pub name: &'ast str,
    pub value: Option<super::expr::Expr<'ast>>,
    pub modifiers_span: Span,
    pub span: Span,
}

/// `Type a, b, c;` or `Type a = 1, b = 2;` — one shared type across several
/// names, each with its own optional initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFieldItem<'ast> {
    pub ty: TypeRef<'ast>,
    pub fields: &'ast [(&'ast str, Option<super::expr::Expr<'ast>>)],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageSetItem<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportItem<'ast> {
    pub target: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDeclItem<'ast> {
    pub name: &'ast str,
    pub generics: GenericArgs<'ast>,
    pub parent: Option<&'ast str>,
    pub body: &'ast [Item<'ast>],
    pub modifiers: Vec<&'ast str>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationItem<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorItem {
    pub message: String,
    pub span: Span,
}

/// A top-level or type-body declaration. `Class`/`Struct`/`TupleStruct`/
/// `Enum`/`Interface` all share [`TypeDeclItem`]'s shape; the variant tag is
/// what the node builder switches on.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'ast> {
    ModifierList(ModifierListItem<'ast>),
    ModifierBlock(ModifierBlockItem<'ast>),
    Method(&'ast MethodItem<'ast>),
    Field(FieldItem<'ast>),
    MultiField(&'ast MultiFieldItem<'ast>),
    Package(PackageSetItem<'ast>),
    Import(ImportItem<'ast>),
    Class(&'ast TypeDeclItem<'ast>),
    Struct(&'ast TypeDeclItem<'ast>),
    TupleStruct(&'ast TypeDeclItem<'ast>),
    Enum(&'ast TypeDeclItem<'ast>),
    Interface(&'ast TypeDeclItem<'ast>),
    Annotation(AnnotationItem<'ast>),
    Error(ErrorItem),
    Finish(Span),
}

impl Item<'_> {
    pub fn span(&self) -> Span {
        match self {
            Item::ModifierList(i) => i.span,
            Item::ModifierBlock(i) => i.span,
            Item::Method(i) => i.span,
            Item::Field(i) => i.span,
            Item::MultiField(i) => i.span,
            Item::Package(i) => i.span,
            Item::Import(i) => i.span,
            Item::Class(i) | Item::Struct(i) | Item::TupleStruct(i) | Item::Enum(i) | Item::Interface(i) => i.span,
            Item::Annotation(i) => i.span,
            Item::Error(i) => i.span,
            Item::Finish(span) => *span,
        }
    }

    /// Whether this item kind can carry modifiers from a preceding
    /// `ModifierList` (the `Modifiable` capability).
    pub fn is_modifiable(&self) -> bool {
        matches!(
            self,
            Item::Method(_)
                | Item::Field(_)
                | Item::MultiField(_)
                | Item::Class(_)
                | Item::Struct(_)
                | Item::TupleStruct(_)
                | Item::Enum(_)
                | Item::Interface(_)
        )
    }
}
