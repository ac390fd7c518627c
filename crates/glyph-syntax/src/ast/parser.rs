//! Recursive-descent parser: tokens to a tagged AST.
//!
//! Single-token lookahead (`peek`/`get`), fail-fast on the first malformed
//! token (`ERROR HANDLING DESIGN`: parse errors are not recovered in this
//! version). The C-style varargs `peek`/`get` from the original source are
//! replaced here with a slice of expected [`TokenKind`]s.

use bumpalo::Bump;
use glyph_core::{ParseError, ParseErrorKind, Span};

use crate::lexer::{Lexer, Token, TokenKind};

use super::decl::*;
use super::expr::*;
use super::ops::{self, LEFT_UNARY_OPERATORS, RIGHT_UNARY_OPERATORS};
use super::stmt::*;

pub type PResult<T> = Result<T, ParseError>;

pub struct Parser<'ast> {
    tokens: Vec<Token<'ast>>,
    cursor: usize,
    arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    pub fn new(tokens: Vec<Token<'ast>>, arena: &'ast Bump) -> Self {
        Self { tokens, cursor: 0, arena }
    }

    /// Tokenize, run the auto-semicolon pass, then parse top-level items
    /// until `Finish`.
    pub fn parse_source(source: &str, arena: &'ast Bump) -> PResult<Vec<Item<'ast>>> {
        let lexer = Lexer::new(source, arena);
        let (raw, lex_errors) = lexer.tokenize_all();
        if let Some(err) = lex_errors.into_iter().next() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidSyntax,
                err.span(),
                err.to_string(),
            ));
        }
        let tokens = crate::auto_semi::insert_auto_semicolons(&raw, arena);
        let mut parser = Parser::new(tokens, arena);
        parser.parse_items()
    }

    fn parse_items(&mut self) -> PResult<Vec<Item<'ast>>> {
        let mut items = Vec::new();
        loop {
            let item = self.parse_item()?;
            let finished = matches!(item, Item::Finish(_));
            items.push(item);
            if finished {
                break;
            }
        }
        Ok(items)
    }

    // ------------------------------------------------------------------
    // Token stream primitives
    // ------------------------------------------------------------------

    fn peek(&self) -> Token<'ast> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Token<'ast> {
        let idx = (self.cursor + offset).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    fn get(&mut self) -> Token<'ast> {
        let tok = self.peek();
        if self.cursor + 1 < self.tokens.len() {
            self.cursor += 1;
        }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn check_value(&self, kind: TokenKind, value: &str) -> bool {
        self.peek().is_value(kind, value)
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token<'ast>> {
        if self.check(kind) {
            Ok(self.get())
        } else {
            let got = self.peek();
            Err(ParseError::expected(got.span, kind.description(), got.kind.description()))
        }
    }

    fn expect_value(&mut self, kind: TokenKind, value: &str) -> PResult<Token<'ast>> {
        if self.check_value(kind, value) {
            Ok(self.get())
        } else {
            let got = self.peek();
            Err(ParseError::expected(
                got.span,
                &format!("'{value}'"),
                got.kind.description(),
            ))
        }
    }

    /// Consume a statement terminator: an explicit `;` or the synthetic
    /// `"auto"` one. At least one must be present.
    fn expect_semicolon(&mut self) -> PResult<()> {
        if self.check(TokenKind::Semicolon) {
            self.get();
            Ok(())
        } else {
            let got = self.peek();
            Err(ParseError::expected(got.span, "';'", got.kind.description()))
        }
    }

    /// Skip any run of synthetic auto-semicolons (e.g. before `{`, where the
    /// auto-inserted terminator from the previous line must not be mistaken
    /// for an empty statement).
    fn skip_auto_semicolons(&mut self) {
        while self.peek().is_auto_semicolon() {
            self.get();
        }
    }

    fn alloc_slice<T>(&self, items: Vec<T>) -> &'ast [T] {
        self.arena.alloc_slice_fill_iter(items)
    }

    // ------------------------------------------------------------------
    // Top level
    // ------------------------------------------------------------------

    fn parse_item(&mut self) -> PResult<Item<'ast>> {
        self.skip_auto_semicolons();
        let tok = self.peek();

        match tok.kind {
            TokenKind::Finish => Ok(Item::Finish(tok.span)),
            TokenKind::Info => self.parse_package_or_import(),
            TokenKind::Modifier => self.parse_modifier_list(),
            TokenKind::Annotation => {
                self.get();
                Ok(Item::Annotation(AnnotationItem { name: tok.value, span: tok.span }))
            }
            TokenKind::Expression if matches!(tok.value, "class" | "struct" | "enum" | "interface") => {
                self.parse_type_decl()
            }
            TokenKind::Type | TokenKind::Identifier => self.parse_member(),
            TokenKind::Open => self.parse_multi_return_method(),
            _ => Err(ParseError::expected(tok.span, "a top-level declaration", tok.kind.description())),
        }
    }

    fn parse_package_or_import(&mut self) -> PResult<Item<'ast>> {
        let kw = self.get();
        let name_tok = self.expect(TokenKind::String)?;
        self.expect_semicolon()?;
        let span = kw.span.merge(name_tok.span);
        if kw.value == "package" {
            Ok(Item::Package(PackageSetItem { name: name_tok.value, span }))
        } else {
            Ok(Item::Import(ImportItem { target: name_tok.value, span }))
        }
    }

    fn parse_modifier_list(&mut self) -> PResult<Item<'ast>> {
        let start = self.peek().span;
        let mut mods = Vec::new();
        while self.check(TokenKind::Modifier) {
            mods.push(self.get().value);
        }
        let span = start;
        if self.check(TokenKind::Colon) {
            self.get();
            Ok(Item::ModifierBlock(ModifierBlockItem { modifiers: self.alloc_slice(mods), span }))
        } else {
            Ok(Item::ModifierList(ModifierListItem { modifiers: self.alloc_slice(mods), span }))
        }
    }

    fn parse_type_decl(&mut self) -> PResult<Item<'ast>> {
        let kw = self.get();
        let name = self.expect(TokenKind::Identifier)?.value;
        let generics = self.parse_optional_generic_names()?;

        // `struct Name(...)` with no body is a tuple struct.
        if kw.value == "struct" && self.check(TokenKind::Open) {
            return self.parse_tuple_struct(name, generics, kw.span);
        }

        let parent = if self.check_value(TokenKind::Operator, ":") {
            self.get();
            Some(self.expect(TokenKind::Identifier)?.value)
        } else {
            None
        };

        self.skip_auto_semicolons();
        self.expect(TokenKind::Begin)?;
        let mut body = Vec::new();
        while !self.check(TokenKind::End) && !self.check(TokenKind::Finish) {
            body.push(self.parse_item()?);
        }
        let end = self.expect(TokenKind::End)?;
        let span = kw.span.merge(end.span);

        let decl = self.arena.alloc(TypeDeclItem {
            name,
            generics,
            parent,
            body: self.alloc_slice(body),
            modifiers: Vec::new(),
            span,
        });

        Ok(match kw.value {
            "class" => Item::Class(decl),
            "struct" => Item::Struct(decl),
            "enum" => Item::Enum(decl),
            "interface" => Item::Interface(decl),
            _ => unreachable!(),
        })
    }

    fn parse_tuple_struct(
        &mut self,
        name: &'ast str,
        generics: GenericArgs<'ast>,
        start: Span,
    ) -> PResult<Item<'ast>> {
        self.expect(TokenKind::Open)?;
        let mut members = Vec::new();
        while !self.check(TokenKind::Close) {
            let ty = self.parse_type_ref()?;
            let field_name = self.expect(TokenKind::Identifier)?.value;
            members.push((ty, field_name));
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::Close)?;
        self.expect_semicolon()?;
        let span = start.merge(end.span);
        // Tuple-struct fields are modeled as a body of plain fields so the
        // package builder can treat it uniformly with `Class`/`Struct`.
        let body: Vec<Item<'ast>> = members
            .into_iter()
            .map(|(ty, field_name)| {
                Item::Field(FieldItem {
                    ty,
                    name: field_name,
                    value: None,
                    modifiers_span: span,
                    span,
                })
            })
            .collect();
        let decl = self.arena.alloc(TypeDeclItem {
            name,
            generics,
            parent: None,
            body: self.alloc_slice(body),
            modifiers: Vec::new(),
            span,
        });
        Ok(Item::TupleStruct(decl))
    }

    fn parse_optional_generic_names(&mut self) -> PResult<GenericArgs<'ast>> {
        if !self.check_value(TokenKind::Operator, "<") {
            return Ok(&[]);
        }
        self.get();
        let mut names = Vec::new();
        loop {
            names.push(self.expect(TokenKind::Identifier)?.value);
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        self.expect_value(TokenKind::Operator, ">")?;
        Ok(self.alloc_slice(names))
    }

    /// `Type/Identifier Identifier (...)` => method; `... = | ; | ,` => field.
    fn parse_member(&mut self) -> PResult<Item<'ast>> {
        let ty = self.parse_type_ref()?;
        // `Identifier(...)` with no following identifier is an expression
        // statement (method call), not a declaration; callers at the
        // statement level handle that case. At item level this should not
        // occur for well-formed programs, but guard for robustness.
        if self.check(TokenKind::Open) {
            return Err(ParseError::expected(self.peek().span, "a declared name", "'('"));
        }
        let name = self.expect(TokenKind::Identifier)?.value;

        if self.check(TokenKind::Open) {
            self.parse_method_tail(&[ReturnSlot { ty, name: None }], name, ty.span)
        } else {
            self.parse_field_tail(ty, name)
        }
    }

    fn parse_multi_return_method(&mut self) -> PResult<Item<'ast>> {
        let start = self.peek().span;
        self.get(); // '('
        let mut returns = Vec::new();
        while !self.check(TokenKind::Close) {
            let ty = self.parse_type_ref()?;
            let name = if self.check(TokenKind::Identifier) {
                Some(self.get().value)
            } else {
                None
            };
            returns.push(ReturnSlot { ty, name });
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Close)?;
        let name = self.expect(TokenKind::Identifier)?.value;
        self.parse_method_tail(&returns, name, start)
    }

    fn parse_method_tail(
        &mut self,
        returns: &[ReturnSlot<'ast>],
        name: &'ast str,
        start: Span,
    ) -> PResult<Item<'ast>> {
        let generics = self.parse_optional_generic_names()?;
        self.expect(TokenKind::Open)?;
        let mut params = Vec::new();
        while !self.check(TokenKind::Close) {
            let ty = self.parse_type_ref()?;
            let varargs = if self.check_value(TokenKind::Operator, ".") && self.peek_at(1).is_value(TokenKind::Operator, ".") {
                self.get();
                self.get();
                self.expect_value(TokenKind::Operator, ".")?;
                true
            } else {
                false
            };
            let pname = self.expect(TokenKind::Identifier)?.value;
            params.push(Parameter { ty, varargs, name: pname });
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Close)?;
        self.skip_auto_semicolons();
        let body = self.parse_block()?;
        let span = start;
        let item = self.arena.alloc(MethodItem {
            name,
            generics,
            return_types: self.alloc_slice(returns.to_vec()),
            parameters: self.alloc_slice(params),
            body,
            modifiers: Vec::new(),
            span,
        });
        Ok(Item::Method(item))
    }

    fn parse_field_tail(&mut self, ty: TypeRef<'ast>, first_name: &'ast str) -> PResult<Item<'ast>> {
        let value = self.parse_optional_initializer()?;
        if self.check(TokenKind::Comma) {
            let mut fields = vec![(first_name, value)];
            while self.check(TokenKind::Comma) {
                self.get();
                let name = self.expect(TokenKind::Identifier)?.value;
                let value = self.parse_optional_initializer()?;
                fields.push((name, value));
            }
            self.expect_semicolon()?;
            let span = ty.span;
            let item = self.arena.alloc(MultiFieldItem { ty, fields: self.alloc_slice(fields), span });
            Ok(Item::MultiField(item))
        } else {
            self.expect_semicolon()?;
            Ok(Item::Field(FieldItem { ty, name: first_name, value, modifiers_span: ty.span, span: ty.span }))
        }
    }

    fn parse_optional_initializer(&mut self) -> PResult<Option<Expr<'ast>>> {
        if self.check_value(TokenKind::Operator, "=") {
            self.get();
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type_ref(&mut self) -> PResult<TypeRef<'ast>> {
        let tok = self.peek();
        if !matches!(tok.kind, TokenKind::Type | TokenKind::Identifier) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                tok.span,
                format!("Invalid token. Expected a type, but got {}", tok.kind.description()),
            ));
        }
        self.get();
        let generics = self.parse_optional_type_args()?;
        let mut dims = 0u32;
        while self.check(TokenKind::Start) && self.peek_at(1).is(TokenKind::Stop) {
            self.get();
            self.get();
            dims += 1;
        }
        Ok(TypeRef { name: tok.value, generics, dimensions: dims, span: tok.span })
    }

    fn parse_optional_type_args(&mut self) -> PResult<GenericArgs<'ast>> {
        if !self.check_value(TokenKind::Operator, "<") {
            return Ok(&[]);
        }
        self.get();
        let mut names = Vec::new();
        loop {
            names.push(self.expect(TokenKind::Identifier)?.value);
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        self.expect_value(TokenKind::Operator, ">")?;
        Ok(self.alloc_slice(names))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> PResult<&'ast [Stmt<'ast>]> {
        self.expect(TokenKind::Begin)?;
        let mut stmts = Vec::new();
        loop {
            self.skip_auto_semicolons();
            if self.check(TokenKind::End) || self.check(TokenKind::Finish) {
                break;
            }
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::End)?;
        Ok(self.alloc_slice(stmts))
    }

    /// A statement body that may be a single expression or a `{ ... }` block.
    fn parse_body(&mut self) -> PResult<&'ast [Stmt<'ast>]> {
        self.skip_auto_semicolons();
        if self.check(TokenKind::Begin) {
            self.parse_block()
        } else {
            let stmt = self.parse_stmt()?;
            Ok(self.alloc_slice(vec![stmt]))
        }
    }

    fn parse_stmt(&mut self) -> PResult<Stmt<'ast>> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Expression if tok.value == "if" => self.parse_if(),
            TokenKind::Expression if tok.value == "while" => self.parse_while(),
            TokenKind::Expression if tok.value == "do" => self.parse_do_while(),
            TokenKind::Expression if tok.value == "return" => self.parse_return_stmt(),
            TokenKind::Expression if tok.value == "defer" => self.parse_defer_stmt(),
            TokenKind::Type => self.parse_local_declare_stmt(),
            TokenKind::Identifier
                if self.peek_at(1).is(TokenKind::Identifier)
                    || self.peek_at(1).is_value(TokenKind::Operator, "<") =>
            {
                self.parse_local_declare_stmt()
            }
            TokenKind::Identifier
                if self.peek_at(1).is_value(TokenKind::Operator, "=")
                    && !self.peek_at(2).is_value(TokenKind::Operator, "=") =>
            {
                self.parse_local_assign_stmt()
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect_semicolon()?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    fn parse_return_stmt(&mut self) -> PResult<Stmt<'ast>> {
        let start = self.get().span; // 'return'
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_semicolon()?;
        Ok(Stmt::Return(Return { value, span: start }))
    }

    fn parse_defer_stmt(&mut self) -> PResult<Stmt<'ast>> {
        let start = self.get().span; // 'defer'
        let instruction = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(Stmt::Defer(self.arena.alloc(Defer { instruction, span: start })))
    }

    /// `Type name [= expr];`, `Type name1 = e1, name2 = e2;`, or
    /// `Type (a, b) = expr;` (tuple destructure).
    fn parse_local_declare_stmt(&mut self) -> PResult<Stmt<'ast>> {
        let ty = self.parse_type_ref()?;
        let generics = ty.generics;

        if self.check(TokenKind::Open) {
            self.get();
            let mut members = Vec::new();
            while !self.check(TokenKind::Close) {
                members.push(self.expect(TokenKind::Identifier)?.value);
                if self.check(TokenKind::Comma) {
                    self.get();
                } else {
                    break;
                }
            }
            let close = self.expect(TokenKind::Close)?;
            self.expect_value(TokenKind::Operator, "=")?;
            let value = self.parse_expr()?;
            self.expect_semicolon()?;
            let span = ty.span.merge(close.span);
            return Ok(Stmt::LocalDeclareDestructure(self.arena.alloc(LocalDeclareDestructure {
                members: self.alloc_slice(members),
                value,
                span,
            })));
        }

        let first_name = self.expect(TokenKind::Identifier)?.value;
        let first_value = self.parse_optional_initializer()?;

        if self.check(TokenKind::Comma) {
            let mut locals = vec![(first_name, first_value)];
            while self.check(TokenKind::Comma) {
                self.get();
                let name = self.expect(TokenKind::Identifier)?.value;
                let value = self.parse_optional_initializer()?;
                locals.push((name, value));
            }
            self.expect_semicolon()?;
            let span = ty.span;
            return Ok(Stmt::MultiLocalDeclare(self.arena.alloc(MultiLocalDeclare {
                ty,
                generics,
                locals: self.alloc_slice(locals),
                span,
            })));
        }

        self.expect_semicolon()?;
        let span = ty.span;
        match first_value {
            Some(value) => Ok(Stmt::LocalDeclareAssign(self.arena.alloc(LocalDeclareAssign {
                ty,
                generics,
                name: first_name,
                value,
                span,
            }))),
            None => Ok(Stmt::LocalDeclare(LocalDeclare { ty, generics, name: first_name, span })),
        }
    }

    fn parse_local_assign_stmt(&mut self) -> PResult<Stmt<'ast>> {
        let name_tok = self.expect(TokenKind::Identifier)?;
        self.expect_value(TokenKind::Operator, "=")?;
        let value = self.parse_expr()?;
        self.expect_semicolon()?;
        let span = name_tok.span.merge(value.span());
        Ok(Stmt::LocalAssign(self.arena.alloc(LocalAssign { name: name_tok.value, value, span })))
    }

    fn parse_if(&mut self) -> PResult<Stmt<'ast>> {
        let start = self.get().span; // 'if'
        self.expect(TokenKind::Open)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Close)?;
        let body = self.parse_body()?;

        let mut else_ifs = Vec::new();
        let mut else_body = None;
        loop {
            self.skip_auto_semicolons();
            if self.check_value(TokenKind::Expression, "else") {
                self.get();
                if self.check_value(TokenKind::Expression, "if") {
                    self.get();
                    self.expect(TokenKind::Open)?;
                    let cond = self.parse_expr()?;
                    self.expect(TokenKind::Close)?;
                    let body = self.parse_body()?;
                    else_ifs.push(ElseIf { condition: cond, body });
                } else {
                    else_body = Some(self.parse_body()?);
                    break;
                }
            } else {
                break;
            }
        }

        let node = self.arena.alloc(If {
            condition,
            body,
            else_ifs: self.alloc_slice(else_ifs),
            else_body,
            span: start,
        });
        Ok(Stmt::If(node))
    }

    fn parse_while(&mut self) -> PResult<Stmt<'ast>> {
        let start = self.get().span;
        self.expect(TokenKind::Open)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Close)?;
        let body = self.parse_body()?;
        Ok(Stmt::While(self.arena.alloc(While { condition, body, span: start })))
    }

    fn parse_do_while(&mut self) -> PResult<Stmt<'ast>> {
        let start = self.get().span;
        let body = self.parse_body()?;
        self.skip_auto_semicolons();
        self.expect_value(TokenKind::Expression, "while")?;
        self.expect(TokenKind::Open)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Close)?;
        self.expect_semicolon()?;
        Ok(Stmt::DoWhile(self.arena.alloc(DoWhile { body, condition, span: start })))
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub fn parse_expr(&mut self) -> PResult<Expr<'ast>> {
        self.parse_expr_join(false)
    }

    fn parse_expr_join(&mut self, ignore_join: bool) -> PResult<Expr<'ast>> {
        let tok = self.peek();

        let lhs = match tok.kind {
            TokenKind::Open => self.parse_group_or_tuple()?,
            TokenKind::Operator if tok.value == "|" => self.parse_lambda()?,
            TokenKind::Operator if tok.value == "$" => self.parse_template()?,
            TokenKind::Expression if tok.value == "new" => self.parse_new()?,
            TokenKind::Operator if LEFT_UNARY_OPERATORS.contains(&tok.value) => self.parse_side_operation()?,
            TokenKind::Identifier => self.parse_value_call_or_index(ignore_join)?,
            _ if tok.is_literal() => self.parse_literal_value()?,
            _ => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpression,
                    tok.span,
                    format!("Invalid token. Expected expression, but got {}", tok.kind.description()),
                ))
            }
        };

        self.maybe_parse_operator_tail(lhs)
    }

    fn maybe_parse_operator_tail(&mut self, lhs: Expr<'ast>) -> PResult<Expr<'ast>> {
        if let Some(op) = self.try_parse_postfix() {
            let span = lhs.span();
            let postfixed = Expr::SideOperation(self.arena.alloc(SideOperationExpr {
                op,
                operand: lhs,
                prefix: false,
                span,
            }));
            return self.maybe_parse_operator_tail(postfixed);
        }
        if let Some(op) = self.try_parse_operator() {
            let rhs = self.parse_expr_join(false)?;
            let span = lhs.span().merge(rhs.span());
            let combined = Expr::Operation(self.arena.alloc(OperationExpr { op, left: lhs, right: rhs, span }));
            Ok(ops::fix_operation_tree(self.arena, combined))
        } else {
            Ok(lhs)
        }
    }

    /// Postfix `++`/`--`: two identical single-character operator tokens
    /// with nothing between them.
    fn try_parse_postfix(&mut self) -> Option<&'ast str> {
        let a = self.peek();
        let b = self.peek_at(1);
        if !a.is(TokenKind::Operator) || !b.is(TokenKind::Operator) {
            return None;
        }
        let candidate = format!("{}{}", a.value, b.value);
        if RIGHT_UNARY_OPERATORS.contains(&candidate.as_str()) {
            self.get();
            self.get();
            Some(self.arena.alloc_str(&candidate))
        } else {
            None
        }
    }

    /// `parse_operator`: consumes consecutive `Operator` tokens into one
    /// spelling, stopping early at `&&`/`||` to avoid over-merging multi-
    /// character sequences that are themselves complete operators.
    fn try_parse_operator(&mut self) -> Option<&'ast str> {
        if !self.check(TokenKind::Operator) {
            return None;
        }
        let mut spelling = String::new();
        loop {
            if !self.check(TokenKind::Operator) {
                break;
            }
            let candidate = format!("{spelling}{}", self.peek().value);
            if candidate == "&&" || candidate == "||" {
                spelling = candidate;
                self.get();
                break;
            }
            let next_is_operator = self.peek_at(1).is(TokenKind::Operator);
            spelling.push_str(self.peek().value);
            self.get();
            if !next_is_operator || !ops::is_two_operand(&spelling) && spelling.len() >= 3 {
                break;
            }
            if ops::is_two_operand(&spelling) && !next_is_operator {
                break;
            }
        }
        if ops::is_two_operand(&spelling) {
            Some(self.arena.alloc_str(&spelling))
        } else {
            None
        }
    }

    fn parse_literal_value(&mut self) -> PResult<Expr<'ast>> {
        let tok = self.get();
        let kind = literal_kind_from_token(tok)?;
        Ok(Expr::Literal(LiteralExpr { kind, span: tok.span }))
    }

    fn parse_value_call_or_index(&mut self, ignore_join: bool) -> PResult<Expr<'ast>> {
        let name_tok = self.get();
        let base = if self.check(TokenKind::Open) {
            self.get();
            let mut args = Vec::new();
            while !self.check(TokenKind::Close) {
                args.push(self.parse_expr_join(true)?);
                if self.check(TokenKind::Comma) {
                    self.get();
                } else {
                    break;
                }
            }
            let end = self.expect(TokenKind::Close)?;
            Expr::MethodCall(self.arena.alloc(MethodCallExpr {
                name: name_tok.value,
                arguments: self.alloc_slice(args),
                span: name_tok.span.merge(end.span),
            }))
        } else if self.check(TokenKind::Start) {
            self.get();
            let index = self.parse_expr_join(true)?;
            let end = self.expect(TokenKind::Stop)?;
            if self.check_value(TokenKind::Operator, "=") && !self.peek_at(1).is_value(TokenKind::Operator, "=") {
                self.get();
                let value = self.parse_expr_join(true)?;
                Expr::IndexAssign(self.arena.alloc(IndexAssignExpr {
                    name: name_tok.value,
                    index,
                    value,
                    span: name_tok.span,
                }))
            } else {
                Expr::IndexFetch(self.arena.alloc(IndexFetchExpr {
                    name: name_tok.value,
                    index,
                    span: name_tok.span.merge(end.span),
                }))
            }
        } else {
            Expr::Ident(IdentExpr { name: name_tok.value, span: name_tok.span })
        };

        if !ignore_join && self.check_value(TokenKind::Operator, ".") {
            self.parse_join(base)
        } else {
            Ok(base)
        }
    }

    /// `a.b.c(...)`: a target followed by a children list, each child
    /// reparsed with the "ignore join" flag so it doesn't re-enter this
    /// function recursively on its own trailing `.`.
    fn parse_join(&mut self, target: Expr<'ast>) -> PResult<Expr<'ast>> {
        let mut children = Vec::new();
        while self.check_value(TokenKind::Operator, ".") {
            self.get();
            children.push(self.parse_expr_join(true)?);
        }
        let span = target.span();
        Ok(Expr::JoinOperation(self.arena.alloc(JoinOperationExpr {
            target,
            children: self.alloc_slice(children),
            span,
        })))
    }

    fn parse_side_operation(&mut self) -> PResult<Expr<'ast>> {
        let op_tok = self.get();
        let operand = self.parse_expr_join(false)?;
        let span = op_tok.span.merge(operand.span());
        Ok(Expr::SideOperation(self.arena.alloc(SideOperationExpr {
            op: op_tok.value,
            operand,
            prefix: true,
            span,
        })))
    }

    fn parse_group_or_tuple(&mut self) -> PResult<Expr<'ast>> {
        let start = self.get().span; // '('
        let mut members = vec![self.parse_expr_join(true)?];
        while self.check(TokenKind::Comma) {
            self.get();
            members.push(self.parse_expr_join(true)?);
        }
        let end = self.expect(TokenKind::Close)?;
        let span = start.merge(end.span);
        if members.len() == 1 {
            Ok(Expr::Group(self.arena.alloc(GroupExpr { value: members.remove(0), span })))
        } else {
            Ok(Expr::Tuple(self.arena.alloc(TupleExpr { members: self.alloc_slice(members), span })))
        }
    }

    fn parse_lambda(&mut self) -> PResult<Expr<'ast>> {
        let start = self.get().span; // '|'
        let mut params = Vec::new();
        let mut saw_typed = false;
        let mut saw_untyped = false;
        while !self.check_value(TokenKind::Operator, "|") {
            let ty = if matches!(self.peek().kind, TokenKind::Type) {
                saw_typed = true;
                Some(self.parse_type_ref()?)
            } else {
                saw_untyped = true;
                None
            };
            let name = self.expect(TokenKind::Identifier)?.value;
            params.push(LambdaParam { ty, name });
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        self.expect_value(TokenKind::Operator, "|")?;
        if saw_typed && saw_untyped {
            let tok = self.peek();
            return Err(ParseError::new(
                ParseErrorKind::InvalidSyntax,
                tok.span,
                "lambda parameters must be all typed or all untyped".to_string(),
            ));
        }

        let body = if self.check(TokenKind::Begin) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(self.parse_expr()?)
        };
        Ok(Expr::Lambda(self.arena.alloc(LambdaExpr {
            params: self.alloc_slice(params),
            body,
            span: start,
        })))
    }

    fn parse_template(&mut self) -> PResult<Expr<'ast>> {
        let start = self.get().span; // '$'
        let raw = self.expect(TokenKind::String)?;
        let operator = self.try_parse_operator();
        Ok(Expr::Template(self.arena.alloc(TemplateExpr {
            raw: raw.value,
            operator,
            span: start.merge(raw.span),
        })))
    }

    fn parse_new(&mut self) -> PResult<Expr<'ast>> {
        let start = self.get().span; // 'new'
        let name = self.expect(TokenKind::Identifier)?.value;
        let generics = self.parse_optional_type_args()?;
        let arguments = if self.check(TokenKind::Open) {
            self.get();
            let mut args = Vec::new();
            while !self.check(TokenKind::Close) {
                args.push(self.parse_expr_join(true)?);
                if self.check(TokenKind::Comma) {
                    self.get();
                } else {
                    break;
                }
            }
            self.expect(TokenKind::Close)?;
            Some(self.alloc_slice(args) as &'ast [Expr<'ast>])
        } else {
            None
        };
        let initializator = if self.check(TokenKind::Begin) {
            Some(self.parse_initializator()?)
        } else {
            None
        };
        Ok(Expr::New(self.arena.alloc(NewExpr {
            type_name: name,
            generics,
            arguments,
            initializator,
            span: start,
        })))
    }

    fn parse_initializator(&mut self) -> PResult<&'ast InitializatorExpr<'ast>> {
        let start = self.expect(TokenKind::Begin)?.span;
        let mut members = Vec::new();
        while !self.check(TokenKind::End) {
            let name = self.expect(TokenKind::Identifier)?.value;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            members.push(InitializatorMember { name, value });
            if self.check(TokenKind::Comma) {
                self.get();
            } else {
                break;
            }
        }
        let end = self.expect(TokenKind::End)?;
        Ok(self.arena.alloc(InitializatorExpr { members: self.alloc_slice(members), span: start.merge(end.span) }))
    }
}

fn literal_kind_from_token(tok: Token) -> PResult<LiteralKind> {
    let parse_int = || tok.value.parse::<i64>().unwrap_or(0);
    Ok(match tok.kind {
        TokenKind::Byte => LiteralKind::Byte(parse_int()),
        TokenKind::Short => LiteralKind::Short(parse_int()),
        TokenKind::Integer => LiteralKind::Int(parse_int()),
        TokenKind::Long => LiteralKind::Long(parse_int()),
        TokenKind::Hexadecimal => LiteralKind::Hex(i64::from_str_radix(tok.value, 16).unwrap_or(0)),
        TokenKind::Float => LiteralKind::Float(tok.value.parse().unwrap_or(0.0)),
        TokenKind::Double => LiteralKind::Double(tok.value.parse().unwrap_or(0.0)),
        TokenKind::Boolean => LiteralKind::Bool(tok.value == "true"),
        TokenKind::String => LiteralKind::String(tok.value.to_string()),
        TokenKind::Character => LiteralKind::Char(tok.value.chars().next().unwrap_or('\0')),
        TokenKind::Null => LiteralKind::Null,
        _ => {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedExpression,
                tok.span,
                format!("Invalid token. Expected a literal, but got {}", tok.kind.description()),
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_and_method() {
        let arena = Bump::new();
        let items = Parser::parse_source("int x = 1\nint add(int a, int b) { return a + b }\n", &arena)
            .expect("parse should succeed");
        assert!(matches!(items[0], Item::Field(_)));
        assert!(matches!(items[1], Item::Method(_)));
    }

    #[test]
    fn parses_class_with_body() {
        let arena = Bump::new();
        let items = Parser::parse_source("class Foo {\nint x\n}\n", &arena).expect("parse should succeed");
        let Item::Class(decl) = items[0] else { panic!("expected class") };
        assert_eq!(decl.name, "Foo");
        assert_eq!(decl.body.len(), 1);
    }

    #[test]
    fn parses_if_else_chain() {
        let arena = Bump::new();
        let items = Parser::parse_source(
            "int check(int x) {\nif (x > 0) {\nreturn 1\n} else if (x < 0) {\nreturn -1\n} else {\nreturn 0\n}\n}\n",
            &arena,
        )
        .expect("parse should succeed");
        let Item::Method(m) = items[0] else { panic!("expected method") };
        assert_eq!(m.body.len(), 1);
        assert!(matches!(m.body[0], Stmt::If(_)));
    }

    #[test]
    fn mixed_precedence_expression_rebalances() {
        let arena = Bump::new();
        let items = Parser::parse_source("int f() {\nlet x = 1 + 2 * 3 - 4\n}\n", &arena).expect("parse should succeed");
        let Item::Method(m) = items[0] else { panic!("expected method") };
        let Stmt::LocalDeclareAssign(decl) = m.body[0] else { panic!("expected declare-assign") };
        let Expr::Operation(root) = decl.value else { panic!("expected operation") };
        assert_eq!(root.op, "-");
    }

    #[test]
    fn join_chain_parses_as_join_operation() {
        let arena = Bump::new();
        let items = Parser::parse_source("void f() {\na.b.c()\n}\n", &arena).expect("parse should succeed");
        let Item::Method(m) = items[0] else { panic!("expected method") };
        let Stmt::Expr(expr) = m.body[0] else { panic!("expected expr stmt") };
        let Expr::JoinOperation(join) = expr else { panic!("expected join") };
        assert_eq!(join.children.len(), 2);
    }
}
