//! # AST Nodes
//!
//! This module defines the fundamental data structures (nodes) that make up
//! the Abstract Syntax Tree (AST) of a TombLang source file.
//!
//! Declarations, statements, and expressions are closed tagged sums matched
//! exhaustively throughout the compiler — no dynamic dispatch, per the
//! repository's "dispatch on AST variants" convention. Scopes and registers
//! are *not* stored on these nodes: they reference their owning [`crate::compiler::scope::Scope`]
//! and [`crate::compiler::register::RegId`] by index, never by pointer, so the
//! tree never needs a back-reference to its own arena.

use num_bigint::BigInt;
use std::vec::Vec;

/// The parsed form of a whole source file: zero or more top-level modules.
#[derive(Debug, Clone)]
pub struct SourceProgram {
    /// Top-level `contract` / `token` / `script` / `struct` / `enum` declarations, in source order.
    pub modules: Vec<ModuleDecl>,
}

// -----------------------------------------------------------------------------

/// The kind of top-level unit a [`ModuleDecl`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// `contract NAME { ... }`
    Contract,
    /// `token NAME { ... }`
    Token,
    /// `nft NAME<ROM,RAM> { ... }`, always nested inside a contract or token.
    Nft,
    /// `script NAME { ... }`
    Script,
    /// A bare `struct`/`enum` declared at the top level, holding no behavior of its own.
    StructHolder,
}

/// Visibility of a method, property, or trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

/// The kind of callable a [`MethodDecl`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// An ordinary `public|private NAME(args):TYPE { ... }` method.
    Method,
    /// The module's `constructor(args) { ... }`.
    Constructor,
    /// A long-running background routine (reserved keyword `task`).
    Task,
    /// A `trigger NAME(args) { ... }` invoked by the VM on a lifecycle event.
    Trigger,
    /// A `property NAME:TYPE { ... } | = expr;` computed or stored accessor.
    Property,
}

/// A parsed (not yet resolved) type expression, e.g. `map<string, number>`.
/// Resolved to a [`crate::ast::types::TypeId`] during semantic elaboration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub line: usize,
}

/// One parameter of a method or constructor: `name:TYPE`.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
}

/// A named field of a `struct NAME { field:type; ... }` declaration.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
}

/// `struct NAME { field:type; ... }`.
#[derive(Debug, Clone)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub line: usize,
}

/// One `entry-name` of an `enum NAME { A, B, C }`, with its assigned integer value.
#[derive(Debug, Clone)]
pub struct EnumVariant {
    pub name: String,
    pub value: i64,
}

/// `enum NAME { A, B, C }`. Variant values must be unique.
#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub variants: Vec<EnumVariant>,
    pub line: usize,
}

/// `global NAME:TYPE;` — contract storage, never held in a register across calls.
#[derive(Debug, Clone)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub line: usize,
}

/// `property NAME:TYPE { stmts } | = expr;`.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub visibility: Visibility,
    pub body: PropertyBody,
    pub line: usize,
}

/// The two surface forms a property may take.
#[derive(Debug, Clone)]
pub enum PropertyBody {
    /// `= expr;` — a single computed expression, evaluated on every read.
    Expr(Expression),
    /// `{ stmts }` — a full statement body, the last `return` supplying the value.
    Block(Vec<Statement>),
}

/// `constructor(args) { ... }`, `public|private NAME(args):TYPE { ... }`, or
/// `trigger NAME(args) { ... }`. `return_type: None` means the method returns
/// no value (encoded distinctly from `Some(T)`).
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub kind: MethodKind,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub return_type: Option<TypeExpr>,
    /// `true` for a `T*` return type: the method may `return` more than once.
    pub variadic: bool,
    pub body: Vec<Statement>,
    pub line: usize,
}

/// `import LIB;` inside a module body.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub library: String,
    pub line: usize,
}

/// A top-level or nested module: `contract`, `token`, `nft`, or `script`.
#[derive(Debug, Clone)]
pub struct ModuleDecl {
    pub kind: ModuleKind,
    pub name: String,
    /// Generic ROM/RAM type parameters, populated only for `nft NAME<ROM,RAM>`.
    pub type_params: Vec<String>,
    pub imports: Vec<ImportDecl>,
    pub structs: Vec<StructDecl>,
    pub enums: Vec<EnumDecl>,
    pub globals: Vec<GlobalDecl>,
    pub properties: Vec<PropertyDecl>,
    pub constructor: Option<MethodDecl>,
    pub methods: Vec<MethodDecl>,
    pub triggers: Vec<MethodDecl>,
    pub sub_modules: Vec<ModuleDecl>,
    pub line: usize,
}

impl ModuleDecl {
    pub fn new(kind: ModuleKind, name: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            type_params: Vec::new(),
            imports: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
            globals: Vec::new(),
            properties: Vec::new(),
            constructor: None,
            methods: Vec::new(),
            triggers: Vec::new(),
            sub_modules: Vec::new(),
            line,
        }
    }
}

// -----------------------------------------------------------------------------

/// Every statement form the grammar admits inside a method body.
#[derive(Debug, Clone)]
pub enum Statement {
    /// `local NAME[:TYPE] [= expr];`
    Local {
        name: String,
        ty: Option<TypeExpr>,
        value: Option<Expression>,
        line: usize,
    },
    /// `lvalue = expr;` or a compound form (`+=`, `-=`, `*=`, `/=`, `%=`), or the
    /// rejected legacy `lvalue := expr;` form retained only so the parser can
    /// produce a "deprecated" diagnostic instead of a generic syntax error.
    Assign {
        target: Expression,
        op: AssignOp,
        value: Expression,
        line: usize,
    },
    /// An expression evaluated for its side effects, e.g. a bare method call.
    Expr(Expression, usize),
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        /// Populated for both `else { ... }` and `else if ...`, the latter
        /// parsed as a single nested `If` statement.
        else_branch: Option<Vec<Statement>>,
        line: usize,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
        line: usize,
    },
    /// `do { ... } while (cond);`
    DoWhile {
        body: Vec<Statement>,
        condition: Expression,
        line: usize,
    },
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expression>,
        post: Option<Box<Statement>>,
        body: Vec<Statement>,
        line: usize,
    },
    Switch {
        subject: Expression,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Statement>>,
        line: usize,
    },
    Break(usize),
    Continue(usize),
    Return(Option<Expression>, usize),
    /// `throw STR;` — lowers to a `THROW` opcode; a VM-time error, not a compile error.
    Throw(Expression, usize),
    /// A bare `{ ... }` nested block, introducing its own child scope.
    Block(Vec<Statement>, usize),
}

impl Statement {
    pub fn line(&self) -> usize {
        match self {
            Statement::Local { line, .. }
            | Statement::Assign { line, .. }
            | Statement::Expr(_, line)
            | Statement::If { line, .. }
            | Statement::While { line, .. }
            | Statement::DoWhile { line, .. }
            | Statement::For { line, .. }
            | Statement::Switch { line, .. }
            | Statement::Break(line)
            | Statement::Continue(line)
            | Statement::Return(_, line)
            | Statement::Throw(_, line)
            | Statement::Block(_, line) => *line,
        }
    }
}

/// One `case lit:` arm of a `switch`. Labels share a single ordinal type
/// (`Number`, `String`, or `Enum`).
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub labels: Vec<Literal>,
    pub body: Vec<Statement>,
}

/// Assignment operators, including the legacy form the parser must reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    /// `:=` — no longer accepted; kept as a distinct variant purely so the
    /// parser can attach a "deprecated" diagnostic instead of a
    /// generic unexpected-token error.
    LegacyWalrus,
}

// -----------------------------------------------------------------------------

/// Every expression form the grammar admits, in source-nesting (not precedence) order.
#[derive(Debug, Clone)]
pub enum Expression {
    Literal(Literal, usize),
    Identifier(String, usize),
    /// The reserved identifier `this`.
    This(usize),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        line: usize,
    },
    Binary {
        left: Box<Expression>,
        op: BinaryOp,
        right: Box<Expression>,
        line: usize,
    },
    Logical {
        left: Box<Expression>,
        op: LogicalOp,
        right: Box<Expression>,
        line: usize,
    },
    /// `lvalue = expr` used in expression position (assignment is itself the
    /// lowest-precedence expression production).
    Assign {
        target: Box<Expression>,
        value: Box<Expression>,
        line: usize,
    },
    /// `target(args)` or `target<T>(args)`. The parser produces this uniformly
    /// for `this.method(...)`, `Lib.method(...)`, and ordinary value method
    /// calls like `name.length()` — they all share the shape
    /// `Call{callee: Field{target, name}, ...}`. Classifying the callee into a
    /// [`crate::compiler::library::LoweringStrategy`] (local call, library
    /// call, or contract call) happens during code generation, once the
    /// callee's resolved declaration or static type is known; the grammar
    /// alone cannot tell them apart.
    Call {
        callee: Box<Expression>,
        type_args: Vec<TypeExpr>,
        args: Vec<Expression>,
        line: usize,
    },
    /// `target[index]`.
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
        line: usize,
    },
    /// `target.field`.
    Field {
        target: Box<Expression>,
        name: String,
        line: usize,
    },
    /// `Type(args)` — a bare (non-dotted) call, always a struct/primitive
    /// constructor since TombLang has no free-standing functions.
    Constructor {
        ty: TypeExpr,
        args: Vec<Expression>,
        line: usize,
    },
    /// `{a, b, c}` array literal.
    ArrayLiteral {
        elements: Vec<Expression>,
        line: usize,
    },
    /// `$THIS_ADDRESS`, `$THIS_SYMBOL`, or `$TYPE_OF(T)` — expanded to a literal
    /// before code generation.
    Macro {
        name: String,
        type_arg: Option<TypeExpr>,
        line: usize,
    },
    /// `(expr)` — preserved through parsing only to anchor diagnostics; has no
    /// effect on elaboration or codegen beyond its inner expression.
    Grouping(Box<Expression>, usize),
}

impl Expression {
    pub fn line(&self) -> usize {
        match self {
            Expression::Literal(_, l)
            | Expression::Identifier(_, l)
            | Expression::This(l)
            | Expression::Unary { line: l, .. }
            | Expression::Binary { line: l, .. }
            | Expression::Logical { line: l, .. }
            | Expression::Assign { line: l, .. }
            | Expression::Call { line: l, .. }
            | Expression::Index { line: l, .. }
            | Expression::Field { line: l, .. }
            | Expression::Constructor { line: l, .. }
            | Expression::ArrayLiteral { line: l, .. }
            | Expression::Macro { line: l, .. }
            | Expression::Grouping(_, l) => *l,
        }
    }
}

/// A literal value, carrying enough precision to reconstruct its exact
/// bytecode encoding.
#[derive(Debug, Clone)]
pub enum Literal {
    /// An arbitrary-precision integer literal.
    Number(BigInt),
    /// A decimal literal, with its mantissa exactly as written (not yet
    /// scaled to a target `Decimal(n)` — that happens during elaboration).
    Decimal { mantissa: BigInt, fractional_digits: u8 },
    Bool(bool),
    Str(String),
    Char(char),
    /// `@...` address literal.
    Address(String),
    /// `0x...` hex literal, interpreted as a byte string.
    Hash(String),
    Bytes(Vec<u8>),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators that map directly onto the register VM's opcode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}
