//! AST node types.
//!
//! The parser (outside this workspace) produces a `Program`; the evaluator
//! walks it directly. Expressions are boxed trees; function and class bodies
//! are reference counted so runtime values can share them.

pub mod build;
mod operators;

use std::rc::Rc;

use crate::Name;

pub use operators::{BinaryOp, UnaryOp};

/// A sequence of statements evaluated in order.
pub type Block = Vec<Stmt>;

/// A parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Block,
}

impl Program {
    /// Create a program from its top-level statements.
    pub fn new(statements: Block) -> Self {
        Program { statements }
    }
}

/// A statement together with the source line it starts on.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    /// 1-based line number; `0` when unknown (synthesized nodes).
    pub line: u32,
}

impl Stmt {
    /// Create a statement with an unknown line.
    pub fn new(kind: StmtKind) -> Self {
        Stmt { kind, line: 0 }
    }

    /// Set the source line.
    #[must_use]
    pub fn at(mut self, line: u32) -> Self {
        self.line = line;
        self
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `var name = value` / `con name = value`. A missing initializer binds `null`.
    Declare {
        name: Name,
        constant: bool,
        value: Option<Expr>,
    },
    /// `target = value` where target is an identifier, index or attribute expression.
    Assign { target: Expr, value: Expr },
    /// Expression evaluated for its value (the last one is the block's value).
    Expr(Expr),
    /// `{ ... }`: opens a new lexical scope.
    Block(Block),
    /// `if (c) {..} else if (c) {..} else {..}`.
    If {
        branches: Vec<(Expr, Block)>,
        otherwise: Option<Block>,
    },
    /// `while (condition) { body }`.
    While { condition: Expr, body: Block },
    /// `for (var a, b in iterable) { body }`.
    ForIn {
        targets: Vec<Name>,
        constant: bool,
        iterable: Expr,
        body: Block,
    },
    /// `return` with an optional value.
    Return(Option<Expr>),
    Break,
    Continue,
    /// `fn name(params) { body }`: declares `name` in the current scope.
    Function(Rc<FunctionDef>),
    /// `class Name(Parent) { ... }`: declares `Name` in the current scope.
    Class(Rc<ClassDef>),
    /// `export(a, b, ...)`.
    Export(Vec<Name>),
}

/// Expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64),
    Str(Rc<str>),
    Bool(bool),
    Null,
    Ident(Name),
    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Attribute {
        object: Box<Expr>,
        name: Name,
    },
    /// `super.name`: only valid inside a method body.
    SuperAttribute(Name),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Function literal `fn(params) { body }`.
    Function(Rc<FunctionDef>),
    /// `import(path)`.
    Import(Box<Expr>),
}

/// A function body with its parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    /// `None` for anonymous function literals.
    pub name: Option<Name>,
    pub params: Vec<Name>,
    pub body: Block,
}

/// Which namespace a class member or method lives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberLevel {
    /// Per-instance (`var x`, `fn get()`).
    Instance,
    /// Shared by the class family (`var class.x`, `fn class.make()`).
    Class,
}

/// A member declaration inside a class body.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDecl {
    pub name: Name,
    pub level: MemberLevel,
    pub constant: bool,
    /// `None` declares an instance member that `__init__` must assign.
    pub default: Option<Expr>,
    pub line: u32,
}

/// A method declaration inside a class body.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub level: MemberLevel,
    pub function: Rc<FunctionDef>,
    pub line: u32,
}

/// `class Name(Parent) { members; methods }`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: Name,
    /// Expression naming the parent class; `None` inherits from the root class.
    pub parent: Option<Expr>,
    pub members: Vec<MemberDecl>,
    pub methods: Vec<MethodDef>,
}
