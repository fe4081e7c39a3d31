//! Constructor helpers for building trees by hand.
//!
//! Hosts that lower their own parse trees and the evaluator's tests use these
//! instead of spelling out nested `Box::new` calls.
//!
//! ```text
//! // var a = 5 * 5
//! let stmt = var("a", binary(int(5), BinaryOp::Mul, int(5)));
//! ```

use std::rc::Rc;

use super::{
    BinaryOp, Block, ClassDef, Expr, FunctionDef, MemberDecl, MemberLevel, MethodDef, Program,
    Stmt, StmtKind, UnaryOp,
};
use crate::Name;

// Expressions

pub fn int(n: i64) -> Expr {
    Expr::Int(n)
}

pub fn string(s: &str) -> Expr {
    Expr::Str(Rc::from(s))
}

pub fn boolean(b: bool) -> Expr {
    Expr::Bool(b)
}

pub fn null() -> Expr {
    Expr::Null
}

pub fn ident(name: &str) -> Expr {
    Expr::Ident(Name::new(name))
}

pub fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

pub fn dict(entries: Vec<(Expr, Expr)>) -> Expr {
    Expr::Dict(entries)
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn index(object: Expr, idx: Expr) -> Expr {
    Expr::Index {
        object: Box::new(object),
        index: Box::new(idx),
    }
}

pub fn attr(object: Expr, name: &str) -> Expr {
    Expr::Attribute {
        object: Box::new(object),
        name: Name::new(name),
    }
}

pub fn super_attr(name: &str) -> Expr {
    Expr::SuperAttribute(Name::new(name))
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
    }
}

/// `object.method(args)`.
pub fn method_call(object: Expr, method: &str, args: Vec<Expr>) -> Expr {
    call(attr(object, method), args)
}

/// Anonymous function literal.
pub fn lambda(params: &[&str], body: Block) -> Expr {
    Expr::Function(Rc::new(function_def(None, params, body)))
}

pub fn import(path: &str) -> Expr {
    Expr::Import(Box::new(string(path)))
}

// Statements

pub fn expr(e: Expr) -> Stmt {
    Stmt::new(StmtKind::Expr(e))
}

pub fn var(name: &str, value: Expr) -> Stmt {
    Stmt::new(StmtKind::Declare {
        name: Name::new(name),
        constant: false,
        value: Some(value),
    })
}

/// `var name` with no initializer.
pub fn var_empty(name: &str) -> Stmt {
    Stmt::new(StmtKind::Declare {
        name: Name::new(name),
        constant: false,
        value: None,
    })
}

pub fn con(name: &str, value: Expr) -> Stmt {
    Stmt::new(StmtKind::Declare {
        name: Name::new(name),
        constant: true,
        value: Some(value),
    })
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Stmt::new(StmtKind::Assign { target, value })
}

pub fn block(statements: Block) -> Stmt {
    Stmt::new(StmtKind::Block(statements))
}

pub fn if_else(condition: Expr, then: Block, otherwise: Option<Block>) -> Stmt {
    Stmt::new(StmtKind::If {
        branches: vec![(condition, then)],
        otherwise,
    })
}

pub fn while_loop(condition: Expr, body: Block) -> Stmt {
    Stmt::new(StmtKind::While { condition, body })
}

pub fn for_in(targets: &[&str], constant: bool, iterable: Expr, body: Block) -> Stmt {
    Stmt::new(StmtKind::ForIn {
        targets: targets.iter().map(|t| Name::new(t)).collect(),
        constant,
        iterable,
        body,
    })
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::new(StmtKind::Return(Some(value)))
}

pub fn ret_empty() -> Stmt {
    Stmt::new(StmtKind::Return(None))
}

pub fn brk() -> Stmt {
    Stmt::new(StmtKind::Break)
}

pub fn cont() -> Stmt {
    Stmt::new(StmtKind::Continue)
}

/// Named function declaration.
pub fn function(name: &str, params: &[&str], body: Block) -> Stmt {
    Stmt::new(StmtKind::Function(Rc::new(function_def(
        Some(name),
        params,
        body,
    ))))
}

pub fn export(names: &[&str]) -> Stmt {
    Stmt::new(StmtKind::Export(names.iter().map(|n| Name::new(n)).collect()))
}

pub fn program(statements: Block) -> Program {
    Program::new(statements)
}

// Classes

pub fn function_def(name: Option<&str>, params: &[&str], body: Block) -> FunctionDef {
    FunctionDef {
        name: name.map(Name::new),
        params: params.iter().map(|p| Name::new(p)).collect(),
        body,
    }
}

/// Incremental builder for `ClassDef`.
#[derive(Clone, Debug)]
pub struct ClassBuilder {
    def: ClassDef,
}

/// Start a class definition.
pub fn class(name: &str) -> ClassBuilder {
    ClassBuilder {
        def: ClassDef {
            name: Name::new(name),
            parent: None,
            members: Vec::new(),
            methods: Vec::new(),
        },
    }
}

impl ClassBuilder {
    /// Inherit from the class bound to `parent`.
    #[must_use]
    pub fn extends(mut self, parent: &str) -> Self {
        self.def.parent = Some(ident(parent));
        self
    }

    /// `var name = default` (instance level).
    #[must_use]
    pub fn member(self, name: &str, default: Option<Expr>) -> Self {
        self.push_member(name, MemberLevel::Instance, false, default)
    }

    /// `con name = default` (instance level).
    #[must_use]
    pub fn constant(self, name: &str, default: Option<Expr>) -> Self {
        self.push_member(name, MemberLevel::Instance, true, default)
    }

    /// `var class.name = value`.
    #[must_use]
    pub fn class_member(self, name: &str, value: Expr) -> Self {
        self.push_member(name, MemberLevel::Class, false, Some(value))
    }

    /// `con class.name = value`.
    #[must_use]
    pub fn class_constant(self, name: &str, value: Expr) -> Self {
        self.push_member(name, MemberLevel::Class, true, Some(value))
    }

    /// `fn name(params) { body }` (instance level).
    #[must_use]
    pub fn method(self, name: &str, params: &[&str], body: Block) -> Self {
        self.push_method(MemberLevel::Instance, name, params, body)
    }

    /// `fn class.name(params) { body }`.
    #[must_use]
    pub fn class_method(self, name: &str, params: &[&str], body: Block) -> Self {
        self.push_method(MemberLevel::Class, name, params, body)
    }

    fn push_member(
        mut self,
        name: &str,
        level: MemberLevel,
        constant: bool,
        default: Option<Expr>,
    ) -> Self {
        self.def.members.push(MemberDecl {
            name: Name::new(name),
            level,
            constant,
            default,
            line: 0,
        });
        self
    }

    fn push_method(mut self, level: MemberLevel, name: &str, params: &[&str], body: Block) -> Self {
        self.def.methods.push(MethodDef {
            level,
            function: Rc::new(function_def(Some(name), params, body)),
            line: 0,
        });
        self
    }

    /// Finish as a `ClassDef`.
    pub fn def(self) -> ClassDef {
        self.def
    }

    /// Finish as a class declaration statement.
    pub fn stmt(self) -> Stmt {
        Stmt::new(StmtKind::Class(Rc::new(self.def)))
    }
}
