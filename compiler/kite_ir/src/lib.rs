//! Kite IR - the finished syntax tree handed to the evaluator.
//!
//! This crate contains the data structures shared between the (external)
//! parser and the evaluator:
//! - `Name` for identifiers
//! - `Program`, `Stmt`, `Expr` and the declaration nodes
//! - `BinaryOp` / `UnaryOp`
//! - `ast::build` constructor helpers
//!
//! # Design Philosophy
//!
//! - **Share, don't copy**: function and class bodies sit behind `Rc` so a
//!   closure value can point at its body without cloning the tree.
//! - **Lines on statements**: each statement records its 1-based source line;
//!   the evaluator updates the current call frame from it before executing.

pub mod ast;
mod name;

pub use ast::{
    BinaryOp, Block, ClassDef, Expr, FunctionDef, MemberDecl, MemberLevel, MethodDef, Program,
    Stmt, StmtKind, UnaryOp,
};
pub use name::Name;
