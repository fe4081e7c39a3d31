//! Scenario tests: whole programs built with `ast::build` and run through
//! the interpreter.

mod collection_tests;
