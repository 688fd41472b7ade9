//! Syntax model for sigsync.
//!
//! This crate recovers a typed declaration tree from Java source with a
//! best-effort sketch parser, and knows how to render a method declaration
//! header back to text so a rebuilt signature can be spliced over the old one.
//! It intentionally favors recall over precision; members it cannot make sense
//! of are skipped rather than reported as errors.

mod ast;
mod parser;
mod text;

pub use ast::{
    FieldDeclSyntax, ImportDecl, MethodDeclSyntax, ParamSyntax, SourceFile, TypeDeclKind,
    TypeDeclSyntax, TypeSyntax,
};
pub use parser::parse;
pub use text::TextRange;

#[cfg(test)]
mod tests;
