//! In-memory syntax tree consumed by the reference front-end and edited by codegen

mod access;
mod factory;
pub mod render;
pub mod tree;

pub use render::{render, render_node};
pub use tree::{NodeId, NodeKind, SyntaxNode, SyntaxTree};
