// src/graph/mod.rs
mod analyzer;
mod snapshot;

pub use analyzer::{graph_issues, DependencyGraphAnalyzer};
pub use snapshot::{
    CircularDependency, ComponentDeclaration, DependencyGraphSnapshot, DependencyKind,
    MissingDependency,
};
