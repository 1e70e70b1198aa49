//! Import/export graph extraction for JavaScript/TypeScript modules.
//!
//! This crate turns the top-level statements of a parsed module into an
//! [`ImportExportGraph`]:
//! - Classifying import, re-export and export statements into graph nodes
//! - Resolving module specifiers to package ids or concrete files on disk
//! - Parsing source files with oxc and building one graph per file
//!
//! A graph is all-or-nothing: any unsupported construct or unresolved
//! relative specifier fails the whole file with a [`GraphError`].

mod classifier;
mod constants;
mod error;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use classifier::StatementClassifier;
pub use constants::{INDEX_STEM, RESOLVE_EXTENSIONS, SOURCE_EXTENSIONS, TRANSPORT_PREFIXES};
pub use error::{GraphError, Result};
pub use parser::{graph_for_file, graph_for_source, source_type_for};
pub use resolver::{FileSystem, OsFileSystem, SpecifierResolver, split_prefix};
pub use types::{
    Binding, DEFAULT_EXPORT_NAME, DeclarationKind, ExportDeclarationNode, ExportListNode,
    ExportNode, ExportedDeclaration, FileGraph, GraphNode, ImportClause, ImportExportGraph,
    ImportNode, ModuleSpecifier, ReexportClause, ReexportNode, SourceSpan, VarKind,
};
