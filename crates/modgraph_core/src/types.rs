use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// Byte offsets of a statement in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Text covered by this span, if it lies inside `source`.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start as usize..self.end as usize)
    }
}

impl From<oxc_span::Span> for SourceSpan {
    fn from(span: oxc_span::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Target of an import or export-from clause.
///
/// Package ids are kept verbatim. Relative specifiers hold the path of the
/// regular file they resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpecifier {
    pub specifier: String,
    pub is_package_id: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// One entry of a brace-delimited binding list.
///
/// The same shape serves imports and exports, oriented per statement kind:
///
/// - imports: `name` is the local id and `alias` the exported symbol it
///   renames, so `{ X as Y }` gives name `Y`, alias `X`
/// - exports and re-exports: `name` is the original name and `alias` the
///   exported one, so `{ X as Y }` gives name `X`, alias `Y`
///
/// `alias` is absent for unrenamed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Binding {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), alias: None }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self { name: name.into(), alias: Some(alias.into()) }
    }

    /// Import view: the name bound in the importing module.
    pub fn local_id(&self) -> &str {
        &self.name
    }

    /// Import view: the exported name this binding renames.
    pub fn symbol_id(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

/// Binding shape of an import statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportClause {
    /// `import "x"`
    SideEffect,
    /// `import a from "x"`
    Default(String),
    /// `import * as ns from "x"`
    Namespace(String),
    /// `import { a, b as c } from "x"`
    Named(Vec<Binding>),
    /// `import a, * as ns from "x"`
    DefaultAndNamespace { default: String, namespace: String },
    /// `import a, { b } from "x"`
    DefaultAndNamed { default: String, named: Vec<Binding> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    pub module_specifier: ModuleSpecifier,
    pub span: SourceSpan,
    pub clause: ImportClause,
}

impl ImportNode {
    pub fn default(&self) -> Option<&str> {
        match &self.clause {
            ImportClause::Default(id)
            | ImportClause::DefaultAndNamespace { default: id, .. }
            | ImportClause::DefaultAndNamed { default: id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match &self.clause {
            ImportClause::Namespace(id)
            | ImportClause::DefaultAndNamespace { namespace: id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn named(&self) -> Option<&[Binding]> {
        match &self.clause {
            ImportClause::Named(named) | ImportClause::DefaultAndNamed { named, .. } => Some(named),
            _ => None,
        }
    }

    pub fn is_side_effect(&self) -> bool {
        matches!(self.clause, ImportClause::SideEffect)
    }
}

/// Binding shape of a re-export statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReexportClause {
    /// `export { a, b as c } from "x"`
    Named(Vec<Binding>),
    /// `export * from "x"` (no alias) or `export * as ns from "x"`
    Namespace { alias: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReexportNode {
    pub module_specifier: ModuleSpecifier,
    pub span: SourceSpan,
    pub clause: ReexportClause,
}

impl ReexportNode {
    pub fn named(&self) -> Option<&[Binding]> {
        match &self.clause {
            ReexportClause::Named(named) => Some(named),
            ReexportClause::Namespace { .. } => None,
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.clause, ReexportClause::Namespace { .. })
    }

    pub fn namespace_alias(&self) -> Option<&str> {
        match &self.clause {
            ReexportClause::Namespace { alias } => alias.as_deref(),
            ReexportClause::Named(_) => None,
        }
    }
}

/// Alias that re-labels an export list entry as the module's default export.
pub const DEFAULT_EXPORT_NAME: &str = "default";

/// `export { a, b as c }` over locally declared symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportListNode {
    pub span: SourceSpan,
    pub named: Vec<Binding>,
}

impl ExportListNode {
    /// Local name re-labelled as the default export, if any.
    pub fn default_export(&self) -> Option<&str> {
        self.named
            .iter()
            .find(|binding| binding.alias.as_deref() == Some(DEFAULT_EXPORT_NAME))
            .map(|binding| binding.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Variable,
    Function,
    GeneratorFunction,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDeclaration {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Set only for variable declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_kind: Option<VarKind>,
}

/// `export const a = 1`, `export function f() {}`, `export default class C {}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDeclarationNode {
    pub span: SourceSpan,
    pub kind: DeclarationKind,
    pub is_default: bool,
    pub declarations: Vec<ExportedDeclaration>,
}

/// Entries of [`ImportExportGraph::exports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ExportNode {
    #[serde(rename = "ExportList")]
    List(ExportListNode),
    #[serde(rename = "ExportDeclaration")]
    Declaration(ExportDeclarationNode),
}

impl ExportNode {
    pub fn span(&self) -> SourceSpan {
        match self {
            ExportNode::List(node) => node.span,
            ExportNode::Declaration(node) => node.span,
        }
    }
}

/// One classified top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphNode {
    Import(ImportNode),
    Reexport(ReexportNode),
    ExportList(ExportListNode),
    ExportDeclaration(ExportDeclarationNode),
}

impl GraphNode {
    pub fn span(&self) -> SourceSpan {
        match self {
            GraphNode::Import(node) => node.span,
            GraphNode::Reexport(node) => node.span,
            GraphNode::ExportList(node) => node.span,
            GraphNode::ExportDeclaration(node) => node.span,
        }
    }
}

/// Imports, exports and re-exports of one module, each in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportExportGraph {
    pub imports: Vec<ImportNode>,
    pub exports: Vec<ExportNode>,
    pub reexports: Vec<ReexportNode>,
}

impl ImportExportGraph {
    pub fn push(&mut self, node: GraphNode) {
        match node {
            GraphNode::Import(node) => self.imports.push(node),
            GraphNode::Reexport(node) => self.reexports.push(node),
            GraphNode::ExportList(node) => self.exports.push(ExportNode::List(node)),
            GraphNode::ExportDeclaration(node) => self.exports.push(ExportNode::Declaration(node)),
        }
    }

    pub fn len(&self) -> usize {
        self.imports.len() + self.exports.len() + self.reexports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Graph of one file, as handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGraph {
    pub path: PathBuf,
    pub graph: ImportExportGraph,
}

// Imports and re-exports serialize in their flat record shape, with every
// optional field omitted when absent.

/// Import binding as written out: `{ symbolId as localId }`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportBindingRecord<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol_id: Option<&'a str>,
}

impl<'a> From<&'a Binding> for ImportBindingRecord<'a> {
    fn from(binding: &'a Binding) -> Self {
        Self { local_id: binding.local_id(), symbol_id: binding.symbol_id() }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatImport<'a> {
    module_specifier: &'a ModuleSpecifier,
    span: SourceSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    named: Option<Vec<ImportBindingRecord<'a>>>,
}

impl Serialize for ImportNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatImport {
            module_specifier: &self.module_specifier,
            span: self.span,
            default: self.default(),
            namespace: self.namespace(),
            named: self.named().map(|named| named.iter().map(ImportBindingRecord::from).collect()),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatReexport<'a> {
    module_specifier: &'a ModuleSpecifier,
    span: SourceSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    named: Option<&'a [Binding]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_alias: Option<&'a str>,
}

impl Serialize for ReexportNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatReexport {
            module_specifier: &self.module_specifier,
            span: self.span,
            named: self.named(),
            namespace: self.is_namespace().then_some(true),
            namespace_alias: self.namespace_alias(),
        }
        .serialize(serializer)
    }
}
