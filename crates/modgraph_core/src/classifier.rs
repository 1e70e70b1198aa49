use oxc_ast::ast::*;
use std::path::Path;

use crate::{
    error::{GraphError, Result},
    resolver::{FileSystem, OsFileSystem, SpecifierResolver},
    types::{
        Binding, DEFAULT_EXPORT_NAME, DeclarationKind, ExportDeclarationNode, ExportListNode,
        ExportedDeclaration, GraphNode, ImportClause, ImportExportGraph, ImportNode,
        ModuleSpecifier, ReexportClause, ReexportNode, SourceSpan, VarKind,
    },
};

/// Reduces the top-level statements of one module to graph nodes.
///
/// Only module-level statements are inspected. Each specifier met along the
/// way is resolved before its node is emitted, so nodes come out in source
/// order.
pub struct StatementClassifier<'r, F = OsFileSystem> {
    resolver: &'r SpecifierResolver<F>,
    file: &'r Path,
    dirname: &'r Path,
}

impl<'r, F: FileSystem> StatementClassifier<'r, F> {
    pub fn new(resolver: &'r SpecifierResolver<F>, file: &'r Path) -> Self {
        let dirname = file.parent().unwrap_or(Path::new(""));
        Self { resolver, file, dirname }
    }

    /// Classifies every statement in order. The first failure aborts the file.
    pub fn build_graph(&self, statements: &[Statement<'_>]) -> Result<ImportExportGraph> {
        let mut graph = ImportExportGraph::default();
        for stmt in statements {
            if let Some(node) = self.classify(stmt)? {
                graph.push(node);
            }
        }
        Ok(graph)
    }

    /// Maps one statement to its node, or `None` for statements outside the graph.
    pub fn classify(&self, stmt: &Statement<'_>) -> Result<Option<GraphNode>> {
        match stmt {
            Statement::ImportDeclaration(decl) => self.import_node(decl).map(Some),
            Statement::ExportAllDeclaration(decl) => self.reexport_all_node(decl).map(Some),
            Statement::ExportNamedDeclaration(decl) => self.export_named(decl),
            Statement::ExportDefaultDeclaration(decl) => self.export_default(decl),
            _ => Ok(None),
        }
    }

    fn import_node(&self, decl: &ImportDeclaration<'_>) -> Result<GraphNode> {
        let span = SourceSpan::from(decl.span);
        let module_specifier = self.resolve(decl.source.value.as_str())?;

        let clause = match &decl.specifiers {
            None => ImportClause::SideEffect,
            Some(specifiers) => {
                let mut default = None;
                let mut namespace = None;
                let mut named: Option<Vec<Binding>> = None;

                for spec in specifiers {
                    match spec {
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            default = Some(s.local.name.to_string());
                        }
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            namespace = Some(s.local.name.to_string());
                        }
                        ImportDeclarationSpecifier::ImportSpecifier(s) => {
                            let symbol = self.export_name(&s.imported, span)?;
                            let local = s.local.name.as_str();
                            named.get_or_insert_with(Vec::new).push(if symbol == local {
                                Binding::new(local)
                            } else {
                                Binding::aliased(local, symbol)
                            });
                        }
                    }
                }

                match (default, namespace, named) {
                    (Some(default), None, None) => ImportClause::Default(default),
                    (None, Some(namespace), None) => ImportClause::Namespace(namespace),
                    (None, None, Some(named)) => ImportClause::Named(named),
                    // `import {} from "x"`
                    (None, None, None) => ImportClause::Named(Vec::new()),
                    (Some(default), Some(namespace), None) => {
                        ImportClause::DefaultAndNamespace { default, namespace }
                    }
                    (Some(default), None, Some(named)) => {
                        ImportClause::DefaultAndNamed { default, named }
                    }
                    (_, Some(_), Some(_)) => {
                        let details = "namespace import combined with named imports";
                        return Err(self.unsupported(span, details));
                    }
                }
            }
        };

        Ok(GraphNode::Import(ImportNode { module_specifier, span, clause }))
    }

    fn reexport_all_node(&self, decl: &ExportAllDeclaration<'_>) -> Result<GraphNode> {
        let span = SourceSpan::from(decl.span);
        let module_specifier = self.resolve(decl.source.value.as_str())?;
        let alias = decl.exported.as_ref().map(|name| self.export_name(name, span)).transpose()?;

        Ok(GraphNode::Reexport(ReexportNode {
            module_specifier,
            span,
            clause: ReexportClause::Namespace { alias },
        }))
    }

    fn export_named(&self, decl: &ExportNamedDeclaration<'_>) -> Result<Option<GraphNode>> {
        let span = SourceSpan::from(decl.span);

        match (&decl.source, &decl.declaration) {
            (Some(source), None) => {
                let module_specifier = self.resolve(source.value.as_str())?;
                let named = self.export_bindings(&decl.specifiers, span)?;
                Ok(Some(GraphNode::Reexport(ReexportNode {
                    module_specifier,
                    span,
                    clause: ReexportClause::Named(named),
                })))
            }
            (None, None) => {
                let named = self.export_bindings(&decl.specifiers, span)?;
                Ok(Some(GraphNode::ExportList(ExportListNode { span, named })))
            }
            (None, Some(declaration)) if decl.specifiers.is_empty() => {
                self.inline_declaration(declaration, span)
            }
            _ => Err(self.unsupported(span, "declaration combined with an export clause")),
        }
    }

    fn export_default(&self, decl: &ExportDefaultDeclaration<'_>) -> Result<Option<GraphNode>> {
        let span = SourceSpan::from(decl.span);

        let (kind, name) = match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                (function_kind(func), func.id.as_ref().map(|id| id.name.as_str()))
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                (DeclarationKind::Class, class.id.as_ref().map(|id| id.name.as_str()))
            }
            // `export default <expression>` and TypeScript interfaces bind no declaration
            _ => return Ok(None),
        };

        let Some(name) = name else {
            return Err(self.unsupported(span, "anonymous default export of a function or class"));
        };

        Ok(Some(GraphNode::ExportDeclaration(ExportDeclarationNode {
            span,
            kind,
            is_default: true,
            declarations: vec![ExportedDeclaration {
                name: name.to_string(),
                alias: Some(DEFAULT_EXPORT_NAME.to_string()),
                var_kind: None,
            }],
        })))
    }

    fn inline_declaration(
        &self,
        declaration: &Declaration<'_>,
        span: SourceSpan,
    ) -> Result<Option<GraphNode>> {
        let (kind, declarations) = match declaration {
            Declaration::VariableDeclaration(var) => {
                (DeclarationKind::Variable, self.variable_declarations(var, span)?)
            }
            Declaration::FunctionDeclaration(func) => {
                let Some(id) = &func.id else {
                    return Err(self.unsupported(span, "exported function without a name"));
                };
                (function_kind(func), vec![plain_declaration(id.name.as_str())])
            }
            Declaration::ClassDeclaration(class) => {
                let Some(id) = &class.id else {
                    return Err(self.unsupported(span, "exported class without a name"));
                };
                (DeclarationKind::Class, vec![plain_declaration(id.name.as_str())])
            }
            // Type-only declarations (interfaces, type aliases, enums, namespaces)
            _ => return Ok(None),
        };

        Ok(Some(GraphNode::ExportDeclaration(ExportDeclarationNode {
            span,
            kind,
            is_default: false,
            declarations,
        })))
    }

    fn variable_declarations(
        &self,
        var: &VariableDeclaration<'_>,
        span: SourceSpan,
    ) -> Result<Vec<ExportedDeclaration>> {
        let var_kind = match var.kind {
            VariableDeclarationKind::Const => VarKind::Const,
            VariableDeclarationKind::Let => VarKind::Let,
            VariableDeclarationKind::Var => VarKind::Var,
            _ => return Err(self.unsupported(span, "exported `using` declaration")),
        };

        var.declarations
            .iter()
            .map(|declarator| match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(id) => Ok(ExportedDeclaration {
                    name: id.name.to_string(),
                    alias: None,
                    var_kind: Some(var_kind),
                }),
                _ => Err(self.unsupported(span, "exported destructuring pattern")),
            })
            .collect()
    }

    fn export_bindings(
        &self,
        specifiers: &[ExportSpecifier<'_>],
        span: SourceSpan,
    ) -> Result<Vec<Binding>> {
        specifiers
            .iter()
            .map(|spec| {
                let name = self.export_name(&spec.local, span)?;
                let exported = self.export_name(&spec.exported, span)?;
                if name == exported {
                    Ok(Binding::new(name))
                } else {
                    Ok(Binding::aliased(name, exported))
                }
            })
            .collect()
    }

    fn export_name(&self, name: &ModuleExportName<'_>, span: SourceSpan) -> Result<String> {
        match name {
            ModuleExportName::IdentifierName(ident) => Ok(ident.name.to_string()),
            ModuleExportName::IdentifierReference(ident) => Ok(ident.name.to_string()),
            ModuleExportName::StringLiteral(lit) => {
                Err(self.unsupported(span, format!("string literal binding \"{}\"", lit.value)))
            }
        }
    }

    fn resolve(&self, raw: &str) -> Result<ModuleSpecifier> {
        self.resolver.resolve(raw, self.dirname, self.file)
    }

    fn unsupported(&self, span: SourceSpan, details: impl Into<String>) -> GraphError {
        GraphError::unsupported(self.file, span, details)
    }
}

fn function_kind(func: &Function<'_>) -> DeclarationKind {
    if func.generator { DeclarationKind::GeneratorFunction } else { DeclarationKind::Function }
}

fn plain_declaration(name: &str) -> ExportedDeclaration {
    ExportedDeclaration { name: name.to_string(), alias: None, var_kind: None }
}
