use std::{
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};
use modgraph_core::{
    Binding, DeclarationKind, ExportDeclarationNode, ExportNode, FileGraph, ImportClause,
    ImportNode, ModuleSpecifier, ReexportClause, ReexportNode, VarKind,
};

use crate::types::ScanResult;

/// Relativize a path to the current working directory for clickable links
fn relativize_to_cwd(path: &Path) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return path.to_string_lossy().to_string();
        }
    };

    match make_relative(path, &cwd) {
        Some(rel_path) => {
            trace!("Relativized '{}' to '{}'", path.display(), rel_path.display());
            rel_path.to_string_lossy().to_string()
        }
        None => path.to_string_lossy().to_string(),
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components().peekable();
    let mut base_components = base.components().peekable();

    if target_components.peek() != base_components.peek() {
        return None;
    }

    // Skip the common prefix
    while let (Some(t), Some(b)) = (target_components.peek(), base_components.peek()) {
        if t != b {
            break;
        }
        target_components.next();
        base_components.next();
    }

    let mut result = PathBuf::new();
    for _ in base_components {
        result.push("..");
    }
    for component in target_components {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

fn display_specifier(spec: &ModuleSpecifier) -> String {
    let target = if spec.is_package_id {
        spec.specifier.clone()
    } else {
        relativize_to_cwd(Path::new(&spec.specifier))
    };
    format!("\"{}{}\"", spec.prefix.as_deref().unwrap_or(""), target)
}

fn display_bindings(bindings: &[Binding]) -> String {
    let parts: Vec<String> = bindings
        .iter()
        .map(|b| match &b.alias {
            Some(alias) => format!("{} as {}", b.name, alias),
            None => b.name.clone(),
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

/// Import bindings store the local id first; print them the way they are written.
fn display_import_bindings(bindings: &[Binding]) -> String {
    let parts: Vec<String> = bindings
        .iter()
        .map(|b| match b.symbol_id() {
            Some(symbol) => format!("{} as {}", symbol, b.local_id()),
            None => b.local_id().to_string(),
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

fn describe_import(node: &ImportNode) -> String {
    let from = display_specifier(&node.module_specifier);
    let clause = match &node.clause {
        ImportClause::SideEffect => return format!("{} {}", "import".magenta(), from),
        ImportClause::Default(id) => id.clone(),
        ImportClause::Namespace(ns) => format!("* as {ns}"),
        ImportClause::Named(named) => display_import_bindings(named),
        ImportClause::DefaultAndNamespace { default, namespace } => {
            format!("{default}, * as {namespace}")
        }
        ImportClause::DefaultAndNamed { default, named } => {
            format!("{}, {}", default, display_import_bindings(named))
        }
    };
    format!("{} {} from {}", "import".magenta(), clause, from)
}

fn describe_reexport(node: &ReexportNode) -> String {
    let clause = match &node.clause {
        ReexportClause::Named(named) => display_bindings(named),
        ReexportClause::Namespace { alias: Some(alias) } => format!("* as {alias}"),
        ReexportClause::Namespace { alias: None } => "*".to_string(),
    };
    format!("{} {} from {}", "export".cyan(), clause, display_specifier(&node.module_specifier))
}

fn describe_declaration(node: &ExportDeclarationNode) -> String {
    let keyword = match node.kind {
        DeclarationKind::Variable => match node.declarations.first().and_then(|d| d.var_kind) {
            Some(VarKind::Let) => "let",
            Some(VarKind::Var) => "var",
            Some(VarKind::Const) | None => "const",
        },
        DeclarationKind::Function => "function",
        DeclarationKind::GeneratorFunction => "function*",
        DeclarationKind::Class => "class",
    };
    let names: Vec<&str> = node.declarations.iter().map(|d| d.name.as_str()).collect();
    let default = if node.is_default { " default" } else { "" };
    format!("{}{} {} {}", "export".green(), default, keyword, names.join(", "))
}

fn describe_export(node: &ExportNode) -> String {
    match node {
        ExportNode::List(list) => format!("{} {}", "export".green(), display_bindings(&list.named)),
        ExportNode::Declaration(decl) => describe_declaration(decl),
    }
}

fn print_file_graph<W: Write>(writer: &mut W, file_graph: &FileGraph) -> io::Result<()> {
    let graph = &file_graph.graph;
    trace!("Printing {} nodes for {}", graph.len(), file_graph.path.display());

    writeln!(
        writer,
        "{} ({} imports, {} exports, {} re-exports)",
        relativize_to_cwd(&file_graph.path).blue(),
        graph.imports.len(),
        graph.exports.len(),
        graph.reexports.len()
    )?;

    let mut lines: Vec<(u32, String)> = Vec::with_capacity(graph.len());
    lines.extend(graph.imports.iter().map(|n| (n.span.start, describe_import(n))));
    lines.extend(graph.exports.iter().map(|n| (n.span().start, describe_export(n))));
    lines.extend(graph.reexports.iter().map(|n| (n.span.start, describe_reexport(n))));
    lines.sort_by_key(|(start, _)| *start);

    for (idx, (_, line)) in lines.iter().enumerate() {
        let prefix = if idx == lines.len() - 1 { "└──" } else { "├──" };
        writeln!(writer, "{}  {}", prefix.dimmed(), line)?;
    }

    writeln!(writer)?;
    Ok(())
}

/// Prints each file's graph as a tree, then its failures and a summary.
pub fn print_graph_tree<W: Write>(writer: &mut W, result: &ScanResult) -> io::Result<()> {
    debug!("Printing graph tree for {} files", result.graphs.len());

    for file_graph in &result.graphs {
        print_file_graph(writer, file_graph)?;
    }

    for failure in &result.failures {
        writeln!(
            writer,
            "{} {}\n    {}",
            "✗".red().bold(),
            relativize_to_cwd(&failure.path).bright_white().bold(),
            failure.message.red()
        )?;
    }
    if result.has_failures() {
        writeln!(writer)?;
    }

    print_summary(writer, result)?;
    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, result: &ScanResult) -> io::Result<()> {
    let imports: usize = result.graphs.iter().map(|g| g.graph.imports.len()).sum();
    let exports: usize = result.graphs.iter().map(|g| g.graph.exports.len()).sum();
    let reexports: usize = result.graphs.iter().map(|g| g.graph.reexports.len()).sum();

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Files: {}", result.graphs.len().to_string().cyan().bold())?;
    writeln!(
        writer,
        "  Imports: {}  Exports: {}  Re-exports: {}",
        imports.to_string().cyan(),
        exports.to_string().cyan(),
        reexports.to_string().cyan()
    )?;
    if result.has_failures() {
        writeln!(writer, "  Failed: {}", result.failures.len().to_string().red().bold())?;
    }
    Ok(())
}

/// Writes the whole scan result as pretty-printed JSON.
pub fn print_graph_json<W: Write>(writer: &mut W, result: &ScanResult) -> io::Result<()> {
    debug!("Printing graph JSON for {} files", result.graphs.len());
    serde_json::to_writer_pretty(&mut *writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Failure;
    use modgraph_core::{ExportListNode, ExportedDeclaration, ImportExportGraph, SourceSpan};

    fn package(name: &str) -> ModuleSpecifier {
        ModuleSpecifier { specifier: name.to_string(), is_package_id: true, prefix: None }
    }

    fn sample_result() -> ScanResult {
        let mut graph = ImportExportGraph::default();
        graph.imports.push(ImportNode {
            module_specifier: package("module"),
            span: SourceSpan::new(0, 40),
            clause: ImportClause::Named(vec![Binding::aliased("alias1", "name1")]),
        });
        graph.exports.push(ExportNode::Declaration(ExportDeclarationNode {
            span: SourceSpan::new(41, 60),
            kind: DeclarationKind::Variable,
            is_default: false,
            declarations: vec![ExportedDeclaration {
                name: "a".to_string(),
                alias: None,
                var_kind: Some(VarKind::Let),
            }],
        }));
        graph.reexports.push(ReexportNode {
            module_specifier: ModuleSpecifier {
                specifier: "worker".to_string(),
                is_package_id: true,
                prefix: Some("webworker:".to_string()),
            },
            span: SourceSpan::new(61, 90),
            clause: ReexportClause::Namespace { alias: Some("w".to_string()) },
        });
        graph.exports.push(ExportNode::List(ExportListNode {
            span: SourceSpan::new(91, 120),
            named: vec![Binding::aliased("x", "default")],
        }));

        ScanResult {
            root: PathBuf::from("/project"),
            graphs: vec![FileGraph { path: PathBuf::from("/project/src/main.ts"), graph }],
            failures: vec![Failure {
                path: PathBuf::from("/project/src/broken.ts"),
                message: "failed to parse".to_string(),
            }],
        }
    }

    #[test]
    fn test_print_graph_tree() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_graph_tree(&mut out, &sample_result()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("(1 imports, 2 exports, 1 re-exports)"));
        assert!(text.contains("├──  import { name1 as alias1 } from \"module\""));
        assert!(text.contains("├──  export let a"));
        assert!(text.contains("├──  export * as w from \"webworker:worker\""));
        assert!(text.contains("└──  export { x as default }"));
        assert!(text.contains("✗"));
        assert!(text.contains("failed to parse"));
        assert!(text.contains("Failed: 1"));
    }

    #[test]
    fn test_print_graph_json() {
        let mut out = Vec::new();
        print_graph_json(&mut out, &sample_result()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let graph = &json["graphs"][0]["graph"];
        assert_eq!(graph["imports"][0]["named"][0]["localId"], "alias1");
        assert_eq!(graph["imports"][0]["named"][0]["symbolId"], "name1");
        assert_eq!(graph["imports"][0]["moduleSpecifier"]["isPackageId"], true);
        assert_eq!(graph["exports"][0]["type"], "ExportDeclaration");
        assert_eq!(graph["exports"][1]["type"], "ExportList");
        assert_eq!(graph["reexports"][0]["namespaceAlias"], "w");
        assert_eq!(json["failures"][0]["message"], "failed to parse");
    }

    #[test]
    fn test_describe_declarations() {
        colored::control::set_override(false);
        let node = ExportDeclarationNode {
            span: SourceSpan::new(0, 10),
            kind: DeclarationKind::GeneratorFunction,
            is_default: true,
            declarations: vec![ExportedDeclaration {
                name: "gen".to_string(),
                alias: Some("default".to_string()),
                var_kind: None,
            }],
        };
        assert_eq!(describe_declaration(&node), "export default function* gen");
    }

    #[test]
    fn test_make_relative_same_dir() {
        let result = make_relative(Path::new("/project/src/file.ts"), Path::new("/project/src"));
        assert_eq!(result, Some(PathBuf::from("file.ts")));
    }

    #[test]
    fn test_make_relative_parent_dir() {
        let target = Path::new("/project/src/file.ts");
        let base = Path::new("/project/src/components");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../file.ts")));
    }

    #[test]
    fn test_make_relative_sibling_dir() {
        let target = Path::new("/project/apps/web/index.ts");
        let base = Path::new("/project/apps/api");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../web/index.ts")));
    }

    #[test]
    fn test_make_relative_same_path() {
        let result = make_relative(Path::new("/project/src"), Path::new("/project/src"));
        assert_eq!(result, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_make_relative_different_roots() {
        assert_eq!(make_relative(Path::new("a/b"), Path::new("/x")), None);
    }
}
