use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{fs, path::Path};

use crate::{
    classifier::StatementClassifier,
    error::{GraphError, Result},
    resolver::{FileSystem, SpecifierResolver},
    types::{FileGraph, ImportExportGraph},
};

/// Reads `file` and builds its import/export graph.
pub fn graph_for_file<F: FileSystem>(
    resolver: &SpecifierResolver<F>,
    file: &Path,
) -> Result<FileGraph> {
    trace!("Reading file for graph: {}", file.display());
    let src = fs::read_to_string(file)
        .map_err(|error| GraphError::Io { path: file.to_path_buf(), error })?;

    let graph = graph_for_source(resolver, file, &src)?;
    Ok(FileGraph { path: file.to_path_buf(), graph })
}

/// Parses `source` as the contents of `file` and builds its graph.
///
/// Relative specifiers resolve against the directory of `file`.
pub fn graph_for_source<F: FileSystem>(
    resolver: &SpecifierResolver<F>,
    file: &Path,
    source: &str,
) -> Result<ImportExportGraph> {
    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, source, st).parse();

    if panicked || !errors.is_empty() {
        let diagnostics: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        debug!("Parser reported {} errors in {}", diagnostics.len(), file.display());
        return Err(GraphError::parse_error(file, &diagnostics));
    }

    let graph = StatementClassifier::new(resolver, file).build_graph(&program.body)?;
    debug!(
        "Found {} imports, {} exports, {} reexports in {}",
        graph.imports.len(),
        graph.exports.len(),
        graph.reexports.len(),
        file.display()
    );
    Ok(graph)
}

/// Source type for a path: TypeScript and JSX by extension, CommonJS
/// extensions parse as scripts and everything else as ES modules.
pub fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")))
        .with_module(!matches!(ext, Some("cjs") | Some("cts")))
}
