use path_clean::clean;
use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    constants::{INDEX_STEM, RESOLVE_EXTENSIONS, TRANSPORT_PREFIXES},
    error::{GraphError, Result},
    types::ModuleSpecifier,
};

/// Filesystem access needed by specifier resolution.
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file.
    ///
    /// A missing path is `Ok(false)`; any other failure is an error.
    fn is_file(&self, path: &Path) -> io::Result<bool>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_file(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) => match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Ok(false),
                _ => Err(e),
            },
        }
    }
}

/// Turns raw specifier text into a [`ModuleSpecifier`].
#[derive(Debug, Clone, Default)]
pub struct SpecifierResolver<F = OsFileSystem> {
    fs: F,
}

impl<F: FileSystem> SpecifierResolver<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Resolves `raw` as written in `from_file`, whose directory is `dirname`.
    ///
    /// Package ids are returned verbatim without touching the filesystem.
    /// Relative specifiers resolve to the first existing candidate among the
    /// literal path, the path with each of [`RESOLVE_EXTENSIONS`] appended,
    /// and `<path>/index` with each extension appended.
    pub fn resolve(&self, raw: &str, dirname: &Path, from_file: &Path) -> Result<ModuleSpecifier> {
        let (prefix, request) = split_prefix(raw);

        if !request.starts_with('.') {
            return Ok(ModuleSpecifier {
                specifier: request.to_string(),
                is_package_id: true,
                prefix: prefix.map(str::to_string),
            });
        }

        let base = dirname.join(request);
        for candidate in candidates(&base) {
            let found = self
                .fs
                .is_file(&candidate)
                .map_err(|error| GraphError::Io { path: candidate.clone(), error })?;
            if found {
                return Ok(ModuleSpecifier {
                    specifier: candidate.to_string_lossy().into_owned(),
                    is_package_id: false,
                    prefix: prefix.map(str::to_string),
                });
            }
        }

        Err(GraphError::UnresolvedSpecifier {
            specifier: raw.to_string(),
            from: from_file.to_path_buf(),
        })
    }
}

/// Splits off the first recognized transport prefix.
pub fn split_prefix(raw: &str) -> (Option<&'static str>, &str) {
    for prefix in TRANSPORT_PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return (Some(*prefix), rest);
        }
    }
    (None, raw)
}

/// Candidate files for a relative specifier, in probe order.
///
/// Extensions are appended to the joined text before normalizing, so a
/// directory form such as `.`, `./` or `./lib/` never turns into a sibling
/// file (`./lib/` gives `lib/.js`, not `lib.js`).
fn candidates(base: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    let with_extension = RESOLVE_EXTENSIONS.iter().map(move |ext| {
        let mut path = OsString::from(base.as_os_str());
        path.push(ext);
        clean(PathBuf::from(path))
    });
    let index =
        RESOLVE_EXTENSIONS.iter().map(move |ext| clean(base.join(format!("{INDEX_STEM}{ext}"))));

    std::iter::once(clean(base)).chain(with_extension).chain(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[derive(Default)]
    struct CountingFileSystem {
        probes: AtomicUsize,
    }

    impl FileSystem for CountingFileSystem {
        fn is_file(&self, path: &Path) -> io::Result<bool> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            OsFileSystem.is_file(path)
        }
    }

    struct DeniedFileSystem;

    impl FileSystem for DeniedFileSystem {
        fn is_file(&self, _path: &Path) -> io::Result<bool> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_package_id_is_verbatim_without_probing() {
        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let spec = resolver.resolve("lodash", Path::new("/src"), Path::new("/src/a.ts")).unwrap();

        assert_eq!(spec.specifier, "lodash");
        assert!(spec.is_package_id);
        assert_eq!(spec.prefix, None);
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scoped_and_absolute_specifiers_are_packages() {
        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let dir = Path::new("/src");
        let file = Path::new("/src/a.ts");

        assert!(resolver.resolve("@scope/pkg/sub", dir, file).unwrap().is_package_id);
        assert!(resolver.resolve("/abs/path", dir, file).unwrap().is_package_id);
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prefix_on_package_id() {
        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let spec =
            resolver.resolve("webworker:worker-pkg", Path::new("/"), Path::new("/a.js")).unwrap();

        assert_eq!(spec.prefix.as_deref(), Some("webworker:"));
        assert_eq!(spec.specifier, "worker-pkg");
        assert!(spec.is_package_id);
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_prefix_on_relative_specifier() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target = create_test_file(root, "x.js", "");
        let from = root.join("main.js");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let spec = resolver.resolve("copy:./x", root, &from).unwrap();

        assert_eq!(spec.prefix.as_deref(), Some("copy:"));
        assert!(!spec.is_package_id);
        assert_eq!(PathBuf::from(&spec.specifier), target);
    }

    #[test]
    fn test_literal_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let target = create_test_file(root, "data.json", "{}");
        create_test_file(root, "data.json.js", "");

        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let spec = resolver.resolve("./data.json", root, &root.join("main.js")).unwrap();

        assert_eq!(PathBuf::from(&spec.specifier), target);
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_js_preferred_over_ts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let js = create_test_file(root, "a.js", "");
        create_test_file(root, "a.ts", "");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let from = root.join("main.ts");
        let first = resolver.resolve("./a", root, &from).unwrap();
        let second = resolver.resolve("./a", root, &from).unwrap();

        assert_eq!(PathBuf::from(&first.specifier), js);
        assert_eq!(first, second);
    }

    #[test]
    fn test_extension_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "b.tsx", "");
        let jsx = create_test_file(root, "b.jsx", "");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let spec = resolver.resolve("./b", root, &root.join("main.ts")).unwrap();
        assert_eq!(PathBuf::from(&spec.specifier), jsx);
    }

    #[test]
    fn test_directory_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "utils/index.tsx", "");
        let index_ts = create_test_file(root, "utils/index.ts", "");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let spec = resolver.resolve("./utils", root, &root.join("main.ts")).unwrap();
        assert_eq!(PathBuf::from(&spec.specifier), index_ts);
    }

    #[test]
    fn test_directory_is_not_a_literal_match() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let index = create_test_file(root, "lib/index.js", "");

        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let spec = resolver.resolve("./lib", root, &root.join("main.js")).unwrap();

        assert_eq!(PathBuf::from(&spec.specifier), index);
        // literal + 4 extensions + first index candidate
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_directory_forms_resolve_to_index() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let src = root.join("src");
        let lib_index = create_test_file(root, "src/lib/index.js", "");
        let src_index = create_test_file(root, "src/index.js", "");
        let root_index = create_test_file(root, "index.js", "");
        // Siblings named after the directories must never win over their index files
        let lib_sibling = create_test_file(root, "src/lib.js", "");
        create_test_file(root, "src.js", "");
        let from = src.join("main.js");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let resolve =
            |raw: &str| PathBuf::from(resolver.resolve(raw, &src, &from).unwrap().specifier);

        assert_eq!(resolve("."), src_index);
        assert_eq!(resolve("./"), src_index);
        assert_eq!(resolve("./lib/"), lib_index);
        assert_eq!(resolve(".."), root_index);
        assert_eq!(resolve("../"), root_index);
        assert_eq!(resolve("../src/"), src_index);
        // without the trailing slash the sibling file still comes first
        assert_eq!(resolve("./lib"), lib_sibling);
    }

    #[test]
    fn test_directory_form_without_index_is_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let src = root.join("src");
        create_test_file(root, "src/lib.js", "");
        fs::create_dir_all(src.join("lib")).unwrap();

        let resolver = SpecifierResolver::new(OsFileSystem);
        let err = resolver.resolve("./lib/", &src, &src.join("main.js")).unwrap_err();
        assert!(matches!(err, GraphError::UnresolvedSpecifier { .. }));
    }

    #[test]
    fn test_parent_relative_specifier() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let shared = create_test_file(root, "shared.ts", "");
        let from = create_test_file(root, "pages/home.ts", "");

        let resolver = SpecifierResolver::new(OsFileSystem);
        let spec = resolver.resolve("../shared", &root.join("pages"), &from).unwrap();
        assert_eq!(PathBuf::from(&spec.specifier), shared);
    }

    #[test]
    fn test_unresolved_specifier() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let from = root.join("main.js");

        let resolver = SpecifierResolver::new(CountingFileSystem::default());
        let err = resolver.resolve("./missing", root, &from).unwrap_err();

        match err {
            GraphError::UnresolvedSpecifier { specifier, from: importer } => {
                assert_eq!(specifier, "./missing");
                assert_eq!(importer, from);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(resolver.file_system().probes.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_probe_failure_is_io_error() {
        let resolver = SpecifierResolver::new(DeniedFileSystem);
        let from = Path::new("/src/main.js");
        let err = resolver.resolve("./a", Path::new("/src"), from).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix("copy:./a"), (Some("copy:"), "./a"));
        assert_eq!(split_prefix("webworker:./w"), (Some("webworker:"), "./w"));
        assert_eq!(split_prefix("./copy:a"), (None, "./copy:a"));
        assert_eq!(split_prefix("copy:copy:./a"), (Some("copy:"), "copy:./a"));
    }
}
