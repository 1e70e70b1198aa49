//! Ordered constant lists used by specifier resolution and file collection.
//!
//! Order matters: the first matching prefix is stripped, and the first
//! extension (or index file) that names an existing file wins.

/// Transport tags recognized at the front of a module specifier.
///
/// A tag is recorded on the resolved specifier and stripped before
/// classification; it never affects which file is resolved.
pub const TRANSPORT_PREFIXES: &[&str] = &["copy:", "webworker:"];

/// Extensions appended to an extensionless relative specifier (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx"];

/// Stem of the file probed when a relative specifier names a directory
pub const INDEX_STEM: &str = "index";

/// File extensions treated as JavaScript/TypeScript sources when scanning
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];
