//! Repo-local architectural lint for the registrar's hexagonal layout.
//!
//! The `registrar` crate keeps its enrollment rules in `domain` and talks
//! to the outside world through `inbound` (command line) and `outbound`
//! (directories, notifiers, snapshot files) adapters. This crate parses the
//! sources of those three layers and reports:
//!
//! - `domain` code depending on adapter modules or on CLI, configuration,
//!   filesystem and process-level reporting crates
//! - `inbound` adapters importing `outbound` modules or filesystem crates
//! - `outbound` adapters importing `inbound` modules or CLI crates
//!
//! Run it with `cargo run -p architecture-lint` from the workspace root.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;

/// Name the linted crate uses for itself in `use` paths.
const CRATE_NAME: &str = "registrar";

const LAYER_DIRS: [&str; 3] = ["domain", "inbound", "outbound"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `registrar/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io {
        /// Path being read when the failure happened.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Rust source parsing failed.
    Parse {
        /// File that could not be parsed.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "I/O error while linting architecture ({path}): {source}")
            }
            Self::Parse { file, message } => write!(
                f,
                "Failed to parse Rust source while linting architecture ({file}): {message}"
            ),
            Self::Violations(violations) => {
                writeln!(f, "Architecture boundary violations:")?;
                for violation in violations {
                    writeln!(f, "- {violation}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn io_error(path: &Utf8Path) -> impl FnOnce(io::Error) -> ArchitectureLintError + '_ {
    move |source| ArchitectureLintError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Lint the crate sources on disk.
///
/// `crate_dir` must be the `registrar/` directory at the repository root.
pub fn lint_crate_sources(crate_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let src_path = crate_dir.join("src");
    let src_dir =
        Dir::open_ambient_dir(&src_path, ambient_authority()).map_err(io_error(&src_path))?;
    let sources = collect_lint_sources(&src_dir, &src_path)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `registrar/src`.
    pub file: Utf8PathBuf,
    /// Full source text.
    pub contents: String,
}

/// The architectural layer inferred from a file path under `registrar/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Inbound,
    Outbound,
}

impl ModuleLayer {
    fn infer_from_path(relative_path: &Utf8Path) -> Option<Self> {
        match relative_path.components().next()?.as_str() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_module_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from(["config", "inbound", "outbound"]),
            Self::Inbound => BTreeSet::from(["outbound"]),
            Self::Outbound => BTreeSet::from(["inbound"]),
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "camino",
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "tracing_subscriber",
            ]),
            Self::Inbound => BTreeSet::from(["camino", "cap_std", "color_eyre"]),
            Self::Outbound => BTreeSet::from(["clap", "color_eyre", "ortho_config"]),
        }
    }
}

fn lint_parsed_source(file: &Utf8Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_modules = layer.forbidden_module_roots();
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = forbidden_internal_module_root(segments, &forbidden_modules) {
            messages.insert(format!(
                "{layer_name} module must not depend on crate::{root}"
            ));
        }

        if let Some(root) = forbidden_external_crate_root(segments, &forbidden_crates) {
            messages.insert(format!(
                "{layer_name} module must not depend on external crate `{root}`"
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn forbidden_internal_module_root(
    segments: &[String],
    forbidden_roots: &BTreeSet<&'static str>,
) -> Option<&'static str> {
    let root = internal_module_root(segments)?;
    forbidden_roots.get(root).copied()
}

fn forbidden_external_crate_root(
    segments: &[String],
    forbidden_roots: &BTreeSet<&'static str>,
) -> Option<&'static str> {
    let root = external_crate_root(segments)?;
    forbidden_roots.get(root).copied()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if LAYER_DIRS.contains(&first) {
        return Some(first);
    }
    let start_index = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment.as_str()))?,
        CRATE_NAME => 1,
        _ => return None,
    };
    segments.get(start_index).map(String::as_str)
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CRATE_NAME {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(
    src_dir: &Dir,
    src_path: &Utf8Path,
) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer in LAYER_DIRS {
        if !src_dir.is_dir(layer) {
            continue;
        }
        let layer_dir = src_dir
            .open_dir(layer)
            .map_err(io_error(&src_path.join(layer)))?;
        collect_sources_under(&layer_dir, Utf8Path::new(layer), src_path, &mut sources)?;
    }
    sources.sort_by(|left, right| left.file.cmp(&right.file));
    Ok(sources)
}

fn collect_sources_under(
    dir: &Dir,
    relative: &Utf8Path,
    src_path: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let absolute = src_path.join(relative);
    for listed in dir.entries().map_err(io_error(&absolute))? {
        let entry = listed.map_err(io_error(&absolute))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let child = relative.join(&name);
        let file_type = entry.file_type().map_err(io_error(&src_path.join(&child)))?;

        if file_type.is_dir() {
            let nested = dir
                .open_dir(&name)
                .map_err(io_error(&src_path.join(&child)))?;
            collect_sources_under(&nested, &child, src_path, sources)?;
            continue;
        }

        if child.extension() != Some("rs") {
            continue;
        }

        let contents = dir
            .read_to_string(&name)
            .map_err(io_error(&src_path.join(&child)))?;
        sources.push(LintSource {
            file: child,
            contents,
        });
    }
    Ok(())
}
