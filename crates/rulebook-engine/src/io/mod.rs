use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::DiagnosticSink;
use crate::document::parse_document;
use crate::error::RulebookError;
use crate::models::{Aspect, Index};
use crate::repository::Repository;

/// File name of the one index document in a rulebook directory.
pub const INDEX_FILE: &str = "INDEX.yaml";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("Invalid rulebook directory: {0}")]
    InvalidRulebookDir(PathBuf),
    #[error("No {INDEX_FILE} in rulebook directory: {0}")]
    MissingIndex(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn validate_rulebook_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidRulebookDir(path.to_path_buf()));
    }
    Ok(())
}

/// Scan for YAML files directly in the rulebook directory, sorted by name
pub fn scan_yaml_files(rulebook_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    validate_rulebook_dir(rulebook_root)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(rulebook_root)? {
        let path = entry?.path();
        if path.is_file()
            && let Some(ext) = path.extension()
            && ext == "yaml"
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse a whole rulebook directory: `INDEX.yaml` plus every other
/// `*.yaml` file as an aspect, in file name order.
///
/// Stops at the first document that fails to parse. References are not
/// checked here; see [`crate::validate_cross_refs`].
pub fn load_rulebook(
    rulebook_root: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<Repository, RulebookError> {
    let files = scan_yaml_files(rulebook_root)?;
    let index_path = files
        .iter()
        .find(|path| path.file_name().is_some_and(|name| name == INDEX_FILE))
        .ok_or_else(|| IoError::MissingIndex(rulebook_root.to_path_buf()))?;

    let mut repo = Repository::new();
    let source = fs::read_to_string(index_path).map_err(IoError::from)?;
    repo.set_index(parse_document::<Index>(&display_name(index_path), &source, sink)?);

    for path in files.iter().filter(|path| *path != index_path) {
        let source = fs::read_to_string(path).map_err(IoError::from)?;
        let aspect = parse_document::<Aspect>(&display_name(path), &source, sink)?;
        repo.add_unique_aspect(aspect)?;
    }

    sink.progress(&format!(
        "loaded rulebook `{}` with {} aspects",
        rulebook_root.display(),
        repo.aspects().len()
    ));
    Ok(repo)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::error::{ErrorKind, ParseError};
    use crate::tests::{
        ASPECT_YAML, INDEX_YAML, NETWORK_YAML, RecordingSink, create_test_file,
        create_test_rulebook_dir, sample_aspect, sample_index,
    };
    use pretty_assertions::assert_eq;

    fn parse_error(result: Result<Repository, RulebookError>) -> ParseError {
        match result {
            Err(RulebookError::Parse(error)) => error,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_only_top_level_yaml_files() {
        let dir = create_test_rulebook_dir();
        create_test_file(&dir, "b.yaml", "");
        create_test_file(&dir, "a.yaml", "");
        create_test_file(&dir, "notes.md", "");
        create_test_file(&dir, "c.yml", "");
        std::fs::create_dir(dir.path().join("nested.yaml")).unwrap();
        std::fs::write(dir.path().join("nested.yaml").join("d.yaml"), "").unwrap();

        let files = scan_yaml_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|f| display_name(f)).collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml"]);
    }

    #[test]
    fn test_invalid_rulebook_directory() {
        let result = scan_yaml_files(Path::new("/this/path/does/not/exist"));
        assert!(matches!(result, Err(IoError::InvalidRulebookDir(_))));
    }

    #[test]
    fn test_load_rulebook() {
        let dir = create_test_rulebook_dir();
        create_test_file(&dir, "INDEX.yaml", INDEX_YAML);
        create_test_file(&dir, "SEC-01.yaml", ASPECT_YAML);
        create_test_file(&dir, "NET-01.yaml", NETWORK_YAML);

        let sink = RecordingSink::default();
        let repo = load_rulebook(dir.path(), &sink).unwrap();

        assert_eq!(repo.index().unwrap().value, sample_index());
        let ids: Vec<&str> = repo.aspects().iter().map(|a| a.value.id.as_str()).collect();
        assert_eq!(ids, vec!["NET-01", "SEC-01"]);
        assert_eq!(repo.find_aspect_by_id("SEC-01").unwrap().value, sample_aspect());
        assert_eq!(
            repo.aspects()[1].origin.as_ref().unwrap().filename,
            "SEC-01.yaml"
        );
        assert_eq!(
            &sink.progress_messages()[..3],
            &[
                "parsed index `INDEX.yaml`",
                "parsed aspect `NET-01.yaml`",
                "parsed aspect `SEC-01.yaml`",
            ]
        );
    }

    #[test]
    fn test_missing_index() {
        let dir = create_test_rulebook_dir();
        create_test_file(&dir, "SEC-01.yaml", ASPECT_YAML);
        let result = load_rulebook(dir.path(), &NullSink);
        assert!(matches!(
            result,
            Err(RulebookError::Io(IoError::MissingIndex(_)))
        ));
    }

    #[test]
    fn test_first_bad_document_stops_loading() {
        let dir = create_test_rulebook_dir();
        create_test_file(&dir, "INDEX.yaml", INDEX_YAML);
        create_test_file(&dir, "A.yaml", "Id: A\nName: [broken\n");
        create_test_file(&dir, "B.yaml", "Id: B\n");

        let error = parse_error(load_rulebook(dir.path(), &NullSink));
        assert_eq!(error.kind, ErrorKind::Syntax);
        assert_eq!(error.file.as_deref(), Some("A.yaml"));
    }

    #[test]
    fn test_duplicate_aspect_ids_are_rejected() {
        let dir = create_test_rulebook_dir();
        create_test_file(&dir, "INDEX.yaml", INDEX_YAML);
        create_test_file(&dir, "one.yaml", NETWORK_YAML);
        create_test_file(&dir, "two.yaml", NETWORK_YAML);

        let error = parse_error(load_rulebook(dir.path(), &NullSink));
        assert_eq!(error.kind, ErrorKind::Schema);
        assert_eq!(error.file.as_deref(), Some("two.yaml"));
        assert!(error.message.contains("already defined in `one.yaml`"));
    }
}
