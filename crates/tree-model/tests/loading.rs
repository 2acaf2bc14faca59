use std::io::Write;

use tree_model::{MalformedInputError, TreeModel};

#[test]
fn test_from_path_reads_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "name": "Root", "children": [{{ "name": "B" }}, {{ "name": "A" }}] }}"#
    )
    .unwrap();

    let tree = TreeModel::from_path(file.path()).unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.node(tree.root()).name(), "Root");
}

#[test]
fn test_from_path_missing_file_has_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = TreeModel::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to open tree file"));
}

#[test]
fn test_from_path_keeps_malformed_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "children": [] }}"#).unwrap();

    let err = TreeModel::from_path(file.path()).unwrap_err();
    assert_eq!(
        err.downcast_ref::<MalformedInputError>(),
        Some(&MalformedInputError::MissingName {
            path: "<root>".into()
        })
    );
}

#[test]
fn test_empty_document_is_parse_error() {
    let err = TreeModel::from_reader("".as_bytes()).unwrap_err();
    assert!(matches!(err, MalformedInputError::Parse(_)));
}
