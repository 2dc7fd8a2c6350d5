use std::io::Write;
use std::rc::Rc;

use navtree_catalog::{Catalog, CatalogError};
use navtree_core::{NavConfig, NodeKey};
use navtree_session::NavigationController;
use navtree_walker::NodePath;
use tempfile::{Builder, NamedTempFile};

const CONSOLE_TOML: &str = r#"
[[entries]]
key = "content"
title = "Content"

[[entries.children]]
key = "articles"
title = "Articles"
outcome = "articles"

[[entries.children]]
key = "front"
title = "Front page"
action = "edit"

[[entries]]
key = "people"
title = "People"
container = true

[[entries]]
title = "Done"
action = "release"
lockable = false
"#;

const CONSOLE_JSON: &str = r#"{
    "entries": [
        {
            "key": "content",
            "title": "Content",
            "children": [
                { "key": "articles", "title": "Articles", "outcome": "articles" },
                { "key": "front", "title": "Front page", "action": "edit" }
            ]
        },
        { "key": "people", "title": "People", "container": true },
        { "title": "Done", "action": "release", "lockable": false }
    ]
}"#;

fn catalog_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn key(k: &str) -> NodeKey {
    NodeKey::new(k).unwrap()
}

fn root() -> NodeKey {
    NavConfig::default().root_key
}

#[test]
fn test_toml_and_json_describe_the_same_catalog() {
    let toml_file = catalog_file(".toml", CONSOLE_TOML);
    let json_file = catalog_file(".json", CONSOLE_JSON);

    let from_toml = Catalog::from_path(toml_file.path(), &root()).unwrap();
    let from_json = Catalog::from_path(json_file.path(), &root()).unwrap();

    assert_eq!(from_toml.entry_count(), 5);
    for container in [root(), key("content"), key("people")] {
        assert_eq!(
            from_toml.children_of(&container),
            from_json.children_of(&container)
        );
    }
}

#[test]
fn test_unsupported_extension() {
    let file = catalog_file(".yaml", "entries: []");
    let err = Catalog::from_path(file.path(), &root()).unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedFormat { .. }));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Catalog::from_path(dir.path().join("absent.json"), &root()).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_malformed_toml() {
    let file = catalog_file(".toml", "[[entries]\ntitle = ");
    let err = Catalog::from_path(file.path(), &root()).unwrap_err();
    assert!(matches!(err, CatalogError::Toml(_)));
}

#[test]
fn test_catalog_drives_a_session() {
    let file = catalog_file(".toml", CONSOLE_TOML);
    let config = NavConfig::default();
    let catalog = Rc::new(Catalog::from_path(file.path(), &config.root_key).unwrap());
    let mut controller =
        NavigationController::new(&config, Rc::clone(&catalog), Rc::clone(&catalog)).unwrap();

    assert_eq!(controller.starting_node(), &key("content"));

    controller.walker_mut().children(&key("content")).unwrap();
    let path: NodePath = "content/front".parse().unwrap();
    let front = controller.walker_mut().resolve_path(&path).unwrap().key().clone();
    assert_eq!(controller.perform(&front).unwrap(), None);
    assert_eq!(controller.current_item(), Some(&front));

    let done = key("root.3");
    assert_eq!(controller.perform(&done).unwrap().as_deref(), Some("cancel"));
    assert_eq!(controller.current_item(), None);

    // The catalog already lists "Articles" under content.
    let created = controller
        .create_child(&key("content"), "Articles", false)
        .unwrap();
    assert_eq!(controller.tree().get(&created).unwrap().title(), "Articles_0");
}

#[test]
fn test_nested_scope_is_loaded_before_naming() {
    let file = catalog_file(
        ".toml",
        r#"
[[entries]]
key = "content"
title = "Content"

[[entries.children]]
key = "archive"
title = "Archive"

[[entries.children.children]]
title = "Report_0"

[[entries.children.children]]
title = "Report_1"
"#,
    );
    let config = NavConfig::default();
    let catalog = Rc::new(Catalog::from_path(file.path(), &config.root_key).unwrap());
    let mut controller =
        NavigationController::new(&config, Rc::clone(&catalog), Rc::clone(&catalog)).unwrap();
    assert!(controller.tree().get(&key("archive")).is_none());

    let path: NodePath = "content/archive".parse().unwrap();
    let scope = controller.walker_mut().load_path(&path).unwrap();
    controller.set_current_category(&scope).unwrap();
    assert_eq!(controller.current_category(), &key("archive"));
    assert_eq!(controller.unique_name("Report", false, None).unwrap(), "Report_2");
}
