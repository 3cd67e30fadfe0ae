use std::path::PathBuf;

use undercity_content::{ContentFactory, ContentRegistry};
use undercity_core::SimConfig;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn shipped_data_matches_the_builtin_catalog() {
    let factory = ContentFactory::new(data_dir());
    let loaded = factory.load_registry().expect("shipped data should load");
    assert_eq!(loaded, ContentRegistry::builtin());
}

#[test]
fn shipped_config_matches_defaults() {
    let factory = ContentFactory::new(data_dir());
    assert_eq!(factory.load_config().unwrap(), SimConfig::default());
}

#[test]
fn copied_data_with_a_broken_reference_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for file in ["enemies.ron", "npcs.ron", "town.ron"] {
        std::fs::copy(data_dir().join(file), dir.path().join(file)).unwrap();
    }
    let enemies = std::fs::read_to_string(dir.path().join("enemies.ron")).unwrap();
    std::fs::write(
        dir.path().join("enemies.ron"),
        enemies.replace("fallback: \"drone\"", "fallback: \"ghost\""),
    )
    .unwrap();

    let error = ContentFactory::new(dir.path()).load_registry().unwrap_err();
    assert!(error.to_string().contains("ghost"));
}
