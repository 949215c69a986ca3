use skillcheck::document::{load_skill, skill_name};
use std::path::Path;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_skill_md(dir: &Path, content: &str) {
    std::fs::write(dir.join("SKILL.md"), content).unwrap();
}

const GUIDE: &str = "---\nname: my-skill\ndescription: Does things\n---\n\n# Guide\n\nbody text\n";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn primary_guide_loads_with_front_matter() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(dir.path(), GUIDE);

    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 1);

    let doc = docs[0].as_ref().unwrap();
    assert!(doc.primary);
    assert_eq!(doc.front_matter.get("name").unwrap(), "my-skill");
    assert_eq!(doc.front_matter.get("description").unwrap(), "Does things");
    // Body is the whole file, front matter included, so line numbers stay
    // in file coordinates.
    assert!(doc.body.starts_with("---\n"));
}

#[test]
fn referenced_sub_document_is_loaded_after_primary() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(
        dir.path(),
        "---\nname: s\ndescription: d\n---\n\nSee [notes](notes.md) for more.\n",
    );
    std::fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();

    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 2);
    assert!(docs[0].as_ref().unwrap().primary);

    let sub = docs[1].as_ref().unwrap();
    assert!(!sub.primary);
    assert!(sub.path.ends_with("notes.md"));
}

#[test]
fn missing_referenced_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(
        dir.path(),
        "---\nname: s\ndescription: d\n---\n\nSee [gone](gone.md).\n",
    );

    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 1);
}

#[test]
fn external_and_escaping_links_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(
        dir.path(),
        "---\nname: s\ndescription: d\n---\n\n[a](https://example.com/x.md) [b](../outside.md)\n",
    );

    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 1);
}

#[test]
fn sub_document_without_front_matter_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(
        dir.path(),
        "---\nname: s\ndescription: d\n---\n\n[ref](ref.md)\n",
    );
    std::fs::write(dir.path().join("ref.md"), "# Plain reference\n").unwrap();

    let docs = load_skill(dir.path());
    let sub = docs[1].as_ref().unwrap();
    assert!(sub.front_matter.is_empty());
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[test]
fn missing_skill_md_is_unreadable_error() {
    let dir = tempfile::tempdir().unwrap();
    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 1);

    let err = docs[0].as_ref().unwrap_err();
    assert_eq!(err.rule_id, "loader/unreadable");
}

#[test]
fn unterminated_front_matter_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(dir.path(), "---\nname: s\ndescription: d\n\n# No closing delimiter\n");

    let docs = load_skill(dir.path());
    let err = docs[0].as_ref().unwrap_err();
    assert_eq!(err.rule_id, "loader/invalid-front-matter");
}

#[test]
fn malformed_front_matter_line_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(dir.path(), "---\nname: s\njust some words\n---\n");

    let docs = load_skill(dir.path());
    let err = docs[0].as_ref().unwrap_err();
    assert_eq!(err.rule_id, "loader/invalid-front-matter");
}

#[test]
fn load_error_does_not_affect_sibling_sub_documents() {
    // The primary fails on front matter, so references cannot be resolved;
    // the skill still yields exactly one (failed) entry.
    let dir = tempfile::tempdir().unwrap();
    write_skill_md(dir.path(), "---\nbroken\n---\n");

    let docs = load_skill(dir.path());
    assert_eq!(docs.len(), 1);
    assert!(docs[0].is_err());
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

#[test]
fn skill_name_is_last_path_component() {
    assert_eq!(skill_name(Path::new("skills/langgraph")), "langgraph");
    assert_eq!(skill_name(Path::new("/")), "unknown");
}
