use pretty_assertions::assert_eq;
use sigsync_analysis::analyze_project;
use sigsync_index::Index;
use sigsync_project::Project;
use sigsync_refactor::{sync_parent_signature, SyncOutcome};

fn project(files: &[(&str, &str)]) -> Project {
    Project::from_sources(files.iter().map(|(p, t)| (p.to_string(), t.to_string())))
}

fn apply_first_fix(project: &Project) -> Project {
    let diagnostics = analyze_project(&Index::new(project));
    assert_eq!(diagnostics.len(), 1, "expected one diagnostic");
    let diagnostic = &diagnostics[0];
    match sync_parent_signature(project, &diagnostic.file, diagnostic.range.start) {
        SyncOutcome::Applied { project, .. } => project,
        SyncOutcome::Unchanged => panic!("expected an applied edit"),
    }
}

#[test]
fn rewrites_the_interface_to_match_the_implementation() {
    let project = project(&[
        (
            "I.java",
            "interface I {\n    void foo();\n\n    void other();\n}\n",
        ),
        (
            "C.java",
            "import java.util.concurrent.CompletableFuture;\n\nclass C implements I {\n    public CompletableFuture<Integer> foo(int x) {\n        return null;\n    }\n\n    public void other() {\n    }\n}\n",
        ),
    ]);
    let updated = apply_first_fix(&project);

    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(
        interface.contains("CompletableFuture<Integer> foo(int x);"),
        "updated interface:\n{interface}"
    );
    // Other members are untouched.
    assert!(interface.contains("void other();"));
    // The implementation document is untouched.
    assert_eq!(
        updated.document_by_path("C.java").unwrap().text(),
        project.document_by_path("C.java").unwrap().text(),
    );
}

#[test]
fn repair_then_redetect_is_clean_for_generic_parameters() {
    let project = project(&[
        (
            "I.java",
            "import java.util.List;\n\ninterface I {\n    void foo(List<String> items);\n}\n",
        ),
        (
            "C.java",
            "import java.util.List;\n\nclass C implements I {\n    public void foo(List<Integer> items) {\n    }\n}\n",
        ),
    ]);
    let updated = apply_first_fix(&project);

    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(
        interface.contains("void foo(List<Integer> items);"),
        "updated interface:\n{interface}"
    );
    assert_eq!(analyze_project(&Index::new(&updated)), Vec::new());
}

#[test]
fn generic_reconstruction_is_independent_of_qualified_spelling() {
    let project = project(&[
        (
            "I.java",
            "import java.util.List;\n\ninterface I {\n    void foo(List<String> items);\n}\n",
        ),
        (
            "C.java",
            "class C implements I {\n    public void foo(java.util.List<java.lang.Integer> items) {\n    }\n}\n",
        ),
    ]);
    let updated = apply_first_fix(&project);

    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(
        interface.contains("void foo(List<Integer> items);"),
        "updated interface:\n{interface}"
    );
    // The interface already imports java.util.List, so re-detection is clean.
    assert_eq!(analyze_project(&Index::new(&updated)), Vec::new());
}

#[test]
fn nullability_annotations_are_carried_into_the_interface() {
    let project = project(&[
        ("I.java", "interface I {\n    void foo(String name);\n}\n"),
        (
            "C.java",
            "class C implements I {\n    public void foo(@Nullable String name) {\n    }\n}\n",
        ),
    ]);
    let updated = apply_first_fix(&project);

    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(
        interface.contains("void foo(@Nullable String name);"),
        "updated interface:\n{interface}"
    );
    assert_eq!(analyze_project(&Index::new(&updated)), Vec::new());
}

#[test]
fn throws_clause_and_modifiers_survive_the_rewrite() {
    let project = project(&[
        (
            "I.java",
            "interface I {\n    public abstract void foo() throws java.io.IOException;\n}\n",
        ),
        (
            "C.java",
            "class C implements I {\n    public void foo(int x) {\n    }\n}\n",
        ),
    ]);
    let updated = apply_first_fix(&project);

    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(
        interface.contains("public abstract void foo(int x) throws java.io.IOException;"),
        "updated interface:\n{interface}"
    );
}

#[test]
fn anchors_outside_any_method_produce_no_edit() {
    let project = project(&[("C.java", "class C {\n    public void foo() {\n    }\n}\n")]);
    assert!(matches!(
        sync_parent_signature(&project, "C.java", 0),
        SyncOutcome::Unchanged
    ));
}

#[test]
fn methods_without_an_interface_member_produce_no_edit() {
    let project = project(&[("C.java", "class C {\n    public void foo() {\n    }\n}\n")]);
    let index = Index::new(&project);
    let method = index.methods().next().unwrap();
    assert!(matches!(
        sync_parent_signature(&project, "C.java", method.name_range.start),
        SyncOutcome::Unchanged
    ));
}

#[test]
fn constant_members_produce_no_edit() {
    let project = project(&[
        ("I.java", "interface I {\n    int foo = 1;\n}\n"),
        (
            "C.java",
            "class C implements I {\n    public void foo(int x) {\n    }\n}\n",
        ),
    ]);
    let index = Index::new(&project);
    let method = index
        .methods()
        .find(|m| m.container.as_deref() == Some("C"))
        .unwrap();
    assert!(matches!(
        sync_parent_signature(&project, "C.java", method.name_range.start),
        SyncOutcome::Unchanged
    ));
}

#[test]
fn conflicting_implementers_resolve_first_match_wins() {
    // Two implementers disagree; a repair anchored at one of them rewrites
    // the interface to that implementation alone.
    let project = project(&[
        ("I.java", "interface I {\n    void foo(int x);\n}\n"),
        (
            "A.java",
            "class A implements I {\n    public void foo(long x) {\n    }\n}\n",
        ),
        (
            "B.java",
            "class B implements I {\n    public void foo(short x) {\n    }\n}\n",
        ),
    ]);
    let index = Index::new(&project);
    let a_foo = index
        .methods()
        .find(|m| m.container.as_deref() == Some("A"))
        .unwrap();
    let outcome = sync_parent_signature(&project, "A.java", a_foo.name_range.start);
    let SyncOutcome::Applied { project: updated, .. } = outcome else {
        panic!("expected an applied edit");
    };
    let interface = updated.document_by_path("I.java").unwrap().text();
    assert!(interface.contains("void foo(long x);"));
}
