use pretty_assertions::assert_eq;

use crate::{parse, TypeDeclKind, TypeSyntax};

#[test]
fn parses_interface_members_in_order() {
    let src = "\
interface Greeter {
    int LIMIT = 3;

    void greet(String name);

    String describe();
}
";
    let file = parse(src);
    let decl = file.type_named("Greeter").expect("interface parsed");
    assert_eq!(decl.kind, TypeDeclKind::Interface);
    assert_eq!(decl.fields.len(), 1);
    assert_eq!(decl.fields[0].name, "LIMIT");
    let names: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["greet", "describe"]);

    let greet = &decl.methods[0];
    assert!(!greet.has_body);
    assert_eq!(greet.params.len(), 1);
    assert_eq!(greet.params[0].name, "name");
    assert_eq!(greet.params[0].ty, TypeSyntax::new("String"));
    assert_eq!(&src[greet.name_range.start..greet.name_range.end], "greet");
}

#[test]
fn parses_implements_clause_and_annotated_method() {
    let src = "\
class Greeter implements Api, java.io.Serializable {
    @Override
    public void greet(@Nullable String name) {
        System.out.println(name);
    }
}
";
    let file = parse(src);
    let decl = file.type_named("Greeter").expect("class parsed");
    assert_eq!(decl.implements, vec!["Api".to_string(), "Serializable".to_string()]);

    let greet = &decl.methods[0];
    assert_eq!(greet.annotations, vec!["Override".to_string()]);
    assert_eq!(greet.modifiers, vec!["public".to_string()]);
    assert_eq!(greet.params[0].annotations, vec!["Nullable".to_string()]);
    assert!(greet.has_body);
}

#[test]
fn parses_generic_types_with_nested_arguments() {
    let src = "\
class Store {
    public java.util.Map<String, java.util.List<Integer>> index(Map<String, Integer> counts) {
        return null;
    }
}
";
    let file = parse(src);
    let method = file.method_named("index").expect("method parsed");
    assert_eq!(method.return_type.name, "java.util.Map");
    assert_eq!(method.return_type.args.len(), 2);
    assert_eq!(method.return_type.args[1].name, "java.util.List");
    assert_eq!(method.return_type.args[1].args, vec![TypeSyntax::new("Integer")]);
    assert_eq!(method.params[0].ty.args.len(), 2);
}

#[test]
fn header_range_covers_modifiers_through_terminator() {
    let src = "\
interface I {
    // Greets someone.
    void greet(String name) throws java.io.IOException;
}
";
    let file = parse(src);
    let method = file.method_named("greet").expect("method parsed");
    assert_eq!(
        &src[method.header_range.start..method.header_range.end],
        "void greet(String name) throws java.io.IOException;"
    );
    assert_eq!(method.throws, vec!["java.io.IOException".to_string()]);
    // Re-rendering reproduces the canonical header.
    assert_eq!(
        method.header_text(),
        "void greet(String name) throws java.io.IOException;"
    );
}

#[test]
fn method_declaration_at_maps_offsets_back_to_declarations() {
    let src = "\
class C {
    void first() {
    }

    void second() {
    }
}
";
    let file = parse(src);
    let second = file.method_named("second").unwrap();
    let found = file
        .method_declaration_at(second.name_range.start)
        .expect("declaration found");
    assert_eq!(found.name, "second");
    assert!(file.method_declaration_at(src.len().saturating_sub(1)).is_none());
}

#[test]
fn collects_imports_and_skips_constructors() {
    let src = "\
import java.util.List;
import static java.util.Objects.requireNonNull;

class C {
    C(int seed) {
    }

    List<String> names() {
        return null;
    }
}
";
    let file = parse(src);
    assert_eq!(file.imports.len(), 2);
    assert_eq!(file.imports[0].path, "java.util.List");
    assert!(file.imports[1].is_static);

    let decl = file.type_named("C").unwrap();
    let names: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["names"]);
}

#[test]
fn field_initializers_are_not_mistaken_for_methods() {
    let src = "\
class C {
    private int cached = compute();
    private int[] xs = {1, 2};

    int compute() {
        return 1;
    }
}
";
    let file = parse(src);
    let decl = file.type_named("C").unwrap();
    let methods: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(methods, vec!["compute"]);
    let fields: Vec<_> = decl.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(fields, vec!["cached", "xs"]);
}

#[test]
fn rendered_signature_replaces_parameters_wholesale() {
    let src = "\
interface I {
    void foo();
}
";
    let file = parse(src);
    let method = file.method_named("foo").unwrap();
    let updated = method.with_signature(
        vec![crate::ParamSyntax {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            ty: TypeSyntax::new("int"),
            name: "x".to_string(),
        }],
        TypeSyntax::generic("CompletableFuture", vec![TypeSyntax::new("Integer")]),
    );
    assert_eq!(updated.header_text(), "CompletableFuture<Integer> foo(int x);");
}
