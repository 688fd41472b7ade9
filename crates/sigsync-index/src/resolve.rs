//! Best-effort name resolution for type references.
//!
//! Simple names are resolved against the file's single-type imports, then a
//! table of well-known `java.lang` types. Anything else resolves to itself
//! (the same-package assumption), which keeps unresolved code comparable
//! without a classpath.

use std::collections::HashMap;

use sigsync_syntax::{ImportDecl, TypeSyntax};

use crate::types::{Primitive, TypeRef};

const JAVA_LANG: &[&str] = &[
    "Boolean",
    "Byte",
    "Character",
    "CharSequence",
    "Class",
    "Comparable",
    "Double",
    "Error",
    "Exception",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Number",
    "Object",
    "Runnable",
    "RuntimeException",
    "Short",
    "String",
    "StringBuilder",
    "System",
    "Thread",
    "Throwable",
    "Void",
];

pub(crate) struct ImportScope {
    by_simple_name: HashMap<String, String>,
}

impl ImportScope {
    pub(crate) fn new(imports: &[ImportDecl]) -> Self {
        let mut by_simple_name = HashMap::new();
        for import in imports {
            if import.is_static || import.path.ends_with(".*") {
                continue;
            }
            let Some(simple) = import.path.rsplit('.').next() else {
                continue;
            };
            by_simple_name
                .entry(simple.to_string())
                .or_insert_with(|| import.path.clone());
        }
        Self { by_simple_name }
    }

    fn resolve_name(&self, name: &str) -> String {
        if name.contains('.') {
            return name.to_string();
        }
        if let Some(qualified) = self.by_simple_name.get(name) {
            return qualified.clone();
        }
        if JAVA_LANG.contains(&name) {
            return format!("java.lang.{name}");
        }
        name.to_string()
    }

    pub(crate) fn resolve_type(&self, syntax: &TypeSyntax) -> TypeRef {
        let base = match Primitive::from_keyword(&syntax.name) {
            Some(primitive) if syntax.args.is_empty() => TypeRef::Primitive(primitive),
            _ => TypeRef::Named {
                qualified: self.resolve_name(&syntax.name),
                args: syntax.args.iter().map(|arg| self.resolve_type(arg)).collect(),
            },
        };
        (0..syntax.dims).fold(base, |ty, _| TypeRef::Array(Box::new(ty)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sigsync_syntax::{ImportDecl, TypeSyntax};

    use super::ImportScope;
    use crate::types::{Primitive, TypeRef};

    fn scope(paths: &[&str]) -> ImportScope {
        let imports: Vec<ImportDecl> = paths
            .iter()
            .map(|p| ImportDecl {
                path: p.to_string(),
                is_static: false,
            })
            .collect();
        ImportScope::new(&imports)
    }

    #[test]
    fn imported_and_qualified_spellings_resolve_alike() {
        let scope = scope(&["java.util.List"]);
        let imported = scope.resolve_type(&TypeSyntax::generic(
            "List",
            vec![TypeSyntax::new("Integer")],
        ));
        let qualified = scope.resolve_type(&TypeSyntax::generic(
            "java.util.List",
            vec![TypeSyntax::new("java.lang.Integer")],
        ));
        assert_eq!(imported, qualified);
        assert_eq!(
            imported,
            TypeRef::generic(
                "java.util.List",
                vec![TypeRef::named("java.lang.Integer")],
            )
        );
    }

    #[test]
    fn primitives_and_arrays_resolve_structurally() {
        let scope = scope(&[]);
        let mut syntax = TypeSyntax::new("int");
        syntax.dims = 1;
        assert_eq!(
            scope.resolve_type(&syntax),
            TypeRef::Array(Box::new(TypeRef::Primitive(Primitive::Int)))
        );
    }

    #[test]
    fn unknown_simple_names_resolve_to_themselves() {
        let scope = scope(&[]);
        assert_eq!(
            scope.resolve_type(&TypeSyntax::new("Widget")),
            TypeRef::named("Widget")
        );
    }
}
