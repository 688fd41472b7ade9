//! Semantic symbol table for sigsync.
//!
//! The index is rebuilt per project snapshot and is purely derived data: it
//! records types, their declared interfaces, and their members with resolved
//! parameter/return types and nullability, plus enough location data to map
//! symbols back to declaration sites. Refactorings are expected to rebuild it
//! from the snapshot they are about to edit rather than trust a cached one.

mod resolve;
mod types;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sigsync_project::Project;
use sigsync_syntax::{TextRange, TypeDeclKind};
use tracing::trace;

use resolve::ImportScope;
pub use types::{Nullability, Primitive, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Method,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub nullability: Nullability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDetails {
    pub params: Vec<Parameter>,
    pub return_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    /// Containing type name for members.
    pub container: Option<String>,
    /// Path of the document the symbol was recorded in.
    pub file: String,
    /// Byte range of the identifier token.
    pub name_range: TextRange,
    /// Byte range of the full declaration.
    pub decl_range: TextRange,
    /// Signature details when the symbol is a method.
    pub method: Option<MethodDetails>,
}

/// The in-memory symbol table over one project snapshot.
#[derive(Debug, Clone)]
pub struct Index {
    symbols: Vec<Symbol>,
    by_id: HashMap<SymbolId, usize>,
    /// Member symbol indices per containing type, in declaration order.
    members_by_type: HashMap<String, Vec<usize>>,
    /// Directly declared interfaces per class-like type, in clause order.
    implements: HashMap<String, Vec<String>>,
    interface_names: HashSet<String>,
}

impl Index {
    pub fn new(project: &Project) -> Index {
        let mut index = Index {
            symbols: Vec::new(),
            by_id: HashMap::new(),
            members_by_type: HashMap::new(),
            implements: HashMap::new(),
            interface_names: HashSet::new(),
        };

        let mut next_id: u32 = 1;
        for doc in project.documents() {
            let scope = ImportScope::new(&doc.tree().imports);
            for ty in &doc.tree().types {
                let kind = match ty.kind {
                    TypeDeclKind::Interface => SymbolKind::Interface,
                    _ => SymbolKind::Class,
                };
                if kind == SymbolKind::Interface {
                    index.interface_names.insert(ty.name.clone());
                }
                if !ty.implements.is_empty() {
                    index.implements.insert(ty.name.clone(), ty.implements.clone());
                }
                index.push_symbol(Symbol {
                    id: SymbolId(next_id),
                    kind,
                    name: ty.name.clone(),
                    container: None,
                    file: doc.path().to_string(),
                    name_range: ty.name_range,
                    decl_range: ty.decl_range,
                    method: None,
                });
                next_id += 1;

                // Members are recorded interleaved, in declaration order, so
                // "first member named X" means first in source.
                let mut members: Vec<Symbol> = Vec::new();
                for method in &ty.methods {
                    let params = method
                        .params
                        .iter()
                        .map(|p| Parameter {
                            name: p.name.clone(),
                            ty: scope.resolve_type(&p.ty),
                            nullability: Nullability::from_annotations(&p.annotations),
                        })
                        .collect();
                    members.push(Symbol {
                        id: SymbolId(0),
                        kind: SymbolKind::Method,
                        name: method.name.clone(),
                        container: Some(ty.name.clone()),
                        file: doc.path().to_string(),
                        name_range: method.name_range,
                        decl_range: method.decl_range,
                        method: Some(MethodDetails {
                            params,
                            return_type: scope.resolve_type(&method.return_type),
                        }),
                    });
                }
                for field in &ty.fields {
                    members.push(Symbol {
                        id: SymbolId(0),
                        kind: SymbolKind::Field,
                        name: field.name.clone(),
                        container: Some(ty.name.clone()),
                        file: doc.path().to_string(),
                        name_range: field.name_range,
                        decl_range: field.decl_range,
                        method: None,
                    });
                }
                members.sort_by_key(|member| member.decl_range.start);
                for mut member in members {
                    member.id = SymbolId(next_id);
                    next_id += 1;
                    index.push_symbol(member);
                }
            }
        }

        index
    }

    fn push_symbol(&mut self, symbol: Symbol) {
        let idx = self.symbols.len();
        self.by_id.insert(symbol.id, idx);
        if let Some(container) = symbol.container.clone() {
            self.members_by_type.entry(container).or_default().push(idx);
        }
        self.symbols.push(symbol);
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn find_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.by_id.get(&id).and_then(|&idx| self.symbols.get(idx))
    }

    /// All method symbols, in document then declaration order.
    pub fn methods(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols
            .iter()
            .filter(|sym| sym.kind == SymbolKind::Method)
    }

    /// Interface simple names directly declared by a class-like type.
    pub fn class_implements(&self, type_name: &str) -> &[String] {
        self.implements
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_interface(&self, type_name: &str) -> bool {
        self.interface_names.contains(type_name)
    }

    /// Members of a type, in declaration order.
    pub fn members_of(&self, type_name: &str) -> impl Iterator<Item = &Symbol> + '_ {
        self.members_by_type
            .get(type_name)
            .into_iter()
            .flat_map(|indices| indices.iter().map(|&idx| &self.symbols[idx]))
    }

    /// The first member of the containing type's directly declared interfaces
    /// whose name equals the method's name.
    ///
    /// Interfaces are searched in implements-clause order, members in
    /// declaration order; multi-level interface inheritance is not followed.
    /// Overloaded interface members therefore resolve to whichever declaration
    /// comes first.
    pub fn first_interface_member(&self, method: &Symbol) -> Option<&Symbol> {
        let container = method.container.as_deref()?;
        for interface in self.class_implements(container) {
            for member in self.members_of(interface) {
                if member.name == method.name {
                    return Some(member);
                }
            }
        }
        trace!(method = %method.name, container, "no interface member with a matching name");
        None
    }

    /// The most nested method declaration in `file` covering `offset`.
    pub fn method_at(&self, file: &str, offset: usize) -> Option<&Symbol> {
        self.symbols
            .iter()
            .filter(|sym| sym.kind == SymbolKind::Method)
            .filter(|sym| sym.file == file && sym.decl_range.contains(offset))
            .min_by_key(|sym| sym.decl_range.len())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sigsync_project::Project;

    use super::{Index, Nullability, SymbolKind, TypeRef};

    fn project(files: &[(&str, &str)]) -> Project {
        Project::from_sources(files.iter().map(|(p, t)| (p.to_string(), t.to_string())))
    }

    #[test]
    fn resolves_parameter_types_through_imports() {
        let project = project(&[(
            "C.java",
            "import java.util.List;\n\nclass C {\n    void keep(List<String> names) {\n    }\n}\n",
        )]);
        let index = Index::new(&project);
        let method = index.methods().find(|m| m.name == "keep").unwrap();
        let details = method.method.as_ref().unwrap();
        assert_eq!(
            details.params[0].ty,
            TypeRef::generic("java.util.List", vec![TypeRef::named("java.lang.String")]),
        );
    }

    #[test]
    fn records_parameter_nullability() {
        let project = project(&[(
            "C.java",
            "class C {\n    void keep(@Nullable String name, @NonNull String other) {\n    }\n}\n",
        )]);
        let index = Index::new(&project);
        let method = index.methods().find(|m| m.name == "keep").unwrap();
        let details = method.method.as_ref().unwrap();
        assert_eq!(details.params[0].nullability, Nullability::Nullable);
        assert_eq!(details.params[1].nullability, Nullability::NonNull);
    }

    #[test]
    fn first_interface_member_prefers_clause_then_declaration_order() {
        let project = project(&[
            (
                "First.java",
                "interface First {\n    void other();\n\n    void run();\n}\n",
            ),
            ("Second.java", "interface Second {\n    void run();\n}\n"),
            (
                "C.java",
                "class C implements First, Second {\n    public void run() {\n    }\n}\n",
            ),
        ]);
        let index = Index::new(&project);
        let run = index
            .methods()
            .find(|m| m.name == "run" && m.container.as_deref() == Some("C"))
            .unwrap();
        let member = index.first_interface_member(run).unwrap();
        assert_eq!(member.container.as_deref(), Some("First"));
    }

    #[test]
    fn interface_constants_shadow_later_methods_of_the_same_name() {
        let project = project(&[
            (
                "I.java",
                "interface I {\n    int flag = 1;\n\n    void flag(int value);\n}\n",
            ),
            (
                "C.java",
                "class C implements I {\n    public void flag(long value) {\n    }\n}\n",
            ),
        ]);
        let index = Index::new(&project);
        let flag = index
            .methods()
            .find(|m| m.container.as_deref() == Some("C"))
            .unwrap();
        let member = index.first_interface_member(flag).unwrap();
        assert_eq!(member.kind, SymbolKind::Field);
    }

    #[test]
    fn method_at_maps_name_offsets_to_the_declaration() {
        let project = project(&[(
            "C.java",
            "class C {\n    void alpha() {\n    }\n\n    void beta() {\n    }\n}\n",
        )]);
        let index = Index::new(&project);
        let beta = index.methods().find(|m| m.name == "beta").unwrap();
        let found = index.method_at("C.java", beta.name_range.start).unwrap();
        assert_eq!(found.name, "beta");
        assert!(index.method_at("C.java", 0).is_none());
    }
}
