use serde::{Deserialize, Serialize};

/// Java's primitive types (plus `void`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn from_keyword(keyword: &str) -> Option<Primitive> {
        Some(match keyword {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "char" => Primitive::Char,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "void" => Primitive::Void,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Char => "char",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    /// The boxed library counterpart's simple name, e.g. `Integer` for `int`.
    pub fn boxed_simple(self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Char => "Character",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::Void => "Void",
        }
    }

    /// The boxed library counterpart's qualified name.
    pub fn boxed_qualified(self) -> String {
        format!("java.lang.{}", self.boxed_simple())
    }
}

/// A resolved semantic type reference.
///
/// Equality is structural, so the same type spelled through an import and
/// fully qualified compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Primitive(Primitive),
    Named {
        qualified: String,
        args: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(qualified: impl Into<String>) -> TypeRef {
        TypeRef::Named {
            qualified: qualified.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(qualified: impl Into<String>, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::Named {
            qualified: qualified.into(),
            args,
        }
    }

    /// The type's simple name: keyword for primitives, the identifier after
    /// the last `.` for named types, the element's simple name plus `[]` for
    /// arrays. Generic arguments are not part of the simple name.
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Primitive(p) => p.keyword().to_string(),
            TypeRef::Named { qualified, .. } => qualified
                .rsplit('.')
                .next()
                .unwrap_or(qualified.as_str())
                .to_string(),
            TypeRef::Array(elem) => format!("{}[]", elem.simple_name()),
        }
    }
}

/// Parameter nullability recovered from annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    Unannotated,
    Nullable,
    NonNull,
}

impl Nullability {
    pub fn from_annotations(annotations: &[String]) -> Nullability {
        for annotation in annotations {
            let simple = annotation.rsplit('.').next().unwrap_or(annotation);
            match simple {
                "Nullable" => return Nullability::Nullable,
                "NonNull" | "NotNull" | "Nonnull" => return Nullability::NonNull,
                _ => {}
            }
        }
        Nullability::Unannotated
    }
}
