use std::fmt;

use crate::text::TextRange;

/// A type reference as written in source: a (possibly qualified) name, an
/// ordered type-argument list, and array dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntax {
    pub name: String,
    pub args: Vec<TypeSyntax>,
    pub dims: usize,
}

impl TypeSyntax {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            dims: 0,
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeSyntax>) -> Self {
        Self {
            name: name.into(),
            args,
            dims: 0,
        }
    }

    /// The identifier after the last `.`, e.g. `List` for `java.util.List`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A formal parameter: leading annotations, modifiers (`final`), type, name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSyntax {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    pub ty: TypeSyntax,
    pub name: String,
}

impl fmt::Display for ParamSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "@{annotation} ")?;
        }
        for modifier in &self.modifiers {
            write!(f, "{modifier} ")?;
        }
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// A method declaration.
///
/// `header_range` covers the declaration from the first modifier (or return
/// type) through the `{` or `;` terminator; leading annotations and trivia sit
/// outside it, so splicing a rendered header over the range preserves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclSyntax {
    pub annotations: Vec<String>,
    pub modifiers: Vec<String>,
    /// Raw type-parameter list for generic methods, e.g. `<T extends Foo>`.
    pub type_params: Option<String>,
    pub return_type: TypeSyntax,
    pub name: String,
    pub params: Vec<ParamSyntax>,
    pub throws: Vec<String>,
    pub has_body: bool,
    pub name_range: TextRange,
    pub header_range: TextRange,
    pub decl_range: TextRange,
}

impl MethodDeclSyntax {
    /// Renders the declaration header, up to and including the terminator.
    pub fn header_text(&self) -> String {
        let mut out = String::new();
        for modifier in &self.modifiers {
            out.push_str(modifier);
            out.push(' ');
        }
        if let Some(type_params) = &self.type_params {
            out.push_str(type_params);
            out.push(' ');
        }
        out.push_str(&self.return_type.to_string());
        out.push(' ');
        out.push_str(&self.name);
        out.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&param.to_string());
        }
        out.push(')');
        if !self.throws.is_empty() {
            out.push_str(" throws ");
            out.push_str(&self.throws.join(", "));
        }
        out.push_str(if self.has_body { " {" } else { ";" });
        out
    }

    /// A copy of this declaration with its parameter list and return type
    /// replaced; everything else is preserved.
    pub fn with_signature(&self, params: Vec<ParamSyntax>, return_type: TypeSyntax) -> Self {
        Self {
            params,
            return_type,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclSyntax {
    pub modifiers: Vec<String>,
    pub ty: TypeSyntax,
    pub name: String,
    pub name_range: TextRange,
    pub decl_range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclSyntax {
    pub kind: TypeDeclKind,
    pub name: String,
    /// Base class simple name for `class Foo extends Bar`.
    pub extends: Option<String>,
    /// Interface simple names from a class's `implements` clause.
    pub implements: Vec<String>,
    /// Interface simple names from an interface's `extends` clause.
    pub extends_interfaces: Vec<String>,
    pub methods: Vec<MethodDeclSyntax>,
    pub fields: Vec<FieldDeclSyntax>,
    pub name_range: TextRange,
    pub decl_range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub is_static: bool,
}

/// The declaration tree recovered from one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceFile {
    pub imports: Vec<ImportDecl>,
    pub types: Vec<TypeDeclSyntax>,
}

impl SourceFile {
    pub fn type_named(&self, name: &str) -> Option<&TypeDeclSyntax> {
        self.types.iter().find(|ty| ty.name == name)
    }

    /// The most nested method declaration whose range covers `offset`.
    pub fn method_declaration_at(&self, offset: usize) -> Option<&MethodDeclSyntax> {
        self.types
            .iter()
            .flat_map(|ty| ty.methods.iter())
            .filter(|method| method.decl_range.contains(offset))
            .min_by_key(|method| method.decl_range.len())
    }

    /// The first method declaration named `name`, in document order.
    pub fn method_named(&self, name: &str) -> Option<&MethodDeclSyntax> {
        self.types
            .iter()
            .flat_map(|ty| ty.methods.iter())
            .find(|method| method.name == name)
    }
}
