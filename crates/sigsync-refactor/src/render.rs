//! Type rendering for reconstructed signatures.
//!
//! Rendering options are an explicit, immutable value handed to the rendering
//! function; the synchronizer's own format is [`PARAMETER_TYPE_DISPLAY`].

use serde::{Deserialize, Serialize};
use sigsync_index::TypeRef;
use sigsync_syntax::TypeSyntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeQualification {
    /// Render only the simple name, e.g. `List` for `java.util.List`.
    NameOnly,
    FullyQualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveStyle {
    /// Render primitives with their keyword spelling, e.g. `int`.
    Keyword,
    /// Render primitives as their boxed library counterpart, e.g. `Integer`.
    Boxed,
}

/// Immutable rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDisplay {
    pub qualification: TypeQualification,
    pub primitives: PrimitiveStyle,
}

/// The format used for reconstructed parameter and return types: short names
/// with native primitive spellings.
pub const PARAMETER_TYPE_DISPLAY: TypeDisplay = TypeDisplay {
    qualification: TypeQualification::NameOnly,
    primitives: PrimitiveStyle::Keyword,
};

/// Renders a resolved type back into syntax, generic-aware: every type
/// argument is rendered with the same options, recursively.
pub fn render_type(ty: &TypeRef, display: TypeDisplay) -> TypeSyntax {
    match ty {
        TypeRef::Primitive(primitive) => match display.primitives {
            PrimitiveStyle::Keyword => TypeSyntax::new(primitive.keyword()),
            PrimitiveStyle::Boxed => match display.qualification {
                TypeQualification::NameOnly => TypeSyntax::new(primitive.boxed_simple()),
                TypeQualification::FullyQualified => TypeSyntax::new(primitive.boxed_qualified()),
            },
        },
        TypeRef::Named { qualified, args } => {
            let name = match display.qualification {
                TypeQualification::NameOnly => qualified
                    .rsplit('.')
                    .next()
                    .unwrap_or(qualified.as_str())
                    .to_string(),
                TypeQualification::FullyQualified => qualified.clone(),
            };
            TypeSyntax::generic(
                name,
                args.iter().map(|arg| render_type(arg, display)).collect(),
            )
        }
        TypeRef::Array(elem) => {
            let mut rendered = render_type(elem, display);
            rendered.dims += 1;
            rendered
        }
    }
}
