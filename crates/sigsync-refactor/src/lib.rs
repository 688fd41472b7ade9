//! Signature synchronizer for sigsync.
//!
//! Given a method flagged by the detector, this crate rebuilds the interface
//! member's parameter list and return type from the implementation, resolves
//! which document actually contains the interface declaration, and produces a
//! new project snapshot with exactly that one document updated. Every
//! resolution failure degrades to "no change"; the synchronizer never errors
//! out of its own logic.

mod fix;
mod render;
mod sync;

pub mod lsp;

pub use fix::{code_fix_for, fix_all, CodeFix, FIX_EQUIVALENCE_KEY, FIX_TITLE};
pub use render::{render_type, PrimitiveStyle, TypeDisplay, TypeQualification, PARAMETER_TYPE_DISPLAY};
pub use sync::{sync_parent_signature, SyncOutcome};
