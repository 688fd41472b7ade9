//! Mismatch detector: flags implementing methods whose signatures drifted
//! from the interface member they implement.
//!
//! Detection is a pure function over the semantic index. It holds no state,
//! so it is safe to run concurrently across unrelated symbols, and every
//! lookup failure (no interfaces, no matching member, the match is not a
//! method) degrades to "no diagnostic" rather than an error.

use sigsync_index::{Index, MethodDetails, Symbol};
use sigsync_syntax::TextRange;
use tracing::trace;

/// Rule identifier carried by every diagnostic this crate emits.
pub const RULE_ID: &str = "interface-signature-mismatch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub file: String,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn warning(
        code: &'static str,
        message: impl Into<String>,
        file: impl Into<String>,
        range: TextRange,
    ) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            file: file.into(),
            range,
        }
    }
}

/// Runs the detector over every method symbol in the index.
pub fn analyze_project(index: &Index) -> Vec<Diagnostic> {
    index
        .methods()
        .filter_map(|method| analyze_method(index, method))
        .collect()
}

/// Decides whether one method symbol signals a diagnostic.
///
/// The method's containing type must directly list an interface exposing a
/// member of the same name; the first such member is compared structurally.
pub fn analyze_method(index: &Index, method: &Symbol) -> Option<Diagnostic> {
    let details = method.method.as_ref()?;
    let member = index.first_interface_member(method)?;
    let Some(parent) = member.method.as_ref() else {
        // The name resolved to a constant or other non-method member.
        trace!(method = %method.name, "matched interface member is not a method");
        return None;
    };

    if signatures_agree(details, parent) {
        return None;
    }

    Some(Diagnostic::warning(
        RULE_ID,
        format!(
            "signature of '{}' no longer matches the interface member it implements",
            method.name
        ),
        method.file.clone(),
        method.name_range,
    ))
}

/// The mismatch predicate, checked from the implementation's parameter list
/// outward: extra or reordered interface parameters that the implementation
/// does not mention are not separately reported.
///
/// Return types are compared by simple name only; generic arguments of the
/// return type are not part of the predicate.
fn signatures_agree(implementation: &MethodDetails, interface: &MethodDetails) -> bool {
    if implementation.params.len() != interface.params.len() {
        return false;
    }
    if implementation.return_type.simple_name() != interface.return_type.simple_name() {
        return false;
    }
    implementation.params.iter().all(|param| {
        interface.params.iter().any(|candidate| {
            candidate.name == param.name
                && candidate.ty == param.ty
                && candidate.nullability == param.nullability
        })
    })
}
