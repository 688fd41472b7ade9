//! The signature synchronizer.
//!
//! `sync_parent_signature` re-derives everything from the project snapshot it
//! is handed: it recomputes the method symbol at the diagnostic's anchor and
//! repeats the interface-member lookup instead of trusting cached diagnostic
//! state, so a stale anchor simply produces no edit.

use sigsync_index::{Index, MethodDetails, Nullability, Symbol};
use sigsync_project::{Document, DocumentId, Project};
use sigsync_syntax::{MethodDeclSyntax, ParamSyntax};
use tracing::{debug, trace};

use crate::render::{render_type, PARAMETER_TYPE_DISPLAY};

/// Result of one synchronization attempt.
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// A new snapshot differing from the input in exactly one document.
    Applied {
        project: Project,
        document: DocumentId,
    },
    /// Some lookup did not resolve; the input project is left as it was.
    Unchanged,
}

/// Rewrites the interface member implemented by the method at
/// `(file, offset)` so its signature matches the implementation.
///
/// `offset` is expected to fall inside the implementing method's declaration
/// (the detector anchors diagnostics at the method name). Every resolution
/// failure returns [`SyncOutcome::Unchanged`].
pub fn sync_parent_signature(project: &Project, file: &str, offset: usize) -> SyncOutcome {
    let index = Index::new(project);

    let Some(method) = index.method_at(file, offset) else {
        trace!(file, offset, "no method declaration at the anchor");
        return SyncOutcome::Unchanged;
    };
    let Some(details) = method.method.as_ref() else {
        return SyncOutcome::Unchanged;
    };
    let Some(member) = index.first_interface_member(method) else {
        trace!(method = %method.name, "method does not implement an interface member");
        return SyncOutcome::Unchanged;
    };
    if member.method.is_none() {
        trace!(member = %member.name, "matched interface member is not a method");
        return SyncOutcome::Unchanged;
    }

    let Some(parent_doc) = resolve_parent_document(project, member, method) else {
        debug!(member = %member.name, "no document resolved for the interface declaration");
        return SyncOutcome::Unchanged;
    };
    let Some(old_decl) = parent_declaration_in(parent_doc, member) else {
        debug!(member = %member.name, "interface declaration node not found");
        return SyncOutcome::Unchanged;
    };

    let params = reconcile_parameters(&old_decl.params, rebuild_parameters(details));
    let return_type = render_type(&details.return_type, PARAMETER_TYPE_DISPLAY);
    let updated = old_decl.with_signature(params, return_type);

    let new_doc = parent_doc.with_method_replaced(old_decl, &updated);
    SyncOutcome::Applied {
        project: project.with_document(new_doc),
        document: parent_doc.id(),
    }
}

/// Rebuilds the parameter list from the implementation's resolved signature.
///
/// Names are carried over verbatim; nullability annotations are carried so
/// the repaired pair agrees under the detector's predicate.
fn rebuild_parameters(details: &MethodDetails) -> Vec<ParamSyntax> {
    details
        .params
        .iter()
        .map(|param| ParamSyntax {
            annotations: match param.nullability {
                Nullability::Nullable => vec!["Nullable".to_string()],
                Nullability::NonNull => vec!["NonNull".to_string()],
                Nullability::Unannotated => Vec::new(),
            },
            modifiers: Vec::new(),
            ty: render_type(&param.ty, PARAMETER_TYPE_DISPLAY),
            name: param.name.clone(),
        })
        .collect()
}

/// Parameter-list reconciliation policy: full replacement. The old list only
/// survives through what the new one re-states.
fn reconcile_parameters(_old: &[ParamSyntax], new: Vec<ParamSyntax>) -> Vec<ParamSyntax> {
    new
}

/// Resolves the document currently containing the interface declaration.
///
/// The fallback chain runs in order; the first match wins:
/// 1. exact match on the file path recorded at the member's declaration;
/// 2. a document named `<ContainingTypeName>.java`;
/// 3. any document (other than the implementation's own) whose tree declares
///    a method with the implementing method's name.
fn resolve_parent_document<'a>(
    project: &'a Project,
    member: &Symbol,
    implementation: &Symbol,
) -> Option<&'a Document> {
    if let Some(doc) = project.documents().find(|doc| doc.path() == member.file) {
        return Some(doc);
    }

    if let Some(container) = member.container.as_deref() {
        let file_name = format!("{container}.java");
        if let Some(doc) = project.documents().find(|doc| doc.name() == file_name) {
            debug!(document = doc.path(), "resolved interface document by type name");
            return Some(doc);
        }
    }

    let doc = project.documents().find(|doc| {
        doc.path() != implementation.file && doc.tree().method_named(&implementation.name).is_some()
    })?;
    debug!(document = doc.path(), "resolved interface document by project scan");
    Some(doc)
}

/// Locates the member's declaration node inside the resolved document.
fn parent_declaration_in<'a>(doc: &'a Document, member: &Symbol) -> Option<&'a MethodDeclSyntax> {
    if doc.path() == member.file {
        doc.tree().method_declaration_at(member.name_range.start)
    } else {
        // The declaration moved since the symbol was recorded; fall back to
        // the first method carrying the member's name.
        doc.tree().method_named(&member.name)
    }
}
