//! Conversions into LSP types for hosts that surface diagnostics and repairs
//! over the language server protocol.

use std::collections::HashMap;

use lsp_types::{
    CodeAction, CodeActionKind, DiagnosticSeverity, NumberOrString, Position, Range,
    TextEdit as LspTextEdit, Uri, WorkspaceEdit as LspWorkspaceEdit,
};
use sigsync_analysis::{Diagnostic, Severity};
use sigsync_project::Project;
use thiserror::Error;

use crate::sync::SyncOutcome;

#[derive(Debug, Error)]
pub enum LspConversionError {
    #[error("invalid uri for document {0:?}")]
    InvalidUri(String),
}

pub fn diagnostic_to_lsp(text: &str, diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: Range {
            start: offset_to_position(text, diagnostic.range.start),
            end: offset_to_position(text, diagnostic.range.end),
        },
        severity: Some(match diagnostic.severity {
            Severity::Error => DiagnosticSeverity::ERROR,
            Severity::Warning => DiagnosticSeverity::WARNING,
            Severity::Info => DiagnosticSeverity::INFORMATION,
        }),
        code: Some(NumberOrString::String(diagnostic.code.to_string())),
        source: Some("sigsync".to_string()),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

/// Converts an applied synchronization into an LSP workspace edit against the
/// snapshot the synchronizer ran on. Returns `Ok(None)` for
/// [`SyncOutcome::Unchanged`].
pub fn sync_outcome_to_lsp(
    before: &Project,
    outcome: &SyncOutcome,
) -> Result<Option<LspWorkspaceEdit>, LspConversionError> {
    let SyncOutcome::Applied { project, document } = outcome else {
        return Ok(None);
    };
    let (Some(old), Some(new)) = (before.document(*document), project.document(*document)) else {
        return Ok(None);
    };

    let uri = document_uri(old.path())?;
    let edit = LspTextEdit {
        range: Range {
            start: Position {
                line: 0,
                character: 0,
            },
            end: offset_to_position(old.text(), old.text().len()),
        },
        new_text: new.text().to_string(),
    };
    let mut changes: HashMap<Uri, Vec<LspTextEdit>> = HashMap::new();
    changes.insert(uri, vec![edit]);
    Ok(Some(LspWorkspaceEdit {
        changes: Some(changes),
        document_changes: None,
        change_annotations: None,
    }))
}

/// Wraps a workspace edit into a quick-fix code action.
pub fn code_action_for_edit(title: impl Into<String>, edit: LspWorkspaceEdit) -> CodeAction {
    CodeAction {
        title: title.into(),
        kind: Some(CodeActionKind::QUICKFIX),
        edit: Some(edit),
        is_preferred: Some(true),
        ..Default::default()
    }
}

fn document_uri(path: &str) -> Result<Uri, LspConversionError> {
    let normalized = path.replace('\\', "/");
    let uri = if normalized.starts_with('/') {
        format!("file://{normalized}")
    } else {
        format!("file:///{normalized}")
    };
    uri.parse::<Uri>()
        .map_err(|_| LspConversionError::InvalidUri(path.to_string()))
}

fn offset_to_position(text: &str, offset: usize) -> Position {
    let mut line: u32 = 0;
    let mut col_utf16: u32 = 0;
    let mut i = 0usize;
    for ch in text.chars() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col_utf16 = 0;
        } else {
            col_utf16 += ch.len_utf16() as u32;
        }
        i += ch.len_utf8();
    }
    Position {
        line,
        character: col_utf16,
    }
}
