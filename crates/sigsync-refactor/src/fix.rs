//! Fix registration for the host's fix-application surface.

use sigsync_analysis::{analyze_project, Diagnostic, RULE_ID};
use sigsync_index::Index;
use sigsync_project::Project;
use tracing::debug;

use crate::sync::{sync_parent_signature, SyncOutcome};

pub const FIX_TITLE: &str = "Sync interface signature with implementation";
pub const FIX_EQUIVALENCE_KEY: &str = "sync-interface-signature";

/// A registered repair for one diagnostic: a title, an equivalence key, and a
/// total transformation over project snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFix {
    pub title: &'static str,
    pub equivalence_key: &'static str,
    file: String,
    offset: usize,
}

impl CodeFix {
    /// Runs the synchronizer against `project`.
    ///
    /// When the repair cannot complete, the input snapshot is returned
    /// unmodified; the transformation never fails.
    pub fn apply(&self, project: &Project) -> Project {
        match sync_parent_signature(project, &self.file, self.offset) {
            SyncOutcome::Applied { project, .. } => project,
            SyncOutcome::Unchanged => project.clone(),
        }
    }
}

/// Offers a fix for diagnostics carrying the detector's rule id.
pub fn code_fix_for(diagnostic: &Diagnostic) -> Option<CodeFix> {
    if diagnostic.code != RULE_ID {
        return None;
    }
    Some(CodeFix {
        title: FIX_TITLE,
        equivalence_key: FIX_EQUIVALENCE_KEY,
        file: diagnostic.file.clone(),
        offset: diagnostic.range.start,
    })
}

/// Batch driver: repeatedly detects and applies the first applicable fix
/// until detection is clean or a round makes no progress.
///
/// Each inner invocation still repairs a single flagged method. The loop is
/// bounded by the initial diagnostic count, so implementations that keep
/// rewriting the same interface against each other cannot spin forever.
pub fn fix_all(project: &Project) -> Project {
    let mut current = project.clone();
    let mut budget = analyze_project(&Index::new(&current)).len();
    while budget > 0 {
        budget -= 1;
        let diagnostics = analyze_project(&Index::new(&current));
        if diagnostics.is_empty() {
            break;
        }
        let mut progressed = false;
        for diagnostic in &diagnostics {
            let Some(fix) = code_fix_for(diagnostic) else {
                continue;
            };
            if let SyncOutcome::Applied { project, .. } =
                sync_parent_signature(&current, &fix.file, fix.offset)
            {
                current = project;
                progressed = true;
                break;
            }
        }
        if !progressed {
            debug!("no remaining diagnostic could be repaired");
            break;
        }
    }
    current
}
