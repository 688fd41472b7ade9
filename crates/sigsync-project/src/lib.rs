//! Document set and project snapshots.
//!
//! A [`Project`] is an immutable, ordered collection of documents. Editing
//! never mutates a snapshot: replacing one document's tree yields a new
//! `Project` that structurally shares every untouched document, so a partially
//! built edit is never observable from concurrently running analysis.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sigsync_syntax::{parse, MethodDeclSyntax, SourceFile};

/// Stable identity of a document within a project, independent of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    path: String,
    text: String,
    tree: SourceFile,
}

impl Document {
    fn new(id: DocumentId, path: String, text: String) -> Self {
        let tree = parse(&text);
        Self {
            id,
            path,
            text,
            tree,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The display name: the final path segment, e.g. `I.java`.
    pub fn name(&self) -> &str {
        self.path
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(&self.path)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &SourceFile {
        &self.tree
    }

    /// A copy of this document with `new` spliced over `old`'s header range,
    /// reparsed so the returned tree is consistent with the returned text.
    pub fn with_method_replaced(&self, old: &MethodDeclSyntax, new: &MethodDeclSyntax) -> Document {
        let header = new.header_text();
        let mut text =
            String::with_capacity(self.text.len() - old.header_range.len() + header.len());
        text.push_str(&self.text[..old.header_range.start]);
        text.push_str(&header);
        text.push_str(&self.text[old.header_range.end..]);
        Document::new(self.id, self.path.clone(), text)
    }
}

/// An immutable project snapshot.
#[derive(Debug, Clone, Default)]
pub struct Project {
    documents: Vec<Arc<Document>>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a project from `(path, text)` pairs, preserving iteration order.
    pub fn from_sources<I, P, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        let mut project = Self::new();
        for (path, text) in sources {
            project.add_document(path, text);
        }
        project
    }

    /// Adds a document while assembling the initial snapshot.
    pub fn add_document(&mut self, path: impl Into<String>, text: impl Into<String>) -> DocumentId {
        let id = DocumentId(self.documents.len() as u32);
        self.documents
            .push(Arc::new(Document::new(id, path.into(), text.into())));
        id
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.iter().map(|doc| doc.as_ref())
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents
            .iter()
            .map(|doc| doc.as_ref())
            .find(|doc| doc.id == id)
    }

    pub fn document_by_path(&self, path: &str) -> Option<&Document> {
        self.documents
            .iter()
            .map(|doc| doc.as_ref())
            .find(|doc| doc.path == path)
    }

    /// A new snapshot with `document` replacing the entry that shares its id.
    ///
    /// Unknown ids leave the snapshot unchanged. All other documents are
    /// shared with `self`.
    pub fn with_document(&self, document: Document) -> Project {
        let mut documents = self.documents.clone();
        if let Some(slot) = documents.iter_mut().find(|doc| doc.id == document.id) {
            *slot = Arc::new(document);
        }
        Project { documents }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::Project;

    #[test]
    fn snapshots_share_untouched_documents() {
        let mut project = Project::new();
        let a = project.add_document("A.java", "class A {\n    void foo() {\n    }\n}\n");
        let b = project.add_document("B.java", "class B {\n}\n");

        let doc = project.document(a).unwrap();
        let method = doc.tree().method_named("foo").unwrap();
        let updated_method = method.clone();
        let updated = project.with_document(doc.with_method_replaced(method, &updated_method));

        let before = project.documents.iter().find(|d| d.id() == b).unwrap();
        let after = updated.documents.iter().find(|d| d.id() == b).unwrap();
        assert!(Arc::ptr_eq(before, after));
        assert_eq!(updated.document(a).unwrap().text(), doc.text());
    }

    #[test]
    fn document_names_are_final_path_segments() {
        let mut project = Project::new();
        let id = project.add_document("src/main/java/I.java", "interface I {\n}\n");
        assert_eq!(project.document(id).unwrap().name(), "I.java");
    }
}
