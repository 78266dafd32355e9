//! crates/dispute_assistant_core/src/tray.rs
//!
//! Staging area for files the user has selected but not yet sent.

use crate::domain::StagedFile;

/// Pending attachments, in selection order. Duplicate names are allowed;
/// removal is by position. Staging is synchronous with user input, so no
/// network state ever touches this struct — clearing on upload success is
/// the conversation service's job.
#[derive(Debug, Default)]
pub struct AttachmentTray {
    staged: Vec<StagedFile>,
}

impl AttachmentTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a newly selected file at the end of the tray.
    pub fn stage(&mut self, file: StagedFile) {
        self.staged.push(file);
    }

    /// Removes exactly the file at `index`, or nothing if out of range.
    pub fn unstage(&mut self, index: usize) -> Option<StagedFile> {
        if index < self.staged.len() {
            Some(self.staged.remove(index))
        } else {
            None
        }
    }

    /// File names in staging order.
    pub fn names(&self) -> Vec<String> {
        self.staged.iter().map(|f| f.name.clone()).collect()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.staged
    }

    /// Empties the tray and hands the files to the upload step.
    pub fn take_all(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.staged)
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn file(name: &str) -> StagedFile {
        StagedFile {
            name: name.to_string(),
            bytes: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn staging_preserves_selection_order_and_duplicates() {
        let mut tray = AttachmentTray::new();
        tray.stage(file("a.pdf"));
        tray.stage(file("b.docx"));
        tray.stage(file("a.pdf"));
        assert_eq!(tray.names(), vec!["a.pdf", "b.docx", "a.pdf"]);
    }

    #[test]
    fn unstage_removes_exactly_one_position() {
        let mut tray = AttachmentTray::new();
        tray.stage(file("a.pdf"));
        tray.stage(file("b.docx"));
        let removed = tray.unstage(0).unwrap();
        assert_eq!(removed.name, "a.pdf");
        assert_eq!(tray.names(), vec!["b.docx"]);
        assert!(tray.unstage(5).is_none());
    }

    #[test]
    fn take_all_clears_the_tray() {
        let mut tray = AttachmentTray::new();
        tray.stage(file("a.pdf"));
        let taken = tray.take_all();
        assert_eq!(taken.len(), 1);
        assert!(tray.is_empty());
    }
}
