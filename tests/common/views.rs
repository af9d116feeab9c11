//! Recording view for integration tests.

use tubedeck::api::{HistoryEntry, VideoInfo};
use tubedeck::session::{CompletedFile, ProgressUpdate, View};

/// View that records every render call so tests can assert on the sequence.
#[derive(Default)]
pub struct RecordingView {
    pub loading: Vec<bool>,
    pub previews: Vec<VideoInfo>,
    pub progress: Vec<ProgressUpdate>,
    pub processing: Vec<String>,
    pub completed: Vec<CompletedFile>,
    pub errors: Vec<String>,
    pub histories: Vec<Vec<HistoryEntry>>,
}

impl View for RecordingView {
    fn set_loading(&mut self, on: bool) {
        self.loading.push(on);
    }
    fn show_preview(&mut self, info: &VideoInfo) {
        self.previews.push(info.clone());
    }
    fn show_progress(&mut self, update: &ProgressUpdate) {
        self.progress.push(*update);
    }
    fn show_processing(&mut self, message: &str) {
        self.processing.push(message.to_string());
    }
    fn show_completed(&mut self, file: &CompletedFile) {
        self.completed.push(file.clone());
    }
    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.histories.push(entries.to_vec());
    }
}
