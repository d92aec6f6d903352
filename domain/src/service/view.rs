use std::path::PathBuf;

use crate::model::{entity::Job, vo::ParameterSet};

/// What the controller needs from whatever is showing the form.
///
/// Dialogs return `None` when the user backs out.
pub trait View {
    fn password(&mut self) -> Option<String>;
    fn confirm(&mut self, msg: &str) -> bool;
    fn info(&mut self, msg: &str);
    fn error(&mut self, msg: &str);

    fn open_path(&mut self) -> Option<PathBuf>;
    fn save_path(&mut self) -> Option<PathBuf>;

    /// Current state of the form.
    fn parameters(&self) -> ParameterSet;
    fn set_parameters(&mut self, parameters: ParameterSet);
    /// Replaces the form wholesale, e.g. when switching modes.
    fn reset_parameters(&mut self, parameters: ParameterSet);

    fn display_jobs(&mut self, jobs: &[Job]);
    fn selected_job_ids(&mut self) -> Vec<String>;
}
