mod prompt;
mod table;

use std::path::PathBuf;

use colored::Colorize;
use domain::{
    model::{entity::Job, vo::ParameterSet},
    service::View,
};
use typed_builder::TypedBuilder;

pub use self::prompt::line;
pub use self::table::render_jobs;

/// Line-oriented [`View`] on the controlling terminal.
///
/// Answers given on the command line are used once; after that, or when none
/// was given, the user is asked, unless the view is not interactive.
#[derive(TypedBuilder)]
pub struct TerminalView {
    form: ParameterSet,
    #[builder(default, setter(strip_option))]
    open_path: Option<PathBuf>,
    #[builder(default, setter(strip_option))]
    save_path: Option<PathBuf>,
    #[builder(default)]
    selected: Vec<String>,
    /// Skip the submit confirmation.
    #[builder(default)]
    assume_yes: bool,
    #[builder(default)]
    interactive: bool,
    #[builder(default, setter(skip))]
    jobs: Vec<Job>,
}

impl TerminalView {
    pub fn form_mut(&mut self) -> &mut ParameterSet {
        &mut self.form
    }

    fn ask(&self, label: &str) -> Option<String> {
        if !self.interactive {
            return None;
        }
        prompt::line(label).unwrap_or_else(|e| {
            tracing::warn!("Cannot read answer: {e}");
            None
        })
    }

    /// Maps table numbers back to job ids; anything else is taken as an id.
    fn pick_jobs(&self, answer: &str) -> Vec<String> {
        answer
            .split([',', ' '])
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<usize>() {
                Ok(n) if (1..=self.jobs.len()).contains(&n) => self.jobs[n - 1].id.clone(),
                _ => s.to_owned(),
            })
            .collect()
    }
}

impl View for TerminalView {
    fn password(&mut self) -> Option<String> {
        prompt::password("Password").unwrap_or_else(|e| {
            tracing::warn!("Cannot read password: {e}");
            None
        })
    }

    fn confirm(&mut self, msg: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        prompt::confirm(msg).unwrap_or_else(|e| {
            tracing::warn!("Cannot read answer: {e}");
            false
        })
    }

    fn info(&mut self, msg: &str) {
        println!("{}", msg.green());
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    fn open_path(&mut self) -> Option<PathBuf> {
        self.open_path
            .take()
            .or_else(|| self.ask("Parameter file to load").map(PathBuf::from))
    }

    fn save_path(&mut self) -> Option<PathBuf> {
        self.save_path
            .take()
            .or_else(|| self.ask("Save parameters to").map(PathBuf::from))
    }

    fn parameters(&self) -> ParameterSet {
        self.form.clone()
    }

    fn set_parameters(&mut self, parameters: ParameterSet) {
        self.form.apply(parameters);
    }

    fn reset_parameters(&mut self, parameters: ParameterSet) {
        self.form = parameters;
    }

    fn display_jobs(&mut self, jobs: &[Job]) {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        println!("{}", format!("Jobs at {now}").bold());
        print!("{}", render_jobs(jobs));
        self.jobs = jobs.to_vec();
    }

    fn selected_job_ids(&mut self) -> Vec<String> {
        if !self.selected.is_empty() {
            return std::mem::take(&mut self.selected);
        }
        if self.jobs.is_empty() {
            return vec![];
        }
        print!("{}", render_jobs(&self.jobs));
        self.ask("Jobs to kill (numbers or ids)")
            .map(|answer| self.pick_jobs(&answer))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use domain::model::vo::{Mode, ParameterValue};

    use super::*;

    fn view() -> TerminalView {
        TerminalView::builder()
            .form(Mode::Illumina.template())
            .open_path(PathBuf::from("parameters.txt"))
            .selected(vec!["1.a".to_owned()])
            .build()
    }

    #[test]
    fn command_line_answers_are_used_once() {
        let mut view = view();
        assert_eq!(view.open_path(), Some(PathBuf::from("parameters.txt")));
        assert_eq!(view.open_path(), None);
        assert_eq!(view.save_path(), None);
        assert_eq!(view.selected_job_ids(), ["1.a"]);
        assert!(view.selected_job_ids().is_empty());
    }

    #[test]
    fn loaded_parameters_overlay_the_form() {
        let mut view = view();
        view.form_mut().insert("skip-otu", true);
        view.set_parameters([("threads", "8")].into_iter().collect());

        let form = view.parameters();
        assert_eq!(form.text("threads"), Some("8"));
        assert_eq!(form.get("skip-otu"), Some(&ParameterValue::Flag(false)));
        assert_eq!(form.text("outdir"), Some("output"));
    }

    #[test]
    fn pick_jobs_by_number_or_id() {
        let mut view = view();
        view.jobs = vec![Job::new("10.a", "t"), Job::new("11.b", "t")];
        assert_eq!(view.pick_jobs("2, 10.a 7"), ["11.b", "10.a", "7"]);
    }

    #[test]
    fn assume_yes_skips_confirmation() {
        let mut view = TerminalView::builder()
            .form(ParameterSet::new())
            .assume_yes(true)
            .build();
        assert!(view.confirm("Are you sure you want to submit the job?"));
    }
}
