use domain::model::entity::Job;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct JobRow<'a> {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Job")]
    id: &'a str,
    #[tabled(rename = "Start Time")]
    start_time: &'a str,
    #[tabled(rename = "State")]
    state: &'a str,
}

/// Renders jobs as a table, numbered from 1 so they can be picked.
pub fn render_jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs running\n".to_owned();
    }

    let rows = jobs.iter().enumerate().map(|(i, job)| JobRow {
        index: i + 1,
        id: &job.id,
        start_time: &job.start_time,
        state: job.state.as_ref(),
    });
    let mut table = Table::new(rows).with(Style::blank()).to_string();
    table.push('\n');
    table
}
