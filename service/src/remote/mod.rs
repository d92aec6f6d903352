//! Shell text sent to the pipeline host and parsing of what comes back.

pub mod pipeline;
pub mod screen;
pub mod submission;

#[rustfmt::skip]
pub use self::{
    pipeline::pipeline_command,
    screen::{is_killable_name, kill_command, listing_command, KillError, ListingError, ScreenListing},
    submission::{job_name, SubmitScript},
};
