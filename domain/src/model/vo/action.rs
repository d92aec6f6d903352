use serde::Deserialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Everything a user can trigger from the form or the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, EnumString, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    IlluminaMode,
    PacbioMode,
    LoadParameters,
    SaveParameters,
    Submit,
    RefreshDashboard,
    KillJobs,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Self::IlluminaMode => "Illumina Mode",
            Self::PacbioMode => "PacBio Mode",
            Self::LoadParameters => "Load Parameters",
            Self::SaveParameters => "Save Parameters",
            Self::Submit => "Submit",
            Self::RefreshDashboard => "Update Dashboard",
            Self::KillJobs => "Kill Jobs",
        }
    }
}
