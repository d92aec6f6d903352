use std::sync::LazyLock;

use domain::model::entity::{Job, JobState};
use regex::Regex;

/// Characters a session name may use so it can go on a `screen -S` command
/// line unquoted.
const NAME_CHARS: &str = r"[A-Za-z0-9_.,:=@%+\-]+";

static JOB_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\..+$").unwrap());
static KILLABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NAME_CHARS}$")).unwrap());
static KILLABLE_JOB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\d+\.{NAME_CHARS}$")).unwrap());

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("Unexpected line {line} in screen listing: {content:?}")]
    MalformedLine { line: usize, content: String },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KillError {
    #[error("No jobs selected")]
    NoJobs,
    #[error("Invalid job id: {0:?}")]
    InvalidJobId(String),
}

/// The shapes `screen -ls` answers in.
///
/// ```text
/// No Sockets found in /run/screen/S-user.
///
/// There is a screen on:
///         833015.outdir   (02/16/2025 03:25:51 PM)        (Detached)
/// 1 Socket in /run/screen/S-user.
///
/// There are screens on:
///         835269.outdir_1 (02/16/2025 09:12:36 PM)        (Detached)
///         833015.outdir_2 (02/16/2025 03:25:51 PM)        (Detached)
/// 2 Sockets in /run/screen/S-user.
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenListing {
    NoSockets,
    Sessions(Vec<Job>),
    /// First line matched none of the known shapes.
    Unrecognized(String),
}

impl ScreenListing {
    pub fn parse(stdout: &str) -> Result<Self, ListingError> {
        let lines: Vec<&str> = stdout.lines().collect();
        let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) else {
            return Ok(Self::NoSockets);
        };
        let header = lines[first].trim();

        if header.starts_with("No Sockets found") {
            return Ok(Self::NoSockets);
        }
        if !header.starts_with("There") {
            return Ok(Self::Unrecognized(header.to_owned()));
        }

        // The last non-blank line is the socket count footer.
        let last = lines.iter().rposition(|l| !l.trim().is_empty()).unwrap_or(first);
        let body = lines.get(first + 1..last).unwrap_or_default();

        body.iter()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                parse_job(line).ok_or_else(|| ListingError::MalformedLine {
                    line: first + i + 2,
                    content: (*line).to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::Sessions)
    }

    pub fn jobs(&self) -> &[Job] {
        match self {
            Self::Sessions(jobs) => jobs,
            Self::NoSockets | Self::Unrecognized(_) => &[],
        }
    }

    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            Self::Sessions(jobs) => jobs,
            Self::NoSockets | Self::Unrecognized(_) => vec![],
        }
    }
}

/// `\t<id>\t(<start time>)\t(<state>)`
fn parse_job(line: &str) -> Option<Job> {
    let fields: Vec<&str> = line.split('\t').collect();
    let [_, id, start_time, rest @ ..] = fields.as_slice() else {
        return None;
    };
    if !JOB_ID.is_match(id) {
        return None;
    }
    let start_time = start_time.strip_prefix('(')?.strip_suffix(')')?;
    let state = rest
        .first()
        .and_then(|s| s.strip_prefix('(')?.strip_suffix(')'))
        .and_then(|s| s.parse().ok())
        .unwrap_or(JobState::Unknown);

    Some(Job::new(*id, start_time).with_state(state))
}

/// Lists the sessions of the connecting user.
pub fn listing_command(env_file: &str) -> String {
    format!("source {env_file} && screen -ls")
}

/// Whether a session named `name` can later be quit with [`kill_command`].
pub fn is_killable_name(name: &str) -> bool {
    KILLABLE_NAME.is_match(name)
}

/// Quits every session in `job_ids`, then lists what is left.
///
/// The listing runs after `;` so the caller gets a fresh table even when one
/// of the sessions was already gone.
pub fn kill_command(env_file: &str, job_ids: &[String]) -> Result<String, KillError> {
    if job_ids.is_empty() {
        return Err(KillError::NoJobs);
    }
    if let Some(id) = job_ids.iter().find(|id| !KILLABLE_JOB_ID.is_match(id)) {
        return Err(KillError::InvalidJobId(id.clone()));
    }

    let kills = job_ids
        .iter()
        .map(|id| format!("screen -S {id} -X quit"))
        .collect::<Vec<_>>()
        .join(" && ");
    Ok(format!("source {env_file} && {kills} ; screen -ls"))
}
