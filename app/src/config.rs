use std::path::Path;

use domain::model::vo::{Action, Mode};
use serde::*;
use service::prelude::RemoteSettings;

use crate::infrastructure::telemetry::TelemetryConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct LauncherConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    /// Form layout used when no `--mode` is given.
    #[serde(default)]
    pub mode: Mode,

    /// Entries of the interactive menu, in display order.
    #[serde(default = "LauncherConfig::default_menu")]
    pub menu: Vec<Action>,

    /// Seconds between two dashboard refreshes in watch mode.
    #[serde(default = "LauncherConfig::default_refresh_interval")]
    pub refresh_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "RemoteSettings::default_workdir")]
    pub workdir: String,

    #[serde(default = "RemoteSettings::default_env_file")]
    pub env_file: String,

    #[serde(default = "RemoteConfig::default_ssh_program")]
    pub ssh_program: String,

    /// Feeds the password to `ssh`. Must be installed and found on `PATH`
    /// (or given as a full path), since there is no other way to log in.
    #[serde(default = "RemoteConfig::default_sshpass_program")]
    pub sshpass_program: String,

    /// Passed to every `ssh` invocation before the destination.
    #[serde(default = "RemoteConfig::default_ssh_options")]
    pub ssh_options: Vec<String>,
}

impl LauncherConfig {
    pub fn default_menu() -> Vec<Action> {
        vec![
            Action::IlluminaMode,
            Action::PacbioMode,
            Action::LoadParameters,
            Action::SaveParameters,
            Action::Submit,
            Action::RefreshDashboard,
            Action::KillJobs,
        ]
    }

    pub fn default_refresh_interval() -> u64 {
        60
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            workdir: RemoteSettings::default_workdir(),
            env_file: RemoteSettings::default_env_file(),
            ssh_program: Self::default_ssh_program(),
            sshpass_program: Self::default_sshpass_program(),
            ssh_options: Self::default_ssh_options(),
        }
    }
}

impl RemoteConfig {
    pub fn default_ssh_program() -> String {
        "ssh".to_owned()
    }

    pub fn default_sshpass_program() -> String {
        "sshpass".to_owned()
    }

    pub fn default_ssh_options() -> Vec<String> {
        vec!["-o".to_owned(), "StrictHostKeyChecking=accept-new".to_owned()]
    }

    pub fn settings(&self) -> RemoteSettings {
        RemoteSettings::builder()
            .workdir(self.workdir.clone())
            .env_file(self.env_file.clone())
            .build()
    }
}

/// `launcher.yaml` in the working directory, then `extra`, then `LAUNCHER__*`
/// environment variables, later sources overriding earlier ones.
pub fn build_config(extra: Option<&Path>) -> anyhow::Result<config::Config> {
    let mut config = config::Config::builder().add_source(
        config::File::with_name("launcher")
            .required(false)
            .format(config::FileFormat::Yaml),
    );
    if let Some(path) = extra {
        config = config.add_source(
            config::File::from(path)
                .format(config::FileFormat::Yaml)
                .required(true),
        );
    }
    config = config.add_source(
        config::Environment::with_prefix("LAUNCHER")
            .separator("__")
            .try_parsing(true)
            .list_separator(";")
            .with_list_parse_key("menu")
            .with_list_parse_key("remote.ssh_options"),
    );
    Ok(config.build()?)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn parse(yaml: &str) -> anyhow::Result<LauncherConfig> {
        Ok(config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize()?)
    }

    #[test]
    fn defaults() {
        let config = parse("{}").unwrap();
        assert_eq!(config.mode, Mode::Illumina);
        assert_eq!(config.menu, LauncherConfig::default_menu());
        assert_eq!(config.remote.workdir, "~/Qiime2App");
        assert_eq!(config.remote.env_file, ".bash_profile");
        assert_eq!(config.refresh_interval, 60);
    }

    #[test]
    fn custom() {
        let config = parse(indoc! {"
            mode: pacbio
            refresh_interval: 30
            menu:
              - refresh_dashboard
              - kill_jobs
            remote:
              workdir: /srv/qiime2
              ssh_options: ['-o', 'ConnectTimeout=10']
            telemetry:
              max_level: Debug
        "})
        .unwrap();
        assert_eq!(config.mode, Mode::PacBio);
        assert_eq!(config.menu, [Action::RefreshDashboard, Action::KillJobs]);
        assert_eq!(config.remote.workdir, "/srv/qiime2");
        assert_eq!(config.remote.env_file, ".bash_profile");
        assert_eq!(config.remote.ssh_options, ["-o", "ConnectTimeout=10"]);
        assert_eq!(config.refresh_interval, 30);
    }

    #[test]
    fn unknown_menu_action_is_rejected() {
        let err = parse(indoc! {"
            menu:
              - submit
              - show_dashboard
        "})
        .unwrap_err();
        assert!(format!("{err:#}").contains("show_dashboard"));
    }
}
