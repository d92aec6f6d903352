use std::convert::Infallible;
use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::Context;
use domain::{
    model::vo::{
        parameter::{OUTDIR, PIPELINE, SAMPLE_SHEET},
        Action, CommandOutput, Credentials, Mode,
    },
    service::{ParameterStore, RemoteSession, RemoteShell, View},
};
use infrastructure::sync::timer;
use typed_builder::TypedBuilder;

use crate::remote::{
    is_killable_name, kill_command, listing_command, pipeline_command, ScreenListing,
    SubmitScript,
};

/// Where commands run on the pipeline host.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RemoteSettings {
    /// Working directory every command is started in.
    #[builder(setter(into), default = RemoteSettings::default_workdir())]
    pub workdir: String,
    /// Sourced before anything that needs the pipeline environment.
    #[builder(setter(into), default = RemoteSettings::default_env_file())]
    pub env_file: String,
}

impl RemoteSettings {
    pub fn default_workdir() -> String {
        "~/Qiime2App".to_owned()
    }

    pub fn default_env_file() -> String {
        ".bash_profile".to_owned()
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Runs the actions triggered from the form and the dashboard.
///
/// Each action is handled to completion before returning, and every failure
/// ends up in [`View::error`] instead of escaping to the caller.
pub struct Controller<V, S, P> {
    view: V,
    shell: S,
    store: P,
    settings: RemoteSettings,
}

impl<V, S, P> Controller<V, S, P>
where
    V: View,
    S: RemoteShell + Sync,
    P: ParameterStore + Sync,
{
    pub fn new(view: V, shell: S, store: P, settings: RemoteSettings) -> Self {
        Self {
            view,
            shell,
            store,
            settings,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub async fn dispatch(&mut self, action: Action) {
        tracing::debug!(%action, "Dispatching action");
        let result = match action {
            Action::IlluminaMode => {
                self.switch_mode(Mode::Illumina);
                Ok(())
            }
            Action::PacbioMode => {
                self.switch_mode(Mode::PacBio);
                Ok(())
            }
            Action::LoadParameters => self.load_parameters().await,
            Action::SaveParameters => self.save_parameters().await,
            Action::Submit => self.submit().await,
            Action::RefreshDashboard => self.refresh_dashboard().await,
            Action::KillJobs => self.kill_jobs().await,
        };
        if let Err(e) = result {
            self.report(action, e);
        }
    }

    /// Keeps the dashboard up to date until the returned future is dropped.
    ///
    /// The password is asked once and kept in memory for as long as the watch
    /// runs. A failed refresh is reported and retried on the next tick.
    pub async fn watch(&mut self, interval: Duration)
    where
        V: 'static,
        S: 'static,
        P: 'static,
    {
        let Some(password) = self.view.password() else {
            return;
        };
        let credentials = match Credentials::from_parameters(&self.view.parameters(), password) {
            Ok(c) => c,
            Err(e) => return self.report(Action::RefreshDashboard, e),
        };

        let never: Infallible = timer::every(interval, self, |this| {
            let credentials = credentials.clone();
            Box::pin(async move {
                if let Err(e) = this.refresh_with(&credentials).await {
                    this.report(Action::RefreshDashboard, e);
                }
                ControlFlow::Continue(())
            })
        })
        .await;
        match never {}
    }

    fn report(&mut self, action: Action, e: anyhow::Error) {
        tracing::error!("{}: {e:#}", action.label());
        self.view.error(&format!("{e:#}"));
    }

    fn switch_mode(&mut self, mode: Mode) {
        tracing::info!(mode = mode.as_ref(), "Switching form mode");
        self.view.reset_parameters(mode.template());
    }

    async fn load_parameters(&mut self) -> anyhow::Result<()> {
        let Some(path) = self.view.open_path() else {
            return Ok(());
        };
        let parameters = self.store.read(&path).await?;
        tracing::info!(path = %path.display(), count = parameters.len(), "Loaded parameters");
        self.view.set_parameters(parameters);
        Ok(())
    }

    async fn save_parameters(&mut self) -> anyhow::Result<()> {
        let Some(path) = self.view.save_path() else {
            return Ok(());
        };
        self.store.write(&self.view.parameters(), &path).await?;
        tracing::info!(path = %path.display(), "Saved parameters");
        Ok(())
    }

    async fn submit(&mut self) -> anyhow::Result<()> {
        let Some(password) = self.view.password() else {
            return Ok(());
        };
        if !self.view.confirm("Are you sure you want to submit the job?") {
            return Ok(());
        }

        let (connection, options) = self.view.parameters().split_off_connection();
        let credentials = Credentials::from_parameters(&connection, password)?;
        let script = connection.text(PIPELINE).context("Missing parameter `Qiime2 Pipeline`")?;
        let outdir = options.text(OUTDIR).context("Missing parameter `outdir`")?;
        let sample_sheet = options.text(SAMPLE_SHEET).context("Missing parameter `sample-sheet`")?;

        let command = pipeline_command(script, &options, outdir);
        let submit = SubmitScript::builder()
            .env_file(&self.settings.env_file)
            .command(&command)
            .outdir(outdir)
            .sample_sheet(sample_sheet)
            .build();
        let job_name = submit.job_name();
        anyhow::ensure!(!job_name.is_empty(), "Cannot name a job after outdir {outdir:?}");
        anyhow::ensure!(
            is_killable_name(&job_name),
            "Job name {job_name:?} from outdir {outdir:?} may only use ASCII letters, digits and `_.,:=@%+-`"
        );

        let out = self.run_remote(&credentials, &submit.render()).await?;
        if !out.success() {
            anyhow::bail!(
                "Submission exited with status {}: {}",
                out.exit_code,
                out.stderr.trim()
            );
        }
        tracing::info!(%job_name, "Job submitted");
        self.view.info("Job submitted!");
        Ok(())
    }

    async fn refresh_dashboard(&mut self) -> anyhow::Result<()> {
        let Some(password) = self.view.password() else {
            return Ok(());
        };
        let credentials = Credentials::from_parameters(&self.view.parameters(), password)?;
        self.refresh_with(&credentials).await
    }

    async fn refresh_with(&mut self, credentials: &Credentials) -> anyhow::Result<()> {
        // `screen -ls` exits non-zero when there is no session, so the status is ignored.
        let out = self
            .run_remote(credentials, &listing_command(&self.settings.env_file))
            .await?;
        self.show_listing(&out)
    }

    async fn kill_jobs(&mut self) -> anyhow::Result<()> {
        let job_ids = self.view.selected_job_ids();
        if job_ids.is_empty() {
            self.view.info("No jobs selected");
            return Ok(());
        }
        let Some(password) = self.view.password() else {
            return Ok(());
        };
        let credentials = Credentials::from_parameters(&self.view.parameters(), password)?;

        let command = kill_command(&self.settings.env_file, &job_ids)?;
        let out = self.run_remote(&credentials, &command).await?;
        tracing::info!(?job_ids, "Killed jobs");
        self.show_listing(&out)
    }

    fn show_listing(&mut self, out: &CommandOutput) -> anyhow::Result<()> {
        let listing = ScreenListing::parse(&out.stdout).with_context(|| {
            format!("Cannot read job listing (exit status {})", out.exit_code)
        })?;
        if let ScreenListing::Unrecognized(first_line) = &listing {
            tracing::warn!(
                exit_code = out.exit_code,
                stderr = out.stderr.trim(),
                "Unrecognized job listing, showing no jobs: {first_line}"
            );
        }
        self.view.display_jobs(listing.jobs());
        Ok(())
    }

    /// One connection per call, closed before returning.
    async fn run_remote(
        &self,
        credentials: &Credentials,
        command: &str,
    ) -> anyhow::Result<CommandOutput> {
        let mut session = self
            .shell
            .connect(credentials)
            .await
            .with_context(|| format!("Cannot connect to {}", credentials.user_host()))?;

        tracing::info!(workdir = %self.settings.workdir, "{command}");
        let out = session.run(command, &self.settings.workdir).await;
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close connection: {e:#}");
        }

        let out = out?;
        tracing::debug!(exit_code = out.exit_code, "{}", out.stdout.trim_end());
        Ok(out)
    }
}
