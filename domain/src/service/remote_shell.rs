use crate::model::vo::{CommandOutput, Credentials};

/// Opens connections to the host the pipeline runs on.
#[async_trait::async_trait]
pub trait RemoteShell {
    type Session: RemoteSession + Send;

    async fn connect(&self, credentials: &Credentials) -> anyhow::Result<Self::Session>;
}

/// One open connection. Commands run one after another.
#[async_trait::async_trait]
pub trait RemoteSession {
    /// Runs `command` with `workdir` as the current directory.
    ///
    /// A non-zero exit status is reported through [`CommandOutput::exit_code`],
    /// only transport failures are errors.
    async fn run(&mut self, command: &str, workdir: &str) -> anyhow::Result<CommandOutput>;

    async fn close(&mut self) -> anyhow::Result<()>;
}
