use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};

use domain::{
    model::vo::{CommandOutput, Credentials},
    service::{RemoteSession, RemoteShell},
};
use tokio::process::Command;

use crate::config::RemoteConfig;

/// `ssh` exits with this when the connection itself failed.
const SSH_CONNECTION_ERROR: i32 = 255;
/// `sshpass` exit statuses.
const SSHPASS_WRONG_PASSWORD: i32 = 5;
const SSHPASS_HOST_KEY_UNKNOWN: i32 = 6;
const SSHPASS_HOST_KEY_CHANGED: i32 = 7;

static SOCKET_SEQ: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Cannot start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Authentication failed for {0}")]
    Auth(String),
    #[error("Host key of {0} is unknown or has changed")]
    HostKey(String),
    #[error("Connection to {destination} failed: {detail}")]
    Connection { destination: String, detail: String },
}

#[derive(Debug, Clone)]
pub struct SshConfig {
    pub ssh: String,
    pub sshpass: String,
    pub options: Vec<String>,
}

impl SshConfig {
    pub fn new(config: &RemoteConfig) -> Self {
        let RemoteConfig {
            ssh_program,
            sshpass_program,
            ssh_options,
            ..
        } = config;

        Self {
            ssh: ssh_program.clone(),
            sshpass: sshpass_program.clone(),
            options: ssh_options.clone(),
        }
    }
}

/// Remote shell backed by the system OpenSSH client.
///
/// `connect` authenticates once and leaves a master connection in the
/// background. Every `run` goes through its control socket, so the password
/// is only handed over once, through the environment of `sshpass`.
///
/// Both `ssh` and `sshpass` must be installed on the machine running the
/// launcher. Neither ships with this crate. A missing binary is reported as
/// [`GatewayError::Spawn`] on the first connection.
#[derive(Debug, Clone)]
pub struct SshShell {
    config: SshConfig,
}

pub struct SshSession {
    config: SshConfig,
    port: String,
    username_host: String,
    socket: PathBuf,
    open: bool,
}

impl SshShell {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl RemoteShell for SshShell {
    type Session = SshSession;

    async fn connect(&self, credentials: &Credentials) -> anyhow::Result<SshSession> {
        let socket = std::env::temp_dir().join(format!(
            "launcher-{}-{}.sock",
            std::process::id(),
            SOCKET_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let mut session = SshSession {
            config: self.config.clone(),
            port: credentials.port.to_string(),
            username_host: credentials.user_host(),
            socket,
            open: false,
        };

        tracing::debug!(destination = %session.username_host, port = %session.port, "Opening ssh connection");
        let status = session
            .master_command(&credentials.password)
            .status()
            .await
            .map_err(|source| GatewayError::Spawn {
                program: self.config.sshpass.clone(),
                source,
            })?;
        let code = status.code().unwrap_or(SSH_CONNECTION_ERROR);
        match code {
            0 => {
                session.open = true;
                Ok(session)
            }
            SSHPASS_WRONG_PASSWORD => Err(GatewayError::Auth(session.username_host).into()),
            SSHPASS_HOST_KEY_UNKNOWN | SSHPASS_HOST_KEY_CHANGED => {
                Err(GatewayError::HostKey(session.username_host).into())
            }
            _ => Err(GatewayError::Connection {
                destination: session.username_host,
                detail: format!("ssh exited with status {code}"),
            }
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl RemoteSession for SshSession {
    async fn run(&mut self, command: &str, workdir: &str) -> anyhow::Result<CommandOutput> {
        let out = self
            .command(&format!("cd {workdir} && {command}"))
            .output()
            .await
            .map_err(|source| GatewayError::Spawn {
                program: self.config.ssh.clone(),
                source,
            })?;
        let output = CommandOutput {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            exit_code: out.status.code().unwrap_or(SSH_CONNECTION_ERROR),
        };
        if output.exit_code == SSH_CONNECTION_ERROR {
            return Err(GatewayError::Connection {
                destination: self.username_host.clone(),
                detail: output.stderr.trim().to_owned(),
            }
            .into());
        }
        Ok(output)
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        if !self.open {
            return Ok(());
        }
        let status = self
            .control_command("exit")
            .status()
            .await
            .map_err(|source| GatewayError::Spawn {
                program: self.config.ssh.clone(),
                source,
            })?;
        self.open = false;
        if !status.success() {
            anyhow::bail!("Exit Status not 0 when closing ssh connection. real: {status}");
        }
        tracing::debug!(destination = %self.username_host, "Closed ssh connection");
        Ok(())
    }
}

impl SshSession {
    fn ssh(&self) -> Vec<String> {
        let mut args = vec![
            "-p".to_owned(),
            self.port.clone(),
            "-S".to_owned(),
            self.socket.to_string_lossy().into_owned(),
        ];
        args.extend(self.config.options.iter().cloned());
        args
    }

    /// Authenticates and backgrounds a master connection on the control socket.
    ///
    /// The backgrounded master keeps its inherited stdout and stderr open, so
    /// neither may be a pipe we wait on.
    fn master_command(&self, password: &str) -> Command {
        let mut command = Command::new(&self.config.sshpass);
        command
            .arg("-e")
            .arg(&self.config.ssh)
            .args(["-M", "-f", "-N"])
            .args(self.ssh())
            .arg(&self.username_host)
            .env("SSHPASS", password)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    fn command(&self, cmd: &str) -> Command {
        let mut command = Command::new(&self.config.ssh);
        command
            .args(self.ssh())
            .arg(&self.username_host)
            .arg(cmd)
            .stdin(Stdio::null());
        command
    }

    fn control_command(&self, op: &str) -> Command {
        let mut command = Command::new(&self.config.ssh);
        command
            .args(["-O", op])
            .args(self.ssh())
            .arg(&self.username_host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}
