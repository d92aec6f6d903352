use std::fmt;

use anyhow::Context;

use super::parameter::{ParameterSet, HOST, PORT, USER};

/// What is needed to open one remote-shell connection.
#[derive(Clone)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub password: String,
}

impl Credentials {
    /// Reads host, user and port from the connection part of a form.
    pub fn from_parameters(parameters: &ParameterSet, password: String) -> anyhow::Result<Self> {
        let host = parameters.text(HOST).context("Missing parameter `Host`")?;
        let user = parameters.text(USER).context("Missing parameter `User`")?;
        let port = parameters.text(PORT).context("Missing parameter `Port`")?;
        let port = port
            .trim()
            .parse()
            .with_context(|| format!("Invalid port: {port:?}"))?;

        Ok(Self {
            host: host.trim().to_owned(),
            user: user.trim().to_owned(),
            port,
            password,
        })
    }

    pub fn user_host(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .finish()
    }
}
