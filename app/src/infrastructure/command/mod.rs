mod ssh_proxy;

pub use self::ssh_proxy::{GatewayError, SshConfig, SshSession, SshShell};
