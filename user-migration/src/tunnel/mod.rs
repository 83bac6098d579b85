//! SSH port forward to the legacy database host.
//!
//! The forward is run by the system `ssh` client as a child process with agent
//! authentication. The tunnel counts as started once the local end accepts
//! TCP connections.

use std::fmt;
use std::io;
use std::net::{Ipv4Addr, TcpListener};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

use crate::config::TunnelSettings;

const SSH_PROGRAM: &str = "ssh";

/// How long the local end may take to start accepting connections.
const READY_TIMEOUT: Duration = Duration::from_secs(15);

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("Local port {port} is already in use: {source}")]
    PortInUse {
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("Failed to spawn ssh: {0}")]
    Spawn(#[source] io::Error),
    #[error("ssh exited before the tunnel was ready: {0}")]
    Exited(ExitStatus),
    #[error("Local port {port} not ready after {waited:?}")]
    Timeout { port: u16, waited: Duration },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Starting,
    Started,
    Stopped,
}

impl fmt::Display for TunnelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TunnelState::Starting => "starting",
            TunnelState::Started => "started",
            TunnelState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// A running `ssh -N -L` port forward.
///
/// The child is killed on drop as well, but callers should `stop` it so the
/// state change is logged.
pub struct SshTunnel {
    child: Child,
    local_port: u16,
    state: TunnelState,
}

impl SshTunnel {
    /// Starts the forward and waits until its local port accepts connections.
    pub async fn start(settings: &TunnelSettings) -> Result<Self, TunnelError> {
        let mut command = Command::new(SSH_PROGRAM);
        command.args(ssh_args(settings));
        Self::launch(command, settings.local_port, READY_TIMEOUT).await
    }

    async fn launch(
        mut command: Command,
        local_port: u16,
        ready_timeout: Duration,
    ) -> Result<Self, TunnelError> {
        ensure_port_free(local_port)?;

        info!(state = %TunnelState::Starting, local_port, "SSH tunnel state changed");

        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(TunnelError::Spawn)?;

        let mut tunnel = Self {
            child,
            local_port,
            state: TunnelState::Starting,
        };

        if let Err(e) = tunnel.wait_until_ready(ready_timeout).await {
            tunnel.stop().await;
            return Err(e);
        }

        tunnel.set_state(TunnelState::Started);
        Ok(tunnel)
    }

    async fn wait_until_ready(&mut self, ready_timeout: Duration) -> Result<(), TunnelError> {
        let deadline = Instant::now() + ready_timeout;

        loop {
            if let Some(status) = self.child.try_wait()? {
                return Err(TunnelError::Exited(status));
            }
            if TcpStream::connect((Ipv4Addr::LOCALHOST, self.local_port))
                .await
                .is_ok()
            {
                // the listener must still be ssh's own
                if let Some(status) = self.child.try_wait()? {
                    return Err(TunnelError::Exited(status));
                }
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(TunnelError::Timeout {
                    port: self.local_port,
                    waited: ready_timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Kills the ssh process. Calling it again is a no-op.
    pub async fn stop(&mut self) {
        if self.state == TunnelState::Stopped {
            return;
        }

        match self.child.try_wait() {
            Ok(Some(status)) => {
                warn!(%status, "ssh had already exited");
            }
            _ => {
                if let Err(e) = self.child.kill().await {
                    warn!(error = %e, "Failed to kill ssh");
                }
            }
        }

        self.set_state(TunnelState::Stopped);
    }

    pub fn state(&self) -> TunnelState {
        self.state
    }

    pub fn local_port(&self) -> u16 {
        self.local_port
    }

    fn set_state(&mut self, state: TunnelState) {
        self.state = state;
        info!(state = %state, local_port = self.local_port, "SSH tunnel state changed");
    }
}

/// Fails if something other than ssh already listens on `local_port`.
fn ensure_port_free(local_port: u16) -> Result<(), TunnelError> {
    TcpListener::bind((Ipv4Addr::LOCALHOST, local_port))
        .map(drop)
        .map_err(|source| TunnelError::PortInUse {
            port: local_port,
            source,
        })
}

/// Arguments for `ssh` forwarding `local_port` to the remote host's own
/// loopback `remote_port`.
fn ssh_args(settings: &TunnelSettings) -> Vec<String> {
    vec![
        "-N".to_string(),
        "-o".to_string(),
        "ExitOnForwardFailure=yes".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-L".to_string(),
        format!(
            "{}:127.0.0.1:{}",
            settings.local_port, settings.remote_port
        ),
        format!("{}@{}", settings.remote_user, settings.remote_host),
    ]
}
