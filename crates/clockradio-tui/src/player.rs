/// External player driver.
///
/// ```text
///   MplayerLauncher::launch()
///         │
///         ├── child process (slave mode, stdin piped, output discarded)
///         └── writer_task   ← receives command lines via mpsc, writes → stdin
/// ```
///
/// The sync side (`MplayerProcess::send`) only enqueues; it never blocks the
/// tick loop.  One process per play session.
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use clockradio_proto::protocol::{slave_args, PlayerCommand};

/// Queued command lines before `send` starts failing.
const COMMAND_QUEUE: usize = 64;

/// A running player process.
pub trait PlayerProcess {
    fn send(&mut self, command: PlayerCommand) -> anyhow::Result<()>;

    /// Ask the process to go away.  Never blocks.
    fn terminate(&mut self);

    /// `false` once the process has exited.
    fn is_alive(&mut self) -> bool;
}

/// Starts player processes.  One call per play session.
pub trait Launcher {
    fn launch(&self, softvol_gain: i64, volume: i64) -> anyhow::Result<Box<dyn PlayerProcess>>;
}

// ── mplayer ───────────────────────────────────────────────────────────────────

pub struct MplayerLauncher {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl MplayerLauncher {
    pub fn new(binary: PathBuf, extra_args: Vec<String>) -> Self {
        Self { binary, extra_args }
    }

    /// Locate the binary from config, beside the exe or on PATH.
    pub fn discover(config: &clockradio_proto::config::PlayerConfig) -> anyhow::Result<Self> {
        let binary = clockradio_proto::platform::find_player_binary(config.binary.as_deref())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{} binary not found",
                    clockradio_proto::platform::player_binary_name()
                )
            })?;
        info!("player: using binary {:?}", binary);
        Ok(Self::new(binary, config.extra_args.clone()))
    }
}

impl Launcher for MplayerLauncher {
    fn launch(&self, softvol_gain: i64, volume: i64) -> anyhow::Result<Box<dyn PlayerProcess>> {
        let mut args = slave_args(softvol_gain, volume);
        args.extend(self.extra_args.iter().cloned());
        info!(
            "player: starting process with line \"{} {}\"",
            self.binary.display(),
            args.join(" ")
        );

        let mut child = tokio::process::Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow::anyhow!("player stdin not captured"))?;
        info!("player: spawned process with pid {:?}", child.id());

        let (tx, rx) = mpsc::channel::<String>(COMMAND_QUEUE);
        tokio::spawn(writer_task(stdin, rx));

        Ok(Box::new(MplayerProcess { child, tx }))
    }
}

struct MplayerProcess {
    child: tokio::process::Child,
    tx: mpsc::Sender<String>,
}

impl PlayerProcess for MplayerProcess {
    fn send(&mut self, command: PlayerCommand) -> anyhow::Result<()> {
        debug!("player command: [{}]", command);
        self.tx
            .try_send(command.to_line())
            .map_err(|e| anyhow::anyhow!("player writer unavailable: {}", e))
    }

    fn terminate(&mut self) {
        info!("player: terminating pid {:?}", self.child.id());
        if let Err(e) = self.child.start_kill() {
            debug!("player: kill failed: {}", e);
        }
    }

    fn is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                if let Some(code) = status.code() {
                    warn!("player process exited with code: {}", code);
                } else {
                    warn!("player process terminated by signal");
                }
                false
            }
            Err(e) => {
                warn!("player is_alive check failed: {}", e);
                false
            }
        }
    }
}

// ── writer task ───────────────────────────────────────────────────────────────

async fn writer_task<W>(mut writer: W, mut rx: mpsc::Receiver<String>)
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        debug!("player writer: {}", line.trim_end());
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            warn!("player writer: write error: {}", e);
            break;
        }
        if let Err(e) = writer.flush().await {
            warn!("player writer: flush error: {}", e);
            break;
        }
    }
    debug!("player writer: task exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writer_task_writes_lines_in_order() {
        let (client, mut server) = tokio::io::duplex(256);
        let (tx, rx) = mpsc::channel::<String>(8);
        let handle = tokio::spawn(writer_task(client, rx));

        tx.send(PlayerCommand::LoadList { url: "http://a.test/s".into(), append: true }.to_line())
            .await
            .unwrap();
        tx.send(PlayerCommand::Pause.to_line()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        let mut out = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut server, &mut out)
            .await
            .unwrap();
        assert_eq!(out, "loadlist http://a.test/s 1\npause\n");
    }
}
