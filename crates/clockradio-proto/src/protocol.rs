//! Line protocol spoken to the external player running in slave mode.
//!
//! One command per line on the player's stdin.  Flags are sent as `0`/`1`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Load a playlist URL (stream lists, `.pls`/`.m3u`), optionally appending to the queue.
    LoadList { url: String, append: bool },
    /// Toggle pause.
    Pause,
    /// Set volume; `absolute = false` means relative to the current level.
    Volume { value: i64, absolute: bool },
    /// End the player process.
    Quit,
}

impl PlayerCommand {
    /// Serialise to the wire form, newline-terminated.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadList { url, append } => write!(f, "loadlist {} {}", url, u8::from(*append)),
            Self::Pause => f.write_str("pause"),
            Self::Volume { value, absolute } => {
                write!(f, "volume {} {}", value, u8::from(*absolute))
            }
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Arguments that put the player into idle slave mode reading commands from stdin.
pub fn slave_args(softvol_gain: i64, initial_volume: i64) -> Vec<String> {
    let mut args: Vec<String> = [
        "-nogui",
        "-quiet",
        "-idle",
        "-slave",
        "-input",
        "nodefault-bindings",
        "-noconfig",
        "all",
        "-softvol",
        "-softvol-max",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(softvol_gain.to_string());
    args.push("-volume".to_string());
    args.push(initial_volume.to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loadlist_line() {
        let cmd = PlayerCommand::LoadList {
            url: "http://x.test/stream".into(),
            append: true,
        };
        assert_eq!(cmd.to_line(), "loadlist http://x.test/stream 1\n");
    }

    #[test]
    fn test_volume_line() {
        let abs = PlayerCommand::Volume { value: 55, absolute: true };
        let rel = PlayerCommand::Volume { value: -5, absolute: false };
        assert_eq!(abs.to_string(), "volume 55 1");
        assert_eq!(rel.to_string(), "volume -5 0");
    }

    #[test]
    fn test_pause_and_quit_lines() {
        assert_eq!(PlayerCommand::Pause.to_line(), "pause\n");
        assert_eq!(PlayerCommand::Quit.to_line(), "quit\n");
    }

    #[test]
    fn test_slave_args_tail() {
        let args = slave_args(400, 35);
        assert_eq!(args[..4], ["-nogui", "-quiet", "-idle", "-slave"]);
        assert_eq!(args[args.len() - 3..], ["400", "-volume", "35"]);
    }
}
