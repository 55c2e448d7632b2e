//! Playback controller: the single shared play session.
//!
//! Starting a session always stops the previous one, whoever owned it.  The
//! controller forwards volume as given; callers clamp.

use tracing::{debug, error, info, warn};

use clockradio_proto::channels::ChannelRegistry;
use clockradio_proto::protocol::PlayerCommand;

use crate::player::{Launcher, PlayerProcess};

/// Who started the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOwner {
    Manual,
    Alarm,
}

struct Session {
    channel: String,
    owner: PlaybackOwner,
    process: Box<dyn PlayerProcess>,
}

pub struct Playback {
    channels: ChannelRegistry,
    launcher: Box<dyn Launcher>,
    softvol_gain: i64,
    session: Option<Session>,
    paused: bool,
}

impl Playback {
    pub fn new(channels: ChannelRegistry, launcher: Box<dyn Launcher>, softvol_gain: i64) -> Self {
        Self {
            channels,
            launcher,
            softvol_gain,
            session: None,
            paused: false,
        }
    }

    pub fn channels(&self) -> &ChannelRegistry {
        &self.channels
    }

    /// Start `name` at `volume`.  Unknown channels and launch failures are
    /// logged; the controller is left stopped.
    pub fn play(&mut self, name: &str, volume: i64, owner: PlaybackOwner) {
        self.stop();
        let Some(channel) = self.channels.get(name) else {
            error!("can't play unknown channel \"{}\"", name);
            return;
        };
        info!("start playing channel {} ({:?}, volume {})", name, owner, volume);

        let mut process = match self.launcher.launch(self.softvol_gain, volume) {
            Ok(p) => p,
            Err(e) => {
                error!("could not start player for {}: {}", name, e);
                return;
            }
        };
        let load = PlayerCommand::LoadList {
            url: channel.url().to_string(),
            append: true,
        };
        if let Err(e) = process.send(load) {
            warn!("player rejected load for {}: {}", name, e);
        }
        self.paused = false;
        self.session = Some(Session {
            channel: name.to_string(),
            owner,
            process,
        });
    }

    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            info!("stop playing channel {}", session.channel);
            if let Err(e) = session.process.send(PlayerCommand::Quit) {
                debug!("quit not delivered: {}", e);
            }
            session.process.terminate();
        }
        self.paused = false;
    }

    /// Toggle pause.  The command is only forwarded when a process exists.
    pub fn pause(&mut self) {
        self.paused = !self.paused;
        match self.session.as_mut() {
            Some(session) => {
                if let Err(e) = session.process.send(PlayerCommand::Pause) {
                    warn!("pause not delivered: {}", e);
                }
            }
            None => info!("won't pause, player is already stopped"),
        }
    }

    pub fn set_volume(&mut self, value: i64, absolute: bool) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        debug!("changed volume to {} (absolute: {})", value, absolute);
        if let Err(e) = session.process.send(PlayerCommand::Volume { value, absolute }) {
            warn!("volume not delivered: {}", e);
        }
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_channel(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.channel.as_str())
    }

    pub fn owner(&self) -> Option<PlaybackOwner> {
        self.session.as_ref().map(|s| s.owner)
    }

    /// Hand the running session to a new owner without restarting it.
    pub fn adopt(&mut self, owner: PlaybackOwner) {
        if let Some(session) = self.session.as_mut() {
            debug!("playback of {} now owned by {:?}", session.channel, owner);
            session.owner = owner;
        }
    }

    /// Drop the session if its process died.  Returns `true` when one was reaped.
    pub fn reap(&mut self) -> bool {
        let dead = match self.session.as_mut() {
            Some(session) => !session.process.is_alive(),
            None => false,
        };
        if dead {
            if let Some(session) = self.session.take() {
                warn!("player for {} exited unexpectedly", session.channel);
            }
            self.paused = false;
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{registry, RecordingLauncher};

    fn playback() -> (Playback, RecordingLauncher) {
        let launcher = RecordingLauncher::default();
        let pb = Playback::new(registry(), Box::new(launcher.clone()), 400);
        (pb, launcher)
    }

    #[test]
    fn test_play_loads_channel_url() {
        let (mut pb, launcher) = playback();
        pb.play("Jazz", 35, PlaybackOwner::Manual);

        assert!(pb.is_playing());
        assert_eq!(pb.current_channel(), Some("Jazz"));
        assert_eq!(pb.owner(), Some(PlaybackOwner::Manual));
        assert_eq!(launcher.launches(), [(400, 35)]);
        assert_eq!(launcher.lines(), ["loadlist http://jazz.test/live 1"]);
    }

    #[test]
    fn test_play_stops_previous_session() {
        let (mut pb, launcher) = playback();
        pb.play("Jazz", 35, PlaybackOwner::Alarm);
        pb.play("Rock", 50, PlaybackOwner::Manual);

        assert_eq!(launcher.terminated(), 1);
        assert_eq!(pb.current_channel(), Some("Rock"));
        assert_eq!(pb.owner(), Some(PlaybackOwner::Manual));
    }

    #[test]
    fn test_stop_asks_player_to_quit() {
        let (mut pb, launcher) = playback();
        pb.stop();
        assert!(launcher.lines().is_empty());

        pb.play("Jazz", 35, PlaybackOwner::Manual);
        pb.stop();
        assert_eq!(launcher.lines().last().map(String::as_str), Some("quit"));
        assert_eq!(launcher.terminated(), 1);
        assert!(!pb.is_playing());
    }

    #[test]
    fn test_unknown_channel_leaves_controller_stopped() {
        let (mut pb, launcher) = playback();
        pb.play("Jazz", 35, PlaybackOwner::Manual);
        pb.play("Nope", 35, PlaybackOwner::Manual);

        assert!(!pb.is_playing());
        assert_eq!(launcher.launches().len(), 1);
    }

    #[test]
    fn test_pause_toggles_without_process() {
        let (mut pb, launcher) = playback();
        pb.pause();
        assert!(pb.is_paused());
        assert!(launcher.lines().is_empty());

        pb.play("Jazz", 35, PlaybackOwner::Manual);
        pb.pause();
        assert!(pb.is_paused());
        assert_eq!(launcher.lines().last().map(String::as_str), Some("pause"));
    }

    #[test]
    fn test_volume_is_forwarded_unclamped() {
        let (mut pb, launcher) = playback();
        pb.play("Jazz", 35, PlaybackOwner::Manual);
        pb.set_volume(250, true);
        pb.set_volume(-5, false);
        assert_eq!(
            launcher.lines()[1..],
            ["volume 250 1".to_string(), "volume -5 0".to_string()]
        );
    }

    #[test]
    fn test_reap_clears_dead_session() {
        let (mut pb, launcher) = playback();
        pb.play("Jazz", 35, PlaybackOwner::Manual);
        assert!(!pb.reap());

        launcher.kill_all();
        assert!(pb.reap());
        assert!(!pb.is_playing());
    }
}
