use axum::async_trait;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::fmt::Display;
use thiserror::Error;

pub use self::{
    registry::{BackendConfig, BackendRegistry},
    value::{Metadata, PlainValue},
};

pub mod dbus;
pub mod registry;
pub mod value;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum LoopMode {
    None,
    Playlist,
    Track,
}

impl LoopMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Playlist => "Playlist",
            Self::Track => "Track",
        }
    }

    pub fn from_protocol(value: &str) -> Option<Self> {
        match value {
            "None" => Some(Self::None),
            "Playlist" => Some(Self::Playlist),
            "Track" => Some(Self::Track),
            _ => None,
        }
    }
}

impl Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum IpcError {
    #[error(transparent)]
    Bus(#[from] zbus::Error),
    #[error(transparent)]
    Fdo(#[from] zbus::fdo::Error),
    #[error(transparent)]
    Variant(#[from] zbus::zvariant::Error),
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] IpcError),
    #[error("can not {0}")]
    CapabilityDenied(&'static str),
    #[error("missing input value")]
    MissingInput,
    #[error("{0} is not implemented !")]
    NotImplemented(&'static str),
    #[error("unexpected {found} for property {property}")]
    UnexpectedValue {
        property: &'static str,
        found: String,
    },
    #[error("{0} seconds is out of range")]
    OutOfRange(i64),
}

pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Operations a player-control backend exposes to the HTTP layer.
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    async fn play(&self) -> BackendResult {
        Err(BackendError::NotImplemented("play"))
    }

    async fn pause(&self) -> BackendResult {
        Err(BackendError::NotImplemented("pause"))
    }

    async fn toggle_play_pause(&self) -> BackendResult {
        Err(BackendError::NotImplemented("toggle_play_pause"))
    }

    async fn stop(&self) -> BackendResult {
        Err(BackendError::NotImplemented("stop"))
    }

    async fn show(&self) -> BackendResult {
        Err(BackendError::NotImplemented("show"))
    }

    async fn skip(&self) -> BackendResult {
        Err(BackendError::NotImplemented("skip"))
    }

    async fn prev(&self) -> BackendResult {
        Err(BackendError::NotImplemented("prev"))
    }

    /// Relative seek, negative seconds seek backward.
    async fn seek(&self, _seconds: i64) -> BackendResult {
        Err(BackendError::NotImplemented("seek"))
    }

    async fn set_position(&self, _seconds: i64) -> BackendResult {
        Err(BackendError::NotImplemented("set_position"))
    }

    async fn get_position(&self) -> BackendResult<i64> {
        Err(BackendError::NotImplemented("get_position"))
    }

    async fn set_loop(&self, _mode: Option<LoopMode>) -> BackendResult {
        Err(BackendError::NotImplemented("set_loop"))
    }

    async fn get_loop(&self) -> BackendResult<LoopMode> {
        Err(BackendError::NotImplemented("get_loop"))
    }

    async fn set_shuffle(&self, _shuffle: bool) -> BackendResult {
        Err(BackendError::NotImplemented("set_shuffle"))
    }

    async fn get_shuffle(&self) -> BackendResult<bool> {
        Err(BackendError::NotImplemented("get_shuffle"))
    }

    /// Forwarded unclamped.
    async fn set_volume(&self, _volume: f64) -> BackendResult {
        Err(BackendError::NotImplemented("set_volume"))
    }

    async fn get_volume(&self) -> BackendResult<f64> {
        Err(BackendError::NotImplemented("get_volume"))
    }

    async fn get_current_song(&self) -> BackendResult<Metadata> {
        Err(BackendError::NotImplemented("get_current_song"))
    }

    async fn get_playing(&self) -> BackendResult<bool> {
        Err(BackendError::NotImplemented("get_playing"))
    }
}

#[derive(Debug, PartialEq)]
pub enum Payload {
    Empty,
    Position(i64),
    Loop(LoopMode),
    Shuffle(bool),
    Volume(f64),
    CurrentSong(Metadata),
    Playing(bool),
}

/// Serializes to `{"status": true, <payload field>}` or
/// `{"status": false, "error": "..."}`.
#[derive(Debug, PartialEq)]
pub enum Reply {
    Success(Payload),
    Failure(String),
}

impl From<BackendResult<Payload>> for Reply {
    fn from(value: BackendResult<Payload>) -> Self {
        match value {
            Ok(payload) => Self::Success(payload),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

impl From<BackendResult> for Reply {
    fn from(value: BackendResult) -> Self {
        value.map(|()| Payload::Empty).into()
    }
}

impl Serialize for Reply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = match self {
            Self::Success(Payload::Empty) => 1,
            _ => 2,
        };
        let mut map = serializer.serialize_map(Some(len))?;
        match self {
            Self::Failure(error) => {
                map.serialize_entry("status", &false)?;
                map.serialize_entry("error", error)?;
            }
            Self::Success(payload) => {
                map.serialize_entry("status", &true)?;
                match payload {
                    Payload::Empty => {}
                    Payload::Position(position) => map.serialize_entry("position", position)?,
                    Payload::Loop(mode) => map.serialize_entry("loop", mode)?,
                    Payload::Shuffle(shuffle) => map.serialize_entry("shuffle", shuffle)?,
                    Payload::Volume(volume) => map.serialize_entry("volume", volume)?,
                    Payload::CurrentSong(song) => map.serialize_entry("current_song", song)?,
                    Payload::Playing(playing) => map.serialize_entry("playing", playing)?,
                }
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Unsupported;

    impl PlayerBackend for Unsupported {}

    #[tokio::test]
    async fn default_operations_fail_loudly() {
        let backend = Unsupported;
        let err = backend.play().await.unwrap_err();
        assert!(matches!(err, BackendError::NotImplemented("play")));
        assert_eq!(err.to_string(), "play is not implemented !");
        assert!(matches!(
            backend.get_volume().await,
            Err(BackendError::NotImplemented("get_volume"))
        ));
        assert!(matches!(
            backend.set_loop(Some(LoopMode::Track)).await,
            Err(BackendError::NotImplemented("set_loop"))
        ));
    }

    #[test]
    fn loop_mode_is_case_sensitive() {
        assert_eq!(LoopMode::from_protocol("Playlist"), Some(LoopMode::Playlist));
        assert_eq!(LoopMode::from_protocol("playlist"), None);
        assert_eq!(LoopMode::Track.to_string(), "Track");
        assert_eq!(serde_json::to_value(LoopMode::None).unwrap(), json!("None"));
    }

    #[test]
    fn reply_shapes() {
        let ok = Reply::from(Ok::<_, BackendError>(()));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"status": true}));

        let volume = Reply::from(Ok::<_, BackendError>(Payload::Volume(0.25)));
        assert_eq!(
            serde_json::to_value(&volume).unwrap(),
            json!({"status": true, "volume": 0.25})
        );

        let looped = Reply::from(Ok::<_, BackendError>(Payload::Loop(LoopMode::Playlist)));
        assert_eq!(
            serde_json::to_value(&looped).unwrap(),
            json!({"status": true, "loop": "Playlist"})
        );

        let failed = Reply::from(Err::<(), _>(BackendError::CapabilityDenied("seek")));
        assert!(matches!(failed, Reply::Failure(_)));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({"status": false, "error": "can not seek"})
        );
    }
}
