use self::{
    bus::{MprisBus, PlayerCall, RootCall, SessionBus},
    normalize::{normalize, normalize_map},
};
use super::{
    value::strip_namespaces, BackendError, BackendResult, LoopMode, Metadata, PlainValue,
    PlayerBackend,
};
use axum::async_trait;
use zbus::zvariant::Value;

pub mod bus;
pub mod normalize;

const MICROS_PER_SECOND: i64 = 1_000_000;

pub struct DbusBackend<B = SessionBus> {
    bus: B,
}

impl DbusBackend<SessionBus> {
    pub async fn connect(player: &str) -> BackendResult<Self> {
        Ok(Self::new(SessionBus::connect(player).await?))
    }
}

impl<B: MprisBus> DbusBackend<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    async fn property(&self, name: &'static str) -> BackendResult<PlainValue> {
        Ok(normalize(&self.bus.get_property(name).await?))
    }

    async fn typed_property<T>(
        &self,
        name: &'static str,
        extract: impl FnOnce(&PlainValue) -> Option<T> + Send,
    ) -> BackendResult<T> {
        let value = self.property(name).await?;
        extract(&value).ok_or_else(|| BackendError::UnexpectedValue {
            property: name,
            found: value.kind().to_owned(),
        })
    }

    async fn require(&self, capability: &'static str, action: &'static str) -> BackendResult {
        if self.typed_property(capability, PlainValue::as_bool).await? {
            Ok(())
        } else {
            Err(BackendError::CapabilityDenied(action))
        }
    }

    async fn raw_metadata(&self) -> BackendResult<Metadata> {
        let value = self.bus.get_property("Metadata").await?;
        normalize_map(&value).ok_or_else(|| BackendError::UnexpectedValue {
            property: "Metadata",
            found: normalize(&value).kind().to_owned(),
        })
    }

    async fn player(&self, call: PlayerCall) -> BackendResult {
        Ok(self.bus.call_player(call).await?)
    }
}

fn to_micros(seconds: i64) -> BackendResult<i64> {
    seconds
        .checked_mul(MICROS_PER_SECOND)
        .ok_or(BackendError::OutOfRange(seconds))
}

#[async_trait]
impl<B: MprisBus> PlayerBackend for DbusBackend<B> {
    async fn play(&self) -> BackendResult {
        self.player(PlayerCall::Play).await
    }

    async fn pause(&self) -> BackendResult {
        self.player(PlayerCall::Pause).await
    }

    async fn toggle_play_pause(&self) -> BackendResult {
        self.player(PlayerCall::PlayPause).await
    }

    async fn stop(&self) -> BackendResult {
        self.player(PlayerCall::Stop).await?;
        Ok(self.bus.call_root(RootCall::Quit).await?)
    }

    async fn show(&self) -> BackendResult {
        Ok(self.bus.call_root(RootCall::Raise).await?)
    }

    async fn skip(&self) -> BackendResult {
        self.require("CanGoNext", "next").await?;
        self.player(PlayerCall::Next).await
    }

    async fn prev(&self) -> BackendResult {
        self.require("CanGoPrevious", "previous").await?;
        self.player(PlayerCall::Previous).await
    }

    async fn seek(&self, seconds: i64) -> BackendResult {
        self.require("CanSeek", "seek").await?;
        let offset = to_micros(seconds)?;
        self.player(PlayerCall::Seek { offset }).await
    }

    async fn set_position(&self, seconds: i64) -> BackendResult {
        let position = to_micros(seconds)?;
        let track_id = self
            .raw_metadata()
            .await?
            .get("mpris:trackid")
            .and_then(PlainValue::as_str)
            .unwrap_or_default()
            .to_owned();
        self.player(PlayerCall::SetPosition { track_id, position })
            .await
    }

    async fn get_position(&self) -> BackendResult<i64> {
        // reported as-is, the player sends microseconds
        self.typed_property("Position", PlainValue::as_i64).await
    }

    async fn set_loop(&self, mode: Option<LoopMode>) -> BackendResult {
        let mode = mode.ok_or(BackendError::MissingInput)?;
        Ok(self
            .bus
            .set_property("LoopStatus", Value::from(mode.as_str()))
            .await?)
    }

    async fn get_loop(&self) -> BackendResult<LoopMode> {
        let value = self.property("LoopStatus").await?;
        value
            .as_str()
            .and_then(LoopMode::from_protocol)
            .ok_or_else(|| BackendError::UnexpectedValue {
                property: "LoopStatus",
                found: match value.as_str() {
                    Some(s) => format!("value \"{s}\""),
                    None => value.kind().to_owned(),
                },
            })
    }

    async fn set_shuffle(&self, shuffle: bool) -> BackendResult {
        Ok(self
            .bus
            .set_property("Shuffle", Value::from(shuffle))
            .await?)
    }

    async fn get_shuffle(&self) -> BackendResult<bool> {
        self.typed_property("Shuffle", PlainValue::as_bool).await
    }

    async fn set_volume(&self, volume: f64) -> BackendResult {
        Ok(self
            .bus
            .set_property("Volume", Value::from(volume))
            .await?)
    }

    async fn get_volume(&self) -> BackendResult<f64> {
        self.typed_property("Volume", PlainValue::as_f64).await
    }

    async fn get_current_song(&self) -> BackendResult<Metadata> {
        Ok(strip_namespaces(self.raw_metadata().await?))
    }

    async fn get_playing(&self) -> BackendResult<bool> {
        self.typed_property("PlaybackStatus", |status| {
            status.as_str().map(|status| status == "Playing")
        })
        .await
    }
}
