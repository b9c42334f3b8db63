use crate::backend::IpcError;
use axum::async_trait;
use zbus::{
    fdo::PropertiesProxy,
    names::InterfaceName,
    proxy,
    zvariant::{ObjectPath, Value},
    Connection,
};

pub const MPRIS_BUS_PREFIX: &str = "org.mpris.MediaPlayer2.";
pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
pub const MPRIS_PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

#[proxy(
    interface = "org.mpris.MediaPlayer2",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MediaPlayer2 {
    fn raise(&self) -> zbus::Result<()>;
    fn quit(&self) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MprisPlayer {
    fn play(&self) -> zbus::Result<()>;
    fn pause(&self) -> zbus::Result<()>;
    fn play_pause(&self) -> zbus::Result<()>;
    fn stop(&self) -> zbus::Result<()>;
    fn next(&self) -> zbus::Result<()>;
    fn previous(&self) -> zbus::Result<()>;
    fn seek(&self, offset: i64) -> zbus::Result<()>;
    fn set_position(&self, track_id: &ObjectPath<'_>, position: i64) -> zbus::Result<()>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RootCall {
    Raise,
    Quit,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PlayerCall {
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Previous,
    // microseconds
    Seek { offset: i64 },
    SetPosition { track_id: String, position: i64 },
}

#[async_trait]
pub trait MprisBus: Send + Sync {
    async fn call_root(&self, call: RootCall) -> Result<(), IpcError>;
    async fn call_player(&self, call: PlayerCall) -> Result<(), IpcError>;
    async fn get_property(&self, name: &'static str) -> Result<Value<'static>, IpcError>;
    async fn set_property(&self, name: &'static str, value: Value<'static>)
        -> Result<(), IpcError>;
}

pub struct SessionBus {
    root: MediaPlayer2Proxy<'static>,
    player: MprisPlayerProxy<'static>,
    properties: PropertiesProxy<'static>,
}

impl SessionBus {
    pub async fn connect(player: &str) -> Result<Self, IpcError> {
        let connection = Connection::session().await?;
        Self::with_connection(&connection, player).await
    }

    pub async fn with_connection(connection: &Connection, player: &str) -> Result<Self, IpcError> {
        let bus_name = player_bus_name(player);
        let root = MediaPlayer2Proxy::builder(connection)
            .destination(bus_name.clone())?
            .build()
            .await?;
        let player = MprisPlayerProxy::builder(connection)
            .destination(bus_name.clone())?
            .build()
            .await?;
        let properties = PropertiesProxy::builder(connection)
            .destination(bus_name)?
            .path(MPRIS_OBJECT_PATH)?
            .build()
            .await?;
        Ok(Self {
            root,
            player,
            properties,
        })
    }

    fn player_interface() -> InterfaceName<'static> {
        InterfaceName::from_static_str_unchecked(MPRIS_PLAYER_INTERFACE)
    }
}

pub fn player_bus_name(player: &str) -> String {
    format!("{MPRIS_BUS_PREFIX}{player}")
}

#[async_trait]
impl MprisBus for SessionBus {
    async fn call_root(&self, call: RootCall) -> Result<(), IpcError> {
        match call {
            RootCall::Raise => self.root.raise().await?,
            RootCall::Quit => self.root.quit().await?,
        }
        Ok(())
    }

    async fn call_player(&self, call: PlayerCall) -> Result<(), IpcError> {
        match call {
            PlayerCall::Play => self.player.play().await?,
            PlayerCall::Pause => self.player.pause().await?,
            PlayerCall::PlayPause => self.player.play_pause().await?,
            PlayerCall::Stop => self.player.stop().await?,
            PlayerCall::Next => self.player.next().await?,
            PlayerCall::Previous => self.player.previous().await?,
            PlayerCall::Seek { offset } => self.player.seek(offset).await?,
            PlayerCall::SetPosition { track_id, position } => {
                let track_id = ObjectPath::try_from(track_id.as_str())?;
                self.player.set_position(&track_id, position).await?
            }
        }
        Ok(())
    }

    async fn get_property(&self, name: &'static str) -> Result<Value<'static>, IpcError> {
        let value = self
            .properties
            .get(Self::player_interface(), name)
            .await?;
        Ok(value.into())
    }

    async fn set_property(
        &self,
        name: &'static str,
        value: Value<'static>,
    ) -> Result<(), IpcError> {
        self.properties
            .set(Self::player_interface(), name, &value)
            .await?;
        Ok(())
    }
}
