//! Message kinds and typed command parameters.

use crate::error::StatusCode;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Key under which the session identifier is injected into structured payloads.
pub const SESSION_ID_KEY: &str = "SessionID";

/// Key holding the device status code in structured replies.
pub const STATUS_KEY: &str = "Ret";

/// Date/time format used by the time query and time sync commands.
pub const DEVICE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix preceding every raw audio frame pushed to the device.
pub const TALK_STREAM_MARKER: [u8; 8] = [0x00, 0x00, 0x01, 0xFA, 0x0E, 0x02, 0x40, 0x01];

/// Numeric message kind carried in the frame header.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageKind(pub u16);

impl MessageKind {
    // Session
    pub const LOGIN: MessageKind = MessageKind(1000);
    pub const LOGOUT: MessageKind = MessageKind(1001);
    pub const KEEPALIVE: MessageKind = MessageKind(1006);

    // Queries
    pub const SYSINFO: MessageKind = MessageKind(1020);
    pub const CONFIG_GET: MessageKind = MessageKind(1042);
    pub const CHANNEL_TITLE_GET: MessageKind = MessageKind(1048);
    pub const ABILITY_GET: MessageKind = MessageKind(1360);
    pub const USERS_GET: MessageKind = MessageKind(1472);

    // Control
    pub const PTZ: MessageKind = MessageKind(1400);
    pub const TIME_QUERY: MessageKind = MessageKind(1452);
    pub const SYNC_TIME: MessageKind = MessageKind(1590);

    // Talk
    pub const TALK: MessageKind = MessageKind(1430);
    pub const TALK_DATA: MessageKind = MessageKind(1432);
    pub const TALK_CLAIM: MessageKind = MessageKind(1434);

    // Downloads
    pub const CONFIG_EXPORT: MessageKind = MessageKind(1542);
    pub const PHOTO_GET: MessageKind = MessageKind(1600);

    /// Returns the numeric code.
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Returns whether structured payloads of this kind carry the session identifier.
    pub fn carries_session_id(&self) -> bool {
        *self != Self::LOGIN
    }

    /// Returns whether replies to this kind carry raw bytes instead of structured data.
    pub fn has_raw_reply(&self) -> bool {
        matches!(*self, Self::CONFIG_EXPORT | Self::PHOTO_GET | Self::TALK_DATA)
    }

    /// Returns a symbolic name for catalogued kinds.
    pub fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Self::LOGIN => "LOGIN",
            Self::LOGOUT => "LOGOUT",
            Self::KEEPALIVE => "KEEPALIVE",
            Self::SYSINFO => "SYSINFO",
            Self::CONFIG_GET => "CONFIG_GET",
            Self::CHANNEL_TITLE_GET => "CHANNEL_TITLE_GET",
            Self::ABILITY_GET => "ABILITY_GET",
            Self::USERS_GET => "USERS_GET",
            Self::PTZ => "PTZ",
            Self::TIME_QUERY => "TIME_QUERY",
            Self::SYNC_TIME => "SYNC_TIME",
            Self::TALK => "TALK",
            Self::TALK_DATA => "TALK_DATA",
            Self::TALK_CLAIM => "TALK_CLAIM",
            Self::CONFIG_EXPORT => "CONFIG_EXPORT",
            Self::PHOTO_GET => "PHOTO_GET",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Debug for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "MessageKind({})", self.0),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Formats a session identifier the way structured payloads embed it (`0x0000000f`).
pub fn format_session_id(session_id: u32) -> String {
    format!("{:#010x}", session_id)
}

/// Parses a `0x`-prefixed hexadecimal session identifier.
pub fn parse_session_id(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

/// Reads the `Ret` status from a structured reply, if present.
pub fn reply_status(reply: &Value) -> Option<StatusCode> {
    reply.get(STATUS_KEY).and_then(Value::as_i64).map(StatusCode)
}

/// Login parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginParams {
    #[serde(rename = "EncryptType")]
    pub encrypt_type: String,
    #[serde(rename = "LoginType")]
    pub login_type: String,
    #[serde(rename = "PassWord")]
    pub password: String,
    #[serde(rename = "UserName")]
    pub username: String,
}

impl LoginParams {
    pub fn new(username: impl Into<String>, password_token: impl Into<String>) -> Self {
        Self {
            encrypt_type: "MD5".to_string(),
            login_type: "DVRIP-Web".to_string(),
            password: password_token.into(),
            username: username.into(),
        }
    }
}

/// Login reply.
///
/// Only `Ret` is required. The other fields are informational and read as
/// `None` when a device sends them with an unexpected type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginReply {
    #[serde(rename = "Ret")]
    pub status: StatusCode,
    #[serde(rename = "SessionID", default, deserialize_with = "lenient")]
    pub session_id: Option<String>,
    #[serde(rename = "AliveInterval", default, deserialize_with = "lenient")]
    pub alive_interval: Option<u64>,
    #[serde(rename = "ChannelNum", default, deserialize_with = "lenient")]
    pub channel_count: Option<u32>,
    #[serde(
        rename = "DeviceType ",
        alias = "DeviceType",
        default,
        deserialize_with = "lenient"
    )]
    pub device_type: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A query selecting a named section (`{"Name": "SystemInfo"}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedQuery {
    #[serde(rename = "Name")]
    pub name: String,
}

impl NamedQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// PTZ movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PtzDirection {
    DirectionUp,
    DirectionDown,
    DirectionLeft,
    DirectionRight,
    DirectionLeftUp,
    DirectionLeftDown,
    DirectionRightUp,
    DirectionRightDown,
    ZoomTile,
    ZoomWide,
    FocusNear,
    FocusFar,
    IrisSmall,
    IrisLarge,
}

/// `OPPTZControl` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtzControl {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "OPPTZControl")]
    pub control: PtzCommand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtzCommand {
    #[serde(rename = "Command")]
    pub command: PtzDirection,
    #[serde(rename = "Parameter")]
    pub parameter: PtzParameter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtzParameter {
    #[serde(rename = "AUX")]
    pub aux: PtzAux,
    #[serde(rename = "Channel")]
    pub channel: u32,
    #[serde(rename = "MenuOpts")]
    pub menu_opts: String,
    #[serde(rename = "POINT")]
    pub point: PtzPoint,
    #[serde(rename = "Pattern")]
    pub pattern: String,
    #[serde(rename = "Preset")]
    pub preset: i32,
    #[serde(rename = "Step")]
    pub step: u32,
    #[serde(rename = "Tour")]
    pub tour: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtzAux {
    #[serde(rename = "Number")]
    pub number: u32,
    #[serde(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PtzPoint {
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
    pub top: i32,
}

impl PtzControl {
    /// Starts moving in `direction`, or stops when `stop` is set.
    pub fn new(direction: PtzDirection, stop: bool) -> Self {
        Self {
            name: "OPPTZControl".to_string(),
            control: PtzCommand {
                command: direction,
                parameter: PtzParameter {
                    aux: PtzAux {
                        number: 0,
                        status: "On".to_string(),
                    },
                    channel: 0,
                    menu_opts: "Enter".to_string(),
                    point: PtzPoint::default(),
                    pattern: "Start".to_string(),
                    preset: if stop { -1 } else { 65535 },
                    step: 30,
                    tour: 0,
                },
            },
        }
    }
}

/// Audio format announced when claiming the talk channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AudioFormat {
    #[serde(rename = "BitRate")]
    pub bit_rate: u32,
    #[serde(rename = "EncodeType")]
    pub encode_type: &'static str,
    #[serde(rename = "SampleBit")]
    pub sample_bit: u32,
    #[serde(rename = "SampleRate")]
    pub sample_rate: u32,
}

impl AudioFormat {
    /// G.711 A-law, 8 kHz, 8-bit mono: the only format devices accept for talk.
    pub const G711_ALAW: AudioFormat = AudioFormat {
        bit_rate: 128,
        encode_type: "G711_ALAW",
        sample_bit: 8,
        sample_rate: 8000,
    };

    /// Bytes of encoded audio per second of playback.
    pub fn bytes_per_second(&self) -> u32 {
        self.sample_rate * self.sample_bit / 8
    }
}

/// Talk channel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TalkAction {
    Claim,
    Start,
    Stop,
}

/// `OPTalk` command used for claim, start and stop.
#[derive(Debug, Clone, Serialize)]
pub struct TalkRequest {
    #[serde(rename = "Name")]
    pub name: &'static str,
    #[serde(rename = "OPTalk")]
    pub talk: TalkOp,
}

#[derive(Debug, Clone, Serialize)]
pub struct TalkOp {
    #[serde(rename = "Action")]
    pub action: TalkAction,
    #[serde(rename = "AudioFormat")]
    pub audio_format: AudioFormat,
}

impl TalkRequest {
    pub fn new(action: TalkAction) -> Self {
        Self {
            name: "OPTalk",
            talk: TalkOp {
                action,
                audio_format: AudioFormat::G711_ALAW,
            },
        }
    }
}

/// `OPTimeSetting` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSetting {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "OPTimeSetting")]
    pub time: String,
}

impl TimeSetting {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            name: "OPTimeSetting".to_string(),
            time: time.format(DEVICE_TIME_FORMAT).to_string(),
        }
    }
}

/// Extracts the device time from an `OPTimeQuery` reply.
pub fn parse_time_reply(reply: &Value) -> Option<NaiveDateTime> {
    let text = reply.get("OPTimeQuery")?.as_str()?;
    NaiveDateTime::parse_from_str(text, DEVICE_TIME_FORMAT).ok()
}
