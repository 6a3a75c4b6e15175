//! Raw XML documents returned by the fritz box and their decoders.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};
use serde_xml_rs::from_reader;

use crate::error::Result;

/// Numeric fields are sent as text and may be empty when the device has no
/// reading yet.
fn deserialize_maybe_num<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    let s = String::deserialize(d)?;
    match s.trim() {
        "" => Ok(T::default()),
        s => s.parse::<T>().map_err(de::Error::custom),
    }
}

// response of login_sid.lua

#[derive(Debug, Deserialize)]
pub struct SessionInfo {
    #[serde(alias = "SID")]
    pub sid: String,
    #[serde(alias = "Challenge", default)]
    pub challenge: String,
    #[serde(alias = "BlockTime", default, deserialize_with = "deserialize_maybe_num")]
    pub block_time: i32,
    #[serde(alias = "Rights", default)]
    pub rights: Rights,
}

/// `<Rights>` interleaves `<Name>` and `<Access>` elements.
#[derive(Debug, Default, Deserialize)]
pub struct Rights {
    #[serde(rename = "$value", default)]
    entries: Vec<RightsEntry>,
}

#[derive(Debug, Deserialize)]
enum RightsEntry {
    Name(String),
    Access(String),
}

impl Rights {
    /// Pairs of right name and access level (0 = none, 1 = read, 2 = write).
    pub fn granted(&self) -> Vec<(String, u8)> {
        let mut result = Vec::new();
        let mut name: Option<&str> = None;
        for entry in &self.entries {
            match entry {
                RightsEntry::Name(n) => name = Some(n),
                RightsEntry::Access(access) => {
                    if let Some(name) = name.take() {
                        result.push((name.to_string(), access.trim().parse().unwrap_or(0)));
                    }
                }
            }
        }
        result
    }
}

pub fn parse_session_info(xml: &str) -> Result<SessionInfo> {
    from_reader(xml.as_bytes()).map_err(|err| {
        warn!("cannot parse session info");
        err.into()
    })
}

// response of getdevicelistinfos

#[derive(Debug, Deserialize)]
pub struct DeviceList {
    #[serde(rename = "device", default)]
    pub devices: Vec<Device>,
}

#[derive(Debug, Deserialize)]
pub struct Device {
    pub identifier: String,
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub id: u32,
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub functionbitmask: u32,
    #[serde(default)]
    pub fwversion: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub productname: String,
    #[serde(default)]
    pub present: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub switch: Option<Switch>,
    #[serde(default)]
    pub powermeter: Option<PowerMeter>,
    #[serde(default)]
    pub temperature: Option<Temperature>,
}

/// State fields stay textual, they are empty while the state is unknown.
#[derive(Debug, Default, Deserialize)]
pub struct Switch {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub mode: String,
    #[serde(alias = "loc", default)]
    pub lock: String,
    #[serde(alias = "deviceloc", default)]
    pub devicelock: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PowerMeter {
    /// Wert in 0,001 V
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub voltage: u32,
    /// Wert in 0,001 W
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub power: u32,
    /// Wert in 1.0 Wh (absoluter Verbrauch seit Inbetriebnahme)
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub energy: u32,
}

/// celsius: Wert in 0,1 °C, negative und positive Werte möglich
/// offset: Wert in 0,1 °C, negative und positive Werte möglich
#[derive(Debug, Default, Deserialize)]
pub struct Temperature {
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub celsius: i32,
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub offset: i32,
}

/// Parses raw [`Device`]s.
pub fn parse_device_infos(xml: &str) -> Result<Vec<Device>> {
    from_reader::<&[u8], DeviceList>(xml.as_bytes())
        .map(|list| list.devices)
        .map_err(|err| {
            warn!("cannot parse device infos");
            err.into()
        })
}

// response of getbasicdevicestats

#[derive(Debug, Default, Deserialize)]
pub struct RawDeviceStats {
    #[serde(default)]
    pub temperature: Option<RawManyStats>,
    #[serde(default)]
    pub voltage: Option<RawManyStats>,
    #[serde(default)]
    pub power: Option<RawManyStats>,
    #[serde(default)]
    pub energy: Option<RawManyStats>,
}

#[derive(Debug, Deserialize)]
pub struct RawManyStats {
    #[serde(default)]
    pub stats: Vec<RawStats>,
}

#[derive(Debug, Deserialize)]
pub struct RawStats {
    #[serde(default, deserialize_with = "deserialize_maybe_num")]
    pub grid: usize,
    #[serde(rename = "$value", default)]
    pub values: String,
}

pub fn parse_raw_device_stats(xml: &str) -> Result<RawDeviceStats> {
    Ok(from_reader(xml.as_bytes())?)
}
