//! Typed view of the device list.
//!
//! The fritz box reports every reading for every device, whether the device
//! has the matching hardware or not. The [`Capabilities`] bitmask decides what
//! is meaningful: without the switchable socket bit, switch state, mode and
//! locks are reported as their `Invalid` variant; without the temperature
//! sensor bit the temperature is `0.0`; without the energy gauge bit the power
//! meter reads zero.

use crate::fritz_xml as xml;

mod handle;
pub use handle::DeviceHandle;

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// capabilities

static CAPABILITY_NAMES: [(u32, &str); 9] = [
    (Capabilities::HANFUN_DEVICE, "hanfun device"),
    (Capabilities::ALARM_SENSOR, "alarm sensor"),
    (Capabilities::RADIATOR_REGULATOR, "radiator regulator"),
    (Capabilities::ENERGY_GAUGE, "energy gauge"),
    (Capabilities::TEMPERATURE_SENSOR, "temperature sensor"),
    (Capabilities::SWITCHABLE_SOCKET, "switchable socket"),
    (Capabilities::DECT_REPEATER, "dect repeater"),
    (Capabilities::MICROPHONE, "microphone"),
    (Capabilities::HANFUN_UNIT, "hanfun unit"),
];

/// The `functionbitmask` of a device.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities(u32);

impl Capabilities {
    pub const HANFUN_DEVICE: u32 = 1;
    pub const ALARM_SENSOR: u32 = 1 << 4;
    pub const RADIATOR_REGULATOR: u32 = 1 << 6;
    pub const ENERGY_GAUGE: u32 = 1 << 7;
    pub const TEMPERATURE_SENSOR: u32 = 1 << 8;
    pub const SWITCHABLE_SOCKET: u32 = 1 << 9;
    pub const DECT_REPEATER: u32 = 1 << 10;
    pub const MICROPHONE: u32 = 1 << 11;
    pub const HANFUN_UNIT: u32 = 1 << 13;

    pub fn from_bits(bits: u32) -> Self {
        Capabilities(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    pub fn is_hanfun_device(&self) -> bool {
        self.contains(Self::HANFUN_DEVICE)
    }

    pub fn is_alarm_sensor(&self) -> bool {
        self.contains(Self::ALARM_SENSOR)
    }

    pub fn is_radiator_regulator(&self) -> bool {
        self.contains(Self::RADIATOR_REGULATOR)
    }

    pub fn has_energy_gauge(&self) -> bool {
        self.contains(Self::ENERGY_GAUGE)
    }

    pub fn has_temperature_sensor(&self) -> bool {
        self.contains(Self::TEMPERATURE_SENSOR)
    }

    pub fn is_switchable(&self) -> bool {
        self.contains(Self::SWITCHABLE_SOCKET)
    }

    pub fn is_repeater(&self) -> bool {
        self.contains(Self::DECT_REPEATER)
    }

    pub fn has_microphone(&self) -> bool {
        self.contains(Self::MICROPHONE)
    }

    pub fn is_hanfun_unit(&self) -> bool {
        self.contains(Self::HANFUN_UNIT)
    }

    /// Names of all recognized flags that are set.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        CAPABILITY_NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl std::fmt::Display for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names().collect::<Vec<_>>().join(", "))
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// states

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    Off,
    On,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMode {
    Auto,
    Manual,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Offline,
    Online,
}

impl SwitchState {
    fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => SwitchState::On,
            "0" => SwitchState::Off,
            _ => SwitchState::Invalid,
        }
    }
}

impl SwitchMode {
    fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "auto" => SwitchMode::Auto,
            "manuell" => SwitchMode::Manual,
            _ => SwitchMode::Invalid,
        }
    }
}

impl LockState {
    fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => LockState::Locked,
            "0" => LockState::Unlocked,
            _ => LockState::Invalid,
        }
    }
}

impl Presence {
    fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "1" => Presence::Online,
            _ => Presence::Offline,
        }
    }
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchState::Off => write!(f, "off"),
            SwitchState::On => write!(f, "on"),
            SwitchState::Invalid => write!(f, ""),
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Presence::Offline => write!(f, "offline"),
            Presence::Online => write!(f, "online"),
        }
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
// device info

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchInfo {
    pub state: SwitchState,
    pub mode: SwitchMode,
    /// Locked via the fritz box user interface / API.
    pub lock: LockState,
    /// Locked via the button on the device.
    pub device_lock: LockState,
}

impl SwitchInfo {
    const INVALID: SwitchInfo = SwitchInfo {
        state: SwitchState::Invalid,
        mode: SwitchMode::Invalid,
        lock: LockState::Invalid,
        device_lock: LockState::Invalid,
    };
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PowerMeterInfo {
    pub watts: f64,
    pub energy_in_watt_h: f64,
    pub volts: f64,
}

/// One entry of the device list, a snapshot taken by
/// [`Session::devices`](crate::Session::devices).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// Lower-cased device name.
    pub name: String,
    /// Actor identification number.
    pub ain: String,
    pub id: u32,
    pub capabilities: Capabilities,
    pub fwversion: String,
    pub manufacturer: String,
    pub productname: String,
    pub present: Presence,
    pub switch: SwitchInfo,
    pub powermeter: PowerMeterInfo,
    /// Calibrated temperature in °C.
    pub celsius: f64,
}

impl DeviceInfo {
    pub(crate) fn from_xml_device(device: xml::Device) -> Self {
        let capabilities = Capabilities::from_bits(device.functionbitmask);

        let switch = match &device.switch {
            Some(switch) if capabilities.is_switchable() => SwitchInfo {
                state: SwitchState::from_raw(&switch.state),
                mode: SwitchMode::from_raw(&switch.mode),
                lock: LockState::from_raw(&switch.lock),
                device_lock: LockState::from_raw(&switch.devicelock),
            },
            _ => SwitchInfo::INVALID,
        };

        let powermeter = match &device.powermeter {
            Some(meter) if capabilities.has_energy_gauge() => PowerMeterInfo {
                watts: meter.power as f64 / 1000.0,
                energy_in_watt_h: meter.energy as f64,
                volts: meter.voltage as f64 / 1000.0,
            },
            _ => PowerMeterInfo::default(),
        };

        let celsius = match &device.temperature {
            Some(temp) if capabilities.has_temperature_sensor() => {
                (temp.celsius as f64 + temp.offset as f64) / 10.0
            }
            _ => 0.0,
        };

        DeviceInfo {
            name: device.name.to_lowercase(),
            ain: device.identifier,
            id: device.id,
            capabilities,
            fwversion: device.fwversion,
            manufacturer: device.manufacturer,
            productname: device.productname,
            present: Presence::from_raw(&device.present),
            switch,
            powermeter,
            celsius,
        }
    }

    pub fn is_on(&self) -> bool {
        self.switch.state == SwitchState::On
    }
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "identifier={:?} productname={:?} name={:?} {}",
            self.ain, self.productname, self.name, self.present
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(bitmask: u32, body: &str) -> DeviceInfo {
        let doc = format!(
            r#"<devicelist><device identifier="08761 0000434" id="17" functionbitmask="{}" fwversion="03.33" manufacturer="AVM" productname="FRITZ!DECT 200">{}</device></devicelist>"#,
            bitmask, body
        );
        let raw = xml::parse_device_infos(&doc).unwrap().pop().unwrap();
        DeviceInfo::from_xml_device(raw)
    }

    #[test]
    fn capabilities() {
        let caps = Capabilities::from_bits(35712);
        assert!(caps.is_switchable());
        assert!(caps.has_temperature_sensor());
        assert!(caps.has_energy_gauge());
        assert!(!caps.is_repeater());
        assert_eq!(
            caps.names().collect::<Vec<_>>(),
            vec!["energy gauge", "temperature sensor", "switchable socket", "microphone"]
        );
        assert_eq!(Capabilities::from_bits(0).to_string(), "");
        assert!(Capabilities::from_bits(1 << 13).is_hanfun_unit());
    }

    #[test]
    fn switchable_socket_without_temperature() {
        let dev = device(
            512,
            "<present>1</present><name>Wallbox</name><switch><state>1</state></switch><temperature><celsius>215</celsius><offset>0</offset></temperature>",
        );
        assert_eq!(dev.switch.state, SwitchState::On);
        assert!(dev.is_on());
        assert_eq!(dev.celsius, 0.0);
        assert_eq!(dev.name, "wallbox");
        assert_eq!(dev.present, Presence::Online);
    }

    #[test]
    fn full_plug() {
        let dev = device(
            35712,
            "<present>1</present><name>Wärmepumpe</name>\
             <switch><state>0</state><mode>auto</mode><lock>1</lock><devicelock>0</devicelock></switch>\
             <powermeter><voltage>230051</voltage><power>1500</power><energy>8117</energy></powermeter>\
             <temperature><celsius>215</celsius><offset>-5</offset></temperature>",
        );
        assert_eq!(dev.name, "wärmepumpe");
        assert_eq!(dev.id, 17);
        assert_eq!(
            dev.switch,
            SwitchInfo {
                state: SwitchState::Off,
                mode: SwitchMode::Auto,
                lock: LockState::Locked,
                device_lock: LockState::Unlocked,
            }
        );
        assert_eq!(dev.powermeter.watts, 1.5);
        assert_eq!(dev.powermeter.energy_in_watt_h, 8117.0);
        assert!((dev.powermeter.volts - 230.051).abs() < 1e-9);
        assert!((dev.celsius - 21.0).abs() < 1e-9);
    }

    #[test]
    fn bit_absent_is_invalid_everywhere() {
        let dev = device(
            1024,
            "<present>0</present><name>Repeater</name>\
             <switch><state>1</state><mode>manuell</mode><lock>0</lock><devicelock>0</devicelock></switch>\
             <powermeter><voltage>1</voltage><power>2</power><energy>3</energy></powermeter>",
        );
        assert_eq!(dev.switch, SwitchInfo::INVALID);
        assert_eq!(dev.powermeter, PowerMeterInfo::default());
        assert_eq!(dev.present, Presence::Offline);
        assert!(!dev.is_on());
    }

    #[test]
    fn unknown_switch_values() {
        let dev = device(
            512,
            "<present>2</present><switch><state></state><mode>Manuell</mode><lock>x</lock><devicelock></devicelock></switch>",
        );
        assert_eq!(dev.switch.state, SwitchState::Invalid);
        assert_eq!(dev.switch.mode, SwitchMode::Manual);
        assert_eq!(dev.switch.lock, LockState::Invalid);
        assert_eq!(dev.present, Presence::Offline);
    }

    #[test]
    fn negative_temperature() {
        let dev = device(
            256,
            "<temperature><celsius>-35</celsius><offset>10</offset></temperature>",
        );
        assert!((dev.celsius - -2.5).abs() < 1e-9);
    }

    #[test]
    fn extreme_temperature_does_not_overflow() {
        let dev = device(
            256,
            "<temperature><celsius>2147483647</celsius><offset>1</offset></temperature>",
        );
        assert!((dev.celsius - 214748364.8).abs() < 1e-6);

        let dev = device(
            256,
            "<temperature><celsius>-2147483648</celsius><offset>-1</offset></temperature>",
        );
        assert!((dev.celsius - -214748364.9).abs() < 1e-6);
    }
}
