use crate::api::Commands;
use crate::error::{FritzError, Result};
use crate::stats::{self, DeviceStats};
use crate::transport::Transport;
use crate::Session;

use super::{Capabilities, DeviceInfo, Presence, SwitchState};

/// A device looked up by name or ain. The identifying fields and the
/// capabilities are frozen at lookup time, use [`DeviceHandle::info`] to
/// observe the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    name: String,
    ain: String,
    id: u32,
    capabilities: Capabilities,
    fwversion: String,
    manufacturer: String,
    productname: String,
}

impl DeviceHandle {
    pub(crate) fn from_info(info: &DeviceInfo) -> Self {
        DeviceHandle {
            name: info.name.clone(),
            ain: info.ain.clone(),
            id: info.id,
            capabilities: info.capabilities,
            fwversion: info.fwversion.clone(),
            manufacturer: info.manufacturer.clone(),
            productname: info.productname.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ain(&self) -> &str {
        &self.ain
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn fwversion(&self) -> &str {
        &self.fwversion
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn productname(&self) -> &str {
        &self.productname
    }

    /// Fetches the device list again and returns the current entry of this
    /// device.
    pub fn info<T: Transport>(&self, session: &Session<T>) -> Result<DeviceInfo> {
        session
            .devices()?
            .into_iter()
            .find(|dev| dev.ain == self.ain)
            .ok_or_else(|| FritzError::DeviceNotFound(self.ain.clone()))
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    pub fn switch_on<T: Transport>(&self, session: &Session<T>) -> Result<SwitchState> {
        self.switch_cmd(session, Commands::SetSwitchOn)
    }

    pub fn switch_off<T: Transport>(&self, session: &Session<T>) -> Result<SwitchState> {
        self.switch_cmd(session, Commands::SetSwitchOff)
    }

    /// Turns the switch on if it was off and off if it was on. Returns the
    /// new state.
    pub fn switch_toggle<T: Transport>(&self, session: &Session<T>) -> Result<SwitchState> {
        self.switch_cmd(session, Commands::SetSwitchToggle)
    }

    pub fn switch_state<T: Transport>(&self, session: &Session<T>) -> Result<SwitchState> {
        self.switch_cmd(session, Commands::GetSwitchState)
    }

    fn switch_cmd<T: Transport>(&self, session: &Session<T>, cmd: Commands) -> Result<SwitchState> {
        if !self.capabilities.is_switchable() {
            return Err(FritzError::SwitchCommandNotSupported);
        }
        let answer = session.command(&self.ain, cmd)?;
        parse_switch_answer(&answer)
    }

    /// Temperature in °C.
    pub fn temperature<T: Transport>(&self, session: &Session<T>) -> Result<f64> {
        if !self.capabilities.has_temperature_sensor() {
            return Err(FritzError::TemperatureNotSupported);
        }
        let answer = session.command(&self.ain, Commands::GetTemperature)?;
        Ok(parse_number(&answer)? / 10.0)
    }

    /// Current power in W.
    pub fn power<T: Transport>(&self, session: &Session<T>) -> Result<f64> {
        let answer = session.command(&self.ain, Commands::GetSwitchPower)?;
        Ok(parse_number(&answer)? / 1000.0)
    }

    /// Energy in Wh consumed since the device was set up.
    pub fn energy<T: Transport>(&self, session: &Session<T>) -> Result<f64> {
        let answer = session.command(&self.ain, Commands::GetSwitchEnergy)?;
        parse_number(&answer)
    }

    /// Whether the fritz box can currently reach the device.
    pub fn present<T: Transport>(&self, session: &Session<T>) -> Result<Presence> {
        let answer = session.command(&self.ain, Commands::GetSwitchPresent)?;
        parse_presence(&answer)
    }

    /// Same as [`DeviceHandle::present`].
    pub fn state<T: Transport>(&self, session: &Session<T>) -> Result<Presence> {
        self.present(session)
    }

    /// The device name as currently configured on the fritz box, not
    /// lower-cased.
    pub fn remote_name<T: Transport>(&self, session: &Session<T>) -> Result<String> {
        let answer = session.command(&self.ain, Commands::GetSwitchName)?;
        Ok(answer.trim().to_string())
    }

    pub fn basic_device_stats<T: Transport>(&self, session: &Session<T>) -> Result<Vec<DeviceStats>> {
        let xml = session.command(&self.ain, Commands::GetBasicDeviceStats)?;
        stats::parse_device_stats(&xml)
    }
}

impl std::fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

fn parse_switch_answer(answer: &str) -> Result<SwitchState> {
    let trimmed = answer.trim();
    if trimmed.starts_with("inval") {
        return Err(FritzError::InvalidSwitchState);
    }
    match trimmed.chars().next() {
        Some('1') => Ok(SwitchState::On),
        Some('0') => Ok(SwitchState::Off),
        _ => Err(FritzError::UnknownAnswer(answer.to_string())),
    }
}

fn parse_presence(answer: &str) -> Result<Presence> {
    match answer.trim().chars().next() {
        Some('1') => Ok(Presence::Online),
        Some('0') => Ok(Presence::Offline),
        _ => Err(FritzError::UnknownAnswer(answer.to_string())),
    }
}

fn parse_number(answer: &str) -> Result<f64> {
    answer
        .trim()
        .parse::<f64>()
        .map_err(|_| FritzError::UnknownAnswer(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;

    const CHALLENGE: &str = "<SessionInfo><SID>0000000000000000</SID><Challenge>1234567z</Challenge><BlockTime>0</BlockTime></SessionInfo>";
    const GRANTED: &str = "<SessionInfo><SID>9a8f7e6d5c4b3a21</SID><Challenge>1234567z</Challenge><BlockTime>0</BlockTime></SessionInfo>";

    fn handle(bitmask: u32) -> DeviceHandle {
        DeviceHandle {
            name: "wallbox".to_string(),
            ain: "08761 0000434".to_string(),
            id: 17,
            capabilities: Capabilities::from_bits(bitmask),
            fwversion: "03.33".to_string(),
            manufacturer: "AVM".to_string(),
            productname: "FRITZ!DECT 200".to_string(),
        }
    }

    fn connected(transport: FakeTransport) -> Session<FakeTransport> {
        let transport = transport
            .route("response=", GRANTED)
            .route("login_sid.lua", CHALLENGE);
        let mut session = Session::with_transport(transport);
        session.connect("fritz.box", "smarthome", "äbc").unwrap();
        session.transport().clear();
        session
    }

    #[test]
    fn switch_answers() {
        assert_eq!(parse_switch_answer("1\n").unwrap(), SwitchState::On);
        assert_eq!(parse_switch_answer("0").unwrap(), SwitchState::Off);
        assert!(matches!(
            parse_switch_answer("inval\n"),
            Err(FritzError::InvalidSwitchState)
        ));
        assert!(matches!(
            parse_switch_answer(""),
            Err(FritzError::UnknownAnswer(_))
        ));
        assert!(matches!(
            parse_switch_answer("in"),
            Err(FritzError::UnknownAnswer(_))
        ));
        assert!(matches!(
            parse_switch_answer("<html>"),
            Err(FritzError::UnknownAnswer(_))
        ));
    }

    #[test]
    fn presence_answers() {
        assert_eq!(parse_presence("1\n").unwrap(), Presence::Online);
        assert_eq!(parse_presence("0").unwrap(), Presence::Offline);
        assert!(matches!(parse_presence(""), Err(FritzError::UnknownAnswer(_))));
        assert!(matches!(parse_presence("x"), Err(FritzError::UnknownAnswer(_))));
    }

    #[test]
    fn switch_commands_need_switchable_socket() {
        let session = connected(FakeTransport::new());
        for bitmask in [0, 1, 256, 1024, 2944 & !Capabilities::SWITCHABLE_SOCKET] {
            let dev = handle(bitmask);
            assert!(matches!(
                dev.switch_on(&session),
                Err(FritzError::SwitchCommandNotSupported)
            ));
            assert!(matches!(
                dev.switch_off(&session),
                Err(FritzError::SwitchCommandNotSupported)
            ));
            assert!(matches!(
                dev.switch_toggle(&session),
                Err(FritzError::SwitchCommandNotSupported)
            ));
            assert!(matches!(
                dev.switch_state(&session),
                Err(FritzError::SwitchCommandNotSupported)
            ));
        }
        assert!(session.transport().requests().is_empty());
    }

    #[test]
    fn temperature_needs_sensor() {
        let session = connected(FakeTransport::new());
        assert!(matches!(
            handle(512).temperature(&session),
            Err(FritzError::TemperatureNotSupported)
        ));
        assert!(session.transport().requests().is_empty());
    }

    #[test]
    fn switch_on() {
        let session = connected(FakeTransport::new().route("switchcmd=setswitchon", "1\n"));
        assert_eq!(handle(512).switch_on(&session).unwrap(), SwitchState::On);
        assert_eq!(
            session.transport().requests(),
            vec!["http://fritz.box/webservices/homeautoswitch.lua?ain=08761%200000434&sid=9a8f7e6d5c4b3a21&switchcmd=setswitchon".to_string()]
        );
    }

    #[test]
    fn switch_off() {
        let session = connected(FakeTransport::new().route("switchcmd=setswitchoff", "0\n"));
        assert_eq!(handle(512).switch_off(&session).unwrap(), SwitchState::Off);
        assert_eq!(
            session.transport().requests(),
            vec!["http://fritz.box/webservices/homeautoswitch.lua?ain=08761%200000434&sid=9a8f7e6d5c4b3a21&switchcmd=setswitchoff".to_string()]
        );
    }

    #[test]
    fn switch_toggle() {
        let session = connected(FakeTransport::new().route("switchcmd=setswitchtoggle", "1\n"));
        assert_eq!(handle(512).switch_toggle(&session).unwrap(), SwitchState::On);
        assert_eq!(
            session.transport().requests(),
            vec!["http://fritz.box/webservices/homeautoswitch.lua?ain=08761%200000434&sid=9a8f7e6d5c4b3a21&switchcmd=setswitchtoggle".to_string()]
        );
    }

    #[test]
    fn info_refetches_device_list() {
        let session = connected(FakeTransport::new().route(
            "switchcmd=getdevicelistinfos",
            r#"<devicelist version="1"><device identifier="08761 0000434" id="17" functionbitmask="2944" fwversion="03.33" manufacturer="AVM" productname="FRITZ!DECT 200"><present>1</present><name>Wallbox</name><switch><state>1</state><mode>manuell</mode><lock>0</lock><devicelock>0</devicelock></switch></device></devicelist>"#,
        ));
        let info = handle(2944).info(&session).unwrap();
        assert_eq!(info.ain, "08761 0000434");
        assert_eq!(info.switch.state, SwitchState::On);
        assert_eq!(info.present, Presence::Online);
    }

    #[test]
    fn info_of_removed_device() {
        let session = connected(FakeTransport::new().route(
            "switchcmd=getdevicelistinfos",
            r#"<devicelist version="1"><device identifier="11630 0012345" id="18" functionbitmask="1024" fwversion="04.16" manufacturer="AVM" productname="FRITZ!DECT Repeater 100"><present>1</present><name>Repeater</name></device></devicelist>"#,
        ));
        match handle(512).info(&session) {
            Err(FritzError::DeviceNotFound(ain)) => assert_eq!(ain, "08761 0000434"),
            other => panic!("expected DeviceNotFound, got {other:?}"),
        }
        assert_eq!(session.transport().requests().len(), 1);
    }

    #[test]
    fn switch_state_invalid() {
        let session = connected(FakeTransport::new().route("switchcmd=getswitchstate", "inval"));
        assert!(matches!(
            handle(512).switch_state(&session),
            Err(FritzError::InvalidSwitchState)
        ));
    }

    #[test]
    fn temperature() {
        let session = connected(FakeTransport::new().route("switchcmd=gettemperature", "  23.5"));
        assert_eq!(handle(256).temperature(&session).unwrap(), 2.35);
    }

    #[test]
    fn power_and_energy() {
        let session = connected(
            FakeTransport::new()
                .route("switchcmd=getswitchpower", "1500\n")
                .route("switchcmd=getswitchenergy", "8117\n")
                .route("switchcmd=getswitchname", "Wallbox\n"),
        );
        let dev = handle(0);
        assert_eq!(dev.power(&session).unwrap(), 1.5);
        assert_eq!(dev.energy(&session).unwrap(), 8117.0);
        assert_eq!(dev.remote_name(&session).unwrap(), "Wallbox");
    }

    #[test]
    fn numeric_garbage_is_unknown_answer() {
        let session = connected(FakeTransport::new().route("switchcmd=getswitchpower", "inval\n"));
        assert!(matches!(
            handle(640).power(&session),
            Err(FritzError::UnknownAnswer(_))
        ));
    }

    #[test]
    fn present_is_not_gated() {
        let session = connected(FakeTransport::new().route("switchcmd=getswitchpresent", "1\n"));
        let dev = handle(0);
        assert_eq!(dev.present(&session).unwrap(), Presence::Online);
        assert_eq!(dev.state(&session).unwrap(), Presence::Online);
    }

    #[test]
    fn commands_after_close_are_rejected_locally() {
        let mut session = connected(FakeTransport::new().route("logout=1", CHALLENGE));
        session.close().unwrap();
        session.transport().clear();

        let dev = handle(512 | 256);
        assert!(matches!(dev.switch_state(&session), Err(FritzError::NotConnected)));
        assert!(matches!(dev.temperature(&session), Err(FritzError::NotConnected)));
        assert!(matches!(dev.present(&session), Err(FritzError::NotConnected)));
        assert!(session.transport().requests().is_empty());
    }
}
