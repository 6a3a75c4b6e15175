//! Login protocol and request urls of the AHA HTTP interface.

use crate::error::{FritzError, Result};
use crate::fritz_xml as xml;
use crate::transport::Transport;

/// The sid the fritz box hands out while nobody is logged in.
pub const DEFAULT_SID: &str = "0000000000000000";

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Computes the hash that proves we know the password.
/// 1. Concat `challenge`, "-" and `password`
/// 2. Convert that to UTF16le
/// 3. MD5 that byte array
/// 4. Render the digest as lowercase hex
pub(crate) fn compute_hash(challenge: &str, password: &str) -> String {
    let hash_input = format!("{}-{}", challenge, password);
    let digest = md5::compute(utf16_le_bytes(&hash_input));
    format!("{:032x}", digest)
}

fn utf16_le_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

fn login_url(host: &str) -> String {
    format!("http://{}/login_sid.lua", host)
}

fn login_response_url(host: &str, user: &str, challenge: &str, hash: &str) -> String {
    format!(
        "http://{}/login_sid.lua?user={}&response={}-{}",
        host,
        urlencoding::encode(user),
        challenge,
        hash
    )
}

fn logout_url(host: &str, sid: &str) -> String {
    format!("http://{}/login_sid.lua?logout=1&sid={}", host, sid)
}

/// Requests the login challenge of the fritz box.
pub(crate) fn obtain_challenge(transport: &impl Transport, host: &str) -> Result<String> {
    let body = transport.get(&login_url(host))?;
    Ok(xml::parse_session_info(&body)?.challenge)
}

/// Exchanges user name and password for a session id (sid).
pub(crate) fn login(
    transport: &impl Transport,
    host: &str,
    user: &str,
    password: &str,
) -> Result<String> {
    let challenge = obtain_challenge(transport, host)?;
    let hash = compute_hash(&challenge, password);
    let body = transport.get(&login_response_url(host, user, &challenge, &hash))?;
    let info = xml::parse_session_info(&body)?;

    if info.sid.is_empty() || info.sid == DEFAULT_SID {
        warn!(
            "login for user {:?} at {} rejected (block time {}s)",
            user, host, info.block_time
        );
        return Err(FritzError::LoginFailed);
    }

    info!("logged in as {:?} at {}", user, host);
    for (right, access) in info.rights.granted() {
        trace!("right {} access {}", right, access);
    }
    Ok(info.sid)
}

/// Invalidates `sid` on the fritz box.
pub(crate) fn logout(transport: &impl Transport, host: &str, sid: &str) -> Result<()> {
    let body = transport.get(&logout_url(host, sid))?;
    xml::parse_session_info(&body)?;
    info!("logged out from {}", host);
    Ok(())
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Commands {
    GetDeviceListInfos,
    GetBasicDeviceStats,
    GetSwitchPower,
    GetSwitchEnergy,
    GetSwitchName,
    GetSwitchPresent,
    GetSwitchState,
    GetTemperature,
    SetSwitchOff,
    SetSwitchOn,
    SetSwitchToggle,
}

impl Commands {
    pub(crate) fn verb(self) -> &'static str {
        use Commands::*;
        match self {
            GetDeviceListInfos => "getdevicelistinfos",
            GetBasicDeviceStats => "getbasicdevicestats",
            GetSwitchPower => "getswitchpower",
            GetSwitchEnergy => "getswitchenergy",
            GetSwitchName => "getswitchname",
            GetSwitchPresent => "getswitchpresent",
            GetSwitchState => "getswitchstate",
            GetTemperature => "gettemperature",
            SetSwitchOff => "setswitchoff",
            SetSwitchOn => "setswitchon",
            SetSwitchToggle => "setswitchtoggle",
        }
    }
}

pub(crate) fn device_list_url(host: &str, sid: &str) -> String {
    format!(
        "http://{}/webservices/homeautoswitch.lua?sid={}&switchcmd={}",
        host,
        sid,
        Commands::GetDeviceListInfos.verb()
    )
}

pub(crate) fn command_url(host: &str, ain: &str, sid: &str, cmd: Commands) -> String {
    format!(
        "http://{}/webservices/homeautoswitch.lua?ain={}&sid={}&switchcmd={}",
        host,
        urlencoding::encode(ain),
        sid,
        cmd.verb()
    )
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-
