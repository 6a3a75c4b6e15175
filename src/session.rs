use crate::api::{self, Commands, DEFAULT_SID};
use crate::devices::{DeviceHandle, DeviceInfo};
use crate::error::{FritzError, Result};
use crate::fritz_xml;
use crate::transport::{HttpTransport, Transport};

/// A login at one fritz box.
///
/// The session id is only set by [`Session::connect`] and
/// [`Session::reconnect`] and reset by [`Session::close`]. A `Session` does no
/// locking of its own, wrap it in a mutex to share it between threads.
pub struct Session<T = HttpTransport> {
    transport: T,
    host: String,
    user: String,
    password: String,
    sid: String,
}

impl Session<HttpTransport> {
    /// Creates a disconnected session using the default request timeout.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(transport: T) -> Self {
        Session {
            transport,
            host: String::new(),
            user: String::new(),
            password: String::new(),
            sid: DEFAULT_SID.to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The current session id, [`DEFAULT_SID`] while disconnected.
    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn is_connected(&self) -> bool {
        self.sid != DEFAULT_SID
    }

    /// Stores host and credentials and logs in.
    pub fn connect(
        &mut self,
        host: impl ToString,
        user: impl ToString,
        password: impl ToString,
    ) -> Result<()> {
        self.host = host.to_string();
        self.user = user.to_string();
        self.password = password.to_string();
        self.reconnect()
    }

    /// Logs in again with the stored credentials, e.g. after the fritz box
    /// expired the session.
    pub fn reconnect(&mut self) -> Result<()> {
        match api::login(&self.transport, &self.host, &self.user, &self.password) {
            Ok(sid) => {
                self.sid = sid;
                Ok(())
            }
            Err(err) => {
                self.sid = DEFAULT_SID.to_string();
                Err(err)
            }
        }
    }

    /// Logs out. The local session id is reset even if the logout request
    /// fails.
    pub fn close(&mut self) -> Result<()> {
        let result = api::logout(&self.transport, &self.host, &self.sid);
        self.sid = DEFAULT_SID.to_string();
        result
    }

    // -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

    fn require_sid(&self) -> Result<&str> {
        if !self.is_connected() {
            return Err(FritzError::NotConnected);
        }
        Ok(&self.sid)
    }

    /// Sends `cmd` for the device `ain` and returns the raw answer.
    pub(crate) fn command(&self, ain: &str, cmd: Commands) -> Result<String> {
        let sid = self.require_sid()?;
        debug!("[fritz api] {} for {:?}", cmd.verb(), ain);
        self.transport
            .get(&api::command_url(&self.host, ain, sid, cmd))
    }

    /// Returns list of all smart home devices.
    pub fn devices(&self) -> Result<Vec<DeviceInfo>> {
        let sid = self.require_sid()?;
        let xml = self.transport.get(&api::device_list_url(&self.host, sid))?;
        let devices = fritz_xml::parse_device_infos(&xml)?;
        debug!("found {} devices", devices.len());
        Ok(devices
            .into_iter()
            .map(DeviceInfo::from_xml_device)
            .collect())
    }

    /// Looks up a device by its name (compared lower-cased) or its ain.
    pub fn device(&self, name_or_ain: &str) -> Result<DeviceHandle> {
        let name = name_or_ain.to_lowercase();
        self.devices()?
            .iter()
            .find(|dev| dev.name == name || dev.ain == name_or_ain)
            .map(DeviceHandle::from_info)
            .ok_or_else(|| FritzError::DeviceNotFound(name_or_ain.to_string()))
    }
}

impl<T> std::fmt::Display for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sid)
    }
}
