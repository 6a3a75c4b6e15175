//! Client for the \"AVM Home Automation\" (AHA) HTTP interface of the fritz box
//! <https://avm.de/fileadmin/user_upload/Global/Service/Schnittstellen/AHA-HTTP-Interface.pdf>.
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> fritzbox::Result<()> {
//! let mut session = fritzbox::Session::new()?;
//! session.connect("fritz.box", "smarthome", "secret")?;
//!
//! // Look up a device by name or ain and turn it on
//! let device = session.device("wallbox")?;
//! if device.capabilities().is_switchable() {
//!     device.switch_on(&session)?;
//! }
//!
//! for info in session.devices()? {
//!     println!("{} {}", info, info.switch.state);
//! }
//!
//! session.close()?;
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

pub(crate) mod api;
pub mod devices;
pub mod error;
pub(crate) mod fritz_xml;
mod session;
pub mod stats;
pub mod transport;

pub use api::DEFAULT_SID;
pub use devices::{
    Capabilities, DeviceHandle, DeviceInfo, LockState, PowerMeterInfo, Presence, SwitchInfo,
    SwitchMode, SwitchState,
};
pub use error::{FritzError, Result};
pub use session::Session;
pub use stats::{DeviceStatValues, DeviceStats, DeviceStatsKind, Unit};
pub use transport::{HttpTransport, Transport};
