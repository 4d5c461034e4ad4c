//! Register access for the DVB-S2 encoder FPGA design and its TX wrapper.
//!
//! The [`maps`] module holds the register maps of every generated revision. A
//! [`Device`] gives named access to a map over any [`Bus`], and a [`Probe`]
//! drives the AXI-stream debug probe of one pipeline [`Stage`]:
//!
//! ```
//! use dvbs2_regmap::{Device, Revision, Stage, sim::SimBus};
//!
//! let mut device = Device::encoder(SimBus::new(Revision::R336), Revision::R336);
//! let mut probe = device.probe(Stage::LdpcEncoder).unwrap();
//!
//! probe.block(true).unwrap();
//! probe.step_word().unwrap();
//! ```

pub mod bus;
pub mod device;
pub mod error;
pub mod mapper;
pub mod maps;
pub mod memory;
pub mod probe;
pub mod revision;
#[cfg(feature = "sim")]
pub mod sim;
pub mod stage;

pub use bus::Bus;
pub use device::{Device, ResetMismatch};
pub use error::Error;
pub use mapper::ConstellationRam;
pub use memory::Memory;
pub use probe::{Probe, ProbeState, Status, Strobes};
pub use revision::Revision;
pub use stage::Stage;

pub use model;
