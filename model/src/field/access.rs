//! There are two fundamental actions that can be used to access a field:
//! 1. read
//! 1. write
//!
//! A field may support either or both, from the software (CPU) perspective:
//!
//! | Name      | Software Access | Hardware Access | Example                   |
//! | --------- | --------------- | --------------- | ------------------------- |
//! | Read      | Read            | Write           | probe counters, strobes   |
//! | Write     | Write           | Read            | mapper RAM write port     |
//! | ReadWrite | Read/Write      | Read            | `config`, probe `cfg`     |
//!
//! Reading a [`Access::Write`] field yields nothing meaningful, and writing a
//! [`Access::Read`] field has no effect on hardware, so both are rejected by the
//! runtime before reaching the bus.

use derive_more::Display;

#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Display)]
pub enum Access {
    /// The field may only be *read*, as a way to view data written by hardware.
    #[display("read-only")]
    Read,
    /// The field may only be *written*, as a way to send data to hardware.
    ///
    /// Since the field cannot be read, the data is ephemeral.
    #[display("write-only")]
    Write,
    /// The field may be both *read* and *written*, as a way to store
    /// configuration in hardware.
    #[default]
    #[display("read-write")]
    ReadWrite,
}

impl Access {
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}
