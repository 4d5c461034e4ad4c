//! The collaborator performing the actual 32-bit register accesses.

use crate::error::Error;

/// A memory-mapped 32-bit register bus.
///
/// Addresses are absolute byte addresses. Implementations report their own
/// failures through [`Bus::Error`], which is handed back to the caller untouched.
pub trait Bus {
    type Error;

    fn read32(&mut self, address: u32) -> Result<u32, Self::Error>;
    fn write32(&mut self, address: u32, value: u32) -> Result<(), Self::Error>;
}

impl<B> Bus for &mut B
where
    B: Bus + ?Sized,
{
    type Error = B::Error;

    fn read32(&mut self, address: u32) -> Result<u32, Self::Error> {
        (**self).read32(address)
    }

    fn write32(&mut self, address: u32, value: u32) -> Result<(), Self::Error> {
        (**self).write32(address, value)
    }
}

/// Read `address`, tracing the access and wrapping a bus failure.
pub(crate) fn read<B>(bus: &mut B, address: u32) -> Result<u32, Error<B::Error>>
where
    B: Bus + ?Sized,
{
    let value = bus.read32(address).map_err(Error::Bus)?;
    log::trace!("read  0x{address:08x} -> 0x{value:08x}");

    Ok(value)
}

/// Write `address`, tracing the access and wrapping a bus failure.
pub(crate) fn write<B>(bus: &mut B, address: u32, value: u32) -> Result<(), Error<B::Error>>
where
    B: Bus + ?Sized,
{
    log::trace!("write 0x{address:08x} <- 0x{value:08x}");

    bus.write32(address, value).map_err(Error::Bus)
}
