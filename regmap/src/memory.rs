use std::ops::Range;

use model::Register;

use crate::{
    bus::{self, Bus},
    error::Error,
};

/// A register with a depth: a linear array of 32-bit elements, one word apart.
pub struct Memory<B> {
    bus: B,
    register: Register,
    /// Absolute address of element 0, the register offset already applied.
    base_addr: u32,
}

impl<B> Memory<B>
where
    B: Bus,
{
    pub(crate) fn new(bus: B, register: Register, base_addr: u32) -> Self {
        Self {
            bus,
            register,
            base_addr,
        }
    }

    pub fn ident(&self) -> &str {
        &self.register.ident
    }

    pub fn depth(&self) -> u32 {
        self.register.len()
    }

    fn address(&self, index: u32) -> Result<u32, Error<B::Error>> {
        let offset = self.register.element_offset(index)?;

        Ok(self
            .base_addr
            .wrapping_add(offset - self.register.offset))
    }

    fn check(&self, range: &Range<u32>) -> Result<(), Error<B::Error>> {
        if range.end > self.depth() {
            return Err(Error::OutOfBounds {
                memory: self.register.ident.clone(),
                index: range.end.saturating_sub(1).max(range.start),
                depth: self.depth(),
            });
        }

        Ok(())
    }

    pub fn read(&mut self, index: u32) -> Result<u32, Error<B::Error>> {
        let address = self.address(index)?;

        bus::read(&mut self.bus, address)
    }

    pub fn write(&mut self, index: u32, value: u32) -> Result<(), Error<B::Error>> {
        let address = self.address(index)?;

        bus::write(&mut self.bus, address, value)
    }

    /// Write `values` to consecutive elements from `start`.
    ///
    /// The whole range is checked against the depth before the first write.
    pub fn load(&mut self, start: u32, values: &[u32]) -> Result<(), Error<B::Error>> {
        let len = u32::try_from(values.len()).unwrap_or(u32::MAX);
        let range = start..start.saturating_add(len);

        self.check(&range)?;

        log::debug!(
            "{}: loading {} elements at {}",
            self.register.ident,
            values.len(),
            start
        );

        for (index, value) in range.zip(values) {
            self.write(index, *value)?;
        }

        Ok(())
    }

    /// Read every element of `range`.
    pub fn dump(&mut self, range: Range<u32>) -> Result<Vec<u32>, Error<B::Error>> {
        self.check(&range)?;

        range.map(|index| self.read(index)).collect()
    }
}
