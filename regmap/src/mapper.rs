//! The indirect RAM port of the constellation mapper.
//!
//! The RAM is not mapped directly: software selects an entry through the address
//! register, then moves data through the write-data or read-data register.

use crate::{
    bus::{self, Bus},
    error::Error,
    maps::encoder::{
        constellation_mapper_address, constellation_mapper_read_data,
        constellation_mapper_write_data,
    },
};

pub struct ConstellationRam<B> {
    bus: B,
    base_addr: u32,
}

impl<B> ConstellationRam<B>
where
    B: Bus,
{
    /// `base_addr` is the absolute base address of the encoder map.
    pub(crate) fn new(bus: B, base_addr: u32) -> Self {
        Self { bus, base_addr }
    }

    fn select(&mut self, address: u32) -> Result<(), Error<B::Error>> {
        bus::write(
            &mut self.bus,
            self.base_addr
                .wrapping_add(constellation_mapper_address::OFFSET),
            constellation_mapper_address::VALUE.insert(0, address)?,
        )
    }

    pub fn write(&mut self, address: u32, data: u32) -> Result<(), Error<B::Error>> {
        self.select(address)?;

        bus::write(
            &mut self.bus,
            self.base_addr
                .wrapping_add(constellation_mapper_write_data::OFFSET),
            constellation_mapper_write_data::VALUE.insert(0, data)?,
        )
    }

    pub fn read(&mut self, address: u32) -> Result<u32, Error<B::Error>> {
        self.select(address)?;

        let raw = bus::read(
            &mut self.bus,
            self.base_addr
                .wrapping_add(constellation_mapper_read_data::OFFSET),
        )?;

        Ok(constellation_mapper_read_data::VALUE.extract(raw))
    }

    /// Write `data` to consecutive entries from `start`.
    ///
    /// Fails before any write if the last entry would lie past the address space.
    pub fn load(&mut self, start: u32, data: &[u32]) -> Result<(), Error<B::Error>> {
        let count = u32::try_from(data.len().saturating_sub(1)).unwrap_or(u32::MAX);
        let last = start.checked_add(count).ok_or(Error::OutOfRange {
            field: constellation_mapper_address::VALUE.ident,
            value: start,
            limit: u32::MAX - count,
        })?;

        log::debug!("constellation mapper: loading {} entries at {start}", data.len());

        for (address, value) in (start..=last).zip(data) {
            self.write(address, *value)?;
        }

        Ok(())
    }
}
