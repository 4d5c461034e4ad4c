use model::{Block, Model, Register, field::Access};

use crate::{
    bus::{self, Bus},
    error::Error,
    mapper::ConstellationRam,
    maps,
    memory::Memory,
    probe::{Probe, Status},
    revision::Revision,
    stage::Stage,
};

/// A read-write field whose hardware value differs from its documented reset value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetMismatch {
    pub register: String,
    pub field: &'static str,
    pub expected: u32,
    pub actual: u32,
}

/// Named access to every register of one register map over a [`Bus`].
///
/// ```
/// use dvbs2_regmap::{Device, Revision, sim::SimBus};
///
/// let mut device = Device::encoder(SimBus::new(Revision::R336), Revision::R336);
///
/// device.write_field("config", "enable_dummy_frames", 1).unwrap();
/// assert_eq!(device.read_register("config").unwrap(), 0x0004_0001);
/// ```
pub struct Device<B> {
    bus: B,
    model: Model,
    revision: Option<Revision>,
    base_addr: u32,
}

fn lookup<'a, E>(model: &'a Model, symbol: &str) -> Result<(&'a Block, &'a Register), Error<E>> {
    model
        .find(symbol)
        .ok_or_else(|| Error::UnknownRegister(symbol.to_string()))
}

impl<B> Device<B>
where
    B: Bus,
{
    /// A device described by an arbitrary map, placed at the map's default base address.
    pub fn new(bus: B, model: Model) -> Self {
        let base_addr = model.base_addr;

        Self {
            bus,
            model,
            revision: None,
            base_addr,
        }
    }

    pub fn encoder(bus: B, revision: Revision) -> Self {
        Self {
            revision: Some(revision),
            ..Self::new(bus, maps::encoder(revision))
        }
    }

    pub fn wrapper(bus: B) -> Self {
        Self::new(bus, maps::wrapper())
    }

    /// Place the map at `base_addr` on the bus.
    pub fn base_addr(mut self, base_addr: u32) -> Self {
        self.base_addr = base_addr;

        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    fn unsupported(&self, operation: impl Into<String>) -> Error<B::Error> {
        Error::Unsupported {
            operation: operation.into(),
            revision: self.model.revision,
        }
    }

    /// Absolute address of a plain register, rejecting memories and forbidden access.
    fn register_address(&self, symbol: &str, write: bool) -> Result<u32, Error<B::Error>> {
        let (block, register) = lookup(&self.model, symbol)?;

        if register.is_memory() {
            return Err(self.unsupported(format!("register access to memory {symbol}")));
        }

        let access = register.access();
        let permitted = if write {
            access.is_write()
        } else {
            access.is_read()
        };

        if !permitted {
            return Err(Error::Access {
                register: symbol.to_string(),
                field: register.fields.first().map(|field| field.ident).unwrap_or(""),
                access,
            });
        }

        Ok(Model::address_of(self.base_addr, block, register))
    }

    pub fn read_register(&mut self, symbol: &str) -> Result<u32, Error<B::Error>> {
        let address = self.register_address(symbol, false)?;

        bus::read(&mut self.bus, address)
    }

    pub fn write_register(&mut self, symbol: &str, value: u32) -> Result<(), Error<B::Error>> {
        let address = self.register_address(symbol, true)?;

        log::debug!("{symbol} <- 0x{value:08x}");
        bus::write(&mut self.bus, address, value)
    }

    pub fn read_field(&mut self, symbol: &str, field: &str) -> Result<u32, Error<B::Error>> {
        let (address, field) = {
            let (block, register) = lookup(&self.model, symbol)?;

            if register.is_memory() {
                return Err(self.unsupported(format!("field access to memory {symbol}")));
            }

            let field = *register.try_field(field)?;

            if !field.access.is_read() {
                return Err(Error::Access {
                    register: symbol.to_string(),
                    field: field.ident,
                    access: field.access,
                });
            }

            (Model::address_of(self.base_addr, block, register), field)
        };

        let raw = bus::read(&mut self.bus, address)?;

        Ok(field.extract(raw))
    }

    /// Read-modify-write of one field.
    ///
    /// The value is checked before any bus access. Registers that cannot be read
    /// back are written starting from their reset value.
    pub fn write_field(
        &mut self,
        symbol: &str,
        field: &str,
        value: u32,
    ) -> Result<(), Error<B::Error>> {
        let (address, field, readable, reset) = {
            let (block, register) = lookup(&self.model, symbol)?;

            if register.is_memory() {
                return Err(self.unsupported(format!("field access to memory {symbol}")));
            }

            let field = *register.try_field(field)?;

            if !field.access.is_write() {
                return Err(Error::Access {
                    register: symbol.to_string(),
                    field: field.ident,
                    access: field.access,
                });
            }

            (
                Model::address_of(self.base_addr, block, register),
                field,
                register.access().is_read(),
                register.reset(),
            )
        };

        field.insert(0, value)?;

        let raw = if readable {
            bus::read(&mut self.bus, address)?
        } else {
            reset
        };
        let updated = field.insert(raw, value)?;

        log::debug!("{symbol}.{} <- 0x{value:x}", field.ident);
        bus::write(&mut self.bus, address, updated)
    }

    /// The debug probe of `stage`.
    pub fn probe(&mut self, stage: Stage) -> Result<Probe<&mut B>, Error<B::Error>> {
        let Some(revision) = self.revision else {
            return Err(self.unsupported(format!("probe of stage {stage}")));
        };

        Probe::new(&mut self.bus, stage, revision, self.base_addr)
    }

    /// The status of every probe, in pipeline order.
    pub fn status_all(&mut self) -> Result<Vec<Status>, Error<B::Error>> {
        let Some(revision) = self.revision else {
            return Ok(Vec::new());
        };

        revision
            .stages()
            .iter()
            .map(|stage| self.probe(*stage)?.read_status())
            .collect()
    }

    pub fn memory(&mut self, symbol: &str) -> Result<Memory<&mut B>, Error<B::Error>> {
        let (address, register) = {
            let (block, register) = lookup(&self.model, symbol)?;

            (
                Model::address_of(self.base_addr, block, register),
                register.clone(),
            )
        };

        if !register.is_memory() {
            return Err(self.unsupported(format!("memory access to register {symbol}")));
        }

        Ok(Memory::new(&mut self.bus, register, address))
    }

    /// The indirect constellation mapper RAM port.
    pub fn constellation_ram(&mut self) -> Result<ConstellationRam<&mut B>, Error<B::Error>> {
        if !self
            .revision
            .is_some_and(|revision| revision.has_constellation_port())
        {
            return Err(self.unsupported("constellation mapper RAM port"));
        }

        Ok(ConstellationRam::new(&mut self.bus, self.base_addr))
    }

    /// Compare every read-write field of every plain register against its reset value.
    ///
    /// Read-only fields report live hardware state and are not checked.
    pub fn verify_reset(&mut self) -> Result<Vec<ResetMismatch>, Error<B::Error>> {
        let mut mismatches = Vec::new();

        let registers = self
            .model
            .registers()
            .filter(|(_, register)| {
                !register.is_memory()
                    && register
                        .fields
                        .iter()
                        .any(|field| field.access == Access::ReadWrite)
            })
            .map(|(block, register)| {
                (
                    block.register_name(register),
                    Model::address_of(self.base_addr, block, register),
                    register.fields.clone(),
                )
            })
            .collect::<Vec<_>>();

        for (name, address, fields) in registers {
            let raw = bus::read(&mut self.bus, address)?;

            for field in fields
                .iter()
                .filter(|field| field.access == Access::ReadWrite)
            {
                let actual = field.extract(raw);

                if actual != field.reset_value() {
                    log::warn!(
                        "{name}.{}: expected reset value 0x{:x}, found 0x{actual:x}",
                        field.ident,
                        field.reset_value()
                    );

                    mismatches.push(ResetMismatch {
                        register: name.clone(),
                        field: field.ident,
                        expected: field.reset_value(),
                        actual,
                    });
                }
            }
        }

        Ok(mismatches)
    }
}
