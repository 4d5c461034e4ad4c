//! Control and observation of one stage debug probe.
//!
//! A probe sits on the AXI stream between two pipeline stages. While flowing it
//! only counts; once blocked, data advances one word or one frame at a time
//! through single-write pulses of the `allow_*` bits:
//!
//! ```text
//!            block(true)
//! Flowing  ---------------->  Blocked  --+ step_word / step_frame
//!          <----------------           <-+
//!            block(false)
//! ```

use derive_more::Display;
use model::Field;

use crate::{
    bus::{self, Bus},
    error::Error,
    maps::probe::{cfg, frame_count, last_frame_length, min_max_frame_length, strobes, word_count},
    revision::Revision,
    stage::Stage,
};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Display)]
pub enum ProbeState {
    /// `block_data` is clear, the stream passes untouched. The reset state.
    #[display("flowing")]
    Flowing,
    /// `block_data` is set, the stream is held.
    #[display("blocked")]
    Blocked,
}

/// Instantaneous AXI-stream handshake signals on both sides of the probe.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub struct Strobes {
    pub s_tvalid: bool,
    pub s_tready: bool,
    pub m_tvalid: bool,
    pub m_tready: bool,
}

impl Strobes {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            s_tvalid: strobes::S_TVALID.is_set(raw),
            s_tready: strobes::S_TREADY.is_set(raw),
            m_tvalid: strobes::M_TVALID.is_set(raw),
            m_tready: strobes::M_TREADY.is_set(raw),
        }
    }
}

/// A snapshot of every probe register.
///
/// Registers are read one at a time, so the snapshot is only coherent if the
/// stage was blocked beforehand.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Status {
    pub stage: Stage,
    pub state: ProbeState,
    pub frame_count: u16,
    pub last_frame_length: u16,
    pub min_frame_length: u16,
    pub max_frame_length: u16,
    /// Absent on revisions without the register.
    pub word_count: Option<u16>,
    /// Absent on revisions without the register.
    pub strobes: Option<Strobes>,
}

pub struct Probe<B> {
    bus: B,
    stage: Stage,
    revision: Revision,
    base_addr: u32,
}

impl<B> Probe<B>
where
    B: Bus,
{
    /// Attach to the probe of `stage` in a device mapped at `device_base`.
    pub fn new(
        bus: B,
        stage: Stage,
        revision: Revision,
        device_base: u32,
    ) -> Result<Self, Error<B::Error>> {
        let offset = stage.base(revision).ok_or_else(|| Error::Unsupported {
            operation: format!("probe of stage {stage}"),
            revision: revision.number(),
        })?;

        Ok(Self {
            bus,
            stage,
            revision,
            base_addr: device_base.wrapping_add(offset),
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Absolute address of the `cfg` register.
    pub fn base_addr(&self) -> u32 {
        self.base_addr
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    fn read(&mut self, offset: u32) -> Result<u32, Error<B::Error>> {
        bus::read(&mut self.bus, self.base_addr.wrapping_add(offset))
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<(), Error<B::Error>> {
        bus::write(&mut self.bus, self.base_addr.wrapping_add(offset), value)
    }

    fn read_field(&mut self, offset: u32, field: Field) -> Result<u16, Error<B::Error>> {
        let raw = self.read(offset)?;

        Ok(field.extract(raw) as u16)
    }

    fn unsupported(&self, operation: &str) -> Error<B::Error> {
        Error::Unsupported {
            operation: operation.to_string(),
            revision: self.revision.number(),
        }
    }

    /// Read the current state from hardware.
    pub fn state(&mut self) -> Result<ProbeState, Error<B::Error>> {
        let raw = self.read(cfg::OFFSET)?;

        Ok(state_of(raw))
    }

    /// Hold (`true`) or release (`false`) the stream. Repeating a request has no further effect.
    pub fn block(&mut self, enable: bool) -> Result<(), Error<B::Error>> {
        let raw = self.read(cfg::OFFSET)?;
        let updated = cfg::BLOCK_DATA.insert(raw, enable as u32)?;

        self.write(cfg::OFFSET, updated)?;

        if raw != updated {
            log::debug!("{}: {} -> {}", self.stage, state_of(raw), state_of(updated));
        }

        Ok(())
    }

    /// Set `field` in `cfg` then clear it again, leaving all other bits as read.
    fn pulse(&mut self, field: Field) -> Result<(), Error<B::Error>> {
        let raw = self.read(cfg::OFFSET)?;
        let idle = field.insert(raw, 0)?;

        self.write(cfg::OFFSET, field.insert(idle, 1)?)?;
        self.write(cfg::OFFSET, idle)
    }

    fn step(&mut self, field: Field, operation: &'static str) -> Result<(), Error<B::Error>> {
        if self.state()? != ProbeState::Blocked {
            return Err(Error::InvalidState {
                operation,
                reason: "the probe is not blocking data",
            });
        }

        log::debug!("{}: {operation}", self.stage);
        self.pulse(field)
    }

    /// Let exactly one word through a blocked probe.
    pub fn step_word(&mut self) -> Result<(), Error<B::Error>> {
        self.step(cfg::ALLOW_WORD, "step one word")
    }

    /// Let the remainder of the current frame through a blocked probe.
    pub fn step_frame(&mut self) -> Result<(), Error<B::Error>> {
        self.step(cfg::ALLOW_FRAME, "step one frame")
    }

    /// Clear the min/max frame length tracker. Frame and word counters are untouched.
    pub fn reset_counters(&mut self) -> Result<(), Error<B::Error>> {
        if !self.revision.has_reset_min_max() {
            return Err(self.unsupported("reset_min_max"));
        }

        log::debug!("{}: reset min/max frame length", self.stage);
        self.pulse(cfg::RESET_MIN_MAX)
    }

    pub fn frame_count(&mut self) -> Result<u16, Error<B::Error>> {
        self.read_field(frame_count::OFFSET, frame_count::VALUE)
    }

    pub fn last_frame_length(&mut self) -> Result<u16, Error<B::Error>> {
        self.read_field(last_frame_length::OFFSET, last_frame_length::VALUE)
    }

    /// The shortest and longest frame lengths seen, as `(min, max)`.
    pub fn min_max_frame_length(&mut self) -> Result<(u16, u16), Error<B::Error>> {
        let raw = self.read(min_max_frame_length::OFFSET)?;

        Ok((
            min_max_frame_length::MIN_FRAME_LENGTH.extract(raw) as u16,
            min_max_frame_length::MAX_FRAME_LENGTH.extract(raw) as u16,
        ))
    }

    pub fn word_count(&mut self) -> Result<u16, Error<B::Error>> {
        if !self.revision.has_word_count() {
            return Err(self.unsupported("word_count"));
        }

        self.read_field(word_count::OFFSET, word_count::VALUE)
    }

    pub fn strobes(&mut self) -> Result<Strobes, Error<B::Error>> {
        if !self.revision.has_strobes() {
            return Err(self.unsupported("strobes"));
        }

        let raw = self.read(strobes::OFFSET)?;

        Ok(Strobes::from_raw(raw))
    }

    pub fn read_status(&mut self) -> Result<Status, Error<B::Error>> {
        let state = self.state()?;
        let frame_count = self.frame_count()?;
        let last_frame_length = self.last_frame_length()?;
        let (min_frame_length, max_frame_length) = self.min_max_frame_length()?;

        let word_count = if self.revision.has_word_count() {
            Some(self.word_count()?)
        } else {
            None
        };

        let strobes = if self.revision.has_strobes() {
            Some(self.strobes()?)
        } else {
            None
        };

        Ok(Status {
            stage: self.stage,
            state,
            frame_count,
            last_frame_length,
            min_frame_length,
            max_frame_length,
            word_count,
            strobes,
        })
    }
}

fn state_of(cfg: u32) -> ProbeState {
    if cfg::BLOCK_DATA.is_set(cfg) {
        ProbeState::Blocked
    } else {
        ProbeState::Flowing
    }
}
