//! An in-memory stand-in for the encoder hardware.
//!
//! The register file starts at the documented reset values of the map. Probe
//! registers are backed by a small model of each stage: frames pushed with
//! [`SimBus::push_frame`] flow through the probe word by word, subject to
//! `block_data` and the `allow_*` pulses, updating the counters as real hardware
//! does. Every write is logged so tests can check what reached the bus.

use std::{collections::VecDeque, fmt::Display};

use indexmap::{IndexMap, IndexSet};
use model::{Model, Register, field::Access, register::WORD_BYTES};

use crate::{
    bus::Bus,
    maps::{
        self,
        encoder::{
            constellation_mapper_address, constellation_mapper_read_data,
            constellation_mapper_write_data,
        },
        probe::{
            cfg, frame_count, last_frame_length, min_max_frame_length, strobes, word_count,
        },
    },
    revision::Revision,
    stage::Stage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Nothing is mapped at the address.
    Unmapped(u32),
    /// A fault injected with [`SimBus::fail_at`].
    Fault(u32),
    /// The register is driven by the probe model and cannot be poked.
    Simulated(u32),
}

impl Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Unmapped(address) => write!(f, "no register at 0x{address:08x}"),
            SimError::Fault(address) => write!(f, "injected fault at 0x{address:08x}"),
            SimError::Simulated(address) => {
                write!(f, "probe register at 0x{address:08x} is simulated")
            }
        }
    }
}

impl std::error::Error for SimError {}

#[derive(Debug, Clone, Copy)]
struct Slot {
    value: u32,
    access: Access,
}

/// What a blocked probe may still let through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Credit {
    words: u32,
    frame: bool,
}

#[derive(Debug, Clone, Default)]
struct StageSim {
    base: u32,
    cfg: u32,
    cfg_mask: u32,
    /// Remaining words of every queued frame, oldest first.
    pending: VecDeque<u16>,
    /// Words of the oldest frame already passed.
    passed: u16,
    credit: Credit,
    frame_count: u16,
    word_count: u16,
    last_frame_length: u16,
    /// `(min, max)`, or [`None`] until a frame completes after a tracker reset.
    min_max: Option<(u16, u16)>,
}

impl StageSim {
    fn blocked(&self) -> bool {
        cfg::BLOCK_DATA.is_set(self.cfg)
    }

    fn write_cfg(&mut self, value: u32) {
        let value = value & self.cfg_mask;
        let rising = value & !self.cfg;
        self.cfg = value;

        if cfg::ALLOW_WORD.is_set(rising) {
            self.credit.words += 1;
        }

        if cfg::ALLOW_FRAME.is_set(rising) {
            self.credit.frame = true;
        }

        if cfg::RESET_MIN_MAX.is_set(rising) {
            self.min_max = None;
        }

        if !self.blocked() {
            self.credit = Credit::default();
        }

        self.advance();
    }

    /// Move words through the probe until the stream is empty or held.
    fn advance(&mut self) {
        while !self.pending.is_empty() {
            if !self.blocked() {
                self.pass_word();
            } else if self.credit.words > 0 {
                self.credit.words -= 1;
                self.pass_word();
            } else if self.credit.frame {
                if self.pass_word() {
                    self.credit.frame = false;
                }
            } else {
                break;
            }
        }
    }

    /// Pass one word, returning whether it completed a frame.
    fn pass_word(&mut self) -> bool {
        let Some(remaining) = self.pending.front_mut() else {
            return false;
        };

        *remaining -= 1;
        self.passed = self.passed.wrapping_add(1);
        self.word_count = self.word_count.wrapping_add(1);

        if *remaining != 0 {
            return false;
        }

        self.pending.pop_front();

        let length = self.passed;
        self.passed = 0;
        self.frame_count = self.frame_count.wrapping_add(1);
        self.last_frame_length = length;
        self.min_max = Some(match self.min_max {
            Some((min, max)) => (min.min(length), max.max(length)),
            None => (length, length),
        });

        true
    }

    fn strobes(&self) -> u32 {
        let s_tvalid = !self.pending.is_empty();
        let s_tready = !self.blocked() || self.credit != Credit::default();
        let m_tvalid = s_tvalid && s_tready;

        [
            (strobes::S_TVALID, s_tvalid),
            (strobes::S_TREADY, s_tready),
            (strobes::M_TVALID, m_tvalid),
            (strobes::M_TREADY, true),
        ]
        .into_iter()
        .fold(0, |acc, (field, set)| if set { acc | field.mask() } else { acc })
    }

    fn read(&self, offset: u32, revision: Revision) -> Option<u32> {
        let (min, max) = self.min_max.unwrap_or((0, 0));

        let value = match offset {
            cfg::OFFSET => self.cfg,
            frame_count::OFFSET => self.frame_count as u32,
            last_frame_length::OFFSET => self.last_frame_length as u32,
            min_max_frame_length::OFFSET => {
                ((max as u32) << min_max_frame_length::MAX_FRAME_LENGTH.offset) | min as u32
            }
            word_count::OFFSET if revision.has_word_count() => self.word_count as u32,
            strobes::OFFSET if revision.has_strobes() => self.strobes(),
            _ => return None,
        };

        Some(value)
    }
}

/// A simulated register bus.
///
/// ```
/// use dvbs2_regmap::{Bus, Revision, Stage, sim::SimBus};
///
/// let mut bus = SimBus::new(Revision::R336);
/// bus.push_frame(Stage::BchEncoder, 3);
///
/// // an unblocked probe lets the frame straight through
/// assert_eq!(bus.read32(0xf04), Ok(1));
/// assert_eq!(bus.read32(0xf10), Ok(3));
/// ```
#[derive(Debug, Clone)]
pub struct SimBus {
    revision: Option<Revision>,
    base_addr: u32,
    registers: IndexMap<u32, Slot>,
    stages: IndexMap<Stage, StageSim>,
    constellation_ram: IndexMap<u32, u32>,
    faults: IndexSet<u32>,
    writes: Vec<(u32, u32)>,
}

impl SimBus {
    /// The encoder of `revision`, mapped at address zero.
    pub fn new(revision: Revision) -> Self {
        let mut sim = Self::from_model(&maps::encoder(revision));
        sim.revision = Some(revision);

        for stage in revision.stages() {
            if let Some(base) = stage.base(revision) {
                let cfg_mask = maps::probe(*stage, revision)
                    .and_then(|block| block.register("cfg").map(Register::mask))
                    .unwrap_or(0);

                sim.stages.insert(
                    *stage,
                    StageSim {
                        base,
                        cfg_mask,
                        ..Default::default()
                    },
                );
            }
        }

        sim
    }

    /// The TX wrapper, mapped at address zero.
    pub fn wrapper() -> Self {
        Self::from_model(&maps::wrapper())
    }

    /// A plain register file for `model`, without any probe behavior.
    pub fn from_model(model: &Model) -> Self {
        let mut registers = IndexMap::new();

        for (block, register) in model.registers() {
            for index in 0..register.len() {
                registers.insert(
                    block.base_addr + register.offset + index * WORD_BYTES,
                    Slot {
                        value: register.reset(),
                        access: register.access(),
                    },
                );
            }
        }

        Self {
            revision: None,
            base_addr: 0,
            registers,
            stages: IndexMap::new(),
            constellation_ram: IndexMap::new(),
            faults: IndexSet::new(),
            writes: Vec::new(),
        }
    }

    /// Respond at `base_addr` instead of zero.
    pub fn base_addr(mut self, base_addr: u32) -> Self {
        self.base_addr = base_addr;

        self
    }

    /// Make every access to the absolute `address` fail.
    pub fn fail_at(&mut self, address: u32) {
        self.faults.insert(address);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Every write that reached the bus as `(address, value)`, oldest first.
    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Queue a frame of `length` words at the input of the probe of `stage`.
    ///
    /// Frames of zero words and stages the revision does not instrument are ignored.
    pub fn push_frame(&mut self, stage: Stage, length: u16) {
        if length == 0 {
            return;
        }

        if let Some(sim) = self.stages.get_mut(&stage) {
            sim.pending.push_back(length);
            sim.advance();
        }
    }

    /// Words queued at the probe of `stage` that have not passed yet.
    pub fn pending_words(&self, stage: Stage) -> u32 {
        self.stages
            .get(&stage)
            .map(|sim| sim.pending.iter().map(|words| *words as u32).sum())
            .unwrap_or(0)
    }

    /// Set a register as hardware would, bypassing access rules and the write log.
    ///
    /// Probe registers follow the stage model and are refused; use
    /// [`push_frame`](Self::push_frame) to move them.
    pub fn poke(&mut self, address: u32, value: u32) -> Result<(), SimError> {
        let offset = address.wrapping_sub(self.base_addr);

        if self.stage_at(offset).is_some() {
            return Err(SimError::Simulated(address));
        }

        self.registers
            .get_mut(&offset)
            .map(|slot| slot.value = value)
            .ok_or(SimError::Unmapped(address))
    }

    /// One entry of the constellation mapper RAM.
    pub fn constellation_entry(&self, address: u32) -> u32 {
        self.constellation_ram.get(&address).copied().unwrap_or(0)
    }

    fn stage_at(&self, offset: u32) -> Option<Stage> {
        let stride = self.revision?.probe_stride();

        self.stages
            .iter()
            .find(|(_, sim)| (sim.base..sim.base + stride).contains(&offset))
            .map(|(stage, _)| *stage)
    }

    fn has_constellation_port(&self) -> bool {
        self.revision
            .is_some_and(|revision| revision.has_constellation_port())
    }

    fn check(&self, address: u32) -> Result<u32, SimError> {
        if self.faults.contains(&address) {
            return Err(SimError::Fault(address));
        }

        let offset = address.wrapping_sub(self.base_addr);

        if !offset.is_multiple_of(WORD_BYTES) || !self.registers.contains_key(&offset) {
            return Err(SimError::Unmapped(address));
        }

        Ok(offset)
    }
}

impl Bus for SimBus {
    type Error = SimError;

    fn read32(&mut self, address: u32) -> Result<u32, Self::Error> {
        let offset = self.check(address)?;

        if let (Some(stage), Some(revision)) = (self.stage_at(offset), self.revision) {
            let sim = &self.stages[&stage];

            return sim
                .read(offset - sim.base, revision)
                .ok_or(SimError::Unmapped(address));
        }

        if self.has_constellation_port() && offset == constellation_mapper_read_data::OFFSET {
            let selected = self.registers[&constellation_mapper_address::OFFSET].value;

            return Ok(self.constellation_entry(selected));
        }

        let slot = self.registers[&offset];

        Ok(if slot.access.is_read() { slot.value } else { 0 })
    }

    fn write32(&mut self, address: u32, value: u32) -> Result<(), Self::Error> {
        let offset = self.check(address)?;
        self.writes.push((address, value));

        if let Some(stage) = self.stage_at(offset) {
            if let Some(sim) = self.stages.get_mut(&stage)
                && offset == sim.base + cfg::OFFSET
            {
                sim.write_cfg(value);
            }

            return Ok(());
        }

        if self.has_constellation_port() && offset == constellation_mapper_write_data::OFFSET {
            let selected = self.registers[&constellation_mapper_address::OFFSET].value;
            self.constellation_ram.insert(selected, value);

            return Ok(());
        }

        if let Some(slot) = self.registers.get_mut(&offset)
            && slot.access.is_write()
        {
            slot.value = value;
        }

        Ok(())
    }
}
