//! The AXI-stream debug probe, one block per instrumented stage.
//!
//! Every instance shares this layout and differs only by base address. Revision 144
//! has `cfg.reset_min_max` but no `word_count`/`strobes`, revision 336 the reverse.

use model::{Block, Register};
use static_assertions::const_assert_eq;

use crate::{revision::Revision, stage::Stage};

pub mod cfg {
    use model::Field;

    pub const OFFSET: u32 = 0x0;

    /// Hold the stream: no word passes the probe while set.
    pub const BLOCK_DATA: Field = Field::new("block_data", 0, 1);
    /// Rising edge lets one word through a blocked probe.
    pub const ALLOW_WORD: Field = Field::new("allow_word", 1, 1);
    /// Rising edge lets the rest of one frame through a blocked probe.
    pub const ALLOW_FRAME: Field = Field::new("allow_frame", 2, 1);
    /// Rising edge clears the min/max frame length tracker. Revision 144 only.
    pub const RESET_MIN_MAX: Field = Field::new("reset_min_max", 3, 1);
}

pub mod frame_count {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x4;
    pub const VALUE: Field = Field::new("value", 0, 16).access(Access::Read);
}

pub mod last_frame_length {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x8;
    pub const VALUE: Field = Field::new("value", 0, 16).access(Access::Read);
}

pub mod min_max_frame_length {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0xc;
    pub const MIN_FRAME_LENGTH: Field = Field::new("min_frame_length", 0, 16).access(Access::Read);
    pub const MAX_FRAME_LENGTH: Field = Field::new("max_frame_length", 16, 16).access(Access::Read);
}

pub mod word_count {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x10;
    pub const VALUE: Field = Field::new("value", 0, 16).access(Access::Read);
}

pub mod strobes {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x14;
    pub const S_TVALID: Field = Field::new("s_tvalid", 0, 1).access(Access::Read);
    pub const S_TREADY: Field = Field::new("s_tready", 1, 1).access(Access::Read);
    pub const M_TVALID: Field = Field::new("m_tvalid", 2, 1).access(Access::Read);
    pub const M_TREADY: Field = Field::new("m_tready", 3, 1).access(Access::Read);
}

const_assert_eq!(
    cfg::BLOCK_DATA.mask() | cfg::ALLOW_WORD.mask() | cfg::ALLOW_FRAME.mask() | cfg::RESET_MIN_MAX.mask(),
    0xf
);
const_assert_eq!(
    min_max_frame_length::MIN_FRAME_LENGTH.mask() & min_max_frame_length::MAX_FRAME_LENGTH.mask(),
    0
);

fn cfg(revision: Revision) -> Register {
    let mut fields = vec![cfg::BLOCK_DATA, cfg::ALLOW_WORD, cfg::ALLOW_FRAME];

    if revision.has_reset_min_max() {
        fields.push(cfg::RESET_MIN_MAX);
    }

    Register::new("cfg", cfg::OFFSET, fields).docs(["Probe control."])
}

/// The probe block of `stage`, or [`None`] if `revision` does not instrument it.
pub fn probe(stage: Stage, revision: Revision) -> Option<Block> {
    let base_addr = stage.base(revision)?;

    let mut registers = vec![
        cfg(revision),
        Register::new("frame_count", frame_count::OFFSET, [frame_count::VALUE])
            .docs(["Completed frames, wraps at 16 bits."]),
        Register::new(
            "last_frame_length",
            last_frame_length::OFFSET,
            [last_frame_length::VALUE],
        )
        .docs(["Length in words of the most recently completed frame."]),
        Register::new(
            "min_max_frame_length",
            min_max_frame_length::OFFSET,
            [
                min_max_frame_length::MIN_FRAME_LENGTH,
                min_max_frame_length::MAX_FRAME_LENGTH,
            ],
        ),
    ];

    if revision.has_word_count() {
        registers.push(
            Register::new("word_count", word_count::OFFSET, [word_count::VALUE])
                .docs(["Words passed, wraps at 16 bits."]),
        );
    }

    if revision.has_strobes() {
        registers.push(Register::new(
            "strobes",
            strobes::OFFSET,
            [
                strobes::S_TVALID,
                strobes::S_TREADY,
                strobes::M_TVALID,
                strobes::M_TREADY,
            ],
        ));
    }

    Some(
        Block::new(stage.block_ident(), base_addr, registers)
            .docs([format!("Debug probe after the {stage} stage.")]),
    )
}
