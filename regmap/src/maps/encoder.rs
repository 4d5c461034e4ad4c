//! The `dvbs2_encoder` register map.

use model::{Block, Model, Register};

use crate::{maps::probe::probe, revision::Revision};

pub const IDENT: &str = "dvbs2_encoder";
pub const DEFAULT_BASE_ADDR: u32 = 0x0000_0000;

pub mod config {
    use model::Field;

    pub const OFFSET: u32 = 0x0;

    pub const PHYSICAL_LAYER_SCRAMBLER_SHIFT_REG_INIT: Field =
        Field::new("physical_layer_scrambler_shift_reg_init", 0, 18).reset(1);
    pub const ENABLE_DUMMY_FRAMES: Field = Field::new("enable_dummy_frames", 18, 1);
    /// Revision 336 only.
    pub const SWAP_INPUT_DATA_BYTE_ENDIANNESS: Field =
        Field::new("swap_input_data_byte_endianness", 19, 1);
    /// Revision 336 only.
    pub const SWAP_OUTPUT_DATA_BYTE_ENDIANNESS: Field =
        Field::new("swap_output_data_byte_endianness", 20, 1);
    /// Revision 336 only.
    pub const FORCE_OUTPUT_READY: Field = Field::new("force_output_ready", 21, 1);
}

pub mod ldpc_fifo_status {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x4;

    pub const LDPC_FIFO_ENTRIES: Field = Field::new("ldpc_fifo_entries", 0, 14).access(Access::Read);
    pub const LDPC_FIFO_EMPTY: Field = Field::new("ldpc_fifo_empty", 16, 1).access(Access::Read);
    pub const LDPC_FIFO_FULL: Field = Field::new("ldpc_fifo_full", 17, 1).access(Access::Read);
    /// Revision 336 only.
    pub const ARBITER_SELECTED: Field = Field::new("arbiter_selected", 20, 2).access(Access::Read);
}

pub mod frames_in_transit {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x8;
    pub const VALUE: Field = Field::new("value", 0, 8).access(Access::Read);
}

/// Revision 144 only.
pub mod bit_mapper_ram {
    use model::Field;

    pub const OFFSET: u32 = 0xc;
    pub const DEPTH: u32 = 240;
    pub const DATA: Field = Field::new("data", 0, 32);
}

/// Revision 144 only.
pub mod polyphase_filter_coefficients {
    use model::Field;

    pub const OFFSET: u32 = 0x3cc;
    pub const DEPTH: u32 = 512;
    pub const VALUE: Field = Field::new("value", 0, 32);
}

/// Revision 336 only.
pub mod constellation_mapper_address {
    use model::Field;

    pub const OFFSET: u32 = 0xc;
    pub const VALUE: Field = Field::new("value", 0, 32);
}

/// Revision 336 only.
pub mod constellation_mapper_write_data {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x10;
    pub const VALUE: Field = Field::new("value", 0, 32).access(Access::Write);
}

/// Revision 336 only.
pub mod constellation_mapper_read_data {
    use model::{Field, field::Access};

    pub const OFFSET: u32 = 0x14;
    pub const VALUE: Field = Field::new("value", 0, 32).access(Access::Read);
}

pub(crate) fn ldpc_fifo_status(with_arbiter: bool) -> Register {
    let mut fields = vec![
        ldpc_fifo_status::LDPC_FIFO_ENTRIES,
        ldpc_fifo_status::LDPC_FIFO_EMPTY,
        ldpc_fifo_status::LDPC_FIFO_FULL,
    ];

    if with_arbiter {
        fields.push(ldpc_fifo_status::ARBITER_SELECTED);
    }

    Register::new("ldpc_fifo_status", ldpc_fifo_status::OFFSET, fields)
}

pub(crate) fn frames_in_transit() -> Register {
    Register::new(
        "frames_in_transit",
        frames_in_transit::OFFSET,
        [frames_in_transit::VALUE],
    )
    .docs(["Frames accepted at the input but not yet emitted."])
}

pub(crate) fn bit_mapper_ram() -> Register {
    Register::new(
        "bit_mapper_ram",
        bit_mapper_ram::OFFSET,
        [bit_mapper_ram::DATA],
    )
    .memory(bit_mapper_ram::DEPTH)
}

pub(crate) fn polyphase_filter_coefficients() -> Register {
    Register::new(
        "polyphase_filter_coefficients",
        polyphase_filter_coefficients::OFFSET,
        [polyphase_filter_coefficients::VALUE],
    )
    .memory(polyphase_filter_coefficients::DEPTH)
}

fn config(revision: Revision) -> Register {
    let fields = match revision {
        Revision::R144 => vec![
            config::PHYSICAL_LAYER_SCRAMBLER_SHIFT_REG_INIT,
            config::ENABLE_DUMMY_FRAMES,
        ],
        Revision::R336 => vec![
            config::PHYSICAL_LAYER_SCRAMBLER_SHIFT_REG_INIT,
            config::ENABLE_DUMMY_FRAMES,
            config::SWAP_INPUT_DATA_BYTE_ENDIANNESS,
            config::SWAP_OUTPUT_DATA_BYTE_ENDIANNESS,
            config::FORCE_OUTPUT_READY,
        ],
    };

    Register::new("config", config::OFFSET, fields)
}

fn core(revision: Revision) -> Block {
    let mut core = Block::new(
        "core",
        0,
        [
            config(revision),
            ldpc_fifo_status(revision == Revision::R336),
            frames_in_transit(),
        ],
    )
    .unprefixed();

    match revision {
        Revision::R144 => {
            core.add_register(bit_mapper_ram());
            core.add_register(polyphase_filter_coefficients());
        }
        Revision::R336 => {
            core.add_register(Register::new(
                "constellation_mapper_address",
                constellation_mapper_address::OFFSET,
                [constellation_mapper_address::VALUE],
            ));
            core.add_register(Register::new(
                "constellation_mapper_write_data",
                constellation_mapper_write_data::OFFSET,
                [constellation_mapper_write_data::VALUE],
            ));
            core.add_register(Register::new(
                "constellation_mapper_read_data",
                constellation_mapper_read_data::OFFSET,
                [constellation_mapper_read_data::VALUE],
            ));
        }
    }

    core
}

/// The encoder register map of `revision`.
pub fn encoder(revision: Revision) -> Model {
    let mut model = Model::new(IDENT, revision.number()).base_addr(DEFAULT_BASE_ADDR);

    model.add_block(core(revision));

    for stage in revision.stages() {
        if let Some(block) = probe(*stage, revision) {
            model.add_block(block);
        }
    }

    model
}
