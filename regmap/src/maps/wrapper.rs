//! The `dvbs2_tx_wrapper_regmap` register map (revision 41).
//!
//! The wrapper shares the status registers and RAMs of encoder revision 144 but
//! moves `enable_dummy_frames` to bit 0 and carries no debug probes.

use model::{Block, Model, Register};

use crate::maps::encoder::{
    bit_mapper_ram, frames_in_transit, ldpc_fifo_status, polyphase_filter_coefficients,
};

pub const IDENT: &str = "dvbs2_tx_wrapper_regmap";
pub const REVISION: u32 = 41;
pub const DEFAULT_BASE_ADDR: u32 = 0x0000_0000;

pub mod config {
    use model::Field;

    pub const OFFSET: u32 = 0x0;
    pub const ENABLE_DUMMY_FRAMES: Field = Field::new("enable_dummy_frames", 0, 1);
}

pub fn wrapper() -> Model {
    Model::new(IDENT, REVISION)
        .base_addr(DEFAULT_BASE_ADDR)
        .with_blocks([Block::new(
            "core",
            0,
            [
                Register::new("config", config::OFFSET, [config::ENABLE_DUMMY_FRAMES]),
                ldpc_fifo_status(false),
                frames_in_transit(),
                bit_mapper_ram(),
                polyphase_filter_coefficients(),
            ],
        )
        .unprefixed()])
}
