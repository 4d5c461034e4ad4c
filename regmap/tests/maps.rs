use dvbs2_regmap::{
    Revision, Stage, maps,
    model::{Model, field::Access},
};

/// Absolute address, mask and reset of `register.field` in `model`.
fn lookup(model: &Model, register: &str, field: &str) -> (u32, u32, u32) {
    let (block, register) = model.find(register).unwrap();
    let field = register.field(field).unwrap();

    (
        Model::address_of(model.base_addr, block, register),
        field.mask(),
        field.reset_value(),
    )
}

#[test]
fn built_in_maps_are_valid() {
    for model in maps::all() {
        let diagnostics = model.validate();

        assert!(
            diagnostics.is_empty(),
            "{} revision {}:\n{}",
            model.ident,
            model.revision,
            dvbs2_regmap::model::diagnostic::Diagnostic::report(&diagnostics)
        );
    }
}

#[test]
fn range_bytes() {
    assert_eq!(maps::encoder(Revision::R144).range_bytes(), 3132);
    assert_eq!(maps::encoder(Revision::R336).range_bytes(), 4888);
    assert_eq!(maps::wrapper().range_bytes(), 0xbcc);
}

#[test]
fn revision_336_core() {
    let model = maps::encoder(Revision::R336);

    assert_eq!(model.revision, 336);
    assert_eq!(
        lookup(&model, "config", "physical_layer_scrambler_shift_reg_init"),
        (0x0, 0x0003_ffff, 1)
    );
    assert_eq!(
        lookup(&model, "config", "force_output_ready"),
        (0x0, 0x0020_0000, 0)
    );
    assert_eq!(
        lookup(&model, "ldpc_fifo_status", "arbiter_selected"),
        (0x4, 0x0030_0000, 0)
    );
    assert_eq!(
        lookup(&model, "frames_in_transit", "value"),
        (0x8, 0x0000_00ff, 0)
    );
    assert_eq!(
        lookup(&model, "constellation_mapper_read_data", "value"),
        (0x14, 0xffff_ffff, 0)
    );
    assert!(model.find("bit_mapper_ram").is_none());
}

#[test]
fn revision_144_core() {
    let model = maps::encoder(Revision::R144);

    assert_eq!(
        lookup(&model, "config", "enable_dummy_frames"),
        (0x0, 0x0004_0000, 0)
    );
    assert!(
        model
            .find("config")
            .unwrap()
            .1
            .field("swap_input_data_byte_endianness")
            .is_none()
    );
    assert!(
        model
            .find("ldpc_fifo_status")
            .unwrap()
            .1
            .field("arbiter_selected")
            .is_none()
    );

    let (_, ram) = model.find("BIT_MAPPER_RAM").unwrap();
    assert_eq!((ram.offset, ram.depth), (0xc, Some(240)));

    let (_, coefficients) = model.find("polyphase_filter_coefficients").unwrap();
    assert_eq!((coefficients.offset, coefficients.depth), (0x3cc, Some(512)));
    assert!(model.find("constellation_mapper_address").is_none());
}

#[test]
fn probe_addresses_every_stage() {
    for revision in Revision::ALL {
        let model = maps::encoder(revision);

        for stage in revision.stages() {
            let base = stage.base(revision).unwrap();
            let prefix = stage.block_ident();

            assert_eq!(
                lookup(&model, &format!("{prefix}_cfg"), "allow_frame"),
                (base, 0x4, 0)
            );
            assert_eq!(
                lookup(&model, &format!("{prefix}_frame_count"), "value").0,
                base + 0x4
            );
            assert_eq!(
                lookup(&model, &format!("{prefix}_min_max_frame_length"), "max_frame_length"),
                (base + 0xc, 0xffff_0000, 0)
            );

            let word_count = model.find(&format!("{prefix}_word_count"));
            let reset_min_max = model
                .find(&format!("{prefix}_cfg"))
                .unwrap()
                .1
                .field("reset_min_max");

            match revision {
                Revision::R144 => {
                    assert!(word_count.is_none());
                    assert_eq!(reset_min_max.map(|field| field.mask()), Some(0x8));
                }
                Revision::R336 => {
                    assert!(word_count.is_some());
                    assert!(reset_min_max.is_none());
                    assert_eq!(
                        lookup(&model, &format!("{prefix}_strobes"), "m_tready"),
                        (base + 0x14, 0x8, 0)
                    );
                }
            }
        }
    }
}

#[test]
fn header_spot_checks() {
    let r336 = maps::encoder(Revision::R336);
    let r144 = maps::encoder(Revision::R144);

    // AXI_DEBUG_BCH_ENCODER_WORD_COUNT_OFFSET
    assert_eq!(
        lookup(&r336, "AXI_DEBUG_BCH_ENCODER_WORD_COUNT", "value").0,
        0xf10
    );
    // AXI_DEBUG_PLFRAME_STROBES_OFFSET
    assert_eq!(lookup(&r336, "axi_debug_plframe_strobes", "s_tvalid").0, 0x1314);
    // AXI_DEBUG_OUTPUT_MIN_MAX_FRAME_LENGTH_OFFSET
    assert_eq!(
        lookup(&r144, "axi_debug_output_min_max_frame_length", "min_frame_length").0,
        0xc38
    );
    assert_eq!(Stage::ConstellationMapper.base(Revision::R336), Some(0x1200));
}

#[test]
fn wrapper_layout() {
    let model = maps::wrapper();

    assert_eq!(model.revision, 41);
    assert_eq!(
        lookup(&model, "config", "enable_dummy_frames"),
        (0x0, 0x1, 0)
    );
    assert_eq!(
        lookup(&model, "ldpc_fifo_status", "ldpc_fifo_full"),
        (0x4, 0x0002_0000, 0)
    );
    assert!(model.blocks.iter().all(|block| !block.ident.starts_with("axi_debug")));
}

#[test]
fn access_assignment() {
    let model = maps::encoder(Revision::R336);
    let access = |name: &str| model.find(name).unwrap().1.access();

    assert_eq!(access("config"), Access::ReadWrite);
    assert_eq!(access("ldpc_fifo_status"), Access::Read);
    assert_eq!(access("constellation_mapper_write_data"), Access::Write);
    assert_eq!(access("axi_debug_plframe_cfg"), Access::ReadWrite);
    assert_eq!(access("axi_debug_plframe_strobes"), Access::Read);
}
