use dvbs2_regmap::{
    Error, Probe, ProbeState, Revision, Stage, Strobes,
    maps::probe::cfg,
    sim::{SimBus, SimError},
};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn attach(bus: &mut SimBus, stage: Stage, revision: Revision) -> Probe<&mut SimBus> {
    Probe::new(bus, stage, revision, 0).unwrap()
}

/// Stepping a flowing probe is refused without touching the bus.
#[test]
fn step_while_flowing_is_invalid() {
    for revision in Revision::ALL {
        let mut bus = SimBus::new(revision);

        {
            let mut probe = attach(&mut bus, Stage::BchEncoder, revision);

            assert!(matches!(
                probe.step_word(),
                Err(Error::InvalidState { .. })
            ));
            assert!(matches!(
                probe.step_frame(),
                Err(Error::InvalidState { .. })
            ));
        }

        assert!(bus.writes().is_empty());
    }
}

/// Blocking twice leaves the same state as blocking once.
#[test]
fn block_is_idempotent() {
    let mut bus = SimBus::new(Revision::R336);
    let mut probe = attach(&mut bus, Stage::LdpcEncoder, Revision::R336);

    probe.block(true).unwrap();
    let once = probe.read_status().unwrap();
    probe.block(true).unwrap();
    let twice = probe.read_status().unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.state, ProbeState::Blocked);

    probe.block(false).unwrap();
    assert_eq!(probe.state().unwrap(), ProbeState::Flowing);
}

#[test]
fn step_word_is_a_single_pulse() {
    let mut bus = SimBus::new(Revision::R336);
    let base = Stage::BbScrambler.base(Revision::R336).unwrap();

    {
        let mut probe = attach(&mut bus, Stage::BbScrambler, Revision::R336);
        probe.block(true).unwrap();
    }
    bus.clear_writes();

    attach(&mut bus, Stage::BbScrambler, Revision::R336)
        .step_word()
        .unwrap();

    let blocked = cfg::BLOCK_DATA.mask();
    assert_eq!(
        bus.writes(),
        &[(base, blocked | cfg::ALLOW_WORD.mask()), (base, blocked)]
    );
}

/// A blocked probe holds the stream and releases it one word or frame at a time.
#[test]
fn stepping_moves_data() {
    let mut bus = SimBus::new(Revision::R336);

    attach(&mut bus, Stage::BitInterleaver, Revision::R336)
        .block(true)
        .unwrap();

    bus.push_frame(Stage::BitInterleaver, 4);
    bus.push_frame(Stage::BitInterleaver, 6);
    assert_eq!(bus.pending_words(Stage::BitInterleaver), 10);

    let mut probe = attach(&mut bus, Stage::BitInterleaver, Revision::R336);

    assert_eq!(probe.word_count().unwrap(), 0);
    assert_eq!(
        probe.strobes().unwrap(),
        Strobes {
            s_tvalid: true,
            s_tready: false,
            m_tvalid: false,
            m_tready: true,
        }
    );

    probe.step_word().unwrap();
    assert_eq!(probe.word_count().unwrap(), 1);
    assert_eq!(probe.frame_count().unwrap(), 0);

    // the rest of the first frame
    probe.step_frame().unwrap();
    assert_eq!(probe.word_count().unwrap(), 4);
    assert_eq!(probe.frame_count().unwrap(), 1);
    assert_eq!(probe.last_frame_length().unwrap(), 4);

    probe.step_frame().unwrap();
    assert_eq!(probe.word_count().unwrap(), 10);
    assert_eq!(probe.frame_count().unwrap(), 2);
    assert_eq!(probe.min_max_frame_length().unwrap(), (4, 6));

    drop(probe);
    assert_eq!(bus.pending_words(Stage::BitInterleaver), 0);
}

/// Resetting the tracker leaves the counters alone, and the next frame re-seeds min and max.
#[test]
fn reset_counters_reseeds_min_max() {
    let mut bus = SimBus::new(Revision::R144);

    bus.push_frame(Stage::Plframe, 10);
    bus.push_frame(Stage::Plframe, 30);

    let mut probe = attach(&mut bus, Stage::Plframe, Revision::R144);
    assert_eq!(probe.min_max_frame_length().unwrap(), (10, 30));
    assert_eq!(probe.frame_count().unwrap(), 2);

    probe.reset_counters().unwrap();
    assert_eq!(probe.frame_count().unwrap(), 2);
    assert_eq!(probe.last_frame_length().unwrap(), 30);
    assert_eq!(probe.min_max_frame_length().unwrap(), (0, 0));
    drop(probe);

    bus.push_frame(Stage::Plframe, 20);

    let mut probe = attach(&mut bus, Stage::Plframe, Revision::R144);
    assert_eq!(probe.min_max_frame_length().unwrap(), (20, 20));
    assert_eq!(probe.frame_count().unwrap(), 3);
}

#[test]
fn reset_counters_unsupported_without_control_bit() {
    let mut bus = SimBus::new(Revision::R336);

    assert!(matches!(
        attach(&mut bus, Stage::BchEncoder, Revision::R336).reset_counters(),
        Err(Error::Unsupported { revision: 336, .. })
    ));
    assert!(bus.writes().is_empty());
}

#[test]
fn status_optional_registers() {
    let mut bus = SimBus::new(Revision::R144);
    let status = attach(&mut bus, Stage::Output, Revision::R144)
        .read_status()
        .unwrap();

    assert_eq!(status.word_count, None);
    assert_eq!(status.strobes, None);
    assert_eq!(status.state, ProbeState::Flowing);

    let mut bus = SimBus::new(Revision::R336);
    let status = attach(&mut bus, Stage::Plframe, Revision::R336)
        .read_status()
        .unwrap();

    assert_eq!(status.word_count, Some(0));
    assert!(status.strobes.is_some());
}

#[test]
fn counters_wrap_at_16_bits() {
    let mut bus = SimBus::new(Revision::R336);

    bus.push_frame(Stage::InputWidthConverter, u16::MAX);
    bus.push_frame(Stage::InputWidthConverter, 2);

    let mut probe = attach(&mut bus, Stage::InputWidthConverter, Revision::R336);
    assert_eq!(probe.word_count().unwrap(), 1);
    assert_eq!(probe.min_max_frame_length().unwrap(), (2, u16::MAX));
}

#[test]
fn absent_stage_is_unsupported() {
    let mut bus = SimBus::new(Revision::R336);

    assert!(matches!(
        Probe::new(&mut bus, Stage::Output, Revision::R336, 0),
        Err(Error::Unsupported { .. })
    ));
}

/// Bus failures are handed back untouched.
#[test]
fn bus_errors_pass_through() {
    let mut bus = SimBus::new(Revision::R336);
    let base = Stage::BchEncoder.base(Revision::R336).unwrap();
    bus.fail_at(base);

    assert_eq!(
        attach(&mut bus, Stage::BchEncoder, Revision::R336).block(true),
        Err(Error::Bus(SimError::Fault(base)))
    );
}

/// Property: a flowing probe counts every frame and tracks the extreme lengths.
#[quickcheck]
fn prop_flowing_probe_tracks_frames(lengths: Vec<u16>) -> TestResult {
    let lengths = lengths
        .into_iter()
        .filter(|length| *length != 0)
        .map(|length| length % 512 + 1)
        .collect::<Vec<_>>();

    if lengths.is_empty() {
        return TestResult::discard();
    }

    let mut bus = SimBus::new(Revision::R336);
    for length in &lengths {
        bus.push_frame(Stage::LdpcEncoder, *length);
    }

    let status = attach(&mut bus, Stage::LdpcEncoder, Revision::R336)
        .read_status()
        .unwrap();

    let words = lengths.iter().map(|length| *length as u32).sum::<u32>();
    let min = lengths.iter().copied().min().unwrap();
    let max = lengths.iter().copied().max().unwrap();

    TestResult::from_bool(
        status.frame_count as usize == lengths.len()
            && status.word_count == Some(words as u16)
            && status.last_frame_length == *lengths.last().unwrap()
            && (status.min_frame_length, status.max_frame_length) == (min, max),
    )
}
