use derive_more::Display;

use crate::revision::Revision;

/// A pipeline stage instrumented with a debug probe.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Display)]
pub enum Stage {
    #[display("input_width_converter")]
    InputWidthConverter,
    #[display("bb_scrambler")]
    BbScrambler,
    #[display("bch_encoder")]
    BchEncoder,
    #[display("ldpc_encoder")]
    LdpcEncoder,
    #[display("bit_interleaver")]
    BitInterleaver,
    #[display("constellation_mapper")]
    ConstellationMapper,
    #[display("plframe")]
    Plframe,
    #[display("output")]
    Output,
}

impl Stage {
    const R144_STAGES: &[(Stage, u32)] = &[
        (Stage::InputWidthConverter, 0xbcc),
        (Stage::BbScrambler, 0xbdc),
        (Stage::BchEncoder, 0xbec),
        (Stage::LdpcEncoder, 0xbfc),
        (Stage::BitInterleaver, 0xc0c),
        (Stage::Plframe, 0xc1c),
        (Stage::Output, 0xc2c),
    ];

    const R336_STAGES: &[(Stage, u32)] = &[
        (Stage::InputWidthConverter, 0xd00),
        (Stage::BbScrambler, 0xe00),
        (Stage::BchEncoder, 0xf00),
        (Stage::LdpcEncoder, 0x1000),
        (Stage::BitInterleaver, 0x1100),
        (Stage::ConstellationMapper, 0x1200),
        (Stage::Plframe, 0x1300),
    ];

    const R144: &[Stage] = &[
        Stage::InputWidthConverter,
        Stage::BbScrambler,
        Stage::BchEncoder,
        Stage::LdpcEncoder,
        Stage::BitInterleaver,
        Stage::Plframe,
        Stage::Output,
    ];

    const R336: &[Stage] = &[
        Stage::InputWidthConverter,
        Stage::BbScrambler,
        Stage::BchEncoder,
        Stage::LdpcEncoder,
        Stage::BitInterleaver,
        Stage::ConstellationMapper,
        Stage::Plframe,
    ];

    fn bases(revision: Revision) -> &'static [(Stage, u32)] {
        match revision {
            Revision::R144 => Self::R144_STAGES,
            Revision::R336 => Self::R336_STAGES,
        }
    }

    pub(crate) fn table(revision: Revision) -> &'static [Stage] {
        match revision {
            Revision::R144 => Self::R144,
            Revision::R336 => Self::R336,
        }
    }

    pub fn ident(&self) -> String {
        self.to_string()
    }

    /// Name of the probe block, also the prefix of its register symbols.
    pub fn block_ident(&self) -> String {
        format!("axi_debug_{self}")
    }

    /// Offset of the probe block from the device base, if the revision instruments this stage.
    pub fn base(&self, revision: Revision) -> Option<u32> {
        Self::bases(revision)
            .iter()
            .find(|(stage, _)| stage == self)
            .map(|(_, base)| *base)
    }

    pub fn from_ident(ident: &str) -> Option<Self> {
        Self::R144
            .iter()
            .chain(Self::R336)
            .copied()
            .find(|stage| stage.ident().eq_ignore_ascii_case(ident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_agree() {
        for revision in Revision::ALL {
            assert_eq!(revision.stages().len(), Stage::bases(revision).len());

            for (stage, (listed, _)) in revision.stages().iter().zip(Stage::bases(revision)) {
                assert_eq!(stage, listed);
            }
        }
    }

    #[test]
    fn bases_are_evenly_strided() {
        for revision in Revision::ALL {
            for window in Stage::bases(revision).windows(2) {
                assert_eq!(window[1].1 - window[0].1, revision.probe_stride());
            }
        }
    }

    #[test]
    fn stage_presence() {
        assert_eq!(Stage::Output.base(Revision::R144), Some(0xc2c));
        assert_eq!(Stage::Output.base(Revision::R336), None);
        assert_eq!(Stage::ConstellationMapper.base(Revision::R144), None);
        assert_eq!(Stage::ConstellationMapper.base(Revision::R336), Some(0x1200));
        assert_eq!(Stage::Plframe.block_ident(), "axi_debug_plframe");
        assert_eq!(Stage::from_ident("BCH_ENCODER"), Some(Stage::BchEncoder));
    }
}
