use std::{fmt::Display, str::FromStr};

use crate::stage::Stage;

/// A generated revision of the encoder register map.
///
/// Revision 336 is the later design: it adds the `word_count` and `strobes`
/// probe registers and the indirect constellation mapper port, but drops the
/// `reset_min_max` control and the directly mapped RAMs of revision 144.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Revision {
    R144,
    R336,
}

impl Revision {
    pub const ALL: [Self; 2] = [Self::R144, Self::R336];

    pub const fn number(&self) -> u32 {
        match self {
            Self::R144 => 144,
            Self::R336 => 336,
        }
    }

    pub const fn has_reset_min_max(&self) -> bool {
        matches!(self, Self::R144)
    }

    pub const fn has_word_count(&self) -> bool {
        matches!(self, Self::R336)
    }

    pub const fn has_strobes(&self) -> bool {
        matches!(self, Self::R336)
    }

    pub const fn has_constellation_port(&self) -> bool {
        matches!(self, Self::R336)
    }

    /// Distance in bytes between consecutive probe blocks.
    pub const fn probe_stride(&self) -> u32 {
        match self {
            Self::R144 => 0x10,
            Self::R336 => 0x100,
        }
    }

    /// The instrumented stages, in pipeline order.
    pub fn stages(&self) -> &'static [Stage] {
        Stage::table(*self)
    }
}

impl TryFrom<u32> for Revision {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            144 => Ok(Self::R144),
            336 => Ok(Self::R336),
            other => Err(other),
        }
    }
}

/// The text is not a known revision number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRevisionError(pub String);

impl Display for ParseRevisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown revision \"{}\", expected 144 or 336", self.0)
    }
}

impl std::error::Error for ParseRevisionError {}

impl FromStr for Revision {
    type Err = ParseRevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(['r', 'R']);

        trimmed
            .parse::<u32>()
            .ok()
            .and_then(|number| Self::try_from(number).ok())
            .ok_or_else(|| ParseRevisionError(s.to_string()))
    }
}

impl Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}
