pub mod access;

use std::ops::Range;

use inflector::Inflector as _;

use crate::{
    diagnostic::{Context, Diagnostic, Diagnostics},
    error::Error,
};

pub use access::Access;

/// The widest field a 32-bit register can hold.
pub const REGISTER_WIDTH: u8 = 32;

/// A named bit range within a 32-bit register.
///
/// Descriptors are plain values and can be built in `const` context:
///
/// ```
/// use dvbs2_regmap_model::{Field, field::Access};
///
/// const ENABLE_DUMMY_FRAMES: Field = Field::new("enable_dummy_frames", 18, 1);
/// const ENTRIES: Field = Field::new("ldpc_fifo_entries", 0, 14).access(Access::Read);
///
/// assert_eq!(ENABLE_DUMMY_FRAMES.mask(), 0x0004_0000);
/// assert_eq!(ENTRIES.extract(0xdead_3fff), 0x3fff);
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Field {
    pub ident: &'static str,
    pub offset: u8,
    pub width: u8,
    pub reset: u32,
    pub access: Access,
}

impl Field {
    pub const fn new(ident: &'static str, offset: u8, width: u8) -> Self {
        Self {
            ident,
            offset,
            width,
            reset: 0,
            access: Access::ReadWrite,
        }
    }

    pub const fn reset(self, reset: u32) -> Self {
        Self { reset, ..self }
    }

    pub const fn access(self, access: Access) -> Self {
        Self { access, ..self }
    }

    /// The largest value the field can hold, `2^width - 1`.
    pub const fn limit(&self) -> u32 {
        match 1u64.checked_shl(self.width as u32) {
            Some(bound) if bound <= 1u64 << REGISTER_WIDTH => (bound - 1) as u32,
            _ => u32::MAX,
        }
    }

    /// The bits of the parent register the field occupies.
    pub const fn mask(&self) -> u32 {
        match (self.limit() as u64).checked_shl(self.offset as u32) {
            Some(mask) => mask as u32,
            None => 0,
        }
    }

    /// The domain of the parent register in which the field occupies.
    #[inline]
    pub fn domain(&self) -> Range<u8> {
        self.offset..self.offset.saturating_add(self.width)
    }

    /// Decode the field from a raw register value.
    ///
    /// The result is always within `0..=self.limit()`.
    pub fn extract(&self, raw: u32) -> u32 {
        (raw & self.mask())
            .checked_shr(self.offset as u32)
            .unwrap_or(0)
    }

    /// Decode a single-bit field as a flag.
    pub fn is_set(&self, raw: u32) -> bool {
        self.extract(raw) != 0
    }

    /// Encode `value` into `raw`, leaving every bit outside the field untouched.
    ///
    /// Values wider than the field are rejected, never truncated.
    pub fn insert(&self, raw: u32, value: u32) -> Result<u32, Error> {
        if value > self.limit() {
            return Err(Error::OutOfRange {
                field: self.ident,
                value,
                limit: self.limit(),
            });
        }

        let placed = value.checked_shl(self.offset as u32).unwrap_or(0) & self.mask();

        Ok((raw & !self.mask()) | placed)
    }

    /// The documented value of the field after a hardware reset.
    pub fn reset_value(&self) -> u32 {
        self.reset
    }

    /// The reset value shifted into position within the parent register.
    pub fn placed_reset(&self) -> u32 {
        self.reset.checked_shl(self.offset as u32).unwrap_or(0) & self.mask()
    }

    pub fn symbol(&self) -> String {
        self.ident.to_screaming_snake_case()
    }

    pub fn validate(&self, context: &Context) -> Diagnostics {
        let new_context = context.clone().and(self.ident.to_string());
        let mut diagnostics = Diagnostics::new();

        if self.width == 0 {
            diagnostics.insert(Diagnostic::empty_domain(&self.ident, new_context.clone()));
        }

        if self.domain().end > REGISTER_WIDTH {
            diagnostics.insert(Diagnostic::exceeds_domain(
                &self.ident,
                &format!("{}...{}", self.domain().start, self.domain().end - 1),
                &format!("0...{}", REGISTER_WIDTH - 1),
                new_context.clone(),
            ));
        }

        if self.width != 0 && self.reset > self.limit() {
            diagnostics.insert(Diagnostic::invalid_reset(
                &self.ident,
                self.reset,
                self.limit(),
                new_context.clone(),
            ));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY_FRAMES: Field = Field::new("enable_dummy_frames", 18, 1);
    const SHIFT_REG_INIT: Field = Field::new("physical_layer_scrambler_shift_reg_init", 0, 18).reset(1);
    const MAX_FRAME_LENGTH: Field = Field::new("max_frame_length", 16, 16).access(Access::Read);
    const DATA: Field = Field::new("data", 0, 32);

    #[test]
    fn masks_match_generated_headers() {
        assert_eq!(DUMMY_FRAMES.mask(), 0x0004_0000);
        assert_eq!(SHIFT_REG_INIT.mask(), 0x0003_ffff);
        assert_eq!(MAX_FRAME_LENGTH.mask(), 0xffff_0000);
        assert_eq!(DATA.mask(), 0xffff_ffff);
        assert_eq!(Field::new("arbiter_selected", 20, 2).mask(), 0x0030_0000);
    }

    #[test]
    fn insert_single_bit() {
        let raw = DUMMY_FRAMES.insert(0, 1).unwrap();

        assert_eq!(raw, 0x0004_0000);
        assert_eq!(DUMMY_FRAMES.extract(raw), 1);
        assert!(DUMMY_FRAMES.is_set(raw));
    }

    #[test]
    fn insert_preserves_neighbours() {
        let raw = MAX_FRAME_LENGTH.insert(0x1234_abcd, 0x00ff).unwrap();

        assert_eq!(raw, 0x00ff_abcd);
    }

    #[test]
    fn insert_rejects_wide_values() {
        assert_eq!(
            DUMMY_FRAMES.insert(0, 2),
            Err(Error::OutOfRange {
                field: "enable_dummy_frames",
                value: 2,
                limit: 1,
            })
        );
        assert!(SHIFT_REG_INIT.insert(0, 1 << 18).is_err());
    }

    #[test]
    fn full_width_field_accepts_everything() {
        assert_eq!(DATA.limit(), u32::MAX);
        assert_eq!(DATA.insert(0, u32::MAX), Ok(u32::MAX));
        assert_eq!(DATA.extract(0xcafe_f00d), 0xcafe_f00d);
    }

    #[test]
    fn reset_placement() {
        assert_eq!(SHIFT_REG_INIT.reset_value(), 1);
        assert_eq!(SHIFT_REG_INIT.placed_reset(), 1);
        assert_eq!(DUMMY_FRAMES.reset(1).placed_reset(), 0x0004_0000);
    }

    #[test]
    fn symbol_is_screaming_snake_case() {
        assert_eq!(MAX_FRAME_LENGTH.symbol(), "MAX_FRAME_LENGTH");
    }

    #[test]
    fn valid_fields_emit_nothing() {
        for field in [DUMMY_FRAMES, SHIFT_REG_INIT, MAX_FRAME_LENGTH, DATA] {
            assert!(field.validate(&Context::new()).is_empty());
        }
    }

    #[test]
    fn invalid_fields_are_diagnosed() {
        let context = Context::new();

        let zero = Field::new("zero", 0, 0).validate(&context);
        assert_eq!(zero.len(), 1);
        assert!(matches!(
            zero.first().unwrap().kind(),
            crate::diagnostic::Kind::EmptyDomain
        ));

        let wide = Field::new("wide", 24, 16).validate(&context);
        assert_eq!(wide.len(), 1);
        assert!(matches!(
            wide.first().unwrap().kind(),
            crate::diagnostic::Kind::ExceedsDomain
        ));

        let reset = Field::new("reset", 0, 2).reset(4).validate(&context);
        assert_eq!(reset.len(), 1);
        assert!(matches!(
            reset.first().unwrap().kind(),
            crate::diagnostic::Kind::InvalidReset
        ));
    }
}
