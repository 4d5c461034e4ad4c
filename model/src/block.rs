use std::ops::Range;

use colored::Colorize;

use crate::{
    diagnostic::{Context, Diagnostic, Diagnostics},
    register::{Register, WORD_BYTES},
};

/// A named group of registers at one base address.
///
/// Register symbols of a prefixed block carry the block name
/// (`axi_debug_bch_encoder` + `cfg` = `axi_debug_bch_encoder_cfg`), those of an
/// unprefixed block are the bare register names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub ident: String,
    /// Byte offset relative to the device base address.
    pub base_addr: u32,
    pub prefixed: bool,
    pub registers: Vec<Register>,
    pub docs: Vec<String>,
}

impl Block {
    pub fn new(
        ident: impl AsRef<str>,
        base_addr: u32,
        registers: impl IntoIterator<Item = Register>,
    ) -> Self {
        Self {
            ident: ident.as_ref().to_lowercase(),
            base_addr,
            prefixed: true,
            registers: registers.into_iter().collect(),
            docs: Vec::new(),
        }
    }

    pub fn unprefixed(mut self) -> Self {
        self.prefixed = false;

        self
    }

    pub fn docs<I>(mut self, docs: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.docs
            .extend(docs.into_iter().map(|doc| doc.as_ref().to_string()));

        self
    }

    pub fn add_register(&mut self, register: Register) {
        self.registers.push(register);
    }

    /// The full, lower case name of `register` within this block.
    pub fn register_name(&self, register: &Register) -> String {
        if self.prefixed {
            format!("{}_{}", self.ident, register.ident)
        } else {
            register.ident.clone()
        }
    }

    pub fn register(&self, ident: &str) -> Option<&Register> {
        self.registers
            .iter()
            .find(|register| register.ident.eq_ignore_ascii_case(ident))
    }

    /// The device-relative byte range spanned by the registers of the block.
    pub fn range(&self) -> Range<u32> {
        let start = self
            .registers
            .iter()
            .map(|register| register.offset)
            .min()
            .unwrap_or(0);
        let end = self
            .registers
            .iter()
            .map(|register| register.domain().end)
            .max()
            .unwrap_or(0);

        self.base_addr.saturating_add(start)..self.base_addr.saturating_add(end)
    }

    pub fn field_count(&self) -> usize {
        self.registers
            .iter()
            .map(|register| register.fields.len())
            .sum()
    }

    pub fn validate(&self, context: &Context) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let new_context = context.clone().and(self.ident.clone());

        if !self.base_addr.is_multiple_of(WORD_BYTES) {
            diagnostics.insert(
                Diagnostic::address_unaligned(self.base_addr, new_context.clone()).notes([
                    format!(
                        "block base address is specified as {}",
                        format!("0x{:x}", self.base_addr).bold()
                    ),
                ]),
            );
        }

        let mut sorted_registers = self.registers.iter().collect::<Vec<_>>();
        sorted_registers.sort_by(|lhs, rhs| lhs.offset.cmp(&rhs.offset));

        let occupied = sorted_registers
            .iter()
            .filter(|register| !register.domain().is_empty())
            .collect::<Vec<_>>();

        for (i, register) in occupied.iter().enumerate() {
            let remaining = &occupied[i + 1..];

            for other in remaining {
                if register.domain().end <= other.offset {
                    break;
                }

                let start = register.domain().start.max(other.domain().start);
                let end = register.domain().end.min(other.domain().end);

                diagnostics.insert(Diagnostic::overlap(
                    &register.ident,
                    &other.ident,
                    &format!(
                        "0x{:x}...0x{:x}",
                        self.base_addr.saturating_add(start),
                        self.base_addr.saturating_add(end.saturating_sub(1)),
                    ),
                    new_context.clone(),
                ));
            }
        }

        for register in sorted_registers {
            diagnostics.extend(register.validate(self.base_addr, &new_context));
        }

        diagnostics
    }
}
