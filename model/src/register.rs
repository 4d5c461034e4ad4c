use std::ops::Range;

use colored::Colorize;
use indexmap::IndexMap;
use inflector::Inflector as _;

use crate::{
    diagnostic::{Context, Diagnostic, Diagnostics},
    error::Error,
    field::{Access, Field},
};

/// Width of one register element in bytes.
pub const WORD_BYTES: u32 = 4;

/// A 32-bit register, or a linear array of same-shaped registers when a depth is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub ident: String,
    /// Byte offset relative to the parent block.
    pub offset: u32,
    pub depth: Option<u32>,
    pub fields: Vec<Field>,
    pub docs: Vec<String>,
}

impl Register {
    pub fn new(
        ident: impl AsRef<str>,
        offset: u32,
        fields: impl IntoIterator<Item = Field>,
    ) -> Self {
        Self {
            ident: ident.as_ref().to_lowercase(),
            offset,
            depth: None,
            fields: fields.into_iter().collect(),
            docs: Vec::new(),
        }
    }

    /// Turn the register into a memory of `depth` elements with a stride of one word.
    pub fn memory(mut self, depth: u32) -> Self {
        self.depth = Some(depth);

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

    pub fn is_memory(&self) -> bool {
        self.depth.is_some()
    }

    /// Number of elements, one for a plain register.
    pub fn len(&self) -> u32 {
        self.depth.unwrap_or(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the register in bytes.
    pub fn span(&self) -> u32 {
        self.len().saturating_mul(WORD_BYTES)
    }

    /// The byte range of the parent block the register occupies.
    pub fn domain(&self) -> Range<u32> {
        self.offset..self.offset.saturating_add(self.span())
    }

    /// Byte offset of element `index`, relative to the parent block.
    pub fn element_offset(&self, index: u32) -> Result<u32, Error> {
        if index >= self.len() {
            return Err(Error::OutOfBounds {
                memory: self.ident.clone(),
                index,
                depth: self.len(),
            });
        }

        Ok(self.offset + index * WORD_BYTES)
    }

    /// The register value after a hardware reset.
    pub fn reset(&self) -> u32 {
        self.fields
            .iter()
            .fold(0, |acc, field| acc | field.placed_reset())
    }

    /// The union of all field masks.
    pub fn mask(&self) -> u32 {
        self.fields.iter().fold(0, |acc, field| acc | field.mask())
    }

    /// The access of the register as a whole, the most permissive of its fields.
    pub fn access(&self) -> Access {
        let read = self.fields.iter().any(|field| field.access.is_read());
        let write = self.fields.iter().any(|field| field.access.is_write());

        match (read, write) {
            (true, false) => Access::Read,
            (false, true) => Access::Write,
            _ => Access::ReadWrite,
        }
    }

    pub fn field(&self, ident: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.ident.eq_ignore_ascii_case(ident))
    }

    pub fn try_field(&self, ident: &str) -> Result<&Field, Error> {
        self.field(ident).ok_or_else(|| Error::UnknownField {
            register: self.ident.clone(),
            field: ident.to_string(),
        })
    }

    pub fn symbol(&self) -> String {
        self.ident.to_screaming_snake_case()
    }

    /// Split a raw value into every named field.
    pub fn decode(&self, raw: u32) -> IndexMap<&'static str, u32> {
        self.fields
            .iter()
            .map(|field| (field.ident, field.extract(raw)))
            .collect()
    }

    /// Insert several named fields into `raw`.
    ///
    /// Every name and value is checked before the result is produced, so either all
    /// fields are applied or none are.
    pub fn encode<'a>(
        &self,
        raw: u32,
        values: impl IntoIterator<Item = (&'a str, u32)>,
    ) -> Result<u32, Error> {
        values.into_iter().try_fold(raw, |acc, (ident, value)| {
            self.try_field(ident)?.insert(acc, value)
        })
    }

    pub fn validate(&self, base_addr: u32, context: &Context) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let new_context = context.clone().and(self.ident.clone());

        if !self.offset.is_multiple_of(WORD_BYTES) {
            diagnostics.insert(
                Diagnostic::address_unaligned(
                    base_addr.wrapping_add(self.offset),
                    new_context.clone(),
                )
                .notes([format!(
                    "register offset is specified as {}",
                    format!("0x{:x}", self.offset).bold()
                )]),
            );
        }

        if self.depth == Some(0) {
            diagnostics.insert(Diagnostic::empty_domain(&self.ident, new_context.clone()));
        }

        let mut sorted_fields = self.fields.iter().collect::<Vec<_>>();
        sorted_fields.sort_by(|lhs, rhs| lhs.offset.cmp(&rhs.offset));

        // empty fields occupy no bits and are reported on their own
        let occupied = sorted_fields
            .iter()
            .filter(|field| !field.domain().is_empty())
            .collect::<Vec<_>>();

        for (i, field) in occupied.iter().enumerate() {
            let remaining = &occupied[i + 1..];

            for other in remaining {
                if field.domain().end <= other.offset {
                    break;
                }

                if field.ident == other.ident {
                    diagnostics.insert(Diagnostic::duplicate_ident(
                        &field.ident,
                        new_context.clone(),
                    ));
                    continue;
                }

                diagnostics.insert(Diagnostic::overlap(
                    &field.ident,
                    &other.ident,
                    &format!(
                        "{}...{}",
                        field.domain().start.max(other.domain().start),
                        field.domain().end.min(other.domain().end) - 1,
                    ),
                    new_context.clone(),
                ));
            }
        }

        for field in sorted_fields {
            diagnostics.extend(field.validate(&new_context));
        }

        diagnostics
    }
}
