//! Register map descriptors for the DVB-S2 encoder and its TX wrapper.
//!
//! A [`Model`] is an ordered set of [`Block`]s, each holding [`Register`]s made of
//! [`Field`]s. Descriptors are plain data: the bit-field codec on [`Field`] is the
//! only behavior, and [`validate`] checks a map for structural mistakes.

pub mod block;
pub mod diagnostic;
pub mod error;
pub mod field;
pub mod model;
pub mod register;

use colored::Colorize as _;

pub use block::Block;
pub use error::Error;
pub use field::Field;
pub use model::Model;
pub use register::Register;

use crate::diagnostic::Diagnostic;

/// Validate a register map is properly defined, printing a report.
///
/// Returns the number of errors found.
pub fn validate(model: &Model) -> usize {
    println!(
        "Validating {} (revision {})...",
        model.ident.bold(),
        model.revision
    );
    let diagnostics = model.validate();

    if !diagnostics.is_empty() {
        println!("{}", Diagnostic::report(&diagnostics));
    }

    let warning_count = diagnostics
        .iter()
        .filter(|diagnostic| matches!(diagnostic.rank(), diagnostic::Rank::Warning))
        .count();

    let error_count = diagnostics
        .iter()
        .filter(|diagnostic| matches!(diagnostic.rank(), diagnostic::Rank::Error))
        .count();

    log::debug!(
        "{}: {warning_count} warnings, {error_count} errors",
        model.ident
    );

    if error_count == 0 {
        print!("{}. ", "Finished".green().bold());
    }
    println!("emitted {warning_count} warnings and {error_count} errors");

    if error_count == 0 {
        println!(
            "Blocks: {}\nRegisters: {}\nFields: {}\nRange: {} bytes",
            model.block_count(),
            model.register_count(),
            model.field_count(),
            model.range_bytes(),
        );
    }

    error_count
}
