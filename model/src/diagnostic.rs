use std::fmt::Display;

use colored::Colorize;
use derive_more::{AsRef, Deref};
use indexmap::{IndexMap, IndexSet};
use ters::ters;

/// Elaborates diagnostics that may be emitted during register map validation.
#[ters]
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Diagnostic {
    #[get]
    rank: Rank,
    #[get]
    kind: Kind,
    #[get]
    message: String,
    notes: Vec<String>,
    #[get]
    context: Context,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Kind {
    // physical
    AddressUnaligned,
    Overlap,
    ExceedsDomain,
    EmptyDomain,
    InvalidReset,

    // lexical
    DuplicateIdent = 2000,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Rank {
    Warning,
    Error,
}

impl Diagnostic {
    pub fn new(rank: Rank, kind: Kind, message: impl Into<String>, context: Context) -> Self {
        Self {
            rank,
            kind,
            message: message.into(),
            notes: Default::default(),
            context,
        }
    }

    /// address must be word aligned
    ///
    /// note: address {address} does not satisfy: address % 4 == 0
    pub fn address_unaligned(address: u32, context: Context) -> Self {
        let level = context.level();
        let address = format!("0x{address:08x}").bold();

        Self::new(
            Rank::Error,
            Kind::AddressUnaligned,
            format!("{level} address must be word aligned"),
            context,
        )
        .notes([format!(
            "address {address} does not satisfy: address % 4 == 0"
        )])
    }

    /// [lhs] and [rhs] overlap, occupying {occupied}
    pub fn overlap(
        lhs: &impl Display,
        rhs: &impl Display,
        occupied: &impl Display,
        context: Context,
    ) -> Self {
        let level = context.child_level();
        let lhs = format!("{lhs}").bold();
        let rhs = format!("{rhs}").bold();
        let occupied = format!("{occupied}").bold();

        Self::new(
            Rank::Error,
            Kind::Overlap,
            format!("{level}s [{lhs}] and [{rhs}] overlap, occupying {occupied}"),
            context,
        )
    }

    /// [foo] with domain {offending_domain} exceeds parent with domain {parent_domain}
    pub fn exceeds_domain(
        offending: &impl Display,
        offending_domain: &impl Display,
        parent_domain: &impl Display,
        context: Context,
    ) -> Self {
        let level = context.level();
        let offending = format!("{offending}").bold();
        let offending_domain = format!("{offending_domain}").bold();
        let parent_domain = format!("{parent_domain}").bold();

        Self::new(
            Rank::Error,
            Kind::ExceedsDomain,
            format!(
                "{level} [{offending}] with domain {offending_domain} exceeds parent domain {parent_domain}"
            ),
            context,
        )
    }

    /// [foo] occupies no space
    pub fn empty_domain(offending: &impl Display, context: Context) -> Self {
        let level = context.level();
        let offending = format!("{offending}").bold();

        Self::new(
            Rank::Error,
            Kind::EmptyDomain,
            format!("{level} [{offending}] occupies no space"),
            context,
        )
        .notes(["fields must be at least one bit wide and memories at least one element deep"])
    }

    /// reset value {reset} of [foo] does not fit within {limit}
    pub fn invalid_reset(
        offending: &impl Display,
        reset: u32,
        limit: u32,
        context: Context,
    ) -> Self {
        let offending = format!("{offending}").bold();

        Self::new(
            Rank::Error,
            Kind::InvalidReset,
            format!(
                "reset value {} of field [{offending}] does not fit the field",
                format!("0x{reset:x}").bold(),
            ),
            context,
        )
        .notes([format!(
            "largest representable value: {}",
            format!("0x{limit:x}").bold()
        )])
    }

    /// [foo] is defined more than once
    pub fn duplicate_ident(offending: &impl Display, context: Context) -> Self {
        let level = context.child_level();
        let offending = format!("{offending}").bold();

        Self::new(
            Rank::Warning,
            Kind::DuplicateIdent,
            format!("{level} [{offending}] is defined more than once, the last definition wins"),
            context,
        )
    }

    pub fn notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.notes
            .extend(notes.into_iter().map(|e| e.as_ref().to_string()));

        self
    }

    pub fn report(diagnostics: &Diagnostics) -> String {
        let mut diagnostic_groups = IndexMap::new();

        for diagnostic in diagnostics {
            diagnostic_groups
                .entry(diagnostic.context.clone())
                .or_insert(vec![])
                .push(diagnostic);
        }

        diagnostic_groups
            .iter()
            .map(|(context, diagnostics)| {
                let diagnostics = diagnostics
                    .iter()
                    .map(|diagnostic| diagnostic.to_string())
                    .collect::<Vec<_>>()
                    .join("\n");

                if context.is_empty() {
                    diagnostics.to_string()
                } else {
                    format!("in {context}:\n{diagnostics}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let notes = if !self.notes.is_empty() {
            format!(
                "\n{}",
                self.notes
                    .iter()
                    .map(|note| format!("  {}: {note}", "note".bright_blue().bold()))
                    .collect::<Vec<_>>()
                    .join("\n")
            )
        } else {
            String::new()
        };

        let code = format!("[E{:04}]", self.kind as u32);

        let header = match &self.rank {
            Rank::Warning => format!("warning{code}").yellow().bold(),
            Rank::Error => format!("error{code}").red().bold(),
        };

        write!(f, "{header}: {}{notes}", self.message)
    }
}

pub type Diagnostics = IndexSet<Diagnostic>;

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        IndexSet::from([diagnostic])
    }
}

#[ters]
#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref)]
pub struct Context {
    #[get]
    path: Vec<String>,
}

#[expect(clippy::new_without_default)]
impl Context {
    pub fn new() -> Self {
        Context { path: Vec::new() }
    }

    pub fn with_path(path: Vec<String>) -> Self {
        Self { path }
    }

    pub fn and(mut self, ident: String) -> Self {
        self.path.push(ident);
        self
    }

    fn level(&self) -> &str {
        match self.path.len() {
            1 => "block",
            2 => "register",
            3 => "field",
            _ => "",
        }
    }

    fn child_level(&self) -> &str {
        match self.path.len() {
            0 => "block",
            1 => "register",
            2 => "field",
            _ => "",
        }
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.path
                .iter()
                .map(|segment| segment.bold().to_string())
                .collect::<Vec<_>>()
                .join("/")
        )
    }
}
