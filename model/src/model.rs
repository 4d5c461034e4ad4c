use indexmap::IndexSet;

use crate::{
    block::Block,
    diagnostic::{Context, Diagnostic, Diagnostics},
    register::Register,
};

/// The register map of one device revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub ident: String,
    pub revision: u32,
    /// Default base address of the map on the bus.
    pub base_addr: u32,
    pub blocks: Vec<Block>,
}

impl Model {
    pub fn new(ident: impl AsRef<str>, revision: u32) -> Self {
        Self {
            ident: ident.as_ref().to_lowercase(),
            revision,
            base_addr: 0,
            blocks: Vec::new(),
        }
    }

    pub fn base_addr(mut self, base_addr: u32) -> Self {
        self.base_addr = base_addr;

        self
    }

    pub fn add_block(&mut self, block: Block) -> &mut Block {
        self.blocks.push(block);

        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = Block>) -> Self {
        self.blocks.extend(blocks);

        self
    }

    pub fn block(&self, ident: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| block.ident.eq_ignore_ascii_case(ident))
    }

    /// Every register of the map with its parent block, in declaration order.
    pub fn registers(&self) -> impl Iterator<Item = (&Block, &Register)> {
        self.blocks
            .iter()
            .flat_map(|block| block.registers.iter().map(move |register| (block, register)))
    }

    /// Look a register up by its full name (`config`, `axi_debug_plframe_strobes`, ...).
    ///
    /// The lookup is case insensitive, so header symbols work too.
    pub fn find(&self, name: &str) -> Option<(&Block, &Register)> {
        self.registers()
            .find(|(block, register)| block.register_name(register).eq_ignore_ascii_case(name))
    }

    /// Absolute byte address of `register` within `block` for a map placed at `base_addr`.
    pub fn address_of(base_addr: u32, block: &Block, register: &Register) -> u32 {
        base_addr
            .wrapping_add(block.base_addr)
            .wrapping_add(register.offset)
    }

    /// Size of the address window the map decodes, from offset zero.
    pub fn range_bytes(&self) -> u32 {
        self.blocks
            .iter()
            .map(|block| block.range().end)
            .max()
            .unwrap_or(0)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn register_count(&self) -> usize {
        self.blocks.iter().map(|block| block.registers.len()).sum()
    }

    pub fn field_count(&self) -> usize {
        self.blocks.iter().map(Block::field_count).sum()
    }

    pub fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        let new_context = Context::new();

        let mut sorted_blocks = self
            .blocks
            .iter()
            .filter(|block| !block.registers.is_empty())
            .collect::<Vec<_>>();
        sorted_blocks.sort_by(|lhs, rhs| lhs.range().start.cmp(&rhs.range().start));

        let occupied = sorted_blocks
            .iter()
            .filter(|block| !block.range().is_empty())
            .collect::<Vec<_>>();

        for (i, block) in occupied.iter().enumerate() {
            let remaining = &occupied[i + 1..];

            for other in remaining {
                if block.range().end <= other.range().start {
                    break;
                }

                diagnostics.insert(Diagnostic::overlap(
                    &block.ident,
                    &other.ident,
                    &format!(
                        "0x{:08x}...0x{:08x}",
                        other.range().start,
                        block.range().end.min(other.range().end).saturating_sub(1)
                    ),
                    new_context.clone(),
                ));
            }
        }

        let mut names = IndexSet::new();
        for (block, register) in self.registers() {
            let name = block.register_name(register);

            if !names.insert(name.clone()) {
                diagnostics.insert(Diagnostic::duplicate_ident(&name, new_context.clone()));
            }
        }

        for block in &sorted_blocks {
            diagnostics.extend(block.validate(&new_context));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use crate::{diagnostic::Kind, field::Field};

    use super::*;

    fn model() -> Model {
        Model::new("device", 1).with_blocks([
            Block::new(
                "core",
                0,
                [
                    Register::new("config", 0x0, [Field::new("enable", 0, 1)]),
                    Register::new("ram", 0x4, [Field::new("data", 0, 32)]).memory(3),
                ],
            )
            .unprefixed(),
            Block::new(
                "axi_debug_output",
                0x10,
                [Register::new("cfg", 0x0, [Field::new("block_data", 0, 1)])],
            ),
        ])
    }

    #[test]
    fn find_by_full_name() {
        let model = model();

        let (block, register) = model.find("AXI_DEBUG_OUTPUT_CFG").unwrap();
        assert_eq!(block.ident, "axi_debug_output");
        assert_eq!(register.ident, "cfg");
        assert_eq!(Model::address_of(0x4000_0000, block, register), 0x4000_0010);

        assert!(model.find("config").is_some());
        assert!(model.find("cfg").is_none());
    }

    #[test]
    fn statistics() {
        let model = model();

        assert_eq!(model.range_bytes(), 0x14);
        assert_eq!(model.block_count(), 2);
        assert_eq!(model.register_count(), 3);
        assert_eq!(model.field_count(), 3);
        assert!(model.validate().is_empty());
    }

    /// A block placed inside the memory of another is an overlap.
    #[test]
    fn overlapping_blocks() {
        let mut model = model();
        model.blocks[1].base_addr = 0xc;

        let diagnostics = model.validate();

        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.first().unwrap().kind(),
            Kind::Overlap
        ));
    }

    /// A block spanning two later blocks overlaps both of them.
    #[test]
    fn block_overlapping_several() {
        let mut model = model();
        model.add_block(Block::new(
            "axi_debug_plframe",
            0x18,
            [Register::new("cfg", 0x0, [Field::new("block_data", 0, 1)])],
        ));
        model.blocks[0].registers[1].depth = Some(8);

        let diagnostics = model.validate();

        assert_eq!(
            diagnostics
                .iter()
                .filter(|diagnostic| matches!(diagnostic.kind(), Kind::Overlap))
                .count(),
            2
        );
    }

    #[test]
    fn colliding_names() {
        let mut model = model();
        model.add_block(
            Block::new(
                "extra",
                0x100,
                [Register::new("config", 0x0, [Field::new("enable", 0, 1)])],
            )
            .unprefixed(),
        );

        let diagnostics = model.validate();

        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.first().unwrap().kind(),
            Kind::DuplicateIdent
        ));
    }
}
