use serde::{Deserialize, Serialize};
use std::fmt;

/// Material occupying a grid cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Air,
    Dirt,
    Stone,
    Bedrock,
    Ore,
    Wood,
    Grass,
    Leaves,
}

/// Static catalog entry for a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProps {
    pub visible: bool,
    pub breakable: bool,
    /// 0xRRGGBB base color for kinds that get a visual.
    pub color: Option<u32>,
}

const CATALOG: [BlockProps; 8] = [
    // Air
    BlockProps {
        visible: false,
        breakable: false,
        color: None,
    },
    // Dirt
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0x8B4513),
    },
    // Stone
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0x808080),
    },
    // Bedrock
    BlockProps {
        visible: true,
        breakable: false,
        color: Some(0x222222),
    },
    // Ore
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0xFFD700),
    },
    // Wood
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0xA0522D),
    },
    // Grass
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0x228B22),
    },
    // Leaves
    BlockProps {
        visible: true,
        breakable: true,
        color: Some(0x2E8B57),
    },
];

impl BlockKind {
    pub const ALL: [BlockKind; 8] = [
        BlockKind::Air,
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Bedrock,
        BlockKind::Ore,
        BlockKind::Wood,
        BlockKind::Grass,
        BlockKind::Leaves,
    ];

    pub fn props(self) -> &'static BlockProps {
        &CATALOG[self as usize]
    }

    pub fn is_air(self) -> bool {
        self == BlockKind::Air
    }

    pub fn is_visible(self) -> bool {
        self.props().visible
    }

    pub fn is_breakable(self) -> bool {
        self.props().breakable
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Dirt => "dirt",
            BlockKind::Stone => "stone",
            BlockKind::Bedrock => "bedrock",
            BlockKind::Ore => "ore",
            BlockKind::Wood => "wood",
            BlockKind::Grass => "grass",
            BlockKind::Leaves => "leaves",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
