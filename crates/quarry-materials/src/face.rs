//! Cube faces, per-face atlas coordinates, and the quarter-turn face rotation
//! used for directional block variants.

use serde::{Deserialize, Serialize};

/// Pixel offset of a tile inside the shared texture atlas.
pub type TexCoord = [u16; 2];

/// One atlas coordinate per cube face, indexed by [`Face::index`].
pub type FaceTextures = [TexCoord; 6];

/// Side length of one atlas tile in pixels.
pub const TILE_SIZE: u16 = 16;

/// The "missing texture" tile.
pub const NO_TEXTURE: TexCoord = [0x1F0, 0x1F0];

/// Face order of every [`FaceTextures`] sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// +X.
    East = 0,
    /// -X.
    West = 1,
    /// +Y.
    Top = 2,
    /// -Y.
    Bottom = 3,
    /// +Z.
    South = 4,
    /// -Z.
    North = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::East,
        Face::West,
        Face::Top,
        Face::Bottom,
        Face::South,
        Face::North,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Face names accepted by definition documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextureDirection {
    Forward,
    Backward,
    Left,
    Right,
    Top,
    Bottom,
    /// Shorthand for `Left` and `Right`.
    Sides,
}

impl TextureDirection {
    /// The faces this direction name writes to.
    pub fn faces(self) -> &'static [Face] {
        match self {
            TextureDirection::Forward => &[Face::North],
            TextureDirection::Backward => &[Face::South],
            TextureDirection::Left => &[Face::West],
            TextureDirection::Right => &[Face::East],
            TextureDirection::Top => &[Face::Top],
            TextureDirection::Bottom => &[Face::Bottom],
            TextureDirection::Sides => &[Face::West, Face::East],
        }
    }
}

/// Facing of a directional variant, measured in clockwise quarter turns from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    pub fn quarter_turns(self) -> usize {
        match self {
            Compass::North => 0,
            Compass::East => 1,
            Compass::South => 2,
            Compass::West => 3,
        }
    }
}

/// `rotated[i] = original[QUARTER_TURN[i]]`: one clockwise quarter turn seen from
/// above. Top and bottom stay put; north -> east -> south -> west -> north.
/// The side faces form a single 4-cycle, so four turns are the identity.
const QUARTER_TURN: [usize; 6] = [5, 4, 2, 3, 0, 1];

/// Rotates a face sequence one quarter turn clockwise.
pub fn rotate_quarter_turn(textures: &FaceTextures) -> FaceTextures {
    let mut out = *textures;
    for (dst, &src) in out.iter_mut().zip(QUARTER_TURN.iter()) {
        *dst = textures[src];
    }
    out
}

/// Rotates a face sequence so that its north face ends up facing `facing`.
pub fn rotate_to(textures: &FaceTextures, facing: Compass) -> FaceTextures {
    (0..facing.quarter_turns()).fold(*textures, |acc, _| rotate_quarter_turn(&acc))
}

/// A face sequence with the same tile on every face.
pub fn uniform(tex: TexCoord) -> FaceTextures {
    [tex; 6]
}
