/// The six faces of a cuboid. North is -Z, East is +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Negative Y / bottom face.
    Down,
    /// Positive Y / top face.
    Up,
    /// Negative Z face.
    North,
    /// Positive Z face.
    South,
    /// Positive X face.
    East,
    /// Negative X face.
    West,
}

impl Face {
    /// Emission order used by the cuboid mesher.
    pub const ALL: [Face; 6] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::East,
        Face::West,
    ];

    /// Returns the `[0..6)` index of this face within [`Face::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis the face is perpendicular to.
    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Face::Down | Face::Up => Axis::Y,
            Face::North | Face::South => Axis::Z,
            Face::East | Face::West => Axis::X,
        }
    }

    /// Outward unit normal.
    #[inline]
    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::Down => [0.0, -1.0, 0.0],
            Face::Up => [0.0, 1.0, 0.0],
            Face::North => [0.0, 0.0, -1.0],
            Face::South => [0.0, 0.0, 1.0],
            Face::East => [1.0, 0.0, 0.0],
            Face::West => [-1.0, 0.0, 0.0],
        }
    }

    #[inline]
    pub(crate) fn layout(self) -> &'static FaceLayout {
        &FACE_LAYOUTS[self.index()]
    }
}

/// Spatial axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Width.
    X,
    /// Height.
    Y,
    /// Depth.
    Z,
}

impl Axis {
    /// Component index into `[x, y, z]` triples.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// End of a UV range a corner samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    Lo,
    Hi,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceCorner {
    /// Unit-cube corner; multiplied by the cuboid extents.
    pub unit: [f32; 3],
    pub u: Edge,
    pub v: Edge,
}

/// Fixed per-face data: which axes feed U/V and the four corners in emission order.
///
/// Corners wind counter-clockwise seen from outside. U direction reversals between
/// opposite faces live in the corner edges, so the UV rectangle itself stays ordered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FaceLayout {
    pub u_axis: Axis,
    pub v_axis: Axis,
    pub corners: [FaceCorner; 4],
}

const fn corner(x: f32, y: f32, z: f32, u: Edge, v: Edge) -> FaceCorner {
    FaceCorner {
        unit: [x, y, z],
        u,
        v,
    }
}

use Edge::{Hi, Lo};

// Indexed by `Face::index`.
const FACE_LAYOUTS: [FaceLayout; 6] = [
    // Down
    FaceLayout {
        u_axis: Axis::X,
        v_axis: Axis::Z,
        corners: [
            corner(0.0, 0.0, 0.0, Lo, Lo),
            corner(1.0, 0.0, 0.0, Hi, Lo),
            corner(1.0, 0.0, 1.0, Hi, Hi),
            corner(0.0, 0.0, 1.0, Lo, Hi),
        ],
    },
    // Up
    FaceLayout {
        u_axis: Axis::X,
        v_axis: Axis::Z,
        corners: [
            corner(0.0, 1.0, 0.0, Lo, Lo),
            corner(0.0, 1.0, 1.0, Lo, Hi),
            corner(1.0, 1.0, 1.0, Hi, Hi),
            corner(1.0, 1.0, 0.0, Hi, Lo),
        ],
    },
    // North
    FaceLayout {
        u_axis: Axis::X,
        v_axis: Axis::Y,
        corners: [
            corner(0.0, 0.0, 0.0, Hi, Hi),
            corner(0.0, 1.0, 0.0, Hi, Lo),
            corner(1.0, 1.0, 0.0, Lo, Lo),
            corner(1.0, 0.0, 0.0, Lo, Hi),
        ],
    },
    // South
    FaceLayout {
        u_axis: Axis::X,
        v_axis: Axis::Y,
        corners: [
            corner(0.0, 0.0, 1.0, Lo, Hi),
            corner(1.0, 0.0, 1.0, Hi, Hi),
            corner(1.0, 1.0, 1.0, Hi, Lo),
            corner(0.0, 1.0, 1.0, Lo, Lo),
        ],
    },
    // East
    FaceLayout {
        u_axis: Axis::Z,
        v_axis: Axis::Y,
        corners: [
            corner(1.0, 0.0, 0.0, Hi, Hi),
            corner(1.0, 1.0, 0.0, Hi, Lo),
            corner(1.0, 1.0, 1.0, Lo, Lo),
            corner(1.0, 0.0, 1.0, Lo, Hi),
        ],
    },
    // West
    FaceLayout {
        u_axis: Axis::Z,
        v_axis: Axis::Y,
        corners: [
            corner(0.0, 0.0, 0.0, Lo, Hi),
            corner(0.0, 0.0, 1.0, Hi, Hi),
            corner(0.0, 1.0, 1.0, Hi, Lo),
            corner(0.0, 1.0, 0.0, Lo, Lo),
        ],
    },
];
