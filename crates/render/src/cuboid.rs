//! Quad meshing for axis-aligned fluid cuboids.
//!
//! A cuboid is measured from its origin corner. Vertex positions use the raw
//! extents, while texture coordinates only see the fractional part of each
//! extent, so volumes taller than a cell repeat their texture instead of
//! stretching it.

use glam::{Mat3, Mat4, Vec3};

use crate::face::{Axis, Edge, Face};
use crate::mesh::{FluidVertex, Shading, VertexSink};
use crate::sprite::SpriteRegion;
use crate::style::{FaceStyle, FluidFaces, Rotation, SpriteKind};

/// Units per cell for the scaled (block-model) entry points.
pub const SCALED_UNITS: f32 = 16.0;

/// Axis-aligned box extents measured from its origin corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub depth: f32,
}

impl Cuboid {
    /// One full cell.
    pub const UNIT: Cuboid = Cuboid::new(1.0, 1.0, 1.0);

    /// Construct from extents.
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Extents of the box spanning `from..to`.
    pub fn between(from: Vec3, to: Vec3) -> Self {
        let size = to - from;
        Self::new(size.x, size.y, size.z)
    }

    /// `[width, height, depth]`.
    pub fn extents(&self) -> [f32; 3] {
        [self.width, self.height, self.depth]
    }

    /// Divide every extent by `divisor`.
    pub fn scaled_down(&self, divisor: f32) -> Self {
        Self::new(
            self.width / divisor,
            self.height / divisor,
            self.depth / divisor,
        )
    }
}

/// Wrap an extent above one cell back into `(0, 1]`; exact multiples keep a full cell.
///
/// Non-finite extents have no fractional part and tile as one full cell.
pub fn tile_extent(extent: f32) -> f32 {
    if !extent.is_finite() {
        1.0
    } else if extent > 1.0 {
        let frac = extent.fract();
        if frac == 0.0 {
            1.0
        } else {
            frac
        }
    } else {
        extent
    }
}

/// Normalized `[start, end)` span along one face axis, before texel scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexelWindow {
    /// Span start.
    pub start: f64,
    /// Span end.
    pub end: f64,
}

impl TexelWindow {
    /// Construct a span.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `[0, tile(extent))`.
    pub fn from_extent(extent: f32) -> Self {
        Self::new(0.0, f64::from(tile_extent(extent)))
    }

    /// Mirror about the cell: `[1 - end, 1 - start)`. Anchors flow textures at the bottom.
    pub fn inverted(self) -> Self {
        Self::new(1.0 - self.end, 1.0 - self.start)
    }

    /// Span in sprite texels.
    pub fn texels(self, scale: f64) -> (f64, f64) {
        (self.start * scale, self.end * scale)
    }
}

/// Normalized U and V windows a face samples, in that order.
pub fn face_windows(face: Face, cuboid: Cuboid, kind: SpriteKind) -> (TexelWindow, TexelWindow) {
    let extents = cuboid.extents();
    let layout = face.layout();
    let window = |axis: Axis| {
        let w = TexelWindow::from_extent(extents[axis.index()]);
        if kind == SpriteKind::Flowing && axis == Axis::Y {
            w.inverted()
        } else {
            w
        }
    };
    (window(layout.u_axis), window(layout.v_axis))
}

/// Atlas-space texture rectangle for one face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// U at the start of the U window.
    pub min_u: f32,
    /// U at the end of the U window.
    pub max_u: f32,
    /// V at the start of the V window.
    pub min_v: f32,
    /// V at the end of the V window.
    pub max_v: f32,
}

impl UvRect {
    /// Interpolate both windows through `sprite`.
    ///
    /// With `transpose` the U range is read from the V window and vice versa.
    pub fn interpolate<S: SpriteRegion + ?Sized>(
        sprite: &S,
        u: TexelWindow,
        v: TexelWindow,
        scale: f64,
        transpose: bool,
    ) -> Self {
        let (u, v) = if transpose { (v, u) } else { (u, v) };
        let (u0, u1) = u.texels(scale);
        let (v0, v1) = v.texels(scale);
        Self {
            min_u: sprite.interpolated_u(u0),
            max_u: sprite.interpolated_u(u1),
            min_v: sprite.interpolated_v(v0),
            max_v: sprite.interpolated_v(v1),
        }
    }

    /// Swap the V bounds.
    pub fn flip_horizontal(self) -> Self {
        Self {
            min_v: self.max_v,
            max_v: self.min_v,
            ..self
        }
    }

    /// Swap the U bounds.
    pub fn flip_vertical(self) -> Self {
        Self {
            min_u: self.max_u,
            max_u: self.min_u,
            ..self
        }
    }

    fn pick(&self, u: Edge, v: Edge) -> [f32; 2] {
        let u = match u {
            Edge::Lo => self.min_u,
            Edge::Hi => self.max_u,
        };
        let v = match v {
            Edge::Lo => self.min_v,
            Edge::Hi => self.max_v,
        };
        [u, v]
    }
}

/// Texture rectangle for `face` after rotation transposition and flips.
pub fn face_uv_rect<S: SpriteRegion + ?Sized>(
    face: Face,
    cuboid: Cuboid,
    style: FaceStyle,
    sprite: &S,
) -> UvRect {
    let (u, v) = face_windows(face, cuboid, style.kind);
    let mut rect = UvRect::interpolate(
        sprite,
        u,
        v,
        style.kind.texel_scale(),
        style.rotation.transposes(),
    );
    if style.flip_horizontal {
        rect = rect.flip_horizontal();
    }
    if style.flip_vertical {
        rect = rect.flip_vertical();
    }
    rect
}

/// Per-corner UVs of `face`, in the face's fixed corner order.
pub fn face_uvs<S: SpriteRegion + ?Sized>(
    face: Face,
    cuboid: Cuboid,
    style: FaceStyle,
    sprite: &S,
) -> [[f32; 2]; 4] {
    let rect = face_uv_rect(face, cuboid, style, sprite);
    let canonical = face.layout().corners.map(|c| rect.pick(c.u, c.v));
    relabel(canonical, style.rotation)
}

/// Cyclic corner relabeling: corner `i` takes canonical UV `(i + turns) % 4`.
fn relabel(uvs: [[f32; 2]; 4], rotation: Rotation) -> [[f32; 2]; 4] {
    let turns = rotation.quarter_turns();
    std::array::from_fn(|i| uvs[(i + turns) % 4])
}

/// Still and flowing sprites of one fluid. Either may be missing.
#[derive(Debug)]
pub struct CuboidSprites<'a, S: ?Sized> {
    /// Sprite for [`SpriteKind::Still`] faces.
    pub still: Option<&'a S>,
    /// Sprite for [`SpriteKind::Flowing`] faces.
    pub flowing: Option<&'a S>,
}

impl<'a, S: ?Sized> CuboidSprites<'a, S> {
    /// Bundle both sprites.
    pub fn new(still: Option<&'a S>, flowing: Option<&'a S>) -> Self {
        Self { still, flowing }
    }

    /// Sprite for a face of `kind`.
    pub fn for_kind(&self, kind: SpriteKind) -> Option<&'a S> {
        match kind {
            SpriteKind::Still => self.still,
            SpriteKind::Flowing => self.flowing,
        }
    }
}

impl<S: ?Sized> Clone for CuboidSprites<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for CuboidSprites<'_, S> {}

/// Turns cuboids into textured quads.
///
/// Stateless apart from an optional transform applied to every emitted position;
/// all methods take `&self` and can run concurrently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuboidMesher {
    transform: Mat4,
    normal_matrix: Mat3,
}

impl Default for CuboidMesher {
    fn default() -> Self {
        Self::new()
    }
}

impl CuboidMesher {
    /// Mesher emitting in cuboid-local space.
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
        }
    }

    /// Mesher that transforms positions by `transform` and normals by its inverse transpose.
    pub fn with_transform(transform: Mat4) -> Self {
        let inverse = transform.inverse();
        let normal_matrix = if transform.determinant() != 0.0 && inverse.is_finite() {
            Mat3::from_mat4(inverse.transpose())
        } else {
            Mat3::from_mat4(transform)
        };
        Self {
            transform,
            normal_matrix,
        }
    }

    /// Same mesher with its origin moved by `offset` (in local units).
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::with_transform(self.transform * Mat4::from_translation(offset))
    }

    /// The four vertices of `face`, or `None` when the sprite is missing.
    pub fn face_vertices<S: SpriteRegion + ?Sized>(
        &self,
        face: Face,
        cuboid: Cuboid,
        style: FaceStyle,
        sprite: Option<&S>,
        shading: Shading,
    ) -> Option<[FluidVertex; 4]> {
        let sprite = sprite?;
        let uvs = face_uvs(face, cuboid, style, sprite);
        let extents = Vec3::from_array(cuboid.extents());
        let normal = (self.normal_matrix * Vec3::from_array(face.normal()))
            .normalize_or_zero()
            .to_array();
        let color = shading.color.to_rgba();
        let light = shading.light.channels();
        let corners = face.layout().corners;

        Some(std::array::from_fn(|i| {
            let local = Vec3::from_array(corners[i].unit) * extents;
            FluidVertex {
                position: self.transform.transform_point3(local).to_array(),
                normal,
                uv: uvs[i],
                color,
                light,
            }
        }))
    }

    /// Append `face` to `sink`. Returns the number of vertices written (4, or 0 without a sprite).
    pub fn emit_face<S, K>(
        &self,
        sink: &mut K,
        face: Face,
        cuboid: Cuboid,
        style: FaceStyle,
        sprite: Option<&S>,
        shading: Shading,
    ) -> usize
    where
        S: SpriteRegion + ?Sized,
        K: VertexSink + ?Sized,
    {
        match self.face_vertices(face, cuboid, style, sprite, shading) {
            Some(quad) => {
                sink.push_quad(quad);
                4
            }
            None => 0,
        }
    }

    /// [`emit_face`](Self::emit_face) with extents in 0..16 block-model units.
    pub fn emit_scaled_face<S, K>(
        &self,
        sink: &mut K,
        face: Face,
        cuboid: Cuboid,
        style: FaceStyle,
        sprite: Option<&S>,
        shading: Shading,
    ) -> usize
    where
        S: SpriteRegion + ?Sized,
        K: VertexSink + ?Sized,
    {
        self.emit_face(
            sink,
            face,
            cuboid.scaled_down(SCALED_UNITS),
            style,
            sprite,
            shading,
        )
    }

    /// Lazily yield the vertices of every present face in [`Face::ALL`] order.
    ///
    /// `styles` decides which faces exist; `gaseous` turns every face by an extra 180 degrees.
    /// The iterator borrows its inputs only, so calling again replays the same sequence.
    pub fn cuboid_vertices<'a, S, F>(
        &'a self,
        cuboid: Cuboid,
        styles: F,
        sprites: CuboidSprites<'a, S>,
        shading: Shading,
        gaseous: bool,
    ) -> impl Iterator<Item = FluidVertex> + 'a
    where
        S: SpriteRegion + ?Sized,
        F: Fn(Face) -> Option<FaceStyle> + 'a,
    {
        Face::ALL
            .into_iter()
            .filter_map(move |face| {
                self.styled_face(face, cuboid, styles(face), sprites, shading, gaseous)
            })
            .flatten()
    }

    /// Append every present face of `cuboid` to `sink`. Returns the number of vertices written.
    pub fn emit_cuboid<S, F, K>(
        &self,
        sink: &mut K,
        cuboid: Cuboid,
        styles: F,
        sprites: CuboidSprites<'_, S>,
        shading: Shading,
        gaseous: bool,
    ) -> usize
    where
        S: SpriteRegion + ?Sized,
        F: Fn(Face) -> Option<FaceStyle>,
        K: VertexSink + ?Sized,
    {
        let mut written = 0;
        for face in Face::ALL {
            if let Some(quad) =
                self.styled_face(face, cuboid, styles(face), sprites, shading, gaseous)
            {
                sink.push_quad(quad);
                written += 4;
            }
        }
        written
    }

    // Shared by the lazy and sink paths.
    fn styled_face<S: SpriteRegion + ?Sized>(
        &self,
        face: Face,
        cuboid: Cuboid,
        style: Option<FaceStyle>,
        sprites: CuboidSprites<'_, S>,
        shading: Shading,
        gaseous: bool,
    ) -> Option<[FluidVertex; 4]> {
        let offset = if gaseous { Rotation::R180 } else { Rotation::R0 };
        let style = style?.rotated(offset);
        self.face_vertices(face, cuboid, style, sprites.for_kind(style.kind), shading)
    }

    /// Mesh the box spanning `from..to` with the given face styles.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_box<S, K>(
        &self,
        sink: &mut K,
        from: Vec3,
        to: Vec3,
        faces: &FluidFaces,
        sprites: CuboidSprites<'_, S>,
        shading: Shading,
        gaseous: bool,
    ) -> usize
    where
        S: SpriteRegion + ?Sized,
        K: VertexSink + ?Sized,
    {
        self.translated(from).emit_cuboid(
            sink,
            Cuboid::between(from, to),
            |face| faces.style(face),
            sprites,
            shading,
            gaseous,
        )
    }

    /// [`emit_box`](Self::emit_box) with corners in 0..16 block-model units.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_scaled_box<S, K>(
        &self,
        sink: &mut K,
        from: Vec3,
        to: Vec3,
        faces: &FluidFaces,
        sprites: CuboidSprites<'_, S>,
        shading: Shading,
        gaseous: bool,
    ) -> usize
    where
        S: SpriteRegion + ?Sized,
        K: VertexSink + ?Sized,
    {
        self.emit_box(
            sink,
            from / SCALED_UNITS,
            to / SCALED_UNITS,
            faces,
            sprites,
            shading,
            gaseous,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Argb, PackedLight};
    use crate::sprite::SpriteRect;

    const EPS: f32 = 1.0e-5;

    fn shading() -> Shading {
        Shading::new(Argb(0xFF10_2030), PackedLight::new(0x40, 0xF0))
    }

    fn assert_uv_eq(a: [[f32; 2]; 4], b: [[f32; 2]; 4]) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!(
                (x[0] - y[0]).abs() < EPS && (x[1] - y[1]).abs() < EPS,
                "{a:?} != {b:?}"
            );
        }
    }

    #[test]
    fn unit_cube_up_face_uses_identity_uvs() {
        let mesher = CuboidMesher::new();
        let quad = mesher
            .face_vertices(
                Face::Up,
                Cuboid::UNIT,
                FaceStyle::STILL,
                Some(&SpriteRect::FULL),
                shading(),
            )
            .expect("sprite present");
        let uvs = quad.map(|v| v.uv);
        assert_eq!(uvs, [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]);
        assert_eq!(
            quad.map(|v| v.position),
            [
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 1.0],
                [1.0, 1.0, 1.0],
                [1.0, 1.0, 0.0]
            ]
        );
        assert!(quad.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(quad.iter().all(|v| v.color == [0x10, 0x20, 0x30, 0xFF]));
        assert!(quad.iter().all(|v| v.light == [0xF0, 0x40]));
    }

    #[test]
    fn missing_sprite_emits_nothing() {
        let mesher = CuboidMesher::new();
        let mut out: Vec<FluidVertex> = Vec::new();
        let written = mesher.emit_face::<SpriteRect, _>(
            &mut out,
            Face::North,
            Cuboid::UNIT,
            FaceStyle::FLOWING,
            None,
            shading(),
        );
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn tiling_keeps_positions_but_wraps_uvs() {
        let mesher = CuboidMesher::new();
        let sprite = SpriteRect::new(0.5, 0.0, 1.0, 0.5);
        let wide = mesher
            .face_vertices(
                Face::Up,
                Cuboid::new(2.5, 1.0, 1.0),
                FaceStyle::STILL,
                Some(&sprite),
                shading(),
            )
            .unwrap();
        let narrow = mesher
            .face_vertices(
                Face::Up,
                Cuboid::new(0.5, 1.0, 1.0),
                FaceStyle::STILL,
                Some(&sprite),
                shading(),
            )
            .unwrap();
        assert_uv_eq(wide.map(|v| v.uv), narrow.map(|v| v.uv));
        assert_eq!(wide[2].position[0], 2.5);
        assert_eq!(narrow[2].position[0], 0.5);
    }

    #[test]
    fn whole_multiples_keep_a_full_tile() {
        assert_eq!(tile_extent(2.0), 1.0);
        assert_eq!(tile_extent(1.0), 1.0);
        assert_eq!(tile_extent(0.0), 0.0);
        assert!((tile_extent(3.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn infinite_extents_tile_as_one_cell() {
        assert_eq!(tile_extent(f32::INFINITY), 1.0);
        assert_eq!(tile_extent(f32::NEG_INFINITY), 1.0);
        assert_eq!(tile_extent(f32::NAN), 1.0);

        let quad = CuboidMesher::new()
            .face_vertices(
                Face::North,
                Cuboid::new(f32::INFINITY, 0.5, 1.0),
                FaceStyle::STILL,
                Some(&SpriteRect::FULL),
                shading(),
            )
            .expect("sprite present");
        for v in quad {
            assert!(v.uv.iter().all(|c| c.is_finite()), "uv {:?}", v.uv);
        }
    }

    #[test]
    fn flowing_window_is_inverted() {
        let inverted = TexelWindow::new(0.2, 0.7).inverted();
        assert!((inverted.start - 0.3).abs() < 1.0e-9);
        assert!((inverted.end - 0.8).abs() < 1.0e-9);

        let (_, still_v) = face_windows(Face::South, Cuboid::new(1.0, 0.25, 1.0), SpriteKind::Still);
        let (_, flow_v) =
            face_windows(Face::South, Cuboid::new(1.0, 0.25, 1.0), SpriteKind::Flowing);
        assert_eq!(still_v, TexelWindow::new(0.0, 0.25));
        assert_eq!(flow_v, TexelWindow::new(0.75, 1.0));
    }

    #[test]
    fn flowing_faces_sample_half_the_sprite() {
        let rect = face_uv_rect(
            Face::East,
            Cuboid::UNIT,
            FaceStyle::FLOWING,
            &SpriteRect::FULL,
        );
        assert_eq!(rect.min_u, 0.0);
        assert_eq!(rect.max_u, 0.5);
        assert_eq!(rect.min_v, 0.0);
        assert_eq!(rect.max_v, 0.5);
    }

    #[test]
    fn rotation_relabels_corners_cyclically() {
        let sprite = SpriteRect::new(0.25, 0.25, 0.75, 0.75);
        let base = face_uvs(Face::Up, Cuboid::UNIT, FaceStyle::STILL, &sprite);
        for rotation in [Rotation::R90, Rotation::R180, Rotation::R270] {
            let rotated = face_uvs(
                Face::Up,
                Cuboid::UNIT,
                FaceStyle::STILL.with_rotation(rotation),
                &sprite,
            );
            let turns = rotation.quarter_turns();
            let expected: [[f32; 2]; 4] = std::array::from_fn(|i| base[(i + turns) % 4]);
            assert_uv_eq(rotated, expected);
        }
    }

    #[test]
    fn quarter_turns_transpose_the_rectangle() {
        let cuboid = Cuboid::new(0.5, 1.0, 1.0);
        let plain = face_uv_rect(Face::Up, cuboid, FaceStyle::STILL, &SpriteRect::FULL);
        assert_eq!((plain.max_u, plain.max_v), (0.5, 1.0));

        for rotation in [Rotation::R90, Rotation::R270] {
            let turned = face_uv_rect(
                Face::Up,
                cuboid,
                FaceStyle::STILL.with_rotation(rotation),
                &SpriteRect::FULL,
            );
            assert_eq!((turned.max_u, turned.max_v), (1.0, 0.5));
        }
        let half = face_uv_rect(
            Face::Up,
            cuboid,
            FaceStyle::STILL.with_rotation(Rotation::R180),
            &SpriteRect::FULL,
        );
        assert_eq!(half, plain);
    }

    #[test]
    fn flips_are_involutions() {
        let rect = face_uv_rect(
            Face::West,
            Cuboid::new(0.3, 0.6, 0.9),
            FaceStyle::FLOWING,
            &SpriteRect::FULL,
        );
        assert_eq!(rect.flip_horizontal().flip_horizontal(), rect);
        assert_eq!(rect.flip_vertical().flip_vertical(), rect);
        assert_ne!(rect.flip_horizontal(), rect);

        let flipped = face_uv_rect(
            Face::West,
            Cuboid::new(0.3, 0.6, 0.9),
            FaceStyle::FLOWING.with_flips(true, true),
            &SpriteRect::FULL,
        );
        assert_eq!(flipped, rect.flip_horizontal().flip_vertical());
    }

    #[test]
    fn opposite_faces_run_u_in_opposite_directions() {
        let sprite = SpriteRect::FULL;
        let north = face_uvs(Face::North, Cuboid::UNIT, FaceStyle::STILL, &sprite);
        let south = face_uvs(Face::South, Cuboid::UNIT, FaceStyle::STILL, &sprite);
        let mesher = CuboidMesher::new();
        let n = mesher
            .face_vertices(Face::North, Cuboid::UNIT, FaceStyle::STILL, Some(&sprite), shading())
            .unwrap();
        let s = mesher
            .face_vertices(Face::South, Cuboid::UNIT, FaceStyle::STILL, Some(&sprite), shading())
            .unwrap();
        // North corner 0 sits at x = 0 with max U; South corner 0 at x = 0 with min U.
        assert_eq!(n[0].position[0], 0.0);
        assert_eq!(s[0].position[0], 0.0);
        assert_eq!(north[0][0], 1.0);
        assert_eq!(south[0][0], 0.0);
    }

    #[test]
    fn gas_offset_turns_every_face_half_way() {
        let mesher = CuboidMesher::new();
        let sprite = SpriteRect::FULL;
        let sprites = CuboidSprites::new(Some(&sprite), Some(&sprite));
        let faces = FluidFaces::standard();
        let liquid: Vec<_> = mesher
            .cuboid_vertices(Cuboid::UNIT, |f| faces.style(f), sprites, shading(), false)
            .collect();
        let gas: Vec<_> = mesher
            .cuboid_vertices(Cuboid::UNIT, |f| faces.style(f), sprites, shading(), true)
            .collect();
        assert_eq!(liquid.len(), 24);
        assert_eq!(gas.len(), 24);
        for (l, g) in liquid.chunks(4).zip(gas.chunks(4)) {
            for i in 0..4 {
                assert_eq!(g[i].position, l[i].position);
                assert_eq!(g[i].uv, l[(i + 2) % 4].uv);
            }
        }
    }

    #[test]
    fn absent_faces_and_sprites_are_skipped() {
        let mesher = CuboidMesher::new();
        let still = SpriteRect::FULL;
        let sprites = CuboidSprites::new(Some(&still), None);
        let faces = FluidFaces::standard().without(Face::Up);
        let mut out: Vec<FluidVertex> = Vec::new();
        let written = mesher.emit_cuboid(
            &mut out,
            Cuboid::UNIT,
            |f| faces.style(f),
            sprites,
            shading(),
            false,
        );
        // Only Down remains: Up is culled and the sides have no flowing sprite.
        assert_eq!(written, 4);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|v| v.normal == [0.0, -1.0, 0.0]));
    }

    #[test]
    fn scaled_face_matches_unit_face() {
        let mesher = CuboidMesher::new();
        let mut scaled: Vec<FluidVertex> = Vec::new();
        let mut unit: Vec<FluidVertex> = Vec::new();
        mesher.emit_scaled_face(
            &mut scaled,
            Face::East,
            Cuboid::new(16.0, 8.0, 4.0),
            FaceStyle::FLOWING,
            Some(&SpriteRect::FULL),
            shading(),
        );
        mesher.emit_face(
            &mut unit,
            Face::East,
            Cuboid::new(1.0, 0.5, 0.25),
            FaceStyle::FLOWING,
            Some(&SpriteRect::FULL),
            shading(),
        );
        assert_eq!(scaled, unit);
    }

    #[test]
    fn boxes_are_translated_to_their_origin() {
        let mesher = CuboidMesher::new();
        let sprite = SpriteRect::FULL;
        let sprites = CuboidSprites::new(Some(&sprite), Some(&sprite));
        let mut out: Vec<FluidVertex> = Vec::new();
        let written = mesher.emit_scaled_box(
            &mut out,
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(12.0, 8.0, 12.0),
            &FluidFaces::standard(),
            sprites,
            shading(),
            false,
        );
        assert_eq!(written, 24);
        for v in &out {
            for axis in 0..3 {
                let lo = if axis == 1 { 0.0 } else { 0.25 };
                let hi = if axis == 1 { 0.5 } else { 0.75 };
                assert!(v.position[axis] >= lo - EPS && v.position[axis] <= hi + EPS);
            }
        }
    }

    #[test]
    fn transform_rotates_normals() {
        let mesher = CuboidMesher::with_transform(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let quad = mesher
            .face_vertices(
                Face::East,
                Cuboid::UNIT,
                FaceStyle::STILL,
                Some(&SpriteRect::FULL),
                shading(),
            )
            .unwrap();
        // +X rotated a quarter turn about Y points to -Z.
        let n = quad[0].normal;
        assert!(n[0].abs() < EPS && n[1].abs() < EPS && (n[2] + 1.0).abs() < EPS);
    }

    #[test]
    fn tiny_non_uniform_scale_uses_inverse_transpose() {
        let transform = Mat4::from_scale(Vec3::new(0.004, 0.008, 0.002))
            * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(transform.determinant().abs() < f32::EPSILON);

        let mesher = CuboidMesher::with_transform(transform);
        let quad = mesher
            .face_vertices(
                Face::East,
                Cuboid::UNIT,
                FaceStyle::STILL,
                Some(&SpriteRect::FULL),
                shading(),
            )
            .unwrap();
        let linear = Mat3::from_mat4(transform);
        let expected = (linear.inverse().transpose() * Vec3::X).normalize();
        let naive = (linear * Vec3::X).normalize();
        assert!((expected - naive).length() > 0.1);

        let n = Vec3::from_array(quad[0].normal);
        assert!((n - expected).length() < 1.0e-4, "{n:?} != {expected:?}");
    }

    #[test]
    fn faces_follow_emission_order_and_both_paths_agree() {
        let mesher = CuboidMesher::new();
        let sprite = SpriteRect::FULL;
        let sprites = CuboidSprites::new(Some(&sprite), Some(&sprite));
        let faces = FluidFaces::standard();
        let cuboid = Cuboid::new(0.3, 2.7, 1.0);
        let styles = |f: Face| faces.style(f).map(|s| s.with_rotation(Rotation::R90));

        for gaseous in [false, true] {
            let lazy: Vec<_> = mesher
                .cuboid_vertices(cuboid, styles, sprites, shading(), gaseous)
                .collect();
            let mut sunk: Vec<FluidVertex> = Vec::new();
            let written = mesher.emit_cuboid(&mut sunk, cuboid, styles, sprites, shading(), gaseous);

            assert_eq!(written, 24);
            assert_eq!(lazy, sunk);
            for (quad, face) in sunk.chunks(4).zip(Face::ALL) {
                assert!(quad.iter().all(|v| v.normal == face.normal()), "{face:?}");
            }
        }
    }
}
