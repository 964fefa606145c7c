//! Unit meshes and the transforms that place them in the world.
//!
//! Every piece of geometry the engine creates is one of two unit squares: a filled quad
//! (two triangles) or an outlined quad (four line segments). Placing one is a scale followed
//! by an optional rotation and a translation.

use cgmath::{Matrix4, Rad, Vector3, Vector4};

use super::{Batch, DrawGroup, PrimitiveMode, Vertex};

/// A unit mesh with the index list that assembles it.
#[derive(Debug)]
pub struct Shape {
    /// Homogeneous corner positions of the unit square, counter-clockwise from the origin
    pub mesh: [[f32; 4]; 4],
    /// How `indices` are assembled into primitives
    pub mode: PrimitiveMode,
    /// Index list into `mesh`
    pub indices: &'static [u32],
}

const UNIT_SQUARE: [[f32; 4]; 4] = [
    [0.0, 0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
];

impl Shape {
    /// Filled unit square.
    pub const QUAD: Shape = Shape {
        mesh: UNIT_SQUARE,
        mode: PrimitiveMode::Triangles,
        indices: &[0, 1, 2, 2, 3, 0],
    };

    /// Outline of the unit square.
    pub const LINE_QUAD: Shape = Shape {
        mesh: UNIT_SQUARE,
        mode: PrimitiveMode::Lines,
        indices: &[0, 1, 1, 2, 2, 3, 3, 0],
    };

    /// Scales the mesh by `(sx, sy)`, rotates it by `angle` radians about the origin and
    /// moves it to `(dx, dy)`.
    pub fn transform(&self, dx: f32, dy: f32, angle: f32, sx: f32, sy: f32) -> [[f32; 4]; 4] {
        let matrix = Matrix4::from_translation(Vector3::new(dx, dy, 0.0))
            * Matrix4::from_angle_z(Rad(angle))
            * Matrix4::from_nonuniform_scale(sx, sy, 1.0);
        self.apply(matrix)
    }

    /// [`Shape::transform`] without the rotation.
    pub fn transform_no_rotate(&self, dx: f32, dy: f32, sx: f32, sy: f32) -> [[f32; 4]; 4] {
        let matrix = Matrix4::from_translation(Vector3::new(dx, dy, 0.0))
            * Matrix4::from_nonuniform_scale(sx, sy, 1.0);
        self.apply(matrix)
    }

    /// Colored vertices for the mesh placed at `(dx, dy)` with size `(sx, sy)`.
    pub fn vertices(&self, dx: f32, dy: f32, sx: f32, sy: f32, rgb: [u8; 3]) -> [Vertex; 4] {
        self.transform_no_rotate(dx, dy, sx, sy)
            .map(|position| Vertex::new(position, rgb))
    }

    /// Places the mesh and adds it to `batch` under `group`.
    #[allow(clippy::too_many_arguments)]
    pub fn add_to_batch<B: Batch>(
        &self,
        batch: &mut B,
        group: DrawGroup,
        dx: f32,
        dy: f32,
        sx: f32,
        sy: f32,
        rgb: [u8; 3],
    ) -> B::Handle {
        let vertices = self.vertices(dx, dy, sx, sy, rgb);
        batch.add_indexed(self.mode, group, self.indices, &vertices)
    }

    fn apply(&self, matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
        self.mesh.map(|corner| {
            let transformed = matrix * Vector4::from(corner);
            transformed.into()
        })
    }
}
