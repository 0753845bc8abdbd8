/// Geometry descriptor for a scene node.
///
/// The host graphics library builds the actual vertex data; the engine only
/// records the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// UV sphere.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Flat annulus in the local XY plane.
    Ring { inner: f32, outer: f32, segments: u32 },
    /// Unit quad facing the camera (sprites).
    Quad,
    /// Point cloud; positions live on the node.
    Points { count: u32 },
}

impl Geometry {
    pub fn sphere(radius: f32, segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: segments,
            height_segments: segments,
        }
    }

    pub fn ring(inner: f32, outer: f32, segments: u32) -> Self {
        Geometry::Ring { inner, outer, segments }
    }

    /// Wire code read by the host renderer.
    pub fn kind_code(&self) -> f32 {
        match self {
            Geometry::Sphere { .. } => 0.0,
            Geometry::Ring { .. } => 1.0,
            Geometry::Quad => 2.0,
            Geometry::Points { .. } => 3.0,
        }
    }

    /// `[kind, a, b, segments]` as packed into the draw list.
    pub fn params(&self) -> [f32; 4] {
        match *self {
            Geometry::Sphere { radius, width_segments, height_segments } => [
                self.kind_code(),
                radius,
                height_segments as f32,
                width_segments as f32,
            ],
            Geometry::Ring { inner, outer, segments } => {
                [self.kind_code(), inner, outer, segments as f32]
            }
            Geometry::Quad => [self.kind_code(), 1.0, 1.0, 1.0],
            Geometry::Points { count } => [self.kind_code(), count as f32, 0.0, 0.0],
        }
    }
}
