use crate::api::types::{Color, TextureId};

/// Blend mode for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (src-alpha, one-minus-src-alpha).
    #[default]
    Normal,
    /// Additive blending for glow effects (src-alpha, one).
    Additive,
}

/// Which faces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Shading model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Unlit, flat color (optionally modulated by a map).
    Basic,
    /// Lit by the scene's point lights.
    Standard,
    /// Screen-space points.
    Points { size: f32, attenuation: bool },
    /// Camera-facing billboard.
    Sprite,
}

/// Material descriptor — how a node appears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub map: Option<TextureId>,
    pub side: Side,
    pub transparent: bool,
    pub blend: BlendMode,
}

pub const FLAG_TRANSPARENT: u32 = 1;
pub const FLAG_DOUBLE_SIDED: u32 = 1 << 1;
pub const FLAG_ADDITIVE: u32 = 1 << 2;
pub const FLAG_SIZE_ATTENUATION: u32 = 1 << 3;

impl Material {
    fn with_kind(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            map: None,
            side: Side::Front,
            transparent: false,
            blend: BlendMode::Normal,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::with_kind(MaterialKind::Basic, color)
    }

    pub fn standard(color: Color) -> Self {
        Self::with_kind(MaterialKind::Standard, color)
    }

    /// Lit material whose color comes entirely from `map`.
    pub fn standard_mapped(map: TextureId) -> Self {
        Self::with_kind(MaterialKind::Standard, Color::WHITE).with_map(map)
    }

    pub fn points(color: Color, size: f32, attenuation: bool) -> Self {
        Self::with_kind(MaterialKind::Points { size, attenuation }, color)
    }

    pub fn sprite(color: Color) -> Self {
        Self::with_kind(MaterialKind::Sprite, color)
    }

    pub fn with_map(mut self, map: TextureId) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    /// `[kind, texture id or -1, flags, point size]` as packed into the draw list.
    pub fn params(&self) -> [f32; 4] {
        let (kind, size, attenuation) = match self.kind {
            MaterialKind::Basic => (0.0, 0.0, false),
            MaterialKind::Standard => (1.0, 0.0, false),
            MaterialKind::Points { size, attenuation } => (2.0, size, attenuation),
            MaterialKind::Sprite => (3.0, 0.0, false),
        };
        let mut flags = 0;
        if self.transparent {
            flags |= FLAG_TRANSPARENT;
        }
        if self.side == Side::Double {
            flags |= FLAG_DOUBLE_SIDED;
        }
        if self.blend == BlendMode::Additive {
            flags |= FLAG_ADDITIVE;
        }
        if attenuation {
            flags |= FLAG_SIZE_ATTENUATION;
        }
        let map = self.map.map(|t| t.0 as f32).unwrap_or(-1.0);
        [kind, map, flags as f32, size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_material_flags() {
        let m = Material::sprite(Color::from_hex(0xffff00))
            .with_map(TextureId(3))
            .with_transparent(true)
            .with_blend(BlendMode::Additive);
        let p = m.params();
        assert_eq!(p[0], 3.0);
        assert_eq!(p[1], 3.0);
        assert_eq!(p[2] as u32, FLAG_TRANSPARENT | FLAG_ADDITIVE);
    }

    #[test]
    fn unmapped_material_packs_negative_texture() {
        let m = Material::standard(Color::from_hex(0x888888));
        assert_eq!(m.params()[1], -1.0);
        assert_eq!(m.params()[2], 0.0);
    }

    #[test]
    fn points_material_carries_size_and_attenuation() {
        let m = Material::points(Color::WHITE, 0.5, true);
        let p = m.params();
        assert_eq!(p[0], 2.0);
        assert_eq!(p[3], 0.5);
        assert_eq!(p[2] as u32, FLAG_SIZE_ATTENUATION);
    }
}
