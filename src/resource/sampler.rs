use std::sync::Arc;

use kurbo::{Affine, Point};

use crate::{
    foundation::color::PremulRgbaF32,
    foundation::math::lerp,
    resource::texture::{ResourceId, TextureResource},
};

/// Texel filtering mode.
///
/// Ordered from cheapest to highest quality so a requested mode can be
/// clamped against a texture's capability with `min`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum FilterMode {
    /// Nearest-texel lookup.
    Nearest,
    /// Bilinear interpolation between the four nearest texels.
    Bilinear,
}

/// Handling of coordinates outside the texture bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WrapMode {
    /// Clamp to the edge texel.
    Clamp,
    /// Tile the texture.
    Repeat,
    /// Tile with every other repetition mirrored.
    MirrorRepeat,
}

/// Filter/wrap parameter set for one sampler binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SamplerParams {
    /// Texel filter.
    pub filter: FilterMode,
    /// Horizontal wrap.
    pub wrap_x: WrapMode,
    /// Vertical wrap.
    pub wrap_y: WrapMode,
}

impl Default for SamplerParams {
    fn default() -> Self {
        Self {
            filter: FilterMode::Bilinear,
            wrap_x: WrapMode::Clamp,
            wrap_y: WrapMode::Clamp,
        }
    }
}

impl SamplerParams {
    pub(crate) fn key_words(self) -> [u32; 3] {
        fn wrap_tag(w: WrapMode) -> u32 {
            match w {
                WrapMode::Clamp => 0,
                WrapMode::Repeat => 1,
                WrapMode::MirrorRepeat => 2,
            }
        }
        let filter = match self.filter {
            FilterMode::Nearest => 0,
            FilterMode::Bilinear => 1,
        };
        [filter, wrap_tag(self.wrap_x), wrap_tag(self.wrap_y)]
    }
}

/// One (texture, sampling parameters) pair owned by a processor node.
///
/// The node owns the binding; the texture itself is shared. The requested
/// filter mode is clamped to the texture's highest supported filter at
/// construction, so a binding never promises filtering its texture cannot
/// deliver.
#[derive(Clone, Debug)]
pub struct TextureSamplerBinding {
    texture: Arc<TextureResource>,
    params: SamplerParams,
}

impl TextureSamplerBinding {
    /// Bind `texture` with `requested` parameters (filter clamped).
    pub fn new(texture: Arc<TextureResource>, requested: SamplerParams) -> Self {
        let params = SamplerParams {
            filter: requested
                .filter
                .min(texture.internals().highest_filter_mode()),
            ..requested
        };
        Self { texture, params }
    }

    /// The bound texture.
    pub fn texture(&self) -> &Arc<TextureResource> {
        &self.texture
    }

    /// Effective sampling parameters (after filter clamping).
    pub fn params(&self) -> SamplerParams {
        self.params
    }

    /// Identity of the bound texture.
    pub fn resource_id(&self) -> ResourceId {
        self.texture.id()
    }

    /// Value equality: same underlying resource, same effective parameters.
    pub(crate) fn value_eq(&self, other: &Self) -> bool {
        self.resource_id() == other.resource_id() && self.params == other.params
    }

    /// Sample the texture at `pos` in texel space.
    ///
    /// Texel centers sit at half-integer coordinates; wrap modes apply per
    /// axis.
    pub fn sample(&self, pos: Point) -> PremulRgbaF32 {
        match self.params.filter {
            FilterMode::Nearest => {
                self.texel_wrapped(pos.x.floor() as i64, pos.y.floor() as i64)
            }
            FilterMode::Bilinear => {
                let x = pos.x - 0.5;
                let y = pos.y - 0.5;
                let x0 = x.floor();
                let y0 = y.floor();
                let tx = (x - x0) as f32;
                let ty = (y - y0) as f32;
                let (x0, y0) = (x0 as i64, y0 as i64);

                let c00 = self.texel_wrapped(x0, y0);
                let c10 = self.texel_wrapped(x0 + 1, y0);
                let c01 = self.texel_wrapped(x0, y0 + 1);
                let c11 = self.texel_wrapped(x0 + 1, y0 + 1);

                let mut out = [0.0f32; 4];
                for c in 0..4 {
                    out[c] = lerp(lerp(c00[c], c10[c], tx), lerp(c01[c], c11[c], tx), ty);
                }
                out
            }
        }
    }

    fn texel_wrapped(&self, x: i64, y: i64) -> PremulRgbaF32 {
        let xi = wrap_index(x, i64::from(self.texture.width()), self.params.wrap_x);
        let yi = wrap_index(y, i64::from(self.texture.height()), self.params.wrap_y);
        self.texture.texel(xi, yi)
    }
}

fn wrap_index(i: i64, size: i64, mode: WrapMode) -> u32 {
    let wrapped = match mode {
        WrapMode::Clamp => i.clamp(0, size - 1),
        WrapMode::Repeat => i.rem_euclid(size),
        WrapMode::MirrorRepeat => {
            let p = i.rem_euclid(2 * size);
            if p < size { p } else { 2 * size - 1 - p }
        }
    };
    wrapped as u32
}

/// Affine mapping from fragment space into one texture's local texel space.
///
/// Tied by index to a sampler binding on the owning node; stores only the
/// texture's id, so it references the resource without extending its
/// lifetime beyond the binding that already holds it.
#[derive(Clone, Debug)]
pub struct CoordTransform {
    matrix: Affine,
    texture: ResourceId,
}

impl CoordTransform {
    /// Associate `matrix` with the texture it maps coordinates into.
    pub fn new(matrix: Affine, texture: &Arc<TextureResource>) -> Self {
        Self {
            matrix,
            texture: texture.id(),
        }
    }

    /// The transform matrix.
    pub fn matrix(&self) -> Affine {
        self.matrix
    }

    /// Identity of the texture this transform maps into.
    pub fn texture(&self) -> ResourceId {
        self.texture
    }

    /// Map a fragment-space point into the texture's texel space.
    pub fn apply(&self, p: Point) -> Point {
        self.matrix * p
    }

    pub(crate) fn value_eq(&self, other: &Self) -> bool {
        let a = self.matrix.as_coeffs();
        let b = other.matrix.as_coeffs();
        self.texture == other.texture
            && a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
    }
}
