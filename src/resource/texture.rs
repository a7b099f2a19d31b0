use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

use crate::{
    foundation::color::PremulRgbaF32,
    foundation::error::{ShadegraphError, ShadegraphResult},
    foundation::math::Fnv1a64,
    resource::sampler::FilterMode,
};

/// Stable identity of a texture resource, unique for the process lifetime.
///
/// Nodes and coordinate transforms store ids rather than borrows; the `Arc`
/// around [`TextureResource`] carries lifetime, the id carries identity in
/// equality checks and shader keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u64);

fn next_resource_id() -> ResourceId {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    ResourceId(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Supported texel formats. Color formats are premultiplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 8-bit premultiplied RGBA.
    Rgba8Premul,
    /// 8-bit coverage/alpha only.
    Alpha8,
    /// 32-bit float premultiplied RGBA; not filterable.
    RgbaF32,
}

impl PixelFormat {
    /// Whether samplers may interpolate between texels of this format.
    pub fn filterable(self) -> bool {
        !matches!(self, PixelFormat::RgbaF32)
    }

    fn key_tag(self) -> u8 {
        match self {
            PixelFormat::Rgba8Premul => 0,
            PixelFormat::Alpha8 => 1,
            PixelFormat::RgbaF32 => 2,
        }
    }
}

/// Shape/format description of a texture resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextureDesc {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Texel format.
    pub format: PixelFormat,
    /// Whether the resource can be bound as a render target.
    pub render_target: bool,
    /// MSAA sample count; must be 1 for non-render-targets.
    pub sample_count: u32,
    /// Whether a mip chain is allocated alongside the base level.
    pub mip_mapped: bool,
}

impl TextureDesc {
    fn validate(&self) -> ShadegraphResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShadegraphError::validation(
                "texture dimensions must be non-zero",
            ));
        }
        if self.sample_count == 0 {
            return Err(ShadegraphError::validation("sample_count must be >= 1"));
        }
        if self.sample_count > 1 && !self.render_target {
            return Err(ShadegraphError::validation(
                "multisampling requires a render target",
            ));
        }
        Ok(())
    }
}

/// Sampler flavor a shader backend must declare for a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplerKind {
    /// Regular normalized 2D color sampler.
    Norm2d,
    /// Single-channel coverage sampler (alpha-only textures).
    Alpha2d,
}

/// Tri-state validity of a texture's mipmap chain vs its base level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipStatus {
    /// No mip levels exist beyond the base level.
    NotAllocated,
    /// Mip levels exist but do not match the current base-level content.
    Dirty,
    /// Mip levels match the current base-level content.
    Valid,
}

impl MipStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => MipStatus::Dirty,
            2 => MipStatus::Valid,
            _ => MipStatus::NotAllocated,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            MipStatus::NotAllocated => 0,
            MipStatus::Dirty => 1,
            MipStatus::Valid => 2,
        }
    }
}

/// Color mode mip levels were generated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MipColorMode {
    /// Mips downsampled directly on stored (gamma-encoded) values.
    Gamma,
    /// Mips downsampled in linear space.
    Linear,
}

impl MipColorMode {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => MipColorMode::Linear,
            _ => MipColorMode::Gamma,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            MipColorMode::Gamma => 0,
            MipColorMode::Linear => 1,
        }
    }
}

/// Format-matched texel storage for the base level.
#[derive(Clone, Debug)]
pub enum TexelData {
    /// 4 bytes per texel, premultiplied RGBA.
    Rgba8(Vec<u8>),
    /// 1 byte per texel, coverage/alpha.
    Alpha8(Vec<u8>),
    /// 4 floats per texel, premultiplied RGBA.
    RgbaF32(Vec<f32>),
}

impl TexelData {
    fn matches(&self, desc: &TextureDesc) -> ShadegraphResult<()> {
        let texels = (desc.width as usize) * (desc.height as usize);
        let ok = match (self, desc.format) {
            (TexelData::Rgba8(v), PixelFormat::Rgba8Premul) => v.len() == texels * 4,
            (TexelData::Alpha8(v), PixelFormat::Alpha8) => v.len() == texels,
            (TexelData::RgbaF32(v), PixelFormat::RgbaF32) => v.len() == texels * 4,
            _ => {
                return Err(ShadegraphError::validation(
                    "texel storage does not match texture format",
                ));
            }
        };
        if !ok {
            return Err(ShadegraphError::validation(
                "texel storage length does not match texture dimensions",
            ));
        }
        Ok(())
    }
}

/// A CPU-resident texture resource shared between processor nodes.
///
/// Resources are owned by the surrounding engine's resource cache and shared
/// into processor nodes via `Arc`; a node is one of possibly several
/// holders. The base-level texels and the descriptor are immutable; the mip
/// and sampling metadata behind [`TextureResource::internals`] is the only
/// mutable state, and mutating it is reserved for resource-lifecycle code.
#[derive(Debug)]
pub struct TextureResource {
    id: ResourceId,
    desc: TextureDesc,
    texels: TexelData,
    sampler_kind: SamplerKind,
    highest_filter_mode: FilterMode,
    mip_status: AtomicU8,
    max_mip_level: AtomicU32,
    mip_color_mode: AtomicU8,
}

impl TextureResource {
    /// Create a texture from a descriptor and matching texel storage.
    pub fn new(desc: TextureDesc, texels: TexelData) -> ShadegraphResult<Arc<Self>> {
        desc.validate()?;
        texels.matches(&desc)?;

        let sampler_kind = match desc.format {
            PixelFormat::Alpha8 => SamplerKind::Alpha2d,
            _ => SamplerKind::Norm2d,
        };
        let highest_filter_mode = if desc.format.filterable() {
            FilterMode::Bilinear
        } else {
            FilterMode::Nearest
        };
        let (mip_status, max_mip_level) = if desc.mip_mapped {
            (MipStatus::Dirty, desc.width.max(desc.height).ilog2())
        } else {
            (MipStatus::NotAllocated, 0)
        };

        Ok(Arc::new(Self {
            id: next_resource_id(),
            desc,
            texels,
            sampler_kind,
            highest_filter_mode,
            mip_status: AtomicU8::new(mip_status.as_u8()),
            max_mip_level: AtomicU32::new(max_mip_level),
            mip_color_mode: AtomicU8::new(MipColorMode::Gamma.as_u8()),
        }))
    }

    /// Create a sampleable texture from a decoded straight-alpha RGBA image.
    pub fn from_image(image: &image::RgbaImage, mip_mapped: bool) -> ShadegraphResult<Arc<Self>> {
        let (width, height) = image.dimensions();
        let mut rgba8_premul = image.as_raw().clone();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self::new(
            TextureDesc {
                width,
                height,
                format: PixelFormat::Rgba8Premul,
                render_target: false,
                sample_count: 1,
                mip_mapped,
            },
            TexelData::Rgba8(rgba8_premul),
        )
    }

    /// Stable resource identity.
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Shape/format descriptor.
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Base-level texel fetch; coordinates must be in range.
    ///
    /// Alpha-only textures read as premultiplied `(0, 0, 0, a)`.
    pub(crate) fn texel(&self, x: u32, y: u32) -> PremulRgbaF32 {
        let i = (y as usize) * (self.desc.width as usize) + (x as usize);
        match &self.texels {
            TexelData::Rgba8(v) => {
                let p = &v[i * 4..i * 4 + 4];
                [
                    f32::from(p[0]) / 255.0,
                    f32::from(p[1]) / 255.0,
                    f32::from(p[2]) / 255.0,
                    f32::from(p[3]) / 255.0,
                ]
            }
            TexelData::Alpha8(v) => [0.0, 0.0, 0.0, f32::from(v[i]) / 255.0],
            TexelData::RgbaF32(v) => {
                let p = &v[i * 4..i * 4 + 4];
                [p[0], p[1], p[2], p[3]]
            }
        }
    }

    /// Privileged window into this texture's mutable sampling metadata.
    ///
    /// This is the only sanctioned channel for reading or mutating mip and
    /// sampler metadata from outside the resource's own methods. It is
    /// intended for resource-lifecycle code; generic callers never need it.
    /// The view borrows the resource, carries no state of its own, and
    /// cannot outlive it.
    pub fn internals(&self) -> TextureInternals<'_> {
        TextureInternals { texture: self }
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Privileged accessor over a [`TextureResource`]'s mutable internal state.
///
/// Obtainable only through [`TextureResource::internals`]; it has no data
/// members beyond the borrow and no independent lifecycle. Mutations use
/// relaxed atomics so shared holders stay `Sync`, but callers must still
/// serialize mutation per resource — concurrent writers are a logic error
/// the crate does not detect.
#[derive(Debug)]
pub struct TextureInternals<'a> {
    texture: &'a TextureResource,
}

impl TextureInternals<'_> {
    /// Record that mip content no longer matches the base level.
    ///
    /// From `NotAllocated` this is the allocation transition: mips now exist
    /// but are unmeasured.
    pub fn mark_mip_maps_dirty(&self) {
        self.texture
            .mip_status
            .store(MipStatus::Dirty.as_u8(), Ordering::Relaxed);
    }

    /// Record that mip content has been regenerated from the base level.
    ///
    /// A no-op while mips were never allocated.
    pub fn mark_mip_maps_clean(&self) {
        let status = &self.texture.mip_status;
        if MipStatus::from_u8(status.load(Ordering::Relaxed)) != MipStatus::NotAllocated {
            status.store(MipStatus::Valid.as_u8(), Ordering::Relaxed);
        }
    }

    /// Whether sampling mips would read stale or missing data.
    pub fn mip_maps_are_dirty(&self) -> bool {
        MipStatus::from_u8(self.texture.mip_status.load(Ordering::Relaxed)) != MipStatus::Valid
    }

    /// Whether any mip levels exist beyond the base level.
    pub fn has_mip_maps(&self) -> bool {
        MipStatus::from_u8(self.texture.mip_status.load(Ordering::Relaxed))
            != MipStatus::NotAllocated
    }

    /// Set the highest mip level sampling may address.
    pub fn set_max_mip_map_level(&self, level: u32) {
        self.texture.max_mip_level.store(level, Ordering::Relaxed);
    }

    /// Highest mip level sampling may address.
    pub fn max_mip_map_level(&self) -> u32 {
        self.texture.max_mip_level.load(Ordering::Relaxed)
    }

    /// Sampler flavor derived from the texture format.
    pub fn sampler_kind(&self) -> SamplerKind {
        self.texture.sampler_kind
    }

    /// The filter mode sampler bindings are clamped to for this texture.
    pub fn highest_filter_mode(&self) -> FilterMode {
        self.texture.highest_filter_mode
    }

    /// Color mode the mip chain was generated in.
    pub fn mip_color_mode(&self) -> MipColorMode {
        MipColorMode::from_u8(self.texture.mip_color_mode.load(Ordering::Relaxed))
    }

    /// Set the color mode for subsequent mip generation.
    pub fn set_mip_color_mode(&self, mode: MipColorMode) {
        self.texture
            .mip_color_mode
            .store(mode.as_u8(), Ordering::Relaxed);
    }
}

/// Deterministic shape key for scratch-resource reuse.
///
/// Two descriptors that can back the same scratch allocation hash to the
/// same key; the resource cache uses it to find reusable allocations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScratchKey(pub u64);

/// Compute the [`ScratchKey`] for a texture shape.
pub fn scratch_key(desc: &TextureDesc) -> ScratchKey {
    let mut h = Fnv1a64::new_default();
    h.write_u32(desc.width);
    h.write_u32(desc.height);
    h.write_u8(desc.format.key_tag());
    h.write_u8(u8::from(desc.render_target));
    h.write_u32(desc.sample_count);
    h.write_u8(u8::from(desc.mip_mapped));
    ScratchKey(h.finish())
}

#[cfg(test)]
#[path = "../../tests/unit/resource/texture.rs"]
mod tests;
