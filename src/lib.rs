//! Shadegraph models GPU fragment shading as a graph of immutable processor
//! nodes with deterministic identity.
//!
//! A [`FragmentProcessor`] is a value: it owns its texture sampler bindings
//! and coordinate transforms, freezes its optimization flags at
//! construction, and never mutates afterwards. That makes the three
//! protocols every backend needs cheap and safe:
//!
//! 1. **Equality**: `a.is_equal(&b)` deep-compares two nodes (variant tag
//!    fast-reject first) so structurally identical subtrees can be
//!    deduplicated before compilation.
//! 2. **Shader keys**: [`FragmentProcessor::emit_shader_key`] writes a
//!    deterministic field encoding into a [`ShaderKeyBuilder`]; equal nodes
//!    emit equal keys and vice versa, so a [`ShaderKey`] can stand in for a
//!    compiled program in a cache ([`ProgramCache`]).
//! 3. **Cloning**: `Clone` produces an independently owned node sharing the
//!    same underlying resources; `clone().is_equal(&original)` always holds.
//!
//! The actual shader backend stays external: [`ProgramCache::get_or_compile`]
//! takes the compile step as a closure. For tests and goldens the crate
//! carries its own reference semantics — every processor can be evaluated
//! per-pixel on the CPU ([`render_to_rgba8`]).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable nodes**: sampler bindings and coordinate transforms are
//!   fixed in count and order at construction.
//! - **Premultiplied RGBA** end-to-end: textures store premultiplied texels
//!   and evaluation keeps premultiplied semantics valid.
//! - **Deterministic-by-default**: key emission and equality are pure and
//!   stable for a given input.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod foundation;
mod processor;
mod render;
mod resource;

pub use kurbo::{Affine, Point, Rect, Vec2};

pub use compile::cache::ProgramCache;
pub use compile::key::{ShaderKey, ShaderKeyBuilder};
pub use foundation::color::{ColorXform, PremulRgbaF32, premultiply, unpremultiply};
pub use foundation::error::{ShadegraphError, ShadegraphResult};
pub use processor::alpha_threshold::AlphaThreshold;
pub use processor::const_color::ConstColor;
pub use processor::node::{FragmentProcessor, OptimizationFlags, ProcessorKind};
pub use processor::parse::{NamedTextures, ProcessorDesc, parse_processor};
pub use render::cpu::render_to_rgba8;
pub use resource::sampler::{
    CoordTransform, FilterMode, SamplerParams, TextureSamplerBinding, WrapMode,
};
pub use resource::texture::{
    MipColorMode, MipStatus, PixelFormat, ResourceId, SamplerKind, ScratchKey, TexelData,
    TextureDesc, TextureInternals, TextureResource, scratch_key,
};
