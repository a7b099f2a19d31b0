use std::ops::{BitAnd, BitOr};

use kurbo::Point;

use crate::{
    compile::key::{ShaderKey, ShaderKeyBuilder},
    foundation::color::PremulRgbaF32,
    processor::alpha_threshold::AlphaThreshold,
    processor::const_color::ConstColor,
    resource::sampler::{CoordTransform, TextureSamplerBinding},
};

/// Identity tag of a concrete processor variant.
///
/// Used instead of dynamic type inspection: equality checks reject on the
/// tag before any deep comparison, and shader keys open with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProcessorKind {
    /// [`AlphaThreshold`].
    AlphaThreshold,
    /// [`ConstColor`].
    ConstColor,
}

impl ProcessorKind {
    pub(crate) fn key_tag(self) -> u32 {
        match self {
            ProcessorKind::AlphaThreshold => 1,
            ProcessorKind::ConstColor => 2,
        }
    }
}

/// Properties a backend can exploit, frozen at node construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimizationFlags(u32);

impl OptimizationFlags {
    /// No exploitable properties.
    pub const NONE: Self = Self(0);
    /// Output alpha is >= input alpha for opaque inputs.
    pub const PRESERVES_OPAQUE_INPUT: Self = Self(1 << 0);
    /// The node emits the same output for every fragment of a constant input.
    pub const CONSTANT_OUTPUT_FOR_CONSTANT_INPUT: Self = Self(1 << 1);

    /// Whether every flag in `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OptimizationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for OptimizationFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Per-node state every variant embeds: frozen optimization flags plus the
/// ordered sampler bindings and coordinate transforms.
///
/// Registering bindings and transforms here at construction is what lets
/// generic traversal (equality, key emission, resource enumeration) reach
/// them without knowing the concrete variant. Count and order are fixed for
/// the node's lifetime.
#[derive(Clone, Debug)]
pub(crate) struct ProcessorBase {
    flags: OptimizationFlags,
    samplers: Vec<TextureSamplerBinding>,
    coord_transforms: Vec<CoordTransform>,
}

impl ProcessorBase {
    pub(crate) fn new(
        flags: OptimizationFlags,
        samplers: Vec<TextureSamplerBinding>,
        coord_transforms: Vec<CoordTransform>,
    ) -> Self {
        Self {
            flags,
            samplers,
            coord_transforms,
        }
    }

    pub(crate) fn flags(&self) -> OptimizationFlags {
        self.flags
    }

    pub(crate) fn samplers(&self) -> &[TextureSamplerBinding] {
        &self.samplers
    }

    pub(crate) fn coord_transforms(&self) -> &[CoordTransform] {
        &self.coord_transforms
    }

    pub(crate) fn value_eq(&self, other: &Self) -> bool {
        self.flags == other.flags
            && self.samplers.len() == other.samplers.len()
            && self.coord_transforms.len() == other.coord_transforms.len()
            && self
                .samplers
                .iter()
                .zip(other.samplers.iter())
                .all(|(a, b)| a.value_eq(b))
            && self
                .coord_transforms
                .iter()
                .zip(other.coord_transforms.iter())
                .all(|(a, b)| a.value_eq(b))
    }

    pub(crate) fn emit_key(&self, b: &mut ShaderKeyBuilder) {
        b.write_u32(self.samplers.len() as u32);
        for sampler in &self.samplers {
            b.write_u64(sampler.resource_id().0);
            for word in sampler.params().key_words() {
                b.write_u32(word);
            }
        }
        b.write_u32(self.coord_transforms.len() as u32);
        for xform in &self.coord_transforms {
            b.write_u64(xform.texture().0);
            for coeff in xform.matrix().as_coeffs() {
                b.write_f64(coeff);
            }
        }
    }
}

/// A composable, immutable unit of shader computation.
///
/// The closed set of concrete variants, dispatched on [`ProcessorKind`].
/// Nodes are plain values: `Clone` yields an independently owned node whose
/// sampler-binding copies reference the same underlying resources, and
/// `clone().is_equal(&original)` always holds.
#[derive(Clone, Debug)]
pub enum FragmentProcessor {
    /// Alpha-threshold remap of an image against a mask region.
    AlphaThreshold(AlphaThreshold),
    /// Constant-color emitter.
    ConstColor(ConstColor),
}

impl FragmentProcessor {
    /// The variant's identity tag.
    pub fn kind(&self) -> ProcessorKind {
        match self {
            FragmentProcessor::AlphaThreshold(_) => ProcessorKind::AlphaThreshold,
            FragmentProcessor::ConstColor(_) => ProcessorKind::ConstColor,
        }
    }

    /// Stable diagnostic name. Does not participate in equality.
    pub fn name(&self) -> &'static str {
        match self {
            FragmentProcessor::AlphaThreshold(_) => "AlphaThreshold",
            FragmentProcessor::ConstColor(_) => "ConstColor",
        }
    }

    fn base(&self) -> &ProcessorBase {
        match self {
            FragmentProcessor::AlphaThreshold(p) => p.base(),
            FragmentProcessor::ConstColor(p) => p.base(),
        }
    }

    /// Flags computed once at construction from the variant's parameters.
    pub fn optimization_flags(&self) -> OptimizationFlags {
        self.base().flags()
    }

    /// Ordered sampler bindings, for resource enumeration.
    pub fn samplers(&self) -> &[TextureSamplerBinding] {
        self.base().samplers()
    }

    /// Ordered coordinate transforms, tied by index to the sampler bindings.
    pub fn coord_transforms(&self) -> &[CoordTransform] {
        self.base().coord_transforms()
    }

    /// Structural value equality.
    ///
    /// Rejects on the variant tag first, then deep-compares the registered
    /// bindings/transforms and every variant parameter. Two equal nodes emit
    /// identical shader keys and may share one compiled program.
    pub fn is_equal(&self, other: &FragmentProcessor) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        if !self.base().value_eq(other.base()) {
            return false;
        }
        match (self, other) {
            (FragmentProcessor::AlphaThreshold(a), FragmentProcessor::AlphaThreshold(b)) => {
                a.params_eq(b)
            }
            (FragmentProcessor::ConstColor(a), FragmentProcessor::ConstColor(b)) => a.params_eq(b),
            _ => false,
        }
    }

    /// Write a deterministic encoding of every equality-relevant parameter.
    ///
    /// Equal nodes emit identical keys; nodes with different keys are never
    /// equal.
    pub fn emit_shader_key(&self, b: &mut ShaderKeyBuilder) {
        b.write_u32(self.kind().key_tag());
        self.base().emit_key(b);
        match self {
            FragmentProcessor::AlphaThreshold(p) => p.emit_key(b),
            FragmentProcessor::ConstColor(p) => p.emit_key(b),
        }
    }

    /// Emit this node's [`ShaderKey`] into a fresh builder.
    pub fn shader_key(&self) -> ShaderKey {
        let mut b = ShaderKeyBuilder::new();
        self.emit_shader_key(&mut b);
        b.finish()
    }

    /// Reference evaluation of one fragment at `frag_coord` (pixel space).
    pub fn eval(&self, frag_coord: Point) -> PremulRgbaF32 {
        match self {
            FragmentProcessor::AlphaThreshold(p) => p.eval(frag_coord),
            FragmentProcessor::ConstColor(p) => p.eval(frag_coord),
        }
    }
}
