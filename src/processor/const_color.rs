use kurbo::Point;

use crate::{
    compile::key::ShaderKeyBuilder,
    foundation::color::PremulRgbaF32,
    foundation::error::{ShadegraphError, ShadegraphResult},
    processor::node::{FragmentProcessor, OptimizationFlags, ProcessorBase},
};

/// Emits a constant premultiplied color for every fragment.
///
/// Owns no textures and no transforms; mainly useful for flattening
/// constant subtrees and as the degenerate case of the node contract.
#[derive(Clone, Debug)]
pub struct ConstColor {
    base: ProcessorBase,
    color: PremulRgbaF32,
}

impl ConstColor {
    /// Build a constant-color node from a premultiplied color.
    ///
    /// Components must be finite, in `[0, 1]`, and premul-consistent
    /// (no color channel may exceed alpha).
    pub fn new(color: PremulRgbaF32) -> ShadegraphResult<FragmentProcessor> {
        for c in color {
            if !c.is_finite() || !(0.0..=1.0).contains(&c) {
                return Err(ShadegraphError::validation(
                    "color components must be finite and in [0, 1]",
                ));
            }
        }
        if color[..3].iter().any(|c| *c > color[3]) {
            return Err(ShadegraphError::validation(
                "premultiplied color channels cannot exceed alpha",
            ));
        }

        let mut flags = OptimizationFlags::CONSTANT_OUTPUT_FOR_CONSTANT_INPUT;
        if color[3] == 1.0 {
            flags = flags | OptimizationFlags::PRESERVES_OPAQUE_INPUT;
        }

        Ok(FragmentProcessor::ConstColor(Self {
            base: ProcessorBase::new(flags, Vec::new(), Vec::new()),
            color,
        }))
    }

    /// The emitted color.
    pub fn color(&self) -> PremulRgbaF32 {
        self.color
    }

    pub(crate) fn base(&self) -> &ProcessorBase {
        &self.base
    }

    pub(crate) fn params_eq(&self, other: &Self) -> bool {
        self.color
            .iter()
            .zip(other.color.iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    pub(crate) fn emit_key(&self, b: &mut ShaderKeyBuilder) {
        for c in self.color {
            b.write_f32(c);
        }
    }

    pub(crate) fn eval(&self, _frag_coord: Point) -> PremulRgbaF32 {
        self.color
    }
}
