use std::sync::Arc;

use kurbo::{Affine, Point, Rect};

use crate::{
    foundation::color::{ColorXform, PremulRgbaF32},
    foundation::error::{ShadegraphError, ShadegraphResult},
    processor::node::{FragmentProcessor, OptimizationFlags, ProcessorBase},
    resource::sampler::{CoordTransform, SamplerParams, TextureSamplerBinding},
    resource::texture::TextureResource,
};

/// Remaps an image's alpha against a mask region using two thresholds.
///
/// The mask classifies each fragment: mask alpha below 0.5 means the
/// fragment lies outside the masked region and its alpha is capped at
/// `outer_threshold`; otherwise it is capped at `inner_threshold`. Capping
/// rescales the color channels by the same factor so premultiplied
/// semantics stay valid.
///
/// The image is sampled in fragment space (identity transform); the mask is
/// defined over an arbitrary sub-region of the canvas, so its coordinate
/// transform translates by the negated origin of the bounding rectangle
/// supplied at construction.
#[derive(Clone, Debug)]
pub struct AlphaThreshold {
    base: ProcessorBase,
    color_xform: Option<Arc<ColorXform>>,
    inner_threshold: f32,
    outer_threshold: f32,
}

const IMAGE: usize = 0;
const MASK: usize = 1;

impl AlphaThreshold {
    /// Build an alpha-threshold node.
    ///
    /// `image` and `mask` must be distinct resources; thresholds must be
    /// finite and in `[0, 1]`. `bounds` is consumed here to position the
    /// mask and is not retained.
    pub fn new(
        image: Arc<TextureResource>,
        color_xform: Option<Arc<ColorXform>>,
        mask: Arc<TextureResource>,
        inner_threshold: f32,
        outer_threshold: f32,
        bounds: Rect,
    ) -> ShadegraphResult<FragmentProcessor> {
        validate_threshold("inner_threshold", inner_threshold)?;
        validate_threshold("outer_threshold", outer_threshold)?;
        if image.id() == mask.id() {
            return Err(ShadegraphError::validation(
                "image and mask must be distinct textures",
            ));
        }

        let image_binding = TextureSamplerBinding::new(image.clone(), SamplerParams::default());
        let mask_binding = TextureSamplerBinding::new(mask.clone(), SamplerParams::default());
        let image_xform = CoordTransform::new(Affine::IDENTITY, &image);
        let mask_xform = CoordTransform::new(
            Affine::translate((-bounds.x0, -bounds.y0)),
            &mask,
        );

        Ok(FragmentProcessor::AlphaThreshold(Self {
            base: ProcessorBase::new(
                Self::opt_flags(outer_threshold),
                vec![image_binding, mask_binding],
                vec![image_xform, mask_xform],
            ),
            color_xform,
            inner_threshold,
            outer_threshold,
        }))
    }

    /// Flags for a given `outer_threshold`.
    ///
    /// At exactly 1.0 the node cannot introduce transparency outside the
    /// mask, so opaque input survives there.
    pub fn opt_flags(outer_threshold: f32) -> OptimizationFlags {
        if outer_threshold == 1.0 {
            OptimizationFlags::PRESERVES_OPAQUE_INPUT
        } else {
            OptimizationFlags::NONE
        }
    }

    /// Alpha cap applied inside the masked region.
    pub fn inner_threshold(&self) -> f32 {
        self.inner_threshold
    }

    /// Alpha cap applied outside the masked region.
    pub fn outer_threshold(&self) -> f32 {
        self.outer_threshold
    }

    /// Shared color transform applied to the sampled image color, if any.
    pub fn color_xform(&self) -> Option<&Arc<ColorXform>> {
        self.color_xform.as_ref()
    }

    pub(crate) fn base(&self) -> &ProcessorBase {
        &self.base
    }

    pub(crate) fn params_eq(&self, other: &Self) -> bool {
        self.inner_threshold.to_bits() == other.inner_threshold.to_bits()
            && self.outer_threshold.to_bits() == other.outer_threshold.to_bits()
            && match (&self.color_xform, &other.color_xform) {
                (None, None) => true,
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
    }

    pub(crate) fn emit_key(&self, b: &mut crate::compile::key::ShaderKeyBuilder) {
        b.write_f32(self.inner_threshold);
        b.write_f32(self.outer_threshold);
        match &self.color_xform {
            None => b.write_bool(false),
            Some(xform) => {
                b.write_bool(true);
                for coeff in xform.coeffs() {
                    b.write_f32(coeff);
                }
            }
        }
    }

    pub(crate) fn eval(&self, frag_coord: Point) -> PremulRgbaF32 {
        let samplers = self.base.samplers();
        let xforms = self.base.coord_transforms();

        let mut color = samplers[IMAGE].sample(xforms[IMAGE].apply(frag_coord));
        if let Some(xform) = &self.color_xform {
            color = xform.apply(color);
        }

        let mask_alpha = samplers[MASK].sample(xforms[MASK].apply(frag_coord))[3];
        let threshold = if mask_alpha < 0.5 {
            self.outer_threshold
        } else {
            self.inner_threshold
        };

        if color[3] > threshold {
            let scale = threshold / color[3];
            [
                color[0] * scale,
                color[1] * scale,
                color[2] * scale,
                threshold,
            ]
        } else {
            color
        }
    }
}

fn validate_threshold(name: &str, value: f32) -> ShadegraphResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ShadegraphError::validation(format!(
            "{name} must be finite and in [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/processor/alpha_threshold.rs"]
mod tests;
