use kurbo::Point;
use rayon::prelude::*;

use crate::{
    foundation::error::{ShadegraphError, ShadegraphResult},
    processor::node::FragmentProcessor,
};

/// Evaluate `processor` for every pixel of a `width` x `height` grid into a
/// premultiplied RGBA8 buffer (row-major).
///
/// This is the reference renderer: fragments are evaluated at pixel centers
/// (`x + 0.5, y + 0.5`), rows in parallel. Backends must match its output
/// for the formats both support.
#[tracing::instrument(skip(processor), fields(name = processor.name()))]
pub fn render_to_rgba8(
    processor: &FragmentProcessor,
    width: u32,
    height: u32,
) -> ShadegraphResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(ShadegraphError::evaluation(
            "render target must be non-empty",
        ));
    }

    let stride = (width as usize) * 4;
    let mut out = vec![0u8; stride * (height as usize)];

    out.par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let color = processor.eval(Point::new(x as f64 + 0.5, y as f64 + 0.5));
                for (dst, c) in px.iter_mut().zip(color.iter()) {
                    *dst = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                }
            }
        });

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
