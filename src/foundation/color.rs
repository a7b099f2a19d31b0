/// Premultiplied RGBA color in `f32` (r, g, b already multiplied by a).
pub type PremulRgbaF32 = [f32; 4];

/// Convert a straight-alpha color to premultiplied form.
pub fn premultiply(straight: [f32; 4]) -> PremulRgbaF32 {
    let a = straight[3];
    [straight[0] * a, straight[1] * a, straight[2] * a, a]
}

/// Convert a premultiplied color back to straight-alpha form.
///
/// A fully transparent input maps to transparent black.
pub fn unpremultiply(premul: PremulRgbaF32) -> [f32; 4] {
    let a = premul[3];
    if a <= 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    [premul[0] / a, premul[1] / a, premul[2] / a, a]
}

/// Shared color-space transform applied to a sampled image color.
///
/// Processors hold these behind `Arc` so any number of nodes requesting the
/// same transform share one instance. Only the coefficients a node's
/// equality and shader key need are modeled here; the surrounding
/// color-management machinery that decides *which* transform to build stays
/// outside the crate.
///
/// Equality is bitwise on the coefficients so that node equality and shader
/// keys agree exactly.
#[derive(Clone, Debug)]
pub struct ColorXform {
    m: [[f32; 3]; 3],
}

impl ColorXform {
    /// Identity transform (useful as a neutral element in tests/tooling).
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Build a transform from a row-major 3x3 matrix applied to straight RGB.
    pub const fn new(m: [[f32; 3]; 3]) -> Self {
        Self { m }
    }

    /// Row-major coefficients, row by row.
    pub fn coeffs(&self) -> [f32; 9] {
        let m = self.m;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }

    /// Apply the transform to a premultiplied color.
    ///
    /// The matrix operates on straight-alpha RGB; alpha is untouched and the
    /// result is clamped to `[0, 1]` before re-premultiplying.
    pub fn apply(&self, color: PremulRgbaF32) -> PremulRgbaF32 {
        let s = unpremultiply(color);
        let mut out = [0.0f32; 4];
        for (row, coeffs) in self.m.iter().enumerate() {
            let v = coeffs[0] * s[0] + coeffs[1] * s[1] + coeffs[2] * s[2];
            out[row] = v.clamp(0.0, 1.0);
        }
        out[3] = s[3];
        premultiply(out)
    }
}

impl PartialEq for ColorXform {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs()
            .iter()
            .zip(other.coeffs().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
