use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Rect;

use crate::{
    foundation::color::ColorXform,
    foundation::error::{ShadegraphError, ShadegraphResult},
    processor::alpha_threshold::AlphaThreshold,
    processor::const_color::ConstColor,
    processor::node::FragmentProcessor,
    resource::texture::TextureResource,
};

/// Declarative processor description: a kind string plus JSON parameters.
///
/// This is the configuration surface for callers that describe shader
/// graphs as data (scene files, render servers) rather than constructing
/// nodes directly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcessorDesc {
    /// Variant kind, case-insensitive (`"alpha_threshold"`, `"const_color"`).
    pub kind: String,
    /// Variant parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Textures a description may reference, by name.
pub type NamedTextures = HashMap<String, Arc<TextureResource>>;

/// Parse a [`ProcessorDesc`] into a node, resolving texture names against
/// `textures`.
#[tracing::instrument(skip(desc, textures), fields(kind = %desc.kind))]
pub fn parse_processor(
    desc: &ProcessorDesc,
    textures: &NamedTextures,
) -> ShadegraphResult<FragmentProcessor> {
    let kind = desc.kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(ShadegraphError::validation(
            "processor kind must be non-empty",
        ));
    }

    match kind.as_str() {
        "alphathreshold" | "alpha_threshold" | "alpha-threshold" => {
            let image = lookup_texture(textures, &get_str(&desc.params, "image")?)?;
            let mask = lookup_texture(textures, &get_str(&desc.params, "mask")?)?;
            let inner = get_f32(&desc.params, "inner_threshold")?;
            let outer = get_f32(&desc.params, "outer_threshold")?;
            let bounds = parse_bounds(&desc.params)?;
            let color_xform = parse_color_xform(&desc.params)?;
            AlphaThreshold::new(image, color_xform, mask, inner, outer, bounds)
        }
        "constcolor" | "const_color" | "const-color" => {
            let color = get_color(&desc.params, "color")?;
            ConstColor::new(color)
        }
        _ => Err(ShadegraphError::validation(format!(
            "unknown processor kind '{kind}'"
        ))),
    }
}

fn lookup_texture(
    textures: &NamedTextures,
    name: &str,
) -> ShadegraphResult<Arc<TextureResource>> {
    textures.get(name).cloned().ok_or_else(|| {
        ShadegraphError::validation(format!("unknown texture '{name}' in processor description"))
    })
}

fn get_str(obj: &serde_json::Value, key: &str) -> ShadegraphResult<String> {
    let Some(v) = obj.get(key) else {
        return Err(ShadegraphError::validation(format!(
            "missing processor param '{key}'"
        )));
    };
    let Some(s) = v.as_str() else {
        return Err(ShadegraphError::validation(format!(
            "processor param '{key}' must be a string"
        )));
    };
    Ok(s.to_string())
}

fn get_f32(obj: &serde_json::Value, key: &str) -> ShadegraphResult<f32> {
    let Some(v) = obj.get(key) else {
        return Err(ShadegraphError::validation(format!(
            "missing processor param '{key}'"
        )));
    };
    let Some(n) = v.as_f64() else {
        return Err(ShadegraphError::validation(format!(
            "processor param '{key}' must be a number"
        )));
    };
    let n = n as f32;
    if !n.is_finite() {
        return Err(ShadegraphError::validation(format!(
            "processor param '{key}' must be finite"
        )));
    }
    Ok(n)
}

fn get_color(obj: &serde_json::Value, key: &str) -> ShadegraphResult<[f32; 4]> {
    let Some(v) = obj.get(key) else {
        return Err(ShadegraphError::validation(format!(
            "missing processor param '{key}'"
        )));
    };
    let Some(arr) = v.as_array() else {
        return Err(ShadegraphError::validation(format!(
            "processor param '{key}' must be [r,g,b,a]"
        )));
    };
    if arr.len() != 4 {
        return Err(ShadegraphError::validation(format!(
            "processor param '{key}' must have length 4"
        )));
    }
    let mut out = [0.0f32; 4];
    for (i, item) in arr.iter().enumerate() {
        out[i] = item.as_f64().ok_or_else(|| {
            ShadegraphError::validation(format!("processor param '{key}' entries must be numbers"))
        })? as f32;
    }
    Ok(out)
}

fn parse_bounds(params: &serde_json::Value) -> ShadegraphResult<Rect> {
    let Some(b) = params.get("bounds") else {
        return Err(ShadegraphError::validation(
            "missing processor param 'bounds'",
        ));
    };
    let field = |key: &str| -> ShadegraphResult<f64> {
        b.get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| {
                ShadegraphError::validation(format!("bounds.{key} must be a number"))
            })
    };
    let (x, y, w, h) = (field("x")?, field("y")?, field("w")?, field("h")?);
    if w < 0.0 || h < 0.0 {
        return Err(ShadegraphError::validation(
            "bounds extent must be non-negative",
        ));
    }
    Ok(Rect::new(x, y, x + w, y + h))
}

fn parse_color_xform(params: &serde_json::Value) -> ShadegraphResult<Option<Arc<ColorXform>>> {
    let Some(v) = params.get("color_xform") else {
        return Ok(None);
    };
    let Some(arr) = v.as_array() else {
        return Err(ShadegraphError::validation(
            "color_xform must be a row-major 9-element array",
        ));
    };
    if arr.len() != 9 {
        return Err(ShadegraphError::validation(
            "color_xform must have length 9",
        ));
    }
    let mut m = [[0.0f32; 3]; 3];
    for (i, item) in arr.iter().enumerate() {
        let n = item.as_f64().ok_or_else(|| {
            ShadegraphError::validation("color_xform entries must be numbers")
        })?;
        m[i / 3][i % 3] = n as f32;
    }
    Ok(Some(Arc::new(ColorXform::new(m))))
}

#[cfg(test)]
#[path = "../../tests/unit/processor/parse.rs"]
mod tests;
