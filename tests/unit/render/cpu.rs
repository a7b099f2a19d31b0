use super::*;

use kurbo::Rect;

use crate::{
    processor::alpha_threshold::AlphaThreshold,
    processor::const_color::ConstColor,
    resource::texture::{PixelFormat, TexelData, TextureDesc, TextureResource},
};

fn desc(width: u32, height: u32, format: PixelFormat) -> TextureDesc {
    TextureDesc {
        width,
        height,
        format,
        render_target: false,
        sample_count: 1,
        mip_mapped: false,
    }
}

#[test]
fn const_color_fills_uniformly() {
    let node = ConstColor::new([0.5, 0.25, 0.0, 1.0]).unwrap();
    let buf = render_to_rgba8(&node, 3, 2).unwrap();
    assert_eq!(buf.len(), 3 * 2 * 4);
    for px in buf.chunks_exact(4) {
        assert_eq!(px, &[128, 64, 0, 255]);
    }
}

#[test]
fn empty_target_is_rejected() {
    let node = ConstColor::new([0.0, 0.0, 0.0, 0.0]).unwrap();
    assert!(render_to_rgba8(&node, 0, 4).is_err());
    assert!(render_to_rgba8(&node, 4, 0).is_err());
}

#[test]
fn alpha_threshold_clears_only_masked_pixels() {
    let image = TextureResource::new(
        desc(2, 2, PixelFormat::Rgba8Premul),
        TexelData::Rgba8(vec![255; 2 * 2 * 4]),
    )
    .unwrap();
    // Mask covers only the top-left pixel.
    let mask = TextureResource::new(
        desc(2, 2, PixelFormat::Alpha8),
        TexelData::Alpha8(vec![255, 0, 0, 0]),
    )
    .unwrap();
    let node = AlphaThreshold::new(
        image,
        None,
        mask,
        0.0,
        1.0,
        Rect::new(0.0, 0.0, 2.0, 2.0),
    )
    .unwrap();

    let buf = render_to_rgba8(&node, 2, 2).unwrap();
    let px = |i: usize| &buf[i * 4..i * 4 + 4];
    assert_eq!(px(0), &[0, 0, 0, 0]);
    assert_eq!(px(1), &[255, 255, 255, 255]);
    assert_eq!(px(2), &[255, 255, 255, 255]);
    assert_eq!(px(3), &[255, 255, 255, 255]);
}
