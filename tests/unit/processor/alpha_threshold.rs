use super::*;
use crate::resource::texture::{PixelFormat, TexelData, TextureDesc};

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

/// 1x1 premultiplied image with alpha = 153/255 (0.6).
fn image_1x1() -> Arc<TextureResource> {
    TextureResource::new(
        desc(1, 1, PixelFormat::Rgba8Premul),
        TexelData::Rgba8(vec![77, 77, 77, 153]),
    )
    .unwrap()
}

fn mask_1x1(alpha: u8) -> Arc<TextureResource> {
    TextureResource::new(
        desc(1, 1, PixelFormat::Alpha8),
        TexelData::Alpha8(vec![alpha]),
    )
    .unwrap()
}

fn unit_bounds() -> Rect {
    Rect::new(0.0, 0.0, 1.0, 1.0)
}

#[test]
fn clone_is_equal() {
    let node = AlphaThreshold::new(
        image_1x1(),
        Some(Arc::new(ColorXform::IDENTITY)),
        mask_1x1(255),
        0.25,
        0.75,
        unit_bounds(),
    )
    .unwrap();
    let copy = node.clone();
    assert!(copy.is_equal(&node));
    assert_eq!(copy.shader_key(), node.shader_key());
}

#[test]
fn equality_matches_key_equality() {
    let image = image_1x1();
    let mask = mask_1x1(255);

    let a = AlphaThreshold::new(image.clone(), None, mask.clone(), 0.2, 0.8, unit_bounds())
        .unwrap();
    let b = AlphaThreshold::new(image.clone(), None, mask.clone(), 0.2, 0.8, unit_bounds())
        .unwrap();
    assert!(a.is_equal(&b));
    assert_eq!(a.shader_key(), b.shader_key());

    // Different threshold.
    let c = AlphaThreshold::new(image.clone(), None, mask.clone(), 0.2, 0.9, unit_bounds())
        .unwrap();
    assert!(!a.is_equal(&c));
    assert_ne!(a.shader_key(), c.shader_key());

    // Different mask resource, same parameters.
    let d = AlphaThreshold::new(image.clone(), None, mask_1x1(255), 0.2, 0.8, unit_bounds())
        .unwrap();
    assert!(!a.is_equal(&d));
    assert_ne!(a.shader_key(), d.shader_key());

    // Color transform present vs absent.
    let e = AlphaThreshold::new(
        image,
        Some(Arc::new(ColorXform::IDENTITY)),
        mask,
        0.2,
        0.8,
        unit_bounds(),
    )
    .unwrap();
    assert!(!a.is_equal(&e));
    assert_ne!(a.shader_key(), e.shader_key());
}

#[test]
fn opt_flags_require_exact_full_outer_threshold() {
    assert_eq!(
        AlphaThreshold::opt_flags(1.0),
        OptimizationFlags::PRESERVES_OPAQUE_INPUT
    );
    assert_eq!(AlphaThreshold::opt_flags(0.75), OptimizationFlags::NONE);
    assert_eq!(AlphaThreshold::opt_flags(0.999_999), OptimizationFlags::NONE);

    let node = AlphaThreshold::new(image_1x1(), None, mask_1x1(0), 0.0, 1.0, unit_bounds())
        .unwrap();
    assert!(
        node.optimization_flags()
            .contains(OptimizationFlags::PRESERVES_OPAQUE_INPUT)
    );
}

#[test]
fn mask_transform_negates_bounds_origin() {
    let node = AlphaThreshold::new(
        image_1x1(),
        None,
        mask_1x1(255),
        0.0,
        1.0,
        Rect::new(10.0, 20.0, 42.0, 52.0),
    )
    .unwrap();

    let xforms = node.coord_transforms();
    assert_eq!(xforms.len(), 2);
    assert_eq!(xforms[0].matrix(), Affine::IDENTITY);
    assert_eq!(xforms[1].matrix(), Affine::translate((-10.0, -20.0)));
    assert_eq!(xforms[1].texture(), node.samplers()[1].resource_id());
}

#[test]
fn registers_image_then_mask() {
    let image = image_1x1();
    let mask = mask_1x1(255);
    let node = AlphaThreshold::new(image.clone(), None, mask.clone(), 0.0, 1.0, unit_bounds())
        .unwrap();

    let samplers = node.samplers();
    assert_eq!(samplers.len(), 2);
    assert_eq!(samplers[0].resource_id(), image.id());
    assert_eq!(samplers[1].resource_id(), mask.id());
}

#[test]
fn outside_mask_with_full_outer_threshold_is_identity() {
    let node = AlphaThreshold::new(image_1x1(), None, mask_1x1(0), 0.0, 1.0, unit_bounds())
        .unwrap();
    let out = node.eval(Point::new(0.5, 0.5));
    assert_eq!(out[3], 153.0 / 255.0);
    assert_eq!(out[0], 77.0 / 255.0);
}

#[test]
fn inside_mask_with_zero_inner_threshold_clears_alpha() {
    let node = AlphaThreshold::new(image_1x1(), None, mask_1x1(255), 0.0, 1.0, unit_bounds())
        .unwrap();
    let out = node.eval(Point::new(0.5, 0.5));
    assert_eq!(out, [0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn capping_rescales_color_channels() {
    // Inside the mask with inner threshold 0.3: alpha 0.6 is halved, and the
    // premultiplied channels scale with it.
    let node = AlphaThreshold::new(image_1x1(), None, mask_1x1(255), 0.3, 1.0, unit_bounds())
        .unwrap();
    let out = node.eval(Point::new(0.5, 0.5));
    assert_eq!(out[3], 0.3);
    let expected = (77.0 / 255.0) * (0.3 / (153.0 / 255.0));
    assert!((out[0] - expected).abs() < 1e-6);
}

#[test]
fn color_xform_applies_before_thresholding() {
    let swap = ColorXform::new([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    let image = TextureResource::new(
        desc(1, 1, PixelFormat::Rgba8Premul),
        TexelData::Rgba8(vec![255, 0, 0, 255]),
    )
    .unwrap();
    let node = AlphaThreshold::new(
        image,
        Some(Arc::new(swap)),
        mask_1x1(0),
        0.0,
        1.0,
        unit_bounds(),
    )
    .unwrap();
    let out = node.eval(Point::new(0.5, 0.5));
    assert_eq!(out, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn rejects_contract_violations() {
    let image = image_1x1();
    let mask = mask_1x1(255);

    assert!(
        AlphaThreshold::new(image.clone(), None, image.clone(), 0.0, 1.0, unit_bounds())
            .is_err()
    );
    for bad in [f32::NAN, -0.1, 1.5] {
        assert!(
            AlphaThreshold::new(image.clone(), None, mask.clone(), bad, 1.0, unit_bounds())
                .is_err()
        );
        assert!(
            AlphaThreshold::new(image.clone(), None, mask.clone(), 0.0, bad, unit_bounds())
                .is_err()
        );
    }
}
