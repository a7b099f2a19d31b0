use super::*;

fn plain_desc(width: u32, height: u32, format: PixelFormat) -> TextureDesc {
    TextureDesc {
        width,
        height,
        format,
        render_target: false,
        sample_count: 1,
        mip_mapped: false,
    }
}

fn alpha_1x1() -> Arc<TextureResource> {
    TextureResource::new(
        plain_desc(1, 1, PixelFormat::Alpha8),
        TexelData::Alpha8(vec![255]),
    )
    .unwrap()
}

#[test]
fn mip_state_machine_dirty_then_clean() {
    let tex = alpha_1x1();
    let internals = tex.internals();

    assert!(!internals.has_mip_maps());
    assert!(internals.mip_maps_are_dirty());

    internals.mark_mip_maps_dirty();
    assert!(internals.has_mip_maps());
    assert!(internals.mip_maps_are_dirty());

    internals.mark_mip_maps_clean();
    assert!(!internals.mip_maps_are_dirty());
    assert!(internals.has_mip_maps());

    internals.mark_mip_maps_dirty();
    assert!(internals.mip_maps_are_dirty());
}

#[test]
fn clean_without_allocation_is_a_noop() {
    let tex = alpha_1x1();
    tex.internals().mark_mip_maps_clean();
    assert!(!tex.internals().has_mip_maps());
    assert!(tex.internals().mip_maps_are_dirty());
}

#[test]
fn mip_mapped_texture_starts_dirty_with_full_chain() {
    let tex = TextureResource::new(
        TextureDesc {
            mip_mapped: true,
            ..plain_desc(16, 8, PixelFormat::Rgba8Premul)
        },
        TexelData::Rgba8(vec![0; 16 * 8 * 4]),
    )
    .unwrap();
    let internals = tex.internals();
    assert!(internals.has_mip_maps());
    assert!(internals.mip_maps_are_dirty());
    assert_eq!(internals.max_mip_map_level(), 4);
}

#[test]
fn max_mip_level_returns_last_set_value() {
    let tex = alpha_1x1();
    tex.internals().set_max_mip_map_level(3);
    assert_eq!(tex.internals().max_mip_map_level(), 3);
    tex.internals().set_max_mip_map_level(7);
    assert_eq!(tex.internals().max_mip_map_level(), 7);
}

#[test]
fn mip_color_mode_roundtrips() {
    let tex = alpha_1x1();
    assert_eq!(tex.internals().mip_color_mode(), MipColorMode::Gamma);
    tex.internals().set_mip_color_mode(MipColorMode::Linear);
    assert_eq!(tex.internals().mip_color_mode(), MipColorMode::Linear);
}

#[test]
fn sampler_metadata_derives_from_format() {
    let alpha = alpha_1x1();
    assert_eq!(alpha.internals().sampler_kind(), SamplerKind::Alpha2d);
    assert_eq!(alpha.internals().highest_filter_mode(), FilterMode::Bilinear);

    let float = TextureResource::new(
        plain_desc(1, 1, PixelFormat::RgbaF32),
        TexelData::RgbaF32(vec![0.0, 0.0, 0.0, 1.0]),
    )
    .unwrap();
    assert_eq!(float.internals().sampler_kind(), SamplerKind::Norm2d);
    assert_eq!(float.internals().highest_filter_mode(), FilterMode::Nearest);
}

#[test]
fn resource_ids_are_unique() {
    let a = alpha_1x1();
    let b = alpha_1x1();
    assert_ne!(a.id(), b.id());
}

#[test]
fn from_image_premultiplies() {
    let img = image::RgbaImage::from_raw(1, 1, vec![255, 255, 255, 128]).unwrap();
    let tex = TextureResource::from_image(&img, false).unwrap();
    assert_eq!(tex.desc().format, PixelFormat::Rgba8Premul);
    let px = tex.texel(0, 0);
    assert_eq!(px[0], 128.0 / 255.0);
    assert_eq!(px[3], 128.0 / 255.0);
}

#[test]
fn new_rejects_contract_violations() {
    assert!(
        TextureResource::new(
            plain_desc(0, 1, PixelFormat::Alpha8),
            TexelData::Alpha8(vec![]),
        )
        .is_err()
    );
    // Length mismatch.
    assert!(
        TextureResource::new(
            plain_desc(2, 2, PixelFormat::Alpha8),
            TexelData::Alpha8(vec![0; 3]),
        )
        .is_err()
    );
    // Storage kind mismatch.
    assert!(
        TextureResource::new(
            plain_desc(1, 1, PixelFormat::Rgba8Premul),
            TexelData::Alpha8(vec![0]),
        )
        .is_err()
    );
    // Multisampling without a render target.
    assert!(
        TextureResource::new(
            TextureDesc {
                sample_count: 4,
                ..plain_desc(1, 1, PixelFormat::Alpha8)
            },
            TexelData::Alpha8(vec![0]),
        )
        .is_err()
    );
}

#[test]
fn scratch_key_tracks_shape() {
    let a = plain_desc(16, 16, PixelFormat::Rgba8Premul);
    let same_shape = plain_desc(16, 16, PixelFormat::Rgba8Premul);
    assert_eq!(scratch_key(&a), scratch_key(&same_shape));

    let wider = TextureDesc { width: 32, ..a };
    let mipped = TextureDesc {
        mip_mapped: true,
        ..a
    };
    let other_format = TextureDesc {
        format: PixelFormat::Alpha8,
        ..a
    };
    assert_ne!(scratch_key(&a), scratch_key(&wider));
    assert_ne!(scratch_key(&a), scratch_key(&mipped));
    assert_ne!(scratch_key(&a), scratch_key(&other_format));
}
