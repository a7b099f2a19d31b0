use super::*;

#[test]
fn identical_write_sequences_produce_equal_keys() {
    let build = || {
        let mut b = ShaderKeyBuilder::new();
        b.write_u32(3);
        b.write_f32(0.5);
        b.write_bool(true);
        b.write_f64(-1.25);
        b.finish()
    };
    let a = build();
    let b = build();
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn word_order_matters() {
    let mut a = ShaderKeyBuilder::new();
    a.write_u32(1);
    a.write_u32(2);
    let mut b = ShaderKeyBuilder::new();
    b.write_u32(2);
    b.write_u32(1);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn encodings_are_word_exact() {
    let mut b = ShaderKeyBuilder::new();
    b.write_u64(1);
    b.write_bool(false);
    b.write_f32(1.0);
    let key = b.finish();
    assert_eq!(key.as_words(), &[1, 0, 0, 0x3F80_0000]);
}

#[test]
fn float_bit_patterns_distinguish_signed_zero() {
    let mut a = ShaderKeyBuilder::new();
    a.write_f32(0.0);
    let mut b = ShaderKeyBuilder::new();
    b.write_f32(-0.0);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn builder_length_tracks_writes() {
    let mut b = ShaderKeyBuilder::new();
    assert!(b.is_empty());
    b.write_f64(2.0);
    b.write_u32(9);
    assert_eq!(b.len(), 3);
}
