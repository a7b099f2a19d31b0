use crate::foundation::math::Fnv1a64;

/// Deterministic encoding of a node's equality-relevant parameters.
///
/// Keys stand in for compiled backend programs: equal nodes produce equal
/// keys, so a key can index a program cache. The encoding is a plain
/// sequence of `u32` words — backend-agnostic, order-sensitive, with no
/// hashing until a digest is explicitly requested.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShaderKey {
    words: Vec<u32>,
}

impl ShaderKey {
    /// The raw encoded words.
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }

    /// 64-bit digest of the key, for logging and diagnostics only.
    ///
    /// Cache lookups use the full key; the digest is not collision-free.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        for w in &self.words {
            h.write_u32(*w);
        }
        h.finish()
    }
}

/// Field-by-field writer used by
/// [`FragmentProcessor::emit_shader_key`](crate::FragmentProcessor::emit_shader_key).
///
/// Every write appends whole words, so distinct field sequences cannot
/// alias; floats are encoded by bit pattern to keep the key free of
/// rounding ambiguity.
#[derive(Debug, Default)]
pub struct ShaderKeyBuilder {
    words: Vec<u32>,
}

impl ShaderKeyBuilder {
    /// Fresh, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one word.
    pub fn write_u32(&mut self, v: u32) {
        self.words.push(v);
    }

    /// Append a 64-bit value as two words (low word first).
    pub fn write_u64(&mut self, v: u64) {
        self.write_u32(v as u32);
        self.write_u32((v >> 32) as u32);
    }

    /// Append a boolean as one word.
    pub fn write_bool(&mut self, v: bool) {
        self.write_u32(u32::from(v));
    }

    /// Append an `f32` by bit pattern.
    pub fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    /// Append an `f64` by bit pattern.
    pub fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    /// Number of words written so far.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Freeze the accumulated words into a [`ShaderKey`].
    pub fn finish(self) -> ShaderKey {
        ShaderKey { words: self.words }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/key.rs"]
mod tests;
