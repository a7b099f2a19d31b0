use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    compile::key::ShaderKey,
    foundation::error::ShadegraphResult,
    processor::node::FragmentProcessor,
};

/// Deduplicating cache of backend-compiled programs keyed by shader key.
///
/// The backend compiler stays external: callers pass the compile step as a
/// closure and the cache guarantees it runs at most once per distinct key.
/// Programs are shared out behind `Arc`, so entries stay alive for their
/// longest holder even across [`ProgramCache::clear`].
pub struct ProgramCache<P> {
    programs: HashMap<ShaderKey, Arc<P>>,
    hits: u64,
    misses: u64,
}

impl<P> ProgramCache<P> {
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            programs: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached program for `processor`'s shader key, compiling it
    /// with `compile` on first use.
    ///
    /// A failed compile is not cached; the next lookup retries.
    pub fn get_or_compile<F>(
        &mut self,
        processor: &FragmentProcessor,
        compile: F,
    ) -> ShadegraphResult<Arc<P>>
    where
        F: FnOnce(&FragmentProcessor) -> ShadegraphResult<P>,
    {
        let key = processor.shader_key();
        if let Some(program) = self.programs.get(&key) {
            self.hits += 1;
            tracing::trace!(
                name = processor.name(),
                digest = key.digest(),
                "program cache hit"
            );
            return Ok(program.clone());
        }

        self.misses += 1;
        tracing::debug!(
            name = processor.name(),
            digest = key.digest(),
            "program cache miss, compiling"
        );
        let program = Arc::new(compile(processor)?);
        self.programs.insert(key, program.clone());
        Ok(program)
    }

    /// Number of distinct programs currently cached.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the cache holds no programs.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that required a compile.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop all cached programs (counters are kept).
    pub fn clear(&mut self) {
        self.programs.clear();
    }
}

impl<P> Default for ProgramCache<P> {
    fn default() -> Self {
        Self::new()
    }
}
