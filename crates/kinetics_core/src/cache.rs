//! # Content-Addressed Result Cache
//!
//! Results are keyed by a SHA-256 of the sorted sample set plus a digest of
//! the configuration, never by object identity. The cache is a plain value
//! owned by the caller; nothing here is global.

use std::sync::Arc;

use fxhash::FxHashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::trace;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{sort_stream, PositionSample};
use crate::pipeline::{analyze_stream, StreamAnalysis};

#[inline]
fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Stable digest of the ordered sample set. Floats are hashed bit-exact, so
/// any change to any coordinate changes the digest while input order does not.
pub fn stream_digest(samples: &[PositionSample]) -> String {
    let mut hasher = Sha256::new();
    for s in sort_stream(samples) {
        hasher.update(s.frame_index.to_le_bytes());
        hasher.update(s.timestamp_ms.to_bits().to_le_bytes());
        for v in [s.bbox.x, s.bbox.y, s.bbox.width, s.bbox.height, s.confidence] {
            hasher.update(v.to_bits().to_le_bytes());
        }
        hasher.update((s.keypoints.len() as u32).to_le_bytes());
        for kp in &s.keypoints {
            hasher.update([kp.part.tag()]);
            for v in [kp.x, kp.y, kp.confidence] {
                hasher.update(v.to_bits().to_le_bytes());
            }
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Digest of any serializable configuration.
pub fn config_digest<T: Serialize>(config: &T) -> Result<String> {
    Ok(sha256_hex(&serde_json::to_vec(config)?))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub stream: String,
    pub config: String,
}

impl CacheKey {
    pub fn new(samples: &[PositionSample], config: &AnalysisConfig) -> Result<Self> {
        Ok(Self { stream: stream_digest(samples), config: config_digest(config)? })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Caller-owned map from (stream digest, config digest) to a shared result.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: FxHashMap<CacheKey, Arc<StreamAnalysis>>,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached analysis for this stream and config, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        samples: &[PositionSample],
        config: &AnalysisConfig,
    ) -> Result<Arc<StreamAnalysis>> {
        let key = CacheKey::new(samples, config)?;
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            trace!(stream = %key.stream, "cache: hit");
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        trace!(stream = %key.stream, "cache: miss");
        let analysis = Arc::new(analyze_stream(samples, config));
        self.entries.insert(key, Arc::clone(&analysis));
        Ok(analysis)
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<StreamAnalysis>> {
        self.entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { hits: self.hits, misses: self.misses, entries: self.entries.len() }
    }
}
