//! Feature-hashing embedder.
//!
//! Terms are hashed into fixed-dimension buckets with a sign bit, weighted by
//! sublinear term frequency, and L2-normalized. Deterministic and always
//! available; cosine similarity approximates weighted term overlap.

use std::collections::HashMap;

use citespine_core::errors::CiteResult;
use citespine_core::traits::IQueryEmbedder;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "is", "it",
    "of", "on", "or", "that", "the", "to", "what", "when", "which", "who", "with",
];

pub struct HashedEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_id: format!("hashed-{dimensions}"),
        }
    }

    /// FNV-1a.
    fn hash_term(term: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .filter(|s| !STOP_WORDS.contains(&s.as_str()))
    }

    /// Embed synchronously. Used directly by ingestion tooling and tests.
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut tf: HashMap<String, u32> = HashMap::new();
        for tok in Self::tokenize(text) {
            *tf.entry(tok).or_default() += 1;
        }

        let mut vec = vec![0.0f32; self.dimensions];
        if tf.is_empty() || self.dimensions == 0 {
            return vec;
        }

        for (term, count) in &tf {
            let h = Self::hash_term(term);
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
            vec[bucket] += sign * (1.0 + (*count as f32).ln());
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IQueryEmbedder for HashedEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> CiteResult<Vec<f32>> {
        Ok(self.embed_sync(text))
    }
}
