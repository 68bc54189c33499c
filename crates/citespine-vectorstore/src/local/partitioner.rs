//! Seeded random-hyperplane partitioner.
//!
//! Each of `bits` hyperplanes contributes one sign bit, so nearby vectors
//! tend to share a partition. Probing visits partitions in increasing
//! Hamming distance from the query's own partition.

#[derive(Debug, Clone)]
pub struct HyperplanePartitioner {
    planes: Vec<Vec<f32>>,
    dimensions: usize,
}

impl HyperplanePartitioner {
    pub fn new(bits: u32, seed: u64, dimensions: usize) -> Self {
        let mut state = seed;
        let planes = (0..bits)
            .map(|_| {
                (0..dimensions)
                    .map(|_| {
                        // Uniform in [-1, 1).
                        let r = splitmix64(&mut state);
                        ((r >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
                    })
                    .collect()
            })
            .collect();
        Self { planes, dimensions }
    }

    pub fn bits(&self) -> u32 {
        self.planes.len() as u32
    }

    pub fn partition_count(&self) -> u32 {
        1u32 << self.bits()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn partition_of(&self, embedding: &[f32]) -> u32 {
        self.planes
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, plane)| {
                let dot: f32 = plane.iter().zip(embedding).map(|(p, x)| p * x).sum();
                if dot >= 0.0 {
                    acc | (1 << i)
                } else {
                    acc
                }
            })
    }

    /// All partitions, nearest first: Hamming distance from `home`, then id.
    pub fn probe_order(&self, home: u32) -> Vec<u32> {
        let mut order: Vec<u32> = (0..self.partition_count()).collect();
        order.sort_by_key(|p| ((p ^ home).count_ones(), *p));
        order
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_partitions() {
        let a = HyperplanePartitioner::new(4, 7, 16);
        let b = HyperplanePartitioner::new(4, 7, 16);
        let v: Vec<f32> = (0..16).map(|i| (i as f32 * 0.37).sin()).collect();
        assert_eq!(a.partition_of(&v), b.partition_of(&v));
    }

    #[test]
    fn probe_order_starts_home_and_covers_all() {
        let p = HyperplanePartitioner::new(3, 1, 8);
        let order = p.probe_order(5);
        assert_eq!(order[0], 5);
        assert_eq!(order.len(), 8);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..8).collect::<Vec<_>>());
        // Distance never decreases along the order.
        let dists: Vec<u32> = order.iter().map(|q| (q ^ 5).count_ones()).collect();
        assert!(dists.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn zero_bits_is_single_partition() {
        let p = HyperplanePartitioner::new(0, 1, 8);
        assert_eq!(p.partition_count(), 1);
        assert_eq!(p.partition_of(&[1.0; 8]), 0);
    }
}
