use crate::error::RngError;
use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use zeroize::Zeroizing;

const KEY_LEN: usize = 32;
const BUFFER_LEN: usize = 512;

/// ChaCha20 keystream used as the random source for sampling.
///
/// Indices are drawn with rejection sampling so every position in a pool is
/// equally likely regardless of the pool size.
pub struct KeystreamRng {
    cipher: ChaCha20,
    buffer: Zeroizing<Vec<u8>>,
    pos: usize,
}

impl KeystreamRng {
    /// Keys the stream from the operating system CSPRNG.
    pub fn from_os_entropy() -> Result<Self, RngError> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        getrandom::fill(&mut key[..]).map_err(|e| RngError(e.to_string()))?;
        Ok(Self::from_key(&key))
    }

    /// Deterministic stream for reproducible runs. Never use for real output.
    pub fn seeded(seed: u64) -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key[..8].copy_from_slice(&seed.to_le_bytes());
        Self::from_key(&key)
    }

    fn from_key(key: &[u8; KEY_LEN]) -> Self {
        let mut cipher = ChaCha20::new(key.into(), &[0u8; 12].into());
        let mut buffer = Zeroizing::new(vec![0u8; BUFFER_LEN]);
        cipher.apply_keystream(&mut buffer);
        Self {
            cipher,
            buffer,
            pos: 0,
        }
    }

    fn next_u32(&mut self) -> u32 {
        if self.pos + 4 > self.buffer.len() {
            self.buffer.iter_mut().for_each(|b| *b = 0);
            self.cipher.apply_keystream(&mut self.buffer);
            self.pos = 0;
        }

        let bytes = [
            self.buffer[self.pos],
            self.buffer[self.pos + 1],
            self.buffer[self.pos + 2],
            self.buffer[self.pos + 3],
        ];
        self.pos += 4;
        u32::from_le_bytes(bytes)
    }

    /// Uniform index in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        assert!(bound > 0, "bound must be non-zero");
        assert!(bound as u64 <= u64::from(u32::MAX), "bound must fit in u32");
        let bound = bound as u64;

        let range = u64::from(u32::MAX) + 1;
        let rejection_threshold = range - (range % bound);

        loop {
            let value = u64::from(self.next_u32());
            if value < rejection_threshold {
                return (value % bound) as usize;
            }
        }
    }

    /// Fair coin flip.
    pub fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// `count` distinct indices from `0..len`, in random order.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        assert!(count <= len, "cannot draw {count} distinct items from {len}");
        let mut indices: Vec<usize> = (0..len).collect();
        for i in 0..count {
            let j = i + self.below(len - i);
            indices.swap(i, j);
        }
        indices.truncate(count);
        indices
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.below(items.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seeded_deterministic() {
        let mut a = KeystreamRng::seeded(7);
        let mut b = KeystreamRng::seeded(7);
        let xs: Vec<usize> = (0..64).map(|_| a.below(7776)).collect();
        let ys: Vec<usize> = (0..64).map(|_| b.below(7776)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = KeystreamRng::seeded(1);
        let mut b = KeystreamRng::seeded(2);
        let xs: Vec<usize> = (0..32).map(|_| a.below(1000)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.below(1000)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_os_entropy_streams_differ() {
        let mut a = KeystreamRng::from_os_entropy().unwrap();
        let mut b = KeystreamRng::from_os_entropy().unwrap();
        let xs: Vec<usize> = (0..32).map(|_| a.below(1 << 20)).collect();
        let ys: Vec<usize> = (0..32).map(|_| b.below(1 << 20)).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_below_in_range_across_refills() {
        let mut rng = KeystreamRng::seeded(42);
        // Enough draws to refill the buffer several times.
        for _ in 0..(BUFFER_LEN * 4) {
            assert!(rng.below(10) < 10);
        }
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn test_below_covers_small_range() {
        let mut rng = KeystreamRng::seeded(3);
        let seen: HashSet<usize> = (0..500).map(|_| rng.below(6)).collect();
        assert_eq!(seen.len(), 6, "Every face should appear in 500 draws");
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = KeystreamRng::seeded(9);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(items, sorted, "50 items should not stay in order");
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = KeystreamRng::seeded(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&["only"]), Some(&"only"));
    }

    #[test]
    fn test_sample_indices_distinct() {
        let mut rng = KeystreamRng::seeded(11);
        let picked = rng.sample_indices(10, 10);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(picked.iter().all(|&i| i < 10));

        assert!(rng.sample_indices(5, 0).is_empty());
        assert_eq!(rng.sample_indices(4, 3).len(), 3);
    }

    #[test]
    #[should_panic(expected = "bound must be non-zero")]
    fn test_below_zero_panics() {
        KeystreamRng::seeded(0).below(0);
    }
}
