use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random DNA of the given length; the same seed always gives the same sequence
pub fn random_dna(length: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..length)
        .map(|_| b"ACGT"[rng.gen_range(0..4)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_dna() {
        let dna = random_dna(500, 11);
        assert_eq!(dna.len(), 500);
        assert!(dna.iter().all(|c| b"ACGT".contains(c)));
        assert_eq!(dna, random_dna(500, 11));
        assert_ne!(dna, random_dna(500, 12));
    }
}
