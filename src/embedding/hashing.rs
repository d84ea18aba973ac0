use super::{EmbeddingError, EmbeddingModel, Result};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic feature-hashing embedder.
///
/// Each lower-cased alphanumeric token is hashed with FNV-1a into one of
/// `dim` buckets and added with a sign taken from the hash's top bit. Texts
/// sharing words score higher; there is no semantic understanding. Empty text
/// yields the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(EmbeddingError::ConfigError {
                message: "hashing dimension must be at least 1".to_string(),
            });
        }
        Ok(Self { dim })
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

impl EmbeddingModel for HashingEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dim];
        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            embedding[bucket] += sign;
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "feature-hashing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let model = HashingEmbedder::new(16).unwrap();
        let v = model.encode("").unwrap();
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));

        let v = model.encode("  ...  ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let model = HashingEmbedder::new(384).unwrap();
        let text = "A thief who steals corporate secrets through dream-sharing technology";
        assert_eq!(model.encode(text).unwrap(), model.encode(text).unwrap());
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let model = HashingEmbedder::new(128).unwrap();
        assert_eq!(
            model.encode("A Hero, saves the World!").unwrap(),
            model.encode("a hero saves the world").unwrap()
        );
    }

    #[test]
    fn test_fnv1a_known_value() {
        // FNV-1a 64 of "a"
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
