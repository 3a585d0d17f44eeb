// src/eligibility/annotator/vectors.rs
//! Word vectors and the similarity score built on them

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::eligibility::EngineError;

/// Unit-length word vectors keyed by lowercase word.
#[derive(Debug, Clone, Default)]
pub struct WordVectors {
    dim: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Build from in-memory pairs; zero vectors and mismatched dimensions are skipped
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut vectors = Self::default();
        for (word, vector) in pairs {
            if vectors.dim == 0 {
                vectors.dim = vector.len();
            }
            if vector.len() == vectors.dim {
                vectors.insert(word.into(), vector);
            }
        }
        vectors
    }

    /// Load a GloVe-style text file (`word v1 v2 ...`), optionally with a
    /// word2vec `<count> <dim>` header line
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let file = std::fs::File::open(path).map_err(|source| EngineError::ModelUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);

        let mut vectors = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.map_err(|e| EngineError::InvalidModel {
                path: path.to_path_buf(),
                line: line_no,
                reason: e.to_string(),
            })?;

            vectors
                .parse_line(&line, line_no)
                .map_err(|reason| EngineError::InvalidModel {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason,
                })?;
        }

        if vectors.is_empty() {
            return Err(EngineError::InvalidModel {
                path: path.to_path_buf(),
                line: 0,
                reason: "no word vectors found".to_string(),
            });
        }
        Ok(vectors)
    }

    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<(), String> {
        let mut fields = line.split_whitespace();
        let Some(word) = fields.next() else {
            return Ok(());
        };
        let values: Vec<&str> = fields.collect();

        if line_no == 1 && values.len() == 1 && word.parse::<usize>().is_ok() {
            return Ok(());
        }

        let vector = values
            .iter()
            .map(|v| v.parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("bad component for '{}': {}", word, e))?;

        if self.dim == 0 {
            self.dim = vector.len();
        } else if vector.len() != self.dim {
            return Err(format!(
                "vector for '{}' has {} dimensions, expected {}",
                word,
                vector.len(),
                self.dim
            ));
        }

        self.insert(word.to_string(), vector);
        Ok(())
    }

    fn insert(&mut self, word: String, mut vector: Vec<f32>) {
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return;
        }
        vector.iter_mut().for_each(|v| *v /= norm);
        self.vectors.entry(word.to_lowercase()).or_insert(vector);
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(&word.to_lowercase())
    }

    /// Semantic similarity of two words.
    ///
    /// Identical words score 1.0; otherwise the cosine of their vectors, or 0.0
    /// when either word has none.
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        if a == b {
            return 1.0;
        }
        match (self.vectors.get(&a), self.vectors.get(&b)) {
            (Some(va), Some(vb)) => va.iter().zip(vb).map(|(x, y)| x * y).sum(),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WordVectors {
        WordVectors::from_pairs(vec![
            ("many", vec![1.0, 0.0, 0.0]),
            ("several", vec![0.9, 0.1, 0.0]),
            ("strong", vec![0.0, 1.0, 0.0]),
            ("zero", vec![0.0, 0.0, 0.0]),
        ])
    }

    #[test]
    fn test_identical_words_score_one() {
        let vectors = sample();
        assert_eq!(vectors.similarity("many", "many"), 1.0);
        assert_eq!(vectors.similarity("unseen", "unseen"), 1.0);
    }

    #[test]
    fn test_cosine_similarity() {
        let vectors = sample();
        let sim = vectors.similarity("many", "several");
        assert!(sim > 0.99 && sim < 1.0, "unexpected similarity {}", sim);
        assert!(vectors.similarity("many", "strong").abs() < 1e-6);
    }

    #[test]
    fn test_missing_vectors_score_zero() {
        let vectors = sample();
        assert_eq!(vectors.similarity("many", "unseen"), 0.0);
        assert_eq!(vectors.similarity("zero", "many"), 0.0);
        assert!(!vectors.contains("zero"));
    }

    #[test]
    fn test_parse_glove_lines_with_header() {
        let mut vectors = WordVectors::default();
        vectors.parse_line("2 3", 1).unwrap();
        vectors.parse_line("fluent 0.1 0.2 0.3", 2).unwrap();
        vectors.parse_line("native 0.1 0.2 0.25", 3).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors.dim(), 3);
        assert!(vectors.parse_line("broken 0.1 0.2", 4).is_err());
        assert!(vectors.parse_line("broken 0.1 x 0.2", 5).is_err());
    }

    #[test]
    fn test_load_missing_file_is_model_unavailable() {
        let path = std::env::temp_dir().join("jobscout-missing-vectors.txt");
        let err = WordVectors::load(&path).unwrap_err();
        assert!(matches!(err, EngineError::ModelUnavailable { .. }));
    }
}
