//! Content similarity over catalog metadata.
//!
//! Each game becomes one document: its name, developer, publisher,
//! platforms and genre tags joined into a single text. Documents are
//! weighted with smoothed tf-idf, l2-normalized, and compared by cosine
//! similarity; the recommender returns the top-scoring other games for a
//! probe record.

use indexmap::{IndexMap, IndexSet};

use crate::catalog::GameRecord;

/// How many similar games the catalog surfaces by default.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;

/// One recommended game with its similarity to the probe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// Normalized name of the recommended game.
    pub name: String,
    /// Cosine similarity in `[0, 1]`.
    pub score: f64,
}

/// A fitted tf-idf index over the catalog.
#[derive(Debug, Clone)]
pub struct Recommender {
    names: Vec<String>,
    vocabulary: IndexMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<IndexMap<usize, f64>>,
}

impl Recommender {
    /// Builds the index from catalog records.
    #[must_use]
    pub fn fit(records: &[GameRecord]) -> Self {
        let documents: Vec<Vec<String>> = records
            .iter()
            .map(|record| tokenize(&content(record)))
            .collect();

        let mut vocabulary: IndexMap<String, usize> = IndexMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for tokens in &documents {
            let unique: IndexSet<&String> = tokens.iter().collect();
            for token in unique {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if id == document_frequency.len() {
                    document_frequency.push(0);
                }
                document_frequency[id] += 1;
            }
        }

        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| smooth_idf(records.len(), df))
            .collect();
        let vectors = documents
            .iter()
            .map(|tokens| vectorize(tokens, &vocabulary, &idf))
            .collect();
        let names = records
            .iter()
            .map(|record| record.name.trim().to_lowercase())
            .collect();

        Self {
            names,
            vocabulary,
            idf,
            vectors,
        }
    }

    /// Number of indexed games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The `k` games most similar to the probe, best first.
    ///
    /// A probe naming an indexed game reuses that game's document and is
    /// excluded from its own results; any other probe is scored as a
    /// transient extra document against the fitted vocabulary.
    #[must_use]
    pub fn recommend(&self, probe: &GameRecord, k: usize) -> Vec<Recommendation> {
        let probe_name = probe.name.trim().to_lowercase();
        let probe_index = self.names.iter().position(|name| *name == probe_name);
        let probe_vector = match probe_index {
            Some(index) => self.vectors[index].clone(),
            None => vectorize(&tokenize(&content(probe)), &self.vocabulary, &self.idf),
        };

        let mut scored: Vec<Recommendation> = self
            .names
            .iter()
            .zip(&self.vectors)
            .enumerate()
            .filter(|(index, _)| Some(*index) != probe_index)
            .map(|(_, (name, vector))| Recommendation {
                name: name.clone(),
                score: cosine(&probe_vector, vector),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        scored
    }
}

/// The concatenated metadata text behind one document.
fn content(record: &GameRecord) -> String {
    format!(
        "{};{};{};{};{}",
        record.name, record.developer, record.publisher, record.platforms, record.genres
    )
}

/// Word tokens of at least two characters, lower-cased.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(ToOwned::to_owned)
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn smooth_idf(document_count: usize, document_frequency: usize) -> f64 {
    ((1 + document_count) as f64 / (1 + document_frequency) as f64).ln() + 1.0
}

/// Sparse l2-normalized tf-idf vector for one token list. Tokens outside
/// the fitted vocabulary are ignored.
fn vectorize(
    tokens: &[String],
    vocabulary: &IndexMap<String, usize>,
    idf: &[f64],
) -> IndexMap<usize, f64> {
    let mut weights: IndexMap<usize, f64> = IndexMap::new();
    for token in tokens {
        if let Some(&id) = vocabulary.get(token) {
            *weights.entry(id).or_insert(0.0) += 1.0;
        }
    }
    for (id, weight) in &mut weights {
        *weight *= idf[*id];
    }
    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in weights.values_mut() {
            *weight /= norm;
        }
    }
    weights
}

fn cosine(a: &IndexMap<usize, f64>, b: &IndexMap<usize, f64>) -> f64 {
    a.iter()
        .filter_map(|(id, weight)| b.get(id).map(|other| weight * other))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, developer: &str, genres: &str) -> GameRecord {
        GameRecord {
            name: name.to_owned(),
            developer: developer.to_owned(),
            publisher: "publisher".to_owned(),
            english: true,
            positive_ratings: 100,
            negative_ratings: 10,
            genres: genres.to_owned(),
            platforms: "windows".to_owned(),
            price: 9.99,
        }
    }

    fn catalog() -> Vec<GameRecord> {
        vec![
            record("Halo", "Bungie", "Action;FPS"),
            record("Halo 2", "Bungie", "Action;FPS"),
            record("Myst", "Cyan", "Puzzle;Adventure"),
        ]
    }

    #[test]
    fn probe_matching_an_indexed_game_reuses_its_row_and_skips_itself() {
        let records = catalog();
        let recommender = Recommender::fit(&records);
        let results = recommender.recommend(&records[0], DEFAULT_RECOMMENDATIONS);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.name != "halo"));
    }

    #[test]
    fn shared_metadata_ranks_higher() {
        let records = catalog();
        let recommender = Recommender::fit(&records);
        let results = recommender.recommend(&records[0], 2);
        assert_eq!(results[0].name, "halo 2");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn scores_are_in_descending_order() {
        let records = catalog();
        let recommender = Recommender::fit(&records);
        let results = recommender.recommend(&records[2], DEFAULT_RECOMMENDATIONS);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn unknown_probe_is_scored_as_a_transient_document() {
        let records = catalog();
        let recommender = Recommender::fit(&records);
        let probe = record("Halo 3", "Bungie", "Action;FPS");
        let results = recommender.recommend(&probe, 2);
        assert_eq!(results.len(), 2);
        // the probe itself is not indexed, so all three original games
        // remain candidates and the closest are the Bungie shooters
        assert!(results.iter().any(|r| r.name == "halo"));
        assert!(results.iter().any(|r| r.name == "halo 2"));
    }

    #[test]
    fn truncates_to_k_results() {
        let records = catalog();
        let recommender = Recommender::fit(&records);
        assert_eq!(recommender.recommend(&records[0], 1).len(), 1);
    }

    #[test]
    fn empty_catalog_yields_no_recommendations() {
        let recommender = Recommender::fit(&[]);
        assert!(recommender.is_empty());
        let probe = record("Halo", "Bungie", "Action;FPS");
        assert!(recommender.recommend(&probe, 5).is_empty());
    }
}
