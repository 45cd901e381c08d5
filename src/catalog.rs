//! Catalog ingestion: turning game records into facts and derived rules.
//!
//! All normalization happens here, on the ingestion side of the boundary:
//! names and categories are lower-cased, prices rendered as canonical
//! numeric text, rating counts bucketed into stars, the English flag mapped
//! to `yes`/`no`. The engine itself never re-normalizes on assert.

use indexmap::IndexSet;
use log::debug;

use crate::error::Result;
use crate::store::ClauseStore;
use crate::term::Term;

/// One row of the source catalog, before normalization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GameRecord {
    /// Game title.
    pub name: String,
    /// Development studio.
    pub developer: String,
    /// Publishing company.
    pub publisher: String,
    /// Whether an English localization exists.
    pub english: bool,
    /// Count of positive user ratings.
    pub positive_ratings: u64,
    /// Count of negative user ratings.
    pub negative_ratings: u64,
    /// Genre tags, semicolon-separated in the source data. Stored as one
    /// normalized value, the way the catalog tags games.
    pub genres: String,
    /// Platforms, semicolon-separated. Only the recommender looks at these.
    pub platforms: String,
    /// Price in the store currency.
    pub price: f64,
}

/// The derived rules layered over the base facts, supplied as text and
/// asserted once at knowledge-base build time. Each inverts a base
/// predicate so that callers can ask either direction of a relationship.
pub const DERIVED_RULES: [&str; 6] = [
    "has_price(X, Y) :- prices(Y, X)",
    "quality(X, Y) :- stars(Y, X)",
    "developed_by(X, Y) :- developer(Y, X)",
    "released_by(X, Y) :- publisher(Y, X)",
    "is_genre(X, Y) :- genre(Y, X)",
    "has_english(X, Y) :- english(Y, X)",
];

/// Buckets the negative-to-positive rating ratio into a 1-5 star score.
///
/// The ratio is `negative / positive * 100`; the lower it is, the better
/// the score. A game with no positive ratings at all lands in the worst
/// bucket.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn star_rating(positive_ratings: u64, negative_ratings: u64) -> u8 {
    if positive_ratings == 0 {
        return 1;
    }
    let ratio = negative_ratings as f64 / positive_ratings as f64 * 100.0;
    if ratio <= 12.5 {
        5
    } else if ratio <= 25.0 {
        4
    } else if ratio <= 37.5 {
        3
    } else if ratio <= 50.0 {
        2
    } else {
        1
    }
}

/// Builds a knowledge base from catalog records: one fact per deduplicated
/// `(predicate, game, value)` triple, then the [`DERIVED_RULES`].
///
/// Populating twice from the same records yields an identical store.
///
/// # Errors
///
/// Propagates [`crate::Error::MalformedClause`] from the store's assert
/// validation.
pub fn populate(records: &[GameRecord]) -> Result<ClauseStore> {
    let mut store = ClauseStore::new();
    let mut seen: IndexSet<(&'static str, String, String)> = IndexSet::new();

    for record in records {
        let name = Term::constant(record.name.as_str());
        let stars = star_rating(record.positive_ratings, record.negative_ratings);
        let attributes: [(&'static str, Term); 6] = [
            ("developer", Term::constant(record.developer.as_str())),
            ("publisher", Term::constant(record.publisher.as_str())),
            ("prices", Term::number(record.price)),
            ("stars", Term::constant(stars.to_string())),
            ("genre", Term::constant(record.genres.as_str())),
            (
                "english",
                Term::constant(if record.english { "yes" } else { "no" }),
            ),
        ];
        for (predicate, value) in attributes {
            let key = (
                predicate,
                name.text().to_owned(),
                value.text().to_owned(),
            );
            if seen.insert(key) {
                store.assert_fact(predicate, vec![name.clone(), value])?;
            }
        }
    }

    for rule in DERIVED_RULES {
        store.assert_rule_text(rule)?;
    }
    debug!(
        "catalog populated: {} facts, {} rules from {} records",
        store.fact_count(),
        store.rule_count(),
        records.len()
    );
    Ok(store)
}

/// Loads catalog records from a JSON array.
///
/// # Errors
///
/// Returns the underlying deserialization error for malformed input.
#[cfg(feature = "serde")]
pub fn records_from_json(json: &str) -> serde_json::Result<Vec<GameRecord>> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryEngine;

    fn record(name: &str, developer: &str, genre: &str, price: f64) -> GameRecord {
        GameRecord {
            name: name.to_owned(),
            developer: developer.to_owned(),
            publisher: "microsoft".to_owned(),
            english: true,
            positive_ratings: 900,
            negative_ratings: 100,
            genres: genre.to_owned(),
            platforms: "windows".to_owned(),
            price,
        }
    }

    #[test]
    fn star_rating_follows_the_ratio_table() {
        assert_eq!(star_rating(1000, 0), 5);
        assert_eq!(star_rating(1000, 125), 5);
        assert_eq!(star_rating(1000, 126), 4);
        assert_eq!(star_rating(1000, 250), 4);
        assert_eq!(star_rating(1000, 251), 3);
        assert_eq!(star_rating(1000, 375), 3);
        assert_eq!(star_rating(1000, 376), 2);
        assert_eq!(star_rating(1000, 500), 2);
        assert_eq!(star_rating(1000, 501), 1);
    }

    #[test]
    fn no_positive_ratings_means_worst_bucket() {
        assert_eq!(star_rating(0, 0), 1);
        assert_eq!(star_rating(0, 42), 1);
    }

    #[test]
    fn populate_asserts_six_facts_per_game_plus_rules() {
        let records = [record("Halo 3", "Bungie", "Action;FPS", 9.99)];
        let store = populate(&records).unwrap();
        assert_eq!(store.fact_count(), 6);
        assert_eq!(store.rule_count(), DERIVED_RULES.len());
    }

    #[test]
    fn duplicate_records_are_collapsed() {
        let one = record("Halo 3", "Bungie", "Action;FPS", 9.99);
        let records = [one.clone(), one];
        let store = populate(&records).unwrap();
        assert_eq!(store.fact_count(), 6);
    }

    #[test]
    fn populate_is_deterministic() {
        let records = [
            record("Halo 3", "Bungie", "Action;FPS", 9.99),
            record("Myst", "Cyan", "Puzzle", 5.0),
        ];
        assert_eq!(populate(&records).unwrap(), populate(&records).unwrap());
    }

    #[test]
    fn derived_rules_answer_inverse_lookups() {
        let records = [
            record("Halo 3", "Bungie", "Action;FPS", 9.99),
            record("Myst", "Cyan", "Puzzle", 5.0),
        ];
        let engine = QueryEngine::new(populate(&records).unwrap());

        let rows = engine.run_query(r#"developed_by(What, "halo 3")"#).unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "bungie");

        let rows = engine.run_query(r#"quality(What, "halo 3")"#).unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "5");

        let rows = engine.run_query("has_price(5, What)").unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "myst");

        let rows = engine.run_query(r#"has_english(What, myst)"#).unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "yes");

        let rows = engine.run_query("released_by(What, myst)").unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "microsoft");

        let rows = engine.run_query(r#"is_genre(What, "halo 3")"#).unwrap();
        assert_eq!(rows[0].get("What").unwrap(), "action;fps");
    }

    #[test]
    fn base_facts_are_checkable_directly() {
        let records = [record("Halo 3", "Bungie", "Action;FPS", 9.99)];
        let engine = QueryEngine::new(populate(&records).unwrap());
        let rows = engine
            .run_query(r#"developer("halo 3", bungie)"#)
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn end_to_end_catalog_query_flow() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let records = [
            record("Halo 3", "Bungie", "Action;FPS", 9.99),
            record("Myst", "Cyan", "Puzzle", 5.0),
        ];
        let engine = QueryEngine::new(populate(&records)?);

        let rows = engine.run_query("developed_by(What, myst)")?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("What")?, "cyan");

        assert!(engine.first("developer(myst, cyan)")?.is_some());
        assert!(engine.run_query("developer(myst, bungie)")?.is_empty());
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn records_round_trip_through_json() {
        let json = r#"[{
            "name": "Halo 3",
            "developer": "Bungie",
            "publisher": "Microsoft",
            "english": true,
            "positive_ratings": 900,
            "negative_ratings": 100,
            "genres": "Action;FPS",
            "platforms": "windows",
            "price": 9.99
        }]"#;
        let records = records_from_json(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Halo 3");
        assert!((records[0].price - 9.99).abs() < f64::EPSILON);
    }
}
