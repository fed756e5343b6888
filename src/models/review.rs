use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Summary shown when none of the submitted photos could be read.
pub const NO_IMAGES_SUMMARY: &str = "No images supplied for review.";

/// Score recorded for every category when no review could be performed.
/// Sits below the valid 1-5 range.
pub const SENTINEL_SCORE: i32 = 0;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// Categories seeded into an empty `review_categories` table.
pub const DEFAULT_REVIEW_CATEGORIES: &[&str] = &[
    "Shape",
    "Crust Quality",
    "Presentation",
    "Bake Quality",
    "Flavor (estimated)",
    "Overall",
];

/// A review as produced by the AI gateway, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub review_summary: String,
    pub scores: BTreeMap<String, i32>,
}

impl ReviewDraft {
    /// The degenerate review used when there was nothing to look at.
    pub fn placeholder<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            review_summary: NO_IMAGES_SUMMARY.to_string(),
            scores: categories
                .into_iter()
                .map(|name| (name.into(), SENTINEL_SCORE))
                .collect(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.scores.values().all(|&score| score == SENTINEL_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_scores_every_category_with_the_sentinel() {
        let draft = ReviewDraft::placeholder(DEFAULT_REVIEW_CATEGORIES.iter().copied());

        assert_eq!(draft.review_summary, NO_IMAGES_SUMMARY);
        assert_eq!(draft.scores.len(), DEFAULT_REVIEW_CATEGORIES.len());
        assert!(draft.scores.values().all(|&s| s == SENTINEL_SCORE));
        assert!(draft.is_placeholder());
    }

    #[test]
    fn low_real_score_is_not_a_placeholder() {
        let draft = ReviewDraft {
            review_summary: "Burnt".into(),
            scores: BTreeMap::from([("Shape".to_string(), 1), ("Overall".to_string(), 1)]),
        };
        assert!(!draft.is_placeholder());
    }
}
