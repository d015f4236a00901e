//! Heuristic viral-priority scoring
//!
//! Pure functions over the observable signals of a discovered item. Only
//! consulted in hunting mode; list sweeps act in discovery order.

use shared::{CandidateItem, Recency};

/// Score assigned when an item carries no signals at all
const NO_SIGNALS_SCORE: u8 = 50;

/// Keywords that tend to mark argument-bait content
const CONTROVERSY_KEYWORDS: [&str; 10] = [
    "wrong",
    "unpopular",
    "controversial",
    "hot take",
    "disagree",
    "vs",
    "better than",
    "worse than",
    "overrated",
    "underrated",
];

/// High-traffic topic niches
const TRENDING_KEYWORDS: [&str; 6] = ["ai", "crypto", "startup", "tech", "business", "money"];

/// Additive priority score in `[0, 100]`.
///
/// Items without signals get a flat middle score so they rank behind
/// anything observably hot but are not discarded outright.
pub fn score(item: &CandidateItem) -> u8 {
    let Some(signals) = item.signals else {
        return NO_SIGNALS_SCORE;
    };

    let mut score: u32 = 0;

    if signals.has_engagement_counts {
        score += 20;
    }
    if signals.verified_author {
        score += 15;
    }
    if signals.has_media {
        score += 10;
    }

    score += match signals.recency {
        Recency::Minutes => 25,
        Recency::Hours => 15,
        Recency::Older => 5,
        Recency::Unknown => 10,
    };

    let text_length = item.text.chars().count();
    score += if (100..=200).contains(&text_length) {
        15
    } else if text_length < 50 {
        10
    } else {
        5
    };

    let text_lower = item.text.to_lowercase();
    if CONTROVERSY_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        score += 5;
    }
    if TRENDING_KEYWORDS.iter().any(|k| text_lower.contains(k)) {
        score += 5;
    }

    score.min(100) as u8
}

/// Rank a candidate pool for hunting mode: score, threshold, take the best.
///
/// Sort is stable, so ties keep discovery order.
pub fn rank_candidates(
    candidates: Vec<CandidateItem>,
    min_score: u8,
    top_k: usize,
) -> Vec<(CandidateItem, u8)> {
    let mut scored: Vec<(CandidateItem, u8)> = candidates
        .into_iter()
        .map(|item| {
            let s = score(&item);
            (item, s)
        })
        .filter(|(_, s)| *s >= min_score)
        .collect();

    scored.sort_by_key(|(_, s)| std::cmp::Reverse(*s));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CandidateSignals;

    fn hot_item(id: &str, text: &str) -> CandidateItem {
        CandidateItem::new(id, "author", text, "list_1").with_signals(CandidateSignals {
            has_engagement_counts: true,
            verified_author: true,
            has_media: true,
            recency: Recency::Minutes,
        })
    }

    #[test]
    fn test_no_signals_scores_fifty() {
        let item = CandidateItem::new("1", "a", "plain text body here", "list_1");
        assert_eq!(score(&item), 50);
    }

    #[test]
    fn test_additive_contributions() {
        // counts 20 + verified 15 + media 10 + minutes 25 + short text 10 = 80
        let item = hot_item("1", "short");
        assert_eq!(score(&item), 80);

        // Same signals, sweet-spot length adds 15 instead of 10, keyword +5
        let text = format!("unpopular opinion padded {}", "x".repeat(100));
        let item = hot_item("2", &text);
        assert_eq!(score(&item), 90);
    }

    #[test]
    fn test_score_is_capped_at_hundred() {
        let text = format!("hot take about ai {}", "y".repeat(110));
        // 20 + 15 + 10 + 25 + 15 + 5 + 5 = 95, add nothing more; force the cap
        // with a keyword-dense sweet-spot text and confirm <= 100 regardless
        let item = hot_item("1", &text);
        assert!(score(&item) <= 100);
        assert_eq!(score(&item), 95);
    }

    #[test]
    fn test_stale_unverified_scores_low() {
        let item =
            CandidateItem::new("1", "a", "x".repeat(300), "list_1").with_signals(CandidateSignals {
                has_engagement_counts: false,
                verified_author: false,
                has_media: false,
                recency: Recency::Older,
            });
        // older 5 + long text 5
        assert_eq!(score(&item), 10);
    }

    #[test]
    fn test_rank_thresholds_and_truncates() {
        let mut pool = vec![hot_item("high_1", "short")];
        pool.push(CandidateItem::new("low", "a", "x".repeat(300), "list_1").with_signals(
            CandidateSignals {
                has_engagement_counts: false,
                verified_author: false,
                has_media: false,
                recency: Recency::Older,
            },
        ));
        pool.push(hot_item("high_2", "short"));
        pool.push(hot_item("high_3", "short"));

        let ranked = rank_candidates(pool, 70, 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|(_, s)| *s >= 70));
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let pool = vec![
            hot_item("first", "short"),
            hot_item("second", "short"),
            hot_item("third", "short"),
        ];
        let ranked = rank_candidates(pool, 70, 3);
        let ids: Vec<&str> = ranked.iter().map(|(item, _)| item.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }
}
