use crate::models::RankedVideo;
use crate::utils::text;

/// Diversity pass over the score-ordered candidate list.
///
/// A single forward greedy scan that drops near-duplicate titles and caps
/// streaks of identically-tagged items. Both constraints are best-effort:
/// when they filter too much the result is simply shorter than the limit;
/// the pass never backtracks or reorders to fill the quota.
pub struct FeedDiversifier {
    max_title_similarity: f64,
    max_same_main_tag_in_row: i32,
}

impl FeedDiversifier {
    pub fn new(max_title_similarity: f64, max_same_main_tag_in_row: i32) -> Self {
        Self {
            max_title_similarity,
            max_same_main_tag_in_row,
        }
    }

    /// Filters `scored` down to at most `limit` items, preserving relative
    /// order. A non-positive limit yields an empty result.
    pub fn diversify(&self, scored: Vec<RankedVideo>, limit: i32) -> Vec<RankedVideo> {
        if limit <= 0 {
            return Vec::new();
        }
        let limit = limit as usize;

        let mut result: Vec<RankedVideo> = Vec::with_capacity(limit.min(scored.len()));
        let mut used_titles: Vec<String> = Vec::new();

        let mut last_main_tag: Option<String> = None;
        let mut same_tag_streak = 0;

        for item in scored {
            if result.len() >= limit {
                break;
            }

            // 1) near-duplicate suppression against every accepted title
            if used_titles
                .iter()
                .any(|t| text::normalized_edit_similarity(t, &item.video.title) >= self.max_title_similarity)
            {
                continue;
            }

            // 2) cap streaks of identical main tags; skipped items do not
            //    reset the streak
            if last_main_tag.as_deref() == Some(item.video.main_tag.as_str()) {
                same_tag_streak += 1;
                if same_tag_streak > self.max_same_main_tag_in_row {
                    continue;
                }
            } else {
                last_main_tag = Some(item.video.main_tag.clone());
                same_tag_streak = 1;
            }

            used_titles.push(item.video.title.clone());
            result.push(item);
        }

        result
    }
}

impl Default for FeedDiversifier {
    fn default() -> Self {
        Self::new(0.8, 3)
    }
}
