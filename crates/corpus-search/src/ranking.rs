//! The ranking rule shared by both search modes (spec §4.3):
//!
//! > Rank candidates by (a) number of distinct query keywords matched
//! > (descending), tie-broken by (b) total multiplicity of those matches
//! > within the candidate's keyword array (descending).
//!
//! The storage-backed path computes this with SQL aggregation
//! (`corpus-storage::PgStorage::search_comics`); the index-backed path calls
//! [`rank`] to do the same computation over comics fetched by id.

use std::collections::HashMap;

use corpus_core::types::Comic;

/// Sort `candidates` by the two-key rule, then truncate to `limit` (a
/// `limit <= 0` means unbounded). Returns the truncated, ranked list.
pub fn rank(mut candidates: Vec<Comic>, keywords: &[String], limit: i64) -> Vec<Comic> {
    let keyword_set: std::collections::HashSet<&str> =
        keywords.iter().map(String::as_str).collect();

    let scored: HashMap<i64, (usize, usize)> = candidates
        .iter()
        .map(|c| (c.id, match_counts(&c.words, &keyword_set)))
        .collect();

    candidates.sort_by(|a, b| {
        let (a_unique, a_total) = scored[&a.id];
        let (b_unique, b_total) = scored[&b.id];
        b_unique.cmp(&a_unique).then(b_total.cmp(&a_total))
    });

    if limit > 0 && candidates.len() as i64 > limit {
        candidates.truncate(limit as usize);
    }

    candidates
}

/// `(distinct query keywords present, total multiplicity of those matches)`.
fn match_counts(comic_words: &[String], keywords: &std::collections::HashSet<&str>) -> (usize, usize) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in comic_words {
        *counts.entry(word.as_str()).or_insert(0) += 1;
    }

    let mut unique = 0usize;
    let mut total = 0usize;
    for &kw in keywords {
        if let Some(&count) = counts.get(kw) {
            unique += 1;
            total += count;
        }
    }
    (unique, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comic(id: i64, words: &[&str]) -> Comic {
        Comic {
            id,
            url: format!("https://example.com/{id}.png"),
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn kws(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    /// spec §8 scenario 4: c1=["cat","dog"], c2=["cat","cat","bird"],
    /// c3=["dog"]; query "cat dog" -> order c1, c2, c3.
    #[test]
    fn ranks_by_distinct_then_total_matches() {
        let c1 = comic(1, &["cat", "dog"]);
        let c2 = comic(2, &["cat", "cat", "bird"]);
        let c3 = comic(3, &["dog"]);

        let ranked = rank(vec![c2.clone(), c3.clone(), c1.clone()], &kws(&["cat", "dog"]), 0);

        assert_eq!(ranked.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let comics = vec![
            comic(1, &["cat", "dog"]),
            comic(2, &["cat", "cat", "bird"]),
            comic(3, &["dog"]),
        ];
        let ranked = rank(comics, &kws(&["cat", "dog"]), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, 1);
    }

    #[test]
    fn zero_or_negative_limit_is_unbounded() {
        let comics = vec![comic(1, &["cat"]), comic(2, &["cat"]), comic(3, &["cat"])];
        let ranked = rank(comics, &kws(&["cat"]), 0);
        assert_eq!(ranked.len(), 3);
    }
}
