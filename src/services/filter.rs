use crate::models::Candidate;
use std::collections::HashSet;

/// Deduplicate and exclude already-known candidates
///
/// Walks the index results in rank order and drops a candidate when its id
/// was part of the request's selections, its id already survived, its
/// normalized title matches a selected title, or its normalized title
/// duplicates an earlier survivor. The survivors keep their
/// similarity-descending order and are capped at `context_size`.
///
/// Pure and total - zero survivors is a valid outcome that flows on to the
/// ranking stage unchanged.
pub fn filter_candidates(
    candidates: Vec<Candidate>,
    selected_ids: &[String],
    selected_titles: &[String],
    context_size: usize,
) -> Vec<Candidate> {
    let excluded_ids: HashSet<&str> = selected_ids.iter().map(String::as_str).collect();
    let excluded_titles: HashSet<String> = selected_titles
        .iter()
        .map(|title| normalize_title(title))
        .collect();

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut survivors = Vec::new();

    for candidate in candidates {
        if survivors.len() == context_size {
            break;
        }
        if excluded_ids.contains(candidate.id.as_str()) {
            continue;
        }
        let title_key = normalize_title(&candidate.title);
        if excluded_titles.contains(&title_key) {
            continue;
        }
        if !seen_ids.insert(candidate.id.clone()) {
            continue;
        }
        if !seen_titles.insert(title_key) {
            continue;
        }
        survivors.push(candidate);
    }

    survivors
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn candidate(id: &str, title: &str, score: f32) -> Candidate {
        Candidate {
            id: id.to_string(),
            title: title.to_string(),
            overview: String::new(),
            raw_poster: None,
            score,
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_selected_ids_are_excluded() {
        let survivors = filter_candidates(
            vec![candidate("1", "Heat", 0.9), candidate("2", "Ronin", 0.8)],
            &["1".to_string()],
            &[],
            20,
        );

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, "2");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let survivors = filter_candidates(
            vec![
                candidate("1", "Heat", 0.9),
                candidate("1", "Heat (1995)", 0.7),
            ],
            &[],
            &[],
            20,
        );

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].score, 0.9);
    }

    #[test]
    fn test_title_collision_with_selection_is_dropped() {
        let survivors = filter_candidates(
            vec![candidate("9", "  HEAT ", 0.9), candidate("2", "Ronin", 0.8)],
            &[],
            &["heat".to_string()],
            20,
        );

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, "2");
    }

    #[test]
    fn test_duplicate_titles_across_ids_keep_first() {
        let survivors = filter_candidates(
            vec![
                candidate("1", "Solaris", 0.9),
                candidate("2", "solaris", 0.8),
                candidate("3", "Stalker", 0.7),
            ],
            &[],
            &[],
            20,
        );

        let ids: Vec<&str> = survivors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_truncates_to_context_size_in_rank_order() {
        let candidates: Vec<Candidate> = (0..10)
            .map(|i| candidate(&i.to_string(), &format!("Movie {}", i), 1.0 - i as f32 * 0.05))
            .collect();

        let survivors = filter_candidates(candidates, &[], &[], 3);

        let ids: Vec<&str> = survivors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(filter_candidates(Vec::new(), &[], &[], 20).is_empty());
    }

    #[test]
    fn test_invariants_hold_together() {
        let survivors = filter_candidates(
            vec![
                candidate("1", "Alien", 0.9),
                candidate("2", "ALIEN", 0.85),
                candidate("3", "Aliens", 0.8),
                candidate("3", "Aliens", 0.75),
                candidate("4", "Blade Runner", 0.7),
            ],
            &["4".to_string()],
            &[],
            20,
        );

        let ids: Vec<&str> = survivors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
