use crate::domain::model::{Opportunity, SeenSet};

/// Keep the records whose id is not in `seen`, in input order.
pub fn filter_new(batch: Vec<Opportunity>, seen: &SeenSet) -> Vec<Opportunity> {
    batch
        .into_iter()
        .filter(|opp| !seen.contains(&opp.notice_id))
        .collect()
}

/// Union the batch ids into `seen`. Returns the number of ids added.
pub fn record_delivered(seen: &mut SeenSet, batch: &[Opportunity]) -> usize {
    seen.extend_from(batch.iter().map(|opp| opp.notice_id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opp(id: &str) -> Opportunity {
        Opportunity {
            notice_id: id.to_string(),
            title: format!("Sedan {}", id),
            solicitation_number: String::new(),
            posted_date: String::new(),
            response_deadline: String::new(),
            agency: String::new(),
        }
    }

    fn ids(batch: &[Opportunity]) -> Vec<&str> {
        batch.iter().map(|o| o.notice_id.as_str()).collect()
    }

    #[test]
    fn test_filter_new_drops_seen_and_keeps_order() {
        let seen: SeenSet = ["b", "d"].into_iter().collect();
        let batch = vec![opp("e"), opp("b"), opp("a"), opp("d"), opp("c")];

        let fresh = filter_new(batch, &seen);
        assert_eq!(ids(&fresh), vec!["e", "a", "c"]);
    }

    #[test]
    fn test_filter_new_with_everything_seen_is_empty() {
        let seen: SeenSet = ["a", "b"].into_iter().collect();
        assert!(filter_new(vec![opp("a"), opp("b")], &seen).is_empty());
    }

    #[test]
    fn test_filter_new_with_empty_seen_returns_batch() {
        let fresh = filter_new(vec![opp("x"), opp("y")], &SeenSet::new());
        assert_eq!(ids(&fresh), vec!["x", "y"]);
    }

    #[test]
    fn test_recording_twice_is_idempotent() {
        let start: SeenSet = ["a"].into_iter().collect();
        let batch = vec![opp("a"), opp("b"), opp("c")];

        let mut once = start.clone();
        let fresh = filter_new(batch.clone(), &once);
        record_delivered(&mut once, &fresh);

        let mut twice = start.clone();
        let fresh = filter_new(batch.clone(), &twice);
        record_delivered(&mut twice, &fresh);
        let fresh = filter_new(batch, &start);
        let added = record_delivered(&mut twice, &fresh);

        assert_eq!(added, 0);
        assert_eq!(once, twice);
        assert_eq!(once.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
