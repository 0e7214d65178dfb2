/// Country unlock rules — chain progression over the atlas order.
///
/// Pure functions over a progress set — no side effects. The atlas
/// fixes an ordering L0..Ln-1; finishing a country opens the next one,
/// and finished countries stay open for replay.
///
/// ## Unlock Truth Table
/// ┌─────────────────────────────────────┬─────────┐
/// │ Condition (first match wins)        │ Open?   │
/// ├─────────────────────────────────────┼─────────┤
/// │ country not in the ordering         │ NO      │
/// │ country is L0                       │ YES     │
/// │ progress contains the country       │ YES     │
/// │ progress contains its predecessor   │ YES     │
/// │ otherwise                           │ NO      │
/// └─────────────────────────────────────┴─────────┘
///
/// With every country completed, everything stays open: the chain has
/// no terminal lock.

/// Is `country` open for a player with the given progress?
pub fn is_unlocked(order: &[&str], progress: &[String], country: &str) -> bool {
    let idx = match order.iter().position(|c| *c == country) {
        Some(i) => i,
        None => return false,
    };
    if idx == 0 {
        return true;
    }
    let completed = |name: &str| progress.iter().any(|c| c == name);
    completed(country) || completed(order[idx - 1])
}

/// Unlock flag per country in atlas order, for badge rendering.
pub fn unlocked_flags(order: &[&str], progress: &[String]) -> Vec<bool> {
    order.iter().map(|c| is_unlocked(order, progress, c)).collect()
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [&str; 3] = ["A", "B", "C"];

    fn progress(countries: &[&str]) -> Vec<String> {
        countries.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn first_country_is_always_open() {
        assert!(is_unlocked(&ORDER, &progress(&[]), "A"));
        assert!(is_unlocked(&ORDER, &progress(&["C"]), "A"));
    }

    #[test]
    fn empty_progress_opens_only_the_first() {
        let p = progress(&[]);
        assert_eq!(unlocked_flags(&ORDER, &p), vec![true, false, false]);
    }

    #[test]
    fn completing_a_country_opens_the_next() {
        let p = progress(&["A"]);
        assert_eq!(unlocked_flags(&ORDER, &p), vec![true, true, false]);
    }

    #[test]
    fn completed_countries_stay_open() {
        // B completed without A on record: B itself and C are open.
        let p = progress(&["B"]);
        assert_eq!(unlocked_flags(&ORDER, &p), vec![true, true, true]);
    }

    #[test]
    fn full_progress_opens_everything() {
        let p = progress(&["A", "B", "C"]);
        assert_eq!(unlocked_flags(&ORDER, &p), vec![true, true, true]);
    }

    #[test]
    fn unknown_country_is_never_open() {
        let p = progress(&["A", "B", "C"]);
        assert!(!is_unlocked(&ORDER, &p, "Atlantis"));
    }

    #[test]
    fn order_matters_not_progress_contents() {
        // Progress mentions a country outside the ordering; no effect.
        let p = progress(&["Z"]);
        assert_eq!(unlocked_flags(&ORDER, &p), vec![true, false, false]);
    }
}
