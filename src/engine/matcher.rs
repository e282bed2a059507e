//! Classifies diagnostics as new or inherited from the parent build.
//!
//! Diagnostics carry no stable identity across builds, so an occurrence is
//! considered inherited when the parent has the same message in the same file
//! on a nearby line. Lines of 0 ("unknown") take part in the distance like any
//! other line and may pair up with each other arbitrarily.

use tracing::debug;

use crate::report::diagnostic::Diagnostic;

/// Mark the diagnostics of one (file, message) group.
///
/// `old` holds the parent's lines for the same message, `None` when the parent
/// never reported it. `current` indexes into `diagnostics`.
pub fn mark_new(old: Option<&[u32]>, current: &[usize], diagnostics: &mut [Diagnostic]) {
    let Some(old) = old else {
        for &i in current {
            diagnostics[i].is_new = true;
        }
        return;
    };
    if old.len() >= current.len() {
        return;
    }

    let lines: Vec<u32> = current.iter().map(|&i| diagnostics[i].line).collect();
    for pos in unmatched(old, &lines) {
        diagnostics[current[pos]].is_new = true;
    }
}

/// Greedy nearest-line pairing.
///
/// Repeatedly pairs the closest (old, current) lines until `old` runs out and
/// returns the positions in `current` that were never paired. Pools shrink by
/// swap-remove, so ties go to whichever pair is found first in the shuffled
/// pool order; the result is deterministic for a given input order.
pub fn unmatched(old: &[u32], current: &[u32]) -> Vec<usize> {
    let mut old: Vec<u32> = old.to_vec();
    let mut pool: Vec<(usize, u32)> = current.iter().copied().enumerate().collect();

    while !old.is_empty() && !pool.is_empty() {
        let mut best_old = 0;
        let mut best_cur = 0;
        let mut best = old[0].abs_diff(pool[0].1);
        for (i_old, &o) in old.iter().enumerate() {
            for (i_cur, &(_, c)) in pool.iter().enumerate() {
                let distance = o.abs_diff(c);
                if distance < best {
                    best_old = i_old;
                    best_cur = i_cur;
                    best = distance;
                }
            }
        }
        old.swap_remove(best_old);
        let (pos, line) = pool.swap_remove(best_cur);
        debug!("Paired #{} at line {} (distance {})", pos, line, best);
    }

    pool.into_iter().map(|(pos, _)| pos).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::diagnostic::Severity;

    fn diag(line: u32) -> Diagnostic {
        Diagnostic {
            file: "src/a.cpp".into(),
            line,
            message: "unused-variable".into(),
            severity: Severity::Warning,
            log: "jam.log".into(),
            log_line: 1,
            is_new: false,
        }
    }

    fn new_lines(diagnostics: &[Diagnostic]) -> Vec<u32> {
        diagnostics.iter().filter(|d| d.is_new).map(|d| d.line).collect()
    }

    #[test]
    fn test_absent_reference_marks_all_new() {
        let mut diagnostics = vec![diag(10), diag(12), diag(0)];
        mark_new(None, &[0, 1, 2], &mut diagnostics);
        assert!(diagnostics.iter().all(|d| d.is_new));
    }

    #[test]
    fn test_reference_covers_current() {
        let mut diagnostics = vec![diag(50)];
        mark_new(Some(&[52]), &[0], &mut diagnostics);
        assert!(!diagnostics[0].is_new);

        let mut diagnostics = vec![diag(1), diag(900)];
        mark_new(Some(&[400, 401, 402]), &[0, 1], &mut diagnostics);
        assert!(new_lines(&diagnostics).is_empty());
    }

    #[test]
    fn test_far_line_is_new() {
        let mut diagnostics = vec![diag(10), diag(200)];
        mark_new(Some(&[11]), &[0, 1], &mut diagnostics);
        assert_eq!(new_lines(&diagnostics), vec![200]);
    }

    #[test]
    fn test_only_group_members_are_touched() {
        let mut diagnostics = vec![diag(10), diag(20), diag(30)];
        mark_new(None, &[1], &mut diagnostics);
        assert_eq!(new_lines(&diagnostics), vec![20]);
    }

    #[test]
    fn test_new_count_is_difference() {
        let current = [5, 17, 17, 40, 41, 99, 100, 0];
        let old = [16, 42, 0];
        let left = unmatched(&old, &current);
        assert_eq!(left.len(), current.len() - old.len());

        let mut positions = left.clone();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), left.len());
    }

    #[test]
    fn test_globally_closest_pair_first() {
        // 100 is closer to 98 than 10 is, so 10 stays unmatched even though
        // it comes first.
        let left = unmatched(&[98], &[10, 100]);
        assert_eq!(left, vec![0]);
    }

    #[test]
    fn test_tie_goes_to_first_found() {
        // 10 and 14 are both 2 away from 12; the first in pool order wins.
        let left = unmatched(&[12], &[10, 14]);
        assert_eq!(left, vec![1]);
    }

    #[test]
    fn test_unknown_lines_pair_with_each_other() {
        let left = unmatched(&[0], &[0, 35]);
        assert_eq!(left, vec![1]);
    }

    #[test]
    fn test_deterministic() {
        let current = [3, 9, 9, 27, 81, 243];
        let old = [8, 80];
        assert_eq!(unmatched(&old, &current), unmatched(&old, &current));
    }
}
