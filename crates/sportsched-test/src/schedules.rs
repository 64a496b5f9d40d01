//! Valid schedules in row form.
//!
//! A row lists, for one team, the `(opponent, is_home)` pair of every slot.

/// Builds a phased compact double round robin for `num_teams` teams with
/// the circle method. The second half mirrors the first with reversed homes.
///
/// # Panics
///
/// Panics if `num_teams` is odd or smaller than 2.
///
/// # Example
///
/// ```
/// use sportsched_test::double_round_robin;
///
/// let rows = double_round_robin(4);
/// assert_eq!(rows.len(), 4);
/// assert_eq!(rows[0].len(), 6);
/// assert_eq!(rows[0][0], (3, true));
/// assert_eq!(rows[3][0], (0, false));
/// ```
pub fn double_round_robin(num_teams: usize) -> Vec<Vec<(usize, bool)>> {
    assert!(
        num_teams >= 2 && num_teams % 2 == 0,
        "need an even number of teams"
    );
    let n = num_teams;
    let rounds = n - 1;
    let mut rows = vec![vec![(0, false); 2 * rounds]; n];

    let mut place = |slot: usize, home: usize, away: usize| {
        rows[home][slot] = (away, true);
        rows[away][slot] = (home, false);
        rows[home][slot + rounds] = (away, false);
        rows[away][slot + rounds] = (home, true);
    };

    for i in 0..rounds {
        if i % 2 == 0 {
            place(i, i, n - 1);
        } else {
            place(i, n - 1, i);
        }
        for k in 1..n / 2 {
            let a = (i + k) % rounds;
            let b = (i + rounds - k) % rounds;
            if k % 2 == 0 {
                place(i, a, b);
            } else {
                place(i, b, a);
            }
        }
    }
    rows
}

/// Renders rows in the `+opp` / `-opp` text form.
pub fn rows_to_text(rows: &[Vec<(usize, bool)>]) -> String {
    let mut out = String::new();
    for row in rows {
        let tokens: Vec<String> = row
            .iter()
            .map(|&(opponent, home)| format!("{}{}", if home { '+' } else { '-' }, opponent))
            .collect();
        out.push_str(&tokens.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_meets_twice() {
        for n in [2, 4, 6, 10] {
            let rows = double_round_robin(n);
            for (t, row) in rows.iter().enumerate() {
                for o in (0..n).filter(|&o| o != t) {
                    let meetings: Vec<bool> = row
                        .iter()
                        .filter(|&&(opp, _)| opp == o)
                        .map(|&(_, home)| home)
                        .collect();
                    assert_eq!(meetings.len(), 2, "n={} t={} o={}", n, t, o);
                    assert_ne!(meetings[0], meetings[1]);
                }
            }
        }
    }

    #[test]
    fn test_rows_to_text() {
        let text = rows_to_text(&double_round_robin(2));
        assert_eq!(text, "+1 -1\n-0 +0\n");
    }
}
