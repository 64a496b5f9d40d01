//! Candidate rounds from one-factorizations of K_n.
//!
//! A [`RoundPattern`] lists the `n` teams of one round laid out so that the
//! position pairs of [`canonical_order`] are its games. Two sources produce
//! the `n - 1` rounds of a single round robin:
//!
//! - [`polygon_rounds`]: the circle method, rotating every team but the
//!   first by one position per round.
//! - [`vizing_rounds`]: a randomized proper edge colouring of K_n, one
//!   colour per round.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

/// One round: team ids in position order.
pub type RoundPattern = Vec<usize>;

/// Restarts of the whole colouring before giving up.
const VIZING_RESTARTS: usize = 10;

/// Position pairs forming the games of a round of `num_teams` teams.
///
/// `(0, 1)` plus `(i, n - i + 1)` for `i` in `2..=n/2`, which pairs the
/// fixed vertex with its neighbour and every other position with its
/// mirror on the polygon.
pub fn canonical_order(num_teams: usize) -> Vec<(usize, usize)> {
    if num_teams < 2 {
        return Vec::new();
    }
    let mut order = Vec::with_capacity(num_teams / 2);
    order.push((0, 1));
    for i in 2..=num_teams / 2 {
        order.push((i, num_teams - i + 1));
    }
    order
}

/// Owns the position tables of one team count.
///
/// The table is built on first use and reused for every round the
/// constructors lay out.
#[derive(Debug, Clone, Default)]
pub struct ColoringCache {
    num_teams: usize,
    order: Vec<(usize, usize)>,
}

impl ColoringCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// [`canonical_order`] of `num_teams`, memoised.
    pub fn order(&mut self, num_teams: usize) -> &[(usize, usize)] {
        if self.num_teams != num_teams || self.order.is_empty() {
            self.num_teams = num_teams;
            self.order = canonical_order(num_teams);
        }
        &self.order
    }
}

/// Circle-method rounds of the teams in `permutation`.
///
/// Round `r` is `permutation` with every element but the first rotated
/// left by `r` positions.
pub fn polygon_rounds(permutation: &[usize]) -> Vec<RoundPattern> {
    let n = permutation.len();
    if n < 2 {
        return Vec::new();
    }
    let mut round = permutation.to_vec();
    let mut rounds = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        rounds.push(round.clone());
        round[1..].rotate_left(1);
    }
    rounds
}

/// Rounds from a random proper edge colouring of K_n.
///
/// Returns `None` when no colouring was completed within the step budget
/// after [`VIZING_RESTARTS`] attempts. Callers fall back to
/// [`polygon_rounds`].
pub fn vizing_rounds<R: Rng + ?Sized>(
    permutation: &[usize],
    cache: &mut ColoringCache,
    rng: &mut R,
) -> Option<Vec<RoundPattern>> {
    let n = permutation.len();
    if n < 2 || n % 2 != 0 {
        return None;
    }
    for attempt in 0..VIZING_RESTARTS {
        let mut coloring = EdgeColoring::new(n);
        if coloring.color_all(rng) {
            return coloring.rounds(permutation, cache.order(n));
        }
        debug!(event = "vizing_restart", attempt, teams = n);
    }
    None
}

/// Partial edge colouring of K_n grown one vertex at a time.
///
/// Edges are `(i, j)` with `i < j` in lexicographic order.
struct EdgeColoring {
    num_teams: usize,
    edges: Vec<(usize, usize)>,
    color: Vec<Option<usize>>,
}

impl EdgeColoring {
    fn new(num_teams: usize) -> Self {
        let edges: Vec<(usize, usize)> = (0..num_teams)
            .flat_map(|i| (i + 1..num_teams).map(move |j| (i, j)))
            .collect();
        let color = vec![None; edges.len()];
        Self {
            num_teams,
            edges,
            color,
        }
    }

    fn edge_index(&self, a: usize, b: usize) -> usize {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        i * self.num_teams - i * (i + 1) / 2 + (j - i - 1)
    }

    fn other(&self, edge: usize, vertex: usize) -> usize {
        let (i, j) = self.edges[edge];
        if i == vertex {
            j
        } else {
            i
        }
    }

    /// Seeds the triangle on vertices 0..3, then extends to every
    /// subgraph K_t for t = 4..=n.
    fn color_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.num_teams == 2 {
            self.color[0] = Some(0);
            return true;
        }
        for (c, (a, b)) in [(0, 1), (0, 2), (1, 2)].into_iter().enumerate() {
            let e = self.edge_index(a, b);
            self.color[e] = Some(c);
        }
        (4..=self.num_teams).all(|t| self.color_subgraph(t, rng))
    }

    /// Colours the uncoloured edges among vertices `0..t` with `t - 1`
    /// colours when `t` is even, `t` otherwise.
    fn color_subgraph<R: Rng + ?Sized>(&mut self, t: usize, rng: &mut R) -> bool {
        let colors = if t % 2 == 0 { t - 1 } else { t };
        let mut available: Vec<BTreeSet<usize>> = vec![(0..colors).collect(); t];
        for (e, &(i, j)) in self.edges.iter().enumerate() {
            if j < t {
                if let Some(c) = self.color[e] {
                    available[i].remove(&c);
                    available[j].remove(&c);
                }
            }
        }

        let mut budget = 200 * t * t;
        let mut tabu: Option<usize> = None;
        let (mut e0, mut v0, mut w) = (0, 0, 0);
        loop {
            if budget == 0 {
                return false;
            }
            budget -= 1;

            if tabu.is_none() {
                let open: Vec<usize> = (0..self.edges.len())
                    .filter(|&e| self.edges[e].1 < t && self.color[e].is_none())
                    .collect();
                if open.is_empty() {
                    return true;
                }
                e0 = open[rng.random_range(0..open.len())];
                (v0, w) = self.edges[e0];
            }

            let common: Vec<usize> = available[v0].intersection(&available[w]).copied().collect();
            if !common.is_empty() {
                let c = common[rng.random_range(0..common.len())];
                self.color[e0] = Some(c);
                available[v0].remove(&c);
                available[w].remove(&c);
                tabu = None;
                continue;
            }

            let alphas: Vec<usize> = available[v0]
                .iter()
                .copied()
                .filter(|&c| Some(c) != tabu)
                .collect();
            let betas: Vec<usize> = available[w].iter().copied().collect();
            if alphas.is_empty() || betas.is_empty() {
                return false;
            }
            let alpha = alphas[rng.random_range(0..alphas.len())];
            let beta = betas[rng.random_range(0..betas.len())];

            let path = self.alternating_path(t, v0, beta, alpha);
            let Some(&(last, end)) = path.last() else {
                return false;
            };
            if end != w {
                for &(e, _) in &path {
                    self.color[e] = match self.color[e] {
                        Some(c) if c == alpha => Some(beta),
                        _ => Some(alpha),
                    };
                }
                self.color[e0] = Some(beta);
                available[v0].remove(&alpha);
                available[w].remove(&beta);
                if path.len() % 2 == 1 {
                    available[end].insert(beta);
                    available[end].remove(&alpha);
                } else {
                    available[end].insert(alpha);
                    available[end].remove(&beta);
                }
                tabu = None;
            } else {
                let v1 = self.other(last, w);
                self.color[last] = None;
                self.color[e0] = Some(alpha);
                available[v0].remove(&alpha);
                available[v1].insert(alpha);
                e0 = last;
                v0 = v1;
                tabu = Some(alpha);
            }
        }
    }

    /// Edges of the path leaving `start` on colour `first` and alternating
    /// with `second`, each with the vertex it leads to.
    fn alternating_path(
        &self,
        t: usize,
        start: usize,
        first: usize,
        second: usize,
    ) -> Vec<(usize, usize)> {
        let mut path = Vec::new();
        let (mut current, mut wanted, mut previous) = (start, first, None);
        while path.len() < self.edges.len() {
            let step = (0..t)
                .filter(|&u| u != current)
                .map(|u| (self.edge_index(current, u), u))
                .find(|&(e, _)| self.color[e] == Some(wanted) && Some(e) != previous);
            let Some((e, next)) = step else {
                break;
            };
            path.push((e, next));
            previous = Some(e);
            current = next;
            wanted = if wanted == first { second } else { first };
        }
        path
    }

    /// Round `r` holds the edges of colour `r`, laid out on `order` and
    /// mapped through `permutation`.
    fn rounds(&self, permutation: &[usize], order: &[(usize, usize)]) -> Option<Vec<RoundPattern>> {
        let n = self.num_teams;
        let mut rounds = Vec::with_capacity(n - 1);
        for r in 0..n - 1 {
            let games: Vec<(usize, usize)> = self
                .edges
                .iter()
                .zip(&self.color)
                .filter(|(_, c)| **c == Some(r))
                .map(|(&edge, _)| edge)
                .collect();
            if games.len() != order.len() {
                return None;
            }
            let mut round = vec![0; n];
            for (&(p1, p2), &(a, b)) in order.iter().zip(&games) {
                round[p1] = permutation[a];
                round[p2] = permutation[b];
            }
            rounds.push(round);
        }
        Some(rounds)
    }
}
