//! Catalog fixtures.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sportsched_core::{
    Ca4Scope, Catalog, CatalogBuilder, ConstraintDef, HomeMode, Severity,
};

/// A catalog without constraints.
pub fn empty_catalog(num_teams: usize, phased: bool) -> Catalog {
    CatalogBuilder::anonymous(num_teams)
        .with_phased(phased)
        .build()
        .expect("anonymous catalog is valid")
}

/// Six phased teams with at least one hard and one soft constraint of every
/// family.
pub fn mixed_catalog() -> Catalog {
    let all_teams: Vec<usize> = (0..6).collect();
    let all_slots: Vec<usize> = (0..10).collect();

    CatalogBuilder::anonymous(6)
        .with_phased(true)
        .with_constraint(ConstraintDef::Ca1 {
            teams: vec![0],
            slots: vec![0, 1, 2],
            k_min: None,
            k_max: Some(1),
            mode: HomeMode::Home,
            severity: Severity::hard(1),
        })
        .with_constraint(ConstraintDef::Ca1 {
            teams: vec![1, 2],
            slots: vec![4, 5, 6, 7],
            k_min: Some(1),
            k_max: Some(2),
            mode: HomeMode::Away,
            severity: Severity::soft(3),
        })
        .with_constraint(ConstraintDef::Ca2 {
            teams1: vec![0, 3],
            teams2: vec![1, 2, 4],
            slots: vec![0, 1, 2, 3],
            k_min: None,
            k_max: Some(1),
            mode: HomeMode::Any,
            severity: Severity::soft(5),
        })
        .with_constraint(ConstraintDef::Ca3 {
            teams1: vec![2],
            teams2: vec![0, 1, 3],
            window: 3,
            k_min: None,
            k_max: Some(1),
            mode: HomeMode::Away,
            severity: Severity::soft(2),
        })
        .with_constraint(ConstraintDef::Ca4 {
            teams1: vec![0, 1],
            teams2: vec![2, 3, 4],
            slots: vec![1, 2, 8],
            k_min: None,
            k_max: Some(1),
            mode: HomeMode::Home,
            scope: Ca4Scope::Every,
            severity: Severity::hard(1),
        })
        .with_constraint(ConstraintDef::Ca4 {
            teams1: vec![0, 1, 2],
            teams2: vec![1, 2, 3],
            slots: vec![0, 1, 2, 3, 4],
            k_min: Some(1),
            k_max: Some(3),
            mode: HomeMode::Any,
            scope: Ca4Scope::Global,
            severity: Severity::soft(1),
        })
        .with_constraint(ConstraintDef::Ga1 {
            meetings: vec![(0, 5), (3, 4)],
            slots: vec![0, 9],
            k_min: Some(1),
            k_max: None,
            severity: Severity::soft(4),
        })
        .with_constraint(ConstraintDef::Br1 {
            teams: vec![4],
            slots: all_slots.clone(),
            k: 0,
            mode: HomeMode::Any,
            severity: Severity::hard(1),
        })
        .with_constraint(ConstraintDef::Br1 {
            teams: vec![0, 5],
            slots: vec![1, 3, 5, 7],
            k: 0,
            mode: HomeMode::Away,
            severity: Severity::soft(2),
        })
        .with_constraint(ConstraintDef::Br2 {
            teams: all_teams.clone(),
            slots: all_slots.clone(),
            k: 6,
            severity: Severity::soft(1),
        })
        .with_constraint(ConstraintDef::Fa2 {
            teams: all_teams.clone(),
            slots: all_slots,
            k: 1,
            severity: Severity::soft(2),
        })
        .with_constraint(ConstraintDef::Se1 {
            teams: all_teams,
            m_min: Some(2),
            m_max: None,
            severity: Severity::soft(1),
        })
        .build()
        .expect("mixed catalog is valid")
}

/// A seeded random catalog with `per_family` constraints of every family.
///
/// Roughly a third of the constraints are hard.
pub fn random_catalog(num_teams: usize, phased: bool, per_family: usize, seed: u64) -> Catalog {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let num_slots = 2 * (num_teams - 1);
    let mut builder = CatalogBuilder::anonymous(num_teams).with_phased(phased);

    for _ in 0..per_family {
        let defs = [
            ConstraintDef::Ca1 {
                teams: subset(&mut rng, num_teams, 3),
                slots: subset(&mut rng, num_slots, num_slots / 2),
                k_min: None,
                k_max: Some(rng.random_range(0..3)),
                mode: mode(&mut rng),
                severity: severity(&mut rng),
            },
            ConstraintDef::Ca2 {
                teams1: subset(&mut rng, num_teams, 2),
                teams2: subset(&mut rng, num_teams, num_teams / 2),
                slots: subset(&mut rng, num_slots, num_slots / 2),
                k_min: Some(rng.random_range(0..2)),
                k_max: Some(2),
                mode: mode(&mut rng),
                severity: severity(&mut rng),
            },
            ConstraintDef::Ca3 {
                teams1: subset(&mut rng, num_teams, 2),
                teams2: subset(&mut rng, num_teams, num_teams / 2),
                window: rng.random_range(2..5),
                k_min: None,
                k_max: Some(rng.random_range(1..3)),
                mode: mode(&mut rng),
                severity: severity(&mut rng),
            },
            ConstraintDef::Ca4 {
                teams1: subset(&mut rng, num_teams, 3),
                teams2: subset(&mut rng, num_teams, 3),
                slots: subset(&mut rng, num_slots, 3),
                k_min: None,
                k_max: Some(rng.random_range(0..3)),
                mode: mode(&mut rng),
                scope: if rng.random_bool(0.5) {
                    Ca4Scope::Global
                } else {
                    Ca4Scope::Every
                },
                severity: severity(&mut rng),
            },
            ConstraintDef::Ga1 {
                meetings: meetings(&mut rng, num_teams, 3),
                slots: subset(&mut rng, num_slots, 4),
                k_min: Some(rng.random_range(0..2)),
                k_max: Some(2),
                severity: severity(&mut rng),
            },
            ConstraintDef::Br1 {
                teams: subset(&mut rng, num_teams, 2),
                slots: subset(&mut rng, num_slots, num_slots / 2),
                k: rng.random_range(0..2),
                mode: mode(&mut rng),
                severity: severity(&mut rng),
            },
            ConstraintDef::Br2 {
                teams: subset(&mut rng, num_teams, num_teams / 2),
                slots: subset(&mut rng, num_slots, num_slots / 2),
                k: rng.random_range(0..4),
                severity: severity(&mut rng),
            },
            ConstraintDef::Fa2 {
                teams: subset(&mut rng, num_teams, 3),
                slots: (0..num_slots).collect(),
                k: rng.random_range(0..2),
                severity: severity(&mut rng),
            },
            ConstraintDef::Se1 {
                teams: subset(&mut rng, num_teams, 3),
                m_min: Some(rng.random_range(0..3)),
                m_max: Some(num_slots as i64 - 2),
                severity: severity(&mut rng),
            },
        ];
        for def in defs {
            builder.add_constraint(def);
        }
    }

    builder.build().expect("random catalog is valid")
}

fn subset(rng: &mut ChaCha8Rng, n: usize, size: usize) -> Vec<usize> {
    let mut all: Vec<usize> = (0..n).collect();
    all.shuffle(rng);
    all.truncate(size.clamp(1, n));
    all
}

fn meetings(rng: &mut ChaCha8Rng, num_teams: usize, count: usize) -> Vec<(usize, usize)> {
    (0..count)
        .map(|_| {
            let pair = subset(rng, num_teams, 2);
            (pair[0], pair[1])
        })
        .collect()
}

fn mode(rng: &mut ChaCha8Rng) -> HomeMode {
    match rng.random_range(0..3) {
        0 => HomeMode::Home,
        1 => HomeMode::Away,
        _ => HomeMode::Any,
    }
}

fn severity(rng: &mut ChaCha8Rng) -> Severity {
    let penalty = rng.random_range(1..6);
    if rng.random_bool(0.3) {
        Severity::hard(penalty)
    } else {
        Severity::soft(penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportsched_core::ConstraintFamily;

    #[test]
    fn test_mixed_catalog_covers_every_family() {
        let catalog = mixed_catalog();
        for family in ConstraintFamily::ALL {
            assert!(catalog.family_len(family) > 0, "{} missing", family);
        }
        assert!(catalog.hard_count() > 0);
    }

    #[test]
    fn test_random_catalog_is_deterministic() {
        let a = random_catalog(8, true, 3, 7);
        let b = random_catalog(8, true, 3, 7);
        assert_eq!(a.constraint_count(), 27);
        assert_eq!(a.ca1(), b.ca1());
        assert_eq!(a.se1(), b.se1());
    }
}
