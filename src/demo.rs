use crate::leaderboard::{Completion, Leaderboard, Member};
use fakeit::name;
use rand::Rng;
use std::collections::HashMap;

const DEMO_DAYS: u32 = 7;

/// Synthesizes a throwaway leaderboard so the wheel can be exercised without
/// AoC credentials. A few members stay anonymous to cover the fallback label.
pub fn demo_leaderboard<R: Rng + ?Sized>(rng: &mut R) -> Leaderboard {
    let member_count = rng.random_range(8..=14);
    let mut members = HashMap::new();
    for id in 1..=member_count {
        let mut completion_day_level = HashMap::new();
        for day in 1..=DEMO_DAYS {
            if !rng.random_bool(0.7) {
                continue;
            }
            let stars = if rng.random_bool(0.6) { 2 } else { 1 };
            let mut parts = HashMap::new();
            for part in 1..=stars {
                parts.insert(part.to_string(), Completion::default());
            }
            completion_day_level.insert(day.to_string(), parts);
        }
        let display_name = if rng.random_bool(0.85) {
            Some(name::full())
        } else {
            None
        };
        members.insert(
            id.to_string(),
            Member {
                id,
                name: display_name,
                completion_day_level,
            },
        );
    }
    Leaderboard { members }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::leaderboard::available_days;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn demo_leaderboard__seeded__yields_members_with_days() {
        let mut rng = StdRng::seed_from_u64(11);

        let board = demo_leaderboard(&mut rng);

        assert!(board.members.len() >= 8);
        assert!(!available_days(&board).is_empty());
    }

    #[test]
    fn demo_leaderboard__star_counts__never_exceed_two() {
        let mut rng = StdRng::seed_from_u64(11);

        let board = demo_leaderboard(&mut rng);

        for member in board.members.values() {
            for parts in member.completion_day_level.values() {
                assert!((1..=2).contains(&parts.len()));
            }
        }
    }
}
