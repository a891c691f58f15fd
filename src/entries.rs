use crate::leaderboard::Leaderboard;
use rand::Rng;
use rand::seq::SliceRandom;

/// Number of distinct slice colors. Matches the palette the UI renders with;
/// colors are a rendering aid only and carry no selection semantics.
pub const PALETTE_LEN: usize = 11;

/// One raffle ticket. A member holds as many tickets as stars earned on the
/// selected day, so the same name can appear more than once in a pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub name: String,
    pub color_index: usize,
}

/// The full ticket pool for one selected day. Built fresh per day selection
/// and treated as immutable for the duration of a spin.
pub type EntrySet = Vec<Entry>;

/// Builds the weighted ticket pool for `day`: one entry per completed star.
/// Members with no completion record for the day (or an empty one) contribute
/// nothing. Color indices cycle by append position before the shuffle, so one
/// pool always cycles evenly through the palette. The closing Fisher-Yates
/// shuffle only spreads a member's tickets around the wheel; every entry
/// keeps equal angular weight regardless of order.
pub fn build_entries<R: Rng + ?Sized>(
    leaderboard: &Leaderboard,
    day: u32,
    rng: &mut R,
) -> EntrySet {
    let mut entries: EntrySet = Vec::new();
    for member in leaderboard.members.values() {
        let stars = member.stars_for_day(day);
        if stars == 0 {
            continue;
        }
        let name = member.display_name();
        for _ in 0..stars {
            entries.push(Entry {
                name: name.clone(),
                color_index: entries.len() % PALETTE_LEN,
            });
        }
    }
    entries.shuffle(rng);
    entries
}
