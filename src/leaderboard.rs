use crate::error::{DrawError, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One completed puzzle part. The upstream record carries timestamps and a
/// global star index; the draw only cares that the record exists.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Completion {
    #[serde(default)]
    pub get_star_ts: Option<i64>,
    #[serde(default)]
    pub star_index: Option<u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Member {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// day number (as string) -> part number ("1"/"2") -> completion record
    #[serde(default)]
    pub completion_day_level: HashMap<String, HashMap<String, Completion>>,
}

impl Member {
    /// Display name, falling back to an anonymous label when the member has
    /// hidden their name on the leaderboard.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("(Anon #{})", self.id),
        }
    }

    /// Count of distinct parts completed for `day` (1 or 2 in practice).
    pub fn stars_for_day(&self, day: u32) -> usize {
        self.completion_day_level
            .get(&day.to_string())
            .map_or(0, |parts| parts.len())
    }
}

/// The decoded private-leaderboard payload, exclusions already applied
/// upstream. Keyed by member id rendered as a string, as the API sends it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Leaderboard {
    pub members: HashMap<String, Member>,
}

/// Decodes a raw JSON payload into a `Leaderboard`. A payload without the
/// `members` key (or with members of the wrong shape) is rejected outright.
pub fn parse_leaderboard(raw: &str) -> Result<Leaderboard> {
    serde_json::from_str(raw).map_err(|e| DrawError::InvalidData(e.to_string()))
}

/// Every day that at least one member has a completion record for, ascending.
pub fn available_days(leaderboard: &Leaderboard) -> Vec<u32> {
    leaderboard
        .members
        .values()
        .flat_map(|member| member.completion_day_level.keys())
        .filter_map(|day| day.parse::<u32>().ok())
        .unique()
        .sorted()
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    const SAMPLE_JSON: &str = r#"{
        "event": "2024",
        "owner_id": 11,
        "members": {
            "11": {
                "id": 11,
                "name": "Ada",
                "completion_day_level": {
                    "1": { "1": { "get_star_ts": 1733035000 }, "2": { "get_star_ts": 1733035900 } },
                    "3": { "1": { "get_star_ts": 1733207000 } }
                }
            },
            "12": {
                "id": 12,
                "name": null,
                "completion_day_level": {
                    "1": { "1": { "get_star_ts": 1733036000 } }
                }
            },
            "13": {
                "id": 13,
                "name": "Grace",
                "completion_day_level": {}
            }
        }
    }"#;

    #[test]
    fn parse_leaderboard__valid_payload__decodes_members() {
        let leaderboard = parse_leaderboard(SAMPLE_JSON).unwrap();

        assert_eq!(leaderboard.members.len(), 3);
        assert_eq!(leaderboard.members["11"].name.as_deref(), Some("Ada"));
    }

    #[test]
    fn parse_leaderboard__missing_members_key__invalid_data() {
        let result = parse_leaderboard(r#"{"event": "2024"}"#);

        assert!(matches!(result, Err(DrawError::InvalidData(_))));
    }

    #[test]
    fn parse_leaderboard__not_json__invalid_data() {
        let result = parse_leaderboard("<html>session expired</html>");

        assert!(matches!(result, Err(DrawError::InvalidData(_))));
    }

    #[test]
    fn available_days__sample__sorted_unique_days() {
        let leaderboard = parse_leaderboard(SAMPLE_JSON).unwrap();

        assert_eq!(available_days(&leaderboard), vec![1, 3]);
    }

    #[test]
    fn available_days__no_completions__empty() {
        let leaderboard = Leaderboard {
            members: HashMap::new(),
        };

        assert!(available_days(&leaderboard).is_empty());
    }

    #[test]
    fn display_name__anonymous_member__synthesized_label() {
        let leaderboard = parse_leaderboard(SAMPLE_JSON).unwrap();

        assert_eq!(leaderboard.members["12"].display_name(), "(Anon #12)");
    }

    #[test]
    fn stars_for_day__two_parts__two_stars() {
        let leaderboard = parse_leaderboard(SAMPLE_JSON).unwrap();

        assert_eq!(leaderboard.members["11"].stars_for_day(1), 2);
        assert_eq!(leaderboard.members["11"].stars_for_day(3), 1);
        assert_eq!(leaderboard.members["11"].stars_for_day(2), 0);
    }
}
