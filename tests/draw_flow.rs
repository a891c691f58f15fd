#![allow(non_snake_case)]

//! End-to-end draw flow against the controller, with a seeded RNG and
//! simulated frame times so the whole run is deterministic.

use rand::SeedableRng;
use rand::rngs::StdRng;
use star_raffle::controller::{DrawController, Phase};
use star_raffle::error::DrawError;
use star_raffle::leaderboard::{available_days, parse_leaderboard};
use star_raffle::wheel;
use star_raffle::winner;
use std::time::{Duration, Instant};

const BOARD_JSON: &str = r#"{
    "event": "2024",
    "owner_id": 1,
    "members": {
        "1": {
            "id": 1,
            "name": "Ada",
            "completion_day_level": {
                "1": { "1": { "get_star_ts": 1733035000 }, "2": { "get_star_ts": 1733035900 } },
                "2": { "1": { "get_star_ts": 1733121400 } }
            }
        },
        "2": {
            "id": 2,
            "name": "Grace",
            "completion_day_level": {
                "1": { "1": { "get_star_ts": 1733036000 } }
            }
        },
        "3": {
            "id": 3,
            "name": null,
            "completion_day_level": {
                "2": { "1": { "get_star_ts": 1733121500 }, "2": { "get_star_ts": 1733122000 } }
            }
        }
    }
}"#;

fn sorted_names(controller: &DrawController) -> Vec<String> {
    let mut names: Vec<String> = controller.entries().iter().map(|e| e.name.clone()).collect();
    names.sort();
    names
}

/// Drives frames at ~60fps from `start` until the spin resolves.
fn run_spin_to_completion(controller: &mut DrawController, start: Instant) -> String {
    let mut last_rotation = controller.rotation();
    for ms in (0..=6000u64).step_by(16) {
        let now = start + Duration::from_millis(ms);
        if let Some(winner) = controller.frame(now).unwrap() {
            return winner.name;
        }
        assert!(
            controller.rotation() >= last_rotation,
            "rotation regressed mid-spin"
        );
        last_rotation = controller.rotation();
    }
    panic!("spin did not resolve within the maximum duration");
}

#[test]
fn full_draw__load_select_spin_dismiss__walks_the_state_machine() {
    // given
    let board = parse_leaderboard(BOARD_JSON).unwrap();
    assert_eq!(available_days(&board), vec![1, 2]);
    let mut controller = DrawController::new();
    let mut rng = StdRng::seed_from_u64(99);

    // when: load data and select day 1
    controller.set_leaderboard(board);
    assert_eq!(controller.phase(), Phase::Idle);
    controller.select_day(1, &mut rng);

    // then: two Ada tickets and one Grace ticket
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(sorted_names(&controller), vec!["Ada", "Ada", "Grace"]);

    // when: spin and drive frames to completion
    let start = Instant::now();
    controller.spin(&mut rng, start).unwrap();
    assert_eq!(controller.phase(), Phase::Spinning);
    let winner_name = run_spin_to_completion(&mut controller, start);

    // then: resolved winner comes from the pool and matches the geometry
    assert_eq!(controller.phase(), Phase::Resolved);
    assert!(["Ada", "Grace"].contains(&winner_name.as_str()));
    let replayed = winner::resolve(controller.entries(), controller.rotation()).unwrap();
    assert_eq!(replayed.name, winner_name);

    // when: dismiss and re-spin from the same pool
    let pool = controller.entries().clone();
    controller.dismiss();
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.entries(), &pool);
    let restart = start + Duration::from_secs(30);
    controller.spin(&mut rng, restart).unwrap();
    let second_winner = run_spin_to_completion(&mut controller, restart);

    // then: still drawn from the unchanged pool (replacement semantics)
    assert!(["Ada", "Grace"].contains(&second_winner.as_str()));
    assert_eq!(controller.entries(), &pool);
}

#[test]
fn full_draw__anonymous_day__uses_anon_labels() {
    // given
    let board = parse_leaderboard(BOARD_JSON).unwrap();
    let mut controller = DrawController::new();
    let mut rng = StdRng::seed_from_u64(5);
    controller.set_leaderboard(board);

    // when
    controller.select_day(2, &mut rng);

    // then: Ada has one star, the anonymous member two
    assert_eq!(sorted_names(&controller), vec!["(Anon #3)", "(Anon #3)", "Ada"]);
}

#[test]
fn full_draw__spin_while_spinning__rejected_without_disturbing_the_job() {
    // given
    let board = parse_leaderboard(BOARD_JSON).unwrap();
    let mut controller = DrawController::new();
    let mut rng = StdRng::seed_from_u64(5);
    controller.set_leaderboard(board);
    controller.select_day(1, &mut rng);
    let start = Instant::now();
    controller.spin(&mut rng, start).unwrap();

    // when
    let second = controller.spin(&mut rng, start + Duration::from_millis(500));

    // then: the original spin still resolves normally
    assert_eq!(second, Err(DrawError::SpinAlreadyActive));
    let winner_name = run_spin_to_completion(&mut controller, start);
    assert!(["Ada", "Grace"].contains(&winner_name.as_str()));
}

#[test]
fn full_draw__day_change_mid_spin__kills_the_job_and_rebuilds() {
    // given
    let board = parse_leaderboard(BOARD_JSON).unwrap();
    let mut controller = DrawController::new();
    let mut rng = StdRng::seed_from_u64(5);
    controller.set_leaderboard(board);
    controller.select_day(1, &mut rng);
    let start = Instant::now();
    controller.spin(&mut rng, start).unwrap();
    controller.frame(start + Duration::from_millis(100)).unwrap();

    // when: the operator switches days mid-spin, then a stale frame fires
    controller.select_day(2, &mut rng);
    let stale = controller.frame(start + Duration::from_secs(10)).unwrap();

    // then
    assert_eq!(stale, None);
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(controller.rotation(), 0.0);
    assert_eq!(controller.entries().len(), 3);
}

#[test]
fn full_draw__frames_render_consistent_geometry() {
    // given
    let board = parse_leaderboard(BOARD_JSON).unwrap();
    let mut controller = DrawController::new();
    let mut rng = StdRng::seed_from_u64(21);
    controller.set_leaderboard(board);
    controller.select_day(1, &mut rng);
    let start = Instant::now();
    controller.spin(&mut rng, start).unwrap();

    // when/then: at every sampled frame the slice list covers the full wheel
    for ms in [0u64, 100, 1000, 2500, 4000] {
        controller.frame(start + Duration::from_millis(ms)).unwrap();
        let slices = wheel::slices(controller.entries(), controller.rotation());
        assert_eq!(slices.len(), 3);
        let total: f64 = slices.iter().map(|s| s.end - s.start).sum();
        assert!((total - std::f64::consts::TAU).abs() < 1e-9);
    }
}
