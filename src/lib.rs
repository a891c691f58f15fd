//! Raffle-wheel draw for an Advent of Code private leaderboard: every star
//! earned on the selected day is one ticket on a spinning wheel, and a fixed
//! pointer reads off the winner once the wheel stops.
//!
//! The draw core (`entries`, `wheel`, `spin`, `winner`, `controller`) is
//! pure: no I/O, rotation math and entry weighting only. Data acquisition
//! (`fetch`, `demo`) and the terminal front end (`ui`, `app`) sit around it
//! as collaborators.

pub mod app;
pub mod controller;
pub mod demo;
pub mod entries;
pub mod error;
pub mod fetch;
pub mod leaderboard;
pub mod spin;
pub mod ui;
pub mod wheel;
pub mod winner;
