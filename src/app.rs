use crate::controller::{DrawController, Phase};
use crate::error::DrawError;
use crate::ui::{self, UiState, UserEvent};
use crate::wheel::{self, Slice};
use crate::{demo, fetch};
use color_eyre::eyre::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Display refresh while a spin is animating; the controller's `frame` is
/// called once per tick.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Input poll interval when nothing is animating.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Clone, Debug)]
pub enum DataSource {
    /// Cached fetch from the AoC API, configured via the environment.
    Fetch,
    /// A locally exported leaderboard JSON file.
    File(PathBuf),
    /// Synthesized data, no credentials needed.
    Demo,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub source: DataSource,
    pub cache_path: Option<String>,
}

/// Everything the UI needs for one frame, assembled fresh per draw so the
/// presentation layer owns no wheel state of its own.
pub struct AppSnapshot {
    pub source_label: String,
    pub status: String,
    pub days: Vec<u32>,
    pub day_cursor: usize,
    pub selected_day: Option<u32>,
    pub entry_count: usize,
    pub phase: Phase,
    pub slices: Vec<Slice>,
    pub winner: Option<String>,
    pub errors: Vec<String>,
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let mut ui_state = UiState::default();
    ui::terminal_enter(&mut ui_state)?;
    let result = event_loop(&config, &mut ui_state).await;
    ui::terminal_exit()?;
    result
}

fn source_label(source: &DataSource) -> String {
    match source {
        DataSource::Fetch => String::from("AoC API"),
        DataSource::File(path) => format!("file {}", path.display()),
        DataSource::Demo => String::from("demo data"),
    }
}

async fn load_data(config: &AppConfig, controller: &mut DrawController) -> Result<String> {
    let leaderboard = match &config.source {
        DataSource::Fetch => {
            let fetch_config = fetch::FetchConfig::from_env(config.cache_path.as_deref())?;
            fetch::load_leaderboard(&fetch_config).await?
        }
        DataSource::File(path) => fetch::load_file(path)?,
        DataSource::Demo => demo::demo_leaderboard(&mut rand::rng()),
    };
    controller.set_leaderboard(leaderboard);
    Ok(String::from("Loaded!"))
}

fn build_snapshot(
    config: &AppConfig,
    controller: &DrawController,
    status: &str,
    day_cursor: usize,
    errors: &[String],
) -> AppSnapshot {
    AppSnapshot {
        source_label: source_label(&config.source),
        status: status.to_string(),
        days: controller.available_days(),
        day_cursor,
        selected_day: controller.selected_day(),
        entry_count: controller.entries().len(),
        phase: controller.phase(),
        slices: wheel::slices(controller.entries(), controller.rotation()),
        winner: controller.winner().map(|w| w.name.clone()),
        errors: errors.to_vec(),
    }
}

async fn event_loop(config: &AppConfig, ui_state: &mut UiState) -> Result<()> {
    let mut rng = rand::rng();
    let mut controller = DrawController::new();
    let mut day_cursor = 0usize;
    let mut errors: Vec<String> = Vec::new();

    let mut status = match load_data(config, &mut controller).await {
        Ok(message) => message,
        Err(e) => {
            error!(error = %e, "initial data load failed");
            errors.push(format!("{e:#}"));
            String::from("Load failed, press f to retry")
        }
    };

    loop {
        let snapshot = build_snapshot(config, &controller, &status, day_cursor, &errors);
        ui::draw(ui_state, &snapshot)?;

        let timeout = if controller.phase() == Phase::Spinning {
            FRAME_INTERVAL
        } else {
            IDLE_POLL
        };
        match ui::poll_event(ui_state, timeout)? {
            Some(UserEvent::Quit) => break,
            Some(UserEvent::Fetch) => {
                errors.clear();
                status = String::from("Fetching...");
                // paint the progress line before the await blocks the loop
                let progress = build_snapshot(config, &controller, &status, day_cursor, &errors);
                ui::draw(ui_state, &progress)?;
                match load_data(config, &mut controller).await {
                    Ok(message) => {
                        status = message;
                        day_cursor = 0;
                    }
                    Err(e) => {
                        error!(error = %e, "data load failed");
                        errors.push(format!("{e:#}"));
                        status = String::from("Load failed");
                    }
                }
            }
            Some(UserEvent::DayUp) => day_cursor = day_cursor.saturating_sub(1),
            Some(UserEvent::DayDown) => {
                let max = controller.available_days().len().saturating_sub(1);
                day_cursor = (day_cursor + 1).min(max);
            }
            Some(UserEvent::SelectDay) => {
                if let Some(day) = controller.available_days().get(day_cursor).copied() {
                    controller.select_day(day, &mut rng);
                    status = if controller.entries().is_empty() {
                        format!("Day {day}: no qualifying entries")
                    } else {
                        format!("Day {day}: {} entries", controller.entries().len())
                    };
                }
            }
            Some(UserEvent::Spin) => match controller.spin(&mut rng, Instant::now()) {
                Ok(()) => {
                    if controller.phase() == Phase::Spinning {
                        status = String::from("Spinning...");
                    }
                }
                Err(e @ DrawError::SpinAlreadyActive) => {
                    warn!(error = %e, "spin request rejected");
                }
                Err(e) => return Err(e.into()),
            },
            Some(UserEvent::Dismiss) => {
                controller.dismiss();
                status = String::from("Same pool armed, spin again or pick a day");
            }
            Some(UserEvent::Redraw) | None => {}
        }

        if controller.phase() == Phase::Spinning {
            if let Some(winner) = controller.frame(Instant::now())? {
                ui_state.show_winner();
                status = format!("Winner: {}", winner.name);
            }
        }
    }
    Ok(())
}
