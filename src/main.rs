use color_eyre::eyre::{Result, eyre};
use star_raffle::app::{self, AppConfig, DataSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: star-raffle [--fetch | --file <path> | --demo] [--cache <path>] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --fetch             Fetch the leaderboard from the AoC API (needs YEAR,\n\
                               SESSION_TOKEN and LEADERBOARD_ID in the environment)\n\
           --file <path>       Load a locally exported leaderboard JSON file\n\
           --demo              Generate sample data, no credentials needed\n\
           --cache <path>      Override the fetch cache file (default {})\n\
           --log-dir <path>    Directory for the log file (default .)",
        star_raffle::fetch::DEFAULT_CACHE_PATH,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<(AppConfig, PathBuf)> {
    let mut args = std::env::args().skip(1);
    let mut source: Option<DataSource> = None;
    let mut cache_path: Option<String> = None;
    let mut log_dir: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fetch" => {
                if source.is_some() {
                    return Err(eyre!(
                        "Multiple data sources provided; choose one of --fetch/--file/--demo"
                    ));
                }
                source = Some(DataSource::Fetch);
            }
            "--file" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--file requires a path argument"))?;
                if source.is_some() {
                    return Err(eyre!(
                        "Multiple data sources provided; choose one of --fetch/--file/--demo"
                    ));
                }
                source = Some(DataSource::File(PathBuf::from(
                    shellexpand::tilde(&path).into_owned(),
                )));
            }
            "--demo" => {
                if source.is_some() {
                    return Err(eyre!(
                        "Multiple data sources provided; choose one of --fetch/--file/--demo"
                    ));
                }
                source = Some(DataSource::Demo);
            }
            "--cache" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--cache requires a path argument"))?;
                if cache_path.is_some() {
                    return Err(eyre!("--cache may only be specified once"));
                }
                cache_path = Some(path);
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let source = source
        .ok_or_else(|| eyre!("Select a data source with --fetch, --file <path>, or --demo"))?;
    let log_dir = PathBuf::from(
        shellexpand::tilde(log_dir.as_deref().unwrap_or(".")).into_owned(),
    );
    Ok((AppConfig { source, cache_path }, log_dir))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let (config, log_dir) = parse_cli_args()?;

    // The TUI owns the terminal, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, "star-raffle.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    tracing::info!("starting star-raffle");

    app::run_app(config).await
}
