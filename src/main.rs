#[macro_use] extern crate log;
extern crate env_logger;

use std::path::PathBuf;
use std::sync::Arc;

use async_std::channel::{ self, Sender };
use async_std::io::{ self, BufReader };
use async_std::prelude::*;
use async_std::task;
use clap::Parser;

use league_standings::config::OverlayConfig;
use league_standings::divisions::DivisionMap;
use league_standings::iracing::data_producer::StandingsTask;
use league_standings::iracing::synthetic::SyntheticSession;
use league_standings::overlay::{ DivisionFilter, LeaderboardOverlay, Overlays };
use league_standings::publish;

#[derive(Debug, Parser)]
#[command(about = "Live division leaderboard for league races")]
struct Args {
    /// Overlay settings file.
    #[arg(long, default_value = "league_overlay.json")]
    config: PathBuf,

    /// Driver to division file, overrides the one named in the settings.
    #[arg(long)]
    divisions: Option<PathBuf>,

    /// Starting division filter (`All`, `Mine` or a division), overrides the settings.
    #[arg(long)]
    filter: Option<String>,
}

async fn forward_console(input_sender: Sender<String>) {
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next().await {
        match line {
            Ok(line) => if input_sender.send(line).await.is_err() {
                break;
            },
            Err(err) => {
                warn!("Stopped reading console input: {}", err);
                break;
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let args = Args::parse();

    let config = match OverlayConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{}, using defaults", err);
            OverlayConfig::default()
        }
    };

    let division_file = args.divisions.unwrap_or_else(|| config.division_file.clone());
    let divisions = match DivisionMap::load(&division_file) {
        Ok(divisions) => divisions,
        Err(err) => {
            warn!("{}, every driver is in the default division", err);
            DivisionMap::new()
        }
    };

    let (publisher, reader) = publish::channel();

    let source = SyntheticSession::new(config.synthetic_cars, config.poll_interval()).into_stream();
    let data_producer = StandingsTask::new(source, publisher, Arc::new(divisions));
    let data_producer_thread = task::spawn(async move {
        data_producer.execute().await
    });

    let (input_sender, input_receiver) = channel::unbounded();
    task::spawn(forward_console(input_sender));

    let filter = DivisionFilter::from_label(args.filter.as_deref().unwrap_or(&config.division_filter));
    info!("Starting with division filter {}, press Enter to toggle it", filter.label());

    let mut overlays = Overlays::new(reader, config.render_interval());
    overlays.add(Box::new(LeaderboardOverlay::new(config.division_cycle.clone(), filter)));
    overlays.listen(input_receiver);
    task::block_on(overlays.run());

    task::block_on(data_producer_thread);
}
