//! The presentation side: reads whatever leaderboard was published last, at
//! its own pace, and renders it as text.

use std::sync::Arc;
use std::time::Duration;

use async_std::channel::Receiver;
use async_std::task;

use crate::publish::StandingsReader;
use crate::standings::{ RaceStandingsRow, Standings };

/// Pseudo-division that stands for "no filter" in the division cycle.
pub const ALL_DIVISIONS: &str = "All";

pub trait Drawable {
    fn draw(self: &mut Self) -> Vec<String>;
}

pub trait StateUpdater {
    fn update_state(self: &mut Self, standings: &Arc<Standings>);
}

pub trait Overlay: Drawable + StateUpdater + Send {
    fn name(&self) -> &str;

    /// One line typed on the console.
    fn handle_input(&mut self, _input: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivisionFilter {
    All,
    /// Only the division of the player's car.
    MyDivision,
    Only(String),
}

impl DivisionFilter {
    /// Parses a filter as written in the settings or on the command line:
    /// `All`, `Mine`, or a division label.
    pub fn from_label(label: &str) -> DivisionFilter {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL_DIVISIONS) {
            DivisionFilter::All
        } else if label.eq_ignore_ascii_case("mine") {
            DivisionFilter::MyDivision
        } else {
            DivisionFilter::Only(label.to_string())
        }
    }

    /// The filter after pressing the division button once.
    ///
    /// With the player on track this flips between everyone and the player's
    /// division. Otherwise it walks `cycle`, skipping divisions nobody is in.
    pub fn toggle(&self, standings: &Standings, cycle: &[String]) -> DivisionFilter {
        if standings.player_row().is_some() {
            return match self {
                DivisionFilter::MyDivision => DivisionFilter::All,
                _ => DivisionFilter::MyDivision,
            };
        }

        let present = standings.divisions_present();
        let options: Vec<&String> = cycle.iter()
            .filter(|division| division.as_str() == ALL_DIVISIONS || present.contains(division.as_str()))
            .collect();

        let next = match self {
            DivisionFilter::Only(current) => options.iter()
                .position(|option| *option == current)
                .and_then(|idx| options.get((idx + 1) % options.len()))
                .or_else(|| options.first()),
            _ => options.first(),
        };

        match next {
            Some(division) if division.as_str() != ALL_DIVISIONS => DivisionFilter::Only(division.to_string()),
            _ => DivisionFilter::All,
        }
    }

    pub fn apply<'s>(&self, standings: &'s Standings) -> Vec<&'s RaceStandingsRow> {
        let division = match self {
            DivisionFilter::All => None,
            DivisionFilter::MyDivision => standings.player_row().map(|row| row.division.as_str()),
            DivisionFilter::Only(division) => Some(division.as_str()),
        };

        standings.rows.iter()
            .filter(|row| division.map_or(true, |division| row.division == division))
            .collect()
    }

    pub fn label(&self) -> &str {
        match self {
            DivisionFilter::All => "All Divisions",
            DivisionFilter::MyDivision => "My Division",
            DivisionFilter::Only(division) => division,
        }
    }
}

/// The division leaderboard: `Pos C-Pos Car# Driver Div Gap`.
pub struct LeaderboardOverlay {
    standings: Arc<Standings>,
    filter: DivisionFilter,
    division_cycle: Vec<String>,
}

impl LeaderboardOverlay {
    pub fn new(division_cycle: Vec<String>, filter: DivisionFilter) -> LeaderboardOverlay {
        LeaderboardOverlay {
            standings: Arc::new(Standings::default()),
            filter,
            division_cycle,
        }
    }

    pub fn toggle_filter(&mut self) {
        self.filter = self.filter.toggle(&self.standings, &self.division_cycle);
        info!("Division filter: {}", self.filter.label());
    }

    pub fn filter(&self) -> &DivisionFilter {
        &self.filter
    }
}

fn render_row(row: &RaceStandingsRow, is_race: bool) -> String {
    let line = format!("{:>3} {:>5} {:>4} {:<24} {:>7}",
        row.position,
        row.division_position,
        format!("#{}", row.car_number),
        row.driver_name,
        row.gap.display(is_race).to_string());
    if row.is_player { format!("{} <", line) } else { line }
}

impl Drawable for LeaderboardOverlay {
    fn draw(&mut self) -> Vec<String> {
        let is_race = self.standings.is_race();
        let rows = self.filter.apply(&self.standings);

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format!("{} | {} | tick {}",
            if self.standings.session_type.is_empty() { "Waiting for session" } else { self.standings.session_type.as_str() },
            self.filter.label(),
            self.standings.tick));
        lines.push(format!("{:>3} {:>5} {:>4} {:<24} {:>7}", "Pos", "C-Pos", "Car#", "Driver", "Div Gap"));
        lines.extend(rows.into_iter().map(|row| render_row(row, is_race)));
        lines
    }
}

impl StateUpdater for LeaderboardOverlay {
    fn update_state(&mut self, standings: &Arc<Standings>) {
        self.standings = standings.clone();
    }
}

impl Overlay for LeaderboardOverlay {
    fn name(&self) -> &str {
        "Leaderboard"
    }

    /// An empty line (Enter) or `d` presses the division button.
    fn handle_input(&mut self, input: &str) {
        match input {
            "" | "d" => self.toggle_filter(),
            other => debug!("Leaderboard ignores input {:?}", other),
        }
    }
}

pub struct Overlays {
    overlays: Vec<Box<dyn Overlay>>,
    state_receiver: StandingsReader,
    input_receiver: Option<Receiver<String>>,
    interval: Duration,
    seen_tick: Option<u64>,
}

impl Overlays {
    pub fn new(state_receiver: StandingsReader, interval: Duration) -> Overlays {
        Overlays {
            overlays: vec![],
            state_receiver,
            input_receiver: None,
            interval,
            seen_tick: None,
        }
    }

    pub fn add(&mut self, overlay: Box<dyn Overlay>) {
        self.overlays.push(overlay);
    }

    pub fn listen(&mut self, input_receiver: Receiver<String>) {
        self.input_receiver = Some(input_receiver);
    }

    /// Hands pending console input to every overlay. Any input forces a redraw.
    pub fn dispatch_input(&mut self) -> bool {
        let input_receiver = match &self.input_receiver {
            Some(input_receiver) => input_receiver,
            None => return false,
        };

        let mut handled = false;
        while let Ok(input) = input_receiver.try_recv() {
            for overlay in self.overlays.iter_mut() {
                overlay.handle_input(input.trim());
            }
            handled = true;
        }

        if handled {
            self.seen_tick = None;
        }
        handled
    }

    /// Pulls the latest standings and redraws if they changed. Returns the
    /// drawn lines of every overlay, or nothing when there was nothing new.
    pub async fn refresh(&mut self) -> Vec<(String, Vec<String>)> {
        let latest = self.state_receiver.latest().await;
        if self.seen_tick == Some(latest.tick) {
            return vec![];
        }
        self.seen_tick = Some(latest.tick);

        self.overlays.iter_mut()
            .map(|overlay| {
                overlay.update_state(&latest);
                (overlay.name().to_string(), overlay.draw())
            })
            .collect()
    }

    pub async fn run(mut self) {
        loop {
            self.dispatch_input();
            for (name, lines) in self.refresh().await {
                for line in lines {
                    info!("[{}] {}", name, line);
                }
            }
            task::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_std::channel;

    use crate::divisions::DEFAULT_DIVISION;
    use crate::publish::{ self, StandingsSink };
    use crate::standings::Gap;

    fn row(slot: usize, position: i32, division: &str, division_position: usize, gap: Gap, is_player: bool) -> RaceStandingsRow {
        RaceStandingsRow {
            position,
            division_position,
            division: division.to_string(),
            car_number: (slot + 1).to_string(),
            driver_name: format!("Driver {}", slot),
            gap,
            slot,
            is_player,
        }
    }

    fn standings(player: Option<usize>) -> Standings {
        Standings {
            tick: 7,
            session_type: "Race".to_string(),
            rows: vec![
                row(0, 1, "Pro", 1, Gap::Leader, player == Some(0)),
                row(1, 2, "Am", 1, Gap::Leader, player == Some(1)),
                row(2, 3, "Pro", 2, Gap::TimeGap(1.34), player == Some(2)),
                row(3, 4, DEFAULT_DIVISION, 1, Gap::Leader, player == Some(3)),
            ],
        }
    }

    fn cycle() -> Vec<String> {
        ["Pro", "ProAm", "Am", "Rookie", "All"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggles_my_division_when_player_is_on_track() {
        let standings = standings(Some(2));

        let filter = DivisionFilter::All.toggle(&standings, &cycle());
        assert_eq!(filter, DivisionFilter::MyDivision);
        assert_eq!(filter.apply(&standings).iter().map(|row| row.slot).collect::<Vec<_>>(), vec![0, 2]);

        assert_eq!(filter.toggle(&standings, &cycle()), DivisionFilter::All);
    }

    #[test]
    fn cycles_through_populated_divisions_without_player() {
        let standings = standings(None);

        let first = DivisionFilter::All.toggle(&standings, &cycle());
        assert_eq!(first, DivisionFilter::Only("Pro".to_string()));
        let second = first.toggle(&standings, &cycle());
        assert_eq!(second, DivisionFilter::Only("Am".to_string()));
        assert_eq!(second.apply(&standings).len(), 1);
        assert_eq!(second.toggle(&standings, &cycle()), DivisionFilter::All);

        let stale = DivisionFilter::Only("Rookie".to_string());
        assert_eq!(stale.toggle(&standings, &cycle()), DivisionFilter::Only("Pro".to_string()));
    }

    #[test]
    fn draws_formatted_rows() {
        let mut overlay = LeaderboardOverlay::new(cycle(), DivisionFilter::All);
        overlay.update_state(&Arc::new(standings(Some(2))));

        let lines = overlay.draw();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Race | All Divisions"));
        assert!(lines[4].contains("Driver 2"));
        assert!(lines[4].contains(" 1.3"));
        assert!(lines[4].ends_with('<'));
    }

    #[test]
    fn filter_follows_the_latest_standings() {
        let mut overlay = LeaderboardOverlay::new(cycle(), DivisionFilter::All);
        overlay.toggle_filter();
        assert_eq!(overlay.filter(), &DivisionFilter::All);

        overlay.update_state(&Arc::new(standings(Some(1))));
        overlay.toggle_filter();
        assert_eq!(overlay.filter(), &DivisionFilter::MyDivision);
        assert_eq!(overlay.draw().len(), 3);
    }

    #[test]
    fn redraws_only_new_ticks() {
        task::block_on(async {
            let (mut publisher, reader) = publish::channel();
            let mut overlays = Overlays::new(reader, Duration::from_millis(10));
            overlays.add(Box::new(LeaderboardOverlay::new(cycle(), DivisionFilter::All)));

            assert_eq!(overlays.refresh().await.len(), 1);
            assert!(overlays.refresh().await.is_empty());

            publisher.publish(standings(None)).await;
            let drawn = overlays.refresh().await;
            assert_eq!(drawn[0].0, "Leaderboard");
            assert_eq!(drawn[0].1.len(), 6);
        });
    }

    #[test]
    fn parses_filter_labels() {
        assert_eq!(DivisionFilter::from_label("all"), DivisionFilter::All);
        assert_eq!(DivisionFilter::from_label(""), DivisionFilter::All);
        assert_eq!(DivisionFilter::from_label("Mine"), DivisionFilter::MyDivision);
        assert_eq!(DivisionFilter::from_label(" ProAm "), DivisionFilter::Only("ProAm".to_string()));
    }

    #[test]
    fn starts_with_the_configured_filter() {
        let mut overlay = LeaderboardOverlay::new(cycle(), DivisionFilter::from_label("Am"));
        overlay.update_state(&Arc::new(standings(None)));

        let lines = overlay.draw();

        assert!(lines[0].starts_with("Race | Am"));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("Driver 1"));
    }

    #[test]
    fn console_input_toggles_the_filter_and_redraws() {
        task::block_on(async {
            let (mut publisher, reader) = publish::channel();
            let (input_sender, input_receiver) = channel::unbounded();
            let mut overlays = Overlays::new(reader, Duration::from_millis(10));
            overlays.add(Box::new(LeaderboardOverlay::new(cycle(), DivisionFilter::All)));
            overlays.listen(input_receiver);

            publisher.publish(standings(Some(2))).await;
            assert_eq!(overlays.refresh().await[0].1.len(), 6);
            assert!(!overlays.dispatch_input());

            input_sender.send("\n".to_string()).await.unwrap();
            assert!(overlays.dispatch_input());

            let drawn = overlays.refresh().await;
            assert!(drawn[0].1[0].contains("My Division"));
            assert_eq!(drawn[0].1.len(), 4);

            input_sender.send("zoom".to_string()).await.unwrap();
            assert!(overlays.dispatch_input());
            assert!(overlays.refresh().await[0].1[0].contains("My Division"));
        });
    }
}
