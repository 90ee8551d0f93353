use std::sync::Arc;

use async_std::channel::Sender;
use async_std::stream::{ Stream, StreamExt };
use async_trait::async_trait;

use crate::divisions::DivisionResolver;
use crate::error::StandingsError;
use crate::iracing::{ SessionInfo, TelemetrySnapshot };
use crate::iracing::data_collector::Update;
use crate::iracing::snapshot::SnapshotLayout;
use crate::publish::StandingsSink;
use crate::standings::{ self, Standings };

/// Builds the leaderboard of one tick. Before any session info has arrived
/// there is no roster, so the leaderboard is empty.
pub fn standings_for(
    tick: u64,
    snapshot: &TelemetrySnapshot,
    session_info: Option<&SessionInfo>,
    divisions: &dyn DivisionResolver,
) -> Result<Standings, StandingsError> {
    let session_info = match session_info {
        Some(session_info) => session_info,
        None => return Ok(Standings { tick, ..Default::default() }),
    };

    let session = session_info.context_for(snapshot.session_num);
    let rows = standings::compute(snapshot, &session_info.roster, &session, snapshot.player_slot, divisions)?;

    Ok(Standings {
        tick,
        session_type: session.session_type,
        rows,
    })
}

/// The acquisition side: turns every telemetry frame of `source` into a
/// leaderboard and hands it to `sink`.
pub struct StandingsTask<S, P> {
    source: S,
    sink: P,
    divisions: Arc<dyn DivisionResolver + Send + Sync>,
}

impl<S, P> StandingsTask<S, P>
where
    S: Stream<Item = Update> + Unpin + Send,
    P: StandingsSink,
{
    pub fn new(source: S, sink: P, divisions: Arc<dyn DivisionResolver + Send + Sync>) -> StandingsTask<S, P> {
        StandingsTask { source, sink, divisions }
    }

    pub async fn execute(mut self) {
        let mut layout = SnapshotLayout::default();
        let mut session_info: Option<SessionInfo> = None;
        let mut tick: u64 = 0;

        while let Some(package) = self.source.next().await {
            match package {
                Update::Headers(headers) => {
                    info!("Received {} telemetry headers", headers.len());
                    layout = SnapshotLayout::new(&headers);
                },
                Update::SessionInfo(session_info_str) => {
                    match SessionInfo::try_from(&session_info_str) {
                        Ok(new_session_info) => {
                            info!["Session info: {} ({}), {} drivers, {} sessions",
                                new_session_info.track.name,
                                new_session_info.track.configuration,
                                new_session_info.roster.drivers.len(),
                                new_session_info.sessions.len()];
                            session_info = Some(new_session_info);
                        },
                        Err(err) => error!["Failed to parse session info: {}", err],
                    }
                },
                Update::Telemetry(telemetry) => {
                    tick += 1;
                    if tick % 60 == 0 {
                        debug!["Package count: {}", tick];
                    }

                    let snapshot = layout.snapshot(&telemetry);
                    let computed = standings_for(tick, &snapshot, session_info.as_ref(), self.divisions.as_ref());
                    match computed {
                        Ok(standings) => self.sink.publish(standings).await,
                        Err(err) => error!["Skipping tick {}: {}", tick, err],
                    }
                }
            }
        }

        info!("Telemetry stream ended after {} frames", tick);
    }
}

#[async_trait]
impl StandingsSink for Sender<Standings> {
    async fn publish(&mut self, standings: Standings) {
        if self.send(standings).await.is_err() {
            warn!("Standings receiver is gone, dropping update");
        }
    }
}
