// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `jobfeed watch`: stream one job's events until the job ends.

use std::future::Future;
use std::io::Write;

use jf_core::{FeedEvent, JobState, JobTracker};
use tokio::sync::mpsc;

use crate::cli::{FeedArgs, OutputFormat};
use crate::colors::Palette;
use crate::display::{event_json, format_event, format_summary};
use crate::error::{Error, Result};
use crate::sync::{ConnectionPhase, ConnectionState, ErrorKind, FeedClient, Handlers};

use super::resolve_config;

pub async fn run(
    job_id: String,
    feed: FeedArgs,
    no_reconnect: bool,
    reconnect_interval_ms: Option<u64>,
    max_reconnect_attempts: Option<u32>,
    output: OutputFormat,
) -> Result<()> {
    let mut config = resolve_config(&feed)?;
    if no_reconnect {
        config.auto_reconnect = false;
    }
    if let Some(ms) = reconnect_interval_ms {
        config.reconnect_interval_ms = ms;
    }
    if let Some(n) = max_reconnect_attempts {
        config.max_reconnect_attempts = n;
    }
    let options = config.client_options(&job_id)?;

    let (tx, events) = mpsc::unbounded_channel();
    let client = FeedClient::new(options, forwarding_handlers(tx));
    let mut printer = Printer::new(std::io::stdout(), output, Palette::detect());

    let result = follow(&client, &job_id, events, &mut printer, tokio::signal::ctrl_c()).await;
    client.shutdown().await;
    result
}

/// Handlers that forward every callback into `tx` as a [`FeedEvent`].
pub(crate) fn forwarding_handlers(tx: mpsc::UnboundedSender<FeedEvent>) -> Handlers {
    let forward = |tx: &mpsc::UnboundedSender<FeedEvent>| {
        let tx = tx.clone();
        move |event: FeedEvent| {
            // The receiver only goes away once the watch is over
            let _ = tx.send(event);
        }
    };

    let (progress, state, video, video_done, video_failed) =
        (forward(&tx), forward(&tx), forward(&tx), forward(&tx), forward(&tx));
    let (completed, failed, canceled) = (forward(&tx), forward(&tx), forward(&tx));
    let created = forward(&tx);

    Handlers::new()
        .on_progress(move |p| progress(FeedEvent::Progress(p.clone())))
        .on_state_change(move |t| state(FeedEvent::StateChanged(t.clone())))
        .on_video_created(move |v| created(FeedEvent::VideoCreated(v.clone())))
        .on_video_update(move |v| video(FeedEvent::VideoUpdated(v.clone())))
        .on_video_completed(move |v| video_done(FeedEvent::VideoCompleted(v.clone())))
        .on_video_failed(move |v| video_failed(FeedEvent::VideoFailed(v.clone())))
        .on_job_completed(move |o| completed(FeedEvent::JobCompleted(o.clone())))
        .on_job_failed(move |o| failed(FeedEvent::JobFailed(o.clone())))
        .on_job_canceled(move |o| canceled(FeedEvent::JobCanceled(o.clone())))
}

/// Writes events in the selected output format.
pub(crate) struct Printer<W> {
    out: W,
    format: OutputFormat,
    palette: Palette,
}

impl<W: Write> Printer<W> {
    pub(crate) fn new(out: W, format: OutputFormat, palette: Palette) -> Self {
        Printer {
            out,
            format,
            palette,
        }
    }

    fn event(&mut self, event: &FeedEvent) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", format_event(event, &self.palette))?,
            OutputFormat::Json => {
                writeln!(self.out, "{}", serde_json::to_string(&event_json(event)?)?)?
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Text output only; JSON consumers already have every event.
    fn summary(&mut self, tracker: &JobTracker) -> Result<()> {
        if self.format == OutputFormat::Text {
            for line in format_summary(tracker, &self.palette) {
                writeln!(self.out, "{}", line)?;
            }
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Connects and prints events until the job ends, the feed ends, or
/// `interrupt` resolves.
pub(crate) async fn follow<W: Write>(
    client: &FeedClient,
    job_id: &str,
    mut events: mpsc::UnboundedReceiver<FeedEvent>,
    printer: &mut Printer<W>,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<()> {
    let mut tracker = JobTracker::new();
    let mut states = client.subscribe();
    tokio::pin!(interrupt);

    client.connect().await;

    loop {
        // Events routed before this state was published are already queued
        let state = states.borrow_and_update().clone();
        while let Ok(event) = events.try_recv() {
            if let Some(end) = on_event(job_id, &event, &mut tracker, printer)? {
                return end;
            }
        }
        if let Some(end) = feed_ended(&state) {
            return end;
        }

        tokio::select! {
            biased;

            result = &mut interrupt => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "failed to listen for interrupt");
                }
                tracing::info!("interrupted");
                return Ok(());
            }

            event = events.recv() => match event {
                Some(event) => {
                    if let Some(end) = on_event(job_id, &event, &mut tracker, printer)? {
                        return end;
                    }
                }
                None => return Ok(()),
            },

            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

/// Prints one event. Returns the watch result once the job has ended.
fn on_event<W: Write>(
    job_id: &str,
    event: &FeedEvent,
    tracker: &mut JobTracker,
    printer: &mut Printer<W>,
) -> Result<Option<Result<()>>> {
    tracker.apply(event);
    printer.event(event)?;

    let ended = match event {
        FeedEvent::JobCompleted(_) => None,
        FeedEvent::JobFailed(_) => Some(JobState::Failed),
        FeedEvent::JobCanceled(_) => Some(JobState::Canceled),
        _ => return Ok(None),
    };
    printer.summary(tracker)?;
    Ok(Some(match ended {
        None => Ok(()),
        Some(state) => Err(Error::JobEnded {
            job_id: job_id.to_string(),
            state: state.as_str().to_string(),
        }),
    }))
}

/// The watch result once no further events can arrive.
fn feed_ended(state: &ConnectionState) -> Option<Result<()>> {
    match state.phase {
        ConnectionPhase::Disconnected | ConnectionPhase::Closed => {}
        _ => return None,
    }
    match state.error {
        Some(ref e) if e.kind() != ErrorKind::Decode => {
            tracing::debug!(error = %e, "feed ended with error");
            Some(Err(Error::Feed(e.clone())))
        }
        _ => {
            tracing::info!("feed closed by server");
            Some(Ok(()))
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
