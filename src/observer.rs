//! Optional instrumentation seam.
//!
//! Solvers call [`Observer::observe`] at fixed points of a run with a
//! borrowed [`Snapshot`] of the run state. Nothing in the algorithms reads
//! observer output. Snapshot construction is skipped entirely when
//! [`Observer::enabled`] returns `false`.

use serde::Serialize;

use crate::graph::VertexId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Source seeded, nothing relaxed yet.
    Start,
    /// A recursive call begins; `frontier` holds its seeds.
    RecurseEnter,
    /// Pivot search finished; `frontier` holds the seeds, `pivots` the
    /// selected pivots.
    Pivots,
    /// The call's frontier was seeded or its output grew.
    Frontier,
    /// A batch was pulled; `frontier` holds the batch.
    Pull,
    /// A child call returned; `frontier` holds its output.
    RecurseExit,
    /// A base case returned; `frontier` holds its output.
    BaseCase,
    /// The baseline settled `current`.
    Settle,
    /// The baseline improved a neighbour of `current`.
    Relax,
    /// A call (or the whole run, at level `None`) finished.
    Done,
}

/// Borrowed view of the run at one event.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub event: Event,
    pub level: Option<usize>,
    /// Distance component of the active bound; `inf` when unbounded.
    pub bound: f64,
    pub distance: &'a [f64],
    pub finalized: &'a [bool],
    pub frontier: &'a [VertexId],
    pub pivots: &'a [VertexId],
    pub current: Option<VertexId>,
}

pub trait Observer {
    /// When `false` the solver does not build snapshots at all.
    fn enabled(&self) -> bool {
        true
    }

    fn observe(&mut self, snapshot: &Snapshot<'_>);
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn enabled(&self) -> bool {
        (**self).enabled()
    }

    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        (**self).observe(snapshot);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn enabled(&self) -> bool {
        false
    }

    fn observe(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// Owned copy of a [`Snapshot`]. Non-finite numbers serialise as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub event: Event,
    pub level: Option<usize>,
    pub bound: f64,
    pub distance: Vec<f64>,
    pub finalized: Vec<bool>,
    pub frontier: Vec<VertexId>,
    pub pivots: Vec<VertexId>,
    pub current: Option<VertexId>,
}

impl From<&Snapshot<'_>> for Frame {
    fn from(s: &Snapshot<'_>) -> Self {
        Self {
            event: s.event,
            level: s.level,
            bound: s.bound,
            distance: s.distance.to_vec(),
            finalized: s.finalized.to_vec(),
            frontier: s.frontier.to_vec(),
            pivots: s.pivots.to_vec(),
            current: s.current,
        }
    }
}

/// Keeps every frame, or the first `limit` of them.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    frames: Vec<Frame>,
    limit: Option<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { frames: Vec::new(), limit: Some(limit) }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn events(&self) -> impl Iterator<Item = Event> + '_ {
        self.frames.iter().map(|f| f.event)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.frames)
    }

    pub fn write_json<W: std::io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, &self.frames)
    }
}

impl Observer for Recorder {
    fn enabled(&self) -> bool {
        self.limit.map_or(true, |limit| self.frames.len() < limit)
    }

    fn observe(&mut self, snapshot: &Snapshot<'_>) {
        if self.enabled() {
            self.frames.push(Frame::from(snapshot));
        }
    }
}
