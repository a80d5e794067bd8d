//! The shared engine handle.
//!
//! [`AudioContext`] owns the render graph behind a mutex and hands out
//! cheaply clonable references. Whoever drives audio (a device callback, a
//! draw loop, a test) calls [`render()`](AudioContext::render) per block;
//! node façades take the same lock for topology changes, so mutations are
//! atomic with respect to block boundaries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::{Error, Result};
use crate::graph::{NodeHandle, RenderGraph};
use crate::sampler::PlayerState;
use crate::tap::TapSink;

/// Handle to a shared render engine.
///
/// Clones refer to the same graph. Dropping the last clone drops the graph
/// and every voice in it.
#[derive(Clone)]
pub struct AudioContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    graph: Mutex<RenderGraph>,
    sample_rate: f32,
    /// Players to poll for natural-end events after each rendered block.
    players: Mutex<Vec<Weak<PlayerState>>>,
}

impl AudioContext {
    /// Creates a context rendering at `sample_rate` Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                graph: Mutex::new(RenderGraph::new(sample_rate)),
                sample_rate,
                players: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Sample rate the engine renders at, in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.inner.sample_rate
    }

    /// Handle of the master output node.
    pub fn destination(&self) -> NodeHandle {
        self.graph().destination()
    }

    /// Adds an edge `from -> to`.
    ///
    /// A released endpoint surfaces as
    /// [`Error::InvalidConnection`](crate::Error::InvalidConnection); the
    /// duplicate and structural checks pass through from the graph.
    pub fn connect(&self, from: NodeHandle, to: NodeHandle) -> Result<()> {
        match self.graph().connect(from, to) {
            Ok(_) => Ok(()),
            Err(Error::NodeNotFound(h)) => Err(Error::InvalidConnection(format!(
                "node {h} is not in the graph"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Removes every outgoing edge of `from`. Idempotent; unknown handles
    /// are ignored.
    pub fn disconnect_all(&self, from: NodeHandle) {
        self.graph().disconnect_all(from);
    }

    /// Removes a node and all its edges. Idempotent; unknown handles are
    /// ignored. Called by façade nodes when they are dropped.
    pub fn release(&self, handle: NodeHandle) {
        let _ = self.graph().remove_node(handle);
    }

    /// Adds a tap node capturing into `sink`. Used by analyzer façades.
    pub fn add_tap(&self, sink: Arc<TapSink>) -> NodeHandle {
        self.graph().add_tap(sink)
    }

    /// Whether a handle refers to a live node.
    pub fn has_node(&self, handle: NodeHandle) -> bool {
        self.graph().has_node(handle)
    }

    /// Number of outgoing edges of a node; 0 for unknown handles.
    pub fn outgoing_edges(&self, handle: NodeHandle) -> usize {
        self.graph().outgoing_count(handle)
    }

    /// Renders one block of the master mix into `out`.
    ///
    /// Ended callbacks for sounds that reached a natural end during this
    /// block are dispatched after the graph lock is released, so user code
    /// never runs inside the render path.
    pub fn render(&self, out: &mut [f32]) {
        self.graph().render_block(out);
        self.dispatch_ended();
    }

    pub(crate) fn graph(&self) -> MutexGuard<'_, RenderGraph> {
        self.inner
            .graph
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register_player(&self, state: &Arc<PlayerState>) {
        let mut players = self
            .inner
            .players
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        players.retain(|w| w.strong_count() > 0);
        players.push(Arc::downgrade(state));
    }

    fn dispatch_ended(&self) {
        let ended: Vec<Arc<PlayerState>> = {
            let players = self
                .inner
                .players
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            players
                .iter()
                .filter_map(Weak::upgrade)
                .filter(|p| p.take_ended())
                .collect()
        };
        for player in ended {
            // Take the callback out before calling it, so a callback that
            // re-registers on its own node does not deadlock on the slot.
            let taken = player
                .on_ended
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(mut cb) = taken {
                cb();
                let mut slot = player
                    .on_ended
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if slot.is_none() {
                    *slot = Some(cb);
                }
            }
        }
    }
}
