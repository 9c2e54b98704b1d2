//! The boundary to a graph layout engine.

use crate::request::GraphRequest;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

/// The placed rectangle of a node, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// The routed polyline of an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    /// Points from source to target.
    pub points: Vec<Point>,
}

/// Geometry for every element of a request, keyed by request identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResponse {
    /// Overall width.
    pub width: f64,
    /// Overall height.
    pub height: f64,
    /// Node rectangles.
    pub nodes: IndexMap<String, NodeGeometry>,
    /// Port anchor points.
    pub ports: IndexMap<String, Point>,
    /// Edge routes.
    pub edges: IndexMap<String, EdgeGeometry>,
}

/// A failure inside or at the boundary of a layout engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The session was used after it was closed.
    #[error("layout session is closed")]
    SessionClosed,
    /// The engine could not start.
    #[error("failed to start layout engine '{engine}': {reason}")]
    StartFailed {
        /// The engine name.
        engine: String,
        /// Why it failed.
        reason: String,
    },
    /// Two elements share an identifier.
    #[error("duplicate identifier '{0}' in layout request")]
    DuplicateId(String),
    /// A node names a parent that is not in the request.
    #[error("node '{node}' has unknown parent '{parent}'")]
    UnknownParent {
        /// The node.
        node: String,
        /// The missing parent.
        parent: String,
    },
    /// An edge names a port that is not in the request.
    #[error("edge '{edge}' refers to unknown port '{port}'")]
    UnknownPort {
        /// The edge.
        edge: String,
        /// The missing port.
        port: String,
    },
    /// Any other engine failure.
    #[error("layout failed: {0}")]
    Engine(String),
}

/// A graph layout engine.
///
/// `start` is called once before the first layout and `shutdown` once after
/// the last; both default to doing nothing for in-process engines.
pub trait LayoutEngine {
    /// A short name for messages.
    fn name(&self) -> &str;

    /// Prepares the engine, for example by launching an external process.
    fn start(&mut self) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Places every node, port and edge of `request`.
    fn layout(&mut self, request: &GraphRequest) -> Result<LayoutResponse, LayoutError>;

    /// Releases whatever `start` acquired.
    fn shutdown(&mut self) -> Result<(), LayoutError> {
        Ok(())
    }
}

/// A started layout engine owned by the caller.
///
/// Open a session once, run any number of layouts, then `close` it. A
/// session dropped while still open shuts its engine down and logs any
/// failure.
pub struct LayoutSession {
    engine: Box<dyn LayoutEngine>,
    open: bool,
}

impl LayoutSession {
    /// Starts `engine` and wraps it in a session.
    pub fn open(mut engine: Box<dyn LayoutEngine>) -> Result<Self, LayoutError> {
        debug!("starting layout engine {}", engine.name());
        engine.start()?;
        Ok(Self { engine, open: true })
    }

    /// The engine name.
    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Returns `true` until the session is closed.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Lays out `request` with the session's engine.
    pub fn layout(&mut self, request: &GraphRequest) -> Result<LayoutResponse, LayoutError> {
        if !self.open {
            return Err(LayoutError::SessionClosed);
        }
        self.engine.layout(request)
    }

    /// Shuts the engine down.
    pub fn close(mut self) -> Result<(), LayoutError> {
        self.open = false;
        debug!("stopping layout engine {}", self.engine.name());
        self.engine.shutdown()
    }
}

impl Drop for LayoutSession {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.engine.shutdown() {
                warn!("layout engine {} did not shut down: {e}", self.engine.name());
            }
        }
    }
}
