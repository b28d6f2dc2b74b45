use tracing::trace;

/// Layout work requested for the next frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayoutRequest {
    /// Re-pack every card.
    Full,
    /// Replay the prefix, then re-pack from this card index onward.
    From(usize),
}

impl LayoutRequest {
    /// Combines two requests into the cheapest pass that satisfies both.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (LayoutRequest::From(a), LayoutRequest::From(b)) => LayoutRequest::From(a.min(b)),
            _ => LayoutRequest::Full,
        }
    }
}

/// Coalesces layout requests raised between two frames.
///
/// DOM mutations, image loads and resizes all ask for layout; the host runs at
/// most one pass per frame by calling [`FrameRequests::take`] from its
/// next-frame callback.
#[derive(Debug, Default)]
pub struct FrameRequests {
    index: u64,
    pending: Option<LayoutRequest>,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0-based index of the next frame to be taken.
    pub fn frame_index(&self) -> u64 {
        self.index
    }

    pub fn pending(&self) -> Option<LayoutRequest> {
        self.pending
    }

    pub fn request(&mut self, req: LayoutRequest) {
        self.pending = Some(match self.pending {
            Some(prev) => prev.merge(req),
            None => req,
        });
    }

    /// Ends the current frame and hands back the merged request, if any.
    pub fn take(&mut self) -> Option<LayoutRequest> {
        let req = self.pending.take();
        if let Some(req) = req {
            trace!(frame = self.index, ?req, "layout frame");
        }
        self.index = self.index.wrapping_add(1);
        req
    }
}
