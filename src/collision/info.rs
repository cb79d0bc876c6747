/// Result for one edge of the moving body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeCollision {
    /// Fraction along the edge where it first crosses the primary surface.
    pub location: Option<f32>,
}

impl EdgeCollision {
    pub fn is_colliding(&self) -> bool {
        self.location.is_some()
    }
}

/// Per-edge results of the last full pairwise test.
///
/// Meant to be kept and passed to every test of the same pair: storage grows
/// to the edge count on first use and is overwritten in place afterwards.
#[derive(Debug, Clone, Default)]
pub struct CollisionInfo {
    edges: Vec<EdgeCollision>,
    is_colliding: bool,
}

impl CollisionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_colliding(&self) -> bool {
        self.is_colliding
    }

    pub fn edges(&self) -> &[EdgeCollision] {
        &self.edges
    }

    pub fn colliding_edges(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.location.map(|t| (i, t)))
    }

    /// Earliest crossing over all edges.
    pub fn first_contact(&self) -> Option<(usize, f32)> {
        self.colliding_edges()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub(crate) fn begin(&mut self, edge_count: usize) {
        self.edges.resize(edge_count, EdgeCollision::default());
        self.is_colliding = false;
    }

    /// Empties the per-edge results for a frame without contact.
    pub(crate) fn clear(&mut self) {
        self.edges.clear();
        self.is_colliding = false;
    }

    pub(crate) fn record(&mut self, edge: usize, location: Option<f32>) {
        self.edges[edge] = EdgeCollision { location };
        self.is_colliding |= location.is_some();
    }
}
