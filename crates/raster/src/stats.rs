//! Per-frame rendering statistics.

use serde::{Deserialize, Serialize};

/// Counters accumulated between `begin_frame` and `end_frame`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Triangles that survived culling and were dispatched for drawing.
    pub triangles_rendered: u32,
    /// Vertices submitted through `draw_triangles`.
    pub vertices: u32,
    /// Indices submitted through `draw_triangles`.
    pub indices: u32,
}

impl Stats {
    pub fn reset(&mut self) {
        *self = Stats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset() {
        let mut stats = Stats {
            triangles_rendered: 12,
            vertices: 24,
            indices: 36,
        };
        stats.reset();
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn test_serde_roundtrip() {
        let stats = Stats {
            triangles_rendered: 7,
            vertices: 21,
            indices: 21,
        };
        let s = serde_json::to_string(&stats).expect("serialize");
        let back: Stats = serde_json::from_str(&s).expect("deserialize");
        assert_eq!(back, stats);
    }
}
