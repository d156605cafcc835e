use serde::Serialize;

/// Transform applied over a segment's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SegmentKind {
    /// The unmodified base frame.
    Identity,
    /// Brighten + center-crop zoom, anchored at a beat.
    Pulse,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn length(&self) -> f32 {
        self.end - self.start
    }
}

/// Precomputed, immutable segmentation of the full track:
/// contiguous, non-overlapping segments covering [0, duration).
///
/// Built once before rendering; the encoder maps it 1:1 to its clip list
/// instead of re-scanning the beat list per frame.
#[derive(Debug, Clone, Serialize)]
pub struct VideoTimeline {
    pub segments: Vec<Segment>,
    pub duration_seconds: f32,
    /// Beats that fell inside an already-emitted pulse window (or past the
    /// track end). Dropped by policy, but counted and reported rather than
    /// silently discarded.
    pub dropped_beats: usize,
}

impl VideoTimeline {
    /// Walks the sorted beat list with a cursor: each usable beat emits an
    /// Identity gap (if any) followed by a Pulse window clamped to the track
    /// end. A beat inside the previous window is dropped.
    pub fn from_beats(beats: &[f32], duration_seconds: f32, window_seconds: f32) -> Self {
        let mut segments = Vec::new();
        let mut dropped_beats = 0;
        let mut cursor = 0.0f32;

        for &beat in beats {
            if beat >= duration_seconds || beat < cursor {
                dropped_beats += 1;
                continue;
            }
            if beat > cursor {
                segments.push(Segment {
                    start: cursor,
                    end: beat,
                    kind: SegmentKind::Identity,
                });
            }
            let end = (beat + window_seconds).min(duration_seconds);
            segments.push(Segment {
                start: beat,
                end,
                kind: SegmentKind::Pulse,
            });
            cursor = end;
        }

        if cursor < duration_seconds {
            segments.push(Segment {
                start: cursor,
                end: duration_seconds,
                kind: SegmentKind::Identity,
            });
        }

        Self {
            segments,
            duration_seconds,
            dropped_beats,
        }
    }

    pub fn pulse_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Pulse)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_covers(timeline: &VideoTimeline) {
        let segs = &timeline.segments;
        assert!(!segs.is_empty());
        assert!(segs[0].start.abs() < EPS);
        assert!((segs.last().unwrap().end - timeline.duration_seconds).abs() < EPS);
        for pair in segs.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < EPS, "gap or overlap");
        }
        for s in segs {
            assert!(s.length() > 0.0, "empty segment");
        }
    }

    #[test]
    fn beat_inside_prior_window_is_dropped() {
        let timeline = VideoTimeline::from_beats(&[2.0, 2.05, 5.0], 6.0, 0.1);

        let expect = [
            (0.0, 2.0, SegmentKind::Identity),
            (2.0, 2.1, SegmentKind::Pulse),
            (2.1, 5.0, SegmentKind::Identity),
            (5.0, 5.1, SegmentKind::Pulse),
            (5.1, 6.0, SegmentKind::Identity),
        ];
        assert_eq!(timeline.segments.len(), expect.len());
        for (seg, &(start, end, kind)) in timeline.segments.iter().zip(expect.iter()) {
            assert!((seg.start - start).abs() < EPS);
            assert!((seg.end - end).abs() < EPS);
            assert_eq!(seg.kind, kind);
        }
        assert_eq!(timeline.dropped_beats, 1);
        assert_covers(&timeline);
    }

    #[test]
    fn no_beats_give_one_identity_segment() {
        let timeline = VideoTimeline::from_beats(&[], 4.0, 0.1);
        assert_eq!(timeline.segments.len(), 1);
        assert_eq!(timeline.segments[0].kind, SegmentKind::Identity);
        assert_covers(&timeline);
    }

    #[test]
    fn beat_at_zero_opens_with_a_pulse() {
        let timeline = VideoTimeline::from_beats(&[0.0], 2.0, 0.1);
        assert_eq!(timeline.segments[0].kind, SegmentKind::Pulse);
        assert!(timeline.segments[0].start.abs() < EPS);
        assert_covers(&timeline);
    }

    #[test]
    fn window_is_clamped_at_track_end() {
        let timeline = VideoTimeline::from_beats(&[5.95], 6.0, 0.1);
        let last = timeline.segments.last().unwrap();
        assert_eq!(last.kind, SegmentKind::Pulse);
        assert!((last.end - 6.0).abs() < EPS);
        assert_covers(&timeline);
    }

    #[test]
    fn beats_past_the_end_are_dropped() {
        let timeline = VideoTimeline::from_beats(&[1.0, 6.0, 7.5], 6.0, 0.1);
        assert_eq!(timeline.pulse_count(), 1);
        assert_eq!(timeline.dropped_beats, 2);
        assert_covers(&timeline);
    }

    #[test]
    fn dense_beats_cover_without_gaps() {
        let beats: Vec<f32> = (0..50).map(|i| i as f32 * 0.13).collect();
        let timeline = VideoTimeline::from_beats(&beats, 10.0, 0.1);
        assert_covers(&timeline);
        assert_eq!(timeline.dropped_beats, 0);
    }
}
