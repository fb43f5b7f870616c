use personalens_analyze::{analyze_video_shift, TimedFrame, VideoShiftConfig};
use personalens_embed::{Frame, FrameEmbedder};

fn solid(rgb: [u8; 3]) -> Frame {
    Frame::new(4, 4, rgb.repeat(16))
}

/// Four frames per second for 40 seconds; dark gray that turns red at 24s.
fn clip() -> Vec<TimedFrame> {
    (0..160)
        .map(|i| {
            let time = i as f64 * 0.25;
            let frame = if time < 24.0 { solid([60, 60, 60]) } else { solid([220, 20, 20]) };
            TimedFrame { time, frame }
        })
        .collect()
}

#[test]
fn color_change_spikes() {
    let embedder = FrameEmbedder::new();
    let report = analyze_video_shift(&embedder, &clip(), &VideoShiftConfig::default())
        .unwrap()
        .into_ready()
        .unwrap();

    assert_eq!(report.model.name, "frame-stats-v1");
    assert_eq!(report.meta.frames, 160);
    assert_eq!(report.meta.dropped_frames, 0);
    assert_eq!(report.segments.len(), 20);
    assert_eq!(report.summary.total_segments, 20);
    assert_eq!(report.baseline.segment_indices, (0..9).collect::<Vec<_>>());
    assert!(report.warnings.is_empty());

    let first = &report.segments[0];
    assert_eq!((first.t0, first.t1), (0.0, 4.0));
    assert_eq!(first.frames_available, 16);
    assert_eq!(first.picked_local_indices, (0..16).collect::<Vec<_>>());

    // Windows ending by 24s only ever see gray frames.
    for seg in &report.segments[..=10] {
        assert!(!seg.is_spike, "segment {} spiked", seg.i);
    }
    assert_eq!(report.summary.spike_segments, (11..20).collect::<Vec<_>>());
    let last = report.segments.last().unwrap();
    assert!(last.is_spike);
    assert!(last.dist_to_baseline > 0.01);
    assert!(last.percentile_vs_baseline == Some(100.0));
    assert!(report.summary.visual_consistency_score < 50.0);
}

#[test]
fn frames_past_limit_are_dropped() {
    let embedder = FrameEmbedder::new();
    let cfg = VideoShiftConfig {
        max_seconds: 10.0,
        ..VideoShiftConfig::default()
    };
    let report = analyze_video_shift(&embedder, &clip(), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(report.meta.frames, 41);
    assert_eq!(report.meta.dropped_frames, 119);
    assert_eq!(report.meta.duration_sec, 10.0);
    assert_eq!(report.segments.len(), 6);
    assert_eq!(report.summary.spike_count, 0);
}

#[test]
fn single_frame_is_insufficient() {
    let embedder = FrameEmbedder::new();
    let frames = vec![TimedFrame { time: 0.0, frame: solid([1, 2, 3]) }];
    let out = analyze_video_shift(&embedder, &frames, &VideoShiftConfig::default()).unwrap();
    assert!(!out.is_ready());
    assert!(out.message().unwrap().starts_with("Too few decodable frames"));
}

#[test]
fn frame_order_does_not_matter() {
    let embedder = FrameEmbedder::new();
    let cfg = VideoShiftConfig::default();
    let ordered = analyze_video_shift(&embedder, &clip(), &cfg).unwrap();

    let mut shuffled = clip();
    shuffled.reverse();
    shuffled.swap(3, 97);
    let report = analyze_video_shift(&embedder, &shuffled, &cfg).unwrap();
    assert_eq!(report, ordered);

    let sparse = |times: &[f64]| -> Vec<TimedFrame> {
        times
            .iter()
            .map(|&time| TimedFrame { time, frame: solid([60, 60, 60]) })
            .collect()
    };
    let report = analyze_video_shift(&embedder, &sparse(&[0.0, 9.0, 1.0]), &cfg)
        .unwrap()
        .into_ready()
        .unwrap();
    assert_eq!(report.meta.duration_sec, 9.0);
    assert_eq!(report.segments.len(), 5);
}
