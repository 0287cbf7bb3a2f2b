use chrono::{TimeZone, Utc};
use tempoch_snap::{
    avoid_skipped, merge_spans, Duration, DurationSnap, Instant, IntervalSet, ResolutionSnap,
    RoundingMode, SelectableSnap, SnapContext, SnapFunction, Span,
};

fn at(ms: i64) -> Instant {
    Instant::from_millis(ms)
}

fn span(start: i64, end: i64) -> Span {
    Span::new(at(start), at(end))
}

#[test]
fn merge_scenarios_match_expected_lists() {
    assert_eq!(
        merge_spans(&[span(10, 20), span(30, 40)], span(15, 35)),
        vec![span(10, 40)]
    );
    assert_eq!(
        merge_spans(&[span(10, 20), span(50, 60)], span(25, 45)),
        vec![span(10, 20), span(25, 45), span(50, 60)]
    );
}

#[test]
fn merge_stays_sorted_disjoint_and_idempotent() {
    // Deterministic pseudo-random inserts.
    let mut set = IntervalSet::new();
    let mut seed: i64 = 17;
    for _ in 0..200 {
        seed = (seed * 1_103_515_245 + 12_345).rem_euclid(1 << 31);
        let start = seed % 10_000;
        let len = (seed / 10_000) % 300;
        set.insert(span(start, start + len));

        let spans = set.spans();
        for pair in spans.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
    let result = set.spans().to_vec();
    for s in &result {
        assert_eq!(merge_spans(&result, *s), result);
    }
}

#[test]
fn merge_preserves_covered_instants() {
    let inputs = [span(40, 55), span(0, 10), span(12, 20), span(10, 12), span(70, 90), span(50, 72)];
    let mut merged: Vec<Span> = Vec::new();
    for s in inputs {
        merged = merge_spans(&merged, s);
    }
    let covered = |spans: &[Span], p: i64| spans.iter().any(|s| s.start <= at(p) && at(p) < s.end);
    for p in -5..100 {
        assert_eq!(covered(&inputs, p), covered(&merged, p), "instant {p}");
    }
    assert_eq!(merged, vec![span(0, 20), span(40, 90)]);
}

#[test]
fn duration_snap_brackets_input() {
    let snaps = [
        DurationSnap::new(Instant::EPOCH, Duration::milliseconds(1_000)),
        DurationSnap::new(at(123), Duration::minutes(7)),
        DurationSnap::new(Instant::EPOCH, Duration::months(1)),
        DurationSnap::new(Instant::EPOCH, Duration::years(2)),
    ];
    let base = Instant::from_utc(Utc.with_ymd_and_hms(2021, 3, 14, 15, 9, 26).unwrap());
    for snap in &snaps {
        for offset in [-10 * 86_400_000_i64, -1, 0, 1, 2_500, 40 * 86_400_000] {
            let t = base + Duration::milliseconds(offset);
            let floor = snap.snap(t, RoundingMode::Floor);
            let ceil = snap.snap(t, RoundingMode::Ceiling);
            assert!(floor <= t && t <= ceil, "{snap:?} at {t}");
            assert_eq!(snap.snap(floor, RoundingMode::Floor), floor);
            assert_eq!(snap.snap(ceil, RoundingMode::Ceiling), ceil);
        }
    }
}

#[test]
fn duration_snap_reference_scenario() {
    let snap = DurationSnap::new(Instant::EPOCH, Duration::milliseconds(1_000));
    assert_eq!(snap.snap(at(2_500), RoundingMode::Floor), at(2_000));
    assert_eq!(snap.snap(at(2_500), RoundingMode::Ceiling), at(2_999));
}

#[test]
fn selectable_snap_expands_to_a_day() {
    let snap = SelectableSnap::new(
        vec![Duration::hours(1), Duration::days(1)],
        Instant::EPOCH,
        at(3_600_000),
    );
    assert_eq!(
        snap.snap(at(90_000_000), RoundingMode::Floor),
        at(86_400_000)
    );
}

#[test]
fn resolution_without_resolution_is_noop() {
    for snap in [ResolutionSnap::new(None, 1), ResolutionSnap::new(Some(0.0), 5)] {
        for mode in RoundingMode::ALL {
            assert_eq!(snap.snap(at(98_765), mode), at(98_765));
        }
    }
}

#[test]
fn active_span_end_never_lands_in_skipped() {
    let skipped = vec![span(100, 200), span(230, 260), span(400, 800), span(-50, 20)];
    let ctx = SnapContext::new()
        .with_millis_per_pixel(Some(5.0))
        .with_skipped(skipped.clone());
    let length = Duration::milliseconds(40);
    let snap = ctx.active_span_end(span(0, 40));
    for t in (-100..1_000).step_by(7) {
        for mode in RoundingMode::ALL {
            let end = snap.snap(at(t), mode);
            let placed = Span::ending_at(end, length);
            assert!(!ctx.is_skipped(&placed), "{mode} at {t} -> {placed:?}");
        }
    }
}

#[test]
fn avoidance_scenario() {
    let (left, right) = avoid_skipped(at(120), Duration::milliseconds(50), &[span(100, 200)]);
    assert_eq!(left.end, at(100));
    assert_eq!(right.start, at(200));
    assert_eq!(right.end, at(250));

    let snap = SnapContext::new()
        .with_skipped([span(100, 200)])
        .active_span_end(span(0, 50));
    assert_eq!(snap.snap(at(120), RoundingMode::Floor), at(100));
}

#[test]
fn active_duration_end_with_month_boundaries() {
    let jan = Instant::from_utc(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    let mar = Instant::from_utc(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    let ctx = SnapContext::new()
        .with_data_load_duration(Some(Duration::months(1)))
        .with_snap_to_data_boundaries(true);
    let snap = ctx.active_duration_end(jan, jan + Duration::days(3));
    assert!(matches!(snap, SnapFunction::ActiveDurationEnd(_)));
    assert_eq!(
        snap.snap(mar + Duration::days(10), RoundingMode::Floor),
        mar
    );
}

#[test]
fn free_windows_within_loop_span() {
    let ctx = SnapContext::new().with_skipped([span(20, 30), span(50, 70)]);
    assert_eq!(
        ctx.free_windows(span(0, 100)),
        vec![span(0, 20), span(30, 50), span(70, 100)]
    );
}

#[cfg(feature = "serde")]
#[test]
fn serde_context_roundtrip_and_defaults() {
    let ctx = SnapContext::new()
        .with_data_load_duration(Some(Duration::hours(6)))
        .with_snap_to_data_boundaries(true)
        .with_skipped([span(10, 20)]);
    let json = serde_json::to_string(&ctx).unwrap();
    let back: SnapContext = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ctx);

    let partial: SnapContext =
        serde_json::from_str(r#"{"millis_per_pixel": 12.5, "skipped": [{"start": 1, "end": 2}]}"#)
            .unwrap();
    assert_eq!(partial.resolution_pixels, 1);
    assert_eq!(partial.skipped, vec![span(1, 2)]);
}

#[cfg(feature = "serde")]
#[test]
fn serde_duration_keeps_unit() {
    let json = serde_json::to_string(&Duration::months(3)).unwrap();
    assert!(json.contains("Month"));
    let back: Duration = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Duration::months(3));
}
