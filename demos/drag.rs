use chrono::{TimeZone, Utc};
use tempoch_snap::{Duration, Instant, IntervalSet, RoundingMode, SnapContext, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tempoch_snap=debug,info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let day = |d| Instant::from_utc(Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap());

    let ctx = SnapContext::new()
        .with_millis_per_pixel(Some(60_000.0))
        .with_resolution_pixels(15)
        .with_available_durations([Duration::hours(6), Duration::days(1), Duration::days(3)])
        .with_max_duration(Some(Duration::weeks(1)))
        .with_skipped([Span::new(day(4), day(5))]);

    let active = Span::new(day(1), day(2));
    println!("Active span: {active}");

    // Translate the active span so that it ends mid-way through the skipped day.
    let translate = ctx.active_span_end(active);
    let target = day(4) + Duration::hours(13);
    for mode in RoundingMode::ALL {
        println!("  move end to {target} ({mode}) -> {}", translate.snap(target, mode));
    }

    // Stretch the end of the active span.
    let resize = ctx.active_duration_end(active.start, active.end);
    for t in [day(2) + Duration::minutes(20), day(3) + Duration::hours(7), day(6)] {
        println!(
            "  resize end to {t} -> {}",
            resize.snap(t, RoundingMode::HalfUp)
        );
    }

    println!("Free windows in June 1-7:");
    for window in ctx.free_windows(Span::new(day(1), day(8))) {
        println!("  {window}");
    }

    let mut loads = IntervalSet::new();
    for (a, b) in [(1, 2), (3, 4), (2, 3)] {
        for change in loads.insert(Span::new(day(a), day(b))) {
            println!(
                "Load interval {} replaces {} span(s)",
                change.with,
                change.replaced.len()
            );
        }
    }
}
