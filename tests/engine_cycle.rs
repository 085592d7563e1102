use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tickscope::engine::{Engine, EngineConfig, Mode};
use tickscope::tick::TickState;

#[test]
fn oscillator_engine_fills_publishes_and_stops() {
    let config = EngineConfig {
        frequency_hz: 2.0,
        cadence_hz: Some(120.0),
        buffer_capacity: 64,
        viewport_width: 320.0,
        viewport_height: 200.0,
        ..Default::default()
    };
    let (mut engine, _handle) = Engine::new(config).unwrap();
    assert!(!engine.is_fallback_clock());

    let ticks = Arc::new(AtomicU64::new(0));
    {
        let ticks = Arc::clone(&ticks);
        engine.on_geometry(move |_| {
            ticks.fetch_add(1, Ordering::Relaxed);
        });
    }

    engine.start();
    thread::sleep(Duration::from_millis(300));
    engine.stop();
    assert_eq!(engine.tick_state(), TickState::Stopped);

    // The sink fired and every published vertex is inside the viewport.
    assert!(ticks.load(Ordering::Relaxed) >= 2);
    let geometry = engine.latest_geometry();
    assert!(!geometry.points.is_empty());
    for &(x, y) in &geometry.points {
        assert!((0.0..=320.0).contains(&x));
        assert!((0.0..=200.0).contains(&y));
    }

    // A stopped engine publishes nothing further.
    let frozen = engine.latest_geometry();
    thread::sleep(Duration::from_millis(50));
    assert!(Arc::ptr_eq(&engine.latest_geometry(), &frozen));
}

#[test]
fn telemetry_engine_plots_pushed_values_on_the_fallback_clock() {
    let config = EngineConfig {
        mode: Mode::Telemetry,
        buffer_capacity: 32,
        ..Default::default()
    };
    let (mut engine, handle) = Engine::new(config).unwrap();
    // No cadence supplied: the fallback interval timer drives the engine.
    assert!(engine.is_fallback_clock());

    engine.start();
    handle.push_raw(127.0);
    // Nominal 60 Hz fallback: 200ms covers several ticks, so the pushed
    // value lands and is then held.
    thread::sleep(Duration::from_millis(200));
    engine.stop();

    let geometry = engine.latest_geometry();
    assert!(!geometry.points.is_empty());
    // A full-scale controller value maps to +1, the top edge (y = 0).
    let &(_, last_y) = geometry.points.last().unwrap();
    assert!(last_y.abs() < 1e-9, "expected top-edge hold, got y={last_y}");
}
