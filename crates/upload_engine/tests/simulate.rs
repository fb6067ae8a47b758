use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use upload_engine::{
    run_processing, run_upload, EngineEvent, ProgressSink, SimulationSettings, FAILURE_MESSAGE,
};

#[derive(Default, Clone)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[tokio::test(start_paused = true)]
async fn upload_run_starts_then_ticks_every_interval() {
    let settings = SimulationSettings::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let task = {
        let settings = settings.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(7);
            run_upload(3, 1, &settings, &mut rng, &sink, &cancel).await;
        })
    };

    // Three ticks at 200, 400 and 600 ms.
    tokio::time::sleep(Duration::from_millis(650)).await;
    cancel.cancel();
    task.await.unwrap();

    let events = sink.take();
    assert_eq!(events[0], EngineEvent::UploadStarted { file_id: 3, run: 1 });
    let increments: Vec<u8> = events[1..]
        .iter()
        .map(|event| match event {
            EngineEvent::UploadTick {
                file_id: 3,
                run: 1,
                increment,
            } => *increment,
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(increments.len(), 3);
    assert!(increments
        .iter()
        .all(|increment| settings.increment_range().contains(increment)));
}

#[tokio::test(start_paused = true)]
async fn cancelled_upload_run_stops_emitting() {
    let settings = SimulationSettings::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut rng = StdRng::seed_from_u64(1);
    run_upload(1, 1, &settings, &mut rng, &sink, &cancel).await;

    assert_eq!(sink.take(), vec![EngineEvent::UploadStarted { file_id: 1, run: 1 }]);
}

#[tokio::test(start_paused = true)]
async fn certain_failure_fails_on_first_tick() {
    let settings = SimulationSettings {
        failure_rate: 1.0,
        ..SimulationSettings::default()
    };
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let mut rng = StdRng::seed_from_u64(1);
    run_upload(5, 2, &settings, &mut rng, &sink, &cancel).await;

    let events = sink.take();
    assert_eq!(events.len(), 2);
    match &events[1] {
        EngineEvent::UploadFailed {
            file_id: 5,
            run: 2,
            error,
        } => assert_eq!(error.message, FAILURE_MESSAGE),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn processing_reports_records_after_delay() {
    let settings = SimulationSettings::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();
    let started = tokio::time::Instant::now();

    let mut rng = StdRng::seed_from_u64(11);
    run_processing(4, 1, &settings, &mut rng, &sink, &cancel).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(settings.processing_min_ms));
    assert!(elapsed < Duration::from_millis(settings.processing_max_ms));
    match sink.take().as_slice() {
        [EngineEvent::ProcessingFinished {
            file_id: 4,
            run: 1,
            records,
        }] => assert!(settings.record_range().contains(records)),
        other => panic!("unexpected events {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_processing_reports_nothing() {
    let settings = SimulationSettings::default();
    let sink = TestSink::default();
    let cancel = CancellationToken::new();

    let task = {
        let settings = settings.clone();
        let sink = sink.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(2);
            run_processing(9, 1, &settings, &mut rng, &sink, &cancel).await;
        })
    };
    tokio::time::sleep(Duration::from_millis(500)).await;
    cancel.cancel();
    task.await.unwrap();

    assert!(sink.take().is_empty());
}
