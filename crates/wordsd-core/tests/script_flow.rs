//! End-to-end flows: a script task drives the engine through a headless
//! driver while the test plays the player.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use wordsd_core::driver::HeadlessDriver;
use wordsd_core::handle::channel;
use wordsd_core::measure::CellMeasure;
use wordsd_core::{
    AckResolution, Config, DialogHandle, EngineClosed, EngineNotice, InputEvent, MessageStyle,
};

struct Harness {
    handle: DialogHandle,
    input: mpsc::UnboundedSender<InputEvent>,
    notices: mpsc::UnboundedReceiver<EngineNotice>,
    driver: tokio::task::JoinHandle<wordsd_core::Engine>,
}

fn harness(config: &Config) -> Harness {
    let (handle, commands) = channel(&config.playback);
    let (notice_tx, notices) = mpsc::unbounded_channel();
    let engine = wordsd_core::Engine::new(config, Arc::new(CellMeasure)).with_notices(notice_tx);
    let (driver, input) = HeadlessDriver::new(engine, commands);
    Harness {
        handle,
        input,
        notices,
        driver: tokio::spawn(driver.run()),
    }
}

const CLICK: InputEvent = InputEvent::PointerDown { x: 0.0, y: 0.0 };

fn transcript_texts(engine: &wordsd_core::Engine) -> Vec<String> {
    engine
        .recorder()
        .transcript()
        .entries()
        .iter()
        .map(|e| e.text.clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_clicks_advance_a_scene() {
    let Harness {
        handle,
        input,
        mut notices,
        driver,
    } = harness(&Config::default());

    let script = tokio::spawn(async move {
        handle.set_recording(true)?;
        let first = handle.say("Hello there.", MessageStyle::Normal).await?;
        let second = handle.say("Mind the stairs.", MessageStyle::Warning).await?;
        handle.clear().await?;
        Ok::<_, EngineClosed>((first, second))
    });

    let mut revealed = Vec::new();
    while let Some(notice) = notices.recv().await {
        match notice {
            EngineNotice::AckRequested => input.send(CLICK).unwrap(),
            EngineNotice::TextRevealed { text, .. } => revealed.push(text),
            EngineNotice::BoardCleared { .. } => break,
            _ => {}
        }
    }

    let (first, second) = script.await.unwrap().unwrap();
    assert_eq!(first, AckResolution::Click);
    assert_eq!(second, AckResolution::Click);
    assert_eq!(revealed, vec!["Hello there.", "Mind the stairs."]);

    let engine = driver.await.unwrap();
    assert_eq!(
        transcript_texts(&engine),
        vec!["Hello there.", "Mind the stairs."]
    );
    assert!(engine.board().entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reveal_takes_one_delay_per_character() {
    let Harness { handle, driver, .. } = harness(&Config::default());

    let started = tokio::time::Instant::now();
    handle.reveal("abcdefghij", MessageStyle::Normal).await.unwrap();
    let elapsed = started.elapsed();

    // Nine delays after the first character, rounded up to the next tick.
    assert!(elapsed >= Duration::from_millis(270), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");

    drop(handle);
    driver.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_fast_forward_skips_acks_but_not_predicates() {
    let Harness {
        handle,
        input,
        mut notices,
        driver,
    } = harness(&Config::default());
    input.send(InputEvent::ModifierDown).unwrap();

    let picks = Arc::new(AtomicUsize::new(0));
    let script = {
        let picks = Arc::clone(&picks);
        tokio::spawn(async move {
            let a = handle.say("One.", MessageStyle::Normal).await?;
            let b = handle.say("Two.", MessageStyle::Normal).await?;
            let on_pick = Arc::clone(&picks);
            handle
                .show_clickable("Pick me", move || {
                    on_pick.fetch_add(1, Ordering::SeqCst);
                })
                .await?;
            let seen = Arc::clone(&picks);
            handle
                .wait_for(move || seen.load(Ordering::SeqCst) > 0)
                .await?;
            handle.show("Picked.").await?;
            Ok::<_, EngineClosed>((a, b))
        })
    };

    let mut choice = None;
    while let Some(notice) = notices.recv().await {
        match notice {
            EngineNotice::EntryShown {
                style: MessageStyle::Clickable,
                bounds,
                ..
            } => choice = Some(bounds),
            EngineNotice::PredicateWaitStarted => break,
            _ => {}
        }
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!script.is_finished());

    let bounds = choice.unwrap();
    input
        .send(InputEvent::PointerDown {
            x: bounds.x,
            y: bounds.y,
        })
        .unwrap();

    let (a, b) = script.await.unwrap().unwrap();
    assert_eq!(a, AckResolution::FastForward);
    assert_eq!(b, AckResolution::FastForward);
    assert_eq!(picks.load(Ordering::SeqCst), 1);

    let engine = driver.await.unwrap();
    assert_eq!(engine.board().last().unwrap().text(), "Picked.");
}

#[tokio::test(start_paused = true)]
async fn test_backlog_opens_scrolled_to_newest() {
    let Harness {
        handle,
        input,
        driver,
        ..
    } = harness(&Config::default());

    handle.set_recording(true).unwrap();
    for i in 1..=50 {
        handle.show(format!("Entry {i}")).await.unwrap();
        if i % 5 == 0 {
            handle.clear().await.unwrap();
        }
    }

    input.send(InputEvent::Wheel { delta_y: -1.0 }).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(handle);

    let engine = driver.await.unwrap();
    let viewer = engine.viewer();
    assert!(viewer.is_open());
    assert!(!engine.recorder().is_armed());

    let rects: Vec<_> = viewer.entries().map(|(rect, _)| rect).collect();
    assert_eq!(rects.len(), 50);
    let config = Config::default();
    assert_eq!(
        rects[49].bottom(),
        config.viewport.height - config.backlog.margin_bottom
    );
    let thumb = viewer.thumb().unwrap();
    assert!(thumb.height < viewer.chrome().track.height);
}
