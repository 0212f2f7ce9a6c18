//! Reconciler Integration Tests
//!
//! Delta composition, replay and reset behavior against a recording engine.

use effect_sync::engine::{Background, EngineCall, RecordingEngine};
use effect_sync::state::{EffectChange, EffectDelta, EffectStateSet, Feature, LayoutMode, StateReconciler};
use pretty_assertions::assert_eq;

fn setup() -> (StateReconciler, RecordingEngine) {
    (StateReconciler::new(), RecordingEngine::new())
}

/// Fold deltas over the defaults, last write per field wins
fn fold(deltas: &[EffectDelta]) -> EffectStateSet {
    let mut state = EffectStateSet::default();
    for delta in deltas {
        for change in delta {
            state.merge(change);
        }
    }
    state
}

// === End-to-End Scenarios ===

#[test]
fn test_blur_and_layout_then_clear_blur() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();

    reconciler
        .apply(
            &mut engine,
            &EffectDelta::new().blur(5.0).layout(LayoutMode::LeftBottom),
        )
        .unwrap();
    assert_eq!(
        probe.take_calls(),
        vec![
            EngineCall::SetBlur(5.0),
            EngineCall::SetLayout(LayoutMode::LeftBottom),
        ]
    );
    assert_eq!(
        reconciler.current(),
        &EffectStateSet {
            blur: 5.0,
            layout: LayoutMode::LeftBottom,
            ..EffectStateSet::default()
        }
    );

    reconciler
        .apply(&mut engine, &EffectDelta::new().blur(0.0))
        .unwrap();
    assert_eq!(probe.take_calls(), vec![EngineCall::ClearBlur]);
    assert_eq!(reconciler.current().blur, 0.0);
    assert_eq!(reconciler.current().layout, LayoutMode::LeftBottom);
}

#[test]
fn test_json_delta_end_to_end() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();

    let delta =
        EffectDelta::from_json_str(r#"{"running": true, "ccorrection": 0.5, "replace": "beach.jpg"}"#)
            .unwrap();
    reconciler.apply(&mut engine, &delta).unwrap();

    assert_eq!(
        probe.calls(),
        vec![
            EngineCall::Run,
            EngineCall::EnableColorCorrector,
            EngineCall::SetColorCorrectorPower(0.5),
            EngineCall::SetBackground(Background::Image("beach.jpg".to_string())),
        ]
    );
    assert!(reconciler.current().running);
    assert_eq!(reconciler.current().replace, "beach.jpg");
}

// === Mirror Composition ===

#[test]
fn test_mirror_is_left_fold_of_deltas() {
    let deltas = vec![
        EffectDelta::new().blur(1.0).mirroring(true).smart_zoom(0.2),
        EffectDelta::new().sharpness(0.4).blur(2.5),
        EffectDelta::new().mirroring(false).layout(LayoutMode::RightBottom),
        EffectDelta::new().low_light(0.9),
    ];

    let (mut reconciler, mut engine) = setup();
    for delta in &deltas {
        reconciler.apply(&mut engine, delta).unwrap();
    }

    assert_eq!(reconciler.current(), &fold(&deltas));
    assert_eq!(reconciler.current().blur, 2.5);
    assert!(!reconciler.current().mirroring);
    assert_eq!(reconciler.current().smart_zoom, 0.2);
}

#[test]
fn test_unrelated_fields_survive_partial_updates() {
    let (mut reconciler, mut engine) = setup();
    reconciler
        .apply(&mut engine, &EffectDelta::new().beautification(0.6).freeze(true))
        .unwrap();
    reconciler
        .apply(&mut engine, &EffectDelta::new().color(0x336699))
        .unwrap();

    let state = reconciler.current();
    assert_eq!(state.beautification, 0.6);
    assert!(state.freeze);
    assert_eq!(state.color, 0x336699);
}

#[test]
fn test_same_delta_twice_is_idempotent() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();
    let delta = EffectDelta::new()
        .color(0xff0000)
        .low_light(0.3)
        .layout(LayoutMode::RightBottom);

    reconciler.apply(&mut engine, &delta).unwrap();
    let first_calls = probe.take_calls();
    let first_state = reconciler.current().clone();

    reconciler.apply(&mut engine, &delta).unwrap();
    assert_eq!(probe.take_calls(), first_calls);
    assert_eq!(reconciler.current(), &first_state);
}

// === Background Sharing ===

#[test]
fn test_color_and_replace_last_mode_wins() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();

    reconciler
        .apply(&mut engine, &EffectDelta::new().color(0x00ff00))
        .unwrap();
    reconciler
        .apply(&mut engine, &EffectDelta::new().replace("forest.png"))
        .unwrap();

    assert_eq!(
        probe.calls().last(),
        Some(&EngineCall::SetBackground(Background::Image(
            "forest.png".to_string()
        )))
    );
    // Neither clears the other's stored value
    assert_eq!(reconciler.current().color, 0x00ff00);
    assert_eq!(reconciler.current().replace, "forest.png");
}

#[test]
fn test_color_and_replace_same_delta_follow_order() {
    let delta = EffectDelta::from_json_str(r#"{"replace": "forest.png", "color": 255}"#).unwrap();
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();

    reconciler.apply(&mut engine, &delta).unwrap();
    assert_eq!(
        probe.calls(),
        vec![
            EngineCall::SetBackground(Background::Image("forest.png".to_string())),
            EngineCall::SetBackgroundColor(255),
            EngineCall::SetBackground(Background::Color),
        ]
    );
}

// === Replay and Reset ===

#[test]
fn test_update_matches_full_mirror_from_defaults() {
    let (mut reconciler, mut engine) = setup();
    reconciler
        .apply(
            &mut engine,
            &EffectDelta::new()
                .running(true)
                .blur(0.7)
                .sharpness(0.2)
                .layout(LayoutMode::LeftBottom),
        )
        .unwrap();

    let mut fresh = RecordingEngine::new();
    let fresh_probe = fresh.probe();
    let before = reconciler.current().clone();
    reconciler.update(&mut fresh).unwrap();

    let mut expected_engine = RecordingEngine::new();
    let expected_probe = expected_engine.probe();
    StateReconciler::new()
        .apply(&mut expected_engine, &EffectDelta::from(&before))
        .unwrap();

    assert_eq!(fresh_probe.calls(), expected_probe.calls());
    assert_eq!(reconciler.current(), &before);
}

#[test]
fn test_update_pushes_each_feature_once() {
    let (mut reconciler, mut engine) = setup();
    reconciler.record(&EffectDelta::new().smart_zoom(0.4).mirroring(true));

    let probe = engine.probe();
    reconciler.update(&mut engine).unwrap();
    let calls = probe.calls();

    assert_eq!(calls.iter().filter(|c| **c == EngineCall::EnableSmartZoom).count(), 1);
    assert_eq!(calls.iter().filter(|c| **c == EngineCall::SetFaceArea(0.4)).count(), 1);
    assert_eq!(calls.iter().filter(|c| **c == EngineCall::EnableMirroring).count(), 1);
    assert_eq!(
        calls.iter().filter(|c| matches!(c, EngineCall::SetLayout(_))).count(),
        1
    );
}

#[test]
fn test_reset_restores_defaults() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();
    reconciler
        .apply(
            &mut engine,
            &EffectDelta::new()
                .blur(3.0)
                .freeze(true)
                .beautification(0.5)
                .layout(LayoutMode::RightBottom),
        )
        .unwrap();
    probe.take_calls();

    reconciler.reset(&mut engine).unwrap();
    let calls = probe.calls();

    assert_eq!(reconciler.current(), &EffectStateSet::default());
    assert!(calls.contains(&EngineCall::ClearBlur));
    assert!(calls.contains(&EngineCall::Unfreeze));
    assert!(calls.contains(&EngineCall::DisableBeautification));
    assert_eq!(calls.last(), Some(&EngineCall::SetLayout(LayoutMode::Center)));
    assert!(!calls.iter().any(|c| matches!(c, EngineCall::SetBlur(_))));
}

// === Failure Policy ===

#[test]
fn test_failed_call_stops_processing_and_merges_prefix() {
    let (mut reconciler, mut engine) = setup();
    let probe = engine.probe();
    probe.fail_when(|call| matches!(call, EngineCall::EnableLowLightEffect));

    let delta = EffectDelta::new()
        .mirroring(true)
        .low_light(0.8)
        .blur(4.0);
    let err = reconciler.apply(&mut engine, &delta).unwrap_err();

    assert_eq!(err.error_code(), "ENGINE_CALL_FAILURE");
    assert_eq!(probe.calls(), vec![EngineCall::EnableMirroring]);
    assert!(reconciler.current().mirroring);
    assert_eq!(reconciler.current().low_light, 0.0);
    assert_eq!(reconciler.current().blur, 0.0);

    // Nothing is retried; a second attempt after recovery applies everything.
    probe.stop_failing();
    reconciler.apply(&mut engine, &delta).unwrap();
    assert_eq!(reconciler.current().low_light, 0.8);
    assert_eq!(reconciler.current().blur, 4.0);
}

#[test]
fn test_failure_on_first_field_leaves_mirror_untouched() {
    let (mut reconciler, mut engine) = setup();
    engine
        .probe()
        .fail_when(|call| matches!(call, EngineCall::SetLayout(_)));

    let before = reconciler.current().clone();
    let result = reconciler.apply(
        &mut engine,
        &EffectDelta::from(EffectChange::Layout(LayoutMode::LeftBottom)),
    );

    assert!(result.is_err());
    assert_eq!(reconciler.current(), &before);
    assert!(!reconciler.current().non_default_features().contains(&Feature::Layout));
}
