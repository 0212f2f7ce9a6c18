//! CLI Command Implementations

use anyhow::Context;
use std::path::Path;
use tracing::info;

use crate::engine::{EngineCall, RecordingEngine};
use crate::state::{EffectDelta, EffectStateSet, StateReconciler};

/// Parse a delta argument: inline JSON, or `@path` to a JSON file
pub fn parse_delta(arg: &str) -> anyhow::Result<EffectDelta> {
    let json = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("reading delta file {}", path))?,
        None => arg.to_string(),
    };
    EffectDelta::from_json_str(&json).with_context(|| format!("parsing delta {}", arg))
}

fn parse_all(args: &[String]) -> anyhow::Result<Vec<EffectDelta>> {
    args.iter().map(|arg| parse_delta(arg)).collect()
}

/// Calls issued by each delta applied in order, and the resulting state
pub fn plan_calls(deltas: &[EffectDelta]) -> crate::Result<(Vec<Vec<EngineCall>>, EffectStateSet)> {
    let mut engine = RecordingEngine::new();
    let probe = engine.probe();
    let mut reconciler = StateReconciler::new();

    let mut per_delta = Vec::with_capacity(deltas.len());
    for delta in deltas {
        reconciler.apply(&mut engine, delta)?;
        per_delta.push(probe.take_calls());
    }
    Ok((per_delta, reconciler.current().clone()))
}

/// Calls a freshly bound engine receives once the deltas are folded in
pub fn replay_calls(deltas: &[EffectDelta]) -> crate::Result<Vec<EngineCall>> {
    let mut reconciler = StateReconciler::new();
    for delta in deltas {
        reconciler.record(delta);
    }

    let mut engine = RecordingEngine::new();
    let probe = engine.probe();
    reconciler.update(&mut engine)?;
    Ok(probe.calls())
}

/// Print the plan for a sequence of deltas.
pub fn plan(args: &[String]) -> anyhow::Result<()> {
    let deltas = parse_all(args)?;
    info!("Planning {} delta(s)", deltas.len());

    let (per_delta, state) = plan_calls(&deltas)?;
    for (i, (delta, calls)) in deltas.iter().zip(&per_delta).enumerate() {
        println!("delta {}: {}", i + 1, serde_json::to_string(delta)?);
        for call in calls {
            println!("  {}", call);
        }
    }

    println!("{:-<60}", "");
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Print the replay a new engine would receive.
pub fn replay(args: &[String]) -> anyhow::Result<()> {
    let deltas = parse_all(args)?;
    info!("Replaying state folded from {} delta(s)", deltas.len());

    for call in replay_calls(&deltas)? {
        println!("{}", call);
    }
    Ok(())
}

/// Print the canonical default state.
pub fn defaults() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&EffectStateSet::default())?);
    Ok(())
}
