//! Decay-weighted effect propagation.
//!
//! Firing an event produces a new [`MetricVector`] in two passes, always in
//! this order:
//!
//! 1. **Direct impact** -- each `(metric, delta)` of the triggering event is
//!    added to the base value (0 for unseen metrics) and clamped.
//! 2. **Forward decay** -- for each id in the trigger's `effects` that
//!    resolves to a strictly later event, that event's impact is decayed over
//!    the year gap, scaled by the trigger's strength, and accumulated. Each
//!    touched metric is clamped once, after accumulation.
//!
//! Effects never reach into the past: targets in the same year or earlier
//! are skipped. Dangling ids are skipped as well; validation reports them.
//! Strength is clamped to `[0, 1]`. Non-finite deltas and a non-finite
//! strength contribute nothing, so they cannot poison a running total.

use std::collections::BTreeMap;

use chronoweave_types::{Event, MetricVector};
use tracing::{debug, trace};

use crate::decay::{decay, validate_half_life};
use crate::error::EngineError;
use crate::graph::EventGraph;

/// Compute the metric vector that results from firing `trigger`.
///
/// `all_events` is the event set used to resolve `trigger.effects`. The base
/// vector is never modified; an event with no impact and no effects yields a
/// value-equal copy of it.
///
/// # Errors
///
/// Returns [`EngineError::InvalidParameter`] if `half_life_years` is not a
/// positive, finite number.
pub fn propagate(
    base: &MetricVector,
    trigger: &Event,
    all_events: &[Event],
    half_life_years: f64,
) -> Result<MetricVector, EngineError> {
    let graph = EventGraph::new(all_events);
    propagate_in(base, trigger, &graph, half_life_years)
}

/// [`propagate`] against a prebuilt [`EventGraph`].
///
/// The simulator fires many events against the same set and indexes it once.
///
/// # Errors
///
/// Same as [`propagate`].
pub fn propagate_in(
    base: &MetricVector,
    trigger: &Event,
    graph: &EventGraph<'_>,
    half_life_years: f64,
) -> Result<MetricVector, EngineError> {
    validate_half_life(half_life_years)?;

    let mut next = apply_direct_impact(base, trigger);

    if !trigger.strength.is_finite() {
        debug!(event = %trigger.id, "Skipping forward effects of non-finite strength");
        return Ok(next);
    }
    let strength = trigger.strength.clamp(0.0, 1.0);

    // Raw running totals; clamped only once every effect has contributed.
    let mut running: BTreeMap<&str, f64> = BTreeMap::new();

    for &effect_id in &trigger.effects {
        let Some(target) = graph.get(effect_id) else {
            debug!(event = %trigger.id, effect = %effect_id, "Skipping unresolved effect");
            continue;
        };

        if target.year <= trigger.year {
            trace!(
                event = %trigger.id,
                effect = %effect_id,
                trigger_year = trigger.year,
                target_year = target.year,
                "Skipping effect that does not lie in the future"
            );
            continue;
        }

        let time_delta = f64::from(target.year.saturating_sub(trigger.year));
        for (metric, value) in &target.impact {
            let contribution = decay(*value, time_delta, half_life_years)? * strength;
            if !contribution.is_finite() {
                continue;
            }
            let total = running
                .entry(metric.as_str())
                .or_insert_with(|| next.value_or_zero(metric));
            *total += contribution;
        }
    }

    for (metric, total) in running {
        next.set(metric, total);
    }

    Ok(next)
}

/// Pass 1: add the trigger's own deltas to `base`, clamping each result.
fn apply_direct_impact(base: &MetricVector, trigger: &Event) -> MetricVector {
    let mut next = base.clone();
    for (metric, delta) in trigger.impact.iter().filter(|(_, delta)| delta.is_finite()) {
        next.set(metric.as_str(), base.value_or_zero(metric) + delta);
    }
    next
}

#[cfg(test)]
mod tests {
    use chronoweave_types::{METRIC_MAX, METRIC_MIN};

    use super::*;

    const HALF_LIFE: f64 = 20.0;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn inert_event_returns_equal_copy() {
        let base = MetricVector::core_baseline();
        let event = Event::new(1, 1800, "political");
        let next = propagate(&base, &event, std::slice::from_ref(&event), HALF_LIFE);
        assert!(next.is_ok_and(|next| next == base));
    }

    #[test]
    fn direct_impact_applies_and_creates_metrics() {
        let base = MetricVector::from([("economy", 100.0)]);
        let event = Event::new(1, 1800, "economic")
            .with_impact("economy", 30.0)
            .with_impact("culture", 15.0);
        let next = propagate(&base, &event, std::slice::from_ref(&event), HALF_LIFE)
            .unwrap_or_default();

        assert!(close(next.value_or_zero("economy"), 130.0));
        assert!(close(next.value_or_zero("culture"), 15.0));
        // The base is untouched.
        assert!(close(base.value_or_zero("economy"), 100.0));
        assert!(!base.contains("culture"));
    }

    #[test]
    fn forward_effect_adds_decayed_scaled_impact() {
        let events = vec![
            Event::new(1, 1800, "a").with_effects([2]).with_strength(0.5),
            Event::new(2, 1820, "b").with_impact("economy", 10.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        // 10 * 2^-1 * 0.5
        assert!(close(next.value_or_zero("economy"), 102.5));
    }

    #[test]
    fn past_and_same_year_effects_are_ignored() {
        let events = vec![
            Event::new(1, 1800, "a").with_effects([2, 3]),
            Event::new(2, 1790, "past").with_impact("economy", 50.0),
            Event::new(3, 1800, "same").with_impact("economy", 50.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        assert!(close(next.value_or_zero("economy"), 100.0));
    }

    #[test]
    fn dangling_effect_is_skipped() {
        let event = Event::new(1, 1800, "a").with_effects([42]).with_impact("health", 5.0);
        let base = MetricVector::from([("health", 100.0)]);
        let next = propagate(&base, &event, std::slice::from_ref(&event), HALF_LIFE)
            .unwrap_or_default();
        assert!(close(next.value_or_zero("health"), 105.0));
    }

    #[test]
    fn clamping_holds_after_accumulation() {
        let events = vec![
            Event::new(1, 1800, "a")
                .with_impact("economy", 500.0)
                .with_impact("health", -500.0)
                .with_effects([2, 3])
                .with_strength(1.0),
            Event::new(2, 1801, "b")
                .with_impact("economy", 90.0)
                .with_impact("health", -90.0),
            Event::new(3, 1802, "c").with_impact("society", 1_000.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::core_baseline();
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        for (_, value) in next.iter() {
            assert!((METRIC_MIN..=METRIC_MAX).contains(&value));
        }
        assert!(close(next.value_or_zero("economy"), METRIC_MAX));
        assert!(close(next.value_or_zero("health"), METRIC_MIN));
        assert!(close(next.value_or_zero("society"), METRIC_MAX));
    }

    #[test]
    fn accumulation_clamps_once_at_the_end() {
        // A large positive and a large negative contribution cancel out when
        // clamped after accumulation rather than after each step.
        let events = vec![
            Event::new(1, 1800, "a").with_effects([2, 3]).with_strength(1.0),
            Event::new(2, 1820, "b").with_impact("economy", 400.0),
            Event::new(3, 1820, "c").with_impact("economy", -400.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        assert!(close(next.value_or_zero("economy"), 100.0));
    }

    #[test]
    fn non_finite_strength_leaves_forward_metrics_alone() {
        let events = vec![
            Event::new(1, 1800, "a")
                .with_impact("health", 5.0)
                .with_effects([2])
                .with_strength(f64::NAN),
            Event::new(2, 1820, "b").with_impact("economy", 10.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0), ("health", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        assert!(close(next.value_or_zero("economy"), 100.0));
        // The direct pass still applies.
        assert!(close(next.value_or_zero("health"), 105.0));
    }

    #[test]
    fn out_of_range_strength_is_clamped() {
        let events = vec![
            Event::new(1, 1800, "a").with_effects([2]).with_strength(4.0),
            Event::new(2, 1820, "b").with_impact("economy", 10.0),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        // 10 * 2^-1 * 1.0
        assert!(close(next.value_or_zero("economy"), 105.0));
    }

    #[test]
    fn non_finite_impacts_contribute_nothing() {
        let events = vec![
            Event::new(1, 1800, "a")
                .with_impact("health", f64::INFINITY)
                .with_effects([2]),
            Event::new(2, 1820, "b").with_impact("economy", f64::NAN),
        ];
        let Some(trigger) = events.first() else { return };
        let base = MetricVector::from([("economy", 100.0), ("health", 100.0)]);
        let next = propagate(&base, trigger, &events, HALF_LIFE).unwrap_or_default();
        assert!(close(next.value_or_zero("economy"), 100.0));
        assert!(close(next.value_or_zero("health"), 100.0));
    }

    #[test]
    fn invalid_half_life_is_rejected_even_without_effects() {
        let base = MetricVector::core_baseline();
        let event = Event::new(1, 1800, "a");
        assert!(matches!(
            propagate(&base, &event, &[], 0.0),
            Err(EngineError::InvalidParameter { .. })
        ));
    }
}
