use metrics::counter;
use std::sync::OnceLock;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true)
    })
}

/// Track a settled permission refresh (`success`, `failed` or `discarded`)
pub fn track_permission_refresh(outcome: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("permission_refreshes_total", "outcome" => outcome.to_string()).increment(1);
}

/// Track a route guard transition into a new state
pub fn track_route_guard_decision(state: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("route_guard_decisions_total", "state" => state.to_string()).increment(1);
}

/// Track a fragment gate evaluation
pub fn track_fragment_gate_check(allowed: bool) {
    if !is_observability_enabled() {
        return;
    }
    let status = if allowed { "allowed" } else { "denied" };
    counter!("fragment_gate_checks_total", "status" => status).increment(1);
}
