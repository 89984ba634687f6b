//! The filtering gate: per-filter allow/deny policy and the top-level
//! suppress decision.

use crate::event::Event;
use crate::expr::evaluate_statement;
use crate::handler::{Filter, FilterAction, Handler};

/// Evaluate a single filter against an event. Returns `true` when the event
/// should be suppressed because of this filter.
///
/// Statements run in list order and short-circuit: under either action, one
/// statement that does not match is enough to let the event through.
pub fn filter_matches(event: &Event, filter: &Filter) -> bool {
    for statement in &filter.statements {
        let matched = evaluate_statement(event, statement);

        // Allow - one of the statements did not match, the event passes
        if filter.action == FilterAction::Allow && !matched {
            return false;
        }

        // Deny - one of the statements did not match, the event is exempt
        if filter.action == FilterAction::Deny && !matched {
            return false;
        }
    }

    // Allow - all of the statements matched, the event passes
    if filter.action == FilterAction::Allow {
        return false;
    }

    // Deny - all of the statements matched, suppress the event
    if filter.action == FilterAction::Deny {
        return true;
    }

    tracing::warn!(action = ?filter.action, "not filtering event due to unhandled case");
    false
}

/// Decide whether an event is suppressed before delivery to a handler.
///
/// Structural overrides run first: events carrying metric data always pass,
/// then healthy (non-incident) events are always suppressed. After that the
/// handler's filters combine with OR-of-pass semantics: any single filter
/// letting the event through is sufficient.
pub fn should_suppress(handler: &Handler, event: &Event) -> bool {
    // Never suppress an event that has metrics
    if event.has_metrics() {
        return false;
    }

    // Suppress the event if it is not an incident
    if !event.is_incident() {
        return true;
    }

    // Let the event through if the handler has no filters
    if handler.filters.is_empty() {
        return false;
    }

    for filter in &handler.filters {
        if !filter_matches(event, filter) {
            return false;
        }
    }

    true
}
