#![cfg(feature = "subscriber")]

//! Taskvisor event logging for the sync loops.
//!
//! The loops restart every few seconds, so routine lifecycle events are logged at
//! trace level; only events meaning a loop stopped or misbehaved are raised.

use async_trait::async_trait;
use taskvisor::{Event, EventKind, Subscribe};
use tracing::{debug, error, info, trace, warn};

/// Subscriber that logs taskvisor events through `tracing`.
#[derive(Debug, Default)]
pub struct SyncEventLogger;

/// Two loops produce a handful of events per period; this absorbs long stalls.
const QUEUE_CAPACITY: usize = 256;

#[async_trait]
impl Subscribe for SyncEventLogger {
    async fn on_event(&self, event: &Event) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "tune-sync-events"
    }

    fn queue_capacity(&self) -> usize {
        QUEUE_CAPACITY
    }
}

fn log_event(e: &Event) {
    let task = e.task.as_deref().unwrap_or("unknown");
    let reason = e.reason.as_deref().unwrap_or("unknown");
    let attempt = e.attempt.unwrap_or(0);

    match e.kind {
        EventKind::TaskAdded => debug!(task, "sync loop registered"),
        EventKind::ActorDead => error!(task, reason, "sync loop terminated permanently"),
        EventKind::ActorExhausted => warn!(task, reason, "sync loop will not be restarted"),
        EventKind::TaskFailed => warn!(task, attempt, reason, "sync loop cycle failed"),
        EventKind::TimeoutHit => {
            warn!(task, timeout_ms = e.timeout_ms.unwrap_or(0), "sync loop cycle timed out")
        }
        EventKind::BackoffScheduled if e.reason.is_some() => debug!(
            task,
            attempt,
            delay_ms = e.delay_ms.unwrap_or(0),
            reason,
            "sync loop retry scheduled"
        ),
        EventKind::ControllerRejected => warn!(task, reason, "sync loop submission rejected"),
        EventKind::SubscriberPanicked | EventKind::SubscriberOverflow => {
            error!(task, reason, "event subscriber failure")
        }
        EventKind::ShutdownRequested => info!("shutdown requested, sync loops stopping"),
        EventKind::AllStoppedWithinGrace => info!("sync loops stopped"),
        EventKind::GraceExceeded => warn!("sync loops did not stop within grace period"),
        _ => trace!(task, attempt, "supervisor event"),
    }
}
