//! Projection of task instances onto device reminders.
//!
//! Reminders are always replaced wholesale: every slot id a plan can own is
//! cancelled before the new batch is scheduled, so a sink never keeps a
//! reminder for a task that has since moved or disappeared.

use async_trait::async_trait;
use jiff::{tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{TaskInstance, TaskKind};

/// Upper bound on reminders scheduled per plan.
pub const MAX_SCHEDULED: usize = 60;

/// What a reminder shows when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub plan_id: String,
    pub kind: TaskKind,
    pub title: String,
    pub body: String,
}

/// A reminder ready to hand to a [`NotificationSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledNotification {
    /// `<plan_id>:<slot>`
    pub id: String,
    pub trigger: Timestamp,
    pub payload: NotificationPayload,
}

/// Failure reported by a notification transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("notification sink error: {0}")]
pub struct SinkError(pub String);

/// Device notification transport.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn schedule(&self, notification: &ScheduledNotification) -> Result<(), SinkError>;

    async fn cancel_by_id(&self, id: &str) -> Result<(), SinkError>;
}

/// Reminder id for `slot` of a plan.
pub fn notification_id(plan_id: &str, slot: usize) -> String {
    format!("{plan_id}:{slot}")
}

/// Every reminder id a plan can own.
pub fn slot_ids(plan_id: &str) -> impl Iterator<Item = String> + '_ {
    (0..MAX_SCHEDULED).map(move |slot| notification_id(plan_id, slot))
}

/// When an instance should fire: its explicit clock time if set, otherwise
/// the default time of its time-of-day bucket, on its due date in `tz`.
///
/// Returns `None` for local times that cannot be resolved.
pub fn trigger_time(instance: &TaskInstance, tz: &TimeZone) -> Option<Timestamp> {
    let time = instance
        .time
        .map_or_else(|| instance.time_of_day.default_time(), |clock| clock.time());
    instance
        .due_date
        .to_datetime(time)
        .to_zoned(tz.clone())
        .ok()
        .map(|zoned| zoned.timestamp())
}

/// Maps instances to reminders.
///
/// Triggers at or before `now` are dropped, the rest are sorted by trigger
/// time and only the earliest [`MAX_SCHEDULED`] are kept. Slots are numbered
/// in trigger order.
pub fn project(
    instances: &[TaskInstance],
    now: Timestamp,
    tz: &TimeZone,
) -> Vec<ScheduledNotification> {
    let mut pending: Vec<(Timestamp, &TaskInstance)> = instances
        .iter()
        .filter_map(|instance| trigger_time(instance, tz).map(|trigger| (trigger, instance)))
        .filter(|(trigger, _)| *trigger > now)
        .collect();
    pending.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.title.cmp(&b.1.title)));
    pending.truncate(MAX_SCHEDULED);

    pending
        .into_iter()
        .enumerate()
        .map(|(slot, (trigger, instance))| ScheduledNotification {
            id: notification_id(&instance.plan_id, slot),
            trigger,
            payload: payload(instance),
        })
        .collect()
}

fn payload(instance: &TaskInstance) -> NotificationPayload {
    let mut body = instance.plan_title.clone();
    if let Some(hint) = &instance.amount_hint {
        body.push_str(" · ");
        body.push_str(hint);
    } else if let Some(notes) = &instance.notes {
        body.push_str(": ");
        body.push_str(notes);
    }
    NotificationPayload {
        plan_id: instance.plan_id.clone(),
        kind: instance.kind,
        title: instance.title.clone(),
        body,
    }
}
