//! Reminder operations for the Planner.

use log::{debug, info};

use super::Planner;
use crate::{
    error::Result,
    expand::expand,
    notify::{self, NotificationSink, ScheduledNotification},
    params::ProjectNotifications,
    query::attach_amount_hints,
};

impl Planner {
    /// Computes the reminders for one plan over the next `window_days` days.
    ///
    /// Triggers already in the past are dropped and at most
    /// [`notify::MAX_SCHEDULED`] are returned, earliest first.
    pub async fn project_notifications(
        &self,
        params: &ProjectNotifications,
    ) -> Result<Vec<ScheduledNotification>> {
        let (from, to) = self.window(params.window_days)?;
        let plan = self.require_plan(&params.plan_id).await?;

        let mut instances = expand(&plan, from, to, self.language);
        attach_amount_hints(&mut instances);
        Ok(notify::project(&instances, self.now(), &self.time_zone))
    }

    /// Replaces every reminder of a plan on `sink`.
    ///
    /// All slot ids the plan can own are cancelled first, then the freshly
    /// projected batch is scheduled. Returns the scheduled reminders.
    pub async fn sync_notifications(
        &self,
        params: &ProjectNotifications,
        sink: &dyn NotificationSink,
    ) -> Result<Vec<ScheduledNotification>> {
        let notifications = self.project_notifications(params).await?;
        let plan_id = params.plan_id.trim();

        for id in notify::slot_ids(plan_id) {
            sink.cancel_by_id(&id).await?;
        }
        debug!("Cancelled reminder slots for plan {plan_id}");

        for notification in &notifications {
            sink.schedule(notification).await?;
        }
        info!(
            "Scheduled {} reminder(s) for plan {plan_id}",
            notifications.len()
        );
        Ok(notifications)
    }
}
