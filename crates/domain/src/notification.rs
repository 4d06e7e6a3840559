use crate::{AlarmTrigger, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    AlarmFired,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn alarm_fired(trigger: &AlarmTrigger) -> Self {
        Self {
            kind: NotificationKind::AlarmFired,
            message: format!("{} ({})", trigger.label, trigger.time_of_day),
        }
    }

    pub fn validation(error: &DomainError) -> Self {
        Self {
            kind: NotificationKind::Validation,
            message: error.to_string(),
        }
    }
}

/// Holds at most one unacknowledged notification; posting replaces it.
#[derive(Debug, Clone, Default)]
pub struct NotificationSlot {
    pending: Option<Notification>,
}

impl NotificationSlot {
    pub fn post(&mut self, notification: Notification) {
        self.pending = Some(notification);
    }

    pub fn peek(&self) -> Option<&Notification> {
        self.pending.as_ref()
    }

    pub fn take(&mut self) -> Option<Notification> {
        self.pending.take()
    }
}
