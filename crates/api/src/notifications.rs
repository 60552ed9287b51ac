// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification fan-out for committed leave events.
//!
//! Delivery itself is an external concern behind [`NotificationSink`] and
//! [`EmailSender`]. The dispatcher turns each [`LeaveEvent`] into the
//! notifications and emails it implies, resolves recipients (including the
//! "all active admins" fan-out) and hands them to the collaborators.
//!
//! Dispatch must only run after the transaction that produced the events has
//! committed. Delivery failures are logged and swallowed.

use leave_cover::{LeaveEvent, LeaveSummary};
use leave_cover_domain::Employee;
use leave_cover_persistence::Persistence;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// The kind of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// A colleague asks the recipient to cover their leave.
    CoverRequest,
    /// A leave awaits admin review.
    LeaveRequest,
    /// The cover employee accepted.
    CoverAccepted,
    /// The cover employee declined.
    CoverDeclined,
    /// The cover request expired unanswered.
    CoverExpired,
    /// An admin approved a leave.
    LeaveApproved,
    /// An admin declined a leave.
    LeaveDeclined,
    /// The applicant cancelled a leave.
    LeaveCancelled,
    /// A cover employee went on leave while covering.
    CoverConflict,
    /// An admin assigned a substitute cover.
    CoverReassigned,
    /// An alert raised by the engine itself.
    SystemAlert,
}

impl NotificationType {
    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CoverRequest => "COVER_REQUEST",
            Self::LeaveRequest => "LEAVE_REQUEST",
            Self::CoverAccepted => "COVER_ACCEPTED",
            Self::CoverDeclined => "COVER_DECLINED",
            Self::CoverExpired => "COVER_EXPIRED",
            Self::LeaveApproved => "LEAVE_APPROVED",
            Self::LeaveDeclined => "LEAVE_DECLINED",
            Self::LeaveCancelled => "LEAVE_CANCELLED",
            Self::CoverConflict => "COVER_CONFLICT",
            Self::CoverReassigned => "COVER_REASSIGNED",
            Self::SystemAlert => "SYSTEM_ALERT",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An in-app notification for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The employee notified.
    pub recipient_id: i64,
    /// The notification kind.
    pub notification_type: NotificationType,
    /// Short title.
    pub title: String,
    /// Full message.
    pub message: String,
    /// The employee whose action caused the notification, if any.
    pub sender_id: Option<i64>,
    /// The leave the notification is about.
    pub related_id: Option<i64>,
    /// Pinned notifications stay on top until dismissed.
    pub is_pinned: bool,
}

/// A templated email for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatedEmail {
    /// Recipient address.
    pub to: String,
    /// Template identifier.
    pub template_id: String,
    /// Template fields.
    pub data: BTreeMap<String, String>,
}

/// A delivery failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{channel} delivery failed: {reason}")]
pub struct NotificationError {
    /// Which channel failed.
    pub channel: String,
    /// The collaborator's reason.
    pub reason: String,
}

/// Stores in-app notifications.
pub trait NotificationSink: Send + Sync {
    /// Creates a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be stored.
    fn create_notification(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Sends templated emails.
pub trait EmailSender: Send + Sync {
    /// Sends an email.
    ///
    /// # Errors
    ///
    /// Returns an error if the email could not be sent.
    fn send_templated_email(&self, email: &TemplatedEmail) -> Result<(), NotificationError>;
}

/// Counts of what a dispatch handed to the collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Notifications accepted by the sink.
    pub notifications_sent: usize,
    /// Emails accepted by the sender.
    pub emails_sent: usize,
    /// Deliveries that failed and were dropped.
    pub failures: usize,
}

/// Recipient lookups for one dispatch, cached so a fan-out reads each row once.
struct Directory<'p> {
    persistence: &'p mut Persistence,
    employees: HashMap<i64, Option<Employee>>,
    admins: Option<Vec<Employee>>,
}

impl<'p> Directory<'p> {
    fn new(persistence: &'p mut Persistence) -> Self {
        Self {
            persistence,
            employees: HashMap::new(),
            admins: None,
        }
    }

    fn employee(&mut self, employee_id: i64) -> Option<Employee> {
        if let Some(cached) = self.employees.get(&employee_id) {
            return cached.clone();
        }
        let found: Option<Employee> = match self.persistence.get_employee(employee_id) {
            Ok(found) => found,
            Err(err) => {
                warn!(employee_id, error = %err, "Failed to load notification recipient");
                None
            }
        };
        self.employees.insert(employee_id, found.clone());
        found
    }

    fn name(&mut self, employee_id: i64) -> String {
        self.employee(employee_id)
            .map_or_else(|| format!("Employee {employee_id}"), |e| e.name)
    }

    fn active_admins(&mut self) -> Vec<Employee> {
        if let Some(admins) = &self.admins {
            return admins.clone();
        }
        let admins: Vec<Employee> = match self.persistence.list_active_admins() {
            Ok(admins) => admins,
            Err(err) => {
                warn!(error = %err, "Failed to load active admins for notification");
                Vec::new()
            }
        };
        self.admins = Some(admins.clone());
        admins
    }
}

/// Everything one event should deliver.
#[derive(Debug, Default)]
struct Outbox {
    notifications: Vec<Notification>,
    emails: Vec<TemplatedEmail>,
}

impl Outbox {
    fn notify(
        &mut self,
        recipient: Option<&Employee>,
        notification_type: NotificationType,
        title: &str,
        message: String,
        sender_id: Option<i64>,
        leave: &LeaveSummary,
    ) {
        let Some(recipient) = recipient.filter(|r| r.is_active) else {
            debug!(
                leave_id = leave.leave_id,
                notification_type = %notification_type,
                "Skipping notification to missing or inactive employee"
            );
            return;
        };
        self.notifications.push(Notification {
            recipient_id: recipient.employee_id,
            notification_type,
            title: title.to_string(),
            message,
            sender_id,
            related_id: Some(leave.leave_id),
            is_pinned: notification_type == NotificationType::SystemAlert
                || notification_type == NotificationType::CoverConflict,
        });
    }

    fn email(
        &mut self,
        recipient: Option<&Employee>,
        template_id: &str,
        leave: &LeaveSummary,
        response: Option<&str>,
    ) {
        let Some(recipient) = recipient.filter(|r| r.is_active) else {
            return;
        };
        let mut data: BTreeMap<String, String> = BTreeMap::new();
        data.insert(String::from("employee_name"), recipient.name.clone());
        data.insert(String::from("leave_id"), leave.leave_id.to_string());
        data.insert(String::from("leave_type"), leave.leave_type.to_string());
        data.insert(String::from("start_date"), leave.start_date.to_string());
        data.insert(String::from("end_date"), leave.end_date.to_string());
        data.insert(String::from("total_days"), leave.total_days.to_string());
        if let Some(response) = response {
            data.insert(String::from("response"), response.to_string());
        }
        self.emails.push(TemplatedEmail {
            to: recipient.email.clone(),
            template_id: template_id.to_string(),
            data,
        });
    }
}

fn describe(leave: &LeaveSummary) -> String {
    format!(
        "{} leave #{} from {} to {} ({} days)",
        leave.leave_type, leave.leave_id, leave.start_date, leave.end_date, leave.total_days
    )
}

/// Turns committed leave events into notifications and emails.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
    email: Arc<dyn EmailSender>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>, email: Arc<dyn EmailSender>) -> Self {
        Self { sink, email }
    }

    /// Delivers everything `events` imply.
    ///
    /// Must only be called after the transaction that produced `events` has
    /// committed. Nothing here fails the caller: lookup and delivery errors
    /// are logged at `warn` and counted in the report.
    pub fn dispatch(&self, persistence: &mut Persistence, events: &[LeaveEvent]) -> DispatchReport {
        let mut directory: Directory<'_> = Directory::new(persistence);
        let mut report: DispatchReport = DispatchReport::default();

        for event in events {
            let outbox: Outbox = Self::outbox_for(event, &mut directory);
            debug!(
                event = event.name(),
                leave_id = event.leave().leave_id,
                notifications = outbox.notifications.len(),
                emails = outbox.emails.len(),
                "Dispatching leave event"
            );

            for notification in &outbox.notifications {
                match self.sink.create_notification(notification) {
                    Ok(()) => report.notifications_sent += 1,
                    Err(err) => {
                        report.failures += 1;
                        warn!(
                            event = event.name(),
                            recipient_id = notification.recipient_id,
                            error = %err,
                            "Notification delivery failed"
                        );
                    }
                }
            }
            for email in &outbox.emails {
                match self.email.send_templated_email(email) {
                    Ok(()) => report.emails_sent += 1,
                    Err(err) => {
                        report.failures += 1;
                        warn!(
                            event = event.name(),
                            template_id = %email.template_id,
                            error = %err,
                            "Email delivery failed"
                        );
                    }
                }
            }
        }

        report
    }

    #[allow(clippy::too_many_lines)]
    fn outbox_for(event: &LeaveEvent, directory: &mut Directory<'_>) -> Outbox {
        let mut outbox: Outbox = Outbox::default();

        match event {
            LeaveEvent::CoverRequested {
                leave,
                cover_employee_id,
            } => {
                let applicant: String = directory.name(leave.employee_id);
                outbox.notify(
                    directory.employee(*cover_employee_id).as_ref(),
                    NotificationType::CoverRequest,
                    "Cover request",
                    format!(
                        "{applicant} asked you to cover their {}. Please respond within 24 hours.",
                        describe(leave)
                    ),
                    Some(leave.employee_id),
                    leave,
                );
            }
            LeaveEvent::AdminReviewRequested { leave } => {
                let applicant: String = directory.name(leave.employee_id);
                for admin in directory.active_admins() {
                    outbox.notify(
                        Some(&admin),
                        NotificationType::LeaveRequest,
                        "Leave awaiting review",
                        format!("{applicant} requested {}.", describe(leave)),
                        Some(leave.employee_id),
                        leave,
                    );
                }
            }
            LeaveEvent::NoPayFlagged { leave } => {
                outbox.notify(
                    directory.employee(leave.employee_id).as_ref(),
                    NotificationType::SystemAlert,
                    "No-pay leave",
                    format!(
                        "Your {} exceeds your remaining balance. \
                         If approved, the excess is unpaid.",
                        describe(leave)
                    ),
                    None,
                    leave,
                );
            }
            LeaveEvent::CoverAccepted {
                leave,
                cover_employee_id,
            } => {
                let cover: String = directory.name(*cover_employee_id);
                outbox.notify(
                    directory.employee(leave.employee_id).as_ref(),
                    NotificationType::CoverAccepted,
                    "Cover accepted",
                    format!(
                        "{cover} accepted to cover your {}. It now awaits admin review.",
                        describe(leave)
                    ),
                    Some(*cover_employee_id),
                    leave,
                );
            }
            LeaveEvent::CoverDeclined {
                leave,
                cover_employee_id,
                reason,
            } => {
                let cover: String = directory.name(*cover_employee_id);
                outbox.notify(
                    directory.employee(leave.employee_id).as_ref(),
                    NotificationType::CoverDeclined,
                    "Cover declined",
                    format!("{cover} declined to cover your {}: {reason}", describe(leave)),
                    Some(*cover_employee_id),
                    leave,
                );
            }
            LeaveEvent::CoverExpired {
                leave,
                cover_employee_id,
            } => {
                let cover: String = directory.name(*cover_employee_id);
                outbox.notify(
                    directory.employee(leave.employee_id).as_ref(),
                    NotificationType::CoverExpired,
                    "Cover request expired",
                    format!(
                        "{cover} did not answer the cover request for your {} within 24 hours. \
                         Apply again with another cover employee.",
                        describe(leave)
                    ),
                    None,
                    leave,
                );
            }
            LeaveEvent::LeaveApproved {
                leave,
                cover_employee_id,
                response,
            } => {
                let applicant: Option<Employee> = directory.employee(leave.employee_id);
                let suffix: String = response
                    .as_deref()
                    .map_or_else(String::new, |r| format!(" Message: {r}"));
                outbox.notify(
                    applicant.as_ref(),
                    NotificationType::LeaveApproved,
                    "Leave approved",
                    format!("Your {} was approved.{suffix}", describe(leave)),
                    None,
                    leave,
                );
                outbox.email(applicant.as_ref(), "leave_approved", leave, response.as_deref());

                if let Some(cover_id) = cover_employee_id {
                    let cover: Option<Employee> = directory.employee(*cover_id);
                    let applicant_name: String = directory.name(leave.employee_id);
                    outbox.notify(
                        cover.as_ref(),
                        NotificationType::LeaveApproved,
                        "Cover duty confirmed",
                        format!(
                            "{applicant_name}'s {} was approved. You are covering it.",
                            describe(leave)
                        ),
                        None,
                        leave,
                    );
                    outbox.email(cover.as_ref(), "cover_duty_confirmed", leave, None);
                }
            }
            LeaveEvent::LeaveDeclined {
                leave,
                cover_employee_id,
                response,
            } => {
                let applicant: Option<Employee> = directory.employee(leave.employee_id);
                let suffix: String = response
                    .as_deref()
                    .map_or_else(String::new, |r| format!(" Message: {r}"));
                outbox.notify(
                    applicant.as_ref(),
                    NotificationType::LeaveDeclined,
                    "Leave declined",
                    format!("Your {} was declined.{suffix}", describe(leave)),
                    None,
                    leave,
                );
                outbox.email(applicant.as_ref(), "leave_declined", leave, response.as_deref());

                if let Some(cover_id) = cover_employee_id {
                    let cover: Option<Employee> = directory.employee(*cover_id);
                    let applicant_name: String = directory.name(leave.employee_id);
                    outbox.notify(
                        cover.as_ref(),
                        NotificationType::LeaveDeclined,
                        "Cover duty cancelled",
                        format!(
                            "{applicant_name}'s {} was declined. You no longer need to cover it.",
                            describe(leave)
                        ),
                        None,
                        leave,
                    );
                    outbox.email(cover.as_ref(), "cover_duty_cancelled", leave, None);
                }
            }
            LeaveEvent::LeaveCancelled {
                leave,
                released_cover_employee_id,
            } => {
                if let Some(cover_id) = released_cover_employee_id {
                    let applicant: String = directory.name(leave.employee_id);
                    outbox.notify(
                        directory.employee(*cover_id).as_ref(),
                        NotificationType::LeaveCancelled,
                        "Cover request withdrawn",
                        format!(
                            "{applicant} cancelled their {}. The cover request is withdrawn.",
                            describe(leave)
                        ),
                        Some(leave.employee_id),
                        leave,
                    );
                }
            }
            LeaveEvent::CoveringConflictDetected {
                reassignment_id,
                covered_leave,
                cover_employee_leave,
            } => {
                let cover: String = directory.name(cover_employee_leave.employee_id);
                let owner: String = directory.name(covered_leave.employee_id);
                let message: String = format!(
                    "{cover} applied for {} while covering {owner}'s approved {}. \
                     Reassignment #{reassignment_id} needs a new cover employee.",
                    describe(cover_employee_leave),
                    describe(covered_leave)
                );
                for admin in directory.active_admins() {
                    outbox.notify(
                        Some(&admin),
                        NotificationType::CoverConflict,
                        "Cover reassignment needed",
                        message.clone(),
                        Some(cover_employee_leave.employee_id),
                        covered_leave,
                    );
                }
            }
            LeaveEvent::CoverReassigned {
                covered_leave,
                previous_cover_employee_id,
                new_cover_employee_id,
                ..
            } => {
                let owner: String = directory.name(covered_leave.employee_id);
                let substitute: String = directory.name(*new_cover_employee_id);
                outbox.notify(
                    directory.employee(*new_cover_employee_id).as_ref(),
                    NotificationType::CoverReassigned,
                    "New cover duty",
                    format!("You are now covering {owner}'s {}.", describe(covered_leave)),
                    None,
                    covered_leave,
                );
                outbox.notify(
                    directory.employee(covered_leave.employee_id).as_ref(),
                    NotificationType::CoverReassigned,
                    "Cover employee changed",
                    format!("{substitute} now covers your {}.", describe(covered_leave)),
                    None,
                    covered_leave,
                );
                outbox.notify(
                    directory.employee(*previous_cover_employee_id).as_ref(),
                    NotificationType::CoverReassigned,
                    "Cover duty handed over",
                    format!(
                        "{substitute} has taken over covering {owner}'s {}.",
                        describe(covered_leave)
                    ),
                    None,
                    covered_leave,
                );
            }
        }

        outbox
    }
}
