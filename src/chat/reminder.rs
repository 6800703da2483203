//! One-shot reminders at a wall-clock time of day.
//!
//! A reminder is scheduled for the next occurrence of an hour/minute/second
//! triple, not after a relative delay. At most one reminder is pending per
//! session: scheduling a new one replaces (and aborts) the previous timer.

use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::ValidationError;

/// A validated time of day (24-hour clock, second precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::InvalidTime(format!(
                "hour must be 0-23, got {hour}"
            )));
        }
        if minute > 59 {
            return Err(ValidationError::InvalidTime(format!(
                "minute must be 0-59, got {minute}"
            )));
        }
        if second > 59 {
            return Err(ValidationError::InvalidTime(format!(
                "second must be 0-59, got {second}"
            )));
        }

        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTime(format!("{hour}:{minute}:{second}")))
    }

    /// Parses separately entered hour, minute and second fields.
    pub fn from_parts(hour: &str, minute: &str, second: &str) -> Result<Self, ValidationError> {
        Self::new(
            parse_field("hour", hour)?,
            parse_field("minute", minute)?,
            parse_field("second", second)?,
        )
    }

    pub const fn as_naive(self) -> NaiveTime {
        self.0
    }
}

fn parse_field(name: &str, value: &str) -> Result<u32, ValidationError> {
    let value = value.trim();
    value
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidTime(format!("{name} is not a number: '{value}'")))
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    /// Accepts `HH:MM:SS` or `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(':').collect();
        match fields.as_slice() {
            [h, m, sec] => Self::from_parts(h, m, sec),
            [h, m] => Self::from_parts(h, m, "0"),
            _ => Err(ValidationError::InvalidTime(format!(
                "expected HH:MM or HH:MM:SS, got '{}'",
                s.trim()
            ))),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.0.hour(),
            self.0.minute(),
            self.0.second()
        )
    }
}

/// Next instant at `target`, strictly after `now`.
///
/// A target equal to the current time rolls over to tomorrow.
pub fn next_occurrence(now: NaiveDateTime, target: TimeOfDay) -> NaiveDateTime {
    let today = now.date().and_time(target.as_naive());
    if today <= now {
        today + ChronoDuration::days(1)
    } else {
        today
    }
}

/// Delay from `now` until the next occurrence of `target`.
pub fn delay_until(now: NaiveDateTime, target: TimeOfDay) -> Duration {
    (next_occurrence(now, target) - now)
        .to_std()
        .unwrap_or_default()
}

/// The reminder currently waiting to fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReminder {
    pub id: u64,
    pub text: String,
    pub fire_at: NaiveDateTime,
}

/// Called from the timer task when a reminder fires.
pub type ReminderNotifier = Arc<dyn Fn(&PendingReminder) + Send + Sync>;

/// Owns the pending-reminder slot and its timer task.
pub struct ReminderScheduler {
    slot: Arc<Mutex<Option<PendingReminder>>>,
    timer: Option<JoinHandle<()>>,
    next_id: u64,
    notifier: ReminderNotifier,
}

fn lock(slot: &Mutex<Option<PendingReminder>>) -> MutexGuard<'_, Option<PendingReminder>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReminderScheduler {
    pub fn new(notifier: ReminderNotifier) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            timer: None,
            next_id: 1,
            notifier,
        }
    }

    /// Schedules `text` for the next occurrence of `target` after `now`.
    ///
    /// Must be called from within a tokio runtime. Any previously pending
    /// reminder is cancelled.
    pub fn schedule(
        &mut self,
        text: String,
        target: TimeOfDay,
        now: NaiveDateTime,
    ) -> PendingReminder {
        self.abort_timer();

        let id = self.next_id;
        self.next_id += 1;

        let reminder = PendingReminder {
            id,
            text,
            fire_at: next_occurrence(now, target),
        };
        *lock(&self.slot) = Some(reminder.clone());

        let delay = delay_until(now, target);
        log::debug!("reminder {id} scheduled in {}s", delay.as_secs());

        let slot = Arc::clone(&self.slot);
        let notifier = Arc::clone(&self.notifier);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let fired = {
                let mut guard = lock(&slot);
                if guard.as_ref().is_some_and(|p| p.id == id) {
                    guard.take()
                } else {
                    None
                }
            };

            if let Some(reminder) = fired {
                log::debug!("reminder {id} fired");
                notifier(&reminder);
            }
        }));

        reminder
    }

    /// Cancels the pending reminder, if any, and stops its timer.
    pub fn cancel(&mut self) -> Option<PendingReminder> {
        self.abort_timer();
        lock(&self.slot).take()
    }

    pub fn pending(&self) -> Option<PendingReminder> {
        lock(&self.slot).clone()
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn recording_notifier() -> (ReminderNotifier, Arc<Mutex<Vec<String>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let notifier: ReminderNotifier = Arc::new(move |r: &PendingReminder| {
            sink.lock().unwrap().push(r.text.clone());
        });
        (notifier, fired)
    }

    #[test]
    fn test_delay_rolls_over_midnight() {
        let target = TimeOfDay::new(0, 0, 0).unwrap();
        assert_eq!(delay_until(at(23, 59, 50), target), Duration::from_secs(10));
    }

    #[test]
    fn test_delay_same_time_is_a_full_day() {
        let target = TimeOfDay::new(10, 0, 0).unwrap();
        assert_eq!(
            delay_until(at(10, 0, 0), target),
            Duration::from_secs(24 * 60 * 60)
        );
    }

    #[test]
    fn test_delay_later_today() {
        let target = TimeOfDay::new(12, 30, 0).unwrap();
        assert_eq!(
            delay_until(at(12, 0, 0), target),
            Duration::from_secs(30 * 60)
        );
        assert_eq!(next_occurrence(at(12, 0, 0), target), at(12, 30, 0));
    }

    #[test]
    fn test_time_of_day_rejects_out_of_range() {
        assert!(TimeOfDay::new(24, 0, 0).is_err());
        assert!(TimeOfDay::new(0, 60, 0).is_err());
        assert!(TimeOfDay::new(0, 0, 60).is_err());
        assert!(TimeOfDay::new(23, 59, 59).is_ok());
    }

    #[test]
    fn test_time_of_day_from_parts_rejects_non_numeric() {
        let err = TimeOfDay::from_parts("ten", "0", "0").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTime(msg) if msg.contains("hour")));
        assert!(TimeOfDay::from_parts("-1", "0", "0").is_err());
        assert!(TimeOfDay::from_parts("", "0", "0").is_err());
    }

    #[test]
    fn test_time_of_day_parse() {
        assert_eq!(
            "07:05:09".parse::<TimeOfDay>().unwrap(),
            TimeOfDay::new(7, 5, 9).unwrap()
        );
        assert_eq!(
            "7:05".parse::<TimeOfDay>().unwrap(),
            TimeOfDay::new(7, 5, 0).unwrap()
        );
        assert!("7".parse::<TimeOfDay>().is_err());
        assert!("tomorrow".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_of_day_display() {
        assert_eq!(TimeOfDay::new(7, 5, 9).unwrap().to_string(), "07:05:09");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_fires_and_clears_slot() {
        let (notifier, fired) = recording_notifier();
        let mut scheduler = ReminderScheduler::new(notifier);

        let target = TimeOfDay::new(0, 0, 0).unwrap();
        let reminder = scheduler.schedule("stretch".to_string(), target, at(23, 59, 50));
        assert_eq!(reminder.fire_at, at(0, 0, 0) + ChronoDuration::days(1));
        assert!(scheduler.pending().is_some());

        tokio::time::sleep(Duration::from_secs(11)).await;

        assert_eq!(*fired.lock().unwrap(), vec!["stretch".to_string()]);
        assert!(scheduler.pending().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let (notifier, fired) = recording_notifier();
        let mut scheduler = ReminderScheduler::new(notifier);

        let target = TimeOfDay::new(0, 0, 0).unwrap();
        scheduler.schedule("stretch".to_string(), target, at(23, 59, 50));

        let cancelled = scheduler.cancel().unwrap();
        assert_eq!(cancelled.text, "stretch");
        assert!(scheduler.pending().is_none());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_previous() {
        let (notifier, fired) = recording_notifier();
        let mut scheduler = ReminderScheduler::new(notifier);

        let now = at(9, 0, 0);
        scheduler.schedule("first".to_string(), TimeOfDay::new(9, 0, 5).unwrap(), now);
        let second = scheduler.schedule("second".to_string(), TimeOfDay::new(9, 0, 10).unwrap(), now);
        assert_eq!(scheduler.pending(), Some(second));

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["second".to_string()]);
    }
}
