// libs/doctor-cell/src/services/schedule.rs
use chrono::{Duration, NaiveTime};

use crate::models::{BoundaryPolicy, DoctorSchedule, TimeSlot};

/// Format a time-of-day as the human-readable 12-hour slot label used
/// everywhere a slot is displayed or stored, e.g. "6:00 PM".
pub fn slot_label(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Generate the ordered sequence of bookable slots for one doctor-day.
///
/// Pure and deterministic: identical schedules always yield identical,
/// identically-ordered sequences. The daily window is date-invariant, so the
/// calendar date does not participate in generation. Repeated interval
/// addition stops at the window end per the schedule's boundary policy and
/// never overshoots it, even when the end is not exactly reachable from the
/// start.
pub fn generate_slots(schedule: &DoctorSchedule) -> Vec<TimeSlot> {
    let step = Duration::minutes(schedule.slot_minutes as i64);
    let mut slots = Vec::new();
    let mut current = schedule.day_start;

    loop {
        let within = match schedule.boundary {
            BoundaryPolicy::Exclusive => current < schedule.day_end,
            BoundaryPolicy::Inclusive => current <= schedule.day_end,
        };
        if !within {
            break;
        }

        slots.push(TimeSlot {
            time: current,
            label: slot_label(current),
        });

        // NaiveTime arithmetic wraps at midnight; a wrapped step has left
        // the working window.
        let (next, wrapped) = current.overflowing_add_signed(step);
        if wrapped != 0 {
            break;
        }
        current = next;
    }

    slots
}

/// Whether `label` names a bookable slot for this schedule.
pub fn is_bookable_slot(schedule: &DoctorSchedule, label: &str) -> bool {
    generate_slots(schedule).iter().any(|slot| slot.label == label)
}
