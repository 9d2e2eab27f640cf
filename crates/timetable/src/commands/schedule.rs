//! Schedule command handlers.

use tabled::Tabled;
use timetable_api::{Schedule, Weekday};

use crate::cli::{GlobalOpts, ScheduleArgs, ScheduleCommand};
use crate::error::CliError;
use crate::output;

use super::Context;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Slots")]
    slots: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

impl DayRow {
    fn new(schedule: &Schedule, day: Weekday) -> Self {
        let slots = schedule.day(day);
        Self {
            day: day.to_string(),
            slots: if slots.is_empty() {
                "-".into()
            } else {
                slots
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            },
            hours: output::hours(schedule.day_minutes(day)),
        }
    }
}

/// One row per weekday, Monday first, plus the weekly total.
pub fn day_table(schedule: &Schedule) -> String {
    let rows: Vec<DayRow> = schedule
        .iter()
        .map(|(day, _)| DayRow::new(schedule, day))
        .collect();
    format!(
        "{}\nWeekly total: {}",
        output::render_table(&rows),
        output::hours(schedule.total_minutes())
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: ScheduleArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ScheduleCommand::Show { id } => {
            let client = ctx.authorize()?;
            let staff = client
                .get_staff(&id)
                .await
                .map_err(|e| CliError::for_staff(e, &id))?;
            let schedule = staff.schedule();
            let out = output::render_single(&global.output, &schedule, day_table, Schedule::encode)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScheduleCommand::Empty => {
            output::print_output(&Schedule::empty().encode(), global.quiet);
            Ok(())
        }
    }
}
