//! Staff command handlers.

use tabled::Tabled;
use timetable_api::{CreateStaffRequest, Staff, UpdateStaffRequest};

use crate::cli::{GlobalOpts, StaffArgs, StaffCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, schedule, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StaffRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Weekly hours")]
    weekly_hours: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl StaffRow {
    fn new(s: &Staff, color: bool) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            email: s.email.clone().unwrap_or_default(),
            status: output::active_label(s.is_active, color),
            weekly_hours: output::hours(s.schedule().total_minutes()),
            updated: s.updated_at.clone(),
        }
    }
}

fn detail(s: &Staff, color: bool) -> String {
    let schedule = s.schedule();
    let summary = output::render_pairs(&[
        ("ID", s.id.clone()),
        ("Name", s.name.clone()),
        ("Email", s.email.clone().unwrap_or_else(|| "-".into())),
        ("Status", output::active_label(s.is_active, color)),
        ("Created", s.created_at.clone()),
        ("Updated", s.updated_at.clone()),
    ]);
    format!("{summary}\n\n{}", schedule::day_table(&schedule))
}

fn print_staff(staff: &Staff, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_single(&global.output, staff, |s| detail(s, color), |s| s.id.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(ctx: &Context, args: StaffArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let client = ctx.authorize()?;

    match args.command {
        StaffCommand::List { active } => {
            let listing = client.list_staff(active).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &listing.staff,
                |s| StaffRow::new(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StaffCommand::Get { id } => {
            let staff = client
                .get_staff(&id)
                .await
                .map_err(|e| CliError::for_staff(e, &id))?;
            print_staff(&staff, global)
        }

        StaffCommand::Create {
            name,
            email,
            schedule,
        } => {
            let mut request = CreateStaffRequest::new(name);
            if let Some(email) = email {
                request = request.email(email);
            }
            if let Some(schedule) = util::read_schedule(&schedule)? {
                request = request.schedule(&schedule);
            }

            let staff = client.create_staff(&request).await?;
            if !global.quiet {
                eprintln!("Staff member created");
            }
            print_staff(&staff, global)
        }

        StaffCommand::Update {
            id,
            name,
            email,
            schedule,
        } => {
            let mut request = UpdateStaffRequest::new(name);
            if let Some(email) = email {
                request = request.email(email);
            }
            if let Some(schedule) = util::read_schedule(&schedule)? {
                request = request.schedule(&schedule);
            }

            let staff = client
                .update_staff(&id, &request)
                .await
                .map_err(|e| CliError::for_staff(e, &id))?;
            if !global.quiet {
                eprintln!("Staff member updated");
            }
            print_staff(&staff, global)
        }

        StaffCommand::Delete { id } => {
            if !util::confirm(
                &format!("Deactivate staff member '{id}'?"),
                "staff delete",
                global.yes,
            )? {
                return Ok(());
            }
            let ack = client
                .delete_staff(&id)
                .await
                .map_err(|e| CliError::for_staff(e, &id))?;
            if !global.quiet {
                eprintln!("{}", ack.message);
            }
            Ok(())
        }
    }
}
