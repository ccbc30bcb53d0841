use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use clap::{Args, Subcommand};
use lovelingo_core::{parse_time_of_day, NotificationSettings, QuietHours, ReminderInterval, Tier};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show notification settings
    Show,

    /// Change notification settings (only the flags given are changed)
    Set(SetArgs),
}

#[derive(Args, Debug, Default)]
pub struct SetArgs {
    #[arg(long)]
    enabled: Option<bool>,

    /// IANA name, e.g. America/Chicago
    #[arg(long)]
    timezone: Option<String>,

    /// "22:00-08:00", or "off"
    #[arg(long)]
    quiet_hours: Option<String>,

    #[arg(long)]
    weekend_only: Option<bool>,

    #[arg(long)]
    notify_on_completion: Option<bool>,

    /// Use the per-tier day intervals as lead times
    #[arg(long)]
    custom_ranges: Option<bool>,

    /// Lead time in hours per tier, e.g. --lead-hours grand=72
    #[arg(long)]
    lead_hours: Vec<String>,

    /// Day interval per tier, e.g. --interval medium=7-10
    #[arg(long)]
    interval: Vec<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    email_enabled: Option<bool>,

    #[arg(long)]
    push: Option<bool>,

    #[arg(long)]
    sms: Option<bool>,

    #[arg(long)]
    phone: Option<String>,
}

pub fn run(app: &mut App, cmd: SettingsCommand) -> Result<()> {
    let user = app.user().to_string();
    match cmd {
        SettingsCommand::Show => {
            print_settings(&app.planner.settings(&user)?);
            Ok(())
        }
        SettingsCommand::Set(args) => {
            let mut s = app.planner.settings(&user)?;
            apply(&mut s, args)?;
            let saved = app.planner.update_settings(&user, s)?;
            println!("Settings saved.");
            print_settings(&saved);
            Ok(())
        }
    }
}

fn apply(s: &mut NotificationSettings, a: SetArgs) -> Result<()> {
    if let Some(v) = a.enabled {
        s.enabled = v;
    }
    if let Some(tz) = a.timezone {
        s.timezone = tz;
    }
    if let Some(q) = a.quiet_hours {
        s.quiet_hours = match parse_quiet_hours(&q)? {
            Some((start, end)) => QuietHours::new(start, end),
            None => QuietHours { enabled: false, ..s.quiet_hours },
        };
    }
    if let Some(v) = a.weekend_only {
        s.weekend_reminders_only = v;
    }
    if let Some(v) = a.notify_on_completion {
        s.notify_on_completion = v;
    }
    if let Some(v) = a.custom_ranges {
        s.custom_time_ranges = v;
    }
    for arg in &a.lead_hours {
        let (tier, hours) = parse_lead_hours(arg)?;
        s.lead_hours.set(tier, hours);
    }
    for arg in &a.interval {
        let (tier, iv) = parse_interval(arg)?;
        s.intervals.set(tier, iv);
    }
    if let Some(email) = a.email {
        s.channels.email = Some(email);
    }
    if let Some(v) = a.email_enabled {
        s.channels.email_enabled = v;
    }
    if let Some(v) = a.push {
        s.channels.push_enabled = v;
    }
    if let Some(v) = a.sms {
        s.channels.sms_enabled = v;
    }
    if let Some(phone) = a.phone {
        s.channels.phone_number = Some(phone);
    }
    Ok(())
}

/// "22:00-08:00" -> Some((22:00, 08:00)); "off" -> None.
pub fn parse_quiet_hours(s: &str) -> Result<Option<(NaiveTime, NaiveTime)>> {
    if s.trim().eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("quiet hours look like 22:00-08:00, got '{s}'"))?;
    Ok(Some((parse_time_of_day(start)?, parse_time_of_day(end)?)))
}

fn split_tier(arg: &str) -> Result<(Tier, &str)> {
    let (tier, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected <tier>=<value>, got '{arg}'"))?;
    Ok((tier.parse()?, value.trim()))
}

pub fn parse_lead_hours(arg: &str) -> Result<(Tier, u32)> {
    let (tier, value) = split_tier(arg)?;
    let hours = value.parse().with_context(|| format!("hours in '{arg}'"))?;
    Ok((tier, hours))
}

pub fn parse_interval(arg: &str) -> Result<(Tier, ReminderInterval)> {
    let (tier, value) = split_tier(arg)?;
    let (min, max) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("interval looks like 6-14, got '{value}'"))?;
    let min = min.trim().parse().with_context(|| format!("min in '{arg}'"))?;
    let max = max.trim().parse().with_context(|| format!("max in '{arg}'"))?;
    Ok((tier, ReminderInterval::new(min, max)?))
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}

fn print_settings(s: &NotificationSettings) {
    println!("Notifications:       {}", on_off(s.enabled));
    println!("Timezone:            {}", s.timezone);
    if s.quiet_hours.enabled {
        println!(
            "Quiet hours:         {}-{}",
            s.quiet_hours.start.format("%H:%M"),
            s.quiet_hours.end.format("%H:%M")
        );
    } else {
        println!("Quiet hours:         off");
    }
    println!("Weekend only:        {}", on_off(s.weekend_reminders_only));
    println!("Completion notices:  {}", on_off(s.notify_on_completion));
    println!("Custom time ranges:  {}", on_off(s.custom_time_ranges));
    println!(
        "Channels:            email {} / push {} / sms {}",
        on_off(s.channels.email_enabled),
        on_off(s.channels.push_enabled),
        on_off(s.channels.sms_enabled)
    );
    println!("\n{:<18} {:>10} {:>12}", "Tier", "Lead (h)", "Every (days)");
    for tier in Tier::ALL {
        let iv = s.intervals.get(tier);
        println!(
            "{:<18} {:>10} {:>12}",
            tier.label(),
            s.lead_hours.get(tier),
            format!("{}-{}", iv.min, iv.max)
        );
    }
}
