//! Everything printed to the terminal goes through here. Notifications are the command line
//! counterpart of toasts: short, colored, one line.

use std::fmt::Display;

use ansi_term::Colour;
use chrono::NaiveDate;

use crate::{
    screen_time::{
        entities::DayRecord,
        stats::{total_for_day, PeriodSummary, Summary, ThresholdDirection},
    },
    todo::entities::Task,
    utils::time::{format_date, format_hours},
};

pub fn notify_success(message: impl Display) {
    println!("{}", Colour::Green.paint(message.to_string()));
}

pub fn notify_warning(message: impl Display) {
    eprintln!("{}", Colour::Yellow.paint(message.to_string()));
}

pub fn notify_error(message: impl Display) {
    eprintln!("{}", Colour::Red.paint(message.to_string()));
}

pub fn print_records(records: &[DayRecord]) {
    if records.is_empty() {
        println!("No screen time recorded.");
        println!();
        return;
    }
    for record in records {
        println!("{}", format_record(record));
    }
    println!();
}

fn format_record(record: &DayRecord) -> String {
    let categories = record
        .entries()
        .iter()
        .map(|v| format!("{} {}", v.category, format_hours(v.time_spent)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}\t{}\t{}",
        format_date(record.date),
        format_hours(total_for_day(record.entries())),
        categories
    )
}

pub fn print_summary(summary: &Summary) {
    println!(
        "Total Screen Time Today ({}): {}",
        format_date(summary.today),
        format_hours(summary.today_total)
    );
    print_period(&summary.weekly);
    print_period(&summary.monthly);

    if !summary.categories.is_empty() {
        println!();
        println!("By category:");
        for total in &summary.categories {
            println!("\t{}\t{}", format_hours(total.time_spent), total.category);
        }
    }
}

fn print_period(period: &PeriodSummary) {
    let threshold = match &period.threshold {
        Ok(report) => {
            let colour = match report.direction {
                ThresholdDirection::Above => Colour::Red,
                ThresholdDirection::Below => Colour::Green,
            };
            colour.paint(report.to_string()).to_string()
        }
        Err(e) => Colour::Yellow.paint(e.to_string()).to_string(),
    };
    println!(
        "Average Screen Time {}: {} over {} days ({threshold})",
        period.period,
        format_hours(period.average),
        period.days
    );
}

pub fn print_tasks(title: &str, tasks: &[Task], today: NaiveDate) {
    println!("{title} ({})", tasks.len());
    for task in tasks {
        println!("{}", format_task(task, today));
    }
}

fn format_task(task: &Task, today: NaiveDate) -> String {
    let check = if task.status { "[x]" } else { "[ ]" };
    let star = if task.priority { "*" } else { " " };
    let due = task
        .due_date
        .map(format_date)
        .unwrap_or_else(|| "No due date".to_string());
    let due = if task.is_overdue(today) {
        Colour::Red.bold().paint(due).to_string()
    } else {
        due
    };
    format!("{check} {star} {}\t{due}", task.task_name)
}
