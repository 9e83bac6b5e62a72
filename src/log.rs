use chrono::Timelike;
use colored::Colorize;
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Log {
    Info,
    Warning,
    Error,
}

fn format_line(kind: Log, hms: impl Display, msg: impl Display) -> String {
    let name = match kind {
        Log::Info => "I".green(),
        Log::Warning => "W".yellow(),
        Log::Error => "E".red(),
    }
    .bold();

    format!("{name} {hms} {msg}")
}

pub fn log(kind: Log, msg: impl Display) {
    let now = chrono::Local::now();
    let hms = format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second()).dimmed();
    let line = format_line(kind, hms, msg);

    match kind {
        Log::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}
