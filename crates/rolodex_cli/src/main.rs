//! CLI entry point.
//!
//! # Responsibility
//! - Provide a small executable to verify `rolodex_core` linkage.
//! - Expose recurrence arithmetic for quick manual checks.
//!
//! Usage:
//! - `rolodex` / `rolodex ping`: print ping and version.
//! - `rolodex next-date <from> <interval> <unit> [end]`: print the next
//!   occurrence as RFC 3339, or `none` when the series has ended.

use rolodex_core::{init_logging_from_config, CoreConfig, RecurrencePattern, TemporalValue};
use std::process::ExitCode;

fn main() -> ExitCode {
    match CoreConfig::from_env() {
        Ok(config) if config.log_dir.is_some() => {
            if let Err(err) = init_logging_from_config(&config) {
                eprintln!("warning: logging disabled: {err}");
            }
        }
        Ok(_) => {}
        Err(err) => eprintln!("warning: ignoring invalid configuration: {err}"),
    }

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match args.first().map(String::as_str) {
        None | Some("ping") | Some("version") => {
            println!("rolodex_core ping={}", rolodex_core::ping());
            println!("rolodex_core version={}", rolodex_core::core_version());
            ExitCode::SUCCESS
        }
        Some("next-date") => match next_date(&args[1..]) {
            Ok(line) => {
                println!("{line}");
                ExitCode::SUCCESS
            }
            Err(message) => {
                eprintln!("error: {message}");
                ExitCode::from(2)
            }
        },
        Some(other) => {
            eprintln!("error: unknown command `{other}`; expected ping|version|next-date");
            ExitCode::from(2)
        }
    }
}

fn next_date(args: &[String]) -> Result<String, String> {
    let [from, interval, unit, rest @ ..] = args else {
        return Err("usage: rolodex next-date <from> <interval> <unit> [end]".to_string());
    };
    let interval = interval
        .parse::<i64>()
        .map_err(|err| format!("invalid interval `{interval}`: {err}"))?;
    let end_date = rest
        .first()
        .map(|value| TemporalValue::parse(value))
        .transpose()
        .map_err(|err| err.to_string())?;
    let pattern = RecurrencePattern::from_parts(interval, unit, end_date, None)
        .map_err(|err| err.to_string())?;
    let from = TemporalValue::parse(from).map_err(|err| err.to_string())?;

    let next = pattern.get_next_date(from).map_err(|err| err.to_string())?;
    log::info!(
        "event=cli_next_date module=cli status=ok unit={} interval={} has_next={}",
        pattern.unit(),
        pattern.interval(),
        next.is_some()
    );
    Ok(next.map_or_else(|| "none".to_string(), |date| date.to_rfc3339()))
}
