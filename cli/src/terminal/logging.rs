// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Event formatting for the terminal.
//!
//! Ordinary events render as `[glyph] message key=value`. Events sent to
//! [`PRINT_TARGET`] (through [`crate::rprint!`]) render their `raw_msg` untouched.

use std::fmt::{self, Write as _};

use colored::*;
use roster_common::logging::status;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

pub const PRINT_TARGET: &str = "roster::print";

pub struct RosterFormatter {
    pub max_verbosity: u8,
}

impl<S, N> FormatEvent<S, N> for RosterFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        let meta = event.metadata();
        if meta.target() == PRINT_TARGET {
            let raw = fields.raw_msg.unwrap_or_default();
            return write!(writer, "{}\r\n", raw.replace('\n', "\r\n"));
        }

        if fields.verbosity > self.max_verbosity {
            return Ok(());
        }

        let glyph = glyph(meta.level(), fields.status.as_deref());
        write!(writer, "{} {}{}\r\n", glyph, fields.message, fields.extra)
    }
}

fn glyph(level: &Level, kind: Option<&str>) -> ColoredString {
    match *level {
        Level::TRACE => "[ ]".dimmed(),
        Level::DEBUG => "[?]".blue(),
        Level::INFO if kind == Some(status::INFO) => "[»]".cyan().bold(),
        Level::INFO => "[+]".green().bold(),
        Level::WARN => "[*]".yellow().bold(),
        Level::ERROR => "[-]".red().bold(),
    }
}

/// Everything the formatter needs from one event, gathered in a single pass.
#[derive(Default)]
struct EventFields {
    status: Option<String>,
    verbosity: u8,
    message: String,
    raw_msg: Option<String>,
    extra: String,
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "status" => self.status = Some(value.to_string()),
            "raw_msg" => self.raw_msg = Some(value.to_string()),
            "message" => self.message.push_str(value),
            name => {
                let _ = write!(self.extra, " {}={}", name.italic(), value);
            }
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "verbosity" => self.verbosity = u8::try_from(value).unwrap_or(u8::MAX),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "verbosity" => self.verbosity = u8::try_from(value.max(0)).unwrap_or(u8::MAX),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        // Display values (`%x`) and format_args! messages both land here.
        match field.name() {
            "status" | "verbosity" => {}
            "raw_msg" => self.raw_msg = Some(format!("{value:?}")),
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            name => {
                let _ = write!(self.extra, " {}={:?}", name.italic(), value);
            }
        }
    }
}
