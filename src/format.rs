use {
    chrono::{DateTime, FixedOffset},
    std::{fmt, fmt::Write as _, panic::Location, path::Path},
};

/// Decorations written between a line's level prefix and its message.
///
/// With every decoration enabled a line looks like
/// `[Info]  2025/04/01 19:55:02.026490 server.rs:42: listening`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    /// `2025/04/01`
    pub date: bool,
    /// `19:55:02`
    pub time: bool,
    /// `.026490` after the time. Implies `time`.
    pub microseconds: bool,
    /// `server.rs:42:`, the file name and line of the call site.
    pub short_file: bool,
}

impl LineFormat {
    /// Only the level prefix and the message.
    pub const NONE: LineFormat = LineFormat {
        date: false,
        time: false,
        microseconds: false,
        short_file: false,
    };

    /// Date and time to the second.
    pub const STANDARD: LineFormat = LineFormat {
        date: true,
        time: true,
        microseconds: false,
        short_file: false,
    };

    /// Date, time with microseconds and the call site.
    pub const DETAILED: LineFormat = LineFormat {
        date: true,
        time: true,
        microseconds: true,
        short_file: true,
    };
}

impl Default for LineFormat {
    fn default() -> Self {
        LineFormat::STANDARD
    }
}

/// Render one complete log line, always terminated by a newline.
pub(crate) fn render(
    prefix: &str,
    format: &LineFormat,
    now: DateTime<FixedOffset>,
    location: &Location<'_>,
    args: fmt::Arguments<'_>,
) -> String {
    let mut line = String::with_capacity(prefix.len() + 64);
    line.push_str(prefix);
    if format.date {
        let _ = write!(line, "{} ", now.format("%Y/%m/%d"));
    }
    if format.time || format.microseconds {
        let _ = write!(line, "{}", now.format("%H:%M:%S"));
        if format.microseconds {
            let _ = write!(line, "{}", now.format("%.6f"));
        }
        line.push(' ');
    }
    if format.short_file {
        let file = Path::new(location.file())
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_else(|| location.file().into());
        let _ = write!(line, "{}:{}: ", file, location.line());
    }
    let _ = line.write_fmt(args);
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone as _};

    fn at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 4, 1, 19, 55, 2)
            .unwrap()
            + chrono::Duration::microseconds(26_490)
    }

    #[test]
    fn bare_line() {
        let line = render("[Info]  ", &LineFormat::NONE, at(), Location::caller(), format_args!("hello {}", 1));
        assert_eq!(line, "[Info]  hello 1\n");
    }

    #[test]
    fn standard_line() {
        let line = render("[Error] ", &LineFormat::STANDARD, at(), Location::caller(), format_args!("boom"));
        assert_eq!(line, "[Error] 2025/04/01 19:55:02 boom\n");
    }

    #[test]
    fn detailed_line_names_the_call_site() {
        let location = Location::caller();
        let line = render("[Info]  ", &LineFormat::DETAILED, at(), location, format_args!("up"));
        assert_eq!(
            line,
            format!("[Info]  2025/04/01 19:55:02.026490 format.rs:{}: up\n", location.line())
        );
    }

    #[test]
    fn microseconds_imply_time() {
        let format = LineFormat {
            microseconds: true,
            ..LineFormat::NONE
        };
        let line = render("", &format, at(), Location::caller(), format_args!("x"));
        assert_eq!(line, "19:55:02.026490 x\n");
    }

    #[test]
    fn existing_newline_is_not_doubled() {
        let line = render("", &LineFormat::NONE, at(), Location::caller(), format_args!("done\n"));
        assert_eq!(line, "done\n");
    }
}
