use num_format::{Locale, ToFormattedString};
use std::time::{Duration, Instant};

pub fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Thousands-separated number, e.g. `1,234,567`.
pub fn thousands<N: ToFormattedString>(n: N) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Signed variant of [`thousands`].
pub fn thousands_signed(n: i64) -> String {
    if n < 0 {
        format!("-{}", n.unsigned_abs().to_formatted_string(&Locale::en))
    } else {
        n.to_formatted_string(&Locale::en)
    }
}

/// Run `f` and return its output with the elapsed time.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// `12.3456 s` above a second, `123.4560 ms` below.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs > 1.0 {
        format!("{secs:.4} s")
    } else {
        format!("{:.4} ms", secs * 1000.0)
    }
}
