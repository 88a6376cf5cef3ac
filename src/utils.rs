use crate::types::Coords;
use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let net = i16::from(verbose) - i16::from(quiet);
    let level = match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mapty={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

/// Shortest round-trip form: `5.0` prints as `5`, `27.5` as `27.5`.
pub fn format_number(v: f64) -> String {
    format!("{v}")
}

/// One decimal, for derived pace and speed.
pub fn format_fixed1(v: f64) -> String {
    format!("{v:.1}")
}

/// Parses `"lat,lng"`.
pub fn parse_coords(s: &str) -> Result<Coords> {
    let Some((lat, lng)) = s.split_once(',') else {
        bail!("expected LAT,LNG, got {s:?}");
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("bad latitude in {s:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .with_context(|| format!("bad longitude in {s:?}"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        bail!("coordinates out of range: {s:?}");
    }
    Ok(Coords::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_format_like_the_page() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(27.5), "27.5");
        assert_eq!(format_fixed1(6.0), "6.0");
        assert_eq!(format_fixed1(17.368), "17.4");
    }

    #[test]
    fn coords_parse() {
        assert_eq!(parse_coords("10,20").unwrap(), Coords::new(10.0, 20.0));
        assert_eq!(
            parse_coords(" 51.5 , -0.12 ").unwrap(),
            Coords::new(51.5, -0.12)
        );
        assert!(parse_coords("10").is_err());
        assert!(parse_coords("a,b").is_err());
        assert!(parse_coords("91,0").is_err());
    }
}
