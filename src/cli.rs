use crate::types::Coords;
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB: &str = "mapty.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "mapty",
    about = "Log running and cycling workouts on a map, stored in a local SQLite file"
)]
pub struct Cli {
    /// Local store file (created on first use).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Current device position as LAT,LNG. Without it the map can't open.
    #[arg(long, value_name = "LAT,LNG", env = "MAPTY_POSITION", value_parser = coords_arg, global = true)]
    pub position: Option<Coords>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Click the map at --at and submit the entry form.
    Add {
        /// `running` or `cycling`; anything else is refused by the form.
        #[arg(long)]
        kind: String,

        /// Where the workout happened, LAT,LNG.
        #[arg(long, value_name = "LAT,LNG", value_parser = coords_arg, allow_hyphen_values = true)]
        at: Coords,

        /// km
        #[arg(long, allow_hyphen_values = true)]
        distance: String,

        /// min
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// steps/min, running only
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// m, cycling only
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Print the workout list, newest first.
    List {
        /// Print the HTML rows instead of one summary line per workout.
        #[arg(long)]
        html: bool,

        #[arg(short = 'n', long, default_value_t = usize::MAX, hide_default_value = true)]
        count: usize,
    },

    /// Center the map on a workout, as if its list row was clicked.
    Show {
        /// Workout id (the row's data-id).
        id: String,
    },
}

fn coords_arg(s: &str) -> Result<Coords, String> {
    parse_coords(s).map_err(|e| format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add() {
        let cli = Cli::try_parse_from([
            "mapty",
            "--position",
            "51.5,-0.1",
            "add",
            "--kind",
            "cycling",
            "--at",
            "-33.9,151.2",
            "--distance",
            "20",
            "--duration",
            "60",
            "--elevation",
            "500",
        ])
        .unwrap();

        assert_eq!(cli.position, Some(Coords::new(51.5, -0.1)));
        let Cmd::Add {
            kind,
            at,
            cadence,
            elevation,
            ..
        } = cli.cmd
        else {
            panic!("expected add");
        };
        assert_eq!(kind, "cycling");
        assert_eq!(at, Coords::new(-33.9, 151.2));
        assert_eq!(cadence, "");
        assert_eq!(elevation, "500");
    }

    #[test]
    fn unknown_kind_reaches_the_form() {
        let cli = Cli::try_parse_from([
            "mapty", "add", "--kind", "swimming", "--at", "1,2", "--distance", "1", "--duration",
            "1",
        ])
        .unwrap();
        let Cmd::Add { kind, .. } = cli.cmd else {
            panic!("expected add");
        };
        assert_eq!(kind, "swimming");
    }

    #[test]
    fn rejects_bad_position() {
        assert!(Cli::try_parse_from(["mapty", "--position", "nowhere", "list"]).is_err());
    }
}
