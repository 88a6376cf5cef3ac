#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Result, bail};
use clap::Parser;
use mapty::app::{App, AppConfig};
use mapty::cli::{self, Cmd};
use mapty::form::WorkoutForm;
use mapty::map::FixedPosition;
use mapty::render::summary_line;
use mapty::storage::SqliteStore;
use mapty::terminal::{TerminalMap, TerminalUi};
use mapty::types::WorkoutKind;
use mapty::utils;

#[macro_use]
extern crate mapty;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.db)?;
    dlog!(
        "db={} position={:?}",
        cli.db.display(),
        cli.position.map(|c| c.to_string())
    );

    let mut app = App::new(
        TerminalMap::new(),
        store,
        TerminalUi::new(),
        AppConfig::default(),
    );
    let map_ready = app.boot(&mut FixedPosition(cli.position))?;

    match cli.cmd {
        Cmd::Add {
            kind,
            at,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            if !map_ready {
                bail!("The map needs your position first (pass --position LAT,LNG).");
            }
            app.handle_map_click(at);
            if let Ok(k) = kind.parse::<WorkoutKind>() {
                app.toggle_input_fields(k);
            }

            let form = WorkoutForm {
                kind,
                distance,
                duration,
                cadence,
                elevation,
            };
            let Some(id) = app.submit_workout(&form)? else {
                bail!("Workout not saved.");
            };
            if let Some(w) = app.workouts().iter().find(|w| w.id == id) {
                println!("{}", summary_line(w));
            }
        }
        Cmd::List { html, count } => {
            if html {
                for row in app.ui().rows().iter().take(count) {
                    println!("{row}");
                }
            } else {
                for w in app.workouts().iter().rev().take(count) {
                    println!("{}", summary_line(w));
                }
            }
        }
        Cmd::Show { id } => {
            if !app.move_to_workout(Some(&id)) {
                bail!("No workout {id:?} to show (unknown id, or no position given).");
            }
            if let Some(center) = app.map().center() {
                println!("{center}\tzoom {}", app.map().zoom());
            }
        }
    }

    Ok(())
}
