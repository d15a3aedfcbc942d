mod config;
mod plugins;
mod wheel;

use bevy::prelude::*;

use config::tuning::WheelTuning;
use plugins::{ui_plugin::UiPlugin, wheel_plugin::WheelPlugin};
use wheel::engine::WheelSpin;
use wheel::sector::SectorTable;
use wheel::simulate;

fn main() {
    let tuning = WheelTuning::load_or_default();
    if let Err(e) = tuning.validate() {
        panic!("tuning.ron rejected: {e}");
    }
    let table = match SectorTable::load_or_default() {
        Ok(table) => table,
        Err(e) => panic!("sectors.ron rejected: {e}"),
    };

    if let Some(run) = SimulateArgs::parse(std::env::args().skip(1)) {
        let mut rng = rand::rng();
        let report = simulate::simulate(&mut rng, &table, run.num_spins);
        if run.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report serializes")
            );
        } else {
            report.print();
        }
        return;
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Fortune Wheel".into(),
                resolution: (900u32, 900u32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(tuning.dt as f64))
        .insert_resource(tuning)
        .insert_resource(table)
        .insert_resource(WheelSpin::new())
        .add_plugins(WheelPlugin)
        .add_plugins(UiPlugin)
        .run();
}

/// `--simulate N [--json]`: headless selector-frequency report, no window.
struct SimulateArgs {
    num_spins: u64,
    json: bool,
}

impl SimulateArgs {
    fn parse(args: impl Iterator<Item = String>) -> Option<Self> {
        let args: Vec<String> = args.collect();
        let pos = args.iter().position(|a| a == "--simulate")?;
        let num_spins = match args.get(pos + 1).and_then(|n| n.parse().ok()) {
            Some(n) => n,
            None => {
                eprintln!("usage: fortune_wheel --simulate <num_spins> [--json]");
                std::process::exit(2);
            }
        };
        Some(Self {
            num_spins,
            json: args.iter().any(|a| a == "--json"),
        })
    }
}
