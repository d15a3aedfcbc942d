use bevy::prelude::*;

use crate::config::tuning::WheelTuning;
use crate::wheel::engine::WheelSpin;
use crate::wheel::events::SpinLanded;
use crate::wheel::sector::SectorTable;

pub struct WheelPlugin;

impl Plugin for WheelPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SpinLanded>();
        app.add_systems(Update, (read_spin_input, tuning_reload_input));
        app.add_systems(FixedUpdate, advance_spin.run_if(spin_active));
    }
}

/// Run condition: only step the engine while a spin is in flight. Reaching
/// idle stops the fixed-tick work until the next request starts it again.
fn spin_active(wheel: Res<WheelSpin>) -> bool {
    wheel.is_spinning()
}

/// Space/Enter or a left click requests a spin. Requests while the wheel is
/// already spinning are dropped.
fn read_spin_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    table: Res<SectorTable>,
    tuning: Res<WheelTuning>,
    mut wheel: ResMut<WheelSpin>,
) {
    let requested = keyboard.just_pressed(KeyCode::Space)
        || keyboard.just_pressed(KeyCode::Enter)
        || mouse.just_pressed(MouseButton::Left);
    if !requested {
        return;
    }
    match wheel.spin(&table, &tuning) {
        Some(target) => debug!("spin committed to sector {target}"),
        None => debug!("spin request ignored, wheel busy"),
    }
}

/// One engine step per fixed tick; the terminal step publishes the result.
fn advance_spin(
    table: Res<SectorTable>,
    tuning: Res<WheelTuning>,
    mut wheel: ResMut<WheelSpin>,
    mut landed: MessageWriter<SpinLanded>,
    mut tick: Local<u32>,
) {
    let frame = wheel.step(table.len(), &tuning);

    *tick = tick.wrapping_add(1);
    if *tick % 60 == 0 {
        debug!(
            "[Spin] phase={:?} angle={:.2} vel={:.4} facing={}",
            wheel.phase(),
            frame.angle.0,
            wheel.ang_vel(),
            frame.index
        );
    }

    if let Some(index) = frame.landed {
        let label = table.get(index).label.clone();
        info!("Landed on sector {index}: {label}");
        landed.write(SpinLanded { label });
    }
}

/// Reload tuning with F5.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<WheelTuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}
