use bevy::camera::ScalingMode;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::config::tuning::WheelTuning;
use crate::wheel::engine::WheelSpin;
use crate::wheel::events::SpinLanded;
use crate::wheel::sector::SectorTable;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_wheel);
        app.add_systems(
            Update,
            (
                sync_wheel_rotation,
                update_hub,
                clear_result_while_spinning,
                show_result,
            )
                .chain(),
        );
    }
}

// ── Marker components ───────────────────────────────────────────────

#[derive(Component)]
struct WheelRoot;

#[derive(Component)]
struct HubLabel;

#[derive(Component)]
struct ResultText;

/// Handle to the hub disc material so it can be recolored per frame.
#[derive(Resource)]
struct HubAssets {
    material: Handle<ColorMaterial>,
}

// ── Colors ──────────────────────────────────────────────────────────

const COLOR_RIM: Color = Color::srgba(0.10, 0.10, 0.14, 1.0);
const COLOR_HUB_IDLE: Color = Color::srgba(0.16, 0.16, 0.20, 1.0);
const COLOR_POINTER: Color = Color::srgb(1.0, 0.85, 0.2);

// ── Startup ─────────────────────────────────────────────────────────

fn setup_wheel(
    mut commands: Commands,
    tuning: Res<WheelTuning>,
    table: Res<SectorTable>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let ppu = tuning.pixels_per_unit.max(1.0);
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::WindowSize,
            scale: 1.0 / ppu,
            ..OrthographicProjection::default_2d()
        }),
    ));

    let radius = tuning.wheel_radius;
    let arc = table.arc() as f32;

    // Rim behind the sectors
    let rim_mesh = meshes.add(Circle::new(radius + 0.4));
    commands.spawn((
        Mesh2d(rim_mesh),
        MeshMaterial2d(materials.add(COLOR_RIM)),
        Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)),
    ));

    // Wheel root: one wedge + one label per sector. Sectors advance
    // clockwise from +X (mirror of the canvas layout), so sector i's
    // bisector sits at -(i + 0.5) * arc in wheel-local space.
    let wedge_mesh = meshes.add(CircularSector::from_radians(radius, arc));
    let label_radius = radius * tuning.label_radius_frac;

    commands
        .spawn((WheelRoot, Transform::default(), Visibility::default()))
        .with_children(|parent| {
            for (i, sector) in table.sectors().iter().enumerate() {
                let bisector = -(i as f32 + 0.5) * arc;
                let [r, g, b] = sector.color;

                // The wedge mesh points along +Y; rotate its bisector into place.
                parent.spawn((
                    Mesh2d(wedge_mesh.clone()),
                    MeshMaterial2d(materials.add(Color::srgb(r, g, b))),
                    Transform::from_rotation(Quat::from_rotation_z(bisector - FRAC_PI_2)),
                ));

                parent.spawn((
                    Text2d::new(sector.label.clone()),
                    TextFont {
                        font_size: tuning.label_font_size,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                    Transform::from_translation(Vec3::new(
                        bisector.cos() * label_radius,
                        bisector.sin() * label_radius,
                        0.5,
                    ))
                    .with_rotation(Quat::from_rotation_z(bisector)),
                ));
            }
        });

    // Fixed pointer above the wheel, tip toward the center
    let len = tuning.pointer_len;
    let pointer_mesh = meshes.add(Triangle2d::new(
        Vec2::new(-0.35 * len, len),
        Vec2::new(0.35 * len, len),
        Vec2::ZERO,
    ));
    commands.spawn((
        Mesh2d(pointer_mesh),
        MeshMaterial2d(materials.add(COLOR_POINTER)),
        Transform::from_translation(Vec3::new(0.0, radius - 0.4 * len, 2.0)),
    ));

    // Hub disc + label (the original's spin button)
    let hub_material = materials.add(COLOR_HUB_IDLE);
    commands.spawn((
        Mesh2d(meshes.add(Circle::new(tuning.hub_radius))),
        MeshMaterial2d(hub_material.clone()),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
    ));
    commands.spawn((
        HubLabel,
        Text2d::new("SPIN"),
        TextFont {
            font_size: tuning.label_font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1.5)),
    ));
    commands.insert_resource(HubAssets {
        material: hub_material,
    });

    // Result banner along the bottom edge
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            left: Val::Px(0.0),
            right: Val::Px(0.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                ResultText,
                Text::new(""),
                TextFont {
                    font_size: tuning.result_font_size,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

// ── Per-frame systems ───────────────────────────────────────────────

/// Keep the visual rotation in lockstep with the engine angle. Engine angles
/// mirror the clockwise canvas convention with the pointer fixed at +Y, so
/// the world rotation is FRAC_PI_2 - angle.
fn sync_wheel_rotation(
    wheel: Res<WheelSpin>,
    mut roots: Query<&mut Transform, With<WheelRoot>>,
) {
    let rot = FRAC_PI_2 - wheel.angle().0 as f32;
    for mut transform in &mut roots {
        transform.rotation = Quat::from_rotation_z(rot);
    }
}

/// Hub mirrors the sector facing the pointer while spinning, in that
/// sector's color; at rest it is the spin prompt.
fn update_hub(
    wheel: Res<WheelSpin>,
    table: Res<SectorTable>,
    hub: Res<HubAssets>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut labels: Query<&mut Text2d, With<HubLabel>>,
) {
    let (text, color) = if wheel.is_spinning() {
        let sector = table.get(wheel.current_index(table.len()));
        let [r, g, b] = sector.color;
        (sector.label.clone(), Color::srgb(r, g, b))
    } else {
        ("SPIN".to_string(), COLOR_HUB_IDLE)
    };

    if let Some(material) = materials.get_mut(&hub.material) {
        material.color = color;
    }
    for mut label in &mut labels {
        if **label != text {
            **label = text.clone();
        }
    }
}

/// A fresh spin clears the previous result banner.
fn clear_result_while_spinning(
    wheel: Res<WheelSpin>,
    mut texts: Query<&mut Text, With<ResultText>>,
) {
    if !wheel.is_spinning() {
        return;
    }
    for mut text in &mut texts {
        if !text.is_empty() {
            **text = String::new();
        }
    }
}

/// Show the winning label once the wheel lands.
fn show_result(
    mut landed: MessageReader<SpinLanded>,
    mut texts: Query<&mut Text, With<ResultText>>,
) {
    for message in landed.read() {
        for mut text in &mut texts {
            **text = format!("You won: {}!", message.label);
        }
    }
}
