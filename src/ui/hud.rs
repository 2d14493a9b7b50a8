//! In-game HUD - health, score, floor and the boss bar.

use bevy::prelude::*;

use crate::core::GameState;
use crate::game::HudSnapshot;

/// Marker for HUD root entities.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

#[derive(Component)]
pub struct ScoreText;

#[derive(Component)]
pub struct FloorText;

/// Container shown only during a boss fight.
#[derive(Component)]
pub struct BossBarRoot;

#[derive(Component)]
pub struct BossBar;

#[derive(Component)]
pub struct BossName;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_health_bar, update_run_text, update_boss_bar)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Bottom-left: health
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Health", Val::Px(150.0), Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Top-right: score and floor
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Score: 0"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.85, 0.7)),
                ScoreText,
            ));
            parent.spawn((
                Text::new("Floor 1"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.65)),
                FloorText,
            ));
        });

    // Top-center: boss bar, hidden until a boss fight
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                padding: UiRect::top(Val::Px(24.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            BossBarRoot,
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.6, 0.9)),
                Node {
                    margin: UiRect::bottom(Val::Px(4.0)),
                    ..default()
                },
                BossName,
            ));
            parent
                .spawn((
                    Node {
                        width: Val::Px(400.0),
                        height: Val::Px(10.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(0.55, 0.15, 0.7)),
                        BossBar,
                    ));
                });
        });

    // Crosshair (center of screen)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

/// Helper to spawn a labelled status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, width: Val, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width,
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

fn fill_percent(current: f32, maximum: f32) -> Val {
    if maximum <= 0.0 {
        return Val::Percent(0.0);
    }
    Val::Percent((current / maximum).clamp(0.0, 1.0) * 100.0)
}

fn update_health_bar(snapshot: Res<HudSnapshot>, mut bar_query: Query<&mut Node, With<HealthBar>>) {
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };
    bar.width = fill_percent(snapshot.health, snapshot.max_health);
}

fn update_run_text(
    snapshot: Res<HudSnapshot>,
    mut score_query: Query<&mut Text, (With<ScoreText>, Without<FloorText>)>,
    mut floor_query: Query<&mut Text, (With<FloorText>, Without<ScoreText>)>,
) {
    for mut text in score_query.iter_mut() {
        text.0 = format!("Score: {}", snapshot.score);
    }
    for mut text in floor_query.iter_mut() {
        text.0 = format!("Floor {}", snapshot.floor);
    }
}

fn update_boss_bar(
    snapshot: Res<HudSnapshot>,
    mut root_query: Query<&mut Visibility, With<BossBarRoot>>,
    mut bar_query: Query<&mut Node, With<BossBar>>,
    mut name_query: Query<&mut Text, With<BossName>>,
) {
    let Ok(mut visibility) = root_query.get_single_mut() else {
        return;
    };
    let Some(boss) = &snapshot.boss else {
        *visibility = Visibility::Hidden;
        return;
    };

    *visibility = Visibility::Inherited;
    if let Ok(mut bar) = bar_query.get_single_mut() {
        bar.width = fill_percent(boss.health, boss.max_health);
    }
    if let Ok(mut name) = name_query.get_single_mut() {
        name.0 = boss.name.clone();
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
