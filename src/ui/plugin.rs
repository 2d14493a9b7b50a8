//! Menus: the title screen, the pause overlay and the run summary shown on
//! death. Every menu is a column of text lines over a backdrop followed by
//! buttons, so one builder serves all three.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;
use crate::game::HudSnapshot;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::MainMenu), show_title)
            .add_systems(OnEnter(GameState::Paused), show_pause)
            .add_systems(OnEnter(GameState::GameOver), show_game_over)
            .add_systems(OnExit(GameState::MainMenu), despawn_menus)
            .add_systems(OnExit(GameState::Paused), despawn_menus)
            .add_systems(OnExit(GameState::GameOver), despawn_menus)
            .add_systems(Update, handle_menu_buttons);
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVER: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// Root of whichever menu is on screen.
#[derive(Component)]
struct MenuRoot;

/// 2D camera for the title screen, where no player camera exists.
#[derive(Component)]
struct MenuCamera;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Descend,
    Resume,
    Retry,
    Abandon,
    Quit,
}

impl MenuAction {
    fn label(self) -> &'static str {
        match self {
            MenuAction::Descend => "Descend",
            MenuAction::Resume => "Resume",
            MenuAction::Retry => "Try Again",
            MenuAction::Abandon => "Abandon Run",
            MenuAction::Quit => "Quit",
        }
    }

    /// State the button leads to. `None` quits the app.
    fn target(self) -> Option<GameState> {
        match self {
            MenuAction::Descend | MenuAction::Resume | MenuAction::Retry => Some(GameState::InGame),
            MenuAction::Abandon => Some(GameState::MainMenu),
            MenuAction::Quit => None,
        }
    }
}

struct MenuLayout {
    heading: &'static str,
    heading_color: Color,
    backdrop: Color,
    lines: Vec<String>,
    actions: &'static [MenuAction],
}

/// Lines of the death screen.
fn run_summary(snapshot: &HudSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("Fell on floor {}", snapshot.floor),
        format!("Score {}", snapshot.score),
    ];
    if snapshot.blueprints > 0 {
        lines.push(format!("Blueprints recovered: {}", snapshot.blueprints));
    }
    lines.push(format!("Floor seed {:016x}", snapshot.seed));
    lines
}

fn show_title(mut commands: Commands) {
    commands.spawn((Camera2d, MenuCamera));
    spawn_menu(
        &mut commands,
        MenuLayout {
            heading: "CRYPT FORGE",
            heading_color: Color::srgb(0.8, 0.7, 0.6),
            backdrop: Color::srgb(0.05, 0.05, 0.08),
            lines: vec!["Descend. Clear the rooms. Slay the warden.".to_string()],
            actions: &[MenuAction::Descend, MenuAction::Quit],
        },
    );
}

fn show_pause(mut commands: Commands) {
    spawn_menu(
        &mut commands,
        MenuLayout {
            heading: "PAUSED",
            heading_color: Color::srgb(0.8, 0.8, 0.85),
            backdrop: Color::srgba(0.0, 0.0, 0.0, 0.7),
            lines: Vec::new(),
            actions: &[MenuAction::Resume, MenuAction::Abandon],
        },
    );
}

/// The player's camera is still alive here and renders the overlay.
fn show_game_over(mut commands: Commands, snapshot: Res<HudSnapshot>) {
    spawn_menu(
        &mut commands,
        MenuLayout {
            heading: "YOU DIED",
            heading_color: Color::srgb(0.8, 0.2, 0.2),
            backdrop: Color::srgba(0.1, 0.0, 0.0, 0.9),
            lines: run_summary(&snapshot),
            actions: &[MenuAction::Retry, MenuAction::Abandon],
        },
    );
}

fn spawn_menu(commands: &mut Commands, layout: MenuLayout) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(layout.backdrop),
            GlobalZIndex(5),
            MenuRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(layout.heading),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(layout.heading_color),
                Node {
                    margin: UiRect::bottom(Val::Px(36.0)),
                    ..default()
                },
            ));

            for line in layout.lines {
                parent.spawn((
                    Text::new(line),
                    TextFont {
                        font_size: 22.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.6, 0.58, 0.55)),
                    Node {
                        margin: UiRect::bottom(Val::Px(8.0)),
                        ..default()
                    },
                ));
            }

            parent.spawn(Node {
                height: Val::Px(28.0),
                ..default()
            });

            for &action in layout.actions {
                parent
                    .spawn((
                        Button,
                        Node {
                            width: Val::Px(220.0),
                            height: Val::Px(48.0),
                            margin: UiRect::all(Val::Px(8.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_IDLE),
                        action,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(action.label()),
                            TextFont {
                                font_size: 24.0,
                                ..default()
                            },
                            TextColor(Color::srgb(0.8, 0.8, 0.85)),
                        ));
                    });
            }
        });
}

fn handle_menu_buttons(
    mut buttons: Query<(&Interaction, &MenuAction, &mut BackgroundColor), (Changed<Interaction>, With<Button>)>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, action, mut background) in buttons.iter_mut() {
        background.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED,
            Interaction::Hovered => BUTTON_HOVER,
            Interaction::None => BUTTON_IDLE,
        };
        if *interaction != Interaction::Pressed {
            continue;
        }
        match action.target() {
            Some(state) => next_state.set(state),
            None => {
                exit.send(AppExit::Success);
            }
        }
    }
}

fn despawn_menus(
    mut commands: Commands,
    roots: Query<Entity, With<MenuRoot>>,
    cameras: Query<Entity, With<MenuCamera>>,
) {
    for entity in roots.iter().chain(cameras.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_blueprints_only_when_found() {
        let mut snapshot = HudSnapshot {
            floor: 3,
            score: 1450,
            seed: 0xbeef,
            ..HudSnapshot::default()
        };
        assert_eq!(
            run_summary(&snapshot),
            vec!["Fell on floor 3", "Score 1450", "Floor seed 000000000000beef"]
        );

        snapshot.blueprints = 2;
        assert_eq!(run_summary(&snapshot)[2], "Blueprints recovered: 2");
    }

    #[test]
    fn every_action_but_quit_changes_state() {
        assert_eq!(MenuAction::Retry.target(), Some(GameState::InGame));
        assert_eq!(MenuAction::Abandon.target(), Some(GameState::MainMenu));
        assert_eq!(MenuAction::Quit.target(), None);
    }
}
