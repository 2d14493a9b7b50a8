//! Audio - plays `SoundCue` events through bevy_kira_audio.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_kira_audio::prelude::{Audio, AudioControl, AudioPlugin as KiraAudioPlugin, AudioSource as KiraAudioSource};

use crate::core::SoundCue;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(KiraAudioPlugin)
            .add_systems(PostUpdate, play_sound_cues);
    }
}

/// Each cue plays at most once per frame, however many systems sent it.
fn play_sound_cues(mut cues: EventReader<SoundCue>, asset_server: Res<AssetServer>, audio: Res<Audio>) {
    for cue in unique_cues(cues.read().copied()) {
        audio.play(asset_server.load::<KiraAudioSource>(cue.asset_path()));
    }
}

fn unique_cues(cues: impl IntoIterator<Item = SoundCue>) -> Vec<SoundCue> {
    let mut seen = HashSet::new();
    cues.into_iter().filter(|cue| seen.insert(*cue)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_cues_collapse_in_order() {
        let cues = [SoundCue::Hit, SoundCue::Swing, SoundCue::Hit, SoundCue::EnemyDeath, SoundCue::Hit];
        assert_eq!(
            unique_cues(cues),
            vec![SoundCue::Hit, SoundCue::Swing, SoundCue::EnemyDeath]
        );
    }

    #[test]
    fn every_cue_has_a_clip_on_disk() {
        let assets = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
        for cue in [
            SoundCue::Swing,
            SoundCue::Hit,
            SoundCue::EnemyDeath,
            SoundCue::BossDeath,
            SoundCue::PlayerHurt,
            SoundCue::Fire,
            SoundCue::DoorOpen,
            SoundCue::DoorLock,
            SoundCue::DoorUnlock,
            SoundCue::Pickup,
            SoundCue::FloorExit,
        ] {
            assert!(assets.join(cue.asset_path()).is_file(), "missing clip for {:?}", cue);
        }
    }
}
