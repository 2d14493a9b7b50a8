//! Enemy templates: built-in stats plus extra templates loaded from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::combat::ProjectileKind;
use crate::core::DataLoadError;

pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Ranged attack settings for enemies that shoot.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct RangedConfig {
    /// Maximum distance at which the enemy opens fire.
    pub range: f32,
    pub projectile: ProjectileKind,
    #[serde(default = "default_shot_count")]
    pub count: u32,
    /// Total fan angle in radians for multi-shot volleys.
    #[serde(default)]
    pub spread: f32,
}

fn default_shot_count() -> u32 {
    1
}

fn default_min_floor() -> u32 {
    1
}

fn default_scale() -> f32 {
    1.0
}

/// Stats and presentation for one kind of enemy.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EnemyTemplate {
    pub name: String,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub points: u32,
    #[serde(default)]
    pub is_boss: bool,
    /// First floor this template appears on.
    #[serde(default = "default_min_floor")]
    pub min_floor: u32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub color: (f32, f32, f32),
    /// Scene to render instead of the placeholder capsule.
    #[serde(default)]
    pub model_path: Option<String>,
    #[serde(default)]
    pub ranged: Option<RangedConfig>,
}

impl EnemyTemplate {
    /// Parse and validate a template from RON text.
    pub fn from_ron_str(contents: &str, origin: &str) -> Result<Self, DataLoadError> {
        let template: EnemyTemplate = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: origin.to_string(),
            details: e.to_string(),
        })?;
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> Result<(), DataLoadError> {
        let reason = if self.max_health <= 0.0 {
            Some("max_health must be positive")
        } else if self.speed < 0.0 || self.damage < 0.0 || self.attack_cooldown < 0.0 {
            Some("speed, damage and attack_cooldown must not be negative")
        } else if self.attack_range <= 0.0 {
            Some("attack_range must be positive")
        } else if self.scale <= 0.0 {
            Some("scale must be positive")
        } else if let Some(ranged) = &self.ranged {
            if ranged.range <= self.attack_range {
                Some("ranged.range must exceed attack_range")
            } else if ranged.count == 0 {
                Some("ranged.count must be at least 1")
            } else {
                None
            }
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DataLoadError::InvalidTemplate {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub fn is_ranged(&self) -> bool {
        self.ranged.is_some()
    }

    pub fn skeleton() -> Self {
        Self {
            name: "Skeleton".to_string(),
            max_health: 30.0,
            damage: 8.0,
            speed: 2.5,
            attack_range: 1.5,
            attack_cooldown: 1.2,
            points: 100,
            is_boss: false,
            min_floor: 1,
            scale: 1.0,
            color: (0.85, 0.82, 0.72),
            model_path: None,
            ranged: None,
        }
    }

    pub fn cultist() -> Self {
        Self {
            name: "Cultist".to_string(),
            max_health: 25.0,
            damage: 6.0,
            speed: 2.0,
            attack_range: 1.5,
            attack_cooldown: 1.8,
            points: 150,
            is_boss: false,
            min_floor: 2,
            scale: 1.0,
            color: (0.5, 0.15, 0.2),
            model_path: None,
            ranged: Some(RangedConfig {
                range: 8.0,
                projectile: ProjectileKind::Fireball,
                count: 1,
                spread: 0.0,
            }),
        }
    }

    pub fn brute() -> Self {
        Self {
            name: "Brute".to_string(),
            max_health: 70.0,
            damage: 15.0,
            speed: 1.8,
            attack_range: 1.8,
            attack_cooldown: 1.6,
            points: 200,
            is_boss: false,
            min_floor: 3,
            scale: 1.3,
            color: (0.4, 0.45, 0.3),
            model_path: None,
            ranged: None,
        }
    }

    pub fn warden() -> Self {
        Self {
            name: "Crypt Warden".to_string(),
            max_health: 300.0,
            damage: 20.0,
            speed: 2.2,
            attack_range: 2.2,
            attack_cooldown: 1.4,
            points: 1000,
            is_boss: true,
            min_floor: 1,
            scale: 1.8,
            color: (0.3, 0.1, 0.4),
            model_path: None,
            ranged: Some(RangedConfig {
                range: 12.0,
                projectile: ProjectileKind::ShadowBolt,
                count: 5,
                spread: 0.8,
            }),
        }
    }
}

/// Every enemy template known to the game, keyed by id.
#[derive(Resource, Debug, Clone)]
pub struct EnemyRegistry {
    templates: HashMap<String, EnemyTemplate>,
}

impl Default for EnemyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl EnemyRegistry {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.insert("skeleton", EnemyTemplate::skeleton());
        registry.insert("cultist", EnemyTemplate::cultist());
        registry.insert("brute", EnemyTemplate::brute());
        registry.insert("warden", EnemyTemplate::warden());
        registry
    }

    /// Add or replace a template.
    pub fn insert(&mut self, id: impl Into<String>, template: EnemyTemplate) {
        self.templates.insert(id.into(), template);
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Regular (non-boss) templates available on a floor, in a stable order.
    pub fn regular_pool(&self, floor: u32) -> Vec<&EnemyTemplate> {
        self.pool(floor, false)
    }

    /// The boss for a floor: the newest boss template unlocked by that floor.
    pub fn boss_for_floor(&self, floor: u32) -> Option<&EnemyTemplate> {
        self.pool(floor, true).into_iter().last()
    }

    fn pool(&self, floor: u32, bosses: bool) -> Vec<&EnemyTemplate> {
        let mut entries: Vec<(&String, &EnemyTemplate)> = self
            .templates
            .iter()
            .filter(|(_, t)| t.is_boss == bosses && t.min_floor <= floor)
            .collect();
        entries.sort_by(|a, b| a.1.min_floor.cmp(&b.1.min_floor).then_with(|| a.0.cmp(b.0)));
        entries.into_iter().map(|(_, t)| t).collect()
    }
}

/// Load extra templates from assets/data/enemies/. Files override built-ins
/// with the same id (the file stem).
pub fn load_enemy_templates(mut registry: ResMut<EnemyRegistry>) {
    let dir = Path::new(ENEMIES_DIR);

    if !dir.exists() {
        warn!("Enemy template directory not found: {:?}", dir);
        return;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        warn!("Failed to read enemy template directory");
        return;
    };

    let mut loaded = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        match load_template_file(&path) {
            Ok(template) => {
                info!("Loaded enemy template: {} ({})", template.name, id);
                registry.insert(id, template);
                loaded += 1;
            }
            Err(e) => error!("Skipping enemy template {:?}: {}", path, e),
        }
    }

    info!("Loaded {} enemy templates, {} known", loaded, registry.len());
}

fn load_template_file(path: &Path) -> Result<EnemyTemplate, DataLoadError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    EnemyTemplate::from_ron_str(&contents, &display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranged_template() {
        let ron = r#"(
            name: "Bone Archer",
            max_health: 20.0,
            damage: 4.0,
            speed: 2.0,
            attack_range: 1.2,
            attack_cooldown: 2.0,
            points: 120,
            min_floor: 2,
            color: (0.9, 0.9, 0.8),
            ranged: Some((range: 9.0, projectile: ArcaneShard, count: 3, spread: 0.4)),
        )"#;
        let template = EnemyTemplate::from_ron_str(ron, "archer.ron").unwrap();
        assert_eq!(template.name, "Bone Archer");
        assert!(!template.is_boss);
        assert_eq!(template.scale, 1.0);
        let ranged = template.ranged.unwrap();
        assert_eq!(ranged.projectile, ProjectileKind::ArcaneShard);
        assert_eq!(ranged.count, 3);
    }

    #[test]
    fn rejects_ranged_inside_melee_range() {
        let mut template = EnemyTemplate::cultist();
        template.ranged = Some(RangedConfig {
            range: 1.0,
            projectile: ProjectileKind::Fireball,
            count: 1,
            spread: 0.0,
        });
        assert!(matches!(
            template.validate(),
            Err(DataLoadError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn malformed_template_is_parse_error() {
        let err = EnemyTemplate::from_ron_str("(name: 3)", "bad.ron").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn pool_grows_with_floor() {
        let registry = EnemyRegistry::with_builtins();
        let names = |floor| {
            registry
                .regular_pool(floor)
                .iter()
                .map(|t| t.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(1), vec!["Skeleton"]);
        assert_eq!(names(2), vec!["Skeleton", "Cultist"]);
        assert_eq!(names(5), vec!["Skeleton", "Cultist", "Brute"]);
        assert_eq!(registry.boss_for_floor(1).map(|t| t.name.as_str()), Some("Crypt Warden"));
    }

    #[test]
    fn builtins_are_valid() {
        let registry = EnemyRegistry::with_builtins();
        for id in ["skeleton", "cultist", "brute", "warden"] {
            assert!(registry.get(id).unwrap().validate().is_ok(), "{id}");
        }
        assert_eq!(registry.get("skeleton").unwrap().max_health, 30.0);
    }
}
