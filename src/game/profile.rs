use ini::Ini;
use log::{debug, warn};
use std::path::{Path, PathBuf};

const EDITABLE_INI: &str = "Editable.ini";
const EDITABLE_SECTION: &str = "Editable";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSide {
    P1,
    P2,
}

impl PlayerSide {
    /// Scan order for removable slots.
    pub const ALL: [Self; 2] = [Self::P1, Self::P2];

    pub const fn number(self) -> usize {
        match self {
            Self::P1 => 1,
            Self::P2 => 2,
        }
    }
}

/// The player-editable part of a profile: what the registration screen
/// can prefill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditableProfile {
    pub display_name: String,
    pub last_used_high_score_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLoad {
    NoProfile,
    /// A profile is present but could not be read.
    Unreadable,
    Loaded(EditableProfile),
}

pub trait MemoryCards {
    fn load_editable(&self, side: PlayerSide) -> CardLoad;
}

/// Removable slots backed by mount directories.
#[derive(Debug, Clone, Default)]
pub struct CardSlots {
    p1: Option<PathBuf>,
    p2: Option<PathBuf>,
    profile_dir: String,
}

impl CardSlots {
    pub fn new(p1: Option<PathBuf>, p2: Option<PathBuf>, profile_dir: impl Into<String>) -> Self {
        Self {
            p1,
            p2,
            profile_dir: profile_dir.into(),
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(
            cfg.memory_card_p1.clone(),
            cfg.memory_card_p2.clone(),
            cfg.memory_card_profile_dir.clone(),
        )
    }

    fn mount_for(&self, side: PlayerSide) -> Option<&Path> {
        match side {
            PlayerSide::P1 => self.p1.as_deref(),
            PlayerSide::P2 => self.p2.as_deref(),
        }
    }
}

fn read_editable(ini_path: &Path) -> Option<EditableProfile> {
    let conf = match Ini::load_from_file(ini_path) {
        Ok(conf) => conf,
        Err(e) => {
            warn!("Failed to read '{}': {e}", ini_path.display());
            return None;
        }
    };
    let section = conf.section(Some(EDITABLE_SECTION))?;
    let display_name = section.get("DisplayName")?.trim().to_string();
    let last_used_high_score_name = section
        .get("LastUsedHighScoreName")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    Some(EditableProfile {
        display_name,
        last_used_high_score_name,
    })
}

impl MemoryCards for CardSlots {
    fn load_editable(&self, side: PlayerSide) -> CardLoad {
        let Some(mount) = self.mount_for(side) else {
            return CardLoad::NoProfile;
        };
        let dir = mount.join(&self.profile_dir);
        if !dir.is_dir() {
            debug!("No profile on card for Player {}.", side.number());
            return CardLoad::NoProfile;
        }

        let ini_path = dir.join(EDITABLE_INI);
        match read_editable(&ini_path) {
            Some(profile) => CardLoad::Loaded(profile),
            None => {
                warn!(
                    "Profile on card for Player {} is unreadable ('{}').",
                    side.number(),
                    dir.display()
                );
                CardLoad::Unreadable
            }
        }
    }
}
