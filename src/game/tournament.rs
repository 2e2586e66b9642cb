use chrono::Local;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DISPLAY_NAME_MAX_LEN: usize = 12;
pub const HIGH_SCORE_NAME_MAX_LEN: usize = 4;

/// Upper-cases a highscore name one character at a time. Characters whose
/// upper-case form is longer than one char (`ß` -> `SS`) are kept as typed,
/// so the result never grows past the entry limit.
pub fn upper_score_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .take(HIGH_SCORE_NAME_MAX_LEN)
        .collect()
}

/// Stable handle for a registered competitor. Indices shift when entries are
/// deleted; ids do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompetitorId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub display_name: String,
    pub high_score_name: String,
    /// 0 means unseeded.
    pub seed_index: u32,
    #[serde(default)]
    pub registered_at: String,
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to access roster file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("roster file '{}' is malformed: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode roster for '{}': {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("roster has no backing file; changes are kept in memory only")]
    Unbacked,
}

/// The tournament roster as seen by the registration screen.
pub trait TournamentRoster {
    fn start(&mut self);
    fn competitor_count(&self) -> usize;
    fn competitor_names(&self, with_indices: bool) -> Vec<String>;
    fn competitor(&self, index: usize) -> Option<&Competitor>;
    fn find_competitor_index(&self, id: CompetitorId) -> Option<usize>;
    /// Validates and appends a competitor. The error is a reason fit for
    /// showing to players as-is.
    fn register_competitor(
        &mut self,
        display_name: &str,
        high_score_name: &str,
        seed_index: u32,
    ) -> Result<CompetitorId, String>;
    /// Overwrites a competitor's fields without validation. Returns false when
    /// the id is unknown.
    fn update_competitor(
        &mut self,
        id: CompetitorId,
        display_name: &str,
        high_score_name: &str,
        seed_index: u32,
    ) -> bool;
    fn delete_competitor(&mut self, id: CompetitorId) -> bool;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RosterFile {
    next_id: u32,
    competitors: Vec<Competitor>,
}

#[derive(Debug)]
pub struct Tournament {
    competitors: Vec<Competitor>,
    next_id: u32,
    max_competitors: usize,
    started: bool,
    path: Option<PathBuf>,
}

impl Tournament {
    pub fn new(max_competitors: usize) -> Self {
        Self {
            competitors: Vec::new(),
            next_id: 1,
            max_competitors,
            started: false,
            path: None,
        }
    }

    /// Opens the roster stored at `path`. A missing file yields an empty roster
    /// that will be written there on the first change.
    pub fn load(path: &Path, max_competitors: usize) -> Result<Self, RosterError> {
        let mut tournament = Self::new(max_competitors);
        tournament.path = Some(path.to_path_buf());
        if !path.exists() {
            info!(
                "Roster '{}' not found, starting with no competitors.",
                path.display()
            );
            return Ok(tournament);
        }

        let text = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RosterFile = serde_json::from_str(&text).map_err(|source| RosterError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        // Never hand out an id that is already on file.
        let max_id = file.competitors.iter().map(|c| c.id.0).max().unwrap_or(0);
        tournament.next_id = file.next_id.max(max_id + 1);
        tournament.competitors = file.competitors;
        info!(
            "Loaded {} competitor(s) from '{}'.",
            tournament.competitors.len(),
            path.display()
        );
        Ok(tournament)
    }

    pub fn save(&self) -> Result<(), RosterError> {
        let Some(path) = self.path.as_ref() else {
            return Err(RosterError::Unbacked);
        };
        let io_err = |source| RosterError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = RosterFile {
            next_id: self.next_id,
            competitors: self.competitors.clone(),
        };
        let text = serde_json::to_string_pretty(&file).map_err(|source| RosterError::Serialize {
            path: path.clone(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save tournament roster: {e}");
        }
    }

    fn validate(
        &self,
        display_name: &str,
        high_score_name: &str,
        seed_index: u32,
    ) -> Result<(), String> {
        if display_name.trim().is_empty() {
            return Err("Player name cannot be blank.".to_string());
        }
        if high_score_name.trim().is_empty() {
            return Err("Highscore name cannot be blank.".to_string());
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(format!(
                "Player name must be {DISPLAY_NAME_MAX_LEN} characters or fewer."
            ));
        }
        if high_score_name.chars().count() > HIGH_SCORE_NAME_MAX_LEN {
            return Err(format!(
                "Highscore name must be {HIGH_SCORE_NAME_MAX_LEN} characters or fewer."
            ));
        }
        if self.competitors.len() >= self.max_competitors {
            return Err(format!(
                "The tournament is full ({} players).",
                self.max_competitors
            ));
        }

        let wanted = display_name.trim().to_lowercase();
        if let Some(existing) = self
            .competitors
            .iter()
            .find(|c| c.display_name.trim().to_lowercase() == wanted)
        {
            return Err(format!(
                "\"{}\" is already registered.",
                existing.display_name
            ));
        }

        if seed_index != 0 {
            if seed_index as usize > self.max_competitors {
                return Err(format!(
                    "Seed {seed_index} is out of range (1-{}).",
                    self.max_competitors
                ));
            }
            if let Some(holder) = self.competitors.iter().find(|c| c.seed_index == seed_index) {
                return Err(format!(
                    "Seed {seed_index} is already taken by \"{}\".",
                    holder.display_name
                ));
            }
        }
        Ok(())
    }
}

impl TournamentRoster for Tournament {
    fn start(&mut self) {
        if !self.started {
            info!(
                "Tournament started with {} competitor(s).",
                self.competitors.len()
            );
            self.started = true;
        }
    }

    fn competitor_count(&self) -> usize {
        self.competitors.len()
    }

    fn competitor_names(&self, with_indices: bool) -> Vec<String> {
        self.competitors
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if with_indices {
                    format!("{}. {}", i + 1, c.display_name)
                } else {
                    c.display_name.clone()
                }
            })
            .collect()
    }

    fn competitor(&self, index: usize) -> Option<&Competitor> {
        self.competitors.get(index)
    }

    fn find_competitor_index(&self, id: CompetitorId) -> Option<usize> {
        self.competitors.iter().position(|c| c.id == id)
    }

    fn register_competitor(
        &mut self,
        display_name: &str,
        high_score_name: &str,
        seed_index: u32,
    ) -> Result<CompetitorId, String> {
        self.validate(display_name, high_score_name, seed_index)?;

        let id = CompetitorId(self.next_id);
        self.next_id += 1;
        self.competitors.push(Competitor {
            id,
            display_name: display_name.trim().to_string(),
            high_score_name: upper_score_name(high_score_name.trim()),
            seed_index,
            registered_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });
        info!(
            "Registered competitor {:?} \"{}\" (seed {seed_index}).",
            id,
            display_name.trim()
        );
        self.persist();
        Ok(id)
    }

    fn update_competitor(
        &mut self,
        id: CompetitorId,
        display_name: &str,
        high_score_name: &str,
        seed_index: u32,
    ) -> bool {
        let Some(competitor) = self.competitors.iter_mut().find(|c| c.id == id) else {
            return false;
        };
        competitor.display_name = display_name.to_string();
        competitor.high_score_name = high_score_name.to_string();
        competitor.seed_index = seed_index;
        debug!("Updated competitor {id:?}: {display_name}, {high_score_name}, {seed_index}");
        self.persist();
        true
    }

    fn delete_competitor(&mut self, id: CompetitorId) -> bool {
        let Some(index) = self.find_competitor_index(id) else {
            warn!("Cannot delete competitor {id:?}: not on the roster.");
            return false;
        };
        let removed = self.competitors.remove(index);
        info!("Deleted competitor {:?} \"{}\".", id, removed.display_name);
        self.persist();
        true
    }
}
