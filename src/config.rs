use log::{LevelFilter, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

const CONFIG_PATH: &str = "tournament.ini";

// --- Minimal INI reader ---
#[derive(Debug, Default)]
pub struct SimpleIni {
    sections: HashMap<String, HashMap<String, String>>,
}

impl SimpleIni {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content);
        Ok(())
    }

    pub fn load_str(&mut self, content: &str) {
        self.sections.clear();

        let mut current_section: Option<String> = None;

        for raw_line in content.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            // Section header: [SectionName]
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let section = line[1..line.len() - 1].trim().to_string();
                current_section = Some(section.clone());
                self.sections.entry(section).or_default();
                continue;
            }

            if let Some(eq_idx) = line.find('=') {
                let (key_raw, value_raw) = line.split_at(eq_idx);
                let key = key_raw.trim();
                if key.is_empty() {
                    continue;
                }
                let value = value_raw[1..].trim().to_string();
                let section = current_section.clone().unwrap_or_default();
                self.sections
                    .entry(section)
                    .or_default()
                    .insert(key.to_string(), value);
            }
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section).and_then(|s| s.get(key)).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: LogLevel,
    pub roster_path: PathBuf,
    /// Registration refuses new competitors past this count; also caps seeds.
    pub max_competitors: usize,
    /// Mount directories of the removable slots, `None` when a side has no slot.
    pub memory_card_p1: Option<PathBuf>,
    pub memory_card_p2: Option<PathBuf>,
    /// Profile folder inside a mounted card.
    pub memory_card_profile_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            roster_path: PathBuf::from("save/tournament.json"),
            max_competitors: 64,
            memory_card_p1: None,
            memory_card_p2: None,
            memory_card_profile_dir: "ITGProfile".to_string(),
        }
    }
}

impl Config {
    fn from_ini(conf: &SimpleIni) -> Self {
        let default = Self::default();
        let card_path = |key: &str| {
            conf.get("Options", key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        Self {
            log_level: conf
                .get("Options", "LogLevel")
                .and_then(|v| LogLevel::from_str(&v).ok())
                .unwrap_or(default.log_level),
            roster_path: conf
                .get("Options", "RosterPath")
                .filter(|v| !v.trim().is_empty())
                .map_or(default.roster_path, PathBuf::from),
            max_competitors: conf
                .get("Options", "MaxCompetitors")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(default.max_competitors),
            memory_card_p1: card_path("MemoryCardP1"),
            memory_card_p2: card_path("MemoryCardP2"),
            memory_card_profile_dir: conf
                .get("Options", "MemoryCardProfileDir")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.memory_card_profile_dir),
        }
    }
}

// Global, mutable configuration instance.
static CONFIG: std::sync::LazyLock<Mutex<Config>> =
    std::sync::LazyLock::new(|| Mutex::new(Config::default()));

fn path_value(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn create_default_config_file() -> Result<(), std::io::Error> {
    info!("'{CONFIG_PATH}' not found, creating with default values.");
    let default = Config::default();

    // [Options] section - keys in alphabetical order
    let mut content = String::new();
    content.push_str("[Options]\n");
    content.push_str(&format!("LogLevel={}\n", default.log_level.as_str()));
    content.push_str(&format!("MaxCompetitors={}\n", default.max_competitors));
    content.push_str(&format!(
        "MemoryCardP1={}\n",
        path_value(default.memory_card_p1.as_ref())
    ));
    content.push_str(&format!(
        "MemoryCardP2={}\n",
        path_value(default.memory_card_p2.as_ref())
    ));
    content.push_str(&format!(
        "MemoryCardProfileDir={}\n",
        default.memory_card_profile_dir
    ));
    content.push_str(&format!("RosterPath={}\n", default.roster_path.display()));
    content.push('\n');

    std::fs::write(CONFIG_PATH, content)
}

pub fn load() {
    if !Path::new(CONFIG_PATH).exists()
        && let Err(e) = create_default_config_file()
    {
        warn!("Failed to create default config file: {e}");
    }

    let mut conf = SimpleIni::new();
    match conf.load(CONFIG_PATH) {
        Ok(()) => {
            let loaded = Config::from_ini(&conf);
            info!("Configuration loaded from '{CONFIG_PATH}'.");
            *CONFIG.lock().unwrap() = loaded;
        }
        Err(e) => warn!("Failed to load '{CONFIG_PATH}': {e}. Using default values."),
    }
}

pub fn get() -> Config {
    CONFIG.lock().unwrap().clone()
}
