pub mod models;

use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter as EnumIterDerive, EnumString};

use crate::config::models::{
    ConfigItem, CountConfigItem, DeepLinkConfigItem, FileLoggingConfigItem,
    PositiveNumberConfigItem, defaults,
};
use crate::errors::{Error, Result};
use crate::extensions::enums::valid_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIterDerive, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigKey {
    PixelsPerHour,
    DragThresholdPx,
    DefaultGpsRadiusM,
    RecurrenceHorizonDays,
    MaxRecurrenceInstances,
    UnderutilizedPercent,
    DeepLinkBase,
    FileLoggingEnabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "defaults::pixels_per_hour")]
    pub pixels_per_hour: PositiveNumberConfigItem,
    #[serde(default = "defaults::drag_threshold_px")]
    pub drag_threshold_px: PositiveNumberConfigItem,
    #[serde(default = "defaults::default_gps_radius_m")]
    pub default_gps_radius_m: PositiveNumberConfigItem,
    #[serde(default = "defaults::recurrence_horizon_days")]
    pub recurrence_horizon_days: CountConfigItem,
    #[serde(default = "defaults::max_recurrence_instances")]
    pub max_recurrence_instances: CountConfigItem,
    #[serde(default = "defaults::underutilized_percent")]
    pub underutilized_percent: PositiveNumberConfigItem,
    #[serde(default)]
    pub deep_link_base: DeepLinkConfigItem,
    #[serde(default)]
    pub file_logging_enabled: FileLoggingConfigItem,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            pixels_per_hour: defaults::pixels_per_hour(),
            drag_threshold_px: defaults::drag_threshold_px(),
            default_gps_radius_m: defaults::default_gps_radius_m(),
            recurrence_horizon_days: defaults::recurrence_horizon_days(),
            max_recurrence_instances: defaults::max_recurrence_instances(),
            underutilized_percent: defaults::underutilized_percent(),
            deep_link_base: DeepLinkConfigItem::default(),
            file_logging_enabled: FileLoggingConfigItem::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: ConfigFile,
    pub last_change: Option<(String, String, String)>,
}

#[derive(Debug, Clone)]
pub struct ConfigRows(Vec<(String, String, String)>);

impl ConfigRows {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &(String, String, String)> {
        self.0.iter()
    }
    pub fn get(&self, index: usize) -> Option<&(String, String, String)> {
        self.0.get(index)
    }
}
impl Index<usize> for ConfigRows {
    type Output = (String, String, String);
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Config {
    /// Built-in defaults bound to `path`; nothing is written until an edit.
    pub fn with_defaults(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: ConfigFile::default(),
            last_change: None,
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(Error::config(format!(
                "Configuration file '{}' not found.",
                path.display()
            )));
        }
        let text = fs::read_to_string(&path)
            .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
        let data: ConfigFile = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("Invalid JSON in '{}': {}", path.display(), e)))?;
        Ok(Self {
            path,
            data,
            last_change: None,
        })
    }

    pub fn view(&self) -> &ConfigFile {
        &self.data
    }

    pub fn pixels_per_hour(&self) -> f64 {
        *self.data.pixels_per_hour.get_value()
    }
    pub fn drag_threshold_px(&self) -> f64 {
        *self.data.drag_threshold_px.get_value()
    }
    pub fn default_gps_radius_m(&self) -> f64 {
        *self.data.default_gps_radius_m.get_value()
    }
    pub fn recurrence_horizon_days(&self) -> u32 {
        *self.data.recurrence_horizon_days.get_value()
    }
    pub fn max_recurrence_instances(&self) -> u32 {
        *self.data.max_recurrence_instances.get_value()
    }
    pub fn underutilized_percent(&self) -> f64 {
        *self.data.underutilized_percent.get_value()
    }
    pub fn deep_link_base(&self) -> &str {
        self.data.deep_link_base.get_value()
    }
    pub fn file_logging_enabled(&self) -> bool {
        self.data.file_logging_enabled.get_value().0
    }

    fn describe(&self, key: ConfigKey) -> (String, String) {
        let d = &self.data;
        match key {
            ConfigKey::PixelsPerHour => (
                d.pixels_per_hour.description().to_string(),
                d.pixels_per_hour.get_value().to_string(),
            ),
            ConfigKey::DragThresholdPx => (
                d.drag_threshold_px.description().to_string(),
                d.drag_threshold_px.get_value().to_string(),
            ),
            ConfigKey::DefaultGpsRadiusM => (
                d.default_gps_radius_m.description().to_string(),
                d.default_gps_radius_m.get_value().to_string(),
            ),
            ConfigKey::RecurrenceHorizonDays => (
                d.recurrence_horizon_days.description().to_string(),
                d.recurrence_horizon_days.get_value().to_string(),
            ),
            ConfigKey::MaxRecurrenceInstances => (
                d.max_recurrence_instances.description().to_string(),
                d.max_recurrence_instances.get_value().to_string(),
            ),
            ConfigKey::UnderutilizedPercent => (
                d.underutilized_percent.description().to_string(),
                d.underutilized_percent.get_value().to_string(),
            ),
            ConfigKey::DeepLinkBase => (
                d.deep_link_base.description().to_string(),
                d.deep_link_base.get_value().clone(),
            ),
            ConfigKey::FileLoggingEnabled => (
                d.file_logging_enabled.description().to_string(),
                d.file_logging_enabled.get_value().to_string(),
            ),
        }
    }

    pub fn rows(&self) -> ConfigRows {
        ConfigRows(
            ConfigKey::iter()
                .map(|key| {
                    let (description, value) = self.describe(key);
                    (key.to_string(), description, value)
                })
                .collect(),
        )
    }

    pub fn set_by_index(&mut self, index: usize, new_value: &str) -> Result<()> {
        let key = ConfigKey::iter()
            .nth(index)
            .ok_or_else(|| Error::parse(format!("Invalid ID: {index}")))?;
        self.set_key(key, new_value)
    }

    pub fn set_key(&mut self, key: ConfigKey, new_value: &str) -> Result<()> {
        let (_, old) = self.describe(key);
        self.edit(|cfg| Self::apply(cfg, key, new_value))?;
        let (_, new_val) = self.describe(key);
        self.last_change = Some((key.to_string(), old, new_val));
        Ok(())
    }

    pub fn take_last_change(&mut self) -> Option<(String, String, String)> {
        self.last_change.take()
    }

    pub fn set(&mut self, key_str: &str, new_value: &str) -> Result<()> {
        let key = Self::parse_key(key_str)?;
        self.set_key(key, new_value)
    }

    /// Applies every pair, then writes once. Nothing is kept on error.
    pub fn set_many<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut staged = self.data.clone();
        for (k, v) in pairs {
            let key = Self::parse_key(k.as_ref())?;
            Self::apply(&mut staged, key, v.as_ref())?;
        }
        self.edit(|cfg| {
            *cfg = staged;
            Ok(())
        })
    }

    fn parse_key(key_str: &str) -> Result<ConfigKey> {
        use std::str::FromStr;
        ConfigKey::from_str(key_str.trim()).map_err(|_| {
            Error::parse(format!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key_str,
                valid_csv::<ConfigKey>()
            ))
        })
    }

    fn apply(cfg: &mut ConfigFile, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::PixelsPerHour => cfg.pixels_per_hour.set_value(value),
            ConfigKey::DragThresholdPx => cfg.drag_threshold_px.set_value(value),
            ConfigKey::DefaultGpsRadiusM => cfg.default_gps_radius_m.set_value(value),
            ConfigKey::RecurrenceHorizonDays => cfg.recurrence_horizon_days.set_value(value),
            ConfigKey::MaxRecurrenceInstances => cfg.max_recurrence_instances.set_value(value),
            ConfigKey::UnderutilizedPercent => cfg.underutilized_percent.set_value(value),
            ConfigKey::DeepLinkBase => cfg.deep_link_base.set_value(value),
            ConfigKey::FileLoggingEnabled => cfg.file_logging_enabled.set_value(value),
        }
    }

    fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut ConfigFile) -> Result<()>,
    {
        let mut next = self.data.clone();
        f(&mut next)?;
        Self::write(&self.path, &next)?;
        self.data = next;
        Ok(())
    }

    fn write(path: &Path, data: &ConfigFile) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Error::config(format!("Failed to encode config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))
    }
}
