use crate::core::types::Bool;
use crate::errors::Error;
use serde::{Deserialize, Serialize};

pub trait ConfigItem<T> {
    fn get_value(&self) -> &T;
    fn set_value(&mut self, new_value: &str) -> Result<(), Error>;
    fn description(&self) -> &str;
}

/// Strictly positive real number (pixels, metres, percent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositiveNumberConfigItem {
    pub value: f64,
    pub description: String,
}
impl PositiveNumberConfigItem {
    pub fn new(value: f64, description: &str) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}
impl ConfigItem<f64> for PositiveNumberConfigItem {
    fn get_value(&self) -> &f64 {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        let parsed: f64 = new_value
            .trim()
            .parse()
            .map_err(|_| Error::Parse(format!("'{}' is not a number.", new_value.trim())))?;
        if !parsed.is_finite() || parsed <= 0.0 {
            return Err(Error::Parse(format!(
                "Value must be greater than zero, got {parsed}."
            )));
        }
        self.value = parsed;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

/// Whole count, at least one (days, instances).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountConfigItem {
    pub value: u32,
    pub description: String,
}
impl CountConfigItem {
    pub fn new(value: u32, description: &str) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }
}
impl ConfigItem<u32> for CountConfigItem {
    fn get_value(&self) -> &u32 {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        match new_value.trim().parse::<u32>() {
            Ok(n) if n >= 1 => {
                self.value = n;
                Ok(())
            }
            _ => Err(Error::Parse(format!(
                "'{}' is not a whole number of at least 1.",
                new_value.trim()
            ))),
        }
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLinkConfigItem {
    pub value: String,
    pub description: String,
}
impl Default for DeepLinkConfigItem {
    fn default() -> Self {
        Self {
            value: "http://localhost:8080".into(),
            description: "Base URL for appointment deep links.".into(),
        }
    }
}
impl ConfigItem<String> for DeepLinkConfigItem {
    fn get_value(&self) -> &String {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        let trimmed = new_value.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(Error::Parse(format!(
                "Deep link base must start with http:// or https://, got '{}'.",
                new_value.trim()
            )));
        }
        self.value = trimmed.to_string();
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLoggingConfigItem {
    pub value: Bool,
    pub description: String,
}

impl Default for FileLoggingConfigItem {
    fn default() -> Self {
        Self {
            value: Bool(true),
            description: "Enable writing log messages to file.".into(),
        }
    }
}

impl ConfigItem<Bool> for FileLoggingConfigItem {
    fn get_value(&self) -> &Bool {
        &self.value
    }
    fn set_value(&mut self, new_value: &str) -> Result<(), Error> {
        self.value = Bool::try_from_str(new_value)?;
        Ok(())
    }
    fn description(&self) -> &str {
        &self.description
    }
}

pub(crate) mod defaults {
    use super::{CountConfigItem, PositiveNumberConfigItem};

    pub fn pixels_per_hour() -> PositiveNumberConfigItem {
        PositiveNumberConfigItem::new(60.0, "Time-grid height of one hour, in pixels.")
    }
    pub fn drag_threshold_px() -> PositiveNumberConfigItem {
        PositiveNumberConfigItem::new(8.0, "Pointer travel that turns a click into a drag.")
    }
    pub fn default_gps_radius_m() -> PositiveNumberConfigItem {
        PositiveNumberConfigItem::new(100.0, "Check-in radius for new appointments, in metres.")
    }
    pub fn underutilized_percent() -> PositiveNumberConfigItem {
        PositiveNumberConfigItem::new(50.0, "Utilization below this percent is flagged.")
    }
    pub fn recurrence_horizon_days() -> CountConfigItem {
        CountConfigItem::new(90, "Days to expand an open-ended recurrence.")
    }
    pub fn max_recurrence_instances() -> CountConfigItem {
        CountConfigItem::new(365, "Hard cap on instances generated for one series.")
    }
}
