use crate::core::types::{Date, ViewKind};
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config_path: PathBuf,
    pub board_path: PathBuf,
    pub logs_dir: PathBuf,
    pub view: ViewKind,
    /// Day the board is centred on; today when absent.
    pub date: Option<NaiveDate>,
    /// Print the configuration table after the view.
    pub show_config: bool,
}

impl CliOptions {
    pub fn from_env() -> Result<Self, String> {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = String>,
    {
        let mut opts = Self::defaults();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    opts.config_path = Self::next_value(&mut args, "--config")?.into();
                }
                "--board" => {
                    opts.board_path = Self::next_value(&mut args, "--board")?.into();
                }
                "--logs" => {
                    opts.logs_dir = Self::next_value(&mut args, "--logs")?.into();
                }
                "--view" => {
                    let raw = Self::next_value(&mut args, "--view")?;
                    opts.view = ViewKind::try_from(&raw).map_err(|e| e.to_string())?;
                }
                "--date" => {
                    let raw = Self::next_value(&mut args, "--date")?;
                    opts.date = Some(Date::try_from_str(&raw).map_err(|e| e.to_string())?.0);
                }
                "--show-config" => opts.show_config = true,
                _ => return Err(format!("Unknown argument: {arg}")),
            }
        }
        Ok(opts)
    }

    fn next_value<I>(args: &mut I, flag: &str) -> Result<String, String>
    where
        I: Iterator<Item = String>,
    {
        args.next()
            .ok_or_else(|| format!("Missing value for {flag}"))
    }

    fn defaults() -> Self {
        Self {
            config_path: PathBuf::from("config.json"),
            board_path: PathBuf::from("board.json"),
            logs_dir: PathBuf::from("logs"),
            view: ViewKind::Week,
            date: None,
            show_config: false,
        }
    }
}
