use crate::config::Config;
use crate::core::models::{
    Appointment, ServiceOrder, Subcontractor, Worker, WorkerSchedule, WorkerUnavailability,
};
use crate::core::repository::Repository;
use crate::errors::Result;
use crate::logging::Logger;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message, drained by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Everything the board reads from. The appointment repository is the one
/// shared cache every view projects.
#[derive(Debug)]
pub struct BoardContext {
    pub config: Config,
    pub appointments: Repository<Appointment>,
    pub workers: Repository<Worker>,
    pub subcontractors: Repository<Subcontractor>,
    pub service_orders: Repository<ServiceOrder>,
    pub schedules: Repository<WorkerSchedule>,
    pub unavailability: Repository<WorkerUnavailability>,
    pub logger: Logger,
    notices: Vec<Notice>,
    pub config_path: PathBuf,
    pub board_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl BoardContext {
    pub fn new_with_paths(
        config_path: PathBuf,
        board_path: PathBuf,
        logs_dir: PathBuf,
    ) -> Result<Self> {
        let config = Config::load_from(&config_path)?;

        let logger = Logger::new();
        logger.set_log_dir(&logs_dir);
        logger.set_file_logging_enabled(config.file_logging_enabled());

        Ok(Self::assemble(config, logger, config_path, board_path, logs_dir))
    }

    /// Board over `config` with a silent logger and no files.
    pub fn in_memory(config: Config) -> Self {
        Self::assemble(
            config,
            Logger::silent(),
            PathBuf::from("config.json"),
            PathBuf::from("board.json"),
            PathBuf::from("logs"),
        )
    }

    fn assemble(
        config: Config,
        logger: Logger,
        config_path: PathBuf,
        board_path: PathBuf,
        logs_dir: PathBuf,
    ) -> Self {
        Self {
            config,
            appointments: Repository::new(),
            workers: Repository::new(),
            subcontractors: Repository::new(),
            service_orders: Repository::new(),
            schedules: Repository::new(),
            unavailability: Repository::new(),
            logger,
            notices: Vec::new(),
            config_path,
            board_path,
            logs_dir,
        }
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
