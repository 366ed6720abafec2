use crate::core::context::BoardContext;
use crate::core::models::{
    Appointment, ServiceOrder, Subcontractor, Worker, WorkerSchedule, WorkerUnavailability,
};
use crate::core::repository::{Repository, Sort};
use crate::core::transaction::Transaction;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk board: reference data plus the appointment cache.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFile {
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub subcontractors: Vec<Subcontractor>,
    #[serde(default)]
    pub service_orders: Vec<ServiceOrder>,
    #[serde(default)]
    pub schedules: Vec<WorkerSchedule>,
    #[serde(default)]
    pub unavailability: Vec<WorkerUnavailability>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

pub fn save_board(ctx: &BoardContext, path: &Path) -> Result<PathBuf> {
    let file = BoardFile {
        workers: sorted(&ctx.workers),
        subcontractors: sorted(&ctx.subcontractors),
        service_orders: sorted(&ctx.service_orders),
        schedules: sorted(&ctx.schedules),
        unavailability: sorted(&ctx.unavailability),
        appointments: sorted(&ctx.appointments),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let contents = serde_json::to_string_pretty(&file)?;
    fs::write(path, contents)?;
    Ok(path.to_path_buf())
}

/// Replaces the board with the file's contents. On any error the board is
/// left exactly as it was.
pub fn load_board(ctx: &mut BoardContext, path: &Path) -> Result<()> {
    let file = load_board_file(path)?;
    Transaction::new().run(ctx, true, |ctx| {
        for w in file.workers {
            ctx.workers.insert_with_id(w)?;
        }
        for s in file.subcontractors {
            ctx.subcontractors.insert_with_id(s)?;
        }
        for o in file.service_orders {
            ctx.service_orders.insert_with_id(o)?;
        }
        for s in file.schedules {
            ctx.schedules.insert_with_id(s)?;
        }
        for u in file.unavailability {
            ctx.unavailability.insert_with_id(u)?;
        }
        for a in file.appointments {
            ctx.appointments.insert_with_id(a)?;
        }
        Ok(())
    })
}

pub fn load_board_file(path: &Path) -> Result<BoardFile> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn sorted<T>(repo: &Repository<T>) -> Vec<T>
where
    T: crate::core::models::BaseEntity + Clone,
{
    repo.values(Sort::IdAsc).into_iter().cloned().collect()
}
