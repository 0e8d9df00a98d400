pub mod stage_watch;
pub mod upload_controller;

pub use stage_watch::DefaultStageWatchOrchestrator;
pub use upload_controller::{filter_stages_to_watch, StageSelection, UploadController};
