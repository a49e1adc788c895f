pub mod clock;
pub mod race;
pub mod shooter;
pub mod typing;

use crate::engine::Metrics;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn is_running(self) -> bool {
        self == SessionStatus::Running
    }
}

/// State-change notifications emitted by the sessions. The owner decides
/// what to do with them (persist a best score, show a popup, log).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Elapsed { secs: u64 },
    Completed { metrics: Metrics, clean: bool },
    Failed { metrics: Metrics },
    WordCompleted { word: String, points: u32 },
    Countdown { secs_left: u32 },
    RaceFinished { words_completed: u32, score: u32 },
    Spawned { word: String },
    TargetHit { word: String, points: u32 },
    LifeLost { lives: u32 },
    GameOver { hits: u32, score: u32 },
}
