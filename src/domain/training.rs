use serde::Serialize;

/// Publication state of a training module.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModuleState {
    Draft,
    Published,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Lesson {
    pub title: String,
    pub duration_minutes: u32,
}

/// Training content offered to hosts and coordinators.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TrainingModule {
    pub id: i64,
    pub title: String,
    pub audience: String,
    pub state: ModuleState,
    pub lessons: Vec<Lesson>,
}

impl TrainingModule {
    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|lesson| lesson.duration_minutes).sum()
    }
}
