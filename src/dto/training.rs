use serde::Serialize;

use crate::domain::training::{ModuleState, TrainingModule};

/// One card on the training overview.
#[derive(Debug, Serialize, PartialEq)]
pub struct TrainingCard {
    pub id: i64,
    pub title: String,
    pub audience: String,
    pub published: bool,
    pub lessons: usize,
    pub total_minutes: u32,
}

impl From<&TrainingModule> for TrainingCard {
    fn from(module: &TrainingModule) -> Self {
        Self {
            id: module.id,
            title: module.title.clone(),
            audience: module.audience.clone(),
            published: module.state == ModuleState::Published,
            lessons: module.lessons.len(),
            total_minutes: module.total_minutes(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TrainingPage {
    pub modules: Vec<TrainingCard>,
}

#[derive(Debug, Serialize)]
pub struct TrainingModulePage {
    pub module: TrainingModule,
    pub total_minutes: u32,
}
