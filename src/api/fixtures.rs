//! Fixture-backed [`PlaceholderSource`] for screens whose endpoints do not
//! exist yet. Swapping in a real client only requires another implementation
//! of the trait.

use crate::api::PlaceholderSource;
use crate::domain::booking::Booking;
use crate::domain::training::{Lesson, ModuleState, TrainingModule};
use crate::domain::types::RecordId;

#[derive(Clone, Debug, Default)]
pub struct FixtureSource;

fn lesson(title: &str, duration_minutes: u32) -> Lesson {
    Lesson {
        title: title.to_string(),
        duration_minutes,
    }
}

impl PlaceholderSource for FixtureSource {
    fn training_modules(&self) -> Vec<TrainingModule> {
        vec![
            TrainingModule {
                id: 1,
                title: "Welcome to Heaven Connect".to_string(),
                audience: "Hosts".to_string(),
                state: ModuleState::Published,
                lessons: vec![
                    lesson("How bookings work", 8),
                    lesson("Setting house rules", 6),
                    lesson("Payouts and fees", 10),
                ],
            },
            TrainingModule {
                id: 2,
                title: "Listing photography".to_string(),
                audience: "Hosts".to_string(),
                state: ModuleState::Published,
                lessons: vec![lesson("Light and angles", 12), lesson("Staging rooms", 9)],
            },
            TrainingModule {
                id: 3,
                title: "Coordinator onboarding".to_string(),
                audience: "Area Coordinators".to_string(),
                state: ModuleState::Draft,
                lessons: vec![
                    lesson("Property inspections", 15),
                    lesson("Escalating guest issues", 11),
                ],
            },
        ]
    }

    fn training_module(&self, id: i64) -> Option<TrainingModule> {
        self.training_modules()
            .into_iter()
            .find(|module| module.id == id)
    }

    fn host_bookings(&self, host_id: &RecordId) -> Vec<Booking> {
        let host = host_id.to_string();
        vec![
            Booking {
                reference: format!("BK-{host}-001"),
                property: "Seaside Cottage".to_string(),
                guest_name: "Jordan Avery".to_string(),
                check_in: "2024-07-01".to_string(),
                check_out: "2024-07-05".to_string(),
                amount_cents: 64_000,
            },
            Booking {
                reference: format!("BK-{host}-002"),
                property: "Seaside Cottage".to_string(),
                guest_name: "Sam Rivera".to_string(),
                check_in: "2024-08-12".to_string(),
                check_out: "2024-08-14".to_string(),
                amount_cents: 31_500,
            },
        ]
    }
}
