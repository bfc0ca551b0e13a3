use serde::Serialize;

/// Booking summary shown on the host detail screen.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Booking {
    pub reference: String,
    pub property: String,
    pub guest_name: String,
    pub check_in: String,
    pub check_out: String,
    pub amount_cents: i64,
}
