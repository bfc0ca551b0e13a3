use serde::Deserialize;

use crate::api::{ListQuery, selected_values};
use crate::domain::status::DisplayStatus;
use crate::forms::FormError;

/// Query string of a list screen.
///
/// `status` and `approval` may repeat (`?status=verified&status=pending`),
/// which is why this is parsed with `serde_html_form` rather than
/// `web::Query`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub q: Option<String>,
    #[serde(default)]
    pub status: Vec<String>,
    #[serde(default)]
    pub approval: Vec<String>,
    pub location: Option<String>,
    pub page: Option<usize>,
}

impl ListParams {
    pub fn from_query(query: &str) -> Result<Self, FormError> {
        Ok(serde_html_form::from_str(query)?)
    }

    /// Builds the backend query for a screen showing `per_page` rows.
    ///
    /// Badge filters (`verified`, `suspended`, `pending`) expand to every
    /// backend status shown under that badge.
    pub fn to_list_query(&self, per_page: usize) -> ListQuery {
        let statuses = selected_values(&self.status)
            .iter()
            .flat_map(|filter| DisplayStatus::backend_statuses(filter))
            .map(|status| status.to_string())
            .collect::<Vec<_>>();

        ListQuery::new(per_page)
            .search(self.q.clone().unwrap_or_default())
            .statuses(statuses)
            .approvals(&self.approval)
            .location(self.location.clone().unwrap_or_default())
            .paginate(self.page.unwrap_or(1))
    }

    /// Builds the backend query for the tickets screen, whose status values
    /// are sent as given.
    pub fn to_ticket_query(&self, per_page: usize) -> ListQuery {
        ListQuery::new(per_page)
            .search(self.q.clone().unwrap_or_default())
            .statuses(&self.status)
            .paginate(self.page.unwrap_or(1))
    }
}

/// `query` with any `page` parameter removed, for building pager links.
pub fn pager_base(query: &str) -> String {
    let pairs: Vec<(String, String)> = serde_html_form::from_str(query).unwrap_or_default();
    let kept = pairs
        .into_iter()
        .filter(|(key, _)| key != "page")
        .collect::<Vec<_>>();
    serde_html_form::to_string(&kept).unwrap_or_default()
}
