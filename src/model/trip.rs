//! Trip types: the start/destination pair driving a dashboard session.

use serde::{Deserialize, Serialize};

/// The planned emergency route, as entered on the trip form.
///
/// Persisted as a single JSON record; field names are fixed by the
/// stored format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub start_location: String,
    pub destination: String,
}
