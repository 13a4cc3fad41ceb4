//! Namespaces owned by the account.

use super::ListResponse;
use serde::{Deserialize, Serialize};

/// Isolated inbox identified by name, e.g. `mynamespace` for
/// `*@mynamespace.mailisk.net`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: String,
    pub namespace: String,
}

pub type ListNamespacesResponse = ListResponse<Namespace>;
