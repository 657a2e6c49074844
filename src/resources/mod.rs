//! API resources. Each operation maps to one request with a fixed
//! expected status.

pub mod app_installations;
pub mod apps;

pub use app_installations::AppInstallations;
pub use apps::Apps;

use crate::client::HttpClient;
use crate::http::Transport;
use crate::params::Params;

/// Resources that can hold a pending id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Apps,
    AppInstallations,
}

/// Move a primed id into `params` as `id`, overriding any caller value.
pub(crate) fn inject_last_id<T: Transport>(
    client: &mut HttpClient<T>,
    kind: ResourceKind,
    params: &mut Params,
) {
    if let Some(id) = client.take_last_id(kind) {
        params.insert("id", id);
    }
}
