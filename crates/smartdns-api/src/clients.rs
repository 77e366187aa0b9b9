// DNS client endpoints
//
// Paginated listing with server-side column filters, and deletion by id.

use tracing::debug;

use crate::client::SmartDnsClient;
use crate::error::Error;
use crate::models::{ClientEntry, ClientListResponse};

/// A decoded client page with its payload guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientList {
    pub client_list: Vec<ClientEntry>,
    pub total_count: u64,
}

impl SmartDnsClient {
    /// Fetch one page of DNS clients.
    ///
    /// `GET /api/client?page_num=..&page_size=..&<column>=<value>..`
    ///
    /// Parameters are sent in the order given. A `null` `client_list`
    /// yields `Error::MissingPayload`.
    pub async fn get_clients(&self, params: &[(String, String)]) -> Result<ClientList, Error> {
        let url = self.url("/api/client")?;
        debug!(params = params.len(), "listing DNS clients");
        let resp: ClientListResponse = self.get_with_params(url, params).await?;
        let client_list = resp.client_list.ok_or(Error::MissingPayload)?;
        Ok(ClientList {
            client_list,
            total_count: resp.total_count,
        })
    }

    /// Delete a client record.
    ///
    /// `DELETE /api/client/{id}`
    pub async fn delete_client_by_id(&self, id: u64) -> Result<(), Error> {
        let url = self.url(&format!("/api/client/{id}"))?;
        debug!(id, "deleting DNS client");
        self.delete(url).await
    }
}
