// Upstream server endpoints

use tracing::debug;

use crate::client::SmartDnsClient;
use crate::error::Error;
use crate::models::{UpstreamServerEntry, UpstreamServerResponse};

impl SmartDnsClient {
    /// Fetch every configured upstream server with its query statistics.
    ///
    /// `GET /api/upstream-server`. The list is not paginated.
    pub async fn get_upstream_servers(&self) -> Result<Vec<UpstreamServerEntry>, Error> {
        let url = self.url("/api/upstream-server")?;
        debug!("listing upstream servers");
        let resp: UpstreamServerResponse = self.get(url).await?;
        resp.upstream_servers.ok_or(Error::MissingPayload)
    }
}
