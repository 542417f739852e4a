use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A bidder service registered with the auctioneer.
///
/// Identity is the `id`; the endpoint is immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidderEndpoint {
    pub id: String,
    /// Base URL of the bidder service, e.g. `http://localhost:9001`.
    pub address: Url,
    pub registered_at: DateTime<Utc>,
}

impl BidderEndpoint {
    pub fn new(id: impl Into<String>, address: Url) -> Self {
        Self {
            id: id.into(),
            address,
            registered_at: Utc::now(),
        }
    }

    /// URL the auction invitation is posted to: `<address>/auction/<id>`.
    pub fn invite_url(&self) -> String {
        format!(
            "{}/auction/{}",
            self.address.as_str().trim_end_matches('/'),
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_url() {
        let endpoint = BidderEndpoint::new("b1", "http://localhost:9001".parse().unwrap());
        assert_eq!(endpoint.invite_url(), "http://localhost:9001/auction/b1");
    }

    #[test]
    fn test_invite_url_trailing_slash() {
        // Url normalizes a bare authority to a trailing slash; both spellings
        // must produce the same invite target.
        let endpoint = BidderEndpoint::new("b2", "http://10.0.0.7:9002/".parse().unwrap());
        assert_eq!(endpoint.invite_url(), "http://10.0.0.7:9002/auction/b2");
    }

    #[test]
    fn test_endpoint_serde_address_as_string() {
        let endpoint = BidderEndpoint::new("b3", "http://bidder:9003".parse().unwrap());
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["id"], "b3");
        assert_eq!(json["address"], "http://bidder:9003/");
    }
}
