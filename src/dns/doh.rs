//! DNS-over-HTTPS transport (JSON API, `application/dns-json`).

use async_trait::async_trait;
use hickory_resolver::proto::rr::RecordType;
use serde::Deserialize;

use super::extract::normalize_txt;
use super::transport::DnsTransport;
use crate::error_handling::ResolutionError;

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Tunnels queries through an HTTPS JSON resolver endpoint.
///
/// Any failure here (transport error, non-zero DNS status, empty answer) is
/// reported as `Inconclusive`: this transport is only consulted after the
/// primary path already failed inconclusively.
pub struct DohTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl DohTransport {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        DohTransport {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl DnsTransport for DohTransport {
    fn name(&self) -> &str {
        "doh"
    }

    async fn query(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, ResolutionError> {
        let type_name = record_type.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", name), ("type", type_name.as_str())])
            .header(reqwest::header::ACCEPT, "application/dns-json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ResolutionError::inconclusive(name, format!("DoH request failed: {e}")))?;

        let body: DohResponse = response
            .json()
            .await
            .map_err(|e| ResolutionError::inconclusive(name, format!("DoH response invalid: {e}")))?;

        let wanted = u16::from(record_type);
        let answers: Vec<String> = body
            .answer
            .into_iter()
            .filter(|a| a.record_type == wanted)
            .map(|a| {
                if record_type == RecordType::TXT {
                    normalize_txt(&a.data)
                } else {
                    a.data
                }
            })
            .collect();

        if body.status != 0 || answers.is_empty() {
            log::warn!(
                "DoH resolution failed for {name}: status {} with {} answer(s)",
                body.status,
                answers.len()
            );
            return Err(ResolutionError::inconclusive(
                name,
                format!("DoH refused or no data: status {}", body.status),
            ));
        }
        Ok(answers)
    }
}
