//! `rdap_domain`: registration lookup through the rdap.org bootstrap service.
//!
//! Availability is inferred from the answer: a domain object means the name
//! is taken, a `404` means no registry holds it. Any other HTTP error is
//! reported as a successful lookup with status `unknown`; transport failures
//! and rate limiting still fail the call.

use async_trait::async_trait;
use scout_application::{Adapter, AdapterContext};
use scout_domain::{Failure, FailureKind, Item, Payload, ToolCall, ToolDefinition, ToolParameter};
use serde_json::Value;
use tracing::debug;

use crate::tools::common::required;
use crate::tools::normalize::{array_at, parse_json, str_at, strings_at};

pub const RDAP_DOMAIN: &str = "rdap_domain";

const RDAP_URL: &str = "https://rdap.org/domain";
const RDAP_ACCEPT: &str = "application/rdap+json, application/json, */*";

/// Domain registration status.
pub struct RdapDomain;

#[async_trait]
impl Adapter for RdapDomain {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::read_only(
            RDAP_DOMAIN,
            "Look up a domain name via RDAP. Reports whether it is taken, available or unknown, \
             with registrar, nameservers and key dates when registered.",
        )
        .with_parameter(ToolParameter::new(
            "domain",
            "Domain name (a URL is accepted; scheme and path are ignored)",
            true,
        ))
    }

    async fn run(&self, ctx: &AdapterContext<'_>, call: &ToolCall) -> Result<Payload, Failure> {
        let domain = normalize_domain(required(call, "domain")?);
        if domain.is_empty() {
            return Err(Failure::invalid_argument("Argument 'domain' has no host part"));
        }
        let url = format!("{}/{}", RDAP_URL, domain);
        let base = Item::new().with("domain", domain.as_str()).with("url", url.as_str());

        let request = ctx.request(&url).header("Accept", RDAP_ACCEPT);
        let response = match ctx.fetch(request).await {
            Ok(response) => response,
            Err(e) if e.kind == FailureKind::HttpError && e.status == Some(404) => {
                return Ok(base
                    .with("status", "available")
                    .with("http_status", 404)
                    .into());
            }
            Err(e) if e.kind == FailureKind::HttpError => {
                return Ok(base
                    .with("status", "unknown")
                    .with_opt("http_status", e.status)
                    .with("error", e.message)
                    .into());
            }
            Err(e) => return Err(e),
        };

        let base = base.with("http_status", response.status);
        let data = match parse_json(&response) {
            Ok(data) => data,
            Err(e) => {
                debug!(domain = %domain, error = %e, "RDAP answer is not JSON");
                return Ok(base.with("status", "unknown").with("error", e.message).into());
            }
        };

        if data["objectClassName"].as_str() != Some("domain") {
            return Ok(base
                .with("status", "unknown")
                .with_nonempty("object_class", data["objectClassName"].as_str())
                .into());
        }
        Ok(registration(base.with("status", "taken"), &data).into())
    }
}

/// Lowercase host part of `input`, without scheme, path or trailing dot.
fn normalize_domain(input: &str) -> String {
    let domain = input.trim().to_lowercase();
    let domain = domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(&domain);
    domain
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_string()
}

/// Compact view of an RDAP domain object.
fn registration(item: Item, data: &Value) -> Item {
    let event = |action: &str| {
        array_at(data, "/events")
            .iter()
            .find(|e| e["eventAction"].as_str() == Some(action))
            .and_then(|e| e["eventDate"].as_str())
            .map(str::to_string)
    };
    let nameservers: Vec<String> = array_at(data, "/nameservers")
        .iter()
        .filter_map(|ns| ns["ldhName"].as_str())
        .map(str::to_lowercase)
        .collect();

    item.with_nonempty("handle", str_at(data, "/handle"))
        .with_nonempty("ldh_name", str_at(data, "/ldhName"))
        .with("rdap_status", strings_at(data, "/status"))
        .with_opt("registrar", registrar(data))
        .with_opt("registered", event("registration"))
        .with_opt("expires", event("expiration"))
        .with_opt("last_changed", event("last changed"))
        .with("nameservers", nameservers)
}

/// Full name from the vCard of the entity holding the `registrar` role.
fn registrar(data: &Value) -> Option<String> {
    let entity = array_at(data, "/entities").iter().find(|entity| {
        array_at(entity, "/roles")
            .iter()
            .any(|role| role.as_str() == Some("registrar"))
    })?;
    // vcardArray: ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "Name"], ...]]
    array_at(entity, "/vcardArray/1")
        .iter()
        .find(|prop| prop[0].as_str() == Some("fn"))
        .and_then(|prop| prop[3].as_str())
        .map(str::to_string)
}
