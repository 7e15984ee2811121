use std::net::IpAddr;

use poem::Request;
use poem::http::header;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains what the session layer records about a caller: client address,
/// user agent and the raw bearer credential, plus a request id for tracing.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Value of the User-Agent header, empty when absent
    pub user_agent: String,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Bearer credential from the Authorization header
    pub bearer: Option<String>,
}

impl RequestContext {
    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        tracing::debug!("Creating CLI context for {}", command_name);
        Self {
            ip_address: None,
            user_agent: format!("cli:{}", command_name),
            request_id: RequestId::new(),
            source: RequestSource::CLI,
            bearer: None,
        }
    }

    /// Create RequestContext from an incoming HTTP request
    pub fn from_request(req: &Request) -> Self {
        Self {
            ip_address: Self::extract_ip_address(req),
            user_agent: req
                .header(header::USER_AGENT)
                .unwrap_or_default()
                .to_string(),
            request_id: RequestId::new(),
            source: RequestSource::API,
            bearer: Self::extract_bearer(req),
        }
    }

    /// Client address in the form stored on session rows
    pub fn ip_string(&self) -> String {
        self.ip_address.map(|ip| ip.to_string()).unwrap_or_default()
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Token from the Authorization header
    ///
    /// Accepts both `Bearer <token>` and a bare token.
    fn extract_bearer(req: &Request) -> Option<String> {
        let value = req.header(header::AUTHORIZATION)?.trim();
        let token = match value.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            None if value.eq_ignore_ascii_case("bearer") => "",
            _ => value,
        };

        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        // Check X-Forwarded-For header (proxy/load balancer)
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        // Check X-Real-IP header (nginx)
        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        // Fall back to remote address
        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }
}
