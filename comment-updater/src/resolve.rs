use std::net::IpAddr;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use shared::protocol::UNKNOWN_IP;
use crate::comment::is_hostname;

/// Hostname to address lookup.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system (getaddrinfo via tokio)
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, hostname: &str) -> Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((hostname, 0))
            .await
            .with_context(|| format!("Failed to resolve {}", hostname))?;

        Ok(addrs.map(|sa| sa.ip()).collect())
    }
}

/// Address that ends up in the comment for one port host value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortAddress {
    /// Host value had no letters and was used as-is
    Literal(String),
    /// Hostname resolved to this address
    Resolved(String),
    /// Hostname lookup failed
    Unresolved,
}

impl PortAddress {
    pub fn as_str(&self) -> &str {
        match self {
            PortAddress::Literal(s) | PortAddress::Resolved(s) => s,
            PortAddress::Unresolved => UNKNOWN_IP,
        }
    }
}

/// Turn a port host value into the address shown in the comment.
/// Only values containing a letter reach the resolver.
pub async fn port_address(host_value: &str, resolver: &dyn Resolver) -> PortAddress {
    if !is_hostname(host_value) {
        return PortAddress::Literal(host_value.to_string());
    }

    match resolver.resolve(host_value).await.and_then(|addrs| pick_address(host_value, &addrs)) {
        Ok(addr) => {
            tracing::debug!("Resolved {} to {}", host_value, addr);
            PortAddress::Resolved(addr.to_string())
        }
        Err(e) => {
            tracing::warn!("Could not resolve IP for {}: {:#}", host_value, e);
            PortAddress::Unresolved
        }
    }
}

/// First IPv4 address if there is one, otherwise the first address
fn pick_address(hostname: &str, addrs: &[IpAddr]) -> Result<IpAddr> {
    if let Some(v4) = addrs.iter().find(|a| a.is_ipv4()) {
        return Ok(*v4);
    }
    match addrs.first() {
        Some(addr) => Ok(*addr),
        None => bail!("{} resolved to no addresses", hostname),
    }
}
