//! TXT lookups against live DNS and against zone data.

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::time::Duration;

use tracing::{debug, instrument, trace};
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::Resolver;

use crate::config::DnsSettings;
use crate::domain::{DomainResult, ResourceRecord};
use crate::infrastructure::traits::TxtLookup;

/// [`TxtLookup`] backed by a blocking trust-dns resolver.
pub struct DnsTxtLookup {
    resolver: Resolver,
}

impl DnsTxtLookup {
    /// Builds a resolver from settings.
    ///
    /// Without configured nameservers the system configuration
    /// (`/etc/resolv.conf` on unix) is used.
    pub fn new(settings: &DnsSettings) -> io::Result<Self> {
        let (config, mut opts) = if settings.nameservers.is_empty() {
            trust_dns_resolver::system_conf::read_system_conf()?
        } else {
            (
                custom_config(&settings.nameservers, settings.port),
                ResolverOpts::default(),
            )
        };
        opts.timeout = Duration::from_secs(settings.timeout_secs);
        debug!(
            nameservers = config.name_servers().len(),
            timeout_secs = settings.timeout_secs,
            "creating DNS resolver"
        );
        Ok(Self {
            resolver: Resolver::new(config, opts)?,
        })
    }
}

fn custom_config(nameservers: &[IpAddr], port: u16) -> ResolverConfig {
    ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from_ips_clear(nameservers, port, true),
    )
}

impl TxtLookup for DnsTxtLookup {
    #[instrument(level = "trace", skip(self))]
    fn lookup_txt(&self, name: &str) -> io::Result<Vec<String>> {
        let lookup = self.resolver.txt_lookup(name).map_err(to_io_error)?;
        let entries: Vec<String> = lookup
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>()
            })
            .collect();
        trace!("{} TXT entries at {}", entries.len(), name);
        Ok(entries)
    }
}

fn to_io_error(err: ResolveError) -> io::Error {
    let kind = match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => io::ErrorKind::NotFound,
        ResolveErrorKind::Timeout => io::ErrorKind::TimedOut,
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, err)
}

/// [`TxtLookup`] answering from zone data instead of the network.
///
/// Names are matched case-insensitively. Lets a zone produced by `create`
/// be resolved before it is published.
#[derive(Debug, Default, Clone)]
pub struct ZoneTxtLookup {
    entries: HashMap<String, Vec<String>>,
}

impl ZoneTxtLookup {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ResourceRecord>) -> Self {
        let mut lookup = Self::default();
        for rr in records.into_iter().filter(|rr| rr.is_txt()) {
            lookup.insert(&rr.name, rr.text.clone());
        }
        lookup
    }

    /// Parses zone-file text as written by `create`.
    ///
    /// Blank lines and `;` comments are skipped, as are records other than
    /// `IN TXT`.
    pub fn parse(zone: &str) -> DomainResult<Self> {
        let records = zone
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(';'))
            .map(str::parse)
            .collect::<DomainResult<Vec<ResourceRecord>>>()?;
        Ok(Self::from_records(&records))
    }

    /// Adds a TXT entry at `name`.
    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TxtLookup for ZoneTxtLookup {
    fn lookup_txt(&self, name: &str) -> io::Result<Vec<String>> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no TXT records for {name}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_zone_text_when_parsing_then_indexes_txt_entries_by_name() {
        let zone = "; generated\n\
                    _did.example.com.\tIN\t3600\tTXT\t\"v=did:dnssec; t=m; d=aWQ\"\n\
                    \n\
                    example.com.\tIN\t3600\tA\t192.0.2.1\n\
                    aWQ._did.example.com.\tIN\t3600\tTXT\t\"v=did:dnssec; t=p; \" \"d=string=eA\"\n";
        let lookup = ZoneTxtLookup::parse(zone).unwrap();

        assert_eq!(lookup.len(), 2);
        assert_eq!(
            lookup.lookup_txt("aWQ._DID.Example.com.").unwrap(),
            vec!["v=did:dnssec; t=p; d=string=eA"]
        );
    }

    #[test]
    fn given_unknown_name_when_looking_up_then_not_found() {
        let err = ZoneTxtLookup::default().lookup_txt("x.").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn given_garbage_line_when_parsing_zone_then_fails() {
        assert!(ZoneTxtLookup::parse("not a record").is_err());
    }
}
