use crate::{HostAlias, NameQuery, RecordType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

/// How `dig` reaches the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupTransport {
    Udp,
    Tcp,
}

impl LookupTransport {
    pub fn dig_flag(&self) -> &'static str {
        match self {
            LookupTransport::Udp => "+notcp",
            LookupTransport::Tcp => "+tcp",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LookupTransport::Udp => "udp",
            LookupTransport::Tcp => "tcp",
        }
    }
}

impl fmt::Display for LookupTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// What a single artifact file records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    Lookup {
        name: NameQuery,
        record_type: RecordType,
        transport: LookupTransport,
    },
    HostAlias(HostAlias),
    PodARecord {
        transport: LookupTransport,
    },
    ReverseLookup {
        ip: IpAddr,
        transport: LookupTransport,
    },
    Targeted {
        name: NameQuery,
        record_type: RecordType,
    },
}

/// Identifier of a file the sandbox writes under its results directory,
/// paired with what the file is supposed to prove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeArtifact {
    pub id: String,
    pub kind: ArtifactKind,
}

impl ProbeArtifact {
    pub fn lookup(
        variant: &str,
        name: NameQuery,
        record_type: RecordType,
        transport: LookupTransport,
    ) -> Self {
        Self {
            id: format!("{}_{}@{}", variant, transport.tag(), name),
            kind: ArtifactKind::Lookup {
                name,
                record_type,
                transport,
            },
        }
    }

    pub fn host_alias(variant: &str, alias: HostAlias) -> Self {
        Self {
            id: format!("{}_hosts@{}", variant, alias.alias),
            kind: ArtifactKind::HostAlias(alias),
        }
    }

    pub fn pod_a_record(variant: &str, transport: LookupTransport) -> Self {
        Self {
            id: format!("{}_{}@PodARecord", variant, transport.tag()),
            kind: ArtifactKind::PodARecord { transport },
        }
    }

    pub fn reverse_lookup(variant: &str, ip: IpAddr, transport: LookupTransport) -> Self {
        Self {
            id: format!("{}_{}@PTR-{}", variant, transport.tag(), ip),
            kind: ArtifactKind::ReverseLookup { ip, transport },
        }
    }

    pub fn targeted(variant: &str, name: NameQuery, record_type: RecordType) -> Self {
        Self {
            id: format!("{}_{}@{}", variant, record_type.tag(), name),
            kind: ArtifactKind::Targeted { name, record_type },
        }
    }

    /// Presence-mode expectation: host aliases must canonicalise to their
    /// expected name, everything else only has to exist.
    pub fn presence_expectation(&self) -> Expectation {
        match &self.kind {
            ArtifactKind::HostAlias(alias) => Expectation::Exact(alias.expected.to_string()),
            _ => Expectation::NonEmpty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    NonEmpty,
    Exact(String),
}

impl Expectation {
    /// Payloads are files written by `echo`/`dig`, so surrounding whitespace
    /// (the trailing newline) is not significant. The trailing root dot is.
    pub fn accepts(&self, payload: &str) -> bool {
        let payload = payload.trim();
        match self {
            Expectation::NonEmpty => !payload.is_empty(),
            Expectation::Exact(expected) => payload == expected.trim(),
        }
    }
}

/// Artifact identifier → expected content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectationSet(BTreeMap<String, Expectation>);

impl ExpectationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, expectation: Expectation) {
        self.0.insert(id.into(), expectation);
    }

    pub fn get(&self, id: &str) -> Option<&Expectation> {
        self.0.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expectation)> {
        self.0.iter().map(|(id, e)| (id.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Expectation)> for ExpectationSet {
    fn from_iter<I: IntoIterator<Item = (String, Expectation)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
