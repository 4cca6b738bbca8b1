use crate::error::{CoreError, CoreResult};
use crate::sources::domain::normalize_domain;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Conventional config file looked up next to the running executable.
pub const SIDECAR_FILE: &str = "sources.json";

const DEFAULT_TIER_1: &[&str] = &[
    // Austria: government
    "parlament.gv.at",
    "ris.bka.gv.at",
    "bundeskanzleramt.gv.at",
    "bmf.gv.at",
    "statistik.at",
    "rechnungshof.gv.at",
    "bundespraesident.at",
    // Austria: research institutes
    "wifo.ac.at",
    "ihs.ac.at",
    "oenb.at",
    // international institutions
    "imf.org",
    "worldbank.org",
    "europa.eu",
    "oecd.org",
    "ecb.europa.eu",
    "destatis.de",
    "bls.gov",
    "eurostat.ec.europa.eu",
];

const DEFAULT_TIER_2: &[&str] = &[
    // Austrian quality media
    "orf.at",
    "derstandard.at",
    "diepresse.com",
    "kurier.at",
    "kleinezeitung.at",
    "salzburg24.at",
    "vol.at",
    // German quality media
    "spiegel.de",
    "zeit.de",
    "faz.net",
    "sueddeutsche.de",
    "tagesschau.de",
    "deutschlandfunk.de",
    "zdfheute.de",
    // wire services and press agencies
    "reuters.com",
    "apnews.com",
    "afp.com",
    "ots.at",
    "apa.at",
];

const DEFAULT_BANNED: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "reddit.com",
];

/// Credibility class of a cited domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Institutional,
    QualityMedia,
    Unclassified,
    Banned,
}

impl Tier {
    pub fn number(self) -> u8 {
        match self {
            Tier::Institutional => 1,
            Tier::QualityMedia => 2,
            Tier::Unclassified => 3,
            Tier::Banned => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RegistryOrigin {
    File(PathBuf),
    Defaults,
}

/// Tier-1, tier-2 and banned domain sets shared read-only by every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    tier_1: BTreeSet<String>,
    tier_2: BTreeSet<String>,
    banned: BTreeSet<String>,
    origin: RegistryOrigin,
    warnings: Vec<String>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SourceRegistry {
    pub fn defaults() -> Self {
        Self::from_sets(
            DEFAULT_TIER_1.iter().map(|s| s.to_string()),
            DEFAULT_TIER_2.iter().map(|s| s.to_string()),
            DEFAULT_BANNED.iter().map(|s| s.to_string()),
            RegistryOrigin::Defaults,
        )
    }

    pub fn from_sets<I1, I2, I3>(
        tier_1: I1,
        tier_2: I2,
        banned: I3,
        origin: RegistryOrigin,
    ) -> Self
    where
        I1: IntoIterator<Item = String>,
        I2: IntoIterator<Item = String>,
        I3: IntoIterator<Item = String>,
    {
        let tier_1 = normalized_set(tier_1);
        let tier_2 = normalized_set(tier_2);
        let banned = normalized_set(banned);

        let mut warnings = Vec::new();
        for (a_name, a, b_name, b) in [
            ("tier_1", &tier_1, "tier_2", &tier_2),
            ("tier_1", &tier_1, "banned", &banned),
            ("tier_2", &tier_2, "banned", &banned),
        ] {
            let overlap: Vec<&String> = a.intersection(b).collect();
            if !overlap.is_empty() {
                let msg = format!(
                    "{} domains appear in both {} and {}: {}",
                    overlap.len(),
                    a_name,
                    b_name,
                    overlap
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                tracing::warn!(overlap = overlap.len(), a = a_name, b = b_name, "source tiers overlap");
                warnings.push(msg);
            }
        }

        Self {
            tier_1,
            tier_2,
            banned,
            origin,
            warnings,
        }
    }

    /// Parse a config document. Each of `tier_1`, `tier_2`, `banned` may be a
    /// list of domains or an object keyed by domain (metadata ignored).
    pub fn from_json_str(json: &str, origin: RegistryOrigin) -> CoreResult<Self> {
        let v: Value = serde_json::from_str(json)?;
        let obj = v.as_object().ok_or_else(|| {
            CoreError::Config("top level must be an object with tier_1/tier_2/banned".to_string())
        })?;
        let tier_1 = tier_domains(obj.get("tier_1"), "tier_1")?;
        let tier_2 = tier_domains(obj.get("tier_2"), "tier_2")?;
        let banned = tier_domains(obj.get("banned"), "banned")?;
        Ok(Self::from_sets(tier_1, tier_2, banned, origin))
    }

    /// Search order: explicit path, then `sources.json` next to the executable,
    /// then built-in defaults. Never fails.
    pub fn load(explicit: Option<&Path>) -> Self {
        let mut candidates = Vec::new();
        if let Some(p) = explicit {
            candidates.push(p.to_path_buf());
        }
        if let Some(p) = sidecar_path() {
            candidates.push(p);
        }
        Self::load_from_candidates(&candidates)
    }

    /// First candidate that exists and parses wins. Unreadable or malformed
    /// candidates are skipped with a warning carried into the result.
    pub fn load_from_candidates(candidates: &[PathBuf]) -> Self {
        let mut carried = Vec::new();
        for path in candidates {
            if !path.exists() {
                tracing::debug!(path = %path.display(), "source config candidate not found");
                continue;
            }
            let loaded = std::fs::read_to_string(path)
                .map_err(CoreError::from)
                .and_then(|body| Self::from_json_str(&body, RegistryOrigin::File(path.clone())));
            match loaded {
                Ok(mut reg) => {
                    tracing::info!(
                        path = %path.display(),
                        tier_1 = reg.tier_1.len(),
                        tier_2 = reg.tier_2.len(),
                        banned = reg.banned.len(),
                        "loaded source config"
                    );
                    carried.append(&mut reg.warnings);
                    reg.warnings = carried;
                    return reg;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse source config, trying next");
                    carried.push(format!("failed to parse {}: {}", path.display(), e));
                }
            }
        }

        let mut reg = Self::defaults();
        if !carried.is_empty() {
            tracing::warn!("using built-in source tiers");
        }
        carried.append(&mut reg.warnings);
        reg.warnings = carried;
        reg
    }

    /// Checked in order banned, tier 1, tier 2, else unclassified. A host
    /// matches an entry for itself or for any parent domain, so
    /// `www.youtube.com` is banned through `youtube.com`.
    pub fn classify(&self, domain: &str) -> Tier {
        let d = normalize_domain(domain);
        let hit = |set: &BTreeSet<String>| parent_domains(&d).any(|p| set.contains(p));
        if hit(&self.banned) {
            Tier::Banned
        } else if hit(&self.tier_1) {
            Tier::Institutional
        } else if hit(&self.tier_2) {
            Tier::QualityMedia
        } else {
            Tier::Unclassified
        }
    }

    pub fn is_banned(&self, domain: &str) -> bool {
        self.classify(domain) == Tier::Banned
    }

    pub fn tier_1(&self) -> &BTreeSet<String> {
        &self.tier_1
    }

    pub fn tier_2(&self) -> &BTreeSet<String> {
        &self.tier_2
    }

    pub fn banned(&self) -> &BTreeSet<String> {
        &self.banned
    }

    pub fn origin(&self) -> &RegistryOrigin {
        &self.origin
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

pub fn sidecar_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(SIDECAR_FILE))
}

fn normalized_set(domains: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    domains
        .into_iter()
        .map(|d| normalize_domain(&d))
        .filter(|d| !d.is_empty())
        .collect()
}

fn tier_domains(v: Option<&Value>, key: &str) -> CoreResult<Vec<String>> {
    match v {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(map)) => Ok(map.keys().cloned().collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|x| {
                x.as_str().map(|s| s.to_string()).ok_or_else(|| {
                    CoreError::Config(format!("{} list entries must be strings", key))
                })
            })
            .collect(),
        Some(_) => Err(CoreError::Config(format!(
            "{} must be a list or an object keyed by domain",
            key
        ))),
    }
}

/// `a.b.example.org`, `b.example.org`, `example.org`; bare TLDs are skipped.
fn parent_domains(host: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(host), |h| {
        (*h).split_once('.')
            .map(|(_, rest)| rest)
            .filter(|rest| rest.contains('.'))
    })
    .filter(|h| !h.is_empty())
}
