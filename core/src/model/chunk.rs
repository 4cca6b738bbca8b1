use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Absent and `null` both decode to the type's default.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Text fields accept any JSON value; non-strings keep their JSON text.
fn lenient_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// One transcript window with the claims extracted from it.
///
/// Fields the gate does not inspect are carried in `extra` so a corrected
/// copy serializes back with everything the upstream pipeline wrote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    #[serde(default, deserialize_with = "null_as_default")]
    pub claims: Vec<Claim>,
    #[serde(rename = "videoTime", default, skip_serializing_if = "Option::is_none")]
    pub video_time: Option<Value>,
    #[serde(
        rename = "fullText",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub full_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Chunk {
    /// Time marker used when merging duplicates; empty string when missing.
    pub fn time_marker(&self) -> Value {
        self.video_time
            .clone()
            .unwrap_or_else(|| Value::String(String::new()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claim {
    #[serde(
        rename = "originalClaim",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_claim: Option<String>,
    // legacy key written by older extractors
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub claim: Option<String>,
    #[serde(
        rename = "cleanedClaim",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cleaned_claim: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Verification::is_absent"
    )]
    pub verification: Verification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claim {
    /// Raw extracted text: `originalClaim`, else the legacy `claim` key.
    pub fn text(&self) -> &str {
        self.original_claim
            .as_deref()
            .or(self.claim.as_deref())
            .unwrap_or("")
    }

    pub fn cleaned(&self) -> &str {
        self.cleaned_claim.as_deref().unwrap_or("")
    }
}

/// Verdict and confidence are kept as raw JSON so a wrongly typed value is
/// reported by the checks and written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Verification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Value>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Verification {
    /// The verdict string; empty when missing or not a string.
    pub fn verdict(&self) -> &str {
        self.verdict.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    /// The verdict as written, with non-strings shown as JSON text.
    pub fn verdict_display(&self) -> String {
        match &self.verdict {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn parsed_verdict(&self) -> Option<Verdict> {
        self.verdict
            .as_ref()
            .and_then(Value::as_str)
            .and_then(Verdict::parse)
    }

    /// Missing or non-numeric confidence counts as 0.0.
    pub fn confidence(&self) -> f64 {
        self.confidence.as_ref().and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn explanation(&self) -> &str {
        self.explanation.as_deref().unwrap_or("")
    }

    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or(&[])
    }

    fn is_absent(&self) -> bool {
        self.verdict.is_none()
            && self.confidence.is_none()
            && self.explanation.is_none()
            && self.sources.is_none()
            && self.extra.is_empty()
    }
}

/// A cited source exactly as the pipeline stored it.
///
/// Bare strings and structured records are both accepted on input; the mix
/// itself is reported (S2) and only rewritten by the auto-fix engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Source {
    Raw(String),
    Typed(TypedSource),
    Other(Value),
}

impl Source {
    pub fn domain(&self) -> &str {
        match self {
            Source::Raw(d) => d,
            Source::Typed(t) => &t.domain,
            Source::Other(_) => "",
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Source::Raw(_))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TypedSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    True,
    False,
    PartiallyTrue,
    Opinion,
    Unverifiable,
}

impl Verdict {
    pub const ALL: [Verdict; 5] = [
        Verdict::True,
        Verdict::False,
        Verdict::PartiallyTrue,
        Verdict::Opinion,
        Verdict::Unverifiable,
    ];

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::PartiallyTrue => "partially_true",
            Verdict::Opinion => "opinion",
            Verdict::Unverifiable => "unverifiable",
        }
    }

    pub fn is_definitive(self) -> bool {
        matches!(self, Verdict::True | Verdict::False)
    }

    /// Opinion and unverifiable never contradict each other.
    pub fn is_non_committal(self) -> bool {
        matches!(self, Verdict::Opinion | Verdict::Unverifiable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}
