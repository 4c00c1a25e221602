use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One consultation entry as captured by the session form.
///
/// Every field except `id` is optional: records imported from older
/// snapshots may be missing anything, and malformed values are only
/// interpreted (with a default) when a report reads them.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SessionRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,

    #[serde(
        default,
        alias = "nome",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_name: Option<String>,

    /// Birth date as typed (`YYYY-MM-DD`)
    #[serde(
        default,
        alias = "dataNascimento",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<String>,

    #[serde(
        default,
        alias = "signo",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sign: Option<String>,

    /// Service tag such as `tarot` or `mesa-radionica`
    #[serde(
        default,
        alias = "tipoServico",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_type: Option<String>,

    #[serde(
        default,
        alias = "dataAtendimento",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_date: Option<String>,

    /// Monetary value kept as text; parsed leniently when aggregated
    #[serde(
        default,
        alias = "valor",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<String>,

    #[serde(
        default,
        alias = "statusPagamento",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_status: Option<String>,

    #[serde(
        default,
        alias = "destino",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub destination: Option<String>,

    #[serde(
        default,
        alias = "ano",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,

    #[serde(default, alias = "atencaoFlag", deserialize_with = "lenient_flag")]
    pub attention: bool,

    #[serde(
        default,
        alias = "atencaoNota",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub attention_note: Option<String>,

    #[serde(
        default,
        alias = "detalhes",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub details: Option<String>,

    #[serde(
        default,
        alias = "tratamento",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub treatment: Option<String>,

    #[serde(
        default,
        alias = "indicacao",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub referral: Option<String>,

    /// When the record was captured (RFC 3339)
    #[serde(
        default,
        alias = "data",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl SessionRecord {
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.client_name)
    }

    pub fn service(&self) -> Option<&str> {
        non_empty(&self.service_type)
    }

    pub fn amount_text(&self) -> Option<&str> {
        non_empty(&self.amount)
    }

    pub fn status_text(&self) -> Option<&str> {
        non_empty(&self.payment_status)
    }

    pub fn status(&self) -> PaymentStatus {
        self.status_text()
            .map(PaymentStatus::from_tag)
            .unwrap_or(PaymentStatus::Other)
    }

    /// Session date, or `None` when absent or unparseable
    pub fn session_day(&self) -> Option<NaiveDate> {
        non_empty(&self.session_date).and_then(parse_date)
    }

    pub fn birth_day(&self) -> Option<NaiveDate> {
        non_empty(&self.birth_date).and_then(parse_date)
    }
}

/// Payment state of a session, classified from its raw tag.
///
/// Only the exact English tags are recognised; anything else is `Other`
/// and is still listed in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Installment,
    #[value(skip)]
    Other,
}

impl PaymentStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paid" => PaymentStatus::Paid,
            "pending" => PaymentStatus::Pending,
            "installment" => PaymentStatus::Installment,
            _ => PaymentStatus::Other,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Installment => "installment",
            PaymentStatus::Other => "other",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Services offered by the practice. Stored records may carry other tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceType {
    Tarot,
    Terapia,
    MesaRadionica,
}

impl ServiceType {
    pub fn as_tag(&self) -> &'static str {
        match self {
            ServiceType::Tarot => "tarot",
            ServiceType::Terapia => "terapia",
            ServiceType::MesaRadionica => "mesa-radionica",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Parse a calendar date, accepting `YYYY-MM-DD` and full timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Accept strings, numbers and booleans for free-text fields.
///
/// Snapshots exported by the web app occasionally store amounts or years as
/// JSON numbers.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

/// Accept booleans, `"true"`/`"false"`, numbers or null for flags.
fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Int(n)) => n != 0,
        Some(Scalar::Float(n)) => n != 0.0,
        Some(Scalar::Text(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1"),
        None => false,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}
