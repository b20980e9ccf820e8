//! # Domain Model
//!
//! This module defines the record type kept by the remote store, [`Doctor`], and
//! the value types around it.
//!
//! ## Identity
//!
//! A [`Doctor`] pairs a server-assigned [`DoctorId`] with a [`DoctorFields`]
//! payload. The client never mints identifiers: a new record is sent as bare
//! `DoctorFields` and the store answers with the id. Outgoing bodies are always
//! `DoctorFields`, so an id can't leak into a payload by construction.
//!
//! ## Wire Format
//!
//! Records travel as flat JSON objects using the store's camelCase keys:
//!
//! ```text
//! { "_id": "66f1…", "drName": "Asha Rao", "drCode": "D-104",
//!   "mobile": 9876543210, "ffrmslno": 17, "callDay": "Monday,Friday", … }
//! ```
//!
//! The store is loose about types. Ids arrive as strings or numbers, `mobile`
//! and `ffrmslno` sometimes as numbers, absent keys and `null` happen. Every
//! field is read back as text ([`lenient_string`]); nothing else is coerced.
//!
//! ## Call Days
//!
//! `callDay` is a comma-joined list of canonical weekday names. [`WeekdaySet`]
//! keeps insertion order (that is how the user picked them) but compares as a
//! set, and cannot hold a day twice.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Server-assigned record identifier, opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DoctorId(String);

impl DoctorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DoctorId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => DoctorId(s),
            RawId::Number(n) => DoctorId(n.to_string()),
        })
    }
}

/// Reads any JSON scalar as text. Missing and `null` become `""`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown weekday: {}", trimmed))
    }
}

/// Ordered set of call days.
#[derive(Debug, Clone, Default, Eq)]
pub struct WeekdaySet {
    days: Vec<Weekday>,
}

impl WeekdaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Adds `day` at the end if absent, removes it otherwise.
    pub fn toggle(&mut self, day: Weekday) {
        if let Some(pos) = self.days.iter().position(|d| *d == day) {
            self.days.remove(pos);
        } else {
            self.days.push(day);
        }
    }

    pub fn insert(&mut self, day: Weekday) {
        if !self.contains(day) {
            self.days.push(day);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Parses a comma-joined list, skipping tokens that aren't weekday names.
    pub fn parse_lenient(s: &str) -> Self {
        let mut set = WeekdaySet::new();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse::<Weekday>() {
                Ok(day) => set.insert(day),
                Err(_) => tracing::warn!(token, "dropping unknown call day"),
            }
        }
        set
    }

    fn mask(&self) -> u8 {
        self.days.iter().fold(0, |acc, d| acc | d.bit())
    }
}

impl PartialEq for WeekdaySet {
    fn eq(&self, other: &Self) -> bool {
        self.mask() == other.mask()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .days
            .iter()
            .map(|d| d.name())
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}

impl FromStr for WeekdaySet {
    type Err = String;

    /// Strict parse: any token that isn't a weekday is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = WeekdaySet::new();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            set.insert(token.parse()?);
        }
        Ok(set)
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older records hold a single day, some backends send an array.
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => WeekdaySet::parse_lenient(&s),
            Some(Value::Array(items)) => {
                let joined = items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                WeekdaySet::parse_lenient(&joined)
            }
            _ => WeekdaySet::new(),
        })
    }
}

/// Every editable attribute of a record. This is also the body of create and
/// update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorFields {
    #[serde(rename = "drName", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "drCode", default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile: String,
    #[serde(rename = "ffrmslno", default, deserialize_with = "lenient_string")]
    pub registration_no: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(rename = "pan", default, deserialize_with = "lenient_string")]
    pub tax_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(rename = "dob", default, deserialize_with = "lenient_string")]
    pub date_of_birth: String,
    #[serde(rename = "callDay", default)]
    pub call_days: WeekdaySet,
    #[serde(rename = "callTime", default, deserialize_with = "lenient_string")]
    pub call_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub notes: String,
    #[serde(
        rename = "chemistDetails",
        default,
        deserialize_with = "lenient_string"
    )]
    pub chemist_details: String,
    #[serde(rename = "medReg", default, deserialize_with = "lenient_string")]
    pub medical_registration: String,
    #[serde(rename = "visitingRx", default, deserialize_with = "lenient_string")]
    pub visiting_rx: String,
    #[serde(
        rename = "activeInactive",
        default,
        deserialize_with = "lenient_string"
    )]
    pub status: String,
}

impl DoctorFields {
    /// The text form of one field, as shown in tables and edit buffers.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Name => self.name.clone(),
            Field::Code => self.code.clone(),
            Field::Mobile => self.mobile.clone(),
            Field::RegistrationNo => self.registration_no.clone(),
            Field::Email => self.email.clone(),
            Field::TaxId => self.tax_id.clone(),
            Field::Address => self.address.clone(),
            Field::DateOfBirth => self.date_of_birth.clone(),
            Field::CallDay => self.call_days.to_string(),
            Field::CallTime => self.call_time.clone(),
            Field::Notes => self.notes.clone(),
            Field::ChemistDetails => self.chemist_details.clone(),
            Field::MedicalRegistration => self.medical_registration.clone(),
            Field::VisitingRx => self.visiting_rx.clone(),
            Field::Status => self.status.clone(),
        }
    }
}

/// A record as held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: DoctorId,
    #[serde(flatten)]
    pub fields: DoctorFields,
}

impl Doctor {
    pub fn new(id: DoctorId, fields: DoctorFields) -> Self {
        Self { id, fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Code,
    Mobile,
    RegistrationNo,
    Email,
    TaxId,
    Address,
    DateOfBirth,
    CallDay,
    CallTime,
    Notes,
    ChemistDetails,
    MedicalRegistration,
    VisitingRx,
    Status,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::Name,
        Field::Code,
        Field::Mobile,
        Field::RegistrationNo,
        Field::Email,
        Field::TaxId,
        Field::Address,
        Field::DateOfBirth,
        Field::CallDay,
        Field::CallTime,
        Field::Notes,
        Field::ChemistDetails,
        Field::MedicalRegistration,
        Field::VisitingRx,
        Field::Status,
    ];

    /// JSON key used by the store.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "drName",
            Field::Code => "drCode",
            Field::Mobile => "mobile",
            Field::RegistrationNo => "ffrmslno",
            Field::Email => "email",
            Field::TaxId => "pan",
            Field::Address => "address",
            Field::DateOfBirth => "dob",
            Field::CallDay => "callDay",
            Field::CallTime => "callTime",
            Field::Notes => "notes",
            Field::ChemistDetails => "chemistDetails",
            Field::MedicalRegistration => "medReg",
            Field::VisitingRx => "visitingRx",
            Field::Status => "activeInactive",
        }
    }

    /// Column heading.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Doctor Name",
            Field::Code => "Doctor Code",
            Field::Mobile => "Mobile",
            Field::RegistrationNo => "FFR MSL No.",
            Field::Email => "Email",
            Field::TaxId => "PAN",
            Field::Address => "Address",
            Field::DateOfBirth => "DOB",
            Field::CallDay => "Call Day",
            Field::CallTime => "Call Time",
            Field::Notes => "Notes",
            Field::ChemistDetails => "Chemist Details",
            Field::MedicalRegistration => "Medical Registration",
            Field::VisitingRx => "VisitingRX",
            Field::Status => "Active/Inactive",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Columns the list view can search on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchColumn {
    #[default]
    Name,
    Code,
    #[serde(rename = "registration")]
    RegistrationNo,
    TaxId,
}

impl SearchColumn {
    pub const ALL: [SearchColumn; 4] = [
        SearchColumn::Name,
        SearchColumn::Code,
        SearchColumn::RegistrationNo,
        SearchColumn::TaxId,
    ];

    pub fn field(self) -> Field {
        match self {
            SearchColumn::Name => Field::Name,
            SearchColumn::Code => Field::Code,
            SearchColumn::RegistrationNo => Field::RegistrationNo,
            SearchColumn::TaxId => Field::TaxId,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            SearchColumn::Name => "name",
            SearchColumn::Code => "code",
            SearchColumn::RegistrationNo => "registration",
            SearchColumn::TaxId => "tax-id",
        }
    }

    pub fn label(self) -> &'static str {
        self.field().label()
    }
}

impl FromStr for SearchColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchColumn::ALL
            .into_iter()
            .find(|col| col.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown search column: {}", s))
    }
}
