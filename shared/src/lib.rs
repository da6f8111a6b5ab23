use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Animal species the clinic treats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Camel,
    Sheep,
    Goat,
    Cow,
    Horse,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Camel,
        Species::Sheep,
        Species::Goat,
        Species::Cow,
        Species::Horse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Camel => "camel",
            Species::Sheep => "sheep",
            Species::Goat => "goat",
            Species::Cow => "cow",
            Species::Horse => "horse",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = SpeciesParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.as_str() == wanted)
            .ok_or_else(|| SpeciesParseError(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesParseError(pub String);

impl fmt::Display for SpeciesParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown species: {}", self.0)
    }
}

impl std::error::Error for SpeciesParseError {}

/// An animal registered to a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub species: Species,
}

/// A clinic customer. Phone is the unique contact key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Registered animals in the order the customer record lists them
    #[serde(default)]
    pub animals: Vec<Animal>,
}

impl Customer {
    pub fn has_animals(&self) -> bool {
        !self.animals.is_empty()
    }

    pub fn find_animal(&self, animal_id: &str) -> Option<&Animal> {
        self.animals.iter().find(|animal| animal.id == animal_id)
    }
}

/// Display name in both console languages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalizedName {
    pub en: String,
    pub ar: String,
}

/// A vaccination catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: LocalizedName,
    pub price: f64,
    /// Expected appointment length in minutes
    pub duration: u32,
    /// Species this vaccination may be given to. Empty matches nothing.
    #[serde(default)]
    pub eligible_species: BTreeSet<Species>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl Vaccination {
    pub fn is_eligible_for(&self, species: Species) -> bool {
        is_eligible(self, species)
    }
}

/// A vaccination is offerable for an animal only if its species is in the eligible set
pub fn is_eligible(vaccination: &Vaccination, species: Species) -> bool {
    vaccination.eligible_species.contains(&species)
}

/// A clinic branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub location: String,
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the customer pays for the appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    BankTransfer,
}

/// One of the fixed hourly appointment slots, "08:00" through "17:00"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    pub const FIRST_HOUR: u8 = 8;
    pub const LAST_HOUR: u8 = 17;

    pub fn from_hour(hour: u8) -> Result<Self, TimeSlotError> {
        if (Self::FIRST_HOUR..=Self::LAST_HOUR).contains(&hour) {
            Ok(Self { hour })
        } else {
            Err(TimeSlotError::OutsideClinicHours(hour))
        }
    }

    /// Every bookable slot in chronological order
    pub fn all() -> Vec<TimeSlot> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR)
            .map(|hour| TimeSlot { hour })
            .collect()
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (hour, minutes) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeSlotError::InvalidFormat(trimmed.to_string()))?;
        if minutes != "00" {
            return Err(TimeSlotError::NotOnTheHour(trimmed.to_string()));
        }
        let hour = hour
            .parse::<u8>()
            .map_err(|_| TimeSlotError::InvalidFormat(trimmed.to_string()))?;
        Self::from_hour(hour)
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeSlotError {
    InvalidFormat(String),
    NotOnTheHour(String),
    OutsideClinicHours(u8),
}

impl fmt::Display for TimeSlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSlotError::InvalidFormat(raw) => write!(f, "Invalid time slot format: {}", raw),
            TimeSlotError::NotOnTheHour(raw) => write!(f, "Time slot must start on the hour: {}", raw),
            TimeSlotError::OutsideClinicHours(hour) => write!(
                f,
                "Hour {} is outside clinic hours ({:02}:00-{:02}:00)",
                hour,
                TimeSlot::FIRST_HOUR,
                TimeSlot::LAST_HOUR
            ),
        }
    }
}

impl std::error::Error for TimeSlotError {}

/// Animal data copied into a booking when it is composed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalSnapshot {
    pub name: String,
    pub species: Species,
}

impl From<&Animal> for AnimalSnapshot {
    fn from(animal: &Animal) -> Self {
        Self {
            name: animal.name.clone(),
            species: animal.species,
        }
    }
}

/// Vaccination data copied into a booking when it is composed.
/// Later catalog edits never reach bookings that already carry a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationSnapshot {
    pub id: String,
    pub name: LocalizedName,
    pub price: f64,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub batch_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl From<&Vaccination> for VaccinationSnapshot {
    fn from(vaccination: &Vaccination) -> Self {
        Self {
            id: vaccination.id.clone(),
            name: vaccination.name.clone(),
            price: vaccination.price,
            dosage: vaccination.dosage.clone(),
            manufacturer: vaccination.manufacturer.clone(),
            batch_number: vaccination.batch_number.clone(),
            expiry_date: vaccination.expiry_date.clone(),
        }
    }
}

/// Customer fields the booking store populates on each booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
        }
    }
}

/// A vaccination appointment as stored by the booking store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: String,
    /// Human-readable number generated by the store, e.g. "BK-2025-0042"
    pub booking_number: String,
    pub customer: CustomerSummary,
    pub animal: AnimalSnapshot,
    pub vaccination: VaccinationSnapshot,
    pub branch: String,
    #[serde(with = "appointment_date")]
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeSlot,
    pub price: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: BookingStatus,
}

/// Body of `POST /api/bookings` and `PUT /api/bookings/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Customer id
    pub customer: String,
    pub animal: AnimalSnapshot,
    pub vaccination: VaccinationSnapshot,
    /// Branch id
    pub branch: String,
    #[serde(with = "appointment_date")]
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeSlot,
    pub price: f64,
    pub payment_method: PaymentMethod,
    pub notes: String,
    pub status: BookingStatus,
}

/// Body of `PATCH /api/bookings/:id/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// Every successful response wraps its payload in `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingListData {
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingData {
    pub booking: Booking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerListData {
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaccinationListData {
    pub vaccinations: Vec<Vaccination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchListData {
    pub branches: Vec<Branch>,
}

/// Structured error body returned with non-2xx responses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parse an appointment date sent either as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub fn parse_appointment_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Serde adapter writing `YYYY-MM-DD` and reading either date form
pub mod appointment_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_appointment_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid appointment date: {}", raw)))
    }
}
