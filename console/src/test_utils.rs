//! Shared fixtures for unit tests

use chrono::NaiveDate;
use shared::{
    Animal, AnimalSnapshot, Booking, BookingStatus, Branch, Customer, CustomerSummary,
    LocalizedName, PaymentMethod, Species, TimeSlot, Vaccination, VaccinationSnapshot,
};

use crate::store::InMemoryBookingStore;

/// Customer without registered animals
pub fn asma() -> Customer {
    Customer {
        id: "cust-asma".to_string(),
        name: "Asma Al-Harbi".to_string(),
        phone: "+33757005467".to_string(),
        email: None,
        address: None,
        animals: vec![],
    }
}

/// Customer with a camel and a sheep on file
pub fn khalid() -> Customer {
    Customer {
        id: "cust-khalid".to_string(),
        name: "Khalid Saeed".to_string(),
        phone: "+966500000001".to_string(),
        email: Some("khalid@example.com".to_string()),
        address: Some("Al Qassim".to_string()),
        animals: vec![
            Animal {
                id: "animal-shaheen".to_string(),
                name: "Shaheen".to_string(),
                species: Species::Camel,
            },
            Animal {
                id: "animal-dhabi".to_string(),
                name: "Dhabi".to_string(),
                species: Species::Sheep,
            },
        ],
    }
}

pub fn customers() -> Vec<Customer> {
    vec![asma(), khalid()]
}

pub fn vaccination(id: &str, price: f64, eligible: &[Species]) -> Vaccination {
    Vaccination {
        id: id.to_string(),
        name: LocalizedName {
            en: id.replace('-', " "),
            ar: String::new(),
        },
        price,
        duration: 20,
        eligible_species: eligible.iter().copied().collect(),
        dosage: Some("2ml".to_string()),
        manufacturer: Some("GulfVet".to_string()),
        batch_number: Some(format!("{}-batch", id)),
        expiry_date: Some("2027-01-31".to_string()),
    }
}

pub fn catalog() -> Vec<Vaccination> {
    vec![
        vaccination("camel-pox", 150.0, &[Species::Camel]),
        vaccination("ppr", 40.0, &[Species::Sheep, Species::Goat]),
        vaccination(
            "fmd",
            60.0,
            &[Species::Camel, Species::Sheep, Species::Goat, Species::Cow],
        ),
        vaccination("tetanus", 90.0, &[Species::Horse]),
    ]
}

pub fn branches() -> Vec<Branch> {
    vec![
        Branch {
            id: "br-riyadh".to_string(),
            name: "Riyadh Central".to_string(),
            location: "Riyadh".to_string(),
        },
        Branch {
            id: "br-jeddah".to_string(),
            name: "Jeddah North".to_string(),
            location: "Jeddah".to_string(),
        },
    ]
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn booking(
    id: &str,
    customer: &Customer,
    animal_name: &str,
    species: Species,
    appointment_date: NaiveDate,
    status: BookingStatus,
) -> Booking {
    let vaccination = catalog()
        .into_iter()
        .find(|v| v.is_eligible_for(species))
        .unwrap();
    Booking {
        id: id.to_string(),
        booking_number: format!("BK-{}", id.to_uppercase()),
        customer: CustomerSummary::from(customer),
        animal: AnimalSnapshot {
            name: animal_name.to_string(),
            species,
        },
        vaccination: VaccinationSnapshot::from(&vaccination),
        branch: "br-riyadh".to_string(),
        appointment_date,
        appointment_time: TimeSlot::from_hour(10).unwrap(),
        price: vaccination.price,
        payment_method: PaymentMethod::Cash,
        notes: String::new(),
        status,
    }
}

/// October and November 2025 bookings for both customers
pub fn seeded_bookings() -> Vec<Booking> {
    vec![
        booking("b1", &asma(), "Badr", Species::Camel, date(2025, 10, 3), BookingStatus::Pending),
        booking("b2", &khalid(), "Shaheen", Species::Camel, date(2025, 10, 14), BookingStatus::Confirmed),
        booking("b3", &khalid(), "Dhabi", Species::Sheep, date(2025, 10, 30), BookingStatus::Cancelled),
        booking("b4", &asma(), "Badr", Species::Camel, date(2025, 11, 2), BookingStatus::Completed),
    ]
}

pub fn store() -> InMemoryBookingStore {
    InMemoryBookingStore::new(customers(), catalog(), branches())
}

pub fn seeded_store() -> InMemoryBookingStore {
    store().with_bookings(seeded_bookings())
}
