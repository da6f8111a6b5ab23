//! Selection cascade for composing and editing a booking.
//!
//! The booking form is a chain of dependent fields:
//!
//! ```text
//! customer ─┬─ has animals ──> pick one of them (name/species read-only)
//!           └─ no animals  ──> type name + species by hand
//!                    │
//!                 species ──> eligible vaccinations ──> vaccination
//! branch, date, time slot, notes: independent
//! ```
//!
//! `SelectionCascade` keeps the working draft consistent with those rules as
//! each field changes, and turns a complete draft into the payload the store
//! accepts. A draft that breaks a rule never produces a payload.

use chrono::NaiveDate;
use log::debug;
use shared::{
    Animal, AnimalSnapshot, Booking, BookingPayload, BookingStatus, Branch, Customer,
    PaymentMethod, Species, TimeSlot, Vaccination, VaccinationSnapshot,
};

use crate::domain::eligibility::{eligible_refs, find_with_eligibility};
use crate::error::{ConsoleError, DraftField, FieldIssue, Result};
use crate::store::CatalogSource;

/// How the draft identifies the animal being vaccinated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimalSelection {
    /// One of the customer's registered animals
    Existing(String),
    /// Typed in for a customer with no registered animals; never stored as an Animal
    AdHoc {
        name: String,
        species: Option<Species>,
    },
}

impl AnimalSelection {
    fn empty_ad_hoc() -> Self {
        AnimalSelection::AdHoc {
            name: String::new(),
            species: None,
        }
    }
}

/// The booking form's working state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingDraft {
    pub customer_id: Option<String>,
    /// `None` until a customer with registered animals has one picked
    pub animal: Option<AnimalSelection>,
    pub vaccination_id: Option<String>,
    pub branch_id: Option<String>,
    pub appointment_date: Option<NaiveDate>,
    pub time_slot: Option<TimeSlot>,
    pub notes: String,
    pub payment_method: PaymentMethod,
    pub status: BookingStatus,
}

/// What the animal part of the form shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimalInput<'a> {
    AwaitingCustomer,
    /// Dropdown of the customer's animals
    ChooseExisting(&'a [Animal]),
    /// Free-text name and species inputs
    FreeText,
}

#[derive(Debug, Clone)]
pub struct SelectionCascade {
    customers: Vec<Customer>,
    catalog: Vec<Vaccination>,
    branches: Vec<Branch>,
    draft: BookingDraft,
}

impl SelectionCascade {
    pub fn new(customers: Vec<Customer>, catalog: Vec<Vaccination>, branches: Vec<Branch>) -> Self {
        Self {
            customers,
            catalog,
            branches,
            draft: BookingDraft::default(),
        }
    }

    /// Fetch customers, vaccination catalog and branches, and start an empty draft
    pub async fn load<C: CatalogSource + ?Sized>(source: &C) -> Result<Self> {
        let customers = source.list_customers().await?;
        let catalog = source.list_vaccinations().await?;
        let branches = source.list_branches().await?;
        debug!(
            "Loaded {} customers, {} vaccinations, {} branches for the booking form",
            customers.len(),
            catalog.len(),
            branches.len()
        );
        Ok(Self::new(customers, catalog, branches))
    }

    /// A cascade whose draft is the stored `booking`, ready to edit
    pub fn for_booking(
        booking: &Booking,
        customers: Vec<Customer>,
        catalog: Vec<Vaccination>,
        branches: Vec<Branch>,
    ) -> Result<Self> {
        let mut cascade = Self::new(customers, catalog, branches);
        cascade.edit(booking)?;
        Ok(cascade)
    }

    /// Rebuild the draft of a stored booking for editing.
    ///
    /// The animal comes back as `Existing` when the customer owns an animal
    /// with the snapshot's name and species. A customer without registered
    /// animals gets the snapshot back as `AdHoc`. A customer whose animals
    /// no longer match the snapshot gets no animal, and one has to be picked.
    pub fn edit(&mut self, booking: &Booking) -> Result<()> {
        let customer = self
            .find_customer(&booking.customer.id)
            .ok_or_else(|| ConsoleError::NotFound {
                kind: "customer",
                id: booking.customer.id.clone(),
            })?;

        let animal = if customer.has_animals() {
            customer
                .animals
                .iter()
                .find(|a| a.name == booking.animal.name && a.species == booking.animal.species)
                .map(|a| AnimalSelection::Existing(a.id.clone()))
        } else {
            Some(AnimalSelection::AdHoc {
                name: booking.animal.name.clone(),
                species: Some(booking.animal.species),
            })
        };
        if animal.is_none() {
            debug!(
                "Booking {} animal {} is not registered to {}, asking for a pick",
                booking.booking_number, booking.animal.name, customer.name
            );
        }

        self.draft = BookingDraft {
            customer_id: Some(customer.id.clone()),
            animal,
            vaccination_id: Some(booking.vaccination.id.clone()),
            branch_id: Some(booking.branch.clone()),
            appointment_date: Some(booking.appointment_date),
            time_slot: Some(booking.appointment_time),
            notes: booking.notes.clone(),
            payment_method: booking.payment_method,
            status: booking.status,
        };
        Ok(())
    }

    /// Start over with an empty draft
    pub fn reset(&mut self) {
        self.draft = BookingDraft::default();
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn catalog(&self) -> &[Vaccination] {
        &self.catalog
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    fn find_customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        self.draft
            .customer_id
            .as_deref()
            .and_then(|id| self.find_customer(id))
    }

    pub fn animal_input(&self) -> AnimalInput<'_> {
        match (self.selected_customer(), &self.draft.animal) {
            (None, _) => AnimalInput::AwaitingCustomer,
            (Some(_), Some(AnimalSelection::AdHoc { .. })) => AnimalInput::FreeText,
            (Some(customer), _) => AnimalInput::ChooseExisting(&customer.animals),
        }
    }

    /// Name and species of the chosen animal, whichever way it was chosen
    fn resolved_animal_parts(&self) -> (Option<&str>, Option<Species>) {
        match &self.draft.animal {
            None => (None, None),
            Some(AnimalSelection::Existing(animal_id)) => match self
                .selected_customer()
                .and_then(|c| c.find_animal(animal_id))
            {
                Some(animal) => (Some(animal.name.as_str()), Some(animal.species)),
                None => (None, None),
            },
            Some(AnimalSelection::AdHoc { name, species }) => {
                let name = Some(name.trim()).filter(|n| !n.is_empty());
                (name, *species)
            }
        }
    }

    pub fn resolved_species(&self) -> Option<Species> {
        self.resolved_animal_parts().1
    }

    /// The animal snapshot the booking would carry, once name and species are both known
    pub fn resolved_animal(&self) -> Option<AnimalSnapshot> {
        match self.resolved_animal_parts() {
            (Some(name), Some(species)) => Some(AnimalSnapshot {
                name: name.to_string(),
                species,
            }),
            _ => None,
        }
    }

    /// Vaccinations the form offers for the current species
    pub fn eligible_vaccinations(&self) -> Vec<&Vaccination> {
        eligible_refs(&self.catalog, self.resolved_species())
    }

    pub fn select_customer(&mut self, customer_id: &str) -> Result<()> {
        let customer = self
            .find_customer(customer_id)
            .ok_or_else(|| ConsoleError::NotFound {
                kind: "customer",
                id: customer_id.to_string(),
            })?;

        let animal = if customer.has_animals() {
            None
        } else {
            Some(AnimalSelection::empty_ad_hoc())
        };
        debug!(
            "Customer {} selected with {} registered animals",
            customer.name,
            customer.animals.len()
        );

        self.draft.customer_id = Some(customer_id.to_string());
        self.draft.animal = animal;
        Ok(())
    }

    /// Pick one of the selected customer's registered animals
    pub fn select_animal(&mut self, animal_id: &str) -> Result<()> {
        let customer = self.selected_customer().ok_or(ConsoleError::NotFound {
            kind: "customer",
            id: String::new(),
        })?;
        if !customer.has_animals() {
            return Err(ConsoleError::ReadOnlyField(DraftField::Animal));
        }
        if customer.find_animal(animal_id).is_none() {
            return Err(ConsoleError::NotFound {
                kind: "animal",
                id: animal_id.to_string(),
            });
        }

        let previous = self.resolved_species();
        self.draft.animal = Some(AnimalSelection::Existing(animal_id.to_string()));
        self.species_changed(previous);
        Ok(())
    }

    /// Free-text animal fields are open only for a selected customer with no registered animals
    fn accepts_free_text_animal(&self) -> bool {
        self.selected_customer().is_some_and(|c| !c.has_animals())
    }

    /// Free-text animal name, only for customers without registered animals
    pub fn set_animal_name(&mut self, name: &str) -> Result<()> {
        if !self.accepts_free_text_animal() {
            return Err(ConsoleError::ReadOnlyField(DraftField::AnimalName));
        }
        match &mut self.draft.animal {
            Some(AnimalSelection::AdHoc { name: current, .. }) => {
                *current = name.to_string();
                Ok(())
            }
            _ => Err(ConsoleError::ReadOnlyField(DraftField::AnimalName)),
        }
    }

    /// Free-text animal species, only for customers without registered animals
    pub fn set_animal_species(&mut self, species: Option<Species>) -> Result<()> {
        if !self.accepts_free_text_animal() {
            return Err(ConsoleError::ReadOnlyField(DraftField::AnimalSpecies));
        }
        let previous = self.resolved_species();
        match &mut self.draft.animal {
            Some(AnimalSelection::AdHoc {
                species: current, ..
            }) => {
                *current = species;
            }
            _ => return Err(ConsoleError::ReadOnlyField(DraftField::AnimalSpecies)),
        }
        self.species_changed(previous);
        Ok(())
    }

    /// Drop the selected vaccination if it no longer covers the resolved species
    fn species_changed(&mut self, previous: Option<Species>) {
        let Some(species) = self.resolved_species() else {
            return;
        };
        if previous == Some(species) {
            return;
        }
        let Some(vaccination_id) = self.draft.vaccination_id.as_deref() else {
            return;
        };
        if let Some((_, false)) = find_with_eligibility(&self.catalog, vaccination_id, species) {
            debug!(
                "Clearing vaccination {} that does not cover {}",
                vaccination_id, species
            );
            self.draft.vaccination_id = None;
        }
    }

    pub fn select_vaccination(&mut self, vaccination_id: Option<&str>) {
        self.draft.vaccination_id = vaccination_id.map(str::to_string);
    }

    pub fn select_branch(&mut self, branch_id: Option<&str>) {
        self.draft.branch_id = branch_id.map(str::to_string);
    }

    pub fn set_appointment_date(&mut self, date: Option<NaiveDate>) {
        self.draft.appointment_date = date;
    }

    pub fn set_time_slot(&mut self, slot: Option<TimeSlot>) {
        self.draft.time_slot = slot;
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.draft.notes = notes.to_string();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.draft.payment_method = method;
    }

    /// Status the booking is created with; `pending` unless changed
    pub fn set_initial_status(&mut self, status: BookingStatus) {
        self.draft.status = status;
    }

    /// Check every composition rule and list all violations at once
    pub fn validate(&self) -> std::result::Result<BookingPayload, Vec<FieldIssue>> {
        let mut issues = Vec::new();
        let draft = &self.draft;

        let customer = match draft.customer_id.as_deref() {
            None => {
                issues.push(FieldIssue::Required(DraftField::Customer));
                None
            }
            Some(id) => {
                let found = self.find_customer(id);
                if found.is_none() {
                    issues.push(FieldIssue::UnknownReference {
                        field: DraftField::Customer,
                        id: id.to_string(),
                    });
                }
                found
            }
        };

        match &draft.animal {
            None => issues.push(FieldIssue::Required(DraftField::Animal)),
            Some(AnimalSelection::Existing(animal_id)) => {
                if customer.and_then(|c| c.find_animal(animal_id)).is_none() {
                    issues.push(FieldIssue::UnknownReference {
                        field: DraftField::Animal,
                        id: animal_id.clone(),
                    });
                }
            }
            Some(AnimalSelection::AdHoc { name, species }) => {
                if name.trim().is_empty() {
                    issues.push(FieldIssue::Required(DraftField::AnimalName));
                }
                if species.is_none() {
                    issues.push(FieldIssue::Required(DraftField::AnimalSpecies));
                }
            }
        }
        let animal = self.resolved_animal();

        let vaccination = match draft.vaccination_id.as_deref() {
            None => {
                issues.push(FieldIssue::Required(DraftField::Vaccination));
                None
            }
            Some(id) => match self.catalog.iter().find(|v| v.id == id) {
                None => {
                    issues.push(FieldIssue::UnknownReference {
                        field: DraftField::Vaccination,
                        id: id.to_string(),
                    });
                    None
                }
                Some(vaccination) => {
                    if let Some(species) = animal.as_ref().map(|a| a.species) {
                        if !vaccination.is_eligible_for(species) {
                            issues.push(FieldIssue::NotEligible {
                                vaccination_id: id.to_string(),
                                species,
                            });
                        }
                    }
                    Some(vaccination)
                }
            },
        };

        match draft.branch_id.as_deref() {
            None => issues.push(FieldIssue::Required(DraftField::Branch)),
            Some(id) if !self.branches.iter().any(|b| b.id == id) => {
                issues.push(FieldIssue::UnknownReference {
                    field: DraftField::Branch,
                    id: id.to_string(),
                });
            }
            Some(_) => {}
        }
        if draft.appointment_date.is_none() {
            issues.push(FieldIssue::Required(DraftField::AppointmentDate));
        }
        if draft.time_slot.is_none() {
            issues.push(FieldIssue::Required(DraftField::TimeSlot));
        }

        match (customer, animal, vaccination, &draft.branch_id, draft.appointment_date, draft.time_slot) {
            (Some(customer), Some(animal), Some(vaccination), Some(branch), Some(date), Some(slot))
                if issues.is_empty() =>
            {
                Ok(BookingPayload {
                    customer: customer.id.clone(),
                    animal,
                    vaccination: VaccinationSnapshot::from(vaccination),
                    branch: branch.clone(),
                    appointment_date: date,
                    appointment_time: slot,
                    price: vaccination.price,
                    payment_method: draft.payment_method,
                    notes: draft.notes.trim().to_string(),
                    status: draft.status,
                })
            }
            _ => Err(issues),
        }
    }

    /// Payload for the store, or the error the form should show
    pub fn build_payload(&self) -> Result<BookingPayload> {
        self.validate().map_err(ConsoleError::from_issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn cascade() -> SelectionCascade {
        SelectionCascade::new(customers(), catalog(), branches())
    }

    fn eligible_ids(cascade: &SelectionCascade) -> Vec<&str> {
        cascade
            .eligible_vaccinations()
            .iter()
            .map(|v| v.id.as_str())
            .collect()
    }

    fn complete(cascade: &mut SelectionCascade) {
        cascade.select_branch(Some("br-riyadh"));
        cascade.set_appointment_date(Some(date(2025, 10, 14)));
        cascade.set_time_slot(Some(TimeSlot::from_hour(9).unwrap()));
    }

    #[test]
    fn test_customer_without_animals_gets_free_text() {
        let mut cascade = cascade();
        assert_eq!(cascade.animal_input(), AnimalInput::AwaitingCustomer);

        cascade.select_customer("cust-asma").unwrap();
        assert_eq!(cascade.animal_input(), AnimalInput::FreeText);
        assert!(matches!(
            cascade.select_animal("animal-shaheen"),
            Err(ConsoleError::ReadOnlyField(DraftField::Animal))
        ));
    }

    #[test]
    fn test_customer_with_animals_gets_dropdown() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();

        match cascade.animal_input() {
            AnimalInput::ChooseExisting(animals) => assert_eq!(animals.len(), 2),
            other => panic!("expected dropdown, got {:?}", other),
        }
        assert!(matches!(
            cascade.set_animal_name("Typed"),
            Err(ConsoleError::ReadOnlyField(DraftField::AnimalName))
        ));

        cascade.select_animal("animal-dhabi").unwrap();
        assert_eq!(
            cascade.resolved_animal(),
            Some(AnimalSnapshot {
                name: "Dhabi".to_string(),
                species: Species::Sheep,
            })
        );
        assert_eq!(eligible_ids(&cascade), vec!["ppr", "fmd"]);
    }

    #[test]
    fn test_unknown_ids_leave_draft_untouched() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();
        let before = cascade.draft().clone();

        assert!(matches!(
            cascade.select_customer("cust-nobody"),
            Err(ConsoleError::NotFound { kind: "customer", .. })
        ));
        assert!(matches!(
            cascade.select_animal("animal-nobody"),
            Err(ConsoleError::NotFound { kind: "animal", .. })
        ));
        assert_eq!(cascade.draft(), &before);
    }

    #[test]
    fn test_changing_customer_resets_animal() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();
        cascade.select_animal("animal-shaheen").unwrap();

        cascade.select_customer("cust-asma").unwrap();
        assert_eq!(
            cascade.draft().animal,
            Some(AnimalSelection::AdHoc {
                name: String::new(),
                species: None,
            })
        );

        cascade.select_customer("cust-khalid").unwrap();
        assert_eq!(cascade.draft().animal, None);
        assert_eq!(cascade.resolved_species(), None);
    }

    #[test]
    fn test_ad_hoc_camel_then_sheep_clears_camel_only_vaccination() {
        let mut cascade = cascade();
        cascade.select_customer("cust-asma").unwrap();
        assert_eq!(eligible_ids(&cascade).len(), 4);

        cascade.set_animal_name("Badr").unwrap();
        cascade.set_animal_species(Some(Species::Camel)).unwrap();
        assert!(eligible_ids(&cascade).contains(&"camel-pox"));

        cascade.select_vaccination(Some("camel-pox"));
        cascade.set_animal_species(Some(Species::Sheep)).unwrap();

        assert!(!eligible_ids(&cascade).contains(&"camel-pox"));
        assert_eq!(cascade.draft().vaccination_id, None);
    }

    #[test]
    fn test_species_change_keeps_still_eligible_vaccination() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();
        cascade.select_animal("animal-shaheen").unwrap();
        cascade.select_vaccination(Some("fmd"));

        cascade.select_animal("animal-dhabi").unwrap();
        assert_eq!(cascade.draft().vaccination_id.as_deref(), Some("fmd"));

        cascade.select_vaccination(Some("ppr"));
        cascade.select_animal("animal-shaheen").unwrap();
        assert_eq!(cascade.draft().vaccination_id, None);
    }

    #[test]
    fn test_vaccination_chosen_before_species_survives_until_species_is_known() {
        let mut cascade = cascade();
        cascade.select_customer("cust-asma").unwrap();
        cascade.select_vaccination(Some("tetanus"));
        cascade.set_animal_species(None).unwrap();
        assert_eq!(cascade.draft().vaccination_id.as_deref(), Some("tetanus"));

        cascade.set_animal_species(Some(Species::Goat)).unwrap();
        assert_eq!(cascade.draft().vaccination_id, None);
    }

    #[test]
    fn test_missing_branch_is_reported_by_name() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();
        cascade.select_animal("animal-shaheen").unwrap();
        cascade.select_vaccination(Some("camel-pox"));
        complete(&mut cascade);
        cascade.select_branch(None);

        let issues = cascade.validate().unwrap_err();
        assert_eq!(issues, vec![FieldIssue::Required(DraftField::Branch)]);
        assert_eq!(issues[0].to_string(), "branchId: required");
    }

    #[test]
    fn test_empty_draft_lists_every_required_field() {
        let issues = cascade().validate().unwrap_err();
        let fields: Vec<DraftField> = issues.iter().map(|i| i.field()).collect();
        assert_eq!(
            fields,
            vec![
                DraftField::Customer,
                DraftField::Animal,
                DraftField::Vaccination,
                DraftField::Branch,
                DraftField::AppointmentDate,
                DraftField::TimeSlot,
            ]
        );
    }

    #[test]
    fn test_ad_hoc_animal_needs_name_and_species() {
        let mut cascade = cascade();
        cascade.select_customer("cust-asma").unwrap();
        cascade.set_animal_name("   ").unwrap();
        cascade.select_vaccination(Some("fmd"));
        complete(&mut cascade);

        let issues = cascade.validate().unwrap_err();
        assert_eq!(
            issues,
            vec![
                FieldIssue::Required(DraftField::AnimalName),
                FieldIssue::Required(DraftField::AnimalSpecies),
            ]
        );
    }

    #[test]
    fn test_ineligible_vaccination_blocks_submission() {
        let mut cascade = cascade();
        cascade.select_customer("cust-khalid").unwrap();
        cascade.select_animal("animal-dhabi").unwrap();
        cascade.select_vaccination(Some("camel-pox"));
        complete(&mut cascade);

        assert!(matches!(
            cascade.build_payload(),
            Err(ConsoleError::Ineligible {
                species: Species::Sheep,
                ..
            })
        ));
    }

    #[test]
    fn test_valid_draft_builds_snapshot_payload() {
        let mut cascade = cascade();
        cascade.select_customer("cust-asma").unwrap();
        cascade.set_animal_name(" Badr ").unwrap();
        cascade.set_animal_species(Some(Species::Camel)).unwrap();
        cascade.select_vaccination(Some("camel-pox"));
        cascade.set_notes("  first visit ");
        cascade.set_payment_method(PaymentMethod::Card);
        complete(&mut cascade);

        let payload = cascade.build_payload().unwrap();
        assert_eq!(payload.customer, "cust-asma");
        assert_eq!(payload.animal.name, "Badr");
        assert_eq!(payload.animal.species, Species::Camel);
        assert_eq!(payload.vaccination.id, "camel-pox");
        assert_eq!(payload.vaccination.batch_number.as_deref(), Some("camel-pox-batch"));
        assert_eq!(payload.price, 150.0);
        assert_eq!(payload.notes, "first visit");
        assert_eq!(payload.payment_method, PaymentMethod::Card);
        assert_eq!(payload.status, BookingStatus::Pending);
        assert_eq!(payload.appointment_time.label(), "09:00");
    }

    #[test]
    fn test_edit_restores_existing_and_ad_hoc_animals() {
        let registered = booking(
            "b2",
            &khalid(),
            "Shaheen",
            Species::Camel,
            date(2025, 10, 14),
            BookingStatus::Confirmed,
        );
        let mut cascade =
            SelectionCascade::for_booking(&registered, customers(), catalog(), branches()).unwrap();
        assert_eq!(
            cascade.draft().animal,
            Some(AnimalSelection::Existing("animal-shaheen".to_string()))
        );
        assert_eq!(cascade.draft().status, BookingStatus::Confirmed);
        assert!(cascade.validate().is_ok());

        let typed = booking("b9", &asma(), "Badr", Species::Camel, date(2025, 10, 1), BookingStatus::Pending);
        cascade.edit(&typed).unwrap();
        assert_eq!(cascade.animal_input(), AnimalInput::FreeText);
        assert_eq!(cascade.resolved_species(), Some(Species::Camel));
        cascade.set_animal_name("Badr II").unwrap();
        assert!(cascade.validate().is_ok());
    }

    #[test]
    fn test_edit_with_unregistered_animal_asks_for_a_registered_one() {
        let stray = booking("b9", &khalid(), "Stray", Species::Goat, date(2025, 10, 1), BookingStatus::Pending);
        let mut cascade =
            SelectionCascade::for_booking(&stray, customers(), catalog(), branches()).unwrap();

        assert_eq!(cascade.draft().animal, None);
        assert!(matches!(cascade.animal_input(), AnimalInput::ChooseExisting(animals) if animals.len() == 2));
        assert!(matches!(
            cascade.set_animal_name("Renamed"),
            Err(ConsoleError::ReadOnlyField(DraftField::AnimalName))
        ));
        assert!(matches!(
            cascade.set_animal_species(Some(Species::Goat)),
            Err(ConsoleError::ReadOnlyField(DraftField::AnimalSpecies))
        ));
        assert_eq!(
            cascade.validate().unwrap_err(),
            vec![FieldIssue::Required(DraftField::Animal)]
        );

        // same answer after re-selecting the customer
        cascade.select_customer("cust-khalid").unwrap();
        assert!(cascade.set_animal_name("Renamed").is_err());

        cascade.select_animal("animal-shaheen").unwrap();
        assert!(cascade.validate().is_err());
    }
}
