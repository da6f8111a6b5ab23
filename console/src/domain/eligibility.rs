//! Which catalog vaccinations may be offered for an animal.

use shared::{is_eligible, Species, Vaccination};

/// Vaccinations offerable for `species`, in catalog order.
///
/// With no species yet (a booking started before the animal is known) the
/// whole catalog is returned. Entries with an empty eligible-species set
/// never match a species.
pub fn eligible_vaccinations(catalog: &[Vaccination], species: Option<Species>) -> Vec<Vaccination> {
    eligible_refs(catalog, species).into_iter().cloned().collect()
}

/// Borrowing form of [`eligible_vaccinations`]
pub fn eligible_refs(catalog: &[Vaccination], species: Option<Species>) -> Vec<&Vaccination> {
    match species {
        None => catalog.iter().collect(),
        Some(species) => catalog.iter().filter(|v| is_eligible(v, species)).collect(),
    }
}

/// Look up `vaccination_id` and report whether it covers `species`.
/// `None` means the id is not in the catalog at all.
pub fn find_with_eligibility<'a>(
    catalog: &'a [Vaccination],
    vaccination_id: &str,
    species: Species,
) -> Option<(&'a Vaccination, bool)> {
    catalog
        .iter()
        .find(|v| v.id == vaccination_id)
        .map(|v| (v, is_eligible(v, species)))
}
