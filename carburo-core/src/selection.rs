//! Selection state machine: province, municipality, fuel type, and the "open now" toggle.
//!
//! Every event yields exactly one [`Effect`] telling the caller what to fetch next.
//! A station query is only ever emitted when the selection is complete.

use crate::model::{FuelTypeId, MunicipalityId, ProvinceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How far the geographic selection has progressed.
pub enum SelectionState {
    /// Nothing chosen yet.
    Empty,
    /// A province is chosen, no municipality.
    ProvinceChosen,
    /// Province and municipality are chosen, no fuel type.
    MunicipalityChosen,
    /// Everything needed for a listing request is chosen.
    ReadyToQuery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully resolved listing request.
pub struct StationQuery {
    /// Municipality to list stations for.
    pub municipality: MunicipalityId,
    /// Fuel product whose price is listed.
    pub fuel_type: FuelTypeId,
    /// Only keep stations that are open right now.
    pub open_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// User input driving the selection.
pub enum SelectionEvent {
    /// A province was picked, or the choice was cleared.
    ProvinceChanged(Option<ProvinceId>),
    /// A municipality was picked, or the choice was cleared.
    MunicipalityChanged(Option<MunicipalityId>),
    /// A fuel type was picked, or the choice was cleared.
    FuelTypeChanged(Option<FuelTypeId>),
    /// The "open now" filter was switched.
    OpenOnlyToggled(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the caller has to do after an event.
pub enum Effect {
    /// The event did not change anything.
    Unchanged,
    /// The selection is incomplete; show a prompt instead of results.
    NeedMoreInput,
    /// Load the municipality list of the new province.
    LoadMunicipalities(ProvinceId),
    /// Fetch and render stations.
    QueryStations(StationQuery),
}

#[derive(Debug, Clone, Default)]
/// Current user selection.
pub struct Selection {
    province: Option<ProvinceId>,
    municipality: Option<MunicipalityId>,
    fuel_type: Option<FuelTypeId>,
    open_only: bool,
}

impl Selection {
    /// Start with nothing selected and the filter off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event and report the resulting effect.
    pub fn apply(&mut self, event: SelectionEvent) -> Effect {
        match event {
            SelectionEvent::ProvinceChanged(province) => {
                if province == self.province {
                    return Effect::Unchanged;
                }
                self.province = province.clone();
                self.municipality = None;
                province.map_or(Effect::NeedMoreInput, Effect::LoadMunicipalities)
            }
            SelectionEvent::MunicipalityChanged(municipality) => {
                if municipality == self.municipality
                    || (self.province.is_none() && municipality.is_some())
                {
                    return Effect::Unchanged;
                }
                self.municipality = municipality;
                self.next_query()
            }
            SelectionEvent::FuelTypeChanged(fuel_type) => {
                if fuel_type == self.fuel_type {
                    return Effect::Unchanged;
                }
                self.fuel_type = fuel_type;
                self.next_query()
            }
            SelectionEvent::OpenOnlyToggled(open_only) => {
                if open_only == self.open_only {
                    return Effect::Unchanged;
                }
                self.open_only = open_only;
                self.next_query()
            }
        }
    }

    /// Progress of the geographic selection.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        match (&self.province, &self.municipality, &self.fuel_type) {
            (None, _, _) => SelectionState::Empty,
            (Some(_), None, _) => SelectionState::ProvinceChosen,
            (Some(_), Some(_), None) => SelectionState::MunicipalityChosen,
            (Some(_), Some(_), Some(_)) => SelectionState::ReadyToQuery,
        }
    }

    /// The listing request for the current selection, if it is complete.
    #[must_use]
    pub fn query(&self) -> Option<StationQuery> {
        if self.province.is_none() {
            return None;
        }
        Some(StationQuery {
            municipality: self.municipality.clone()?,
            fuel_type: self.fuel_type.clone()?,
            open_only: self.open_only,
        })
    }

    /// Chosen province.
    #[must_use]
    pub fn province(&self) -> Option<&ProvinceId> {
        self.province.as_ref()
    }

    /// Chosen municipality.
    #[must_use]
    pub fn municipality(&self) -> Option<&MunicipalityId> {
        self.municipality.as_ref()
    }

    /// Chosen fuel type.
    #[must_use]
    pub fn fuel_type(&self) -> Option<&FuelTypeId> {
        self.fuel_type.as_ref()
    }

    /// Whether the "open now" filter is on.
    #[must_use]
    pub fn open_only(&self) -> bool {
        self.open_only
    }

    fn next_query(&self) -> Effect {
        self.query()
            .map_or(Effect::NeedMoreInput, Effect::QueryStations)
    }
}
