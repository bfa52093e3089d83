use std::sync::Arc;

use carburo_core::{
    Effect, LatestRequest, SelectionEvent,
    model::{FuelType, Municipality, Province},
    ports::PortError,
    render::RenderedList,
    schedule::WeekInstant,
    selection::{Selection, SelectionState, StationQuery},
    service::CarburoService,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    ProvinceSelect,
    MunicipalitySelect,
    FuelTypeSelect,
    Results,
}

/// Results of background fetches, delivered to the event loop.
#[derive(Debug)]
pub(crate) enum Message {
    Provinces(Result<Vec<Province>, PortError>),
    FuelTypes(Result<Vec<FuelType>, PortError>),
    Municipalities {
        generation: u64,
        result: Result<Vec<Municipality>, PortError>,
    },
    Stations {
        generation: u64,
        result: Result<RenderedList, PortError>,
    },
}

pub(crate) trait Labeled {
    fn label(&self) -> &str;
}

impl Labeled for Province {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for Municipality {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for FuelType {
    fn label(&self) -> &str {
        &self.name
    }
}

/// Catalog list with a type-to-filter query and a cursor over the visible entries.
pub(crate) struct Picker<T> {
    items: Vec<T>,
    filter: String,
    index: usize,
}

impl<T: Labeled> Picker<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            filter: String::new(),
            index: 0,
        }
    }

    pub(crate) fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.filter.clear();
        self.index = 0;
    }

    pub(crate) fn clear(&mut self) {
        self.set_items(Vec::new());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn visible(&self) -> Vec<&T> {
        let needle = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.label().to_lowercase().contains(&needle))
            .collect()
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.visible().get(self.index).copied()
    }

    pub(crate) fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| predicate(item))
    }

    pub(crate) fn move_up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub(crate) fn move_down(&mut self) {
        if self.index + 1 < self.visible().len() {
            self.index += 1;
        }
    }

    pub(crate) fn push_filter(&mut self, character: char) {
        self.filter.push(character);
        self.index = 0;
    }

    pub(crate) fn pop_filter(&mut self) {
        self.filter.pop();
        self.index = 0;
    }
}

pub(crate) struct App {
    pub service: Arc<CarburoService>,
    pub sender: UnboundedSender<Message>,

    pub screen: Screen,
    pub provinces: Picker<Province>,
    pub municipalities: Picker<Municipality>,
    pub fuel_types: Picker<FuelType>,

    pub selection: Selection,
    pub results: RenderedList,
    pub result_index: usize,
    pub evaluated_at: Option<WeekInstant>,

    pub municipality_request: LatestRequest,
    pub station_request: LatestRequest,
    pub catalogs_pending: usize,

    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<CarburoService>, sender: UnboundedSender<Message>) -> Self {
        Self {
            service,
            sender,
            screen: Screen::ProvinceSelect,
            provinces: Picker::new(),
            municipalities: Picker::new(),
            fuel_types: Picker::new(),
            selection: Selection::new(),
            results: RenderedList::SelectionIncomplete,
            result_index: 0,
            evaluated_at: None,
            municipality_request: LatestRequest::new(),
            station_request: LatestRequest::new(),
            catalogs_pending: 0,
            error_message: None,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.catalogs_pending > 0
            || self.municipality_request.is_pending()
            || self.station_request.is_pending()
    }

    /// Kick off the province and fuel type catalogs, which do not depend on anything.
    pub(crate) fn load_catalogs(&mut self) {
        self.catalogs_pending += 2;

        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = service.provinces().await;
            send(&sender, Message::Provinces(result));
        });

        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let result = service.fuel_types().await;
            send(&sender, Message::FuelTypes(result));
        });
    }

    /// Feed a user choice into the selection and act on the resulting effect.
    pub(crate) fn select(&mut self, event: SelectionEvent) {
        let effect = self.selection.apply(event);
        self.dispatch(effect);
    }

    /// Re-run the current query, e.g. to refresh "open now" against the clock.
    pub(crate) fn refresh(&mut self) {
        let effect = self
            .selection
            .query()
            .map_or(Effect::NeedMoreInput, Effect::QueryStations);
        self.dispatch(effect);
    }

    pub(crate) fn dispatch(&mut self, effect: Effect) {
        match effect {
            Effect::Unchanged => {}
            Effect::NeedMoreInput => {
                self.station_request.cancel();
                self.show(RenderedList::SelectionIncomplete);

                // Without a province the municipality list belongs to nobody.
                if self.selection.state() == SelectionState::Empty {
                    self.municipality_request.cancel();
                    self.municipalities.clear();
                }
            }
            Effect::LoadMunicipalities(province) => {
                self.station_request.cancel();
                self.show(RenderedList::SelectionIncomplete);
                self.municipalities.clear();

                let ticket = self.municipality_request.begin();
                let generation = ticket.generation();
                let service = Arc::clone(&self.service);
                let sender = self.sender.clone();
                tokio::spawn(async move {
                    if let Some(result) = ticket.run(service.municipalities(&province)).await {
                        send(&sender, Message::Municipalities { generation, result });
                    }
                });
            }
            Effect::QueryStations(query) => self.spawn_station_query(query),
        }
    }

    fn spawn_station_query(&mut self, query: StationQuery) {
        let at = WeekInstant::now();
        self.evaluated_at = Some(at);
        self.error_message = None;

        let ticket = self.station_request.begin();
        let generation = ticket.generation();
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            if let Some(result) = ticket.run(service.listing(&query, at)).await {
                send(&sender, Message::Stations { generation, result });
            }
        });
    }

    pub(crate) fn handle_message(&mut self, message: Message) {
        match message {
            Message::Provinces(result) => {
                self.catalogs_pending = self.catalogs_pending.saturating_sub(1);
                match result {
                    Ok(provinces) => self.provinces.set_items(provinces),
                    Err(err) => self.report("Error getting provinces", &err),
                }
            }
            Message::FuelTypes(result) => {
                self.catalogs_pending = self.catalogs_pending.saturating_sub(1);
                match result {
                    Ok(fuel_types) => self.fuel_types.set_items(fuel_types),
                    Err(err) => self.report("Error getting fuel types", &err),
                }
            }
            Message::Municipalities { generation, result } => {
                if !self.municipality_request.finish(generation) {
                    debug!(generation, "dropping stale municipality list");
                    return;
                }
                match result {
                    Ok(municipalities) => self.municipalities.set_items(municipalities),
                    Err(err) => self.report("Error when obtaining municipalities", &err),
                }
            }
            Message::Stations { generation, result } => {
                if !self.station_request.finish(generation) {
                    debug!(generation, "dropping stale station listing");
                    return;
                }
                match result {
                    Ok(rendered) => self.show(rendered),
                    Err(err) => self.report("Error fetching gas stations", &err),
                }
            }
        }
    }

    fn show(&mut self, results: RenderedList) {
        self.results = results;
        self.result_index = 0;
    }

    fn report(&mut self, context: &str, err: &PortError) {
        warn!("{context}: {err}");
        self.error_message = Some(format!("{context}: {err}"));
    }

    pub(crate) fn province_name(&self) -> Option<&str> {
        let id = self.selection.province()?;
        self.provinces
            .find(|province| &province.id == id)
            .map(|province| province.name.as_str())
    }

    pub(crate) fn municipality_name(&self) -> Option<&str> {
        let id = self.selection.municipality()?;
        self.municipalities
            .find(|municipality| &municipality.id == id)
            .map(|municipality| municipality.name.as_str())
    }

    pub(crate) fn fuel_type_name(&self) -> Option<&str> {
        let id = self.selection.fuel_type()?;
        self.fuel_types
            .find(|fuel_type| &fuel_type.id == id)
            .map(|fuel_type| fuel_type.name.as_str())
    }
}

fn send(sender: &UnboundedSender<Message>, message: Message) {
    // The receiver only goes away when the UI is shutting down.
    if sender.send(message).is_err() {
        debug!("event loop gone, dropping fetch result");
    }
}
