//! Turns station listings into what the UI shows.

use std::cmp::Ordering;

use tracing::warn;

use crate::model::Station;
use crate::schedule::{Schedule, WeekInstant};

/// Prompt shown while the selection is incomplete.
pub const SELECTION_INCOMPLETE_MESSAGE: &str =
    "Please select a province, municipality, and fuel type to see the results.";

/// Message shown when no station survives the query and filter.
pub const NO_RESULTS_MESSAGE: &str = "No gas stations found for the selected criteria.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How to render a listing.
pub struct RenderOptions {
    /// Moment used to decide which stations are open.
    pub at: WeekInstant,
    /// Drop stations that are not open at `at`.
    pub open_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
/// One station ready for display.
pub struct StationView {
    /// Street address.
    pub address: String,
    /// Locality.
    pub locality: String,
    /// Province name.
    pub province: String,
    /// Raw opening hours.
    pub schedule: String,
    /// Price as reported by the service.
    pub price: String,
    /// Brand label, when known.
    pub brand: Option<String>,
    /// Whether the station is open; `None` when its schedule could not be read.
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
/// Result area contents.
pub enum RenderedList {
    /// The user has not finished choosing.
    SelectionIncomplete,
    /// The query returned nothing, or the filter removed everything.
    NoResults,
    /// Stations to show, cheapest first.
    Stations(Vec<StationView>),
}

impl RenderedList {
    /// Placeholder text for the non-list variants.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::SelectionIncomplete => Some(SELECTION_INCOMPLETE_MESSAGE),
            Self::NoResults => Some(NO_RESULTS_MESSAGE),
            Self::Stations(_) => None,
        }
    }

    /// Rendered stations, empty for the placeholder variants.
    #[must_use]
    pub fn stations(&self) -> &[StationView] {
        match self {
            Self::Stations(views) => views,
            Self::SelectionIncomplete | Self::NoResults => &[],
        }
    }
}

/// Render a listing, filtering to open stations when requested.
///
/// A station whose schedule cannot be parsed counts as closed.
#[must_use]
pub fn render(stations: &[Station], options: &RenderOptions) -> RenderedList {
    let mut ranked = stations
        .iter()
        .map(|station| (station, open_at(station, options.at)))
        .filter(|(_, open_now)| !options.open_only || *open_now == Some(true))
        .collect::<Vec<_>>();

    if ranked.is_empty() {
        return RenderedList::NoResults;
    }

    ranked.sort_by(|(left, _), (right, _)| compare_price(left.price, right.price));

    RenderedList::Stations(
        ranked
            .into_iter()
            .map(|(station, open_now)| StationView {
                address: station.address.clone(),
                locality: station.locality.clone(),
                province: station.province.clone(),
                schedule: station.schedule.clone(),
                price: station.price_text.clone(),
                brand: station.brand.clone(),
                open_now,
            })
            .collect(),
    )
}

fn open_at(station: &Station, at: WeekInstant) -> Option<bool> {
    match Schedule::parse(&station.schedule) {
        Ok(schedule) => Some(schedule.is_open(at)),
        Err(err) => {
            warn!(
                address = %station.address,
                schedule = %station.schedule,
                "unreadable schedule, treating station as closed: {err}"
            );
            None
        }
    }
}

// Unknown prices sort after every known one.
fn compare_price(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday::{Sat, Sun, Wed};

    use super::*;
    use crate::model::parse_price;

    fn station(address: &str, schedule: &str, price: &str) -> Station {
        Station {
            address: address.to_owned(),
            locality: "MADRID".to_owned(),
            province: "MADRID".to_owned(),
            schedule: schedule.to_owned(),
            price_text: price.to_owned(),
            price: parse_price(price),
            brand: None,
            postal_code: None,
        }
    }

    fn addresses(rendered: &RenderedList) -> Vec<&str> {
        rendered
            .stations()
            .iter()
            .map(|view| view.address.as_str())
            .collect()
    }

    #[test]
    fn passes_everything_through_without_filter() {
        let stations = vec![
            station("A", "L-V: 09:00-17:00", "1,50"),
            station("B", "L-D: 24H", "1,40"),
            station("C", "broken", "1,45"),
        ];
        let options = RenderOptions {
            at: WeekInstant::at(Sun, 12, 0),
            open_only: false,
        };

        let rendered = render(&stations, &options);
        assert_eq!(addresses(&rendered), vec!["B", "C", "A"], "cheapest first");

        let flags = rendered
            .stations()
            .iter()
            .map(|view| view.open_now)
            .collect::<Vec<_>>();
        assert_eq!(flags, vec![Some(true), None, Some(false)], "open flags");
    }

    #[test]
    fn filters_to_open_stations() {
        let stations = vec![
            station("weekday", "L-V: 09:00-17:00", "1,50"),
            station("saturday", "L-V: 09:00-17:00;S: 10:00-13:00", "1,60"),
            station("always", "L-D: 24H", "1,70"),
        ];
        let options = RenderOptions {
            at: WeekInstant::at(Sat, 11, 0),
            open_only: true,
        };

        let rendered = render(&stations, &options);
        assert_eq!(addresses(&rendered), vec!["saturday", "always"], "weekday-only dropped");
    }

    #[test]
    fn unreadable_schedule_is_filtered_out_without_breaking_the_rest() {
        let stations = vec![
            station("bad", "L-V: 09:00-17:00;Q: 10:00-13:00", "1,10"),
            station("good", "L-V: 09:00-17:00", "1,20"),
        ];
        let options = RenderOptions {
            at: WeekInstant::at(Wed, 10, 0),
            open_only: true,
        };

        let rendered = render(&stations, &options);
        assert_eq!(addresses(&rendered), vec!["good"], "bad schedule counts as closed");
    }

    #[test]
    fn empty_listing_and_empty_filter_result_give_no_results() {
        let options = RenderOptions {
            at: WeekInstant::at(Sun, 3, 0),
            open_only: true,
        };
        assert_eq!(render(&[], &options), RenderedList::NoResults, "empty listing");

        let stations = vec![station("weekday", "L-V: 09:00-17:00", "1,50")];
        let rendered = render(&stations, &options);
        assert_eq!(rendered, RenderedList::NoResults, "all filtered out");
        assert_eq!(rendered.message(), Some(NO_RESULTS_MESSAGE), "message");
    }

    #[test]
    fn incomplete_selection_has_its_own_message() {
        let incomplete = RenderedList::SelectionIncomplete;
        assert_eq!(incomplete.message(), Some(SELECTION_INCOMPLETE_MESSAGE), "prompt");
        assert_ne!(
            incomplete.message(),
            RenderedList::NoResults.message(),
            "distinct from the empty state"
        );
        assert!(incomplete.stations().is_empty(), "nothing listed");
    }

    #[test]
    fn unknown_prices_go_last_in_service_order() {
        let stations = vec![
            station("x", "L-D: 24H", ""),
            station("y", "L-D: 24H", "1,30"),
            station("z", "L-D: 24H", "n/d"),
        ];
        let options = RenderOptions {
            at: WeekInstant::at(Wed, 10, 0),
            open_only: false,
        };
        assert_eq!(
            addresses(&render(&stations, &options)),
            vec!["y", "x", "z"],
            "priced first, then unpriced in order"
        );
    }
}
