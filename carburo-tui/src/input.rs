use carburo_core::SelectionEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Feed a choice into the selection state machine
    Select(SelectionEvent),
    /// Re-run the station query for the current selection
    Refresh,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Delete, Down, Enter, Esc, Left, Right, Tab, Up};

    let control = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    if control {
        return match key.code {
            Char('c') => Action::Quit,
            Char('o') => toggle_open_only(app),
            Char('r') => Action::Refresh,
            _ => Action::None,
        };
    }

    match app.screen {
        Screen::ProvinceSelect => match key.code {
            Up => app.provinces.move_up(),
            Down => app.provinces.move_down(),
            Char(character) if !key.modifiers.contains(KeyModifiers::ALT) => {
                app.provinces.push_filter(character);
            }
            Backspace => app.provinces.pop_filter(),
            Enter => {
                if let Some(province) = app.provinces.current() {
                    let id = province.id.clone();
                    app.screen = Screen::MunicipalitySelect;
                    return Action::Select(SelectionEvent::ProvinceChanged(Some(id)));
                }
            }
            Delete => {
                return Action::Select(SelectionEvent::ProvinceChanged(None));
            }
            Right | Tab => {
                if app.selection.province().is_some() {
                    app.screen = Screen::MunicipalitySelect;
                }
            }
            Esc => {
                if app.provinces.filter().is_empty() {
                    return Action::Quit;
                }
                while !app.provinces.filter().is_empty() {
                    app.provinces.pop_filter();
                }
            }
            _ => {}
        },

        Screen::MunicipalitySelect => match key.code {
            Up => app.municipalities.move_up(),
            Down => app.municipalities.move_down(),
            Char(character) if !key.modifiers.contains(KeyModifiers::ALT) => {
                app.municipalities.push_filter(character);
            }
            Backspace => app.municipalities.pop_filter(),
            Enter => {
                if let Some(municipality) = app.municipalities.current() {
                    let id = municipality.id.clone();
                    app.screen = if app.selection.fuel_type().is_some() {
                        Screen::Results
                    } else {
                        Screen::FuelTypeSelect
                    };
                    return Action::Select(SelectionEvent::MunicipalityChanged(Some(id)));
                }
            }
            Delete => {
                return Action::Select(SelectionEvent::MunicipalityChanged(None));
            }
            Right | Tab => app.screen = Screen::FuelTypeSelect,
            Left | Esc => app.screen = Screen::ProvinceSelect,
            _ => {}
        },

        Screen::FuelTypeSelect => match key.code {
            Up => app.fuel_types.move_up(),
            Down => app.fuel_types.move_down(),
            Char(character) if !key.modifiers.contains(KeyModifiers::ALT) => {
                app.fuel_types.push_filter(character);
            }
            Backspace => app.fuel_types.pop_filter(),
            Enter => {
                if let Some(fuel_type) = app.fuel_types.current() {
                    let id = fuel_type.id.clone();
                    app.screen = Screen::Results;
                    return Action::Select(SelectionEvent::FuelTypeChanged(Some(id)));
                }
            }
            Delete => {
                return Action::Select(SelectionEvent::FuelTypeChanged(None));
            }
            Right | Tab => app.screen = Screen::Results,
            Left | Esc => app.screen = Screen::MunicipalitySelect,
            _ => {}
        },

        Screen::Results => match key.code {
            Up | Char('k') => {
                app.result_index = app.result_index.saturating_sub(1);
            }
            Down | Char('j') => {
                if app.result_index + 1 < app.results.stations().len() {
                    app.result_index += 1;
                }
            }
            Char('o') => return toggle_open_only(app),
            Char('r') => return Action::Refresh,
            Char('q') => return Action::Quit,
            Left | Esc | Char('b') => app.screen = Screen::FuelTypeSelect,
            _ => {}
        },
    }

    Action::None
}

fn toggle_open_only(app: &App) -> Action {
    Action::Select(SelectionEvent::OpenOnlyToggled(!app.selection.open_only()))
}
