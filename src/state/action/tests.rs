use super::*;
use crate::cli::types::{PlayerId, TeamId};
use crate::fpl::types::{Element, ManagersTeam, Pick};
use crate::state::model::ErrorDetail;
use serde_json::{json, Value};

/// Top-level keys whose values differ between two states.
fn changed_fields(before: &State, after: &State) -> Vec<String> {
    let before = serde_json::to_value(before).unwrap();
    let after = serde_json::to_value(after).unwrap();
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        panic!("state should serialize to an object");
    };
    let mut changed: Vec<String> = before
        .iter()
        .filter(|(key, value)| after.get(*key) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    changed.sort();
    changed
}

fn sample_error() -> LatestError {
    LatestError::new(
        ErrorDetail {
            name: "UpstreamFetchFailure".to_string(),
            message: "HTTP error! status: 500".to_string(),
        },
        "Unable to load Gameweek Data",
        true,
    )
}

fn sample_user() -> User {
    User {
        team_id: Some(TeamId::new(42)),
        team: Some(ManagersTeam {
            picks: vec![Pick {
                element: PlayerId::new(7),
                ..Default::default()
            }],
            ..Default::default()
        }),
        players: vec![Element {
            id: PlayerId::new(7),
            web_name: "Saka".to_string(),
            ..Default::default()
        }],
        loaded_information: true,
        ..Default::default()
    }
}

/// One action per catalog entry, each carrying a value that differs from the
/// initial state, paired with the serialized field it should change.
fn catalog() -> Vec<(Action, &'static str)> {
    let mut info = GeneralInformation::default();
    info.elements.push(Element {
        id: PlayerId::new(1),
        ..Default::default()
    });

    vec![
        (Action::SetTheme { theme: Theme::Light }, "theme"),
        (Action::SetNavbarOpen { navbar_open: true }, "navbarOpen"),
        (
            Action::SetCurrentPage {
                current_page: Page::Fixtures,
            },
            "currentPage",
        ),
        (Action::set_general_information(info), "generalInformation"),
        (Action::set_user(sample_user()), "user"),
        (Action::set_latest_error(Some(sample_error())), "latestError"),
        (
            Action::SetNotifications {
                notifications: vec![Notification::new("Saved", "Filters updated")],
            },
            "notifications",
        ),
        (
            Action::SetGameweekData {
                gameweek_data: Some(GameweekData::default()),
            },
            "gameweekData",
        ),
        (
            Action::SetGameweek {
                gameweek: Some(Gameweek::new(5)),
            },
            "gameweek",
        ),
        (
            Action::SetFilters {
                filters: Filters {
                    model: Some("Random Forest".to_string()),
                    horizon: 3,
                    transfers: 2,
                },
            },
            "filters",
        ),
        (
            Action::SetFixtures {
                fixtures: vec![Fixture::default()],
            },
            "fixtures",
        ),
        (Action::SetIsLoading { is_loading: true }, "isLoading"),
        (
            Action::SetLoadingPercent {
                loading_percent: 42.5,
            },
            "loadingPercent",
        ),
        (
            Action::SetPredictionResponse {
                prediction_response: None,
            },
            "predictionResponse",
        ),
    ]
}

#[test]
fn test_catalog_is_complete() {
    let names: Vec<&str> = catalog().iter().map(|(a, _)| a.name()).collect();
    assert_eq!(names.len(), 14);
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 14);
}

#[test]
fn test_each_action_changes_exactly_its_field() {
    let initial = State::default();
    for (action, field) in catalog() {
        let name = action.name();
        let next = reduce(&initial, action);
        assert_eq!(
            changed_fields(&initial, &next),
            vec![field.to_string()],
            "{} changed the wrong fields",
            name
        );
    }
}

#[test]
fn test_each_action_changes_exactly_its_field_on_a_busy_state() {
    // Start from a state where every field already holds a non-initial value.
    let busy = catalog()
        .into_iter()
        .fold(State::default(), |state, (action, _)| state.apply(action));
    let replacements = vec![
        (Action::SetTheme { theme: Theme::Dark }, "theme"),
        (Action::SetNavbarOpen { navbar_open: false }, "navbarOpen"),
        (Action::set_user(User::default()), "user"),
        (Action::set_latest_error(None), "latestError"),
        (Action::SetGameweek { gameweek: None }, "gameweek"),
        (Action::SetIsLoading { is_loading: false }, "isLoading"),
    ];
    for (action, field) in replacements {
        let next = reduce(&busy, action);
        assert_eq!(changed_fields(&busy, &next), vec![field.to_string()]);
    }
}

#[test]
fn test_unknown_action_is_a_no_op() {
    let initial = State::default();
    assert_eq!(reduce(&initial, Action::Unknown), initial);

    let busy = catalog()
        .into_iter()
        .fold(State::default(), |state, (action, _)| state.apply(action));
    assert_eq!(reduce(&busy, Action::Unknown), busy);
}

#[test]
fn test_reduce_leaves_input_untouched() {
    let initial = State::default();
    let snapshot = initial.clone();
    let _ = reduce(
        &initial,
        Action::SetGameweek {
            gameweek: Some(Gameweek::new(5)),
        },
    );
    assert_eq!(initial, snapshot);
}

#[test]
fn test_set_gameweek_on_initial_state() {
    let initial = State::default();
    let next = reduce(
        &initial,
        Action::SetGameweek {
            gameweek: Some(Gameweek::new(5)),
        },
    );
    assert_eq!(next.gameweek, Some(Gameweek::new(5)));
    assert_eq!(
        State {
            gameweek: None,
            ..next
        },
        initial
    );
}

#[test]
fn test_set_filters_reads_back() {
    let next = State::default().apply(Action::SetFilters {
        filters: Filters {
            model: Some("Random Forest".to_string()),
            horizon: 3,
            transfers: 2,
        },
    });
    assert_eq!(next.filters.model.as_deref(), Some("Random Forest"));
    assert_eq!(next.filters.horizon, 3);
    assert_eq!(next.filters.transfers, 2);
}

#[test]
fn test_set_user_replaces_wholesale() {
    let state = State::default().apply(Action::set_user(sample_user()));
    let replacement = User {
        team_id: Some(TeamId::new(99)),
        ..Default::default()
    };
    let next = state.apply(Action::set_user(replacement.clone()));
    assert_eq!(next.user, replacement);
    assert!(next.user.players.is_empty());
    assert!(next.user.team.is_none());
}

mod serde_tests {
    use super::*;

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let action: Action = serde_json::from_value(json!({
            "type": "SetFilters",
            "filters": {"model": "Random Forest", "horizon": 3, "transfers": 2}
        }))
        .unwrap();
        assert_eq!(action.name(), "SetFilters");

        let action: Action =
            serde_json::from_value(json!({"type": "SetGameweek", "gameweek": 5})).unwrap();
        assert_eq!(
            action,
            Action::SetGameweek {
                gameweek: Some(Gameweek::new(5))
            }
        );
    }

    #[test]
    fn test_unknown_type_deserializes_to_unknown() {
        let action: Action =
            serde_json::from_value(json!({"type": "SetWeather", "weather": "rain"})).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_set_latest_error_without_payload_clears() {
        let action: Action = serde_json::from_value(json!({"type": "SetLatestError"})).unwrap();
        assert_eq!(action, Action::set_latest_error(None));

        let state = State::default().apply(Action::set_latest_error(Some(sample_error())));
        assert!(state.latest_error.is_some());
        assert!(state.apply(action).latest_error.is_none());
    }

    #[test]
    fn test_action_serializes_with_type_tag() {
        let value = serde_json::to_value(Action::SetNavbarOpen { navbar_open: true }).unwrap();
        assert_eq!(value, json!({"type": "SetNavbarOpen", "navbarOpen": true}));
    }
}
