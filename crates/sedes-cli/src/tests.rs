use super::*;
use sedes_core::{Route, RouteSet, TravelMode};

#[test]
fn cli_parses_no_subcommand() {
    let cli = Cli::try_parse_from(["sedes-cli"]).expect("parse should succeed");
    assert!(cli.command.is_none());
}

#[test]
fn cli_parses_facilities_json() {
    let cli = Cli::try_parse_from(["sedes-cli", "facilities", "--json"])
        .expect("parse should succeed");
    assert!(matches!(cli.command, Some(Commands::Facilities { json: true })));
}

#[test]
fn cli_parses_nearest_with_negative_longitude() {
    let cli = Cli::try_parse_from([
        "sedes-cli", "nearest", "--lat", "19.43", "--lng", "-99.13", "--count", "5",
    ])
    .expect("parse should succeed");
    match cli.command {
        Some(Commands::Nearest { lat, lng, count }) => {
            assert!((lat - 19.43).abs() < 1e-9);
            assert!((lng + 99.13).abs() < 1e-9);
            assert_eq!(count, Some(5));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn cli_rejects_nearest_without_coordinates() {
    let result = Cli::try_parse_from(["sedes-cli", "nearest", "--lat", "19.43"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_routes_with_modes() {
    let cli = Cli::try_parse_from([
        "sedes-cli",
        "routes",
        "--from-lat",
        "19.43",
        "--from-lng",
        "-99.13",
        "--to-lat",
        "19.40",
        "--to-lng",
        "-99.15",
        "--modes",
        "walking,cycling",
    ])
    .expect("parse should succeed");
    assert!(matches!(
        cli.command,
        Some(Commands::Routes { modes: Some(ref m), .. }) if m == "walking,cycling"
    ));
}

#[test]
fn cli_parses_locate_with_pick() {
    let cli = Cli::try_parse_from([
        "sedes-cli",
        "locate",
        "Av. Juárez 8, Centro",
        "--pick",
        "42",
    ])
    .expect("parse should succeed");
    assert!(matches!(
        cli.command,
        Some(Commands::Locate { ref address, count: None, pick: Some(42) })
            if address == "Av. Juárez 8, Centro"
    ));
}

#[test]
fn render_routes_marks_missing_modes_unavailable() {
    let mut set = RouteSet::new();
    set.insert(Route {
        mode: TravelMode::Walking,
        duration_minutes: 12.0,
        distance_km: 0.85,
        geometry: Vec::new(),
    });

    let lines = routes::render_routes(&set, &[TravelMode::Driving, TravelMode::Walking]);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("driving"));
    assert!(lines[0].ends_with("unavailable"));
    assert!(lines[1].contains("12 min"));
    assert!(lines[1].contains("850 m"));
}
