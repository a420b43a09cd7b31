use super::*;

#[test]
fn parses_weather_with_multi_word_query() {
    let cli = Cli::try_parse_from(["hazardwatch", "weather", "Fairbanks,", "Alaska"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Weather { ref query } if query.join(" ") == "Fairbanks, Alaska"
    ));
    assert!(!cli.json);
}

#[test]
fn weather_query_is_optional() {
    let cli = Cli::try_parse_from(["hazardwatch", "weather"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Weather { ref query } if query.is_empty()));
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["hazardwatch", "aurora", "--json"])
        .expect("expected valid cli args");
    assert!(cli.json);
    assert!(matches!(cli.command, Commands::Aurora { top: 10 }));
}

#[test]
fn quakes_defaults() {
    let cli = Cli::try_parse_from(["hazardwatch", "quakes"]).expect("expected valid cli args");
    match cli.command {
        Commands::Quakes {
            window,
            min_mag,
            sort,
            watch,
        } => {
            assert_eq!(window, QuakeWindow::Day);
            assert!(min_mag.abs() < f64::EPSILON);
            assert_eq!(sort, QuakeSort::Time);
            assert!(!watch);
        }
        other => panic!("expected quakes, got {other:?}"),
    }
}

#[test]
fn quakes_accepts_filters_and_watch() {
    let cli = Cli::try_parse_from([
        "hazardwatch",
        "quakes",
        "--window",
        "week",
        "--min-mag",
        "4.5",
        "--sort",
        "magnitude",
        "--watch",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Quakes {
            window: QuakeWindow::Week,
            sort: QuakeSort::Magnitude,
            watch: true,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_window() {
    assert!(Cli::try_parse_from(["hazardwatch", "quakes", "--window", "month"]).is_err());
}

#[test]
fn dashboard_window_override() {
    let cli = Cli::try_parse_from(["hazardwatch", "dashboard", "--window", "hour"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Dashboard {
            window: QuakeWindow::Hour
        }
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["hazardwatch"]).is_err());
}
