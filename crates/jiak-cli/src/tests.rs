use jiak_core::filters::EateryFilter;
use jiak_core::{Eatery, Mall};

use super::*;
use crate::malls::{featured_picks, filtered_mall};

fn eatery(id: &str, cuisine: &str, halal: bool, rating: f64, gem: bool) -> Eatery {
    Eatery {
        id: id.to_owned(),
        name: id.to_uppercase(),
        cuisine_type: cuisine.to_owned(),
        halal,
        rating: Some(rating),
        hidden_gem: gem,
        ..Eatery::default()
    }
}

fn malls() -> Vec<Mall> {
    vec![
        Mall {
            id: "tampines-1".to_owned(),
            name: "Tampines 1".to_owned(),
            region: Some("East".to_owned()),
            eateries: vec![
                eatery("nasi-lemak", "Malay", true, 4.4, true),
                eatery("sushi", "Japanese", false, 4.7, false),
            ],
            ..Mall::default()
        },
        Mall {
            id: "jem".to_owned(),
            name: "JEM".to_owned(),
            region: Some("West".to_owned()),
            eateries: vec![eatery("laksa", "Peranakan", true, 3.9, true)],
            ..Mall::default()
        },
    ]
}

#[test]
fn parses_nearest_with_negative_coordinates() {
    let cli = Cli::try_parse_from(["jiak", "nearest", "--lat", "-33.86", "--lng", "151.2"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Nearest { lat, lng } if (lat + 33.86).abs() < 1e-9 && (lng - 151.2).abs() < 1e-9
    ));
}

#[test]
fn nearest_requires_both_coordinates() {
    assert!(Cli::try_parse_from(["jiak", "nearest", "--lat", "1.3"]).is_err());
}

#[test]
fn parses_mall_filters() {
    let cli = Cli::try_parse_from([
        "jiak",
        "mall",
        "ion-orchard",
        "--halal-only",
        "--cuisine",
        "Malay",
        "--min-rating",
        "4",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Mall {
            ref id,
            halal_only: true,
            cuisine: Some(ref c),
            min_rating,
        } if id == "ion-orchard" && c == "Malay" && (min_rating - 4.0).abs() < f64::EPSILON
    ));
}

#[test]
fn mall_filters_default_to_everything() {
    let cli = Cli::try_parse_from(["jiak", "mall", "jem"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Mall {
            halal_only: false,
            cuisine: None,
            min_rating,
            ..
        } if min_rating == 0.0
    ));
}

#[test]
fn parses_carparks_and_featured() {
    let cli = Cli::try_parse_from(["jiak", "carparks", "--development", "vivo"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Carparks { development: Some(ref d) } if d == "vivo"
    ));

    let cli = Cli::try_parse_from(["jiak", "featured", "--region", "East", "--seed", "9"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Featured { region: Some(ref r), seed: Some(9) } if r == "East"
    ));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["jiak"]).is_err());
}

#[test]
fn filtered_mall_keeps_only_matching_eateries() {
    let malls = malls();
    let filter = EateryFilter {
        halal_only: true,
        ..EateryFilter::default()
    };
    let view = filtered_mall(&malls[0], &filter);
    let ids: Vec<&str> = view.eateries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["nasi-lemak"]);
    assert_eq!(view.id, "tampines-1");
    // the source mall is untouched
    assert_eq!(malls[0].eateries.len(), 2);
}

#[test]
fn seeded_featured_picks_repeat() {
    let malls = malls();
    let a = featured_picks(&malls, None, Some(11));
    let b = featured_picks(&malls, None, Some(11));
    assert_eq!(
        a.hidden_gem.as_ref().map(|g| g.eatery.id.as_str()),
        b.hidden_gem.as_ref().map(|g| g.eatery.id.as_str())
    );
    assert_eq!(
        a.spot_of_the_day.map(|m| m.id.as_str()),
        b.spot_of_the_day.map(|m| m.id.as_str())
    );
    assert!(a.hidden_gem.as_ref().is_some_and(|g| g.eatery.hidden_gem));
}

#[test]
fn featured_gem_names_the_mall_that_lists_it() {
    let mut malls = malls();
    // a stale back-reference must not change the reported mall
    malls[1].eateries[0].mall_id = "tampines-1".to_owned();
    for seed in 0..20 {
        let gem = featured_picks(&malls, None, Some(seed))
            .hidden_gem
            .expect("two gems to pick from");
        let expected = if gem.eatery.id == "laksa" { "JEM" } else { "Tampines 1" };
        assert_eq!(gem.mall_name, expected, "seed {seed}");
    }
}

#[test]
fn featured_spot_honours_region() {
    let malls = malls();
    let picks = featured_picks(&malls, Some("West"), Some(3));
    assert_eq!(picks.spot_of_the_day.map(|m| m.id.as_str()), Some("jem"));
    assert!(featured_picks(&malls, Some("North"), Some(3))
        .spot_of_the_day
        .is_none());
}
