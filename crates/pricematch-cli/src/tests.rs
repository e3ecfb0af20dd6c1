use super::*;

#[test]
fn parses_search_command() {
    let cli = Cli::try_parse_from(["pricematch", "search", "full cream milk"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search { ref term } if term == "full cream milk"
    ));
}

#[test]
fn search_requires_term() {
    assert!(Cli::try_parse_from(["pricematch", "search"]).is_err());
}

#[test]
fn parses_sources_command() {
    let cli = Cli::try_parse_from(["pricematch", "sources"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Sources));
}

#[test]
fn parses_session_with_record_fields() {
    let cli = Cli::try_parse_from([
        "pricematch",
        "session",
        "--sku",
        "SKU-1",
        "--name",
        "Clover Milk 1L",
        "--price",
        "20.00",
    ])
    .expect("expected valid cli args");

    let Commands::Session(args) = cli.command else {
        panic!("expected session command");
    };
    assert_eq!(args.sku, "SKU-1");
    assert_eq!(args.name, "Clover Milk 1L");
    assert_eq!(args.price.as_deref(), Some("20.00"));
    assert!(args.brand.is_empty());
}

#[test]
fn session_requires_sku() {
    assert!(Cli::try_parse_from(["pricematch", "session", "--name", "Milk"]).is_err());
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["pricematch"]).is_err());
}

#[test]
fn format_sources_lists_builtin_set() {
    let out = format_sources(&SourcesFile::builtin());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("pnp"));
    assert!(lines[0].contains("search=/pnp/search"));
    assert!(lines[1].contains("(href)"));
    assert!(lines[2].contains("Deeliver"));
}

#[test]
fn format_sources_pads_kind_column() {
    let out = format_sources(&SourcesFile::builtin());
    assert!(out.starts_with("pnp        Pick n Pay   pnp       search=/pnp/search"));
}
