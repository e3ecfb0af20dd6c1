use super::*;

fn make_source(name: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        label: "Test Source".to_string(),
        kind: SourceKind::Pnp,
        search_path: format!("/{name}/search"),
        detail_path: format!("/{name}/fetch_barcode"),
    }
}

#[test]
fn builtin_lists_three_sources_in_order() {
    let file = SourcesFile::builtin();
    let names: Vec<&str> = file.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["pnp", "checkers", "deeliver"]);
    assert!(validate_sources(&file).is_ok());
}

#[test]
fn builtin_paths_match_server_routes() {
    let file = SourcesFile::builtin();
    let pnp = file.get("pnp").unwrap();
    assert_eq!(pnp.search_path, "/pnp/search");
    assert_eq!(pnp.detail_path, "/pnp/fetch_barcode");
    let checkers = file.get("checkers").unwrap();
    assert_eq!(checkers.detail_path, "/checkers/fetch_details");
}

#[test]
fn detail_field_depends_on_kind() {
    assert_eq!(SourceKind::Pnp.detail_field(), "product_code");
    assert_eq!(SourceKind::Checkers.detail_field(), "href");
    assert_eq!(SourceKind::Deeliver.detail_field(), "barcode");
}

#[test]
fn parses_yaml_sources_file() {
    let yaml = r"
sources:
  - name: checkers
    label: Checkers
    kind: checkers
    search_path: /checkers/search
    detail_path: /checkers/fetch_details
  - name: pnp
    label: Pick n Pay
    kind: pnp
    search_path: /pnp/search
    detail_path: /pnp/fetch_barcode
";
    let file: SourcesFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.sources.len(), 2);
    assert_eq!(file.sources[0].kind, SourceKind::Checkers);
    assert!(validate_sources(&file).is_ok());
}

#[test]
fn validate_rejects_empty_list() {
    let file = SourcesFile { sources: vec![] };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("at least one source"));
}

#[test]
fn validate_rejects_duplicate_names() {
    let file = SourcesFile {
        sources: vec![make_source("pnp"), make_source("pnp")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate source name"));
}

#[test]
fn validate_rejects_uppercase_name() {
    let file = SourcesFile {
        sources: vec![make_source("PnP")],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("must be lowercase"));
}

#[test]
fn validate_rejects_relative_path() {
    let mut source = make_source("pnp");
    source.detail_path = "pnp/fetch_barcode".to_string();
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("detail_path"));
}

#[test]
fn validate_rejects_blank_label() {
    let mut source = make_source("pnp");
    source.label = "  ".to_string();
    let file = SourcesFile {
        sources: vec![source],
    };
    let err = validate_sources(&file).unwrap_err();
    assert!(err.to_string().contains("empty label"));
}

#[test]
fn load_sources_or_builtin_falls_back_for_missing_file() {
    let file = load_sources_or_builtin(Path::new("/nonexistent/pricematch/sources.yaml")).unwrap();
    assert_eq!(file.sources.len(), 3);
}

#[test]
fn load_sources_reports_missing_file() {
    let err = load_sources(Path::new("/nonexistent/pricematch/sources.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SourcesFileIo { .. }));
}
