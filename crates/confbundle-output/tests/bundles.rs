//! Tests for bundle assembly on disk.

use std::fs;
use std::path::{Path, PathBuf};

use confbundle_ingest::parse_metadata;
use confbundle_model::{Assignment, DefectKind, MatchTier, PublicationRecord};
use confbundle_output::{
    AssemblyOutcome, AuditRow, BundleAssembler, BundleOptions, MANIFEST_FILE, Manifest,
    check_completeness, read_bundle, write_audit_csv,
};
use tempfile::TempDir;

const METADATA: &str = r#"<records>
  <metadata>
    <upload_type>publication</upload_type>
    <publication_type>conferencepaper</publication_type>
    <title>Netzwerke der Moderne</title>
    <creators>
      <creator><name>Lee, Kim</name><affiliation>Universität Wien</affiliation></creator>
      <creator><name>Roe, Max</name></creator>
    </creators>
    <description>Abstract text</description>
    <access_right>open</access_right>
    <license>CC-BY-4.0</license>
    <keywords>Netzwerk, "Moderne", Edition</keywords>
    <contributors>
      <contributor><name>Vogel, Ute</name><affiliation>DHd</affiliation><type>Editor</type></contributor>
    </contributors>
    <conference_title>DHd 2019</conference_title>
    <conference_acronym>DHd2019</conference_acronym>
    <conference_dates>25-29 March 2019</conference_dates>
    <conference_place>Mainz</conference_place>
    <conference_url>https://dhd2019.org</conference_url>
  </metadata>
</records>"#;

struct Workspace {
    _root: TempDir,
    pdf_dir: PathBuf,
    xml_dir: PathBuf,
    output_root: PathBuf,
}

fn workspace() -> Workspace {
    let root = TempDir::new().expect("temp dir");
    let pdf_dir = root.path().join("pdf");
    let xml_dir = root.path().join("xml");
    fs::create_dir_all(&pdf_dir).expect("pdf dir");
    fs::create_dir_all(&xml_dir).expect("xml dir");
    fs::write(pdf_dir.join("001_final-LEE_Kim_Netzwerke.pdf"), "%PDF").expect("pdf");
    fs::write(
        xml_dir.join("001_final-LEE_Kim_Netzwerke.xml"),
        r#"<TEI><title type="main">Netzwerke</title><title type="sub">der Moderne</title></TEI>"#,
    )
    .expect("xml");
    Workspace {
        output_root: root.path().join("out").join("DHd2019"),
        _root: root,
        pdf_dir,
        xml_dir,
    }
}

fn record() -> PublicationRecord {
    parse_metadata(METADATA, Path::new("DHd2019.xml"))
        .expect("metadata")
        .remove(0)
}

fn assignment(xml: bool) -> Assignment {
    Assignment {
        record_index: 0,
        record_title: "Netzwerke der Moderne".to_string(),
        matched_pdf: Some("001_final-LEE_Kim_Netzwerke.pdf".to_string()),
        matched_xml: xml.then(|| "001_final-LEE_Kim_Netzwerke.xml".to_string()),
        matched_key: Some("LEE_Kim_Netzwerke".to_string()),
        match_tier: MatchTier::Exact,
        warnings: Vec::new(),
    }
}

fn options(ws: &Workspace, xml: bool) -> BundleOptions {
    BundleOptions {
        output_root: ws.output_root.clone(),
        pdf_dir: ws.pdf_dir.clone(),
        xml_dir: xml.then(|| ws.xml_dir.clone()),
        dry_run: false,
    }
}

#[test]
fn assembles_pdf_only_bundle() {
    let ws = workspace();
    let assembler = BundleAssembler::new(options(&ws, false));
    let outcome = assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("assemble");

    let AssemblyOutcome::Created { bundle, defects } = outcome else {
        panic!("bundle not created");
    };
    assert!(defects.is_empty(), "{defects:?}");
    assert_eq!(bundle.name, "bundle_001");

    let contents = read_bundle(&bundle.directory).expect("layout");
    assert_eq!(contents.manifest_path, bundle.directory.join(MANIFEST_FILE));
    assert_eq!(contents.publications.len(), 1);
    assert!(check_completeness(&ws.output_root, 1).expect("check").is_empty());
}

#[test]
fn manifest_round_trip_keeps_keywords_and_creators() {
    let ws = workspace();
    let assembler = BundleAssembler::new(options(&ws, false));
    let outcome = assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("assemble");
    let bundle = outcome.bundle().expect("bundle");

    let manifest = Manifest::read(&bundle.manifest_path).expect("read manifest");
    assert_eq!(manifest.metadata.keywords, vec!["Netzwerk", "Moderne", "Edition"]);
    let creators: Vec<(&str, Option<&str>)> = manifest
        .metadata
        .creators
        .iter()
        .map(|c| (c.name.as_str(), c.affiliation.as_deref()))
        .collect();
    assert_eq!(
        creators,
        vec![("Lee, Kim", Some("Universität Wien")), ("Roe, Max", None)]
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&bundle.manifest_path).expect("json"))
            .expect("parse");
    assert_eq!(json["metadata"]["doi"], "");
    assert!(json["metadata"].get("language").is_none());
}

#[test]
fn paired_bundle_is_named_after_pdf_and_reads_tei_title() {
    let ws = workspace();
    let assembler = BundleAssembler::new(options(&ws, true));
    let outcome = assembler
        .assemble(&record(), &assignment(true), 1)
        .expect("assemble");
    let bundle = outcome.bundle().expect("bundle");

    assert_eq!(bundle.name, "001_final_LEE_Kim_Netzwerke");
    assert_eq!(bundle.xml_title.as_deref(), Some("Netzwerke der Moderne"));
    assert_eq!(read_bundle(&bundle.directory).expect("layout").publications.len(), 2);
    assert!(check_completeness(&ws.output_root, 2).expect("check").is_empty());

    let csv = ws.output_root.join("DHd2019.csv");
    write_audit_csv(&csv, &[AuditRow::new(&outcome, &assignment(true))], true).expect("csv");
    let text = fs::read_to_string(&csv).expect("read csv");
    assert!(text.contains("Netzwerke der Moderne,Netzwerke der Moderne,001_final-LEE_Kim_Netzwerke.pdf"));
}

#[test]
fn existing_bundle_is_skipped() {
    let ws = workspace();
    let assembler = BundleAssembler::new(options(&ws, false));
    assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("first");
    let outcome = assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("second");

    let AssemblyOutcome::Skipped { bundle_name, defect } = outcome else {
        panic!("existing bundle was overwritten");
    };
    assert_eq!(bundle_name, "bundle_001");
    assert_eq!(defect.kind, DefectKind::BundleExists);
}

#[test]
fn failed_copy_leaves_no_partial_bundle() {
    let ws = workspace();
    let mut gone = assignment(false);
    gone.matched_pdf = Some("002_final-ROE_Max_Verloren.pdf".to_string());
    let assembler = BundleAssembler::new(options(&ws, false));

    let err = assembler
        .assemble(&record(), &gone, 1)
        .expect_err("source pdf is missing");
    assert!(err.to_string().contains("002_final-ROE_Max_Verloren.pdf"), "{err}");
    assert!(!ws.output_root.join("bundle_001").exists());

    let outcome = assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("retry");
    assert!(matches!(outcome, AssemblyOutcome::Created { .. }));
}

#[test]
fn dry_run_writes_nothing() {
    let ws = workspace();
    let mut opts = options(&ws, false);
    opts.dry_run = true;
    let outcome = BundleAssembler::new(opts)
        .assemble(&record(), &assignment(false), 3)
        .expect("plan");
    assert!(matches!(outcome, AssemblyOutcome::Planned { .. }));
    assert_eq!(outcome.bundle_name(), "bundle_003");
    assert!(!ws.output_root.exists());
}

#[test]
fn incomplete_bundles_are_reported() {
    let ws = workspace();
    let mut missing_pdf = assignment(false);
    missing_pdf.matched_pdf = None;
    let assembler = BundleAssembler::new(options(&ws, false));
    assembler
        .assemble(&record(), &assignment(false), 1)
        .expect("first");
    assembler
        .assemble(&record(), &missing_pdf, 2)
        .expect("second");

    let defects = check_completeness(&ws.output_root, 1).expect("check");
    assert_eq!(defects.len(), 1);
    assert_eq!(defects[0].kind, DefectKind::WrongFileCount);
    assert_eq!(defects[0].subject, "bundle_002");
}
