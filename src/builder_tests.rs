use super::*;
use crate::templates::Templates;
use tempfile::TempDir;

struct Workspace {
    _dir: TempDir,
    uploads: PathBuf,
    output: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("create temp dir");
    let uploads = dir.path().join("uploads");
    let output = dir.path().join("generated_app");
    fs::create_dir_all(&uploads).expect("create uploads");
    Workspace {
        _dir: dir,
        uploads,
        output,
    }
}

fn upload(ws: &Workspace, name: &str, bytes: &[u8]) {
    fs::write(ws.uploads.join(name), bytes).expect("write upload");
}

fn run_with(templates: &Templates, ws: &Workspace) -> Summary {
    match Builder::new(templates, vec![Encoding::Utf8]).run(&ws.uploads, &ws.output) {
        BuildOutcome::Summary(summary) => summary,
        BuildOutcome::Error { error } => panic!("build failed: {error}"),
    }
}

fn run(ws: &Workspace) -> Summary {
    run_with(&Templates::builtin(), ws)
}

fn read(ws: &Workspace, rel: &str) -> String {
    fs::read_to_string(ws.output.join(rel)).expect("read output file")
}

#[test]
fn sales_module_produces_chart_files() {
    let ws = workspace();
    upload(&ws, "metrics.txt", b"Module: Sales\nrevenue at 120.5\ncost at 30\n");

    let summary = run(&ws);
    assert_eq!(summary.folders_created, vec!["charts"]);
    assert_eq!(
        summary.files_written,
        vec!["charts/Sales_chart.html", "charts/Sales_spec.txt"]
    );
    assert_eq!(
        read(&ws, "charts/Sales_spec.txt"),
        "Sales chart data:\nrevenue: 120.5\ncost: 30.0"
    );
    assert!(!read(&ws, "charts/Sales_chart.html").is_empty());
}

#[test]
fn shop_module_produces_store_files() {
    let ws = workspace();
    upload(&ws, "store.txt", b"Module: Shop\nalice assigns bot1 with 50 credits\n");

    let summary = run(&ws);
    assert_eq!(summary.folders_created, vec!["store"]);
    assert_eq!(
        read(&ws, "store/Shop_spec.txt"),
        "Shop bot assignments:\nalice → bot1: 50 credits"
    );
    assert!(ws.output.join("store/Shop_store.html").is_file());
    assert!(ws.output.join("store/Shop_logic.py").is_file());
}

#[test]
fn empty_uploads_write_placeholder_readme() {
    let ws = workspace();
    let summary = run(&ws);
    assert!(summary.folders_created.is_empty());
    assert_eq!(summary.files_written, vec!["README.txt"]);
    assert_eq!(
        read(&ws, "README.txt"),
        "No specs found.\nAdd files to uploads/ and re-run."
    );
    assert!(ws.output.join(INDEX_REL).is_file());
    assert!(ws.output.join(LAYOUT_REL).is_file());
}

#[test]
fn missing_uploads_dir_is_created() {
    let ws = workspace();
    fs::remove_dir(&ws.uploads).expect("remove uploads");

    let summary = run(&ws);
    assert!(ws.uploads.is_dir());
    assert_eq!(summary.files_written, vec!["README.txt"]);
    assert!(summary.uploads.is_absolute());
    assert!(summary.output.is_absolute());
}

#[test]
fn unsupported_and_undecodable_uploads_are_skipped() {
    let ws = workspace();
    upload(&ws, "report.pdf", b"%PDF-1.4");
    upload(&ws, "broken.txt", &[0x66, 0xFF, 0xFE, 0x6F]);
    upload(&ws, "metrics.txt", b"Module: Sales\nrevenue at 1\n");

    let summary = run(&ws);
    assert_eq!(summary.folders_created, vec!["charts"]);
    let skipped: Vec<_> = summary.skipped.iter().map(|s| s.path.as_str()).collect();
    assert_eq!(skipped.len(), 2);
    assert!(skipped[0].ends_with("broken.txt"));
    assert!(skipped[1].ends_with("report.pdf"));
    assert!(summary.skipped[1].reason.contains("pdf"));
}

#[test]
fn layout_snapshot_is_stable_across_runs() {
    let ws = workspace();
    upload(&ws, "a.txt", b"Module: A\nx at 1\n");
    upload(&ws, "b.py", b"print('hi')\n");
    upload(&ws, "c.html", b"<p>hi</p>\n");

    run(&ws);
    let first = read(&ws, LAYOUT_REL);
    run(&ws);
    let second = read(&ws, LAYOUT_REL);
    assert_eq!(first, second);

    let layout: Layout = serde_json::from_str(&first).expect("parse layout.json");
    assert_eq!(layout.folders, vec!["charts", "scripts", "custom_html"]);
    assert_eq!(layout.files["scripts/manual_upload.py"], "print('hi')\n");
}

#[test]
fn existing_index_is_kept_without_custom_template() {
    let ws = workspace();
    fs::create_dir_all(&ws.output).expect("create output");
    fs::write(ws.output.join(INDEX_REL), "mine").expect("write index");

    run(&ws);
    assert_eq!(read(&ws, INDEX_REL), "mine");
}

#[test]
fn custom_index_template_renders_layout() {
    let ws = workspace();
    upload(&ws, "a.txt", b"Module: A\nx at 1\n");
    fs::create_dir_all(&ws.output).expect("create output");
    fs::write(ws.output.join(INDEX_REL), "stale").expect("write index");

    let mut templates = Templates::builtin();
    templates.insert(INDEX_TEMPLATE, "folders={{ folders | json }}".to_string());
    run_with(&templates, &ws);
    assert_eq!(read(&ws, INDEX_REL), r#"folders=["charts"]"#);
}

#[test]
fn render_failure_becomes_error_outcome() {
    let ws = workspace();
    upload(&ws, "a.txt", b"Module: A\nx at 1\n");
    let mut templates = Templates::builtin();
    templates.insert(crate::templates::CHART_TEMPLATE, "{{ nope }}".to_string());

    let outcome = Builder::new(&templates, vec![Encoding::Utf8]).run(&ws.uploads, &ws.output);
    match outcome {
        BuildOutcome::Error { error } => assert!(error.contains("nope")),
        BuildOutcome::Summary(_) => panic!("expected error outcome"),
    }
}

#[test]
fn unwritable_output_root_becomes_error_outcome() {
    let ws = workspace();
    let blocker = ws.uploads.join("not_a_dir.bin");
    fs::write(&blocker, b"x").expect("write blocker");

    let outcome =
        Builder::new(&Templates::builtin(), vec![Encoding::Utf8]).run(&ws.uploads, &blocker.join("out"));
    assert!(outcome.is_error());
    let json = serde_json::to_value(&outcome).expect("serialize outcome");
    assert!(json.get("error").and_then(|v| v.as_str()).is_some());
}

#[test]
fn module_names_cannot_escape_output_dir() {
    let ws = workspace();
    upload(&ws, "evil.txt", b"Module: ../../escaped\nx at 1\n");
    upload(&ws, "good.txt", b"Module: Good\ny at 2\n");

    let summary = run(&ws);
    assert_eq!(
        summary.files_written,
        vec!["charts/Good_chart.html", "charts/Good_spec.txt"]
    );
    let parent = ws.output.parent().expect("output has a parent");
    assert!(!parent.join("escaped_chart.html").exists());
    assert!(!parent.join("escaped_spec.txt").exists());

    let layout: Layout = serde_json::from_str(&read(&ws, LAYOUT_REL)).expect("parse layout.json");
    assert!(layout.files.contains_key("charts/../../escaped_spec.txt"));
}

#[test]
fn failed_file_write_does_not_block_siblings() {
    let ws = workspace();
    upload(&ws, "a.txt", b"Module: A\nx at 1\n");
    fs::create_dir_all(ws.output.join("charts/A_chart.html")).expect("create blocking dir");

    let summary = run(&ws);
    assert_eq!(summary.folders_created, vec!["charts"]);
    assert_eq!(summary.files_written, vec!["charts/A_spec.txt"]);
    assert!(ws.output.join(LAYOUT_REL).is_file());
}

#[test]
fn failed_folder_is_not_reported_as_created() {
    let ws = workspace();
    upload(&ws, "a.txt", b"Module: A\nx at 1\n");
    upload(&ws, "b.py", b"print('hi')\n");
    fs::create_dir_all(&ws.output).expect("create output");
    fs::write(ws.output.join("charts"), b"not a dir").expect("write blocking file");

    let summary = run(&ws);
    assert_eq!(summary.folders_created, vec!["scripts"]);
    assert_eq!(summary.files_written, vec!["scripts/manual_upload.py"]);
    assert!(ws.output.join(LAYOUT_REL).is_file());
}
