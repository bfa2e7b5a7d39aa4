use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use quiz_packager::{ConversionContext, PackageFormat, PackagerConfig, QuizPackager};
use serde_json::{Value, json};
use zip::ZipArchive;

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> String {
  let mut contents = String::new();
  archive
    .by_name(name)
    .expect("missing archive entry")
    .read_to_string(&mut contents)
    .expect("archive entry is not UTF-8");
  contents
}

fn entry_names(archive: &ZipArchive<File>) -> BTreeSet<String> {
  archive.file_names().map(String::from).collect()
}

fn packager<'a>(config: &'a PackagerConfig, assets: &'a Path, output: &'a Path) -> QuizPackager<'a> {
  QuizPackager::new(ConversionContext {
    layout: config.to_layout(),
    assets_dir: assets,
    output_dir: output,
    format: config.format,
  })
  .expect("default configuration is valid")
}

#[test]
fn physics_export_becomes_archive() -> Result<(), Box<dyn std::error::Error>> {
  let temp = tempfile::tempdir()?;
  let input_dir = temp.path().join("input");
  let assets_dir = input_dir.join("assets/images");
  let output_dir = temp.path().join("output");
  fs::create_dir_all(&assets_dir)?;
  fs::write(assets_dir.join("diagram_1.png"), b"png-bytes")?;

  let export = json!({
    "book": {"subject_name_en": "physics", "subject_name_zh": "物理"},
    "chapters": [{"id": 1, "title": "Ch1"}],
    "sections": [{"id": 10, "chapter_id": 1, "title": "Sec1"}],
    "questions": [
      {"section_id": 10, "content": "What is \\alphag?", "explanation": ""},
      {
        "section_id": 10,
        "content": "<img src=\"assets/images/diagram_1.png\"> Range $10~13$",
        "explanation": "see assets/images/missing.gif",
        "choices": [{"key": "A", "text": "$\\thetax$"}],
        "answer": "A"
      }
    ]
  });
  let input = input_dir.join("physics.json");
  fs::write(&input, serde_json::to_string(&export)?)?;

  let config = PackagerConfig::default();
  let report = packager(&config, &assets_dir, &output_dir).convert_file(&input)?;

  assert_eq!(report.output_path, output_dir.join("physics.zip"));
  assert_eq!(report.referenced_assets, 2);
  assert_eq!(report.image_count, 1);
  assert_eq!(report.missing_assets, vec![assets_dir.join("missing.gif")]);
  assert_eq!(report.stats.questions, 2);

  let mut archive = ZipArchive::new(File::open(&report.output_path)?)?;
  assert_eq!(
    entry_names(&archive),
    BTreeSet::from(["data.json".to_string(), "images/diagram_1.png".to_string()])
  );

  let data = read_entry(&mut archive, "data.json");
  assert!(data.contains("物理"), "non-ASCII text must be written literally");
  let data: Value = serde_json::from_str(&data)?;

  let questions = &data["chapters"][0]["sections"][0]["questions"];
  assert_eq!(questions[0], json!({"content": "What is \\alpha g?", "explanation": ""}));
  assert_eq!(
    questions[1]["content"],
    json!("<img src=\"images/diagram_1.png\"> Range $10 \\sim 13$")
  );
  assert_eq!(questions[1]["explanation"], json!("see images/missing.gif"));
  assert_eq!(questions[1]["choices"], json!([{"key": "A", "html": "$\\theta x$"}]));
  assert_eq!(questions[1]["answer"], json!("A"));

  let leftovers: Vec<_> = fs::read_dir(&output_dir)?
    .flatten()
    .map(|entry| entry.file_name().to_string_lossy().to_string())
    .collect();
  assert_eq!(leftovers, vec!["physics.zip".to_string()]);
  Ok(())
}

#[test]
fn nested_questions_survive_the_round_trip() -> Result<(), Box<dyn std::error::Error>> {
  let temp = tempfile::tempdir()?;
  let output_dir = temp.path().join("output");
  fs::create_dir_all(&output_dir)?;

  let document = serde_json::from_value(json!({
    "book": {"subject_name_en": "reading", "subject_name_zh": "阅读"},
    "chapters": [{"id": "c", "title": "Passages"}, {"id": "empty", "title": "Empty"}],
    "sections": [{"id": "s", "chapter_id": "c", "title": "Passage 1"}],
    "questions": [{
      "section_id": "s",
      "content": "Read the passage.",
      "children": [
        {"content": "Q1", "choices": [{"key": "A", "html": "yes"}], "answer": "A"},
        {"content": "Q2", "choices": []}
      ]
    }]
  }))?;

  let config = PackagerConfig::default();
  let report = packager(&config, temp.path(), &output_dir).convert_document(&document)?;
  assert_eq!(report.image_count, 0);

  let mut archive = ZipArchive::new(File::open(&report.output_path)?)?;
  assert_eq!(entry_names(&archive), BTreeSet::from(["data.json".to_string()]));
  let data: Value = serde_json::from_str(&read_entry(&mut archive, "data.json"))?;

  assert_eq!(data["chapters"][1]["sections"], json!([]));
  let parent = &data["chapters"][0]["sections"][0]["questions"][0];
  assert!(parent.get("choices").is_none());
  assert_eq!(
    parent["questions"],
    json!([
      {"content": "Q1", "explanation": "", "choices": [{"key": "A", "html": "yes"}], "answer": "A"},
      {"content": "Q2", "explanation": ""}
    ])
  );
  Ok(())
}

#[test]
fn json_mode_writes_plain_package() -> Result<(), Box<dyn std::error::Error>> {
  let temp = tempfile::tempdir()?;
  let input = temp.path().join("chemistry.json");
  fs::write(
    &input,
    r#"{"book": {"subject_name_en": "chemistry", "subject_name_zh": "化学"}, "questions": []}"#,
  )?;
  let output_dir = temp.path().join("json");

  let config = PackagerConfig {
    format: PackageFormat::Json,
    ..PackagerConfig::default()
  };
  let report = packager(&config, temp.path(), &output_dir).convert_file(&input)?;

  assert_eq!(report.output_path, output_dir.join("chemistry.json"));
  let written = fs::read_to_string(&report.output_path)?;
  assert_eq!(
    written,
    "{\n  \"subject_name_zh\": \"化学\",\n  \"subject_name_en\": \"chemistry\",\n  \"chapters\": []\n}"
  );
  Ok(())
}
