//! Records read from flat quiz-bank exports and the nested package written for the quiz client.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Foreign key joining chapters, sections and questions.
///
/// Keys are opaque scalars and only match when they are the same JSON value, so `1` and `"1"`
/// stay apart. An explicit `null` is a key like any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecordKey {
  /// Explicit `null`.
  Null,
  /// Boolean identifier.
  Bool(bool),
  /// Numeric identifier, kept exactly as written.
  Number(Number),
  /// Textual identifier.
  Text(String),
}

/// Flat export of a single subject, as produced by the quiz-bank tooling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
  /// Subject metadata. Required; conversion fails without it.
  #[serde(default)]
  pub book: Option<RawBook>,
  /// Chapters in display order.
  #[serde(default)]
  pub chapters: Vec<RawChapter>,
  /// Sections referencing chapters through `chapter_id`.
  #[serde(default)]
  pub sections: Vec<RawSection>,
  /// Questions referencing sections through `section_id`.
  #[serde(default)]
  pub questions: Vec<RawQuestion>,
}

/// Subject names identifying the package.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBook {
  /// Chinese display name.
  #[serde(default, deserialize_with = "null_as_default")]
  pub subject_name_zh: String,
  /// English name, also used for output file names.
  #[serde(default, deserialize_with = "null_as_default")]
  pub subject_name_en: String,
}

/// Flat chapter record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChapter {
  /// Chapter key referenced by sections.
  pub id: RecordKey,
  /// Chapter title.
  #[serde(default, deserialize_with = "null_as_default")]
  pub title: String,
}

/// Flat section record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
  /// Section key referenced by questions.
  pub id: RecordKey,
  /// Owning chapter.
  pub chapter_id: RecordKey,
  /// Section title.
  #[serde(default, deserialize_with = "null_as_default")]
  pub title: String,
}

/// Flat question record. Nested sub-questions reuse the same shape without a `section_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
  /// Owning section; only meaningful on top-level questions. `None` when the field is absent,
  /// `Some(RecordKey::Null)` when it is an explicit `null`.
  #[serde(default, deserialize_with = "present")]
  pub section_id: Option<RecordKey>,
  /// Question stem.
  #[serde(default, deserialize_with = "null_as_default")]
  pub content: String,
  /// Worked explanation.
  #[serde(default, deserialize_with = "null_as_default")]
  pub explanation: String,
  /// Answer options, if the question is multiple choice.
  #[serde(default, deserialize_with = "null_as_default")]
  pub choices: Vec<RawChoice>,
  /// Answer carried through verbatim, `null` included. Defaults to `""` when absent.
  #[serde(default = "empty_answer")]
  pub answer: Value,
  /// Sub-questions under their primary field name.
  #[serde(default, deserialize_with = "null_as_default")]
  pub children: Vec<RawQuestion>,
  /// Sub-questions under their alternate field name.
  #[serde(default, deserialize_with = "null_as_default")]
  pub questions: Vec<RawQuestion>,
}

/// Flat answer option. Exports populate either `text` or `html`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChoice {
  /// Option label, e.g. `A`.
  pub key: String,
  /// Display text under its primary field name.
  #[serde(default)]
  pub text: Option<String>,
  /// Display text under its alternate field name.
  #[serde(default)]
  pub html: Option<String>,
}

impl RawChoice {
  /// Display string for the option, preferring `text` over `html`.
  pub fn display_text(&self) -> &str {
    self
      .text
      .as_deref()
      .or(self.html.as_deref())
      .unwrap_or_default()
  }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de> + Default,
{
  Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// Only reached when the field is present, so `null` goes to `T` instead of becoming `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

fn empty_answer() -> Value {
  Value::String(String::new())
}

/// Nested package consumed by the quiz client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedPackage {
  /// Chinese display name.
  pub subject_name_zh: String,
  /// English name.
  pub subject_name_en: String,
  /// Chapters in input order.
  pub chapters: Vec<PackageChapter>,
}

/// Chapter with its sections attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageChapter {
  /// Chapter title.
  pub title: String,
  /// Sections in input order; empty when none reference the chapter.
  pub sections: Vec<PackageSection>,
}

/// Section with its questions attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSection {
  /// Section title.
  pub title: String,
  /// Questions in input order; empty when none reference the section.
  pub questions: Vec<PackagedQuestion>,
}

/// Question after text normalisation and reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct PackagedQuestion {
  /// Normalised stem.
  pub content: String,
  /// Normalised explanation.
  pub explanation: String,
  /// Choices and sub-questions attached to the stem.
  pub shape: QuestionShape,
}

/// Structural variants of a packaged question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionShape {
  /// Stem and explanation only.
  Leaf,
  /// Stem with answer options.
  MultipleChoice(ChoiceBlock),
  /// Stem grouping sub-questions, optionally with its own answer options.
  Composite {
    /// Stem-level options, present when the source carried both options and sub-questions.
    choices: Option<ChoiceBlock>,
    /// Sub-questions in input order. Never empty.
    questions: Vec<PackagedQuestion>,
  },
}

/// Answer options together with the answer they belong to.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceBlock {
  /// Options in input order. Never empty.
  pub choices: Vec<PackagedChoice>,
  /// Answer copied from the source record.
  pub answer: Value,
}

/// Answer option in the package format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagedChoice {
  /// Option label.
  pub key: String,
  /// Normalised display text.
  pub html: String,
}

impl PackagedQuestion {
  /// Options attached directly to this question.
  pub fn choice_block(&self) -> Option<&ChoiceBlock> {
    match &self.shape {
      QuestionShape::Leaf => None,
      QuestionShape::MultipleChoice(block) => Some(block),
      QuestionShape::Composite { choices, .. } => choices.as_ref(),
    }
  }

  /// Sub-questions of this question, empty for leaves and plain multiple choice.
  pub fn sub_questions(&self) -> &[PackagedQuestion] {
    match &self.shape {
      QuestionShape::Composite { questions, .. } => questions.as_slice(),
      _ => &[],
    }
  }
}

// Field order and absence rules are part of the client contract, so the map is written by hand.
impl Serialize for PackagedQuestion {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let block = self.choice_block();
    let questions = self.sub_questions();

    let mut len = 2;
    if block.is_some() {
      len += 2;
    }
    if !questions.is_empty() {
      len += 1;
    }

    let mut map = serializer.serialize_map(Some(len))?;
    map.serialize_entry("content", &self.content)?;
    map.serialize_entry("explanation", &self.explanation)?;
    if let Some(block) = block {
      map.serialize_entry("choices", &block.choices)?;
      map.serialize_entry("answer", &block.answer)?;
    }
    if !questions.is_empty() {
      map.serialize_entry("questions", questions)?;
    }
    map.end()
  }
}

/// Counts reported after a package has been built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageStats {
  /// Number of chapters.
  pub chapters: usize,
  /// Number of sections across all chapters.
  pub sections: usize,
  /// Number of top-level questions across all sections.
  pub questions: usize,
}

impl NestedPackage {
  /// Count chapters, sections and top-level questions.
  pub fn stats(&self) -> PackageStats {
    let sections = self.chapters.iter().flat_map(|chapter| &chapter.sections);
    PackageStats {
      chapters: self.chapters.len(),
      sections: sections.clone().count(),
      questions: sections.map(|section| section.questions.len()).sum(),
    }
  }
}
