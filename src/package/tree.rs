//! Join flat chapter, section and question records into a nested package.

use std::collections::HashMap;

use crate::error::{PackageError, Result};
use crate::models::{
  NestedPackage, PackageChapter, PackageSection, RawDocument, RawQuestion, RawSection, RecordKey,
};
use crate::package::question::transform_question;
use crate::text::PathRewrite;

/// Builds nested packages, rewriting asset paths with the configured prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder<'a> {
  rewrite: PathRewrite<'a>,
}

impl<'a> TreeBuilder<'a> {
  /// Create a builder that applies the given path rewrite to question text.
  pub fn new(rewrite: PathRewrite<'a>) -> Self {
    Self { rewrite }
  }

  /// Join the flat records of `document` into a nested package.
  ///
  /// Chapters, sections and questions keep their input order. Sections or questions pointing
  /// at keys that never appear are silently left out.
  pub fn build(&self, document: &RawDocument) -> Result<NestedPackage> {
    let book = document.book.as_ref().ok_or(PackageError::MissingBook)?;

    let sections_by_chapter = group_sections(&document.sections);
    let questions_by_section = group_questions(&document.questions)?;

    let chapters = document
      .chapters
      .iter()
      .map(|chapter| {
        let sections = sections_by_chapter
          .get(&chapter.id)
          .map(Vec::as_slice)
          .unwrap_or_default()
          .iter()
          .map(|section| PackageSection {
            title: section.title.clone(),
            questions: questions_by_section
              .get(&section.id)
              .map(Vec::as_slice)
              .unwrap_or_default()
              .iter()
              .map(|question| transform_question(question, &self.rewrite))
              .collect(),
          })
          .collect();

        PackageChapter {
          title: chapter.title.clone(),
          sections,
        }
      })
      .collect();

    Ok(NestedPackage {
      subject_name_zh: book.subject_name_zh.clone(),
      subject_name_en: book.subject_name_en.clone(),
      chapters,
    })
  }
}

/// Build a nested package using the default `assets/images/` → `images/` rewrite.
pub fn build_package(document: &RawDocument) -> Result<NestedPackage> {
  TreeBuilder::default().build(document)
}

fn group_sections(sections: &[RawSection]) -> HashMap<&RecordKey, Vec<&RawSection>> {
  let mut grouped: HashMap<&RecordKey, Vec<&RawSection>> = HashMap::new();
  for section in sections {
    grouped.entry(&section.chapter_id).or_default().push(section);
  }
  grouped
}

fn group_questions(questions: &[RawQuestion]) -> Result<HashMap<&RecordKey, Vec<&RawQuestion>>> {
  let mut grouped: HashMap<&RecordKey, Vec<&RawQuestion>> = HashMap::new();
  for (index, question) in questions.iter().enumerate() {
    let section_id = question
      .section_id
      .as_ref()
      .ok_or(PackageError::MissingSectionId { index })?;
    grouped.entry(section_id).or_default().push(question);
  }
  Ok(grouped)
}
