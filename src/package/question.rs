//! Recursive reshaping of flat question records.

use crate::models::{ChoiceBlock, PackagedChoice, PackagedQuestion, QuestionShape, RawQuestion};
use crate::text::{PathRewrite, clean_text};

/// Transform a question and its sub-questions into the package format.
///
/// Text fields are cleaned, options are renamed to `{key, html}` and `children` (or, failing
/// that, `questions`) become nested packaged questions.
pub fn transform_question(question: &RawQuestion, rewrite: &PathRewrite<'_>) -> PackagedQuestion {
  let choices = transform_choices(question, rewrite);

  let source_children = if !question.children.is_empty() {
    &question.children
  } else {
    &question.questions
  };
  let sub_questions: Vec<PackagedQuestion> = source_children
    .iter()
    .map(|child| transform_question(child, rewrite))
    .collect();

  let shape = match (choices, sub_questions.is_empty()) {
    (None, true) => QuestionShape::Leaf,
    (Some(block), true) => QuestionShape::MultipleChoice(block),
    (choices, false) => QuestionShape::Composite {
      choices,
      questions: sub_questions,
    },
  };

  PackagedQuestion {
    content: clean_text(&question.content, rewrite),
    explanation: clean_text(&question.explanation, rewrite),
    shape,
  }
}

fn transform_choices(question: &RawQuestion, rewrite: &PathRewrite<'_>) -> Option<ChoiceBlock> {
  if question.choices.is_empty() {
    return None;
  }

  let choices = question
    .choices
    .iter()
    .map(|choice| PackagedChoice {
      key: choice.key.clone(),
      html: clean_text(choice.display_text(), rewrite),
    })
    .collect();

  Some(ChoiceBlock {
    choices,
    answer: question.answer.clone(),
  })
}
