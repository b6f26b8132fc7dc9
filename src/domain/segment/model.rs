use serde::{Deserialize, Serialize};

/// One unit of narration: an original English sentence, its Portuguese
/// translation, and a pronunciation guide spelled with PT-BR sounds.
///
/// Produced once by the segment provider; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub original: String,
    pub translation: String,
    pub phonetic: String,
}

/// A processed document: the ordered playlist of segments for one reading
/// session, plus the document title for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedText {
    pub title: String,
    pub segments: Vec<TextSegment>,
}

impl ProcessedText {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
