//! Accent Reader — narration core for an English → PT-BR pronunciation tutor.
//!
//! An external provider turns an uploaded English document into sentence-level
//! segments (original text, Portuguese translation, phonetic rendering). This
//! crate owns what happens next: the narration sequencer drives a
//! speech-synthesis capability through the segments one at a time, tracks
//! which segment is active so the presentation layer can highlight it, and
//! handles play / stop / seek / teardown without ever letting a stale engine
//! callback resurrect playback.

pub mod domain;
pub mod error;
pub mod infrastructure;
