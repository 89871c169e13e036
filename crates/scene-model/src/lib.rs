//! VidPrompt Scene Model
//!
//! Defines the core data contracts for VidPrompt Studio:
//! - **Timecode:** conversion between human-editable time strings,
//!   numeric seconds, and the SRT wire timestamp format
//! - **Scenes:** the narrated time-segment record, the editable field
//!   selector, and the ordered scene store
//!
//! Time strings are deliberately permissive (`HH:MM:SS`, `MM:SS`, or `SS`)
//! and are not validated at storage time; numeric interpretation happens at
//! the point of use (preview and export).

pub mod scene;
pub mod timecode;

pub use scene::*;
pub use timecode::*;
