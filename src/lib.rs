//! Interactive core of the sign builder.
//!
//! This crate owns the editable model behind the in-browser sign designer:
//! the two-sided scene of placed objects on a physical canvas measured in
//! inches, the pointer/keyboard gesture state machine that moves, resizes and
//! rotates them, alignment snapping, bounded undo/redo, and proportional
//! rescaling when the canvas size changes. It never draws and never talks to
//! the network; the presentation layer feeds it events and reads back
//! [`engine::Action`]s, [`overlay::Overlay`] geometry and
//! [`doc::DesignData`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | State owner [`engine::EngineCore`]: CRUD, history, gestures, keyboard |
//! | [`command`] | Serializable [`command::EditorCommand`] and headless replay |
//! | [`doc`] | Objects, type payloads, per-side store and two-sided scene |
//! | [`geometry`] | Inch/pixel conversion, rotation and the view camera |
//! | [`hit`] | Handle placement and pointer hit-testing |
//! | [`input`] | Modifier/key types and the gesture state machine |
//! | [`gesture`] | Pure drag, resize, rotate and canvas-grip pose math |
//! | [`snap`] | Alignment guides and snapping |
//! | [`history`] | Bounded undo/redo of scene snapshots |
//! | [`rescale`] | Proportional rescale on canvas resize |
//! | [`overlay`] | Ruler, grid, snap-line and selection pixel geometry |
//! | [`presets`] | Default objects inserted from the sidebar |
//! | [`template`] | Template documents and catalogs |
//! | [`config`] | Environment-driven [`config::EditorConfig`] |
//! | [`consts`] | Shared numeric constants |

pub mod command;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod hit;
pub mod input;
pub mod overlay;
pub mod presets;
pub mod rescale;
pub mod snap;
pub mod template;
