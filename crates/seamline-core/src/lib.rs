//! Seamline Core Library
//!
//! Platform-agnostic data model and editing logic for the Seamline
//! pattern-drafting canvas: scene elements, the pointer state machine,
//! undo/redo history, shape recognition and symmetry replication.

pub mod blocks;
pub mod camera;
pub mod editor;
pub mod element;
pub mod history;
pub mod input;
pub mod measurements;
pub mod recognize;
pub mod scene;
pub mod services;
pub mod snap;
pub mod symmetry;

pub use camera::Camera;
pub use editor::{Editor, Tool, TransformHandle, handle_positions, hit_handle};
pub use element::{Element, ElementId, ElementKind, ElementStyle, Layer, NodeId, PathNode};
pub use history::{History, MAX_HISTORY};
pub use input::{Modifiers, MouseButton, PointerEvent};
pub use measurements::Measurements;
pub use recognize::{RecognizedShape, recognize};
pub use scene::{Scene, SceneSnapshot, selection_bounds};
pub use snap::{GRID_SIZE, snap_point, snap_to_grid};
pub use symmetry::SymmetryMode;
