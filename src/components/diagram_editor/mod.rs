mod codec;
mod component;
mod config;
mod dialogs;
mod geometry;
mod model;
mod render;
mod state;
mod types;

pub use component::DiagramEditorCanvas;
