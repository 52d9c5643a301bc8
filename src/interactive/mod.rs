//! Interactive visualization module for real-time lighting testing

mod viewer;

pub use viewer::{InteractiveViewer, ViewerConfig};
