//! glbview - drag-and-drop glTF/GLB viewer.
//!
//! `intake` turns picked or dropped files into resource handles, `viewer`
//! owns the displayed asset and drives an embeddable render widget through a
//! narrow trait, and `app` is the eframe shell around both.

mod app;
mod intake;
mod viewer;

fn main() -> eframe::Result {
    app::run()
}
