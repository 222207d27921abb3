//! Stamp a handwritten signature onto PDF pages.
//!
//! The crate covers the whole path from a photo of a signature to a signed
//! PDF: background removal and optional ink tint (`filter`, `pipeline`),
//! placement bookkeeping in page-relative coordinates (`layout`,
//! `placement`, `session`) and writing the overlays into the document
//! (`compose`).

pub mod asset;
pub mod cache;
pub mod compose;
pub mod constants;
pub mod debounce;
pub mod filter;
pub mod layout;
mod options;
pub mod pipeline;
pub mod placement;
pub mod render;
pub mod session;
mod types;

pub use asset::{CropSelection, SignatureAsset, crop_signature};
pub use compose::{load_pdf, read_pdf, save_pdf, sign_document, sign_in_place, write_pdf_atomic};
pub use layout::{
    EdgeScroll, PageLayout, PixelRect, PointRect, RelativeRect, ScrollDirection, ScrollPosition,
    Viewport,
};
pub use options::*;
pub use pipeline::SignaturePipeline;
pub use placement::{ActivePlacement, CommittedPlacement, PlacementLedger};
pub use render::{BlankPageRenderer, PageRaster, PageRenderer};
pub use session::{Confirm, SigningSession};
pub use types::*;
