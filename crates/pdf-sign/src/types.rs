use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Failed to load PDF: {0}")]
    DocumentLoad(String),
    #[error("Failed to load signature image: {0}")]
    SignatureLoad(#[source] image::ImageError),
    #[error("No PDF document is loaded")]
    NoDocument,
    #[error("No signature image is loaded")]
    NoSignature,
    #[error("No active signature to place")]
    NoActivePlacement,
    #[error("Place at least one signature before exporting")]
    EmptyLedger,
    #[error("Page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("Failed to write output: {0}")]
    ExportIo(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SignError>;

/// Page size in PDF points, with the media box origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Lower-left x of the media box
    pub origin_x: f32,
    /// Lower-left y of the media box
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
        }
    }
}

/// Parameters for the background-removal filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessingParams {
    /// Pixels brighter than this become transparent (150..=255)
    pub brightness_threshold: u8,
    /// Grey-ish pixels below this saturation become transparent (10..=100)
    pub saturation_threshold: u8,
    /// Median + smoothing pass over the result
    pub smooth: bool,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            brightness_threshold: 190,
            saturation_threshold: 50,
            smooth: true,
        }
    }
}

impl ProcessingParams {
    pub fn validate(&self) -> Result<()> {
        if self.brightness_threshold < 150 {
            return Err(SignError::Config(format!(
                "Brightness threshold must be in 150..=255, got {}",
                self.brightness_threshold
            )));
        }
        if !(10..=100).contains(&self.saturation_threshold) {
            return Err(SignError::Config(format!(
                "Saturation threshold must be in 10..=100, got {}",
                self.saturation_threshold
            )));
        }
        Ok(())
    }
}

/// Summary of a completed export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    /// Number of signatures stamped
    pub placements: usize,
    /// Zero-based indices of the pages that received an overlay
    pub pages_touched: Vec<usize>,
    pub path: std::path::PathBuf,
}

/// Snapshot of session state for status reporting
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStatus {
    pub file_name: Option<String>,
    pub current_page: usize,
    pub page_count: usize,
    pub placements_on_page: usize,
    pub total_placements: usize,
    pub has_active: bool,
    pub zoom_percent: u32,
}
