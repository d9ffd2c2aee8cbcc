//! # Ridership Data
//!
//! Daily metro traffic tables, by station and by line, read from CSV or
//! Parquet with polars and turned into forecastable series.
//!
//! ```no_run
//! use ridership_data::{DatasetSelection, RidershipDataset, TrainingWindow};
//!
//! let dataset = RidershipDataset::load("data")?;
//! let series = dataset.series(&DatasetSelection::Line("A".to_string()))?;
//! let recent = TrainingWindow::LastDays(730).apply(&series)?;
//! # Ok::<(), ridership_data::DataLoadError>(())
//! ```

pub mod dataset;
pub mod error;
pub mod loader;
pub mod window;

pub use crate::dataset::{DatasetSelection, RidershipDataset};
pub use crate::error::{DataLoadError, Result};
pub use crate::loader::{DataLoader, RidershipRecord};
pub use crate::window::TrainingWindow;
