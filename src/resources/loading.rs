use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use failure::ResultExt;
use log::info;

use crate::errors::*;
use crate::resources::stemmer::{LancasterStemmer, StemOverrides, Stemmer};

/// Loads the stemmer shared by vocabulary building and utterance encoding.
///
/// A stem overrides table, when provided, is consulted before the Lancaster
/// rules.
pub fn load_stemmer<P: AsRef<Path>>(overrides_path: Option<P>) -> Result<Arc<dyn Stemmer>> {
    if let Some(overrides_path) = overrides_path {
        let overrides_path = overrides_path.as_ref();
        info!("Loading stem overrides ({:?}) ...", overrides_path);
        let overrides_reader = File::open(overrides_path)
            .with_context(|_| format!("Cannot open stem overrides file {:?}", overrides_path))?;
        let stemmer = StemOverrides::from_reader(overrides_reader)
            .with_context(|_| format!("Invalid stem overrides file {:?}", overrides_path))?;
        info!("Stem overrides loaded ({} words)", stemmer.len());
        Ok(Arc::new(stemmer))
    } else {
        info!("Using Lancaster stemmer");
        Ok(Arc::new(LancasterStemmer))
    }
}
