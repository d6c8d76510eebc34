use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use failure::ResultExt;
use ndarray::prelude::*;
use serde::Serialize;

use crate::errors::*;

pub type IntentName = String;
pub type Token = String;

/// Index of the largest value, the first one winning on ties.
///
/// NaN values never win. Returns `None` for an empty distribution.
pub fn argmax(values: &ArrayView1<f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if !(*value > best_value) => {}
            _ if value.is_nan() => {}
            _ => best = Some((index, *value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Writes `value` as json, reporting errors of the final flush.
pub fn write_json_file<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|_| format!("Cannot create file {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|_| format!("Cannot serialize json into {:?}", path))?;
    writer
        .flush()
        .with_context(|_| format!("Cannot write file {:?}", path))?;
    Ok(())
}
