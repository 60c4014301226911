//! CSV export of reward curves

use std::{fs::File, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Result, pipeline::TrainingResult};

/// A single row in the reward curve CSV export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardCurveRecord {
    pub episode: usize,
    pub reward: f64,
    pub reward_avg50: f64,
}

/// Exporter for per-episode reward curves
pub struct RewardCurveExporter;

impl RewardCurveExporter {
    /// One record per episode of a training result
    pub fn records(result: &TrainingResult) -> Vec<RewardCurveRecord> {
        result
            .reward_history
            .iter()
            .zip(&result.reward_averaged)
            .enumerate()
            .map(|(episode, (&reward, &reward_avg50))| RewardCurveRecord {
                episode,
                reward,
                reward_avg50,
            })
            .collect()
    }

    /// Write the curve as CSV to any writer
    pub fn write<W: Write>(writer: W, result: &TrainingResult) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in Self::records(result) {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Export the curve to a CSV file
    pub fn export_to_file<P: AsRef<Path>>(path: P, result: &TrainingResult) -> Result<usize> {
        let file = File::create(path)?;
        Self::write(file, result)?;
        Ok(result.reward_history.len())
    }
}
