//! JSON coefficient files.
//!
//! ```json
//! { "order": 2, "channels": { "red": [...], "green": [...], "blue": [...], "alpha": [...] } }
//! ```
//!
//! Each channel lists the coefficients in `l·(l+1) + m` order. `alpha` is
//! written only for four-channel pixels.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::coefficients::{order_of_len, ShCoefficients};
use crate::core::{Pixel, Real};

/// Errors raised while reading or writing a coefficient file.
#[derive(Debug, Error)]
pub enum CoefficientFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed coefficient file: {0}")]
    Malformed(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct CoefficientFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<u32>,
    channels: ChannelTable,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChannelTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    red: Option<Vec<Real>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    green: Option<Vec<Real>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blue: Option<Vec<Real>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alpha: Option<Vec<Real>>,
}

impl ChannelTable {
    fn in_order(&self) -> [Option<&Vec<Real>>; 4] {
        [
            self.red.as_ref(),
            self.green.as_ref(),
            self.blue.as_ref(),
            self.alpha.as_ref(),
        ]
    }
}

/// Serialize coefficients to a JSON document.
pub fn to_json_string<P: Pixel>(coefficients: &ShCoefficients<P>) -> Result<String, CoefficientFileError> {
    let channel = |c: usize| -> Option<Vec<Real>> {
        (c < P::CHANNELS).then(|| coefficients.as_slice().iter().map(|p| p.channel(c)).collect())
    };
    let file = CoefficientFile {
        order: Some(coefficients.order()),
        channels: ChannelTable {
            red: channel(0),
            green: channel(1),
            blue: channel(2),
            alpha: channel(3),
        },
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse coefficients from a JSON document.
///
/// Missing channels read as zero. Channels beyond the pixel type are ignored.
/// Valid JSON that does not fit the schema is [`CoefficientFileError::Malformed`].
pub fn from_json_str<P: Pixel>(json: &str) -> Result<ShCoefficients<P>, CoefficientFileError> {
    let file: CoefficientFile = serde_json::from_str(json).map_err(|err| {
        if err.is_data() {
            CoefficientFileError::Malformed(err.to_string())
        } else {
            CoefficientFileError::Json(err)
        }
    })?;
    let channels = file.channels.in_order();

    let mut len = None;
    for values in channels.iter().flatten() {
        match len {
            None => len = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(CoefficientFileError::Malformed(format!(
                    "channels have different lengths ({expected} and {})",
                    values.len()
                )));
            }
            Some(_) => {}
        }
    }
    let len = match len {
        Some(len) if len > 0 => len,
        _ => {
            return Err(CoefficientFileError::Malformed(
                "no coefficient channel present".to_string(),
            ))
        }
    };

    let order = order_of_len(len);
    match file.order {
        Some(declared) if declared != order => {
            return Err(CoefficientFileError::Malformed(format!(
                "order {declared} does not match {len} coefficients"
            )));
        }
        Some(_) => {}
        None => warn!("coefficient file has no order, using {order} from the channel length"),
    }

    let values = (0..len)
        .map(|i| {
            let mut pixel = [0.0; 4];
            for (value, channel) in pixel.iter_mut().zip(&channels) {
                *value = channel.map_or(0.0, |values| values[i]);
            }
            P::from_channels(&pixel[..P::CHANNELS])
        })
        .collect();
    ShCoefficients::from_vec(values).map_err(|err| CoefficientFileError::Malformed(err.to_string()))
}

/// Write coefficients to `path` as JSON.
pub fn write_coefficients<P: Pixel>(path: &Path, coefficients: &ShCoefficients<P>) -> Result<(), CoefficientFileError> {
    fs::write(path, to_json_string(coefficients)?)?;
    Ok(())
}

/// Read coefficients from a JSON file at `path`.
pub fn read_coefficients<P: Pixel>(path: &Path) -> Result<ShCoefficients<P>, CoefficientFileError> {
    from_json_str(&fs::read_to_string(path)?)
}
