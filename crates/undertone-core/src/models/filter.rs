//! Color-correction filter descriptor

use serde::{Deserialize, Serialize};

/// Affine transform of one output channel.
///
/// `output = clamp(0, 255, r*R + g*G + b*B + offset*255)` where R,G,B are the
/// input channel values of the pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelCoefficients {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
    pub offset: f64,
}

impl ChannelCoefficients {
    pub fn zero() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
            offset: 0.0,
        }
    }
}

/// One set of channel coefficients per output channel.
///
/// The red channel typically mixes all three input channels; green and blue
/// use only their own channel. The alpha coefficients exist for schema
/// completeness but are never consumed: the applicator always copies alpha
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub red: ChannelCoefficients,
    pub green: ChannelCoefficients,
    pub blue: ChannelCoefficients,
    pub alpha: ChannelCoefficients,
}

impl FilterDescriptor {
    /// Descriptor that leaves every channel unchanged.
    pub fn identity() -> Self {
        Self {
            red: ChannelCoefficients {
                r: 1.0,
                ..ChannelCoefficients::zero()
            },
            green: ChannelCoefficients {
                g: 1.0,
                ..ChannelCoefficients::zero()
            },
            blue: ChannelCoefficients {
                b: 1.0,
                ..ChannelCoefficients::zero()
            },
            alpha: ChannelCoefficients {
                a: 1.0,
                ..ChannelCoefficients::zero()
            },
        }
    }
}
