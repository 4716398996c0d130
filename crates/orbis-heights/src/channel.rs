//! Pixel channels that can carry elevation, and the 8-bit HSV conversion
//! they rely on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HeightsError;

/// Which part of a pixel encodes elevation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Red component.
    R,
    /// Green component.
    G,
    /// Blue component.
    B,
    /// Mean of red, green and blue.
    Average,
    /// HSV hue.
    Hue,
    /// HSV saturation.
    Sat,
    /// HSV value (brightness).
    #[default]
    Val,
    /// Palette maps: distinct colors ranked by hue, then value.
    Color,
}

impl Channel {
    /// Every channel, in declaration order.
    pub const ALL: [Channel; 8] = [
        Self::R,
        Self::G,
        Self::B,
        Self::Average,
        Self::Hue,
        Self::Sat,
        Self::Val,
        Self::Color,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::R => "r",
            Self::G => "g",
            Self::B => "b",
            Self::Average => "average",
            Self::Hue => "hue",
            Self::Sat => "sat",
            Self::Val => "val",
            Self::Color => "color",
        }
    }

    /// Elevation encoded by one pixel. Not meaningful for [`Channel::Color`],
    /// which needs the whole image.
    pub(crate) fn sample(self, [r, g, b, _]: [u8; 4]) -> f64 {
        match self {
            Self::R => f64::from(r),
            Self::G => f64::from(g),
            Self::B => f64::from(b),
            Self::Average => (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0,
            Self::Hue => f64::from(hsv([r, g, b])[0]),
            Self::Sat => f64::from(hsv([r, g, b])[1]),
            Self::Val | Self::Color => f64::from(hsv([r, g, b])[2]),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = HeightsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or(HeightsError::UnknownChannel(s))
    }
}

/// RGB to HSV with every component scaled to `0..=255`.
///
/// Hue wraps, so pure red is 0 and hues just below red approach 255.
pub fn hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return [0, 0, max];
    }
    let (maxf, span) = (f64::from(max), f64::from(max - min));
    let rc = (maxf - f64::from(r)) / span;
    let gc = (maxf - f64::from(g)) / span;
    let bc = (maxf - f64::from(b)) / span;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0 + 1.0).rem_euclid(1.0);
    let s = span / maxf;
    [to_byte(h), to_byte(s), max]
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_greys_have_no_hue() {
        assert_eq!(hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(hsv([77, 77, 77]), [0, 0, 77]);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(hsv([128, 0, 0]), [0, 255, 128]);
        let green = hsv([0, 255, 0]);
        let blue = hsv([0, 0, 255]);
        assert!((84..=85).contains(&green[0]));
        assert!((169..=170).contains(&blue[0]));
        assert_eq!(hsv([255, 128, 0])[1], 255);
    }

    #[test]
    fn test_sample_channels() {
        let px = [30, 60, 90, 255];
        assert_eq!(Channel::R.sample(px), 30.0);
        assert_eq!(Channel::G.sample(px), 60.0);
        assert_eq!(Channel::B.sample(px), 90.0);
        assert_eq!(Channel::Average.sample(px), 60.0);
        assert_eq!(Channel::Val.sample(px), 90.0);
        assert_eq!(Channel::Sat.sample(px), 170.0);
    }

    #[test]
    fn test_names_round_trip() {
        for c in Channel::ALL {
            assert_eq!(c.name().parse::<Channel>().unwrap(), c);
        }
        assert_eq!(" VAL ".parse::<Channel>().unwrap(), Channel::Val);
        assert!(matches!(
            "alpha".parse::<Channel>(),
            Err(HeightsError::UnknownChannel(_))
        ));
    }
}
