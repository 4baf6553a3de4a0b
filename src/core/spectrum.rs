//! RGB representation of spectral quantities (power, radiance,
//! reflectance).

// std
use std::ops;
use std::ops::{Index, IndexMut};
// others
use num::Zero;
// pbrt
use crate::core::pbrt::clamp_t;
use crate::core::pbrt::Float;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    pub c: [Float; 3],
}

impl RGBSpectrum {
    pub fn new(v: Float) -> Self {
        RGBSpectrum { c: [v, v, v] }
    }
    pub fn rgb(r: Float, g: Float, b: Float) -> RGBSpectrum {
        RGBSpectrum { c: [r, g, b] }
    }
    /// Luminance.
    pub fn y(&self) -> Float {
        let y_weight: [Float; 3] = [0.212_671, 0.715_160, 0.072_169];
        y_weight[0] * self.c[0] + y_weight[1] * self.c[1] + y_weight[2] * self.c[2]
    }
    pub fn average(&self) -> Float {
        (self.c[0] + self.c[1] + self.c[2]) / 3.0 as Float
    }
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0 as Float)
    }
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }
    pub fn is_finite(&self) -> bool {
        self.c.iter().all(|v| v.is_finite())
    }
    pub fn clamp(&self, low: Float, high: Float) -> RGBSpectrum {
        RGBSpectrum {
            c: [
                clamp_t(self.c[0], low, high),
                clamp_t(self.c[1], low, high),
                clamp_t(self.c[2], low, high),
            ],
        }
    }
    pub fn max_component_value(&self) -> Float {
        self.c[0].max(self.c[1]).max(self.c[2])
    }
    pub fn exp(&self) -> RGBSpectrum {
        RGBSpectrum {
            c: [self.c[0].exp(), self.c[1].exp(), self.c[2].exp()],
        }
    }
    /// Monte Carlo samples must stay well defined: a value with a
    /// non-finite channel is dropped entirely, negative channels are
    /// clamped to zero.
    pub fn sanitize(&self) -> RGBSpectrum {
        if !self.is_finite() {
            RGBSpectrum::default()
        } else {
            self.clamp(0.0 as Float, Float::MAX)
        }
    }
    /// Channel-wise division where a zero denominator yields zero.
    pub fn safe_div(&self, rhs: &RGBSpectrum) -> RGBSpectrum {
        let mut ret: RGBSpectrum = RGBSpectrum::default();
        for i in 0..3 {
            if rhs.c[i] != 0.0 as Float {
                ret.c[i] = self.c[i] / rhs.c[i];
            }
        }
        ret
    }
}

impl_op!(-|a: RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [-a.c[0], -a.c[1], -a.c[2]],
    }
});

impl_op_ex!(+|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] + b.c[0], a.c[1] + b.c[1], a.c[2] + b.c[2]],
    }
});

impl_op_ex!(-|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] - b.c[0], a.c[1] - b.c[1], a.c[2] - b.c[2]],
    }
});

impl_op_ex!(*|a: &RGBSpectrum, b: &RGBSpectrum| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * b.c[0], a.c[1] * b.c[1], a.c[2] * b.c[2]],
    }
});

impl_op_ex!(*|a: &RGBSpectrum, b: Float| -> RGBSpectrum {
    RGBSpectrum {
        c: [a.c[0] * b, a.c[1] * b, a.c[2] * b],
    }
});

impl_op_ex!(/|a: &RGBSpectrum, b: Float| -> RGBSpectrum {
    debug_assert!(b != 0.0 as Float, "division of spectrum by zero");
    let inv: Float = 1.0 as Float / b;
    RGBSpectrum {
        c: [a.c[0] * inv, a.c[1] * inv, a.c[2] * inv],
    }
});

impl_op!(+= |a: &mut RGBSpectrum, b: RGBSpectrum| {
    a.c[0] += b.c[0];
    a.c[1] += b.c[1];
    a.c[2] += b.c[2];
});

impl_op!(*= |a: &mut RGBSpectrum, b: RGBSpectrum| {
    a.c[0] *= b.c[0];
    a.c[1] *= b.c[1];
    a.c[2] *= b.c[2];
});

impl_op!(*= |a: &mut RGBSpectrum, b: Float| {
    a.c[0] *= b;
    a.c[1] *= b;
    a.c[2] *= b;
});

impl_op!(/= |a: &mut RGBSpectrum, b: Float| {
    debug_assert!(b != 0.0 as Float, "division of spectrum by zero");
    a.c[0] /= b;
    a.c[1] /= b;
    a.c[2] /= b;
});

impl Zero for RGBSpectrum {
    fn zero() -> RGBSpectrum {
        RGBSpectrum::new(0.0 as Float)
    }
    fn is_zero(&self) -> bool {
        self.is_black()
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;
    fn index(&self, index: usize) -> &Float {
        &self.c[index]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, index: usize) -> &mut Float {
        &mut self.c[index]
    }
}

impl From<Float> for RGBSpectrum {
    fn from(f: Float) -> Self {
        RGBSpectrum::new(f)
    }
}
