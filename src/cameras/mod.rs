//! The **Camera** trait is implemented by
//!
//! - PinholeCamera
//!
//! ## Pinhole Camera
//!
//! A perspective projection through a single point. No lens effects,
//! no motion blur; pixel samples jitter the ray within the pixel
//! footprint.

pub mod perspective;
