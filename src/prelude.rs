pub use crate::lineshape::LineShape;
pub use crate::line::SpectralLine;
pub use crate::spectrum::SampledSpectrum;
