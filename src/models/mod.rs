pub mod cpu;
pub mod device;
pub mod parsed;

pub use cpu::CpuSample;
pub use device::{DeviceSample, DeviceSeries};
pub use parsed::ParsedData;
