pub mod color_inverter;
pub mod convolution;
pub mod image_shifter;
pub mod kernel;
pub mod pixel_buffer;
pub mod row_executor;
