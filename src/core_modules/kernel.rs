// THEORY:
// A `ConvolutionKernel` is an immutable odd-sized square matrix of weights with a
// divisor and an offset. All validation happens in `new`; once a kernel exists it is
// known to be well formed, so applying it can never fail.
//
// The catalog at the bottom holds the two kernels the standard pipelines use.

use crate::error::{ConfigurationError, ConfigurationResult};

/// A validated square convolution kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionKernel {
    size: usize,
    /// Row-major weights, `size * size` long.
    weights: Vec<f64>,
    divisor: f64,
    offset: f64,
}

impl ConvolutionKernel {
    /// Builds a kernel from `size` rows of `size` weights each.
    pub fn new(
        size: usize,
        matrix: Vec<Vec<f64>>,
        divisor: f64,
        offset: f64,
    ) -> ConfigurationResult<Self> {
        if size % 2 == 0 {
            return Err(ConfigurationError::EvenKernelSize(size));
        }
        if matrix.len() != size {
            return Err(ConfigurationError::KernelRowCount {
                expected: size,
                actual: matrix.len(),
            });
        }
        if let Some((row, values)) = matrix.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(ConfigurationError::KernelNotSquare {
                row,
                expected: size,
                actual: values.len(),
            });
        }
        if divisor == 0.0 {
            return Err(ConfigurationError::ZeroDivisor);
        }

        Ok(Self {
            size,
            weights: matrix.into_iter().flatten().collect(),
            divisor,
            offset,
        })
    }

    /// Builds a kernel whose divisor is the sum of its weights, so a constant
    /// image passes through unchanged away from the borders.
    pub fn normalized(size: usize, matrix: Vec<Vec<f64>>) -> ConfigurationResult<Self> {
        let divisor = matrix.iter().flatten().sum();
        Self::new(size, matrix, divisor, 0.0)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Half the side length; the distance from the centre to an edge of the window.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at column `kx`, row `ky`.
    #[inline]
    pub fn value(&self, kx: usize, ky: usize) -> f64 {
        self.weights[ky * self.size + kx]
    }
}

/// 3x3 Gaussian-style smoothing kernel.
pub fn gaussian_blur_3x3() -> ConvolutionKernel {
    ConvolutionKernel {
        size: 3,
        weights: vec![
            1.0, 2.0, 1.0, //
            2.0, 4.0, 2.0, //
            1.0, 2.0, 1.0,
        ],
        divisor: 16.0,
        offset: 0.0,
    }
}

/// 3x3 sharpening (contrast) kernel.
pub fn sharpen_3x3() -> ConvolutionKernel {
    ConvolutionKernel {
        size: 3,
        weights: vec![
            0.0, -1.0, 0.0, //
            -1.0, 5.0, -1.0, //
            0.0, -1.0, 0.0,
        ],
        divisor: 1.0,
        offset: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_even_size() {
        let err = ConvolutionKernel::new(2, vec![vec![1.0; 2]; 2], 1.0, 0.0).unwrap_err();
        assert_eq!(err, ConfigurationError::EvenKernelSize(2));
        assert_eq!(
            ConvolutionKernel::new(0, vec![], 1.0, 0.0).unwrap_err(),
            ConfigurationError::EvenKernelSize(0)
        );
    }

    #[test]
    fn rejects_mismatched_matrix() {
        let err = ConvolutionKernel::new(3, vec![vec![1.0; 3]; 2], 1.0, 0.0).unwrap_err();
        assert_eq!(err, ConfigurationError::KernelRowCount { expected: 3, actual: 2 });

        let ragged = vec![vec![1.0; 3], vec![1.0; 2], vec![1.0; 3]];
        let err = ConvolutionKernel::new(3, ragged, 1.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::KernelNotSquare {
                row: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = ConvolutionKernel::new(1, vec![vec![1.0]], 0.0, 0.0).unwrap_err();
        assert_eq!(err, ConfigurationError::ZeroDivisor);
        assert!(ConvolutionKernel::normalized(3, vec![vec![0.0; 3]; 3]).is_err());
    }

    #[test]
    fn value_reads_column_then_row() {
        let kernel = ConvolutionKernel::new(
            3,
            vec![
                vec![1.0, 2.0, 3.0],
                vec![4.0, 5.0, 6.0],
                vec![7.0, 8.0, 9.0],
            ],
            1.0,
            0.0,
        )
        .unwrap();
        assert_eq!(kernel.value(2, 0), 3.0);
        assert_eq!(kernel.value(0, 2), 7.0);
        assert_eq!(kernel.radius(), 1);
    }

    #[test]
    fn catalog_kernels_match_validated_construction() {
        let gaussian = ConvolutionKernel::new(
            3,
            vec![
                vec![1.0, 2.0, 1.0],
                vec![2.0, 4.0, 2.0],
                vec![1.0, 2.0, 1.0],
            ],
            16.0,
            0.0,
        )
        .unwrap();
        assert_eq!(gaussian_blur_3x3(), gaussian);

        let sharpen = ConvolutionKernel::normalized(
            3,
            vec![
                vec![0.0, -1.0, 0.0],
                vec![-1.0, 5.0, -1.0],
                vec![0.0, -1.0, 0.0],
            ],
        )
        .unwrap();
        assert_eq!(sharpen_3x3(), sharpen);
    }
}
