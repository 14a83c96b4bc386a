//! # 像素统计
//!
//! 给出图像的尺寸、像素数、亮度桶直方图以及按通道计算的嵌入容量。
//!
//! "Unique Colors" 实际是被占用的亮度桶数 (`(r + g + b) / 3`)，只是颜色数的近似值。
//! `available_bits` 按像素数计算，与 [`crate::capacity::usable_embed_bytes`] 按文件长度计算的
//! 容量是两个独立的量，不能互相替代。

use std::fmt;

use image::{Rgb, RgbImage};

use crate::constants::{CHANNELS_PER_PIXEL, HISTOGRAM_BUCKETS};

/// 一幅图像的描述性统计数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStatistics {
    pub width: u32,
    pub height: u32,
    pub pixel_count: u64,
    /// 至少有一个像素落入的亮度桶数。
    pub unique_buckets: usize,
    /// 每个通道 1 bit：`pixel_count * 3`。
    pub available_bits: u64,
    pub histogram: [u64; HISTOGRAM_BUCKETS],
}

/// [`analyze`] 的结果。没有图像不是错误，而是一个单独的报告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatisticsReport {
    NoImage,
    Image(ImageStatistics),
}

/// 像素的亮度桶：三个通道的整数平均值。
#[inline]
pub fn luma_bucket(Rgb([r, g, b]): Rgb<u8>) -> usize {
    (usize::from(r) + usize::from(g) + usize::from(b)) / 3
}

/// 统计 `image`；传入 `None` 时返回 [`StatisticsReport::NoImage`]。
pub fn analyze(image: Option<&RgbImage>) -> StatisticsReport {
    let Some(image) = image else {
        return StatisticsReport::NoImage;
    };

    let (width, height) = image.dimensions();
    let pixel_count = u64::from(width) * u64::from(height);

    let mut histogram = [0u64; HISTOGRAM_BUCKETS];
    let mut unique_buckets = 0;
    for &pixel in image.pixels() {
        let slot = &mut histogram[luma_bucket(pixel)];
        if *slot == 0 {
            unique_buckets += 1;
        }
        *slot += 1;
    }

    StatisticsReport::Image(ImageStatistics {
        width,
        height,
        pixel_count,
        unique_buckets,
        available_bits: pixel_count * CHANNELS_PER_PIXEL,
        histogram,
    })
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImage => write!(f, "No image loaded."),
            Self::Image(stats) => write!(
                f,
                concat!(
                    "Image Dimensions: {}x{}\n",
                    "Pixel Count: {}\n",
                    "Unique Colors: {}\n",
                    "Available Bits for Embedding: {}"
                ),
                stats.width,
                stats.height,
                stats.pixel_count,
                stats.unique_buckets,
                stats.available_bits
            ),
        }
    }
}
